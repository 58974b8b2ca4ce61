use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::{common, provider, server};

/// Relays TikTok post URLs to an extraction provider
/// and returns the download links as uniform JSON.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(name = "tiktok-relay", disable_help_flag = true)]
pub struct CliArgs {
    /// Print help
    #[clap(action = ArgAction::Help, long)]
    help: Option<bool>,

    #[command(flatten)]
    pub run: common::RunConfig,

    #[command(flatten)]
    pub server: server::ServerConfig,

    #[command(flatten)]
    pub cors: server::CorsConfig,

    #[command(flatten)]
    pub provider: provider::ProviderConfig,
}
