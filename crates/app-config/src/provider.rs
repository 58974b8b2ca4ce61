use std::time::Duration;

use clap::{Args, ValueHint};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validators::url::{validate_is_absolute_url, value_parser_parse_absolute_url};

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Extraction provider"))]
pub struct ProviderConfig {
    /// The endpoint the TikTok post URL is submitted to.
    #[arg(
        long = "provider-endpoint",
        default_value = "https://tiktokio.com/api/v1/tk-htmx",
        env = "TIKTOK_RELAY_PROVIDER_ENDPOINT",
        value_hint = ValueHint::Url,
        value_parser = value_parser_parse_absolute_url()
    )]
    #[validate(custom(function = "validate_is_absolute_url"))]
    pub endpoint: String,

    /// Form token the provider endpoint expects alongside the URL.
    #[arg(
        long = "provider-prefix",
        default_value = "dtGslxrcdcG9raW8uY29t",
        env = "TIKTOK_RELAY_PROVIDER_PREFIX"
    )]
    pub prefix: String,

    /// How long to wait for the provider before giving up, in seconds.
    #[arg(
        long = "provider-timeout-secs",
        default_value = "30",
        env = "TIKTOK_RELAY_PROVIDER_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,
}
impl ProviderConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
