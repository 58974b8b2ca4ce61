use clap::{Args, ValueHint};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validators::{
    str::header_value,
    url::{validate_is_absolute_url, value_parser_parse_absolute_url},
};

pub const DEFAULT_CORS_ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "Server options")]
pub struct ServerConfig {
    /// The port on which the server will listen.
    #[arg(long, default_value = "3000", env = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// The host on which the server will listen.
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    #[validate(length(min = 1))]
    pub host: String,

    /// The public URL where the relay is served.
    /// Used to build the example link in error responses.
    /// Defaults to `http://localhost:<port>`.
    #[arg(long, env = "TIKTOK_RELAY_PUBLIC_URL", value_hint = ValueHint::Url, value_parser = value_parser_parse_absolute_url())]
    #[validate(custom(function = "validate_is_absolute_url"))]
    pub public_url: Option<String>,
}
impl ServerConfig {
    #[must_use]
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = "CORS options")]
pub struct CorsConfig {
    /// Value of the `Access-Control-Allow-Origin` header sent with every response.
    #[arg(
        long = "cors-allow-origin",
        default_value = "*",
        env = "TIKTOK_RELAY_CORS_ALLOW_ORIGIN"
    )]
    #[validate(length(min = 1), custom(function = "header_value"))]
    pub allow_origin: String,

    /// Value of the `Access-Control-Allow-Headers` header sent with every response.
    #[arg(
        long = "cors-allow-headers",
        default_value = DEFAULT_CORS_ALLOW_HEADERS,
        env = "TIKTOK_RELAY_CORS_ALLOW_HEADERS"
    )]
    #[validate(custom(function = "header_value"))]
    pub allow_headers: String,
}
