pub mod cli;
pub mod common;
pub mod provider;
pub mod server;
pub mod validators;

use std::ffi::OsString;

use clap::Parser;
use cli::CliArgs;
use common::DumpConfigType;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

pub static APPLICATION_NAME: &str = "tiktok-relay";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Resolved process configuration.
///
/// Built once at startup and handed to the server by value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(skip)]
    pub run: common::RunConfig,

    /// Where and how the HTTP server listens
    #[validate(nested)]
    pub server: server::ServerConfig,

    /// Cross-origin headers attached to every response
    #[validate(nested)]
    pub cors: server::CorsConfig,

    /// The upstream service doing the actual extraction
    #[validate(nested)]
    pub provider: provider::ProviderConfig,
}
impl Config {
    /// Parse the process arguments and environment.
    ///
    /// Exits the process on invalid input or when a config dump was requested.
    #[must_use]
    pub fn load() -> Self {
        Self::from_args(CliArgs::parse())
            .validate_self()
            .dump_if_needed()
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let conf = Self::from_args(CliArgs::try_parse_from(args)?);
        conf.validate()?;

        Ok(conf)
    }

    #[must_use]
    pub fn from_args(args: CliArgs) -> Self {
        Self {
            run: args.run,
            server: args.server,
            cors: args.cors,
            provider: args.provider,
        }
    }

    #[must_use]
    #[inline]
    pub fn public_url(&self) -> String {
        self.server.public_url()
    }

    pub fn dump_config_if_needed<T>(data: &T, dump_type: &Option<Option<DumpConfigType>>)
    where
        T: Serialize + ?Sized,
    {
        match dump_type {
            Some(dump_type) => {
                let out = match dump_type {
                    None | Some(DumpConfigType::Json) => serde_json::to_string_pretty(data)
                        .expect("Failed to serialize config to JSON"),

                    Some(DumpConfigType::Toml) => {
                        toml::to_string_pretty(data).expect("Failed to serialize config to TOML")
                    }
                };

                println!("{}", out.trim());
                std::process::exit(0);
            }
            None => (),
        }
    }

    #[inline]
    pub fn validate_config_and_exit<T: Validate>(conf: T) -> T {
        if let Err(e) = conf.validate() {
            eprintln!("Errors validating configuration:");
            print_validation_errors(&e, "  ", 1);
            std::process::exit(1);
        }

        conf
    }

    fn dump_if_needed(self) -> Self {
        Self::dump_config_if_needed(&self, &self.run.dump_config);
        self
    }

    #[inline]
    fn validate_self(self) -> Self {
        Self::validate_config_and_exit(self)
    }
}

pub fn print_validation_errors(e: &validator::ValidationErrors, prefix: &str, level: usize) {
    let level = level.max(1);
    for (e_name, e) in e.errors() {
        match e {
            validator::ValidationErrorsKind::Field(e) => {
                let prefix_rep = prefix.repeat(level);
                eprintln!(
                    "{prefix_rep}{e_name}:\n{}",
                    e.iter()
                        .map(|x| format!("{} {:?}", x.code, x.params))
                        .fold(String::new(), |acc, a| format!(
                            "{acc}{prefix_rep}{prefix}- {a}\n"
                        ))
                        .trim_end()
                );
            }

            validator::ValidationErrorsKind::Struct(e) => {
                eprintln!("{}{}:", prefix, e_name);
                print_validation_errors(e, prefix, level + 1);
            }

            validator::ValidationErrorsKind::List(e) => {
                eprintln!("{}{}:", prefix, e_name);
                for e in e.values() {
                    print_validation_errors(e, prefix, level + 1);
                }
            }
        }
    }
}
