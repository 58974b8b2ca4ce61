use std::env;

use tracing::Level;
pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "TIKTOK_RELAY_LOG_LEVEL";

pub const COMPONENT_LEVELS: &[(&str, Level)] = &[
    ("tiktok_relay", Level::INFO),
    ("request", Level::INFO),
    ("app_config", Level::INFO),
    ("app_logger", Level::INFO),
    ("app_provider", Level::INFO),
];

/// Initialize the logger
///
/// # Panics
/// Panics if the logger fails to initialize
pub fn init() {
    init_with(COMPONENT_LEVELS.to_vec());
}

pub fn init_with<T>(levels: T)
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let mut base_level = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .parse_lossy(default_directives(levels));

    let env_directives = parse_directives(&env::var(LOG_LEVEL_ENV).unwrap_or_default());

    for d in env_directives {
        base_level = base_level.add_directive(d);
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(base_level)
        .try_init()
        .expect("setting default subscriber failed");
}

fn default_directives<T>(levels: T) -> String
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    levels
        .into_iter()
        .map(|(k, v)| {
            if k.is_empty() {
                v.to_string()
            } else {
                format!("{}={}", k, v)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_directives(raw: &str) -> Vec<Directive> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Failed to parse log level directive {s:?}: {e:?}");
                None
            }
        })
        .collect()
}
