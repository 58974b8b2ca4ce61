use anyhow::Context;
use app_config::Config;
use app_provider::handlers::default_provider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded_dotenv = dotenvy::dotenv();

    app_logger::init();

    match loaded_dotenv {
        Ok(loaded_dotenv) => {
            app_logger::debug!(path = ?loaded_dotenv, "Loaded dotenv file");
        }
        Err(e) if e.not_found() => {
            app_logger::debug!("No dotenv file found");
        }
        Err(e) => {
            app_logger::error!("Failed to load dotenv file: {e:?}");
            return Err(e).context("Failed to load dotenv file");
        }
    }

    let config = Config::load();

    app_logger::debug!(config = ?config, "Running with config");

    let provider =
        default_provider(&config.provider).context("Failed to create extraction provider")?;

    app_logger::info!(
        provider = provider.name(),
        description = provider.description(),
        "Using extraction provider"
    );

    tiktok_relay::run(config, provider).await
}
