#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the churnd prediction server.

use std::ffi::OsString;
use std::path::PathBuf;

use churnd::config::ServerConfig;
use churnd::logging;
use churnd::model::ChurnModel;
use churnd::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = ServerConfig::load(config_argument(std::env::args_os().skip(1)).as_deref())?;

    // A missing or corrupt artifact aborts here, before the socket binds.
    let model = ChurnModel::load_json(&config.model_path)?;
    tracing::info!(
        "Loaded model artifact {} ({} stumps)",
        config.model_path.display(),
        model.stumps.len()
    );

    let app = server::router(AppState::new(model));
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn config_argument<I>(mut args: I) -> Option<PathBuf>
where
    I: Iterator<Item = OsString>,
{
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = OsString> {
        values
            .iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn config_argument_extracts_path() {
        let path = config_argument(args(&["--config", "/etc/churnd.toml"]));
        assert_eq!(path, Some(PathBuf::from("/etc/churnd.toml")));
    }

    #[test]
    fn config_argument_absent_without_flag() {
        assert_eq!(config_argument(args(&["serve"])), None);
        assert_eq!(config_argument(args(&["--config"])), None);
    }
}
