use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;

fn to_io(err: crate::domain::error::AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

pub async fn run() -> std::io::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
            error!(error = %err, "Failed to load configuration");
            return Err(to_io(err));
        }
    };

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let state = crate::infrastructure::bootstrap::setup(&config)
        .await
        .map_err(to_io)?;

    crate::interfaces::http::start_server(state, &config.http)?.await
}
