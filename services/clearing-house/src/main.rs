use actix_web::{web, App, HttpServer};
use clearing_house::config::Config;
use clearing_house::retry::RetryStrategy;
use clearing_house::routes::{self, AppState};
use clearing_house::{ClearingSaga, HttpBankClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let client = HttpBankClient::new(Duration::from_millis(config.call_timeout_ms))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let saga = Arc::new(ClearingSaga::new(
        config.banks.clone(),
        Arc::new(client),
        RetryStrategy::new(config.retry.clone().into()),
    ));
    let state = AppState { saga };

    info!(
        port = config.port,
        banks = config.banks.len(),
        "clearing house starting"
    );

    let bind_address = format!("0.0.0.0:{}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
