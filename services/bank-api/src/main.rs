use actix_web::{web, App, HttpServer};
use bank_api::config::{build_engine, Config};
use bank_api::{routes, AppState};
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

    let engine = build_engine(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let state = AppState::new(engine);

    info!(
        bank = %config.bank_name,
        port = config.port,
        "bank service starting"
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
