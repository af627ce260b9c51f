use actix_web::{web, App, HttpServer};
use clap::Parser;
use sheet2rss::{refresh, routes, AppState, Args};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let address = format!("{}:{}", args.ip, args.port);

    let state = web::Data::new(AppState::new(args));

    // One-shot refresh; the server answers 404 until it lands and the
    // process exits if it fails.
    let refresher = state.clone();
    tokio::spawn(async move {
        if let Err(e) = refresh(refresher.get_ref()).await {
            tracing::error!(error = %e, "feed refresh failed, shutting down");
            std::process::exit(1);
        }
    });

    tracing::info!(%address, "server listening");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(&address)?
        .run()
        .await
}
