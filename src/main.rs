use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod components;
mod config;
mod error;
mod feed;
mod model;
mod page;
mod render;
mod routes;
mod site;
mod store;
mod templates;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("masthead=info,tower_http=info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| error::Error::Config(String::from("usage: masthead <config.toml>")))?;

    let config = config::Config::load(&path)?;

    let store = store::SanityClient::new(&config.store)?;
    tracing::info!("querying {}", store.endpoint());

    let bind = config.net.bind;
    let state = site::AppState::new(config, Arc::new(store))?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
