use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use vitrine::{
    configuration::get_configuration,
    startup::{prepare_catalog, run_catalog},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    // Scrape, export and plot before accepting requests
    let products = prepare_catalog(&configuration.catalog).await?;

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind to {}", address))?;
    log::info!("Serving {} products on http://{}", products.len(), address);

    run_catalog(listener, products, configuration.catalog.static_dir)?.await?;

    Ok(())
}
