use std::{net::TcpListener, path::PathBuf, sync::Arc};

use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    configuration::{CatalogSettings, OcrSettings},
    domain::product::Product,
    routes::{
        catalog_route::{self, Catalog},
        ocr_route::{self, UploadSettings},
    },
    services::{export_products, render_catalog_charts, ProductScraper, TextRecognizer},
};

/// Scrapes the product listing, exports it and draws the charts. Runs once before serving.
pub async fn prepare_catalog(settings: &CatalogSettings) -> anyhow::Result<Vec<Product>> {
    if settings.rating_min > settings.rating_max {
        anyhow::bail!(
            "rating_min {} is greater than rating_max {}",
            settings.rating_min,
            settings.rating_max
        );
    }

    let scraper = ProductScraper::new(
        settings.source_url.clone(),
        settings.request_timeout(),
        settings.rating_range(),
    )?;
    let mut rng = StdRng::from_entropy();
    let products = scraper
        .fetch_products(&mut rng)
        .await
        .with_context(|| format!("Failed to scrape products from {}", settings.source_url))?;

    export_products(&products, &settings.export_path).with_context(|| {
        format!(
            "Failed to save products to {}",
            settings.export_path.display()
        )
    })?;
    render_catalog_charts(&products, &settings.static_dir, settings.rating_bins)
        .context("Failed to create visualizations")?;

    Ok(products)
}

pub fn run_catalog(
    listener: TcpListener,
    products: Vec<Product>,
    static_dir: PathBuf,
) -> Result<Server, std::io::Error> {
    let catalog = web::Data::new(Catalog { products });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", &static_dir).prefer_utf8(true))
            .service(catalog_route::show_catalog)
            .service(catalog_route::search_catalog)
            .app_data(catalog.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Validates the OCR settings and creates the upload directory.
pub fn prepare_uploads(settings: &OcrSettings) -> anyhow::Result<UploadSettings> {
    let upload_settings = UploadSettings::from_settings(settings)?;
    std::fs::create_dir_all(&upload_settings.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            upload_settings.upload_dir.display()
        )
    })?;

    Ok(upload_settings)
}

pub fn run_ocr(
    listener: TcpListener,
    upload_settings: UploadSettings,
    recognizer: Arc<dyn TextRecognizer>,
    static_dir: PathBuf,
    max_upload_bytes: usize,
) -> Result<Server, std::io::Error> {
    let upload_settings = web::Data::new(upload_settings);
    let recognizer: web::Data<dyn TextRecognizer> = web::Data::from(recognizer);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", &static_dir).prefer_utf8(true))
            .service(ocr_route::upload_form)
            .service(ocr_route::upload_and_extract)
            .app_data(upload_settings.clone())
            .app_data(recognizer.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_bytes)
                    .memory_limit(max_upload_bytes),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
