use std::{net::TcpListener, sync::Arc};

use anyhow::Context;
use env_logger::Env;
use vitrine::{
    configuration::get_configuration,
    services::{TesseractCli, TextRecognizer},
    startup::{prepare_uploads, run_ocr},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let ocr = configuration.ocr;

    let upload_settings = prepare_uploads(&ocr)?;
    let recognizer: Arc<dyn TextRecognizer> = Arc::new(TesseractCli::new(
        ocr.tesseract_command.clone(),
        ocr.language.clone(),
    ));

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind to {}", address))?;
    log::info!("Serving OCR uploads on http://{}", address);

    run_ocr(
        listener,
        upload_settings,
        recognizer,
        ocr.static_dir,
        ocr.max_upload_bytes,
    )?
    .await?;

    Ok(())
}
