use std::path::{Path, PathBuf};

use actix_multipart::{
    form::{tempfile::TempFile, MultipartForm},
    MultipartError,
};
use actix_web::{get, post, web, HttpResponse};
use anyhow::Context;
use askama::Template;
use tokio::io::AsyncReadExt;

use crate::{
    configuration::OcrSettings,
    domain::upload::{allowed_file, secure_filename, ImageFormat, UploadError},
    services::TextRecognizer,
};

use super::render_html;

/// Where uploads are stored and how they are addressed from the page.
pub struct UploadSettings {
    pub upload_dir: PathBuf,
    pub url_prefix: String,
    pub allowed_extensions: Vec<String>,
}

impl UploadSettings {
    pub fn from_settings(settings: &OcrSettings) -> anyhow::Result<Self> {
        let url_prefix = settings.upload_url_prefix().with_context(|| {
            format!(
                "upload_dir {} must be inside static_dir {}",
                settings.upload_dir.display(),
                settings.static_dir.display()
            )
        })?;

        Ok(UploadSettings {
            upload_dir: settings.upload_dir.clone(),
            url_prefix,
            allowed_extensions: settings
                .allowed_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        })
    }
}

#[derive(MultipartForm)]
pub struct UploadForm {
    file: Option<TempFile>,
}

struct Extraction {
    image_url: String,
    text: String,
}

#[derive(Template)]
#[template(path = "ocr.html")]
struct OcrTemplate {
    allowed_extensions: String,
    error: Option<String>,
    extraction: Option<Extraction>,
}

impl OcrTemplate {
    fn new(settings: &UploadSettings) -> Self {
        OcrTemplate {
            allowed_extensions: settings
                .allowed_extensions
                .iter()
                .map(|e| e.to_uppercase())
                .collect::<Vec<String>>()
                .join(", "),
            error: None,
            extraction: None,
        }
    }
}

#[get("/")]
pub async fn upload_form(settings: web::Data<UploadSettings>) -> HttpResponse {
    render_html(&OcrTemplate::new(&settings))
}

#[post("/")]
pub async fn upload_and_extract(
    settings: web::Data<UploadSettings>,
    recognizer: web::Data<dyn TextRecognizer>,
    form: Result<MultipartForm<UploadForm>, actix_web::Error>,
) -> Result<HttpResponse, actix_web::Error> {
    let form = match form {
        Ok(MultipartForm(form)) => Some(form),
        Err(e) if is_not_multipart(&e) => None,
        Err(e) => return Err(e),
    };
    let mut page = OcrTemplate::new(&settings);

    match accept_upload(&settings, form) {
        Err(e) => {
            log::info!("Rejected upload: {}", e);
            page.error = Some(e.to_string());
        }
        Ok((file, filename)) => {
            match extract_text(&settings, recognizer.get_ref(), &file, &filename).await {
                Ok(extraction) => page.extraction = Some(extraction),
                Err(e) => {
                    log::error!("Failed to extract text from {}: {:?}", filename, e);
                    page.error = Some(format!("An error occurred: {:#}", e));
                }
            }
        }
    }

    Ok(render_html(&page))
}

/// A request without a multipart body carries no file part at all.
fn is_not_multipart(error: &actix_web::Error) -> bool {
    matches!(
        error.as_error::<MultipartError>(),
        Some(
            MultipartError::ContentTypeMissing
                | MultipartError::ContentTypeParse
                | MultipartError::ContentTypeIncompatible
                | MultipartError::BoundaryMissing
        )
    )
}

fn accept_upload(
    settings: &UploadSettings,
    form: Option<UploadForm>,
) -> Result<(TempFile, String), UploadError> {
    let file = form
        .and_then(|form| form.file)
        .ok_or(UploadError::MissingFile)?;
    let filename = match file.file_name.as_deref() {
        None | Some("") => return Err(UploadError::NoFileSelected),
        Some(name) => name.to_string(),
    };

    match allowed_file(&filename, &settings.allowed_extensions) {
        true => Ok((file, filename)),
        false => Err(UploadError::ExtensionNotAllowed),
    }
}

async fn extract_text(
    settings: &UploadSettings,
    recognizer: &dyn TextRecognizer,
    file: &TempFile,
    filename: &str,
) -> anyhow::Result<Extraction> {
    let secured = secure_filename(filename);
    if secured.is_empty() {
        return Err(UploadError::UnusableFileName(filename.to_string()).into());
    }

    let format = sniff_image(file.file.path(), &secured).await?;
    log::info!("Received {} upload {} ({} bytes)", format, secured, file.size);

    let destination = settings.upload_dir.join(&secured);
    tokio::fs::copy(file.file.path(), &destination)
        .await
        .with_context(|| format!("failed to save upload to {}", destination.display()))?;

    let text = recognizer.recognize(&destination).await?;

    Ok(Extraction {
        image_url: format!("{}/{}", settings.url_prefix, secured),
        text,
    })
}

const SNIFF_LEN: u64 = 16;

/// Only the leading magic bytes are read; the upload itself may be large.
async fn sniff_image(path: &Path, filename: &str) -> anyhow::Result<ImageFormat> {
    let file = tokio::fs::File::open(path)
        .await
        .context("failed to open uploaded file")?;
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut header)
        .await
        .context("failed to read uploaded file")?;

    ImageFormat::sniff(&header)
        .ok_or_else(|| UploadError::NotAnImage(filename.to_string()).into())
}
