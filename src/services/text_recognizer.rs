use std::{io::ErrorKind, path::Path, process::Stdio};

use async_trait::async_trait;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine {0:?} is not installed or not on PATH")]
    NotInstalled(String),
    #[error("failed to run OCR engine")]
    Spawn(#[from] std::io::Error),
    #[error("OCR engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("OCR engine produced non UTF-8 output")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError>;
}

/// Runs the `tesseract` command line tool and reads the recognized text from stdout.
pub struct TesseractCli {
    command: String,
    language: String,
}

impl TesseractCli {
    pub fn new(command: String, language: String) -> Self {
        TesseractCli { command, language }
    }
}

#[async_trait]
impl TextRecognizer for TesseractCli {
    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.command)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::NotInstalled(self.command.clone()),
                _ => OcrError::Spawn(e),
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)?;
        log::info!(
            "Recognized {} characters in {}",
            text.trim().len(),
            image_path.display()
        );

        Ok(text)
    }
}
