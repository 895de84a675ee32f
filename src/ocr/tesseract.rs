use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use super::TextExtractor;

/// OCR engine backed by the Tesseract executable.
///
/// Invokes `tesseract <image> stdout -l <lang> --psm 6`; page-segmentation
/// mode 6 reads the scoreboard as a single uniform block of text, which is
/// what the name/score column layout looks like to Tesseract.
pub struct TesseractOcr {
    command: String,
    lang: String,
}

impl TesseractOcr {
    pub fn new(command: &str, lang: &str) -> Self {
        TesseractOcr {
            command: command.to_string(),
            lang: lang.to_string(),
        }
    }
}

#[async_trait]
impl TextExtractor for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract_text(&self, image_path: &Path) -> Result<String> {
        debug!(
            "Running {} on {} (lang={})",
            self.command,
            image_path.display(),
            self.lang
        );

        let output = Command::new(&self.command)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg("6")
            .output()
            .await
            .with_context(|| format!("failed to run `{}`", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tesseract exited with {}: {}", output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
