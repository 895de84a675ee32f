use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

/// A fetched attachment image: either downloaded into a temp file that is
/// removed when the value drops, or a local path handed over by the
/// transport as-is.
#[derive(Debug)]
pub enum Attachment {
    Downloaded(NamedTempFile),
    Local(PathBuf),
}

impl Attachment {
    pub fn path(&self) -> &Path {
        match self {
            Attachment::Downloaded(file) => file.path(),
            Attachment::Local(path) => path,
        }
    }
}

/// Resolve an attachment reference into a readable image path.
///
/// `http(s)` URLs are downloaded with the shared client; any other URL
/// scheme is rejected. A reference that does not parse as a URL is treated
/// as a local filesystem path and must point at an existing file.
pub async fn fetch_attachment(http: &reqwest::Client, reference: &str) -> Result<Attachment> {
    if let Ok(parsed) = Url::parse(reference) {
        return match parsed.scheme() {
            "http" | "https" => download(http, parsed).await,
            other => bail!("unsupported attachment URL scheme \"{other}\""),
        };
    }

    let path = PathBuf::from(reference);
    if !path.is_file() {
        bail!("attachment path {} does not exist", path.display());
    }
    Ok(Attachment::Local(path))
}

async fn download(http: &reqwest::Client, url: Url) -> Result<Attachment> {
    debug!("Downloading attachment from {}", url);

    let response = http
        .get(url.as_str())
        .send()
        .await
        .context("attachment request failed")?;
    if !response.status().is_success() {
        bail!("attachment download failed: HTTP {}", response.status());
    }
    let bytes = response
        .bytes()
        .await
        .context("failed to read attachment body")?;

    let file = NamedTempFile::with_suffix(image_suffix(&url))
        .context("could not create temp file for attachment")?;
    tokio::fs::write(file.path(), &bytes)
        .await
        .context("could not write attachment to temp file")?;
    Ok(Attachment::Downloaded(file))
}

/// Keep the source extension when the URL has one. Tesseract sniffs the
/// content anyway; the suffix just keeps stray temp files identifiable.
fn image_suffix(url: &Url) -> String {
    Path::new(url.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".png".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_suffix_from_url_path() {
        let url = Url::parse("https://cdn.example.com/boards/week3.jpg?x=1").unwrap();
        assert_eq!(image_suffix(&url), ".jpg");
    }

    #[test]
    fn test_image_suffix_defaults_to_png() {
        let url = Url::parse("https://cdn.example.com/attachments/188211").unwrap();
        assert_eq!(image_suffix(&url), ".png");
    }

    #[tokio::test]
    async fn test_rejects_non_http_schemes() {
        let http = reqwest::Client::new();
        let err = fetch_attachment(&http, "ftp://example.com/board.png")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[tokio::test]
    async fn test_missing_local_path_is_an_error() {
        let http = reqwest::Client::new();
        let err = fetch_attachment(&http, "/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_existing_local_path_is_used_as_is() {
        let file = NamedTempFile::with_suffix(".png").unwrap();
        let http = reqwest::Client::new();
        let reference = file.path().to_str().unwrap();
        let attachment = fetch_attachment(&http, reference).await.unwrap();
        assert_eq!(attachment.path(), file.path());
    }

    #[tokio::test]
    async fn test_http_attachment_lands_in_temp_file() {
        let app = axum::Router::new().route(
            "/boards/week3.png",
            axum::routing::get(|| async { &b"fake image bytes"[..] }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let http = reqwest::Client::new();
        let url = format!("http://{addr}/boards/week3.png");
        let attachment = fetch_attachment(&http, &url).await.unwrap();

        assert_eq!(
            tokio::fs::read(attachment.path()).await.unwrap(),
            b"fake image bytes"
        );
        assert!(attachment.path().to_string_lossy().ends_with(".png"));
    }
}
