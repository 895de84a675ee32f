use clap::Parser;

/// Scoreboard-screenshot shame leaderboard bot
#[derive(Parser, Debug, Clone)]
#[command(name = "shameboard", version, about)]
pub struct Config {
    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "players.db")]
    pub database_path: String,

    /// HTTP listen address for the chat endpoint and dashboard
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Tesseract executable to invoke for OCR
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: String,

    /// Tesseract language pack (e.g. "eng", "deu")
    #[arg(long, env = "OCR_LANG", default_value = "eng")]
    pub ocr_lang: String,

    /// Timeout for downloading attached images, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "30")]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tesseract_cmd.trim().is_empty() {
            anyhow::bail!("tesseract_cmd must not be empty");
        }
        if self.ocr_lang.trim().is_empty() {
            anyhow::bail!("ocr_lang must not be empty");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        Ok(())
    }
}
