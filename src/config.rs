use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub transcribe_model: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_key: Vec<u8>,
    pub ai: AiConfig,
    pub vapi_api_base: String,
    pub vapi_web_token: Option<String>,
    pub upload_dir: String,
    pub cors_origin: String,
    pub bind_addr: String,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL missing")?;

        let session_key_b64 = std::env::var("SESSION_KEY").context("SESSION_KEY missing")?;
        let session_key = general_purpose::STANDARD
            .decode(session_key_b64.trim())
            .context("SESSION_KEY must be base64")?;
        if session_key.len() < 32 {
            return Err(anyhow!("SESSION_KEY must decode to at least 32 bytes"));
        }

        let api_key = std::env::var("AI_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .context("AI_API_KEY missing")?;

        let db_max_connections = var_or("DB_MAX_CONNECTIONS", "10")
            .parse()
            .context("DB_MAX_CONNECTIONS must be a number")?;

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = var_or("PORT", "3000");
            format!("0.0.0.0:{port}")
        });

        Ok(Self {
            database_url,
            db_max_connections,
            session_key,
            ai: AiConfig {
                api_key,
                api_base: var_or("AI_API_BASE", "https://api.openai.com/v1"),
                model: var_or("AI_MODEL", "gpt-4o-mini"),
                transcribe_model: var_or("AI_TRANSCRIBE_MODEL", "whisper-1"),
            },
            vapi_api_base: var_or("VAPI_API_BASE", "https://api.vapi.ai"),
            vapi_web_token: std::env::var("VAPI_WEB_TOKEN").ok().filter(|t| !t.is_empty()),
            upload_dir: var_or("UPLOAD_DIR", "uploads"),
            cors_origin: var_or("CORS_ORIGIN", "http://localhost:5173"),
            bind_addr,
        })
    }
}
