use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Batcheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the OpenAI-compatible API key.
pub const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Optional override for the API base URL (self-hosted gateways).
pub const LLM_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Default chat model for applicability and compliance calls.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Default bind address for `batcheck serve`.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Batcheck/ on all platforms (user-visible, holds the knowledge base)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// SQLite knowledge base path
pub fn knowledge_base_path() -> PathBuf {
    app_data_dir().join("knowledge_base.db")
}

/// Downloaded BREF PDFs
pub fn brefs_dir() -> PathBuf {
    app_data_dir().join("brefs")
}

/// Per-run staged uploads
pub fn uploads_dir() -> PathBuf {
    app_data_dir().join("uploads")
}

/// Generated compliance reports
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}
