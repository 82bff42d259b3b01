use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub genai: GenAiConfig,
    pub upload_dir: PathBuf,
    pub upload_public_base_url: String,
    pub max_upload_bytes: usize,
    pub cities_path: PathBuf,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
}

/// Settings for the hosted generative-language API used by the flows.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:9002".to_string()),
            genai: GenAiConfig {
                api_key: env::var("GENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                model: env::var("GENAI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
                base_url: env::var("GENAI_BASE_URL").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
                timeout_secs: env::var("GENAI_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),
            upload_public_base_url: env::var("UPLOAD_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "/files".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse()
                .unwrap_or(10 * 1024 * 1024),
            cities_path: env::var("CITIES_PATH")
                .unwrap_or_else(|_| "data/india_mangroves.json".to_string())
                .into(),
            tls_cert_path: env::var("TLS_CERT_PATH").ok().map(PathBuf::from),
            tls_key_path: env::var("TLS_KEY_PATH").ok().map(PathBuf::from),
        })
    }

    /// Both TLS paths, when the server should terminate TLS itself.
    pub fn tls_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }

    /// Configuration for tests that never open a database connection.
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            database_max_connections: 2,
            host: "127.0.0.1".to_string(),
            port: 0,
            frontend_url: "http://localhost:9002".to_string(),
            genai: GenAiConfig {
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            upload_dir: env::temp_dir().join("coastalwatch-uploads"),
            upload_public_base_url: "/files".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            cities_path: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("data/india_mangroves.json"),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}
