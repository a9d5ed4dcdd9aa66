/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables (the hosting
/// platform injects `PORT`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`
    /// env var. The single value `*` allows any origin (without
    /// credentials).
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Maximum accepted upload body size in bytes (default: 500 MB).
    pub max_upload_bytes: usize,
    /// Directory holding uploaded videos (default: `uploads`).
    pub upload_dir: String,
    /// Base URL of the pose-estimation sidecar.
    pub pose_api_url: String,
    /// Per-request timeout for the sidecar in seconds (default: `30`).
    pub pose_timeout_secs: u64,
    /// Concurrent frame analyses per batch request (default: `4`).
    pub batch_workers: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `5000`                   |
    /// | `CORS_ORIGINS`         | `*`                      |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                     |
    /// | `MAX_UPLOAD_BYTES`     | `524288000`              |
    /// | `UPLOAD_DIR`           | `uploads`                |
    /// | `POSE_API_URL`         | `http://127.0.0.1:9090`  |
    /// | `POSE_TIMEOUT_SECS`    | `30`                     |
    /// | `BATCH_WORKERS`        | `4`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "524288000".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());

        let pose_api_url =
            std::env::var("POSE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:9090".into());

        let pose_timeout_secs: u64 = std::env::var("POSE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("POSE_TIMEOUT_SECS must be a valid u64");

        let batch_workers: usize = std::env::var("BATCH_WORKERS")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("BATCH_WORKERS must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            upload_dir,
            pose_api_url,
            pose_timeout_secs,
            batch_workers,
        }
    }
}
