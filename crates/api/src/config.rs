use shelf_core::sort_code::SortCode;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Fallback ordering for categories without their own settings.
    pub default_sort: SortCode,
    /// Default page size for listing windows (default: `24`).
    pub default_page_size: i32,
    /// Upper bound for client-requested page sizes (default: `100`).
    pub max_page_size: i32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DEFAULT_SORT_CODE`    | `1` (release date)         |
    /// | `DEFAULT_PAGE_SIZE`    | `24`                       |
    /// | `MAX_PAGE_SIZE`        | `100`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_sort_code: i16 = std::env::var("DEFAULT_SORT_CODE")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("DEFAULT_SORT_CODE must be a valid i16");
        let default_sort = SortCode::from_code(default_sort_code)
            .expect("DEFAULT_SORT_CODE must name a known sort ordering");

        let default_page_size: i32 = std::env::var("DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("DEFAULT_PAGE_SIZE must be a valid i32");

        let max_page_size: i32 = std::env::var("MAX_PAGE_SIZE")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("MAX_PAGE_SIZE must be a valid i32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            default_sort,
            default_page_size,
            max_page_size,
        }
    }
}
