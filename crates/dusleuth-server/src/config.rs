/// Server configuration.
use std::path::PathBuf;
use std::time::Duration;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8099;

/// How long a computed directory level stays fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// How long a request waits before telling the client the scan is slow.
pub const DEFAULT_APOLOGY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory that request path `/` maps to.
    pub base_path: PathBuf,
    pub port: u16,
    pub cache_ttl: Duration,
    pub apology_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            port: DEFAULT_PORT,
            cache_ttl: DEFAULT_CACHE_TTL,
            apology_timeout: DEFAULT_APOLOGY_TIMEOUT,
        }
    }
}
