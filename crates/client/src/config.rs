use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local analysis server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the analysis server (default: `http://localhost:5000`).
    pub server_url: String,
    /// Root directory for caches and estimation results
    /// (default: `./tetres-data`).
    pub data_dir: PathBuf,
    /// HTTP connect timeout in seconds (default: `10`).
    pub connect_timeout_secs: u64,
    /// Per-request timeout in seconds (default: `600`).  Estimation
    /// result downloads can be large, so this stays generous.
    pub request_timeout_secs: u64,
    /// Interval between estimation result polls in seconds
    /// (default: `15`).
    pub poll_interval_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `TETRES_SERVER_URL`          | `http://localhost:5000` |
    /// | `TETRES_DATA_DIR`            | `./tetres-data`         |
    /// | `TETRES_CONNECT_TIMEOUT_SECS`| `10`                    |
    /// | `TETRES_REQUEST_TIMEOUT_SECS`| `600`                   |
    /// | `TETRES_POLL_INTERVAL_SECS`  | `15`                    |
    pub fn from_env() -> Self {
        let server_url =
            std::env::var("TETRES_SERVER_URL").unwrap_or_else(|_| "http://localhost:5000".into());

        let data_dir: PathBuf = std::env::var("TETRES_DATA_DIR")
            .unwrap_or_else(|_| "./tetres-data".into())
            .into();

        let connect_timeout_secs: u64 = std::env::var("TETRES_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("TETRES_CONNECT_TIMEOUT_SECS must be a valid u64");

        let request_timeout_secs: u64 = std::env::var("TETRES_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("TETRES_REQUEST_TIMEOUT_SECS must be a valid u64");

        let poll_interval_secs: u64 = std::env::var("TETRES_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("TETRES_POLL_INTERVAL_SECS must be a valid u64");

        Self {
            server_url,
            data_dir,
            connect_timeout_secs,
            request_timeout_secs,
            poll_interval_secs,
        }
    }

    /// Configuration pointed at a specific server with defaults
    /// elsewhere.
    pub fn for_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            data_dir: PathBuf::from("./tetres-data"),
            connect_timeout_secs: 10,
            request_timeout_secs: 600,
            poll_interval_secs: 15,
        }
    }

    /// Directory for cached server payloads.
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    /// Directory estimation results are downloaded into.
    pub fn results_dir(&self) -> PathBuf {
        self.data_dir.join("results")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
