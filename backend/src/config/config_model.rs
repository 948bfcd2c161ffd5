#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub storage: Storage,
    pub telegram: Telegram,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub base_dir: String,
}

#[derive(Debug, Clone)]
pub struct Telegram {
    /// Empty disables notifications.
    pub token: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
}
