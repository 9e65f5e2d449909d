use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// SQLite connection string. Defaults to a local file next to the binary.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Lifetime of a login session in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Mark the session cookie `Secure` (enable behind TLS)
    #[serde(default)]
    pub cookie_secure: bool,

    /// Number of staff accounts created by the seed binary
    #[serde(default = "default_seed_staff_count")]
    pub seed_staff_count: u32,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_database_url() -> String {
    "sqlite://jobs.db?mode=rwc".to_string()
}

fn default_session_ttl_hours() -> i64 {
    12
}

fn default_seed_staff_count() -> u32 {
    5
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Configuration for tests: in-memory database, short-lived sessions.
    pub fn for_database(database_url: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: database_url.to_string(),
            session_ttl_hours: 1,
            cookie_secure: false,
            seed_staff_count: 1,
        }
    }
}
