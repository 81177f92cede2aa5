use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_body_size: usize,
    pub log_level: String,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Admin account created at startup when absent, so a fresh deployment has
/// someone who can register the real users.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub external_id: String,
    pub password: String,
    pub name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_or("REQGATE_DATABASE_URL", "sqlite:reqgate.db");
        let jwt_secret = env_required("REQGATE_JWT_SECRET")?;

        let host: IpAddr = env_or("REQGATE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid REQGATE_HOST: {e}"))?;

        let port: u16 = env_or("REQGATE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid REQGATE_PORT: {e}"))?;

        let allowed_origins: Vec<String> = env_or("REQGATE_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_body_size: usize = env_or("REQGATE_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid REQGATE_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("REQGATE_LOG_LEVEL", "info");

        let bootstrap_admin = match (
            std::env::var("REQGATE_ADMIN_ID").ok(),
            std::env::var("REQGATE_ADMIN_PASSWORD").ok(),
        ) {
            (Some(external_id), Some(password)) => Some(BootstrapAdmin {
                external_id,
                password,
                name: env_or("REQGATE_ADMIN_NAME", "Administrator"),
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            allowed_origins,
            max_body_size,
            log_level,
            bootstrap_admin,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
