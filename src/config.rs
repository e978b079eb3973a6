use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub registration: RegistrationMode,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub cors_origins: Vec<String>,
    pub media_root: PathBuf,
    pub media_url: String,
    pub contact_rate_limit: u32,
    pub contact_rate_window: u64,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("CMS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CMS_HOST: {e}"))?;

        let port: u16 = env_or("CMS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CMS_PORT: {e}"))?;

        let base_url = env_or("CMS_BASE_URL", &format!("http://{host}:{port}"));

        let registration = match env_or("CMS_REGISTRATION", "closed").as_str() {
            "open" => RegistrationMode::Open,
            _ => RegistrationMode::Closed,
        };

        let max_body_size: usize = env_or("CMS_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid CMS_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("CMS_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid CMS_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors_origins: Vec<String> = env_or("CMS_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let media_root = PathBuf::from(env_or("CMS_MEDIA_ROOT", "media"));
        let media_url = normalize_media_url(&env_or("CMS_MEDIA_URL", "/media"));

        let contact_rate_limit: u32 = env_or("CMS_CONTACT_RATE_LIMIT", "5")
            .parse()
            .map_err(|e| format!("Invalid CMS_CONTACT_RATE_LIMIT: {e}"))?;

        let contact_rate_window: u64 = env_or("CMS_CONTACT_RATE_WINDOW", "3600")
            .parse()
            .map_err(|e| format!("Invalid CMS_CONTACT_RATE_WINDOW: {e}"))?;

        let log_level = env_or("CMS_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            base_url,
            registration,
            max_body_size,
            trusted_proxies,
            cors_origins,
            media_root,
            media_url,
            contact_rate_limit,
            contact_rate_window,
            log_level,
        })
    }
}

/// `media/` and `/media/` both become `/media`.
pub fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/media".to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_is_normalized() {
        assert_eq!(normalize_media_url("media"), "/media");
        assert_eq!(normalize_media_url("/media/"), "/media");
        assert_eq!(normalize_media_url("/static/uploads"), "/static/uploads");
        assert_eq!(normalize_media_url("/"), "/media");
    }
}
