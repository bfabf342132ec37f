use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://trustedsite1.com",
    "https://trustedsite2.com",
    "http://localhost:3000",
];

pub const DEFAULT_JWT_TTL_HOURS: i64 = 24;
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub upload_dir: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_ttl_hours = parse_ttl_hours(env::var("JWT_TTL_HOURS").ok().as_deref());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|_| default_origins());

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_ttl_hours,
            upload_dir,
            allowed_origins,
        })
    }
}

pub fn default_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
}

/// Token lifetime in hours; unparsable or non-positive values fall back to the
/// default, anything above a year is capped.
pub fn parse_ttl_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|h| h.trim().parse::<i64>().ok())
        .filter(|h| *h > 0)
        .map(|h| h.min(MAX_JWT_TTL_HOURS))
        .unwrap_or(DEFAULT_JWT_TTL_HOURS)
}

/// Comma separated origin list; blanks are dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_drops_blanks_and_trailing_slash() {
        let origins = parse_origins(" https://a.com/ ,, http://localhost:3000");
        assert_eq!(origins, vec!["https://a.com", "http://localhost:3000"]);
    }

    #[test]
    fn ttl_hours_are_bounded() {
        assert_eq!(parse_ttl_hours(None), DEFAULT_JWT_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("12")), 12);
        assert_eq!(parse_ttl_hours(Some("0")), DEFAULT_JWT_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("-5")), DEFAULT_JWT_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("soon")), DEFAULT_JWT_TTL_HOURS);
        assert_eq!(parse_ttl_hours(Some("9223372036854775807")), MAX_JWT_TTL_HOURS);
    }

    #[test]
    fn default_origins_include_local_frontend() {
        assert!(default_origins().iter().any(|o| o == "http://localhost:3000"));
    }
}
