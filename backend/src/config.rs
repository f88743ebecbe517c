// src/config.rs

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Used when `SESSION_SECRET` is unset. Anyone who knows it can forge session cookies.
pub const DEFAULT_SESSION_SECRET: &str = "quiz-app-secret";

const DEFAULT_SESSION_TTL_SECONDS: i64 = 86_400;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret the session cookie signing key is derived from.
    pub session_secret: String,
    /// Sessions expire after this many seconds without a request.
    pub session_ttl_seconds: i64,
    /// Marks the session cookie `Secure` (HTTPS only).
    pub secure_cookies: bool,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    /// Optional demo account created at startup.
    pub demo_username: Option<String>,
    pub demo_password: Option<String>,
}

impl Config {
    /// Reads the process environment. `.env` loading is left to the caller.
    pub fn from_env() -> Self {
        let session_secret =
            env::var("SESSION_SECRET").unwrap_or_else(|_| DEFAULT_SESSION_SECRET.to_string());

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);

        let secure_cookies = env::var("SECURE_COOKIES")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let host = env::var("HOST")
            .ok()
            .and_then(|v| v.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            session_secret,
            session_ttl_seconds,
            secure_cookies,
            rust_log,
            bind_addr: SocketAddr::new(host, port),
            cors_origins,
            demo_username: env::var("DEMO_USERNAME").ok(),
            demo_password: env::var("DEMO_PASSWORD").ok(),
        }
    }

    /// Whether the session secret is still the publicly known default.
    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookies: false,
            rust_log: "info".to_string(),
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000),
            cors_origins: DEFAULT_CORS_ORIGINS.split(',').map(str::to_string).collect(),
            demo_username: None,
            demo_password: None,
        }
    }
}
