// src/config.rs

use std::env;
use dotenvy::dotenv;

pub const DEFAULT_COMPLETION_URL: &str = "https://api.x.ai/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "grok-3";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// The single admin credential pair; compared verbatim, case-sensitive.
    pub admin_email: String,
    pub admin_password: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub completion_api_key: String,
    pub completion_url: String,
    pub completion_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let db_host = env::var("DB_HOST")
            .expect("DB_HOST must be set");

        let db_port = env::var("DB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3306);

        let db_user = env::var("DB_USER")
            .expect("DB_USER must be set");

        let db_password = env::var("DB_PASSWORD")
            .unwrap_or_default();

        let db_name = env::var("DB_NAME")
            .expect("DB_NAME must be set");

        let admin_email = env::var("ADMIN_EMAIL")
            .expect("ADMIN_EMAIL must be set");

        let admin_password = env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 60 * 60);

        let completion_api_key = env::var("GROK_API_KEY")
            .expect("GROK_API_KEY must be set");

        let completion_url = env::var("GROK_API_URL")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_URL.to_string());

        let completion_model = env::var("GROK_MODEL")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            db_host,
            db_port,
            db_user,
            db_password,
            db_name,
            admin_email,
            admin_password,
            jwt_secret,
            jwt_expiration,
            completion_api_key,
            completion_url,
            completion_model,
            port,
            rust_log,
        }
    }
}
