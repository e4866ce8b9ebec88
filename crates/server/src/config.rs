//! Server configuration

use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base_url: String,
    pub llm_temperature: f32,
    pub hospital_api_base_url: String,
    pub hospital_client_id: Option<String>,
    pub http_timeout_seconds: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            rate_limit_rps: parse_var("RATE_LIMIT_RPS", 50),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".into()),
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            llm_temperature: parse_var("LLM_TEMPERATURE", 0.2),
            hospital_api_base_url: std::env::var("HOSPITAL_API_BASE_URL")
                .unwrap_or_else(|_| "http://34.93.7.250:8001/api".into()),
            hospital_client_id: client_id(std::env::var("HOSPITAL_CLIENT_ID").ok()),
            http_timeout_seconds: parse_var("HTTP_TIMEOUT_SECONDS", 10.0),
        }
    }

    /// Timeout applied to every outbound request
    pub fn http_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.http_timeout_seconds).unwrap_or(Duration::from_secs(10))
    }
}

/// Hospital client used for bookings when `HOSPITAL_CLIENT_ID` is absent
const DEFAULT_HOSPITAL_CLIENT_ID: &str = "444d9283-88fa-4320-a084-1adb97085d41";

/// Absent means the built-in client, blank means deliberately unset
fn client_id(raw: Option<String>) -> Option<String> {
    match raw {
        Some(id) if id.trim().is_empty() => None,
        Some(id) => Some(id),
        None => Some(DEFAULT_HOSPITAL_CLIENT_ID.to_string()),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    parse_or(name, std::env::var(name).ok(), default)
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_timeout(http_timeout_seconds: f64) -> Config {
        Config {
            bind_address: "0.0.0.0:8000".to_string(),
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 50,
            google_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_temperature: 0.2,
            hospital_api_base_url: "http://localhost:8001/api".to_string(),
            hospital_client_id: None,
            http_timeout_seconds,
        }
    }

    #[test]
    fn invalid_numbers_fall_back_to_default() {
        assert_eq!(parse_or("RATE_LIMIT_RPS", Some("abc".into()), 50u32), 50);
        assert_eq!(parse_or("RATE_LIMIT_RPS", Some("-5".into()), 50u32), 50);
        assert_eq!(parse_or("RATE_LIMIT_RPS", Some(" 20 ".into()), 50u32), 20);
        assert_eq!(parse_or("RATE_LIMIT_RPS", None, 50u32), 50);
        assert_eq!(parse_or("LLM_TEMPERATURE", Some("0.7".into()), 0.2f32), 0.7);
    }

    #[test]
    fn parse_var_reads_the_environment() {
        // Names are unique to this test so parallel tests can't interfere
        unsafe {
            std::env::set_var("MEDASSIST_TEST_PARSE_OK", "12");
            std::env::set_var("MEDASSIST_TEST_PARSE_BAD", "twelve");
        }
        assert_eq!(parse_var("MEDASSIST_TEST_PARSE_OK", 3u32), 12);
        assert_eq!(parse_var("MEDASSIST_TEST_PARSE_BAD", 3u32), 3);
        assert_eq!(parse_var("MEDASSIST_TEST_PARSE_MISSING", 3u32), 3);
    }

    #[test]
    fn blank_secrets_are_unset() {
        unsafe {
            std::env::set_var("MEDASSIST_TEST_KEY_BLANK", "   ");
            std::env::set_var("MEDASSIST_TEST_KEY_SET", "secret");
        }
        assert_eq!(non_empty_var("MEDASSIST_TEST_KEY_BLANK"), None);
        assert_eq!(non_empty_var("MEDASSIST_TEST_KEY_SET").as_deref(), Some("secret"));
        assert_eq!(non_empty_var("MEDASSIST_TEST_KEY_MISSING"), None);
    }

    #[test]
    fn hospital_client_id_blank_versus_missing() {
        assert_eq!(client_id(Some(String::new())), None);
        assert_eq!(client_id(Some("  ".into())), None);
        assert_eq!(client_id(Some("abc".into())).as_deref(), Some("abc"));
        assert_eq!(client_id(None).as_deref(), Some(DEFAULT_HOSPITAL_CLIENT_ID));
    }

    #[test]
    fn http_timeout_rejects_unusable_values() {
        assert_eq!(config_with_timeout(2.5).http_timeout(), Duration::from_millis(2500));
        assert_eq!(config_with_timeout(-3.0).http_timeout(), Duration::from_secs(10));
        assert_eq!(config_with_timeout(f64::NAN).http_timeout(), Duration::from_secs(10));
        assert_eq!(config_with_timeout(f64::INFINITY).http_timeout(), Duration::from_secs(10));
    }
}
