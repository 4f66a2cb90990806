//! Env-driven configuration for the service, the CLI and the library.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Defaults are provided for convenience during development.
use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub image_model: String,
    pub image_size: String,
    pub style_suffix: String,
    pub request_timeout_secs: u64,
    pub session_idle_secs: u64,
    pub preload_placeholders: bool,
    pub api_host: String,
    pub api_port: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openai_api_key: None,
            openai_api_url: "https://api.openai.com/v1".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            style_suffix: "coloring book style".to_string(),
            request_timeout_secs: 120,
            session_idle_secs: 3600,
            preload_placeholders: false,
            api_host: "127.0.0.1".to_string(),
            api_port: "8190".to_string(),
        }
    }
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> AppResult<Self> {
        let defaults = Config::default();
        let request_timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => parse_secs("REQUEST_TIMEOUT_SECS", &v)?,
            Err(_) => defaults.request_timeout_secs,
        };
        let session_idle_secs = match env::var("SESSION_IDLE_SECS") {
            Ok(v) => parse_secs("SESSION_IDLE_SECS", &v)?,
            Err(_) => defaults.session_idle_secs,
        };
        Ok(Config {
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            openai_api_url: env::var("OPENAI_API_URL").unwrap_or(defaults.openai_api_url),
            image_model: env::var("IMAGE_MODEL").unwrap_or(defaults.image_model),
            image_size: env::var("IMAGE_SIZE").unwrap_or(defaults.image_size),
            style_suffix: env::var("STYLE_SUFFIX").unwrap_or(defaults.style_suffix),
            request_timeout_secs,
            session_idle_secs,
            preload_placeholders: env::var("PRELOAD_PLACEHOLDERS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.preload_placeholders),
            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: env::var("API_PORT").unwrap_or(defaults.api_port),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// How often idle sessions are swept: a quarter of the TTL, 1 to 60 seconds.
    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs((self.session_idle_secs / 4).clamp(1, 60))
    }

    /// Effective settings as `(NAME, value)` pairs, with the key masked.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        let key = match &self.openai_api_key {
            Some(k) => mask_secret(k),
            None => "<unset>".to_string(),
        };
        vec![
            ("OPENAI_API_KEY", key),
            ("OPENAI_API_URL", self.openai_api_url.clone()),
            ("IMAGE_MODEL", self.image_model.clone()),
            ("IMAGE_SIZE", self.image_size.clone()),
            ("STYLE_SUFFIX", self.style_suffix.clone()),
            ("REQUEST_TIMEOUT_SECS", self.request_timeout_secs.to_string()),
            ("SESSION_IDLE_SECS", self.session_idle_secs.to_string()),
            ("PRELOAD_PLACEHOLDERS", self.preload_placeholders.to_string()),
            ("API_HOST", self.api_host.clone()),
            ("API_PORT", self.api_port.clone()),
        ]
    }

    pub fn print_env_vars(&self) {
        for (name, value) in self.env_vars() {
            tracing::info!("{}: {}", name, value);
        }
    }
}

/// A positive whole number of seconds.
pub fn parse_secs(name: &str, value: &str) -> AppResult<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Config(format!("{} must be greater than zero", name))),
        Ok(secs) => Ok(secs),
        Err(_) => Err(AppError::Config(format!(
            "{} must be a whole number of seconds, got '{}'",
            name, value
        ))),
    }
}

pub fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Keep the last four characters of a secret, hide the rest.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_configuration() {
        let c = Config::default();
        assert_eq!(c.image_model, "dall-e-3");
        assert_eq!(c.image_size, "1024x1024");
        assert_eq!(c.style_suffix, "coloring book style");
        assert!(!c.preload_placeholders);
        assert_eq!(c.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret("sk-abcdef1234"), "****1234");
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn durations_must_be_positive_whole_seconds() {
        assert_eq!(parse_secs("REQUEST_TIMEOUT_SECS", " 30 ").unwrap(), 30);
        let zero = parse_secs("REQUEST_TIMEOUT_SECS", "0").unwrap_err();
        assert_eq!(zero.kind(), "config");
        assert!(zero.to_string().contains("greater than zero"));
        assert!(parse_secs("SESSION_IDLE_SECS", "soon").is_err());
        assert!(parse_secs("SESSION_IDLE_SECS", "-5").is_err());
    }

    #[test]
    fn env_listing_covers_every_setting() {
        let c = Config { openai_api_key: Some("sk-secret9876".to_string()), ..Config::default() };
        let vars = c.env_vars();
        let names: Vec<&str> = vars.iter().map(|(n, _)| *n).collect();
        for expected in ["OPENAI_API_KEY", "SESSION_IDLE_SECS", "API_HOST", "API_PORT"] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert_eq!(vars[0].1, "****9876");
    }

    #[test]
    fn sweep_interval_is_bounded() {
        assert_eq!(Config::default().session_sweep_interval(), Duration::from_secs(60));
        let short = Config { session_idle_secs: 2, ..Config::default() };
        assert_eq!(short.session_sweep_interval(), Duration::from_secs(1));
        assert_eq!(short.session_idle_ttl(), Duration::from_secs(2));
    }
}
