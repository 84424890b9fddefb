use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use serde::Deserialize;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default)]
    pub resend_api_key: String,

    #[serde(default)]
    pub booking_to_email: String,

    #[serde(default)]
    pub booking_from_email: String,

    /// Whether X-Forwarded-For / X-Real-IP may be used for the client IP.
    /// Only meaningful behind a proxy that strips client-sent copies.
    #[serde(default = "default_trust_proxy")]
    pub trust_proxy_headers: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Booking-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_trust_proxy() -> bool {
    true
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Flat env vars beat the nested keys the separator produces.
        config.resend_api_key = fill_from_env(config.resend_api_key, "APP_RESEND_API_KEY");
        config.booking_to_email = fill_from_env(config.booking_to_email, "APP_BOOKING_TO_EMAIL");
        config.booking_from_email =
            fill_from_env(config.booking_from_email, "APP_BOOKING_FROM_EMAIL");

        if config.redis_url.is_none() {
            config.redis_url = env::var("APP_REDIS_URL").ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Startup-time validation: production refuses to run half-configured
    /// instead of discovering missing secrets on the first real request.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.is_production() {
            if self.resend_api_key.trim().is_empty() {
                errors.push("RESEND_API_KEY must be set in production");
            }
            if self.booking_to_email.trim().is_empty() {
                errors.push("BOOKING_TO_EMAIL must be set in production");
            }
            if self.booking_from_email.trim().is_empty() {
                errors.push("BOOKING_FROM_EMAIL must be set in production");
            }
            if self.redis_url.is_none() {
                errors.push("REDIS_URL must be set in production (shared rate limiting)");
            }
            if self.cors_origins().iter().any(|o| o == "*") {
                errors.push("Wildcard CORS (*) is not allowed in production");
            }
        }

        let to = self.booking_to_email.trim();
        if !to.is_empty() && !to.contains('@') {
            errors.push("BOOKING_TO_EMAIL does not look like an email address");
        }
        let from = self.booking_from_email.trim();
        if !from.is_empty() && !from.contains('@') {
            errors.push("BOOKING_FROM_EMAIL does not look like an email address");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// The email settings as a unit, or `None` while any piece is missing.
    pub fn email_settings(&self) -> Option<EmailSettings> {
        let api_key = self.resend_api_key.trim();
        let to = self.booking_to_email.trim();
        let from = self.booking_from_email.trim();

        if api_key.is_empty() || to.is_empty() || from.is_empty() {
            return None;
        }

        Some(EmailSettings {
            api_key: api_key.to_string(),
            to: to.to_string(),
            from: from.to_string(),
        })
    }
}

fn fill_from_env(current: String, env_key: &str) -> String {
    if current.trim().is_empty() {
        env::var(env_key).unwrap_or_default()
    } else {
        current
    }
}

#[derive(Clone)]
pub struct EmailSettings {
    pub api_key: String,
    pub to: String,
    pub from: String,
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("redis_url", &self.redis_url.as_deref().map(Redact::redact))
            .field("resend_api_key", &self.resend_api_key.redact())
            .field("booking_to_email", &self.booking_to_email)
            .field("booking_from_email", &self.booking_from_email)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .finish()
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("api_key", &"[REDACTED]")
            .field("to", &self.to)
            .field("from", &self.from)
            .finish()
    }
}
