use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CRM connection configuration
#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub base_url: String,
    pub api_token: String,
    pub deal_object: String,
    pub comparable_object: String,
    pub contact_object: String,
    pub engagement_object: String,
    pub offer_object: String,
}

/// Multimodal model used for wire confirmation screenshots
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub max_age_secs: i64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub crm: CrmConfig,
    pub ai: AiConfig,
    pub session: SessionConfig,
    pub geocoding_api_key: Option<String>,
    pub log_level: String,
    pub log_format: String,
    pub http_port: u16,
    pub environment: String,
    pub max_upload_bytes: usize,
    pub http_timeout_secs: u64,
    pub audit_log_dir: PathBuf,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl CrmConfig {
    /// Create CRM config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let api_token = non_empty_var("CRM_API_TOKEN")
            .ok_or("CRM_API_TOKEN environment variable is required")?;

        let defaults = Self::default();
        Ok(Self {
            base_url: non_empty_var("CRM_BASE_URL")
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            api_token,
            deal_object: non_empty_var("CRM_DEAL_OBJECT").unwrap_or(defaults.deal_object),
            comparable_object: non_empty_var("CRM_COMPARABLE_OBJECT")
                .unwrap_or(defaults.comparable_object),
            contact_object: non_empty_var("CRM_CONTACT_OBJECT").unwrap_or(defaults.contact_object),
            engagement_object: non_empty_var("CRM_ENGAGEMENT_OBJECT")
                .unwrap_or(defaults.engagement_object),
            offer_object: non_empty_var("CRM_OFFER_OBJECT").unwrap_or(defaults.offer_object),
        })
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hubapi.com".to_string(),
            api_token: String::new(),
            deal_object: "deals".to_string(),
            comparable_object: "comparables".to_string(),
            contact_object: "contacts".to_string(),
            engagement_object: "engagements".to_string(),
            offer_object: "offers".to_string(),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: non_empty_var("AI_API_URL").unwrap_or(defaults.api_url),
            api_key: non_empty_var("AI_API_KEY"),
            model: non_empty_var("AI_MODEL").unwrap_or(defaults.model),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl SessionConfig {
    /// Create session config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let secret = non_empty_var("SESSION_SECRET")
            .ok_or("SESSION_SECRET environment variable is required")?;

        let max_age_secs = env::var("SESSION_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(7 * 24 * 3600);

        if max_age_secs <= 0 {
            return Err("SESSION_MAX_AGE_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            secret,
            cookie_name: non_empty_var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| "dealroom_session".to_string()),
            max_age_secs,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-change-me-please-0000".to_string(),
            cookie_name: "dealroom_session".to_string(),
            max_age_secs: 7 * 24 * 3600,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let crm = CrmConfig::from_env()?;
        let ai = AiConfig::from_env();
        let session = SessionConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(10 * 1024 * 1024);

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let audit_log_dir =
            PathBuf::from(env::var("AUDIT_LOG_DIR").unwrap_or_else(|_| "./logs".to_string()));

        let config = Self {
            crm,
            ai,
            session,
            geocoding_api_key: non_empty_var("GEOCODING_API_KEY"),
            log_level: log_level.to_lowercase(),
            log_format: log_format.to_lowercase(),
            http_port,
            environment: environment.to_lowercase(),
            max_upload_bytes,
            http_timeout_secs,
            audit_log_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate values that cannot be checked while parsing
    pub fn validate(&self) -> Result<(), String> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            return Err(format!(
                "Invalid LOG_FORMAT: {}. Must be one of: {:?}",
                self.log_format, valid_formats
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                self.environment, valid_environments
            ));
        }

        if self.is_production() && self.session.secret.len() < 32 {
            return Err("SESSION_SECRET must be at least 32 characters in production".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }

        if self.http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Get outbound HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crm: CrmConfig::default(),
            ai: AiConfig::default(),
            session: SessionConfig::default(),
            geocoding_api_key: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            http_port: 3000,
            environment: "development".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            http_timeout_secs: 30,
            audit_log_dir: PathBuf::from("./logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.http_port, 3000);
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_crm_config_default_objects() {
        let config = CrmConfig::default();
        assert_eq!(config.deal_object, "deals");
        assert_eq!(config.comparable_object, "comparables");
    }

    #[test]
    fn test_production_requires_long_secret() {
        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        config.session.secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
