use std::{env::var, sync::Arc};

use dotenv::dotenv;
use eyre::{eyre, Error};
use log::info;

const DEFAULT_MONGO_DB: &str = "carbon_ledger";
const DEFAULT_AI_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_AI_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_HOST: &str = "0.0.0.0:8000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_CORS_ORIGIN_PATTERN: &str = "https://*.vercel.app";
const DEFAULT_RUST_LOG: &str = "info";

#[derive(Clone)]
pub struct Env(Arc<EnvInner>);

#[derive(Clone)]
pub struct EnvInner {
    mongo_url: String,
    mongo_db: String,
    groq_api_key: String,
    ai_base_url: String,
    ai_model: String,
    host: String,
    cors_origins: Vec<String>,
    cors_origin_pattern: Option<String>,
    rust_log: String,
}

impl Env {
    pub fn mongo_url(&self) -> &str {
        &self.0.mongo_url
    }

    pub fn mongo_db(&self) -> &str {
        &self.0.mongo_db
    }

    pub fn groq_api_key(&self) -> &str {
        &self.0.groq_api_key
    }

    pub fn ai_base_url(&self) -> &str {
        &self.0.ai_base_url
    }

    pub fn ai_model(&self) -> &str {
        &self.0.ai_model
    }

    pub fn host(&self) -> &str {
        &self.0.host
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.cors_origins
    }

    /// Wildcard origin for preview deployments, e.g. `https://*.vercel.app`.
    pub fn cors_origin_pattern(&self) -> Option<&str> {
        self.0.cors_origin_pattern.as_deref()
    }

    pub fn rust_log(&self) -> &str {
        &self.0.rust_log
    }

    pub fn load() -> Result<Env, Error> {
        if let Err(err) = dotenv() {
            info!("Failed to load .env file: {}", err);
        }
        Env::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Env, Error> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| eyre!("{} is not set", key))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins = optional("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| origin.trim_end_matches('/').to_string())
            .collect();
        let cors_origin_pattern = Some(optional("CORS_ORIGIN_PATTERN", DEFAULT_CORS_ORIGIN_PATTERN))
            .map(|pattern| pattern.trim().to_string())
            .filter(|pattern| !pattern.is_empty());

        Ok(Env(Arc::new(EnvInner {
            mongo_url: required("MONGO_URL")?,
            mongo_db: optional("MONGO_DB", DEFAULT_MONGO_DB),
            groq_api_key: required("GROQ_API_KEY")?,
            ai_base_url: optional("AI_BASE_URL", DEFAULT_AI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            ai_model: optional("AI_MODEL", DEFAULT_AI_MODEL),
            host: optional("HOST", DEFAULT_HOST),
            cors_origins,
            cors_origin_pattern,
            rust_log: optional("RUST_LOG", DEFAULT_RUST_LOG),
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Result<Env, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Env::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let env = env(&[("MONGO_URL", "mongodb://localhost"), ("GROQ_API_KEY", "key")]).unwrap();
        assert_eq!(env.mongo_db(), "carbon_ledger");
        assert_eq!(env.ai_base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(env.ai_model(), "llama-3.1-8b-instant");
        assert_eq!(env.host(), "0.0.0.0:8000");
        assert_eq!(
            env.cors_origins(),
            &["http://localhost:5173".to_string(), "http://localhost:3000".to_string()]
        );
        assert_eq!(env.cors_origin_pattern(), Some("https://*.vercel.app"));
    }

    #[test]
    fn test_required() {
        let err = env(&[("GROQ_API_KEY", "key")]).err().unwrap();
        assert_eq!(err.to_string(), "MONGO_URL is not set");

        let err = env(&[("MONGO_URL", "mongodb://localhost"), ("GROQ_API_KEY", "")])
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "GROQ_API_KEY is not set");
    }

    #[test]
    fn test_overrides() {
        let env = env(&[
            ("MONGO_URL", "mongodb://db"),
            ("GROQ_API_KEY", "key"),
            ("AI_BASE_URL", "http://llm.local/v1/"),
            ("CORS_ORIGINS", " https://carbon.app/ , ,https://admin.carbon.app"),
            ("CORS_ORIGIN_PATTERN", ""),
        ])
        .unwrap();
        assert_eq!(env.ai_base_url(), "http://llm.local/v1");
        assert_eq!(
            env.cors_origins(),
            &["https://carbon.app".to_string(), "https://admin.carbon.app".to_string()]
        );
        assert_eq!(env.cors_origin_pattern(), None);
    }
}
