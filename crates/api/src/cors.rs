use axum::http::{request::Parts, HeaderValue};
use env::Env;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Origin pattern with at most one `*`, e.g. `https://*.vercel.app`.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginPattern {
    prefix: String,
    suffix: Option<String>,
}

impl OriginPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.split_once('*') {
            Some((prefix, suffix)) => OriginPattern {
                prefix: prefix.to_string(),
                suffix: Some(suffix.to_string()),
            },
            None => OriginPattern {
                prefix: pattern.to_string(),
                suffix: None,
            },
        }
    }

    /// The wildcard stands for a non-empty host part without `/`.
    pub fn matches(&self, origin: &str) -> bool {
        let Some(suffix) = &self.suffix else {
            return origin == self.prefix;
        };
        origin
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
            .is_some_and(|middle| !middle.is_empty() && !middle.contains('/'))
    }
}

pub fn is_allowed(origins: &[String], pattern: Option<&OriginPattern>, origin: &str) -> bool {
    origins.iter().any(|allowed| allowed == origin)
        || pattern.is_some_and(|pattern| pattern.matches(origin))
}

pub fn layer(env: &Env) -> CorsLayer {
    let origins = env.cors_origins().to_vec();
    let pattern = env.cors_origin_pattern().map(OriginPattern::parse);
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|origin| is_allowed(&origins, pattern.as_ref(), origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_pattern() {
        let pattern = OriginPattern::parse("https://*.vercel.app");
        assert!(pattern.matches("https://carbon-ledger.vercel.app"));
        assert!(pattern.matches("https://preview-42.team.vercel.app"));
        assert!(!pattern.matches("https://.vercel.app"));
        assert!(!pattern.matches("http://carbon-ledger.vercel.app"));
        assert!(!pattern.matches("https://evil.com/x.vercel.app"));
        assert!(!pattern.matches("https://carbon-ledger.vercel.app.evil.com"));
    }

    #[test]
    fn test_exact_pattern() {
        let pattern = OriginPattern::parse("https://ledger.example.com");
        assert!(pattern.matches("https://ledger.example.com"));
        assert!(!pattern.matches("https://ledger.example.com.evil"));
    }

    #[test]
    fn test_is_allowed() {
        let origins = vec!["http://localhost:5173".to_string()];
        let pattern = OriginPattern::parse("https://*.vercel.app");
        assert!(is_allowed(&origins, Some(&pattern), "http://localhost:5173"));
        assert!(is_allowed(&origins, Some(&pattern), "https://app.vercel.app"));
        assert!(!is_allowed(&origins, Some(&pattern), "http://localhost:3000"));
        assert!(!is_allowed(&origins, None, "https://app.vercel.app"));
    }
}
