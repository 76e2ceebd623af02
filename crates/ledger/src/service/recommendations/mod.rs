pub mod prompt;

use std::sync::Arc;

use ai::{Ai, AiContext, Response};
use chrono::NaiveDate;
use log::{error, info, warn};
use model::{errors::LedgerError, recommendation::Recommendation, scope::Scope, session::Session};
use serde::Serialize;

use super::analytics::{check_range, Analytics};

#[derive(Debug, Serialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    /// Emission facts sent to the model.
    pub context: String,
}

#[derive(Clone)]
pub struct Recommendations {
    analytics: Analytics,
    ai: Arc<Ai>,
}

impl Recommendations {
    pub fn new(analytics: Analytics, ai: Ai) -> Self {
        Recommendations {
            analytics,
            ai: Arc::new(ai),
        }
    }

    /// The date range only shapes the prompt; the total always covers every log of the scope.
    pub async fn generate(
        &self,
        session: &mut Session,
        scope: Scope,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<RecommendationReport, LedgerError> {
        check_range(from, to)?;
        let total = self.analytics.total_emissions(session, scope).await?;
        let context = prompt::emission_context(scope, total, from, to);

        let mut ctx = AiContext::default();
        ctx.add_system_message(prompt::SYSTEM_PROMPT.to_string());
        let answer = self
            .ai
            .ask(prompt::make_prompt(scope, &context), Some(ctx))
            .await;
        let recommendations = recommendations_from(answer);

        Ok(RecommendationReport {
            recommendations,
            context,
        })
    }
}

/// An unreachable model yields the connection fallback, an unreadable answer the generic one.
pub fn recommendations_from(answer: Result<Response, eyre::Error>) -> Vec<Recommendation> {
    match answer {
        Ok(response) => {
            info!("Recommendations used {} tokens", response.used_tokens);
            prompt::parse_recommendations(&response.response).unwrap_or_else(|| {
                warn!("Failed to parse recommendations: {}", response.response);
                vec![Recommendation::unparsed_fallback()]
            })
        }
        Err(err) => {
            error!("Failed to generate recommendations: {:#}", err);
            vec![Recommendation::unavailable_fallback()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> Result<Response, eyre::Error> {
        Ok(Response {
            response: text.to_string(),
            used_tokens: 42,
        })
    }

    #[test]
    fn test_unreachable_model_falls_back_to_connection_check() {
        let recs = recommendations_from(Err(eyre::eyre!("HTTP error: 503: overloaded")));
        assert_eq!(recs, vec![Recommendation::unavailable_fallback()]);
        assert_eq!(recs[0].action, "Check System Connection");
    }

    #[test]
    fn test_unreadable_answer_falls_back_to_energy_review() {
        let recs = recommendations_from(answer("Here are a few ideas: turn off the lights."));
        assert_eq!(recs, vec![Recommendation::unparsed_fallback()]);
        assert_eq!(recs[0].action, "Review Energy Usage");
    }

    #[test]
    fn test_valid_answer_is_returned() {
        let recs = recommendations_from(answer(
            r#"[{"action": "Switch to LED lighting", "description": "Replace bulbs.", "impact": "High", "difficulty": "Low"},
                {"action": "Carpool", "description": "Share rides.", "impact": "Medium", "difficulty": "Medium"}]"#,
        ));
        let actions = recs.iter().map(|rec| rec.action.as_str()).collect::<Vec<_>>();
        assert_eq!(actions, vec!["Switch to LED lighting", "Carpool"]);
    }
}
