use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recommendation {
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Recommendation {
    /// Returned when the model answered with something that is not a recommendation list.
    pub fn unparsed_fallback() -> Self {
        Recommendation {
            action: "Review Energy Usage".to_string(),
            description: "We couldn't generate specific recommendations at this time, but reviewing your energy bills is always a good start.".to_string(),
            impact: "Medium".to_string(),
            difficulty: "Low".to_string(),
            cost_estimate: None,
            category: None,
        }
    }

    /// Returned when the completion API could not be reached or refused the request.
    pub fn unavailable_fallback() -> Self {
        Recommendation {
            action: "Check System Connection".to_string(),
            description: "Unable to generate recommendations due to a system error.".to_string(),
            impact: "Low".to_string(),
            difficulty: "Low".to_string(),
            cost_estimate: None,
            category: None,
        }
    }
}
