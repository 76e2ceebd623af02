use chrono::NaiveDate;
use model::{recommendation::Recommendation, scope::Scope};
use serde_json::Value;

pub const SYSTEM_PROMPT: &str = "You are a sustainability expert. You must output only valid JSON.";

const NO_DATA: &str = "No specific emission data available.";

/// Facts about the scope the model is told about.
pub fn emission_context(
    scope: Scope,
    total: Option<f64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> String {
    let mut lines = Vec::new();
    if let Some(total) = total {
        lines.push(format!("{} emissions: {:.2} kg CO2e", title(scope), total));
    }
    if let (Some(from), Some(to)) = (from, to) {
        lines.push(format!("Time period: {} to {}", from, to));
    }
    if lines.is_empty() {
        NO_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

fn title(scope: Scope) -> &'static str {
    match scope {
        Scope::Organization(_) => "Organization",
        Scope::Branch(_) => "Branch",
        Scope::Department(_) => "Department",
    }
}

pub fn make_prompt(scope: Scope, context: &str) -> String {
    format!("You are a sustainability expert providing specific, actionable recommendations to reduce carbon emissions. \
Here's the current emission data for this {}:\n\n{}\n\n\
Please provide 4-6 specific, actionable recommendations. \
Return the response ONLY as a valid JSON array of objects. \
Each object must have these exact keys: 'action' (string, title of action), 'description' (string, 1-2 sentence detail), \
'impact' (string, e.g. 'High', 'Medium'), 'difficulty' (string, 'Low', 'Medium', 'High'), 'cost_estimate' (string, e.g. '$500-1000'). \
Do not wrap the JSON in markdown code blocks. Just return the raw JSON string.",
        scope.label(),
        context
    )
}

/// Reads the model's answer: a JSON array of recommendations, or a single
/// object, optionally wrapped in a markdown code fence.
pub fn parse_recommendations(content: &str) -> Option<Vec<Recommendation>> {
    let content = strip_fence(content.trim());
    match serde_json::from_str::<Value>(content).ok()? {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Recommendation>, _>>()
            .ok(),
        item @ Value::Object(_) => serde_json::from_value(item).ok().map(|rec| vec![rec]),
        _ => None,
    }
}

fn strip_fence(content: &str) -> &str {
    let content = content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .unwrap_or(content);
    content.strip_suffix("```").unwrap_or(content).trim()
}

#[cfg(test)]
mod tests {
    use bson::oid::ObjectId;

    use super::*;

    #[test]
    fn test_emission_context() {
        let scope = Scope::Department(ObjectId::new());
        assert_eq!(
            emission_context(scope, Some(872.456), None, None),
            "Department emissions: 872.46 kg CO2e"
        );

        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let to = NaiveDate::from_ymd_opt(2024, 3, 31);
        assert_eq!(
            emission_context(Scope::Organization(ObjectId::new()), Some(10.0), from, to),
            "Organization emissions: 10.00 kg CO2e\nTime period: 2024-01-01 to 2024-03-31"
        );
        assert_eq!(emission_context(scope, None, from, None), NO_DATA);
    }

    #[test]
    fn test_make_prompt() {
        let prompt = make_prompt(Scope::Branch(ObjectId::new()), "Branch emissions: 1.00 kg CO2e");
        assert!(prompt.contains("emission data for this branch:\n\nBranch emissions: 1.00 kg CO2e\n\n"));
        assert!(prompt.contains("'cost_estimate'"));
    }

    #[test]
    fn test_parse_array() {
        let content = r#"[
            {"action": "Switch to LED lighting", "description": "Replace bulbs.", "impact": "High", "difficulty": "Low", "cost_estimate": "$500-1000"},
            {"action": "Carpool", "description": "Share rides.", "impact": "Medium", "difficulty": "Medium"}
        ]"#;
        let recs = parse_recommendations(content).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].action, "Switch to LED lighting");
        assert_eq!(recs[0].cost_estimate.as_deref(), Some("$500-1000"));
        assert_eq!(recs[1].cost_estimate, None);
    }

    #[test]
    fn test_parse_fenced_object() {
        let content = "```json\n{\"action\": \"Insulate roof\", \"description\": \"Cut heating.\", \"impact\": \"High\", \"difficulty\": \"High\"}\n```";
        let recs = parse_recommendations(content).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].action, "Insulate roof");

        let content = "```\n[{\"action\": \"Audit\"}]\n```";
        assert_eq!(parse_recommendations(content).unwrap()[0].action, "Audit");
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_recommendations("Sure! Here are some ideas: ..."), None);
        assert_eq!(parse_recommendations("42"), None);
        assert_eq!(parse_recommendations("[{\"title\": \"no action\"}]"), None);
    }
}
