use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    System,
    User,
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct Message {
    pub role: Role,
    pub content: String,
}

/// Sampling settings sent with every completion request.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling {
            temperature: 0.5,
            max_tokens: 1500,
            top_p: 1.0,
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct RequestPayload<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: Vec<Message>,
    pub(crate) temperature: f32,
    pub(crate) max_tokens: u32,
    pub(crate) top_p: f32,
    pub(crate) stream: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ResponsePayload {
    #[serde(default)]
    pub(crate) choices: Vec<Choice>,
    pub(crate) usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Choice {
    pub(crate) message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ChoiceMessage {
    pub(crate) content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Usage {
    pub(crate) total_tokens: u32,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorPayload {
    pub(crate) error: ErrorBody,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}

#[derive(Default)]
pub struct Context {
    pub(crate) history: Vec<Message>,
}

impl Context {
    pub fn add_system_message(&mut self, message: String) {
        self.history.push(Message {
            role: Role::System,
            content: message,
        });
    }

    pub fn add_user_message(&mut self, message: String) {
        self.history.push(Message {
            role: Role::User,
            content: message,
        });
    }
}

pub struct Response {
    pub response: String,
    pub used_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let mut ctx = Context::default();
        ctx.add_system_message("be brief".to_string());
        ctx.add_user_message("hello".to_string());
        let payload = RequestPayload {
            model: "llama-3.1-8b-instant",
            messages: ctx.history,
            temperature: 0.5,
            max_tokens: 1500,
            top_p: 1.0,
            stream: false,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_response_payload() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "[]"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let payload: ResponsePayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.choices[0].message.content.as_deref(), Some("[]"));
        assert_eq!(payload.usage.unwrap().total_tokens, 12);
    }
}
