use eyre::{bail, eyre, Error};
use log::info;
use model::{ErrorPayload, RequestPayload, ResponsePayload, Sampling};
use reqwest::Client;

mod model;
pub use model::Context as AiContext;
pub use model::Response;

/// Client for an OpenAI-compatible chat-completion endpoint.
pub struct Ai {
    base_url: String,
    api_key: String,
    model: String,
    sampling: Sampling,
    client: Client,
}

impl Ai {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            sampling: Sampling::default(),
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Ai {
    pub async fn ask(&self, message: String, context: Option<AiContext>) -> Result<Response, Error> {
        let mut context = context.unwrap_or_default();
        context.add_user_message(message);

        let payload = RequestPayload {
            model: &self.model,
            messages: context.history,
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
            top_p: self.sampling.top_p,
            stream: false,
        };

        info!("Sending request to AI: {:?}", payload);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;
        info!("Received response from AI: {:?}", response.status());

        let status = response.status();
        if status.is_success() {
            let resp_json: ResponsePayload = response.json().await?;
            let used_tokens = resp_json.usage.map(|u| u.total_tokens).unwrap_or_default();
            let content = resp_json
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| eyre!("Empty completion"))?;
            Ok(Response {
                response: content,
                used_tokens,
            })
        } else {
            let message = response
                .json::<ErrorPayload>()
                .await
                .map(|err| err.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            bail!("HTTP error: {}: {}", status, message)
        }
    }
}
