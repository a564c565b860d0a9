use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;

const DEFAULT_OPENING: &str = "Let's begin the interview.";

#[derive(Debug, Serialize)]
struct AssistantRef<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct CallMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WebCallRequest<'a> {
    assistant: AssistantRef<'a>,
    messages: Vec<CallMessage<'a>>,
}

/// Upstream status code and body, relayed as-is to the browser.
#[derive(Debug)]
pub struct VapiReply {
    pub status: u16,
    pub body: Value,
}

/// Thin client for the Vapi voice-assistant web-call API.
#[derive(Clone)]
pub struct VapiClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl VapiClient {
    pub fn new(api_base: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            token,
        }
    }

    pub async fn start_web_call(
        &self,
        assistant_id: &str,
        question: Option<&str>,
    ) -> Result<VapiReply> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("VAPI_WEB_TOKEN is not configured"))?;

        let payload = web_call_payload(assistant_id, question);
        let url = format!("{}/call/web", self.api_base.trim_end_matches('/'));
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body: Value = resp.json().await?;
        if !(200..300).contains(&status) {
            tracing::error!(status, body = %body, "Vapi rejected web call");
        }
        Ok(VapiReply { status, body })
    }
}

fn web_call_payload<'a>(assistant_id: &'a str, question: Option<&'a str>) -> WebCallRequest<'a> {
    let content = question.filter(|q| !q.trim().is_empty()).unwrap_or(DEFAULT_OPENING);
    WebCallRequest {
        assistant: AssistantRef { id: assistant_id },
        messages: vec![CallMessage {
            role: "user",
            content,
        }],
    }
}
