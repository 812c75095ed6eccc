//! OpenAI-compatible chat completions backend.

use crate::prompts;
use council_core::ProviderConfig;
use council_proto::{
    BehavioralJudgment, BehavioralRequest, ClassificationJudgment, ClassificationRequest,
    JudgmentProvider, ModelTuning, PhrasingJudgment, PhrasingRequest, PlanJudgment, PlanRequest,
    ProviderError, QuickDirective, QuickRequest, ReportJudgment, ReportRequest, StrategicJudgment,
    StrategicRequest, TechnicalJudgment, TechnicalRequest,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, trace, warn};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Judgment provider over any OpenAI-compatible chat completions API.
///
/// Every call requests JSON output; models that wrap the payload in a
/// markdown code fence anyway get the fence stripped before parsing.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    fast_model: String,
    timeout_secs: u64,
}

impl OpenAiProvider {
    /// Builds a provider from config, reading the key from `OPENAI_API_KEY`.
    pub fn from_env(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::MissingCredentials("OPENAI_API_KEY is not set".to_string())
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            api_key,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: config.model.clone(),
            fast_model: config.fast_model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// The model for a deliberative call: per-call override or the default.
    fn pick_model<'a>(&'a self, tuning: &'a ModelTuning) -> &'a str {
        tuning.model.as_deref().unwrap_or(&self.model)
    }

    /// The model for a latency-sensitive call (classification, fast-path
    /// decisions).
    fn pick_fast_model<'a>(&'a self, tuning: &'a ModelTuning) -> &'a str {
        tuning.model.as_deref().unwrap_or(&self.fast_model)
    }

    async fn complete<T: DeserializeOwned>(
        &self,
        model: &str,
        tuning: &ModelTuning,
        system: &str,
        user: &str,
    ) -> Result<T, ProviderError> {
        let body = json!({
            "model": model,
            "temperature": tuning.temperature.unwrap_or(0.2),
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });
        trace!(model, "Dispatching completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "Completion request rejected");
            return Err(ProviderError::Transport(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::Schema("response carries no message content".to_string())
            })?;

        let cleaned = strip_code_fence(content);
        debug!(model, bytes = cleaned.len(), "Completion received");
        serde_json::from_str(cleaned)
            .map_err(|err| ProviderError::Schema(format!("{err}: {cleaned}")))
    }
}

/// Strips a ```json ... ``` (or bare ```) fence around a payload.
fn strip_code_fence(content: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap_or_else(|_| unreachable!())
    });
    match fence.captures(content) {
        Some(caps) => caps.get(1).map_or(content, |m| m.as_str()),
        None => content.trim(),
    }
}

#[async_trait::async_trait]
impl JudgmentProvider for OpenAiProvider {
    async fn classify(
        &self,
        req: ClassificationRequest,
    ) -> Result<ClassificationJudgment, ProviderError> {
        let (system, user) = prompts::classification(&req);
        self.complete(self.pick_fast_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn assess_technical(
        &self,
        req: TechnicalRequest,
    ) -> Result<TechnicalJudgment, ProviderError> {
        let (system, user) = prompts::technical(&req);
        self.complete(self.pick_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn assess_behavioral(
        &self,
        req: BehavioralRequest,
    ) -> Result<BehavioralJudgment, ProviderError> {
        let (system, user) = prompts::behavioral(&req);
        self.complete(self.pick_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn generate_plan(&self, req: PlanRequest) -> Result<PlanJudgment, ProviderError> {
        let (system, user) = prompts::plan(&req);
        self.complete(self.pick_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn decide(&self, req: StrategicRequest) -> Result<StrategicJudgment, ProviderError> {
        let (system, user) = prompts::strategic(&req);
        self.complete(self.pick_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn decide_quick(&self, req: QuickRequest) -> Result<QuickDirective, ProviderError> {
        let (system, user) = prompts::quick(&req);
        self.complete(self.pick_fast_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn phrase(&self, req: PhrasingRequest) -> Result<PhrasingJudgment, ProviderError> {
        let (system, user) = prompts::phrasing(&req);
        self.complete(self.pick_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }

    async fn report(&self, req: ReportRequest) -> Result<ReportJudgment, ProviderError> {
        let (system, user) = prompts::report(&req);
        self.complete(self.pick_model(&req.tuning), &req.tuning, &system, &user)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        let fenced = "```json\n{\"intent\": \"answer\"}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"intent\": \"answer\"}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_payload_passes_through() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
