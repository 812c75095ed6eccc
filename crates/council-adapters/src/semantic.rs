//! Embedding-similarity intent classification.
//!
//! An alternate classifier backend: instead of asking a model to label the
//! message, it embeds the message and picks the intent of the nearest anchor
//! utterance. Cheaper and faster than a completion call; every other
//! judgment delegates to the wrapped provider.

use council_core::ProviderConfig;
use council_proto::{
    BehavioralJudgment, BehavioralRequest, ClassificationJudgment, ClassificationRequest, Intent,
    JudgmentProvider, PhrasingJudgment, PhrasingRequest, PlanJudgment, PlanRequest, ProviderError,
    QuickDirective, QuickRequest, ReportJudgment, ReportRequest, StrategicJudgment,
    StrategicRequest, TechnicalJudgment, TechnicalRequest,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Below this similarity the nearest anchor is not trusted and the inner
/// provider classifies instead.
const SIMILARITY_FLOOR: f32 = 0.35;

/// Anchor utterances per intent. Nearest neighbor wins.
const ANCHORS: &[(Intent, &str)] = &[
    (Intent::Answer, "An index is a data structure that speeds up lookups at the cost of slower writes."),
    (Intent::Answer, "I would use a message queue here to decouple the producers from the consumers."),
    (Intent::Answer, "I don't know the answer to that, I haven't worked with it."),
    (Intent::Answer, "It depends, but usually I would start by profiling the slow query."),
    (Intent::Question, "Can you repeat the question?"),
    (Intent::Question, "Do you mean in the context of a relational database?"),
    (Intent::Question, "How much time do I have for this one?"),
    (Intent::Question, "Could you clarify what you mean by consistency here?"),
    (Intent::OffTopic, "By the way, did you watch the game last night?"),
    (Intent::OffTopic, "Nice weather today, isn't it?"),
    (Intent::OffTopic, "What's your favorite restaurant around the office?"),
    (Intent::Stop, "I'd like to stop the interview here."),
    (Intent::Stop, "Let's end it, I'm done for today."),
    (Intent::Stop, "Can we finish now and get my feedback?"),
];

struct Anchor {
    intent: Intent,
    embedding: Vec<f32>,
}

/// Wraps an inner provider, replacing only [`JudgmentProvider::classify`].
///
/// Anchor embeddings are fetched once, lazily, on the first classification.
/// Any embedding failure falls back to the inner classifier, so enabling
/// the router never makes classification less available.
pub struct SemanticRouter<P> {
    inner: P,
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    embedding_model: String,
    anchors: OnceCell<Vec<Anchor>>,
}

impl<P> SemanticRouter<P> {
    /// Builds the router around `inner`, reading the key from
    /// `OPENAI_API_KEY`.
    pub fn from_env(inner: P, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::MissingCredentials("OPENAI_API_KEY is not set".to_string())
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        Ok(Self {
            inner,
            client,
            api_key,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            embedding_model: config.embedding_model.clone(),
            anchors: OnceCell::new(),
        })
    }

    async fn embed(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let body = json!({
            "model": self.embedding_model,
            "input": inputs,
        });
        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "HTTP {}",
                response.status()
            )));
        }
        let payload: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let data = payload["data"]
            .as_array()
            .ok_or_else(|| ProviderError::Schema("embedding response has no data".to_string()))?;
        let mut embeddings = Vec::with_capacity(data.len());
        for item in data {
            let vector = item["embedding"]
                .as_array()
                .ok_or_else(|| ProviderError::Schema("missing embedding vector".to_string()))?
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                .collect();
            embeddings.push(vector);
        }
        Ok(embeddings)
    }

    async fn anchor_set(&self) -> Result<&Vec<Anchor>, ProviderError> {
        self.anchors
            .get_or_try_init(|| async {
                let texts: Vec<&str> = ANCHORS.iter().map(|(_, text)| *text).collect();
                let embeddings = self.embed(&texts).await?;
                if embeddings.len() != ANCHORS.len() {
                    return Err(ProviderError::Schema(
                        "embedding count does not match anchor count".to_string(),
                    ));
                }
                debug!(anchors = embeddings.len(), "Anchor embeddings primed");
                Ok(ANCHORS
                    .iter()
                    .zip(embeddings)
                    .map(|((intent, _), embedding)| Anchor {
                        intent: *intent,
                        embedding,
                    })
                    .collect())
            })
            .await
    }

    async fn classify_by_similarity(
        &self,
        message: &str,
    ) -> Result<Option<ClassificationJudgment>, ProviderError> {
        let anchors = self.anchor_set().await?;
        let query = self
            .embed(&[message])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Schema("empty embedding response".to_string()))?;

        let best = anchors
            .iter()
            .map(|anchor| (anchor.intent, cosine_similarity(&query, &anchor.embedding)))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        match best {
            Some((intent, similarity)) if similarity >= SIMILARITY_FLOOR => {
                debug!(%intent, similarity, "Semantic classification");
                Ok(Some(ClassificationJudgment {
                    intent,
                    rationale: format!(
                        "nearest anchor intent '{intent}' at similarity {similarity:.2}"
                    ),
                }))
            }
            _ => Ok(None),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait::async_trait]
impl<P: JudgmentProvider> JudgmentProvider for SemanticRouter<P> {
    async fn classify(
        &self,
        req: ClassificationRequest,
    ) -> Result<ClassificationJudgment, ProviderError> {
        match self.classify_by_similarity(&req.message).await {
            Ok(Some(judgment)) => Ok(judgment),
            Ok(None) => {
                debug!("No anchor close enough, delegating classification");
                self.inner.classify(req).await
            }
            Err(err) => {
                warn!(error = %err.brief(), "Semantic classification failed, delegating");
                self.inner.classify(req).await
            }
        }
    }

    async fn assess_technical(
        &self,
        req: TechnicalRequest,
    ) -> Result<TechnicalJudgment, ProviderError> {
        self.inner.assess_technical(req).await
    }

    async fn assess_behavioral(
        &self,
        req: BehavioralRequest,
    ) -> Result<BehavioralJudgment, ProviderError> {
        self.inner.assess_behavioral(req).await
    }

    async fn generate_plan(&self, req: PlanRequest) -> Result<PlanJudgment, ProviderError> {
        self.inner.generate_plan(req).await
    }

    async fn decide(&self, req: StrategicRequest) -> Result<StrategicJudgment, ProviderError> {
        self.inner.decide(req).await
    }

    async fn decide_quick(&self, req: QuickRequest) -> Result<QuickDirective, ProviderError> {
        self.inner.decide_quick(req).await
    }

    async fn phrase(&self, req: PhrasingRequest) -> Result<PhrasingJudgment, ProviderError> {
        self.inner.phrase(req).await
    }

    async fn report(&self, req: ReportRequest) -> Result<ReportJudgment, ProviderError> {
        self.inner.report(req).await
    }
}
