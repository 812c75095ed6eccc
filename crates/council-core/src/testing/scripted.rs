//! A scripted judgment provider.
//!
//! Each method pops from its own queue of scripted results; an empty queue
//! yields a neutral default, so tests only script the judgments they care
//! about. Call counters allow asserting which agents ran.

use council_proto::{
    Accuracy, BehavioralJudgment, BehavioralRequest, ClassificationJudgment,
    ClassificationRequest, Demeanor, Depth, Difficulty, Engagement, Grade, Intent,
    JudgmentProvider, NextAction, PhrasingJudgment, PhrasingRequest, PlanJudgment, PlanRequest,
    PlannedTopic, Protocol, ProviderError, QuickDirective, QuickRequest, Recommendation,
    ReportJudgment, ReportRequest, StrategicJudgment, StrategicRequest, StressLevel,
    TechnicalJudgment, TechnicalRequest,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// A neutral mid-range technical judgment with the given score and accuracy.
pub fn scripted_technical(score: u8, accuracy: Accuracy) -> TechnicalJudgment {
    TechnicalJudgment {
        score,
        accuracy,
        depth: Depth::Adequate,
        issues: vec![],
        correction: None,
        contradiction_detected: false,
        fictional_term_detected: false,
        rationale: "scripted technical judgment".to_string(),
    }
}

/// A calm, unremarkable behavioral judgment.
pub fn scripted_behavioral() -> BehavioralJudgment {
    BehavioralJudgment {
        demeanor: Demeanor::Normal,
        clarity: 6,
        honesty: 6,
        engagement: Engagement::Medium,
        stress: StressLevel::Low,
        observation: "scripted behavioral judgment".to_string(),
        recommended_protocol: Protocol::Standard,
    }
}

/// A plan of `n` medium topics labeled "Topic 1".."Topic n".
pub fn scripted_plan(n: usize) -> PlanJudgment {
    PlanJudgment {
        topics: (0..n)
            .map(|i| PlannedTopic {
                label: format!("Topic {}", i + 1),
                difficulty: Difficulty::Medium,
                rationale: String::new(),
            })
            .collect(),
        rationale: "scripted plan".to_string(),
    }
}

/// A strategic judgment with the given action and directive.
pub fn scripted_strategy(next_action: NextAction, directive: &str) -> StrategicJudgment {
    StrategicJudgment {
        topic_score: None,
        next_action,
        protocol: Protocol::Standard,
        directive: directive.to_string(),
        rationale: "scripted strategy".to_string(),
    }
}

/// A middling hire verdict.
pub fn scripted_report() -> ReportJudgment {
    ReportJudgment {
        assessed_grade: Grade::Middle,
        recommendation: Recommendation::Hire,
        confidence: 70,
        reasoning: "scripted verdict reasoning".to_string(),
        clarity: 6,
        honesty: 7,
        engagement: 6,
        soft_skill_notes: "scripted soft-skill notes".to_string(),
        roadmap: vec![
            "scripted step one".to_string(),
            "scripted step two".to_string(),
            "scripted step three".to_string(),
        ],
        resources: vec![],
        rationale: "scripted report".to_string(),
    }
}

type Queue<T> = Mutex<VecDeque<Result<T, ProviderError>>>;

fn pop_or<T>(queue: &Queue<T>, default: impl FnOnce() -> T) -> Result<T, ProviderError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Ok(default()))
}

/// The scripted provider. All queues drain front to back.
#[derive(Default)]
pub struct ScriptedProvider {
    classifications: Queue<ClassificationJudgment>,
    technicals: Queue<TechnicalJudgment>,
    behaviorals: Queue<BehavioralJudgment>,
    plans: Queue<PlanJudgment>,
    strategies: Queue<StrategicJudgment>,
    quick_directives: Queue<QuickDirective>,
    phrasings: Queue<PhrasingJudgment>,
    reports: Queue<ReportJudgment>,

    classify_count: AtomicU32,
    technical_count: AtomicU32,
    behavioral_count: AtomicU32,
    plan_count: AtomicU32,
    decide_count: AtomicU32,
    decide_quick_count: AtomicU32,
    phrase_count: AtomicU32,
    report_count: AtomicU32,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_classification(&self, intent: Intent, rationale: &str) {
        self.classifications.lock().unwrap().push_back(Ok(ClassificationJudgment {
            intent,
            rationale: rationale.to_string(),
        }));
    }

    pub fn push_technical(&self, judgment: TechnicalJudgment) {
        self.technicals.lock().unwrap().push_back(Ok(judgment));
    }

    pub fn push_behavioral(&self, judgment: BehavioralJudgment) {
        self.behaviorals.lock().unwrap().push_back(Ok(judgment));
    }

    pub fn push_plan(&self, judgment: PlanJudgment) {
        self.plans.lock().unwrap().push_back(Ok(judgment));
    }

    pub fn push_strategy(&self, judgment: StrategicJudgment) {
        self.strategies.lock().unwrap().push_back(Ok(judgment));
    }

    pub fn push_quick(&self, directive: &str) {
        self.quick_directives.lock().unwrap().push_back(Ok(QuickDirective {
            directive: directive.to_string(),
            rationale: "scripted quick directive".to_string(),
        }));
    }

    pub fn push_phrase(&self, message: &str) {
        self.phrasings.lock().unwrap().push_back(Ok(PhrasingJudgment {
            message: message.to_string(),
            rationale: "scripted phrasing".to_string(),
        }));
    }

    pub fn push_report(&self, judgment: ReportJudgment) {
        self.reports.lock().unwrap().push_back(Ok(judgment));
    }

    pub fn fail_classify(&self, reason: &str) {
        self.classifications
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn fail_technical(&self, reason: &str) {
        self.technicals
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn fail_behavioral(&self, reason: &str) {
        self.behaviorals
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn fail_plan(&self, reason: &str) {
        self.plans
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn fail_decide(&self, reason: &str) {
        self.strategies
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn fail_phrase(&self, reason: &str) {
        self.phrasings
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn fail_report(&self, reason: &str) {
        self.reports
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Transport(reason.to_string())));
    }

    pub fn classify_calls(&self) -> u32 {
        self.classify_count.load(Ordering::SeqCst)
    }

    pub fn technical_calls(&self) -> u32 {
        self.technical_count.load(Ordering::SeqCst)
    }

    pub fn behavioral_calls(&self) -> u32 {
        self.behavioral_count.load(Ordering::SeqCst)
    }

    pub fn plan_calls(&self) -> u32 {
        self.plan_count.load(Ordering::SeqCst)
    }

    pub fn decide_calls(&self) -> u32 {
        self.decide_count.load(Ordering::SeqCst)
    }

    pub fn decide_quick_calls(&self) -> u32 {
        self.decide_quick_count.load(Ordering::SeqCst)
    }

    pub fn phrase_calls(&self) -> u32 {
        self.phrase_count.load(Ordering::SeqCst)
    }

    pub fn report_calls(&self) -> u32 {
        self.report_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JudgmentProvider for ScriptedProvider {
    async fn classify(
        &self,
        _req: ClassificationRequest,
    ) -> Result<ClassificationJudgment, ProviderError> {
        self.classify_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.classifications, || ClassificationJudgment {
            intent: Intent::Answer,
            rationale: "default classification".to_string(),
        })
    }

    async fn assess_technical(
        &self,
        _req: TechnicalRequest,
    ) -> Result<TechnicalJudgment, ProviderError> {
        self.technical_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.technicals, || {
            scripted_technical(5, Accuracy::PartiallyCorrect)
        })
    }

    async fn assess_behavioral(
        &self,
        _req: BehavioralRequest,
    ) -> Result<BehavioralJudgment, ProviderError> {
        self.behavioral_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.behaviorals, scripted_behavioral)
    }

    async fn generate_plan(&self, _req: PlanRequest) -> Result<PlanJudgment, ProviderError> {
        self.plan_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.plans, || scripted_plan(3))
    }

    async fn decide(&self, _req: StrategicRequest) -> Result<StrategicJudgment, ProviderError> {
        self.decide_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.strategies, || {
            scripted_strategy(NextAction::Continue, "ask a follow-up on the current topic")
        })
    }

    async fn decide_quick(&self, _req: QuickRequest) -> Result<QuickDirective, ProviderError> {
        self.decide_quick_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.quick_directives, || QuickDirective {
            directive: "briefly respond and restate the current question".to_string(),
            rationale: "default quick directive".to_string(),
        })
    }

    async fn phrase(&self, _req: PhrasingRequest) -> Result<PhrasingJudgment, ProviderError> {
        self.phrase_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.phrasings, || PhrasingJudgment {
            message: "Let's continue. Tell me more about that.".to_string(),
            rationale: "default phrasing".to_string(),
        })
    }

    async fn report(&self, _req: ReportRequest) -> Result<ReportJudgment, ProviderError> {
        self.report_count.fetch_add(1, Ordering::SeqCst);
        pop_or(&self.reports, scripted_report)
    }
}
