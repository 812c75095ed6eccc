//! Prompt construction for the chat completions backend.
//!
//! Each function returns a (system, user) pair. The system prompt carries
//! the role and the exact JSON schema; the user prompt carries this turn's
//! facts. Schema field names and enum values match the serde definitions of
//! the judgment types, so a conforming reply deserializes directly.

use council_proto::{
    BehavioralRequest, ClassificationRequest, PhrasingRequest, PlanRequest, QuickRequest,
    ReportRequest, StrategicRequest, TechnicalRequest,
};

pub fn classification(req: &ClassificationRequest) -> (String, String) {
    let system = r#"You classify one candidate message in a technical interview.
Pick exactly one intent:
- "answer": the candidate addresses the posed question, even partially, weakly, or incorrectly. "I don't know" is an answer.
- "question": the candidate asks the interviewer a counter-question about the interview or the question itself.
- "off_topic": the message is unrelated to the interview.
- "stop": the candidate asks to end the interview.
When an answer and a question are mixed, prefer "answer".
Respond with JSON: {"intent": "...", "rationale": "one sentence"}"#
        .to_string();
    let user = format!(
        "Interviewer asked:\n{}\n\nCandidate replied:\n{}",
        req.question, req.message
    );
    (system, user)
}

pub fn technical(req: &TechnicalRequest) -> (String, String) {
    let system = r#"You are a strict technical interviewer evaluating one answer. Be skeptical; vague confidence is not competence.
Scoring, 0-10:
- 0-1: no answer, or the answer asserts fabricated facts, technologies, versions, or citations
- 2-4: significant errors or only surface familiarity
- 5-7: mostly correct with gaps
- 8-10: correct and shows genuine depth
Set "accuracy" to one of "exact", "partially_correct", "incorrect", "hallucination".
Set "fictional_term_detected" true when the answer uses an invented term, library, or API as if it were real. Any fabrication means accuracy "hallucination" and a score of 0 or 1, regardless of how fluent the rest is.
Set "contradiction_detected" true when the answer contradicts something the candidate said earlier in the dialogue.
When there is a gross factual error, put a one-line correction in "correction".
Respond with JSON: {"score": 0, "accuracy": "...", "depth": "shallow"|"adequate"|"deep"|"expert", "issues": ["up to three concrete problems"], "correction": null, "contradiction_detected": false, "fictional_term_detected": false, "rationale": "one sentence"}"#
        .to_string();
    let user = format!(
        "Topic: {} (difficulty: {})\n\nQuestion:\n{}\n\nCandidate's answer:\n{}",
        req.topic, req.difficulty, req.question, req.answer
    );
    (system, user)
}

pub fn behavioral(req: &BehavioralRequest) -> (String, String) {
    let system = r#"You observe HOW a candidate communicates in a technical interview. Ignore whether the content is technically right; judge manner only.
- "demeanor": one of "normal", "verbose", "silent", "arrogant", "stuck", "nervous".
- "clarity": 1-10, structure and precision of expression.
- "honesty": 1-10. Reserve 7-10 for first-person experience or an explicit "I don't know". Use 1-3 when the text reads like it was pasted from an assistant or dodges the question while pretending to answer.
- "engagement": "low", "medium", or "high".
- "stress": "low", "medium", or "high".
- "recommended_protocol": "standard" normally; "rescue" when the candidate is stuck and needs easier ground; "speedrun" when they are coasting; "stress_test" when they are arrogant and need pressure.
Respond with JSON: {"demeanor": "...", "clarity": 0, "honesty": 0, "engagement": "...", "stress": "...", "observation": "one sentence", "recommended_protocol": "standard"}"#
        .to_string();
    let user = format!("Candidate's message:\n{}", req.message);
    (system, user)
}

pub fn plan(req: &PlanRequest) -> (String, String) {
    let system = r#"You design the topic plan for a technical interview.
Produce six to eight concrete topics, ordered from fundamentals to advanced, tailored to the role, the target grade, and the declared experience. Each topic gets a difficulty: "easy", "medium", "hard", or "expert". Junior plans start easy; senior plans may start at medium.
Respond with JSON: {"topics": [{"label": "...", "difficulty": "...", "rationale": "why this matters for the role"}], "rationale": "one sentence on the overall shape"}"#
        .to_string();
    let user = format!(
        "Role: {}\nTarget grade: {}\nDeclared experience: {}",
        req.role, req.grade, req.experience
    );
    (system, user)
}

pub fn strategic(req: &StrategicRequest) -> (String, String) {
    let system = r#"You direct a technical interview. Given both evaluations of the last answer and the plan progress, decide what happens next.
- "next_action": "continue" to stay on the current topic, "next_topic" to move on, "finish" to end the interview now. Finish early only when the outcome is already beyond doubt.
- "topic_score": 0-10 score to record for the current topic, or null when no score applies.
- "protocol": "standard", or escalate to "rescue", "speedrun", or "stress_test" when the behavioral picture calls for it.
- "directive": one or two sentences of instruction for the interviewer voice. Name what to ask next, not the literal wording. Never include the expected answer.
Respond with JSON: {"topic_score": null, "next_action": "...", "protocol": "standard", "directive": "...", "rationale": "one sentence"}"#
        .to_string();
    let mut user = format!(
        "Candidate: {} ({}, target grade {})\nTurn: {}\nCurrent topic: {}\n\nPlan:\n{}\n\nTechnical evaluation: {}\nBehavioral evaluation: {}\nIntent: {}\n\nCandidate's message:\n{}",
        req.name,
        req.role,
        req.grade,
        req.turn_id,
        req.current_topic,
        req.plan_status,
        req.technical_summary,
        req.behavioral_summary,
        req.intent,
        req.message
    );
    if req.hallucination_detected {
        user.push_str("\n\nNote: the answer contains a fabrication");
        if let Some(correction) = &req.correction {
            user.push_str(&format!(" ({correction})"));
        }
        user.push('.');
    }
    (system, user)
}

pub fn quick(req: &QuickRequest) -> (String, String) {
    let system = r#"You direct a technical interview. The candidate's last message is not an answer, so nothing gets scored; produce a short directive that handles the message and returns to the current question.
For a counter-question: answer it in one sentence when reasonable, then restate the pending question. For off-topic chatter: acknowledge briefly and redirect.
Respond with JSON: {"directive": "...", "rationale": "one sentence"}"#
        .to_string();
    let user = format!(
        "Turn: {}\nIntent: {}\nCurrent topic: {}\n\nCandidate's message:\n{}",
        req.turn_id, req.intent, req.current_topic, req.message
    );
    (system, user)
}

pub fn phrasing(req: &PhrasingRequest) -> (String, String) {
    let mut system = String::from(
        "You are the interviewer's voice: professional, warm, and concise. \
         Turn the directive into one natural message to the candidate. Ask at \
         most one question per message. Never reveal internal evaluations, \
         scores, or the plan.\n",
    );
    if req.flags.opening {
        system.push_str("This is the opening message: greet the candidate by name and set an encouraging tone before the first question.\n");
    }
    if req.flags.hallucination_challenge {
        system.push_str("The last answer contained a fabrication. Ask the candidate to elaborate on the claim, in a neutral tone. Do not say it is wrong and do not supply the correct fact.\n");
    }
    if req.flags.topic_transition {
        system.push_str("Close the previous topic in a short clause before asking on the new one.\n");
    }
    if req.flags.offtopic_redirect {
        system.push_str("Acknowledge the digression in a few words, then steer back to the question.\n");
    }
    if req.flags.meta_question {
        system.push_str("Answer the candidate's question briefly first, then restate the pending interview question.\n");
    }
    match req.protocol {
        council_proto::Protocol::Standard => {}
        council_proto::Protocol::Rescue => {
            system.push_str("Rescue mode: the candidate is struggling. Simplify, offer a small hint, stay supportive.\n");
        }
        council_proto::Protocol::Speedrun => {
            system.push_str("Speedrun mode: keep messages short and move quickly.\n");
        }
        council_proto::Protocol::StressTest => {
            system.push_str("Stress-test mode: be more demanding and press on weak points, while staying professional.\n");
        }
    }
    system.push_str(r#"Respond with JSON: {"message": "...", "rationale": "one sentence"}"#);

    let user = format!(
        "Candidate: {} ({}, target grade {})\nTurn: {}\nCurrent topic: {} (difficulty: {})\n\nRecent dialogue:\n{}\n\nCandidate's last message:\n{}\n\nDirective:\n{}",
        req.name,
        req.role,
        req.grade,
        req.turn_id,
        req.topic,
        req.difficulty,
        req.history.join("\n"),
        req.message,
        req.directive
    );
    (system, user)
}

pub fn report(req: &ReportRequest) -> (String, String) {
    let system = r#"You write the final hiring assessment of a simulated technical interview. Judge only what was demonstrated in the dialogue; claimed experience that was never shown counts for nothing.
- "assessed_grade": "Junior", "Middle", or "Senior", based on demonstrated level.
- "recommendation": "No Hire", "Hire", or "Strong Hire".
- "confidence": 0-100. With three or more substantive answers use 80-95; with one or two use 60-80; with none use 30-50. Never 100.
- "reasoning": two or three sentences behind the verdict.
- "clarity", "honesty", "engagement": 1-10 each, with "soft_skill_notes" summarizing them.
- "roadmap": at least three concrete development steps, most important first.
- "resources": a few specific books, docs, or courses.
Respond with JSON: {"assessed_grade": "...", "recommendation": "...", "confidence": 0, "reasoning": "...", "clarity": 0, "honesty": 0, "engagement": 0, "soft_skill_notes": "...", "roadmap": ["..."], "resources": ["..."], "rationale": "one sentence"}"#
        .to_string();
    let user = format!(
        "Candidate: {} ({}, target grade {})\nDeclared experience: {}\n\nStatistics: {} turns, {} substantive answers, {} unanswered, {} hallucinations, {} off-topic, {} contradictions\n\nTopics:\n{}\n\nCritical issues:\n{}\n\nDialogue:\n{}\n\nPer-turn analysis:\n{}",
        req.name,
        req.role,
        req.grade,
        req.experience,
        req.stats.total_turns,
        req.stats.substantive_answers,
        req.stats.unanswered,
        req.stats.hallucinations,
        req.stats.off_topic,
        req.stats.contradictions,
        req.topics_summary,
        if req.critical_issues.is_empty() {
            "(none)"
        } else {
            req.critical_issues.as_str()
        },
        req.dialogue,
        req.analysis
    );
    (system, user)
}
