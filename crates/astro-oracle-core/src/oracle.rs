//! Oracle service: birth facts → sign + diurnal cue → prompt → generation, with templated
//! fallback whenever generation yields nothing usable.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::birth::{BirthFacts, DerivedFacts};
use crate::diurnal::Diurnal;
use crate::fallback;
use crate::generator::{GenerationError, TextGenerator};
use crate::prompts::{self, PromptMessage};
use crate::question_gate::{GateDecision, IdentityKey, QuestionGate};
use crate::zodiac::SignRecord;

/// Caller-correctable failures. Generation failures never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("Invalid or missing date")]
    InvalidDate,

    #[error("Please enter a question")]
    EmptyQuestion,

    #[error("Only one free question is allowed.")]
    LimitReached,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    pub tob: Option<String>,
    #[serde(default)]
    pub pob: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    pub tob: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

/// Keeps string values; any other JSON type reads as absent.
fn text_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Serialize)]
pub struct Reading {
    pub sign: &'static str,
    pub element: &'static str,
    pub modality: &'static str,
    pub diurnal: Diurnal,
    pub reading: String,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sign: &'static str,
    pub element: &'static str,
    pub modality: &'static str,
    pub diurnal: Diurnal,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

/// Generated text, or the fallback when generation fails.
struct Outcome {
    text: String,
    fallback: bool,
}

#[derive(Clone)]
pub struct Oracle {
    generator: Arc<dyn TextGenerator>,
    gate: QuestionGate,
}

impl Oracle {
    pub fn new(generator: Arc<dyn TextGenerator>, gate: QuestionGate) -> Self {
        Self { generator, gate }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub fn gate(&self) -> &QuestionGate {
        &self.gate
    }

    /// Full reading. Fails only when the date of birth does not resolve to a sign.
    pub async fn reading(&self, req: &ReadingRequest) -> Result<Reading, OracleError> {
        let facts = BirthFacts::new(
            req.name.as_deref(),
            req.dob.as_deref(),
            req.tob.as_deref(),
            req.pob.as_deref(),
        );
        let (sign, diurnal) = resolved(facts.derive())?;

        let messages = prompts::reading_messages(&facts, sign, diurnal);
        let outcome = self
            .generate_or(&messages, "reading", || {
                fallback::reading_text(&facts.name, sign, diurnal)
            })
            .await;

        Ok(Reading {
            sign: sign.name,
            element: sign.element.as_str(),
            modality: sign.modality.as_str(),
            diurnal,
            reading: outcome.text,
            fallback: outcome.fallback,
        })
    }

    /// Answer to the identity's one free question. The slot is consumed before generation,
    /// so a failed generation (answered by fallback) still uses it.
    pub async fn answer(&self, req: &QuestionRequest) -> Result<Answer, OracleError> {
        let facts = BirthFacts::new(req.name.as_deref(), req.dob.as_deref(), req.tob.as_deref(), None);
        let question = req.question.as_deref().unwrap_or_default().trim();
        if question.is_empty() {
            return Err(OracleError::EmptyQuestion);
        }

        let key = IdentityKey::new(&facts.name, &facts.dob);
        if self.gate.is_used(&key) {
            return Err(OracleError::LimitReached);
        }

        let (sign, diurnal) = resolved(facts.derive())?;

        if self.gate.check_and_consume(key) == GateDecision::AlreadyUsed {
            return Err(OracleError::LimitReached);
        }
        tracing::info!(sign = sign.name, "Free question accepted");

        let messages = prompts::question_messages(&facts.name, sign, diurnal, question);
        let outcome = self
            .generate_or(&messages, "answer", || {
                fallback::answer_text(&facts.name, sign, diurnal)
            })
            .await;

        Ok(Answer {
            answer: outcome.text,
            sign: sign.name,
            element: sign.element.as_str(),
            modality: sign.modality.as_str(),
            diurnal,
            fallback: outcome.fallback,
        })
    }

    /// Diagnostic round trip; the raw generation error is returned to the caller.
    pub async fn ping(&self) -> Result<String, GenerationError> {
        self.generator.generate(&prompts::ping_messages()).await
    }

    async fn generate_or<F>(&self, messages: &[PromptMessage], what: &str, fallback: F) -> Outcome
    where
        F: FnOnce() -> String,
    {
        match self.generator.generate(messages).await {
            Ok(text) if !text.trim().is_empty() => Outcome {
                text,
                fallback: false,
            },
            Ok(_) => {
                tracing::warn!(kind = "llm_empty_output", "Using fallback {}", what);
                Outcome {
                    text: fallback(),
                    fallback: true,
                }
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Using fallback {}", what);
                Outcome {
                    text: fallback(),
                    fallback: true,
                }
            }
        }
    }
}

fn resolved(derived: DerivedFacts) -> Result<(&'static SignRecord, Diurnal), OracleError> {
    let sign = derived.sign.ok_or(OracleError::InvalidDate)?;
    Ok((sign, derived.diurnal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Disabled;

    #[async_trait]
    impl TextGenerator for Disabled {
        fn model(&self) -> &str {
            "none"
        }

        async fn generate(&self, _: &[PromptMessage]) -> Result<String, GenerationError> {
            Err(GenerationError::Disabled)
        }
    }

    fn oracle() -> Oracle {
        Oracle::new(Arc::new(Disabled), QuestionGate::default())
    }

    #[tokio::test]
    async fn reading_falls_back_when_disabled() {
        let req = ReadingRequest {
            dob: Some("2024-03-21".into()),
            tob: Some("06:00".into()),
            ..Default::default()
        };
        let reading = oracle().reading(&req).await.unwrap();
        assert_eq!(reading.sign, "Aries");
        assert_eq!(reading.diurnal, Diurnal::DayBorn);
        assert!(reading.fallback);
        assert!(reading.reading.starts_with("Seeker, as a Aries (Fire, Cardinal)"));
    }

    #[tokio::test]
    async fn reading_rejects_bad_date() {
        let req = ReadingRequest {
            dob: Some("not-a-date".into()),
            ..Default::default()
        };
        assert_eq!(oracle().reading(&req).await.unwrap_err(), OracleError::InvalidDate);
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_the_gate() {
        let oracle = oracle();
        let req = QuestionRequest {
            dob: Some("2000-01-01".into()),
            question: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(oracle.answer(&req).await.unwrap_err(), OracleError::EmptyQuestion);
        assert_eq!(oracle.gate().used_count(), 0);
    }

    #[tokio::test]
    async fn invalid_date_does_not_consume() {
        let oracle = oracle();
        let req = QuestionRequest {
            dob: Some("31/12/2000".into()),
            question: Some("Why?".into()),
            ..Default::default()
        };
        assert_eq!(oracle.answer(&req).await.unwrap_err(), OracleError::InvalidDate);
        assert_eq!(oracle.gate().used_count(), 0);
    }

    #[test]
    fn non_string_date_and_time_read_as_absent() {
        let req: ReadingRequest =
            serde_json::from_value(serde_json::json!({ "dob": 20240321, "tob": 1230 })).unwrap();
        assert_eq!(req.dob, None);
        assert_eq!(req.tob, None);

        let req: QuestionRequest = serde_json::from_value(serde_json::json!({
            "dob": "2024-03-21",
            "tob": ["12", "30"],
            "question": "Why?"
        }))
        .unwrap();
        assert_eq!(req.dob.as_deref(), Some("2024-03-21"));
        assert_eq!(req.tob, None);
    }

    #[tokio::test]
    async fn numeric_date_is_invalid() {
        let req: QuestionRequest =
            serde_json::from_value(serde_json::json!({ "dob": 20240321, "question": "Why?" }))
                .unwrap();
        let oracle = oracle();
        assert_eq!(oracle.answer(&req).await.unwrap_err(), OracleError::InvalidDate);
        assert_eq!(oracle.gate().used_count(), 0);
    }

    #[test]
    fn fallback_marker_is_omitted_when_false() {
        let reading = Reading {
            sign: "Leo",
            element: "Fire",
            modality: "Fixed",
            diurnal: Diurnal::Unknown,
            reading: "hi".into(),
            fallback: false,
        };
        let json = serde_json::to_value(&reading).unwrap();
        assert!(json.get("fallback").is_none());
        assert_eq!(json["diurnal"], "Unknown");
    }
}
