//! Prompt Builder: fixed system/user templates filled with birth facts.

use serde::Serialize;

use crate::birth::BirthFacts;
use crate::diurnal::Diurnal;
use crate::zodiac::SignRecord;

pub const READING_SYSTEM: &str = "You are an empathetic astrologer.
Create a concise, uplifting reading using the provided birth facts.
Ground the reading in Sun sign archetypes, element, modality, and day/night-born cue.
Keep it 120-180 words.
Always include: 1) Core vibe 2) Focus for next 2-3 weeks 3) A single practical step.
Avoid medical or legal advice.
";

pub const QA_SYSTEM: &str = "You are an astrologer answering one free-text question.
Use Sun sign element and modality to shape the angle.
Be concrete, friendly, and under 120 words. Add one actionable suggestion.";

pub const PING_SYSTEM: &str = "You are a short echo bot.";
pub const PING_USER: &str = "Reply with the single word: pong";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of an LLM request; an ordered slice of these forms the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// System + user pair for a full reading.
pub fn reading_messages(
    facts: &BirthFacts,
    sign: &SignRecord,
    diurnal: Diurnal,
) -> Vec<PromptMessage> {
    let user = format!(
        "Name: {name}
Date of Birth: {dob}
Time of Birth: {tob}
Place of Birth: {pob}

Derived:
Sun Sign: {sign} ({element}, {modality})
Diurnal: {diurnal}
",
        name = facts.name,
        dob = facts.dob,
        tob = facts.tob,
        pob = facts.pob,
        sign = sign.name,
        element = sign.element.as_str(),
        modality = sign.modality.as_str(),
        diurnal = diurnal,
    );
    vec![
        PromptMessage::system(READING_SYSTEM),
        PromptMessage::user(user),
    ]
}

/// System + user pair for the one free question.
pub fn question_messages(
    name: &str,
    sign: &SignRecord,
    diurnal: Diurnal,
    question: &str,
) -> Vec<PromptMessage> {
    let user = format!(
        "Name: {name}
Sun Sign: {sign} ({element}, {modality})
Diurnal: {diurnal}

Question: {question}
",
        sign = sign.name,
        element = sign.element.as_str(),
        modality = sign.modality.as_str(),
    );
    vec![PromptMessage::system(QA_SYSTEM), PromptMessage::user(user)]
}

/// Diagnostic round trip used by the ping route.
pub fn ping_messages() -> Vec<PromptMessage> {
    vec![
        PromptMessage::system(PING_SYSTEM),
        PromptMessage::user(PING_USER),
    ]
}
