//! Astro Oracle core library.
//! Sun-sign resolution, diurnal cue, prompt templates, the Gemini bridge, templated
//! fallback text and the one-free-question gate.

pub mod birth;
pub mod config;
pub mod diurnal;
pub mod fallback;
pub mod gemini_bridge;
pub mod generator;
pub mod oracle;
pub mod prompts;
pub mod question_gate;
pub mod zodiac;

pub use birth::{BirthFacts, DerivedFacts};
pub use config::OracleConfig;
pub use diurnal::Diurnal;
pub use gemini_bridge::GeminiBridge;
pub use generator::{GenerationError, TextGenerator};
pub use oracle::{Answer, Oracle, OracleError, QuestionRequest, Reading, ReadingRequest};
pub use prompts::{PromptMessage, Role};
pub use question_gate::{GateDecision, IdentityKey, IdentityStore, InMemoryIdentityStore, QuestionGate};
pub use zodiac::{sign_for_date, Element, Modality, SignRecord, SIGNS};

/// Crate version, logged at gateway startup.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_is_the_package_version() {
        assert_eq!(super::version(), env!("CARGO_PKG_VERSION"));
        assert!(!super::version().is_empty());
    }
}
