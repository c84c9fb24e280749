//! Fallback Generator: deterministic text used whenever the LLM yields nothing usable.

use crate::diurnal::Diurnal;
use crate::zodiac::SignRecord;

pub fn reading_text(name: &str, sign: &SignRecord, diurnal: Diurnal) -> String {
    let element = sign.element.as_str();
    format!(
        "{name}, as a {sign} ({element}, {modality}), your core vibe is aligned with your \
         {element_lower} nature. Over the next weeks, focus on one meaningful goal. \
         A small, consistent daily step will compound. Practical step: plan a 30-minute \
         block tomorrow to progress it. ({diurnal} pacing applies.)",
        sign = sign.name,
        modality = sign.modality.as_str(),
        element_lower = element.to_lowercase(),
    )
}

pub fn answer_text(name: &str, sign: &SignRecord, diurnal: Diurnal) -> String {
    format!(
        "{name}, as a {sign} ({element}), keep your approach simple. Define one next step \
         related to your question and schedule it within 48 hours. ({diurnal} pacing applies.)",
        sign = sign.name,
        element = sign.element.as_str(),
    )
}
