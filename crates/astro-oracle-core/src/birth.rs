//! Birth facts: normalised request fields and the facts derived from them.

use crate::diurnal::{self, Diurnal};
use crate::zodiac::{self, SignRecord};

pub const DEFAULT_NAME: &str = "Seeker";
pub const DEFAULT_PLACE: &str = "Unknown";

/// Normalised birth details for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthFacts {
    pub name: String,
    pub dob: String,
    pub tob: String,
    pub pob: String,
}

impl BirthFacts {
    /// Absent or empty name/place fall back to defaults and are then trimmed;
    /// date and time are kept raw (absent becomes "").
    pub fn new(
        name: Option<&str>,
        dob: Option<&str>,
        tob: Option<&str>,
        pob: Option<&str>,
    ) -> Self {
        Self {
            name: or_default(name, DEFAULT_NAME).trim().to_string(),
            dob: dob.unwrap_or_default().to_string(),
            tob: tob.unwrap_or_default().to_string(),
            pob: or_default(pob, DEFAULT_PLACE).trim().to_string(),
        }
    }

    pub fn derive(&self) -> DerivedFacts {
        DerivedFacts {
            sign: zodiac::sign_for_date(&self.dob),
            diurnal: diurnal::classify(&self.tob),
        }
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// Sign and diurnal cue computed from [`BirthFacts`].
#[derive(Debug, Clone, Copy)]
pub struct DerivedFacts {
    pub sign: Option<&'static SignRecord>,
    pub diurnal: Diurnal,
}
