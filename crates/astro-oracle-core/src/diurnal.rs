//! Diurnal Classifier: day/night-born cue from an `HH:MM` birth time.

use serde::{Serialize, Serializer};

/// Coarse day/night classification used to flavour readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diurnal {
    DayBorn,
    NightBorn,
    Unknown,
}

impl Diurnal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayBorn => "Day-born",
            Self::NightBorn => "Night-born",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Diurnal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Diurnal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Day-born when 6 ≤ hour + minute/60 < 18, Night-born otherwise.
/// Only format errors yield `Unknown`; out-of-range values such as `25:00` are classified as-is.
pub fn classify(time: &str) -> Diurnal {
    match fractional_hour(time) {
        Some(t) if (6.0..18.0).contains(&t) => Diurnal::DayBorn,
        Some(_) => Diurnal::NightBorn,
        None => Diurnal::Unknown,
    }
}

fn fractional_hour(time: &str) -> Option<f64> {
    let (hh, mm) = time.split_once(':')?;
    if mm.contains(':') {
        return None;
    }
    let hour: i64 = hh.trim().parse().ok()?;
    let minute: i64 = mm.trim().parse().ok()?;
    Some(hour as f64 + minute as f64 / 60.0)
}
