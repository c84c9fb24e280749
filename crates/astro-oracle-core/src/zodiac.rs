//! Zodiac Resolver: maps a birth date to one of the twelve fixed sun-sign records.
//!
//! The table is static and ordered Aries..Pisces. Capricorn is the only record whose
//! interval wraps the year boundary (12-22 → 01-19); every other interval is checked
//! as a plain inclusive range on (month, day).

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

/// Classical element of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Air => "Air",
            Self::Water => "Water",
        }
    }
}

/// Modality (quality) of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardinal => "Cardinal",
            Self::Fixed => "Fixed",
            Self::Mutable => "Mutable",
        }
    }
}

/// (month, day) pair. Ordering is lexicographic, which is what the interval test relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }
}

/// One sun sign: name, inclusive date interval, element and modality.
#[derive(Debug, PartialEq, Eq)]
pub struct SignRecord {
    pub name: &'static str,
    pub start: MonthDay,
    pub end: MonthDay,
    pub element: Element,
    pub modality: Modality,
}

impl SignRecord {
    /// True when `date` falls inside this sign's interval (inclusive on both ends).
    pub fn contains(&self, date: MonthDay) -> bool {
        if self.start.month <= self.end.month {
            self.start <= date && date <= self.end
        } else {
            date >= self.start || date <= self.end
        }
    }

    /// True for the single record spanning December → January.
    pub fn wraps_year(&self) -> bool {
        self.start.month > self.end.month
    }
}

const fn sign(
    name: &'static str,
    start: (u32, u32),
    end: (u32, u32),
    element: Element,
    modality: Modality,
) -> SignRecord {
    SignRecord {
        name,
        start: MonthDay::new(start.0, start.1),
        end: MonthDay::new(end.0, end.1),
        element,
        modality,
    }
}

pub static SIGNS: [SignRecord; 12] = [
    sign("Aries", (3, 21), (4, 19), Element::Fire, Modality::Cardinal),
    sign("Taurus", (4, 20), (5, 20), Element::Earth, Modality::Fixed),
    sign("Gemini", (5, 21), (6, 20), Element::Air, Modality::Mutable),
    sign("Cancer", (6, 21), (7, 22), Element::Water, Modality::Cardinal),
    sign("Leo", (7, 23), (8, 22), Element::Fire, Modality::Fixed),
    sign("Virgo", (8, 23), (9, 22), Element::Earth, Modality::Mutable),
    sign("Libra", (9, 23), (10, 22), Element::Air, Modality::Cardinal),
    sign("Scorpio", (10, 23), (11, 21), Element::Water, Modality::Fixed),
    sign("Sagittarius", (11, 22), (12, 21), Element::Fire, Modality::Mutable),
    sign("Capricorn", (12, 22), (1, 19), Element::Earth, Modality::Cardinal),
    sign("Aquarius", (1, 20), (2, 18), Element::Air, Modality::Fixed),
    sign("Pisces", (2, 19), (3, 20), Element::Water, Modality::Mutable),
];

/// Parses a birth date in ISO-8601 form: `YYYY-MM-DD` or compact `YYYYMMDD`, optionally
/// followed by `T` (or a space) and a clock time with an optional `Z` or `±HH[:MM]` offset.
/// The clock may be as short as the hour alone. Only the date part is returned.
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let (date, rest) = split_date(text)?;
    if rest.is_empty() {
        return Some(date);
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some('T' | 't' | ' ') if is_iso_time(chars.as_str()) => Some(date),
        _ => None,
    }
}

/// Leading calendar date and whatever follows it.
fn split_date(text: &str) -> Option<(NaiveDate, &str)> {
    if let Some(head) = text.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
            return Some((date, &text[10..]));
        }
    }
    let head = text.get(..8)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(
        head[0..4].parse().ok()?,
        head[4..6].parse().ok()?,
        head[6..8].parse().ok()?,
    )?;
    Some((date, &text[8..]))
}

/// Clock time with an optional UTC designator or numeric offset.
fn is_iso_time(text: &str) -> bool {
    let (clock, offset) = if let Some(i) = text.find(|c: char| c == '+' || c == '-') {
        (&text[..i], Some(&text[i + 1..]))
    } else if let Some(clock) = text.strip_suffix('Z') {
        (clock, None)
    } else {
        (text, None)
    };
    is_clock(clock) && offset.map_or(true, is_clock)
}

fn is_clock(text: &str) -> bool {
    const CLOCK_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S%.f", "%H%M", "%H%M%S%.f"];
    if !text.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        return false;
    }
    if text.len() == 2 {
        return NaiveTime::parse_from_str(&format!("{}:00", text), "%H:%M").is_ok();
    }
    CLOCK_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(text, fmt).is_ok())
}

/// First record whose interval contains `date`.
pub fn sign_for_month_day(date: MonthDay) -> Option<&'static SignRecord> {
    SIGNS.iter().find(|s| s.contains(date))
}

/// Resolves the sun sign for a birth date string; `None` when the date does not parse.
pub fn sign_for_date(text: &str) -> Option<&'static SignRecord> {
    let date = parse_birth_date(text)?;
    sign_for_month_day(MonthDay::new(date.month(), date.day()))
}

/// Case-insensitive lookup by sign name.
#[cfg(test)]
pub(crate) fn sign_by_name(name: &str) -> Option<&'static SignRecord> {
    let wanted = name.trim();
    SIGNS.iter().find(|s| s.name.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_for(date: &str) -> Option<&'static str> {
        sign_for_date(date).map(|s| s.name)
    }

    #[test]
    fn every_boundary_date_resolves_to_its_own_sign() {
        for s in SIGNS.iter() {
            let start = format!("2023-{:02}-{:02}", s.start.month, s.start.day);
            let end = format!("2023-{:02}-{:02}", s.end.month, s.end.day);
            assert_eq!(name_for(&start), Some(s.name), "start of {}", s.name);
            assert_eq!(name_for(&end), Some(s.name), "end of {}", s.name);
        }
    }

    #[test]
    fn known_cusps() {
        assert_eq!(name_for("2024-03-21"), Some("Aries"));
        assert_eq!(name_for("2024-03-20"), Some("Pisces"));
        assert_eq!(name_for("2024-12-22"), Some("Capricorn"));
        assert_eq!(name_for("2024-12-21"), Some("Sagittarius"));
        assert_eq!(name_for("2024-01-19"), Some("Capricorn"));
        assert_eq!(name_for("2024-01-20"), Some("Aquarius"));
    }

    #[test]
    fn capricorn_wraps_the_year() {
        for day in 22..=31 {
            assert_eq!(name_for(&format!("1999-12-{:02}", day)), Some("Capricorn"));
        }
        for day in 1..=19 {
            assert_eq!(name_for(&format!("2000-01-{:02}", day)), Some("Capricorn"));
        }
        let wrapping: Vec<_> = SIGNS.iter().filter(|s| s.wraps_year()).collect();
        assert_eq!(wrapping.len(), 1);
        assert_eq!(wrapping[0].name, "Capricorn");
    }

    #[test]
    fn leap_day_is_pisces() {
        assert_eq!(name_for("2024-02-29"), Some("Pisces"));
    }

    #[test]
    fn every_day_of_a_leap_year_has_exactly_one_sign() {
        let mut d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while d.year() == 2024 {
            let md = MonthDay::new(d.month(), d.day());
            let hits = SIGNS.iter().filter(|s| s.contains(md)).count();
            assert_eq!(hits, 1, "{}", d);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn datetime_forms_are_accepted() {
        assert_eq!(name_for("1990-07-23T04:15:00"), Some("Leo"));
        assert_eq!(name_for("1990-07-23 04:15"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04:15:00Z"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04:15:00+05:30"), Some("Leo"));
        assert_eq!(name_for("19900723"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04:15:00.250"), Some("Leo"));
    }

    #[test]
    fn short_clock_and_offset_forms_are_accepted() {
        assert_eq!(name_for("1990-07-23T04:15Z"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04Z"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04:15+05:30"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T04:15-0800"), Some("Leo"));
        assert_eq!(name_for("1990-07-23T0415"), Some("Leo"));
        assert_eq!(name_for("19900723T041500"), Some("Leo"));
    }

    #[test]
    fn malformed_clock_rejects_the_whole_date() {
        assert_eq!(name_for("1990-07-23T25:00"), None);
        assert_eq!(name_for("1990-07-23Tnoon"), None);
        assert_eq!(name_for("1990-07-23T"), None);
        assert_eq!(name_for("1990-07-23x04:15"), None);
        assert_eq!(name_for("1990-07-23T04:15+"), None);
        assert_eq!(name_for("1990-07-23 "), None);
    }

    #[test]
    fn garbage_is_unresolvable() {
        assert_eq!(name_for("not-a-date"), None);
        assert_eq!(name_for(""), None);
        assert_eq!(name_for("2024-13-01"), None);
        assert_eq!(name_for("2023-02-29"), None);
    }

    #[test]
    fn resolution_is_pure() {
        let a = sign_for_date("1985-10-23").unwrap();
        let b = sign_for_date("1985-10-23").unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.element, Element::Water);
        assert_eq!(a.modality, Modality::Fixed);
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        assert_eq!(sign_by_name("sagittarius").map(|s| s.element), Some(Element::Fire));
        assert!(sign_by_name("Ophiuchus").is_none());
    }
}
