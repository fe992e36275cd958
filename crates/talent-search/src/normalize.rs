//! Candidate normalization.
//!
//! Maps loosely-typed backend records onto [`CanonicalCandidate`]. Every field
//! has a fallback, so normalization is total over any JSON value. Fields the
//! backend omitted and that cannot be derived (rating, review count,
//! placeholder ids) come from an injected RNG so output is reproducible under
//! a fixed seed.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

use crate::types::{CanonicalCandidate, MAX_SKILLS};

const DEFAULT_ROLE: &str = "Low-Code Expert";
const DEFAULT_LOCATION: &str = "Remote";
const DEFAULT_RATE: &str = "$75";
const DEFAULT_EXPERIENCE: &str = "Experienced Professional";
const DEFAULT_NAME: &str = "Anonymous Expert";
const RATE_BASE: u64 = 50;
const RATE_PER_YEAR: u64 = 10;
const RATE_CAP: u64 = 200;

/// Normalizes raw candidate records using an injected random source.
pub struct CandidateNormalizer<R: Rng> {
    rng: R,
}

impl CandidateNormalizer<StdRng> {
    /// Normalizer with a reproducible RNG.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CandidateNormalizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Normalize one record. Non-objects are treated as an empty record.
    pub fn normalize(&mut self, raw: &Value) -> CanonicalCandidate {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);

        let id = text_or_number(obj, "id").unwrap_or_else(|| self.placeholder_id());
        let name = text(obj, &["name", "fullName"])
            .or_else(|| joined_name(obj))
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let image = text(obj, &["image", "avatar", "profileImage"])
            .unwrap_or_else(|| avatar_url(&name));

        let skills = skill_list(obj.get("technologies"))
            .or_else(|| skill_list(obj.get("skills")))
            .unwrap_or_default();

        let role = text(obj, &["role", "title"])
            .or_else(|| skills.first().map(|s| format!("{s} Developer")))
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let location = text(obj, &["location"])
            .or_else(|| match (text(obj, &["city"]), text(obj, &["country"])) {
                (Some(city), Some(country)) => Some(format!("{city}, {country}")),
                _ => None,
            })
            .or_else(|| text(obj, &["region"]))
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let years = experience_years(obj);

        let rate = rate(obj)
            .or_else(|| years.map(|y| format!("${}", rate_for_years(y))))
            .unwrap_or_else(|| DEFAULT_RATE.to_string());

        let experience = text(obj, &["experience"])
            .or_else(|| years.map(|y| format!("{y}+ years experience")))
            .unwrap_or_else(|| DEFAULT_EXPERIENCE.to_string());

        let rating = float(obj, "rating")
            .map(|r| r.clamp(0.0, 5.0))
            .unwrap_or_else(|| f64::from(self.rng.gen_range(40..=50u32)) / 10.0);

        let reviews = float(obj, "reviews")
            .map(|r| r.min(f64::from(u32::MAX)) as u32)
            .unwrap_or_else(|| self.rng.gen_range(5..=150));

        let match_score = float(obj, "matchScore")
            .or_else(|| float(obj, "score"))
            .map(|s| s.clamp(0.0, 100.0));

        CanonicalCandidate {
            id,
            name,
            image,
            role,
            location,
            rating,
            reviews,
            rate,
            skills,
            experience,
            availability: text(obj, &["availability"]),
            status: text(obj, &["status"]),
            match_score,
        }
    }

    /// Normalize a batch, making ids unique within it.
    pub fn normalize_all(&mut self, raws: &[Value]) -> Vec<CanonicalCandidate> {
        let mut seen = HashSet::new();
        raws.iter()
            .map(|raw| {
                let mut candidate = self.normalize(raw);
                if !seen.insert(candidate.id.clone()) {
                    let base = candidate.id.clone();
                    let mut n = 2;
                    while !seen.insert(format!("{base}-{n}")) {
                        n += 1;
                    }
                    candidate.id = format!("{base}-{n}");
                }
                candidate
            })
            .collect()
    }

    fn placeholder_id(&mut self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        format!("candidate-{}", uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

/// First non-blank string among `keys`.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

fn text_or_number(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn joined_name(obj: &Map<String, Value>) -> Option<String> {
    let parts: Vec<String> = [text(obj, &["firstName"]), text(obj, &["lastName"])]
        .into_iter()
        .flatten()
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Non-negative finite number from a number or numeric string.
fn float(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn experience_years(obj: &Map<String, Value>) -> Option<u64> {
    ["totalExperienceYears", "experienceYears", "yearsOfExperience", "experience"]
        .iter()
        .find_map(|key| match obj.get(*key) {
            Some(Value::String(_)) if *key == "experience" => None,
            _ => float(obj, key),
        })
        .map(|y| y.floor() as u64)
}

/// Hourly rate derived from years of experience, capped at [`RATE_CAP`].
fn rate_for_years(years: u64) -> u64 {
    years
        .saturating_mul(RATE_PER_YEAR)
        .saturating_add(RATE_BASE)
        .min(RATE_CAP)
}

fn rate(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("rate")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => {
            let v = n.as_f64().filter(|v| v.is_finite() && *v >= 0.0)?;
            Some(if v.fract() == 0.0 {
                format!("${}", v as u64)
            } else {
                format!("${v:.2}")
            })
        }
        _ => None,
    }
}

/// Skills from an array (strings, numbers or `{name}` objects) or a
/// comma-joined string. `None` when the field is absent or unusable.
fn skill_list(value: Option<&Value>) -> Option<Vec<String>> {
    let skills: Vec<String> = match value? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(o) => text(o, &["name"]),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => return None,
    };
    Some(skills.into_iter().take(MAX_SKILLS).collect())
}

fn avatar_url(name: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("https://ui-avatars.com/api/?name={encoded}&background=random")
}
