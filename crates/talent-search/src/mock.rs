//! Synthetic candidates for when no live data is available.
//!
//! Output leans toward the query: requested technologies lead each sample's
//! skill list, location and experience filters are echoed, and in AND mode
//! samples that do not cover every required term are dropped.

use rand::Rng;

use crate::mode::{required_terms, select_mode};
use crate::types::{is_blank, CanonicalCandidate, MatchLogic, QueryMode, SearchQuery, MAX_SKILLS};

/// A curated sample profile.
#[derive(Debug, Clone)]
pub struct SampleProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub city: &'static str,
    pub country: &'static str,
    pub region: &'static str,
    pub years: u32,
    pub skills: &'static [&'static str],
    pub availability: &'static str,
    pub image: &'static str,
}

const SAMPLES: &[SampleProfile] = &[
    SampleProfile {
        name: "Sarah Chen",
        role: "Senior Appian Developer",
        city: "Toronto",
        country: "Canada",
        region: "North America",
        years: 8,
        skills: &["Appian", "Java", "SQL", "BPMN"],
        availability: "Available now",
        image: "https://randomuser.me/api/portraits/women/44.jpg",
    },
    SampleProfile {
        name: "Marcus Johnson",
        role: "Mendix Solution Architect",
        city: "Amsterdam",
        country: "Netherlands",
        region: "Europe",
        years: 11,
        skills: &["Mendix", "Java", "React", "Azure"],
        availability: "Available in 2 weeks",
        image: "https://randomuser.me/api/portraits/men/32.jpg",
    },
    SampleProfile {
        name: "Priya Sharma",
        role: "OutSystems Tech Lead",
        city: "Bangalore",
        country: "India",
        region: "Asia Pacific",
        years: 7,
        skills: &["OutSystems", "C#", ".NET", "JavaScript"],
        availability: "Available now",
        image: "https://randomuser.me/api/portraits/women/68.jpg",
    },
    SampleProfile {
        name: "David Okafor",
        role: "Power Platform Consultant",
        city: "London",
        country: "United Kingdom",
        region: "Europe",
        years: 5,
        skills: &["Power Apps", "Power Automate", "Dataverse", "SharePoint"],
        availability: "Part-time",
        image: "https://randomuser.me/api/portraits/men/75.jpg",
    },
    SampleProfile {
        name: "Elena Rossi",
        role: "Pega Senior System Architect",
        city: "Milan",
        country: "Italy",
        region: "Europe",
        years: 9,
        skills: &["Pega", "Java", "REST APIs", "Agile"],
        availability: "Available in 1 month",
        image: "https://randomuser.me/api/portraits/women/21.jpg",
    },
    SampleProfile {
        name: "James Whitfield",
        role: "ServiceNow Developer",
        city: "Austin",
        country: "United States",
        region: "North America",
        years: 4,
        skills: &["ServiceNow", "JavaScript", "ITSM", "Glide"],
        availability: "Available now",
        image: "https://randomuser.me/api/portraits/men/46.jpg",
    },
    SampleProfile {
        name: "Aiko Tanaka",
        role: "Salesforce Platform Developer",
        city: "Tokyo",
        country: "Japan",
        region: "Asia Pacific",
        years: 6,
        skills: &["Salesforce", "Apex", "Lightning", "SOQL"],
        availability: "Available in 2 weeks",
        image: "https://randomuser.me/api/portraits/women/12.jpg",
    },
    SampleProfile {
        name: "Lucas Moreau",
        role: "RPA Engineer",
        city: "Lyon",
        country: "France",
        region: "Europe",
        years: 3,
        skills: &["UiPath", "Python", "Power Automate", "SQL"],
        availability: "Available now",
        image: "https://randomuser.me/api/portraits/men/9.jpg",
    },
];

/// Generates plausible candidates from a curated pool.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    pool: Vec<SampleProfile>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            pool: SAMPLES.to_vec(),
        }
    }

    /// Generator over a custom pool.
    pub fn with_pool(pool: Vec<SampleProfile>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &[SampleProfile] {
        &self.pool
    }

    /// Every distinct technology in the pool, in first-seen order.
    pub fn technologies(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for skill in self.pool.iter().flat_map(|p| p.skills.iter()) {
            if !out.iter().any(|s| s == skill) {
                out.push(skill.to_string());
            }
        }
        out
    }

    /// Generate candidates biased toward the query.
    ///
    /// Under AND semantics only candidates covering every required term are
    /// kept, so more than [`MAX_SKILLS`] required terms yields nothing.
    pub fn generate<R: Rng>(&self, query: &SearchQuery, rng: &mut R) -> Vec<CanonicalCandidate> {
        let mode = select_mode(query);
        let and_logic = mode == QueryMode::CommaAnd || query.explicit_mode == Some(MatchLogic::And);

        let mut lead_terms = required_terms(query);
        let free_term = query.raw_term.trim();
        let mut order: Vec<&SampleProfile> = self.pool.iter().collect();

        if lead_terms.is_empty() && !free_term.is_empty() && !free_term.contains(',') {
            if let Some(tech) = self.known_technology(free_term) {
                lead_terms.push(tech);
            } else if let Some(pos) = order
                .iter()
                .position(|p| contains_ci(p.name, free_term))
            {
                let hit = order.remove(pos);
                order.insert(0, hit);
            }
        }

        let count = (query.size.max(1) as usize).min(order.len());

        let candidates: Vec<CanonicalCandidate> = order
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, profile)| self.synthesize(i, profile, &lead_terms, query, rng))
            .collect();

        if !and_logic {
            return candidates;
        }

        let required = required_terms(query);
        candidates
            .into_iter()
            .filter(|c| covers_all(&c.skills, &required))
            .collect()
    }

    fn synthesize<R: Rng>(
        &self,
        index: usize,
        profile: &SampleProfile,
        lead_terms: &[String],
        query: &SearchQuery,
        rng: &mut R,
    ) -> CanonicalCandidate {
        let mut skills: Vec<String> = Vec::new();
        for skill in lead_terms
            .iter()
            .map(String::as_str)
            .chain(profile.skills.iter().copied())
        {
            if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                skills.push(skill.to_string());
            }
        }
        skills.truncate(MAX_SKILLS);

        let role = match lead_terms.first() {
            Some(term) if !contains_ci(profile.role, term) => format!("{term} Developer"),
            _ => profile.role.to_string(),
        };

        let location = match (&query.city, &query.country) {
            (city, country) if !is_blank(city) && !is_blank(country) => format!(
                "{}, {}",
                city.as_deref().unwrap_or_default().trim(),
                country.as_deref().unwrap_or_default().trim()
            ),
            (city, _) if !is_blank(city) => {
                format!("{}, {}", city.as_deref().unwrap_or_default().trim(), profile.country)
            }
            (_, country) if !is_blank(country) => {
                format!("{}, {}", profile.city, country.as_deref().unwrap_or_default().trim())
            }
            _ if !is_blank(&query.region) => {
                query.region.as_deref().unwrap_or_default().trim().to_string()
            }
            _ => format!("{}, {}", profile.city, profile.country),
        };

        let mut years = profile.years;
        if let Some(min) = query.min_experience {
            years = years.max(min);
        }
        if let Some(max) = query.max_experience {
            years = years.min(max);
        }
        let rate = (u64::from(years) * 10 + 50).min(200);

        CanonicalCandidate {
            id: format!("mock-{}", index + 1),
            name: profile.name.to_string(),
            image: profile.image.to_string(),
            role,
            location,
            rating: f64::from(rng.gen_range(42..=50u32)) / 10.0,
            reviews: rng.gen_range(8..=120),
            rate: format!("${rate}"),
            skills,
            experience: format!("{years}+ years experience"),
            availability: Some(
                query
                    .availability
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .unwrap_or(profile.availability)
                    .to_string(),
            ),
            status: Some("sample".to_string()),
            match_score: Some(f64::from(rng.gen_range(70..=98u32))),
        }
    }

    fn known_technology(&self, term: &str) -> Option<String> {
        self.pool
            .iter()
            .flat_map(|p| p.skills.iter())
            .find(|s| s.eq_ignore_ascii_case(term))
            .map(|s| s.to_string())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive substring match in either direction.
pub fn term_matches(skill: &str, term: &str) -> bool {
    let skill = skill.to_lowercase();
    let term = term.to_lowercase();
    skill.contains(&term) || term.contains(&skill)
}

/// True when every required term is matched by some skill.
pub fn covers_all(skills: &[String], required: &[String]) -> bool {
    required
        .iter()
        .all(|term| skills.iter().any(|skill| term_matches(skill, term)))
}
