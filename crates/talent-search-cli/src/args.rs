//! Query flags shared by the `search` command.

use clap::{Args, ValueEnum};

use talent_search::{MatchLogic, SearchQuery, DEFAULT_PAGE_SIZE};

/// Matching logic requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogicArg {
    And,
    Or,
}

impl From<LogicArg> for MatchLogic {
    fn from(value: LogicArg) -> Self {
        match value {
            LogicArg::And => MatchLogic::And,
            LogicArg::Or => MatchLogic::Or,
        }
    }
}

/// Free text plus structured filters.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Search text. Separate terms with commas to require all of them.
    pub term: Option<String>,

    /// Technology filter. Repeat for several; more than one means AND.
    #[arg(long = "tech", value_name = "TECH")]
    pub technologies: Vec<String>,

    /// Domain experience (e.g. "Banking").
    #[arg(long)]
    pub domain: Option<String>,

    /// Minimum years of experience.
    #[arg(long)]
    pub min_exp: Option<u32>,

    /// Maximum years of experience.
    #[arg(long)]
    pub max_exp: Option<u32>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// Availability (e.g. "Immediate").
    #[arg(long)]
    pub availability: Option<String>,

    #[arg(long)]
    pub certification: Option<String>,

    /// Force AND or OR matching of the emulated fallback results.
    #[arg(long, value_enum)]
    pub logic: Option<LogicArg>,

    /// Page number (0-based).
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Results per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub size: u32,
}

impl QueryArgs {
    /// Build the search query these flags describe.
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            raw_term: self.term.clone().unwrap_or_default(),
            selected_technologies: self
                .technologies
                .iter()
                .flat_map(|t| t.split(','))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            domain_experience: self.domain.clone(),
            min_experience: self.min_exp,
            max_experience: self.max_exp,
            region: self.region.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            availability: self.availability.clone(),
            certification: self.certification.clone(),
            explicit_mode: self.logic.map(MatchLogic::from),
            page: self.page,
            size: self.size.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use talent_search::{select_mode, QueryMode};

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        query: QueryArgs,
    }

    fn parse(args: &[&str]) -> SearchQuery {
        let mut argv = vec!["harness"];
        argv.extend_from_slice(args);
        Harness::parse_from(argv).query.to_query()
    }

    #[test]
    fn test_term_only_is_simple() {
        let q = parse(&["Sarah"]);
        assert_eq!(q.raw_term, "Sarah");
        assert_eq!(q.size, DEFAULT_PAGE_SIZE);
        assert_eq!(select_mode(&q), QueryMode::SimpleOr);
    }

    #[test]
    fn test_repeated_and_comma_techs() {
        let q = parse(&["--tech", "Appian", "--tech", "Mendix, Pega"]);
        assert_eq!(q.selected_technologies, vec!["Appian", "Mendix", "Pega"]);
        assert_eq!(select_mode(&q), QueryMode::CommaAnd);
    }

    #[test]
    fn test_filters_and_logic() {
        let q = parse(&["--city", "Lyon", "--min-exp", "3", "--logic", "and", "--page", "2"]);
        assert_eq!(q.city.as_deref(), Some("Lyon"));
        assert_eq!(q.min_experience, Some(3));
        assert_eq!(q.explicit_mode, Some(MatchLogic::And));
        assert_eq!(q.page, 2);
        assert_eq!(select_mode(&q), QueryMode::CrossFieldOr);
    }
}
