//! Plain-text rendering of search results and filter metadata.

use std::fmt::Write;

use talent_search::{FilterOptions, HttpRequestSpec, SearchResult};

/// Render a result as a numbered candidate list with a status footer.
pub fn result_text(result: &SearchResult) -> String {
    let mut out = String::new();

    if let Some(reason) = &result.degradation_reason {
        let _ = writeln!(out, "  ! {reason}");
        let _ = writeln!(out);
    }

    if result.candidates.is_empty() {
        let _ = writeln!(out, "  No candidates found.");
    }

    for (i, c) in result.candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. {}  ·  {}  ·  {}",
            i + 1,
            c.name,
            c.role,
            c.location
        );
        let _ = writeln!(
            out,
            "       {} · {:.1}★ ({} reviews) · {}",
            c.rate, c.rating, c.reviews, c.experience
        );
        if !c.skills.is_empty() {
            let _ = writeln!(out, "       skills: {}", c.skills.join(", "));
        }
        let mut extras = Vec::new();
        if let Some(a) = &c.availability {
            extras.push(a.clone());
        }
        if let Some(score) = c.match_score {
            extras.push(format!("{score:.0}% match"));
        }
        if !extras.is_empty() {
            let _ = writeln!(out, "       {}", extras.join(" · "));
        }
    }

    let p = result.pagination;
    let page_label = if p.total_pages == 0 {
        "page 0 of 0".to_string()
    } else {
        format!("page {} of {}", p.current_page + 1, p.total_pages)
    };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} total · {page_label} · mode {} · source {:?}",
        p.total_results, result.mode, result.source
    );
    out
}

/// Render a request spec as `METHOD target` plus any JSON body.
pub fn request_text(label: &str, spec: &HttpRequestSpec) -> String {
    let mut out = format!("  {label}: {:?} {}", spec.method, spec.display_target());
    if let Some(body) = &spec.body {
        let body = serde_json::to_string(body).unwrap_or_default();
        let _ = write!(out, "\n    body: {body}");
    }
    out.push('\n');
    out
}

/// Render filter metadata, one line per non-empty filter.
pub fn filters_text(options: &FilterOptions) -> String {
    let mut out = String::new();
    let rows: [(&str, &Vec<String>); 7] = [
        ("Technologies", &options.technologies),
        ("Domains", &options.domains),
        ("Regions", &options.regions),
        ("Countries", &options.countries),
        ("Cities", &options.cities),
        ("Availability", &options.availability),
        ("Certifications", &options.certifications),
    ];
    for (label, values) in rows {
        if !values.is_empty() {
            let _ = writeln!(out, "  {label:<15} {}", values.join(", "));
        }
    }
    if out.is_empty() {
        out.push_str("  No filter options available.\n");
    }
    out
}
