//! Interactive search REPL.
//!
//! Launch with `talent-search repl`. Plain text searches; slash commands edit
//! the current query and re-run it. Type `/help` for commands, Tab for
//! completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use tokio::runtime::Handle;

use talent_search::{
    build, build_secondary, reduce, select_mode, MatchLogic, QueryAction, SearchOutcome,
    SearchQuery, SearchSession, Transport,
};

use crate::render;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/tech", "Add a technology filter"),
    ("/untech", "Remove a technology filter"),
    ("/domain", "Set domain experience (empty to clear)"),
    ("/exp", "Set experience range: /exp <min|-> <max|->"),
    ("/region", "Set region (empty to clear)"),
    ("/city", "Set city (empty to clear)"),
    ("/country", "Set country (empty to clear)"),
    ("/availability", "Set availability (empty to clear)"),
    ("/cert", "Set certification (empty to clear)"),
    ("/logic", "Force matching logic: and, or, auto"),
    ("/page", "Go to a result page (0-based)"),
    ("/clear", "Clear all filters, keep the search text"),
    ("/reset", "Start over with an empty query"),
    ("/show", "Show the current query and the requests it builds"),
    ("/filters", "Show available filter values"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Plain text: set the search term and search.
    Search(String),
    /// Edit the query, then search.
    Apply(QueryAction),
    Show,
    Filters,
    Help,
    Exit,
    /// A known command used wrongly; carries the usage line.
    Usage(&'static str),
    Unknown(String),
    Empty,
}

/// Parse one line of input.
pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }

    let Some(input) = line.strip_prefix('/') else {
        return ReplCommand::Search(line.to_string());
    };
    if input.is_empty() {
        return ReplCommand::Help;
    }

    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();
    let value = || (!args.is_empty()).then(|| args.to_string());

    match cmd {
        "exit" | "quit" => ReplCommand::Exit,
        "help" | "h" | "?" => ReplCommand::Help,
        "show" => ReplCommand::Show,
        "filters" => ReplCommand::Filters,
        "clear" => ReplCommand::Apply(QueryAction::ClearFilters),
        "reset" => ReplCommand::Apply(QueryAction::Reset),
        "tech" if !args.is_empty() => {
            ReplCommand::Apply(QueryAction::AddTechnology(args.to_string()))
        }
        "tech" => ReplCommand::Usage("/tech <technology>"),
        "untech" if !args.is_empty() => {
            ReplCommand::Apply(QueryAction::RemoveTechnology(args.to_string()))
        }
        "untech" => ReplCommand::Usage("/untech <technology>"),
        "domain" => ReplCommand::Apply(QueryAction::SetDomainExperience(value())),
        "region" => ReplCommand::Apply(QueryAction::SetRegion(value())),
        "city" => ReplCommand::Apply(QueryAction::SetCity(value())),
        "country" => ReplCommand::Apply(QueryAction::SetCountry(value())),
        "availability" => ReplCommand::Apply(QueryAction::SetAvailability(value())),
        "cert" => ReplCommand::Apply(QueryAction::SetCertification(value())),
        "exp" => parse_experience(args),
        "logic" => match args.to_ascii_lowercase().as_str() {
            "and" => ReplCommand::Apply(QueryAction::SetExplicitMode(Some(MatchLogic::And))),
            "or" => ReplCommand::Apply(QueryAction::SetExplicitMode(Some(MatchLogic::Or))),
            "auto" | "" => ReplCommand::Apply(QueryAction::SetExplicitMode(None)),
            _ => ReplCommand::Usage("/logic <and|or|auto>"),
        },
        "page" => match args.parse::<u32>() {
            Ok(page) => ReplCommand::Apply(QueryAction::SetPage(page)),
            Err(_) => ReplCommand::Usage("/page <number>"),
        },
        _ => ReplCommand::Unknown(cmd.to_string()),
    }
}

fn parse_experience(args: &str) -> ReplCommand {
    const USAGE: &str = "/exp <min|-> <max|->";
    let bound = |s: Option<&str>| -> Result<Option<u32>, ()> {
        match s {
            None | Some("-") | Some("any") => Ok(None),
            Some(n) => n.parse().map(Some).map_err(|_| ()),
        }
    };
    let mut it = args.split_whitespace();
    match (bound(it.next()), bound(it.next())) {
        (Ok(min), Ok(max)) => ReplCommand::Apply(QueryAction::SetExperienceRange { min, max }),
        _ => ReplCommand::Usage(USAGE),
    }
}

/// REPL helper for tab completion.
struct SearchHelper {
    technologies: Vec<String>,
}

impl Completer for SearchHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if input.starts_with('/') && !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // technology completion
        let mut parts = input.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("");
        let args = parts.next().unwrap_or("");

        if cmd == "/tech" || cmd == "/untech" {
            let prefix = args.trim_start().to_lowercase();
            let prefix_start = input.len() - args.trim_start().len();
            let matches: Vec<Pair> = self
                .technologies
                .iter()
                .filter(|t| t.to_lowercase().starts_with(&prefix))
                .map(|t| Pair {
                    display: t.clone(),
                    replacement: t.clone(),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for SearchHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for SearchHelper {}
impl Validator for SearchHelper {}
impl Helper for SearchHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL.
///
/// Blocks the calling thread; searches are driven on `handle`, so call this
/// from a blocking context (e.g. `spawn_blocking`).
pub fn run<T: Transport + 'static>(
    handle: Handle,
    session: SearchSession<T>,
) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mtalent-search v{}\x1b[0m \x1b[90mfind low-code experts\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Type to search, \x1b[36m/\x1b[0m for commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let filter_options = handle.block_on(session.engine().filter_options());

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<SearchHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(SearchHelper {
        technologies: filter_options.technologies.clone(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".talent_search_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut query = SearchQuery::default();
    let prompt = " \x1b[36msearch>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => match parse_line(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Exit => {
                    eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                    break;
                }
                ReplCommand::Help => cmd_help(),
                ReplCommand::Show => cmd_show(&query),
                ReplCommand::Filters => eprint!("{}", render::filters_text(&filter_options)),
                ReplCommand::Usage(usage) => eprintln!("  Usage: {usage}"),
                ReplCommand::Unknown(cmd) => {
                    eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                }
                ReplCommand::Search(term) => {
                    query = reduce(&query, QueryAction::SetTerm(term));
                    cmd_search(&handle, &session, &query);
                }
                ReplCommand::Apply(action) => {
                    query = reduce(&query, action);
                    cmd_search(&handle, &session, &query);
                }
            },
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_search<T: Transport>(handle: &Handle, session: &SearchSession<T>, query: &SearchQuery) {
    match handle.block_on(session.run(query)) {
        SearchOutcome::Applied(result) => {
            eprintln!();
            print!("{}", render::result_text(&result));
            eprintln!();
        }
        SearchOutcome::Stale => {
            tracing::debug!("REPL search superseded before it finished");
        }
    }
}

fn cmd_show(query: &SearchQuery) {
    let mode = select_mode(query);
    eprintln!();
    eprintln!("  Term:         {:?}", query.raw_term);
    eprintln!("  Technologies: {}", query.selected_technologies.join(", "));
    for (label, value) in [
        ("Domain", &query.domain_experience),
        ("Region", &query.region),
        ("City", &query.city),
        ("Country", &query.country),
        ("Availability", &query.availability),
        ("Certification", &query.certification),
    ] {
        if let Some(v) = value {
            eprintln!("  {:<13} {v}", format!("{label}:"));
        }
    }
    if query.min_experience.is_some() || query.max_experience.is_some() {
        let fmt = |v: Option<u32>| v.map_or("-".to_string(), |n| n.to_string());
        eprintln!(
            "  Experience:   {} .. {} years",
            fmt(query.min_experience),
            fmt(query.max_experience)
        );
    }
    if let Some(logic) = query.explicit_mode {
        eprintln!("  Logic:        {}", logic.as_str());
    }
    for warning in query.warnings() {
        eprintln!("  \x1b[33mWarning:\x1b[0m {warning}");
    }
    eprintln!("  Page:         {} (size {})", query.page, query.size);
    eprintln!("  Mode:         {mode}");
    eprintln!();
    eprint!("{}", render::request_text("primary", &build(query, mode)));
    match build_secondary(query, mode) {
        Some(spec) => eprint!("{}", render::request_text("fallback", &spec)),
        None => eprintln!("  fallback: none (sample profiles)"),
    }
    eprintln!();
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: separate terms with commas to require all of them.");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_searches() {
        assert_eq!(parse_line("  Appian, Mendix "), ReplCommand::Search("Appian, Mendix".into()));
        assert_eq!(parse_line("   "), ReplCommand::Empty);
        assert_eq!(parse_line("/"), ReplCommand::Help);
    }

    #[test]
    fn test_filter_commands() {
        assert_eq!(
            parse_line("/tech Power Apps"),
            ReplCommand::Apply(QueryAction::AddTechnology("Power Apps".into()))
        );
        assert_eq!(parse_line("/tech"), ReplCommand::Usage("/tech <technology>"));
        assert_eq!(parse_line("/city"), ReplCommand::Apply(QueryAction::SetCity(None)));
        assert_eq!(
            parse_line("/country New Zealand"),
            ReplCommand::Apply(QueryAction::SetCountry(Some("New Zealand".into())))
        );
    }

    #[test]
    fn test_experience_and_page() {
        assert_eq!(
            parse_line("/exp 3 -"),
            ReplCommand::Apply(QueryAction::SetExperienceRange { min: Some(3), max: None })
        );
        assert_eq!(
            parse_line("/exp"),
            ReplCommand::Apply(QueryAction::SetExperienceRange { min: None, max: None })
        );
        assert!(matches!(parse_line("/exp three"), ReplCommand::Usage(_)));
        assert_eq!(parse_line("/page 2"), ReplCommand::Apply(QueryAction::SetPage(2)));
        assert!(matches!(parse_line("/page x"), ReplCommand::Usage(_)));
    }

    #[test]
    fn test_logic_and_unknown() {
        assert_eq!(
            parse_line("/logic AND"),
            ReplCommand::Apply(QueryAction::SetExplicitMode(Some(MatchLogic::And)))
        );
        assert_eq!(
            parse_line("/logic auto"),
            ReplCommand::Apply(QueryAction::SetExplicitMode(None))
        );
        assert_eq!(parse_line("/bogus"), ReplCommand::Unknown("bogus".into()));
        assert_eq!(parse_line("/quit"), ReplCommand::Exit);
    }
}
