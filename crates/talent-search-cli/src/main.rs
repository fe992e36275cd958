//! talent-search CLI entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use talent_search::{
    build, build_secondary, select_mode, HttpRequestSpec, HttpTransport, QueryMode,
    SearchEngine, SearchSession, StaticToken, DEFAULT_TIMEOUT_MS,
};
use talent_search_cli::config::{resolve_api_url, resolve_token};
use talent_search_cli::{render, repl, QueryArgs};

#[derive(Parser)]
#[command(
    name = "talent-search",
    about = "Search low-code talent with automatic fallback to sample profiles",
    version
)]
struct Cli {
    /// API base URL. Also reads TALENT_API_URL or TALENT_API_ORIGIN.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token. Also reads TALENT_API_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the results.
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Seed for generated placeholder values.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the requests that would be sent, without sending them.
        #[arg(long)]
        dry_run: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show the values available for each filter.
    Filters {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Launch interactive REPL mode.
    Repl,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   talent-search completions bash > ~/.local/share/bash-completion/completions/talent-search
    ///   talent-search completions zsh > ~/.zfunc/_talent-search
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Serialize)]
struct DryRun<'a> {
    mode: QueryMode,
    primary: &'a HttpRequestSpec,
    fallback: Option<&'a HttpRequestSpec>,
}

fn engine(cli: &Cli, seed: Option<u64>) -> anyhow::Result<SearchEngine<HttpTransport>> {
    let base_url = resolve_api_url(cli.api_url.as_deref());
    let mut transport = HttpTransport::new(&base_url, cli.timeout_ms)?;
    if let Some(token) = resolve_token(cli.token.as_deref()) {
        tracing::debug!("Auth: bearer token configured");
        transport = transport.with_token_provider(Arc::new(StaticToken(token)));
    }
    tracing::info!("API: {base_url}");

    let engine = SearchEngine::new(transport);
    Ok(match seed {
        Some(seed) => engine.with_seed(seed),
        None => engine,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Search {
            query,
            seed,
            dry_run,
            json,
        } => {
            let query = query.to_query();
            for warning in query.warnings() {
                eprintln!("Warning: {warning}");
            }

            if *dry_run {
                let mode = select_mode(&query);
                let primary = build(&query, mode);
                let fallback = build_secondary(&query, mode);
                if *json {
                    let plan = DryRun {
                        mode,
                        primary: &primary,
                        fallback: fallback.as_ref(),
                    };
                    println!("{}", serde_json::to_string_pretty(&plan)?);
                } else {
                    println!("  mode: {mode}");
                    print!("{}", render::request_text("primary", &primary));
                    match &fallback {
                        Some(spec) => print!("{}", render::request_text("fallback", spec)),
                        None => println!("  fallback: none (sample profiles)"),
                    }
                }
                return Ok(());
            }

            let result = engine(&cli, *seed)?.search(&query).await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::result_text(&result));
            }
        }

        Commands::Filters { json } => {
            let options = engine(&cli, None)?.filter_options().await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print!("{}", render::filters_text(&options));
            }
        }

        Commands::Repl => {
            let session = SearchSession::new(Arc::new(engine(&cli, None)?));
            let handle = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || repl::run(handle, session)).await??;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "talent-search", &mut std::io::stdout());
        }
    }

    Ok(())
}
