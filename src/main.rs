use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lead_email_finder::config::{find_config_file, load_config, Config};
use lead_email_finder::sources::SearxngSource;
use lead_email_finder::utils::{HttpClient, DEFAULT_USER_AGENT};
use lead_email_finder::{EmailFinder, RunResult, SearchTarget};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Lead Email Finder - find potential emails for a company or domain using SearXNG
#[derive(Parser, Debug)]
#[command(name = "lead-email-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find potential email addresses for a company or domain using SearXNG", long_about = None)]
#[command(
    after_help = "Example: lead-email-finder example.com --searx-url http://localhost:8080 --contact-name \"Jane Doe\" -f json -o emails.json"
)]
struct Cli {
    /// The company name or domain/URL (e.g., 'Example Corp', 'example.com')
    company_input: String,

    /// Base URL of the SearXNG instance
    #[arg(long, short = 's')]
    searx_url: Option<String>,

    /// Full name of the CEO or contact person to prioritize
    #[arg(long, short = 'c', alias = "ceo-name")]
    contact_name: Option<String>,

    /// Company domain, when the input is a company name
    #[arg(long, short = 'd')]
    domain: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Path to save the output to instead of printing it
    #[arg(long, short = 'o')]
    output_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum simultaneous search requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Result pages fetched per query
    #[arg(long)]
    pages: Option<usize>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(long, short)]
    quiet: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Full result as JSON
    Json,
    /// Only emails, one per line
    Txt,
    /// Human-readable table
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("lead_email_finder={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let base_url = config.search.base_url.clone().context(
        "No SearXNG base URL given; pass --searx-url or set LEAD_EMAIL_FINDER__SEARCH__BASE_URL",
    )?;

    let user_agent = config
        .search
        .user_agent
        .as_deref()
        .unwrap_or(DEFAULT_USER_AGENT);
    let http = HttpClient::with_options(user_agent, config.search.timeout())?;
    let source = SearxngSource::new(&base_url, http)?.with_page_delay(config.search.page_delay());
    let finder = EmailFinder::from_config(Arc::new(source), &config);

    let target = SearchTarget::resolve(
        cli.company_input.as_str(),
        cli.contact_name.as_deref(),
        cli.domain.as_deref(),
    );

    let start = Instant::now();
    let result = finder.find(&target).await;
    tracing::info!(
        "Email search finished in {:.2} seconds, found {} valid email(s)",
        start.elapsed().as_secs_f64(),
        result.found_emails.len()
    );

    let content = render(&result, cli.format)?;
    emit(&content, cli.output_file.as_deref());

    if result.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

/// Command-line flags win over file and environment settings
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.searx_url {
        config.search.base_url = Some(url.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.search.timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.search.max_concurrent = concurrency;
    }
    if let Some(pages) = cli.pages {
        config.search.pages_per_query = pages;
    }
}

fn render(result: &RunResult, format: OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Txt => render_txt(result),
        OutputFormat::Table => render_table(result),
    };
    Ok(content)
}

fn render_txt(result: &RunResult) -> String {
    if let Some(error) = &result.error {
        format!("Error: {}", error)
    } else if result.found_emails.is_empty() {
        "# No emails found".to_string()
    } else {
        result.found_emails.join("\n")
    }
}

fn render_table(result: &RunResult) -> String {
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Email").add_attribute(Attribute::Bold),
    ]);

    for (i, email) in result.found_emails.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(email)]);
    }

    let mut out = format!(
        "Search: {}\nDomain: {}\n",
        result.search_name,
        result.target_domain.as_deref().unwrap_or("-")
    );
    match &result.error {
        Some(error) => out.push_str(&format!("Error: {}", error)),
        None if result.found_emails.is_empty() => out.push_str("No emails found"),
        None => out.push_str(&table.to_string()),
    }
    out
}

/// Write to `path`, falling back to the console when the write fails
fn emit(content: &str, path: Option<&Path>) {
    let Some(path) = path else {
        println!("{}", content);
        return;
    };

    match write_output(content, path) {
        Ok(()) => tracing::info!("Output saved to: {}", path.display()),
        Err(e) => {
            tracing::error!("Failed to write output to '{}': {:#}", path.display(), e);
            println!("{}", content);
        }
    }
}

fn write_output(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
