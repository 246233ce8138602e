use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{builder::ArgAction, Parser, ValueEnum};
use console::style;
use dialoguer::Input;
use pubmed_fetch::{ClientConfig, DownloadConfig, DownloadMethod, Fetcher, WebDriverProvider};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Parser)]
#[command(
    name = "pubmed-fetch",
    about = "Search PubMed and download free-full-text PDFs from PMC",
    long_about = "Searches PubMed for free-full-text articles, converts PMIDs to PMC IDs, \
saves a JSON record of the results, and downloads each article's PDF via a \
WebDriver-controlled browser session."
)]
struct Cli {
    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory that receives PDFs and the results file
    #[arg(long, env = "PUBMED_FETCH_DIR", default_value = "downloads")]
    download_dir: PathBuf,

    /// WebDriver server URL (chromedriver)
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Contact email sent with NCBI ID Converter requests
    #[arg(long, env = "NCBI_EMAIL", default_value = "user@example.com")]
    email: String,

    /// Tool name sent with NCBI ID Converter requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pubmed-fetch")]
    tool: String,

    /// How located PDFs are fetched
    #[arg(long, value_enum, default_value = "browser")]
    method: Method,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Click the download link and let the browser save the file
    Browser,
    /// Read the link target and download it over HTTP
    Http,
}

impl From<Method> for DownloadMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Browser => DownloadMethod::Browser,
            Method::Http => DownloadMethod::Http,
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Non-integer input silently falls back to the default count
fn parse_count(input: &str) -> usize {
    input.trim().parse().unwrap_or(DEFAULT_MAX_RESULTS)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    println!("{}", style("PubMed PDF downloader").bold());
    println!("{}", style("=".repeat(40)).dim());

    let term: String = Input::new()
        .with_prompt("Enter your search term")
        .allow_empty(true)
        .interact_text()?;
    let term = term.trim().to_string();

    if term.is_empty() {
        println!("{}", style("No search term provided. Exiting.").yellow());
        return Ok(());
    }

    let count_input: String = Input::new()
        .with_prompt(format!(
            "Number of papers to download (default {DEFAULT_MAX_RESULTS})"
        ))
        .allow_empty(true)
        .interact_text()?;
    let max_results = parse_count(&count_input);

    let download_dir = if cli.download_dir.is_absolute() {
        cli.download_dir.clone()
    } else {
        env::current_dir()?.join(&cli.download_dir)
    };

    let client_config = ClientConfig::new()
        .with_tool(cli.tool.as_str())
        .with_email(cli.email.as_str());
    let download_config = DownloadConfig::new(&download_dir)
        .with_webdriver_url(cli.webdriver_url.as_str())
        .with_method(cli.method.into());

    let provider = WebDriverProvider::new(cli.webdriver_url.as_str(), &download_dir);
    let fetcher = Fetcher::new(client_config, download_config);

    let report = fetcher.run(&term, max_results, &provider).await?;

    println!();
    println!("{}", style("=".repeat(60)).dim());
    println!("{}", style("Download summary").bold());
    println!("Search term:          {}", report.search_term);
    println!("Total papers found:   {}", report.total_papers);
    println!(
        "Successful downloads: {}",
        style(report.succeeded).green().bold()
    );
    if report.succeeded < report.attempted {
        println!(
            "Failed downloads:     {}",
            style(report.attempted - report.succeeded).red()
        );
    }
    println!("Results file:         {}", report.bundle_path.display());
    println!("Download directory:   {}", download_dir.display());
    println!("{}", style("=".repeat(60)).dim());

    Ok(())
}
