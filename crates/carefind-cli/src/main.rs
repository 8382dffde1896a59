use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use carefind_client::ReqwestFetcher;
use carefind_core::config::{
    DEFAULT_BASE_URL, DEFAULT_QUERY_PARAM, DEFAULT_SEARCH_PATH, SiteConfig,
};
use carefind_core::models::ListingReference;
use carefind_core::retry::RetryConfig;
use carefind_core::selectors::SelectorTable;
use carefind_core::traits::NullSink;
use carefind_core::Harvester;
use carefind_sink::CsvSink;

const DEFAULT_POSTAL_CODES: [&str; 3] = ["73012", "73013", "73020"];

#[derive(Parser)]
#[command(name = "carefind", version, about = "Child care provider listing harvester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search each postal code and write every listing to a CSV table
    Scrape {
        /// Postal code to search (repeatable, processed in order)
        #[arg(short, long = "zip", value_name = "CODE")]
        zips: Vec<String>,

        /// Output CSV file
        #[arg(short, long, env = "CAREFIND_OUTPUT", default_value = "output_data.csv")]
        output: PathBuf,

        /// Truncate the output table instead of continuing it
        #[arg(long, default_value_t = false)]
        overwrite: bool,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Extract a single listing and print it as JSON
    Extract {
        /// Listing URL, absolute or relative to the base URL (e.g. "/providers/123")
        #[arg(short, long)]
        url: String,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Print the effective selector table as JSON
    Selectors {
        /// Selector override file (JSON); absent keys keep their defaults
        #[arg(short, long, env = "CAREFIND_SELECTORS")]
        selectors: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SiteArgs {
    /// Base URL of the listing site
    #[arg(short, long, env = "CAREFIND_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Search page path, relative to the base URL
    #[arg(long, env = "CAREFIND_SEARCH_PATH", default_value = DEFAULT_SEARCH_PATH)]
    search_path: String,

    /// Query parameter carrying the postal code on the search page
    #[arg(long, env = "CAREFIND_QUERY_PARAM", default_value = DEFAULT_QUERY_PARAM)]
    query_param: String,

    /// Selector override file (JSON); absent keys keep their defaults
    #[arg(short, long, env = "CAREFIND_SELECTORS")]
    selectors: Option<PathBuf>,

    /// Pause after each listing, in milliseconds
    #[arg(long, env = "CAREFIND_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// Retries per page after a transient failure (0 = single attempt)
    #[arg(long, env = "CAREFIND_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// HTTP timeout per request, in seconds
    #[arg(long, env = "CAREFIND_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

impl SiteArgs {
    fn site_config(&self) -> Result<SiteConfig> {
        let site = SiteConfig::new(&self.base_url)
            .map_err(|e| anyhow::anyhow!(e))?
            .with_search(&self.search_path, &self.query_param)
            .with_pace(Duration::from_millis(self.delay_ms))
            .with_retry(RetryConfig::new(self.max_retries));
        Ok(site)
    }

    fn fetcher(&self) -> Result<ReqwestFetcher> {
        ReqwestFetcher::with_timeout(Duration::from_secs(self.timeout_secs))
            .map_err(|e| anyhow::anyhow!(e))
            .context("Failed to create HTTP client")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("carefind=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            zips,
            output,
            overwrite,
            site,
        } => {
            let zips = if zips.is_empty() {
                DEFAULT_POSTAL_CODES.map(String::from).to_vec()
            } else {
                zips
            };
            cmd_scrape(&zips, &output, overwrite, &site).await?;
        }
        Commands::Extract { url, site } => {
            cmd_extract(&url, &site).await?;
        }
        Commands::Selectors { selectors } => {
            let table = load_selectors(selectors.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
    }

    Ok(())
}

fn load_selectors(path: Option<&Path>) -> Result<SelectorTable> {
    match path {
        Some(path) => SelectorTable::from_json_file(path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Failed to load selectors from {}", path.display())),
        None => Ok(SelectorTable::default()),
    }
}

/// Open the output table: continue it by default, truncate it on `--overwrite`.
fn open_sink(output: &Path, overwrite: bool) -> Result<CsvSink> {
    let sink = if overwrite {
        CsvSink::create(output)
    } else {
        CsvSink::open_append(output)
    };
    sink.map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("Failed to open output table {}", output.display()))
}

async fn cmd_scrape(
    zips: &[String],
    output: &Path,
    overwrite: bool,
    args: &SiteArgs,
) -> Result<()> {
    let table = load_selectors(args.selectors.as_deref())?;
    let (listings, records) = carefind_client::parsers(&table).map_err(|e| anyhow::anyhow!(e))?;
    let site = args.site_config()?;
    let fetcher = args.fetcher()?;

    let sink = open_sink(output, overwrite)?;

    tracing::info!(postal_codes = ?zips, output = %output.display(), "Starting run");

    let mut harvester = Harvester::new(fetcher, listings, records, sink, site);
    let summary = harvester
        .run(zips)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("Run aborted while writing {}", output.display()))?;

    println!("{summary}");
    println!(
        "Table: {} ({} rows this run)",
        output.display(),
        harvester.sink().rows_written()
    );

    Ok(())
}

async fn cmd_extract(url: &str, args: &SiteArgs) -> Result<()> {
    let table = load_selectors(args.selectors.as_deref())?;
    let (listings, records) = carefind_client::parsers(&table).map_err(|e| anyhow::anyhow!(e))?;
    let site = args.site_config()?;
    let fetcher = args.fetcher()?;

    let harvester = Harvester::new(fetcher, listings, records, NullSink, site);
    let record = harvester
        .extract(&ListingReference::new(url))
        .await
        .with_context(|| format!("Could not fetch listing {url}"))?;

    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
