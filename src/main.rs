use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use polymatch::{
    cache::MarketCache,
    client::{
        raw::RawRecord, EventQuery, GamesQuery, MarketQuery, PolyRouterClient, SeriesQuery,
        DEFAULT_MARKETS_LIMIT,
    },
    matching::{filter_matches, find_matches_with_report},
    monitoring::{self, Metrics},
    service::{Feed, MatchService},
    types::AppConfig,
    Match, Normalizer, Platform,
};

const DEFAULT_LOG_FILTER: &str =
    "polymatch=info,service=info,matcher=info,metrics=info,client=warn,normalizer=warn";

#[derive(Parser, Debug)]
#[command(name = "polymatch")]
#[command(about = "Match prediction markets across platforms and rank them by spread", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FeedKind {
    Markets,
    Events,
    Series,
    Games,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Match raw records from a JSON file, offline
    Match {
        /// JSON array of records tagged by `kind`
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Fetch a feed from PolyRouter and match it
    Fetch {
        #[arg(long, value_enum, default_value_t = FeedKind::Markets)]
        feed: FeedKind,
        #[arg(long, value_enum)]
        platform: Option<Platform>,
        /// Required for `--feed games` (nfl, nba, nhl, mlb)
        #[arg(long)]
        league: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Search open markets and match the results
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let settings = AppConfig::load(cli.config.as_deref())?;
    monitoring::logger::log_startup(&settings);

    match cli.command {
        Commands::Match {
            input,
            threshold,
            category,
            search,
            json,
        } => {
            let contents = fs::read_to_string(&input)
                .with_context(|| format!("failed to read input file at {}", input.display()))?;
            let records: Vec<RawRecord> = serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse records in {}", input.display()))?;

            let markets = Normalizer::new().normalize_all(&records);
            let report = find_matches_with_report(
                &markets,
                Some(threshold.unwrap_or(settings.matcher.threshold)),
            );
            monitoring::logger::log_match_summary(&report, 5);

            let matches = filter_matches(report.matches, category.as_deref(), search.as_deref());
            print_matches(&matches, json)?;
        }
        Commands::Fetch {
            feed,
            platform,
            league,
            limit,
            category,
            search,
            json,
        } => {
            let service = build_service(&settings)?;
            let matches = match (feed, platform) {
                (FeedKind::Markets, None) if search.is_none() => {
                    service
                        .matches_across(&Platform::ALL, limit.unwrap_or(DEFAULT_MARKETS_LIMIT))
                        .await?
                }
                _ => {
                    let feed = build_feed(feed, platform, league, limit, search)?;
                    service.matches(&feed).await?
                }
            };
            monitoring::log_metrics_snapshot(&service.metrics().snapshot());

            let matches = filter_matches(matches, category.as_deref(), None);
            print_matches(&matches, json)?;
        }
        Commands::Search { query, json } => {
            let service = build_service(&settings)?;
            let matches = service.search(&query).await?;
            monitoring::log_metrics_snapshot(&service.metrics().snapshot());
            print_matches(&matches, json)?;
        }
    }

    Ok(())
}

fn build_service(settings: &AppConfig) -> anyhow::Result<MatchService<PolyRouterClient>> {
    let client = PolyRouterClient::new(&settings.api).context("failed to build PolyRouter client")?;
    Ok(MatchService::new(
        client,
        MarketCache::new(settings.cache.ttl()),
        Metrics::new(),
        settings.matcher.clone(),
    ))
}

fn build_feed(
    kind: FeedKind,
    platform: Option<Platform>,
    league: Option<String>,
    limit: Option<u32>,
    search: Option<String>,
) -> anyhow::Result<Feed> {
    let feed = match kind {
        FeedKind::Markets => Feed::Markets(MarketQuery {
            platform,
            limit,
            search,
            ..Default::default()
        }),
        FeedKind::Events => Feed::Events(EventQuery {
            platform,
            limit,
            search,
            with_nested_markets: true,
            ..Default::default()
        }),
        FeedKind::Series => Feed::Series(SeriesQuery {
            platform,
            limit,
            search,
            ..Default::default()
        }),
        FeedKind::Games => {
            let Some(league) = league else {
                bail!("--league is required for --feed games");
            };
            Feed::Games(GamesQuery { league })
        }
    };
    Ok(feed)
}

fn print_matches(matches: &[Match], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("no matches");
        return Ok(());
    }

    println!("{:>7}  {:>9}  {:<12}  TITLE", "SPREAD", "PLATFORMS", "CATEGORY");
    for m in matches {
        println!(
            "{:>7.1}  {:>9}  {:<12}  {}",
            m.spread, m.platforms_count, m.event.category, m.event.normalized_title
        );
        for market in &m.event.markets {
            println!(
                "{:>7}  {:>9}  {:>11.1}%  {}",
                "",
                market.platform.display_name(),
                market.probability,
                market.link
            );
        }
    }
    Ok(())
}
