//! reviewfeed - headless review feed runner

use clap::Parser;
use reviewfeed::geometry::Size;
use reviewfeed::integration::{load_row_images, simulate_feed, SimulationOptions};
use reviewfeed::layout::{LayoutEngine, LayoutParams, MonospaceMeasurer, RowHeights};
use reviewfeed::model::{AppError, InputError, RatingRenderer};
use reviewfeed::pagination::{
    DataProvider, HttpProvider, JsonFileProvider, PaginationController, PrefetchPolicy, RowMapper,
};
use reviewfeed::resource::{HttpFetcher, ResourceCache, ResourceLoader};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// reviewfeed - load a paginated review feed, lay it out and print it
#[derive(Parser, Debug)]
#[command(name = "reviewfeed")]
#[command(version)]
#[command(about = "Headless runner for an infinite-scrolling review feed")]
pub struct Args {
    /// Path to a JSON page file holding every review
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Fetch pages from this endpoint instead (GET ?offset=&limit=)
    #[arg(long)]
    pub url: Option<String>,

    /// Viewport width in points
    #[arg(long, default_value = "375", value_parser = parse_dimension)]
    pub width: f64,

    /// Viewport height in points
    #[arg(long, default_value = "812", value_parser = parse_dimension)]
    pub height: f64,

    /// Items per page (overrides config)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Body lines shown before a review is expanded (overrides config)
    #[arg(long)]
    pub collapsed_lines: Option<usize>,

    /// Expand the row at this index once loaded (repeatable)
    #[arg(short, long)]
    pub expand: Vec<usize>,

    /// Fetch avatars and attachments of the loaded rows
    #[arg(long)]
    pub fetch_images: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_dimension(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{raw:?}: {e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number, got {raw}"))
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = reviewfeed::config::resolve(
        args.config.clone(),
        args.limit.map(|limit| limit as usize),
        args.collapsed_lines,
    )?;

    reviewfeed::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let provider: Box<dyn DataProvider> = match (&args.url, &args.file) {
        (Some(url), _) => Box::new(HttpProvider::new(url.clone(), timeout)?),
        (None, Some(path)) => Box::new(
            JsonFileProvider::open(path)?
                .with_latency(Duration::from_millis(config.provider_latency_ms)),
        ),
        (None, None) => {
            return Err(InputError::Client {
                reason: "no data source given".to_string(),
            }
            .into())
        }
    };

    let params = LayoutParams::default();
    let mapper = RowMapper::new(
        RatingRenderer::default(),
        params.avatar_size,
        config.collapsed_lines,
    );
    let mut controller = PaginationController::new(provider, mapper, config.page_limit)
        .with_prefetch_policy(PrefetchPolicy::new(config.prefetch_screens));
    let engine = LayoutEngine::new(MonospaceMeasurer::default(), params);
    let mut heights = RowHeights::new(config.layout_cache_capacity);

    let options = SimulationOptions {
        viewport: Size::new(args.width, args.height),
        expand: args.expand.clone(),
        page_timeout: timeout,
    };
    let report = simulate_feed(&mut controller, &engine, &mut heights, &options);
    println!("{report}");

    if args.fetch_images {
        let fetcher = HttpFetcher::new(timeout).map_err(|e| InputError::Client {
            reason: e.to_string(),
        })?;
        let mut loader = ResourceLoader::new(ResourceCache::new(config.image_cache_capacity), fetcher);
        let summary = load_row_images(&mut loader, controller.state().items(), timeout);
        info!(?summary, "Images fetched");
        println!(
            "-- images: {} requested, {} cached, {} loaded, {} failed",
            summary.requested, summary.cached, summary.loaded, summary.failed
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["reviewfeed", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["reviewfeed", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_file_defaults() {
        let args = Args::parse_from(["reviewfeed", "reviews.json"]);
        assert_eq!(args.file, Some(PathBuf::from("reviews.json")));
        assert_eq!(args.url, None);
        assert_eq!(args.width, 375.0);
        assert_eq!(args.height, 812.0);
        assert_eq!(args.limit, None);
        assert!(args.expand.is_empty());
        assert!(!args.fetch_images);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_source_is_required() {
        let err = Args::try_parse_from(["reviewfeed"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_url_replaces_file() {
        let args = Args::parse_from(["reviewfeed", "--url", "http://localhost/reviews"]);
        assert_eq!(args.url.as_deref(), Some("http://localhost/reviews"));
        assert_eq!(args.file, None);
    }

    #[test]
    fn test_file_and_url_conflict() {
        let result = Args::try_parse_from(["reviewfeed", "r.json", "--url", "http://x"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_expand_is_repeatable() {
        let args = Args::parse_from(["reviewfeed", "r.json", "-e", "1", "--expand", "4"]);
        assert_eq!(args.expand, vec![1, 4]);
    }

    #[test]
    fn test_limit_rejects_zero() {
        let err = Args::try_parse_from(["reviewfeed", "r.json", "-l", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_width_rejects_non_positive() {
        for width in ["0", "-5", "wide"] {
            let result = Args::try_parse_from(["reviewfeed", "r.json", "--width", width]);
            assert!(result.is_err(), "{width} should be rejected");
        }
    }

    #[test]
    fn test_limit_flows_through_config_precedence_chain() {
        use reviewfeed::config::{apply_cli_overrides, merge_config, ConfigFile};

        let file = ConfigFile {
            page_limit: Some(50),
            ..ConfigFile::default()
        };
        let args = Args::parse_from(["reviewfeed", "r.json", "--limit", "10"]);

        let merged = merge_config(Some(file));
        assert_eq!(merged.page_limit, 50, "Config file should override default");

        let with_cli = apply_cli_overrides(merged, args.limit.map(|l| l as usize), None);
        assert_eq!(with_cli.page_limit, 10, "CLI should override all other sources");
    }
}
