//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_feed_adapter::CsvFeedAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_feed_adapter::JsonFeedAdapter;
use crate::adapters::json_render_adapter::{JsonRenderAdapter, chart_to_json};
use crate::adapters::system_clock::SystemClock;
use crate::domain::chart_config::{ChartConfig, DEFAULT_OUTPUT, FeedSource};
use crate::domain::config_validation::{
    parse_feed_date, parse_interval, parse_ma_windows, parse_source, parse_zone,
    validate_chart_config, validate_feed_config,
};
use crate::domain::demo::{MAX_DEMO_BARS, generate_demo};
use crate::domain::error::KlineError;
use crate::domain::indicator::{DEFAULT_MA_WINDOWS, overlays};
use crate::domain::interval::{FeedRequest, Interval};
use crate::domain::series::{ChartSeries, SeriesTransformer};
use crate::domain::timestamp::{LocalZone, TimestampParser, parse_compact_date};
use crate::ports::clock_port::Clock;
use crate::ports::config_port::ConfigPort;
use crate::ports::feed_port::FeedPort;
use crate::ports::render_port::RenderPort;

#[derive(Parser, Debug)]
#[command(name = "klineprep", about = "Kline feed normalizer and chart series builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch klines and write chart JSON
    Transform {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        interval: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the epoch seconds and form of one timestamp
    ParseTime {
        text: String,
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<String>,
    },
    /// Write a synthetic chart (stdout unless --output is given)
    Demo {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// First bar's day, YYYYMMDD
        #[arg(long, default_value = "20240101")]
        start: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Transform {
            config,
            code,
            interval,
            output,
        } => run_transform(&config, code.as_deref(), interval.as_deref(), output.as_ref()),
        Command::ParseTime { text, utc_offset } => run_parse_time(&text, utc_offset.as_deref()),
        Command::Demo {
            count,
            seed,
            start,
            output,
        } => run_demo(count, seed, &start, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn fail(err: &KlineError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

/// Builds a [`ChartConfig`] from the `[feed]` and `[chart]` sections.
pub fn build_chart_config(config: &dyn ConfigPort) -> Result<ChartConfig, KlineError> {
    validate_feed_config(config)?;
    validate_chart_config(config)?;

    let required = |key: &str| {
        config
            .get_string("feed", key)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| KlineError::ConfigMissing {
                section: "feed".into(),
                key: key.into(),
            })
    };

    Ok(ChartConfig {
        source: parse_source(config)?,
        data_dir: PathBuf::from(required("data_dir")?),
        request: FeedRequest {
            code: required("code")?,
            from: parse_feed_date(config, "from")?,
            to: parse_feed_date(config, "to")?,
            interval: parse_interval(config)?,
        },
        ma_windows: parse_ma_windows(config)?,
        zone: parse_zone(config)?,
        output: config
            .get_string("chart", "output")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
    })
}

/// Applies command-line overrides on top of the file configuration.
pub fn apply_overrides(
    mut config: ChartConfig,
    code: Option<&str>,
    interval: Option<&str>,
    output: Option<&PathBuf>,
) -> Result<ChartConfig, KlineError> {
    if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
        config.request.code = code.to_string();
    }
    if let Some(tag) = interval {
        config.request.interval = tag
            .parse::<Interval>()
            .map_err(|e| KlineError::ConfigInvalid {
                section: "feed".into(),
                key: "interval".into(),
                reason: e.to_string(),
            })?;
    }
    if let Some(output) = output {
        config.output = output.clone();
    }
    Ok(config)
}

pub fn feed_for(config: &ChartConfig) -> Box<dyn FeedPort> {
    match config.source {
        FeedSource::Json => Box::new(JsonFeedAdapter::new(config.data_dir.clone())),
        FeedSource::Csv => Box::new(CsvFeedAdapter::new(config.data_dir.clone())),
    }
}

/// Fetch, transform and render one request. Returns the rendered chart and
/// the number of records the feed produced.
pub fn run_transform_pipeline<C: Clock>(
    feed: &dyn FeedPort,
    transformer: &SeriesTransformer<C>,
    config: &ChartConfig,
    render: &dyn RenderPort,
) -> Result<(ChartSeries, usize), KlineError> {
    let records = feed.fetch_klines(&config.request)?;
    let chart = transformer.build_chart(&records, &config.ma_windows)?;
    render.render(&chart)?;
    Ok((chart, records.len()))
}

fn run_transform(
    config_path: &Path,
    code: Option<&str>,
    interval: Option<&str>,
    output: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_chart_config(&adapter)
        .and_then(|c| apply_overrides(c, code, interval, output))
    {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    eprintln!(
        "Fetching {} {} from {} to {} ({} feed in {})",
        config.request.code,
        config.request.interval,
        config.request.from.format("%Y%m%d"),
        config.request.to.format("%Y%m%d"),
        config.source,
        config.data_dir.display(),
    );

    let feed = feed_for(&config);
    let transformer = SeriesTransformer::new(TimestampParser::new(config.zone, SystemClock));
    let render = JsonRenderAdapter::new(config.output.clone());

    match run_transform_pipeline(feed.as_ref(), &transformer, &config, &render) {
        Ok((chart, fetched)) => {
            eprintln!("  Records:   {fetched}");
            eprintln!("  Candles:   {}", chart.price.len());
            eprintln!("  Volume:    {}", chart.volume.len());
            for overlay in &chart.overlays {
                eprintln!("  {:<10} {} points", format!("{overlay}:"), overlay.points.len());
            }
            eprintln!("\nChart written to: {}", render.output_path().display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_parse_time(text: &str, utc_offset: Option<&str>) -> ExitCode {
    let zone = match utc_offset {
        None => LocalZone::System,
        Some(s) => match LocalZone::parse(s) {
            Some(zone) => zone,
            None => {
                eprintln!("error: invalid utc offset {s:?}, expected local, utc, or ±HH:MM");
                return ExitCode::from(2);
            }
        },
    };

    let parsed = TimestampParser::new(zone, SystemClock).resolve(text);
    println!("{} {}", parsed.seconds, parsed.form);
    ExitCode::SUCCESS
}

/// Synthetic chart with the default overlays.
///
/// `count` above [`MAX_DEMO_BARS`] is a config error.
pub fn build_demo_chart(
    count: usize,
    start: NaiveDate,
    seed: u64,
) -> Result<ChartSeries, KlineError> {
    if count > MAX_DEMO_BARS {
        return Err(KlineError::ConfigInvalid {
            section: "demo".into(),
            key: "count".into(),
            reason: format!("{count} exceeds the limit of {MAX_DEMO_BARS} bars"),
        });
    }
    let (price, volume) = generate_demo(count, start, seed);
    let overlays = overlays(&price, &DEFAULT_MA_WINDOWS)?;
    Ok(ChartSeries {
        price,
        volume,
        overlays,
    })
}

fn run_demo(count: usize, seed: u64, start: &str, output: Option<&PathBuf>) -> ExitCode {
    let Some(start) = parse_compact_date(start.trim()) else {
        eprintln!("error: invalid start date {start:?}, expected YYYYMMDD");
        return ExitCode::from(2);
    };

    let chart = match build_demo_chart(count, start, seed) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    match output {
        Some(path) => {
            let render = JsonRenderAdapter::new(path.clone());
            if let Err(e) = render.render(&chart) {
                return fail(&e);
            }
            eprintln!("Demo chart ({count} bars, seed {seed}) written to: {}", path.display());
        }
        None => match chart_to_json(&chart) {
            Ok(json) => println!("{json}"),
            Err(e) => return fail(&e),
        },
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_chart_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let windows: Vec<String> = config.ma_windows.iter().map(|w| format!("MA{w}")).collect();
    eprintln!("\nFeed:");
    eprintln!("  Source:    {} ({})", config.source, config.data_dir.display());
    eprintln!("  Code:      {}", config.request.code);
    eprintln!("  Interval:  {}", config.request.interval);
    eprintln!(
        "  Range:     {} to {}",
        config.request.from.format("%Y%m%d"),
        config.request.to.format("%Y%m%d")
    );
    eprintln!("\nChart:");
    eprintln!(
        "  Overlays:  {}",
        if windows.is_empty() {
            "none".to_string()
        } else {
            windows.join(", ")
        }
    );
    eprintln!("  Zone:      {}", config.zone);
    eprintln!("  Output:    {}", config.output.display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
