use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::Parser;
use psy_bounds::{BoundsEngine, EngineConfig, RequestContext, SampleSet};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// psy-bounds - derive ticks, limits and colorbar boundaries from data
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "psy-bounds")]
struct Cli {
    /// File with the primary sample (JSON array, or values separated by commas/whitespace)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Additional samples sharing the same boundaries (repeatable)
    #[arg(short, long, value_name = "FILE")]
    shared: Vec<PathBuf>,

    /// Request as JSON, e.g. '"symlog"', '["rounded", 7, 5, 95]' or '{"method": "log", "N": 2}'
    ///
    /// A value that is not valid JSON is taken as a method name.
    #[arg(short, long, default_value = "\"rounded\"")]
    request: String,

    /// What the request is used for
    #[arg(short, long, value_enum, default_value = "bounds")]
    context: ContextArg,

    /// Interpret INPUT as datetimes (RFC 3339, "%Y-%m-%d %H:%M:%S" or "%Y-%m-%d")
    #[arg(long)]
    dates: bool,

    /// Previously computed colorbar bounds, used by `bounds` and `midbounds`
    #[arg(long, value_name = "FILE")]
    colorbar_bounds: Option<PathBuf>,

    /// Engine configuration as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ContextArg {
    /// Colorbar or contour boundaries
    Bounds,
    /// Colorbar ticks
    Cticks,
    /// Axis ticks
    Ticks,
    /// Axis limits
    Limits,
}

impl ContextArg {
    fn request_context(self) -> Option<RequestContext> {
        match self {
            ContextArg::Bounds => Some(RequestContext::Bounds),
            ContextArg::Cticks => Some(RequestContext::ColorbarTicks),
            ContextArg::Ticks => Some(RequestContext::AxisTicks),
            ContextArg::Limits => None,
        }
    }
}

/// Parse the request argument, falling back to a bare method name
fn parse_request(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.trim().to_string()))
}

/// Split file content into entries (JSON array or separated values)
fn split_entries(content: &str) -> Result<Vec<Value>> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(trimmed).context("Failed to parse JSON array")?;
        return Ok(values);
    }
    Ok(trimmed
        .split(|c: char| c == ',' || c == '\n' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
        .collect())
}

/// Parse numeric sample values; `null` and "nan" become NaN
fn parse_values(content: &str) -> Result<Vec<f64>> {
    split_entries(content)?
        .into_iter()
        .flat_map(|entry| match entry {
            Value::String(s) => s
                .split_whitespace()
                .map(|token| {
                    token
                        .parse::<f64>()
                        .with_context(|| format!("Invalid number '{token}'"))
                })
                .collect::<Vec<_>>(),
            Value::Null => vec![Ok(f64::NAN)],
            other => vec![other
                .as_f64()
                .with_context(|| format!("Invalid number {other}"))],
        })
        .collect()
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid datetime '{s}'"))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid datetime '{s}'"))
}

fn parse_dates(content: &str) -> Result<Vec<NaiveDateTime>> {
    split_entries(content)?
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) => parse_datetime(s.trim()),
            other => bail!("Expected a datetime string, got {other}"),
        })
        .collect()
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_values(path: &Path) -> Result<Vec<f64>> {
    parse_values(&read_to_string(path)?).with_context(|| format!("In {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let config: EngineConfig = serde_json::from_str(&read_to_string(path)?)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_samples(args: &Cli) -> Result<SampleSet> {
    let mut samples = if args.dates {
        let dates = parse_dates(&read_to_string(&args.input)?)
            .with_context(|| format!("In {}", args.input.display()))?;
        debug!("Read {} datetimes from {}", dates.len(), args.input.display());
        SampleSet::default().with_dates(dates)
    } else {
        let values = read_values(&args.input)?;
        debug!("Read {} values from {}", values.len(), args.input.display());
        SampleSet::from_source(&values)
    };

    for path in &args.shared {
        samples = samples.with_shared(read_values(path)?);
    }
    if let Some(path) = &args.colorbar_bounds {
        samples = samples.with_bounds(read_values(path)?);
    }
    Ok(samples)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing subscriber with environment filter
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let engine = BoundsEngine::new(load_config(args.config.as_deref())?);
    let samples = load_samples(&args)?;
    let request = parse_request(&args.request);
    info!("Computing {:?} for request {}", args.context, request);

    let result = match args.context.request_context() {
        Some(context) => engine.compute_value(&request, context, &samples)?,
        None => engine.limits_value(&request, &samples)?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
