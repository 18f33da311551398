use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use plotflow::data::{records_from_csv, records_from_json};
use plotflow::parser::parse_overrides;
use plotflow::{Area, ChartSpec, Line, Pie, Plot, PlotOptions, PlotType, SpecChart};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlotKind {
    Line,
    Area,
    Pie,
}

#[derive(Parser, Debug)]
#[command(name = "plotflow")]
#[command(about = "Turn plot options and CSV/JSON data into a chart specification", long_about = None)]
struct Args {
    /// Plot type
    #[arg(value_enum)]
    plot: PlotKind,

    /// JSON file holding the plot options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Option override, e.g. `--set label.type=inner` (repeatable)
    #[arg(long = "set", value_name = "PATH=VALUE")]
    overrides: Vec<String>,

    /// Read stdin as a JSON array of objects instead of CSV
    #[arg(long)]
    json: bool,

    /// Container id recorded in the specification
    #[arg(long, default_value = "container")]
    container: String,
}

fn read_options(path: Option<&PathBuf>) -> Result<PlotOptions> {
    let Some(path) = path else {
        return Ok(PlotOptions::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse options file {}", path.display()))?;
    Ok(PlotOptions::from_value(value))
}

fn read_data(json: bool) -> Result<Vec<plotflow::types::Record>> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read data from stdin")?;
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    if json {
        let value: Value = serde_json::from_str(&input).context("Failed to parse JSON data")?;
        records_from_json(&value)
    } else {
        records_from_csv(input.as_bytes())
    }
}

fn build<P: PlotType>(container: &str, options: PlotOptions) -> Result<ChartSpec> {
    let mut plot: Plot<P, SpecChart> = Plot::new(container, options, SpecChart::new(container));
    plot.render()?;
    Ok(plot.into_chart().into_spec())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let mut options = read_options(args.options.as_ref())?;
    options.assign(&parse_overrides(args.overrides.as_slice())?);

    let records = read_data(args.json)?;
    if !records.is_empty() {
        options.set_data(records);
    }

    let spec = match args.plot {
        PlotKind::Line => build::<Line>(&args.container, options)?,
        PlotKind::Area => build::<Area>(&args.container, options)?,
        PlotKind::Pie => build::<Pie>(&args.container, options)?,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &spec).context("Failed to write chart specification")?;
    writeln!(handle).context("Failed to write chart specification")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
