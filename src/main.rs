use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use g25map::config::State;
use g25map::geo::{annotate_distances, project_counted, SampleRecord};
use g25map::parser::parse_vector_checked;
use g25map::search::{compare_vectors, plot_vectors, rank_sources, PanelLimits, PLOT_SCALE_FRACTION};
use g25map::{haplogroup_color, LabeledVector};

#[derive(Parser)]
#[command(name = "g25map")]
#[command(version = "0.1")]
#[command(about = "G25 distance engine for ancient-DNA sample maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank source populations by distance to every target vector
    Compare {
        #[arg(short, long)]
        source: PathBuf,
        /// Target panel; stdin when omitted
        #[arg(short, long)]
        target: Option<PathBuf>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Planar view of the source panel colored by distance to the first target
    Plot {
        #[arg(short, long)]
        source: PathBuf,
        #[arg(short, long)]
        target: Option<PathBuf>,
    },
    /// Turn a JSON array of sample rows into a GeoJSON feature collection
    Project {
        /// Sample rows; stdin when omitted
        records: Option<PathBuf>,
        /// Annotate features with distances from this source panel
        #[arg(long, requires = "vector")]
        source: Option<PathBuf>,
        /// Comma-joined user vector compared against `--source`
        #[arg(long, requires = "source")]
        vector: Option<String>,
        /// Property matched against source labels
        #[arg(long, default_value = "id")]
        key: String,
    },
    /// Print the display color of each haplogroup code
    Haplogroup { codes: Vec<String> },
    Config,
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn compare_command(
    state: &State,
    source: &Path,
    target: Option<&Path>,
    limit: Option<usize>,
) -> Result<()> {
    let limits = PanelLimits::from_state(state);
    let sources = limits.parse_bounded("source", &read_input(Some(source))?)?;
    let targets = limits.parse_bounded("target", &read_input(target)?)?;
    if sources.is_empty() || targets.is_empty() {
        warn!(
            sources = sources.len(),
            targets = targets.len(),
            "nothing to compare"
        );
    }

    let results = compare_vectors(&sources, &targets, limit.unwrap_or(state.limit));
    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}

fn plot_command(state: &State, source: &Path, target: Option<&Path>) -> Result<()> {
    let limits = PanelLimits::from_state(state);
    let sources = limits.parse_bounded("source", &read_input(Some(source))?)?;
    let targets = limits.parse_bounded("target", &read_input(target)?)?;

    let view = plot_vectors(&sources, targets.first());
    println!("{}", serde_json::to_string(&view)?);
    Ok(())
}

fn project_command(
    state: &State,
    records: Option<&Path>,
    source: Option<&Path>,
    vector: Option<&str>,
    key: &str,
) -> Result<()> {
    let input = read_input(records)?;
    let records: Vec<SampleRecord> = serde_json::from_str(&input)
        .context("Failed to parse sample records as a JSON array")?;

    let (mut collection, dropped) = project_counted(&records);
    info!(
        features = collection.features.len(),
        dropped,
        "projected samples"
    );

    if let (Some(source), Some(vector)) = (source, vector) {
        let limits = PanelLimits::from_state(state);
        let sources = limits.parse_bounded("source", &read_input(Some(source))?)?;
        let min_dimensions = state.min_dimensions;
        let coordinates = parse_vector_checked(vector, min_dimensions)
            .with_context(|| format!("Vector needs at least {min_dimensions} coordinates"))?;
        let target = LabeledVector::new("target", coordinates);
        let matches = rank_sources(&target, &sources, sources.len());
        let max_distance = matches
            .iter()
            .map(|m| m.distance.value())
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);
        let annotated = annotate_distances(
            &mut collection,
            &matches,
            key,
            max_distance * PLOT_SCALE_FRACTION,
        );
        info!(annotated, "attached distances to features");
    }

    println!("{}", serde_json::to_string(&collection)?);
    Ok(())
}

fn haplogroup_command(codes: &[String]) -> Result<()> {
    for code in codes {
        println!("{}\t{}", code, haplogroup_color(code));
    }
    Ok(())
}

fn config_command(state: &State) -> Result<()> {
    state.print_config();
    Ok(())
}

fn init_tracing(state: &State) {
    let default_level = if state.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let state = State::new()?;
    init_tracing(&state);

    match args.command {
        Commands::Compare {
            source,
            target,
            limit,
        } => compare_command(&state, &source, target.as_deref(), limit)?,
        Commands::Plot { source, target } => plot_command(&state, &source, target.as_deref())?,
        Commands::Project {
            records,
            source,
            vector,
            key,
        } => project_command(
            &state,
            records.as_deref(),
            source.as_deref(),
            vector.as_deref(),
            &key,
        )?,
        Commands::Haplogroup { codes } => haplogroup_command(&codes)?,
        Commands::Config => config_command(&state)?,
    }
    Ok(())
}
