//! Trains a population of feed-forward networks on a delimited
//! numeric table, then answers queries with the best network.

mod prompt;
mod settings;

use clap::Parser;
use env_logger::Env;
use evolution::data::DataSet;
use evolution::logging::{EvolutionLogger, ReportingLevel, Stats};
use evolution::{Population, TrainingError};
use evolution_nn::{Network, TopologyConfig};

use settings::Settings;

use std::error::Error;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fit")]
#[command(version)]
#[command(about = "Evolves feed-forward networks to fit columns of a numeric table")]
struct Cli {
    /// Data file, one row of numbers per line
    #[arg(short, long, default_value = "data.csv")]
    data: PathBuf,

    /// Settings file (RON); defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations, overriding the settings file
    #[arg(short, long)]
    generations: Option<NonZeroUsize>,

    /// Stop early once the top quarter's average deviation
    /// is at most this value
    #[arg(short, long)]
    target: Option<f64>,

    /// Quiet mode (warnings only)
    #[arg(short, long)]
    quiet: bool,
}

type NetworkPopulation = Population<TopologyConfig, Network>;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if cli.seed.is_some() {
        settings.population.seed = cli.seed;
    }
    if let Some(generations) = cli.generations {
        settings.population.generations = generations;
    }
    let topology = settings.topology()?;

    let data = DataSet::load(&cli.data)?;
    log::info!("loaded {} rows from {}", data.len(), cli.data.display());

    let mut population = NetworkPopulation::new(settings.population, topology)?;

    let start = Instant::now();
    let logger = train(&mut population, &data, cli.target)?;
    log::info!("training finished in {:.2?}", start.elapsed());

    let stdout = io::stdout();
    write_summary(&population, &logger, &mut stdout.lock())?;

    let stdin = io::stdin();
    prompt::run_session(population.champion(), stdin.lock(), stdout)?;
    Ok(())
}

/// Trains `population` on `data`, ending at the first generation
/// whose survivors average at most `target` deviation.
fn train(
    population: &mut NetworkPopulation,
    data: &DataSet,
    target: Option<f64>,
) -> Result<EvolutionLogger<Network>, TrainingError> {
    let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    let reached = AtomicBool::new(false);
    population.train_with(data, &reached, |p| {
        logger.log(p);
        if target.map_or(false, |target| p.survivor_deviation() <= target) {
            reached.store(true, Ordering::Relaxed);
        }
    })?;
    if reached.load(Ordering::Relaxed) {
        log::info!("target deviation reached after {} generations", logger.iter().count());
    }
    Ok(logger)
}

fn write_summary<W: Write>(
    population: &NetworkPopulation,
    logger: &EvolutionLogger<Network>,
    out: &mut W,
) -> io::Result<()> {
    let champion = population.champion();
    writeln!(
        out,
        "The top quarter neural networks have {} average deviation.",
        population.survivor_deviation()
    )?;
    writeln!(
        out,
        "The best neural network has {} deviation over {} iterations.",
        champion.fitness(),
        champion.evaluation_count() / population.config().sub_iterations.get()
    )?;
    writeln!(
        out,
        "Survivor deviation per generation: {:?}",
        Stats::from(logger.iter().map(|log| log.survivor_deviation))
    )?;
    if let Some(best) = logger.best() {
        writeln!(
            out,
            "Lowest survivor deviation {} at generation {}",
            best.survivor_deviation,
            best.generation_number + 1
        )?;
    }
    Ok(())
}
