use clap::Parser;
use calcsweep::{AppConfig, ExperimentKind, Term, experiments, init_logging, locate, plot_calculation};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "calcsweep")]
#[command(about = "Parameter sweeps and Newton root finding over complex variables")]
struct Args {
    /// Config file (default: ./calcsweep.yaml, then the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that receives one sub-directory per calculation
    #[arg(short, long)]
    output_root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log lifecycle events without evaluating anything
    #[arg(long)]
    no_work: bool,

    /// Render plots with gnuplot after each experiment
    #[arg(long)]
    plot: bool,

    /// Gnuplot terminal
    #[arg(long, value_enum)]
    term: Option<Term>,

    /// Experiments to run (default: all)
    #[arg(short, long, value_enum)]
    experiment: Vec<ExperimentKind>,

    /// Extra arguments; a literal `nowork` disables evaluation
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = locate(args.config.as_deref());
    let mut config = match &config_path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(output_root) = args.output_root {
        config.run.output_root = output_root;
    }
    if args.no_work {
        config.run.disabled = true;
    }
    config.run.apply_flags(&args.rest);
    if args.plot {
        config.plot.enabled = true;
    }
    if let Some(term) = args.term {
        config.plot.term = term;
    }

    init_logging(&config.run.output_root, &args.log_level)?;
    tracing::info!(
        started = %jiff::Timestamp::now(),
        output_root = %config.run.output_root.display(),
        disabled = config.run.disabled,
        "calcsweep starting"
    );
    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config file"),
        None => tracing::debug!("no config file found, using defaults"),
    }

    let kinds = if args.experiment.is_empty() {
        ExperimentKind::ALL.to_vec()
    } else {
        args.experiment
    };

    for kind in kinds {
        let run = experiments::run(kind, &config)?;
        if config.plot.enabled && !config.run.disabled {
            plot_calculation(&run.calculation, &run.plot_commands, &config.plot);
        }
    }

    tracing::info!("calcsweep finished");
    Ok(())
}
