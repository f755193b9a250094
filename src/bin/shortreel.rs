use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use shortreel::{ConfigStore, Pipeline, ProcessExecutor, SceneCatalog, Stage};

#[derive(Parser, Debug)]
#[command(name = "shortreel", version, about = "Short-form video production pipeline")]
struct Cli {
    /// Configuration file, tried before the default candidates
    /// (`config.json`, `../config.json`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scenes catalog JSON.
    #[arg(long, global = true, default_value = "scenes.json")]
    scenes: PathBuf,

    /// Directory containing the worker scripts.
    #[arg(long, global = true, default_value = "workers")]
    workers: PathBuf,

    /// Interpreter used to run the worker scripts.
    #[arg(long, global = true, default_value = "python3")]
    interpreter: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline, or a single stage.
    Run(RunArgs),
    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Stage to run: generate, synth, prepare-video or assemble.
    /// Omit to run the whole pipeline.
    stage: Option<String>,

    /// Background source video (required for prepare-video; otherwise
    /// overrides the configured default).
    input_video: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("config.json"));
    candidates.push(PathBuf::from("../config.json"));

    let store = ConfigStore::new(candidates);
    let config = store.load();

    match cli.cmd {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(config.as_ref())?);
            Ok(())
        }
        Command::Run(args) => {
            let catalog = SceneCatalog::from_path(&cli.scenes)?;
            let executor = ProcessExecutor::new(&cli.workers).with_interpreter(cli.interpreter.as_str());
            let pipeline = Pipeline::new(config, catalog, executor);

            match args.stage {
                None => {
                    pipeline.run_full(args.input_video.as_deref())?;
                }
                Some(name) => {
                    let stage: Stage = name.parse()?;
                    pipeline.run_stage(stage, args.input_video.as_deref())?;
                }
            }
            Ok(())
        }
    }
}
