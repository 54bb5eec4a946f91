//! `kutta`: inspect a KuttaKoin genesis and replay operation scripts.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kutta_cli::{parse_script, replay, CliConfig, LedgerSummary};
use kutta_ledger::create_ledger;
use kutta_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "kutta", about = "KuttaKoin capped token ledger")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Account that creates and owns the ledger.
    #[arg(long, global = true, env = "KUTTA_OWNER")]
    owner: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "KUTTA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format: "human" or "json".
    #[arg(long, global = true, env = "KUTTA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the genesis summary as JSON.
    Info,

    /// Replay a JSON script of operations against a fresh ledger.
    Run {
        /// Path to the script (a JSON array of operations).
        script: PathBuf,

        /// Stop at the first rejected operation and exit non-zero.
        #[arg(long)]
        fail_fast: bool,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let base = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CliConfig::default(),
    };

    Ok(CliConfig {
        owner: cli.owner.clone().unwrap_or(base.owner),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        log_format: cli.log_format.unwrap_or(base.log_format),
        ..base
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let genesis = config.genesis().context("invalid genesis configuration")?;
    let mut ledger = create_ledger(&genesis).context("creating ledger")?;

    match cli.command {
        Command::Info => {
            let summary = LedgerSummary::of(&ledger);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Run { script, fail_fast } => {
            let json = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let ops = parse_script(&json)
                .with_context(|| format!("parsing script {}", script.display()))?;

            tracing::info!(ops = ops.len(), fail_fast, "replaying script");
            let run = replay(&mut ledger, &ops, fail_fast);

            for outcome in &run.outcomes {
                println!("{}", serde_json::to_string(outcome)?);
            }
            let snapshot = ledger.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);

            tracing::info!(
                applied = run.outcomes.len() - run.rejected,
                rejected = run.rejected,
                hash = %snapshot.hash_hex(),
                "replay finished"
            );

            if run.halted {
                let last = run.outcomes.last().and_then(|o| o.error.clone());
                anyhow::bail!(
                    "operation {} rejected: {}",
                    run.outcomes.len() - 1,
                    last.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
