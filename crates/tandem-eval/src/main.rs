use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tandem_eval::config::{resolve_fuel, DEFAULT_LOG_FILTER, ENV_LOG};
use tandem_eval::{run_plan, Plan, PlanSummary, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tandem")]
#[command(about = "Run lock-step loop plans and report what they yield.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a plan and print a report.
    Run(RunArgs),
    /// Validate a plan without running it.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, value_name = "PATH")]
    plan: PathBuf,

    /// Poll budget for filter_map loops (overrides the plan and TANDEM_FUEL).
    #[arg(long, value_name = "N")]
    fuel: Option<u64>,

    /// Stop after N outputs (overrides the plan).
    #[arg(long, value_name = "N")]
    limit: Option<u64>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long, value_name = "PATH")]
    plan: PathBuf,
}

fn main() -> ExitCode {
    init_tracing();
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn try_main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_plan(path: &Path) -> Result<Plan> {
    let bytes = std::fs::read(path).with_context(|| format!("read plan: {}", path.display()))?;
    Plan::from_json_bytes(&bytes).with_context(|| format!("load plan: {}", path.display()))
}

fn print_json<T: Serialize>(v: &T) -> Result<()> {
    let out = serde_json::to_string(v).context("serialize output")?;
    println!("{out}");
    Ok(())
}

fn cmd_run(args: RunArgs) -> Result<ExitCode> {
    let plan = load_plan(&args.plan)?;
    let opts = RunOptions {
        fuel: resolve_fuel(args.fuel, plan.fuel),
        limit: args.limit,
    };
    let report = run_plan(&plan, &opts);
    print_json(&report)?;
    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn cmd_check(args: CheckArgs) -> Result<ExitCode> {
    let plan = load_plan(&args.plan)?;
    print_json(&PlanSummary::new(&plan))?;
    Ok(ExitCode::SUCCESS)
}
