use std::process::ExitCode;

use clap::Parser;
use smcwrap_cli::{
    command::{CliArgs, Commands},
    func,
};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(target_os = "macos")]
fn run(command: Commands) -> anyhow::Result<()> {
    let mut smc = smcwrap_lib::io::shared()
        .lock()
        .map_err(|_| anyhow::anyhow!("SMC connection lock poisoned"))?;
    func::run(&mut *smc, command, &mut std::io::stdout().lock())
}

#[cfg(not(target_os = "macos"))]
fn run(_command: Commands) -> anyhow::Result<()> {
    Err(anyhow::Error::new(smcwrap_lib::SmcError::NoSmcFound)
        .context("the SMC is only available on macOS"))
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    init_logging(&cli.log_level);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(func::exit_status(&e) as u8)
        }
    }
}
