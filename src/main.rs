use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use kit_tsconfig::{path, tsconfig, validate::write_warnings, write_tsconfig, ValidatedConfig};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the project root directory
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Path to the project configuration file [default: nearest kit.config.json]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only check the project's tsconfig.json or jsconfig.json, do not write
    #[arg(long)]
    pub check: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let current_dir = std::env::current_dir().context("unable to read current directory")?;
    let cwd = path::resolve(&current_dir, &cli.cwd);

    let (cwd, config) = ValidatedConfig::discover(&cwd, cli.config.as_deref())?;
    debug!("project root: {:?}", cwd);

    if cli.check {
        let warnings = tsconfig::check(&config, &cwd)?;
        write_warnings(io::stderr().lock(), &warnings)?;
        return Ok(());
    }

    let outcome = write_tsconfig(&config, &cwd)?;
    write_warnings(io::stderr().lock(), &outcome.warnings)?;

    let status = if outcome.written {
        "wrote"
    } else {
        "unchanged"
    };
    writeln!(io::stdout(), "{} {}", status, outcome.path.display())?;

    Ok(())
}
