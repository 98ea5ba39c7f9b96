use clap::Parser;
use std::io::Write;
use wikidata_cli::cli::{self, Cli};
use wikidata_cli::{BuildInfo, Config};
use anyhow::Result;

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    config.apply_overrides(cli.global.overrides());

    let build = BuildInfo::from_env();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&cli, config, &build, &mut out).await?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; default to warn so stdout carries only command output
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "warn")
    ).init();

    let cli = Cli::parse();

    // Dropping the command future on Ctrl-C aborts any in-flight request
    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
