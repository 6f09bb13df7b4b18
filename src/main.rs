use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

mod commands;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse arguments
    let args = std::env::args().collect::<Vec<_>>();
    match args.len() {
        0 | 1 => bail!("Missing <database path> and <command>"),
        2 => bail!("Missing <command>"),
        _ => {}
    }

    // Parse command and act accordingly
    let command = &args[2];
    match command.as_str() {
        ".dbinfo" => commands::dbinfo(&args[1])?,
        ".tables" => commands::tables(&args[1])?,
        _ => bail!("Missing or invalid command passed: {}", command),
    }

    Ok(())
}
