mod cli;

use std::io::{BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = segdump::logging::level_for_verbosity(cli.verbose);
    if cli.log_json {
        segdump::logging::init_tracing_json(level);
    } else {
        segdump::logging::init_tracing(level);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.dump_config();
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let summary = segdump::dump_path(&cli.path, &config, &mut out)
        .with_context(|| format!("Reading {}", cli.path.display()))?;
    out.flush()
        .with_context(|| format!("Reading {}: writing output", cli.path.display()))?;

    info!(
        path = %cli.path.display(),
        segments = summary.segments_dumped,
        bytes = summary.bytes_dumped,
        "Dumped segments"
    );
    Ok(())
}
