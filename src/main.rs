mod cli;

use anyhow::{Context, bail};
use cli::OutputFormat;
use env_logger::Env;
use log::{info, warn};
use sotalog::{AppError, csv_out, json_out, parse_file, parse_reader};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

fn setup_logging(level: &str) {
    let env = Env::default().filter_or("RUST_LOG", match level {
        "essential" => "info",
        "debug" => "debug",
        "trace" => "trace",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    });
    env_logger::Builder::from_env(env).init();
}

fn main() -> anyhow::Result<()> {
    let args = cli::parse_cli();
    setup_logging(&args.log_level);

    let format = OutputFormat::parse(&args.format)
        .with_context(|| format!("unknown output format '{}'", args.format))?;
    let inputs = if args.input_files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.input_files.clone()
    };
    info!("Starting: processing {} input(s)", inputs.len());

    let mut out: Box<dyn Write> = match &args.out {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut failed = 0;
    for in_path in &inputs {
        match run_pipeline(in_path, format, &mut *out) {
            Ok(()) => {}
            Err(AppError::Log { source_name, errors }) => {
                for e in &errors {
                    eprintln!("{}:{}", source_name, e);
                }
                warn!("{}: {} error(s), no output written", source_name, errors.len());
                failed += 1;
            }
            Err(e) => {
                warn!("pipeline failed: {}", e);
                failed += 1;
            }
        }
    }
    out.flush()?;

    info!("Done.");
    if failed > 0 {
        bail!("{} of {} input(s) failed", failed, inputs.len());
    }
    Ok(())
}

/// Parse one input completely, then write it. A log with errors writes nothing.
fn run_pipeline(in_path: &Path, format: OutputFormat, out: &mut dyn Write) -> Result<(), AppError> {
    let log = if in_path == Path::new("-") {
        info!("Reading standard input");
        parse_reader(io::stdin().lock(), "<stdin>")?
    } else {
        info!("Reading file {}", in_path.display());
        parse_file(in_path)?
    };

    match format {
        OutputFormat::Sota => {
            let rows = csv_out::write_sota_csv(&log, out)?;
            info!("CSV wrote {} rows", rows);
        }
        OutputFormat::Json => json_out::write_json(&log, out)?,
    }
    Ok(())
}
