use argparse::{ArgumentParser, Collect, Store, StoreOption};
use std::path::PathBuf;

pub struct CliArgs {
    pub input_files: Vec<PathBuf>,
    pub format: String,
    pub out: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input_files: vec![],
            format: "sota".into(),
            out: None,
            log_level: "essential".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Sota,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sota" => Some(OutputFormat::Sota),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

pub fn parse_cli() -> CliArgs {
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Simplified SOTA log -> SOTA v2 CSV converter");
        ap.refer(&mut args.input_files)
            .add_argument("input_files", Collect, "Input logs (none or - for stdin)");
        ap.refer(&mut args.format)
            .add_option(&["-f", "--format"], Store, "Output format: sota|json");
        ap.refer(&mut args.out)
            .add_option(&["-o", "--out"], StoreOption, "Output path (default stdout)");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store, "Log level (essential|debug|trace|warn|error)");
        ap.parse_args_or_exit();
    }
    args
}
