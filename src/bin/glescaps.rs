//! Capability viewer: collect a report and print it.
//!
//! Collects from the host's EGL/GLES libraries by default, or replays a
//! recorded capture with `--capture`. Output is the readable table, the XML
//! wire document, or JSON.

use anyhow::{Context, Result};
use glescaps::runtime::{self, Config};
use glescaps::session::{collect_from_capture, collect_native};
use glescaps::{Capture, ImplementationReport, build_rows, render_text, serializer};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    runtime::init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let config = Config::from_env()?;

    let report = match &args.capture {
        Some(path) => collect_from_capture(Capture::load(path)?),
        None => collect_native(config.library_paths.clone(), config.timeout)
            .context("collecting from the native EGL/GLES libraries (use --capture FILE to replay a recording)")?,
    };

    let rendered = render(&report, args.format, &args.submitter)?;
    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render(report: &ImplementationReport, format: OutputFormat, submitter: &str) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(&build_rows(report)),
        OutputFormat::Xml => {
            let document = serializer::try_serialize(report, submitter)?;
            format!("{document}\n")
        }
        OutputFormat::Json => format!("{}\n", serializer::to_json(report)?),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Xml,
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(OutputFormat::Text),
            "xml" => Some(OutputFormat::Xml),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

struct CliArgs {
    capture: Option<PathBuf>,
    format: OutputFormat,
    submitter: String,
    output: Option<PathBuf>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args_iter = env::args().skip(1);
        let mut capture = None;
        let mut format = OutputFormat::Text;
        let mut submitter = String::new();
        let mut output = None;

        while let Some(arg) = args_iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| {
                inline.clone().or_else(|| args_iter.next()).unwrap_or_else(|| {
                    eprintln!("Missing value for {name}");
                    usage();
                })
            };
            match flag.as_str() {
                "--capture" => capture = Some(PathBuf::from(value("--capture"))),
                "--format" => {
                    let raw = value("--format");
                    format = OutputFormat::parse(&raw).unwrap_or_else(|| {
                        eprintln!("Unknown format: {raw}");
                        usage();
                    });
                }
                "--submitter" => submitter = value("--submitter"),
                "--output" | "-o" => output = Some(PathBuf::from(value("--output"))),
                "-h" | "--help" => usage(),
                _ => {
                    eprintln!("Unknown argument: {arg}");
                    usage();
                }
            }
        }

        Ok(Self {
            capture,
            format,
            submitter,
            output,
        })
    }
}

fn usage() -> ! {
    eprintln!(
        "Usage: glescaps [--capture FILE] [--format text|xml|json] [--submitter NAME] [--output FILE]\n\nOptions:\n  --capture FILE     Replay a recorded capture instead of the native drivers.\n  --format FORMAT    text (default), xml (upload document) or json.\n  --submitter NAME   Submitter recorded in the XML report.\n  --output FILE      Write to FILE instead of stdout.\n\nEnvironment:\n  GLESCAPS_EGL_LIBRARY, GLESCAPS_GLES_LIBRARY  Explicit driver library paths.\n  GLESCAPS_TIMEOUT_SECS                        Collection timeout (default 30).\n  GLESCAPS_LOG                                 Log filter (default warn)."
    );
    std::process::exit(1);
}
