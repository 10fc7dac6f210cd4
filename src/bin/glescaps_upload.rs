//! Submit a hardware report to the public database.
//!
//! `submit` (the default) checks whether the database already holds a report
//! for this device description and uploads only when it does not. `check`
//! stops after the lookup and `open-database` hands the database front page
//! to the desktop browser.

use anyhow::{Context, Result, bail};
use glescaps::runtime::{self, Config, parse_timeout_secs};
use glescaps::service::submit_report;
use glescaps::session::{collect_from_capture, collect_native};
use glescaps::{
    CancelToken, Capture, HttpReportService, ImplementationReport, Presence, ReportService,
    Submission, UploadOutcome, serialize,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    runtime::init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let mut config = Config::from_env()?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    let service = HttpReportService::new(config.base_url.as_str(), config.timeout);

    match args.command {
        Command::OpenDatabase => open_database(&service, args.dry_run),
        Command::Check => {
            let report = collect(&args, &config)?;
            if args.dry_run {
                println!("{}", report.description());
                return Ok(());
            }
            match service.check_present(&report.description(), &CancelToken::new())? {
                Presence::Present { report_id, url } => {
                    println!("Report {report_id} is already present in the database: {url}");
                    maybe_open(&url, args.open)
                }
                Presence::Absent => {
                    println!("No report for \"{}\" in the database yet.", report.description());
                    Ok(())
                }
            }
        }
        Command::Submit => {
            let report = collect(&args, &config)?;
            if args.dry_run {
                let document = serialize(&report, &args.submitter);
                if document.is_empty() {
                    bail!("report serialization failed");
                }
                println!("{document}");
                return Ok(());
            }
            match submit_report(&service, &report, &args.submitter, &CancelToken::new())? {
                Submission::AlreadyPresent { url } => {
                    println!("A hardware report for this device is already present in the database: {url}");
                    maybe_open(&url, args.open)
                }
                Submission::Uploaded(UploadOutcome::Uploaded) => {
                    println!("Your report has been uploaded to the database! Thanks for your contribution!");
                    Ok(())
                }
                Submission::Uploaded(UploadOutcome::Duplicate) => {
                    println!("A report for your device and OpenGL ES version is already present in the database!");
                    Ok(())
                }
                Submission::Uploaded(UploadOutcome::Rejected(message)) => {
                    bail!("upload rejected: {message}")
                }
            }
        }
    }
}

fn collect(args: &CliArgs, config: &Config) -> Result<ImplementationReport> {
    match &args.capture {
        Some(path) => Ok(collect_from_capture(Capture::load(path)?)),
        None => collect_native(config.library_paths.clone(), config.timeout)
            .context("collecting from the native EGL/GLES libraries"),
    }
}

fn open_database(service: &HttpReportService, dry_run: bool) -> Result<()> {
    let url = service.database_url();
    println!("{url}");
    if dry_run {
        return Ok(());
    }
    runtime::open_in_browser(&url)
}

fn maybe_open(url: &str, open: bool) -> Result<()> {
    if open {
        runtime::open_in_browser(url)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Submit,
    Check,
    OpenDatabase,
}

struct CliArgs {
    command: Command,
    capture: Option<PathBuf>,
    submitter: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    dry_run: bool,
    open: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args_iter = env::args().skip(1);
        let mut command = None;
        let mut capture = None;
        let mut submitter = String::new();
        let mut base_url = None;
        let mut timeout = None;
        let mut dry_run = false;
        let mut open = false;

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
                "--submitter" => submitter = value("--submitter"),
                "--base-url" => base_url = Some(value("--base-url")),
                "--timeout" => {
                    let raw = value("--timeout");
                    timeout = Some(parse_timeout_secs(&raw).context("invalid --timeout")?);
                }
                "--dry-run" => dry_run = true,
                "--open" => open = true,
                "-h" | "--help" => usage(),
                _ if flag.starts_with('-') => {
                    eprintln!("Unknown option: {arg}");
                    usage();
                }
                _ if command.is_some() => {
                    eprintln!("Unexpected argument: {arg}");
                    usage();
                }
                "submit" => command = Some(Command::Submit),
                "check" => command = Some(Command::Check),
                "open-database" => command = Some(Command::OpenDatabase),
                _ => {
                    eprintln!("Unknown command: {arg}");
                    usage();
                }
            }
        }

        Ok(Self {
            command: command.unwrap_or(Command::Submit),
            capture,
            submitter,
            base_url,
            timeout,
            dry_run,
            open,
        })
    }
}

fn usage() -> ! {
    eprintln!(
        "Usage: glescaps-upload [OPTIONS] [submit|check|open-database]\n\nCommands:\n  submit          Upload the report unless one is already present (default).\n  check           Only look up whether a report is present.\n  open-database   Open the database front page in the browser.\n\nOptions:\n  --capture FILE    Use a recorded capture instead of the native drivers.\n  --submitter NAME  Submitter recorded in the uploaded report.\n  --base-url URL    Database base URL (or set GLESCAPS_BASE_URL).\n  --timeout SECS    Per-request and collection timeout (or set GLESCAPS_TIMEOUT_SECS).\n  --open            Open an already-present report in the browser.\n  --dry-run         Print what would be sent without contacting the database."
    );
    std::process::exit(1);
}
