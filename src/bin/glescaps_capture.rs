//! Record every driver answer from the host into a replayable capture.
//!
//! The capture holds raw query answers rather than a finished report, so a
//! replay runs the current collection logic against the recorded driver.

use anyhow::{Context, Result};
use glescaps::native::open_drivers;
use glescaps::runtime::{self, Config};
use glescaps::{DeviceProbe, RecordingDriver, collect_egl, collect_gl};
use log::info;
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

    // The context is current on this thread only; record here directly.
    let (gles, egl) = open_drivers(&config.library_paths)?;
    let mut recorder = RecordingDriver::new(gles, egl);
    let gl = collect_gl(&mut recorder);
    collect_egl(&mut recorder);
    info!("recorded {} ({})", gl.renderer, gl.version);

    let device = (!args.skip_device).then(|| DeviceProbe::host().probe());
    let capture = recorder.into_capture(device);

    match &args.output {
        Some(path) => {
            capture.save(path)?;
            let size = fs::metadata(path)
                .with_context(|| format!("failed to stat {}", path.display()))?
                .len();
            eprintln!("wrote {} ({size} bytes)", path.display());
        }
        None => println!("{}", capture.to_json_string()?),
    }
    Ok(())
}

struct CliArgs {
    output: Option<PathBuf>,
    skip_device: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args_iter = env::args().skip(1);
        let mut output = None;
        let mut skip_device = false;

        while let Some(arg) = args_iter.next() {
            if let Some(value) = arg.strip_prefix("--output=") {
                output = Some(PathBuf::from(value));
                continue;
            }
            match arg.as_str() {
                "--output" | "-o" => {
                    let value = args_iter.next().unwrap_or_else(|| {
                        eprintln!("Missing path for --output");
                        usage();
                    });
                    output = Some(PathBuf::from(value));
                }
                "--no-device" => skip_device = true,
                "-h" | "--help" => usage(),
                _ => {
                    eprintln!("Unknown argument: {arg}");
                    usage();
                }
            }
        }

        Ok(Self {
            output,
            skip_device,
        })
    }
}

fn usage() -> ! {
    eprintln!(
        "Usage: glescaps-capture [--output FILE] [--no-device]\n\nOptions:\n  --output FILE   Write the capture to FILE instead of stdout.\n  --no-device     Leave the device profile out; replays probe their own host.\n\nEnvironment:\n  GLESCAPS_EGL_LIBRARY, GLESCAPS_GLES_LIBRARY  Explicit driver library paths."
    );
    std::process::exit(1);
}
