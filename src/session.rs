//! Collection lifecycle.
//!
//! A GL context is only usable on the thread where it is current, so driver
//! construction and the whole collection pass run together on one dedicated
//! render thread. The finished report comes back once over a one-slot
//! channel; after that it is only read.

use crate::capture::{Capture, ReplayDriver};
use crate::collector::{collect_gl, collect_report};
use crate::device::DeviceProbe;
use crate::egl::{EglDriver, collect_egl};
use crate::gl::GlesDriver;
use crate::model::{DeviceProfile, ImplementationReport};
use crate::native::{self, LibraryPaths};
use log::debug;
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const RENDER_THREAD_NAME: &str = "glescaps-render";

/// Everything one collection pass reads from.
pub struct Drivers<G, E> {
    pub gles: G,
    pub egl: E,
    pub device: DeviceProfile,
}

#[derive(Debug)]
pub enum CollectionError {
    /// The render thread could not be started.
    Spawn(std::io::Error),
    /// Driver construction failed (no library, no display, no context).
    Setup(anyhow::Error),
    /// The render thread exited without delivering a report.
    Interrupted,
    /// No report arrived within the wait budget; the pass may still finish.
    TimedOut(Duration),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Spawn(err) => write!(f, "failed to start render thread: {err}"),
            CollectionError::Setup(err) => write!(f, "driver setup failed: {err:#}"),
            CollectionError::Interrupted => write!(f, "render thread exited before collection finished"),
            CollectionError::TimedOut(after) => {
                write!(f, "collection did not finish within {}s", after.as_secs_f32())
            }
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Spawn(err) => Some(err),
            CollectionError::Setup(err) => Some(&**err),
            _ => None,
        }
    }
}

/// Run one synchronous pass: GL first (version gating needs the parsed
/// version before any limit), then EGL.
pub fn collect_all<G: GlesDriver, E: EglDriver>(drivers: Drivers<G, E>) -> ImplementationReport {
    let Drivers {
        mut gles,
        egl,
        device,
    } = drivers;
    let gl = collect_gl(&mut gles);
    let egl = collect_egl(egl);
    collect_report(gl, egl, device)
}

/// One-shot completion signal for a background collection.
pub struct CollectionHandle {
    rx: Receiver<Result<ImplementationReport, CollectionError>>,
}

impl CollectionHandle {
    /// Block until the report is ready.
    pub fn wait(self) -> Result<ImplementationReport, CollectionError> {
        match self.rx.recv() {
            Ok(result) => result,
            Err(_) => Err(CollectionError::Interrupted),
        }
    }

    /// Block for at most `timeout`. A timed-out handle can be waited on again.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<ImplementationReport, CollectionError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CollectionError::TimedOut(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(CollectionError::Interrupted),
        }
    }
}

/// Build drivers and collect on a dedicated render thread.
///
/// `make_drivers` runs on that thread, so drivers that are bound to it (a
/// current GL context) never cross threads.
pub fn spawn_collection<F, G, E>(make_drivers: F) -> Result<CollectionHandle, CollectionError>
where
    F: FnOnce() -> anyhow::Result<Drivers<G, E>> + Send + 'static,
    G: GlesDriver + 'static,
    E: EglDriver + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name(RENDER_THREAD_NAME.to_string())
        .spawn(move || {
            let result = match make_drivers() {
                Ok(drivers) => Ok(collect_all(drivers)),
                Err(err) => Err(CollectionError::Setup(err)),
            };
            debug!("collection finished (ok: {})", result.is_ok());
            // The receiver may already be gone if the caller gave up.
            let _ = tx.send(result);
        })
        .map_err(CollectionError::Spawn)?;
    Ok(CollectionHandle { rx })
}

/// Collect from the host's driver libraries on a render thread.
pub fn collect_native(
    paths: LibraryPaths,
    timeout: Duration,
) -> Result<ImplementationReport, CollectionError> {
    let handle = spawn_collection(move || {
        let (gles, egl) = native::open_drivers(&paths)?;
        Ok(Drivers {
            gles,
            egl,
            device: DeviceProbe::host().probe(),
        })
    })?;
    handle.wait_timeout(timeout)
}

/// Collect from a recorded capture. Captures without a device profile take
/// the current host's.
pub fn collect_from_capture(capture: Capture) -> ImplementationReport {
    let device = capture
        .device
        .clone()
        .unwrap_or_else(|| DeviceProbe::host().probe());
    let replay = ReplayDriver::new(capture);
    collect_all(Drivers {
        gles: replay.clone(),
        egl: replay,
        device,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Capture, GlCapture, ReplayDriver};
    use crate::generation::Generation;
    use anyhow::anyhow;
    use std::collections::BTreeMap;

    fn es2_capture() -> Capture {
        Capture {
            gl: GlCapture {
                strings: BTreeMap::from([(
                    "GL_VERSION".to_string(),
                    "OpenGL ES 2.0".to_string(),
                )]),
                ..GlCapture::default()
            },
            ..Capture::default()
        }
    }

    #[test]
    fn background_collection_delivers_once() {
        let handle = spawn_collection(|| {
            let capture = es2_capture();
            Ok(Drivers {
                gles: ReplayDriver::new(capture.clone()),
                egl: ReplayDriver::new(capture),
                device: DeviceProfile::default(),
            })
        })
        .expect("spawn");
        let report = handle.wait_timeout(Duration::from_secs(10)).expect("report");
        assert_eq!(report.gl.es20.len(), Generation::Es20.expected_len());
        assert!(report.gl.es20.iter().all(|entry| entry.is_unknown()));
        assert!(!report.egl.available);
        assert!(matches!(
            handle.wait_timeout(Duration::from_secs(5)),
            Err(CollectionError::Interrupted)
        ));
    }

    #[test]
    fn capture_device_profile_is_kept() {
        let mut capture = es2_capture();
        capture.device = Some(DeviceProfile {
            name: "Recorded board".to_string(),
            ..DeviceProfile::default()
        });
        let report = collect_from_capture(capture);
        assert_eq!(report.device.name, "Recorded board");
        assert_eq!((report.gl.major_version, report.gl.minor_version), (2, 0));
        assert!(report.gl.es30.is_empty());
    }

    #[test]
    fn setup_failure_is_reported() {
        let handle = spawn_collection(|| -> anyhow::Result<Drivers<ReplayDriver, ReplayDriver>> {
            Err(anyhow!("libEGL.so.1 not found"))
        })
        .expect("spawn");
        let err = handle.wait().expect_err("setup must fail");
        assert!(err.to_string().contains("libEGL.so.1 not found"));
    }

    #[test]
    fn slow_collection_times_out_without_losing_result() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let handle = spawn_collection(move || {
            let _ = release_rx.recv();
            let capture = es2_capture();
            Ok(Drivers {
                gles: ReplayDriver::new(capture.clone()),
                egl: ReplayDriver::new(capture),
                device: DeviceProfile::default(),
            })
        })
        .expect("spawn");
        assert!(matches!(
            handle.wait_timeout(Duration::from_millis(20)),
            Err(CollectionError::TimedOut(_))
        ));
        release_tx.send(()).expect("release");
        assert!(handle.wait().is_ok());
    }
}
