//! Shared library for the glescaps tools.
//!
//! The crate enumerates what an OpenGL ES implementation and its EGL layer
//! support (version strings, per-generation limits, compressed and binary
//! formats, EGL configs), combines that with a host device profile, and
//! serializes the result into the versioned XML report the public database
//! accepts. Drivers sit behind the [`GlesDriver`] and [`EglDriver`] traits so
//! the same collection pass runs against the native libraries, a recorded
//! capture, or a test double.

pub mod capture;
pub mod collector;
pub mod device;
pub mod egl;
pub mod formats;
pub mod generation;
pub mod gl;
pub mod model;
pub mod native;
pub mod runtime;
pub mod serializer;
pub mod service;
pub mod session;
pub mod version;
pub mod view;

pub use capture::{Capture, RecordingDriver, ReplayDriver};
pub use collector::{collect_gl, collect_report};
pub use device::DeviceProbe;
pub use egl::{EglDriver, collect_egl};
pub use formats::{FormatCategory, resolve_format_name};
pub use generation::Generation;
pub use gl::{GlesDriver, QueryError};
pub use model::{
    CapabilityEntry, CapabilitySet, DeviceProfile, EglConfigSummary, EglInfo, GlInfo,
    ImplementationReport, REPORT_VERSION, SensorInfo,
};
pub use runtime::Config;
pub use serializer::{SerializeError, serialize};
pub use service::{
    CancelToken, HttpReportService, Presence, ReportService, ServiceError, Submission,
    UploadOutcome,
};
pub use session::{CollectionError, CollectionHandle, Drivers, spawn_collection};
pub use version::parse_version;
pub use view::{Row, build_rows, render_text};
