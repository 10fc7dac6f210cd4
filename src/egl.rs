//! EGL display query surface and collection.

use crate::model::{EglConfigSummary, EglInfo};
use log::{debug, warn};

/// An EGL enum value paired with its `EGL_*` name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EglEnum {
    pub name: &'static str,
    pub value: i32,
}

impl EglEnum {
    pub const fn new(name: &'static str, value: i32) -> Self {
        Self { name, value }
    }
}

pub const VENDOR: EglEnum = EglEnum::new("EGL_VENDOR", 0x3053);
pub const VERSION: EglEnum = EglEnum::new("EGL_VERSION", 0x3054);
pub const EXTENSIONS: EglEnum = EglEnum::new("EGL_EXTENSIONS", 0x3055);
pub const CLIENT_APIS: EglEnum = EglEnum::new("EGL_CLIENT_APIS", 0x308D);

pub const CONFIG_ID: EglEnum = EglEnum::new("EGL_CONFIG_ID", 0x3028);
pub const RED_SIZE: EglEnum = EglEnum::new("EGL_RED_SIZE", 0x3024);
pub const GREEN_SIZE: EglEnum = EglEnum::new("EGL_GREEN_SIZE", 0x3023);
pub const BLUE_SIZE: EglEnum = EglEnum::new("EGL_BLUE_SIZE", 0x3022);
pub const ALPHA_SIZE: EglEnum = EglEnum::new("EGL_ALPHA_SIZE", 0x3021);
pub const DEPTH_SIZE: EglEnum = EglEnum::new("EGL_DEPTH_SIZE", 0x3025);
pub const STENCIL_SIZE: EglEnum = EglEnum::new("EGL_STENCIL_SIZE", 0x3026);
pub const RENDERABLE_TYPE: EglEnum = EglEnum::new("EGL_RENDERABLE_TYPE", 0x3040);

/// Attributes read for every config, in summary order.
pub const CONFIG_ATTRIBUTES: [EglEnum; 8] = [
    CONFIG_ID,
    RED_SIZE,
    GREEN_SIZE,
    BLUE_SIZE,
    ALPHA_SIZE,
    DEPTH_SIZE,
    STENCIL_SIZE,
    RENDERABLE_TYPE,
];

pub const OPENGL_ES_BIT: i32 = 0x0001;
pub const OPENVG_BIT: i32 = 0x0002;
pub const OPENGL_ES2_BIT: i32 = 0x0004;

/// Query surface of an EGL default display.
pub trait EglDriver {
    /// `eglInitialize` on the default display.
    fn initialize(&mut self) -> bool;

    /// `eglQueryString`; `None` when the display returns null.
    fn query_string(&mut self, name: EglEnum) -> Option<String>;

    /// Number of configs reported by `eglGetConfigs`.
    fn config_count(&mut self) -> usize;

    /// `eglGetConfigAttrib` for config `index` in `eglGetConfigs` order.
    fn config_attrib(&mut self, index: usize, attribute: EglEnum) -> Option<i32>;
}

impl<T: EglDriver + ?Sized> EglDriver for &mut T {
    fn initialize(&mut self) -> bool {
        (**self).initialize()
    }

    fn query_string(&mut self, name: EglEnum) -> Option<String> {
        (**self).query_string(name)
    }

    fn config_count(&mut self) -> usize {
        (**self).config_count()
    }

    fn config_attrib(&mut self, index: usize, attribute: EglEnum) -> Option<i32> {
        (**self).config_attrib(index, attribute)
    }
}

/// Expand a renderable-type bitmask to `"GLES, GLES2, OpenVG"` (subset, in
/// that order). Empty when none of the bits are set.
pub fn renderable_type_names(mask: i32) -> String {
    let mut names = Vec::new();
    if mask & OPENGL_ES_BIT == OPENGL_ES_BIT {
        names.push("GLES");
    }
    if mask & OPENGL_ES2_BIT == OPENGL_ES2_BIT {
        names.push("GLES2");
    }
    if mask & OPENVG_BIT == OPENVG_BIT {
        names.push("OpenVG");
    }
    names.join(", ")
}

/// Read display information and summarize every config.
///
/// A display that fails to initialize yields [`EglInfo::unavailable`].
pub fn collect_egl<D: EglDriver>(mut driver: D) -> EglInfo {
    if !driver.initialize() {
        warn!("EGL display failed to initialize; reporting EGL as unavailable");
        return EglInfo::unavailable();
    }

    let vendor = driver.query_string(VENDOR).unwrap_or_default();
    let version = driver.query_string(VERSION).unwrap_or_default();
    let extensions = driver.query_string(EXTENSIONS).unwrap_or_default();
    let client_apis = driver.query_string(CLIENT_APIS).unwrap_or_default();

    let count = driver.config_count();
    let configs = (0..count)
        .map(|index| summarize_config(&mut driver, index))
        .collect();

    EglInfo {
        available: true,
        vendor,
        version,
        extensions,
        client_apis,
        configs,
    }
}

fn summarize_config<D: EglDriver>(driver: &mut D, index: usize) -> EglConfigSummary {
    let mut read = |attribute: EglEnum| match driver.config_attrib(index, attribute) {
        Some(value) => value,
        None => {
            debug!("config {index}: {} unavailable", attribute.name);
            0
        }
    };

    EglConfigSummary {
        id: read(CONFIG_ID),
        red_size: read(RED_SIZE),
        green_size: read(GREEN_SIZE),
        blue_size: read(BLUE_SIZE),
        alpha_size: read(ALPHA_SIZE),
        depth_size: read(DEPTH_SIZE),
        stencil_size: read(STENCIL_SIZE),
        renderable_type: renderable_type_names(read(RENDERABLE_TYPE)),
    }
}
