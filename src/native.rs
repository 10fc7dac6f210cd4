//! Native EGL + GL ES backend.
//!
//! `libEGL` and `libGLESv2` are opened at runtime, so the crate builds and
//! its tests run on hosts without a GPU stack. [`open_drivers`] brings up a
//! headless 1x1 pbuffer context (ES 3 first, then ES 2), makes it current on
//! the calling thread, and hands out driver handles that share it. The
//! context is torn down when the last handle drops.

use crate::egl::{EglDriver, EglEnum};
use crate::gl::{self, GlEnum, GlesDriver, QueryError};
use anyhow::{Context, Result, anyhow, bail};
use libloading::Library;
use log::{debug, info};
use std::ffi::{CStr, c_char, c_void};
use std::path::{Path, PathBuf};
use std::ptr;
use std::rc::Rc;

type EglDisplay = *mut c_void;
type EglConfig = *mut c_void;
type EglContext = *mut c_void;
type EglSurface = *mut c_void;
type EglInt = i32;
type EglBoolean = u32;

const EGL_FALSE: EglBoolean = 0;
const EGL_NONE: EglInt = 0x3038;
const EGL_SURFACE_TYPE: EglInt = 0x3033;
const EGL_PBUFFER_BIT: EglInt = 0x0001;
const EGL_RENDERABLE_TYPE: EglInt = 0x3040;
const EGL_OPENGL_ES2_BIT: EglInt = 0x0004;
const EGL_OPENGL_ES3_BIT: EglInt = 0x0040;
const EGL_WIDTH: EglInt = 0x3057;
const EGL_HEIGHT: EglInt = 0x3056;
const EGL_CONTEXT_CLIENT_VERSION: EglInt = 0x3098;
const EGL_OPENGL_ES_API: u32 = 0x30A0;

const DEFAULT_EGL_LIBRARIES: &[&str] = &["libEGL.so.1", "libEGL.so"];
const DEFAULT_GLES_LIBRARIES: &[&str] = &["libGLESv2.so.2", "libGLESv2.so"];

/// Stale errors drained before each query; a broken driver may never clear.
const MAX_PENDING_ERRORS: usize = 16;

/// Explicit library paths; `None` searches the default sonames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryPaths {
    pub egl: Option<PathBuf>,
    pub gles: Option<PathBuf>,
}

struct EglApi {
    _library: Library,
    get_display: unsafe extern "C" fn(*mut c_void) -> EglDisplay,
    initialize: unsafe extern "C" fn(EglDisplay, *mut EglInt, *mut EglInt) -> EglBoolean,
    terminate: unsafe extern "C" fn(EglDisplay) -> EglBoolean,
    query_string: unsafe extern "C" fn(EglDisplay, EglInt) -> *const c_char,
    get_configs: unsafe extern "C" fn(EglDisplay, *mut EglConfig, EglInt, *mut EglInt) -> EglBoolean,
    choose_config: unsafe extern "C" fn(
        EglDisplay,
        *const EglInt,
        *mut EglConfig,
        EglInt,
        *mut EglInt,
    ) -> EglBoolean,
    get_config_attrib: unsafe extern "C" fn(EglDisplay, EglConfig, EglInt, *mut EglInt) -> EglBoolean,
    bind_api: unsafe extern "C" fn(u32) -> EglBoolean,
    create_pbuffer_surface: unsafe extern "C" fn(EglDisplay, EglConfig, *const EglInt) -> EglSurface,
    create_context:
        unsafe extern "C" fn(EglDisplay, EglConfig, EglContext, *const EglInt) -> EglContext,
    make_current: unsafe extern "C" fn(EglDisplay, EglSurface, EglSurface, EglContext) -> EglBoolean,
    destroy_context: unsafe extern "C" fn(EglDisplay, EglContext) -> EglBoolean,
    destroy_surface: unsafe extern "C" fn(EglDisplay, EglSurface) -> EglBoolean,
    get_error: unsafe extern "C" fn() -> EglInt,
}

struct GlesApi {
    _library: Library,
    get_string: unsafe extern "C" fn(u32) -> *const u8,
    get_integerv: unsafe extern "C" fn(u32, *mut i32),
    /// ES 3.0+ only.
    get_integeri_v: Option<unsafe extern "C" fn(u32, u32, *mut i32)>,
    get_error: unsafe extern "C" fn() -> u32,
}

fn open_library(explicit: Option<&Path>, defaults: &[&str]) -> Result<Library> {
    if let Some(path) = explicit {
        // SAFETY: loading a system driver library named by the operator.
        return unsafe { Library::new(path) }
            .with_context(|| format!("dlopen {}", path.display()));
    }
    let mut last_error = None;
    for name in defaults {
        // SAFETY: loading a system-managed driver library by soname.
        match unsafe { Library::new(name) } {
            Ok(library) => {
                debug!("loaded {name}");
                return Ok(library);
            }
            Err(err) => {
                debug!("dlopen {name}: {err}");
                last_error = Some(err);
            }
        }
    }
    match last_error {
        Some(err) => Err(anyhow!("none of {} could be loaded: {err}", defaults.join(", "))),
        None => bail!("no library candidates"),
    }
}

/// Resolve `name` (NUL-terminated) to a function pointer of type `T`.
///
/// # Safety
/// `T` must be the exact C signature of the exported symbol.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static [u8]) -> Result<T> {
    let label = String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]).into_owned();
    let sym = unsafe { library.get::<T>(name) }.with_context(|| format!("symbol {label}"))?;
    Ok(*sym)
}

impl EglApi {
    fn load(path: Option<&Path>) -> Result<Self> {
        let library = open_library(path, DEFAULT_EGL_LIBRARIES)?;
        // SAFETY: signatures follow the EGL 1.4 headers.
        unsafe {
            Ok(Self {
                get_display: symbol(&library, b"eglGetDisplay\0")?,
                initialize: symbol(&library, b"eglInitialize\0")?,
                terminate: symbol(&library, b"eglTerminate\0")?,
                query_string: symbol(&library, b"eglQueryString\0")?,
                get_configs: symbol(&library, b"eglGetConfigs\0")?,
                choose_config: symbol(&library, b"eglChooseConfig\0")?,
                get_config_attrib: symbol(&library, b"eglGetConfigAttrib\0")?,
                bind_api: symbol(&library, b"eglBindAPI\0")?,
                create_pbuffer_surface: symbol(&library, b"eglCreatePbufferSurface\0")?,
                create_context: symbol(&library, b"eglCreateContext\0")?,
                make_current: symbol(&library, b"eglMakeCurrent\0")?,
                destroy_context: symbol(&library, b"eglDestroyContext\0")?,
                destroy_surface: symbol(&library, b"eglDestroySurface\0")?,
                get_error: symbol(&library, b"eglGetError\0")?,
                _library: library,
            })
        }
    }
}

impl GlesApi {
    fn load(path: Option<&Path>) -> Result<Self> {
        let library = open_library(path, DEFAULT_GLES_LIBRARIES)?;
        // SAFETY: signatures follow the GL ES 3.1 headers.
        unsafe {
            let get_integeri_v = match symbol(&library, b"glGetIntegeri_v\0") {
                Ok(func) => Some(func),
                Err(err) => {
                    debug!("{err:#}");
                    None
                }
            };
            Ok(Self {
                get_string: symbol(&library, b"glGetString\0")?,
                get_integerv: symbol(&library, b"glGetIntegerv\0")?,
                get_integeri_v,
                get_error: symbol(&library, b"glGetError\0")?,
                _library: library,
            })
        }
    }
}

/// Display, pbuffer and context that stay current while any handle lives.
struct NativeContext {
    egl: EglApi,
    gles: GlesApi,
    display: EglDisplay,
    surface: EglSurface,
    context: EglContext,
    client_version: EglInt,
}

impl NativeContext {
    fn open(paths: &LibraryPaths) -> Result<Self> {
        let egl = EglApi::load(paths.egl.as_deref()).context("loading EGL")?;
        let gles = GlesApi::load(paths.gles.as_deref()).context("loading GL ES")?;

        // SAFETY: every call below goes through symbols resolved from the
        // loaded EGL library with their header signatures.
        unsafe {
            let display = (egl.get_display)(ptr::null_mut());
            if display.is_null() {
                bail!("eglGetDisplay returned EGL_NO_DISPLAY");
            }
            let (mut major, mut minor) = (0, 0);
            if (egl.initialize)(display, &mut major, &mut minor) == EGL_FALSE {
                bail!("eglInitialize failed (0x{:04X})", (egl.get_error)());
            }
            debug!("EGL {major}.{minor} initialized");
            if (egl.bind_api)(EGL_OPENGL_ES_API) == EGL_FALSE {
                (egl.terminate)(display);
                bail!("eglBindAPI(EGL_OPENGL_ES_API) failed");
            }

            for (client_version, renderable) in [(3, EGL_OPENGL_ES3_BIT), (2, EGL_OPENGL_ES2_BIT)] {
                match create_current(&egl, display, client_version, renderable) {
                    Some((surface, context)) => {
                        info!("created OpenGL ES {client_version} pbuffer context");
                        return Ok(Self {
                            egl,
                            gles,
                            display,
                            surface,
                            context,
                            client_version,
                        });
                    }
                    None => debug!("OpenGL ES {client_version} context unavailable"),
                }
            }
            let code = (egl.get_error)();
            (egl.terminate)(display);
            bail!("no OpenGL ES 3 or 2 context could be created (0x{code:04X})");
        }
    }
}

/// # Safety
/// `display` must be an initialized display of `egl`.
unsafe fn create_current(
    egl: &EglApi,
    display: EglDisplay,
    client_version: EglInt,
    renderable: EglInt,
) -> Option<(EglSurface, EglContext)> {
    let config_attribs = [
        EGL_SURFACE_TYPE,
        EGL_PBUFFER_BIT,
        EGL_RENDERABLE_TYPE,
        renderable,
        EGL_NONE,
    ];
    let mut config: EglConfig = ptr::null_mut();
    let mut count = 0;
    unsafe {
        if (egl.choose_config)(display, config_attribs.as_ptr(), &mut config, 1, &mut count)
            == EGL_FALSE
            || count < 1
        {
            return None;
        }

        let surface_attribs = [EGL_WIDTH, 1, EGL_HEIGHT, 1, EGL_NONE];
        let surface = (egl.create_pbuffer_surface)(display, config, surface_attribs.as_ptr());
        if surface.is_null() {
            return None;
        }

        let context_attribs = [EGL_CONTEXT_CLIENT_VERSION, client_version, EGL_NONE];
        let context =
            (egl.create_context)(display, config, ptr::null_mut(), context_attribs.as_ptr());
        if context.is_null() {
            (egl.destroy_surface)(display, surface);
            return None;
        }

        if (egl.make_current)(display, surface, surface, context) == EGL_FALSE {
            (egl.destroy_context)(display, context);
            (egl.destroy_surface)(display, surface);
            return None;
        }
        Some((surface, context))
    }
}

impl Drop for NativeContext {
    fn drop(&mut self) {
        // SAFETY: the handles were created from this display and are
        // released exactly once.
        unsafe {
            (self.egl.make_current)(
                self.display,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
            (self.egl.destroy_context)(self.display, self.context);
            (self.egl.destroy_surface)(self.display, self.surface);
            (self.egl.terminate)(self.display);
        }
    }
}

/// GL ES queries against the shared native context.
pub struct NativeGles {
    context: Rc<NativeContext>,
}

/// EGL queries against the shared native display.
pub struct NativeEgl {
    context: Rc<NativeContext>,
    configs: Vec<EglConfig>,
}

/// Bring up a current context and return driver handles for it.
///
/// Handles are neither `Send` nor `Sync`: the context is current only on the
/// thread that called this.
pub fn open_drivers(paths: &LibraryPaths) -> Result<(NativeGles, NativeEgl)> {
    let context = Rc::new(NativeContext::open(paths)?);
    Ok((
        NativeGles {
            context: Rc::clone(&context),
        },
        NativeEgl {
            context,
            configs: Vec::new(),
        },
    ))
}

impl NativeGles {
    /// Client version of the context that was created (3 or 2).
    pub fn client_version(&self) -> i32 {
        self.context.client_version
    }

    fn api(&self) -> &GlesApi {
        &self.context.gles
    }

    fn drain_errors(&self) {
        for _ in 0..MAX_PENDING_ERRORS {
            // SAFETY: glGetError has no preconditions beyond a current context.
            if unsafe { (self.api().get_error)() } == gl::NO_ERROR {
                break;
            }
        }
    }

    fn check_error(&self) -> Result<(), QueryError> {
        // SAFETY: as above.
        match unsafe { (self.api().get_error)() } {
            gl::NO_ERROR => Ok(()),
            code => Err(QueryError::Driver(code)),
        }
    }
}

impl GlesDriver for NativeGles {
    fn get_string(&mut self, name: GlEnum) -> Option<String> {
        // SAFETY: glGetString returns null or a static NUL-terminated string.
        let raw = unsafe { (self.api().get_string)(name.value) };
        if raw.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(raw.cast::<c_char>()) };
        Some(text.to_string_lossy().into_owned())
    }

    fn get_integer(&mut self, name: GlEnum) -> Result<i64, QueryError> {
        self.drain_errors();
        // Some scalar-looking limits (GL_MAX_VIEWPORT_DIMS) write two values.
        let mut buffer = [0i32; 4];
        // SAFETY: the buffer covers every pname queried as a scalar.
        unsafe { (self.api().get_integerv)(name.value, buffer.as_mut_ptr()) };
        self.check_error()?;
        Ok(i64::from(buffer[0]))
    }

    fn get_integer_indexed(&mut self, name: GlEnum, index: u32) -> Result<i64, QueryError> {
        let func = self
            .api()
            .get_integeri_v
            .ok_or(QueryError::EntryPointMissing("glGetIntegeri_v"))?;
        self.drain_errors();
        let mut buffer = [0i32; 4];
        // SAFETY: indexed queries write a single GLint.
        unsafe { func(name.value, index, buffer.as_mut_ptr()) };
        self.check_error()?;
        Ok(i64::from(buffer[0]))
    }

    fn get_integer_array(&mut self, name: GlEnum, len: usize) -> Result<Vec<i64>, QueryError> {
        self.drain_errors();
        let mut buffer = vec![0i32; len.max(1)];
        // SAFETY: callers size `len` from the matching GL_NUM_* query.
        unsafe { (self.api().get_integerv)(name.value, buffer.as_mut_ptr()) };
        self.check_error()?;
        buffer.truncate(len);
        Ok(buffer.into_iter().map(i64::from).collect())
    }
}

impl NativeEgl {
    fn api(&self) -> &EglApi {
        &self.context.egl
    }

    fn display(&self) -> EglDisplay {
        self.context.display
    }
}

impl EglDriver for NativeEgl {
    fn initialize(&mut self) -> bool {
        let (mut major, mut minor) = (0, 0);
        // SAFETY: re-initializing an initialized display is a no-op.
        unsafe { (self.api().initialize)(self.display(), &mut major, &mut minor) != EGL_FALSE }
    }

    fn query_string(&mut self, name: EglEnum) -> Option<String> {
        // SAFETY: eglQueryString returns null or a static NUL-terminated string.
        let raw = unsafe { (self.api().query_string)(self.display(), name.value) };
        if raw.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    fn config_count(&mut self) -> usize {
        let mut count = 0;
        // SAFETY: a null config buffer with size 0 only reports the count.
        unsafe {
            if (self.api().get_configs)(self.display(), ptr::null_mut(), 0, &mut count) == EGL_FALSE {
                return 0;
            }
            let mut configs = vec![ptr::null_mut(); count.max(0) as usize];
            let mut written = 0;
            if (self.api().get_configs)(self.display(), configs.as_mut_ptr(), count, &mut written)
                == EGL_FALSE
            {
                return 0;
            }
            configs.truncate(written.max(0) as usize);
            self.configs = configs;
        }
        self.configs.len()
    }

    fn config_attrib(&mut self, index: usize, attribute: EglEnum) -> Option<i32> {
        let config = *self.configs.get(index)?;
        let mut value = 0;
        // SAFETY: `config` came from eglGetConfigs on this display.
        let ok = unsafe {
            (self.api().get_config_attrib)(self.display(), config, attribute.value, &mut value)
        };
        (ok != EGL_FALSE).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_library_reports_path() {
        let missing = PathBuf::from("/nonexistent/libEGL-glescaps-test.so");
        let paths = LibraryPaths {
            egl: Some(missing),
            gles: None,
        };
        let err = match open_drivers(&paths) {
            Ok(_) => panic!("opening a missing library must fail"),
            Err(err) => err,
        };
        assert!(format!("{err:#}").contains("libEGL-glescaps-test.so"));
    }
}
