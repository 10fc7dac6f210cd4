//! OpenGL ES query surface.
//!
//! Collection never talks to a driver library directly; it goes through
//! [`GlesDriver`] so the same code runs against the native backend, a replayed
//! capture, or a test double. Enum constants carry their symbolic name so
//! recorded captures stay readable and so replay can key on the name.

use std::fmt;

/// A GL enum value paired with its canonical `GL_*` name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlEnum {
    pub name: &'static str,
    pub value: u32,
}

impl GlEnum {
    pub const fn new(name: &'static str, value: u32) -> Self {
        Self { name, value }
    }
}

pub const VENDOR: GlEnum = GlEnum::new("GL_VENDOR", 0x1F00);
pub const RENDERER: GlEnum = GlEnum::new("GL_RENDERER", 0x1F01);
pub const VERSION: GlEnum = GlEnum::new("GL_VERSION", 0x1F02);
pub const EXTENSIONS: GlEnum = GlEnum::new("GL_EXTENSIONS", 0x1F03);
pub const SHADING_LANGUAGE_VERSION: GlEnum = GlEnum::new("GL_SHADING_LANGUAGE_VERSION", 0x8B8C);

pub const NUM_COMPRESSED_TEXTURE_FORMATS: GlEnum =
    GlEnum::new("GL_NUM_COMPRESSED_TEXTURE_FORMATS", 0x86A2);
pub const COMPRESSED_TEXTURE_FORMATS: GlEnum = GlEnum::new("GL_COMPRESSED_TEXTURE_FORMATS", 0x86A3);
pub const NUM_SHADER_BINARY_FORMATS: GlEnum = GlEnum::new("GL_NUM_SHADER_BINARY_FORMATS", 0x8DF9);
pub const SHADER_BINARY_FORMATS: GlEnum = GlEnum::new("GL_SHADER_BINARY_FORMATS", 0x8DF8);
// Program binaries are core in ES 3.0 but ES 2.0 drivers with
// GL_OES_get_program_binary answer the same enums.
pub const NUM_PROGRAM_BINARY_FORMATS: GlEnum = GlEnum::new("GL_NUM_PROGRAM_BINARY_FORMATS", 0x87FE);
pub const PROGRAM_BINARY_FORMATS: GlEnum = GlEnum::new("GL_PROGRAM_BINARY_FORMATS", 0x87FF);

pub const NO_ERROR: u32 = 0;
pub const INVALID_ENUM: u32 = 0x0500;
pub const INVALID_VALUE: u32 = 0x0501;
pub const INVALID_OPERATION: u32 = 0x0502;
pub const OUT_OF_MEMORY: u32 = 0x0505;
pub const INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;

/// Why a single integer query produced no value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The driver raised an error state (`glGetError` != `GL_NO_ERROR`).
    Driver(u32),
    /// The driver library does not export the entry point (e.g.
    /// `glGetIntegeri_v` on an ES 2.0 library).
    EntryPointMissing(&'static str),
    /// A replayed capture holds no answer for the query.
    NotRecorded,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Driver(code) => write!(f, "driver error {}", error_name(*code)),
            QueryError::EntryPointMissing(symbol) => write!(f, "entry point {symbol} unavailable"),
            QueryError::NotRecorded => write!(f, "no recorded answer"),
        }
    }
}

impl std::error::Error for QueryError {}

/// Human-readable name for a `glGetError` code.
pub fn error_name(code: u32) -> String {
    match code {
        NO_ERROR => "GL_NO_ERROR".to_string(),
        INVALID_ENUM => "GL_INVALID_ENUM".to_string(),
        INVALID_VALUE => "GL_INVALID_VALUE".to_string(),
        INVALID_OPERATION => "GL_INVALID_OPERATION".to_string(),
        OUT_OF_MEMORY => "GL_OUT_OF_MEMORY".to_string(),
        INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION".to_string(),
        other => format!("0x{other:04X}"),
    }
}

/// Query surface of a current GL ES context.
///
/// Implementations must only be used on the thread where the context is
/// current. Every integer query reports failure per call; callers decide how
/// to record it.
pub trait GlesDriver {
    /// `glGetString`; `None` when the driver returns a null pointer.
    fn get_string(&mut self, name: GlEnum) -> Option<String>;

    /// Scalar `glGetIntegerv`.
    fn get_integer(&mut self, name: GlEnum) -> Result<i64, QueryError>;

    /// Indexed `glGetIntegeri_v` (ES 3.1 compute limits).
    fn get_integer_indexed(&mut self, name: GlEnum, index: u32) -> Result<i64, QueryError>;

    /// `glGetIntegerv` into a buffer of `len` elements.
    fn get_integer_array(&mut self, name: GlEnum, len: usize) -> Result<Vec<i64>, QueryError>;
}

impl<T: GlesDriver + ?Sized> GlesDriver for &mut T {
    fn get_string(&mut self, name: GlEnum) -> Option<String> {
        (**self).get_string(name)
    }

    fn get_integer(&mut self, name: GlEnum) -> Result<i64, QueryError> {
        (**self).get_integer(name)
    }

    fn get_integer_indexed(&mut self, name: GlEnum, index: u32) -> Result<i64, QueryError> {
        (**self).get_integer_indexed(name, index)
    }

    fn get_integer_array(&mut self, name: GlEnum, len: usize) -> Result<Vec<i64>, QueryError> {
        (**self).get_integer_array(name, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_names_cover_core_codes() {
        assert_eq!(error_name(INVALID_ENUM), "GL_INVALID_ENUM");
        assert_eq!(error_name(OUT_OF_MEMORY), "GL_OUT_OF_MEMORY");
        assert_eq!(error_name(0x1234), "0x1234");
    }

    #[test]
    fn query_error_display_mentions_cause() {
        let err = QueryError::Driver(INVALID_ENUM);
        assert_eq!(err.to_string(), "driver error GL_INVALID_ENUM");
        let err = QueryError::EntryPointMissing("glGetIntegeri_v");
        assert!(err.to_string().contains("glGetIntegeri_v"));
    }
}
