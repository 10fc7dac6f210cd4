use super::{ArrayAnswer, Capture, IntegerAnswer};
use crate::egl::{EglDriver, EglEnum};
use crate::gl::{GlEnum, GlesDriver, QueryError};
use crate::model::DeviceProfile;

/// Serves driver answers from a [`Capture`]. Queries with no recorded answer
/// fail with [`QueryError::NotRecorded`].
#[derive(Debug, Clone)]
pub struct ReplayDriver {
    capture: Capture,
}

impl ReplayDriver {
    pub fn new(capture: Capture) -> Self {
        Self { capture }
    }

    pub fn device(&self) -> Option<&DeviceProfile> {
        self.capture.device.as_ref()
    }

    fn integer(&self, key: &str) -> Result<i64, QueryError> {
        match self.capture.gl.integers.get(key) {
            Some(IntegerAnswer::Value(value)) => Ok(*value),
            Some(IntegerAnswer::Error { error }) => Err(QueryError::Driver(*error)),
            None => Err(QueryError::NotRecorded),
        }
    }
}

impl GlesDriver for ReplayDriver {
    fn get_string(&mut self, name: GlEnum) -> Option<String> {
        self.capture.gl.strings.get(name.name).cloned()
    }

    fn get_integer(&mut self, name: GlEnum) -> Result<i64, QueryError> {
        self.integer(name.name)
    }

    fn get_integer_indexed(&mut self, name: GlEnum, index: u32) -> Result<i64, QueryError> {
        self.integer(&format!("{}[{index}]", name.name))
    }

    fn get_integer_array(&mut self, name: GlEnum, len: usize) -> Result<Vec<i64>, QueryError> {
        match self.capture.gl.arrays.get(name.name) {
            // Never more than recorded, whatever the requested length.
            Some(ArrayAnswer::Values(values)) => Ok(values.iter().copied().take(len).collect()),
            Some(ArrayAnswer::Error { error }) => Err(QueryError::Driver(*error)),
            None => Err(QueryError::NotRecorded),
        }
    }
}

impl EglDriver for ReplayDriver {
    fn initialize(&mut self) -> bool {
        self.capture.egl.initialized
    }

    fn query_string(&mut self, name: EglEnum) -> Option<String> {
        self.capture.egl.strings.get(name.name).cloned()
    }

    fn config_count(&mut self) -> usize {
        self.capture.egl.configs.len()
    }

    fn config_attrib(&mut self, index: usize, attribute: EglEnum) -> Option<i32> {
        self.capture
            .egl
            .configs
            .get(index)?
            .get(attribute.name)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::GlCapture;
    use crate::gl;
    use std::collections::BTreeMap;

    fn driver() -> ReplayDriver {
        let capture = Capture {
            gl: GlCapture {
                strings: BTreeMap::from([("GL_VENDOR".to_string(), "Qualcomm".to_string())]),
                integers: BTreeMap::from([
                    ("GL_MAX_TEXTURE_SIZE".to_string(), IntegerAnswer::Value(16384)),
                    (
                        "GL_MAX_COMPUTE_WORK_GROUP_COUNT[1]".to_string(),
                        IntegerAnswer::Value(65535),
                    ),
                    (
                        "GL_MAX_SAMPLES".to_string(),
                        IntegerAnswer::Error { error: gl::INVALID_ENUM },
                    ),
                ]),
                arrays: BTreeMap::from([(
                    "GL_COMPRESSED_TEXTURE_FORMATS".to_string(),
                    ArrayAnswer::Values(vec![0x8D64, 0x9274]),
                )]),
            },
            ..Capture::default()
        };
        ReplayDriver::new(capture)
    }

    #[test]
    fn answers_come_from_capture() {
        let mut replay = driver();
        assert_eq!(replay.get_string(gl::VENDOR).as_deref(), Some("Qualcomm"));
        assert_eq!(replay.get_string(gl::RENDERER), None);
        assert_eq!(
            replay.get_integer(GlEnum::new("GL_MAX_TEXTURE_SIZE", 0x0D33)),
            Ok(16384)
        );
        assert_eq!(
            replay.get_integer_indexed(GlEnum::new("GL_MAX_COMPUTE_WORK_GROUP_COUNT", 0x91BE), 1),
            Ok(65535)
        );
    }

    #[test]
    fn recorded_errors_and_gaps_are_distinct() {
        let mut replay = driver();
        assert_eq!(
            replay.get_integer(GlEnum::new("GL_MAX_SAMPLES", 0x8D57)),
            Err(QueryError::Driver(gl::INVALID_ENUM))
        );
        assert_eq!(
            replay.get_integer(GlEnum::new("GL_MAX_3D_TEXTURE_SIZE", 0x8073)),
            Err(QueryError::NotRecorded)
        );
    }

    #[test]
    fn arrays_return_at_most_recorded_values() {
        let mut replay = driver();
        assert_eq!(
            replay.get_integer_array(gl::COMPRESSED_TEXTURE_FORMATS, 1),
            Ok(vec![0x8D64])
        );
        assert_eq!(
            replay.get_integer_array(gl::COMPRESSED_TEXTURE_FORMATS, 3),
            Ok(vec![0x8D64, 0x9274])
        );
        assert_eq!(
            replay.get_integer_array(gl::COMPRESSED_TEXTURE_FORMATS, usize::MAX),
            Ok(vec![0x8D64, 0x9274])
        );
    }
}
