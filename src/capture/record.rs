use super::{ArrayAnswer, Capture, IntegerAnswer};
use crate::egl::{EglDriver, EglEnum};
use crate::gl::{GlEnum, GlesDriver, QueryError};
use crate::model::DeviceProfile;
use std::collections::BTreeMap;

/// Forwards every query to live drivers and keeps the answers.
///
/// Only answers a driver actually gave are kept: values and driver error
/// codes. Missing entry points leave the key absent so a replay reports the
/// query as unrecorded.
pub struct RecordingDriver<G, E> {
    gles: G,
    egl: E,
    capture: Capture,
}

impl<G, E> RecordingDriver<G, E> {
    pub fn new(gles: G, egl: E) -> Self {
        Self {
            gles,
            egl,
            capture: Capture::default(),
        }
    }

    /// Finish recording, attaching the device profile that was in effect.
    pub fn into_capture(self, device: Option<DeviceProfile>) -> Capture {
        let mut capture = self.capture;
        capture.device = device;
        capture
    }

    fn record_integer(&mut self, key: String, result: &Result<i64, QueryError>) {
        let answer = match result {
            Ok(value) => IntegerAnswer::Value(*value),
            Err(QueryError::Driver(code)) => IntegerAnswer::Error { error: *code },
            Err(_) => return,
        };
        self.capture.gl.integers.insert(key, answer);
    }
}

impl<G: GlesDriver, E> GlesDriver for RecordingDriver<G, E> {
    fn get_string(&mut self, name: GlEnum) -> Option<String> {
        let answer = self.gles.get_string(name);
        if let Some(text) = &answer {
            self.capture
                .gl
                .strings
                .insert(name.name.to_string(), text.clone());
        }
        answer
    }

    fn get_integer(&mut self, name: GlEnum) -> Result<i64, QueryError> {
        let result = self.gles.get_integer(name);
        self.record_integer(name.name.to_string(), &result);
        result
    }

    fn get_integer_indexed(&mut self, name: GlEnum, index: u32) -> Result<i64, QueryError> {
        let result = self.gles.get_integer_indexed(name, index);
        self.record_integer(format!("{}[{index}]", name.name), &result);
        result
    }

    fn get_integer_array(&mut self, name: GlEnum, len: usize) -> Result<Vec<i64>, QueryError> {
        let result = self.gles.get_integer_array(name, len);
        let answer = match &result {
            Ok(values) => Some(ArrayAnswer::Values(values.clone())),
            Err(QueryError::Driver(code)) => Some(ArrayAnswer::Error { error: *code }),
            Err(_) => None,
        };
        if let Some(answer) = answer {
            self.capture.gl.arrays.insert(name.name.to_string(), answer);
        }
        result
    }
}

impl<G, E: EglDriver> EglDriver for RecordingDriver<G, E> {
    fn initialize(&mut self) -> bool {
        let initialized = self.egl.initialize();
        self.capture.egl.initialized = initialized;
        initialized
    }

    fn query_string(&mut self, name: EglEnum) -> Option<String> {
        let answer = self.egl.query_string(name);
        if let Some(text) = &answer {
            self.capture
                .egl
                .strings
                .insert(name.name.to_string(), text.clone());
        }
        answer
    }

    fn config_count(&mut self) -> usize {
        let count = self.egl.config_count();
        self.capture.egl.configs.resize_with(count, BTreeMap::new);
        count
    }

    fn config_attrib(&mut self, index: usize, attribute: EglEnum) -> Option<i32> {
        let answer = self.egl.config_attrib(index, attribute);
        if let (Some(value), Some(config)) = (answer, self.capture.egl.configs.get_mut(index)) {
            config.insert(attribute.name.to_string(), value);
        }
        answer
    }
}
