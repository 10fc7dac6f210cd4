//! Recorded driver answers.
//!
//! A capture stores every answer a driver gave during one collection, keyed
//! by symbolic enum name, so the collector can be rerun offline against
//! [`ReplayDriver`] and the results compared across machines. Files are JSON
//! in the `glescaps-capture-v1` layout described by
//! `schema/capture.schema.json` and are validated on load.

mod record;
mod replay;

pub use record::RecordingDriver;
pub use replay::ReplayDriver;

use crate::model::DeviceProfile;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const CAPTURE_FORMAT: &str = "glescaps-capture-v1";

const CAPTURE_SCHEMA: &str = include_str!("../../schema/capture.schema.json");

/// A single integer answer: a value or the error the driver raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerAnswer {
    Value(i64),
    Error { error: u32 },
}

/// A buffer answer to an array query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayAnswer {
    Values(Vec<i64>),
    Error { error: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlCapture {
    /// Strings the driver returned; absent keys were null.
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
    /// Scalar answers, plus indexed answers keyed `NAME[i]`.
    #[serde(default)]
    pub integers: BTreeMap<String, IntegerAnswer>,
    #[serde(default)]
    pub arrays: BTreeMap<String, ArrayAnswer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EglCapture {
    pub initialized: bool,
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
    /// Attribute answers per config, in `eglGetConfigs` order.
    #[serde(default)]
    pub configs: Vec<BTreeMap<String, i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub format: String,
    pub gl: GlCapture,
    pub egl: EglCapture,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceProfile>,
}

impl Default for Capture {
    fn default() -> Self {
        Self {
            format: CAPTURE_FORMAT.to_string(),
            gl: GlCapture::default(),
            egl: EglCapture::default(),
            device: None,
        }
    }
}

impl Capture {
    /// Read, validate, and decode a capture file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading capture {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("loading capture {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("parsing capture JSON")?;
        validate_capture(&value)?;
        serde_json::from_value(value).context("decoding capture")
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("encoding capture")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text = self.to_json_string()?;
        text.push('\n');
        fs::write(path, text).with_context(|| format!("writing capture {}", path.display()))
    }
}

/// Check a decoded JSON document against the capture schema.
pub fn validate_capture(value: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(CAPTURE_SCHEMA).context("parsing embedded capture schema")?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| anyhow!("compiling capture schema: {err}"))?;
    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("capture failed schema validation:\n{details}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "format": CAPTURE_FORMAT,
            "gl": {
                "strings": {"GL_VERSION": "OpenGL ES 2.0"},
                "integers": {
                    "GL_MAX_TEXTURE_SIZE": 4096,
                    "GL_MAX_SAMPLES": {"error": 1280},
                    "GL_MAX_COMPUTE_WORK_GROUP_SIZE[2]": 64
                },
                "arrays": {"GL_COMPRESSED_TEXTURE_FORMATS": [36196]}
            },
            "egl": {"initialized": false}
        })
    }

    #[test]
    fn decodes_values_and_errors() {
        let capture = Capture::from_json_str(&minimal().to_string()).expect("valid capture");
        assert_eq!(
            capture.gl.integers.get("GL_MAX_TEXTURE_SIZE"),
            Some(&IntegerAnswer::Value(4096))
        );
        assert_eq!(
            capture.gl.integers.get("GL_MAX_SAMPLES"),
            Some(&IntegerAnswer::Error { error: 0x500 })
        );
        assert!(!capture.egl.initialized);
        assert!(capture.device.is_none());
    }

    #[test]
    fn rejects_unknown_format_tag() {
        let mut value = minimal();
        value["format"] = json!("glescaps-capture-v0");
        let err = Capture::from_json_str(&value.to_string()).expect_err("bad format");
        assert!(format!("{err:#}").contains("schema validation"));
    }

    #[test]
    fn rejects_misnamed_keys() {
        let mut value = minimal();
        value["gl"]["integers"]["max_texture_size"] = json!(1);
        assert!(validate_capture(&value).is_err());
    }

    #[test]
    fn save_and_load_preserve_capture() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("capture.json");
        let capture = Capture::from_json_str(&minimal().to_string()).expect("valid capture");
        capture.save(&path).expect("save");
        assert_eq!(Capture::load(&path).expect("load"), capture);
    }

    #[test]
    fn default_capture_passes_schema() {
        let value = serde_json::to_value(Capture::default()).expect("encode");
        validate_capture(&value).expect("default capture is valid");
    }
}
