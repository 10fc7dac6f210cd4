//! In-memory capability model.
//!
//! The aggregate is built once by the collector and then only read: by the
//! view, the serializer, and the upload path. Every type derives serde so the
//! same model can be exported as JSON or embedded in a capture.

use crate::generation::Generation;
use serde::{Deserialize, Serialize};

/// Schema tag embedded in every serialized report. Bump on any change to the
/// report layout so the receiving database can branch on it.
pub const REPORT_VERSION: u32 = 6;

/// Value recorded when a driver query fails.
pub const UNKNOWN_VALUE: &str = "unknown";

/// Placeholder for GL strings the driver did not return.
pub const MISSING_STRING: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One queried limit: `GL_*` identifier, display caption, and textual value.
pub struct CapabilityEntry {
    pub name: String,
    pub display_name: String,
    /// Never empty; failed queries hold [`UNKNOWN_VALUE`].
    pub value: String,
}

impl CapabilityEntry {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut value = value.into();
        if value.is_empty() {
            value = UNKNOWN_VALUE.to_string();
        }
        Self {
            name: name.into(),
            display_name: display_name.into(),
            value,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.value == UNKNOWN_VALUE
    }
}

/// Ordered entries for one generation, in declaration order.
///
/// Unsupported generations hold an empty set rather than no set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    entries: Vec<CapabilityEntry>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CapabilityEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CapabilityEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[CapabilityEntry] {
        &self.entries
    }

    /// First entry with the given `GL_*` name (indexed entries carry `[i]`).
    pub fn get(&self, name: &str) -> Option<&CapabilityEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

impl FromIterator<CapabilityEntry> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = CapabilityEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a CapabilityEntry;
    type IntoIter = std::slice::Iter<'a, CapabilityEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EglConfigSummary {
    pub id: i32,
    pub red_size: i32,
    pub green_size: i32,
    pub blue_size: i32,
    pub alpha_size: i32,
    pub depth_size: i32,
    pub stencil_size: i32,
    /// Comma-joined client API names, e.g. `"GLES, GLES2"`.
    pub renderable_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorInfo {
    pub name: String,
    pub max_range: f32,
    pub resolution: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Host description that accompanies the graphics data.
pub struct DeviceProfile {
    pub name: String,
    pub os: String,
    pub cpu_cores: u32,
    pub cpu_speed_mhz: f32,
    pub cpu_arch: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Sorted, without blanks or duplicates. Use [`DeviceProfile::add_feature`].
    pub features: Vec<String>,
    pub sensors: Vec<SensorInfo>,
}

impl DeviceProfile {
    /// Insert a feature name keeping the list sorted and unique. Blank names
    /// are dropped.
    pub fn add_feature(&mut self, feature: impl Into<String>) {
        let feature = feature.into();
        let trimmed = feature.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Err(pos) = self.features.binary_search_by(|f| f.as_str().cmp(trimmed)) {
            self.features.insert(pos, trimmed.to_string());
        }
    }

    pub fn extend_features<I, S>(&mut self, features: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for feature in features {
            self.add_feature(feature);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Everything read from the GL ES context.
pub struct GlInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language_version: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub shading_language_major_version: u32,
    pub shading_language_minor_version: u32,
    /// Space-delimited, exactly as the driver returned it.
    pub extensions: String,
    pub es20: CapabilitySet,
    pub es30: CapabilitySet,
    pub es31: CapabilitySet,
    pub es32: CapabilitySet,
    pub compressed_formats: Vec<String>,
    pub shader_binary_formats: Vec<String>,
    pub program_binary_formats: Vec<String>,
}

impl Default for GlInfo {
    fn default() -> Self {
        Self {
            vendor: MISSING_STRING.to_string(),
            renderer: MISSING_STRING.to_string(),
            version: MISSING_STRING.to_string(),
            shading_language_version: UNKNOWN_VALUE.to_string(),
            major_version: 0,
            minor_version: 0,
            shading_language_major_version: 0,
            shading_language_minor_version: 0,
            extensions: String::new(),
            es20: CapabilitySet::new(),
            es30: CapabilitySet::new(),
            es31: CapabilitySet::new(),
            es32: CapabilitySet::new(),
            compressed_formats: Vec::new(),
            shader_binary_formats: Vec::new(),
            program_binary_formats: Vec::new(),
        }
    }
}

impl GlInfo {
    pub fn capabilities(&self, generation: Generation) -> &CapabilitySet {
        match generation {
            Generation::Es20 => &self.es20,
            Generation::Es30 => &self.es30,
            Generation::Es31 => &self.es31,
            Generation::Es32 => &self.es32,
        }
    }

    pub fn capabilities_mut(&mut self, generation: Generation) -> &mut CapabilitySet {
        match generation {
            Generation::Es20 => &mut self.es20,
            Generation::Es30 => &mut self.es30,
            Generation::Es31 => &mut self.es31,
            Generation::Es32 => &mut self.es32,
        }
    }

    pub fn extension_list(&self) -> impl Iterator<Item = &str> {
        self.extensions.split_whitespace()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Display-system information. When `available` is false every other field
/// stays at its default.
pub struct EglInfo {
    pub available: bool,
    pub vendor: String,
    pub version: String,
    pub extensions: String,
    pub client_apis: String,
    pub configs: Vec<EglConfigSummary>,
}

impl EglInfo {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn extension_list(&self) -> impl Iterator<Item = &str> {
        self.extensions.split_whitespace()
    }

    pub fn client_api_list(&self) -> impl Iterator<Item = &str> {
        self.client_apis.split_whitespace()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Root aggregate handed to the view, the serializer, and the uploader.
pub struct ImplementationReport {
    pub report_version: u32,
    pub gl: GlInfo,
    pub egl: EglInfo,
    pub device: DeviceProfile,
}

impl ImplementationReport {
    pub fn new(gl: GlInfo, egl: EglInfo, device: DeviceProfile) -> Self {
        Self {
            report_version: REPORT_VERSION,
            gl,
            egl,
            device,
        }
    }

    /// Device + OS + GL version; the remote database deduplicates on it.
    pub fn description(&self) -> String {
        format!("{} {} {}", self.device.name, self.device.os, self.gl.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_never_hold_empty_values() {
        let entry = CapabilityEntry::new("GL_MAX_SAMPLES", "Max. multisample samples", "");
        assert_eq!(entry.value, UNKNOWN_VALUE);
        assert!(entry.is_unknown());
    }

    #[test]
    fn features_stay_sorted_and_unique() {
        let mut device = DeviceProfile::default();
        device.extend_features(["sse2", "avx", "", "  ", "sse2", "aes"]);
        assert_eq!(device.features, vec!["aes", "avx", "sse2"]);
    }

    #[test]
    fn description_joins_name_os_and_version() {
        let device = DeviceProfile {
            name: "Pixel 7".to_string(),
            os: "14".to_string(),
            ..DeviceProfile::default()
        };
        let gl = GlInfo {
            version: "OpenGL ES 3.2 v1.r38p1".to_string(),
            ..GlInfo::default()
        };
        let report = ImplementationReport::new(gl, EglInfo::unavailable(), device);
        assert_eq!(report.description(), "Pixel 7 14 OpenGL ES 3.2 v1.r38p1");
        assert_eq!(report.report_version, REPORT_VERSION);
    }

    #[test]
    fn default_sets_are_empty_not_absent() {
        let gl = GlInfo::default();
        for generation in Generation::ALL {
            assert!(gl.capabilities(generation).is_empty());
        }
    }

    #[test]
    fn whitespace_lists_ignore_blank_runs() {
        let egl = EglInfo {
            extensions: "  EGL_KHR_image   EGL_KHR_fence_sync ".to_string(),
            ..EglInfo::default()
        };
        assert_eq!(egl.extension_list().count(), 2);
        assert_eq!(egl.client_api_list().count(), 0);
    }

    #[test]
    fn capability_set_serializes_as_plain_array() {
        let set: CapabilitySet = [CapabilityEntry::new("GL_A", "A", "1")].into_iter().collect();
        let json = serde_json::to_value(&set).expect("serialize set");
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "GL_A");
    }
}
