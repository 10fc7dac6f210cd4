//! Capability collection against a current GL ES context.
//!
//! Per-query failures are absorbed here: a failed limit becomes an
//! `"unknown"` entry, a failed format count becomes an empty list, and the
//! remaining queries always run.

use crate::formats::{FormatCategory, resolve_format_name};
use crate::generation::Generation;
use crate::gl::{self, GlEnum, GlesDriver};
use crate::model::{
    CapabilityEntry, CapabilitySet, DeviceProfile, EglInfo, GlInfo, ImplementationReport,
    MISSING_STRING, UNKNOWN_VALUE,
};
use crate::version::parse_version;
use log::{debug, warn};

/// Upper bound on a format enumeration. Real drivers report a few dozen
/// codes; anything past this is a corrupt count and the list is skipped.
pub const MAX_FORMAT_COUNT: i64 = 4096;

/// Query every entry declared for `generation`.
///
/// Indexed limits expand to `NAME[0]`..`NAME[n-1]`, so the result always has
/// [`Generation::expected_len`] entries.
pub fn collect_generation<D: GlesDriver>(driver: &mut D, generation: Generation) -> CapabilitySet {
    let mut set = CapabilitySet::new();
    for spec in generation.specs() {
        if spec.arity == 1 {
            let value = render_value(spec.query, None, driver.get_integer(spec.query));
            set.push(CapabilityEntry::new(spec.query.name, spec.display_name, value));
            continue;
        }
        for index in 0..spec.arity {
            let value = render_value(
                spec.query,
                Some(index),
                driver.get_integer_indexed(spec.query, index),
            );
            set.push(CapabilityEntry::new(
                format!("{}[{index}]", spec.query.name),
                format!("{}[{index}]", spec.display_name),
                value,
            ));
        }
    }
    set
}

fn render_value(query: GlEnum, index: Option<u32>, result: Result<i64, gl::QueryError>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(err) => {
            match index {
                Some(index) => debug!("{}[{index}]: {err}", query.name),
                None => debug!("{}: {err}", query.name),
            }
            UNKNOWN_VALUE.to_string()
        }
    }
}

/// Read a variable-length format enumeration and resolve every code.
///
/// The list is only fetched when the count query succeeded and reported
/// between one and [`MAX_FORMAT_COUNT`] formats.
pub fn collect_format_list<D: GlesDriver>(
    driver: &mut D,
    count_query: GlEnum,
    list_query: GlEnum,
    category: FormatCategory,
) -> Vec<String> {
    let count = match driver.get_integer(count_query) {
        Ok(count) => count,
        Err(err) => {
            debug!("{}: {err}", count_query.name);
            return Vec::new();
        }
    };
    if count <= 0 {
        return Vec::new();
    }
    if count > MAX_FORMAT_COUNT {
        warn!(
            "{} reported {count} formats (limit {MAX_FORMAT_COUNT}), skipping {}",
            count_query.name, list_query.name
        );
        return Vec::new();
    }

    match driver.get_integer_array(list_query, count as usize) {
        // Codes are GLint on the wire; reinterpret the bits as the enum value.
        Ok(codes) => codes
            .into_iter()
            .map(|code| resolve_format_name(category, code as u32))
            .collect(),
        Err(err) => {
            debug!("{} ({count} entries): {err}", list_query.name);
            Vec::new()
        }
    }
}

/// Collect everything the GL ES context exposes.
///
/// The version string is read and parsed first since it gates which
/// generations are queried.
pub fn collect_gl<D: GlesDriver>(driver: &mut D) -> GlInfo {
    let version = driver
        .get_string(gl::VERSION)
        .unwrap_or_else(|| MISSING_STRING.to_string());
    let (major_version, minor_version) = parse_version(&version);

    let vendor = driver
        .get_string(gl::VENDOR)
        .unwrap_or_else(|| MISSING_STRING.to_string());
    let renderer = driver
        .get_string(gl::RENDERER)
        .unwrap_or_else(|| MISSING_STRING.to_string());
    let extensions = driver.get_string(gl::EXTENSIONS).unwrap_or_default();

    // ES 1.x contexts have no shading language.
    let (shading_language_version, sl_major, sl_minor) =
        match driver.get_string(gl::SHADING_LANGUAGE_VERSION) {
            Some(text) => {
                let (major, minor) = parse_version(&text);
                (text, major, minor)
            }
            None => (UNKNOWN_VALUE.to_string(), 0, 0),
        };

    let mut info = GlInfo {
        vendor,
        renderer,
        version,
        shading_language_version,
        major_version,
        minor_version,
        shading_language_major_version: sl_major,
        shading_language_minor_version: sl_minor,
        extensions,
        ..GlInfo::default()
    };

    for generation in Generation::ALL {
        if generation.is_supported(major_version, minor_version) {
            *info.capabilities_mut(generation) = collect_generation(driver, generation);
        } else {
            debug!(
                "skipping OpenGL ES {} caps on a {major_version}.{minor_version} context",
                generation.label()
            );
        }
    }

    info.compressed_formats = collect_format_list(
        driver,
        gl::NUM_COMPRESSED_TEXTURE_FORMATS,
        gl::COMPRESSED_TEXTURE_FORMATS,
        FormatCategory::CompressedTexture,
    );
    info.shader_binary_formats = collect_format_list(
        driver,
        gl::NUM_SHADER_BINARY_FORMATS,
        gl::SHADER_BINARY_FORMATS,
        FormatCategory::ShaderBinary,
    );
    info.program_binary_formats = collect_format_list(
        driver,
        gl::NUM_PROGRAM_BINARY_FORMATS,
        gl::PROGRAM_BINARY_FORMATS,
        FormatCategory::ProgramBinary,
    );

    info
}

/// Assemble the root aggregate from its collected parts.
pub fn collect_report(gl: GlInfo, egl: EglInfo, device: DeviceProfile) -> ImplementationReport {
    ImplementationReport::new(gl, egl, device)
}
