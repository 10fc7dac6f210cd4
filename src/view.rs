//! Display model for the capability table.
//!
//! [`build_rows`] flattens a report into section headers and caption/content
//! rows; [`render_text`] lays them out for a terminal.

use crate::generation::Generation;
use crate::model::ImplementationReport;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Section title, rendered with a rule underneath.
    Header(String),
    /// Blank separator between sections.
    Spacer,
    /// Caption line and an indented content line. Either side may be empty,
    /// in which case that line is not rendered.
    Item { caption: String, content: String },
}

impl Row {
    fn item(caption: impl Into<String>, content: impl Into<String>) -> Self {
        Row::Item {
            caption: caption.into(),
            content: content.into(),
        }
    }

    fn value(content: impl Into<String>) -> Self {
        Row::item("", content)
    }
}

pub fn build_rows(report: &ImplementationReport) -> Vec<Row> {
    let mut rows = Vec::new();
    let device = &report.device;
    let gl = &report.gl;
    let egl = &report.egl;

    rows.push(Row::Header("Device".to_string()));
    rows.push(Row::item("Name", device.name.as_str()));
    rows.push(Row::item("OS", device.os.as_str()));
    rows.push(Row::item(
        "Screensize",
        format!("{} x {}", device.screen_width, device.screen_height),
    ));
    rows.push(Row::item(
        "CPU",
        format!(
            "{} x {:?}MHz ({})",
            device.cpu_cores, device.cpu_speed_mhz, device.cpu_arch
        ),
    ));

    rows.push(Row::Spacer);
    rows.push(Row::Header("OpenGL ES".to_string()));
    rows.push(Row::item("Vendor", gl.vendor.as_str()));
    rows.push(Row::item("Renderer", gl.renderer.as_str()));
    rows.push(Row::item(
        "Version",
        format!("{}.{} ({})", gl.major_version, gl.minor_version, gl.version),
    ));
    rows.push(Row::item(
        "Shading language version",
        format!(
            "{}.{} ({})",
            gl.shading_language_major_version,
            gl.shading_language_minor_version,
            gl.shading_language_version
        ),
    ));
    push_list(&mut rows, "Extensions", gl.extension_list().collect());
    push_format_list(&mut rows, "Compressed formats", &gl.compressed_formats);
    push_format_list(&mut rows, "Shader binary formats", &gl.shader_binary_formats);
    push_format_list(&mut rows, "Program binary formats", &gl.program_binary_formats);

    for generation in Generation::ALL {
        rows.push(Row::Spacer);
        rows.push(Row::Header(format!("OpenGL ES {} Caps", generation.label())));
        let set = gl.capabilities(generation);
        if set.is_empty() {
            rows.push(Row::item(
                format!("OpenGL ES {} not supported", generation.label()),
                "",
            ));
            continue;
        }
        for entry in set {
            rows.push(Row::item(entry.display_name.as_str(), entry.value.as_str()));
        }
    }

    rows.push(Row::Spacer);
    if egl.available {
        rows.push(Row::Header("EGL".to_string()));
        rows.push(Row::item("Vendor", egl.vendor.as_str()));
        rows.push(Row::item("Version", egl.version.as_str()));
        push_list(&mut rows, "Client APIs", egl.client_api_list().collect());
        push_list(&mut rows, "Extensions", egl.extension_list().collect());
        rows.push(Row::item(
            format!("Configurations ({})", egl.configs.len()),
            "",
        ));
        for config in &egl.configs {
            rows.push(Row::item(
                format!("Config no. {}", config.id),
                format!(
                    " R{} G{} B{} A{} {}",
                    config.red_size,
                    config.green_size,
                    config.blue_size,
                    config.alpha_size,
                    config.renderable_type
                ),
            ));
        }
    } else {
        rows.push(Row::Header("EGL is not available on this device".to_string()));
    }

    rows.push(Row::Spacer);
    rows.push(Row::Header("Device details".to_string()));
    rows.push(Row::item(format!("Sensors ({})", device.sensors.len()), ""));
    for sensor in &device.sensors {
        rows.push(Row::value(sensor.name.as_str()));
        rows.push(Row::value(format!("    Max. Range = {:?}", sensor.max_range)));
        rows.push(Row::value(format!("    Resolution = {:?}", sensor.resolution)));
    }
    push_list(
        &mut rows,
        "Features",
        device.features.iter().map(String::as_str).collect(),
    );

    rows
}

fn push_list(rows: &mut Vec<Row>, caption: &str, values: Vec<&str>) {
    rows.push(Row::item(format!("{caption} ({})", values.len()), ""));
    rows.extend(values.into_iter().map(Row::value));
}

fn push_format_list(rows: &mut Vec<Row>, caption: &str, formats: &[String]) {
    rows.push(Row::item(caption, ""));
    if formats.is_empty() {
        rows.push(Row::value("None"));
        return;
    }
    rows.extend(formats.iter().map(|format| Row::value(format.as_str())));
}

/// Plain-text table: headers underlined, content indented under captions.
pub fn render_text(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        match row {
            Row::Header(title) => {
                let _ = writeln!(out, "{title}");
                let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
            }
            Row::Spacer => out.push('\n'),
            Row::Item { caption, content } => {
                if !caption.is_empty() {
                    let _ = writeln!(out, "{caption}");
                }
                if !content.is_empty() {
                    let _ = writeln!(out, "    {content}");
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CapabilityEntry, DeviceProfile, EglConfigSummary, EglInfo, GlInfo, SensorInfo,
    };

    fn report(egl: EglInfo) -> ImplementationReport {
        let mut gl = GlInfo {
            version: "OpenGL ES 3.1".to_string(),
            major_version: 3,
            minor_version: 1,
            ..GlInfo::default()
        };
        gl.es31.push(CapabilityEntry::new(
            "GL_MAX_UNIFORM_LOCATIONS",
            "Max. uniform locations",
            "1024",
        ));
        let mut device = DeviceProfile {
            sensors: vec![SensorInfo {
                name: "Gyro".to_string(),
                max_range: 34.9,
                resolution: 1.0,
            }],
            ..DeviceProfile::default()
        };
        device.extend_features(["zeta", "alpha"]);
        ImplementationReport::new(gl, egl, device)
    }

    fn contains_item(rows: &[Row], caption: &str, content: &str) -> bool {
        rows.iter().any(|row| {
            matches!(row, Row::Item { caption: c, content: v } if c == caption && v == content)
        })
    }

    #[test]
    fn empty_sets_report_unsupported_generation() {
        let rows = build_rows(&report(EglInfo::unavailable()));
        assert!(contains_item(&rows, "OpenGL ES 3.0 not supported", ""));
        assert!(contains_item(&rows, "OpenGL ES 3.2 not supported", ""));
        assert!(contains_item(&rows, "Max. uniform locations", "1024"));
        assert!(!contains_item(&rows, "OpenGL ES 3.1 not supported", ""));
    }

    #[test]
    fn empty_format_lists_show_none() {
        let rows = build_rows(&report(EglInfo::unavailable()));
        let pos = rows
            .iter()
            .position(|row| matches!(row, Row::Item { caption, .. } if caption == "Shader binary formats"))
            .expect("shader binary caption");
        assert_eq!(rows[pos + 1], Row::value("None"));
    }

    #[test]
    fn egl_banner_when_unavailable() {
        let rows = build_rows(&report(EglInfo::unavailable()));
        assert!(rows.contains(&Row::Header("EGL is not available on this device".to_string())));
        assert!(!rows.contains(&Row::Header("EGL".to_string())));
    }

    #[test]
    fn egl_configs_render_channel_sizes() {
        let egl = EglInfo {
            available: true,
            client_apis: "OpenGL_ES OpenVG".to_string(),
            configs: vec![EglConfigSummary {
                id: 4,
                red_size: 8,
                green_size: 8,
                blue_size: 8,
                alpha_size: 0,
                renderable_type: "GLES, GLES2".to_string(),
                ..EglConfigSummary::default()
            }],
            ..EglInfo::default()
        };
        let rows = build_rows(&report(egl));
        assert!(contains_item(&rows, "Config no. 4", " R8 G8 B8 A0 GLES, GLES2"));
        assert!(contains_item(&rows, "Client APIs (2)", ""));
        assert!(contains_item(&rows, "Extensions (0)", ""));
    }

    #[test]
    fn text_render_underlines_headers_and_sorts_features() {
        let text = render_text(&build_rows(&report(EglInfo::unavailable())));
        assert!(text.starts_with("Device\n======\n"));
        assert!(text.contains("Features (2)\n    alpha\n    zeta\n"));
        assert!(text.contains("    Max. Range = 34.9\n"));
    }
}
