//! Report document serialization.
//!
//! The XML layout is the wire format accepted by the remote database and is
//! versioned by [`REPORT_VERSION`](crate::model::REPORT_VERSION). Section order
//! is fixed and every section is written even when empty, so consumers can
//! rely on a complete tree for every device.

use crate::generation::Generation;
use crate::model::ImplementationReport;
use log::warn;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fmt;

#[derive(Debug)]
pub enum SerializeError {
    /// The XML writer rejected an event.
    Write(String),
    /// A value carried a character XML 1.0 cannot represent.
    InvalidCharacter { element: String, character: char },
    /// The finished buffer was not valid UTF-8.
    Encoding(std::string::FromUtf8Error),
    /// JSON export failed.
    Json(serde_json::Error),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::Write(message) => write!(f, "failed to write report: {message}"),
            SerializeError::InvalidCharacter { element, character } => write!(
                f,
                "<{element}> contains U+{:04X}, which XML 1.0 does not allow",
                u32::from(*character)
            ),
            SerializeError::Encoding(err) => write!(f, "report is not valid UTF-8: {err}"),
            SerializeError::Json(err) => write!(f, "failed to encode report as JSON: {err}"),
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Write(_) | SerializeError::InvalidCharacter { .. } => None,
            SerializeError::Encoding(err) => Some(err),
            SerializeError::Json(err) => Some(err),
        }
    }
}

fn write_error<E: fmt::Display>(err: E) -> SerializeError {
    SerializeError::Write(err.to_string())
}

/// Serialize `report` as the upload document.
///
/// Total: any writer failure yields an empty string, never a partial
/// document. Callers must treat empty output as a failure.
pub fn serialize(report: &ImplementationReport, submitter: &str) -> String {
    match try_serialize(report, submitter) {
        Ok(document) => document,
        Err(err) => {
            warn!("{err}");
            String::new()
        }
    }
}

/// Fallible form of [`serialize`].
pub fn try_serialize(
    report: &ImplementationReport,
    submitter: &str,
) -> Result<String, SerializeError> {
    let mut out = ReportWriter::new();
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let description = report.description();
    let report_version = report.report_version.to_string();
    out.start(
        "report",
        &[
            ("submitter", submitter),
            ("description", description.as_str()),
            ("reportversion", report_version.as_str()),
        ],
    )?;

    write_device(&mut out, report)?;
    write_opengles(&mut out, report)?;
    write_egl(&mut out, report)?;

    out.end("report")?;
    out.finish()
}

/// Pretty JSON rendition of the same model, for local inspection.
pub fn to_json(report: &ImplementationReport) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(report).map_err(SerializeError::Json)
}

fn write_device(out: &mut ReportWriter, report: &ImplementationReport) -> Result<(), SerializeError> {
    let device = &report.device;
    out.start("device", &[])?;

    out.start("system", &[])?;
    out.text_element("devicename", &device.name)?;
    out.text_element("os", &device.os)?;
    out.text_element("screenwidth", &device.screen_width.to_string())?;
    out.text_element("screenheight", &device.screen_height.to_string())?;
    out.text_element("cpuspeed", &format_float(device.cpu_speed_mhz))?;
    out.text_element("cpucores", &device.cpu_cores.to_string())?;
    out.text_element("cpuarch", &device.cpu_arch)?;
    out.end("system")?;

    out.list("features", "feature", device.features.iter().map(String::as_str))?;

    out.start("sensors", &[])?;
    for sensor in &device.sensors {
        let max_range = format_float(sensor.max_range);
        let resolution = format_float(sensor.resolution);
        out.start(
            "sensor",
            &[
                ("maxrange", max_range.as_str()),
                ("resolution", resolution.as_str()),
            ],
        )?;
        out.text(&sensor.name)?;
        out.end("sensor")?;
    }
    out.end("sensors")?;

    out.end("device")
}

fn write_opengles(
    out: &mut ReportWriter,
    report: &ImplementationReport,
) -> Result<(), SerializeError> {
    let gl = &report.gl;
    out.start("opengles", &[])?;

    out.start("implementation", &[])?;
    out.text_element("vendor", &gl.vendor)?;
    out.text_element("renderer", &gl.renderer)?;
    out.text_element("version", &gl.version)?;
    out.text_element("majorversion", &gl.major_version.to_string())?;
    out.text_element("minorversion", &gl.minor_version.to_string())?;
    out.text_element("shadinglanguageversion", &gl.shading_language_version)?;
    out.text_element(
        "shadinglanguagemajorversion",
        &gl.shading_language_major_version.to_string(),
    )?;
    out.text_element(
        "shadinglanguageminorversion",
        &gl.shading_language_minor_version.to_string(),
    )?;
    out.end("implementation")?;

    out.list("extensions", "extension", gl.extension_list())?;

    for generation in Generation::ALL {
        let tag = generation.section_tag();
        out.start(tag, &[])?;
        for entry in gl.capabilities(generation) {
            out.start("cap", &[("name", entry.name.as_str())])?;
            out.text(&entry.value)?;
            out.end("cap")?;
        }
        out.end(tag)?;
    }

    out.list(
        "compressedformats",
        "compressedformat",
        gl.compressed_formats.iter().map(String::as_str),
    )?;
    out.list(
        "binaryshaderformats",
        "binaryshaderformat",
        gl.shader_binary_formats.iter().map(String::as_str),
    )?;
    out.list(
        "binaryprogramformats",
        "binaryprogramformat",
        gl.program_binary_formats.iter().map(String::as_str),
    )?;

    out.end("opengles")
}

fn write_egl(out: &mut ReportWriter, report: &ImplementationReport) -> Result<(), SerializeError> {
    let egl = &report.egl;
    out.start("egl", &[])?;

    out.start("implementation", &[])?;
    out.text_element("available", if egl.available { "true" } else { "false" })?;
    out.text_element("vendor", &egl.vendor)?;
    out.text_element("version", &egl.version)?;
    out.end("implementation")?;

    out.list("extensions", "extension", egl.extension_list())?;
    out.list("clientapis", "clientapi", egl.client_api_list())?;

    out.start("configs", &[])?;
    for config in &egl.configs {
        let id = config.id.to_string();
        let red = config.red_size.to_string();
        let green = config.green_size.to_string();
        let blue = config.blue_size.to_string();
        let alpha = config.alpha_size.to_string();
        let depth = config.depth_size.to_string();
        let stencil = config.stencil_size.to_string();
        out.start(
            "config",
            &[
                ("id", id.as_str()),
                ("redsize", red.as_str()),
                ("greensize", green.as_str()),
                ("bluesize", blue.as_str()),
                ("alphasize", alpha.as_str()),
                ("depthsize", depth.as_str()),
                ("stencilsize", stencil.as_str()),
                ("renderabletype", config.renderable_type.as_str()),
            ],
        )?;
        out.end("config")?;
    }
    out.end("configs")?;

    out.end("egl")
}

/// Float text as existing reports carry it: plain decimal with a trailing
/// `.0` for whole numbers (`1800.0`) inside `[1e-3, 1e7)`, otherwise a
/// mantissa/exponent pair such as `1.0E-5`.
fn format_float(value: f32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{value:?}");
    }
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

fn is_xml_char(character: char) -> bool {
    matches!(
        character,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn check_chars(element: &str, value: &str) -> Result<(), SerializeError> {
    match value.chars().find(|&character| !is_xml_char(character)) {
        Some(character) => Err(SerializeError::InvalidCharacter {
            element: element.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

struct ReportWriter {
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
}

impl ReportWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 4),
            open: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), SerializeError> {
        self.writer.write_event(event).map_err(write_error)
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SerializeError> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            check_chars(name, attribute.1)?;
            start.push_attribute(*attribute);
        }
        self.event(Event::Start(start))?;
        self.open.push(name.to_string());
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), SerializeError> {
        self.open.pop();
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<(), SerializeError> {
        let element = self.open.last().map(String::as_str).unwrap_or_default();
        check_chars(element, text)?;
        self.event(Event::Text(BytesText::new(text)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), SerializeError> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    fn list<'a, I>(&mut self, container: &str, item: &str, values: I) -> Result<(), SerializeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.start(container, &[])?;
        for value in values {
            self.text_element(item, value)?;
        }
        self.end(container)
    }

    fn finish(self) -> Result<String, SerializeError> {
        String::from_utf8(self.writer.into_inner()).map_err(SerializeError::Encoding)
    }
}
