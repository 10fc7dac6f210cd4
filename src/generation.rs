//! Declared capability schema for each GL ES generation.
//!
//! Each generation owns a fixed, ordered table of limits. Declaration order is
//! the display and wire order. Array-valued limits declare their arity here so
//! the collector and every consumer agree on how many entries a table expands
//! to.

use crate::gl::GlEnum;
use serde::{Deserialize, Serialize};

/// One declared limit: how it is shown, named on the wire, and queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapabilitySpec {
    pub display_name: &'static str,
    pub query: GlEnum,
    /// 1 for scalar limits, 3 for indexed vec3 limits.
    pub arity: u32,
}

impl CapabilitySpec {
    const fn scalar(display_name: &'static str, name: &'static str, value: u32) -> Self {
        Self {
            display_name,
            query: GlEnum::new(name, value),
            arity: 1,
        }
    }

    const fn indexed3(display_name: &'static str, name: &'static str, value: u32) -> Self {
        Self {
            display_name,
            query: GlEnum::new(name, value),
            arity: 3,
        }
    }
}

/// A GL ES API level with its own capability table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    Es20,
    Es30,
    Es31,
    Es32,
}

impl Generation {
    pub const ALL: [Generation; 4] = [
        Generation::Es20,
        Generation::Es30,
        Generation::Es31,
        Generation::Es32,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Generation::Es20 => "2.0",
            Generation::Es30 => "3.0",
            Generation::Es31 => "3.1",
            Generation::Es32 => "3.2",
        }
    }

    /// Section element name used in the serialized report.
    pub fn section_tag(self) -> &'static str {
        match self {
            Generation::Es20 => "es20caps",
            Generation::Es30 => "es30caps",
            Generation::Es31 => "es31caps",
            Generation::Es32 => "es32caps",
        }
    }

    pub fn specs(self) -> &'static [CapabilitySpec] {
        match self {
            Generation::Es20 => ES20_CAPS,
            Generation::Es30 => ES30_CAPS,
            Generation::Es31 => ES31_CAPS,
            Generation::Es32 => ES32_CAPS,
        }
    }

    /// Number of entries a fully collected set has, counting each indexed
    /// limit once per component.
    pub fn expected_len(self) -> usize {
        self.specs().iter().map(|spec| spec.arity as usize).sum()
    }

    /// Whether a context reporting `major.minor` exposes this generation.
    pub fn is_supported(self, major: u32, minor: u32) -> bool {
        match self {
            Generation::Es20 => major >= 2,
            Generation::Es30 => major >= 3,
            Generation::Es31 => major > 3 || (major == 3 && minor >= 1),
            Generation::Es32 => major > 3 || (major == 3 && minor >= 2),
        }
    }
}

const ES20_CAPS: &[CapabilitySpec] = &[
    CapabilitySpec::scalar(
        "Max. combined texture image units",
        "GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS",
        0x8B4D,
    ),
    CapabilitySpec::scalar("Max. cubemap texture size", "GL_MAX_CUBE_MAP_TEXTURE_SIZE", 0x851C),
    CapabilitySpec::scalar(
        "Max. fragment uniform vectors",
        "GL_MAX_FRAGMENT_UNIFORM_VECTORS",
        0x8DFD,
    ),
    CapabilitySpec::scalar("Max. renderbuffer size", "GL_MAX_RENDERBUFFER_SIZE", 0x84E8),
    CapabilitySpec::scalar("Max. texture image units", "GL_MAX_TEXTURE_IMAGE_UNITS", 0x8872),
    CapabilitySpec::scalar("Max. texture size", "GL_MAX_TEXTURE_SIZE", 0x0D33),
    CapabilitySpec::scalar("Max. varying vectors", "GL_MAX_VARYING_VECTORS", 0x8DFC),
    CapabilitySpec::scalar("Max. vertex attributes", "GL_MAX_VERTEX_ATTRIBS", 0x8869),
    CapabilitySpec::scalar(
        "Max. vertex texture image units",
        "GL_MAX_VERTEX_TEXTURE_IMAGE_UNITS",
        0x8B4C,
    ),
    CapabilitySpec::scalar(
        "Max. vertex uniform vectors",
        "GL_MAX_VERTEX_UNIFORM_VECTORS",
        0x8DFB,
    ),
    CapabilitySpec::scalar("Max. viewport dimension", "GL_MAX_VIEWPORT_DIMS", 0x0D3A),
    CapabilitySpec::scalar(
        "Max. compressed texture formats",
        "GL_NUM_COMPRESSED_TEXTURE_FORMATS",
        0x86A2,
    ),
    CapabilitySpec::scalar(
        "Number of binary shader formats",
        "GL_NUM_SHADER_BINARY_FORMATS",
        0x8DF9,
    ),
    CapabilitySpec::scalar(
        "Number of binary program formats",
        "GL_NUM_PROGRAM_BINARY_FORMATS",
        0x87FE,
    ),
];

const ES30_CAPS: &[CapabilitySpec] = &[
    CapabilitySpec::scalar("Max. 3D texture size", "GL_MAX_3D_TEXTURE_SIZE", 0x8073),
    CapabilitySpec::scalar("Max. array texture layers", "GL_MAX_ARRAY_TEXTURE_LAYERS", 0x88FF),
    CapabilitySpec::scalar(
        "Max. framebuffer color attachments",
        "GL_MAX_COLOR_ATTACHMENTS",
        0x8CDF,
    ),
    CapabilitySpec::scalar(
        "Max. combined fragment uniform components",
        "GL_MAX_COMBINED_FRAGMENT_UNIFORM_COMPONENTS",
        0x8A33,
    ),
    CapabilitySpec::scalar(
        "Max. combined texture image units",
        "GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS",
        0x8B4D,
    ),
    CapabilitySpec::scalar(
        "Max. uniform blocks per program",
        "GL_MAX_COMBINED_UNIFORM_BLOCKS",
        0x8A2E,
    ),
    CapabilitySpec::scalar(
        "Max. combined vertex uniform components",
        "GL_MAX_COMBINED_VERTEX_UNIFORM_COMPONENTS",
        0x8A31,
    ),
    CapabilitySpec::scalar("Max. cubemap texture size", "GL_MAX_CUBE_MAP_TEXTURE_SIZE", 0x851C),
    CapabilitySpec::scalar(
        "Max. draw fragment shader outputs",
        "GL_MAX_DRAW_BUFFERS",
        0x8824,
    ),
    CapabilitySpec::scalar("Max. supported element index", "GL_MAX_ELEMENT_INDEX", 0x8D6B),
    CapabilitySpec::scalar(
        "Recommended max. vertex array indices",
        "GL_MAX_ELEMENTS_INDICES",
        0x80E9,
    ),
    CapabilitySpec::scalar(
        "Recommended max. vertex array vertices",
        "GL_MAX_ELEMENTS_VERTICES",
        0x80E8,
    ),
    CapabilitySpec::scalar(
        "Max. fragment shader input components",
        "GL_MAX_FRAGMENT_INPUT_COMPONENTS",
        0x9125,
    ),
    CapabilitySpec::scalar(
        "Max. fragment shader uniform blocks",
        "GL_MAX_FRAGMENT_UNIFORM_BLOCKS",
        0x8A2D,
    ),
    CapabilitySpec::scalar(
        "Max. fragment shader uniform components",
        "GL_MAX_FRAGMENT_UNIFORM_COMPONENTS",
        0x8B49,
    ),
    CapabilitySpec::scalar(
        "Max. fragment shader uniform vectors",
        "GL_MAX_FRAGMENT_UNIFORM_VECTORS",
        0x8DFD,
    ),
    CapabilitySpec::scalar(
        "Min. texture lookup texel offset",
        "GL_MIN_PROGRAM_TEXEL_OFFSET",
        0x8904,
    ),
    CapabilitySpec::scalar(
        "Max. texture lookup texel offset",
        "GL_MAX_PROGRAM_TEXEL_OFFSET",
        0x8905,
    ),
    CapabilitySpec::scalar("Max. renderbuffer size", "GL_MAX_RENDERBUFFER_SIZE", 0x84E8),
    CapabilitySpec::scalar("Max. multisample samples", "GL_MAX_SAMPLES", 0x8D57),
    CapabilitySpec::scalar(
        "Max. glWaitSync timeout interval",
        "GL_MAX_SERVER_WAIT_TIMEOUT",
        0x9111,
    ),
    CapabilitySpec::scalar("Max. texture image units", "GL_MAX_TEXTURE_IMAGE_UNITS", 0x8872),
    CapabilitySpec::scalar(
        "Max. absolute level-of-detail bias",
        "GL_MAX_TEXTURE_LOD_BIAS",
        0x84FD,
    ),
    CapabilitySpec::scalar("Max. texture size", "GL_MAX_TEXTURE_SIZE", 0x0D33),
    CapabilitySpec::scalar(
        "Max. transform feedback components (interleaved mode)",
        "GL_MAX_TRANSFORM_FEEDBACK_INTERLEAVED_COMPONENTS",
        0x8C8A,
    ),
    CapabilitySpec::scalar(
        "Max. transform feedback attributes (separate mode)",
        "GL_MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS",
        0x8C8B,
    ),
    CapabilitySpec::scalar(
        "Max. transform feedback components per attribute (separate mode)",
        "GL_MAX_TRANSFORM_FEEDBACK_SEPARATE_COMPONENTS",
        0x8C80,
    ),
    CapabilitySpec::scalar(
        "Max. uniform block size (basic machine units)",
        "GL_MAX_UNIFORM_BLOCK_SIZE",
        0x8A30,
    ),
    CapabilitySpec::scalar(
        "Max. uniform buffer binding points",
        "GL_MAX_UNIFORM_BUFFER_BINDINGS",
        0x8A2F,
    ),
    CapabilitySpec::scalar("Max. varying components", "GL_MAX_VARYING_COMPONENTS", 0x8B4B),
    CapabilitySpec::scalar("Max. varying vectors", "GL_MAX_VARYING_VECTORS", 0x8DFC),
    CapabilitySpec::scalar("Max. vertex attributes", "GL_MAX_VERTEX_ATTRIBS", 0x8869),
    CapabilitySpec::scalar(
        "Max. vertex texture image units",
        "GL_MAX_VERTEX_TEXTURE_IMAGE_UNITS",
        0x8B4C,
    ),
    CapabilitySpec::scalar(
        "Max. vertex shader output components",
        "GL_MAX_VERTEX_OUTPUT_COMPONENTS",
        0x9122,
    ),
    CapabilitySpec::scalar(
        "Max. vertex shader uniform blocks",
        "GL_MAX_VERTEX_UNIFORM_BLOCKS",
        0x8A2B,
    ),
    CapabilitySpec::scalar(
        "Max. vertex shader uniform components",
        "GL_MAX_VERTEX_UNIFORM_COMPONENTS",
        0x8B4A,
    ),
    CapabilitySpec::scalar(
        "Max. vertex shader uniform vectors",
        "GL_MAX_VERTEX_UNIFORM_VECTORS",
        0x8DFB,
    ),
    CapabilitySpec::scalar("Max. viewport dimension", "GL_MAX_VIEWPORT_DIMS", 0x0D3A),
];

const ES31_CAPS: &[CapabilitySpec] = &[
    CapabilitySpec::indexed3(
        "Max. compute work group count",
        "GL_MAX_COMPUTE_WORK_GROUP_COUNT",
        0x91BE,
    ),
    CapabilitySpec::indexed3(
        "Max. compute work group size",
        "GL_MAX_COMPUTE_WORK_GROUP_SIZE",
        0x91BF,
    ),
    CapabilitySpec::scalar(
        "Max. compute work group invocations",
        "GL_MAX_COMPUTE_WORK_GROUP_INVOCATIONS",
        0x90EB,
    ),
    CapabilitySpec::scalar(
        "Max. compute uniform blocks",
        "GL_MAX_COMPUTE_UNIFORM_BLOCKS",
        0x91BB,
    ),
    CapabilitySpec::scalar(
        "Max. compute texture image units",
        "GL_MAX_COMPUTE_TEXTURE_IMAGE_UNITS",
        0x91BC,
    ),
    CapabilitySpec::scalar(
        "Max. compute image uniforms",
        "GL_MAX_COMPUTE_IMAGE_UNIFORMS",
        0x91BD,
    ),
    CapabilitySpec::scalar(
        "Max. compute shared memory size",
        "GL_MAX_COMPUTE_SHARED_MEMORY_SIZE",
        0x8262,
    ),
    CapabilitySpec::scalar(
        "Max. compute uniform components",
        "GL_MAX_COMPUTE_UNIFORM_COMPONENTS",
        0x8263,
    ),
    CapabilitySpec::scalar(
        "Max. compute atomic counter buffers",
        "GL_MAX_COMPUTE_ATOMIC_COUNTER_BUFFERS",
        0x8264,
    ),
    CapabilitySpec::scalar(
        "Max. compute atomic counters",
        "GL_MAX_COMPUTE_ATOMIC_COUNTERS",
        0x8265,
    ),
    CapabilitySpec::scalar(
        "Max. combined compute uniform components",
        "GL_MAX_COMBINED_COMPUTE_UNIFORM_COMPONENTS",
        0x8266,
    ),
    CapabilitySpec::scalar("Max. uniform locations", "GL_MAX_UNIFORM_LOCATIONS", 0x826E),
    CapabilitySpec::scalar("Max. framebuffer width", "GL_MAX_FRAMEBUFFER_WIDTH", 0x9315),
    CapabilitySpec::scalar("Max. framebuffer height", "GL_MAX_FRAMEBUFFER_HEIGHT", 0x9316),
    CapabilitySpec::scalar("Max. framebuffer samples", "GL_MAX_FRAMEBUFFER_SAMPLES", 0x9318),
    CapabilitySpec::scalar(
        "Max. vertex atomic counter buffers",
        "GL_MAX_VERTEX_ATOMIC_COUNTER_BUFFERS",
        0x92CC,
    ),
    CapabilitySpec::scalar(
        "Max. fragment atomic counter buffers",
        "GL_MAX_FRAGMENT_ATOMIC_COUNTER_BUFFERS",
        0x92D0,
    ),
    CapabilitySpec::scalar(
        "Max. combined atomic counter buffers",
        "GL_MAX_COMBINED_ATOMIC_COUNTER_BUFFERS",
        0x92D1,
    ),
    CapabilitySpec::scalar(
        "Max. vertex atomic counters",
        "GL_MAX_VERTEX_ATOMIC_COUNTERS",
        0x92D2,
    ),
    CapabilitySpec::scalar(
        "Max. fragment atomic counters",
        "GL_MAX_FRAGMENT_ATOMIC_COUNTERS",
        0x92D6,
    ),
    CapabilitySpec::scalar(
        "Max. combined atomic counters",
        "GL_MAX_COMBINED_ATOMIC_COUNTERS",
        0x92D7,
    ),
    CapabilitySpec::scalar(
        "Max. atomic counter buffer bindings",
        "GL_MAX_ATOMIC_COUNTER_BUFFER_BINDINGS",
        0x92DC,
    ),
    CapabilitySpec::scalar(
        "Max. atomic counter buffer size",
        "GL_MAX_ATOMIC_COUNTER_BUFFER_SIZE",
        0x92D8,
    ),
    CapabilitySpec::scalar(
        "Max. vertex image uniforms",
        "GL_MAX_VERTEX_IMAGE_UNIFORMS",
        0x90CA,
    ),
    CapabilitySpec::scalar(
        "Max. fragment image uniforms",
        "GL_MAX_FRAGMENT_IMAGE_UNIFORMS",
        0x90CE,
    ),
    CapabilitySpec::scalar(
        "Max. combined image uniforms",
        "GL_MAX_COMBINED_IMAGE_UNIFORMS",
        0x90CF,
    ),
    CapabilitySpec::scalar("Max. image units", "GL_MAX_IMAGE_UNITS", 0x8F38),
    CapabilitySpec::scalar(
        "Max. vertex shader storage blocks",
        "GL_MAX_VERTEX_SHADER_STORAGE_BLOCKS",
        0x90D6,
    ),
    CapabilitySpec::scalar(
        "Max. fragment shader storage blocks",
        "GL_MAX_FRAGMENT_SHADER_STORAGE_BLOCKS",
        0x90DA,
    ),
    CapabilitySpec::scalar(
        "Max. compute shader storage blocks",
        "GL_MAX_COMPUTE_SHADER_STORAGE_BLOCKS",
        0x90DB,
    ),
    CapabilitySpec::scalar(
        "Max. combined shader storage blocks",
        "GL_MAX_COMBINED_SHADER_STORAGE_BLOCKS",
        0x90DC,
    ),
    CapabilitySpec::scalar(
        "Max. shader storage buffer bindings",
        "GL_MAX_SHADER_STORAGE_BUFFER_BINDINGS",
        0x90DD,
    ),
    CapabilitySpec::scalar(
        "Max. shader storage block size",
        "GL_MAX_SHADER_STORAGE_BLOCK_SIZE",
        0x90DE,
    ),
    CapabilitySpec::scalar(
        "Max. combined shader output resources",
        "GL_MAX_COMBINED_SHADER_OUTPUT_RESOURCES",
        0x8F39,
    ),
    CapabilitySpec::scalar(
        "Min. texture gather offset",
        "GL_MIN_PROGRAM_TEXTURE_GATHER_OFFSET",
        0x8E5E,
    ),
    CapabilitySpec::scalar(
        "Max. texture gather offset",
        "GL_MAX_PROGRAM_TEXTURE_GATHER_OFFSET",
        0x8E5F,
    ),
    CapabilitySpec::scalar("Max. sample mask words", "GL_MAX_SAMPLE_MASK_WORDS", 0x8E59),
    CapabilitySpec::scalar(
        "Max. color texture samples",
        "GL_MAX_COLOR_TEXTURE_SAMPLES",
        0x910E,
    ),
    CapabilitySpec::scalar(
        "Max. depth texture samples",
        "GL_MAX_DEPTH_TEXTURE_SAMPLES",
        0x910F,
    ),
    CapabilitySpec::scalar("Max. integer samples", "GL_MAX_INTEGER_SAMPLES", 0x9110),
    CapabilitySpec::scalar(
        "Max. vertex attribute relative offset",
        "GL_MAX_VERTEX_ATTRIB_RELATIVE_OFFSET",
        0x82D9,
    ),
    CapabilitySpec::scalar(
        "Max. vertex attribute bindings",
        "GL_MAX_VERTEX_ATTRIB_BINDINGS",
        0x82DA,
    ),
    CapabilitySpec::scalar(
        "Max. vertex attribute stride",
        "GL_MAX_VERTEX_ATTRIB_STRIDE",
        0x82E5,
    ),
];

const ES32_CAPS: &[CapabilitySpec] = &[
    CapabilitySpec::scalar(
        "Max. geometry uniform blocks",
        "GL_MAX_GEOMETRY_UNIFORM_BLOCKS",
        0x8A2C,
    ),
    CapabilitySpec::scalar(
        "Max. geometry input components",
        "GL_MAX_GEOMETRY_INPUT_COMPONENTS",
        0x9123,
    ),
    CapabilitySpec::scalar(
        "Max. geometry output components",
        "GL_MAX_GEOMETRY_OUTPUT_COMPONENTS",
        0x9124,
    ),
    CapabilitySpec::scalar(
        "Max. geometry output vertices",
        "GL_MAX_GEOMETRY_OUTPUT_VERTICES",
        0x8DE0,
    ),
    CapabilitySpec::scalar(
        "Max. geometry total output components",
        "GL_MAX_GEOMETRY_TOTAL_OUTPUT_COMPONENTS",
        0x8DE1,
    ),
    CapabilitySpec::scalar(
        "Max. geometry texture image units",
        "GL_MAX_GEOMETRY_TEXTURE_IMAGE_UNITS",
        0x8C29,
    ),
    CapabilitySpec::scalar(
        "Max. geometry uniform components",
        "GL_MAX_GEOMETRY_UNIFORM_COMPONENTS",
        0x8DDF,
    ),
    CapabilitySpec::scalar(
        "Max. geometry shader invocations",
        "GL_MAX_GEOMETRY_SHADER_INVOCATIONS",
        0x8E5A,
    ),
    CapabilitySpec::scalar(
        "Max. geometry atomic counter buffers",
        "GL_MAX_GEOMETRY_ATOMIC_COUNTER_BUFFERS",
        0x92CF,
    ),
    CapabilitySpec::scalar(
        "Max. geometry atomic counters",
        "GL_MAX_GEOMETRY_ATOMIC_COUNTERS",
        0x92D5,
    ),
    CapabilitySpec::scalar(
        "Max. geometry image uniforms",
        "GL_MAX_GEOMETRY_IMAGE_UNIFORMS",
        0x90CD,
    ),
    CapabilitySpec::scalar(
        "Max. geometry shader storage blocks",
        "GL_MAX_GEOMETRY_SHADER_STORAGE_BLOCKS",
        0x90D7,
    ),
    CapabilitySpec::scalar("Max. framebuffer layers", "GL_MAX_FRAMEBUFFER_LAYERS", 0x9317),
    CapabilitySpec::scalar(
        "Max. tessellation generation level",
        "GL_MAX_TESS_GEN_LEVEL",
        0x8E7E,
    ),
    CapabilitySpec::scalar("Max. patch vertices", "GL_MAX_PATCH_VERTICES", 0x8E7D),
    CapabilitySpec::scalar(
        "Max. tess. control uniform components",
        "GL_MAX_TESS_CONTROL_UNIFORM_COMPONENTS",
        0x8E7F,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation uniform components",
        "GL_MAX_TESS_EVALUATION_UNIFORM_COMPONENTS",
        0x8E80,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control texture image units",
        "GL_MAX_TESS_CONTROL_TEXTURE_IMAGE_UNITS",
        0x8E81,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation texture image units",
        "GL_MAX_TESS_EVALUATION_TEXTURE_IMAGE_UNITS",
        0x8E82,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control output components",
        "GL_MAX_TESS_CONTROL_OUTPUT_COMPONENTS",
        0x8E83,
    ),
    CapabilitySpec::scalar(
        "Max. tess. patch components",
        "GL_MAX_TESS_PATCH_COMPONENTS",
        0x8E84,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control total output components",
        "GL_MAX_TESS_CONTROL_TOTAL_OUTPUT_COMPONENTS",
        0x8E85,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation output components",
        "GL_MAX_TESS_EVALUATION_OUTPUT_COMPONENTS",
        0x8E86,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control uniform blocks",
        "GL_MAX_TESS_CONTROL_UNIFORM_BLOCKS",
        0x8E89,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation uniform blocks",
        "GL_MAX_TESS_EVALUATION_UNIFORM_BLOCKS",
        0x8E8A,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control input components",
        "GL_MAX_TESS_CONTROL_INPUT_COMPONENTS",
        0x886C,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation input components",
        "GL_MAX_TESS_EVALUATION_INPUT_COMPONENTS",
        0x886D,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control atomic counter buffers",
        "GL_MAX_TESS_CONTROL_ATOMIC_COUNTER_BUFFERS",
        0x92CD,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation atomic counter buffers",
        "GL_MAX_TESS_EVALUATION_ATOMIC_COUNTER_BUFFERS",
        0x92CE,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control atomic counters",
        "GL_MAX_TESS_CONTROL_ATOMIC_COUNTERS",
        0x92D3,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation atomic counters",
        "GL_MAX_TESS_EVALUATION_ATOMIC_COUNTERS",
        0x92D4,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control image uniforms",
        "GL_MAX_TESS_CONTROL_IMAGE_UNIFORMS",
        0x90CB,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation image uniforms",
        "GL_MAX_TESS_EVALUATION_IMAGE_UNIFORMS",
        0x90CC,
    ),
    CapabilitySpec::scalar(
        "Max. tess. control shader storage blocks",
        "GL_MAX_TESS_CONTROL_SHADER_STORAGE_BLOCKS",
        0x90D8,
    ),
    CapabilitySpec::scalar(
        "Max. tess. evaluation shader storage blocks",
        "GL_MAX_TESS_EVALUATION_SHADER_STORAGE_BLOCKS",
        0x90D9,
    ),
    CapabilitySpec::scalar("Max. texture buffer size", "GL_MAX_TEXTURE_BUFFER_SIZE", 0x8C2B),
    CapabilitySpec::scalar(
        "Texture buffer offset alignment",
        "GL_TEXTURE_BUFFER_OFFSET_ALIGNMENT",
        0x919F,
    ),
    CapabilitySpec::scalar(
        "Max. debug message length",
        "GL_MAX_DEBUG_MESSAGE_LENGTH",
        0x9143,
    ),
    CapabilitySpec::scalar(
        "Max. debug logged messages",
        "GL_MAX_DEBUG_LOGGED_MESSAGES",
        0x9144,
    ),
    CapabilitySpec::scalar(
        "Max. debug group stack depth",
        "GL_MAX_DEBUG_GROUP_STACK_DEPTH",
        0x826C,
    ),
    CapabilitySpec::scalar("Max. label length", "GL_MAX_LABEL_LENGTH", 0x82E8),
    CapabilitySpec::scalar(
        "Min. fragment interpolation offset",
        "GL_MIN_FRAGMENT_INTERPOLATION_OFFSET",
        0x8E5B,
    ),
    CapabilitySpec::scalar(
        "Max. fragment interpolation offset",
        "GL_MAX_FRAGMENT_INTERPOLATION_OFFSET",
        0x8E5C,
    ),
    CapabilitySpec::scalar(
        "Fragment interpolation offset bits",
        "GL_FRAGMENT_INTERPOLATION_OFFSET_BITS",
        0x8E5D,
    ),
    CapabilitySpec::scalar("Context flags", "GL_CONTEXT_FLAGS", 0x821E),
    CapabilitySpec::scalar(
        "Primitive restart for patches",
        "GL_PRIMITIVE_RESTART_FOR_PATCHES_SUPPORTED",
        0x8221,
    ),
];
