//! Format-code to name resolution.
//!
//! Drivers report compressed texture, shader binary, and program binary
//! formats as bare enum values. The tables below map the known vendor and core
//! codes to their canonical names; anything else falls back to a hex literal
//! so resolution is total over the 32-bit code space.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Which enumeration a format code was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatCategory {
    CompressedTexture,
    ShaderBinary,
    ProgramBinary,
}

impl FormatCategory {
    fn table(self) -> &'static [(u32, &'static str)] {
        match self {
            FormatCategory::CompressedTexture => COMPRESSED_TEXTURE_FORMATS,
            FormatCategory::ShaderBinary => SHADER_BINARY_FORMATS,
            FormatCategory::ProgramBinary => PROGRAM_BINARY_FORMATS,
        }
    }

    fn lookup(self) -> &'static HashMap<u32, &'static str> {
        static COMPRESSED: OnceLock<HashMap<u32, &'static str>> = OnceLock::new();
        static SHADER: OnceLock<HashMap<u32, &'static str>> = OnceLock::new();
        static PROGRAM: OnceLock<HashMap<u32, &'static str>> = OnceLock::new();

        let cell = match self {
            FormatCategory::CompressedTexture => &COMPRESSED,
            FormatCategory::ShaderBinary => &SHADER,
            FormatCategory::ProgramBinary => &PROGRAM,
        };
        cell.get_or_init(|| self.table().iter().copied().collect())
    }
}

/// Resolve a driver format code to its canonical name.
///
/// Unknown codes yield `0x` followed by the lowercase hex value.
pub fn resolve_format_name(category: FormatCategory, code: u32) -> String {
    match category.lookup().get(&code) {
        Some(name) => (*name).to_string(),
        None => format!("0x{code:x}"),
    }
}

/// Returns true when the code has a table entry in `category`.
pub fn is_known_format(category: FormatCategory, code: u32) -> bool {
    category.lookup().contains_key(&code)
}

const COMPRESSED_TEXTURE_FORMATS: &[(u32, &str)] = &[
    // GL_AMD_compressed_3DC_texture
    (0x87F9, "3DC_X_AMD"),
    (0x87FA, "3DC_XY_AMD"),
    // GL_AMD_compressed_ATC_texture
    (0x8C92, "ATC_RGB_AMD"),
    (0x8C93, "ATC_RGBA_EXPLICIT_ALPHA_AMD"),
    (0x87EE, "ATC_RGBA_INTERPOLATED_ALPHA_AMD"),
    // GL_OES_compressed_ETC1_RGB8_texture
    (0x8D64, "ETC1_RGB8_OES"),
    // GL_OES_compressed_paletted_texture
    (0x8B90, "PALETTE4_RGB8_OES"),
    (0x8B91, "PALETTE4_RGBA8_OES"),
    (0x8B92, "PALETTE4_R5_G6_B5_OES"),
    (0x8B93, "PALETTE4_RGBA4_OES"),
    (0x8B94, "PALETTE4_RGB5_A1_OES"),
    (0x8B95, "PALETTE8_RGB8_OES"),
    (0x8B96, "PALETTE8_RGBA8_OES"),
    (0x8B97, "PALETTE8_R5_G6_B5_OES"),
    (0x8B98, "PALETTE8_RGBA4_OES"),
    (0x8B99, "PALETTE8_RGB5_A1_OES"),
    // GL_EXT_texture_compression_dxt1, GL_ANGLE_texture_compression_dxt*,
    // GL_NV_texture_compression_s3tc, GL_EXT_texture_compression_s3tc
    (0x83F0, "COMPRESSED_RGB_S3TC_DXT1"),
    (0x83F1, "COMPRESSED_RGBA_S3TC_DXT1"),
    (0x83F2, "COMPRESSED_RGBA_S3TC_DXT3"),
    (0x83F3, "COMPRESSED_RGBA_S3TC_DXT5"),
    // GL_IMG_texture_compression_pvrtc
    (0x8C00, "COMPRESSED_RGB_PVRTC_4BPPV1_IMG"),
    (0x8C01, "COMPRESSED_RGB_PVRTC_2BPPV1_IMG"),
    (0x8C02, "COMPRESSED_RGBA_PVRTC_4BPPV1_IMG"),
    (0x8C03, "COMPRESSED_RGBA_PVRTC_2BPPV1_IMG"),
    // GL_IMG_texture_compression_pvrtc2
    (0x9137, "COMPRESSED_RGBA_PVRTC_2BPPV2_IMG"),
    (0x9138, "COMPRESSED_RGBA_PVRTC_4BPPV2_IMG"),
    // GL_KHR_texture_compression_astc_ldr / _hdr
    (0x93B0, "COMPRESSED_RGBA_ASTC_4x4_KHR"),
    (0x93B1, "COMPRESSED_RGBA_ASTC_5x4_KHR"),
    (0x93B2, "COMPRESSED_RGBA_ASTC_5x5_KHR"),
    (0x93B3, "COMPRESSED_RGBA_ASTC_6x5_KHR"),
    (0x93B4, "COMPRESSED_RGBA_ASTC_6x6_KHR"),
    (0x93B5, "COMPRESSED_RGBA_ASTC_8x5_KHR"),
    (0x93B6, "COMPRESSED_RGBA_ASTC_8x6_KHR"),
    (0x93B7, "COMPRESSED_RGBA_ASTC_8x8_KHR"),
    (0x93B8, "COMPRESSED_RGBA_ASTC_10x5_KHR"),
    (0x93B9, "COMPRESSED_RGBA_ASTC_10x6_KHR"),
    (0x93BA, "COMPRESSED_RGBA_ASTC_10x8_KHR"),
    (0x93BB, "COMPRESSED_RGBA_ASTC_10x10_KHR"),
    (0x93BC, "COMPRESSED_RGBA_ASTC_12x10_KHR"),
    (0x93BD, "COMPRESSED_RGBA_ASTC_12x12_KHR"),
    (0x93D0, "COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR"),
    (0x93D1, "COMPRESSED_SRGB8_ALPHA8_ASTC_5x4_KHR"),
    (0x93D2, "COMPRESSED_SRGB8_ALPHA8_ASTC_5x5_KHR"),
    (0x93D3, "COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR"),
    (0x93D4, "COMPRESSED_SRGB8_ALPHA8_ASTC_6x6_KHR"),
    (0x93D5, "COMPRESSED_SRGB8_ALPHA8_ASTC_8x5_KHR"),
    (0x93D6, "COMPRESSED_SRGB8_ALPHA8_ASTC_8x6_KHR"),
    (0x93D7, "COMPRESSED_SRGB8_ALPHA8_ASTC_8x8_KHR"),
    (0x93D8, "COMPRESSED_SRGB8_ALPHA8_ASTC_10x5_KHR"),
    (0x93D9, "COMPRESSED_SRGB8_ALPHA8_ASTC_10x6_KHR"),
    (0x93DA, "COMPRESSED_SRGB8_ALPHA8_ASTC_10x8_KHR"),
    (0x93DB, "COMPRESSED_SRGB8_ALPHA8_ASTC_10x10_KHR"),
    (0x93DC, "COMPRESSED_SRGB8_ALPHA8_ASTC_12x10_KHR"),
    (0x93DD, "COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR"),
    // GL_NV_texture_compression_latc
    (0x8C70, "COMPRESSED_LUMINANCE_LATC1_NV"),
    (0x8C71, "COMPRESSED_SIGNED_LUMINANCE_LATC1_NV"),
    (0x8C72, "COMPRESSED_LUMINANCE_ALPHA_LATC2_NV"),
    (0x8C73, "COMPRESSED_SIGNED_LUMINANCE_ALPHA_LATC2_NV"),
    // ES 3.0 core ETC2/EAC
    (0x9270, "COMPRESSED_R11_EAC"),
    (0x9271, "COMPRESSED_SIGNED_R11_EAC"),
    (0x9272, "COMPRESSED_RG11_EAC"),
    (0x9273, "COMPRESSED_SIGNED_RG11_EAC"),
    (0x9274, "COMPRESSED_RGB8_ETC2"),
    (0x9275, "COMPRESSED_SRGB8_ETC2"),
    (0x9276, "COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2"),
    (0x9277, "COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2"),
    (0x9278, "COMPRESSED_RGBA8_ETC2_EAC"),
    (0x9279, "COMPRESSED_SRGB8_ALPHA8_ETC2_EAC"),
];

const SHADER_BINARY_FORMATS: &[(u32, &str)] = &[
    // GL_FJ_shader_binary_GCCSO
    (0x9260, "GCCSO_SHADER_BINARY_FJ"),
    // GL_IMG_shader_binary
    (0x8C0A, "SGX_BINARY_IMG"),
    // GL_ARM_mali_shader_binary
    (0x8F60, "MALI_SHADER_BINARY_ARM"),
    // GL_VIV_shader_binary
    (0x8FC4, "SHADER_BINARY_VIV"),
    // GL_DMP_shader_binary
    (0x9250, "SHADER_BINARY_DMP"),
    // GL_NV_platform_binary
    (0x890B, "NVIDIA_PLATFORM_BINARY_NV"),
];

const PROGRAM_BINARY_FORMATS: &[(u32, &str)] = &[
    // GL_AMD_program_binary_Z400
    (0x8740, "Z400_BINARY_AMD"),
    // GL_IMG_program_binary
    (0x9130, "SGX_PROGRAM_BINARY_IMG"),
    // GL_ARM_mali_program_binary
    (0x8F61, "MALI_PROGRAM_BINARY_ARM"),
    // GL_ANGLE_program_binary
    (0x93A6, "PROGRAM_BINARY_ANGLE"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_codes_resolve_per_category() {
        assert_eq!(
            resolve_format_name(FormatCategory::CompressedTexture, 0x8D64),
            "ETC1_RGB8_OES"
        );
        assert_eq!(
            resolve_format_name(FormatCategory::CompressedTexture, 0x93D0),
            "COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR"
        );
        assert_eq!(
            resolve_format_name(FormatCategory::ShaderBinary, 0x8F60),
            "MALI_SHADER_BINARY_ARM"
        );
        assert_eq!(
            resolve_format_name(FormatCategory::ProgramBinary, 0x93A6),
            "PROGRAM_BINARY_ANGLE"
        );
    }

    #[test]
    fn s3tc_names_carry_full_prefix() {
        for (code, name) in [
            (0x83F1, "COMPRESSED_RGBA_S3TC_DXT1"),
            (0x83F2, "COMPRESSED_RGBA_S3TC_DXT3"),
            (0x83F3, "COMPRESSED_RGBA_S3TC_DXT5"),
        ] {
            assert_eq!(resolve_format_name(FormatCategory::CompressedTexture, code), name);
        }
    }

    #[test]
    fn categories_do_not_share_lookups() {
        // A Mali shader binary code means nothing as a texture format.
        assert_eq!(
            resolve_format_name(FormatCategory::CompressedTexture, 0x8F60),
            "0x8f60"
        );
        assert!(!is_known_format(FormatCategory::ProgramBinary, 0x8F60));
    }

    #[test]
    fn unknown_codes_fall_back_to_hex() {
        for code in [0u32, 1, 0x1234, 0xDEAD_BEEF, u32::MAX] {
            for category in [
                FormatCategory::CompressedTexture,
                FormatCategory::ShaderBinary,
                FormatCategory::ProgramBinary,
            ] {
                if is_known_format(category, code) {
                    continue;
                }
                assert_eq!(resolve_format_name(category, code), format!("0x{code:x}"));
            }
        }
        assert_eq!(
            resolve_format_name(FormatCategory::ShaderBinary, u32::MAX),
            "0xffffffff"
        );
    }

    #[test]
    fn tables_have_unique_codes() {
        for category in [
            FormatCategory::CompressedTexture,
            FormatCategory::ShaderBinary,
            FormatCategory::ProgramBinary,
        ] {
            let mut seen = HashSet::new();
            for (code, _) in category.table() {
                assert!(seen.insert(*code), "duplicate code 0x{code:x}");
            }
            assert_eq!(category.lookup().len(), category.table().len());
        }
    }
}
