//! Version-string parsing for GL and shading-language versions.

/// Characters that belong to a token; everything else separates tokens.
fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '\''
}

/// Extract `(major, minor)` from a free-form driver version string.
///
/// The string is split on runs of non-word characters and the first integer
/// token that is immediately followed by another integer token wins, so
/// `"OpenGL ES 3.2 build 1.3"` yields `(3, 2)` and vendor build numbers later
/// in the string are ignored. Returns `(0, 0)` when no such pair exists.
pub fn parse_version(text: &str) -> (u32, u32) {
    let tokens: Vec<&str> = text
        .split(|ch: char| !is_token_char(ch))
        .filter(|token| !token.is_empty())
        .collect();

    for pair in tokens.windows(2) {
        if let (Some(major), Some(minor)) = (parse_int(pair[0]), parse_int(pair[1])) {
            return (major, minor);
        }
    }
    (0, 0)
}

fn parse_int(token: &str) -> Option<u32> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_pair_not_build_number() {
        assert_eq!(parse_version("OpenGL ES 3.2 build 1.3"), (3, 2));
        assert_eq!(parse_version("OpenGL ES 3.1 V@145.0 (GIT@I3f1d0b5b37)"), (3, 1));
    }

    #[test]
    fn bare_and_shading_language_strings() {
        assert_eq!(parse_version("3.0"), (3, 0));
        assert_eq!(parse_version("OpenGL ES GLSL ES 3.20"), (3, 20));
        assert_eq!(parse_version("OpenGL ES GLSL ES 1.00"), (1, 0));
    }

    #[test]
    fn malformed_strings_default_to_zero() {
        assert_eq!(parse_version(""), (0, 0));
        assert_eq!(parse_version("OpenGL ES"), (0, 0));
        assert_eq!(parse_version("version 3"), (0, 0));
        assert_eq!(parse_version("ES3x.2y"), (0, 0));
    }

    #[test]
    fn lone_integer_does_not_pair_across_words() {
        // "3" is followed by a word, so scanning continues to the later pair.
        assert_eq!(parse_version("ES 3 profile 2.1"), (2, 1));
    }

    #[test]
    fn overflowing_tokens_are_not_integers() {
        assert_eq!(parse_version("99999999999.1 2.0"), (1, 2));
    }
}
