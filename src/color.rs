/// Converts `#rgb`/`#rrggbb` (leading `#` optional) into an `rgba(r,g,b,alpha)` string.
///
/// Inputs shorter than four characters are returned unchanged. Longer malformed
/// input is parsed leniently: the leading run of hex digits is read and the low
/// 24 bits become the channels, so it still yields an `rgba(...)` string.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> String {
    if hex.is_empty() || hex.chars().count() < 4 {
        return hex.to_string();
    }

    let digits = hex.replacen('#', "", 1);
    let digits = if digits.chars().count() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits
    };

    let value = digits
        .chars()
        .map_while(|c| c.to_digit(16))
        .fold(0u32, |acc, d| acc.wrapping_mul(16).wrapping_add(d));

    let r = (value >> 16) & 255;
    let g = (value >> 8) & 255;
    let b = value & 255;
    format!("rgba({},{},{},{})", r, g, b, alpha)
}

/// Strict parse of a 3- or 6-digit hex color into channels.
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgba_expands_shorthand() {
        assert_eq!(hex_to_rgba("#fff", 0.5), "rgba(255,255,255,0.5)");
    }

    #[test]
    fn test_hex_to_rgba_without_hash() {
        assert_eq!(hex_to_rgba("4fc3f7", 0.18), "rgba(79,195,247,0.18)");
        assert_eq!(hex_to_rgba("#a259e6", 0.18), "rgba(162,89,230,0.18)");
    }

    #[test]
    fn test_hex_to_rgba_passes_short_input_through() {
        assert_eq!(hex_to_rgba("", 0.18), "");
        assert_eq!(hex_to_rgba("#ff", 0.18), "#ff");
        assert_eq!(hex_to_rgba("red", 0.18), "red");
    }

    #[test]
    fn test_hex_to_rgba_malformed_long_input_still_formats() {
        assert_eq!(hex_to_rgba("#ffffff00", 0.18), "rgba(255,255,0,0.18)");
        assert_eq!(hex_to_rgba("zzzz", 1.0), "rgba(0,0,0,1)");
    }

    #[test]
    fn test_parse_hex_rgb_is_strict() {
        assert_eq!(parse_hex_rgb("#4fc3f7"), Some((79, 195, 247)));
        assert_eq!(parse_hex_rgb("abc"), Some((170, 187, 204)));
        assert_eq!(parse_hex_rgb("#ffffff00"), None);
        assert_eq!(parse_hex_rgb("#gggggg"), None);
    }
}
