//! # Value Text Grammar
//!
//! Bidirectional text conversion for the scalar value kinds:
//!
//! - Int32: decimal, `"5"`
//! - Float32: six fractional digits on output, `"5.000000"`
//! - Vector4: `"(x y z w)"`, space-separated, parentheses required
//! - Matrix4: `"[(r0),(r1),(r2),(r3)]"`, rows comma-separated
//! - Text: literal, unquoted

use lattice_shared::{Mat4, Vec4};

/// Formats a float with the grammar's six fractional digits.
#[must_use]
pub fn format_float(value: f32) -> String {
    format!("{value:.6}")
}

/// Formats a vector as `"(x y z w)"`.
#[must_use]
pub fn format_vec4(value: Vec4) -> String {
    format!(
        "({} {} {} {})",
        format_float(value.x),
        format_float(value.y),
        format_float(value.z),
        format_float(value.w)
    )
}

/// Formats a matrix as `"[(r0),(r1),(r2),(r3)]"`.
#[must_use]
pub fn format_mat4(value: &Mat4) -> String {
    format!(
        "[{},{},{},{}]",
        format_vec4(value.row(0)),
        format_vec4(value.row(1)),
        format_vec4(value.row(2)),
        format_vec4(value.row(3))
    )
}

/// Parses a decimal integer.
#[must_use]
pub fn parse_int(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// Parses a decimal float.
#[must_use]
pub fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse().ok()
}

/// Parses `"(x y z w)"` into a vector.
#[must_use]
pub fn parse_vec4(text: &str) -> Option<Vec4> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))?;

    let mut components = inner.split_whitespace();
    let x = components.next().and_then(parse_float)?;
    let y = components.next().and_then(parse_float)?;
    let z = components.next().and_then(parse_float)?;
    let w = components.next().and_then(parse_float)?;

    if components.next().is_some() {
        return None;
    }

    Some(Vec4::new(x, y, z, w))
}

/// Parses `"[(r0),(r1),(r2),(r3)]"` into a matrix.
#[must_use]
pub fn parse_mat4(text: &str) -> Option<Mat4> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))?;

    // Rows contain no commas, so a plain split is unambiguous.
    let mut rows = inner.split(',');
    let r0 = rows.next().and_then(parse_vec4)?;
    let r1 = rows.next().and_then(parse_vec4)?;
    let r2 = rows.next().and_then(parse_vec4)?;
    let r3 = rows.next().and_then(parse_vec4)?;

    if rows.next().is_some() {
        return None;
    }

    Some(Mat4::new(r0, r1, r2, r3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_six_digits() {
        assert_eq!(format_float(5.0), "5.000000");
        assert_eq!(format_float(-0.5), "-0.500000");
    }

    #[test]
    fn test_vec4_round_trip() {
        let v = Vec4::new(1.0, -2.5, 0.0, 4.25);
        let text = format_vec4(v);
        assert_eq!(text, "(1.000000 -2.500000 0.000000 4.250000)");
        assert_eq!(parse_vec4(&text), Some(v));
    }

    #[test]
    fn test_vec4_requires_parentheses() {
        assert!(parse_vec4("1.0 2.0 3.0 4.0").is_none());
        assert!(parse_vec4("(1.0 2.0 3.0)").is_none());
        assert!(parse_vec4("(1.0 2.0 3.0 4.0 5.0)").is_none());
    }

    #[test]
    fn test_mat4_zero_literal() {
        let row = "(0.000000 0.000000 0.000000 0.000000)";
        let expected = format!("[{row},{row},{row},{row}]");
        assert_eq!(format_mat4(&Mat4::ZERO), expected);
    }

    #[test]
    fn test_mat4_round_trip() {
        let m = Mat4::new(
            Vec4::new(1.0, 2.0, 3.0, 4.0),
            Vec4::new(5.0, 6.0, 7.0, 8.0),
            Vec4::new(9.0, 10.0, 11.0, 12.0),
            Vec4::new(13.0, 14.0, 15.0, 16.0),
        );
        assert_eq!(parse_mat4(&format_mat4(&m)), Some(m));
    }

    #[test]
    fn test_mat4_rejects_short_input() {
        assert!(parse_mat4("[(0 0 0 0),(0 0 0 0)]").is_none());
        assert!(parse_mat4("(0 0 0 0)").is_none());
    }

    #[test]
    fn test_int_and_float_accept_any_decimal() {
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_float("2.5"), Some(2.5));
        assert_eq!(parse_float("3"), Some(3.0));
        assert!(parse_int("4.5").is_none());
    }
}
