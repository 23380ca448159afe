//! Template length accounting.
//!
//! Computes how many template bytes each directive occupies in its
//! canonical spelling: `%`, optional modifier, width digits, `.` plus
//! precision digits, conversion character. Width and precision are capped
//! at two digits (99). The caller's records are never modified; clamping
//! happens on a returned copy.

use super::specifier::FormatSpecifier;

/// Largest width/precision the accounting considers.
pub const MAX_FIELD: u32 = 99;

/// Copy of `spec` with width and precision capped at `MAX_FIELD`.
pub fn clamped(spec: &FormatSpecifier) -> FormatSpecifier {
    FormatSpecifier {
        width: spec.width.min(MAX_FIELD),
        precision: spec.precision.min(MAX_FIELD),
        ..*spec
    }
}

/// Template bytes one directive occupies.
pub fn specifier_length(spec: &FormatSpecifier) -> usize {
    let spec = clamped(spec);

    // '%' and the conversion character
    let mut length = 2;
    if spec.modifier.is_some() {
        length += 1;
    }
    length += match spec.width {
        0 => 0,
        1..=9 => 1,
        _ => 2,
    };
    if spec.has_precision {
        length += 1 + if spec.precision <= 9 { 1 } else { 2 };
    }
    length
}

/// Total template bytes occupied by `specs`.
pub fn accounted_length(specs: &[FormatSpecifier]) -> usize {
    specs.iter().map(specifier_length).sum()
}

/// Template bytes left over for literal text.
pub fn literal_length(template_len: usize, specs: &[FormatSpecifier]) -> usize {
    template_len.saturating_sub(accounted_length(specs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::specifier::{Conversion, Modifier};

    fn spec(conv: u8) -> FormatSpecifier {
        FormatSpecifier {
            conversion: Conversion::from_byte(conv),
            ..FormatSpecifier::default()
        }
    }

    #[test]
    fn test_bare_directive() {
        assert_eq!(specifier_length(&spec(b'd')), 2);
        assert_eq!(accounted_length(&[]), 0);
    }

    #[test]
    fn test_modifier_width_precision() {
        let mut s = spec(b'f');
        s.modifier = Some(Modifier::Long);
        s.width = 10;
        s.has_precision = true;
        s.precision = 3;
        // %10.3lf
        assert_eq!(specifier_length(&s), 7);
    }

    #[test]
    fn test_precision_zero_counts_one_digit() {
        let mut s = spec(b'f');
        s.has_precision = true;
        assert_eq!(specifier_length(&s), 4);
    }

    #[test]
    fn test_clamping_does_not_mutate() {
        let mut s = spec(b'x');
        s.width = 250;
        s.has_precision = true;
        s.precision = 1000;
        let original = s;

        assert_eq!(specifier_length(&s), 2 + 2 + 3);
        assert_eq!(s, original);

        let c = clamped(&s);
        assert_eq!(c.width, 99);
        assert_eq!(c.precision, 99);
        assert_eq!(c.location, s.location);
    }

    #[test]
    fn test_literal_length() {
        let specs = [spec(b'd'), spec(b's')];
        assert_eq!(literal_length(10, &specs), 6);
        assert_eq!(literal_length(3, &specs), 0);
    }
}
