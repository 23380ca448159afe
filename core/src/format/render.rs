//! Argument conversion.
//!
//! Each argument is stringified into the scratch buffer first, then
//! padded into the output. Width and precision are used as scanned (the
//! two-digit cap only applies to template accounting).

use core::fmt::Write;

use super::args::Arg;
use super::output::OutputBuffer;
use super::specifier::{Conversion, FormatSpecifier, Modifier};
use crate::status::{PrintError, PrintResult};

/// Bit width assumed for an integer argument without a size modifier.
pub const DEFAULT_INT_BITS: u32 = 64;

/// Convert `arg` per `spec` and append it to `out`.
pub fn render_arg(
    spec: &FormatSpecifier,
    arg: Arg<'_>,
    default_precision: u32,
    scratch: &mut OutputBuffer<'_>,
    out: &mut OutputBuffer<'_>,
) -> PrintResult<()> {
    let conversion = spec.conversion.ok_or(PrintError::InvalidParameter)?;
    scratch.clear();

    if conversion.is_integer() {
        render_integer(spec, conversion, arg, scratch, out)
    } else if conversion.is_float() {
        render_float(spec, conversion, arg, default_precision, scratch, out)
    } else {
        render_string(spec, arg, out)
    }
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

/// Sign and magnitude of an integer argument after applying the modifier.
///
/// The argument is read as its 64-bit pattern whatever its variant; the
/// conversion alone decides whether it is sign- or zero-extended.
fn integer_operand(
    conversion: Conversion,
    modifier: Option<Modifier>,
    arg: Arg<'_>,
) -> PrintResult<(bool, u128)> {
    let raw = match arg {
        Arg::Int(v) => v as u64,
        Arg::Uint(v) => v,
        _ => return Err(PrintError::InvalidParameter),
    };
    let bits = modifier.map_or(DEFAULT_INT_BITS, Modifier::bits);

    if conversion.is_signed() {
        let value = sign_extend(raw as i64 as i128, bits);
        Ok((value < 0, value.unsigned_abs()))
    } else {
        Ok((false, raw as u128 & low_mask(bits)))
    }
}

#[inline]
fn low_mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// Truncate to `bits` and sign-extend back to 128.
#[inline]
fn sign_extend(value: i128, bits: u32) -> i128 {
    if bits >= 128 {
        value
    } else {
        let shift = 128 - bits;
        (value << shift) >> shift
    }
}

fn render_integer(
    spec: &FormatSpecifier,
    conversion: Conversion,
    arg: Arg<'_>,
    scratch: &mut OutputBuffer<'_>,
    out: &mut OutputBuffer<'_>,
) -> PrintResult<()> {
    let (negative, magnitude) = integer_operand(conversion, spec.modifier, arg)?;

    // Explicit zero precision with a zero value prints no digits
    if !(magnitude == 0 && spec.precision() == Some(0)) {
        let written = match conversion {
            Conversion::Octal => write!(scratch, "{:o}", magnitude),
            Conversion::HexLower => write!(scratch, "{:x}", magnitude),
            Conversion::HexUpper => write!(scratch, "{:X}", magnitude),
            _ => write!(scratch, "{}", magnitude),
        };
        written.map_err(|_| PrintError::BufferTooSmall)?;
    }

    let digits = scratch.as_bytes();
    let min_digits = spec.precision().unwrap_or(1) as usize;
    let zeros = min_digits.saturating_sub(digits.len());
    let content = negative as usize + zeros + digits.len();
    let pad = (spec.width as usize).saturating_sub(content);
    let zero_fill = spec.zero_pad && !spec.has_precision;

    if !zero_fill {
        out.pad(b' ', pad)?;
    }
    if negative {
        out.push(b'-')?;
    }
    if zero_fill {
        out.pad(b'0', pad)?;
    }
    out.pad(b'0', zeros)?;
    out.extend(digits)
}

// ---------------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------------

fn render_float(
    spec: &FormatSpecifier,
    conversion: Conversion,
    arg: Arg<'_>,
    default_precision: u32,
    scratch: &mut OutputBuffer<'_>,
    out: &mut OutputBuffer<'_>,
) -> PrintResult<()> {
    let value = match arg {
        Arg::Float(v) => v,
        _ => return Err(PrintError::InvalidParameter),
    };
    let value = match spec.modifier {
        None | Some(Modifier::Long) => value,
        Some(Modifier::Word) => value as f32 as f64,
        Some(_) => return Err(PrintError::InvalidParameter),
    };

    let precision = spec.precision().unwrap_or(default_precision) as usize;
    let upper = conversion.is_uppercase();
    let negative = value.is_sign_negative() && !value.is_nan();
    let abs = value.abs();

    if value.is_nan() {
        scratch.extend(if upper { b"NAN" } else { b"nan" })?;
    } else if value.is_infinite() {
        scratch.extend(if upper { b"INF" } else { b"inf" })?;
    } else if conversion == Conversion::Fixed {
        write!(scratch, "{:.*}", precision, abs).map_err(|_| PrintError::BufferTooSmall)?;
    } else {
        write_exponent(scratch, abs, precision, upper)?;
    }

    let body = scratch.as_bytes();
    let content = negative as usize + body.len();
    let pad = (spec.width as usize).saturating_sub(content);
    let zero_fill = spec.zero_pad && value.is_finite();

    if !zero_fill {
        out.pad(b' ', pad)?;
    }
    if negative {
        out.push(b'-')?;
    }
    if zero_fill {
        out.pad(b'0', pad)?;
    }
    out.extend(body)
}

/// `d.ddde+XX` form: core prints the exponent bare (`e3`, `e-12`), so it
/// is rewritten with an explicit sign and at least two digits.
fn write_exponent(
    scratch: &mut OutputBuffer<'_>,
    abs: f64,
    precision: usize,
    upper: bool,
) -> PrintResult<()> {
    write!(scratch, "{:.*e}", precision, abs).map_err(|_| PrintError::BufferTooSmall)?;

    let bytes = scratch.as_bytes();
    let Some(e_pos) = bytes.iter().rposition(|&b| b == b'e') else {
        return Ok(());
    };
    let (exp_negative, exp_digits) = match &bytes[e_pos + 1..] {
        [b'-', rest @ ..] => (true, rest),
        rest => (false, rest),
    };
    let mut exponent = [0u8; 4];
    let n = exp_digits.len().min(exponent.len());
    exponent[..n].copy_from_slice(&exp_digits[..n]);

    scratch.truncate(e_pos);
    scratch.push(if upper { b'E' } else { b'e' })?;
    scratch.push(if exp_negative { b'-' } else { b'+' })?;
    scratch.pad(b'0', 2usize.saturating_sub(n))?;
    scratch.extend(&exponent[..n])
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

fn render_string(spec: &FormatSpecifier, arg: Arg<'_>, out: &mut OutputBuffer<'_>) -> PrintResult<()> {
    if spec.modifier.is_some() {
        return Err(PrintError::InvalidParameter);
    }
    let text = match arg {
        Arg::Str(s) => s,
        _ => return Err(PrintError::InvalidParameter),
    };
    let text = match spec.precision() {
        Some(max) => &text[..text.len().min(max as usize)],
        None => text,
    };

    out.pad(b' ', (spec.width as usize).saturating_sub(text.len()))?;
    out.extend(text)
}
