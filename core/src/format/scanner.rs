//! Directive scanner
//!
//! Single left-to-right pass over the template. Each byte goes through
//! `step`, which classifies it against the current state and returns the
//! next state plus what the byte means for the open record. `scan` then
//! applies that to the record and pushes finalized records into the arena.
//!
//! ```text
//!            '%'                 conversion char
//!  Literal ───────▶ InSpecifier ──────────────────▶ Literal (push record)
//!     ▲                │   │ '.'
//!     │      '%' (%%)  │   ▼
//!     └────────────────┘ InPrecision ──conversion──▶ Literal (push record)
//! ```
//!
//! A record is only pushed once its conversion character is reached; an
//! escaped `%%` or an unterminated trailing directive never takes a slot
//! and never touches previously pushed records.

use super::arena::SpecArena;
use super::specifier::{Conversion, FormatSpecifier, Modifier};
use crate::status::{PrintError, PrintResult};
use crate::log_trace;

/// Treatment of bytes that are not part of the directive grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Abort with `MalformedFormat`.
    #[default]
    Strict,
    /// Skip the byte and keep scanning (legacy behaviour).
    Permissive,
}

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Literal,
    InSpecifier,
    /// Sub-mode of `InSpecifier` after a `.`
    InPrecision,
}

impl ScanState {
    #[inline]
    pub const fn in_directive(self) -> bool {
        !matches!(self, Self::Literal)
    }
}

/// Effect of one byte on the open record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Plain template text
    Literal,
    /// `%` opened a record at this offset
    Open,
    /// `%%`: drop the open record
    Escape,
    /// Conversion char closes the record
    Finalize(Conversion),
    /// Size modifier (last one wins)
    Modifier(Modifier),
    /// Width digit
    Width(u8),
    /// `.`: precision present, accumulator reset to 0
    BeginPrecision,
    /// Precision digit
    Precision(u8),
    /// Unrecognised byte skipped in permissive mode
    Ignore,
}

/// Classify `byte` seen at `offset` in `state`.
pub fn step(
    state: ScanState,
    byte: u8,
    mode: ScanMode,
    offset: usize,
) -> PrintResult<(ScanState, Transition)> {
    if state == ScanState::Literal {
        return Ok(if byte == b'%' {
            (ScanState::InSpecifier, Transition::Open)
        } else {
            (ScanState::Literal, Transition::Literal)
        });
    }

    if byte == b'%' {
        return Ok((ScanState::Literal, Transition::Escape));
    }
    if let Some(conv) = Conversion::from_byte(byte) {
        return Ok((ScanState::Literal, Transition::Finalize(conv)));
    }
    if let Some(modifier) = Modifier::from_byte(byte) {
        return Ok((state, Transition::Modifier(modifier)));
    }
    if byte.is_ascii_digit() {
        let digit = byte - b'0';
        return Ok(match state {
            ScanState::InPrecision => (state, Transition::Precision(digit)),
            _ => (state, Transition::Width(digit)),
        });
    }
    if byte == b'.' {
        if state == ScanState::InPrecision && mode == ScanMode::Strict {
            return Err(PrintError::MalformedFormat { offset });
        }
        return Ok((ScanState::InPrecision, Transition::BeginPrecision));
    }

    match mode {
        ScanMode::Strict => Err(PrintError::MalformedFormat { offset }),
        ScanMode::Permissive => Ok((state, Transition::Ignore)),
    }
}

/// Number of `%` bytes in `template`.
pub fn count_directives(template: &[u8]) -> usize {
    template.iter().filter(|&&b| b == b'%').count()
}

/// Specifier slots a caller must provide for `template`.
///
/// Twice the `%` count, so escaped `%%` pairs can never starve a slot.
pub fn required_capacity(template: &[u8]) -> usize {
    count_directives(template).saturating_mul(2)
}

/// Scan `template`, pushing every finalized directive into `arena`.
///
/// Returns the number of finalized specifiers. Fails with
/// `BufferTooSmall` if the arena runs out of slots.
pub fn scan(template: &[u8], arena: &mut SpecArena<'_>, mode: ScanMode) -> PrintResult<usize> {
    let mut state = ScanState::Literal;
    let mut current = FormatSpecifier::default();

    for (location, &byte) in template.iter().enumerate() {
        let (next, transition) = step(state, byte, mode, location)?;

        match transition {
            Transition::Literal | Transition::Ignore => {}
            Transition::Open => current = FormatSpecifier::open(location),
            Transition::Escape => {
                log_trace!("escaped %% at {}", current.location);
            }
            Transition::Finalize(conv) => {
                current.conversion = Some(conv);
                current.span = location + 1 - current.location;
                arena.push(current)?;
                log_trace!(
                    "specifier {} '{}' at {}",
                    arena.len() - 1,
                    conv.as_byte() as char,
                    current.location
                );
            }
            Transition::Modifier(modifier) => current.modifier = Some(modifier),
            Transition::Width(digit) => {
                if digit == 0 && current.width == 0 {
                    current.zero_pad = true;
                }
                current.width = accumulate(current.width, digit);
            }
            Transition::BeginPrecision => {
                current.has_precision = true;
                current.precision = 0;
            }
            Transition::Precision(digit) => {
                current.precision = accumulate(current.precision, digit);
            }
        }

        state = next;
    }

    if state.in_directive() {
        log_trace!("unterminated directive at {} discarded", current.location);
    }

    Ok(arena.len())
}

/// Scan into a plain slice; its length is the capacity.
pub fn scan_into(
    template: &[u8],
    slots: &mut [FormatSpecifier],
    mode: ScanMode,
) -> PrintResult<usize> {
    let mut arena = SpecArena::new(slots);
    scan(template, &mut arena, mode)
}

#[inline]
fn accumulate(value: u32, digit: u8) -> u32 {
    value.saturating_mul(10).saturating_add(digit as u32)
}
