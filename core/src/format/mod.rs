//! printf-style formatting for the pre-OS console
//!
//! Three stages run in sequence for every print:
//!
//! ```text
//!  template ──▶ scanner ──▶ [FormatSpecifier; 2×%] ──▶ accountant (template bytes)
//!                                   │
//!                      args ──▶ composer/render ──▶ OutputBuffer ──▶ Console
//! ```
//!
//! # Directive grammar
//!
//! `%` [modifier] [width] [`.` precision] conversion, where modifiers,
//! width digits and the precision part may appear in any order before the
//! conversion character.
//!
//! - Conversions: `d i u o x X s e E f`
//! - Modifiers: `b` (8), `h` (16), `w` (32), `l` (64), `q` (128 bits)
//! - A leading `0` in the width selects zero padding
//! - `%%` is a literal percent sign
//!
//! # Constraints
//!
//! - Templates and composed output are capped at 256 bytes
//! - Each argument renders through a 64-byte scratch buffer
//! - No flag characters, positional arguments or long doubles
//!
//! # Usage
//!
//! ```ignore
//! let printer = Printer::new(&pool);
//! printer.print(b"disk %u: %s\n", &args![0u32, "ESP"], &mut con_out)?;
//! ```

mod accountant;
mod arena;
mod args;
mod composer;
mod output;
mod render;
mod scanner;
mod specifier;


pub use accountant::{accounted_length, clamped, literal_length, specifier_length, MAX_FIELD};
pub use arena::SpecArena;
pub use args::Arg;
pub use composer::{print, Printer};
pub use output::OutputBuffer;
pub use render::{render_arg, DEFAULT_INT_BITS};
pub use scanner::{
    count_directives, required_capacity, scan, scan_into, step, ScanMode, ScanState, Transition,
};
pub use specifier::{Conversion, FormatSpecifier, Modifier};
