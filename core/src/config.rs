//! Print configuration.
//!
//! Configuration options for `Printer`. The byte ceilings are fixed at
//! compile time because the firmware has no buffer-growth strategy; a
//! config can only tighten them. `Printer` re-applies the ceilings with
//! `bounded()`, so a struct literal cannot raise them either.

use crate::format::ScanMode;
use crate::pool::MemoryType;

/// Longest template (and composed output) `Print` accepts, in bytes.
pub const MAX_PRINT_LEN: usize = 256;

/// Scratch buffer for stringifying one argument.
pub const SCRATCH_LEN: usize = 64;

/// Float precision used when a directive gives none.
pub const DEFAULT_FLOAT_PRECISION: u32 = 6;

/// Print configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    /// How unrecognised directive bytes are treated.
    pub scan_mode: ScanMode,
    /// Templates longer than this fail with `BufferTooSmall` before any allocation.
    pub max_template_len: usize,
    /// Size of the composed output buffer.
    pub output_capacity: usize,
    /// Size of the per-argument scratch buffer.
    pub scratch_len: usize,
    /// Digits after the point when a float directive has no precision.
    pub default_float_precision: u32,
    /// Memory type passed to the pool allocator.
    pub memory_type: MemoryType,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            scan_mode: ScanMode::Strict,
            max_template_len: MAX_PRINT_LEN,
            output_capacity: MAX_PRINT_LEN,
            scratch_len: SCRATCH_LEN,
            default_float_precision: DEFAULT_FLOAT_PRECISION,
            memory_type: MemoryType::LoaderData,
        }
    }
}

impl PrintConfig {
    /// Legacy behaviour: unknown directive bytes are skipped.
    pub fn legacy() -> Self {
        Self {
            scan_mode: ScanMode::Permissive,
            ..Default::default()
        }
    }

    /// Switch to permissive scanning.
    pub fn permissive(self) -> Self {
        self.scan_mode(ScanMode::Permissive)
    }

    /// Set scan mode.
    pub fn scan_mode(mut self, mode: ScanMode) -> Self {
        self.scan_mode = mode;
        self
    }

    /// Set template limit (clamped to `MAX_PRINT_LEN`).
    pub fn max_template_len(mut self, len: usize) -> Self {
        self.max_template_len = len.min(MAX_PRINT_LEN);
        self
    }

    /// Set output capacity (clamped to `MAX_PRINT_LEN`).
    pub fn output_capacity(mut self, len: usize) -> Self {
        self.output_capacity = len.min(MAX_PRINT_LEN);
        self
    }

    /// Set scratch size (clamped to `SCRATCH_LEN`).
    pub fn scratch_len(mut self, len: usize) -> Self {
        self.scratch_len = len.min(SCRATCH_LEN);
        self
    }

    /// Clamp every limit to its compile-time ceiling.
    pub fn bounded(self) -> Self {
        Self {
            max_template_len: self.max_template_len.min(MAX_PRINT_LEN),
            output_capacity: self.output_capacity.min(MAX_PRINT_LEN),
            scratch_len: self.scratch_len.min(SCRATCH_LEN),
            ..self
        }
    }

    /// Set default float precision.
    pub fn float_precision(mut self, digits: u32) -> Self {
        self.default_float_precision = digits;
        self
    }

    /// Set pool memory type.
    pub fn memory_type(mut self, kind: MemoryType) -> Self {
        self.memory_type = kind;
        self
    }
}
