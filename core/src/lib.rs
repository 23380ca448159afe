//! Shasta Core Library
//!
//! Bounded printf-style formatting for the pre-OS console: directive
//! scanning, template length accounting and output composition over a
//! fixed-size pool allocator. Designed to be no_std compatible.

#![no_std]
#![allow(clippy::new_without_default)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod console;
pub mod format;
pub mod logger;
pub mod pool;
pub mod status;

pub use config::{PrintConfig, MAX_PRINT_LEN, SCRATCH_LEN};
pub use console::{wait_for_key, Console, InputKey, KeyInput};
pub use format::{print, Arg, OutputBuffer, Printer};
pub use pool::{FixedPool, MemoryType, PoolAllocator, PoolBuffer, PoolStats};
pub use status::{PrintError, PrintResult, Status};
