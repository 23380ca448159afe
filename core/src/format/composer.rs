//! Output composer (`Print`)
//!
//! Scans the template, converts each argument in directive order and
//! splices the results between the literal runs. All working memory comes
//! from the pool allocator as scoped `PoolBuffer`s, so every exit path
//! releases it.

use super::accountant::{accounted_length, literal_length, specifier_length};
use super::args::Arg;
use super::arena::SpecArena;
use super::output::OutputBuffer;
use super::render::render_arg;
use super::scanner::{required_capacity, scan, step, ScanMode, ScanState, Transition};
use super::specifier::FormatSpecifier;
use crate::config::PrintConfig;
use crate::console::Console;
use crate::pool::{PoolAllocator, PoolBuffer};
use crate::status::{PrintError, PrintResult, Status};
use crate::{log_debug, log_warn};

/// Formatter bound to one pool allocator.
pub struct Printer<'p, A: PoolAllocator + ?Sized> {
    pool: &'p A,
    config: PrintConfig,
}

impl<'p, A: PoolAllocator + ?Sized> Printer<'p, A> {
    pub fn new(pool: &'p A) -> Self {
        Self::with_config(pool, PrintConfig::default())
    }

    pub fn with_config(pool: &'p A, config: PrintConfig) -> Self {
        Self {
            pool,
            config: config.bounded(),
        }
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    /// Compose `template` with `args`, appending the result to `out`.
    ///
    /// Returns the number of bytes appended. On error `out` may hold a
    /// partial rendering.
    pub fn compose(
        &self,
        template: &[u8],
        args: &[Arg<'_>],
        out: &mut OutputBuffer<'_>,
    ) -> PrintResult<usize> {
        self.compose_inner(template, args, out).map_err(report)
    }

    /// Compose into a pooled output buffer and write it to `console`.
    pub fn print<C: Console + ?Sized>(
        &self,
        template: &[u8],
        args: &[Arg<'_>],
        console: &mut C,
    ) -> PrintResult<usize> {
        self.print_inner(template, args, console).map_err(report)
    }

    fn print_inner<C: Console + ?Sized>(
        &self,
        template: &[u8],
        args: &[Arg<'_>],
        console: &mut C,
    ) -> PrintResult<usize> {
        self.check_template(template)?;

        let mut storage = self.acquire::<u8>(self.config.output_capacity)?;
        let mut out = OutputBuffer::new(storage.as_mut_slice());
        let written = self.compose_inner(template, args, &mut out)?;

        console.write_bytes(out.as_bytes()).map_err(PrintError::Device)?;
        Ok(written)
    }

    fn compose_inner(
        &self,
        template: &[u8],
        args: &[Arg<'_>],
        out: &mut OutputBuffer<'_>,
    ) -> PrintResult<usize> {
        self.check_template(template)?;
        let start = out.len();
        let mode = self.config.scan_mode;

        let mut slots = self.acquire::<FormatSpecifier>(required_capacity(template))?;
        let mut scratch_storage = self.acquire::<u8>(self.config.scratch_len)?;

        let mut arena = SpecArena::new(slots.as_mut_slice());
        let count = scan(template, &mut arena, mode)?;
        let specs = arena.as_slice();

        log_debug!(
            "{} specifier(s), {} of {} template bytes in directives, {} literal",
            count,
            accounted_length(specs),
            template.len(),
            literal_length(template.len(), specs)
        );

        if count > args.len() {
            log_debug!("{} specifier(s) but only {} argument(s)", count, args.len());
            return Err(PrintError::InvalidParameter);
        }

        let mut scratch = OutputBuffer::new(scratch_storage.as_mut_slice());
        let mut cursor = 0;

        for (spec, arg) in specs.iter().zip(args) {
            let canonical = specifier_length(spec);
            if spec.span != canonical {
                log_debug!(
                    "non-canonical directive at {}: {} bytes, {} accounted",
                    spec.location,
                    spec.span,
                    canonical
                );
            }

            copy_literal(&template[cursor..spec.location], cursor, mode, out)?;
            render_arg(spec, *arg, self.config.default_float_precision, &mut scratch, out)
                .map_err(|err| {
                    if err == PrintError::InvalidParameter {
                        log_debug!(
                            "directive at {} cannot take {} argument",
                            spec.location,
                            arg.kind()
                        );
                    }
                    err
                })?;
            cursor = spec.location + spec.span;
        }
        copy_literal(&template[cursor..], cursor, mode, out)?;

        Ok(out.len() - start)
    }

    fn check_template(&self, template: &[u8]) -> PrintResult<()> {
        if template.len() > self.config.max_template_len {
            log_debug!(
                "template is {} bytes, limit {}",
                template.len(),
                self.config.max_template_len
            );
            return Err(PrintError::BufferTooSmall);
        }
        Ok(())
    }

    fn acquire<T: Copy + Default>(&self, count: usize) -> PrintResult<PoolBuffer<'p, T, A>> {
        PoolBuffer::new(self.pool, self.config.memory_type, count)
            .map_err(PrintError::AllocationFailure)
    }
}

fn report(err: PrintError) -> PrintError {
    log_warn!("print failed: {}", err);
    err
}

/// Copy one literal run, resolving `%%` escapes.
///
/// `base` is the run's offset in the template. A directive still open at
/// the end of the run (unterminated trailing `%...`) is copied verbatim.
fn copy_literal(
    run: &[u8],
    base: usize,
    mode: ScanMode,
    out: &mut OutputBuffer<'_>,
) -> PrintResult<()> {
    let mut state = ScanState::Literal;
    let mut open = 0;

    for (i, &byte) in run.iter().enumerate() {
        let (next, transition) = step(state, byte, mode, base + i)?;
        match transition {
            Transition::Literal => out.push(byte)?,
            Transition::Open => open = i,
            Transition::Escape => out.push(b'%')?,
            Transition::Finalize(_) => out.extend(&run[open..=i])?,
            _ => {}
        }
        state = next;
    }

    if state.in_directive() {
        out.extend(&run[open..])?;
    }
    Ok(())
}

/// `Print` entry point with the default configuration.
pub fn print<A, C>(pool: &A, console: &mut C, template: &str, args: &[Arg<'_>]) -> Status
where
    A: PoolAllocator + ?Sized,
    C: Console + ?Sized,
{
    match Printer::new(pool).print(template.as_bytes(), args, console) {
        Ok(_) => Status::SUCCESS,
        Err(err) => err.status(),
    }
}
