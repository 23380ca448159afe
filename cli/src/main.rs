//! shasta-cli - Host harness for the formatting core
//!
//! Runs the scanner, accountant and composer against a fixed host pool
//! instead of firmware boot services.
//!
//! Usage:
//!   shasta-cli                                   # enumerate the demo template
//!   shasta-cli scan "%08x and %.3s"              # enumerate a template
//!   shasta-cli print "%s=%5d" s:count i:42       # render with typed arguments

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use shasta_core::format::{accounted_length, required_capacity, scan, FormatSpecifier, SpecArena};
use shasta_core::logger::{self, LogLevel};
use shasta_core::{Arg, Console, FixedPool, MemoryType, PoolBuffer, PrintConfig, Printer, Status};

/// Size of the host stand-in for the firmware pool
const POOL_SIZE: usize = 16 * 1024;

const DEMO_TEMPLATE: &str = "Some basic format specifiers: %u, %3d, %.2f, %lu, %10.3lf";

#[derive(Debug, Parser)]
#[command(name = "shasta-cli")]
#[command(about = "Host harness for the Shasta formatting core")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Skip unrecognised directive bytes instead of rejecting them
    #[arg(long, global = true)]
    permissive: bool,

    /// Dump the log ring to stderr when done
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enumerate the directives in a template and their template bytes
    Scan {
        /// Template to scan
        template: String,
    },
    /// Render a template through the composer to stdout
    Print {
        /// Template to render
        template: String,
        /// Typed arguments: i:<int>, u:<uint>, f:<float>, s:<text>
        #[arg(value_parser = parse_arg)]
        args: Vec<HostArg>,
        /// Report pool statistics after the call
        #[arg(long)]
        stats: bool,
    },
}

/// Owned argument parsed from the command line
#[derive(Debug, Clone)]
enum HostArg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
}

impl HostArg {
    fn as_arg(&self) -> Arg<'_> {
        match self {
            Self::Int(v) => Arg::Int(*v),
            Self::Uint(v) => Arg::Uint(*v),
            Self::Float(v) => Arg::Float(*v),
            Self::Str(s) => Arg::Str(s.as_bytes()),
        }
    }
}

fn parse_arg(s: &str) -> Result<HostArg, String> {
    let (kind, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <kind>:<value>, got {:?}", s))?;
    match kind {
        "i" => parse_int(value).map(HostArg::Int),
        "u" => parse_uint(value).map(HostArg::Uint),
        "f" => value
            .parse::<f64>()
            .map(HostArg::Float)
            .map_err(|e| format!("bad float {:?}: {}", value, e)),
        "s" => Ok(HostArg::Str(value.to_string())),
        _ => Err(format!("unknown argument kind {:?} (use i, u, f or s)", kind)),
    }
}

fn parse_int(value: &str) -> Result<i64, String> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let magnitude = parse_uint(digits)?;
    let signed = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    signed.ok_or_else(|| format!("integer {:?} out of range", value))
}

fn parse_uint(value: &str) -> Result<u64, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|e| format!("bad integer {:?}: {}", value, e))
}

/// Standard output as the console device
struct StdoutConsole {
    out: io::Stdout,
}

impl Console for StdoutConsole {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Status> {
        let mut lock = self.out.lock();
        lock.write_all(bytes)
            .and_then(|_| lock.flush())
            .map_err(|_| Status::DEVICE_ERROR)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        logger::set_level(LogLevel::Trace);
    }
    let config = if cli.permissive {
        PrintConfig::legacy()
    } else {
        PrintConfig::default()
    };

    let mut region = vec![0u8; POOL_SIZE];
    let pool = FixedPool::new(&mut region);

    let result = match &cli.command {
        None => run_scan(&pool, &config, DEMO_TEMPLATE),
        Some(Command::Scan { template }) => run_scan(&pool, &config, template),
        Some(Command::Print {
            template,
            args,
            stats,
        }) => run_print(&pool, config, template, args, *stats),
    };

    if cli.verbose {
        dump_log();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(status) => {
            eprintln!("error: {}", status);
            ExitCode::FAILURE
        }
    }
}

fn run_scan(pool: &FixedPool<'_>, config: &PrintConfig, template: &str) -> Result<(), Status> {
    let bytes = template.as_bytes();
    let mut slots = PoolBuffer::<FormatSpecifier, _>::new(
        pool,
        MemoryType::LoaderData,
        required_capacity(bytes),
    )?;
    let mut arena = SpecArena::new(slots.as_mut_slice());
    let count = scan(bytes, &mut arena, config.scan_mode).map_err(|e| {
        eprintln!("scan failed: {}", e);
        e.status()
    })?;

    println!("Counted {} format specifier(s) in provided string.", count);
    println!("Enumerating:");
    for (i, spec) in arena.as_slice().iter().enumerate() {
        println!("    Specifier #{}:", i);
        println!("        Location  = {}", spec.location);
        println!(
            "        Format    = {}",
            spec.conversion.map_or('-', |c| c.as_byte() as char)
        );
        println!(
            "        Modifier  = {}",
            spec.modifier.map_or('-', |m| m.as_byte() as char)
        );
        println!("        Width     = {}", spec.width);
        println!("        Precision = {}", spec.precision);
    }
    println!(
        "These specifiers consume {} bytes of the string.",
        accounted_length(arena.as_slice())
    );
    Ok(())
}

fn run_print(
    pool: &FixedPool<'_>,
    config: PrintConfig,
    template: &str,
    args: &[HostArg],
    stats: bool,
) -> Result<(), Status> {
    let args: Vec<Arg<'_>> = args.iter().map(HostArg::as_arg).collect();
    let mut console = StdoutConsole { out: io::stdout() };

    let result = Printer::with_config(pool, config).print(template.as_bytes(), &args, &mut console);
    if let Ok(written) = result {
        if !template.ends_with('\n') {
            println!();
        }
        if stats {
            eprintln!("{} byte(s) written", written);
        }
    }

    if stats {
        let s = pool.stats();
        eprintln!(
            "pool: {} request(s), {} failure(s), {} outstanding, {}/{} bytes in use",
            s.requests, s.failures, s.outstanding, s.used, s.size
        );
    }

    result.map(|_| ()).map_err(|e| e.status())
}

fn dump_log() {
    logger::drain(|entry| {
        eprintln!("[{}] {}", entry.level.name(), entry.message());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed_args() {
        assert!(matches!(parse_arg("i:-42"), Ok(HostArg::Int(-42))));
        assert!(matches!(parse_arg("u:0xff"), Ok(HostArg::Uint(255))));
        assert!(matches!(parse_arg("f:2.5"), Ok(HostArg::Float(v)) if v == 2.5));
        assert!(matches!(parse_arg("s:a:b"), Ok(HostArg::Str(ref s)) if s == "a:b"));
        assert!(matches!(parse_arg("i:-9223372036854775808"), Ok(HostArg::Int(i64::MIN))));
    }

    #[test]
    fn test_parse_rejects_bad_args() {
        assert!(parse_arg("42").is_err());
        assert!(parse_arg("x:1").is_err());
        assert!(parse_arg("i:9223372036854775808").is_err());
        assert!(parse_arg("u:-1").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_demo_succeeds() {
        let mut region = vec![0u8; POOL_SIZE];
        let pool = FixedPool::new(&mut region);
        assert_eq!(run_scan(&pool, &PrintConfig::default(), DEMO_TEMPLATE), Ok(()));
        assert_eq!(pool.outstanding(), 0);
    }
}
