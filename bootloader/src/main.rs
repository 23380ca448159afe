//! Shasta UEFI Bootloader - Console Entry
//!
//! Minimal UEFI application around the formatting core:
//! 1. Capture the image handle and system table in a `FirmwareContext`
//! 2. Print the banner through `Print`
//! 3. Wait for a key and hand its status back to the firmware
//!
//! Built for `x86_64-unknown-uefi`; a host build only says so.

#![cfg_attr(target_os = "uefi", no_std)]
#![cfg_attr(target_os = "uefi", no_main)]

mod efi;
mod firmware;

use shasta_core::logger::{self, LogLevel};
use shasta_core::{args, log_info, wait_for_key, Console, KeyInput, Printer, Status};

use efi::{Handle, SystemTable};
use firmware::{ConOut, FirmwareContext};

const BANNER: &[u8] = b"Shasta boot console (firmware rev %u.%02u)\n";
const DEMO: &[u8] = b"Some basic format specifiers: %u, %3d, %.2f, %lu, %10.3lf\n";

#[no_mangle]
pub extern "efiapi" fn efi_main(image_handle: Handle, system_table: *const SystemTable) -> usize {
    let ctx = match unsafe { FirmwareContext::new(image_handle, system_table) } {
        Some(ctx) => ctx,
        None => return Status::INVALID_PARAMETER.0,
    };

    match run(&ctx) {
        Ok(()) => Status::SUCCESS.0,
        Err(status) => status.0,
    }
}

fn run(ctx: &FirmwareContext<'_>) -> Result<(), Status> {
    let pool = ctx.pool();
    let mut con_out = ctx.con_out();
    let mut con_in = ctx.con_in();
    let printer = Printer::new(&pool);
    log_info!("image {:p}", ctx.image());

    let revision = ctx.firmware_revision();
    let printed = printer
        .print(BANNER, &args![revision >> 16, revision & 0xFFFF], &mut con_out)
        .and_then(|_| {
            printer.print(
                DEMO,
                &args![7u32, 42, 3.14159, 1_234_567_890u64, 2.5],
                &mut con_out,
            )
        });
    if let Err(err) = printed {
        dump_log(&mut con_out);
        return Err(err.status());
    }

    con_in.reset()?;
    con_out.write_bytes(b"Press any key to continue...\n")?;
    let key = wait_for_key(&mut con_in)?;
    log_info!("key scan={:#x} char={:#x}", key.scan_code, key.unicode_char);
    Ok(())
}

/// Write the log ring to the console, oldest first.
fn dump_log(con_out: &mut ConOut<'_>) {
    logger::drain(|entry| {
        if entry.level < LogLevel::Debug {
            return;
        }
        let mut line = [0u8; logger::LOG_MSG_LEN + 12];
        let len = entry.format(&mut line);
        let _ = con_out.write_bytes(&line[..len]);
        let _ = con_out.write_bytes(b"\n");
    });
}

#[cfg(target_os = "uefi")]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(not(target_os = "uefi"))]
fn main() {
    eprintln!("shasta-bootloader is a UEFI application; build it with --target x86_64-unknown-uefi");
    std::process::exit(1);
}
