//! Firmware-backed collaborators for the formatting core.
//!
//! `FirmwareContext` is built once in `efi_main` and passed down by
//! reference; nothing here lives in a global.

use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use shasta_core::{Console, InputKey, KeyInput, MemoryType, PoolAllocator, Status};

use crate::efi::{
    BootServices, Handle, SimpleTextInputProtocol, SimpleTextOutputProtocol, SystemTable,
};

/// UCS-2 code units sent per `OutputString` call (NUL excluded)
pub const CHUNK_UNITS: usize = 128;

/// Image handle and system table captured at entry.
pub struct FirmwareContext<'st> {
    image: Handle,
    system_table: &'st SystemTable,
}

impl<'st> FirmwareContext<'st> {
    /// # Safety
    /// `system_table` must be the table handed to `efi_main` and stay valid
    /// while boot services are active.
    pub unsafe fn new(image: Handle, system_table: *const SystemTable) -> Option<Self> {
        let system_table = system_table.as_ref()?;
        if system_table.boot_services.is_null()
            || system_table.con_out.is_null()
            || system_table.con_in.is_null()
        {
            return None;
        }
        Some(Self {
            image,
            system_table,
        })
    }

    pub fn image(&self) -> Handle {
        self.image
    }

    pub fn firmware_revision(&self) -> u32 {
        self.system_table.firmware_revision
    }

    pub fn pool(&self) -> BootPool<'st> {
        // Checked non-null in `new`
        BootPool {
            bs: unsafe { &*self.system_table.boot_services },
        }
    }

    pub fn con_out(&self) -> ConOut<'st> {
        ConOut {
            proto: self.system_table.con_out,
            _table: PhantomData,
        }
    }

    pub fn con_in(&self) -> ConIn<'st> {
        ConIn {
            proto: self.system_table.con_in,
            _table: PhantomData,
        }
    }
}

// ============================================================================
// Pool
// ============================================================================

/// `AllocatePool` / `FreePool`
pub struct BootPool<'st> {
    bs: &'st BootServices,
}

impl PoolAllocator for BootPool<'_> {
    fn allocate(&self, kind: MemoryType, size: usize) -> Result<NonNull<u8>, Status> {
        let mut buffer: *mut u8 = ptr::null_mut();
        Status((self.bs.allocate_pool)(kind.as_raw(), size, &mut buffer)).to_result()?;
        NonNull::new(buffer).ok_or(Status::OUT_OF_RESOURCES)
    }

    unsafe fn release(&self, ptr: NonNull<u8>) -> Result<(), Status> {
        Status((self.bs.free_pool)(ptr.as_ptr())).to_result()
    }
}

// ============================================================================
// Console
// ============================================================================

/// Feed `bytes` to `emit` as NUL-terminated UCS-2 chunks of at most
/// `CHUNK_UNITS` units, expanding `\n` to `\r\n`.
pub fn for_each_ucs2_chunk<F>(bytes: &[u8], mut emit: F) -> Result<(), Status>
where
    F: FnMut(&[u16]) -> Result<(), Status>,
{
    let mut chunk = [0u16; CHUNK_UNITS + 1];
    let mut len = 0;

    for &byte in bytes {
        // Room for a CR/LF pair
        if len + 2 > CHUNK_UNITS {
            chunk[len] = 0;
            emit(&chunk[..=len])?;
            len = 0;
        }
        if byte == b'\n' {
            chunk[len] = u16::from(b'\r');
            len += 1;
        }
        // Single-byte code points map straight onto Latin-1
        chunk[len] = u16::from(byte);
        len += 1;
    }

    if len > 0 {
        chunk[len] = 0;
        emit(&chunk[..=len])?;
    }
    Ok(())
}

/// Simple text output on the system console
pub struct ConOut<'st> {
    proto: *mut SimpleTextOutputProtocol,
    _table: PhantomData<&'st SystemTable>,
}

impl Console for ConOut<'_> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Status> {
        let proto = self.proto;
        for_each_ucs2_chunk(bytes, |units| unsafe {
            Status(((*proto).output_string)(proto, units.as_ptr())).to_result()
        })
    }
}

/// Simple text input on the system console
pub struct ConIn<'st> {
    proto: *mut SimpleTextInputProtocol,
    _table: PhantomData<&'st SystemTable>,
}

impl KeyInput for ConIn<'_> {
    fn reset(&mut self) -> Result<(), Status> {
        unsafe { Status(((*self.proto).reset)(self.proto, false)).to_result() }
    }

    fn read_key(&mut self) -> Result<InputKey, Status> {
        let mut key = InputKey::default();
        unsafe { Status(((*self.proto).read_key_stroke)(self.proto, &mut key)).to_result()? };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(bytes: &[u8]) -> Vec<Vec<u16>> {
        let mut chunks = Vec::new();
        for_each_ucs2_chunk(bytes, |units| {
            chunks.push(units.to_vec());
            Ok(())
        })
        .unwrap();
        chunks
    }

    #[test]
    fn test_newline_expansion() {
        let chunks = collect(b"a\nb");
        assert_eq!(chunks, vec![vec![0x61, 0x0D, 0x0A, 0x62, 0]]);
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn test_chunking_bound() {
        let text = [b'x'; 300];
        let chunks = collect(&text);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.len() <= CHUNK_UNITS + 1);
            assert_eq!(chunk.last(), Some(&0));
        }
        let total: usize = chunks.iter().map(|c| c.len() - 1).sum();
        assert_eq!(total, 300);
    }

    #[test]
    fn test_crlf_never_split() {
        let mut text = [b'y'; 128];
        text[127] = b'\n';
        let chunks = collect(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(&chunks[1][..3], &[0x0D, 0x0A, 0]);
    }

    #[test]
    fn test_emit_error_stops() {
        let mut calls = 0;
        let result = for_each_ucs2_chunk(&[b'z'; 400], |_| {
            calls += 1;
            Err(Status::DEVICE_ERROR)
        });
        assert_eq!(result, Err(Status::DEVICE_ERROR));
        assert_eq!(calls, 1);
    }
}
