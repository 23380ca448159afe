//! Raw UEFI table bindings
//!
//! Only the parts the loader touches are typed; unused service slots are
//! kept as `usize` placeholders so the offsets stay correct.

use shasta_core::InputKey;

/// Opaque firmware handle
pub type Handle = *mut ();

/// Raw `EFI_STATUS`
pub type RawStatus = usize;

#[repr(C)]
pub struct TableHeader {
    pub signature: u64,
    pub revision: u32,
    pub header_size: u32,
    pub crc32: u32,
    _reserved: u32,
}

#[repr(C)]
pub struct SimpleTextInputProtocol {
    pub reset: extern "efiapi" fn(*mut SimpleTextInputProtocol, bool) -> RawStatus,
    pub read_key_stroke:
        extern "efiapi" fn(*mut SimpleTextInputProtocol, *mut InputKey) -> RawStatus,
    pub wait_for_key: *mut (),
}

#[repr(C)]
pub struct SimpleTextOutputMode {
    pub max_mode: i32,
    pub mode: i32,
    pub attribute: i32,
    pub cursor_column: i32,
    pub cursor_row: i32,
    pub cursor_visible: bool,
}

#[repr(C)]
pub struct SimpleTextOutputProtocol {
    pub reset: extern "efiapi" fn(*mut SimpleTextOutputProtocol, bool) -> RawStatus,
    pub output_string: extern "efiapi" fn(*mut SimpleTextOutputProtocol, *const u16) -> RawStatus,
    _test_string: usize,
    _query_mode: usize,
    _set_mode: usize,
    _set_attribute: usize,
    _clear_screen: usize,
    _set_cursor_position: usize,
    _enable_cursor: usize,
    pub mode: *const SimpleTextOutputMode,
}

#[repr(C)]
pub struct SystemTable {
    pub header: TableHeader,
    pub firmware_vendor: *const u16,
    pub firmware_revision: u32,
    _console_in_handle: Handle,
    pub con_in: *mut SimpleTextInputProtocol,
    _console_out_handle: Handle,
    pub con_out: *mut SimpleTextOutputProtocol,
    _stderr_handle: Handle,
    _stderr: *mut SimpleTextOutputProtocol,
    _runtime_services: *const (),
    pub boot_services: *const BootServices,
    _number_of_table_entries: usize,
    _configuration_table: *const (),
}

/// Boot services through the memory services; nothing past `free_pool` is
/// ever read.
#[repr(C)]
pub struct BootServices {
    pub header: TableHeader,
    // Task Priority Services
    _raise_tpl: usize,
    _restore_tpl: usize,
    // Memory Services
    _allocate_pages: usize,
    _free_pages: usize,
    _get_memory_map: usize,
    pub allocate_pool:
        extern "efiapi" fn(pool_type: usize, size: usize, buffer: *mut *mut u8) -> RawStatus,
    pub free_pool: extern "efiapi" fn(buffer: *mut u8) -> RawStatus,
}
