//! Console output and key input collaborators.
//!
//! The firmware implementations live in the bootloader; the host harness
//! and tests provide their own.

use crate::status::Status;

/// Key event as delivered by `ReadKeyStroke`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputKey {
    pub scan_code: u16,
    pub unicode_char: u16,
}

/// Sink for composed text.
pub trait Console {
    /// Write `bytes` to the display device.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Status>;
}

/// Key source. `read_key` returns `Err(Status::NOT_READY)` when no key is
/// pending.
pub trait KeyInput {
    fn reset(&mut self) -> Result<(), Status>;
    fn read_key(&mut self) -> Result<InputKey, Status>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Status> {
        (**self).write_bytes(bytes)
    }
}

/// Busy-wait for a key.
///
/// Polls while the source reports `NOT_READY`; any other failure is
/// returned unchanged.
pub fn wait_for_key<K: KeyInput + ?Sized>(input: &mut K) -> Result<InputKey, Status> {
    loop {
        match input.read_key() {
            Err(Status::NOT_READY) => core::hint::spin_loop(),
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedKeys {
        not_ready: usize,
        result: Result<InputKey, Status>,
        polls: usize,
    }

    impl KeyInput for ScriptedKeys {
        fn reset(&mut self) -> Result<(), Status> {
            Ok(())
        }

        fn read_key(&mut self) -> Result<InputKey, Status> {
            self.polls += 1;
            if self.not_ready > 0 {
                self.not_ready -= 1;
                return Err(Status::NOT_READY);
            }
            self.result
        }
    }

    #[test]
    fn test_wait_polls_until_ready() {
        let key = InputKey {
            scan_code: 0,
            unicode_char: u16::from(b'\r'),
        };
        let mut keys = ScriptedKeys {
            not_ready: 3,
            result: Ok(key),
            polls: 0,
        };
        assert_eq!(wait_for_key(&mut keys), Ok(key));
        assert_eq!(keys.polls, 4);
    }

    #[test]
    fn test_wait_returns_device_error() {
        let mut keys = ScriptedKeys {
            not_ready: 1,
            result: Err(Status::DEVICE_ERROR),
            polls: 0,
        };
        assert_eq!(wait_for_key(&mut keys), Err(Status::DEVICE_ERROR));
        assert_eq!(keys.polls, 2);
    }
}
