//! Sparse echo memory
//!
//! Byte-addressed storage over the full 32-bit address range. Unwritten
//! bytes read as 0xFF, like erased flash.

use std::collections::BTreeMap;

/// Value returned for bytes that were never written
pub const ERASED: u8 = 0xFF;

/// Sparse byte memory
#[derive(Debug, Clone, Default)]
pub struct EchoMemory {
    bytes: BTreeMap<u32, u8>,
}

impl EchoMemory {
    /// Create an empty (fully erased) memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` starting at `address`, wrapping at the top of the range
    pub fn write(&mut self, address: u32, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.bytes.insert(address.wrapping_add(i as u32), byte);
        }
    }

    /// Fill `buf` with the bytes starting at `address`
    pub fn read(&self, address: u32, buf: &mut [u8]) {
        for (i, byte) in buf.iter_mut().enumerate() {
            let at = address.wrapping_add(i as u32);
            *byte = self.bytes.get(&at).copied().unwrap_or(ERASED);
        }
    }

    /// Number of bytes that have been written at least once
    pub fn written_len(&self) -> usize {
        self.bytes.len()
    }

    /// Forget all writes
    pub fn erase(&mut self) {
        self.bytes.clear();
    }
}
