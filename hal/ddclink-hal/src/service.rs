//! Service handle
//!
//! A service handle is the borrowed capability discovery hands out for one
//! display. The core never stores or releases it: every operation borrows
//! the handle for the duration of a single transfer.

use crate::i2c::I2cChannel;

/// Borrowed, possibly absent, channel to one display
///
/// Holding `&mut` to the channel serialises use of the handle: only one
/// operation can be in flight per channel.
pub struct ServiceHandle<'a, C: ?Sized> {
    channel: Option<&'a mut C>,
}

impl<'a, C: I2cChannel + ?Sized> ServiceHandle<'a, C> {
    /// Wrap an opened channel
    pub fn new(channel: &'a mut C) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// A handle with no channel behind it
    pub fn absent() -> Self {
        Self { channel: None }
    }

    /// Build from an optional channel
    pub fn from_option(channel: Option<&'a mut C>) -> Self {
        Self { channel }
    }

    /// Whether a channel is available
    pub fn is_present(&self) -> bool {
        self.channel.is_some()
    }

    /// Access the channel for one transfer
    pub fn channel(&mut self) -> Option<&mut C> {
        self.channel.as_deref_mut()
    }
}

impl<'a, C: I2cChannel + ?Sized> From<&'a mut C> for ServiceHandle<'a, C> {
    fn from(channel: &'a mut C) -> Self {
        Self::new(channel)
    }
}

impl<C: ?Sized> core::fmt::Debug for ServiceHandle<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("present", &self.channel.is_some())
            .finish()
    }
}
