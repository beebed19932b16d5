//! Capability bitmasks and the pointer-device test.
//!
//! A [`CapabilityMask`] stores bit `n` in word `n / BITS_PER_LONG` of an
//! array of native `unsigned long` words, the same shape `EVIOCGBIT` fills
//! in.  Devices report their capabilities as code lists; the mask turns
//! those into constant-time membership tests.

use std::ffi::c_ulong;
use std::fmt;
use std::mem::size_of;

use super::codes::{EV_KEY, EV_MAX, EV_REL, KEY_MAX, POINTER_BUTTONS, REL_MAX, REL_X, REL_Y};

const WORD_SIZE: usize = size_of::<c_ulong>();
const BITS_PER_WORD: usize = WORD_SIZE * 8;

/// A kernel capability bitmask.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CapabilityMask {
    bytes: Vec<u8>,
}

impl CapabilityMask {
    /// Number of bytes needed to hold bits `0..=max`, rounded up to whole words.
    pub fn buffer_len(max: u16) -> usize {
        (max as usize / BITS_PER_WORD + 1) * WORD_SIZE
    }

    /// Builds a mask with exactly the given bits set, in native word layout.
    pub fn from_bits<I>(max: u16, bits: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        let mut words = vec![0 as c_ulong; Self::buffer_len(max) / WORD_SIZE];
        for bit in bits {
            let bit = bit as usize;
            if let Some(word) = words.get_mut(bit / BITS_PER_WORD) {
                *word |= 1 << (bit % BITS_PER_WORD);
            }
        }
        let bytes = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        Self { bytes }
    }

    /// Returns `true` if bit `bit` is set.  Bits beyond the buffer read as unset.
    pub fn contains(&self, bit: u16) -> bool {
        let bit = bit as usize;
        let start = (bit / BITS_PER_WORD) * WORD_SIZE;
        let Some(chunk) = self.bytes.get(start..start + WORD_SIZE) else {
            return false;
        };
        let mut raw = [0u8; WORD_SIZE];
        raw.copy_from_slice(chunk);
        c_ulong::from_ne_bytes(raw) & (1 << (bit % BITS_PER_WORD)) != 0
    }

    /// Iterates over every set bit in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        let max_bit = (self.bytes.len() / WORD_SIZE) * BITS_PER_WORD;
        (0..max_bit)
            .filter_map(|bit| u16::try_from(bit).ok())
            .filter(move |&bit| self.contains(bit))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for CapabilityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Outcome of the pointer-device test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Advertises relative motion and at least one pointer button.
    Pointer,
    /// `EV_REL` missing: keyboards, touchpads in absolute mode, sensors.
    NoRelativeMotion,
    /// Relative motion without `BTN_LEFT`/`BTN_RIGHT`: wheels, trackball axes.
    NoPointerButtons,
}

/// Everything the locator learns about a candidate from `EVIOCGBIT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Supported event types, indexed by `EV_*`.
    pub event_types: CapabilityMask,
    /// Supported relative axes, indexed by `REL_*`.
    pub relative_axes: CapabilityMask,
    /// Supported keys and buttons, indexed by `KEY_*` / `BTN_*`.
    pub keys: CapabilityMask,
}

impl DeviceCapabilities {
    /// Convenience constructor used by synthetic devices.
    pub fn from_codes(
        event_types: impl IntoIterator<Item = u16>,
        relative_axes: impl IntoIterator<Item = u16>,
        keys: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            event_types: CapabilityMask::from_bits(EV_MAX, event_types),
            relative_axes: CapabilityMask::from_bits(REL_MAX, relative_axes),
            keys: CapabilityMask::from_bits(KEY_MAX, keys),
        }
    }

    /// Capabilities of an ordinary two-button mouse.
    pub fn standard_mouse() -> Self {
        Self::from_codes([EV_KEY, EV_REL], [REL_X, REL_Y], POINTER_BUTTONS)
    }

    pub fn supports_event_type(&self, event_type: u16) -> bool {
        self.event_types.contains(event_type)
    }

    pub fn has_relative_axis(&self, axis: u16) -> bool {
        self.relative_axes.contains(axis)
    }

    pub fn has_key(&self, code: u16) -> bool {
        self.keys.contains(code)
    }

    pub fn classify(&self) -> Classification {
        if !self.supports_event_type(EV_REL) {
            return Classification::NoRelativeMotion;
        }
        if !POINTER_BUTTONS.iter().any(|&b| self.has_key(b)) {
            return Classification::NoPointerButtons;
        }
        Classification::Pointer
    }

    /// The mouse test: relative motion AND a left or right button.
    pub fn is_pointing_device(&self) -> bool {
        self.classify() == Classification::Pointer
    }
}
