//! Identifiers for registered update callbacks.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallbackId(pub u64);

/// Monotonic allocator for CallbackId.
/// Ids are never reused within one registry, so a stale id can't hit a newer callback.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_callback: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_callback(&mut self) -> CallbackId {
        let id = CallbackId(self.next_callback);
        self.next_callback = self.next_callback.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_callback(), CallbackId(0));
        assert_eq!(alloc.alloc_callback(), CallbackId(1));
        assert_eq!(alloc.alloc_callback(), CallbackId(2));
    }
}
