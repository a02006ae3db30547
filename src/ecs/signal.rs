//! Per-frame signal identifiers
//!
//! Signals are transient flags or counters stored on the [`Scene`](super::Scene).
//! The event layer raises them, exactly one system consumes each of them, and
//! the game loop wipes the whole map at the end of every frame.
//!
//! Named signals hash their name at compile time; keyboard signals use the raw
//! scancode value, which never collides with a 64-bit FNV hash in practice.

/// Signal identifier
pub type SignalId = u64;

/// 64-bit FNV-1a hash of `name`, usable in constant position.
#[must_use]
pub const fn signal_id(name: &str) -> SignalId {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let bytes = name.as_bytes();
    let mut hash = OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }
    hash
}

/// Left mouse button went down this frame; value is the press time in ms
pub const LEFT_CLICK_DOWN: SignalId = signal_id("left_click");
/// Left mouse button has been held past the hold threshold
pub const LEFT_HOLD: SignalId = signal_id("left_hold");
/// Right mouse button went down this frame; value is the press time in ms
pub const RIGHT_CLICK_DOWN: SignalId = signal_id("right_click");
/// Right mouse button has been held past the hold threshold
pub const RIGHT_HOLD: SignalId = signal_id("right_hold");
/// Second left click within the double-click window
pub const DOUBLE_CLICK: SignalId = signal_id("double_click");
/// Block layout changed; physics ground caches must be dropped
pub const PHYSICS_DIRTY: SignalId = signal_id("physics_dirty");

/// Signal raised while a key is down
#[must_use]
pub const fn key(scancode: u32) -> SignalId {
    scancode as SignalId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv_reference_values() {
        assert_eq!(signal_id(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(signal_id("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_named_signals_are_distinct() {
        let ids = [
            LEFT_CLICK_DOWN,
            LEFT_HOLD,
            RIGHT_CLICK_DOWN,
            RIGHT_HOLD,
            DOUBLE_CLICK,
            PHYSICS_DIRTY,
        ];

        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
            // Far outside the scancode range
            assert!(*a > 512);
        }
    }
}
