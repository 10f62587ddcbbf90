//! Safe numeric conversions for submission payloads.
//!
//! Platform counter APIs report signed values where the wire format wants
//! unsigned ones (and vice versa). These helpers make the conversion
//! explicit: each strict variant fails with [`Error::Range`] outside the
//! target range, and each clamping variant substitutes the nearest
//! representable value instead. All of them are pure, order-preserving, and
//! idempotent on already-valid inputs.

use std::time::Duration;

use crate::error::{Error, Result};

/// Largest nanosecond count the API accepts for durations, matching a
/// signed 64-bit nanosecond representation (~292 years).
pub const MAX_DURATION_NANOS: u64 = i64::MAX as u64;

/// Convert a signed counter to unsigned, failing on negative input.
pub fn unsigned_from_signed(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::Range {
        value: value as i128,
        target: "u64",
        bound: 0,
    })
}

/// Convert a signed counter to unsigned, clamping negative input to zero.
pub fn unsigned_from_signed_clamped(value: i64) -> u64 {
    value.max(0) as u64
}

/// Convert an unsigned counter to signed, failing above `i64::MAX`.
pub fn signed_from_unsigned(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::Range {
        value: value as i128,
        target: "i64",
        bound: i64::MAX as i128,
    })
}

/// Convert unsigned nanoseconds to a [`Duration`], failing when the value
/// exceeds the signed 64-bit nanosecond range.
pub fn duration_from_nanos(nanos: u64) -> Result<Duration> {
    if nanos > MAX_DURATION_NANOS {
        return Err(Error::Range {
            value: nanos as i128,
            target: "duration",
            bound: MAX_DURATION_NANOS as i128,
        });
    }
    Ok(Duration::from_nanos(nanos))
}

/// Convert unsigned nanoseconds to a [`Duration`], capping overflow at the
/// maximum representable duration instead of failing.
pub fn duration_from_nanos_capped(nanos: u64) -> Duration {
    Duration::from_nanos(nanos.min(MAX_DURATION_NANOS))
}
