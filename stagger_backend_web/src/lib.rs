// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for stagger.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`WebHost`]: the [`Host`] implementation over `requestAnimationFrame`,
//!   `setTimeout`/`setInterval`, `IntersectionObserver`, `matchMedia`,
//!   navigator hints and passive touch/wheel listeners
//! - [`apply_item_props`]: writes an [`ItemProps`](stagger_core::animation::ItemProps)
//!   onto a DOM element

#![no_std]

extern crate alloc;

mod bindings;
mod host;
mod presenter;

pub use host::WebHost;
pub use presenter::{apply_item_props, apply_list};
pub use stagger_core::host::Host;

use stagger_core::time::HostTime;

/// Returns the current host time from `performance.now()`, in microsecond
/// ticks.
#[must_use]
pub fn now() -> HostTime {
    millis_to_host_time(bindings::performance_now())
}

/// Converts a `DOMHighResTimeStamp` (milliseconds) to microsecond ticks.
///
/// Negative and NaN inputs map to zero.
#[must_use]
pub fn millis_to_host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance timestamps are small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_become_microseconds() {
        assert_eq!(millis_to_host_time(16.5), HostTime(16_500));
        assert_eq!(millis_to_host_time(0.0), HostTime(0));
    }

    #[test]
    fn invalid_timestamps_saturate_to_zero() {
        assert_eq!(millis_to_host_time(-3.0), HostTime(0));
        assert_eq!(millis_to_host_time(f64::NAN), HostTime(0));
    }
}
