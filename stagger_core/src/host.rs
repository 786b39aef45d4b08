// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! Everything the core needs from its environment sits behind [`Host`]:
//! frame callbacks, timers, a viewport-intersection primitive, the
//! reduced-motion media query, gesture listeners and hardware hints.
//!
//! # Handles and events
//!
//! Every registration returns a typed handle. The component that asked for it
//! stores the handle and is solely responsible for cancelling it. When a
//! registration fires, the host turns it into a [`HostEvent`] carrying the
//! same handle and hands it back to the application, which routes it into the
//! owning component. Components ignore events whose handle they no longer
//! hold, so a callback that raced a cancellation can never mutate state that
//! has moved on to new inputs.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_host_event(event: HostEvent, host: &mut impl Host) {
//!     list.dispatch(&event, host, &mut Tracer::none());
//!     for index in 0..item_count {
//!         apply(element(index), &list.item_props(index));
//!     }
//! }
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::device::DeviceHints;
use crate::time::{Duration, HostTime};

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

handle_type!(
    /// A pending frame callback (`requestAnimationFrame`).
    FrameHandle
);
handle_type!(
    /// A pending one-shot timer or a repeating interval.
    TimerHandle
);
handle_type!(
    /// A live viewport-intersection observation.
    ObserverHandle
);
handle_type!(
    /// A live subscription to the reduced-motion media query.
    WatchHandle
);
handle_type!(
    /// A live set of passive touch and wheel listeners.
    ListenerHandle
);
handle_type!(
    /// An opaque handle the caller attaches to exactly one container element.
    ///
    /// The host maps it to a real element; core never interprets the value.
    ContainerRef
);

/// Options passed to [`Host::observe_intersection`].
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Sorted, deduplicated intersection ratios that trigger callbacks.
    pub thresholds: Vec<f64>,
    /// CSS-style margin grown around the root before computing intersection.
    pub root_margin: String,
}

/// A raw intersection record as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Whether the target currently intersects the root.
    pub is_intersecting: bool,
    /// Fraction of the target that is visible, `0.0..=1.0`.
    pub intersection_ratio: f64,
    /// Host time at which the intersection change was observed.
    pub time: HostTime,
}

/// JavaScript-heap style memory introspection, when the platform exposes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemoryInfo {
    /// Bytes currently in use.
    pub used_bytes: f64,
    /// Upper bound on usable bytes.
    pub limit_bytes: f64,
}

impl MemoryInfo {
    /// Returns `used / limit` clamped to `0..=1`, or 0 if the limit is unusable.
    #[must_use]
    pub fn usage_ratio(&self) -> f64 {
        if self.limit_bytes.is_finite() && self.limit_bytes > 0.0 {
            (self.used_bytes / self.limit_bytes).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Gesture input delivered by the listeners registered with
/// [`Host::listen_gestures`].
///
/// Touch points are client coordinates in CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureInput {
    /// `touchstart`, with all current touches.
    TouchStart(Vec<Point>),
    /// `touchmove`, with all current touches.
    TouchMove(Vec<Point>),
    /// `touchend`, with the touches still down.
    TouchEnd(Vec<Point>),
    /// `wheel`; `ctrl_key` is set for trackpad pinch and ctrl+scroll zoom.
    Wheel {
        /// Whether the control key was held.
        ctrl_key: bool,
    },
}

/// A registration that fired, routed back into the core by the application.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// A frame callback ran at `now`.
    Frame {
        /// The handle returned by [`Host::request_frame`].
        handle: FrameHandle,
        /// Host time of the frame.
        now: HostTime,
    },
    /// A timeout expired or an interval ticked.
    Timer {
        /// The handle returned by [`Host::set_timeout`] or [`Host::set_interval`].
        handle: TimerHandle,
    },
    /// The observed container's intersection changed.
    Intersection {
        /// The handle returned by [`Host::observe_intersection`].
        observer: ObserverHandle,
        /// The raw record.
        entry: IntersectionEntry,
    },
    /// The reduced-motion preference changed.
    ReducedMotion {
        /// The handle returned by [`Host::watch_reduced_motion`].
        watch: WatchHandle,
        /// Whether reduced motion is now requested.
        reduce: bool,
    },
    /// A touch or wheel event arrived.
    Gesture {
        /// The handle returned by [`Host::listen_gestures`].
        listener: ListenerHandle,
        /// The input.
        input: GestureInput,
    },
}

/// Platform primitives consumed by the core.
///
/// Both the browser backend and the deterministic
/// [`ManualHost`](crate::manual::ManualHost) implement this trait.
pub trait Host {
    /// Current monotonic host time.
    fn now(&self) -> HostTime;

    /// Schedules a callback for the next repaint.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a pending frame callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Schedules a one-shot timer.
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Cancels a one-shot timer. Unknown handles are ignored.
    fn clear_timeout(&mut self, handle: TimerHandle);

    /// Schedules a repeating timer.
    fn set_interval(&mut self, period: Duration) -> TimerHandle;

    /// Cancels a repeating timer. Unknown handles are ignored.
    fn clear_interval(&mut self, handle: TimerHandle);

    /// Starts observing `container`.
    ///
    /// Returns `None` when the platform has no intersection primitive; the
    /// caller must treat that as "never visible".
    fn observe_intersection(
        &mut self,
        container: ContainerRef,
        options: &ObserverOptions,
    ) -> Option<ObserverHandle>;

    /// Stops an observation. Unknown handles are ignored.
    fn disconnect_observer(&mut self, handle: ObserverHandle);

    /// Subscribes to the reduced-motion media query.
    ///
    /// Returns the subscription and the preference's current value.
    fn watch_reduced_motion(&mut self) -> (WatchHandle, bool);

    /// Drops a reduced-motion subscription.
    fn unwatch_reduced_motion(&mut self, handle: WatchHandle);

    /// Registers passive touch and wheel listeners.
    fn listen_gestures(&mut self) -> ListenerHandle;

    /// Removes listeners registered by [`listen_gestures`](Self::listen_gestures).
    fn unlisten_gestures(&mut self, handle: ListenerHandle);

    /// Allocates a fresh container reference.
    fn create_container_ref(&mut self) -> ContainerRef;

    /// Hardware and network hints; may change between calls.
    fn device_hints(&self) -> DeviceHints {
        DeviceHints::default()
    }

    /// Memory introspection, if available.
    fn memory_info(&self) -> Option<MemoryInfo> {
        None
    }
}
