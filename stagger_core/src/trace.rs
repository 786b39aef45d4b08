// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumentation hooks for reveal sequences.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`RevealList`](crate::reveal::RevealList) calls as a sequence progresses.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Free-form diagnostics go through `tracing` instead; these events exist so
//! tools can record and replay a sequence's timeline.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::host::ContainerRef;
use crate::time::{Duration, HostTime};
use crate::zoom::ZoomPhase;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a running sequence was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetReason {
    /// The item count changed.
    ItemCountChanged,
    /// The animation kind changed.
    AnimationKindChanged,
    /// The list was torn down.
    Teardown,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the visibility trigger commits a new state.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityEvent {
    /// The observed container.
    pub container: ContainerRef,
    /// Host time of the commit.
    pub time: HostTime,
    /// Live visibility.
    pub is_intersecting: bool,
    /// Sticky visibility.
    pub has_intersected: bool,
}

/// Emitted when a staggered sequence begins.
#[derive(Clone, Copy, Debug)]
pub struct SequenceStartEvent {
    /// The list's container.
    pub container: ContainerRef,
    /// Host time at which the sequence started.
    pub time: HostTime,
    /// Total items in the list.
    pub item_count: u32,
    /// Items that will be staggered (after the concurrency cap).
    pub animated_count: u32,
    /// Indices released per batch and committed per frame.
    pub batch_size: u32,
    /// Delay between batch releases and per-index delay step.
    pub stagger: Duration,
}

/// Emitted when a batch of indices is pushed onto the pending queue.
#[derive(Clone, Copy, Debug)]
pub struct BatchReleasedEvent {
    /// The list's container.
    pub container: ContainerRef,
    /// Host time of the release.
    pub time: HostTime,
    /// First index in the batch.
    pub first_index: u32,
    /// Number of indices in the batch.
    pub count: u32,
}

/// Emitted when a frame commits pending indices as visible.
#[derive(Clone, Copy, Debug)]
pub struct ItemsCommittedEvent {
    /// The list's container.
    pub container: ContainerRef,
    /// Host time of the frame.
    pub time: HostTime,
    /// First committed index.
    pub first_index: u32,
    /// Number of committed indices.
    pub count: u32,
}

/// Emitted when every item is shown at once because animation is off.
#[derive(Clone, Copy, Debug)]
pub struct ShownImmediatelyEvent {
    /// The list's container.
    pub container: ContainerRef,
    /// Host time of the switch.
    pub time: HostTime,
    /// Number of items shown.
    pub item_count: u32,
}

/// Emitted when a sequence is discarded.
#[derive(Clone, Copy, Debug)]
pub struct SequenceResetEvent {
    /// The list's container.
    pub container: ContainerRef,
    /// Host time of the reset.
    pub time: HostTime,
    /// What triggered it.
    pub reason: ResetReason,
}

/// Emitted when the frame monitor records a sample.
#[derive(Clone, Copy, Debug)]
pub struct FrameSampleEvent {
    /// Host time of the measured frame.
    pub time: HostTime,
    /// Measured frame time in milliseconds.
    pub frame_time_ms: f64,
    /// Rolling average after this sample, in milliseconds.
    pub average_ms: f64,
    /// Drop counter after this sample.
    pub frame_drop_count: u32,
    /// The monitor's verdict after this sample.
    pub should_animate: bool,
}

/// Emitted when the zoom guard changes phase.
#[derive(Clone, Copy, Debug)]
pub struct ZoomTransitionEvent {
    /// Host time of the transition.
    pub time: HostTime,
    /// Phase before.
    pub from: ZoomPhase,
    /// Phase after.
    pub to: ZoomPhase,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives reveal-sequence events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when visibility changes are committed.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called when a staggered sequence begins.
    fn on_sequence_start(&mut self, e: &SequenceStartEvent) {
        _ = e;
    }

    /// Called when a batch is released.
    fn on_batch_released(&mut self, e: &BatchReleasedEvent) {
        _ = e;
    }

    /// Called when a frame commits items.
    fn on_items_committed(&mut self, e: &ItemsCommittedEvent) {
        _ = e;
    }

    /// Called when all items are shown without animation.
    fn on_shown_immediately(&mut self, e: &ShownImmediatelyEvent) {
        _ = e;
    }

    /// Called when a sequence is discarded.
    fn on_sequence_reset(&mut self, e: &SequenceResetEvent) {
        _ = e;
    }

    /// Called when the frame monitor records a sample.
    fn on_frame_sample(&mut self, e: &FrameSampleEvent) {
        _ = e;
    }

    /// Called when the zoom guard changes phase.
    fn on_zoom_transition(&mut self, e: &ZoomTransitionEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! tracer_method {
    ($(#[$meta:meta])* $name:ident, $sink_method:ident, $event:ty) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    tracer_method!(
        /// Emits a [`VisibilityEvent`].
        visibility, on_visibility, VisibilityEvent
    );
    tracer_method!(
        /// Emits a [`SequenceStartEvent`].
        sequence_start, on_sequence_start, SequenceStartEvent
    );
    tracer_method!(
        /// Emits a [`BatchReleasedEvent`].
        batch_released, on_batch_released, BatchReleasedEvent
    );
    tracer_method!(
        /// Emits an [`ItemsCommittedEvent`].
        items_committed, on_items_committed, ItemsCommittedEvent
    );
    tracer_method!(
        /// Emits a [`ShownImmediatelyEvent`].
        shown_immediately, on_shown_immediately, ShownImmediatelyEvent
    );
    tracer_method!(
        /// Emits a [`SequenceResetEvent`].
        sequence_reset, on_sequence_reset, SequenceResetEvent
    );
    tracer_method!(
        /// Emits a [`FrameSampleEvent`].
        frame_sample, on_frame_sample, FrameSampleEvent
    );
    tracer_method!(
        /// Emits a [`ZoomTransitionEvent`].
        zoom_transition, on_zoom_transition, ZoomTransitionEvent
    );
}
