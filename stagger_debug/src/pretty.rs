// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable event output.
//!
//! [`PrettyPrintSink`] writes one line per event, prefixed with the host time
//! in milliseconds:
//!
//! ```text
//! [    16.667ms] visibility  container=1 intersecting=true
//! [    16.667ms] start       container=1 items=6 animated=6 batch=6 stagger=150ms
//! ```

use std::fmt;
use std::io::Write;

use stagger_core::time::HostTime;
use stagger_core::trace::{
    BatchReleasedEvent, FrameSampleEvent, ItemsCommittedEvent, SequenceResetEvent,
    SequenceStartEvent, ShownImmediatelyEvent, TraceSink, VisibilityEvent, ZoomTransitionEvent,
};

/// Formats a [`HostTime`] as fractional milliseconds.
struct Millis(HostTime);

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let us = self.0.ticks();
        let text = format!("{}.{:03}ms", us / 1000, us % 1000);
        f.pad(&text)
    }
}

/// Writes one human-readable line per event to a [`Write`] destination.
///
/// Write errors are ignored; output is best-effort diagnostics.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    frame_samples: bool,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("frame_samples", &self.frame_samples)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Frame-monitor samples are skipped; see
    /// [`with_frame_samples`](Self::with_frame_samples).
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            frame_samples: false,
        }
    }

    /// Also prints one line per frame-monitor sample.
    #[must_use]
    pub fn with_frame_samples(mut self, enabled: bool) -> Self {
        self.frame_samples = enabled;
        self
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, time: HostTime, kind: &str, body: fmt::Arguments<'_>) {
        let _ = writeln!(self.writer, "[{:>13}] {kind:<11} {body}", Millis(time));
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.line(
            e.time,
            "visibility",
            format_args!(
                "container={} intersecting={} sticky={}",
                e.container.0, e.is_intersecting, e.has_intersected
            ),
        );
    }

    fn on_sequence_start(&mut self, e: &SequenceStartEvent) {
        self.line(
            e.time,
            "start",
            format_args!(
                "container={} items={} animated={} batch={} stagger={}ms",
                e.container.0,
                e.item_count,
                e.animated_count,
                e.batch_size,
                e.stagger.as_millis()
            ),
        );
    }

    fn on_batch_released(&mut self, e: &BatchReleasedEvent) {
        self.line(
            e.time,
            "release",
            format_args!(
                "container={} indices={}..{}",
                e.container.0,
                e.first_index,
                e.first_index + e.count
            ),
        );
    }

    fn on_items_committed(&mut self, e: &ItemsCommittedEvent) {
        self.line(
            e.time,
            "commit",
            format_args!(
                "container={} indices={}..{}",
                e.container.0,
                e.first_index,
                e.first_index + e.count
            ),
        );
    }

    fn on_shown_immediately(&mut self, e: &ShownImmediatelyEvent) {
        self.line(
            e.time,
            "immediate",
            format_args!("container={} items={}", e.container.0, e.item_count),
        );
    }

    fn on_sequence_reset(&mut self, e: &SequenceResetEvent) {
        self.line(
            e.time,
            "reset",
            format_args!("container={} reason={:?}", e.container.0, e.reason),
        );
    }

    fn on_frame_sample(&mut self, e: &FrameSampleEvent) {
        if !self.frame_samples {
            return;
        }
        self.line(
            e.time,
            "frame",
            format_args!(
                "{:.2}ms avg={:.2}ms drops={} animate={}",
                e.frame_time_ms, e.average_ms, e.frame_drop_count, e.should_animate
            ),
        );
    }

    fn on_zoom_transition(&mut self, e: &ZoomTransitionEvent) {
        self.line(e.time, "zoom", format_args!("{} -> {}", e.from, e.to));
    }
}
