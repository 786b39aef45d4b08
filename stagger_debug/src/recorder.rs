// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use stagger_core::host::ContainerRef;
use stagger_core::time::{Duration, HostTime};
use stagger_core::trace::{
    BatchReleasedEvent, FrameSampleEvent, ItemsCommittedEvent, ResetReason, SequenceResetEvent,
    SequenceStartEvent, ShownImmediatelyEvent, TraceSink, VisibilityEvent, ZoomTransitionEvent,
};
use stagger_core::zoom::ZoomPhase;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_VISIBILITY: u8 = 1;
const TAG_SEQUENCE_START: u8 = 2;
const TAG_BATCH_RELEASED: u8 = 3;
const TAG_ITEMS_COMMITTED: u8 = 4;
const TAG_SHOWN_IMMEDIATELY: u8 = 5;
const TAG_SEQUENCE_RESET: u8 = 6;
const TAG_FRAME_SAMPLE: u8 = 7;
const TAG_ZOOM_TRANSITION: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_header(&mut self, tag: u8, time: HostTime) {
        self.write_u8(tag);
        self.write_u64(time.ticks());
    }

    fn write_phase(&mut self, p: ZoomPhase) {
        self.write_u8(match p {
            ZoomPhase::Idle => 0,
            ZoomPhase::Zooming => 1,
            ZoomPhase::Settling => 2,
        });
    }

    fn write_reason(&mut self, r: ResetReason) {
        self.write_u8(match r {
            ResetReason::ItemCountChanged => 0,
            ResetReason::AnimationKindChanged => 1,
            ResetReason::Teardown => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.write_header(TAG_VISIBILITY, e.time);
        self.write_u64(e.container.0);
        self.write_bool(e.is_intersecting);
        self.write_bool(e.has_intersected);
    }

    fn on_sequence_start(&mut self, e: &SequenceStartEvent) {
        self.write_header(TAG_SEQUENCE_START, e.time);
        self.write_u64(e.container.0);
        self.write_u32(e.item_count);
        self.write_u32(e.animated_count);
        self.write_u32(e.batch_size);
        self.write_u64(e.stagger.ticks());
    }

    fn on_batch_released(&mut self, e: &BatchReleasedEvent) {
        self.write_header(TAG_BATCH_RELEASED, e.time);
        self.write_u64(e.container.0);
        self.write_u32(e.first_index);
        self.write_u32(e.count);
    }

    fn on_items_committed(&mut self, e: &ItemsCommittedEvent) {
        self.write_header(TAG_ITEMS_COMMITTED, e.time);
        self.write_u64(e.container.0);
        self.write_u32(e.first_index);
        self.write_u32(e.count);
    }

    fn on_shown_immediately(&mut self, e: &ShownImmediatelyEvent) {
        self.write_header(TAG_SHOWN_IMMEDIATELY, e.time);
        self.write_u64(e.container.0);
        self.write_u32(e.item_count);
    }

    fn on_sequence_reset(&mut self, e: &SequenceResetEvent) {
        self.write_header(TAG_SEQUENCE_RESET, e.time);
        self.write_u64(e.container.0);
        self.write_reason(e.reason);
    }

    fn on_frame_sample(&mut self, e: &FrameSampleEvent) {
        self.write_header(TAG_FRAME_SAMPLE, e.time);
        self.write_f64(e.frame_time_ms);
        self.write_f64(e.average_ms);
        self.write_u32(e.frame_drop_count);
        self.write_bool(e.should_animate);
    }

    fn on_zoom_transition(&mut self, e: &ZoomTransitionEvent) {
        self.write_header(TAG_ZOOM_TRANSITION, e.time);
        self.write_phase(e.from);
        self.write_phase(e.to);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A [`VisibilityEvent`].
    Visibility(VisibilityEvent),
    /// A [`SequenceStartEvent`].
    SequenceStart(SequenceStartEvent),
    /// A [`BatchReleasedEvent`].
    BatchReleased(BatchReleasedEvent),
    /// An [`ItemsCommittedEvent`].
    ItemsCommitted(ItemsCommittedEvent),
    /// A [`ShownImmediatelyEvent`].
    ShownImmediately(ShownImmediatelyEvent),
    /// A [`SequenceResetEvent`].
    SequenceReset(SequenceResetEvent),
    /// A [`FrameSampleEvent`].
    FrameSample(FrameSampleEvent),
    /// A [`ZoomTransitionEvent`].
    ZoomTransition(ZoomTransitionEvent),
}

impl RecordedEvent {
    /// Host time at which the event was emitted.
    #[must_use]
    pub fn time(&self) -> HostTime {
        match self {
            Self::Visibility(e) => e.time,
            Self::SequenceStart(e) => e.time,
            Self::BatchReleased(e) => e.time,
            Self::ItemsCommitted(e) => e.time,
            Self::ShownImmediately(e) => e.time,
            Self::SequenceReset(e) => e.time,
            Self::FrameSample(e) => e.time,
            Self::ZoomTransition(e) => e.time,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_container(&mut self) -> Option<ContainerRef> {
        self.read_u64().map(ContainerRef)
    }

    fn read_phase(&mut self) -> Option<ZoomPhase> {
        Some(match self.read_u8()? {
            0 => ZoomPhase::Idle,
            1 => ZoomPhase::Zooming,
            _ => ZoomPhase::Settling,
        })
    }

    fn read_reason(&mut self) -> Option<ResetReason> {
        Some(match self.read_u8()? {
            0 => ResetReason::ItemCountChanged,
            1 => ResetReason::AnimationKindChanged,
            _ => ResetReason::Teardown,
        })
    }

    fn decode_event(&mut self, tag: u8, time: HostTime) -> Option<RecordedEvent> {
        Some(match tag {
            TAG_VISIBILITY => RecordedEvent::Visibility(VisibilityEvent {
                container: self.read_container()?,
                time,
                is_intersecting: self.read_bool()?,
                has_intersected: self.read_bool()?,
            }),
            TAG_SEQUENCE_START => RecordedEvent::SequenceStart(SequenceStartEvent {
                container: self.read_container()?,
                time,
                item_count: self.read_u32()?,
                animated_count: self.read_u32()?,
                batch_size: self.read_u32()?,
                stagger: Duration(self.read_u64()?),
            }),
            TAG_BATCH_RELEASED => RecordedEvent::BatchReleased(BatchReleasedEvent {
                container: self.read_container()?,
                time,
                first_index: self.read_u32()?,
                count: self.read_u32()?,
            }),
            TAG_ITEMS_COMMITTED => RecordedEvent::ItemsCommitted(ItemsCommittedEvent {
                container: self.read_container()?,
                time,
                first_index: self.read_u32()?,
                count: self.read_u32()?,
            }),
            TAG_SHOWN_IMMEDIATELY => RecordedEvent::ShownImmediately(ShownImmediatelyEvent {
                container: self.read_container()?,
                time,
                item_count: self.read_u32()?,
            }),
            TAG_SEQUENCE_RESET => RecordedEvent::SequenceReset(SequenceResetEvent {
                container: self.read_container()?,
                time,
                reason: self.read_reason()?,
            }),
            TAG_FRAME_SAMPLE => RecordedEvent::FrameSample(FrameSampleEvent {
                time,
                frame_time_ms: self.read_f64()?,
                average_ms: self.read_f64()?,
                frame_drop_count: self.read_u32()?,
                should_animate: self.read_bool()?,
            }),
            TAG_ZOOM_TRANSITION => RecordedEvent::ZoomTransition(ZoomTransitionEvent {
                time,
                from: self.read_phase()?,
                to: self.read_phase()?,
            }),
            _ => return None,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let time = HostTime(self.read_u64()?);
        self.decode_event(tag, time)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_start() -> SequenceStartEvent {
        SequenceStartEvent {
            container: ContainerRef(3),
            time: HostTime(16_667),
            item_count: 30,
            animated_count: 20,
            batch_size: 6,
            stagger: Duration::from_millis(75),
        }
    }

    #[test]
    fn sequence_start_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = sample_start();
        rec.on_sequence_start(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::SequenceStart(e) => {
                assert_eq!(e.container, orig.container);
                assert_eq!(e.time, orig.time);
                assert_eq!(e.item_count, 30);
                assert_eq!(e.animated_count, 20);
                assert_eq!(e.batch_size, 6);
                assert_eq!(e.stagger, Duration::from_millis(75));
            }
            other => panic!("expected SequenceStart, got {other:?}"),
        }
    }

    #[test]
    fn frame_samples_keep_float_bits() {
        let mut rec = RecorderSink::new();
        rec.on_frame_sample(&FrameSampleEvent {
            time: HostTime(1_000_000),
            frame_time_ms: 33.3,
            average_ms: 17.125,
            frame_drop_count: 4,
            should_animate: true,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::FrameSample(e)] => {
                assert_eq!(e.frame_time_ms.to_bits(), 33.3_f64.to_bits());
                assert_eq!(e.average_ms, 17.125);
                assert_eq!(e.frame_drop_count, 4);
                assert!(e.should_animate);
            }
            other => panic!("expected one FrameSample, got {other:?}"),
        }
    }

    #[test]
    fn mixed_events_decode_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_visibility(&VisibilityEvent {
            container: ContainerRef(1),
            time: HostTime(10),
            is_intersecting: true,
            has_intersected: true,
        });
        rec.on_sequence_start(&sample_start());
        rec.on_batch_released(&BatchReleasedEvent {
            container: ContainerRef(1),
            time: HostTime(20),
            first_index: 0,
            count: 6,
        });
        rec.on_items_committed(&ItemsCommittedEvent {
            container: ContainerRef(1),
            time: HostTime(30),
            first_index: 0,
            count: 6,
        });
        rec.on_sequence_reset(&SequenceResetEvent {
            container: ContainerRef(1),
            time: HostTime(40),
            reason: ResetReason::AnimationKindChanged,
        });
        rec.on_zoom_transition(&ZoomTransitionEvent {
            time: HostTime(50),
            from: ZoomPhase::Zooming,
            to: ZoomPhase::Settling,
        });
        rec.on_shown_immediately(&ShownImmediatelyEvent {
            container: ContainerRef(1),
            time: HostTime(60),
            item_count: 12,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 7);
        assert!(matches!(events[0], RecordedEvent::Visibility(_)));
        assert!(matches!(events[1], RecordedEvent::SequenceStart(_)));
        assert!(matches!(events[2], RecordedEvent::BatchReleased(_)));
        assert!(matches!(events[3], RecordedEvent::ItemsCommitted(_)));
        assert!(matches!(
            events[4],
            RecordedEvent::SequenceReset(SequenceResetEvent {
                reason: ResetReason::AnimationKindChanged,
                ..
            })
        ));
        assert!(matches!(
            events[5],
            RecordedEvent::ZoomTransition(ZoomTransitionEvent {
                from: ZoomPhase::Zooming,
                to: ZoomPhase::Settling,
                ..
            })
        ));
        assert!(matches!(events[6], RecordedEvent::ShownImmediately(_)));
        assert_eq!(events[6].time(), HostTime(60));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_sequence_start(&sample_start());
        rec.on_sequence_start(&sample_start());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }
}
