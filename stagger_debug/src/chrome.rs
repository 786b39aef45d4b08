// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each list container becomes its own process row. Frame-monitor samples
//! become counter tracks and zoom phases become duration slices.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use stagger_core::host::ContainerRef;
use stagger_core::time::HostTime;
use stagger_core::zoom::ZoomPhase;

use crate::recorder::{RecordedEvent, decode};

/// Process row for events not tied to a container.
const GLOBAL_PID: u64 = 0;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Visibility(e) => {
                events.push(instant(
                    "Visibility",
                    "Trigger",
                    e.time,
                    e.container,
                    json!({
                        "is_intersecting": e.is_intersecting,
                        "has_intersected": e.has_intersected,
                    }),
                ));
            }
            RecordedEvent::SequenceStart(e) => {
                events.push(instant(
                    "SequenceStart",
                    "Scheduler",
                    e.time,
                    e.container,
                    json!({
                        "item_count": e.item_count,
                        "animated_count": e.animated_count,
                        "batch_size": e.batch_size,
                        "stagger_ms": e.stagger.as_millis(),
                    }),
                ));
            }
            RecordedEvent::BatchReleased(e) => {
                events.push(instant(
                    "BatchReleased",
                    "Scheduler",
                    e.time,
                    e.container,
                    json!({
                        "first_index": e.first_index,
                        "count": e.count,
                    }),
                ));
            }
            RecordedEvent::ItemsCommitted(e) => {
                events.push(instant(
                    "ItemsCommitted",
                    "Frame",
                    e.time,
                    e.container,
                    json!({
                        "first_index": e.first_index,
                        "count": e.count,
                    }),
                ));
            }
            RecordedEvent::ShownImmediately(e) => {
                events.push(instant(
                    "ShownImmediately",
                    "Scheduler",
                    e.time,
                    e.container,
                    json!({ "item_count": e.item_count }),
                ));
            }
            RecordedEvent::SequenceReset(e) => {
                events.push(instant(
                    "SequenceReset",
                    "Scheduler",
                    e.time,
                    e.container,
                    json!({ "reason": format!("{:?}", e.reason) }),
                ));
            }
            RecordedEvent::FrameSample(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "FrameTime",
                    "cat": "Monitor",
                    "ts": e.time.ticks(),
                    "pid": GLOBAL_PID,
                    "tid": 0,
                    "args": {
                        "frame_ms": e.frame_time_ms,
                        "average_ms": e.average_ms,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "FrameDrops",
                    "cat": "Monitor",
                    "ts": e.time.ticks(),
                    "pid": GLOBAL_PID,
                    "tid": 0,
                    "args": { "drops": e.frame_drop_count }
                }));
            }
            RecordedEvent::ZoomTransition(e) => {
                if e.from != ZoomPhase::Idle {
                    events.push(zoom_slice("E", e.from, e.time));
                }
                if e.to != ZoomPhase::Idle {
                    events.push(zoom_slice("B", e.to, e.time));
                }
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant(name: &str, cat: &str, time: HostTime, container: ContainerRef, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": time.ticks(),
        "pid": container.0,
        "tid": 0,
        "s": "p",
        "args": args,
    })
}

fn zoom_slice(ph: &str, phase: ZoomPhase, time: HostTime) -> Value {
    json!({
        "ph": ph,
        "name": phase.as_str(),
        "cat": "Zoom",
        "ts": time.ticks(),
        "pid": GLOBAL_PID,
        "tid": 1,
    })
}
