// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated reveal sequence that exercises the tracing and diagnostics
//! pipeline.
//!
//! Drives a [`RevealList`] through a [`ManualHost`]: the container scrolls into
//! view, the animation kind changes, a pinch zoom interrupts the sequence and
//! the item count changes afterwards. Events go to both a
//! [`PrettyPrintSink`](stagger_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](stagger_debug::recorder::RecorderSink), and the recording
//! is exported as a Chrome trace JSON file.
//!
//! An optional JSON file given as the first argument overrides the list
//! configuration:
//!
//! ```json
//! { "itemCount": 12, "animation": { "type": "scale-in", "staggerDelay": 80 } }
//! ```
//!
//! Set `RUST_LOG=stagger_core=debug` for the core's own diagnostics.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use kurbo::Point;
use serde::Deserialize;

use stagger_core::animation::{AnimationConfig, AnimationKind};
use stagger_core::device::DeviceHints;
use stagger_core::host::{GestureInput, Host};
use stagger_core::manual::ManualHost;
use stagger_core::reveal::RevealList;
use stagger_core::scheduler::RevealOptions;
use stagger_core::time::{Duration, HostTime};
use stagger_core::trace::{
    BatchReleasedEvent, FrameSampleEvent, ItemsCommittedEvent, SequenceResetEvent,
    SequenceStartEvent, ShownImmediatelyEvent, TraceSink, Tracer, VisibilityEvent,
    ZoomTransitionEvent,
};

use stagger_debug::pretty::PrettyPrintSink;
use stagger_debug::recorder::RecorderSink;

const TRACE_PATH: &str = "trace.json";

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DemoConfig {
    item_count: u32,
    animation: AnimationConfig,
    options: RevealOptions,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            item_count: 12,
            animation: AnimationConfig::default(),
            options: RevealOptions::DEFAULT,
        }
    }
}

/// Forwards every event to both sinks.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

macro_rules! tee_method {
    ($name:ident, $event:ty) => {
        fn $name(&mut self, e: &$event) {
            self.pretty.$name(e);
            self.recorder.$name(e);
        }
    };
}

impl TraceSink for Tee {
    tee_method!(on_visibility, VisibilityEvent);
    tee_method!(on_sequence_start, SequenceStartEvent);
    tee_method!(on_batch_released, BatchReleasedEvent);
    tee_method!(on_items_committed, ItemsCommittedEvent);
    tee_method!(on_shown_immediately, ShownImmediatelyEvent);
    tee_method!(on_sequence_reset, SequenceResetEvent);
    tee_method!(on_frame_sample, FrameSampleEvent);
    tee_method!(on_zoom_transition, ZoomTransitionEvent);
}

fn load_config() -> Result<DemoConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path)?;
            let config = serde_json::from_reader(file)?;
            tracing::info!(%path, "loaded configuration");
            Ok(config)
        }
        None => Ok(DemoConfig::default()),
    }
}

fn run(list: &mut RevealList, host: &mut ManualHost, tracer: &mut Tracer<'_>, until: HostTime) {
    host.run_until(until, |host, event| {
        list.dispatch(&event, host, tracer);
    });
}

fn pinch(spread: f64) -> Vec<Point> {
    vec![Point::new(200.0 - spread, 300.0), Point::new(200.0 + spread, 300.0)]
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;

    // -- sinks -------------------------------------------------------------
    let mut tee = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- host + list -------------------------------------------------------
    let mut host = ManualHost::new();
    host.set_device_hints(DeviceHints {
        logical_cores: 4,
        device_memory_gb: Some(4.0),
        effective_connection: None,
    });
    let mut list = RevealList::schedule(
        config.item_count,
        config.animation,
        config.options,
        &mut host,
    )?;
    list.on_slow_zoom_frames(|average_ms| {
        tracing::warn!(average_ms, "slow frames while zooming");
    });

    {
        let mut tracer = Tracer::new(&mut tee);
        list.mount(&mut host, &mut tracer);

        // 1. The container scrolls into view.
        run(&mut list, &mut host, &mut tracer, HostTime::from_millis(200));
        host.push_intersection(list.container_ref(), true, 0.4);
        run(&mut list, &mut host, &mut tracer, HostTime::from_millis(2_500));

        // 2. A new animation kind restarts the sequence.
        let slide = AnimationConfig {
            kind: AnimationKind::SlideIn,
            ..config.animation
        };
        list.set_animation(slide, &mut host, &mut tracer);
        run(&mut list, &mut host, &mut tracer, HostTime::from_millis(3_000));

        // 3. A pinch zoom interrupts it; everything is shown at once.
        host.push_gesture(GestureInput::TouchStart(pinch(40.0)));
        host.push_gesture(GestureInput::TouchMove(pinch(80.0)));
        run(&mut list, &mut host, &mut tracer, HostTime::from_millis(3_400));
        host.push_gesture(GestureInput::TouchEnd(Vec::new()));
        run(&mut list, &mut host, &mut tracer, HostTime::from_millis(4_500));

        // 4. More items arrive once the zoom has settled.
        list.set_item_count(config.item_count.saturating_mul(2), &mut host, &mut tracer);
        let until = host.now() + Duration::from_millis(4_000);
        run(&mut list, &mut host, &mut tracer, until);

        tracing::info!(
            visible = list.scheduler().visible_count(),
            items = list.item_count(),
            "sequence finished"
        );
        list.teardown(&mut host, &mut tracer);
    }

    // -- export Chrome trace -----------------------------------------------
    let file = File::create(TRACE_PATH)?;
    let mut writer = BufWriter::new(file);
    stagger_debug::chrome::export(tee.recorder.as_bytes(), &mut writer)?;

    println!("Wrote {TRACE_PATH}");
    Ok(())
}
