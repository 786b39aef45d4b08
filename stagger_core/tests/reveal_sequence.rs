// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end reveal sequences driven through a `ManualHost`.

use stagger_core::animation::{AnimationConfig, AnimationKind, Easing};
use stagger_core::device::{DeviceHints, DeviceTier, EffectiveConnection, estimate_tier};
use stagger_core::host::{Host, HostEvent};
use stagger_core::manual::ManualHost;
use stagger_core::monitor::FrameMonitor;
use stagger_core::reveal::RevealList;
use stagger_core::scheduler::{RevealOptions, RevealState};
use stagger_core::time::{Duration, HostTime};
use stagger_core::trace::Tracer;

/// Drives the list until `until`, recording `(time, index)` for every index
/// the first time it is observed visible.
fn run_recording(
    list: &mut RevealList,
    host: &mut ManualHost,
    until: HostTime,
    commits: &mut Vec<(HostTime, u32)>,
) {
    host.run_until(until, |host, event| {
        let is_frame = matches!(event, HostEvent::Frame { .. });
        list.dispatch(&event, host, &mut Tracer::none());
        if is_frame {
            for index in 0..list.item_count() {
                let seen = commits.iter().any(|&(_, i)| i == index);
                if !seen && list.state(index) == RevealState::Visible {
                    commits.push((host.now(), index));
                }
            }
        }
    });
}

fn mounted(
    item_count: u32,
    config: AnimationConfig,
    options: RevealOptions,
) -> (RevealList, ManualHost) {
    let mut host = ManualHost::new();
    let mut list = RevealList::schedule(item_count, config, options, &mut host).unwrap();
    list.mount(&mut host, &mut Tracer::none());
    (list, host)
}

#[test]
fn disabled_animation_shows_every_item_identically() {
    let options = RevealOptions {
        enabled: false,
        ..RevealOptions::DEFAULT
    };
    for item_count in [0_u32, 1, 7, 50] {
        let (list, _host) = mounted(item_count, AnimationConfig::default(), options.clone());
        let reference = list.item_props(0);
        for index in 0..item_count {
            let props = list.item_props(index);
            assert_eq!(props.class_names, reference.class_names);
            assert_eq!(props.styles, reference.styles);
            assert_eq!(props.style("opacity"), Some("1"));
            assert_eq!(props.style("transform"), Some("none"));
        }
    }
}

#[test]
fn batches_commit_in_index_order_and_complete_in_time() {
    let config = AnimationConfig {
        stagger_delay_ms: Some(60),
        start_delay_ms: 40,
        ..AnimationConfig::new(AnimationKind::FadeIn)
    };
    let options = RevealOptions {
        batch_size: Some(3),
        ..RevealOptions::DEFAULT
    };
    let item_count = 14;
    let (mut list, mut host) = mounted(item_count, config, options);
    host.push_intersection(list.container_ref(), true, 1.0);

    let mut commits = Vec::new();
    // startDelay + N × stagger + one frame
    let deadline = HostTime::from_millis(40 + 14 * 60 + 17);
    run_recording(&mut list, &mut host, deadline, &mut commits);

    assert!((0..item_count).all(|i| list.state(i) == RevealState::Visible));
    assert_eq!(commits.len(), item_count as usize);
    for pair in commits.windows(2) {
        let ((t0, i0), (t1, i1)) = (pair[0], pair[1]);
        assert!(i1 > i0, "indices are first seen in increasing order");
        assert!(t1 >= t0);
    }
    // Each batch of three lands in a single frame.
    for batch in commits.chunks(3) {
        assert!(batch.iter().all(|&(t, _)| t == batch[0].0));
    }
}

#[test]
fn kind_change_clears_and_restarts_from_zero() {
    let (mut list, mut host) = mounted(10, AnimationConfig::default(), RevealOptions::DEFAULT);
    host.push_intersection(list.container_ref(), true, 1.0);
    let mut commits = Vec::new();
    run_recording(&mut list, &mut host, HostTime::from_millis(3_000), &mut commits);
    assert_eq!(list.scheduler().visible_count(), 10);

    list.set_animation(
        AnimationConfig::new(AnimationKind::ScaleIn),
        &mut host,
        &mut Tracer::none(),
    );
    assert!((0..10).all(|i| list.state(i) != RevealState::Visible));
    assert_eq!(list.state(0), RevealState::Pending, "restart begins at index 0");

    let restart_time = host.now();
    let mut commits = Vec::new();
    run_recording(&mut list, &mut host, restart_time + Duration::from_millis(3_000), &mut commits);
    assert_eq!(commits.first().map(|&(_, i)| i), Some(0));
    assert_eq!(list.scheduler().visible_count(), 10);
    assert_eq!(
        list.item_props(9).style("--stagger-from-transform"),
        Some("scale(0.9)")
    );
}

#[test]
fn device_tier_examples() {
    let strong = DeviceHints {
        logical_cores: 8,
        device_memory_gb: Some(8.0),
        effective_connection: None,
    };
    assert_eq!(estimate_tier(&strong), DeviceTier::High);

    let weak = DeviceHints {
        logical_cores: 2,
        device_memory_gb: None,
        effective_connection: EffectiveConnection::parse("2g"),
    };
    assert_eq!(estimate_tier(&weak), DeviceTier::Low);
}

#[test]
fn rolling_average_converges() {
    let mut monitor = FrameMonitor::default();
    for _ in 0..25 {
        monitor.record_frame_time(14.0);
    }
    assert_eq!(monitor.sample_count(), 20);
    assert!((monitor.snapshot().average_frame_time_ms - 14.0).abs() < 1e-9);
}

#[test]
fn reduced_motion_wins_over_a_strong_device() {
    let mut host = ManualHost::new();
    host.set_device_hints(DeviceHints {
        logical_cores: 32,
        device_memory_gb: Some(64.0),
        effective_connection: None,
    });
    let mut list =
        RevealList::schedule(6, AnimationConfig::default(), RevealOptions::DEFAULT, &mut host)
            .unwrap();
    list.mount(&mut host, &mut Tracer::none());
    assert!(list.should_animate());

    host.set_reduced_motion(true);
    let now = host.now();
    host.run_until(now, |host, event| {
        list.dispatch(&event, host, &mut Tracer::none());
    });
    assert!(!list.should_animate());
    assert!((0..6).all(|i| list.state(i) == RevealState::Visible));
    assert_eq!(list.item_props(3).style("animation-name"), None);
}

#[test]
fn six_item_fade_in_scenario() {
    let config = AnimationConfig {
        kind: AnimationKind::FadeIn,
        duration_ms: Some(500),
        easing: Easing::EaseInOut,
        stagger_delay_ms: Some(150),
        start_delay_ms: 0,
    };
    let options = RevealOptions {
        batch_size: Some(8),
        ..RevealOptions::DEFAULT
    };
    let (mut list, mut host) = mounted(6, config, options);

    // Let the visibility trigger commit, then stop right at that frame.
    host.push_intersection(list.container_ref(), true, 1.0);
    let first_vsync = HostTime(16_667);
    host.run_until(first_vsync, |host, event| {
        list.dispatch(&event, host, &mut Tracer::none());
    });
    assert!(list.is_visible());
    assert!(
        (0..6).all(|i| list.state(i) == RevealState::Pending),
        "all six are enqueued in one batch"
    );

    let mut commits = Vec::new();
    run_recording(&mut list, &mut host, HostTime(2 * 16_667), &mut commits);
    assert_eq!(commits.len(), 6, "committed by the next frame");
    assert!(commits.iter().all(|&(t, _)| t == commits[0].0));

    let expected = ["0ms", "150ms", "300ms", "450ms", "600ms", "750ms"];
    for (index, delay) in (0..6).zip(expected) {
        let props = list.item_props(index);
        assert_eq!(props.style("animation-delay"), Some(delay));
        assert_eq!(props.style("animation-duration"), Some("500ms"));
        assert_eq!(props.style("animation-timing-function"), Some("ease-in-out"));
    }
}

#[test]
fn unobservable_container_never_reveals() {
    let mut host = ManualHost::new();
    host.set_intersection_supported(false);
    let mut list =
        RevealList::schedule(4, AnimationConfig::default(), RevealOptions::DEFAULT, &mut host)
            .unwrap();
    list.mount(&mut host, &mut Tracer::none());
    host.run_until(HostTime::from_millis(5_000), |host, event| {
        list.dispatch(&event, host, &mut Tracer::none());
    });
    assert!(!list.is_visible());
    assert!(!list.has_animated());
    assert_eq!(list.item_props(0).style("opacity"), Some("0"));
}

#[test]
fn remount_after_teardown_starts_hidden() {
    let (mut list, mut host) = mounted(4, AnimationConfig::default(), RevealOptions::DEFAULT);
    host.push_intersection(list.container_ref(), true, 1.0);
    let mut commits = Vec::new();
    run_recording(&mut list, &mut host, HostTime::from_millis(1_000), &mut commits);
    assert_eq!(list.scheduler().visible_count(), 4);

    list.teardown(&mut host, &mut Tracer::none());
    list.mount(&mut host, &mut Tracer::none());
    assert_eq!(list.scheduler().visible_count(), 0);
    assert!(!list.is_visible());

    host.push_intersection(list.container_ref(), true, 1.0);
    let until = host.now() + Duration::from_millis(1_000);
    let mut commits = Vec::new();
    run_recording(&mut list, &mut host, until, &mut commits);
    assert_eq!(list.scheduler().visible_count(), 4);
    assert!(host.pending_tasks() > 0, "monitor interval is live again");
}
