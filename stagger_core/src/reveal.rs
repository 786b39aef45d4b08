// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The staggered-reveal entry point.
//!
//! [`RevealList::schedule`] wires one [`VisibilityTrigger`], one
//! [`FrameMonitor`], one [`ZoomGuard`] and one [`StaggerScheduler`] together
//! for a list of `item_count` items. The application binds
//! [`container_ref`](RevealList::container_ref) to the element whose
//! visibility gates the sequence, calls [`mount`](RevealList::mount), and then
//! routes every [`HostEvent`] through [`dispatch`](RevealList::dispatch).
//!
//! After each handled event the list re-evaluates:
//!
//! - If animation should not run (disabled, reduced motion, poor frame
//!   timing, or an active zoom), every item is shown at once with static
//!   props. Suppressing motion never suppresses content.
//! - Otherwise, once the container has been seen and no sequence has
//!   started, pacing is resolved and the sequence starts from index 0.
//!
//! Each list owns its handles; two lists on one host never share state.

use crate::animation::{AnimationConfig, ItemProps};
use crate::error::ConfigError;
use crate::host::{ContainerRef, Host, HostEvent};
use crate::monitor::{FrameMonitor, MonitorConfig};
use crate::scheduler::{IndexRun, RevealOptions, RevealState, StaggerScheduler, resolve_pacing};
use crate::trace::{
    BatchReleasedEvent, FrameSampleEvent, ItemsCommittedEvent, ResetReason, SequenceResetEvent,
    SequenceStartEvent, ShownImmediatelyEvent, Tracer, VisibilityEvent, ZoomTransitionEvent,
};
use crate::visibility::VisibilityTrigger;
use crate::zoom::{ZoomGuard, ZoomGuardConfig};

/// A scheduled staggered reveal of one list.
#[derive(Debug)]
pub struct RevealList {
    container: ContainerRef,
    config: AnimationConfig,
    options: RevealOptions,
    trigger: VisibilityTrigger,
    monitor: FrameMonitor,
    zoom: ZoomGuard,
    scheduler: StaggerScheduler,
    mounted: bool,
}

impl RevealList {
    /// Validates the options and returns an un-mounted list with a fresh
    /// container reference.
    ///
    /// With [`RevealOptions::enabled`] off, every item is visible from the
    /// start.
    pub fn schedule(
        item_count: u32,
        config: AnimationConfig,
        options: RevealOptions,
        host: &mut dyn Host,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        let container = host.create_container_ref();
        let mut scheduler = StaggerScheduler::new(item_count, config, options.max_concurrent);
        if !options.enabled {
            scheduler.show_all_immediately(host);
        }
        Ok(Self {
            container,
            config,
            trigger: VisibilityTrigger::new(options.visibility.clone()),
            monitor: FrameMonitor::default(),
            zoom: ZoomGuard::default(),
            scheduler,
            options,
            mounted: false,
        })
    }

    /// Replaces the frame monitor's tuning.
    ///
    /// The old monitor is stopped first. On a mounted list the new one starts
    /// at once; collected samples and any device-tier override are dropped.
    pub fn set_monitor_config(
        &mut self,
        config: MonitorConfig,
        host: &mut dyn Host,
        tracer: &mut Tracer<'_>,
    ) {
        self.monitor.stop(host);
        self.monitor = FrameMonitor::new(config);
        if self.mounted {
            self.monitor.start(host);
            self.sync(host, tracer);
        }
    }

    /// Replaces the zoom guard's tuning.
    ///
    /// A mounted guard is re-attached and returns to idle. The slow-frame
    /// callback is kept.
    pub fn set_zoom_config(
        &mut self,
        config: ZoomGuardConfig,
        host: &mut dyn Host,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.zoom.set_config(config, host);
        self.sync(host, tracer);
        Ok(())
    }

    /// Sets the callback the zoom guard invokes with slow frame averages.
    pub fn on_slow_zoom_frames(&mut self, callback: impl FnMut(f64) + 'static) {
        self.zoom.set_slow_frame_callback(callback);
    }

    /// The handle to bind to the container element.
    #[must_use]
    pub fn container_ref(&self) -> ContainerRef {
        self.container
    }

    /// Starts observing the container, starts the frame monitor and attaches
    /// the zoom guard.
    pub fn mount(&mut self, host: &mut dyn Host, tracer: &mut Tracer<'_>) {
        self.trigger.attach(self.container, host);
        self.monitor.start(host);
        self.zoom.attach(host);
        self.mounted = true;
        self.sync(host, tracer);
    }

    /// Routes `event` to the component that owns its handle, then
    /// re-evaluates the sequence.
    ///
    /// Returns `false` if no component of this list owns the handle.
    pub fn dispatch(
        &mut self,
        event: &HostEvent,
        host: &mut dyn Host,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        if !self.mounted {
            return false;
        }
        let handled = match event {
            HostEvent::Frame { handle, now } => {
                if let Some(change) = self.trigger.on_frame(*handle, host) {
                    tracer.visibility(&VisibilityEvent {
                        container: self.container,
                        time: *now,
                        is_intersecting: change.is_intersecting,
                        has_intersected: change.has_intersected,
                    });
                    true
                } else if let Some(sample) = self.monitor.on_frame(*handle, *now) {
                    let snapshot = self.monitor.snapshot();
                    tracer.frame_sample(&FrameSampleEvent {
                        time: sample.time,
                        frame_time_ms: sample.frame_time_ms,
                        average_ms: snapshot.average_frame_time_ms,
                        frame_drop_count: snapshot.frame_drop_count,
                        should_animate: self.monitor.should_animate(),
                    });
                    true
                } else if let Some(run) = self.scheduler.on_frame(*handle, host) {
                    tracer.items_committed(&ItemsCommittedEvent {
                        container: self.container,
                        time: *now,
                        first_index: run.first_index,
                        count: run.count,
                    });
                    true
                } else {
                    self.zoom.on_frame(*handle, *now, host)
                }
            }
            HostEvent::Timer { handle } => {
                if self.monitor.on_timer(*handle, host) {
                    true
                } else if let Some(run) = self.scheduler.on_timer(*handle, host) {
                    self.trace_release(run, host, tracer);
                    true
                } else if let Some(transition) = self.zoom.on_timer(*handle, host) {
                    tracer.zoom_transition(&ZoomTransitionEvent {
                        time: host.now(),
                        from: transition.from,
                        to: transition.to,
                    });
                    true
                } else {
                    false
                }
            }
            HostEvent::Intersection { observer, entry } => {
                self.trigger.on_intersection(*observer, *entry, host)
            }
            HostEvent::ReducedMotion { watch, reduce } => {
                self.monitor.on_reduced_motion(*watch, *reduce)
            }
            HostEvent::Gesture { listener, input } => {
                let ours = self.zoom.owns_listener(*listener);
                if let Some(transition) = self.zoom.on_gesture(*listener, input, host) {
                    tracer.zoom_transition(&ZoomTransitionEvent {
                        time: host.now(),
                        from: transition.from,
                        to: transition.to,
                    });
                }
                ours
            }
        };
        if handled {
            self.sync(host, tracer);
        }
        handled
    }

    /// Changes the item count. A different count discards the running
    /// sequence and restarts from index 0 once the container has been seen.
    pub fn set_item_count(
        &mut self,
        item_count: u32,
        host: &mut dyn Host,
        tracer: &mut Tracer<'_>,
    ) {
        if self.scheduler.reconfigure(item_count, self.config, host) {
            self.restarted(ResetReason::ItemCountChanged, host, tracer);
        }
    }

    /// Changes the animation config. A different kind discards the running
    /// sequence and restarts it; other changes only refresh item props.
    pub fn set_animation(
        &mut self,
        config: AnimationConfig,
        host: &mut dyn Host,
        tracer: &mut Tracer<'_>,
    ) {
        self.config = config;
        if self
            .scheduler
            .reconfigure(self.scheduler.item_count(), config, host)
        {
            self.restarted(ResetReason::AnimationKindChanged, host, tracer);
        }
    }

    /// Releases every host registration and clears per-item state.
    ///
    /// A later [`mount`](Self::mount) starts over from a hidden list.
    pub fn teardown(&mut self, host: &mut dyn Host, tracer: &mut Tracer<'_>) {
        self.trigger.detach(host);
        self.trigger.reset();
        self.monitor.stop(host);
        self.zoom.detach(host);
        self.scheduler.reset(host);
        if !self.options.enabled {
            self.scheduler.show_all_immediately(host);
        }
        if self.mounted {
            tracer.sequence_reset(&SequenceResetEvent {
                container: self.container,
                time: host.now(),
                reason: ResetReason::Teardown,
            });
        }
        self.mounted = false;
    }

    /// The props to apply to item `index`.
    #[must_use]
    pub fn item_props(&self, index: u32) -> ItemProps {
        self.scheduler.item_props(index)
    }

    /// Reveal state of item `index`.
    #[must_use]
    pub fn state(&self, index: u32) -> RevealState {
        self.scheduler.state(index)
    }

    /// Whether the container has been seen.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.trigger.has_intersected()
    }

    /// Whether an animated sequence has started.
    #[must_use]
    pub fn has_animated(&self) -> bool {
        self.scheduler.pacing().is_some()
    }

    /// The combined verdict: enabled, healthy frame timing, no reduced-motion
    /// preference and no zoom in progress.
    #[must_use]
    pub fn should_animate(&self) -> bool {
        self.options.enabled
            && self.monitor.should_animate()
            && !self.zoom.should_reduce_animations()
    }

    /// Number of items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.scheduler.item_count()
    }

    /// Whether [`mount`](Self::mount) ran without a later teardown.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The list's scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &StaggerScheduler {
        &self.scheduler
    }

    /// The list's frame monitor.
    #[must_use]
    pub fn monitor(&self) -> &FrameMonitor {
        &self.monitor
    }

    /// Mutable access to the frame monitor, e.g. to feed samples or override
    /// the device tier.
    pub fn monitor_mut(&mut self) -> &mut FrameMonitor {
        &mut self.monitor
    }

    /// The list's zoom guard.
    #[must_use]
    pub fn zoom(&self) -> &ZoomGuard {
        &self.zoom
    }

    /// The list's visibility trigger.
    #[must_use]
    pub fn trigger(&self) -> &VisibilityTrigger {
        &self.trigger
    }

    fn restarted(&mut self, reason: ResetReason, host: &mut dyn Host, tracer: &mut Tracer<'_>) {
        tracer.sequence_reset(&SequenceResetEvent {
            container: self.container,
            time: host.now(),
            reason,
        });
        if !self.options.enabled {
            self.scheduler.show_all_immediately(host);
        }
        self.sync(host, tracer);
    }

    fn sync(&mut self, host: &mut dyn Host, tracer: &mut Tracer<'_>) {
        if !self.mounted {
            return;
        }
        if !self.should_animate() {
            if self.scheduler.show_all_immediately(host) {
                tracer.shown_immediately(&ShownImmediatelyEvent {
                    container: self.container,
                    time: host.now(),
                    item_count: self.scheduler.item_count(),
                });
            }
            return;
        }
        // Suppression is temporary until the container is seen. Once it has
        // been seen, items shown without animation stay that way.
        if self.scheduler.is_immediate() && !self.trigger.has_intersected() {
            self.scheduler.reset(host);
            tracing::debug!(
                container = self.container.0,
                "animation allowed again before the list was seen"
            );
        }
        if self.trigger.has_intersected() && !self.scheduler.has_started() {
            let item_count = self.scheduler.item_count();
            let pacing = resolve_pacing(item_count, &self.config, &self.options, &self.monitor);
            tracer.sequence_start(&SequenceStartEvent {
                container: self.container,
                time: host.now(),
                item_count,
                animated_count: item_count.min(self.options.max_concurrent),
                batch_size: pacing.batch_size,
                stagger: pacing.stagger,
            });
            if let Some(run) = self.scheduler.start(pacing, host) {
                self.trace_release(run, host, tracer);
            }
        }
    }

    fn trace_release(&self, run: IndexRun, host: &dyn Host, tracer: &mut Tracer<'_>) {
        tracer.batch_released(&BatchReleasedEvent {
            container: self.container,
            time: host.now(),
            first_index: run.first_index,
            count: run.count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationKind;
    use crate::device::DeviceTier;
    use crate::host::GestureInput;
    use crate::manual::ManualHost;
    use crate::time::HostTime;
    use crate::visibility::{Threshold, VisibilityOptions};

    fn run(list: &mut RevealList, host: &mut ManualHost, until: HostTime) {
        host.run_until(until, |host, event| {
            let _ = list.dispatch(&event, host, &mut Tracer::none());
        });
    }

    fn mounted(item_count: u32, config: AnimationConfig) -> (RevealList, ManualHost) {
        let mut host = ManualHost::new();
        let mut list =
            RevealList::schedule(item_count, config, RevealOptions::DEFAULT, &mut host).unwrap();
        list.mount(&mut host, &mut Tracer::none());
        (list, host)
    }

    #[test]
    fn invalid_options_are_rejected() {
        let mut host = ManualHost::new();
        let options = RevealOptions {
            visibility: VisibilityOptions {
                threshold: Threshold::Scalar(2.0),
                ..VisibilityOptions::DEFAULT
            },
            ..RevealOptions::DEFAULT
        };
        let result = RevealList::schedule(4, AnimationConfig::default(), options, &mut host);
        assert_eq!(result.err(), Some(ConfigError::ThresholdOutOfRange(2.0)));
    }

    #[test]
    fn nothing_happens_until_the_container_is_seen() {
        let (mut list, mut host) = mounted(5, AnimationConfig::default());
        run(&mut list, &mut host, HostTime::from_millis(2_000));
        assert!(!list.is_visible());
        assert!(!list.has_animated());
        assert_eq!(list.item_props(0).style("opacity"), Some("0"));
    }

    #[test]
    fn visible_container_reveals_every_item() {
        let (mut list, mut host) = mounted(5, AnimationConfig::new(AnimationKind::SlideIn));
        host.push_intersection(list.container_ref(), true, 0.5);
        run(&mut list, &mut host, HostTime::from_millis(2_000));

        assert!(list.is_visible());
        assert!(list.has_animated());
        assert!(list.should_animate());
        assert!(list.scheduler().is_complete());
        assert!((0..5).all(|i| list.state(i) == RevealState::Visible));
        assert_eq!(
            list.item_props(4).style("--stagger-from-transform"),
            Some("translateY(20px)")
        );
    }

    #[test]
    fn disabled_list_is_visible_without_mounting() {
        let mut host = ManualHost::new();
        let options = RevealOptions {
            enabled: false,
            ..RevealOptions::DEFAULT
        };
        let list = RevealList::schedule(3, AnimationConfig::default(), options, &mut host).unwrap();
        for i in 0..3 {
            assert_eq!(list.item_props(i).style("opacity"), Some("1"));
            assert_eq!(list.item_props(i).style("transform"), Some("none"));
        }
        assert!(!list.should_animate());
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn disabled_list_stays_visible_across_config_changes() {
        let mut host = ManualHost::new();
        let options = RevealOptions {
            enabled: false,
            ..RevealOptions::DEFAULT
        };
        let mut list =
            RevealList::schedule(3, AnimationConfig::default(), options, &mut host).unwrap();

        list.set_item_count(5, &mut host, &mut Tracer::none());
        assert_eq!(list.item_count(), 5);
        for i in 0..5 {
            assert_eq!(list.item_props(i).style("opacity"), Some("1"));
        }

        list.set_animation(
            AnimationConfig::new(AnimationKind::ScaleIn),
            &mut host,
            &mut Tracer::none(),
        );
        for i in 0..5 {
            assert_eq!(list.state(i), RevealState::Visible);
            assert_eq!(list.item_props(i).style("transform"), Some("none"));
        }
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn reduced_motion_shows_everything_at_mount() {
        let mut host = ManualHost::new();
        host.set_reduced_motion(true);
        let mut list =
            RevealList::schedule(8, AnimationConfig::default(), RevealOptions::DEFAULT, &mut host)
                .unwrap();
        list.mount(&mut host, &mut Tracer::none());
        assert!(!list.should_animate());
        assert!((0..8).all(|i| list.state(i) == RevealState::Visible));
        assert_eq!(list.item_props(7).style("animation-delay"), None);
    }

    #[test]
    fn zoom_mid_sequence_shows_the_rest_at_once() {
        let (mut list, mut host) = mounted(12, AnimationConfig::default());
        list.monitor_mut().set_device_tier(DeviceTier::Low);
        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(20));
        assert!(list.has_animated());
        assert!(list.scheduler().visible_count() < 12);

        host.push_gesture(GestureInput::Wheel { ctrl_key: true });
        run(&mut list, &mut host, HostTime::from_millis(30));
        assert!(list.zoom().is_zooming());
        assert!(!list.should_animate());
        assert_eq!(list.scheduler().visible_count(), 12);
        assert!(list.scheduler().is_immediate());

        run(&mut list, &mut host, HostTime::from_millis(2_000));
        assert!(!list.zoom().should_reduce_animations());
        assert!(list.scheduler().is_immediate(), "a seen list is not hidden again");
        assert_eq!(list.scheduler().visible_count(), 12);
    }

    #[test]
    fn zoom_before_the_list_is_seen_does_not_cancel_the_reveal() {
        let (mut list, mut host) = mounted(6, AnimationConfig::default());
        host.push_gesture(GestureInput::Wheel { ctrl_key: true });
        run(&mut list, &mut host, HostTime::from_millis(50));
        assert!(list.zoom().is_zooming());
        assert_eq!(list.item_props(0).style("opacity"), Some("1"));

        run(&mut list, &mut host, HostTime::from_millis(1_000));
        assert!(!list.zoom().should_reduce_animations());
        assert!(list.should_animate());
        assert!(!list.scheduler().is_immediate());
        assert_eq!(list.state(0), RevealState::Hidden);

        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(3_000));
        assert!(list.has_animated());
        assert!(!list.scheduler().is_immediate());
        assert!((0..6).all(|i| list.state(i) == RevealState::Visible));
        assert!(list.item_props(5).style("animation-delay").is_some());
    }

    #[test]
    fn reduced_motion_toggled_off_before_the_list_is_seen() {
        let (mut list, mut host) = mounted(4, AnimationConfig::default());
        host.set_reduced_motion(true);
        run(&mut list, &mut host, HostTime::from_millis(100));
        assert!(list.scheduler().is_immediate());
        assert_eq!(list.scheduler().visible_count(), 4);

        host.set_reduced_motion(false);
        run(&mut list, &mut host, HostTime::from_millis(200));
        assert!(list.should_animate());
        assert_eq!(list.scheduler().visible_count(), 0);

        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(2_000));
        assert!(list.has_animated());
        assert_eq!(list.scheduler().visible_count(), 4);
    }

    #[test]
    fn reduced_motion_toggled_off_after_the_list_is_seen() {
        let (mut list, mut host) = mounted(4, AnimationConfig::default());
        host.set_reduced_motion(true);
        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(100));
        assert!(list.is_visible());
        assert!(list.scheduler().is_immediate());

        host.set_reduced_motion(false);
        run(&mut list, &mut host, HostTime::from_millis(2_000));
        assert!(list.should_animate());
        assert!(!list.has_animated());
        assert!(list.scheduler().is_immediate());
        assert_eq!(list.scheduler().visible_count(), 4);
    }

    #[test]
    fn count_change_restarts_from_index_zero() {
        let (mut list, mut host) = mounted(6, AnimationConfig::default());
        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(2_000));
        assert_eq!(list.scheduler().visible_count(), 6);

        list.set_item_count(9, &mut host, &mut Tracer::none());
        assert_eq!(list.state(5), RevealState::Pending, "restarted at once");
        assert_eq!(list.state(0), RevealState::Pending);
        assert_eq!(list.scheduler().visible_count(), 0);

        run(&mut list, &mut host, HostTime::from_millis(4_000));
        assert_eq!(list.scheduler().visible_count(), 9);
    }

    #[test]
    fn teardown_releases_every_handle() {
        let (mut list, mut host) = mounted(30, AnimationConfig::default());
        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(20));
        assert!(host.pending_tasks() > 0);

        list.teardown(&mut host, &mut Tracer::none());
        assert_eq!(host.pending_tasks(), 0);
        assert_eq!(host.active_observers(), 0);
        assert_eq!(host.active_watches(), 0);
        assert_eq!(host.active_listeners(), 0);
        assert_eq!(list.scheduler().visible_count(), 0);
        assert!(!list.is_visible());
    }

    #[test]
    fn retuning_a_mounted_list_leaves_no_stray_handles() {
        let (mut list, mut host) = mounted(8, AnimationConfig::default());
        host.push_gesture(GestureInput::Wheel { ctrl_key: true });
        run(&mut list, &mut host, HostTime::from_millis(20));
        assert!(list.zoom().is_zooming());

        list.set_monitor_config(MonitorConfig::DEFAULT, &mut host, &mut Tracer::none());
        assert!(list.monitor().is_running());
        assert_eq!(host.active_watches(), 1);

        let bad = ZoomGuardConfig {
            sample_window: 0,
            ..ZoomGuardConfig::DEFAULT
        };
        assert_eq!(
            list.set_zoom_config(bad, &mut host, &mut Tracer::none()),
            Err(ConfigError::ZeroSampleWindow)
        );
        assert!(list.zoom().is_zooming(), "rejected config changes nothing");

        list.set_zoom_config(ZoomGuardConfig::DEFAULT, &mut host, &mut Tracer::none()).unwrap();
        assert!(list.zoom().is_attached());
        assert!(!list.zoom().is_zooming());
        assert_eq!(host.active_listeners(), 1);

        list.teardown(&mut host, &mut Tracer::none());
        assert_eq!(host.pending_tasks(), 0);
        assert_eq!(host.active_observers(), 0);
        assert_eq!(host.active_watches(), 0);
        assert_eq!(host.active_listeners(), 0);
    }

    #[test]
    fn tuning_before_mount_applies_at_mount() {
        let mut host = ManualHost::new();
        let mut list =
            RevealList::schedule(3, AnimationConfig::default(), RevealOptions::DEFAULT, &mut host)
                .unwrap();
        list.set_monitor_config(MonitorConfig::DEFAULT, &mut host, &mut Tracer::none());
        list.set_zoom_config(ZoomGuardConfig::DEFAULT, &mut host, &mut Tracer::none()).unwrap();
        assert!(!list.monitor().is_running());
        assert!(!list.zoom().is_attached());
        assert_eq!(host.pending_tasks(), 0);

        list.mount(&mut host, &mut Tracer::none());
        assert!(list.monitor().is_running());
        assert!(list.zoom().is_attached());
    }

    #[test]
    fn foreign_events_are_not_handled() {
        let mut host = ManualHost::new();
        let mut a =
            RevealList::schedule(3, AnimationConfig::default(), RevealOptions::DEFAULT, &mut host)
                .unwrap();
        let mut b =
            RevealList::schedule(3, AnimationConfig::default(), RevealOptions::DEFAULT, &mut host)
                .unwrap();
        a.mount(&mut host, &mut Tracer::none());
        b.mount(&mut host, &mut Tracer::none());

        host.push_intersection(a.container_ref(), true, 1.0);
        let mut handled_by_b = 0;
        host.run_until(HostTime::from_millis(1_000), |host, event| {
            let handled_a = a.dispatch(&event, host, &mut Tracer::none());
            let handled_b = b.dispatch(&event, host, &mut Tracer::none());
            assert!(!(handled_a && handled_b), "one owner per handle");
            if handled_b && matches!(event, HostEvent::Intersection { .. }) {
                handled_by_b += 1;
            }
        });
        assert_eq!(handled_by_b, 0);
        assert!(a.is_visible());
        assert!(!b.is_visible());
    }

    #[test]
    fn duration_change_keeps_visible_items() {
        let (mut list, mut host) = mounted(3, AnimationConfig::default());
        host.push_intersection(list.container_ref(), true, 1.0);
        run(&mut list, &mut host, HostTime::from_millis(1_000));
        list.set_animation(
            AnimationConfig {
                duration_ms: Some(900),
                ..AnimationConfig::default()
            },
            &mut host,
            &mut Tracer::none(),
        );
        assert_eq!(list.scheduler().visible_count(), 3);
        assert_eq!(list.item_props(2).style("animation-duration"), Some("900ms"));
    }
}
