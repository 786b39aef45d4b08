// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport visibility trigger.
//!
//! [`VisibilityTrigger`] observes one container and exposes a live
//! [`is_intersecting`](VisibilityTrigger::is_intersecting) flag and a sticky
//! [`has_intersected`](VisibilityTrigger::has_intersected) flag.
//!
//! Intersection callbacks can arrive in bursts. Each one overwrites a single
//! pending slot, and the slot is drained on the next frame, so a burst costs
//! one state update per frame.

use alloc::borrow::Cow;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::ConfigError;
use crate::host::{
    ContainerRef, FrameHandle, Host, IntersectionEntry, ObserverHandle, ObserverOptions,
};

/// Intersection threshold configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Threshold {
    /// A single ratio, expanded to `{0, value, 1}` for smoother granularity.
    Scalar(f64),
    /// An explicit set of ratios.
    Set(Vec<f64>),
}

impl Threshold {
    /// Returns the sorted, deduplicated set of ratios to observe.
    #[must_use]
    pub fn expand(&self) -> Vec<f64> {
        let mut values = match self {
            Self::Scalar(v) => vec![0.0, *v, 1.0],
            Self::Set(set) => set.clone(),
        };
        values.sort_by(f64::total_cmp);
        values.dedup();
        values
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let bad = match self {
            Self::Scalar(v) => (!(0.0..=1.0).contains(v)).then_some(*v),
            Self::Set(set) => set.iter().copied().find(|v| !(0.0..=1.0).contains(v)),
        };
        match bad {
            Some(v) => Err(ConfigError::ThresholdOutOfRange(v)),
            None => Ok(()),
        }
    }
}

/// Options for a [`VisibilityTrigger`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct VisibilityOptions {
    /// Ratio(s) at which the host reports changes.
    pub threshold: Threshold,
    /// CSS-style margin around the root.
    pub root_margin: Cow<'static, str>,
    /// Once visible, stay visible and stop observing.
    pub trigger_once: bool,
    /// Never observe; the trigger stays invisible.
    pub skip: bool,
}

impl VisibilityOptions {
    /// 10% threshold, no margin, one-shot.
    pub const DEFAULT: Self = Self {
        threshold: Threshold::Scalar(0.1),
        root_margin: Cow::Borrowed("0px"),
        trigger_once: true,
        skip: false,
    };

    /// Checks that every threshold lies in `0..=1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold.validate()
    }

    fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            thresholds: self.threshold.expand(),
            root_margin: self.root_margin.to_string(),
        }
    }
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visibility state committed by [`VisibilityTrigger::on_frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityChange {
    /// Live visibility after the commit.
    pub is_intersecting: bool,
    /// Sticky visibility after the commit.
    pub has_intersected: bool,
}

/// Observes a container's entry into the viewport.
#[derive(Debug)]
pub struct VisibilityTrigger {
    options: VisibilityOptions,
    container: Option<ContainerRef>,
    observer: Option<ObserverHandle>,
    pending_entry: Option<IntersectionEntry>,
    drain_frame: Option<FrameHandle>,
    is_intersecting: bool,
    has_intersected: bool,
    entry: Option<IntersectionEntry>,
}

impl VisibilityTrigger {
    /// Creates a detached trigger.
    #[must_use]
    pub fn new(options: VisibilityOptions) -> Self {
        Self {
            options,
            container: None,
            observer: None,
            pending_entry: None,
            drain_frame: None,
            is_intersecting: false,
            has_intersected: false,
            entry: None,
        }
    }

    /// Starts observing `container`, replacing any previous observation.
    ///
    /// With [`VisibilityOptions::skip`] set, nothing is observed. If the host
    /// cannot observe, the trigger simply never fires.
    pub fn attach(&mut self, container: ContainerRef, host: &mut dyn Host) {
        self.detach(host);
        self.container = Some(container);
        if self.options.skip {
            return;
        }
        self.observer = host.observe_intersection(container, &self.options.observer_options());
        if self.observer.is_none() {
            tracing::warn!(?container, "intersection observation unavailable");
        }
    }

    /// Disconnects the observer and cancels any in-flight drain frame.
    ///
    /// Committed visibility is kept; a re-attach starts from it.
    pub fn detach(&mut self, host: &mut dyn Host) {
        if let Some(observer) = self.observer.take() {
            host.disconnect_observer(observer);
        }
        if let Some(frame) = self.drain_frame.take() {
            host.cancel_frame(frame);
        }
        self.pending_entry = None;
    }

    /// Clears committed visibility, e.g. when the observed content is replaced.
    pub fn reset(&mut self) {
        self.is_intersecting = false;
        self.has_intersected = false;
        self.entry = None;
    }

    /// Stores an intersection record in the pending slot and makes sure a
    /// drain frame is outstanding. Returns `false` if the observer is not ours.
    pub fn on_intersection(
        &mut self,
        observer: ObserverHandle,
        entry: IntersectionEntry,
        host: &mut dyn Host,
    ) -> bool {
        if self.observer != Some(observer) {
            return false;
        }
        self.pending_entry = Some(entry);
        if self.drain_frame.is_none() {
            self.drain_frame = Some(host.request_frame());
        }
        true
    }

    /// Drains the pending slot if `handle` is our drain frame.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        host: &mut dyn Host,
    ) -> Option<VisibilityChange> {
        if self.drain_frame != Some(handle) {
            return None;
        }
        self.drain_frame = None;
        let entry = self.pending_entry.take()?;

        self.entry = Some(entry);
        self.is_intersecting = entry.is_intersecting;
        if self.options.trigger_once {
            self.has_intersected |= entry.is_intersecting;
            if self.has_intersected
                && let Some(observer) = self.observer.take()
            {
                host.disconnect_observer(observer);
            }
        } else {
            self.has_intersected = entry.is_intersecting;
        }

        Some(VisibilityChange {
            is_intersecting: self.is_intersecting,
            has_intersected: self.has_intersected,
        })
    }

    /// Live visibility.
    #[must_use]
    pub fn is_intersecting(&self) -> bool {
        self.is_intersecting
    }

    /// Sticky visibility (with `trigger_once`), otherwise mirrors
    /// [`is_intersecting`](Self::is_intersecting).
    #[must_use]
    pub fn has_intersected(&self) -> bool {
        self.has_intersected
    }

    /// The last committed raw record.
    #[must_use]
    pub fn entry(&self) -> Option<IntersectionEntry> {
        self.entry
    }

    /// The observed container, once attached.
    #[must_use]
    pub fn container(&self) -> Option<ContainerRef> {
        self.container
    }

    /// Whether an observation or drain frame is outstanding.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer.is_some() || self.drain_frame.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostEvent;
    use crate::manual::ManualHost;
    use crate::time::Duration;

    fn drive(trigger: &mut VisibilityTrigger, host: &mut ManualHost, by: Duration) -> u32 {
        let mut commits = 0;
        let until = host.now() + by;
        host.run_until(until, |host, event| match event {
            HostEvent::Intersection { observer, entry } => {
                let _ = trigger.on_intersection(observer, entry, host);
            }
            HostEvent::Frame { handle, .. } => {
                if trigger.on_frame(handle, host).is_some() {
                    commits += 1;
                }
            }
            _ => {}
        });
        commits
    }

    #[test]
    fn scalar_threshold_expands_to_three_points() {
        assert_eq!(Threshold::Scalar(0.25).expand(), vec![0.0, 0.25, 1.0]);
        assert_eq!(Threshold::Scalar(1.0).expand(), vec![0.0, 1.0]);
        assert_eq!(
            Threshold::Set(vec![0.5, 0.0, 0.5]).expand(),
            vec![0.0, 0.5],
            "sets are sorted and deduplicated"
        );
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let options = VisibilityOptions {
            threshold: Threshold::Set(vec![0.2, 1.5]),
            ..VisibilityOptions::default()
        };
        assert_eq!(options.validate(), Err(ConfigError::ThresholdOutOfRange(1.5)));
        assert!(VisibilityOptions::default().validate().is_ok());
    }

    #[test]
    fn burst_collapses_to_one_commit() {
        let mut host = ManualHost::new();
        let container = host.create_container_ref();
        let mut trigger = VisibilityTrigger::new(VisibilityOptions::default());
        trigger.attach(container, &mut host);

        host.push_intersection(container, false, 0.0);
        host.push_intersection(container, true, 0.05);
        host.push_intersection(container, true, 0.4);

        let commits = drive(&mut trigger, &mut host, Duration::from_millis(20));
        assert_eq!(commits, 1);
        assert!(trigger.is_intersecting());
        assert!(trigger.has_intersected());
        assert_eq!(trigger.entry().map(|e| e.intersection_ratio), Some(0.4));
    }

    #[test]
    fn trigger_once_is_sticky_and_disconnects() {
        let mut host = ManualHost::new();
        let container = host.create_container_ref();
        let mut trigger = VisibilityTrigger::new(VisibilityOptions::default());
        trigger.attach(container, &mut host);
        assert_eq!(host.active_observers(), 1);

        host.push_intersection(container, true, 1.0);
        drive(&mut trigger, &mut host, Duration::from_millis(20));
        assert!(trigger.has_intersected());
        assert_eq!(host.active_observers(), 0, "one-shot trigger stops observing");

        host.push_intersection(container, false, 0.0);
        drive(&mut trigger, &mut host, Duration::from_millis(20));
        assert!(trigger.has_intersected(), "sticky flag never reverts");
    }

    #[test]
    fn live_mode_follows_intersection() {
        let mut host = ManualHost::new();
        let container = host.create_container_ref();
        let mut trigger = VisibilityTrigger::new(VisibilityOptions {
            trigger_once: false,
            ..VisibilityOptions::default()
        });
        trigger.attach(container, &mut host);

        host.push_intersection(container, true, 1.0);
        drive(&mut trigger, &mut host, Duration::from_millis(20));
        assert!(trigger.has_intersected());

        host.push_intersection(container, false, 0.0);
        drive(&mut trigger, &mut host, Duration::from_millis(20));
        assert!(!trigger.is_intersecting());
        assert!(!trigger.has_intersected());
        assert_eq!(host.active_observers(), 1);
    }

    #[test]
    fn skip_never_observes() {
        let mut host = ManualHost::new();
        let container = host.create_container_ref();
        let mut trigger = VisibilityTrigger::new(VisibilityOptions {
            skip: true,
            ..VisibilityOptions::default()
        });
        trigger.attach(container, &mut host);
        assert_eq!(host.active_observers(), 0);
        assert!(!trigger.is_observing());
    }

    #[test]
    fn missing_primitive_is_a_terminal_state() {
        let mut host = ManualHost::new();
        host.set_intersection_supported(false);
        let container = host.create_container_ref();
        let mut trigger = VisibilityTrigger::new(VisibilityOptions::default());
        trigger.attach(container, &mut host);
        drive(&mut trigger, &mut host, Duration::from_millis(100));
        assert!(!trigger.has_intersected());
    }

    #[test]
    fn detach_cancels_in_flight_frame() {
        let mut host = ManualHost::new();
        let container = host.create_container_ref();
        let mut trigger = VisibilityTrigger::new(VisibilityOptions::default());
        trigger.attach(container, &mut host);

        host.push_intersection(container, true, 1.0);
        // Deliver the intersection but stop before its drain frame runs.
        host.run_until(host.now(), |host, event| {
            if let HostEvent::Intersection { observer, entry } = event {
                let _ = trigger.on_intersection(observer, entry, host);
            }
        });
        assert_eq!(host.pending_tasks(), 1);

        trigger.detach(&mut host);
        assert_eq!(host.pending_tasks(), 0);
        assert_eq!(host.active_observers(), 0);
        assert!(!trigger.has_intersected());
    }
}
