// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic [`Host`] driven by a virtual clock.
//!
//! `ManualHost` keeps every registration in one queue ordered by due time and
//! registration order. Nothing happens until [`ManualHost::run_until`] is
//! called; it advances the clock task by task and hands each fired
//! registration to the caller as a [`HostEvent`].
//!
//! - Timers fire at `now + delay`; intervals re-arm after each tick.
//! - Frame callbacks fire at the next vsync boundary strictly after the
//!   request, so every frame requested within one interval runs together.
//! - Intersection records, reduced-motion changes and gestures are injected
//!   through the `push_*`/`set_*` hooks and delivered at the current time to
//!   every live registration of the matching kind.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::device::DeviceHints;
use crate::host::{
    ContainerRef, FrameHandle, GestureInput, Host, HostEvent, IntersectionEntry, ListenerHandle,
    MemoryInfo, ObserverHandle, ObserverOptions, TimerHandle, WatchHandle,
};
use crate::time::{Duration, HostTime};

/// Vsync spacing of a 60 Hz display, in microsecond ticks.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration(16_667);

#[derive(Clone, Debug)]
enum Task {
    Frame(FrameHandle),
    Timeout(TimerHandle),
    Interval(TimerHandle, Duration),
    Deliver(HostEvent),
}

/// A virtual-clock host for tests, simulations and replays.
#[derive(Debug)]
pub struct ManualHost {
    now: HostTime,
    frame_interval: Duration,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<(HostTime, u64), Task>,
    observers: BTreeMap<ObserverHandle, ContainerRef>,
    watches: BTreeSet<WatchHandle>,
    listeners: BTreeSet<ListenerHandle>,
    intersection_supported: bool,
    reduced_motion: bool,
    hints: DeviceHints,
    memory: Option<MemoryInfo>,
}

impl ManualHost {
    /// A host at time zero with a 60 Hz frame clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: HostTime(0),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            next_id: 1,
            next_seq: 0,
            queue: BTreeMap::new(),
            observers: BTreeMap::new(),
            watches: BTreeSet::new(),
            listeners: BTreeSet::new(),
            intersection_supported: true,
            reduced_motion: false,
            hints: DeviceHints::default(),
            memory: None,
        }
    }

    /// Sets the vsync spacing. Zero is promoted to one tick.
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Duration(interval.ticks().max(1));
        self
    }

    /// Replaces the hardware hints returned by [`Host::device_hints`].
    pub fn set_device_hints(&mut self, hints: DeviceHints) {
        self.hints = hints;
    }

    /// Replaces the value returned by [`Host::memory_info`].
    pub fn set_memory_info(&mut self, memory: Option<MemoryInfo>) {
        self.memory = memory;
    }

    /// Makes [`Host::observe_intersection`] succeed or return `None`.
    pub fn set_intersection_supported(&mut self, supported: bool) {
        self.intersection_supported = supported;
    }

    /// Changes the reduced-motion preference and notifies every live watch.
    pub fn set_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
        let watches: Vec<_> = self.watches.iter().copied().collect();
        for watch in watches {
            self.push_now(Task::Deliver(HostEvent::ReducedMotion { watch, reduce }));
        }
    }

    /// Queues an intersection record for every observer of `container`.
    pub fn push_intersection(
        &mut self,
        container: ContainerRef,
        is_intersecting: bool,
        ratio: f64,
    ) {
        let entry = IntersectionEntry {
            is_intersecting,
            intersection_ratio: ratio,
            time: self.now,
        };
        let observers: Vec<_> = self
            .observers
            .iter()
            .filter(|&(_, c)| *c == container)
            .map(|(&observer, _)| observer)
            .collect();
        for observer in observers {
            self.push_now(Task::Deliver(HostEvent::Intersection { observer, entry }));
        }
    }

    /// Queues gesture input for every live listener.
    pub fn push_gesture(&mut self, input: GestureInput) {
        let listeners: Vec<_> = self.listeners.iter().copied().collect();
        for listener in listeners {
            self.push_now(Task::Deliver(HostEvent::Gesture {
                listener,
                input: input.clone(),
            }));
        }
    }

    /// Fires every task due at or before `until` in order, then moves the
    /// clock to `until`.
    ///
    /// Tasks registered by `f` are fired too when they fall due in time.
    pub fn run_until<F>(&mut self, until: HostTime, mut f: F)
    where
        F: FnMut(&mut Self, HostEvent),
    {
        while let Some(event) = self.pop_due(until) {
            f(self, event);
        }
        if until > self.now {
            self.now = until;
        }
    }

    /// Due time of the earliest queued task.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Outstanding frame and timer registrations.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.queue
            .values()
            .filter(|task| !matches!(task, Task::Deliver(_)))
            .count()
    }

    /// Live intersection observations.
    #[must_use]
    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }

    /// Live reduced-motion subscriptions.
    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.watches.len()
    }

    /// Live gesture listener sets.
    #[must_use]
    pub fn active_listeners(&self) -> usize {
        self.listeners.len()
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_at(&mut self, due: HostTime, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), task);
    }

    fn push_now(&mut self, task: Task) {
        self.push_at(self.now, task);
    }

    fn next_vsync(&self) -> HostTime {
        let interval = self.frame_interval.ticks();
        HostTime((self.now.ticks() / interval + 1) * interval)
    }

    fn remove_where(&mut self, mut matches: impl FnMut(&Task) -> bool) {
        self.queue.retain(|_, task| !matches(task));
    }

    fn pop_due(&mut self, until: HostTime) -> Option<HostEvent> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let (_, task) = self.queue.pop_first()?;
        if due > self.now {
            self.now = due;
        }
        Some(match task {
            Task::Frame(handle) => HostEvent::Frame { handle, now: due },
            Task::Timeout(handle) => HostEvent::Timer { handle },
            Task::Interval(handle, period) => {
                self.push_at(due.saturating_add(period), Task::Interval(handle, period));
                HostEvent::Timer { handle }
            }
            Task::Deliver(event) => event,
        })
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for ManualHost {
    fn now(&self) -> HostTime {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.alloc_id());
        self.push_at(self.next_vsync(), Task::Frame(handle));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.remove_where(|task| matches!(task, Task::Frame(h) if *h == handle));
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.alloc_id());
        self.push_at(self.now.saturating_add(delay), Task::Timeout(handle));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.remove_where(|task| matches!(task, Task::Timeout(h) if *h == handle));
    }

    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.alloc_id());
        let period = Duration(period.ticks().max(1));
        self.push_at(self.now.saturating_add(period), Task::Interval(handle, period));
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.remove_where(|task| matches!(task, Task::Interval(h, _) if *h == handle));
    }

    fn observe_intersection(
        &mut self,
        container: ContainerRef,
        _options: &ObserverOptions,
    ) -> Option<ObserverHandle> {
        if !self.intersection_supported {
            return None;
        }
        let handle = ObserverHandle(self.alloc_id());
        self.observers.insert(handle, container);
        Some(handle)
    }

    fn disconnect_observer(&mut self, handle: ObserverHandle) {
        self.observers.remove(&handle);
        self.remove_where(|task| {
            matches!(
                task,
                Task::Deliver(HostEvent::Intersection { observer, .. }) if *observer == handle
            )
        });
    }

    fn watch_reduced_motion(&mut self) -> (WatchHandle, bool) {
        let handle = WatchHandle(self.alloc_id());
        self.watches.insert(handle);
        (handle, self.reduced_motion)
    }

    fn unwatch_reduced_motion(&mut self, handle: WatchHandle) {
        self.watches.remove(&handle);
    }

    fn listen_gestures(&mut self) -> ListenerHandle {
        let handle = ListenerHandle(self.alloc_id());
        self.listeners.insert(handle);
        handle
    }

    fn unlisten_gestures(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle);
    }

    fn create_container_ref(&mut self) -> ContainerRef {
        ContainerRef(self.alloc_id())
    }

    fn device_hints(&self) -> DeviceHints {
        self.hints
    }

    fn memory_info(&self) -> Option<MemoryInfo> {
        self.memory
    }
}
