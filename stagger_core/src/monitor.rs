// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame performance monitoring.
//!
//! [`FrameMonitor`] keeps a rolling estimate of rendering health and turns it
//! into a single "should animate" verdict, layered on top of the device tier
//! and the reduced-motion preference. It also exposes the tuning helpers the
//! scheduler uses to size batches and stagger delays.
//!
//! # Measurement
//!
//! Once at start and then on every sampling interval, the monitor records the
//! current host time and requests a frame. When the frame runs, the elapsed
//! time is one sample. Samples land in a window bounded at
//! [`MonitorConfig::history_len`]; the oldest sample is dropped on overflow.

use crate::device::{DeviceTier, estimate_tier};
use crate::host::{FrameHandle, Host, TimerHandle, WatchHandle};
use crate::queue::SampleWindow;
use crate::time::{Duration, HostTime};

/// Coarse CPU load derived from the rolling frame-time average.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CpuUsage {
    /// Average at or under the medium threshold.
    Low,
    /// Average above the medium threshold.
    Medium,
    /// Average above the high threshold.
    High,
}

/// Tuning for the [`FrameMonitor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Time between measurements.
    pub sample_interval: Duration,
    /// Maximum number of samples in the rolling window.
    pub history_len: usize,
    /// A sample above this many milliseconds counts as a dropped frame.
    pub frame_budget_ms: f64,
    /// The drop counter resets to zero once it exceeds this value.
    pub drop_count_ceiling: u32,
    /// Averages above this many milliseconds classify CPU usage as high.
    pub high_cpu_ms: f64,
    /// Averages above this many milliseconds classify CPU usage as medium.
    pub medium_cpu_ms: f64,
}

impl MonitorConfig {
    /// Default sampling: every 3 s, 20-sample window, 60 Hz frame budget.
    pub const DEFAULT: Self = Self {
        sample_interval: Duration::from_millis(3_000),
        history_len: 20,
        frame_budget_ms: 16.67,
        drop_count_ceiling: 50,
        high_cpu_ms: 33.0,
        medium_cpu_ms: 20.0,
    };
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rendering health as last measured. Read-only to consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceSnapshot {
    /// Mean of the retained frame-time samples, in milliseconds.
    pub average_frame_time_ms: f64,
    /// Samples that exceeded the frame budget since the last counter reset.
    pub frame_drop_count: u32,
    /// CPU load classification of the average.
    pub cpu_usage: CpuUsage,
    /// Device tier from the latest hardware hints.
    pub device_tier: DeviceTier,
    /// Memory usage ratio `0..=1`, or 0 when unavailable.
    pub memory_usage: f64,
}

impl Default for PerformanceSnapshot {
    fn default() -> Self {
        Self {
            average_frame_time_ms: 0.0,
            frame_drop_count: 0,
            cpu_usage: CpuUsage::Low,
            device_tier: DeviceTier::Medium,
            memory_usage: 0.0,
        }
    }
}

/// A sample recorded by [`FrameMonitor::on_frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
    /// Host time of the measured frame.
    pub time: HostTime,
    /// The measured frame time, in milliseconds.
    pub frame_time_ms: f64,
}

/// Rolling frame-time monitor.
///
/// Call [`start`](Self::start) when the consuming component mounts and
/// [`stop`](Self::stop) when it is torn down; route host events to
/// [`on_timer`](Self::on_timer), [`on_frame`](Self::on_frame) and
/// [`on_reduced_motion`](Self::on_reduced_motion).
#[derive(Debug)]
pub struct FrameMonitor {
    config: MonitorConfig,
    history: SampleWindow,
    snapshot: PerformanceSnapshot,
    reduced_motion: bool,
    interval: Option<TimerHandle>,
    pending_frame: Option<(FrameHandle, HostTime)>,
    watch: Option<WatchHandle>,
}

impl FrameMonitor {
    /// Creates an idle monitor.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            history: SampleWindow::with_capacity(config.history_len),
            snapshot: PerformanceSnapshot::default(),
            reduced_motion: false,
            interval: None,
            pending_frame: None,
            watch: None,
            config,
        }
    }

    /// Grades the device, subscribes to the reduced-motion preference,
    /// registers the sampling interval and takes the first measurement.
    ///
    /// Calling `start` on a running monitor restarts it.
    pub fn start(&mut self, host: &mut dyn Host) {
        self.stop(host);

        self.snapshot.device_tier = estimate_tier(&host.device_hints());
        self.snapshot.memory_usage = host.memory_info().map_or(0.0, |m| m.usage_ratio());

        let (watch, reduce) = host.watch_reduced_motion();
        self.watch = Some(watch);
        self.reduced_motion = reduce;

        self.interval = Some(host.set_interval(self.config.sample_interval));
        self.measure(host);

        tracing::debug!(
            tier = self.snapshot.device_tier.as_str(),
            reduced_motion = reduce,
            "frame monitor started"
        );
    }

    /// Releases the interval, any in-flight frame and the media-query watch.
    pub fn stop(&mut self, host: &mut dyn Host) {
        if let Some(interval) = self.interval.take() {
            host.clear_interval(interval);
        }
        if let Some((frame, _)) = self.pending_frame.take() {
            host.cancel_frame(frame);
        }
        if let Some(watch) = self.watch.take() {
            host.unwatch_reduced_motion(watch);
        }
    }

    /// Returns `true` while the monitor holds any host registration.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some() || self.pending_frame.is_some() || self.watch.is_some()
    }

    /// Handles a timer event. Returns `false` if the handle is not ours.
    pub fn on_timer(&mut self, handle: TimerHandle, host: &mut dyn Host) -> bool {
        if self.interval != Some(handle) {
            return false;
        }
        self.snapshot.device_tier = estimate_tier(&host.device_hints());
        self.snapshot.memory_usage = host.memory_info().map_or(0.0, |m| m.usage_ratio());
        self.measure(host);
        true
    }

    /// Handles a frame event, recording a sample if the frame is ours.
    pub fn on_frame(&mut self, handle: FrameHandle, now: HostTime) -> Option<FrameSample> {
        let (pending, requested_at) = self.pending_frame?;
        if pending != handle {
            return None;
        }
        self.pending_frame = None;

        let frame_time_ms = now.saturating_duration_since(requested_at).as_millis_f64();
        self.record_frame_time(frame_time_ms);
        tracing::trace!(
            frame_time_ms,
            average_ms = self.snapshot.average_frame_time_ms,
            drops = self.snapshot.frame_drop_count,
            "frame sample"
        );
        Some(FrameSample {
            time: now,
            frame_time_ms,
        })
    }

    /// Handles a reduced-motion change. Returns `false` if the watch is not ours.
    pub fn on_reduced_motion(&mut self, watch: WatchHandle, reduce: bool) -> bool {
        if self.watch != Some(watch) {
            return false;
        }
        if self.reduced_motion != reduce {
            tracing::debug!(reduce, "reduced-motion preference changed");
        }
        self.reduced_motion = reduce;
        true
    }

    /// Feeds one frame-time sample, in milliseconds.
    pub fn record_frame_time(&mut self, frame_time_ms: f64) {
        self.history.push(frame_time_ms);

        if frame_time_ms > self.config.frame_budget_ms {
            self.snapshot.frame_drop_count += 1;
            if self.snapshot.frame_drop_count > self.config.drop_count_ceiling {
                self.snapshot.frame_drop_count = 0;
            }
        }

        let average = self.history.mean();
        self.snapshot.average_frame_time_ms = average;
        self.snapshot.cpu_usage = if average > self.config.high_cpu_ms {
            CpuUsage::High
        } else if average > self.config.medium_cpu_ms {
            CpuUsage::Medium
        } else {
            CpuUsage::Low
        };
    }

    /// Overrides the device tier, e.g. from a hint source outside the host.
    pub fn set_device_tier(&mut self, tier: DeviceTier) {
        self.snapshot.device_tier = tier;
    }

    /// Returns the latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PerformanceSnapshot {
        self.snapshot
    }

    /// Number of samples currently in the rolling window.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Whether reduced motion is currently requested.
    #[must_use]
    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Mean frame time under the medium-load threshold with fewer than five
    /// recent drops.
    #[must_use]
    pub fn is_high_performance(&self) -> bool {
        self.snapshot.average_frame_time_ms < self.config.medium_cpu_ms
            && self.snapshot.frame_drop_count < 5
    }

    /// The final animate/don't-animate verdict.
    ///
    /// Reduced motion always wins. Otherwise the requirement tightens as the
    /// device tier drops: low-tier devices need low CPU load and fewer than
    /// three drops, medium-tier devices need non-high load and fewer than ten
    /// drops, and high-tier devices use [`is_high_performance`](Self::is_high_performance).
    #[must_use]
    pub fn should_animate(&self) -> bool {
        if self.reduced_motion {
            return false;
        }
        let s = &self.snapshot;
        match s.device_tier {
            DeviceTier::Low => s.cpu_usage == CpuUsage::Low && s.frame_drop_count < 3,
            DeviceTier::Medium => s.cpu_usage != CpuUsage::High && s.frame_drop_count < 10,
            DeviceTier::High => self.is_high_performance(),
        }
    }

    /// Items per batch for the current device tier.
    #[must_use]
    pub fn optimal_batch_size(&self) -> u32 {
        match self.snapshot.device_tier {
            DeviceTier::Low => 4,
            DeviceTier::Medium => 8,
            DeviceTier::High => 12,
        }
    }

    /// Per-item stagger delay for the current tier and CPU load, rounded up
    /// to whole milliseconds.
    #[must_use]
    pub fn optimal_stagger_delay(&self) -> Duration {
        let base_ms: u64 = match self.snapshot.device_tier {
            DeviceTier::Low => 150,
            DeviceTier::Medium => 100,
            DeviceTier::High => 75,
        };
        // Multipliers 1.5 / 1.2 / 1.0 as exact fractions.
        let (num, den) = match self.snapshot.cpu_usage {
            CpuUsage::High => (3, 2),
            CpuUsage::Medium => (6, 5),
            CpuUsage::Low => (1, 1),
        };
        Duration::from_millis((base_ms * num).div_ceil(den))
    }

    fn measure(&mut self, host: &mut dyn Host) {
        if self.pending_frame.is_some() {
            return;
        }
        let requested_at = host.now();
        self.pending_frame = Some((host.request_frame(), requested_at));
    }
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::DEFAULT)
    }
}
