// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch and ctrl+wheel zoom detection.
//!
//! [`ZoomGuard`] turns raw gesture input into a three-phase state machine:
//!
//! ```text
//! Idle --pinch delta > threshold | ctrl+wheel--> Zooming
//! Zooming --touch end | wheel timeout--> Settling
//! Settling --settle timer--> Idle
//! ```
//!
//! Animations should be reduced while zooming and while settling. Re-entering
//! `Zooming` from `Settling` cancels the settle timer.
//!
//! While zooming, the guard runs its own frame loop and averages frame-to-frame
//! deltas over windows of [`ZoomGuardConfig::sample_window`] samples. A window
//! averaging above [`ZoomGuardConfig::frame_time_threshold_ms`] re-asserts the
//! reduce flag and invokes the slow-frame callback.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;

use crate::error::ConfigError;
use crate::host::{FrameHandle, GestureInput, Host, ListenerHandle, TimerHandle};
use crate::queue::SampleWindow;
use crate::time::{Duration, HostTime};

/// Phase of the zoom state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ZoomPhase {
    /// No zoom in progress.
    #[default]
    Idle,
    /// A pinch or ctrl+wheel zoom is in progress.
    Zooming,
    /// The zoom ended recently; animations stay reduced until the timer fires.
    Settling,
}

impl ZoomPhase {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Zooming => "zooming",
            Self::Settling => "settling",
        }
    }
}

impl fmt::Display for ZoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for the [`ZoomGuard`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomGuardConfig {
    /// Change in two-finger distance, in CSS pixels, that counts as a pinch.
    pub pinch_threshold_px: f64,
    /// Quiet time after the last ctrl+wheel event that ends a wheel zoom.
    pub wheel_end_delay: Duration,
    /// Time spent in [`ZoomPhase::Settling`] before returning to idle.
    pub settle_delay: Duration,
    /// Window averages above this many milliseconds count as slow.
    pub frame_time_threshold_ms: f64,
    /// Samples per averaging window.
    pub sample_window: usize,
}

impl ZoomGuardConfig {
    /// 10 px pinch, 100 ms wheel end, 500 ms settle, 60 Hz budget over 10 samples.
    pub const DEFAULT: Self = Self {
        pinch_threshold_px: 10.0,
        wheel_end_delay: Duration::from_millis(100),
        settle_delay: Duration::from_millis(500),
        frame_time_threshold_ms: 16.67,
        sample_window: 10,
    };

    /// Rejects a non-finite or negative pinch threshold and an empty sample
    /// window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pinch_threshold_px.is_finite() || self.pinch_threshold_px < 0.0 {
            return Err(ConfigError::InvalidPinchThreshold(self.pinch_threshold_px));
        }
        if self.sample_window == 0 {
            return Err(ConfigError::ZeroSampleWindow);
        }
        Ok(())
    }
}

impl Default for ZoomGuardConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Snapshot of the guard's externally visible state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomState {
    /// A zoom gesture is in progress.
    pub is_zooming: bool,
    /// Animations should be reduced.
    pub should_reduce_animations: bool,
    /// Current phase.
    pub phase: ZoomPhase,
}

/// A phase change reported by the guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomTransition {
    /// Phase before.
    pub from: ZoomPhase,
    /// Phase after.
    pub to: ZoomPhase,
}

type SlowFrameCallback = Box<dyn FnMut(f64)>;

/// Zoom gesture detector with its own frame-time sampler.
pub struct ZoomGuard {
    config: ZoomGuardConfig,
    phase: ZoomPhase,
    reduce: bool,
    listener: Option<ListenerHandle>,
    pinch_start: Option<f64>,
    wheel_timer: Option<TimerHandle>,
    settle_timer: Option<TimerHandle>,
    frame: Option<FrameHandle>,
    last_frame: Option<HostTime>,
    samples: SampleWindow,
    last_window_ms: Option<f64>,
    on_slow_frames: Option<SlowFrameCallback>,
}

impl fmt::Debug for ZoomGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomGuard")
            .field("phase", &self.phase)
            .field("reduce", &self.reduce)
            .field("listener", &self.listener)
            .field("samples", &self.samples.len())
            .finish_non_exhaustive()
    }
}

impl ZoomGuard {
    /// Creates a detached, idle guard.
    #[must_use]
    pub fn new(config: ZoomGuardConfig) -> Self {
        Self {
            phase: ZoomPhase::Idle,
            reduce: false,
            listener: None,
            pinch_start: None,
            wheel_timer: None,
            settle_timer: None,
            frame: None,
            last_frame: None,
            samples: SampleWindow::with_capacity(config.sample_window),
            last_window_ms: None,
            on_slow_frames: None,
            config,
        }
    }

    /// Sets the callback invoked with the window average when zooming frames
    /// run slow.
    pub fn set_slow_frame_callback(&mut self, callback: impl FnMut(f64) + 'static) {
        self.on_slow_frames = Some(Box::new(callback));
    }

    /// Replaces the tuning and discards collected frame samples.
    ///
    /// An attached guard is detached and attached again, so it returns to
    /// idle with fresh listeners. The slow-frame callback is kept.
    pub fn set_config(&mut self, config: ZoomGuardConfig, host: &mut dyn Host) {
        let attached = self.is_attached();
        self.detach(host);
        self.samples = SampleWindow::with_capacity(config.sample_window);
        self.last_window_ms = None;
        self.config = config;
        if attached {
            self.attach(host);
        }
    }

    /// Registers passive touch and wheel listeners.
    pub fn attach(&mut self, host: &mut dyn Host) {
        self.detach(host);
        self.listener = Some(host.listen_gestures());
    }

    /// Removes the listeners and cancels every timer and frame.
    ///
    /// The guard returns to idle.
    pub fn detach(&mut self, host: &mut dyn Host) {
        if let Some(listener) = self.listener.take() {
            host.unlisten_gestures(listener);
        }
        self.cancel_wheel_timer(host);
        self.cancel_settle_timer(host);
        self.stop_sampling(host);
        self.pinch_start = None;
        self.phase = ZoomPhase::Idle;
        self.reduce = false;
    }

    /// Handles gesture input from our listeners.
    ///
    /// Returns the phase change it caused, if any. Input from other
    /// listeners is ignored.
    pub fn on_gesture(
        &mut self,
        listener: ListenerHandle,
        input: &GestureInput,
        host: &mut dyn Host,
    ) -> Option<ZoomTransition> {
        if self.listener != Some(listener) {
            return None;
        }
        match input {
            GestureInput::TouchStart(points) => {
                self.pinch_start = pinch_distance(points);
                None
            }
            GestureInput::TouchMove(points) => {
                let distance = pinch_distance(points)?;
                let Some(start) = self.pinch_start else {
                    self.pinch_start = Some(distance);
                    return None;
                };
                if (distance - start).abs() > self.config.pinch_threshold_px {
                    self.enter_zooming(host)
                } else {
                    None
                }
            }
            GestureInput::TouchEnd(remaining) => {
                if remaining.len() >= 2 {
                    return None;
                }
                self.pinch_start = None;
                if self.phase == ZoomPhase::Zooming && self.wheel_timer.is_none() {
                    self.begin_settling(host)
                } else {
                    None
                }
            }
            GestureInput::Wheel { ctrl_key: false } => None,
            GestureInput::Wheel { ctrl_key: true } => {
                let transition = self.enter_zooming(host);
                self.cancel_wheel_timer(host);
                self.wheel_timer = Some(host.set_timeout(self.config.wheel_end_delay));
                transition
            }
        }
    }

    /// Handles the wheel-end and settle timers.
    pub fn on_timer(&mut self, handle: TimerHandle, host: &mut dyn Host) -> Option<ZoomTransition> {
        if self.wheel_timer == Some(handle) {
            self.wheel_timer = None;
            return if self.phase == ZoomPhase::Zooming {
                self.begin_settling(host)
            } else {
                None
            };
        }
        if self.settle_timer == Some(handle) {
            self.settle_timer = None;
            self.reduce = false;
            return self.transition(ZoomPhase::Idle);
        }
        None
    }

    /// Records a frame-to-frame delta while zooming.
    ///
    /// When a window fills and averages above the threshold, the reduce flag
    /// is re-asserted and the slow-frame callback runs with the average.
    /// Returns `false` if the frame is not ours.
    pub fn on_frame(&mut self, handle: FrameHandle, now: HostTime, host: &mut dyn Host) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;

        if let Some(last) = self.last_frame {
            self.samples
                .push(now.saturating_duration_since(last).as_millis_f64());
            if self.samples.is_full() {
                let average = self.samples.mean();
                self.samples.clear();
                self.last_window_ms = Some(average);
                if average > self.config.frame_time_threshold_ms {
                    self.reduce = true;
                    if let Some(callback) = &mut self.on_slow_frames {
                        callback(average);
                    }
                    tracing::trace!(average_ms = average, "slow frames while zooming");
                }
            }
        }
        self.last_frame = Some(now);

        if self.phase == ZoomPhase::Zooming {
            self.frame = Some(host.request_frame());
        }
        true
    }

    /// Average of the last complete sampling window, in milliseconds.
    #[must_use]
    pub fn last_window_ms(&self) -> Option<f64> {
        self.last_window_ms
    }

    /// Whether `listener` is the listener set this guard registered.
    #[must_use]
    pub fn owns_listener(&self, listener: ListenerHandle) -> bool {
        self.listener == Some(listener)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    /// Whether a zoom gesture is in progress.
    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.phase == ZoomPhase::Zooming
    }

    /// Whether animations should be reduced right now.
    #[must_use]
    pub fn should_reduce_animations(&self) -> bool {
        self.reduce
    }

    /// Snapshot of the guard's state.
    #[must_use]
    pub fn state(&self) -> ZoomState {
        ZoomState {
            is_zooming: self.is_zooming(),
            should_reduce_animations: self.reduce,
            phase: self.phase,
        }
    }

    /// Whether listeners are registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    fn enter_zooming(&mut self, host: &mut dyn Host) -> Option<ZoomTransition> {
        self.cancel_settle_timer(host);
        self.reduce = true;
        if self.phase == ZoomPhase::Zooming {
            return None;
        }
        self.samples.clear();
        self.last_frame = None;
        if self.frame.is_none() {
            self.frame = Some(host.request_frame());
        }
        self.transition(ZoomPhase::Zooming)
    }

    fn begin_settling(&mut self, host: &mut dyn Host) -> Option<ZoomTransition> {
        self.cancel_wheel_timer(host);
        self.stop_sampling(host);
        self.cancel_settle_timer(host);
        self.settle_timer = Some(host.set_timeout(self.config.settle_delay));
        self.transition(ZoomPhase::Settling)
    }

    fn transition(&mut self, to: ZoomPhase) -> Option<ZoomTransition> {
        let from = self.phase;
        if from == to {
            return None;
        }
        self.phase = to;
        tracing::debug!(%from, %to, "zoom phase changed");
        Some(ZoomTransition { from, to })
    }

    fn stop_sampling(&mut self, host: &mut dyn Host) {
        if let Some(frame) = self.frame.take() {
            host.cancel_frame(frame);
        }
        self.last_frame = None;
        self.samples.clear();
    }

    fn cancel_wheel_timer(&mut self, host: &mut dyn Host) {
        if let Some(timer) = self.wheel_timer.take() {
            host.clear_timeout(timer);
        }
    }

    fn cancel_settle_timer(&mut self, host: &mut dyn Host) {
        if let Some(timer) = self.settle_timer.take() {
            host.clear_timeout(timer);
        }
    }
}

impl Default for ZoomGuard {
    fn default() -> Self {
        Self::new(ZoomGuardConfig::DEFAULT)
    }
}

fn pinch_distance(points: &[Point]) -> Option<f64> {
    match points {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}
