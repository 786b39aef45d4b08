// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered batch scheduling.
//!
//! [`StaggerScheduler`] owns the per-item [`RevealState`] of one list and
//! moves items from hidden to visible in two levels:
//!
//! - **Release.** Batches of `batch_size` indices, starting at 0, are pushed
//!   onto a pending queue. The first batch is released when the sequence
//!   starts; each further batch is released by a timer `stagger` after the
//!   previous one.
//! - **Commit.** A frame-driven drain pops up to `batch_size` pending indices
//!   per frame and marks them visible, requesting another frame while the
//!   queue is non-empty.
//!
//! Only the first `max_concurrent` items are ever staggered. Items past that
//! ceiling stay hidden on the animated path.
//!
//! The scheduler holds at most one release timer and one drain frame. Both
//! are cancelled before any reset, and events carrying any other handle are
//! ignored.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::animation::{AnimationConfig, ItemProps};
use crate::error::ConfigError;
use crate::host::{FrameHandle, Host, TimerHandle};
use crate::monitor::FrameMonitor;
use crate::time::Duration;
use crate::visibility::VisibilityOptions;

/// Reveal progress of one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RevealState {
    /// Not yet selected, or reset.
    #[default]
    Hidden,
    /// Released in a batch, awaiting its commit frame.
    Pending,
    /// Committed.
    Visible,
}

/// Options controlling whether and how a list is revealed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RevealOptions {
    /// Explicit kill switch. When `false`, items are shown immediately.
    pub enabled: bool,
    /// Items per batch. `None` uses the device-tier default.
    pub batch_size: Option<u32>,
    /// Items past this index are never staggered.
    pub max_concurrent: u32,
    /// How the container's visibility is observed.
    pub visibility: VisibilityOptions,
}

impl RevealOptions {
    /// Enabled, tier-sized batches, at most 20 staggered items.
    pub const DEFAULT: Self = Self {
        enabled: true,
        batch_size: None,
        max_concurrent: 20,
        visibility: VisibilityOptions::DEFAULT,
    };

    /// Rejects zero batch sizes, a zero concurrency ceiling and thresholds
    /// outside `0..=1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == Some(0) {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::ZeroMaxConcurrent);
        }
        self.visibility.validate()
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Concrete batch size and stagger delay of one sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Indices released per batch and committed per frame. Always positive.
    pub batch_size: u32,
    /// Delay between batch releases, and the per-index animation delay step.
    pub stagger: Duration,
}

/// Stagger delay used when no explicit delay is configured, by list length.
#[must_use]
pub fn count_fallback_stagger(item_count: u32) -> Duration {
    let ms = match item_count {
        0..=3 => 150,
        4..=6 => 100,
        7..=12 => 75,
        _ => 50,
    };
    Duration::from_millis(ms)
}

/// Resolves the batch size and stagger delay for a sequence.
///
/// The batch size is the explicit override or the monitor's tier default.
/// The stagger is the explicit delay, else the larger of the monitor's
/// performance-aware delay and [`count_fallback_stagger`].
#[must_use]
pub fn resolve_pacing(
    item_count: u32,
    config: &AnimationConfig,
    options: &RevealOptions,
    monitor: &FrameMonitor,
) -> Pacing {
    let batch_size = options
        .batch_size
        .filter(|&size| size > 0)
        .unwrap_or_else(|| monitor.optimal_batch_size());
    let stagger = config.explicit_stagger().unwrap_or_else(|| {
        monitor
            .optimal_stagger_delay()
            .max(count_fallback_stagger(item_count))
    });
    Pacing {
        batch_size,
        stagger,
    }
}

/// A contiguous run of indices moved by one release or one commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRun {
    /// First index.
    pub first_index: u32,
    /// Number of indices.
    pub count: u32,
}

/// Memoized animated props, one slot per index.
#[derive(Clone, Debug, Default)]
struct PropsCache {
    slots: Vec<Option<ItemProps>>,
}

impl PropsCache {
    fn get(&self, index: u32) -> Option<&ItemProps> {
        self.slots.get(index as usize)?.as_ref()
    }

    fn insert(&mut self, props: ItemProps) {
        let slot = props.index as usize;
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(props);
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Per-list batch scheduler.
#[derive(Debug)]
pub struct StaggerScheduler {
    config: AnimationConfig,
    max_concurrent: u32,
    states: Vec<RevealState>,
    pending: VecDeque<u32>,
    pacing: Option<Pacing>,
    next_release: u32,
    limit: u32,
    release_timer: Option<TimerHandle>,
    drain_frame: Option<FrameHandle>,
    immediate: bool,
    cache: PropsCache,
}

impl StaggerScheduler {
    /// Creates an idle scheduler with every item hidden.
    #[must_use]
    pub fn new(item_count: u32, config: AnimationConfig, max_concurrent: u32) -> Self {
        Self {
            config,
            max_concurrent: max_concurrent.max(1),
            states: vec![RevealState::Hidden; item_count as usize],
            pending: VecDeque::new(),
            pacing: None,
            next_release: 0,
            limit: 0,
            release_timer: None,
            drain_frame: None,
            immediate: false,
            cache: PropsCache::default(),
        }
    }

    /// Starts a fresh sequence and releases the first batch at once.
    ///
    /// Any running sequence is cancelled and every item is reset to hidden
    /// first. Returns the first released batch, or `None` for an empty list.
    pub fn start(&mut self, pacing: Pacing, host: &mut dyn Host) -> Option<IndexRun> {
        self.cancel(host);
        self.reset_items();
        self.immediate = false;
        let pacing = Pacing {
            batch_size: pacing.batch_size.max(1),
            ..pacing
        };
        self.pacing = Some(pacing);
        self.limit = self.item_count().min(self.max_concurrent);
        tracing::debug!(
            items = self.item_count(),
            animated = self.limit,
            batch_size = pacing.batch_size,
            stagger_ms = pacing.stagger.as_millis(),
            "stagger sequence started"
        );
        self.release_batch(host)
    }

    /// Cancels the release timer and the drain frame.
    ///
    /// Item states are left as they are.
    pub fn cancel(&mut self, host: &mut dyn Host) {
        if let Some(timer) = self.release_timer.take() {
            host.clear_timeout(timer);
        }
        if let Some(frame) = self.drain_frame.take() {
            host.cancel_frame(frame);
        }
    }

    /// Applies a new item count and animation config.
    ///
    /// If the count or the animation kind changed, the sequence is cancelled,
    /// every item is reset to hidden, the cache is cleared and `true` is
    /// returned; the caller restarts the sequence. Other config changes only
    /// refresh the cached props of visible items.
    pub fn reconfigure(
        &mut self,
        item_count: u32,
        config: AnimationConfig,
        host: &mut dyn Host,
    ) -> bool {
        let restart = item_count != self.item_count() || config.kind != self.config.kind;
        self.config = config;
        if restart {
            self.states.resize(item_count as usize, RevealState::Hidden);
            self.reset(host);
            tracing::debug!(items = item_count, kind = %config.kind, "stagger sequence reset");
        } else if let Some(pacing) = self.pacing {
            self.cache.clear();
            for index in 0..self.item_count() {
                if self.state(index) == RevealState::Visible {
                    self.cache
                        .insert(ItemProps::animated(index, &self.config, pacing.stagger));
                }
            }
        }
        restart
    }

    /// Cancels pending work and returns every item to hidden, ready for a new
    /// sequence.
    pub fn reset(&mut self, host: &mut dyn Host) {
        self.cancel(host);
        self.reset_items();
        self.pacing = None;
        self.immediate = false;
    }

    /// Cancels pending work and marks every item visible with no animation.
    ///
    /// Returns `false` if the list was already shown this way.
    pub fn show_all_immediately(&mut self, host: &mut dyn Host) -> bool {
        if self.immediate {
            return false;
        }
        self.cancel(host);
        self.pending.clear();
        self.cache.clear();
        self.states.fill(RevealState::Visible);
        self.immediate = true;
        tracing::debug!(items = self.item_count(), "showing items without animation");
        true
    }

    /// Releases the next batch if `handle` is our release timer.
    pub fn on_timer(&mut self, handle: TimerHandle, host: &mut dyn Host) -> Option<IndexRun> {
        if self.release_timer != Some(handle) {
            return None;
        }
        self.release_timer = None;
        self.release_batch(host)
    }

    /// Commits up to one batch of pending indices if `handle` is our drain
    /// frame.
    pub fn on_frame(&mut self, handle: FrameHandle, host: &mut dyn Host) -> Option<IndexRun> {
        if self.drain_frame != Some(handle) {
            return None;
        }
        self.drain_frame = None;
        let pacing = self.pacing?;

        let mut committed: Option<IndexRun> = None;
        for _ in 0..pacing.batch_size {
            let Some(index) = self.pending.pop_front() else {
                break;
            };
            self.states[index as usize] = RevealState::Visible;
            self.cache
                .insert(ItemProps::animated(index, &self.config, pacing.stagger));
            match &mut committed {
                Some(run) => run.count += 1,
                None => {
                    committed = Some(IndexRun {
                        first_index: index,
                        count: 1,
                    });
                }
            }
        }

        if !self.pending.is_empty() {
            self.drain_frame = Some(host.request_frame());
        }
        if let Some(run) = committed {
            tracing::trace!(first = run.first_index, count = run.count, "items committed");
        }
        committed
    }

    /// The props for `index`.
    ///
    /// Static props when shown immediately, hidden props for any index not yet
    /// visible (including out-of-range indices), animated props otherwise.
    #[must_use]
    pub fn item_props(&self, index: u32) -> ItemProps {
        if self.immediate {
            return ItemProps::immediate(index);
        }
        if self.state(index) != RevealState::Visible {
            return ItemProps::hidden(index);
        }
        match (self.cache.get(index), self.pacing) {
            (Some(props), _) => props.clone(),
            (None, Some(pacing)) => ItemProps::animated(index, &self.config, pacing.stagger),
            (None, None) => ItemProps::hidden(index),
        }
    }

    /// The state of `index`; out-of-range indices are hidden.
    #[must_use]
    pub fn state(&self, index: u32) -> RevealState {
        self.states
            .get(index as usize)
            .copied()
            .unwrap_or(RevealState::Hidden)
    }

    /// Number of items in the list.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        u32::try_from(self.states.len()).unwrap_or(u32::MAX)
    }

    /// Number of visible items.
    #[must_use]
    pub fn visible_count(&self) -> u32 {
        let visible = self
            .states
            .iter()
            .filter(|&&s| s == RevealState::Visible)
            .count();
        u32::try_from(visible).unwrap_or(u32::MAX)
    }

    /// Whether a sequence has started or the list was shown immediately.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.pacing.is_some() || self.immediate
    }

    /// Whether items were shown without animation.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    /// Whether the started sequence has nothing left to release or commit.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        if self.immediate {
            return true;
        }
        self.pacing.is_some()
            && self.next_release >= self.limit
            && self.pending.is_empty()
            && self.drain_frame.is_none()
    }

    /// The pacing of the running sequence.
    #[must_use]
    pub fn pacing(&self) -> Option<Pacing> {
        self.pacing
    }

    /// The animation config in effect.
    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Whether a timer or frame is outstanding.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.release_timer.is_some() || self.drain_frame.is_some()
    }

    fn reset_items(&mut self) {
        self.states.fill(RevealState::Hidden);
        self.pending.clear();
        self.cache.clear();
        self.next_release = 0;
        self.limit = 0;
    }

    fn release_batch(&mut self, host: &mut dyn Host) -> Option<IndexRun> {
        let pacing = self.pacing?;
        if self.next_release >= self.limit {
            return None;
        }
        let first = self.next_release;
        let end = first.saturating_add(pacing.batch_size).min(self.limit);
        for index in first..end {
            self.states[index as usize] = RevealState::Pending;
            self.pending.push_back(index);
        }
        self.next_release = end;

        if self.drain_frame.is_none() {
            self.drain_frame = Some(host.request_frame());
        }
        if end < self.limit {
            self.release_timer = Some(host.set_timeout(pacing.stagger));
        }
        tracing::trace!(first, count = end - first, "batch released");
        Some(IndexRun {
            first_index: first,
            count: end - first,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationKind;
    use crate::device::DeviceTier;
    use crate::host::HostEvent;
    use crate::manual::ManualHost;
    use crate::time::HostTime;

    fn pacing(batch_size: u32, stagger_ms: u64) -> Pacing {
        Pacing {
            batch_size,
            stagger: Duration::from_millis(stagger_ms),
        }
    }

    fn run(scheduler: &mut StaggerScheduler, host: &mut ManualHost, until: HostTime) {
        host.run_until(until, |host, event| match event {
            HostEvent::Frame { handle, .. } => {
                let _ = scheduler.on_frame(handle, host);
            }
            HostEvent::Timer { handle } => {
                let _ = scheduler.on_timer(handle, host);
            }
            _ => {}
        });
    }

    #[test]
    fn count_fallback_table() {
        assert_eq!(count_fallback_stagger(3), Duration::from_millis(150));
        assert_eq!(count_fallback_stagger(6), Duration::from_millis(100));
        assert_eq!(count_fallback_stagger(12), Duration::from_millis(75));
        assert_eq!(count_fallback_stagger(13), Duration::from_millis(50));
    }

    #[test]
    fn pacing_prefers_the_larger_automatic_delay() {
        let mut monitor = FrameMonitor::default();
        monitor.set_device_tier(DeviceTier::High);
        let config = AnimationConfig::default();
        let options = RevealOptions::DEFAULT;

        // High tier gives 75 ms; three items fall back to 150 ms.
        let p = resolve_pacing(3, &config, &options, &monitor);
        assert_eq!(p, pacing(12, 150));

        // Forty items fall back to 50 ms, so the tier delay wins.
        let p = resolve_pacing(40, &config, &options, &monitor);
        assert_eq!(p.stagger, Duration::from_millis(75));
    }

    #[test]
    fn explicit_values_override_resolution() {
        let monitor = FrameMonitor::default();
        let config = AnimationConfig {
            stagger_delay_ms: Some(30),
            ..AnimationConfig::default()
        };
        let options = RevealOptions {
            batch_size: Some(2),
            ..RevealOptions::DEFAULT
        };
        assert_eq!(resolve_pacing(100, &config, &options, &monitor), pacing(2, 30));
    }

    #[test]
    fn options_validation() {
        assert!(RevealOptions::DEFAULT.validate().is_ok());
        let zero_batch = RevealOptions {
            batch_size: Some(0),
            ..RevealOptions::DEFAULT
        };
        assert_eq!(zero_batch.validate(), Err(ConfigError::ZeroBatchSize));
        let zero_cap = RevealOptions {
            max_concurrent: 0,
            ..RevealOptions::DEFAULT
        };
        assert_eq!(zero_cap.validate(), Err(ConfigError::ZeroMaxConcurrent));
    }

    #[test]
    fn six_item_fade_commits_in_one_frame() {
        let mut host = ManualHost::new();
        let config = AnimationConfig {
            stagger_delay_ms: Some(150),
            ..AnimationConfig::new(AnimationKind::FadeIn)
        };
        let mut scheduler = StaggerScheduler::new(6, config, 20);

        let released = scheduler.start(pacing(8, 150), &mut host);
        assert_eq!(
            released,
            Some(IndexRun {
                first_index: 0,
                count: 6
            })
        );
        assert!((0..6).all(|i| scheduler.state(i) == RevealState::Pending));

        run(&mut scheduler, &mut host, HostTime::from_millis(17));
        assert_eq!(scheduler.visible_count(), 6);
        assert!(scheduler.is_complete());

        let expected = ["0ms", "150ms", "300ms", "450ms", "600ms", "750ms"];
        for (index, want) in (0..6).zip(expected) {
            let props = scheduler.item_props(index);
            assert_eq!(props.style("animation-delay"), Some(want));
        }
        let first = scheduler.item_props(0);
        let last = scheduler.item_props(5);
        assert_eq!(first.style("animation-duration"), last.style("animation-duration"));
        assert_eq!(
            first.style("animation-timing-function"),
            last.style("animation-timing-function")
        );
    }

    #[test]
    fn batches_release_on_the_stagger_and_commit_in_order() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(10, AnimationConfig::default(), 20);
        scheduler.start(pacing(4, 100), &mut host);

        run(&mut scheduler, &mut host, HostTime::from_millis(20));
        assert_eq!(scheduler.visible_count(), 4);
        assert_eq!(scheduler.state(4), RevealState::Hidden, "second batch waits for its timer");

        run(&mut scheduler, &mut host, HostTime::from_millis(99));
        assert_eq!(scheduler.visible_count(), 4);

        run(&mut scheduler, &mut host, HostTime::from_millis(120));
        assert_eq!(scheduler.visible_count(), 8);
        assert!((0..8).all(|i| scheduler.state(i) == RevealState::Visible));

        run(&mut scheduler, &mut host, HostTime::from_millis(220));
        assert_eq!(scheduler.visible_count(), 10);
        assert!(scheduler.is_complete());
        assert!(!scheduler.is_scheduled());
    }

    #[test]
    fn items_past_the_ceiling_stay_hidden() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(30, AnimationConfig::default(), 20);
        scheduler.start(pacing(10, 50), &mut host);
        run(&mut scheduler, &mut host, HostTime::from_millis(1_000));

        assert!(scheduler.is_complete());
        assert_eq!(scheduler.visible_count(), 20);
        assert_eq!(scheduler.state(25), RevealState::Hidden);
        assert_eq!(scheduler.item_props(25).style("opacity"), Some("0"));
    }

    #[test]
    fn immediate_mode_is_static_for_every_index() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(5, AnimationConfig::default(), 20);
        scheduler.start(pacing(2, 100), &mut host);
        assert!(scheduler.show_all_immediately(&mut host));
        assert_eq!(host.pending_tasks(), 0, "pending work is cancelled");
        assert!(!scheduler.show_all_immediately(&mut host));

        let props: Vec<_> = (0..5).map(|i| scheduler.item_props(i)).collect();
        for (i, p) in props.iter().enumerate() {
            assert_eq!(p.index as usize, i);
            assert_eq!(p.class_names, props[0].class_names);
            assert_eq!(p.styles, props[0].styles);
            assert_eq!(p.style("transform"), Some("none"));
        }
        assert!(scheduler.is_complete());
    }

    #[test]
    fn kind_change_resets_everything() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(4, AnimationConfig::default(), 20);
        scheduler.start(pacing(4, 100), &mut host);
        run(&mut scheduler, &mut host, HostTime::from_millis(20));
        assert_eq!(scheduler.visible_count(), 4);

        let restart = scheduler.reconfigure(
            4,
            AnimationConfig::new(AnimationKind::ScaleIn),
            &mut host,
        );
        assert!(restart);
        assert_eq!(scheduler.visible_count(), 0);
        assert!(!scheduler.has_started());
        assert_eq!(scheduler.item_props(0).style("opacity"), Some("0"));
    }

    #[test]
    fn duration_change_refreshes_cache_without_restart() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(2, AnimationConfig::default(), 20);
        scheduler.start(pacing(2, 100), &mut host);
        run(&mut scheduler, &mut host, HostTime::from_millis(20));

        let restart = scheduler.reconfigure(
            2,
            AnimationConfig {
                duration_ms: Some(250),
                ..AnimationConfig::default()
            },
            &mut host,
        );
        assert!(!restart);
        assert_eq!(scheduler.visible_count(), 2);
        assert_eq!(
            scheduler.item_props(1).style("animation-duration"),
            Some("250ms")
        );
    }

    #[test]
    fn count_change_mid_sequence_cancels_pending_work() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(12, AnimationConfig::default(), 20);
        scheduler.start(pacing(4, 100), &mut host);
        run(&mut scheduler, &mut host, HostTime::from_millis(20));
        assert!(scheduler.is_scheduled());

        assert!(scheduler.reconfigure(3, AnimationConfig::default(), &mut host));
        assert!(!scheduler.is_scheduled());
        assert_eq!(host.pending_tasks(), 0);
        assert_eq!(scheduler.item_count(), 3);
        assert_eq!(scheduler.visible_count(), 0);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(8, AnimationConfig::default(), 20);
        scheduler.start(pacing(4, 100), &mut host);
        let stray_frame = host.request_frame();
        let stray_timer = host.set_timeout(Duration::from_millis(1));
        assert_eq!(scheduler.on_frame(stray_frame, &mut host), None);
        assert_eq!(scheduler.on_timer(stray_timer, &mut host), None);
        assert_eq!(scheduler.visible_count(), 0);
    }

    #[test]
    fn empty_list_completes_at_once() {
        let mut host = ManualHost::new();
        let mut scheduler = StaggerScheduler::new(0, AnimationConfig::default(), 20);
        assert_eq!(scheduler.start(pacing(4, 100), &mut host), None);
        assert!(scheduler.is_complete());
        assert_eq!(host.pending_tasks(), 0);
    }
}
