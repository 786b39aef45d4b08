// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered-reveal scheduling for lists of visual items.
//!
//! `stagger_core` decides, for a dynamically sized list, which items are
//! visible, when each one starts animating, how the work is chunked across
//! frames, and how those decisions adapt to measured device performance. It is
//! `no_std` compatible (with `alloc`) and never touches a platform API
//! directly: every primitive goes through the [`Host`](host::Host) trait.
//!
//! # Architecture
//!
//! ```text
//!   Host (frames, timers, observers, media query, gestures)
//!       │ HostEvent
//!       ▼
//!   RevealList::dispatch() ──► VisibilityTrigger ─┐
//!                          ──► FrameMonitor ──────┤
//!                          ──► ZoomGuard ─────────┤ should_animate / is_visible
//!                          ──► StaggerScheduler ◄─┘
//!                                      │
//!                                      ▼
//!                       item_props(index) ──► presentational layer
//! ```
//!
//! **[`reveal`]**: The [`RevealList`](reveal::RevealList) entry point that
//! wires the components for one list.
//!
//! **[`scheduler`]**: Two-level batch scheduler: timed batch releases and a
//! frame-driven commit loop, with per-index props caching.
//!
//! **[`monitor`]**: Rolling frame-time monitor and the "should animate"
//! verdict, plus batch size and stagger delay tuning.
//!
//! **[`visibility`]**: Frame-coalesced viewport visibility trigger.
//!
//! **[`zoom`]**: Pinch and ctrl+wheel zoom detection with its own frame
//! sampler.
//!
//! **[`device`]**: Device tier estimation from hardware hints.
//!
//! **[`animation`]**: Animation configuration and per-item props.
//!
//! **[`host`]**: The host contract, typed handles and [`HostEvent`](host::HostEvent).
//!
//! **[`manual`]**: A deterministic virtual-clock host.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! sequence instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `serde` (disabled by default): Derives `Deserialize`/`Serialize` for the
//!   configuration types.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod device;
pub mod error;
pub mod host;
pub mod manual;
pub mod monitor;
mod queue;
pub mod reveal;
pub mod scheduler;
pub mod time;
pub mod trace;
pub mod visibility;
pub mod zoom;
