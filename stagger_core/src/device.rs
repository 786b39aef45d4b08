// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device capability estimation.
//!
//! [`estimate_tier`] grades the host into a [`DeviceTier`] from whatever
//! hardware hints the platform exposes. It is pure and cheap, so callers
//! re-run it whenever hints may have changed (network type in particular).

use core::fmt;

/// Coarse classification of host performance capability.
///
/// Ordered so that `Low < Medium < High`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceTier {
    /// Few cores, little memory, or a slow connection.
    Low,
    /// Typical mid-range hardware.
    Medium,
    /// Many cores or plenty of memory.
    High,
}

impl DeviceTier {
    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network effective connection type (`navigator.connection.effectiveType`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectiveConnection {
    /// `slow-2g`.
    Slow2g,
    /// `2g`.
    TwoG,
    /// `3g`.
    ThreeG,
    /// `4g` or better.
    FourG,
}

impl EffectiveConnection {
    /// Parses the platform's effective-type string. Unknown values map to `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "slow-2g" => Some(Self::Slow2g),
            "2g" => Some(Self::TwoG),
            "3g" => Some(Self::ThreeG),
            "4g" => Some(Self::FourG),
            _ => None,
        }
    }

    /// Whether this connection is slow enough to force the low tier.
    #[must_use]
    pub const fn is_slow(self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG)
    }
}

/// Hardware and network hints read from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceHints {
    /// Logical core count (`navigator.hardwareConcurrency`).
    pub logical_cores: u32,
    /// Approximate device memory in GiB, if exposed.
    pub device_memory_gb: Option<f64>,
    /// Network effective type, if exposed.
    pub effective_connection: Option<EffectiveConnection>,
}

impl DeviceHints {
    /// Core count assumed when the platform reports none.
    pub const FALLBACK_CORES: u32 = 4;
}

impl Default for DeviceHints {
    fn default() -> Self {
        Self {
            logical_cores: Self::FALLBACK_CORES,
            device_memory_gb: None,
            effective_connection: None,
        }
    }
}

/// Classifies the host into a [`DeviceTier`].
///
/// - Cores: 8 or more is high, 4 or more is medium, anything less is low.
/// - Memory, when known: 8 GiB or more raises to high; 4 GiB or more lifts a
///   low grade to medium but never lowers the core grade; under 4 GiB forces
///   low.
/// - A `2g`/`slow-2g` connection forces low regardless of everything else.
///
/// Missing hints leave the core-count grade untouched.
#[must_use]
pub fn estimate_tier(hints: &DeviceHints) -> DeviceTier {
    let mut tier = match hints.logical_cores {
        8.. => DeviceTier::High,
        4..=7 => DeviceTier::Medium,
        _ => DeviceTier::Low,
    };

    if let Some(memory) = hints.device_memory_gb.filter(|m| m.is_finite()) {
        tier = if memory >= 8.0 {
            DeviceTier::High
        } else if memory >= 4.0 {
            tier.max(DeviceTier::Medium)
        } else {
            DeviceTier::Low
        };
    }

    if hints.effective_connection.is_some_and(EffectiveConnection::is_slow) {
        tier = DeviceTier::Low;
    }

    tier
}
