// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation configuration and per-item visual parameters.
//!
//! [`AnimationConfig`] is what callers supply; [`ItemProps`] is what the
//! presentational layer consumes for each item: a class list and a style
//! map, applied directly as element attributes.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;
use crate::time::Duration;

/// Class applied to every item.
pub const ITEM_CLASS: &str = "stagger-item";
/// Class applied to items that are not yet revealed.
pub const HIDDEN_CLASS: &str = "stagger-hidden";
/// Class applied when items are shown without animation.
pub const STATIC_CLASS: &str = "stagger-static";
/// Stagger delay classes are clamped to this bucket.
pub const MAX_DELAY_BUCKET: u32 = 9;

/// Default animation duration when none (or zero) is configured.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(600);

/// Every inline style property any [`ItemProps`] variant may set.
///
/// Presenters clear the ones a new props value omits.
pub const STYLE_PROPERTIES: &[&str] = &[
    "opacity",
    "transform",
    "animation-name",
    "animation-duration",
    "animation-timing-function",
    "animation-delay",
    "animation-fill-mode",
    "will-change",
    "--stagger-from-opacity",
    "--stagger-from-transform",
];

/// Vertical offset a slide-in starts from, in CSS pixels.
const SLIDE_OFFSET_PX: u32 = 20;

/// How an item enters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AnimationKind {
    /// Opacity 0 → 1.
    #[default]
    FadeIn,
    /// Opacity 0 → 1 while translating up from 20px below.
    SlideIn,
    /// Opacity 0 → 1 while scaling from 0.9.
    ScaleIn,
}

impl AnimationKind {
    /// The kebab-case name, also used as the CSS animation name suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FadeIn => "fade-in",
            Self::SlideIn => "slide-in",
            Self::ScaleIn => "scale-in",
        }
    }

    /// The transform the item starts from, or `None` for opacity-only kinds.
    #[must_use]
    pub fn initial_transform(self) -> Option<String> {
        match self {
            Self::FadeIn => None,
            Self::SlideIn => Some(format!("translateY({SLIDE_OFFSET_PX}px)")),
            Self::ScaleIn => Some(String::from("scale(0.9)")),
        }
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fade-in" => Ok(Self::FadeIn),
            "slide-in" => Ok(Self::SlideIn),
            "scale-in" => Ok(Self::ScaleIn),
            other => Err(ConfigError::UnknownAnimationKind(other.to_string())),
        }
    }
}

/// A named timing curve.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub enum Easing {
    /// `linear`.
    Linear,
    /// `ease`.
    Ease,
    /// `ease-in`.
    EaseIn,
    /// `ease-out`.
    #[default]
    EaseOut,
    /// `ease-in-out`.
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let Some(args) = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        else {
            return Err(ConfigError::UnknownEasing(trimmed.to_string()));
        };

        let points = args
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::MalformedCubicBezier(trimmed.to_string()))?;
        let [x1, y1, x2, y2] = points[..] else {
            return Err(ConfigError::MalformedCubicBezier(trimmed.to_string()));
        };
        for x in [x1, x2] {
            if !(0.0..=1.0).contains(&x) {
                return Err(ConfigError::CubicBezierOutOfRange(x));
            }
        }
        Ok(Self::CubicBezier(x1, y1, x2, y2))
    }
}

impl TryFrom<String> for Easing {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.to_string()
    }
}

/// Caller-supplied animation parameters.
///
/// `duration_ms` and `stagger_delay_ms` are optional: a missing or zero
/// duration falls back to [`DEFAULT_DURATION`], and a missing or zero stagger
/// delay is computed from device performance and item count.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AnimationConfig {
    /// Entrance style.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: AnimationKind,
    /// Animation length in milliseconds.
    #[cfg_attr(feature = "serde", serde(rename = "duration"))]
    pub duration_ms: Option<u32>,
    /// Timing curve.
    pub easing: Easing,
    /// Delay between consecutive items in milliseconds.
    #[cfg_attr(feature = "serde", serde(rename = "staggerDelay"))]
    pub stagger_delay_ms: Option<u32>,
    /// Delay before the first item in milliseconds.
    #[cfg_attr(feature = "serde", serde(rename = "startDelay"))]
    pub start_delay_ms: u32,
}

impl AnimationConfig {
    /// A config of the given kind with every other field defaulted.
    #[must_use]
    pub fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// The concrete, positive duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self.duration_ms {
            Some(ms) if ms > 0 => Duration::from_millis(u64::from(ms)),
            _ => DEFAULT_DURATION,
        }
    }

    /// The explicit stagger delay, if one was configured.
    #[must_use]
    pub fn explicit_stagger(&self) -> Option<Duration> {
        self.stagger_delay_ms
            .filter(|&ms| ms > 0)
            .map(|ms| Duration::from_millis(u64::from(ms)))
    }

    /// Delay before the first item.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.start_delay_ms))
    }
}

/// The attributes the presentational layer applies to one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemProps {
    /// CSS classes.
    pub class_names: Vec<String>,
    /// Inline style properties.
    pub styles: BTreeMap<&'static str, String>,
    /// The item index these props belong to.
    pub index: u32,
}

impl ItemProps {
    /// The class list joined with spaces, ready for a `class` attribute.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.class_names.join(" ")
    }

    /// Looks up a style property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    /// Props for an item that is not yet revealed.
    #[must_use]
    pub fn hidden(index: u32) -> Self {
        Self {
            class_names: vec![ITEM_CLASS.to_string(), HIDDEN_CLASS.to_string()],
            styles: BTreeMap::from([("opacity", String::from("0"))]),
            index,
        }
    }

    /// Props for an item shown at once, with no transform and no animation.
    #[must_use]
    pub fn immediate(index: u32) -> Self {
        Self {
            class_names: vec![ITEM_CLASS.to_string(), STATIC_CLASS.to_string()],
            styles: BTreeMap::from([
                ("opacity", String::from("1")),
                ("transform", String::from("none")),
            ]),
            index,
        }
    }

    /// Props for a committed item of an animated sequence.
    ///
    /// Its delay is `start_delay + index × stagger`.
    #[must_use]
    pub fn animated(index: u32, config: &AnimationConfig, stagger: Duration) -> Self {
        let kind = config.kind;
        let delay = config
            .start_delay()
            .saturating_add(stagger.saturating_mul(u64::from(index)));
        let bucket = index.min(MAX_DELAY_BUCKET);

        let mut styles = BTreeMap::new();
        styles.insert("animation-name", format!("stagger-{kind}"));
        styles.insert("animation-duration", format!("{}ms", config.duration().as_millis()));
        styles.insert("animation-timing-function", config.easing.to_string());
        styles.insert("animation-delay", format!("{}ms", delay.as_millis()));
        styles.insert("animation-fill-mode", String::from("both"));
        styles.insert("--stagger-from-opacity", String::from("0"));
        let will_change = match kind.initial_transform() {
            Some(transform) => {
                styles.insert("--stagger-from-transform", transform);
                "opacity, transform"
            }
            None => "opacity",
        };
        styles.insert("will-change", String::from(will_change));

        Self {
            class_names: vec![
                ITEM_CLASS.to_string(),
                format!("stagger-{kind}"),
                format!("stagger-delay-{bucket}"),
            ],
            styles,
            index,
        }
    }
}
