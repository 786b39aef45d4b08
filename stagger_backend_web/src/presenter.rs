// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM application of per-item presentation.
//!
//! Writes [`ItemProps`] onto list item elements. Only the properties in
//! [`STYLE_PROPERTIES`] are touched, so styles the application sets itself
//! survive every update.

use stagger_core::animation::{ItemProps, STYLE_PROPERTIES};
use stagger_core::reveal::RevealList;
use web_sys::HtmlElement;

/// Writes `props` onto `element`.
///
/// The class attribute is replaced wholesale. Managed style properties absent
/// from `props` are removed so a hidden-to-visible transition leaves no stale
/// values behind.
pub fn apply_item_props(element: &HtmlElement, props: &ItemProps) {
    element.set_class_name(&props.class_name());
    let style = element.style();
    for &property in STYLE_PROPERTIES {
        let result = match props.styles.get(property) {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(drop),
        };
        if let Err(error) = result {
            tracing::warn!(property, ?error, "cannot update item style");
        }
    }
}

/// Writes the current props of every item of `list` onto `elements`.
///
/// `elements[i]` is item `i`. Extra elements, or missing ones, are skipped.
pub fn apply_list(elements: &[HtmlElement], list: &RevealList) {
    for (index, element) in (0..list.item_count()).zip(elements) {
        apply_item_props(element, &list.item_props(index));
    }
}
