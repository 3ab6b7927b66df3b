// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Select semantics: option listing, selectedness, and the reset rule.
//!
//! Selectedness is a property rather than an attribute: changing it never
//! produces a [`MutationRecord`](crate::MutationRecord).

use alloc::string::String;
use alloc::vec::Vec;

use crate::document::Document;
use crate::types::{NodeId, Tag};

impl Document {
    /// Options of a select in tree order, including those inside groups.
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|&id| self.tag(id) == Some(&Tag::Option))
            .collect()
    }

    /// Selected options of a select in tree order.
    pub fn selected_options(&self, select: NodeId) -> Vec<NodeId> {
        self.options(select)
            .into_iter()
            .filter(|&id| self.node(id).element.selected)
            .collect()
    }

    /// Index of the first selected option, or `None` when nothing is selected.
    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        self.options(select)
            .iter()
            .position(|&id| self.node(id).element.selected)
    }

    /// Value of the first selected option, or the empty string.
    pub fn select_value(&self, select: NodeId) -> String {
        self.selected_options(select)
            .first()
            .and_then(|&id| self.element(id))
            .map(|e| String::from(e.value()))
            .unwrap_or_default()
    }

    /// Select the first option whose value equals `value` and deselect the rest.
    ///
    /// With no match every option ends up deselected. Returns true on a match.
    pub fn set_value(&mut self, select: NodeId, value: &str) -> bool {
        let mut matched = false;
        for id in self.options(select) {
            let el = &mut self.node_mut(id).element;
            let hit = !matched && el.value() == value;
            el.selected = hit;
            matched |= hit;
        }
        matched
    }

    /// Set the selectedness of an option.
    ///
    /// In a single-select, selecting an option deselects every other one, and
    /// deselecting asks the select for a reset.
    pub fn set_selected(&mut self, option: NodeId, selected: bool) {
        if self.tag(option) != Some(&Tag::Option) {
            return;
        }
        let select = self.owner_select(option);
        let single = select.is_some_and(|s| !self.node(s).element.multiple);
        if single && selected {
            if let Some(select) = select {
                for id in self.options(select) {
                    self.node_mut(id).element.selected = id == option;
                }
            }
            return;
        }
        self.node_mut(option).element.selected = selected;
        if single && let Some(select) = select {
            self.ask_for_reset(select);
        }
    }

    /// The select an option belongs to, directly or through a group.
    pub fn owner_select(&self, option: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(option)?;
        match self.tag(parent)? {
            Tag::Select => Some(parent),
            Tag::OptGroup => self
                .parent_of(parent)
                .filter(|&p| self.tag(p) == Some(&Tag::Select)),
            _ => None,
        }
    }

    /// The group an option sits in, if any.
    pub fn option_group(&self, option: NodeId) -> Option<NodeId> {
        self.parent_of(option)
            .filter(|&p| self.tag(p) == Some(&Tag::OptGroup))
    }

    /// Normalize a single-select: keep only the last selected option, or select
    /// the first enabled one when nothing is selected.
    pub(crate) fn ask_for_reset(&mut self, select: NodeId) {
        if self
            .element(select)
            .is_none_or(|e| e.tag != Tag::Select || e.multiple)
        {
            return;
        }
        let mut first_enabled = None;
        let mut last_selected = None;
        for id in self.options(select) {
            let el = &mut self.node_mut(id).element;
            if el.selected {
                el.selected = false;
                last_selected = Some(id);
            }
            if first_enabled.is_none() && !el.disabled {
                first_enabled = Some(id);
            }
        }
        if let Some(id) = last_selected.or(first_enabled) {
            self.node_mut(id).element.selected = true;
        }
    }

    /// The select that needs a reset after `child` moves in or out of `parent`.
    pub(crate) fn reset_target(&self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        if !matches!(self.tag(child), Some(Tag::Option | Tag::OptGroup)) {
            return None;
        }
        let select = match self.tag(parent)? {
            Tag::Select => parent,
            Tag::OptGroup => self
                .parent_of(parent)
                .filter(|&p| self.tag(p) == Some(&Tag::Select))?,
            _ => return None,
        };
        (!self.node(select).element.multiple).then_some(select)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Document, NodeId, Tag};
    use alloc::vec;
    use alloc::vec::Vec;

    fn option(doc: &mut Document, parent: NodeId, text: &str, value: &str) -> NodeId {
        let o = doc.create_element(Tag::Option);
        doc.set_text(o, text);
        doc.set_value_attr(o, value);
        doc.append_child(parent, o);
        o
    }

    fn select(doc: &mut Document, multiple: bool) -> NodeId {
        let s = doc.create_element(Tag::Select);
        doc.set_multiple(s, multiple);
        doc.append_child(doc.body(), s);
        s
    }

    #[test]
    fn first_inserted_option_is_selected_in_single_mode() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let a = option(&mut doc, s, "A", "a");
        let _b = option(&mut doc, s, "B", "b");
        assert_eq!(doc.selected_options(s), vec![a]);
        assert_eq!(doc.selected_index(s), Some(0));
        assert_eq!(doc.select_value(s), "a");
    }

    #[test]
    fn disabled_options_are_skipped_by_reset() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let a = doc.create_element(Tag::Option);
        doc.set_disabled(a, true);
        doc.append_child(s, a);
        assert!(doc.selected_options(s).is_empty());
        let b = option(&mut doc, s, "B", "b");
        assert_eq!(doc.selected_options(s), vec![b]);
    }

    #[test]
    fn multi_select_has_no_implicit_selection() {
        let mut doc = Document::default();
        let s = select(&mut doc, true);
        let a = option(&mut doc, s, "A", "a");
        let b = option(&mut doc, s, "B", "b");
        assert!(doc.selected_options(s).is_empty());
        doc.set_selected(a, true);
        doc.set_selected(b, true);
        assert_eq!(doc.selected_options(s), vec![a, b]);
        doc.set_selected(a, false);
        assert_eq!(doc.selected_options(s), vec![b]);
    }

    #[test]
    fn set_selected_is_exclusive_in_single_mode() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let _a = option(&mut doc, s, "A", "a");
        let b = option(&mut doc, s, "B", "b");
        doc.set_selected(b, true);
        assert_eq!(doc.selected_options(s), vec![b]);
    }

    #[test]
    fn set_value_without_match_clears_selection() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let _a = option(&mut doc, s, "A", "a");
        let b = option(&mut doc, s, "B", "b");
        assert!(doc.set_value(s, "b"));
        assert_eq!(doc.selected_options(s), vec![b]);
        assert!(!doc.set_value(s, "zzz"));
        assert_eq!(doc.selected_index(s), None);
        assert_eq!(doc.select_value(s), "");
    }

    #[test]
    fn options_include_grouped_entries_in_order() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let a = option(&mut doc, s, "A", "a");
        let g = doc.create_element(Tag::OptGroup);
        doc.set_label(g, "Group");
        doc.append_child(s, g);
        let b = option(&mut doc, g, "B", "b");
        let c = option(&mut doc, s, "C", "c");
        assert_eq!(doc.options(s), vec![a, b, c]);
        assert_eq!(doc.owner_select(b), Some(s));
        assert_eq!(doc.option_group(b), Some(g));
        assert_eq!(doc.option_group(a), None);
    }

    #[test]
    fn removing_selected_option_resets_to_first() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let a = option(&mut doc, s, "A", "a");
        let b = option(&mut doc, s, "B", "b");
        doc.set_selected(b, true);
        doc.remove(b);
        let selected: Vec<NodeId> = doc.selected_options(s);
        assert_eq!(selected, vec![a]);
    }

    #[test]
    fn value_falls_back_to_text() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let o = doc.create_element(Tag::Option);
        doc.set_text(o, "Plain");
        doc.append_child(s, o);
        assert_eq!(doc.select_value(s), "Plain");
    }

    #[test]
    fn selectedness_is_not_observed() {
        let mut doc = Document::default();
        let s = select(&mut doc, false);
        let _a = option(&mut doc, s, "A", "a");
        let b = option(&mut doc, s, "B", "b");
        let obs = doc.observe(s);
        doc.set_selected(b, true);
        doc.set_value(s, "a");
        assert!(doc.take_records(obs).is_empty());
    }
}
