// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthesizes the dropdown tree from a source select.
//!
//! ```text
//! div.tmDropdown-wrapper
//! ├── a.tmDropdown-current            (selected text, placeholder, or empty text)
//! │   └── div.tmDropdown-current-item (multiple-selection only, one per selected option)
//! └── ul.tmDropdown-ul
//!     ├── li.tmDropdown-li
//!     └── li.tmDropdown-optgroup
//!         ├── div.tmDropdown-optgroup-label
//!         └── ul.tmDropdown-optgroup-options
//!             └── li.tmDropdown-li
//! ```
//!
//! The builder only reads the source. Item → option back-references are kept in
//! maps next to the tree instead of on the nodes.

use alloc::string::String;
use hashbrown::HashMap;
use tmdropdown_dom::{Document, NodeId, Tag};

use crate::classes::{self, ItemState, WrapperState};

/// Inputs the builder needs besides the source.
#[derive(Clone, Debug)]
pub(crate) struct BuildParams<'a> {
    pub(crate) placeholder: &'a str,
    pub(crate) empty_text: &'a str,
    pub(crate) width: &'a str,
    pub(crate) wrapper_class: &'a str,
    /// Source option that carries the hover marker.
    pub(crate) hovered: Option<NodeId>,
}

/// A freshly built, detached tree.
#[derive(Clone, Debug)]
pub(crate) struct Built {
    pub(crate) wrapper: NodeId,
    pub(crate) current: NodeId,
    pub(crate) list: NodeId,
    /// Option item → source option.
    pub(crate) items: HashMap<NodeId, NodeId>,
    /// Current item → source option.
    pub(crate) current_items: HashMap<NodeId, NodeId>,
}

impl Built {
    /// Item backed by `option`.
    pub(crate) fn item_for(&self, option: NodeId) -> Option<NodeId> {
        self.items
            .iter()
            .find_map(|(&item, &o)| (o == option).then_some(item))
    }
}

/// Number of entries (options and groups) directly under the source.
pub(crate) fn entry_count(doc: &Document, source: NodeId) -> usize {
    doc.children_of(source)
        .iter()
        .filter(|&&c| matches!(doc.tag(c), Some(Tag::Option | Tag::OptGroup)))
        .count()
}

pub(crate) fn build(doc: &mut Document, source: NodeId, params: &BuildParams<'_>) -> Built {
    let multiple = doc.element(source).is_some_and(|e| e.is_multiple());
    let mut built = Built {
        wrapper: doc.create_element(Tag::Div),
        current: doc.create_element(Tag::Anchor),
        list: doc.create_element(Tag::Ul),
        items: HashMap::new(),
        current_items: HashMap::new(),
    };

    build_current(doc, source, multiple, params, &mut built);
    build_list(doc, source, params, &mut built);

    let wrapper = built.wrapper;
    doc.add_class(wrapper, classes::WRAPPER);
    for class in params.wrapper_class.split_whitespace() {
        doc.add_class(wrapper, class);
    }
    let state = if multiple {
        WrapperState::MULTIPLE
    } else {
        WrapperState::empty()
    };
    state.apply(doc, wrapper);
    let width = if entry_count(doc, source) > 0 {
        params.width
    } else {
        "auto"
    };
    doc.set_style(wrapper, "width", width);
    doc.append_child(wrapper, built.current);
    doc.append_child(wrapper, built.list);
    built
}

fn build_current(
    doc: &mut Document,
    source: NodeId,
    multiple: bool,
    params: &BuildParams<'_>,
    built: &mut Built,
) {
    let current = built.current;
    doc.add_class(current, classes::CURRENT);
    let tab_index = doc.element(source).map_or(-1, |e| e.tab_index());
    doc.set_tab_index(current, tab_index);

    let selected = doc.selected_options(source);
    if multiple && !selected.is_empty() {
        for option in selected {
            let item = doc.create_element(Tag::Div);
            doc.add_class(item, classes::CURRENT_ITEM);
            let text = doc.text_content(option);
            doc.set_text(item, &text);
            doc.append_child(current, item);
            built.current_items.insert(item, option);
        }
        return;
    }
    let text: String = match selected.first() {
        Some(&option) if !multiple => doc.text_content(option),
        _ if doc.options(source).is_empty() => params.empty_text.into(),
        _ => params.placeholder.into(),
    };
    doc.set_text(current, &text);
}

fn build_list(doc: &mut Document, source: NodeId, params: &BuildParams<'_>, built: &mut Built) {
    let list = built.list;
    doc.add_class(list, classes::OPTION_LIST);
    for child in doc.children_of(source).to_vec() {
        match doc.tag(child) {
            Some(Tag::Option) => {
                let li = build_option(doc, child, params, built);
                doc.append_child(list, li);
            }
            Some(Tag::OptGroup) => {
                let li = build_group(doc, child, params, built);
                doc.append_child(list, li);
            }
            _ => {}
        }
    }
}

fn build_option(
    doc: &mut Document,
    option: NodeId,
    params: &BuildParams<'_>,
    built: &mut Built,
) -> NodeId {
    let li = doc.create_element(Tag::Li);
    doc.add_class(li, classes::OPTION);
    let text = doc.text_content(option);
    doc.set_text(li, &text);

    let mut state = ItemState::empty();
    if let Some(e) = doc.element(option) {
        state.set(ItemState::SELECTED, e.is_selected());
        state.set(ItemState::DISABLED, e.is_disabled());
    }
    state.set(ItemState::HOVER, params.hovered == Some(option));
    state.apply(doc, li);

    built.items.insert(li, option);
    li
}

fn build_group(
    doc: &mut Document,
    group: NodeId,
    params: &BuildParams<'_>,
    built: &mut Built,
) -> NodeId {
    let li = doc.create_element(Tag::Li);
    doc.add_class(li, classes::GROUP);

    let label = doc.create_element(Tag::Div);
    doc.add_class(label, classes::GROUP_LABEL);
    let text = doc.element(group).map(|e| String::from(e.label())).unwrap_or_default();
    doc.set_text(label, &text);

    let ul = doc.create_element(Tag::Ul);
    doc.add_class(ul, classes::GROUP_OPTIONS);
    for option in doc.children_of(group).to_vec() {
        if doc.tag(option) == Some(&Tag::Option) {
            let item = build_option(doc, option, params, built);
            doc.append_child(ul, item);
        }
    }

    doc.append_child(li, label);
    doc.append_child(li, ul);
    li
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const PARAMS: BuildParams<'static> = BuildParams {
        placeholder: "Pick one",
        empty_text: "Nothing here",
        width: "120px",
        wrapper_class: "theme dark",
        hovered: None,
    };

    fn source(doc: &mut Document, multiple: bool) -> NodeId {
        let s = doc.create_element(Tag::Select);
        doc.set_multiple(s, multiple);
        doc.append_child(doc.body(), s);
        s
    }

    fn option(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
        let o = doc.create_element(Tag::Option);
        doc.set_text(o, text);
        doc.append_child(parent, o);
        o
    }

    fn item_classes(doc: &Document, list: NodeId) -> Vec<ItemState> {
        doc.descendants(list)
            .into_iter()
            .filter(|&n| doc.has_class(n, classes::OPTION))
            .map(|n| ItemState::of(doc, n))
            .collect()
    }

    #[test]
    fn single_select_shows_selected_text() {
        let mut doc = Document::default();
        let s = source(&mut doc, false);
        let _a = option(&mut doc, s, "A");
        let b = option(&mut doc, s, "B");
        doc.set_selected(b, true);

        let built = build(&mut doc, s, &PARAMS);
        assert_eq!(doc.text_content(built.current), "B");
        assert_eq!(
            item_classes(&doc, built.list),
            [ItemState::empty(), ItemState::SELECTED]
        );
        assert_eq!(doc.parent_of(built.wrapper), None, "tree is detached");
        assert_eq!(built.items.get(&built.item_for(b).unwrap()), Some(&b));
    }

    #[test]
    fn empty_source_uses_empty_text_and_auto_width() {
        let mut doc = Document::default();
        let s = source(&mut doc, false);
        let built = build(&mut doc, s, &PARAMS);
        assert_eq!(doc.text_content(built.current), "Nothing here");
        assert_eq!(doc.style(built.wrapper, "width"), Some("auto"));
        assert!(doc.children_of(built.list).is_empty());
    }

    #[test]
    fn multiple_without_selection_shows_placeholder() {
        let mut doc = Document::default();
        let s = source(&mut doc, true);
        option(&mut doc, s, "A");
        let built = build(&mut doc, s, &PARAMS);
        assert_eq!(doc.text_content(built.current), "Pick one");
        assert!(doc.has_class(built.wrapper, classes::MULTIPLE));
        assert_eq!(doc.style(built.wrapper, "width"), Some("120px"));
    }

    #[test]
    fn multiple_lists_each_selected_option_in_current() {
        let mut doc = Document::default();
        let s = source(&mut doc, true);
        let a = option(&mut doc, s, "A");
        let _b = option(&mut doc, s, "B");
        let c = option(&mut doc, s, "C");
        doc.set_selected(a, true);
        doc.set_selected(c, true);

        let built = build(&mut doc, s, &PARAMS);
        let shown: Vec<String> = doc
            .children_of(built.current)
            .iter()
            .map(|&n| doc.text_content(n))
            .collect();
        assert_eq!(shown, ["A", "C"]);
        let backing: Vec<NodeId> = doc
            .children_of(built.current)
            .iter()
            .map(|n| built.current_items[n])
            .collect();
        assert_eq!(backing, [a, c]);
    }

    #[test]
    fn groups_nest_label_and_options() {
        let mut doc = Document::default();
        let s = source(&mut doc, false);
        let g = doc.create_element(Tag::OptGroup);
        doc.set_label(g, "Fruit");
        doc.append_child(s, g);
        let apple = doc.create_element(Tag::Option);
        doc.set_text(apple, "Apple");
        doc.set_disabled(apple, true);
        doc.append_child(g, apple);
        // First enabled option is selected by the reset rule.
        let _pear = option(&mut doc, g, "Pear");

        let built = build(&mut doc, s, &PARAMS);
        let group = doc.first_child(built.list).unwrap();
        assert!(doc.has_class(group, classes::GROUP));
        let [label, nested] = doc.children_of(group) else {
            panic!("group item has a label and a nested list");
        };
        assert!(doc.has_class(*label, classes::GROUP_LABEL));
        assert_eq!(doc.text_content(*label), "Fruit");
        assert!(doc.has_class(*nested, classes::GROUP_OPTIONS));
        assert_eq!(
            item_classes(&doc, built.list),
            [ItemState::DISABLED, ItemState::SELECTED]
        );
    }

    #[test]
    fn wrapper_carries_extra_classes_and_hover() {
        let mut doc = Document::default();
        let s = source(&mut doc, false);
        let a = option(&mut doc, s, "A");
        let params = BuildParams {
            hovered: Some(a),
            ..PARAMS
        };
        let built = build(&mut doc, s, &params);
        assert!(doc.has_class(built.wrapper, "theme"));
        assert!(doc.has_class(built.wrapper, "dark"));
        assert_eq!(
            item_classes(&doc, built.list),
            [ItemState::SELECTED | ItemState::HOVER]
        );
    }

    #[test]
    fn builder_does_not_mutate_source() {
        let mut doc = Document::default();
        let s = source(&mut doc, false);
        option(&mut doc, s, "A");
        let obs = doc.observe(s);
        let _ = build(&mut doc, s, &PARAMS);
        assert!(doc.take_records(obs).is_empty());
    }
}
