// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class-name vocabulary of the synthesized tree.
//!
//! These names are what stylesheets target; they are part of the stable interface.

use tmdropdown_dom::{Document, NodeId};

/// Root container that replaces the source visually.
pub const WRAPPER: &str = "tmDropdown-wrapper";
/// Wrapper of a multiple-selection dropdown.
pub const MULTIPLE: &str = "tmDropdown-multiple";
/// Wrapper while the option list is open.
pub const OPEN: &str = "tmDropdown-open";
/// Wrapper while the option list is open above it.
pub const OPEN_TOP: &str = "tmDropdown-openTop";
/// Current-value display.
pub const CURRENT: &str = "tmDropdown-current";
/// One selected entry in the current display of a multiple-selection dropdown.
pub const CURRENT_ITEM: &str = "tmDropdown-current-item";
/// Option list.
pub const OPTION_LIST: &str = "tmDropdown-ul";
/// Option list while flipped above the wrapper.
pub const OPTION_LIST_TOP: &str = "tmDropdown-ul-top";
/// Option item.
pub const OPTION: &str = "tmDropdown-li";
/// Group item.
pub const GROUP: &str = "tmDropdown-optgroup";
/// Group label.
pub const GROUP_LABEL: &str = "tmDropdown-optgroup-label";
/// Nested option list of a group.
pub const GROUP_OPTIONS: &str = "tmDropdown-optgroup-options";
/// Wrapper while it holds focus.
pub const FOCUSED: &str = "tmDropdown-focused";
/// Selected option item.
pub const SELECTED: &str = "tmDropdown-selected";
/// Disabled option item.
pub const DISABLED: &str = "tmDropdown-disabled";
/// Hovered option item.
pub const HOVER: &str = "tmDropdown-hover";

bitflags::bitflags! {
    /// State classes of an option item.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemState: u8 {
        /// Backed by a selected option.
        const SELECTED = 0b0000_0001;
        /// Backed by a disabled option.
        const DISABLED = 0b0000_0010;
        /// Carries the hover marker.
        const HOVER    = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// State classes of the wrapper.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WrapperState: u8 {
        /// Backed by a multiple-selection source.
        const MULTIPLE = 0b0000_0001;
        /// Option list is open.
        const OPEN     = 0b0000_0010;
        /// Option list is open above the wrapper.
        const OPEN_TOP = 0b0000_0100;
        /// Focus is inside the wrapper.
        const FOCUSED  = 0b0000_1000;
    }
}

const ITEM_CLASSES: [(ItemState, &str); 3] = [
    (ItemState::SELECTED, SELECTED),
    (ItemState::DISABLED, DISABLED),
    (ItemState::HOVER, HOVER),
];

const WRAPPER_CLASSES: [(WrapperState, &str); 4] = [
    (WrapperState::MULTIPLE, MULTIPLE),
    (WrapperState::OPEN, OPEN),
    (WrapperState::OPEN_TOP, OPEN_TOP),
    (WrapperState::FOCUSED, FOCUSED),
];

impl ItemState {
    /// Read the state back from an item's classes.
    pub fn of(doc: &Document, item: NodeId) -> Self {
        ITEM_CLASSES
            .iter()
            .filter(|(_, class)| doc.has_class(item, class))
            .fold(Self::empty(), |acc, (flag, _)| acc | *flag)
    }

    /// Make the item's state classes match `self`.
    pub fn apply(self, doc: &mut Document, item: NodeId) {
        for (flag, class) in ITEM_CLASSES {
            doc.set_class(item, class, self.contains(flag));
        }
    }
}

impl WrapperState {
    /// Make the wrapper's state classes match `self`.
    pub fn apply(self, doc: &mut Document, wrapper: NodeId) {
        for (flag, class) in WRAPPER_CLASSES {
            doc.set_class(wrapper, class, self.contains(flag));
        }
    }
}
