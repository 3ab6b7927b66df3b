// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration: option keys, process-wide defaults, and per-instance overrides.

use alloc::string::String;
use core::fmt;
use hashbrown::HashMap;

use crate::hooks::Hooks;

/// A recognized option.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Close the list on page scroll instead of repositioning it.
    CloseOnScroll,
    /// Current-display text when the source has no options.
    EmptyText,
    /// Current-display text when nothing is selected.
    Placeholder,
    /// Wrapper width as a CSS length.
    Width,
    /// Extra class names for the wrapper.
    WrapperClass,
    /// Rebuild when the source is mutated externally.
    Observe,
}

impl OptionKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CloseOnScroll,
        Self::EmptyText,
        Self::Placeholder,
        Self::Width,
        Self::WrapperClass,
        Self::Observe,
    ];

    /// External name of the key.
    pub fn name(self) -> &'static str {
        match self {
            Self::CloseOnScroll => "closeOnScroll",
            Self::EmptyText => "emptyText",
            Self::Placeholder => "placeholder",
            Self::Width => "width",
            Self::WrapperClass => "wrapperClass",
            Self::Observe => "observe",
        }
    }

    /// Look a key up by its external name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Parse a textual value for this key. Boolean keys accept `true` and `false`.
    pub fn parse_value(self, raw: &str) -> Option<OptionValue> {
        match self {
            Self::CloseOnScroll | Self::Observe => match raw {
                "true" => Some(OptionValue::Bool(true)),
                "false" => Some(OptionValue::Bool(false)),
                _ => None,
            },
            _ => Some(OptionValue::Text(raw.into())),
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An option value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    /// A flag.
    Bool(bool),
    /// A text or CSS value.
    Text(String),
}

impl OptionValue {
    /// The flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Bool(_) => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Default close-on-scroll policy.
pub const DEFAULT_CLOSE_ON_SCROLL: bool = true;
/// Default empty text.
pub const DEFAULT_EMPTY_TEXT: &str = "No options available";
/// Default placeholder.
pub const DEFAULT_PLACEHOLDER: &str = "";
/// Default extra wrapper class.
pub const DEFAULT_WRAPPER_CLASS: &str = "";
/// Default observation policy.
pub const DEFAULT_OBSERVE: bool = false;

/// Process-wide default for `key`.
///
/// `width` has no default; it falls back to the source's measured width.
pub fn default_value(key: OptionKey) -> Option<OptionValue> {
    match key {
        OptionKey::CloseOnScroll => Some(OptionValue::Bool(DEFAULT_CLOSE_ON_SCROLL)),
        OptionKey::EmptyText => Some(DEFAULT_EMPTY_TEXT.into()),
        OptionKey::Placeholder => Some(DEFAULT_PLACEHOLDER.into()),
        OptionKey::Width => None,
        OptionKey::WrapperClass => Some(DEFAULT_WRAPPER_CLASS.into()),
        OptionKey::Observe => Some(OptionValue::Bool(DEFAULT_OBSERVE)),
    }
}

/// Per-instance configuration: option overrides plus lifecycle hooks.
///
/// Cloning is cheap; hooks are reference-counted, so one record can configure a
/// whole collection of dropdowns.
///
/// ```
/// use tmdropdown::{Hook, OptionKey, OptionValue, Options};
///
/// let options = Options::new()
///     .with(OptionKey::EmptyText, "Nothing here")
///     .with(OptionKey::CloseOnScroll, false)
///     .on_before_close(|_| Hook::Cancel);
///
/// assert_eq!(options.get(OptionKey::EmptyText), Some(OptionValue::from("Nothing here")));
/// assert_eq!(options.get(OptionKey::Observe), Some(OptionValue::Bool(false)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Options {
    overrides: HashMap<OptionKey, OptionValue>,
    pub(crate) hooks: Hooks,
}

impl Options {
    /// Options with no overrides and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style override.
    pub fn with(mut self, key: OptionKey, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Override `key` for this instance only.
    pub fn set(&mut self, key: OptionKey, value: impl Into<OptionValue>) {
        self.overrides.insert(key, value.into());
    }

    /// Instance override, else default.
    pub fn get(&self, key: OptionKey) -> Option<OptionValue> {
        self.overrides
            .get(&key)
            .cloned()
            .or_else(|| default_value(key))
    }

    /// Flag value of a boolean key; non-boolean values read as the key's default.
    pub fn flag(&self, key: OptionKey) -> bool {
        self.get(key)
            .and_then(|v| v.as_bool())
            .or_else(|| default_value(key).and_then(|v| v.as_bool()))
            .unwrap_or(false)
    }

    /// Text value of a key, or the empty string.
    pub fn text(&self, key: OptionKey) -> String {
        match self.get(key) {
            Some(OptionValue::Text(t)) => t,
            _ => String::new(),
        }
    }

    /// Lifecycle hooks.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_overrides() {
        let options = Options::new();
        assert!(options.flag(OptionKey::CloseOnScroll));
        assert!(!options.flag(OptionKey::Observe));
        assert_eq!(options.text(OptionKey::EmptyText), "No options available");
        assert_eq!(options.text(OptionKey::Placeholder), "");
        assert_eq!(options.get(OptionKey::Width), None);
    }

    #[test]
    fn instance_override_wins_and_defaults_are_untouched() {
        let mut a = Options::new();
        a.set(OptionKey::EmptyText, "Nothing here");
        let b = Options::new();
        assert_eq!(a.text(OptionKey::EmptyText), "Nothing here");
        assert_eq!(b.text(OptionKey::EmptyText), DEFAULT_EMPTY_TEXT);
    }

    #[test]
    fn mistyped_flag_reads_as_default() {
        let options = Options::new().with(OptionKey::CloseOnScroll, "yes");
        assert!(options.flag(OptionKey::CloseOnScroll));
    }

    #[test]
    fn keys_round_trip_through_names() {
        for key in OptionKey::ALL {
            assert_eq!(OptionKey::from_name(key.name()), Some(key));
        }
        assert_eq!(OptionKey::from_name("onOpen"), None);
    }

    #[test]
    fn parse_value_checks_booleans() {
        assert_eq!(
            OptionKey::Observe.parse_value("true"),
            Some(OptionValue::Bool(true))
        );
        assert_eq!(OptionKey::Observe.parse_value("1"), None);
        assert_eq!(
            OptionKey::Width.parse_value("120px"),
            Some(OptionValue::from("120px"))
        );
    }

    #[test]
    fn values_expose_only_their_own_kind() {
        let options = Options::new().with(OptionKey::Width, "120px");
        let width = options.get(OptionKey::Width).unwrap();
        assert_eq!(width.as_text(), Some("120px"));
        assert_eq!(width.as_bool(), None);

        let observe = options.get(OptionKey::Observe).unwrap();
        assert_eq!(observe.as_text(), None);
        assert_eq!(observe.as_bool(), Some(false));
    }
}
