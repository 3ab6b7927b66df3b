// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collection-style adapter: apply one call to many source elements.
//!
//! A call either initializes dropdowns on every element or runs a named action on
//! the dropdowns already bound to them. Problems never abort the call; they are
//! logged and reported in the [`CallOutcome`].
//!
//! | Action        | Arguments         |
//! |---------------|-------------------|
//! | `refresh`     |                   |
//! | `open`        |                   |
//! | `close`       |                   |
//! | `toggle`      |                   |
//! | `destroy`     |                   |
//! | `reposition`  |                   |
//! | `select`      | value             |
//! | `option`      | key, [value]      |

use alloc::borrow::ToOwned;
use alloc::string::String;

use tmdropdown_dom::NodeId;
use tracing::{error, warn};

use crate::config::{OptionKey, OptionValue, Options};
use crate::error::Error;
use crate::page::Page;
use crate::widget::{Dropdown, Selection};

/// A parsed adapter action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Rebuild from the source.
    Refresh,
    /// Open the list.
    Open,
    /// Close the list.
    Close,
    /// Open or close the list.
    Toggle,
    /// Unbind and restore the source.
    Destroy,
    /// Recompute the position of an open list.
    Reposition,
    /// Select by value and rebuild.
    Select(String),
    /// Read an option.
    GetOption(OptionKey),
    /// Override an option.
    SetOption(OptionKey, OptionValue),
}

impl Action {
    /// Parse an action name and its arguments.
    pub fn parse(name: &str, args: &[&str]) -> Result<Self, Error> {
        Ok(match name {
            "refresh" => Self::Refresh,
            "open" => Self::Open,
            "close" => Self::Close,
            "toggle" => Self::Toggle,
            "destroy" => Self::Destroy,
            "reposition" => Self::Reposition,
            "select" => match args.first() {
                Some(value) => Self::Select((*value).to_owned()),
                None => return Err(Error::MissingArgument(name.to_owned())),
            },
            "option" => {
                let Some(&key_name) = args.first() else {
                    return Err(Error::MissingArgument(name.to_owned()));
                };
                let key = OptionKey::from_name(key_name)
                    .ok_or_else(|| Error::UnknownOption(key_name.to_owned()))?;
                match args.get(1) {
                    None => Self::GetOption(key),
                    Some(&raw) => {
                        let value = key.parse_value(raw).ok_or_else(|| Error::InvalidValue {
                            key: key_name.to_owned(),
                            value: raw.to_owned(),
                        })?;
                        Self::SetOption(key, value)
                    }
                }
            }
            _ => return Err(Error::UnknownAction(name.to_owned())),
        })
    }
}

/// One adapter call.
#[derive(Clone, Copy, Debug)]
pub enum Call<'a> {
    /// Initialize dropdowns, with default options when `None`.
    Init(Option<&'a Options>),
    /// Run a named action with arguments.
    Action(&'a str, &'a [&'a str]),
}

/// What an adapter call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOutcome {
    /// Elements the call was applied to.
    pub applied: usize,
    /// Elements that were skipped, each with a warning.
    pub skipped: usize,
    /// Value read by an `option` query.
    pub value: Option<OptionValue>,
    /// Set when the call as a whole was rejected.
    pub error: Option<Error>,
}

/// Apply `call` to every element of `sources`.
///
/// ```
/// use tmdropdown::{tm_dropdown, Call, Page};
/// use tmdropdown_dom::{Document, Tag};
///
/// let mut page = Page::new(Document::default());
/// let doc = page.document_mut();
/// let select = doc.create_element(Tag::Select);
/// let option = doc.create_element(Tag::Option);
/// doc.append_child(select, option);
/// doc.append_child(doc.body(), select);
///
/// assert_eq!(tm_dropdown(&mut page, &[select], Call::Init(None)).applied, 1);
/// tm_dropdown(&mut page, &[select], Call::Action("open", &[]));
/// assert!(page.dropdown_for(select).unwrap().is_open());
/// ```
pub fn tm_dropdown(page: &mut Page, sources: &[NodeId], call: Call<'_>) -> CallOutcome {
    let mut outcome = CallOutcome::default();
    match call {
        Call::Init(options) => {
            for &source in sources {
                let options = options.cloned().unwrap_or_default();
                match Dropdown::new(page, source, options) {
                    Ok(_) => outcome.applied += 1,
                    Err(Error::AlreadyBound) => outcome.skipped += 1,
                    Err(err) => {
                        warn!(?source, %err, "element will be skipped");
                        outcome.skipped += 1;
                    }
                }
            }
        }
        Call::Action(name, args) => {
            let action = match Action::parse(name, args) {
                Ok(action) => action,
                Err(err) => {
                    error!(%err, "invalid parameter");
                    outcome.error = Some(err);
                    return outcome;
                }
            };
            for &source in sources {
                let Some(dropdown) = page.dropdown_for(source) else {
                    warn!(?source, "dropdown not initialized on this element yet");
                    outcome.skipped += 1;
                    continue;
                };
                if let Action::GetOption(key) = action {
                    if outcome.value.is_none() {
                        outcome.value = dropdown.get_option(page.document(), key);
                    }
                } else {
                    apply(page, &dropdown, &action);
                }
                outcome.applied += 1;
            }
        }
    }
    outcome
}

fn apply(page: &mut Page, dropdown: &Dropdown, action: &Action) {
    match action {
        Action::Refresh => {
            dropdown.refresh(page);
        }
        Action::Open => {
            dropdown.open(page);
        }
        Action::Close => {
            dropdown.close(page);
        }
        Action::Toggle => {
            dropdown.toggle(page);
        }
        Action::Destroy => {
            dropdown.destroy(page);
        }
        Action::Reposition => {
            dropdown.reposition(page);
        }
        Action::Select(value) => {
            dropdown.select(page, Selection::Value(value.clone()), true);
        }
        Action::SetOption(key, value) => dropdown.set_option(*key, value.clone()),
        Action::GetOption(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use tmdropdown_dom::{Document, Tag};

    fn page_with(n: usize) -> (Page, Vec<NodeId>) {
        let mut doc = Document::default();
        let body = doc.body();
        let selects = (0..n)
            .map(|_| {
                let s = doc.create_element(Tag::Select);
                for text in ["one", "two"] {
                    let o = doc.create_element(Tag::Option);
                    doc.set_text(o, text);
                    doc.append_child(s, o);
                }
                doc.append_child(body, s);
                s
            })
            .collect();
        (Page::new(doc), selects)
    }

    #[test]
    fn parse_recognizes_actions_and_arguments() {
        assert_eq!(Action::parse("open", &[]), Ok(Action::Open));
        assert_eq!(
            Action::parse("select", &["two"]),
            Ok(Action::Select(String::from("two")))
        );
        assert_eq!(
            Action::parse("select", &[]),
            Err(Error::MissingArgument(String::from("select")))
        );
        assert_eq!(
            Action::parse("option", &["observe", "true"]),
            Ok(Action::SetOption(OptionKey::Observe, OptionValue::Bool(true)))
        );
        assert_eq!(
            Action::parse("option", &["emptyText"]),
            Ok(Action::GetOption(OptionKey::EmptyText))
        );
        assert_eq!(
            Action::parse("option", &["bogus"]),
            Err(Error::UnknownOption(String::from("bogus")))
        );
        assert!(matches!(
            Action::parse("option", &["closeOnScroll", "maybe"]),
            Err(Error::InvalidValue { .. })
        ));
        assert_eq!(
            Action::parse("explode", &[]),
            Err(Error::UnknownAction(String::from("explode")))
        );
    }

    #[test]
    fn init_binds_selects_and_skips_the_rest() {
        let (mut page, selects) = page_with(2);
        let div = page.document_mut().create_element(Tag::Div);
        let body = page.document().body();
        page.document_mut().append_child(body, div);

        let outcome = tm_dropdown(&mut page, &[selects[0], div, selects[1]], Call::Init(None));
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 1);

        let again = tm_dropdown(&mut page, &selects, Call::Init(None));
        assert_eq!(again.applied, 0);
        assert_eq!(again.skipped, 2);
        assert_eq!(page.delegator().len(), 2);
    }

    #[test]
    fn init_shares_options_across_elements() {
        let (mut page, selects) = page_with(2);
        let options = Options::new().with(OptionKey::WrapperClass, "fancy");
        tm_dropdown(&mut page, &selects, Call::Init(Some(&options)));
        for &s in &selects {
            let d = page.dropdown_for(s).unwrap();
            assert!(page.document().has_class(d.wrapper(), "fancy"));
        }
    }

    #[test]
    fn actions_apply_to_bound_elements_only() {
        let (mut page, selects) = page_with(2);
        tm_dropdown(&mut page, &selects[..1], Call::Init(None));

        let outcome = tm_dropdown(&mut page, &selects, Call::Action("open", &[]));
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
        assert!(page.dropdown_for(selects[0]).unwrap().is_open());
    }

    #[test]
    fn select_action_sets_value_and_rebuilds() {
        let (mut page, selects) = page_with(1);
        tm_dropdown(&mut page, &selects, Call::Init(None));
        tm_dropdown(&mut page, &selects, Call::Action("select", &["two"]));
        let d = page.dropdown_for(selects[0]).unwrap();
        assert_eq!(page.document().select_value(selects[0]), "two");
        assert_eq!(page.document().text_content(d.current()), "two");
    }

    #[test]
    fn invalid_calls_report_instead_of_panicking() {
        let (mut page, selects) = page_with(1);
        tm_dropdown(&mut page, &selects, Call::Init(None));

        let outcome = tm_dropdown(&mut page, &selects, Call::Action("explode", &[]));
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.error, Some(Error::UnknownAction(String::from("explode"))));

        let outcome = tm_dropdown(&mut page, &selects, Call::Action("select", &[]));
        assert_eq!(outcome.error, Some(Error::MissingArgument(String::from("select"))));
        assert_eq!(page.document().select_value(selects[0]), "one");
    }

    #[test]
    fn option_action_reads_and_writes() {
        let (mut page, selects) = page_with(2);
        tm_dropdown(&mut page, &selects, Call::Init(None));

        tm_dropdown(&mut page, &selects, Call::Action("option", &["emptyText", "None"]));
        let outcome = tm_dropdown(&mut page, &selects, Call::Action("option", &["emptyText"]));
        assert_eq!(outcome.value, Some(OptionValue::from("None")));
        assert_eq!(outcome.applied, 2);
    }

    #[test]
    fn destroy_action_unbinds() {
        let (mut page, selects) = page_with(1);
        tm_dropdown(&mut page, &selects, Call::Init(None));
        tm_dropdown(&mut page, &selects, Call::Action("destroy", &[]));
        assert!(page.dropdown_for(selects[0]).is_none());

        let outcome = tm_dropdown(&mut page, &selects, Call::Action("toggle", &[]));
        assert_eq!(outcome.skipped, 1);
    }
}
