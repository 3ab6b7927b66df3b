// Copyright 2025 the TmDropdown Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;
use thiserror::Error;

/// Errors reported by dropdown construction and the binding adapter.
///
/// Construction fails with the first three; the rest reject adapter calls. In
/// both cases nothing is changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The element is not a select.
    #[error("element <{tag}> is not a select")]
    NotASelect {
        /// Tag name of the rejected element.
        tag: String,
    },

    /// The element already has a dropdown bound to it.
    #[error("a dropdown is already bound to this element")]
    AlreadyBound,

    /// The select has no parent to place the dropdown next to.
    #[error("the select is not attached to a parent")]
    Detached,

    /// The adapter does not know the action.
    #[error("invalid action `{0}`")]
    UnknownAction(String),

    /// The action needs an argument that was not given.
    #[error("action `{0}` requires an argument")]
    MissingArgument(String),

    /// The option name is not recognized.
    #[error("unknown option `{0}`")]
    UnknownOption(String),

    /// The value does not fit the option.
    #[error("invalid value `{value}` for option `{key}`")]
    InvalidValue {
        /// Option name.
        key: String,
        /// Rejected value.
        value: String,
    },
}
