// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structural errors of the object graph.

/// A structural error raised by the [`ObjectRegistry`](crate::ObjectRegistry).
///
/// None of these are fatal: the caller logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An object with this name already exists.
    #[error("an object named '{0}' already exists")]
    DuplicateName(String),
    /// The factory has no constructor for this type.
    #[error("unknown object type '{0}'")]
    UnknownType(String),
    /// No object with this name exists.
    #[error("no object named '{0}'")]
    NotFound(String),
    /// The target object refused the link.
    #[error("'{to}' refused a link from '{from}'")]
    LinkRefused {
        /// The object that tried to link.
        from: String,
        /// The object that refused.
        to: String,
    },
    /// Windows cannot be created while running in background.
    #[error("cannot create window '{0}' while running in background")]
    WindowsDisabled(String),
    /// A configuration document does not have the expected shape.
    #[error("invalid configuration document: {0}")]
    InvalidDocument(String),
    /// The object constructor failed.
    #[error("failed to create object: {0}")]
    Creation(String),
}
