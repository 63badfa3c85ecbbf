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

use std::fmt;

/// An error raised while bringing up or using a graphics context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// The windowing layer itself could not be initialized.
    InitializationFailed(String),
    /// No rendering API version satisfying the minimum could be obtained.
    UnsupportedVersion {
        /// The minimum `(major, minor)` version required.
        required: (u32, u32),
    },
    /// A context or its display surface could not be created.
    ContextCreationFailed(String),
    /// The context could not be made current on the calling thread.
    ContextLost(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize the windowing layer: {msg}")
            }
            GraphicsError::UnsupportedVersion { required } => write!(
                f,
                "Unable to find a suitable rendering API version (at least {}.{})",
                required.0, required.1
            ),
            GraphicsError::ContextCreationFailed(msg) => {
                write!(f, "Failed to create a graphics context: {msg}")
            }
            GraphicsError::ContextLost(msg) => {
                write!(f, "Graphics context could not be made current: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphicsError {}
