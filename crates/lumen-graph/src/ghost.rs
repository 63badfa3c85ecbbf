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

//! Mirroring of remote objects in the master process.
//!
//! A master scene keeps a local ghost of the objects it asks other processes to
//! create, for the types that need a structural mirror (cameras and warps are
//! edited from the master's overlay). Ghosts can be linked and configured like
//! any object but never take part in the local render walk.

use std::collections::BTreeSet;

/// What to do with an object creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Create a regular local object.
    Local,
    /// Create a ghost mirroring the object of another process.
    Ghost,
    /// The request concerns another process only.
    Ignore,
}

/// Decides where a requested object lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostPolicy {
    ghostable: BTreeSet<String>,
}

impl GhostPolicy {
    /// Creates a policy mirroring the given types.
    pub fn new<I, S>(ghostable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ghostable: ghostable.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether objects of `type_name` get a ghost in the master.
    pub fn is_ghostable(&self, type_name: &str) -> bool {
        self.ghostable.contains(type_name)
    }

    /// The mirrored types, in lexical order.
    pub fn ghostable_types(&self) -> impl Iterator<Item = &str> {
        self.ghostable.iter().map(String::as_str)
    }

    /// Routes a request to create `type_name` in scene `target`, as seen from
    /// scene `local`. An empty target means the local scene.
    pub fn placement(&self, type_name: &str, target: &str, local: &str, master: bool) -> Placement {
        if target.is_empty() || target == local {
            Placement::Local
        } else if master && self.is_ghostable(type_name) {
            Placement::Ghost
        } else {
            Placement::Ignore
        }
    }
}

impl Default for GhostPolicy {
    fn default() -> Self {
        Self::new(["camera", "warp"])
    }
}
