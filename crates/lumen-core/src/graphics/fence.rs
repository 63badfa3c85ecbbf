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

/// An opaque GPU synchronization token.
///
/// A fence stands for "every GPU command submitted before this point has
/// completed". It is intentionally neither `Clone` nor `Copy`: a fence is waited
/// on and deleted by whoever holds it, once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Fence(u64);

impl Fence {
    /// Wraps a backend-specific fence handle.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the backend-specific fence handle.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// GPU-side synchronization primitives, shared by all contexts of a process.
///
/// Waits are GPU-side: the calling thread only queues the wait into its command
/// stream and continues.
pub trait GpuSync: Send + Sync {
    /// Inserts a new fence into the command stream of the current context.
    fn insert_fence(&self) -> Fence;

    /// Makes the command stream of the current context wait for `fence`.
    fn wait_fence(&self, fence: &Fence);

    /// Destroys a fence. The handle must not be used afterwards.
    fn delete_fence(&self, fence: Fence);
}
