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

//! # Lumen Graph
//!
//! The per-process graph of producer/consumer objects: the capability traits
//! every object implements, the [`ObjectRegistry`] that owns them by name, the
//! built-in object kinds, ghost mirroring for a coordinating master, and the
//! structured configuration document.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod factory;
pub mod ghost;
pub mod kinds;
pub mod object;
pub mod registry;
pub mod slot;

pub use config::{export_configuration, replay_configuration, ReplaySummary};
pub use error::GraphError;
pub use factory::ObjectFactory;
pub use ghost::{GhostPolicy, Placement};
pub use object::{Category, GraphObject, LinkPeer, ObjectError, Priority};
pub use registry::{Bucket, ObjectRegistry, RenderSnapshot, TextureIterationGuard};
pub use slot::{ObjectRef, ObjectSlot, ObjectState};
