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

//! # Lumen Control
//!
//! The only path by which a control channel mutates live scene state: attribute
//! calls are validated against their signature, then their setters either touch
//! render-thread-safe settings directly or enqueue a [`Task`] that the render
//! thread drains once per loop iteration.

#![warn(missing_docs)]

pub mod attribute;
pub mod settings;
pub mod task;

pub use attribute::{Attribute, AttributeError, AttributeTable};
pub use settings::SceneSettings;
pub use task::{Task, TaskQueue, TaskSender};
