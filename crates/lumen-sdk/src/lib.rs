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

//! # Lumen SDK
//!
//! The per-process facade of the rendering host. A [`Scene`] owns the object
//! registry, the render scheduler and the texture upload thread, and exposes
//! the remote control surface through which a controller drives it.
//!
//! ```no_run
//! use lumen_render::headless::HeadlessProvider;
//! use lumen_sdk::{DetachedLink, Scene, SceneConfig};
//! use std::sync::Arc;
//!
//! let mut scene = Scene::new(
//!     SceneConfig::default(),
//!     Arc::new(HeadlessProvider::new()),
//!     Arc::new(DetachedLink),
//! )?;
//! scene.set_attribute("addObject", &["camera".into(), "cam1".into()])?;
//! scene.set_attribute("start", &[])?;
//! scene.run();
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod handle;
pub mod input;
pub mod link;
mod rpc;
pub mod scene;

pub use config::SceneConfig;
pub use handle::SceneHandle;
pub use input::InputSnapshot;
pub use link::DetachedLink;
pub use scene::Scene;
