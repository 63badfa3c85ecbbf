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

//! # Lumen Render
//!
//! The per-frame [`Scheduler`] of the render thread and the
//! [`TextureUploader`] thread, handing texture buffers to each other through
//! GPU fences held in an [`UploadExchange`].

#![warn(missing_docs)]

pub mod headless;
pub mod scheduler;
pub mod sync;
pub mod uploader;

pub use scheduler::{FramePhase, FrameReport, Scheduler};
pub use sync::{FenceSlot, UploadExchange, UploadSignal};
pub use uploader::{TextureUploader, UploaderConfig};
