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

//! Contracts of the windowing / graphics-context collaborator.
//!
//! The rendering host never talks to a display system directly. It goes through
//! a [`ContextProvider`] to discover capabilities and obtain contexts, through a
//! [`GraphicsContext`] to make a context current, swap and poll, and through
//! [`GpuSync`] to place and wait on GPU fences.

mod context;
mod error;
mod fence;

pub use self::context::{ContextProvider, GraphicsCaps, GraphicsContext, InputEvent};
pub use self::error::GraphicsError;
pub use self::fence::{Fence, GpuSync};
