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

//! Built-in object kinds.
//!
//! These carry the bookkeeping the scheduler relies on (priorities, link rules,
//! change reporting, upload and swap hooks). The actual pixel work belongs to
//! the graphics backend and is not done here.

mod blender;
mod camera;
mod image;
mod mesh;
mod texture;
mod warp;
mod window;

pub use self::blender::Blender;
pub use self::camera::Camera;
pub use self::image::Image;
pub use self::mesh::Mesh;
pub use self::texture::Texture;
pub use self::warp::Warp;
pub use self::window::Window;

use lumen_core::value::{Value, Values};

pub(crate) fn number(args: &[Value], index: usize) -> Option<f64> {
    args.get(index).and_then(Value::as_f64)
}

pub(crate) fn text(args: &[Value], index: usize) -> Option<String> {
    args.get(index).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn pair(values: (i64, i64)) -> Values {
    vec![Value::Int(values.0), Value::Int(values.1)]
}
