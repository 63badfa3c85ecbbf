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

/// Rendering bands, in walk order.
///
/// Every object of a band completes its update and render before any object
/// of a higher band begins. [`Priority::NoRender`] is a sentinel: objects
/// reporting it are never part of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Never rendered.
    NoRender,
    /// Media producers updated before anything else (meshes, buffers).
    Media,
    /// Blending computation.
    Blending,
    /// Preparation of filter inputs.
    PreFilter,
    /// Filters.
    Filter,
    /// Preparation of camera inputs.
    PreCamera,
    /// Cameras.
    Camera,
    /// Everything reading camera outputs.
    PostCamera,
    /// Warps applied to camera outputs.
    Warp,
    /// Overlays.
    Gui,
    /// Preparation of window inputs.
    PreWindow,
    /// Windows.
    Window,
    /// Anything after the windows.
    PostWindow,
}

impl Priority {
    /// Whether objects of this band read uploaded textures (cameras and
    /// whatever prepares them), which requires waiting for the upload fence.
    pub fn reads_textures(self) -> bool {
        self > Priority::Blending && self < Priority::PostCamera
    }

    /// Whether every camera of the frame has been queued once this band starts.
    pub fn follows_cameras(self) -> bool {
        self >= Priority::PostCamera
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::NoRender => "no_render",
            Priority::Media => "media",
            Priority::Blending => "blending",
            Priority::PreFilter => "pre_filter",
            Priority::Filter => "filter",
            Priority::PreCamera => "pre_camera",
            Priority::Camera => "camera",
            Priority::PostCamera => "post_camera",
            Priority::Warp => "warp",
            Priority::Gui => "gui",
            Priority::PreWindow => "pre_window",
            Priority::Window => "window",
            Priority::PostWindow => "post_window",
        };
        write!(f, "{name}")
    }
}

/// Coarse kind of an object, used to trigger dependent updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Geometry producers; a change forces a blending recomputation.
    Mesh,
    /// Image producers.
    Image,
    /// GPU textures.
    Texture,
    /// Everything else.
    #[default]
    Misc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_totally_ordered() {
        assert!(Priority::NoRender < Priority::Media);
        assert!(Priority::Media < Priority::Blending);
        assert!(Priority::Blending < Priority::Camera);
        assert!(Priority::Camera < Priority::PostCamera);
        assert!(Priority::PostCamera < Priority::Window);
    }

    #[test]
    fn texture_wait_window_is_strictly_between_blending_and_post_camera() {
        assert!(!Priority::Blending.reads_textures());
        assert!(Priority::PreFilter.reads_textures());
        assert!(Priority::Camera.reads_textures());
        assert!(!Priority::PostCamera.reads_textures());
        assert!(Priority::PostCamera.follows_cameras());
        assert!(Priority::Window.follows_cameras());
        assert!(!Priority::Camera.follows_cameras());
    }
}
