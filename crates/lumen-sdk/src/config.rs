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

//! Construction-time configuration of a scene.

use lumen_render::UploaderConfig;
use std::time::Duration;

/// Configuration of a [`Scene`](crate::Scene).
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Name of the scene, unique among the processes of the system.
    pub name: String,
    /// Whether this process coordinates the others.
    pub master: bool,
    /// Types mirrored as ghosts when created for another scene by the master.
    pub ghostable: Vec<String>,
    /// Whether to run without any visible window.
    pub run_in_background: bool,
    /// Sleep of the render loop while the scene is not started.
    pub idle_sleep: Duration,
    /// Time allowed to the remote authority to answer a query.
    pub answer_timeout: Duration,
    /// Configuration of the upload thread.
    pub uploader: UploaderConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            master: false,
            ghostable: vec!["camera".to_string(), "warp".to_string()],
            run_in_background: false,
            idle_sleep: Duration::from_millis(50),
            answer_timeout: Duration::from_micros(10_000),
            uploader: UploaderConfig::default(),
        }
    }
}
