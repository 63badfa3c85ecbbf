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

//! # Lumen Telemetry
//!
//! Process-wide logging (an `env_logger` backend with runtime per-target levels
//! and a history of recent lines) and the named frame timers of the render and
//! upload loops.

#![warn(missing_docs)]

pub mod logging;
pub mod timer;

pub use logging::{init_logging, level_from_priority, recent_lines, set_target_level, LoggingConfig};
pub use timer::{FrameTimers, MasterClock, ScopedTimer};
