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

//! Transport used when a scene runs on its own.

use lumen_core::value::Values;
use lumen_core::Link;
use std::time::Duration;

/// A transport connected to nothing.
///
/// Messages are logged and dropped; queries get the empty "unknown" answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLink;

impl Link for DetachedLink {
    fn send_message(&self, target: &str, message: &str, args: Values) {
        log::debug!("DetachedLink: dropping '{}' to '{}' ({} args)", message, target, args.len());
    }

    fn send_message_with_answer(
        &self,
        target: &str,
        message: &str,
        _args: Values,
        _timeout: Duration,
    ) -> Values {
        log::debug!("DetachedLink: no answer for '{}' from '{}'", message, target);
        Values::new()
    }
}
