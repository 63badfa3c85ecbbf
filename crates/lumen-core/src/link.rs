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

//! Contract of the inter-process message transport.
//!
//! The wire format is the transport's business; the host only needs a
//! fire-and-forget send and a blocking round-trip with a timeout.

use crate::value::Values;
use std::time::Duration;

/// The name under which the coordinating master process is addressed.
pub const WORLD: &str = "world";

/// A message transport towards the other processes of the system.
pub trait Link: Send + Sync {
    /// Sends `message` with `args` to `target` without waiting for anything.
    fn send_message(&self, target: &str, message: &str, args: Values);

    /// Sends `message` and blocks until the answer arrives or `timeout` elapses.
    ///
    /// An empty result means the answer is unknown (timeout or no authority),
    /// and must not be read as a negative answer.
    fn send_message_with_answer(
        &self,
        target: &str,
        message: &str,
        args: Values,
        timeout: Duration,
    ) -> Values;
}
