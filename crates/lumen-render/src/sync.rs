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

//! Synchronization shared by the render and upload threads.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use lumen_core::graphics::{Fence, GpuSync};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::Duration;

/// Holds at most one live fence for a synchronization point.
///
/// Arming a new fence destroys the previous one.
pub struct FenceSlot {
    gpu: Arc<dyn GpuSync>,
    fence: Mutex<Option<Fence>>,
}

impl FenceSlot {
    /// Creates an empty slot placing its fences through `gpu`.
    pub fn new(gpu: Arc<dyn GpuSync>) -> Self {
        Self {
            gpu,
            fence: Mutex::new(None),
        }
    }

    /// Inserts a new fence in the current command stream, replacing the old one.
    pub fn arm(&self) {
        let fence = self.gpu.insert_fence();
        if let Some(previous) = self.fence.lock().replace(fence) {
            self.gpu.delete_fence(previous);
        }
    }

    /// Waits for the pending fence, if any, and destroys it.
    pub fn consume(&self) -> bool {
        match self.fence.lock().take() {
            Some(fence) => {
                self.gpu.wait_fence(&fence);
                self.gpu.delete_fence(fence);
                true
            }
            None => false,
        }
    }

    /// Whether a fence is pending.
    pub fn is_armed(&self) -> bool {
        self.fence.lock().is_some()
    }

    /// Destroys the pending fence without waiting for it.
    pub fn clear(&self) {
        if let Some(fence) = self.fence.lock().take() {
            self.gpu.delete_fence(fence);
        }
    }
}

impl Drop for FenceSlot {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Everything the two threads exchange around texture buffers.
///
/// `upload_fence` marks "uploads queued" and is consumed by the render
/// thread before cameras read textures. `camera_fence` marks "cameras queued"
/// and is consumed by the upload thread before it touches buffers again.
/// The lock is held by the render thread from the first texture-reading band
/// to the first post-camera band (or the end of the walk), and by the upload
/// thread around each batch.
pub struct UploadExchange {
    lock: Mutex<()>,
    /// Fence placed by the upload thread.
    pub upload_fence: FenceSlot,
    /// Fence placed by the render thread.
    pub camera_fence: FenceSlot,
}

impl UploadExchange {
    /// Creates an exchange with no pending fence.
    pub fn new(gpu: Arc<dyn GpuSync>) -> Self {
        Self {
            lock: Mutex::new(()),
            upload_fence: FenceSlot::new(gpu.clone()),
            camera_fence: FenceSlot::new(gpu),
        }
    }

    /// Takes the exchange lock.
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Whether somebody holds the exchange lock.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

/// Wakes the upload thread once per frame.
///
/// The channel has a single slot: signals raised while one is already pending
/// collapse into it.
#[derive(Debug, Clone)]
pub struct UploadSignal {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl UploadSignal {
    /// Creates a signal with nothing pending.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        Self { tx, rx }
    }

    /// Raises the signal.
    pub fn notify(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                log::warn!("Upload signal has no receiver left.");
            }
        }
    }

    /// Blocks until the signal is raised, or `timeout` elapses.
    ///
    /// Returns `true` if the signal was raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.rx.recv_timeout(timeout).is_ok()
    }

    /// Blocks until the signal is raised.
    pub fn wait(&self) {
        let _ = self.rx.recv();
    }
}

impl Default for UploadSignal {
    fn default() -> Self {
        Self::new()
    }
}
