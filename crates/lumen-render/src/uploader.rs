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

//! The texture upload thread.
//!
//! Uploads run on their own thread, with a context sharing resources with the
//! main one, once per frame of the render thread. A batch goes:
//!
//! 1. wait for the frame signal;
//! 2. make the stream wait on the camera fence, so cameras are done reading;
//! 3. take the exchange lock and, under the texture-iteration guard, collect
//!    the texture objects (the whole batch is skipped if the guard is taken);
//! 4. upload each texture, place the upload fence, release the lock;
//! 5. flush each texture, outside the lock.

use crate::sync::{UploadExchange, UploadSignal};
use lumen_control::SceneSettings;
use lumen_core::graphics::GraphicsContext;
use lumen_graph::{ObjectRef, ObjectRegistry};
use lumen_telemetry::FrameTimers;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Configuration of the upload thread.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Name of the spawned thread.
    pub thread_name: String,
    /// Sleep between two checks while the scene is not started.
    pub idle_delay: Duration,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            thread_name: "texture-upload".to_string(),
            idle_delay: Duration::from_millis(50),
        }
    }
}

/// Everything the upload loop works with.
struct UploadLoop {
    config: UploaderConfig,
    registry: Arc<ObjectRegistry>,
    exchange: Arc<UploadExchange>,
    signal: UploadSignal,
    settings: Arc<SceneSettings>,
    timers: Arc<FrameTimers>,
    stop: Arc<AtomicBool>,
    context: Box<dyn GraphicsContext>,
}

impl UploadLoop {
    fn is_running(&self) -> bool {
        self.settings.is_running() && !self.stop.load(Ordering::Acquire)
    }

    fn run(self) {
        if let Err(e) = self.context.make_current() {
            log::error!("Texture upload: cannot use context '{}': {}", self.context.label(), e);
            return;
        }
        log::info!("Texture upload thread started.");

        while self.is_running() {
            if !self.settings.is_started() {
                thread::sleep(self.config.idle_delay);
                continue;
            }

            self.signal.wait();
            if !self.is_running() {
                break;
            }

            let _loop = self.timers.scoped("loop_texture");
            if let Some(textures) = self.upload_batch() {
                for texture in &textures {
                    if let Some(target) = texture.lock().object.as_texture() {
                        target.flush();
                    }
                }
            }
        }

        self.context.release();
        log::info!("Texture upload thread stopped.");
    }

    /// Runs steps 2 to 4. Returns the uploaded textures, or `None` if the
    /// batch was skipped.
    fn upload_batch(&self) -> Option<Vec<ObjectRef>> {
        self.exchange.camera_fence.consume();
        let _exchange = self.exchange.lock();

        let textures = {
            let Some(guard) = self.registry.try_begin_texture_iteration() else {
                log::trace!("Texture upload: iteration guard busy, skipping this batch.");
                return None;
            };
            self.registry.texture_snapshot(&guard)
        };

        {
            let _upload = self.timers.scoped("textureUpload");
            for slot in &textures {
                let mut state = slot.lock();
                let Some(texture) = state.object.as_texture() else {
                    continue;
                };
                match catch_unwind(AssertUnwindSafe(|| texture.upload())) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => log::error!("Texture '{}': {}", slot.name(), e),
                    Err(_) => log::error!("Texture '{}': upload panicked", slot.name()),
                }
            }
        }

        self.exchange.upload_fence.arm();
        Some(textures)
    }
}

/// Handle to the running upload thread.
pub struct TextureUploader {
    handle: Option<thread::JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    signal: UploadSignal,
}

impl TextureUploader {
    /// Starts the upload thread, which takes ownership of `context`.
    pub fn spawn(
        config: UploaderConfig,
        registry: Arc<ObjectRegistry>,
        exchange: Arc<UploadExchange>,
        signal: UploadSignal,
        settings: Arc<SceneSettings>,
        timers: Arc<FrameTimers>,
        context: Box<dyn GraphicsContext>,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let upload_loop = UploadLoop {
            config: config.clone(),
            registry,
            exchange,
            signal: signal.clone(),
            settings,
            timers,
            stop: Arc::clone(&stop),
            context,
        };
        let handle = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || upload_loop.run())?;

        Ok(Self {
            handle: Some(handle),
            stop,
            signal,
        })
    }

    /// Whether the thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the thread: sets its stop flag, wakes it once, and joins it.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        self.signal.notify();
        if handle.join().is_err() {
            log::error!("Texture upload thread panicked.");
        }
    }
}

impl Drop for TextureUploader {
    fn drop(&mut self) {
        self.shutdown();
    }
}
