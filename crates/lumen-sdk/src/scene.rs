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

//! The scene: one rendering process.

use crate::config::SceneConfig;
use crate::handle::{SceneHandle, SceneShared};
use crate::input::InputSnapshot;
use crate::rpc::scene_attributes;
use anyhow::{anyhow, Context as _, Result};
use lumen_control::{AttributeError, SceneSettings};
use lumen_core::graphics::{ContextProvider, GraphicsContext};
use lumen_core::value::{Value, Values};
use lumen_core::{Link, Stopwatch};
use lumen_graph::{GhostPolicy, ObjectFactory, ObjectRegistry};
use lumen_render::{FrameReport, Scheduler, TextureUploader, UploadExchange, UploadSignal};
use lumen_telemetry::FrameTimers;
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Name of the blending object every scene owns.
pub const BLENDER_NAME: &str = "blender";

/// A rendering process: its objects, its render loop and its upload thread.
///
/// The scene is driven from the thread that created it (the render thread).
/// Other threads act on it through a [`SceneHandle`] or the attribute calls.
pub struct Scene {
    handle: SceneHandle,
    scheduler: Scheduler,
    uploader: Option<TextureUploader>,
    main_context: Option<Box<dyn GraphicsContext>>,
    idle_sleep: Duration,
    loop_watch: Stopwatch,
}

impl Scene {
    /// Brings up the graphics contexts, the implicit blender and the upload
    /// thread.
    ///
    /// Fails if no suitable graphics context can be obtained, in which case
    /// the scene must not be run.
    pub fn new(
        config: SceneConfig,
        provider: Arc<dyn ContextProvider>,
        link: Arc<dyn Link>,
    ) -> Result<Self> {
        let caps = provider
            .probe()
            .context("no suitable graphics context, scene not initialized")?;
        let main_context = provider
            .create_main_context(&config.name)
            .context("cannot create the main context")?;
        main_context.make_current()?;
        let upload_context = provider
            .create_shared_context(&format!("{}_upload", config.name))
            .context("cannot create the upload context")?;

        let settings = Arc::new(SceneSettings::new());
        settings.set_master(config.master);
        settings.set_run_in_background(config.run_in_background);
        if let Some(rate) = provider.refresh_rate().filter(|r| *r > 0) {
            settings.set_target_frame_duration(Duration::from_micros(1_000_000 / u64::from(rate)));
        }

        let registry = Arc::new(ObjectRegistry::new(ObjectFactory::with_builtin_types(Some(
            provider.clone(),
        ))));
        registry.set_windows_enabled(!config.run_in_background);
        registry
            .add(BLENDER_NAME, BLENDER_NAME)
            .map_err(|e| anyhow!("cannot create the blender: {e}"))?;

        let exchange = Arc::new(UploadExchange::new(provider.gpu()));
        let signal = UploadSignal::new();
        let timers = Arc::new(FrameTimers::new());
        let scheduler = Scheduler::new(
            registry.clone(),
            exchange.clone(),
            signal.clone(),
            timers.clone(),
        );
        let uploader = TextureUploader::spawn(
            config.uploader.clone(),
            registry.clone(),
            exchange,
            signal,
            settings.clone(),
            timers.clone(),
            upload_context,
        )
        .context("cannot start the texture upload thread")?;

        let handle = SceneHandle {
            shared: Arc::new(SceneShared {
                name: config.name.clone(),
                caps,
                registry,
                tasks: scheduler.task_sender(),
                settings,
                timers,
                link,
                ghosts: GhostPolicy::new(config.ghostable.iter().cloned()),
                input: RwLock::new(InputSnapshot::default()),
                answer_timeout: config.answer_timeout,
            }),
        };

        log::info!(
            "Scene '{}' initialized (rendering API {}.{}, swap groups: {}).",
            config.name,
            caps.version.0,
            caps.version.1,
            caps.has_swap_group
        );
        Ok(Self {
            handle,
            scheduler,
            uploader: Some(uploader),
            main_context: Some(main_context),
            idle_sleep: config.idle_sleep,
            loop_watch: Stopwatch::new(),
        })
    }

    /// A thread-safe handle on this scene.
    pub fn handle(&self) -> SceneHandle {
        self.handle.clone()
    }

    /// The scene name.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// The object registry.
    pub fn registry(&self) -> &Arc<ObjectRegistry> {
        self.handle.registry()
    }

    /// The settings mutated by the control surface.
    pub fn settings(&self) -> &Arc<SceneSettings> {
        self.handle.settings()
    }

    /// The frame timers.
    pub fn timers(&self) -> &Arc<FrameTimers> {
        self.handle.timers()
    }

    /// Whether the loop keeps going.
    pub fn is_running(&self) -> bool {
        self.settings().is_running()
    }

    /// Dispatches a call of the control surface.
    ///
    /// Malformed calls are rejected before anything happens. Calls touching the
    /// object graph only enqueue a task, applied at the next loop iteration.
    pub fn set_attribute(&self, name: &str, args: &[Value]) -> Result<(), AttributeError> {
        let result = scene_attributes().set(&mut self.handle.clone(), name, args);
        if let Err(e) = &result {
            log::warn!("Scene '{}': {}", self.name(), e);
        }
        result
    }

    /// Reads an attribute of the control surface.
    pub fn get_attribute(&self, name: &str) -> Option<Values> {
        scene_attributes().get(&self.handle, name)
    }

    /// Describes an attribute of the control surface.
    pub fn attribute_description(&self, name: &str) -> Option<String> {
        scene_attributes().description(name).map(str::to_string)
    }

    /// Names of every attribute of the control surface.
    pub fn attribute_names(&self) -> Vec<String> {
        scene_attributes().names().map(str::to_string).collect()
    }

    /// Runs one loop iteration: drain the tasks, then render a frame if the
    /// scene is started, then poll the inputs.
    ///
    /// Returns the frame report, or `None` if nothing was rendered.
    pub fn step(&mut self) -> Option<FrameReport> {
        self.pace();
        let loop_time = self.loop_watch.restart();
        self.timers().record("loop_scene", loop_time);

        let report = if self.settings().is_started() {
            Some(self.scheduler.run_frame())
        } else {
            self.scheduler.drain_tasks();
            thread::sleep(self.idle_sleep);
            None
        };

        self.poll_inputs();
        report
    }

    /// Runs the loop until the scene is asked to quit, then stops it.
    pub fn run(&mut self) {
        log::info!("Scene '{}' running.", self.name());
        while self.is_running() {
            self.step();
        }
        self.stop();
    }

    /// Stops the loop and the upload thread, then releases the graphics
    /// resources. Idempotent.
    pub fn stop(&mut self) {
        self.settings().request_quit();
        if let Some(mut uploader) = self.uploader.take() {
            uploader.shutdown();
        }
        if let Some(context) = self.main_context.take() {
            self.registry().clear();
            context.release();
            log::info!("Scene '{}' stopped.", self.name());
        }
    }

    // Hidden windows do not block on swaps, so the loop paces itself.
    fn pace(&self) {
        let settings = self.settings();
        if !settings.run_in_background() || settings.swap_interval() == 0 {
            return;
        }
        let target = settings.target_frame_duration();
        let elapsed = self.loop_watch.elapsed();
        if target > elapsed {
            thread::sleep(target - elapsed);
        }
    }

    fn poll_inputs(&self) {
        let Some(context) = &self.main_context else {
            return;
        };
        let events = context.poll_events();
        if events.is_empty() {
            return;
        }
        let quit = self.handle.shared.input.write().apply(events);
        if quit {
            log::info!("Scene '{}': close requested by a window", self.name());
            self.handle.send_to_world("quit", Values::new());
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name())
            .field("frames", &self.scheduler.frames())
            .finish()
    }
}
