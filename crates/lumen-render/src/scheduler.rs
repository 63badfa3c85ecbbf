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

//! The per-frame walk of the render thread.
//!
//! A frame goes through `DrainTasks → BuildSnapshot → Render → Swap`. Tasks
//! are the only way structural changes reach the registry, so once the queue
//! is drained the snapshot is consistent for the whole walk, and the registry
//! lock is released before any object code runs.
//!
//! Two points of the walk synchronize with the upload thread:
//!
//! - **A**, at the first band reading textures (strictly between `Blending`
//!   and `PostCamera`): take the exchange lock and make the command stream wait
//!   for the pending upload fence, so no camera reads a texture mid-upload.
//! - **B**, at the first band at or above `PostCamera`: place the camera fence
//!   the upload thread waits on before touching buffers again, then release
//!   the exchange lock.

use crate::sync::{UploadExchange, UploadSignal};
use lumen_control::{TaskQueue, TaskSender};
use lumen_graph::{Category, ObjectRef, ObjectRegistry, Priority};
use lumen_telemetry::FrameTimers;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Where the scheduler currently is in its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Between two frames.
    Idle,
    /// Running the deferred tasks.
    DrainTasks,
    /// Grouping the registry into bands.
    BuildSnapshot,
    /// Walking the bands.
    Render,
    /// Presenting the windows.
    Swap,
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Number of deferred tasks run before rendering.
    pub tasks_run: usize,
    /// The walked bands with their objects, in walk order.
    pub buckets: Vec<(Priority, Vec<String>)>,
    /// Objects whose update reported a change.
    pub changed: Vec<String>,
    /// Objects whose update or render failed, with the reason.
    pub failures: Vec<(String, String)>,
    /// Whether point A was reached.
    pub texture_sync: bool,
    /// Whether an upload fence was pending at point A.
    pub waited_for_upload: bool,
    /// Whether point B placed a camera fence.
    pub camera_fence: bool,
    /// Number of windows presented.
    pub swapped: usize,
}

/// The render-thread side of a scene.
pub struct Scheduler {
    registry: Arc<ObjectRegistry>,
    tasks: TaskQueue,
    exchange: Arc<UploadExchange>,
    signal: UploadSignal,
    timers: Arc<FrameTimers>,
    phase: FramePhase,
    frames: u64,
}

impl Scheduler {
    /// Creates a scheduler walking `registry`.
    pub fn new(
        registry: Arc<ObjectRegistry>,
        exchange: Arc<UploadExchange>,
        signal: UploadSignal,
        timers: Arc<FrameTimers>,
    ) -> Self {
        Self {
            registry,
            tasks: TaskQueue::new(),
            exchange,
            signal,
            timers,
            phase: FramePhase::Idle,
            frames: 0,
        }
    }

    /// A handle to enqueue tasks for the next drain.
    pub fn task_sender(&self) -> TaskSender {
        self.tasks.sender()
    }

    /// The task queue drained at the start of every frame.
    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// The current phase.
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn enter(&mut self, phase: FramePhase) {
        log::trace!("Scheduler: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Runs the deferred tasks without rendering, as done while paused.
    pub fn drain_tasks(&mut self) -> usize {
        self.enter(FramePhase::DrainTasks);
        let count = self.tasks.run_tasks();
        self.enter(FramePhase::Idle);
        count
    }

    /// Drains the tasks then renders and presents one frame.
    pub fn run_frame(&mut self) -> FrameReport {
        let tasks_run = self.drain_tasks();
        let mut report = self.render_frame();
        report.tasks_run = tasks_run;
        report
    }

    /// Renders and presents one frame from the current registry state.
    pub fn render_frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        self.enter(FramePhase::BuildSnapshot);
        let snapshot = self.registry.snapshot();

        self.enter(FramePhase::Render);
        {
            let _rendering = self.timers.scoped("rendering");
            let exchange = Arc::clone(&self.exchange);
            let mut exchange_lock = None;
            let mut texture_synced = false;
            let mut cameras_fenced = false;
            let mut blending_scheduled = false;

            for bucket in snapshot.buckets() {
                if !texture_synced && bucket.priority.reads_textures() {
                    exchange_lock = Some(exchange.lock());
                    report.waited_for_upload = exchange.upload_fence.consume();
                    report.texture_sync = true;
                    texture_synced = true;
                }
                if !cameras_fenced && bucket.priority.follows_cameras() {
                    exchange.camera_fence.arm();
                    exchange_lock = None;
                    report.camera_fence = true;
                    cameras_fenced = true;
                }

                let band = bucket.priority.to_string();
                let _band_timer = self.timers.scoped(&band);
                for slot in &bucket.objects {
                    let mesh_changed = self.process(slot, &mut report);
                    if mesh_changed && !blending_scheduled {
                        self.schedule_blending_update();
                        blending_scheduled = true;
                    }
                }
                report.buckets.push((
                    bucket.priority,
                    bucket.objects.iter().map(|o| o.name().to_string()).collect(),
                ));
            }
            if texture_synced && !cameras_fenced {
                exchange.camera_fence.arm();
                report.camera_fence = true;
            }
            drop(exchange_lock);
        }

        self.enter(FramePhase::Swap);
        {
            let _swap = self.timers.scoped("swap");
            for window in self.registry.windows() {
                let mut state = window.lock();
                if let Some(surface) = state.object.as_window() {
                    surface.swap_buffers();
                    report.swapped += 1;
                }
            }
        }

        self.signal.notify();
        self.frames += 1;
        self.enter(FramePhase::Idle);

        for (name, reason) in &report.failures {
            log::error!("Object '{}' failed this frame: {}", name, reason);
        }
        report
    }

    /// Updates then renders one object. Returns `true` if it is a mesh that
    /// changed.
    fn process(&self, slot: &ObjectRef, report: &mut FrameReport) -> bool {
        let mut state = slot.lock();

        let changed = match catch_unwind(AssertUnwindSafe(|| state.object.update())) {
            Ok(Ok(changed)) => changed,
            Ok(Err(e)) => {
                report.failures.push((slot.name().to_string(), e.to_string()));
                false
            }
            Err(payload) => {
                report
                    .failures
                    .push((slot.name().to_string(), panic_message(payload.as_ref())));
                false
            }
        };
        // Stays visible until this object is visited by the next walk.
        state.updated = changed;
        if changed {
            report.changed.push(slot.name().to_string());
        }

        if let Some(renderable) = state.object.as_renderable() {
            match catch_unwind(AssertUnwindSafe(|| renderable.render())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => report.failures.push((slot.name().to_string(), e.to_string())),
                Err(payload) => report
                    .failures
                    .push((slot.name().to_string(), panic_message(payload.as_ref()))),
            }
        }

        changed && slot.category() == Category::Mesh
    }

    // Deferred so that blending never recomputes in the middle of a walk.
    fn schedule_blending_update(&self) {
        let registry = Arc::clone(&self.registry);
        self.tasks.add_task(move || {
            for slot in registry.slots() {
                if !slot.is_ghost() && slot.priority() == Priority::Blending {
                    slot.lock().object.force_update();
                }
            }
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
