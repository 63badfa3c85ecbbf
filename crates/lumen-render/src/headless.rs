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

//! A windowless graphics backend.
//!
//! Contexts never present anything and fences complete immediately, but every
//! fence operation is recorded, so the handoff between the render and upload
//! threads can be checked from the outside. Used by the runtime in
//! background mode and by the tests.

use lumen_core::graphics::{
    ContextProvider, Fence, GpuSync, GraphicsCaps, GraphicsContext, GraphicsError, InputEvent,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A recorded fence operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceEvent {
    /// A fence was inserted.
    Inserted(u64),
    /// A command stream was made to wait on a fence.
    Waited(u64),
    /// A fence was destroyed.
    Deleted(u64),
}

/// Fence device recording every operation.
#[derive(Debug, Default)]
pub struct HeadlessGpu {
    next: AtomicU64,
    events: Mutex<Vec<FenceEvent>>,
}

impl HeadlessGpu {
    /// Creates a device with no fence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation so far, in order.
    pub fn events(&self) -> Vec<FenceEvent> {
        self.events.lock().clone()
    }

    /// Number of fences inserted and not yet destroyed.
    pub fn live_fences(&self) -> usize {
        let events = self.events.lock();
        let inserted = events
            .iter()
            .filter(|e| matches!(e, FenceEvent::Inserted(_)))
            .count();
        let deleted = events
            .iter()
            .filter(|e| matches!(e, FenceEvent::Deleted(_)))
            .count();
        inserted - deleted
    }
}

impl GpuSync for HeadlessGpu {
    fn insert_fence(&self) -> Fence {
        let raw = self.next.fetch_add(1, Ordering::AcqRel) + 1;
        self.events.lock().push(FenceEvent::Inserted(raw));
        Fence::from_raw(raw)
    }

    fn wait_fence(&self, fence: &Fence) {
        self.events.lock().push(FenceEvent::Waited(fence.raw()));
    }

    fn delete_fence(&self, fence: Fence) {
        self.events.lock().push(FenceEvent::Deleted(fence.raw()));
    }
}

/// A context without a surface.
pub struct HeadlessContext {
    label: String,
    input: Arc<Mutex<VecDeque<InputEvent>>>,
    swaps: AtomicU64,
}

impl HeadlessContext {
    /// Number of buffer swaps requested so far.
    pub fn swaps(&self) -> u64 {
        self.swaps.load(Ordering::Acquire)
    }
}

impl GraphicsContext for HeadlessContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn make_current(&self) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn release(&self) {}

    fn swap_buffers(&self) {
        self.swaps.fetch_add(1, Ordering::AcqRel);
    }

    fn poll_events(&self) -> Vec<InputEvent> {
        self.input.lock().drain(..).collect()
    }
}

/// Provider of headless contexts.
pub struct HeadlessProvider {
    gpu: Arc<HeadlessGpu>,
    caps: Option<GraphicsCaps>,
    refresh_rate: Option<u32>,
    input: Arc<Mutex<VecDeque<InputEvent>>>,
}

impl HeadlessProvider {
    /// Creates a provider reporting a 4.5 context and a 60 Hz display.
    pub fn new() -> Self {
        Self {
            gpu: Arc::new(HeadlessGpu::new()),
            caps: Some(GraphicsCaps {
                version: (4, 5),
                has_swap_group: false,
            }),
            refresh_rate: Some(60),
            input: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Creates a provider whose probe fails, as on a machine without a GPU.
    pub fn unavailable() -> Self {
        Self {
            caps: None,
            ..Self::new()
        }
    }

    /// The recording fence device.
    pub fn headless_gpu(&self) -> Arc<HeadlessGpu> {
        self.gpu.clone()
    }

    /// Queues an event to be returned by the next poll of the main context.
    pub fn inject_event(&self, event: InputEvent) {
        self.input.lock().push_back(event);
    }

    fn context(&self, name: &str, input: Arc<Mutex<VecDeque<InputEvent>>>) -> HeadlessContext {
        HeadlessContext {
            label: name.to_string(),
            input,
            swaps: AtomicU64::new(0),
        }
    }
}

impl Default for HeadlessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextProvider for HeadlessProvider {
    fn probe(&self) -> Result<GraphicsCaps, GraphicsError> {
        self.caps.ok_or_else(|| {
            GraphicsError::InitializationFailed("no rendering device available".to_string())
        })
    }

    fn create_main_context(&self, name: &str) -> Result<Box<dyn GraphicsContext>, GraphicsError> {
        self.probe()?;
        Ok(Box::new(self.context(name, self.input.clone())))
    }

    fn create_shared_context(
        &self,
        name: &str,
    ) -> Result<Box<dyn GraphicsContext>, GraphicsError> {
        self.probe()?;
        Ok(Box::new(
            self.context(name, Arc::new(Mutex::new(VecDeque::new()))),
        ))
    }

    fn gpu(&self) -> Arc<dyn GpuSync> {
        self.gpu.clone()
    }

    fn refresh_rate(&self) -> Option<u32> {
        self.refresh_rate
    }
}
