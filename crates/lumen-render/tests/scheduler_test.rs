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

use lumen_control::{AttributeError, SceneSettings};
use lumen_core::graphics::ContextProvider;
use lumen_core::value::{Value, Values};
use lumen_graph::object::Renderable;
use lumen_graph::{GraphObject, ObjectError, ObjectFactory, ObjectRegistry, Priority};
use lumen_render::headless::{FenceEvent, HeadlessGpu, HeadlessProvider};
use lumen_render::{FramePhase, Scheduler, TextureUploader, UploadExchange, UploadSignal, UploaderConfig};
use lumen_telemetry::FrameTimers;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// --- TEST OBJECTS ---

/// Records whether the exchange lock is held when it renders.
struct LockProbe {
    priority: Priority,
    exchange: Arc<UploadExchange>,
    seen: Arc<Mutex<Vec<(Priority, bool)>>>,
}

impl Renderable for LockProbe {
    fn render(&mut self) -> Result<(), ObjectError> {
        self.seen
            .lock()
            .push((self.priority, self.exchange.is_locked()));
        Ok(())
    }
}

impl GraphObject for LockProbe {
    fn type_name(&self) -> &str {
        "probe"
    }
    fn rendering_priority(&self) -> Priority {
        self.priority
    }
    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        Some(self)
    }
    fn set_attribute(&mut self, name: &str, _: &[Value]) -> Result<(), AttributeError> {
        Err(AttributeError::Unknown(name.to_string()))
    }
    fn attribute(&self, _: &str) -> Option<Values> {
        None
    }
    fn attribute_description(&self, _: &str) -> Option<String> {
        None
    }
    fn saved_attributes(&self) -> Vec<(String, Values)> {
        Vec::new()
    }
}

/// Fails its update and panics when rendered.
struct Faulty;

impl Renderable for Faulty {
    fn render(&mut self) -> Result<(), ObjectError> {
        panic!("shader exploded");
    }
}

impl GraphObject for Faulty {
    fn type_name(&self) -> &str {
        "faulty"
    }
    fn rendering_priority(&self) -> Priority {
        Priority::Camera
    }
    fn update(&mut self) -> Result<bool, ObjectError> {
        Err(ObjectError::Update("bad input".to_string()))
    }
    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        Some(self)
    }
    fn set_attribute(&mut self, name: &str, _: &[Value]) -> Result<(), AttributeError> {
        Err(AttributeError::Unknown(name.to_string()))
    }
    fn attribute(&self, _: &str) -> Option<Values> {
        None
    }
    fn attribute_description(&self, _: &str) -> Option<String> {
        None
    }
    fn saved_attributes(&self) -> Vec<(String, Values)> {
        Vec::new()
    }
}

// --- RIG ---

struct Rig {
    registry: Arc<ObjectRegistry>,
    exchange: Arc<UploadExchange>,
    signal: UploadSignal,
    timers: Arc<FrameTimers>,
    gpu: Arc<HeadlessGpu>,
    scheduler: Scheduler,
}

fn rig_with(configure: impl FnOnce(&mut ObjectFactory, &Arc<UploadExchange>)) -> Rig {
    let gpu = Arc::new(HeadlessGpu::new());
    let exchange = Arc::new(UploadExchange::new(gpu.clone()));
    let mut factory = ObjectFactory::with_builtin_types(None);
    configure(&mut factory, &exchange);
    let registry = Arc::new(ObjectRegistry::new(factory));
    let signal = UploadSignal::new();
    let timers = Arc::new(FrameTimers::new());
    let scheduler = Scheduler::new(
        registry.clone(),
        exchange.clone(),
        signal.clone(),
        timers.clone(),
    );
    Rig {
        registry,
        exchange,
        signal,
        timers,
        gpu,
        scheduler,
    }
}

fn rig() -> Rig {
    rig_with(|_, _| {})
}

fn int_attribute(rig: &Rig, name: &str, attribute: &str) -> i64 {
    let slot = rig.registry.get(name).unwrap();
    let values = slot.lock().object.attribute(attribute).unwrap();
    values[0].as_i64().unwrap()
}

// --- TESTS ---

#[test]
fn test_tasks_are_applied_before_the_snapshot() {
    // --- 1. ARRANGE ---
    let mut rig = rig();
    let registry = rig.registry.clone();
    rig.scheduler.task_sender().add_task(move || {
        registry.add("camera", "cam1").unwrap();
    });

    // --- 2. ACT ---
    let report = rig.scheduler.run_frame();

    // --- 3. ASSERT ---
    assert_eq!(report.tasks_run, 1);
    assert_eq!(report.buckets, vec![(Priority::Camera, vec!["cam1".to_string()])]);
    assert_eq!(rig.scheduler.phase(), FramePhase::Idle);
    assert_eq!(rig.scheduler.frames(), 1);
}

#[test]
fn test_walk_is_ordered_and_skips_ghosts() {
    let mut rig = rig();
    rig.registry.add("window", "win").unwrap();
    rig.registry.add("warp", "warp1").unwrap();
    rig.registry.add("camera", "cam1").unwrap();
    rig.registry.add("mesh", "mesh1").unwrap();
    rig.registry.add_ghost("camera", "remote_cam").unwrap();

    let report = rig.scheduler.run_frame();

    let priorities: Vec<Priority> = report.buckets.iter().map(|(p, _)| *p).collect();
    assert_eq!(
        priorities,
        vec![Priority::Media, Priority::Camera, Priority::Warp, Priority::Window]
    );
    assert!(report
        .buckets
        .iter()
        .all(|(_, names)| !names.contains(&"remote_cam".to_string())));
    assert_eq!(int_attribute(&rig, "remote_cam", "frames"), 0);
    assert_eq!(int_attribute(&rig, "cam1", "frames"), 1);
}

#[test]
fn test_mesh_changes_reach_the_blender_one_frame_later() {
    // --- 1. ARRANGE ---
    let mut rig = rig();
    rig.registry.add("blender", "blender").unwrap();
    let mesh = rig.registry.add("mesh", "mesh1").unwrap();
    rig.scheduler.run_frame();
    assert_eq!(int_attribute(&rig, "blender", "computations"), 1);

    mesh.lock()
        .object
        .set_attribute("file", &[Value::from("dome.obj")])
        .unwrap();

    // --- 2. ACT ---
    let changed_frame = rig.scheduler.run_frame();
    let after_change = int_attribute(&rig, "blender", "computations");
    assert!(mesh.lock().updated, "the change stays visible for a full iteration");
    let next_frame = rig.scheduler.run_frame();
    let after_next = int_attribute(&rig, "blender", "computations");
    rig.scheduler.run_frame();
    let settled = int_attribute(&rig, "blender", "computations");

    // --- 3. ASSERT ---
    assert_eq!(changed_frame.changed, vec!["mesh1".to_string()]);
    assert_eq!(after_change, 1, "blending must not be recomputed mid-walk");
    assert_eq!(next_frame.tasks_run, 1);
    assert_eq!(after_next, 2);
    assert_eq!(settled, 2);
    assert!(!mesh.lock().updated);
}

#[test]
fn test_fence_handoff_between_frames() {
    // --- 1. ARRANGE ---
    let mut rig = rig();
    rig.registry.add("texture", "tex1").unwrap();
    rig.registry.add("camera", "cam1").unwrap();
    rig.registry.add("window", "win").unwrap();

    // --- 2. ACT ---
    let first = rig.scheduler.run_frame();
    rig.exchange.upload_fence.arm();
    let second = rig.scheduler.run_frame();

    // --- 3. ASSERT ---
    assert!(first.texture_sync && first.camera_fence);
    assert!(!first.waited_for_upload, "no upload happened before the first frame");
    assert!(second.waited_for_upload);
    assert_eq!(
        rig.gpu.events(),
        vec![
            FenceEvent::Inserted(1),
            FenceEvent::Inserted(2),
            FenceEvent::Waited(2),
            FenceEvent::Deleted(2),
            FenceEvent::Inserted(3),
            FenceEvent::Deleted(1),
        ]
    );
    assert!(!rig.exchange.is_locked());
}

#[test]
fn test_cameras_are_fenced_when_no_band_follows_them() {
    // --- 1. ARRANGE ---
    let mut rig = rig();
    rig.registry.add("texture", "tex1").unwrap();
    rig.registry.add("camera", "cam1").unwrap();

    // --- 2. ACT ---
    let report = rig.scheduler.run_frame();

    // --- 3. ASSERT ---
    assert!(report.texture_sync);
    assert!(report.camera_fence);
    assert!(rig.exchange.camera_fence.is_armed());
    assert_eq!(rig.gpu.events(), vec![FenceEvent::Inserted(1)]);
    assert!(!rig.exchange.is_locked());
}

#[test]
fn test_exchange_lock_is_held_from_texture_bands_to_post_camera() {
    // --- 1. ARRANGE ---
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probes = seen.clone();
    let mut rig = rig_with(move |factory, exchange| {
        for (type_name, priority) in [
            ("probe_blending", Priority::Blending),
            ("probe_camera", Priority::Camera),
            ("probe_window", Priority::Window),
        ] {
            let exchange = exchange.clone();
            let seen = probes.clone();
            factory.register(type_name, move |_| {
                Ok(Box::new(LockProbe {
                    priority,
                    exchange: exchange.clone(),
                    seen: seen.clone(),
                }))
            });
        }
    });
    rig.registry.add("probe_blending", "a").unwrap();
    rig.registry.add("probe_camera", "b").unwrap();
    rig.registry.add("probe_window", "c").unwrap();

    // --- 2. ACT ---
    rig.scheduler.run_frame();

    // --- 3. ASSERT ---
    assert_eq!(
        *seen.lock(),
        vec![
            (Priority::Blending, false),
            (Priority::Camera, true),
            (Priority::Window, false),
        ]
    );
}

#[test]
fn test_failing_objects_do_not_stop_the_frame() {
    let mut rig = rig_with(|factory, _| {
        factory.register("faulty", |_| Ok(Box::new(Faulty)));
    });
    rig.registry.add("faulty", "a_faulty").unwrap();
    rig.registry.add("camera", "b_cam").unwrap();
    rig.registry.add("window", "win").unwrap();

    let report = rig.scheduler.run_frame();

    assert_eq!(report.failures.len(), 2, "{:?}", report.failures);
    assert!(report.failures.iter().all(|(name, _)| name == "a_faulty"));
    assert!(report.failures[1].1.contains("shader exploded"));
    assert_eq!(int_attribute(&rig, "b_cam", "frames"), 1);
    assert_eq!(report.swapped, 1);
    assert_eq!(int_attribute(&rig, "win", "swaps"), 1);
}

#[test]
fn test_frame_timers_are_recorded() {
    let mut rig = rig();
    rig.registry.add("camera", "cam1").unwrap();

    rig.scheduler.run_frame();

    assert!(rig.timers.duration("rendering").is_some());
    assert!(rig.timers.duration("swap").is_some());
    assert!(rig.timers.duration("camera").is_some());
}

#[test]
fn test_each_frame_wakes_the_upload_thread() {
    let mut rig = rig();
    rig.scheduler.run_frame();
    assert!(rig.signal.wait_timeout(Duration::from_millis(10)));
}

#[test]
fn test_uploader_uploads_after_each_frame_and_joins() {
    // --- 1. ARRANGE ---
    let provider = HeadlessProvider::new();
    let mut rig = rig();
    rig.registry.add("image", "clip1").unwrap();
    rig.registry.add("texture", "tex1").unwrap();
    rig.registry.link("clip1", "tex1").unwrap();
    let settings = Arc::new(SceneSettings::new());
    settings.set_started(true);
    let mut uploader = TextureUploader::spawn(
        UploaderConfig::default(),
        rig.registry.clone(),
        rig.exchange.clone(),
        rig.signal.clone(),
        settings.clone(),
        rig.timers.clone(),
        provider.create_shared_context("upload").unwrap(),
    )
    .unwrap();

    // --- 2. ACT ---
    let deadline = Instant::now() + Duration::from_secs(5);
    while int_attribute(&rig, "tex1", "uploads") == 0 && Instant::now() < deadline {
        rig.scheduler.run_frame();
        thread::sleep(Duration::from_millis(5));
    }
    while int_attribute(&rig, "tex1", "flushes") == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    uploader.shutdown();

    // --- 3. ASSERT ---
    assert!(int_attribute(&rig, "tex1", "uploads") >= 1);
    assert!(int_attribute(&rig, "tex1", "flushes") >= 1);
    assert!(!uploader.is_running());
    assert!(rig.timers.duration("textureUpload").is_some());
    assert!(rig
        .gpu
        .events()
        .iter()
        .any(|e| matches!(e, FenceEvent::Waited(_))));
}

#[test]
fn test_uploader_consumes_the_camera_fence() {
    // --- 1. ARRANGE ---
    let provider = HeadlessProvider::new();
    let rig = rig();
    rig.registry.add("image", "clip1").unwrap();
    rig.registry.add("texture", "tex1").unwrap();
    rig.registry.link("clip1", "tex1").unwrap();
    rig.exchange.camera_fence.arm();
    let settings = Arc::new(SceneSettings::new());
    settings.set_started(true);
    let mut uploader = TextureUploader::spawn(
        UploaderConfig::default(),
        rig.registry.clone(),
        rig.exchange.clone(),
        rig.signal.clone(),
        settings,
        rig.timers.clone(),
        provider.create_shared_context("upload").unwrap(),
    )
    .unwrap();

    // --- 2. ACT ---
    rig.signal.notify();
    let deadline = Instant::now() + Duration::from_secs(5);
    while int_attribute(&rig, "tex1", "uploads") == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    uploader.shutdown();

    // --- 3. ASSERT ---
    assert!(int_attribute(&rig, "tex1", "uploads") >= 1);
    assert!(!rig.exchange.camera_fence.is_armed());
    assert_eq!(
        rig.gpu.events()[..3],
        [
            FenceEvent::Inserted(1),
            FenceEvent::Waited(1),
            FenceEvent::Deleted(1),
        ]
    );
}

#[test]
fn test_uploader_stops_while_paused() {
    let provider = HeadlessProvider::new();
    let rig = rig();
    let settings = Arc::new(SceneSettings::new());
    let mut uploader = TextureUploader::spawn(
        UploaderConfig {
            idle_delay: Duration::from_millis(5),
            ..UploaderConfig::default()
        },
        rig.registry.clone(),
        rig.exchange.clone(),
        rig.signal.clone(),
        settings,
        rig.timers.clone(),
        provider.create_shared_context("upload").unwrap(),
    )
    .unwrap();

    uploader.shutdown();

    assert!(!uploader.is_running());
}
