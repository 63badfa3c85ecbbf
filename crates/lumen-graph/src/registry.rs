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

//! The name-keyed store of every live graph object of a process.
//!
//! Structural state lives behind a single re-entrant lock, so that a nested
//! call on the same thread (a deletion scrubbing links on other objects, a
//! configuration replay creating then linking) never deadlocks. The render walk
//! only holds that lock while it builds its [`RenderSnapshot`].
//!
//! Texture objects are additionally listed apart for the upload thread, which
//! reads that list under the texture-iteration guard rather than the registry
//! lock. Deletion acquires the same guard first, so an object can never be
//! erased while the upload thread is collecting texture handles.

use crate::error::GraphError;
use crate::factory::ObjectFactory;
use crate::object::Priority;
use crate::slot::{ObjectRef, ObjectSlot};
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delay between two attempts at acquiring the texture-iteration guard.
const GUARD_RETRY_DELAY: Duration = Duration::from_millis(1);

/// Objects of one rendering band, in name order.
#[derive(Debug, Clone)]
pub struct Bucket {
    /// The band shared by every object of this bucket.
    pub priority: Priority,
    /// The objects of the band.
    pub objects: Vec<ObjectRef>,
}

/// A consistent, priority-ordered view of the renderable objects of a frame.
#[derive(Debug, Clone, Default)]
pub struct RenderSnapshot {
    buckets: Vec<Bucket>,
}

impl RenderSnapshot {
    /// The buckets, in ascending priority order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Total number of objects across all buckets.
    pub fn object_count(&self) -> usize {
        self.buckets.iter().map(|b| b.objects.len()).sum()
    }

    /// Returns `true` if nothing is to be rendered.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterates over every object in walk order.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectRef> {
        self.buckets.iter().flat_map(|b| b.objects.iter())
    }
}

/// Exclusive right to iterate over the texture objects.
///
/// The guard flag is released when this value is dropped, on every exit path.
#[derive(Debug)]
pub struct TextureIterationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for TextureIterationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

type ObjectMap = BTreeMap<String, ObjectRef>;

/// The store of every live object of a process.
pub struct ObjectRegistry {
    objects: ReentrantMutex<RefCell<ObjectMap>>,
    textures: Mutex<Vec<ObjectRef>>,
    texture_iteration: AtomicBool,
    factory: ObjectFactory,
    windows_enabled: AtomicBool,
}

impl ObjectRegistry {
    /// Creates an empty registry building its objects with `factory`.
    pub fn new(factory: ObjectFactory) -> Self {
        Self {
            objects: ReentrantMutex::new(RefCell::new(BTreeMap::new())),
            textures: Mutex::new(Vec::new()),
            texture_iteration: AtomicBool::new(false),
            factory,
            windows_enabled: AtomicBool::new(true),
        }
    }

    /// The factory used to build objects.
    pub fn factory(&self) -> &ObjectFactory {
        &self.factory
    }

    /// Allows or refuses the creation of window objects.
    pub fn set_windows_enabled(&self, enabled: bool) {
        self.windows_enabled.store(enabled, Ordering::Release);
    }

    /// Runs `f` while holding the registry lock, making its calls atomic
    /// with respect to other threads.
    pub fn batch<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _lock = self.objects.lock();
        f(self)
    }

    /// Creates an object of type `type_name` named `name`.
    pub fn add(&self, type_name: &str, name: &str) -> Result<ObjectRef, GraphError> {
        self.insert(type_name, name, false)
    }

    /// Creates a ghost: an object mirroring a remote one, never rendered here.
    pub fn add_ghost(&self, type_name: &str, name: &str) -> Result<ObjectRef, GraphError> {
        self.insert(type_name, name, true)
    }

    fn insert(&self, type_name: &str, name: &str, ghost: bool) -> Result<ObjectRef, GraphError> {
        let lock = self.objects.lock();
        if lock.borrow().contains_key(name) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }

        let windows_enabled = self.windows_enabled.load(Ordering::Acquire);
        if type_name == "window" && !windows_enabled {
            return Err(GraphError::WindowsDisabled(name.to_string()));
        }

        let object = self.factory.create(type_name, name)?;
        let slot = Arc::new(ObjectSlot::new(name, object, ghost));
        if slot.is_window() && !windows_enabled {
            return Err(GraphError::WindowsDisabled(name.to_string()));
        }

        lock.borrow_mut().insert(name.to_string(), slot.clone());
        if slot.is_texture() && !ghost {
            self.textures.lock().push(slot.clone());
        }
        log::debug!(
            "ObjectRegistry: Added {}'{}' of type '{}'",
            if ghost { "ghost " } else { "" },
            name,
            type_name
        );
        Ok(slot)
    }

    /// Returns the object named `name`.
    pub fn get(&self, name: &str) -> Option<ObjectRef> {
        self.objects.lock().borrow().get(name).cloned()
    }

    /// Returns `true` if an object named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.objects.lock().borrow().contains_key(name)
    }

    /// Number of live objects, ghosts included.
    pub fn len(&self) -> usize {
        self.objects.lock().borrow().len()
    }

    /// Returns `true` if the registry holds no object.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of every object, in lexical order.
    pub fn names(&self) -> Vec<String> {
        self.objects.lock().borrow().keys().cloned().collect()
    }

    /// Names of the objects of type `type_name`, in lexical order.
    pub fn names_by_type(&self, type_name: &str) -> Vec<String> {
        self.objects
            .lock()
            .borrow()
            .values()
            .filter(|slot| slot.type_name() == type_name)
            .map(|slot| slot.name().to_string())
            .collect()
    }

    /// Every object, in name order.
    pub fn slots(&self) -> Vec<ObjectRef> {
        self.objects.lock().borrow().values().cloned().collect()
    }

    /// Every local display-surface object, in name order.
    pub fn windows(&self) -> Vec<ObjectRef> {
        self.objects
            .lock()
            .borrow()
            .values()
            .filter(|slot| slot.is_window() && !slot.is_ghost())
            .cloned()
            .collect()
    }

    /// Detaches `name` from every other object, then erases it.
    ///
    /// Blocks until no texture iteration is in progress.
    pub fn remove(&self, name: &str) -> Result<(), GraphError> {
        let _guard = self.begin_texture_iteration();
        let lock = self.objects.lock();

        let removed = lock
            .borrow_mut()
            .remove(name)
            .ok_or_else(|| GraphError::NotFound(name.to_string()))?;
        let others: Vec<ObjectRef> = lock.borrow().values().cloned().collect();
        drop(lock);

        let peer = removed.peer();
        for other in &others {
            let mut state = other.lock();
            if state.links.remove(name) {
                state.object.unlink_from(&peer);
            }
        }
        {
            let mut state = removed.lock();
            for source in std::mem::take(&mut state.links) {
                if let Some(source) = others.iter().find(|o| o.name() == source) {
                    state.object.unlink_from(&source.peer());
                }
            }
        }
        if removed.is_texture() {
            self.textures.lock().retain(|t| !Arc::ptr_eq(t, &removed));
        }

        log::debug!("ObjectRegistry: Removed '{}'", name);
        Ok(())
    }

    /// Erases every object.
    pub fn clear(&self) {
        for name in self.names() {
            let _ = self.remove(&name);
        }
    }

    /// Links `source` into `target`, if `target` accepts it.
    pub fn link(&self, source: &str, target: &str) -> Result<(), GraphError> {
        let (source_slot, target_slot) = self.pair(source, target)?;

        let mut state = target_slot.lock();
        if state.object.link_to(&source_slot.peer()) {
            state.links.insert(source.to_string());
            log::debug!("ObjectRegistry: Linked '{}' -> '{}'", source, target);
            Ok(())
        } else {
            Err(GraphError::LinkRefused {
                from: source.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Removes the link from `source` into `target`.
    ///
    /// Returns `false` if there was no such link.
    pub fn unlink(&self, source: &str, target: &str) -> Result<bool, GraphError> {
        let (source_slot, target_slot) = self.pair(source, target)?;

        let mut state = target_slot.lock();
        if state.links.remove(source) {
            state.object.unlink_from(&source_slot.peer());
            log::debug!("ObjectRegistry: Unlinked '{}' -> '{}'", source, target);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn pair(&self, first: &str, second: &str) -> Result<(ObjectRef, ObjectRef), GraphError> {
        let lock = self.objects.lock();
        let objects = lock.borrow();
        let first = objects
            .get(first)
            .cloned()
            .ok_or_else(|| GraphError::NotFound(first.to_string()))?;
        let second = objects
            .get(second)
            .cloned()
            .ok_or_else(|| GraphError::NotFound(second.to_string()))?;
        Ok((first, second))
    }

    /// Groups every renderable, non-ghost object by rendering band.
    pub fn snapshot(&self) -> RenderSnapshot {
        let lock = self.objects.lock();
        let mut bands: BTreeMap<Priority, Vec<ObjectRef>> = BTreeMap::new();
        for slot in lock.borrow().values() {
            if slot.is_ghost() {
                continue;
            }
            let priority = slot.priority();
            if priority == Priority::NoRender {
                continue;
            }
            bands.entry(priority).or_default().push(slot.clone());
        }
        drop(lock);

        RenderSnapshot {
            buckets: bands
                .into_iter()
                .map(|(priority, objects)| Bucket { priority, objects })
                .collect(),
        }
    }

    /// Takes the texture-iteration guard if nobody holds it.
    pub fn try_begin_texture_iteration(&self) -> Option<TextureIterationGuard<'_>> {
        self.texture_iteration
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TextureIterationGuard {
                flag: &self.texture_iteration,
            })
    }

    /// Takes the texture-iteration guard, waiting for the current holder.
    pub fn begin_texture_iteration(&self) -> TextureIterationGuard<'_> {
        loop {
            if let Some(guard) = self.try_begin_texture_iteration() {
                return guard;
            }
            std::thread::sleep(GUARD_RETRY_DELAY);
        }
    }

    /// Whether someone currently holds the texture-iteration guard.
    pub fn is_texture_iteration_in_progress(&self) -> bool {
        self.texture_iteration.load(Ordering::Acquire)
    }

    /// The local texture objects. Requires the texture-iteration guard.
    pub fn texture_snapshot(&self, _guard: &TextureIterationGuard<'_>) -> Vec<ObjectRef> {
        self.textures.lock().clone()
    }
}

impl std::fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("objects", &self.names())
            .finish()
    }
}
