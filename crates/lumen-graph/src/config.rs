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

//! The structured configuration document.
//!
//! A scene serializes to a JSON object holding its own savable attributes, an
//! `"objects"` map from object name to `{"type", "alias", <attributes>}`, and a
//! `"links"` list of `[source, target]` pairs. Ghosts and non-savable objects
//! are left out, as are links touching them.

use crate::error::GraphError;
use crate::registry::ObjectRegistry;
use lumen_core::value::{values_from_json, values_to_json, Values};
use serde_json::{Map, Value as Json};

/// Keys of an object entry that are not attributes.
const TYPE_KEY: &str = "type";
const ALIAS_KEY: &str = "alias";

/// Outcome of a configuration replay.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplaySummary {
    /// Names of the objects created, in document order.
    pub created: Vec<String>,
    /// Links established, as `(source, target)`.
    pub linked: Vec<(String, String)>,
    /// Entries that could not be applied. Replay goes on after each of them.
    pub failures: Vec<String>,
}

/// Writes the savable state of `registry` into a configuration document.
pub fn export_configuration(registry: &ObjectRegistry, scene_attributes: &[(String, Values)]) -> Json {
    let mut document = Map::new();
    for (name, values) in scene_attributes {
        document.insert(name.clone(), values_to_json(values));
    }

    let slots = registry.batch(|registry| registry.slots());
    let exported = |name: &str| {
        slots
            .iter()
            .find(|slot| slot.name() == name)
            .is_some_and(|slot| !slot.is_ghost() && slot.lock().savable)
    };

    let mut objects = Map::new();
    let mut links = Vec::new();
    for slot in &slots {
        if !exported(slot.name()) {
            continue;
        }
        let state = slot.lock();
        let mut entry = Map::new();
        entry.insert(TYPE_KEY.to_string(), Json::from(state.remote_type.as_str()));
        entry.insert(ALIAS_KEY.to_string(), Json::from(state.alias.as_str()));
        for (attribute, values) in state.object.saved_attributes() {
            entry.insert(attribute, values_to_json(&values));
        }
        let sources: Vec<String> = state.links.iter().cloned().collect();
        drop(state);

        objects.insert(slot.name().to_string(), Json::Object(entry));
        for source in sources {
            if exported(&source) {
                links.push(Json::Array(vec![
                    Json::from(source),
                    Json::from(slot.name()),
                ]));
            }
        }
    }

    document.insert("objects".to_string(), Json::Object(objects));
    document.insert("links".to_string(), Json::Array(links));
    Json::Object(document)
}

/// Recreates the objects and links of `document` into `registry`.
///
/// Objects are created first, then configured, then linked. Entries that
/// fail are recorded and skipped; only a document without an `"objects"` map
/// is rejected as a whole.
pub fn replay_configuration(registry: &ObjectRegistry, document: &Json) -> Result<ReplaySummary, GraphError> {
    let objects = document
        .get("objects")
        .and_then(Json::as_object)
        .ok_or_else(|| GraphError::InvalidDocument("missing \"objects\" map".to_string()))?;

    let mut summary = ReplaySummary::default();
    registry.batch(|registry| {
        for (name, entry) in objects {
            let Some(type_name) = entry.get(TYPE_KEY).and_then(Json::as_str) else {
                summary.failures.push(format!("object '{name}' has no type"));
                continue;
            };
            let slot = match registry.add(type_name, name) {
                Ok(slot) => slot,
                Err(e) => {
                    summary.failures.push(e.to_string());
                    continue;
                }
            };
            summary.created.push(name.clone());

            let Some(attributes) = entry.as_object() else {
                continue;
            };
            let mut state = slot.lock();
            for (attribute, json) in attributes {
                if attribute == TYPE_KEY {
                    continue;
                }
                if attribute == ALIAS_KEY {
                    if let Some(alias) = json.as_str() {
                        state.alias = alias.to_string();
                    }
                    continue;
                }
                let Some(args) = values_from_json(json) else {
                    summary
                        .failures
                        .push(format!("'{name}.{attribute}' is not a value list"));
                    continue;
                };
                if let Err(e) = state.object.set_attribute(attribute, &args) {
                    summary.failures.push(format!("'{name}': {e}"));
                }
            }
        }

        let pairs = document.get("links").and_then(Json::as_array);
        for pair in pairs.into_iter().flatten() {
            let ends = pair
                .as_array()
                .and_then(|ends| Some((ends.first()?.as_str()?, ends.get(1)?.as_str()?)));
            let Some((source, target)) = ends else {
                summary.failures.push(format!("malformed link {pair}"));
                continue;
            };
            match registry.link(source, target) {
                Ok(()) => summary
                    .linked
                    .push((source.to_string(), target.to_string())),
                Err(e) => summary.failures.push(e.to_string()),
            }
        }
    });

    for failure in &summary.failures {
        log::warn!("Configuration replay: {}", failure);
    }
    Ok(summary)
}
