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

use lumen_core::Value;
use lumen_graph::{export_configuration, replay_configuration, ObjectFactory, ObjectRegistry};
use serde_json::json;

fn registry() -> ObjectRegistry {
    ObjectRegistry::new(ObjectFactory::with_builtin_types(None))
}

fn link_pairs(document: &serde_json::Value) -> Vec<(String, String)> {
    document["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn test_export_lists_objects_and_links() {
    // --- 1. ARRANGE ---
    let registry = registry();
    registry.add("image", "clip1").unwrap();
    registry.add("camera", "cam1").unwrap();
    registry.link("clip1", "cam1").unwrap();

    // --- 2. ACT ---
    let document = export_configuration(&registry, &[]);

    // --- 3. ASSERT ---
    assert_eq!(document["links"], json!([["clip1", "cam1"]]));
    assert_eq!(document["objects"]["clip1"]["type"], json!("image"));
    assert_eq!(document["objects"]["cam1"]["type"], json!("camera"));
    assert_eq!(document["objects"]["cam1"]["size"], json!([512, 512]));
}

#[test]
fn test_deleting_a_source_drops_its_links_from_the_export() {
    let registry = registry();
    registry.add("image", "clip1").unwrap();
    registry.add("camera", "cam1").unwrap();
    registry.link("clip1", "cam1").unwrap();

    registry.remove("clip1").unwrap();
    let document = export_configuration(&registry, &[]);

    assert_eq!(document["links"], json!([]));
    assert!(document["objects"].get("clip1").is_none());
    assert!(document["objects"].get("cam1").is_some());
}

#[test]
fn test_ghosts_and_unsavable_objects_are_never_exported() {
    // --- 1. ARRANGE ---
    let registry = registry();
    registry.add("blender", "blender").unwrap();
    registry.add("image", "clip1").unwrap();
    registry.add_ghost("camera", "remote_cam").unwrap();
    registry.link("clip1", "remote_cam").unwrap();

    // --- 2. ACT ---
    let document = export_configuration(
        &registry,
        &[("swapInterval".to_string(), vec![Value::Int(1)])],
    );

    // --- 3. ASSERT ---
    let names: Vec<&String> = document["objects"].as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["clip1"]);
    assert_eq!(document["links"], json!([]));
    assert_eq!(document["swapInterval"], json!([1]));
}

#[test]
fn test_replay_reproduces_objects_links_and_attributes() {
    // --- 1. ARRANGE ---
    let original = registry();
    original.add("image", "clip1").unwrap();
    original.add("mesh", "mesh1").unwrap();
    let camera = original.add("camera", "cam1").unwrap();
    original.add("window", "win1").unwrap();
    original.add("blender", "blender").unwrap();
    original.add_ghost("warp", "remote_warp").unwrap();
    original.link("clip1", "cam1").unwrap();
    original.link("mesh1", "cam1").unwrap();
    original.link("cam1", "win1").unwrap();
    {
        let mut state = camera.lock();
        state.alias = "front".to_string();
        state
            .object
            .set_attribute("size", &[Value::Int(1920), Value::Int(1080)])
            .unwrap();
    }
    let document = export_configuration(&original, &[]);

    // --- 2. ACT ---
    let fresh = registry();
    let summary = replay_configuration(&fresh, &document).unwrap();

    // --- 3. ASSERT ---
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(fresh.names(), vec!["cam1", "clip1", "mesh1", "win1"]);
    assert_eq!(fresh.names_by_type("camera"), vec!["cam1"]);

    let mut expected = link_pairs(&document);
    let mut replayed = summary.linked.clone();
    expected.sort();
    replayed.sort();
    assert_eq!(replayed, expected);
    assert_eq!(expected.len(), 3);

    let replayed_camera = fresh.get("cam1").unwrap();
    let state = replayed_camera.lock();
    assert_eq!(state.alias, "front");
    assert_eq!(
        state.object.attribute("size"),
        Some(vec![Value::Int(1920), Value::Int(1080)])
    );
}

#[test]
fn test_replay_rejects_documents_without_objects() {
    let registry = registry();
    assert!(replay_configuration(&registry, &json!({"links": []})).is_err());
}

#[test]
fn test_replay_skips_bad_entries_and_continues() {
    let registry = registry();
    let document = json!({
        "objects": {
            "a": {"type": "hologram"},
            "b": {"type": "image", "file": ["b.png"]},
            "c": {"type": "camera", "size": ["wide", 10]}
        },
        "links": [["b", "c"], ["missing", "c"], ["b"]]
    });

    let summary = replay_configuration(&registry, &document).unwrap();

    assert_eq!(summary.created, vec!["b", "c"]);
    assert_eq!(summary.linked, vec![("b".to_string(), "c".to_string())]);
    assert_eq!(summary.failures.len(), 4);
}
