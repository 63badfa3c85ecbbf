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

//! Runs one scene on a headless graphics backend, detached from any
//! controller.

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser;
use cli::Cli;
use lumen_render::headless::HeadlessProvider;
use lumen_sdk::{DetachedLink, Scene, SceneConfig};
use lumen_telemetry::{init_logging, LoggingConfig};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let config = SceneConfig {
        name: cli.name.clone(),
        master: cli.master,
        run_in_background: cli.background,
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(config, Arc::new(HeadlessProvider::new()), Arc::new(DetachedLink))?;

    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration '{}'", path.display()))?;
        let document: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("invalid configuration '{}'", path.display()))?;
        let summary = scene.handle().apply_configuration(&document)?;
        log::info!(
            "Configuration '{}': {} object(s), {} link(s), {} failure(s).",
            path.display(),
            summary.created.len(),
            summary.linked.len(),
            summary.failures.len()
        );
    }

    scene
        .set_attribute("start", &[])
        .context("cannot start the scene")?;
    match cli.frames {
        Some(frames) => {
            for _ in 0..frames {
                if !scene.is_running() {
                    break;
                }
                scene.step();
            }
        }
        None => scene.run(),
    }

    if cli.dump_config {
        println!("{:#}", scene.handle().configuration());
    }
    scene.stop();
    Ok(())
}
