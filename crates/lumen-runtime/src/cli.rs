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

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Runs a headless rendering scene")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Name of the scene.
    #[arg(long, default_value = "local")]
    pub name: String,

    /// Configuration document to replay before starting.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Stop after this many loop iterations instead of waiting for `quit`.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Log filter directives, in `RUST_LOG` syntax.
    #[arg(long)]
    pub log: Option<String>,

    /// Make this scene the master of the session.
    #[arg(long)]
    pub master: bool,

    /// Run without any visible window.
    #[arg(long)]
    pub background: bool,

    /// Print the configuration document on exit.
    #[arg(long)]
    pub dump_config: bool,
}
