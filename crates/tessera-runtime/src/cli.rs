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


//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tessera_sdk::SandboxConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "tessera-runtime")]
#[command(about = "Serve a glTF scene to a sandbox and print what the sandbox sees", long_about = None)]
pub struct Cli {
    /// The `.gltf` or `.glb` file to load
    pub path: PathBuf,

    /// Rename every material called FROM to TO, through the sandbox
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    pub rename_material: Option<Vec<String>>,

    /// How long to wait for the host, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Deepest snapshot nesting the sandbox accepts
    #[arg(long, default_value_t = 64)]
    pub max_depth: usize,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn sandbox_config(&self) -> SandboxConfig {
        let mut config = SandboxConfig::default();
        config.kernel.max_depth = self.max_depth;
        config
    }

    /// The `(from, to)` pair of `--rename-material`.
    pub fn rename(&self) -> Option<(&str, &str)> {
        match self.rename_material.as_deref() {
            Some([from, to]) => Some((from.as_str(), to.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_takes_two_values() {
        let cli = Cli::parse_from([
            "tessera-runtime",
            "scene.gltf",
            "--rename-material",
            "Old",
            "New",
            "--max-depth",
            "8",
        ]);

        assert_eq!(cli.rename(), Some(("Old", "New")));
        assert_eq!(cli.sandbox_config().kernel.max_depth, 8);
        assert_eq!(cli.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_rename_is_optional() {
        let cli = Cli::parse_from(["tessera-runtime", "scene.glb"]);
        assert_eq!(cli.rename(), None);
    }
}
