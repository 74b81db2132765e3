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


use std::time::Duration;
use tessera_kernel::KernelConfig;

/// Configuration for a [`Sandbox`](crate::Sandbox).
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Configuration for the sandbox's kernel.
    pub kernel: KernelConfig,
    /// Upper bound on the messages one pump applies, so a flood of updates
    /// cannot starve the script.
    pub max_messages_per_pump: usize,
    /// How long [`Sandbox::wait`](crate::Sandbox::wait) blocks for the first
    /// message.
    pub pump_timeout: Duration,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            kernel: KernelConfig::default(),
            max_messages_per_pump: 1024,
            pump_timeout: Duration::from_millis(50),
        }
    }
}
