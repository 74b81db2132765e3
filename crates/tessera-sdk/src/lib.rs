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


//! The public-facing bootstrap for Tessera sandboxes.
//!
//! A [`Sandbox`] owns a kernel wired to one end of a host link. It performs
//! the capability handshake on connect and feeds inbound host messages into
//! the kernel each time it is pumped. The `in_process` and `spawn_host`
//! helpers wire a sandbox to a reference [`HostService`] without any
//! transport of their own.

mod config;
mod sandbox;

pub use config::SandboxConfig;
pub use sandbox::{in_process, spawn_host, PumpReport, Sandbox};

pub use tessera_host::{HostHandle, HostService, SceneGraph};
pub use tessera_kernel::{Capabilities, Kernel, KernelError, PendingMutation};

pub mod prelude {
    //! The types most sandbox scripts touch.
    pub use tessera_core::{AlphaMode, ElementId, MagFilter, MinFilter, WrapMode};
    pub use tessera_kernel::elements::*;
    pub use tessera_kernel::{Element, MutationReceipt, PendingMutation};
}
