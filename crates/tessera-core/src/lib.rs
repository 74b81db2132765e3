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


//! # Tessera Core
//!
//! Contracts shared by both sides of the sandbox boundary: element identity,
//! per-entity sequence numbers, element kinds, snapshot shapes, the protocol
//! messages exchanged between the host and the sandbox, and the channel
//! endpoints that carry them.
//!
//! Nothing in this crate holds scene state. The sandbox-side object model
//! lives in `tessera-kernel`; the authoritative scene graph lives on the host.

#![warn(missing_docs)]

pub mod enums;
pub mod identity;
pub mod kind;
pub mod protocol;
pub mod snapshot;
pub mod transport;

pub use enums::*;
pub use identity::{CommandId, ElementId, Sequence};
pub use kind::ElementKind;
pub use protocol::{HostMessage, MutationCommand, Rejection, SandboxMessage};
pub use transport::{channel, Disconnected, Endpoint, HostEndpoint, SandboxEndpoint};
