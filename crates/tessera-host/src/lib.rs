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


//! # Tessera Host
//!
//! A reference implementation of the privileged side of the sandbox
//! boundary. It keeps the authoritative scene graph, imported from glTF, and
//! serves it to a sandbox over a [`HostEndpoint`](tessera_core::HostEndpoint):
//!
//! - [`SceneGraph`] holds one [`Record`] per entity, emits snapshots with
//!   nested snapshots embedded, and validates and applies mutation commands.
//! - [`HostService`] answers the sandbox's handshake, applies its mutations,
//!   re-synchronizes the targets and acknowledges each command. It runs
//!   step-wise or on its own thread.
//!
//! This host is not a renderer. Buffer and image data are never read.

#![warn(missing_docs)]

mod apply;
mod config;
mod graph;
mod import;
mod record;
mod service;
mod snapshot;

pub use config::HostConfig;
pub use graph::SceneGraph;
pub use record::{
    AccessorRecord, MaterialRecord, MeshRecord, NodeRecord, PbrRecord, PrimitiveRecord, Record,
    RecordData, SamplerRecord, SceneRecord, TextureRecord, TextureRef,
};
pub use service::{HostHandle, HostService};
