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


//! Serialized snapshot shapes.
//!
//! A snapshot is a plain `serde_json::Value` whose shape is fully determined
//! by its kind. The structs in this module describe those shapes: the host
//! serializes them, the sandbox deserializes them.
//!
//! Nested sub-structures are kept as raw [`Value`]s. The sandbox resolves each
//! one through the kernel under an explicit kind discriminator; it never
//! treats a nested snapshot as already typed. Absent optional fields are
//! written as `null` by the host and tolerated when omitted.

mod geometry;
mod hierarchy;
mod material;
mod texture;

pub use geometry::*;
pub use hierarchy::*;
pub use material::*;
pub use texture::*;

use serde::{Deserialize, Serialize};
pub use serde_json::Value;

use crate::identity::{ElementId, Sequence};

/// The fields every identity-bearing snapshot starts with.
///
/// Parsing only the header lets the kernel check its identity cache before it
/// decides whether the rest of the snapshot needs to be read at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// The entity's identity.
    pub id: ElementId,
    /// The entity's version at the time the snapshot was taken.
    pub sequence: Sequence,
}

fn one() -> f32 {
    1.0
}

fn white() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}
