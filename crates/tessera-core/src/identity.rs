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


//! Identifiers shared across the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::kind::ElementKind;

/// The stable identity of one scene-graph entity.
///
/// Identities are assigned by the host and carried in every identity-bearing
/// snapshot. An identity never changes for the lifetime of its entity and is
/// the only key the sandbox uses to deduplicate elements. Names are not
/// identities: two elements may share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Creates a new, random (version 4) `ElementId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a deterministic (version 5) `ElementId` for the `index`-th
    /// entity of `kind` inside the document identified by `namespace`.
    ///
    /// The same `(namespace, kind, index)` always yields the same id, so a
    /// document re-imported under the same namespace keeps its identities.
    pub fn derive(namespace: &Uuid, kind: ElementKind, index: usize) -> Self {
        let name = format!("{}/{}", kind.as_str(), index);
        Self(Uuid::new_v5(namespace, name.as_bytes()))
    }

    /// Wraps an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ElementId {
    /// Creates a new, random (version 4) `ElementId`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A per-entity version number.
///
/// The host bumps an entity's sequence every time its authoritative state
/// changes and stamps the current value on each snapshot. The sandbox applies
/// a snapshot only when its sequence is strictly greater than the one it
/// already holds for that identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    /// The sequence stamped on an entity when it is first created.
    pub const INITIAL: Sequence = Sequence(1);

    /// Wraps a raw sequence value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the sequence that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Correlates a mutation command with its acknowledgement.
///
/// Allocated by the sandbox, unique within one kernel lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(u64);

impl CommandId {
    /// Wraps a raw command number.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}
