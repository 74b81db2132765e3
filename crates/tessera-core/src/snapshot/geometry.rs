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


//! Accessor, primitive and mesh snapshot shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::enums::{AccessorType, ComponentType, PrimitiveMode};
use crate::identity::{ElementId, Sequence};

/// Snapshot of kind `accessor`.
///
/// Only the accessor's description crosses the boundary; the bytes it points
/// at stay on the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Component data type. Required.
    pub component_type: ComponentType,
    /// Element shape. Required.
    #[serde(rename = "type")]
    pub accessor_type: AccessorType,
    /// Number of elements. Required.
    pub count: u64,
    /// Whether integer components are normalized to `[0, 1]` or `[-1, 1]`.
    #[serde(default)]
    pub normalized: bool,
    /// Per-component minimum.
    #[serde(default)]
    pub min: Option<Vec<f64>>,
    /// Per-component maximum.
    #[serde(default)]
    pub max: Option<Vec<f64>>,
}

/// Snapshot of kind `primitive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Topology.
    #[serde(default)]
    pub mode: PrimitiveMode,
    /// Vertex attributes by semantic (`POSITION`, `TEXCOORD_0`, ...), each a
    /// nested `accessor` snapshot.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    /// Nested `accessor` snapshot for the index buffer.
    #[serde(default)]
    pub indices: Option<Value>,
    /// Nested `material` snapshot.
    #[serde(default)]
    pub material: Option<Value>,
}

/// Snapshot of kind `mesh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested `primitive` snapshots, in draw order.
    #[serde(default)]
    pub primitives: Vec<Value>,
    /// Default morph target weights.
    #[serde(default)]
    pub weights: Vec<f32>,
}
