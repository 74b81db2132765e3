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


//! Node and scene snapshot shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::{ElementId, Sequence};

/// Snapshot of kind `node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested `node` snapshots.
    #[serde(default)]
    pub children: Vec<Value>,
    /// Nested `mesh` snapshot.
    #[serde(default)]
    pub mesh: Option<Value>,
    /// Local translation.
    #[serde(default)]
    pub translation: [f32; 3],
    /// Local rotation as an `[x, y, z, w]` quaternion.
    #[serde(default = "super::identity_rotation")]
    pub rotation: [f32; 4],
    /// Local scale.
    #[serde(default = "super::unit_scale")]
    pub scale: [f32; 3],
}

/// Snapshot of kind `scene`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested root `node` snapshots.
    #[serde(default)]
    pub nodes: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_transform_defaults() {
        let node: NodeSnapshot =
            serde_json::from_value(json!({ "id": ElementId::new(), "sequence": 1 })).unwrap();
        assert_eq!(node.translation, [0.0, 0.0, 0.0]);
        assert_eq!(node.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(node.scale, [1.0, 1.0, 1.0]);
        assert!(node.children.is_empty());
        assert!(node.mesh.is_none());
    }
}
