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


use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tessera_core::snapshot::NodeSnapshot;
use tessera_core::ElementKind;

use super::Mesh;
use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved node fields.
#[derive(Debug, Clone)]
pub struct NodeState {
    name: Option<String>,
    children: Vec<Rc<Node>>,
    mesh: Option<Rc<Mesh>>,
    translation: [f32; 3],
    rotation: [f32; 4],
    scale: [f32; 3],
}

/// A transform in the scene hierarchy, optionally carrying a mesh.
#[derive(Debug)]
pub struct Node {
    base: ElementBase,
    state: RefCell<NodeState>,
}

impl Node {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// The direct children.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.state.borrow().children.clone()
    }

    /// The mesh instanced at this node.
    pub fn mesh(&self) -> Option<Rc<Mesh>> {
        self.state.borrow().mesh.clone()
    }

    /// Local translation.
    pub fn translation(&self) -> [f32; 3] {
        self.state.borrow().translation
    }

    /// Local rotation as a unit quaternion `(x, y, z, w)`.
    pub fn rotation(&self) -> [f32; 4] {
        self.state.borrow().rotation
    }

    /// Local scale.
    pub fn scale(&self) -> [f32; 3] {
        self.state.borrow().scale
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }

    /// Requests a new local translation.
    pub fn set_translation(&self, translation: [f32; 3]) -> PendingMutation {
        self.base.dispatch("translation", json!(translation))
    }

    /// Requests a new local rotation.
    pub fn set_rotation(&self, rotation: [f32; 4]) -> PendingMutation {
        self.base.dispatch("rotation", json!(rotation))
    }

    /// Requests a new local scale.
    pub fn set_scale(&self, scale: [f32; 3]) -> PendingMutation {
        self.base.dispatch("scale", json!(scale))
    }

    /// Requests a different mesh. `None` detaches the current one.
    pub fn set_mesh(&self, mesh: Option<&Mesh>) -> PendingMutation {
        let value = match mesh {
            Some(mesh) => json!(Element::id(mesh)),
            None => Value::Null,
        };
        self.base.dispatch("mesh", value)
    }
}

impl Element for Node {
    const KIND: &'static str = ElementKind::Node.as_str();
    type Snapshot = NodeSnapshot;
    type State = NodeState;

    fn resolve(snapshot: NodeSnapshot, resolver: &mut Resolver<'_>) -> Result<NodeState, KernelError> {
        Ok(NodeState {
            children: resolver.elements(ElementKind::Node.as_str(), &snapshot.children)?,
            mesh: resolver.optional_element(ElementKind::Mesh.as_str(), snapshot.mesh.as_ref())?,
            name: snapshot.name,
            translation: snapshot.translation,
            rotation: snapshot.rotation,
            scale: snapshot.scale,
        })
    }

    fn construct(base: ElementBase, state: NodeState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: NodeState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
