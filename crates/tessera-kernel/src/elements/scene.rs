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


use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tessera_core::snapshot::SceneSnapshot;
use tessera_core::ElementKind;

use super::Node;
use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved scene fields.
#[derive(Debug, Clone)]
pub struct SceneState {
    name: Option<String>,
    nodes: Vec<Rc<Node>>,
}

/// A set of root nodes to render.
#[derive(Debug)]
pub struct Scene {
    base: ElementBase,
    state: RefCell<SceneState>,
}

impl Scene {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// The root nodes.
    pub fn nodes(&self) -> Vec<Rc<Node>> {
        self.state.borrow().nodes.clone()
    }

    /// Every node reachable from the roots, depth first, each listed once.
    pub fn descendants(&self) -> Vec<Rc<Node>> {
        let mut visited = Vec::new();
        let mut stack: Vec<Rc<Node>> = self.nodes().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if visited.iter().any(|seen| Rc::ptr_eq(seen, &node)) {
                continue;
            }
            stack.extend(node.children().into_iter().rev());
            visited.push(node);
        }
        visited
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }
}

impl Element for Scene {
    const KIND: &'static str = ElementKind::Scene.as_str();
    type Snapshot = SceneSnapshot;
    type State = SceneState;

    fn resolve(snapshot: SceneSnapshot, resolver: &mut Resolver<'_>) -> Result<SceneState, KernelError> {
        Ok(SceneState {
            nodes: resolver.elements(ElementKind::Node.as_str(), &snapshot.nodes)?,
            name: snapshot.name,
        })
    }

    fn construct(base: ElementBase, state: SceneState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: SceneState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
