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
use tessera_core::snapshot::MeshSnapshot;
use tessera_core::ElementKind;

use super::Primitive;
use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved mesh fields.
#[derive(Debug, Clone)]
pub struct MeshState {
    name: Option<String>,
    primitives: Vec<Rc<Primitive>>,
    weights: Vec<f32>,
}

/// A set of primitives drawn together.
#[derive(Debug)]
pub struct Mesh {
    base: ElementBase,
    state: RefCell<MeshState>,
}

impl Mesh {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// The primitives, in draw order.
    pub fn primitives(&self) -> Vec<Rc<Primitive>> {
        self.state.borrow().primitives.clone()
    }

    /// Default morph target weights.
    pub fn weights(&self) -> Vec<f32> {
        self.state.borrow().weights.clone()
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }

    /// Requests new morph target weights.
    pub fn set_weights(&self, weights: &[f32]) -> PendingMutation {
        self.base.dispatch("weights", json!(weights))
    }
}

impl Element for Mesh {
    const KIND: &'static str = ElementKind::Mesh.as_str();
    type Snapshot = MeshSnapshot;
    type State = MeshState;

    fn resolve(snapshot: MeshSnapshot, resolver: &mut Resolver<'_>) -> Result<MeshState, KernelError> {
        Ok(MeshState {
            primitives: resolver.elements(ElementKind::Primitive.as_str(), &snapshot.primitives)?,
            name: snapshot.name,
            weights: snapshot.weights,
        })
    }

    fn construct(base: ElementBase, state: MeshState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: MeshState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
