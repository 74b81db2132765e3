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
use std::collections::BTreeMap;
use std::rc::Rc;
use tessera_core::snapshot::PrimitiveSnapshot;
use tessera_core::{ElementKind, PrimitiveMode};

use super::{Accessor, Material};
use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved primitive fields.
#[derive(Debug, Clone)]
pub struct PrimitiveState {
    mode: PrimitiveMode,
    attributes: BTreeMap<String, Rc<Accessor>>,
    indices: Option<Rc<Accessor>>,
    material: Option<Rc<Material>>,
}

impl PrimitiveState {
    fn resolve(snapshot: PrimitiveSnapshot, resolver: &mut Resolver<'_>) -> Result<Self, KernelError> {
        let accessor = ElementKind::Accessor.as_str();
        let mut attributes: BTreeMap<String, Rc<Accessor>> = BTreeMap::new();
        for (semantic, attribute) in &snapshot.attributes {
            attributes.insert(semantic.clone(), resolver.element(accessor, attribute)?);
        }
        Ok(Self {
            mode: snapshot.mode,
            attributes,
            indices: resolver.optional_element(accessor, snapshot.indices.as_ref())?,
            material: resolver
                .optional_element(ElementKind::Material.as_str(), snapshot.material.as_ref())?,
        })
    }
}

/// One draw call's worth of geometry within a [`Mesh`](super::Mesh).
#[derive(Debug)]
pub struct Primitive {
    base: ElementBase,
    state: RefCell<PrimitiveState>,
}

impl Primitive {
    /// The topology.
    pub fn mode(&self) -> PrimitiveMode {
        self.state.borrow().mode
    }

    /// Vertex attributes by semantic (`POSITION`, `NORMAL`, `TEXCOORD_0`, ...).
    pub fn attributes(&self) -> BTreeMap<String, Rc<Accessor>> {
        self.state.borrow().attributes.clone()
    }

    /// The accessor bound to one semantic.
    pub fn attribute(&self, semantic: &str) -> Option<Rc<Accessor>> {
        self.state.borrow().attributes.get(semantic).cloned()
    }

    /// The index buffer, for indexed geometry.
    pub fn indices(&self) -> Option<Rc<Accessor>> {
        self.state.borrow().indices.clone()
    }

    /// The material, or `None` for the default material.
    pub fn material(&self) -> Option<Rc<Material>> {
        self.state.borrow().material.clone()
    }

    /// Requests a different material. `None` selects the default material.
    pub fn set_material(&self, material: Option<&Material>) -> PendingMutation {
        let value = match material {
            Some(material) => json!(Element::id(material)),
            None => Value::Null,
        };
        self.base.dispatch("material", value)
    }
}

impl Element for Primitive {
    const KIND: &'static str = ElementKind::Primitive.as_str();
    type Snapshot = PrimitiveSnapshot;
    type State = PrimitiveState;

    fn resolve(snapshot: PrimitiveSnapshot, resolver: &mut Resolver<'_>) -> Result<PrimitiveState, KernelError> {
        PrimitiveState::resolve(snapshot, resolver)
    }

    fn construct(base: ElementBase, state: PrimitiveState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: PrimitiveState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
