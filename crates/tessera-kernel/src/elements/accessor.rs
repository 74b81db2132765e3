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
use tessera_core::snapshot::AccessorSnapshot;
use tessera_core::{AccessorType, ComponentType, ElementKind};

use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// A typed view into vertex or index data.
///
/// Only the layout is mirrored; the data itself stays on the host.
#[derive(Debug)]
pub struct Accessor {
    base: ElementBase,
    state: RefCell<AccessorSnapshot>,
}

impl Accessor {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// The scalar type of each component.
    pub fn component_type(&self) -> ComponentType {
        self.state.borrow().component_type
    }

    /// Scalar, vector or matrix.
    pub fn accessor_type(&self) -> AccessorType {
        self.state.borrow().accessor_type
    }

    /// Number of elements. Read-only.
    pub fn count(&self) -> u64 {
        self.state.borrow().count
    }

    /// Whether integer components are normalized to `[0, 1]` or `[-1, 1]`.
    pub fn normalized(&self) -> bool {
        self.state.borrow().normalized
    }

    /// Per-component minimum.
    pub fn min(&self) -> Option<Vec<f64>> {
        self.state.borrow().min.clone()
    }

    /// Per-component maximum.
    pub fn max(&self) -> Option<Vec<f64>> {
        self.state.borrow().max.clone()
    }

    /// Size of the tightly packed data, in bytes, or `None` if it does not
    /// fit in a `u64`.
    pub fn byte_length(&self) -> Option<u64> {
        let state = self.state.borrow();
        let element = state.component_type.size() * state.accessor_type.components();
        state.count.checked_mul(element as u64)
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }
}

impl Element for Accessor {
    const KIND: &'static str = ElementKind::Accessor.as_str();
    type Snapshot = AccessorSnapshot;
    type State = AccessorSnapshot;

    fn resolve(snapshot: AccessorSnapshot, _resolver: &mut Resolver<'_>) -> Result<AccessorSnapshot, KernelError> {
        Ok(snapshot)
    }

    fn construct(base: ElementBase, state: AccessorSnapshot) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: AccessorSnapshot) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
