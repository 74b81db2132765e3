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
use tessera_core::snapshot::TextureSnapshot;
use tessera_core::ElementKind;

use super::Sampler;
use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved texture fields.
#[derive(Debug, Clone)]
pub struct TextureState {
    name: Option<String>,
    sampler: Option<Rc<Sampler>>,
    source: Option<String>,
}

/// An image paired with the sampler used to read it.
#[derive(Debug)]
pub struct Texture {
    base: ElementBase,
    state: RefCell<TextureState>,
}

impl Texture {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// The sampler, or `None` for the default repeat/auto filtering.
    pub fn sampler(&self) -> Option<Rc<Sampler>> {
        self.state.borrow().sampler.clone()
    }

    /// The image URI or name.
    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }
}

impl Element for Texture {
    const KIND: &'static str = ElementKind::Texture.as_str();
    type Snapshot = TextureSnapshot;
    type State = TextureState;

    fn resolve(snapshot: TextureSnapshot, resolver: &mut Resolver<'_>) -> Result<TextureState, KernelError> {
        Ok(TextureState {
            sampler: resolver
                .optional_element(ElementKind::Sampler.as_str(), snapshot.sampler.as_ref())?,
            name: snapshot.name,
            source: snapshot.source,
        })
    }

    fn construct(base: ElementBase, state: TextureState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: TextureState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
