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
use tessera_core::snapshot::SamplerSnapshot;
use tessera_core::{ElementKind, MagFilter, MinFilter, WrapMode};

use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved sampler fields.
#[derive(Debug, Clone)]
pub struct SamplerState {
    name: Option<String>,
    mag_filter: Option<MagFilter>,
    min_filter: Option<MinFilter>,
    wrap_s: WrapMode,
    wrap_t: WrapMode,
}

impl From<SamplerSnapshot> for SamplerState {
    fn from(snapshot: SamplerSnapshot) -> Self {
        Self {
            name: snapshot.name,
            mag_filter: snapshot.mag_filter,
            min_filter: snapshot.min_filter,
            wrap_s: snapshot.wrap_s,
            wrap_t: snapshot.wrap_t,
        }
    }
}

/// Filtering and wrapping for a [`Texture`](super::Texture).
#[derive(Debug)]
pub struct Sampler {
    base: ElementBase,
    state: RefCell<SamplerState>,
}

impl Sampler {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// Magnification filter. `None` leaves the choice to the renderer.
    pub fn mag_filter(&self) -> Option<MagFilter> {
        self.state.borrow().mag_filter
    }

    /// Minification filter. `None` leaves the choice to the renderer.
    pub fn min_filter(&self) -> Option<MinFilter> {
        self.state.borrow().min_filter
    }

    /// Wrapping along U.
    pub fn wrap_s(&self) -> WrapMode {
        self.state.borrow().wrap_s
    }

    /// Wrapping along V.
    pub fn wrap_t(&self) -> WrapMode {
        self.state.borrow().wrap_t
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }

    /// Requests a new magnification filter.
    pub fn set_mag_filter(&self, filter: Option<MagFilter>) -> PendingMutation {
        self.base.dispatch("magFilter", json!(filter))
    }

    /// Requests a new minification filter.
    pub fn set_min_filter(&self, filter: Option<MinFilter>) -> PendingMutation {
        self.base.dispatch("minFilter", json!(filter))
    }

    /// Requests a new U wrapping mode.
    pub fn set_wrap_s(&self, mode: WrapMode) -> PendingMutation {
        self.base.dispatch("wrapS", json!(mode))
    }

    /// Requests a new V wrapping mode.
    pub fn set_wrap_t(&self, mode: WrapMode) -> PendingMutation {
        self.base.dispatch("wrapT", json!(mode))
    }
}

impl Element for Sampler {
    const KIND: &'static str = ElementKind::Sampler.as_str();
    type Snapshot = SamplerSnapshot;
    type State = SamplerState;

    fn resolve(snapshot: SamplerSnapshot, _resolver: &mut Resolver<'_>) -> Result<SamplerState, KernelError> {
        Ok(snapshot.into())
    }

    fn construct(base: ElementBase, state: SamplerState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: SamplerState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
