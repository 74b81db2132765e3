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
use tessera_core::snapshot::MaterialSnapshot;
use tessera_core::{AlphaMode, ElementKind};

use super::{NormalTextureInfo, OcclusionTextureInfo, PbrMetallicRoughness, TextureInfo};
use crate::{Element, ElementBase, KernelError, PendingMutation, Resolver};

/// Resolved material fields.
#[derive(Debug, Clone)]
pub struct MaterialState {
    name: Option<String>,
    pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    normal_texture: Option<NormalTextureInfo>,
    occlusion_texture: Option<OcclusionTextureInfo>,
    emissive_texture: Option<TextureInfo>,
    emissive_factor: [f32; 3],
    alpha_mode: AlphaMode,
    alpha_cutoff: Option<f32>,
    double_sided: bool,
}

impl MaterialState {
    fn resolve(snapshot: MaterialSnapshot, resolver: &mut Resolver<'_>) -> Result<Self, KernelError> {
        Ok(Self {
            pbr_metallic_roughness: resolver.optional_value(
                ElementKind::PbrMetallicRoughness.as_str(),
                snapshot.pbr_metallic_roughness.as_ref(),
            )?,
            normal_texture: resolver.optional_value(
                ElementKind::NormalTextureInfo.as_str(),
                snapshot.normal_texture.as_ref(),
            )?,
            occlusion_texture: resolver.optional_value(
                ElementKind::OcclusionTextureInfo.as_str(),
                snapshot.occlusion_texture.as_ref(),
            )?,
            emissive_texture: resolver.optional_value(
                ElementKind::TextureInfo.as_str(),
                snapshot.emissive_texture.as_ref(),
            )?,
            name: snapshot.name,
            emissive_factor: snapshot.emissive_factor,
            alpha_mode: snapshot.alpha_mode,
            alpha_cutoff: snapshot.alpha_cutoff,
            double_sided: snapshot.double_sided,
        })
    }
}

/// A surface description following the glTF metallic-roughness model.
#[derive(Debug)]
pub struct Material {
    base: ElementBase,
    state: RefCell<MaterialState>,
}

impl Material {
    /// The user-facing name. Not unique.
    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// The metallic-roughness block, when the material has one.
    pub fn pbr_metallic_roughness(&self) -> Option<PbrMetallicRoughness> {
        self.state.borrow().pbr_metallic_roughness.clone()
    }

    /// The tangent-space normal map.
    pub fn normal_texture(&self) -> Option<NormalTextureInfo> {
        self.state.borrow().normal_texture.clone()
    }

    /// The ambient occlusion map.
    pub fn occlusion_texture(&self) -> Option<OcclusionTextureInfo> {
        self.state.borrow().occlusion_texture.clone()
    }

    /// The emissive map.
    pub fn emissive_texture(&self) -> Option<TextureInfo> {
        self.state.borrow().emissive_texture.clone()
    }

    /// Linear RGB emissive color.
    pub fn emissive_factor(&self) -> [f32; 3] {
        self.state.borrow().emissive_factor
    }

    /// How the alpha channel is interpreted.
    pub fn alpha_mode(&self) -> AlphaMode {
        self.state.borrow().alpha_mode
    }

    /// The cutoff used in [`AlphaMode::Mask`].
    pub fn alpha_cutoff(&self) -> Option<f32> {
        self.state.borrow().alpha_cutoff
    }

    /// Whether back faces are rendered.
    pub fn double_sided(&self) -> bool {
        self.state.borrow().double_sided
    }

    /// Requests a new name. `None` clears it.
    pub fn set_name(&self, name: Option<&str>) -> PendingMutation {
        self.base.dispatch("name", json!(name))
    }

    /// Requests a new emissive color.
    pub fn set_emissive_factor(&self, factor: [f32; 3]) -> PendingMutation {
        self.base.dispatch("emissiveFactor", json!(factor))
    }

    /// Requests a new alpha mode.
    pub fn set_alpha_mode(&self, mode: AlphaMode) -> PendingMutation {
        self.base.dispatch("alphaMode", json!(mode))
    }

    /// Requests a new alpha cutoff. `None` clears it.
    pub fn set_alpha_cutoff(&self, cutoff: Option<f32>) -> PendingMutation {
        self.base.dispatch("alphaCutoff", json!(cutoff))
    }

    /// Requests back faces be rendered or culled.
    pub fn set_double_sided(&self, double_sided: bool) -> PendingMutation {
        self.base.dispatch("doubleSided", json!(double_sided))
    }

    /// Requests a new base color on the metallic-roughness block.
    pub fn set_base_color_factor(&self, factor: [f32; 4]) -> PendingMutation {
        self.base
            .dispatch("pbrMetallicRoughness.baseColorFactor", json!(factor))
    }

    /// Requests a new metalness, in `[0, 1]`.
    pub fn set_metallic_factor(&self, factor: f32) -> PendingMutation {
        self.base
            .dispatch("pbrMetallicRoughness.metallicFactor", json!(factor))
    }

    /// Requests a new roughness, in `[0, 1]`.
    pub fn set_roughness_factor(&self, factor: f32) -> PendingMutation {
        self.base
            .dispatch("pbrMetallicRoughness.roughnessFactor", json!(factor))
    }
}

impl Element for Material {
    const KIND: &'static str = ElementKind::Material.as_str();
    type Snapshot = MaterialSnapshot;
    type State = MaterialState;

    fn resolve(snapshot: MaterialSnapshot, resolver: &mut Resolver<'_>) -> Result<MaterialState, KernelError> {
        MaterialState::resolve(snapshot, resolver)
    }

    fn construct(base: ElementBase, state: MaterialState) -> Self {
        Self {
            base,
            state: RefCell::new(state),
        }
    }

    fn replace(&self, state: MaterialState) {
        self.state.replace(state);
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }
}
