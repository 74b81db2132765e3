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


use tessera_core::snapshot::PbrMetallicRoughnessSnapshot;
use tessera_core::ElementKind;

use super::TextureInfo;
use crate::{KernelError, Resolver, ValueObject};

/// The metallic-roughness block of a [`Material`](super::Material).
#[derive(Debug, Clone)]
pub struct PbrMetallicRoughness {
    base_color_factor: [f32; 4],
    base_color_texture: Option<TextureInfo>,
    metallic_factor: f32,
    roughness_factor: f32,
    metallic_roughness_texture: Option<TextureInfo>,
}

impl PbrMetallicRoughness {
    /// Linear RGBA base color.
    pub fn base_color_factor(&self) -> [f32; 4] {
        self.base_color_factor
    }

    /// The base color map.
    pub fn base_color_texture(&self) -> Option<&TextureInfo> {
        self.base_color_texture.as_ref()
    }

    /// Metalness, in `[0, 1]`.
    pub fn metallic_factor(&self) -> f32 {
        self.metallic_factor
    }

    /// Roughness, in `[0, 1]`.
    pub fn roughness_factor(&self) -> f32 {
        self.roughness_factor
    }

    /// The packed metalness (B) and roughness (G) map.
    pub fn metallic_roughness_texture(&self) -> Option<&TextureInfo> {
        self.metallic_roughness_texture.as_ref()
    }
}

impl ValueObject for PbrMetallicRoughness {
    const KIND: &'static str = ElementKind::PbrMetallicRoughness.as_str();
    type Snapshot = PbrMetallicRoughnessSnapshot;

    fn construct(
        snapshot: PbrMetallicRoughnessSnapshot,
        resolver: &mut Resolver<'_>,
    ) -> Result<Self, KernelError> {
        let texture_info = ElementKind::TextureInfo.as_str();
        Ok(Self {
            base_color_factor: snapshot.base_color_factor,
            base_color_texture: resolver
                .optional_value(texture_info, snapshot.base_color_texture.as_ref())?,
            metallic_factor: snapshot.metallic_factor,
            roughness_factor: snapshot.roughness_factor,
            metallic_roughness_texture: resolver
                .optional_value(texture_info, snapshot.metallic_roughness_texture.as_ref())?,
        })
    }
}
