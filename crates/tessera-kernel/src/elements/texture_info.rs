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


//! Texture references: which texture a material slot samples, and how.

use std::rc::Rc;
use tessera_core::snapshot::{
    NormalTextureInfoSnapshot, OcclusionTextureInfoSnapshot, TextureInfoSnapshot,
};
use tessera_core::ElementKind;

use super::Texture;
use crate::{KernelError, Resolver, ValueObject};

fn texture(resolver: &mut Resolver<'_>, snapshot: &serde_json::Value) -> Result<Rc<Texture>, KernelError> {
    resolver.element::<Texture>(ElementKind::Texture.as_str(), snapshot)
}

/// A reference to a texture and the UV set it is sampled with.
#[derive(Debug, Clone)]
pub struct TextureInfo {
    texture: Rc<Texture>,
    tex_coord: u32,
}

impl TextureInfo {
    /// The referenced texture.
    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    /// The `TEXCOORD_n` set index.
    pub fn tex_coord(&self) -> u32 {
        self.tex_coord
    }
}

impl ValueObject for TextureInfo {
    const KIND: &'static str = ElementKind::TextureInfo.as_str();
    type Snapshot = TextureInfoSnapshot;

    fn construct(snapshot: TextureInfoSnapshot, resolver: &mut Resolver<'_>) -> Result<Self, KernelError> {
        Ok(Self {
            texture: texture(resolver, &snapshot.texture)?,
            tex_coord: snapshot.tex_coord,
        })
    }
}

/// A normal map reference.
#[derive(Debug, Clone)]
pub struct NormalTextureInfo {
    texture: Rc<Texture>,
    tex_coord: u32,
    scale: f32,
}

impl NormalTextureInfo {
    /// The referenced texture.
    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    /// The `TEXCOORD_n` set index.
    pub fn tex_coord(&self) -> u32 {
        self.tex_coord
    }

    /// Scale applied to the sampled normal's X and Y.
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl ValueObject for NormalTextureInfo {
    const KIND: &'static str = ElementKind::NormalTextureInfo.as_str();
    type Snapshot = NormalTextureInfoSnapshot;

    fn construct(
        snapshot: NormalTextureInfoSnapshot,
        resolver: &mut Resolver<'_>,
    ) -> Result<Self, KernelError> {
        Ok(Self {
            texture: texture(resolver, &snapshot.texture)?,
            tex_coord: snapshot.tex_coord,
            scale: snapshot.scale,
        })
    }
}

/// An ambient occlusion map reference.
#[derive(Debug, Clone)]
pub struct OcclusionTextureInfo {
    texture: Rc<Texture>,
    tex_coord: u32,
    strength: f32,
}

impl OcclusionTextureInfo {
    /// The referenced texture.
    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    /// The `TEXCOORD_n` set index.
    pub fn tex_coord(&self) -> u32 {
        self.tex_coord
    }

    /// How strongly occlusion is applied, in `[0, 1]`.
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl ValueObject for OcclusionTextureInfo {
    const KIND: &'static str = ElementKind::OcclusionTextureInfo.as_str();
    type Snapshot = OcclusionTextureInfoSnapshot;

    fn construct(
        snapshot: OcclusionTextureInfoSnapshot,
        resolver: &mut Resolver<'_>,
    ) -> Result<Self, KernelError> {
        Ok(Self {
            texture: texture(resolver, &snapshot.texture)?,
            tex_coord: snapshot.tex_coord,
            strength: snapshot.strength,
        })
    }
}
