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


//! Authoritative per-entity records.
//!
//! Records store references to other entities by [`ElementId`]. Nested
//! snapshots are only assembled when a snapshot is emitted.

use std::collections::BTreeMap;
use tessera_core::{
    AccessorType, AlphaMode, ComponentType, ElementId, ElementKind, MagFilter, MinFilter,
    PrimitiveMode, Sequence, WrapMode,
};

/// A texture slot: which texture, sampled with which UV set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRef {
    /// The referenced texture.
    pub texture: ElementId,
    /// The `TEXCOORD_n` set index.
    pub tex_coord: u32,
}

/// The metallic-roughness block of a material.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct PbrRecord {
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureRef>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<TextureRef>,
}

impl Default for PbrRecord {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0; 4],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub name: Option<String>,
    pub pbr_metallic_roughness: Option<PbrRecord>,
    pub normal_texture: Option<TextureRef>,
    pub normal_scale: f32,
    pub occlusion_texture: Option<TextureRef>,
    pub occlusion_strength: f32,
    pub emissive_texture: Option<TextureRef>,
    pub emissive_factor: [f32; 3],
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: Option<f32>,
    pub double_sided: bool,
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            name: None,
            pbr_metallic_roughness: None,
            normal_texture: None,
            normal_scale: 1.0,
            occlusion_texture: None,
            occlusion_strength: 1.0,
            emissive_texture: None,
            emissive_factor: [0.0; 3],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: None,
            double_sided: false,
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureRecord {
    pub name: Option<String>,
    pub sampler: Option<ElementId>,
    pub source: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplerRecord {
    pub name: Option<String>,
    pub mag_filter: Option<MagFilter>,
    pub min_filter: Option<MinFilter>,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorRecord {
    pub name: Option<String>,
    pub component_type: ComponentType,
    pub accessor_type: AccessorType,
    pub count: u64,
    pub normalized: bool,
    pub min: Option<Vec<f64>>,
    pub max: Option<Vec<f64>>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveRecord {
    pub mode: PrimitiveMode,
    pub attributes: BTreeMap<String, ElementId>,
    pub indices: Option<ElementId>,
    pub material: Option<ElementId>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshRecord {
    pub name: Option<String>,
    pub primitives: Vec<ElementId>,
    pub weights: Vec<f32>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub name: Option<String>,
    pub children: Vec<ElementId>,
    pub mesh: Option<ElementId>,
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            name: None,
            children: Vec::new(),
            mesh: None,
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneRecord {
    pub name: Option<String>,
    pub nodes: Vec<ElementId>,
}

/// The kind-specific part of a record.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    Material(MaterialRecord),
    Texture(TextureRecord),
    Sampler(SamplerRecord),
    Accessor(AccessorRecord),
    Primitive(PrimitiveRecord),
    Mesh(MeshRecord),
    Node(NodeRecord),
    Scene(SceneRecord),
}

impl RecordData {
    /// The element kind this data is published as.
    pub fn kind(&self) -> ElementKind {
        match self {
            RecordData::Material(_) => ElementKind::Material,
            RecordData::Texture(_) => ElementKind::Texture,
            RecordData::Sampler(_) => ElementKind::Sampler,
            RecordData::Accessor(_) => ElementKind::Accessor,
            RecordData::Primitive(_) => ElementKind::Primitive,
            RecordData::Mesh(_) => ElementKind::Mesh,
            RecordData::Node(_) => ElementKind::Node,
            RecordData::Scene(_) => ElementKind::Scene,
        }
    }

    /// Every entity this record references directly.
    pub fn references(&self) -> Vec<ElementId> {
        fn slot(slot: &Option<TextureRef>) -> Option<ElementId> {
            slot.map(|slot| slot.texture)
        }

        match self {
            RecordData::Material(material) => {
                let pbr = material.pbr_metallic_roughness.as_ref();
                [
                    pbr.and_then(|pbr| slot(&pbr.base_color_texture)),
                    pbr.and_then(|pbr| slot(&pbr.metallic_roughness_texture)),
                    slot(&material.normal_texture),
                    slot(&material.occlusion_texture),
                    slot(&material.emissive_texture),
                ]
                .into_iter()
                .flatten()
                .collect()
            }
            RecordData::Texture(texture) => texture.sampler.into_iter().collect(),
            RecordData::Sampler(_) | RecordData::Accessor(_) => Vec::new(),
            RecordData::Primitive(primitive) => primitive
                .attributes
                .values()
                .copied()
                .chain(primitive.indices)
                .chain(primitive.material)
                .collect(),
            RecordData::Mesh(mesh) => mesh.primitives.clone(),
            RecordData::Node(node) => node.children.iter().copied().chain(node.mesh).collect(),
            RecordData::Scene(scene) => scene.nodes.clone(),
        }
    }

    /// Drops every reference to `target`. Returns `true` if anything changed.
    pub(crate) fn scrub(&mut self, target: ElementId) -> bool {
        fn clear<T: Copy>(field: &mut Option<T>, matches: impl Fn(T) -> bool) -> bool {
            match *field {
                Some(value) if matches(value) => {
                    *field = None;
                    true
                }
                _ => false,
            }
        }
        fn retain(list: &mut Vec<ElementId>, target: ElementId) -> bool {
            let before = list.len();
            list.retain(|id| *id != target);
            list.len() != before
        }
        let is_slot = |slot: TextureRef| slot.texture == target;
        let is_target = |id: ElementId| id == target;

        match self {
            RecordData::Material(material) => {
                let mut changed = false;
                if let Some(pbr) = material.pbr_metallic_roughness.as_mut() {
                    changed |= clear(&mut pbr.base_color_texture, is_slot);
                    changed |= clear(&mut pbr.metallic_roughness_texture, is_slot);
                }
                changed |= clear(&mut material.normal_texture, is_slot);
                changed |= clear(&mut material.occlusion_texture, is_slot);
                changed |= clear(&mut material.emissive_texture, is_slot);
                changed
            }
            RecordData::Texture(texture) => clear(&mut texture.sampler, is_target),
            RecordData::Sampler(_) | RecordData::Accessor(_) => false,
            RecordData::Primitive(primitive) => {
                let before = primitive.attributes.len();
                primitive.attributes.retain(|_, id| *id != target);
                let mut changed = primitive.attributes.len() != before;
                changed |= clear(&mut primitive.indices, is_target);
                changed |= clear(&mut primitive.material, is_target);
                changed
            }
            RecordData::Mesh(mesh) => retain(&mut mesh.primitives, target),
            RecordData::Node(node) => {
                let changed = retain(&mut node.children, target);
                clear(&mut node.mesh, is_target) || changed
            }
            RecordData::Scene(scene) => retain(&mut scene.nodes, target),
        }
    }
}

/// One authoritative entity: its data and its current version.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    sequence: Sequence,
    data: RecordData,
}

impl Record {
    pub(crate) fn new(data: RecordData) -> Self {
        Self {
            sequence: Sequence::INITIAL,
            data,
        }
    }

    /// The element kind.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// The current version.
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// The kind-specific data.
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut RecordData {
        &mut self.data
    }

    /// Moves to the next version.
    pub(crate) fn bump(&mut self) -> Sequence {
        self.sequence = self.sequence.next();
        self.sequence
    }
}
