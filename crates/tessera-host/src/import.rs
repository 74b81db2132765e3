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


//! glTF import.
//!
//! Identities are UUID v5 values derived from a fresh per-document namespace
//! and the entity's kind and index, so they are stable within one import and
//! never collide across documents.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tessera_core::{
    AccessorType, AlphaMode, ComponentType, ElementId, ElementKind, MagFilter, MinFilter,
    PrimitiveMode, WrapMode,
};
use uuid::Uuid;

use crate::graph::SceneGraph;
use crate::record::{
    AccessorRecord, MaterialRecord, MeshRecord, NodeRecord, PbrRecord, PrimitiveRecord,
    RecordData, SamplerRecord, SceneRecord, TextureRecord, TextureRef,
};

struct Ids {
    namespace: Uuid,
}

impl Ids {
    fn of(&self, kind: ElementKind, index: usize) -> ElementId {
        ElementId::derive(&self.namespace, kind, index)
    }

    fn slot(&self, info: gltf::texture::Info<'_>) -> TextureRef {
        TextureRef {
            texture: self.of(ElementKind::Texture, info.texture().index()),
            tex_coord: info.tex_coord(),
        }
    }
}

impl SceneGraph {
    /// Parses a `.gltf` or `.glb` document and imports it.
    ///
    /// Only the JSON structure is read; buffers and images stay unresolved.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let gltf = gltf::Gltf::from_slice(bytes).context("Failed to parse glTF document")?;
        Ok(Self::from_gltf(&gltf.document))
    }

    /// Reads and imports a glTF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_slice(&bytes).with_context(|| format!("Failed to import {}", path.display()))
    }

    /// Imports every material, texture, sampler, accessor, mesh, node and
    /// scene of a parsed document.
    pub fn from_gltf(document: &gltf::Document) -> Self {
        let ids = Ids {
            namespace: Uuid::new_v4(),
        };
        let mut graph = SceneGraph::new();

        for sampler in document.samplers() {
            let Some(index) = sampler.index() else {
                continue;
            };
            graph.insert_with_id(
                ids.of(ElementKind::Sampler, index),
                RecordData::Sampler(SamplerRecord {
                    name: sampler.name().map(str::to_owned),
                    mag_filter: sampler.mag_filter().map(mag_filter),
                    min_filter: sampler.min_filter().map(min_filter),
                    wrap_s: wrap_mode(sampler.wrap_s()),
                    wrap_t: wrap_mode(sampler.wrap_t()),
                }),
            );
        }

        for texture in document.textures() {
            let image = texture.source();
            let source = match image.source() {
                gltf::image::Source::Uri { uri, .. } => Some(uri.to_owned()),
                gltf::image::Source::View { .. } => image.name().map(str::to_owned),
            };
            graph.insert_with_id(
                ids.of(ElementKind::Texture, texture.index()),
                RecordData::Texture(TextureRecord {
                    name: texture.name().map(str::to_owned),
                    sampler: texture
                        .sampler()
                        .index()
                        .map(|index| ids.of(ElementKind::Sampler, index)),
                    source,
                }),
            );
        }

        for material in document.materials() {
            // The implicit default material has no index and is not published.
            let Some(index) = material.index() else {
                continue;
            };
            let pbr = material.pbr_metallic_roughness();
            let normal = material.normal_texture();
            let occlusion = material.occlusion_texture();
            graph.insert_with_id(
                ids.of(ElementKind::Material, index),
                RecordData::Material(MaterialRecord {
                    name: material.name().map(str::to_owned),
                    pbr_metallic_roughness: Some(PbrRecord {
                        base_color_factor: pbr.base_color_factor(),
                        base_color_texture: pbr.base_color_texture().map(|info| ids.slot(info)),
                        metallic_factor: pbr.metallic_factor(),
                        roughness_factor: pbr.roughness_factor(),
                        metallic_roughness_texture: pbr
                            .metallic_roughness_texture()
                            .map(|info| ids.slot(info)),
                    }),
                    normal_texture: normal.as_ref().map(|normal| TextureRef {
                        texture: ids.of(ElementKind::Texture, normal.texture().index()),
                        tex_coord: normal.tex_coord(),
                    }),
                    normal_scale: normal.as_ref().map_or(1.0, |normal| normal.scale()),
                    occlusion_texture: occlusion.as_ref().map(|occlusion| TextureRef {
                        texture: ids.of(ElementKind::Texture, occlusion.texture().index()),
                        tex_coord: occlusion.tex_coord(),
                    }),
                    occlusion_strength: occlusion
                        .as_ref()
                        .map_or(1.0, |occlusion| occlusion.strength()),
                    emissive_texture: material.emissive_texture().map(|info| ids.slot(info)),
                    emissive_factor: material.emissive_factor(),
                    alpha_mode: alpha_mode(material.alpha_mode()),
                    alpha_cutoff: material.alpha_cutoff(),
                    double_sided: material.double_sided(),
                }),
            );
        }

        for accessor in document.accessors() {
            graph.insert_with_id(
                ids.of(ElementKind::Accessor, accessor.index()),
                RecordData::Accessor(AccessorRecord {
                    name: accessor.name().map(str::to_owned),
                    component_type: component_type(accessor.data_type()),
                    accessor_type: accessor_type(accessor.dimensions()),
                    count: accessor.count() as u64,
                    normalized: accessor.normalized(),
                    min: accessor.min().and_then(|min| serde_json::from_value(min).ok()),
                    max: accessor.max().and_then(|max| serde_json::from_value(max).ok()),
                }),
            );
        }

        // Primitives have no document-wide index; number them in mesh order.
        let mut primitive_index = 0;
        for mesh in document.meshes() {
            let mut primitives = Vec::new();
            for primitive in mesh.primitives() {
                let id = ids.of(ElementKind::Primitive, primitive_index);
                primitive_index += 1;
                let attributes: BTreeMap<String, ElementId> = primitive
                    .attributes()
                    .map(|(semantic, accessor)| {
                        (
                            semantic.to_string(),
                            ids.of(ElementKind::Accessor, accessor.index()),
                        )
                    })
                    .collect();
                graph.insert_with_id(
                    id,
                    RecordData::Primitive(PrimitiveRecord {
                        mode: primitive_mode(primitive.mode()),
                        attributes,
                        indices: primitive
                            .indices()
                            .map(|accessor| ids.of(ElementKind::Accessor, accessor.index())),
                        material: primitive
                            .material()
                            .index()
                            .map(|index| ids.of(ElementKind::Material, index)),
                    }),
                );
                primitives.push(id);
            }
            graph.insert_with_id(
                ids.of(ElementKind::Mesh, mesh.index()),
                RecordData::Mesh(MeshRecord {
                    name: mesh.name().map(str::to_owned),
                    primitives,
                    weights: mesh.weights().map(<[f32]>::to_vec).unwrap_or_default(),
                }),
            );
        }

        for node in document.nodes() {
            let (translation, rotation, scale) = node.transform().decomposed();
            graph.insert_with_id(
                ids.of(ElementKind::Node, node.index()),
                RecordData::Node(NodeRecord {
                    name: node.name().map(str::to_owned),
                    children: node
                        .children()
                        .map(|child| ids.of(ElementKind::Node, child.index()))
                        .collect(),
                    mesh: node.mesh().map(|mesh| ids.of(ElementKind::Mesh, mesh.index())),
                    translation,
                    rotation,
                    scale,
                }),
            );
        }

        for scene in document.scenes() {
            graph.insert_with_id(
                ids.of(ElementKind::Scene, scene.index()),
                RecordData::Scene(SceneRecord {
                    name: scene.name().map(str::to_owned),
                    nodes: scene
                        .nodes()
                        .map(|node| ids.of(ElementKind::Node, node.index()))
                        .collect(),
                }),
            );
        }
        graph.set_default_scene(
            document
                .default_scene()
                .map(|scene| ids.of(ElementKind::Scene, scene.index())),
        );

        log::info!(
            "Imported glTF document: {} entities across {} scenes.",
            graph.len(),
            graph.scenes().len()
        );
        graph
    }
}

fn alpha_mode(mode: gltf::material::AlphaMode) -> AlphaMode {
    match mode {
        gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
        gltf::material::AlphaMode::Mask => AlphaMode::Mask,
        gltf::material::AlphaMode::Blend => AlphaMode::Blend,
    }
}

fn mag_filter(filter: gltf::texture::MagFilter) -> MagFilter {
    match filter {
        gltf::texture::MagFilter::Nearest => MagFilter::Nearest,
        gltf::texture::MagFilter::Linear => MagFilter::Linear,
    }
}

fn min_filter(filter: gltf::texture::MinFilter) -> MinFilter {
    use gltf::texture::MinFilter as Gltf;
    match filter {
        Gltf::Nearest => MinFilter::Nearest,
        Gltf::Linear => MinFilter::Linear,
        Gltf::NearestMipmapNearest => MinFilter::NearestMipmapNearest,
        Gltf::LinearMipmapNearest => MinFilter::LinearMipmapNearest,
        Gltf::NearestMipmapLinear => MinFilter::NearestMipmapLinear,
        Gltf::LinearMipmapLinear => MinFilter::LinearMipmapLinear,
    }
}

fn wrap_mode(mode: gltf::texture::WrappingMode) -> WrapMode {
    match mode {
        gltf::texture::WrappingMode::ClampToEdge => WrapMode::ClampToEdge,
        gltf::texture::WrappingMode::MirroredRepeat => WrapMode::MirroredRepeat,
        gltf::texture::WrappingMode::Repeat => WrapMode::Repeat,
    }
}

fn component_type(data_type: gltf::accessor::DataType) -> ComponentType {
    use gltf::accessor::DataType;
    match data_type {
        DataType::I8 => ComponentType::Byte,
        DataType::U8 => ComponentType::UnsignedByte,
        DataType::I16 => ComponentType::Short,
        DataType::U16 => ComponentType::UnsignedShort,
        DataType::U32 => ComponentType::UnsignedInt,
        DataType::F32 => ComponentType::Float,
    }
}

fn accessor_type(dimensions: gltf::accessor::Dimensions) -> AccessorType {
    use gltf::accessor::Dimensions;
    match dimensions {
        Dimensions::Scalar => AccessorType::Scalar,
        Dimensions::Vec2 => AccessorType::Vec2,
        Dimensions::Vec3 => AccessorType::Vec3,
        Dimensions::Vec4 => AccessorType::Vec4,
        Dimensions::Mat2 => AccessorType::Mat2,
        Dimensions::Mat3 => AccessorType::Mat3,
        Dimensions::Mat4 => AccessorType::Mat4,
    }
}

fn primitive_mode(mode: gltf::mesh::Mode) -> PrimitiveMode {
    use gltf::mesh::Mode;
    match mode {
        Mode::Points => PrimitiveMode::Points,
        Mode::Lines => PrimitiveMode::Lines,
        Mode::LineLoop => PrimitiveMode::LineLoop,
        Mode::LineStrip => PrimitiveMode::LineStrip,
        Mode::Triangles => PrimitiveMode::Triangles,
        Mode::TriangleStrip => PrimitiveMode::TriangleStrip,
        Mode::TriangleFan => PrimitiveMode::TriangleFan,
    }
}
