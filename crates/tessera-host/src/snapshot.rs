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


//! Snapshot emission.
//!
//! Snapshots embed the full snapshot of every entity they reference, and
//! write every absent optional as `null`.

use serde::Serialize;
use serde_json::Value;
use tessera_core::snapshot::{
    AccessorSnapshot, MaterialSnapshot, MeshSnapshot, NodeSnapshot, NormalTextureInfoSnapshot,
    OcclusionTextureInfoSnapshot, PbrMetallicRoughnessSnapshot, PrimitiveSnapshot,
    SamplerSnapshot, SceneSnapshot, TextureInfoSnapshot, TextureSnapshot,
};
use tessera_core::ElementId;

use crate::graph::SceneGraph;
use crate::record::{RecordData, TextureRef};

fn encode<T: Serialize>(snapshot: &T) -> Value {
    serde_json::to_value(snapshot).unwrap_or_else(|e| {
        log::error!("Failed to encode snapshot: {e}");
        Value::Null
    })
}

impl SceneGraph {
    /// Emits the snapshot of the entity with `id`, or `None` if it is unknown.
    pub fn snapshot(&self, id: ElementId) -> Option<Value> {
        self.emit(id, &mut Vec::new())
    }

    fn emit(&self, id: ElementId, path: &mut Vec<ElementId>) -> Option<Value> {
        if path.contains(&id) {
            log::warn!("Reference cycle through {id}; omitted from snapshot.");
            return None;
        }
        let record = self.get(id)?;
        let sequence = record.sequence();
        path.push(id);

        let snapshot = match record.data() {
            RecordData::Material(material) => encode(&MaterialSnapshot {
                id,
                sequence,
                name: material.name.clone(),
                pbr_metallic_roughness: material.pbr_metallic_roughness.as_ref().map(|pbr| {
                    encode(&PbrMetallicRoughnessSnapshot {
                        base_color_factor: pbr.base_color_factor,
                        base_color_texture: self.texture_info(pbr.base_color_texture, path),
                        metallic_factor: pbr.metallic_factor,
                        roughness_factor: pbr.roughness_factor,
                        metallic_roughness_texture: self
                            .texture_info(pbr.metallic_roughness_texture, path),
                    })
                }),
                normal_texture: material.normal_texture.and_then(|slot| {
                    let texture = self.emit(slot.texture, path)?;
                    Some(encode(&NormalTextureInfoSnapshot {
                        texture,
                        tex_coord: slot.tex_coord,
                        scale: material.normal_scale,
                    }))
                }),
                occlusion_texture: material.occlusion_texture.and_then(|slot| {
                    let texture = self.emit(slot.texture, path)?;
                    Some(encode(&OcclusionTextureInfoSnapshot {
                        texture,
                        tex_coord: slot.tex_coord,
                        strength: material.occlusion_strength,
                    }))
                }),
                emissive_texture: self.texture_info(material.emissive_texture, path),
                emissive_factor: material.emissive_factor,
                alpha_mode: material.alpha_mode,
                alpha_cutoff: material.alpha_cutoff,
                double_sided: material.double_sided,
            }),
            RecordData::Texture(texture) => encode(&TextureSnapshot {
                id,
                sequence,
                name: texture.name.clone(),
                sampler: texture.sampler.and_then(|sampler| self.emit(sampler, path)),
                source: texture.source.clone(),
            }),
            RecordData::Sampler(sampler) => encode(&SamplerSnapshot {
                id,
                sequence,
                name: sampler.name.clone(),
                mag_filter: sampler.mag_filter,
                min_filter: sampler.min_filter,
                wrap_s: sampler.wrap_s,
                wrap_t: sampler.wrap_t,
            }),
            RecordData::Accessor(accessor) => encode(&AccessorSnapshot {
                id,
                sequence,
                name: accessor.name.clone(),
                component_type: accessor.component_type,
                accessor_type: accessor.accessor_type,
                count: accessor.count,
                normalized: accessor.normalized,
                min: accessor.min.clone(),
                max: accessor.max.clone(),
            }),
            RecordData::Primitive(primitive) => {
                let mut attributes = std::collections::BTreeMap::new();
                for (semantic, accessor) in &primitive.attributes {
                    if let Some(accessor) = self.emit(*accessor, path) {
                        attributes.insert(semantic.clone(), accessor);
                    }
                }
                encode(&PrimitiveSnapshot {
                    id,
                    sequence,
                    mode: primitive.mode,
                    attributes,
                    indices: primitive.indices.and_then(|indices| self.emit(indices, path)),
                    material: primitive.material.and_then(|material| self.emit(material, path)),
                })
            }
            RecordData::Mesh(mesh) => encode(&MeshSnapshot {
                id,
                sequence,
                name: mesh.name.clone(),
                primitives: self.emit_all(&mesh.primitives, path),
                weights: mesh.weights.clone(),
            }),
            RecordData::Node(node) => encode(&NodeSnapshot {
                id,
                sequence,
                name: node.name.clone(),
                children: self.emit_all(&node.children, path),
                mesh: node.mesh.and_then(|mesh| self.emit(mesh, path)),
                translation: node.translation,
                rotation: node.rotation,
                scale: node.scale,
            }),
            RecordData::Scene(scene) => encode(&SceneSnapshot {
                id,
                sequence,
                name: scene.name.clone(),
                nodes: self.emit_all(&scene.nodes, path),
            }),
        };

        path.pop();
        Some(snapshot)
    }

    fn emit_all(&self, ids: &[ElementId], path: &mut Vec<ElementId>) -> Vec<Value> {
        ids.iter().filter_map(|id| self.emit(*id, path)).collect()
    }

    fn texture_info(&self, slot: Option<TextureRef>, path: &mut Vec<ElementId>) -> Option<Value> {
        let slot = slot?;
        let texture = self.emit(slot.texture, path)?;
        Some(encode(&TextureInfoSnapshot {
            texture,
            tex_coord: slot.tex_coord,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MaterialRecord, NodeRecord, PbrRecord, TextureRecord};

    #[test]
    fn test_absent_optionals_are_written_as_null() {
        let mut graph = SceneGraph::new();
        let material = graph.insert(RecordData::Material(MaterialRecord::default()));

        let snapshot = graph.snapshot(material).unwrap();

        assert_eq!(snapshot["id"], serde_json::json!(material));
        assert_eq!(snapshot["sequence"], 1);
        assert!(snapshot["name"].is_null());
        assert!(snapshot["normalTexture"].is_null());
        assert!(snapshot["alphaCutoff"].is_null());
        assert_eq!(snapshot["alphaMode"], "OPAQUE");
    }

    #[test]
    fn test_references_are_embedded() {
        let mut graph = SceneGraph::new();
        let texture = graph.insert(RecordData::Texture(TextureRecord {
            name: Some("Albedo".to_owned()),
            ..TextureRecord::default()
        }));
        let material = graph.insert(RecordData::Material(MaterialRecord {
            pbr_metallic_roughness: Some(PbrRecord {
                base_color_texture: Some(TextureRef {
                    texture,
                    tex_coord: 1,
                }),
                ..PbrRecord::default()
            }),
            ..MaterialRecord::default()
        }));

        let snapshot = graph.snapshot(material).unwrap();
        let slot = &snapshot["pbrMetallicRoughness"]["baseColorTexture"];

        assert_eq!(slot["texCoord"], 1);
        assert_eq!(slot["texture"]["name"], "Albedo");
        assert!(slot["texture"]["sampler"].is_null());
    }

    #[test]
    fn test_cycles_are_cut() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(RecordData::Node(NodeRecord::default()));
        if let Some(record) = graph.get_mut(node) {
            if let RecordData::Node(data) = record.data_mut() {
                data.children.push(node);
            }
        }

        let snapshot = graph.snapshot(node).unwrap();

        assert_eq!(snapshot["children"], serde_json::json!([]));
    }

    #[test]
    fn test_unknown_identity_has_no_snapshot() {
        assert!(SceneGraph::new().snapshot(ElementId::new()).is_none());
    }
}
