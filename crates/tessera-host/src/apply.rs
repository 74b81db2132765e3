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


//! Mutation validation and application.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tessera_core::{ElementId, ElementKind, MutationCommand, Rejection, Sequence};

use crate::graph::SceneGraph;
use crate::record::{PbrRecord, RecordData};

/// Snapshot fields that exist but cannot be written from the sandbox.
fn read_only(kind: ElementKind, path: &str) -> bool {
    if matches!(path, "id" | "sequence") {
        return true;
    }
    let fields: &[&str] = match kind {
        ElementKind::Material => &[
            "normalTexture",
            "occlusionTexture",
            "emissiveTexture",
            "pbrMetallicRoughness",
        ],
        ElementKind::Texture => &["sampler", "source"],
        ElementKind::Accessor => &["componentType", "type", "count", "normalized", "min", "max"],
        ElementKind::Primitive => &["mode", "attributes", "indices"],
        ElementKind::Mesh => &["primitives"],
        ElementKind::Node => &["children"],
        ElementKind::Scene => &["nodes"],
        _ => &[],
    };
    fields.contains(&path)
        || (kind == ElementKind::Material && path.starts_with("pbrMetallicRoughness."))
}

fn invalid(path: &str, detail: impl Into<String>) -> Rejection {
    Rejection::InvalidValue {
        path: path.to_owned(),
        detail: detail.into(),
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: &Value) -> Result<T, Rejection> {
    T::deserialize(value).map_err(|e| invalid(path, e.to_string()))
}

fn finite<const N: usize>(path: &str, value: &Value) -> Result<[f32; N], Rejection>
where
    [f32; N]: DeserializeOwned,
{
    let values: [f32; N] = decode(path, value)?;
    if values.iter().all(|v| v.is_finite()) {
        Ok(values)
    } else {
        Err(invalid(path, "components must be finite"))
    }
}

fn unit(path: &str, value: &Value) -> Result<f32, Rejection> {
    let factor: f32 = decode(path, value)?;
    if (0.0..=1.0).contains(&factor) {
        Ok(factor)
    } else {
        Err(invalid(path, format!("{factor} is outside [0, 1]")))
    }
}

impl SceneGraph {
    /// Validates and applies one mutation command.
    ///
    /// On success the target moves to its next sequence, which is returned.
    /// On failure the graph is left untouched.
    pub fn apply(&mut self, command: &MutationCommand) -> Result<Sequence, Rejection> {
        let id = command.id;
        let path = command.path.as_str();
        let value = &command.value;
        let Some(kind) = self.kind_of(id) else {
            return Err(Rejection::UnknownElement { id });
        };

        // References are checked before the target is borrowed mutably.
        let reference = match (kind, path) {
            (ElementKind::Primitive, "material") => {
                Some(self.reference(path, value, ElementKind::Material)?)
            }
            (ElementKind::Node, "mesh") => Some(self.reference(path, value, ElementKind::Mesh)?),
            _ => None,
        };

        let Some(record) = self.get_mut(id) else {
            return Err(Rejection::UnknownElement { id });
        };
        if command.sequence < record.sequence() {
            log::debug!(
                "Applying {} to {id} issued at {}, now at {}.",
                command.command,
                command.sequence,
                record.sequence()
            );
        }

        match record.data_mut() {
            RecordData::Material(material) => match path {
                "name" => material.name = decode(path, value)?,
                "emissiveFactor" => material.emissive_factor = finite(path, value)?,
                "alphaMode" => material.alpha_mode = decode(path, value)?,
                "alphaCutoff" => {
                    let cutoff: Option<f32> = decode(path, value)?;
                    if let Some(cutoff) = cutoff {
                        if !cutoff.is_finite() || cutoff < 0.0 {
                            return Err(invalid(path, "cutoff must be a non-negative number"));
                        }
                    }
                    material.alpha_cutoff = cutoff;
                }
                "doubleSided" => material.double_sided = decode(path, value)?,
                "pbrMetallicRoughness.baseColorFactor" => {
                    let factor = finite::<4>(path, value)?;
                    pbr(&mut material.pbr_metallic_roughness).base_color_factor = factor;
                }
                "pbrMetallicRoughness.metallicFactor" => {
                    let factor = unit(path, value)?;
                    pbr(&mut material.pbr_metallic_roughness).metallic_factor = factor;
                }
                "pbrMetallicRoughness.roughnessFactor" => {
                    let factor = unit(path, value)?;
                    pbr(&mut material.pbr_metallic_roughness).roughness_factor = factor;
                }
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Texture(texture) => match path {
                "name" => texture.name = decode(path, value)?,
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Sampler(sampler) => match path {
                "name" => sampler.name = decode(path, value)?,
                "magFilter" => sampler.mag_filter = decode(path, value)?,
                "minFilter" => sampler.min_filter = decode(path, value)?,
                "wrapS" => sampler.wrap_s = decode(path, value)?,
                "wrapT" => sampler.wrap_t = decode(path, value)?,
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Accessor(accessor) => match path {
                "name" => accessor.name = decode(path, value)?,
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Primitive(primitive) => match (path, reference) {
                ("material", Some(material)) => primitive.material = material,
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Mesh(mesh) => match path {
                "name" => mesh.name = decode(path, value)?,
                "weights" => {
                    let weights: Vec<f32> = decode(path, value)?;
                    if weights.iter().any(|w| !w.is_finite()) {
                        return Err(invalid(path, "weights must be finite"));
                    }
                    mesh.weights = weights;
                }
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Node(node) => match (path, reference) {
                ("name", _) => node.name = decode(path, value)?,
                ("translation", _) => node.translation = finite(path, value)?,
                ("rotation", _) => node.rotation = finite(path, value)?,
                ("scale", _) => node.scale = finite(path, value)?,
                ("mesh", Some(mesh)) => node.mesh = mesh,
                _ => return Err(rejection(kind, path)),
            },
            RecordData::Scene(scene) => match path {
                "name" => scene.name = decode(path, value)?,
                _ => return Err(rejection(kind, path)),
            },
        }

        let sequence = record.bump();
        log::debug!("Applied '{path}' to {kind} {id}; now at {sequence}.");
        Ok(sequence)
    }

    /// Reads a nullable reference to an existing entity of `expected` kind.
    fn reference(
        &self,
        path: &str,
        value: &Value,
        expected: ElementKind,
    ) -> Result<Option<ElementId>, Rejection> {
        let Some(target) = decode::<Option<ElementId>>(path, value)? else {
            return Ok(None);
        };
        match self.kind_of(target) {
            Some(kind) if kind == expected => Ok(Some(target)),
            Some(kind) => Err(invalid(path, format!("{target} is a {kind}, not a {expected}"))),
            None => Err(invalid(path, format!("no {expected} with id {target}"))),
        }
    }
}

fn pbr(slot: &mut Option<PbrRecord>) -> &mut PbrRecord {
    slot.get_or_insert_with(PbrRecord::default)
}

fn rejection(kind: ElementKind, path: &str) -> Rejection {
    if read_only(kind, path) {
        Rejection::PermissionDenied {
            path: path.to_owned(),
        }
    } else {
        Rejection::UnknownField {
            path: path.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AccessorRecord, MaterialRecord, MeshRecord, NodeRecord};
    use serde_json::json;
    use tessera_core::{AccessorType, CommandId, ComponentType};

    fn command(id: ElementId, path: &str, value: Value) -> MutationCommand {
        MutationCommand {
            command: CommandId::new(1),
            id,
            sequence: Sequence::INITIAL,
            path: path.to_owned(),
            value,
        }
    }

    #[test]
    fn test_accepted_mutation_bumps_sequence() {
        let mut graph = SceneGraph::new();
        let id = graph.insert(RecordData::Material(MaterialRecord::default()));

        let sequence = graph
            .apply(&command(id, "pbrMetallicRoughness.roughnessFactor", json!(0.25)))
            .unwrap();

        assert_eq!(sequence, Sequence::new(2));
        let Some(RecordData::Material(material)) = graph.get(id).map(|r| r.data()) else {
            panic!("material record expected");
        };
        assert_eq!(
            material.pbr_metallic_roughness.as_ref().unwrap().roughness_factor,
            0.25
        );
    }

    #[test]
    fn test_out_of_range_factor_is_invalid() {
        let mut graph = SceneGraph::new();
        let id = graph.insert(RecordData::Material(MaterialRecord::default()));

        let result = graph.apply(&command(id, "pbrMetallicRoughness.metallicFactor", json!(1.5)));

        assert!(matches!(result, Err(Rejection::InvalidValue { .. })));
        assert_eq!(graph.sequence_of(id), Some(Sequence::INITIAL));
    }

    #[test]
    fn test_negative_cutoff_and_wrong_type_are_invalid() {
        let mut graph = SceneGraph::new();
        let id = graph.insert(RecordData::Material(MaterialRecord::default()));

        for (path, value) in [
            ("alphaCutoff", json!(-0.5)),
            ("doubleSided", json!("yes")),
            ("emissiveFactor", json!([1.0, 0.0])),
            ("alphaMode", json!("SOMETIMES")),
        ] {
            assert!(matches!(
                graph.apply(&command(id, path, value)),
                Err(Rejection::InvalidValue { .. })
            ));
        }
        assert!(graph.apply(&command(id, "alphaCutoff", json!(null))).is_ok());
    }

    #[test]
    fn test_read_only_and_unknown_fields() {
        let mut graph = SceneGraph::new();
        let accessor = graph.insert(RecordData::Accessor(AccessorRecord {
            name: None,
            component_type: ComponentType::Float,
            accessor_type: AccessorType::Vec3,
            count: 3,
            normalized: false,
            min: None,
            max: None,
        }));

        assert_eq!(
            graph.apply(&command(accessor, "count", json!(10))),
            Err(Rejection::PermissionDenied {
                path: "count".to_owned()
            })
        );
        assert_eq!(
            graph.apply(&command(accessor, "stride", json!(12))),
            Err(Rejection::UnknownField {
                path: "stride".to_owned()
            })
        );
        let missing = ElementId::new();
        assert_eq!(
            graph.apply(&command(missing, "name", json!("x"))),
            Err(Rejection::UnknownElement { id: missing })
        );
    }

    #[test]
    fn test_references_are_kind_checked() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(RecordData::Node(NodeRecord::default()));
        let mesh = graph.insert(RecordData::Mesh(MeshRecord::default()));
        let material = graph.insert(RecordData::Material(MaterialRecord::default()));

        assert!(matches!(
            graph.apply(&command(node, "mesh", json!(material))),
            Err(Rejection::InvalidValue { .. })
        ));
        assert!(matches!(
            graph.apply(&command(node, "mesh", json!(ElementId::new()))),
            Err(Rejection::InvalidValue { .. })
        ));
        assert!(graph.apply(&command(node, "mesh", json!(mesh))).is_ok());
        assert_eq!(graph.get(node).unwrap().data().references(), vec![mesh]);
        assert!(graph.apply(&command(node, "mesh", Value::Null)).is_ok());
        assert!(graph.get(node).unwrap().data().references().is_empty());
    }
}
