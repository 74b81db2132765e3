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


//! Material snapshot shapes and their value-only sub-structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::AlphaMode;
use crate::identity::{ElementId, Sequence};

/// Snapshot of kind `material`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested `pbr-metallic-roughness` snapshot.
    #[serde(default)]
    pub pbr_metallic_roughness: Option<Value>,
    /// Nested `normal-texture-info` snapshot.
    #[serde(default)]
    pub normal_texture: Option<Value>,
    /// Nested `occlusion-texture-info` snapshot.
    #[serde(default)]
    pub occlusion_texture: Option<Value>,
    /// Nested `texture-info` snapshot.
    #[serde(default)]
    pub emissive_texture: Option<Value>,
    /// Linear RGB emissive color.
    #[serde(default)]
    pub emissive_factor: [f32; 3],
    /// Alpha handling.
    #[serde(default)]
    pub alpha_mode: AlphaMode,
    /// Cutoff used when `alpha_mode` is `MASK`.
    #[serde(default)]
    pub alpha_cutoff: Option<f32>,
    /// Whether back faces are rendered.
    #[serde(default)]
    pub double_sided: bool,
}

/// Snapshot of kind `pbr-metallic-roughness`. Value only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughnessSnapshot {
    /// Linear RGBA base color.
    #[serde(default = "super::white")]
    pub base_color_factor: [f32; 4],
    /// Nested `texture-info` snapshot.
    #[serde(default)]
    pub base_color_texture: Option<Value>,
    /// Metalness in `[0, 1]`.
    #[serde(default = "super::one")]
    pub metallic_factor: f32,
    /// Roughness in `[0, 1]`.
    #[serde(default = "super::one")]
    pub roughness_factor: f32,
    /// Nested `texture-info` snapshot.
    #[serde(default)]
    pub metallic_roughness_texture: Option<Value>,
}

impl Default for PbrMetallicRoughnessSnapshot {
    fn default() -> Self {
        Self {
            base_color_factor: super::white(),
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
        }
    }
}

/// Snapshot of kind `texture-info`. Value only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfoSnapshot {
    /// Nested `texture` snapshot. Required.
    pub texture: Value,
    /// Which `TEXCOORD_n` set the texture is sampled with.
    #[serde(default)]
    pub tex_coord: u32,
}

/// Snapshot of kind `normal-texture-info`. Value only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTextureInfoSnapshot {
    /// Nested `texture` snapshot. Required.
    pub texture: Value,
    /// Which `TEXCOORD_n` set the texture is sampled with.
    #[serde(default)]
    pub tex_coord: u32,
    /// Scale applied to the sampled normal's X and Y.
    #[serde(default = "super::one")]
    pub scale: f32,
}

/// Snapshot of kind `occlusion-texture-info`. Value only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionTextureInfoSnapshot {
    /// Nested `texture` snapshot. Required.
    pub texture: Value,
    /// Which `TEXCOORD_n` set the texture is sampled with.
    #[serde(default)]
    pub tex_coord: u32,
    /// How much occlusion is applied, in `[0, 1]`.
    #[serde(default = "super::one")]
    pub strength: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_material_optionals_default_to_absent() {
        let id = ElementId::new();
        let snapshot: MaterialSnapshot =
            serde_json::from_value(json!({ "id": id, "sequence": 1 })).unwrap();

        assert_eq!(snapshot.id, id);
        assert!(snapshot.name.is_none());
        assert!(snapshot.pbr_metallic_roughness.is_none());
        assert!(snapshot.normal_texture.is_none());
        assert_eq!(snapshot.alpha_mode, AlphaMode::Opaque);
        assert_eq!(snapshot.emissive_factor, [0.0, 0.0, 0.0]);
        assert!(!snapshot.double_sided);
    }

    #[test]
    fn test_material_null_nested_reads_as_none() {
        let snapshot: MaterialSnapshot = serde_json::from_value(json!({
            "id": ElementId::new(),
            "sequence": 3,
            "name": null,
            "normalTexture": null,
        }))
        .unwrap();
        assert!(snapshot.name.is_none());
        assert!(snapshot.normal_texture.is_none());
    }

    #[test]
    fn test_material_requires_identity() {
        let result = serde_json::from_value::<MaterialSnapshot>(json!({ "sequence": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_optionals_are_written_as_null() {
        let snapshot = MaterialSnapshot {
            id: ElementId::new(),
            sequence: Sequence::INITIAL,
            name: None,
            pbr_metallic_roughness: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: [0.0; 3],
            alpha_mode: AlphaMode::Blend,
            alpha_cutoff: None,
            double_sided: true,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["name"], Value::Null);
        assert_eq!(value["normalTexture"], Value::Null);
        assert_eq!(value["alphaMode"], json!("BLEND"));
        assert!(value.as_object().unwrap().contains_key("alphaCutoff"));
    }

    #[test]
    fn test_pbr_defaults() {
        let pbr: PbrMetallicRoughnessSnapshot = serde_json::from_value(json!({})).unwrap();
        assert_eq!(pbr, PbrMetallicRoughnessSnapshot::default());
    }
}
