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


//! Kind discriminators for snapshots.

use std::fmt;
use std::str::FromStr;

/// The kinds of element and nested sub-structure the standard capability set
/// understands.
///
/// On the wire every kind travels as its [`as_str`](ElementKind::as_str)
/// string, so a sandbox can be extended with kinds this enum does not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// A surface material.
    Material,
    /// The metallic-roughness block of a material. Value only.
    PbrMetallicRoughness,
    /// A reference from a material to a texture. Value only.
    TextureInfo,
    /// A normal-map texture reference. Value only.
    NormalTextureInfo,
    /// An ambient-occlusion texture reference. Value only.
    OcclusionTextureInfo,
    /// A texture: an image source plus an optional sampler.
    Texture,
    /// Filtering and wrapping state for a texture.
    Sampler,
    /// A typed view into vertex or index data.
    Accessor,
    /// One drawable part of a mesh.
    Primitive,
    /// A collection of primitives.
    Mesh,
    /// A transform in the node hierarchy.
    Node,
    /// A set of root nodes.
    Scene,
}

impl ElementKind {
    /// Every standard kind.
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Material,
        ElementKind::PbrMetallicRoughness,
        ElementKind::TextureInfo,
        ElementKind::NormalTextureInfo,
        ElementKind::OcclusionTextureInfo,
        ElementKind::Texture,
        ElementKind::Sampler,
        ElementKind::Accessor,
        ElementKind::Primitive,
        ElementKind::Mesh,
        ElementKind::Node,
        ElementKind::Scene,
    ];

    /// The wire discriminator for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementKind::Material => "material",
            ElementKind::PbrMetallicRoughness => "pbr-metallic-roughness",
            ElementKind::TextureInfo => "texture-info",
            ElementKind::NormalTextureInfo => "normal-texture-info",
            ElementKind::OcclusionTextureInfo => "occlusion-texture-info",
            ElementKind::Texture => "texture",
            ElementKind::Sampler => "sampler",
            ElementKind::Accessor => "accessor",
            ElementKind::Primitive => "primitive",
            ElementKind::Mesh => "mesh",
            ElementKind::Node => "node",
            ElementKind::Scene => "scene",
        }
    }

    /// Whether snapshots of this kind carry an identity.
    ///
    /// Value-only kinds are owned by their parent and rebuilt on every
    /// deserialization.
    pub const fn is_identity_bearing(self) -> bool {
        !matches!(
            self,
            ElementKind::PbrMetallicRoughness
                | ElementKind::TextureInfo
                | ElementKind::NormalTextureInfo
                | ElementKind::OcclusionTextureInfo
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no standard kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown element kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_kind_string() {
        let err = "skin".parse::<ElementKind>().unwrap_err();
        assert_eq!(err, UnknownKind("skin".to_string()));
        assert_eq!(err.to_string(), "unknown element kind 'skin'");
    }

    #[test]
    fn test_value_kinds_have_no_identity() {
        assert!(ElementKind::Material.is_identity_bearing());
        assert!(ElementKind::Primitive.is_identity_bearing());
        assert!(!ElementKind::PbrMetallicRoughness.is_identity_bearing());
        assert!(!ElementKind::TextureInfo.is_identity_bearing());
        assert!(!ElementKind::OcclusionTextureInfo.is_identity_bearing());
    }
}
