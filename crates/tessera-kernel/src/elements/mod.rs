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


//! The concrete element and value types.
//!
//! Each type mirrors one glTF structure. Elements are shared (`Rc`) and kept
//! current by the kernel; values are plain owned data rebuilt with their
//! parent.

mod accessor;
mod material;
mod mesh;
mod node;
mod pbr;
mod primitive;
mod sampler;
mod scene;
mod texture;
mod texture_info;

pub use accessor::Accessor;
pub use material::Material;
pub use mesh::Mesh;
pub use node::Node;
pub use pbr::PbrMetallicRoughness;
pub use primitive::Primitive;
pub use sampler::Sampler;
pub use scene::Scene;
pub use texture::Texture;
pub use texture_info::{NormalTextureInfo, OcclusionTextureInfo, TextureInfo};
