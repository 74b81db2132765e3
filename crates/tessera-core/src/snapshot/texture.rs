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


//! Texture and sampler snapshot shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{MagFilter, MinFilter, WrapMode};
use crate::identity::{ElementId, Sequence};

/// Snapshot of kind `texture`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Nested `sampler` snapshot.
    #[serde(default)]
    pub sampler: Option<Value>,
    /// URI or name of the image the texture samples.
    #[serde(default)]
    pub source: Option<String>,
}

/// Snapshot of kind `sampler`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerSnapshot {
    /// Identity.
    pub id: ElementId,
    /// Version.
    pub sequence: Sequence,
    /// Optional, not unique.
    #[serde(default)]
    pub name: Option<String>,
    /// Magnification filter, renderer's choice when absent.
    #[serde(default)]
    pub mag_filter: Option<MagFilter>,
    /// Minification filter, renderer's choice when absent.
    #[serde(default)]
    pub min_filter: Option<MinFilter>,
    /// Wrapping along U.
    #[serde(default)]
    pub wrap_s: WrapMode,
    /// Wrapping along V.
    #[serde(default)]
    pub wrap_t: WrapMode,
}
