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


//! The authoritative scene graph.

use std::collections::HashMap;
use tessera_core::{ElementId, ElementKind, Sequence};

use crate::record::{Record, RecordData};

/// Every entity the host serves, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    records: HashMap<ElementId, Record>,
    scenes: Vec<ElementId>,
    default_scene: Option<ElementId>,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity under a fresh identity, at the initial sequence.
    pub fn insert(&mut self, data: RecordData) -> ElementId {
        let id = ElementId::new();
        self.insert_with_id(id, data);
        id
    }

    pub(crate) fn insert_with_id(&mut self, id: ElementId, data: RecordData) {
        if data.kind() == ElementKind::Scene {
            self.scenes.push(id);
        }
        if self.records.insert(id, Record::new(data)).is_some() {
            log::warn!("Scene graph record {id} was replaced.");
        }
    }

    /// The record for `id`.
    pub fn get(&self, id: ElementId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// The kind of the entity with `id`.
    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.records.get(&id).map(Record::kind)
    }

    /// The current version of the entity with `id`.
    pub fn sequence_of(&self, id: ElementId) -> Option<Sequence> {
        self.records.get(&id).map(Record::sequence)
    }

    /// Every scene, in import order.
    pub fn scenes(&self) -> &[ElementId] {
        &self.scenes
    }

    /// The scene to show first, when the document names one.
    pub fn default_scene(&self) -> Option<ElementId> {
        self.default_scene.or_else(|| self.scenes.first().copied())
    }

    pub(crate) fn set_default_scene(&mut self, id: Option<ElementId>) {
        self.default_scene = id;
    }

    /// Identities of every entity of `kind`, in no particular order.
    pub fn ids_of(&self, kind: ElementKind) -> Vec<ElementId> {
        self.records
            .iter()
            .filter(|(_, record)| record.kind() == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Finds entities of `kind` by name. Names are not unique.
    pub fn find_by_name(&self, kind: ElementKind, name: &str) -> Vec<ElementId> {
        self.records
            .iter()
            .filter(|(_, record)| record.kind() == kind && record_name(record.data()) == Some(name))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the graph holds no entity.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deletes an entity and scrubs every reference to it.
    ///
    /// Each record that referenced it moves to its next sequence. Returns
    /// those records' identities, or `None` if `id` is unknown.
    pub fn remove(&mut self, id: ElementId) -> Option<Vec<ElementId>> {
        let removed = self.records.remove(&id)?;
        self.scenes.retain(|scene| *scene != id);
        if self.default_scene == Some(id) {
            self.default_scene = None;
        }

        let mut parents = Vec::new();
        for (parent, record) in self.records.iter_mut() {
            if record.data_mut().scrub(id) {
                record.bump();
                parents.push(*parent);
            }
        }
        log::debug!(
            "Removed {} {id}; {} records referenced it.",
            removed.kind(),
            parents.len()
        );
        Some(parents)
    }
}

fn record_name(data: &RecordData) -> Option<&str> {
    match data {
        RecordData::Material(record) => record.name.as_deref(),
        RecordData::Texture(record) => record.name.as_deref(),
        RecordData::Sampler(record) => record.name.as_deref(),
        RecordData::Accessor(record) => record.name.as_deref(),
        RecordData::Primitive(_) => None,
        RecordData::Mesh(record) => record.name.as_deref(),
        RecordData::Node(record) => record.name.as_deref(),
        RecordData::Scene(record) => record.name.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{NodeRecord, SceneRecord};

    #[test]
    fn test_remove_scrubs_parents() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(RecordData::Node(NodeRecord::default()));
        let scene = graph.insert(RecordData::Scene(SceneRecord {
            name: Some("Main".to_owned()),
            nodes: vec![node],
        }));

        let parents = graph.remove(node).unwrap();

        assert_eq!(parents, vec![scene]);
        assert_eq!(graph.sequence_of(scene), Some(Sequence::new(2)));
        assert_eq!(graph.get(scene).unwrap().data().references(), vec![]);
        assert!(graph.remove(node).is_none());
    }

    #[test]
    fn test_find_by_name_returns_duplicates() {
        let mut graph = SceneGraph::new();
        for _ in 0..2 {
            graph.insert(RecordData::Scene(SceneRecord {
                name: Some("Twin".to_owned()),
                nodes: Vec::new(),
            }));
        }

        assert_eq!(graph.find_by_name(ElementKind::Scene, "Twin").len(), 2);
        assert_eq!(graph.scenes().len(), 2);
        assert!(graph.default_scene().is_some());
    }
}
