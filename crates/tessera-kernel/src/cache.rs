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


//! The identity cache: the kernel's map from identity to live element.
//!
//! Only the kernel writes here. Elements never see the cache; they ask the
//! kernel to resolve or mutate.

use std::collections::HashMap;
use std::rc::Rc;
use tessera_core::ElementId;

use crate::element::ErasedElement;

#[derive(Default)]
pub(crate) struct IdentityCache {
    entries: HashMap<ElementId, Rc<dyn ErasedElement>>,
}

impl IdentityCache {
    pub(crate) fn get(&self, id: &ElementId) -> Option<Rc<dyn ErasedElement>> {
        self.entries.get(id).cloned()
    }

    pub(crate) fn contains(&self, id: &ElementId) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn insert(&mut self, element: Rc<dyn ErasedElement>) {
        let id = element.base().id();
        if self.entries.insert(id, element).is_some() {
            log::warn!("Identity cache entry for {id} was overwritten.");
        }
    }

    pub(crate) fn remove(&mut self, id: &ElementId) -> Option<Rc<dyn ErasedElement>> {
        self.entries.remove(id)
    }

    /// Empties the cache, handing back the entries so they are dropped
    /// outside any borrow of the cache.
    pub(crate) fn drain(&mut self) -> Vec<Rc<dyn ErasedElement>> {
        self.entries.drain().map(|(_, element)| element).collect()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Rc<dyn ErasedElement>> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
