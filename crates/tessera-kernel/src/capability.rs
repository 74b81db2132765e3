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


//! The capability set: which kinds a sandbox can deserialize, and how.
//!
//! Every element and value type is bound to its kind string by a generic
//! factory. The set is assembled at bootstrap and injected into the kernel,
//! which dispatches purely on the kind discriminator carried by each
//! snapshot.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::base::ElementBase;
use crate::element::{Element, ErasedElement, ValueObject};
use crate::elements;
use crate::error::KernelError;
use crate::kernel::Resolver;

/// Reads a typed snapshot out of a raw one.
pub(crate) fn parse<T: DeserializeOwned>(kind: &str, snapshot: &Value) -> Result<T, KernelError> {
    T::deserialize(snapshot).map_err(|e| KernelError::malformed(kind, e))
}

/// Applies resolved state to an existing element.
pub(crate) type Commit = Box<dyn FnOnce()>;

pub(crate) trait ElementFactory {
    fn kind(&self) -> &'static str;

    fn construct(
        &self,
        base: ElementBase,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<Rc<dyn ErasedElement>, KernelError>;

    /// Resolves newer state for `element` without applying it.
    fn resync(
        &self,
        element: Rc<dyn ErasedElement>,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<Commit, KernelError>;
}

pub(crate) trait ValueFactory {
    fn kind(&self) -> &'static str;

    fn construct(
        &self,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<Box<dyn Any>, KernelError>;
}

struct ElementConstructor<E>(PhantomData<fn() -> E>);

impl<E: Element> ElementFactory for ElementConstructor<E> {
    fn kind(&self) -> &'static str {
        E::KIND
    }

    fn construct(
        &self,
        base: ElementBase,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<Rc<dyn ErasedElement>, KernelError> {
        let snapshot = parse::<E::Snapshot>(E::KIND, snapshot)?;
        let state = E::resolve(snapshot, resolver)?;
        Ok(Rc::new(E::construct(base, state)))
    }

    fn resync(
        &self,
        element: Rc<dyn ErasedElement>,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<Commit, KernelError> {
        let id = element.base().id();
        let found = element.kind();
        let element = element
            .into_any()
            .downcast::<E>()
            .map_err(|_| KernelError::KindMismatch {
                id: Some(id),
                expected: E::KIND.to_owned(),
                found: found.to_owned(),
            })?;
        let snapshot = parse::<E::Snapshot>(E::KIND, snapshot)?;
        let state = E::resolve(snapshot, resolver)?;
        Ok(Box::new(move || element.replace(state)))
    }
}

struct ValueConstructor<V>(PhantomData<fn() -> V>);

impl<V: ValueObject> ValueFactory for ValueConstructor<V> {
    fn kind(&self) -> &'static str {
        V::KIND
    }

    fn construct(
        &self,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<Box<dyn Any>, KernelError> {
        let snapshot = parse::<V::Snapshot>(V::KIND, snapshot)?;
        Ok(Box::new(V::construct(snapshot, resolver)?))
    }
}

pub(crate) enum Factory {
    Element(Box<dyn ElementFactory>),
    Value(Box<dyn ValueFactory>),
}

impl Factory {
    fn kind(&self) -> &'static str {
        match self {
            Factory::Element(factory) => factory.kind(),
            Factory::Value(factory) => factory.kind(),
        }
    }
}

/// The set of kinds a kernel can resolve.
///
/// # Example
///
/// ```rust
/// use tessera_kernel::Capabilities;
///
/// let capabilities = Capabilities::standard();
/// assert!(capabilities.contains("material"));
/// assert!(capabilities.contains("texture-info"));
/// assert!(!capabilities.contains("skin"));
/// ```
#[derive(Default)]
pub struct Capabilities {
    factories: HashMap<&'static str, Factory>,
}

impl Capabilities {
    /// Creates an empty capability set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// The capability set covering every standard element and value kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut capabilities = Self::new();
        capabilities
            .register_element::<elements::Material>()
            .register_element::<elements::Texture>()
            .register_element::<elements::Sampler>()
            .register_element::<elements::Accessor>()
            .register_element::<elements::Primitive>()
            .register_element::<elements::Mesh>()
            .register_element::<elements::Node>()
            .register_element::<elements::Scene>()
            .register_value::<elements::PbrMetallicRoughness>()
            .register_value::<elements::TextureInfo>()
            .register_value::<elements::NormalTextureInfo>()
            .register_value::<elements::OcclusionTextureInfo>();
        capabilities
    }

    /// Registers an identity-bearing element type under its kind.
    ///
    /// A previous registration for the same kind is replaced.
    pub fn register_element<E: Element>(&mut self) -> &mut Self {
        self.insert(Factory::Element(Box::new(ElementConstructor::<E>(
            PhantomData,
        ))))
    }

    /// Registers a value type under its kind.
    ///
    /// A previous registration for the same kind is replaced.
    pub fn register_value<V: ValueObject>(&mut self) -> &mut Self {
        self.insert(Factory::Value(Box::new(ValueConstructor::<V>(PhantomData))))
    }

    fn insert(&mut self, factory: Factory) -> &mut Self {
        let kind = factory.kind();
        if self.factories.insert(kind, factory).is_some() {
            log::warn!("Replacing the factory registered for kind '{kind}'.");
        }
        self
    }

    /// Removes a kind from the set.
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.factories.remove(kind).is_some()
    }

    /// Returns `true` if `kind` can be resolved.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Returns `true` if `kind` is registered as an identity-bearing element.
    #[must_use]
    pub fn is_identity_bearing(&self, kind: &str) -> bool {
        matches!(self.factories.get(kind), Some(Factory::Element(_)))
    }

    /// The registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.factories.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn get(&self, kind: &str) -> Option<&Factory> {
        self.factories.get(kind)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("kinds", &self.kinds())
            .finish()
    }
}
