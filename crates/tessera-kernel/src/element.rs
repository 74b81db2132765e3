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


//! The element and value-object contracts, and the type-erased result of a
//! deserialization.

use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use tessera_core::{ElementId, Sequence};

use crate::base::ElementBase;
use crate::error::KernelError;
use crate::kernel::Resolver;

/// An identity-bearing proxy for one host entity.
///
/// Implementors hold their [`ElementBase`] plus private state resolved from
/// a [`Snapshot`](Element::Snapshot). They expose read-only accessors and
/// kernel-mediated setters, never writable fields. State is only produced by
/// [`resolve`](Element::resolve), which takes a [`Resolver`] that only the
/// kernel can create, so nothing but the kernel can populate or refresh an
/// element.
///
/// Resolution and application are separate steps. The kernel resolves a whole
/// snapshot, nested elements included, before it builds or updates anything,
/// so a snapshot that fails halfway leaves every element as it was.
pub trait Element: fmt::Debug + Sized + 'static {
    /// The kind discriminator this element is registered under.
    const KIND: &'static str;

    /// The serialized shape of this kind.
    type Snapshot: DeserializeOwned;

    /// The private state resolved from one snapshot.
    type State: 'static;

    /// Resolves a snapshot into state. Nested sub-structures go through
    /// `resolver`.
    fn resolve(snapshot: Self::Snapshot, resolver: &mut Resolver<'_>)
        -> Result<Self::State, KernelError>;

    /// Builds the element. `base` has already been established by the kernel.
    fn construct(base: ElementBase, state: Self::State) -> Self;

    /// Swaps in newer state, in place.
    fn replace(&self, state: Self::State);

    /// The element's base.
    fn base(&self) -> &ElementBase;

    /// The element's identity.
    fn id(&self) -> ElementId {
        self.base().id()
    }

    /// The sequence of the last snapshot applied.
    fn sequence(&self) -> Sequence {
        self.base().sequence()
    }
}

/// A nested sub-structure without identity, owned by its parent and rebuilt
/// on every deserialization.
pub trait ValueObject: fmt::Debug + Clone + 'static {
    /// The kind discriminator this value is registered under.
    const KIND: &'static str;

    /// The serialized shape of this kind.
    type Snapshot: DeserializeOwned;

    /// Builds the value.
    fn construct(snapshot: Self::Snapshot, resolver: &mut Resolver<'_>)
        -> Result<Self, KernelError>;
}

/// Object-safe view of an [`Element`], as stored in the identity cache.
pub(crate) trait ErasedElement: Any {
    fn kind(&self) -> &'static str;
    fn base(&self) -> &ElementBase;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<E: Element> ErasedElement for E {
    fn kind(&self) -> &'static str {
        E::KIND
    }

    fn base(&self) -> &ElementBase {
        Element::base(self)
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

enum ResolvedInner {
    Element(Rc<dyn ErasedElement>),
    Value(Box<dyn Any>),
}

/// The result of [`Kernel::deserialize`](crate::Kernel::deserialize): either a
/// shared element or an owned value, tagged with its kind.
pub struct Resolved {
    kind: &'static str,
    inner: ResolvedInner,
}

impl Resolved {
    pub(crate) fn element(element: Rc<dyn ErasedElement>) -> Self {
        Self {
            kind: element.kind(),
            inner: ResolvedInner::Element(element),
        }
    }

    pub(crate) fn value(kind: &'static str, value: Box<dyn Any>) -> Self {
        Self {
            kind,
            inner: ResolvedInner::Value(value),
        }
    }

    /// The kind discriminator the result was produced under.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The identity, for identity-bearing results.
    pub fn id(&self) -> Option<ElementId> {
        match &self.inner {
            ResolvedInner::Element(element) => Some(element.base().id()),
            ResolvedInner::Value(_) => None,
        }
    }

    /// Whether the result is an identity-bearing element.
    pub fn is_element(&self) -> bool {
        matches!(self.inner, ResolvedInner::Element(_))
    }

    /// Downcasts to a concrete element type.
    pub fn into_element<E: Element>(self) -> Result<Rc<E>, KernelError> {
        let found = self.kind;
        match self.inner {
            ResolvedInner::Element(element) => {
                let id = element.base().id();
                element
                    .into_any()
                    .downcast::<E>()
                    .map_err(|_| KernelError::KindMismatch {
                        id: Some(id),
                        expected: E::KIND.to_owned(),
                        found: found.to_owned(),
                    })
            }
            ResolvedInner::Value(_) => Err(KernelError::KindMismatch {
                id: None,
                expected: E::KIND.to_owned(),
                found: found.to_owned(),
            }),
        }
    }

    /// Downcasts to a concrete value type.
    pub fn into_value<V: ValueObject>(self) -> Result<V, KernelError> {
        let found = self.kind;
        let mismatch = |id| KernelError::KindMismatch {
            id,
            expected: V::KIND.to_owned(),
            found: found.to_owned(),
        };
        match self.inner {
            ResolvedInner::Value(value) => value
                .downcast::<V>()
                .map(|value| *value)
                .map_err(|_| mismatch(None)),
            ResolvedInner::Element(element) => Err(mismatch(Some(element.base().id()))),
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("kind", &self.kind)
            .field("id", &self.id())
            .finish()
    }
}
