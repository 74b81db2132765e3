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


//! The kernel: the sandbox-side mediator between elements and the host.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use tessera_core::snapshot::SnapshotHeader;
use tessera_core::{
    CommandId, ElementId, HostMessage, MutationCommand, Rejection, SandboxMessage, Sequence,
};

use crate::base::ElementBase;
use crate::cache::IdentityCache;
use crate::capability::{parse, Capabilities, Commit, ElementFactory, Factory};
use crate::config::KernelConfig;
use crate::element::{Element, ErasedElement, Resolved, ValueObject};
use crate::error::KernelError;
use crate::mutation::{MutationReceipt, MutationReply, PendingMutation};

/// What applying a snapshot did to the identity cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new element was built and cached, or a value was built.
    Created,
    /// A cached element was updated in place.
    Updated,
    /// The snapshot carried the sequence already applied; nothing changed.
    Unchanged,
    /// The snapshot was older than the cached element and was discarded.
    Stale,
}

/// The effect of one inbound [`HostMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// A snapshot was resolved.
    Synced {
        /// The snapshot's kind.
        kind: &'static str,
        /// The identity, for identity-bearing kinds.
        id: Option<ElementId>,
        /// What happened to the cache.
        outcome: SyncOutcome,
    },
    /// An element was removed from the cache.
    Evicted {
        /// The evicted identity.
        id: ElementId,
        /// Whether the identity was cached.
        known: bool,
    },
    /// A mutation acknowledgement was delivered.
    Acknowledged {
        /// The acknowledged command.
        command: CommandId,
        /// Whether a pending mutation was waiting for it.
        matched: bool,
    },
}

struct PendingEntry {
    id: ElementId,
    path: String,
    reply: MutationReply,
}

pub(crate) struct KernelShared {
    config: KernelConfig,
    capabilities: Capabilities,
    cache: RefCell<IdentityCache>,
    in_flight: RefCell<HashSet<ElementId>>,
    outbound: flume::Sender<SandboxMessage>,
    pending: RefCell<HashMap<CommandId, PendingEntry>>,
    next_command: Cell<u64>,
    disposed: Cell<bool>,
}

struct StagedUpdate {
    element: Rc<dyn ErasedElement>,
    sequence: Sequence,
    commit: Commit,
}

/// Everything one top-level resolution would change, held back until the
/// root snapshot has resolved.
///
/// Nested lookups read through the staged elements, so an identity seen twice
/// in one snapshot still resolves to one instance.
#[derive(Default)]
pub(crate) struct Staged {
    created: HashMap<ElementId, Rc<dyn ErasedElement>>,
    sequences: HashMap<ElementId, Sequence>,
    updates: Vec<StagedUpdate>,
}

impl Staged {
    fn get(&self, id: &ElementId) -> Option<Rc<dyn ErasedElement>> {
        self.created.get(id).cloned()
    }

    fn sequence_of(&self, element: &dyn ErasedElement) -> Sequence {
        let base = element.base();
        self.sequences
            .get(&base.id())
            .copied()
            .unwrap_or_else(|| base.sequence())
    }

    fn update(&mut self, element: Rc<dyn ErasedElement>, sequence: Sequence, commit: Commit) {
        self.sequences.insert(element.base().id(), sequence);
        self.updates.push(StagedUpdate {
            element,
            sequence,
            commit,
        });
    }

    /// Applies staged updates in resolution order, then caches new elements.
    fn commit(self, cache: &RefCell<IdentityCache>) {
        for update in self.updates {
            (update.commit)();
            update.element.base().set_sequence(update.sequence);
        }
        let mut cache = cache.borrow_mut();
        for element in self.created.into_values() {
            cache.insert(element);
        }
    }
}

/// Marks an identity as under construction for as long as it lives.
struct InFlight<'a> {
    set: &'a RefCell<HashSet<ElementId>>,
    id: ElementId,
}

impl<'a> InFlight<'a> {
    fn enter(set: &'a RefCell<HashSet<ElementId>>, id: ElementId) -> Result<Self, KernelError> {
        if !set.borrow_mut().insert(id) {
            return Err(KernelError::CyclicSnapshot { id });
        }
        Ok(Self { set, id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.id);
    }
}

/// The sandbox-side mediator.
///
/// The kernel is the only component that deserializes snapshots into
/// elements, owns the identity cache, and forwards mutations to the host.
/// It is single-threaded (`!Send`); cloning a `Kernel` clones a handle to the
/// same state.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tessera_core::ElementId;
/// use tessera_kernel::{elements::Material, Capabilities, Kernel};
///
/// let (outbound, _host) = flume::unbounded();
/// let kernel = Kernel::new(Capabilities::standard(), outbound);
///
/// let id = ElementId::new();
/// let snapshot = json!({ "id": id, "sequence": 1, "name": "Brass" });
/// let first = kernel.deserialize_element::<Material>(&snapshot).unwrap();
/// let second = kernel.deserialize_element::<Material>(&snapshot).unwrap();
///
/// assert!(std::rc::Rc::ptr_eq(&first, &second));
/// assert_eq!(first.name().as_deref(), Some("Brass"));
/// ```
#[derive(Clone)]
pub struct Kernel {
    shared: Rc<KernelShared>,
}

impl Kernel {
    /// Creates a kernel with the default configuration.
    ///
    /// `outbound` is the queue mutation commands are placed on.
    pub fn new(capabilities: Capabilities, outbound: flume::Sender<SandboxMessage>) -> Self {
        Self::with_config(KernelConfig::default(), capabilities, outbound)
    }

    /// Creates a kernel with an explicit configuration.
    pub fn with_config(
        config: KernelConfig,
        capabilities: Capabilities,
        outbound: flume::Sender<SandboxMessage>,
    ) -> Self {
        log::debug!(
            "Kernel initialized with {} registered kinds.",
            capabilities.len()
        );
        Self {
            shared: Rc::new(KernelShared {
                config,
                capabilities,
                cache: RefCell::new(IdentityCache::default()),
                in_flight: RefCell::new(HashSet::new()),
                outbound,
                pending: RefCell::new(HashMap::new()),
                next_command: Cell::new(1),
                disposed: Cell::new(false),
            }),
        }
    }

    pub(crate) fn from_shared(shared: Rc<KernelShared>) -> Self {
        Self { shared }
    }

    /// The kinds this kernel can resolve.
    pub fn capabilities(&self) -> &Capabilities {
        &self.shared.capabilities
    }

    /// Resolves a snapshot of `kind` into an element or value.
    ///
    /// Identity-bearing kinds are deduplicated: resolving the same identity
    /// again returns the cached instance, updated in place when the snapshot
    /// is newer and left untouched when it is not. Nested sub-structures are
    /// resolved eagerly through this same entry point. When the snapshot, or
    /// anything nested in it, fails to resolve, nothing is cached and no
    /// cached element changes.
    pub fn deserialize(&self, kind: &str, snapshot: &Value) -> Result<Resolved, KernelError> {
        self.resolve_root(kind, snapshot)
            .map(|(resolved, _)| resolved)
    }

    /// Resolves a snapshot under `E`'s kind and downcasts the result.
    pub fn deserialize_element<E: Element>(&self, snapshot: &Value) -> Result<Rc<E>, KernelError> {
        self.deserialize(E::KIND, snapshot)?.into_element::<E>()
    }

    /// Applies one inbound message from the host.
    pub fn receive(&self, message: HostMessage) -> Result<Received, KernelError> {
        self.ensure_live()?;
        match message {
            HostMessage::Sync { kind, snapshot } => {
                let (resolved, outcome) = self.resolve_root(&kind, &snapshot)?;
                Ok(Received::Synced {
                    kind: resolved.kind(),
                    id: resolved.id(),
                    outcome,
                })
            }
            HostMessage::Evict { id } => Ok(Received::Evicted {
                id,
                known: self.evict(id),
            }),
            HostMessage::Ack { command, outcome } => Ok(Received::Acknowledged {
                command,
                matched: self.acknowledge(command, outcome),
            }),
        }
    }

    /// Removes an element from the identity cache.
    ///
    /// Outstanding references keep the element readable, but it no longer
    /// receives updates and its setters fail with [`KernelError::Detached`].
    pub fn evict(&self, id: ElementId) -> bool {
        let removed = self.shared.cache.borrow_mut().remove(&id);
        match removed {
            Some(element) => {
                log::debug!("Evicted {} {id}.", element.kind());
                true
            }
            None => {
                log::debug!("Eviction of unknown element {id} ignored.");
                false
            }
        }
    }

    /// Returns the cached element with `id`, if it has type `E`.
    pub fn get<E: Element>(&self, id: ElementId) -> Option<Rc<E>> {
        let element = self.shared.cache.borrow().get(&id)?;
        element.into_any().downcast::<E>().ok()
    }

    /// Returns every cached element of type `E`, in no particular order.
    pub fn elements<E: Element>(&self) -> Vec<Rc<E>> {
        self.shared
            .cache
            .borrow()
            .values()
            .filter(|element| element.kind() == E::KIND)
            .filter_map(|element| element.clone().into_any().downcast::<E>().ok())
            .collect()
    }

    /// The kind of the cached element with `id`.
    pub fn kind_of(&self, id: ElementId) -> Option<&'static str> {
        self.shared
            .cache
            .borrow()
            .get(&id)
            .map(|element| element.kind())
    }

    /// Returns `true` if an element with `id` is cached.
    pub fn contains(&self, id: ElementId) -> bool {
        self.shared.cache.borrow().contains(&id)
    }

    /// Number of cached elements.
    pub fn len(&self) -> usize {
        self.shared.cache.borrow().len()
    }

    /// Returns `true` if no element is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of mutations waiting for an acknowledgement.
    pub fn pending_mutations(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    /// Tears the kernel down.
    ///
    /// The identity cache is dropped wholesale, every pending mutation fails
    /// with [`KernelError::Disposed`], and every later operation fails the
    /// same way.
    pub fn dispose(&self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        let elements = self.shared.cache.borrow_mut().drain();
        let pending: Vec<_> = self.shared.pending.borrow_mut().drain().collect();
        log::info!(
            "Kernel disposed: dropped {} elements and {} pending mutations.",
            elements.len(),
            pending.len()
        );
        for (_, entry) in pending {
            let _ = entry.reply.send(Err(KernelError::Disposed));
        }
        drop(elements);
    }

    /// Returns `true` once [`dispose`](Kernel::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }

    fn ensure_live(&self) -> Result<(), KernelError> {
        if self.is_disposed() {
            Err(KernelError::Disposed)
        } else {
            Ok(())
        }
    }

    fn resolve_root(&self, kind: &str, snapshot: &Value) -> Result<(Resolved, SyncOutcome), KernelError> {
        let mut staged = Staged::default();
        let resolved = self.resolve_at(kind, snapshot, 0, &mut staged)?;
        log::trace!(
            "Committing {} new and {} updated elements.",
            staged.created.len(),
            staged.updates.len()
        );
        staged.commit(&self.shared.cache);
        Ok(resolved)
    }

    fn resolve_at(
        &self,
        kind: &str,
        snapshot: &Value,
        depth: usize,
        staged: &mut Staged,
    ) -> Result<(Resolved, SyncOutcome), KernelError> {
        self.ensure_live()?;
        let max_depth = self.shared.config.max_depth;
        if depth > max_depth {
            return Err(KernelError::malformed(
                kind,
                format!("nesting exceeds {max_depth} levels"),
            ));
        }
        let Some(factory) = self.shared.capabilities.get(kind) else {
            log::warn!("No factory registered for kind '{kind}'.");
            return Err(KernelError::UnknownKind {
                kind: kind.to_owned(),
            });
        };

        let mut resolver = Resolver {
            kernel: self,
            depth,
            staged,
        };
        match factory {
            Factory::Value(factory) => {
                let value = factory.construct(snapshot, &mut resolver)?;
                Ok((Resolved::value(factory.kind(), value), SyncOutcome::Created))
            }
            Factory::Element(factory) => {
                self.resolve_element(factory.as_ref(), snapshot, &mut resolver)
            }
        }
    }

    fn resolve_element(
        &self,
        factory: &dyn ElementFactory,
        snapshot: &Value,
        resolver: &mut Resolver<'_>,
    ) -> Result<(Resolved, SyncOutcome), KernelError> {
        let kind = factory.kind();
        let header: SnapshotHeader = parse(kind, snapshot)?;
        if self.shared.in_flight.borrow().contains(&header.id) {
            return Err(KernelError::CyclicSnapshot { id: header.id });
        }
        let cached = resolver
            .staged
            .get(&header.id)
            .or_else(|| self.shared.cache.borrow().get(&header.id));

        let Some(element) = cached else {
            let _guard = InFlight::enter(&self.shared.in_flight, header.id)?;
            let base = ElementBase::new(header.id, header.sequence, Rc::downgrade(&self.shared));
            let element = factory.construct(base, snapshot, resolver)?;
            resolver.staged.created.insert(header.id, element.clone());
            log::trace!("Built {kind} {} at {}.", header.id, header.sequence);
            return Ok((Resolved::element(element), SyncOutcome::Created));
        };

        if element.kind() != kind {
            return Err(KernelError::KindMismatch {
                id: Some(header.id),
                expected: kind.to_owned(),
                found: element.kind().to_owned(),
            });
        }

        let current = resolver.staged.sequence_of(element.as_ref());
        if header.sequence <= current {
            let outcome = if header.sequence == current {
                SyncOutcome::Unchanged
            } else {
                log::debug!(
                    "Discarding stale {kind} {} snapshot {} (holding {current}).",
                    header.id,
                    header.sequence
                );
                SyncOutcome::Stale
            };
            return Ok((Resolved::element(element), outcome));
        }

        let _guard = InFlight::enter(&self.shared.in_flight, header.id)?;
        let commit = factory.resync(element.clone(), snapshot, resolver)?;
        resolver.staged.update(element.clone(), header.sequence, commit);
        log::trace!("Resolved {kind} {} at {}.", header.id, header.sequence);
        Ok((Resolved::element(element), SyncOutcome::Updated))
    }

    /// Whether `base` belongs to the instance currently cached under its id.
    ///
    /// An evicted instance stays detached even after its identity is cached
    /// again as a new instance.
    fn is_attached(&self, base: &ElementBase) -> bool {
        self.shared
            .cache
            .borrow()
            .get(&base.id())
            .is_some_and(|cached| std::ptr::eq(cached.base(), base))
    }

    pub(crate) fn dispatch(&self, base: &ElementBase, path: &str, value: Value) -> PendingMutation {
        let id = base.id();
        let sequence = base.sequence();
        if self.is_disposed() {
            return PendingMutation::failed(KernelError::Disposed);
        }
        if !self.is_attached(base) {
            return PendingMutation::failed(KernelError::Detached { id });
        }

        let command = CommandId::new(self.shared.next_command.get());
        self.shared.next_command.set(command.get() + 1);

        let message = SandboxMessage::Mutate(MutationCommand {
            command,
            id,
            sequence,
            path: path.to_owned(),
            value,
        });
        if self.shared.outbound.send(message).is_err() {
            log::error!("Failed to queue {command} for {id}: host channel closed.");
            return PendingMutation::failed(KernelError::ChannelClosed);
        }

        let (pending, reply) = PendingMutation::waiting(command);
        self.shared.pending.borrow_mut().insert(
            command,
            PendingEntry {
                id,
                path: path.to_owned(),
                reply,
            },
        );
        log::trace!("Queued {command}: '{path}' on {id}.");
        pending
    }

    fn acknowledge(&self, command: CommandId, outcome: Result<Sequence, Rejection>) -> bool {
        let Some(entry) = self.shared.pending.borrow_mut().remove(&command) else {
            log::warn!("Acknowledgement for unknown {command} ignored.");
            return false;
        };
        let result = match outcome {
            Ok(sequence) => Ok(MutationReceipt {
                command,
                id: entry.id,
                sequence,
            }),
            Err(reason) => {
                log::warn!("Host rejected '{}' on {}: {reason}.", entry.path, entry.id);
                Err(KernelError::MutationRejected {
                    id: entry.id,
                    path: entry.path,
                    reason,
                })
            }
        };
        // The caller may have dropped its PendingMutation.
        let _ = entry.reply.send(result);
        true
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("elements", &self.len())
            .field("pending_mutations", &self.pending_mutations())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// The kernel's deserialization entry point, as seen by a factory while it
/// builds an element or value.
///
/// A `Resolver` only exists for the duration of a kernel-driven construction
/// or re-synchronization; it cannot be created elsewhere. Elements it resolves
/// are held back with the rest of the snapshot and only become visible once
/// the whole snapshot has resolved.
pub struct Resolver<'k> {
    kernel: &'k Kernel,
    depth: usize,
    staged: &'k mut Staged,
}

impl Resolver<'_> {
    /// Resolves a nested snapshot under an explicit kind discriminator.
    pub fn deserialize(&mut self, kind: &str, snapshot: &Value) -> Result<Resolved, KernelError> {
        self.kernel
            .resolve_at(kind, snapshot, self.depth + 1, self.staged)
            .map(|(resolved, _)| resolved)
    }

    /// Resolves a nested identity-bearing element.
    pub fn element<E: Element>(&mut self, kind: &str, snapshot: &Value) -> Result<Rc<E>, KernelError> {
        self.deserialize(kind, snapshot)?.into_element::<E>()
    }

    /// Resolves a nested value.
    pub fn value<V: ValueObject>(&mut self, kind: &str, snapshot: &Value) -> Result<V, KernelError> {
        self.deserialize(kind, snapshot)?.into_value::<V>()
    }

    /// Resolves an optional nested element. Absent and `null` snapshots are
    /// not passed to the kernel.
    pub fn optional_element<E: Element>(
        &mut self,
        kind: &str,
        snapshot: Option<&Value>,
    ) -> Result<Option<Rc<E>>, KernelError> {
        match snapshot {
            Some(snapshot) if !snapshot.is_null() => self.element(kind, snapshot).map(Some),
            _ => Ok(None),
        }
    }

    /// Resolves an optional nested value. Absent and `null` snapshots are not
    /// passed to the kernel.
    pub fn optional_value<V: ValueObject>(
        &mut self,
        kind: &str,
        snapshot: Option<&Value>,
    ) -> Result<Option<V>, KernelError> {
        match snapshot {
            Some(snapshot) if !snapshot.is_null() => self.value(kind, snapshot).map(Some),
            _ => Ok(None),
        }
    }

    /// Resolves a list of nested elements, in order.
    pub fn elements<E: Element>(
        &mut self,
        kind: &str,
        snapshots: &[Value],
    ) -> Result<Vec<Rc<E>>, KernelError> {
        snapshots
            .iter()
            .map(|snapshot| self.element(kind, snapshot))
            .collect()
    }
}
