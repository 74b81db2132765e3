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


//! # Tessera Kernel
//!
//! The sandbox side of the scene-graph boundary. Untrusted code running in the
//! sandbox sees the host's scene graph as live [`Element`] proxies (materials,
//! meshes, nodes, ...). All of them are produced, cached, re-synchronized and
//! mutated through one mediator, the [`Kernel`].
//!
//! - Snapshots arrive from the host and are resolved with
//!   [`Kernel::deserialize`] or [`Kernel::receive`]. Nested sub-structures are
//!   resolved eagerly and recursively through the same entry point.
//! - Identity-bearing elements are cached by [`ElementId`]: the same identity
//!   always yields the same `Rc` within one kernel lifetime, and newer
//!   snapshots update that instance in place.
//! - Setters never touch local state. They queue a mutation command for the
//!   host and return a [`PendingMutation`]; the element changes only once the
//!   host re-synchronizes it.
//!
//! An element's kernel link and backing state are private. Code outside this
//! crate cannot reach them:
//!
//! ```compile_fail
//! fn steal(material: &tessera_kernel::elements::Material) {
//!     let _ = &material.base.kernel;
//! }
//! ```
//!
//! [`ElementId`]: tessera_core::ElementId

#![warn(missing_docs)]

mod base;
mod cache;
mod capability;
mod config;
mod element;
pub mod elements;
mod error;
mod kernel;
mod mutation;

pub use base::ElementBase;
pub use capability::Capabilities;
pub use config::KernelConfig;
pub use element::{Element, Resolved, ValueObject};
pub use error::KernelError;
pub use kernel::{Kernel, Received, Resolver, SyncOutcome};
pub use mutation::{MutationReceipt, PendingMutation};
