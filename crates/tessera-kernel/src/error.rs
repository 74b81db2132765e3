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


//! Error type for kernel operations.

use std::fmt;
use tessera_core::{ElementId, Rejection};

/// Everything that can go wrong while resolving snapshots or mutating
/// elements.
///
/// Stale snapshots are not errors; they are reported as
/// [`SyncOutcome::Stale`](crate::SyncOutcome::Stale).
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// No factory is registered for the kind discriminator.
    UnknownKind {
        /// The unrecognized discriminator.
        kind: String,
    },
    /// The snapshot does not have the shape its kind requires.
    MalformedSnapshot {
        /// The kind being resolved.
        kind: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A snapshot or cached element has a different kind than requested.
    KindMismatch {
        /// The identity involved, when there is one.
        id: Option<ElementId>,
        /// The kind the caller asked for.
        expected: String,
        /// The kind that was found.
        found: String,
    },
    /// A snapshot nests an element inside its own construction.
    CyclicSnapshot {
        /// The identity that recurs.
        id: ElementId,
    },
    /// The element has been evicted from the kernel and no longer mirrors a
    /// host entity.
    Detached {
        /// The evicted identity.
        id: ElementId,
    },
    /// The kernel has been disposed.
    Disposed,
    /// The host side of the channel is gone.
    ChannelClosed,
    /// The host refused a mutation.
    MutationRejected {
        /// The targeted element.
        id: ElementId,
        /// The targeted field path.
        path: String,
        /// The host's reason.
        reason: Rejection,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::UnknownKind { kind } => write!(f, "Unknown element kind '{kind}'"),
            KernelError::MalformedSnapshot { kind, reason } => {
                write!(f, "Malformed '{kind}' snapshot: {reason}")
            }
            KernelError::KindMismatch {
                id,
                expected,
                found,
            } => match id {
                Some(id) => write!(f, "Element {id} is a '{found}', expected '{expected}'"),
                None => write!(f, "Resolved a '{found}', expected '{expected}'"),
            },
            KernelError::CyclicSnapshot { id } => {
                write!(f, "Snapshot for {id} contains itself")
            }
            KernelError::Detached { id } => write!(f, "Element {id} has been evicted"),
            KernelError::Disposed => write!(f, "Kernel has been disposed"),
            KernelError::ChannelClosed => write!(f, "Host channel is closed"),
            KernelError::MutationRejected { id, path, reason } => {
                write!(f, "Mutation of '{path}' on {id} rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KernelError::MutationRejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl KernelError {
    pub(crate) fn malformed(kind: &str, reason: impl fmt::Display) -> Self {
        KernelError::MalformedSnapshot {
            kind: kind.to_owned(),
            reason: reason.to_string(),
        }
    }
}
