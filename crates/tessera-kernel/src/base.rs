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


//! The capability surface shared by every element.

use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Weak;
use tessera_core::{ElementId, Sequence};

use crate::error::KernelError;
use crate::kernel::{Kernel, KernelShared};
use crate::mutation::PendingMutation;

/// Identity bookkeeping and the kernel binding of one element.
///
/// Only the kernel creates an `ElementBase`, before any kind-specific field is
/// populated, and hands it to the element's constructor. Its fields are
/// private: the kernel link cannot be read, replaced or enumerated, and no
/// `ElementBase` can be forged outside this crate.
pub struct ElementBase {
    id: ElementId,
    sequence: Cell<Sequence>,
    kernel: Weak<KernelShared>,
}

impl ElementBase {
    pub(crate) fn new(id: ElementId, sequence: Sequence, kernel: Weak<KernelShared>) -> Self {
        Self {
            id,
            sequence: Cell::new(sequence),
            kernel,
        }
    }

    /// The element's identity.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The sequence of the last snapshot applied to this element.
    pub fn sequence(&self) -> Sequence {
        self.sequence.get()
    }

    pub(crate) fn set_sequence(&self, sequence: Sequence) {
        self.sequence.set(sequence);
    }

    /// Asks the kernel to forward a mutation of `path` to the host.
    ///
    /// Local state is left untouched. The returned future resolves once the
    /// host has acknowledged the command; by then an accepted change has
    /// already been re-synchronized into this element.
    pub fn dispatch(&self, path: &str, value: Value) -> PendingMutation {
        match self.kernel.upgrade() {
            Some(shared) => Kernel::from_shared(shared).dispatch(self, path, value),
            None => PendingMutation::failed(KernelError::Disposed),
        }
    }
}

impl fmt::Debug for ElementBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBase")
            .field("id", &self.id)
            .field("sequence", &self.sequence.get())
            .finish_non_exhaustive()
    }
}
