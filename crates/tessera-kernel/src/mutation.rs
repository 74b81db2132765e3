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


//! Pending mutations.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tessera_core::{CommandId, ElementId, Sequence};
use tokio::sync::oneshot;

use crate::error::KernelError;

/// Confirmation that the host applied a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationReceipt {
    /// The command that was applied.
    pub command: CommandId,
    /// The mutated element.
    pub id: ElementId,
    /// The element's sequence after the change.
    pub sequence: Sequence,
}

pub(crate) type MutationReply = oneshot::Sender<Result<MutationReceipt, KernelError>>;

enum PendingState {
    Waiting {
        command: CommandId,
        receiver: oneshot::Receiver<Result<MutationReceipt, KernelError>>,
    },
    Ready(Option<Result<MutationReceipt, KernelError>>),
}

/// A mutation that has been queued for the host.
///
/// Await it, or poll it with [`try_result`](PendingMutation::try_result) from
/// a loop that also pumps host messages. It resolves with the host's
/// acknowledgement, with [`KernelError::MutationRejected`] when the host
/// refuses, and with [`KernelError::Disposed`] when the kernel is torn down
/// first. Dropping it abandons interest in the outcome; the command is still
/// delivered.
pub struct PendingMutation {
    state: PendingState,
}

impl PendingMutation {
    pub(crate) fn waiting(
        command: CommandId,
    ) -> (Self, MutationReply) {
        let (sender, receiver) = oneshot::channel();
        let pending = Self {
            state: PendingState::Waiting { command, receiver },
        };
        (pending, sender)
    }

    pub(crate) fn failed(error: KernelError) -> Self {
        Self {
            state: PendingState::Ready(Some(Err(error))),
        }
    }

    /// The correlation id of the queued command, if one was sent.
    pub fn command(&self) -> Option<CommandId> {
        match &self.state {
            PendingState::Waiting { command, .. } => Some(*command),
            PendingState::Ready(_) => None,
        }
    }

    /// Returns the outcome if it is available, without waiting.
    ///
    /// The outcome is handed out once; later calls return `None`.
    pub fn try_result(&mut self) -> Option<Result<MutationReceipt, KernelError>> {
        match &mut self.state {
            PendingState::Waiting { receiver, .. } => {
                let outcome = match receiver.try_recv() {
                    Ok(outcome) => outcome,
                    Err(oneshot::error::TryRecvError::Empty) => return None,
                    Err(oneshot::error::TryRecvError::Closed) => Err(KernelError::Disposed),
                };
                self.state = PendingState::Ready(None);
                Some(outcome)
            }
            PendingState::Ready(outcome) => outcome.take(),
        }
    }
}

impl Future for PendingMutation {
    type Output = Result<MutationReceipt, KernelError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            PendingState::Waiting { receiver, .. } => match Pin::new(receiver).poll(cx) {
                Poll::Ready(outcome) => {
                    this.state = PendingState::Ready(None);
                    Poll::Ready(outcome.unwrap_or(Err(KernelError::Disposed)))
                }
                Poll::Pending => Poll::Pending,
            },
            PendingState::Ready(outcome) => {
                Poll::Ready(outcome.take().unwrap_or(Err(KernelError::Disposed)))
            }
        }
    }
}

impl std::fmt::Debug for PendingMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingMutation")
            .field("command", &self.command())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_mutation_reports_once() {
        let mut pending = PendingMutation::failed(KernelError::ChannelClosed);
        assert_eq!(pending.command(), None);
        assert_eq!(pending.try_result(), Some(Err(KernelError::ChannelClosed)));
        assert_eq!(pending.try_result(), None);
    }

    #[test]
    fn test_waiting_until_replied() {
        let command = CommandId::new(3);
        let (mut pending, reply) = PendingMutation::waiting(command);
        assert_eq!(pending.command(), Some(command));
        assert_eq!(pending.try_result(), None);

        let receipt = MutationReceipt {
            command,
            id: ElementId::new(),
            sequence: Sequence::new(4),
        };
        reply.send(Ok(receipt)).unwrap();
        assert_eq!(pending.try_result(), Some(Ok(receipt)));
    }

    #[test]
    fn test_dropped_reply_means_disposed() {
        let (mut pending, reply) = PendingMutation::waiting(CommandId::new(1));
        drop(reply);
        assert_eq!(pending.try_result(), Some(Err(KernelError::Disposed)));
    }

    #[tokio::test]
    async fn test_await_resolves_with_reply() {
        let command = CommandId::new(9);
        let (pending, reply) = PendingMutation::waiting(command);
        let receipt = MutationReceipt {
            command,
            id: ElementId::new(),
            sequence: Sequence::new(2),
        };
        reply.send(Ok(receipt)).unwrap();
        assert_eq!(pending.await, Ok(receipt));
    }
}
