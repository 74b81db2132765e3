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


//! In-process message channels between the host and the sandbox.
//!
//! An [`Endpoint`] is one side of a bidirectional link: it sends `Out` and
//! receives `In`. [`channel`] creates both sides at once. Either side can be
//! moved to another thread; the sandbox side is usually polled from the
//! sandbox's own single thread.

use std::fmt;
use std::time::Duration;

use crate::protocol::{HostMessage, SandboxMessage};

/// The sandbox's side of the link.
pub type SandboxEndpoint = Endpoint<SandboxMessage, HostMessage>;

/// The host's side of the link.
pub type HostEndpoint = Endpoint<HostMessage, SandboxMessage>;

/// Returned when the other side of the link has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

impl fmt::Display for Disconnected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the other side of the channel has disconnected")
    }
}

impl std::error::Error for Disconnected {}

/// One side of a bidirectional, unbounded message link.
#[derive(Debug)]
pub struct Endpoint<Out, In> {
    sender: flume::Sender<Out>,
    receiver: flume::Receiver<In>,
}

/// Creates a connected pair of endpoints.
pub fn channel() -> (SandboxEndpoint, HostEndpoint) {
    let (to_host, from_sandbox) = flume::unbounded();
    let (to_sandbox, from_host) = flume::unbounded();
    log::debug!("Sandbox/host channel created.");
    (
        Endpoint {
            sender: to_host,
            receiver: from_host,
        },
        Endpoint {
            sender: to_sandbox,
            receiver: from_sandbox,
        },
    )
}

impl<Out, In> Endpoint<Out, In> {
    /// Sends a message without blocking.
    pub fn send(&self, message: Out) -> Result<(), Disconnected> {
        self.sender.send(message).map_err(|_| {
            log::error!("Failed to send message: receiver disconnected.");
            Disconnected
        })
    }

    /// Returns a clone of the outbound sender.
    ///
    /// The kernel holds one of these as its outbound mutation queue.
    pub fn sender(&self) -> flume::Sender<Out> {
        self.sender.clone()
    }

    /// Returns the next message if one is already queued.
    pub fn try_recv(&self) -> Result<Option<In>, Disconnected> {
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(flume::TryRecvError::Empty) => Ok(None),
            Err(flume::TryRecvError::Disconnected) => Err(Disconnected),
        }
    }

    /// Waits up to `timeout` for the next message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<In>, Disconnected> {
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(flume::RecvTimeoutError::Timeout) => Ok(None),
            Err(flume::RecvTimeoutError::Disconnected) => Err(Disconnected),
        }
    }

    /// Blocks until a message arrives or the other side disconnects.
    pub fn recv(&self) -> Result<In, Disconnected> {
        self.receiver.recv().map_err(|_| Disconnected)
    }

    /// Number of messages waiting to be received.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ElementId;
    use std::thread;

    fn hello() -> SandboxMessage {
        SandboxMessage::Hello {
            kinds: vec!["material".to_string()],
        }
    }

    #[test]
    fn test_messages_arrive_in_order() {
        let (sandbox, host) = channel();
        let first = ElementId::new();
        let second = ElementId::new();

        host.send(HostMessage::Evict { id: first }).unwrap();
        host.send(HostMessage::Evict { id: second }).unwrap();

        assert_eq!(sandbox.pending(), 2);
        assert_eq!(
            sandbox.try_recv().unwrap(),
            Some(HostMessage::Evict { id: first })
        );
        assert_eq!(
            sandbox.try_recv().unwrap(),
            Some(HostMessage::Evict { id: second })
        );
        assert_eq!(sandbox.try_recv().unwrap(), None);
    }

    #[test]
    fn test_try_recv_empty() {
        let (sandbox, _host) = channel();
        assert_eq!(sandbox.try_recv(), Ok(None));
        assert_eq!(sandbox.recv_timeout(Duration::from_millis(5)), Ok(None));
    }

    #[test]
    fn test_send_from_thread() {
        let (sandbox, host) = channel();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sandbox.send(hello()).expect("Send from thread failed");
            sandbox
        });

        match host.recv_timeout(Duration::from_secs(1)) {
            Ok(Some(message)) => assert_eq!(message, hello()),
            other => panic!("Failed to receive message from thread: {other:?}"),
        }

        handle.join().expect("Thread join failed");
    }

    #[test]
    fn test_disconnect_is_reported_both_ways() {
        let (sandbox, host) = channel();
        drop(host);

        assert_eq!(sandbox.send(hello()), Err(Disconnected));
        assert_eq!(sandbox.try_recv(), Err(Disconnected));
        assert_eq!(sandbox.recv(), Err(Disconnected));
    }
}
