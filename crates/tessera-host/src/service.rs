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


//! The host service loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tessera_core::{
    Disconnected, ElementId, ElementKind, HostEndpoint, HostMessage, MutationCommand,
    SandboxMessage,
};

use crate::config::HostConfig;
use crate::graph::SceneGraph;

/// Serves a [`SceneGraph`] to one sandbox.
///
/// Every mutation is answered in two steps: the target's new snapshot, then
/// the acknowledgement. By the time the sandbox sees an accepted
/// acknowledgement its element already carries the new state.
pub struct HostService {
    config: HostConfig,
    graph: SceneGraph,
    endpoint: HostEndpoint,
}

impl HostService {
    /// Creates a service with the default configuration.
    pub fn new(graph: SceneGraph, endpoint: HostEndpoint) -> Self {
        Self::with_config(HostConfig::default(), graph, endpoint)
    }

    /// Creates a service with an explicit configuration.
    pub fn with_config(config: HostConfig, graph: SceneGraph, endpoint: HostEndpoint) -> Self {
        Self {
            config,
            graph,
            endpoint,
        }
    }

    /// The authoritative graph.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Handles every message currently queued, without waiting.
    ///
    /// Returns how many were handled.
    pub fn process_pending(&mut self) -> Result<usize, Disconnected> {
        let mut handled = 0;
        while let Some(message) = self.endpoint.try_recv()? {
            self.handle(message)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Handles one sandbox message.
    pub fn handle(&mut self, message: SandboxMessage) -> Result<(), Disconnected> {
        match message {
            SandboxMessage::Hello { kinds } => self.greet(&kinds),
            SandboxMessage::Mutate(command) => self.mutate(command),
        }
    }

    /// Sends the current snapshot of `id` to the sandbox.
    ///
    /// Returns `Ok(false)` if the graph has no such entity.
    pub fn publish(&self, id: ElementId) -> Result<bool, Disconnected> {
        let (Some(kind), Some(snapshot)) = (self.graph.kind_of(id), self.graph.snapshot(id)) else {
            log::warn!("Cannot publish unknown element {id}.");
            return Ok(false);
        };
        self.endpoint.send(HostMessage::Sync {
            kind: kind.as_str().to_owned(),
            snapshot,
        })?;
        Ok(true)
    }

    /// Removes an entity, re-publishes every entity that referenced it, then
    /// tells the sandbox to evict it.
    pub fn remove_element(&mut self, id: ElementId) -> Result<bool, Disconnected> {
        let Some(parents) = self.graph.remove(id) else {
            return Ok(false);
        };
        for parent in parents {
            self.publish(parent)?;
        }
        self.endpoint.send(HostMessage::Evict { id })?;
        Ok(true)
    }

    fn greet(&self, kinds: &[String]) -> Result<(), Disconnected> {
        log::info!("Sandbox connected with {} kinds.", kinds.len());
        if !kinds.iter().any(|kind| kind == ElementKind::Scene.as_str()) {
            log::warn!("Sandbox cannot resolve scenes; nothing is published.");
            return Ok(());
        }
        for scene in self.graph.scenes() {
            self.publish(*scene)?;
        }
        Ok(())
    }

    fn mutate(&mut self, command: MutationCommand) -> Result<(), Disconnected> {
        let outcome = self.graph.apply(&command);
        match &outcome {
            Ok(_) => {
                self.publish(command.id)?;
            }
            Err(reason) => {
                log::warn!(
                    "Rejected {} ('{}' on {}): {reason}",
                    command.command,
                    command.path,
                    command.id
                );
            }
        }
        self.endpoint.send(HostMessage::Ack {
            command: command.command,
            outcome,
        })
    }

    /// Serves the sandbox until `running` is cleared or the sandbox
    /// disconnects.
    pub fn run(&mut self, running: &AtomicBool) {
        log::info!("Host service loop started.");
        while running.load(Ordering::Relaxed) {
            let message = match self.endpoint.recv_timeout(self.config.poll_interval) {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(Disconnected) => {
                    log::error!("Sandbox disconnected; host service stopping.");
                    break;
                }
            };
            if self.handle(message).is_err() {
                log::error!("Sandbox disconnected while answering; host service stopping.");
                break;
            }
        }
        log::info!("Host service loop stopped.");
    }

    /// Moves the service onto its own thread.
    pub fn spawn(mut self) -> HostHandle {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            self.run(&flag);
            self
        });
        HostHandle {
            running,
            handle: Some(handle),
        }
    }
}

/// A [`HostService`] running on its own thread.
///
/// Dropping the handle stops the thread and waits for it.
pub struct HostHandle {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<HostService>>,
}

impl HostHandle {
    /// Whether the service thread is still serving.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self
                .handle
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the thread and hands the service back.
    ///
    /// Returns `None` if the thread panicked.
    pub fn stop(mut self) -> Option<HostService> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<HostService> {
        self.running.store(false, Ordering::SeqCst);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(service) => Some(service),
            Err(_) => {
                log::error!("Host service thread panicked.");
                None
            }
        }
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
