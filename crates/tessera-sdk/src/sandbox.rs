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


use std::time::{Duration, Instant};
use tessera_core::{channel, HostMessage, SandboxEndpoint, SandboxMessage};
use tessera_host::{HostHandle, HostService, SceneGraph};
use tessera_kernel::{
    Capabilities, Kernel, KernelError, MutationReceipt, PendingMutation, Received, SyncOutcome,
};

use crate::config::SandboxConfig;

/// What one pump did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Messages that changed the kernel: new or updated elements, evictions
    /// and acknowledgements.
    pub applied: usize,
    /// Snapshots that were already applied or superseded.
    pub stale: usize,
    /// Messages the kernel could not apply.
    pub failed: usize,
}

impl PumpReport {
    /// Total messages taken off the link.
    pub fn total(&self) -> usize {
        self.applied + self.stale + self.failed
    }

    /// Returns `true` if no message was waiting.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn record(&mut self, outcome: Result<Received, KernelError>) {
        match outcome {
            Ok(Received::Synced {
                outcome: SyncOutcome::Stale | SyncOutcome::Unchanged,
                ..
            }) => self.stale += 1,
            Ok(_) => self.applied += 1,
            Err(e) => {
                log::warn!("Failed to apply host message: {e}");
                self.failed += 1;
            }
        }
    }
}

/// A kernel connected to a host.
///
/// The sandbox is single-threaded: nothing happens to its elements between
/// pumps.
pub struct Sandbox {
    config: SandboxConfig,
    kernel: Kernel,
    endpoint: SandboxEndpoint,
}

impl Sandbox {
    /// Builds a kernel over `endpoint` and announces its capabilities to the
    /// host.
    pub fn connect(
        endpoint: SandboxEndpoint,
        capabilities: Capabilities,
        config: SandboxConfig,
    ) -> Result<Self, KernelError> {
        let kinds = capabilities
            .kinds()
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let kernel = Kernel::with_config(config.kernel.clone(), capabilities, endpoint.sender());
        endpoint
            .send(SandboxMessage::Hello { kinds })
            .map_err(|_| KernelError::ChannelClosed)?;
        log::info!("Sandbox connected.");
        Ok(Self {
            config,
            kernel,
            endpoint,
        })
    }

    /// The sandbox's kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Applies the messages already queued, up to the configured limit.
    ///
    /// Fails with [`KernelError::ChannelClosed`] once the host is gone and
    /// nothing is left to apply.
    pub fn pump(&mut self) -> Result<PumpReport, KernelError> {
        let mut report = PumpReport::default();
        while report.total() < self.config.max_messages_per_pump {
            match self.endpoint.try_recv() {
                Ok(Some(message)) => self.apply(message, &mut report),
                Ok(None) => break,
                Err(_) if report.is_empty() => return Err(KernelError::ChannelClosed),
                Err(_) => break,
            }
        }
        if !report.is_empty() {
            log::trace!("Pumped {report:?}.");
        }
        Ok(report)
    }

    /// Waits up to `timeout` for a first message, then pumps.
    pub fn pump_until(&mut self, timeout: Duration) -> Result<PumpReport, KernelError> {
        let mut report = PumpReport::default();
        match self.endpoint.recv_timeout(timeout) {
            Ok(Some(message)) => self.apply(message, &mut report),
            Ok(None) => return Ok(report),
            Err(_) => return Err(KernelError::ChannelClosed),
        }
        let rest = self.pump().unwrap_or_default();
        report.applied += rest.applied;
        report.stale += rest.stale;
        report.failed += rest.failed;
        Ok(report)
    }

    /// Pumps with the configured timeout.
    pub fn wait(&mut self) -> Result<PumpReport, KernelError> {
        self.pump_until(self.config.pump_timeout)
    }

    /// Pumps until `pending` resolves or `timeout` elapses.
    ///
    /// Returns `None` on timeout; the mutation stays pending.
    pub fn resolve(
        &mut self,
        pending: &mut PendingMutation,
        timeout: Duration,
    ) -> Option<Result<MutationReceipt, KernelError>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(outcome) = pending.try_result() {
                return Some(outcome);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            if let Err(e) = self.pump_until(remaining.min(self.config.pump_timeout)) {
                return Some(pending.try_result().unwrap_or(Err(e)));
            }
        }
    }

    fn apply(&mut self, message: HostMessage, report: &mut PumpReport) {
        report.record(self.kernel.receive(message));
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        self.kernel.dispose();
    }
}

/// Connects a sandbox with the standard capabilities to a host service
/// serving `graph`, on the current thread.
///
/// Neither side runs until driven: call
/// [`HostService::process_pending`] and [`Sandbox::pump`] in turn.
pub fn in_process(graph: SceneGraph) -> Result<(Sandbox, HostService), KernelError> {
    let (sandbox, host) = channel();
    let service = HostService::new(graph, host);
    let sandbox = Sandbox::connect(sandbox, Capabilities::standard(), SandboxConfig::default())?;
    Ok((sandbox, service))
}

/// Connects a sandbox with the standard capabilities to a host service
/// serving `graph` on its own thread.
pub fn spawn_host(
    graph: SceneGraph,
    config: SandboxConfig,
) -> Result<(Sandbox, HostHandle), KernelError> {
    let (sandbox, host) = channel();
    let handle = HostService::new(graph, host).spawn();
    let sandbox = Sandbox::connect(sandbox, Capabilities::standard(), config)?;
    Ok((sandbox, handle))
}
