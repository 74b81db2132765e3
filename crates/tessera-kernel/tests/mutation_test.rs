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


use serde_json::json;
use tessera_core::{
    AlphaMode, CommandId, ElementId, HostMessage, MutationCommand, Rejection, SandboxMessage,
    Sequence,
};
use tessera_kernel::elements::{Material, Mesh, Node, Primitive};
use tessera_kernel::{Capabilities, Element, Kernel, KernelError, MutationReceipt, Received};

fn kernel() -> (Kernel, flume::Receiver<SandboxMessage>) {
    let (outbound, host) = flume::unbounded();
    (Kernel::new(Capabilities::standard(), outbound), host)
}

fn next_command(host: &flume::Receiver<SandboxMessage>) -> MutationCommand {
    match host.try_recv() {
        Ok(SandboxMessage::Mutate(command)) => command,
        other => panic!("expected a mutation command, got {other:?}"),
    }
}

#[test]
fn test_setter_queues_command_without_touching_state() {
    let (kernel, host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 3, "name": "Before" }))
        .unwrap();

    let mut pending = material.set_name(Some("After"));

    let command = next_command(&host);
    assert_eq!(command.id, id);
    assert_eq!(command.sequence, Sequence::new(3));
    assert_eq!(command.path, "name");
    assert_eq!(command.value, json!("After"));
    assert_eq!(pending.command(), Some(command.command));
    assert_eq!(pending.try_result(), None);
    assert_eq!(material.name().as_deref(), Some("Before"));
    assert_eq!(kernel.pending_mutations(), 1);
}

#[test]
fn test_accepted_mutation_is_reflected_after_resync() {
    let (kernel, host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 1 }))
        .unwrap();

    let mut pending = material.set_alpha_mode(AlphaMode::Blend);
    let command = next_command(&host);
    assert_eq!(command.path, "alphaMode");
    assert_eq!(command.value, json!("BLEND"));

    // The host re-syncs the element before acknowledging.
    kernel
        .receive(HostMessage::Sync {
            kind: "material".to_owned(),
            snapshot: json!({ "id": id, "sequence": 2, "alphaMode": "BLEND" }),
        })
        .unwrap();
    let received = kernel
        .receive(HostMessage::Ack {
            command: command.command,
            outcome: Ok(Sequence::new(2)),
        })
        .unwrap();

    assert_eq!(
        received,
        Received::Acknowledged {
            command: command.command,
            matched: true
        }
    );
    assert_eq!(
        pending.try_result(),
        Some(Ok(MutationReceipt {
            command: command.command,
            id,
            sequence: Sequence::new(2),
        }))
    );
    assert_eq!(pending.try_result(), None);
    assert_eq!(material.alpha_mode(), AlphaMode::Blend);
    assert_eq!(kernel.pending_mutations(), 0);
}

#[test]
fn test_rejected_mutation_leaves_state_untouched() {
    let (kernel, host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({
            "id": id,
            "sequence": 1,
            "pbrMetallicRoughness": { "metallicFactor": 0.25 }
        }))
        .unwrap();

    let mut pending = material.set_metallic_factor(4.0);
    let command = next_command(&host);
    assert_eq!(command.path, "pbrMetallicRoughness.metallicFactor");
    let reason = Rejection::InvalidValue {
        path: command.path.clone(),
        detail: "must be within [0, 1]".to_owned(),
    };
    kernel
        .receive(HostMessage::Ack {
            command: command.command,
            outcome: Err(reason.clone()),
        })
        .unwrap();

    assert_eq!(
        pending.try_result(),
        Some(Err(KernelError::MutationRejected {
            id,
            path: "pbrMetallicRoughness.metallicFactor".to_owned(),
            reason,
        }))
    );
    assert_eq!(
        material.pbr_metallic_roughness().unwrap().metallic_factor(),
        0.25
    );
}

#[test]
fn test_unknown_acknowledgement_is_ignored() {
    let (kernel, _host) = kernel();
    let received = kernel
        .receive(HostMessage::Ack {
            command: CommandId::new(99),
            outcome: Ok(Sequence::INITIAL),
        })
        .unwrap();

    assert_eq!(
        received,
        Received::Acknowledged {
            command: CommandId::new(99),
            matched: false
        }
    );
}

#[test]
fn test_commands_get_distinct_ids() {
    let (kernel, host) = kernel();
    let node = kernel
        .deserialize_element::<Node>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();

    let first = node.set_translation([1.0, 0.0, 0.0]);
    let second = node.set_scale([2.0, 2.0, 2.0]);

    assert_ne!(first.command(), second.command());
    assert_eq!(next_command(&host).path, "translation");
    assert_eq!(next_command(&host).path, "scale");
}

#[test]
fn test_reference_setters_send_identities() {
    let (kernel, host) = kernel();
    let material_id = ElementId::new();
    let mesh_id = ElementId::new();
    let mesh = kernel
        .deserialize_element::<Mesh>(&json!({
            "id": mesh_id,
            "sequence": 1,
            "primitives": [{
                "id": ElementId::new(),
                "sequence": 1,
                "material": { "id": material_id, "sequence": 1 }
            }]
        }))
        .unwrap();
    let node = kernel
        .deserialize_element::<Node>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();
    let primitive: std::rc::Rc<Primitive> = mesh.primitives()[0].clone();
    let material = primitive.material().unwrap();

    let _cleared = primitive.set_material(None);
    let _assigned = primitive.set_material(Some(&material));
    let _mesh = node.set_mesh(Some(&mesh));

    assert_eq!(next_command(&host).value, json!(null));
    assert_eq!(next_command(&host).value, json!(material_id));
    let command = next_command(&host);
    assert_eq!(command.path, "mesh");
    assert_eq!(command.value, json!(mesh.id()));
}

#[test]
fn test_evicted_element_cannot_mutate() {
    let (kernel, host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 1 }))
        .unwrap();
    kernel.evict(id);

    let mut pending = material.set_double_sided(true);

    assert_eq!(pending.try_result(), Some(Err(KernelError::Detached { id })));
    assert!(host.is_empty());
}

#[test]
fn test_evicted_instance_stays_detached_after_republish() {
    let (kernel, host) = kernel();
    let id = ElementId::new();
    let snapshot = json!({ "id": id, "sequence": 1, "name": "Old" });
    let evicted = kernel.deserialize_element::<Material>(&snapshot).unwrap();
    kernel.evict(id);
    let republished = kernel.deserialize_element::<Material>(&snapshot).unwrap();
    assert!(!std::rc::Rc::ptr_eq(&evicted, &republished));

    let mut stale = evicted.set_name(Some("Ignored"));
    assert_eq!(stale.try_result(), Some(Err(KernelError::Detached { id })));
    assert!(host.is_empty());

    let _live = republished.set_name(Some("New"));
    let command = next_command(&host);
    assert_eq!(command.id, id);
    assert_eq!(command.value, json!("New"));
}

#[test]
fn test_closed_channel_fails_mutation() {
    let (kernel, host) = kernel();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();
    drop(host);

    let mut pending = material.set_name(None);

    assert_eq!(pending.try_result(), Some(Err(KernelError::ChannelClosed)));
    assert_eq!(kernel.pending_mutations(), 0);
}

#[test]
fn test_dropped_kernel_fails_mutation() {
    let (kernel, _host) = kernel();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();
    drop(kernel);

    let mut pending = material.set_name(Some("Orphan"));

    assert_eq!(pending.try_result(), Some(Err(KernelError::Disposed)));
}

#[tokio::test]
async fn test_dispose_fails_pending_mutations() {
    let (kernel, _host) = kernel();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();
    let pending = material.set_double_sided(true);

    kernel.dispose();

    assert_eq!(pending.await, Err(KernelError::Disposed));
}

#[tokio::test]
async fn test_pending_mutation_resolves_when_awaited() {
    let (kernel, host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 1 }))
        .unwrap();
    let pending = material.set_emissive_factor([1.0, 0.0, 0.0]);
    let command = next_command(&host);

    kernel
        .receive(HostMessage::Ack {
            command: command.command,
            outcome: Ok(Sequence::new(2)),
        })
        .unwrap();

    let receipt = pending.await.unwrap();
    assert_eq!(receipt.id, id);
    assert_eq!(receipt.sequence, Sequence::new(2));
}
