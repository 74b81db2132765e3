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


use serde_json::{json, Value};
use std::rc::Rc;
use tessera_core::{AccessorType, ComponentType, ElementId, HostMessage, SandboxMessage, WrapMode};
use tessera_kernel::elements::{
    Accessor, Material, Node, PbrMetallicRoughness, Primitive, Sampler, Texture, TextureInfo,
};
use tessera_kernel::{
    Capabilities, Element, Kernel, KernelConfig, KernelError, Received, SyncOutcome,
};

fn kernel() -> (Kernel, flume::Receiver<SandboxMessage>) {
    let (outbound, host) = flume::unbounded();
    (Kernel::new(Capabilities::standard(), outbound), host)
}

fn texture(id: ElementId) -> Value {
    json!({ "id": id, "sequence": 1, "name": "Albedo", "sampler": null, "source": "albedo.png" })
}

fn sync(kind: &str, snapshot: Value) -> HostMessage {
    HostMessage::Sync {
        kind: kind.to_owned(),
        snapshot,
    }
}

#[test]
fn test_same_identity_yields_same_instance() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let snapshot = json!({ "id": id, "sequence": 1, "name": "Brass" });

    let first = kernel.deserialize_element::<Material>(&snapshot).unwrap();
    let second = kernel.deserialize_element::<Material>(&snapshot).unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(kernel.len(), 1);
    assert!(Rc::ptr_eq(&kernel.get::<Material>(id).unwrap(), &first));
}

#[test]
fn test_newer_snapshot_updates_in_place() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 1, "name": "Brass" }))
        .unwrap();

    let received = kernel
        .receive(sync(
            "material",
            json!({ "id": id, "sequence": 2, "name": "Bronze", "doubleSided": true }),
        ))
        .unwrap();

    assert_eq!(
        received,
        Received::Synced {
            kind: "material",
            id: Some(id),
            outcome: SyncOutcome::Updated
        }
    );
    assert_eq!(material.name().as_deref(), Some("Bronze"));
    assert!(material.double_sided());
    assert_eq!(material.sequence().get(), 2);
}

#[test]
fn test_stale_and_repeated_snapshots_are_ignored() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 5, "name": "Current" }))
        .unwrap();

    let stale = kernel
        .receive(sync("material", json!({ "id": id, "sequence": 3, "name": "Old" })))
        .unwrap();
    let repeated = kernel
        .receive(sync("material", json!({ "id": id, "sequence": 5, "name": "Other" })))
        .unwrap();

    assert!(matches!(
        stale,
        Received::Synced {
            outcome: SyncOutcome::Stale,
            ..
        }
    ));
    assert!(matches!(
        repeated,
        Received::Synced {
            outcome: SyncOutcome::Unchanged,
            ..
        }
    ));
    assert_eq!(material.name().as_deref(), Some("Current"));
    assert_eq!(material.sequence().get(), 5);
}

#[test]
fn test_nested_structures_resolve_eagerly_and_share_identity() {
    let (kernel, _host) = kernel();
    let material_id = ElementId::new();
    let texture_id = ElementId::new();

    let material = kernel
        .deserialize_element::<Material>(&json!({
            "id": material_id,
            "sequence": 1,
            "name": null,
            "pbrMetallicRoughness": {
                "baseColorFactor": [1.0, 0.5, 0.25, 1.0],
                "baseColorTexture": { "texture": texture(texture_id), "texCoord": 0 },
                "metallicFactor": 0.0,
                "roughnessFactor": 0.5,
                "metallicRoughnessTexture": null
            },
            "normalTexture": null,
            "occlusionTexture": { "texture": texture(texture_id), "texCoord": 1, "strength": 0.5 },
            "emissiveTexture": { "texture": texture(texture_id), "texCoord": 0 },
            "emissiveFactor": [1.0, 1.0, 1.0]
        }))
        .unwrap();

    assert!(material.normal_texture().is_none());
    let occlusion = material.occlusion_texture().unwrap();
    let emissive = material.emissive_texture().unwrap();
    assert_eq!(occlusion.tex_coord(), 1);
    assert_eq!(occlusion.strength(), 0.5);
    assert!(Rc::ptr_eq(occlusion.texture(), emissive.texture()));

    let pbr = material.pbr_metallic_roughness().unwrap();
    assert_eq!(pbr.base_color_factor(), [1.0, 0.5, 0.25, 1.0]);
    assert_eq!(pbr.metallic_factor(), 0.0);
    assert!(pbr.metallic_roughness_texture().is_none());
    assert!(Rc::ptr_eq(
        pbr.base_color_texture().unwrap().texture(),
        emissive.texture()
    ));

    // The material and the one texture it references.
    assert_eq!(kernel.len(), 2);
    assert_eq!(kernel.kind_of(texture_id), Some("texture"));
}

#[test]
fn test_value_kinds_are_rebuilt_every_time() {
    let (kernel, _host) = kernel();
    let texture_id = ElementId::new();
    let snapshot = json!({ "texture": texture(texture_id), "texCoord": 2 });

    let first = kernel.deserialize("texture-info", &snapshot).unwrap();
    assert!(!first.is_element());
    assert_eq!(first.id(), None);
    let first = first.into_value::<TextureInfo>().unwrap();
    let second = kernel
        .deserialize("texture-info", &snapshot)
        .unwrap()
        .into_value::<TextureInfo>()
        .unwrap();

    assert_eq!(first.tex_coord(), 2);
    assert!(Rc::ptr_eq(first.texture(), second.texture()));
    assert_eq!(kernel.len(), 1);
}

#[test]
fn test_defaults_apply_to_omitted_fields() {
    let (kernel, _host) = kernel();
    let pbr = kernel
        .deserialize("pbr-metallic-roughness", &json!({}))
        .unwrap()
        .into_value::<PbrMetallicRoughness>()
        .unwrap();

    assert_eq!(pbr.base_color_factor(), [1.0; 4]);
    assert_eq!(pbr.metallic_factor(), 1.0);
    assert_eq!(pbr.roughness_factor(), 1.0);
    assert!(pbr.base_color_texture().is_none());
}

#[test]
fn test_names_are_optional_and_not_unique() {
    let (kernel, _host) = kernel();
    let unnamed = kernel
        .deserialize_element::<Texture>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();
    let a = kernel
        .deserialize_element::<Material>(&json!({ "id": ElementId::new(), "sequence": 1, "name": "Paint" }))
        .unwrap();
    let b = kernel
        .deserialize_element::<Material>(&json!({ "id": ElementId::new(), "sequence": 1, "name": "Paint" }))
        .unwrap();

    assert_eq!(unnamed.name(), None);
    assert_ne!(a.id(), b.id());
    assert!(!Rc::ptr_eq(&a, &b));
    assert_eq!(kernel.elements::<Material>().len(), 2);
}

#[test]
fn test_unknown_kind_registers_nothing() {
    let (kernel, _host) = kernel();
    let result = kernel.deserialize("skin", &json!({ "id": ElementId::new(), "sequence": 1 }));

    assert_eq!(
        result.unwrap_err(),
        KernelError::UnknownKind {
            kind: "skin".to_owned()
        }
    );
    assert!(kernel.is_empty());
}

#[test]
fn test_unregistered_nested_kind_fails_the_parent() {
    let (outbound, _host) = flume::unbounded();
    let mut capabilities = Capabilities::new();
    capabilities.register_element::<Material>();
    let kernel = Kernel::new(capabilities, outbound);

    let result = kernel.deserialize_element::<Material>(&json!({
        "id": ElementId::new(),
        "sequence": 1,
        "emissiveTexture": { "texture": texture(ElementId::new()) }
    }));

    assert!(matches!(result, Err(KernelError::UnknownKind { .. })));
    assert!(kernel.is_empty());
}

#[test]
fn test_malformed_snapshots_register_nothing() {
    let (kernel, _host) = kernel();

    let missing_sequence = kernel.deserialize("material", &json!({ "id": ElementId::new() }));
    let bad_enum = kernel.deserialize(
        "material",
        &json!({ "id": ElementId::new(), "sequence": 1, "alphaMode": "SOMETIMES" }),
    );
    let missing_texture = kernel.deserialize(
        "material",
        &json!({ "id": ElementId::new(), "sequence": 1, "emissiveTexture": { "texCoord": 0 } }),
    );

    for result in [missing_sequence, bad_enum, missing_texture] {
        assert!(matches!(
            result,
            Err(KernelError::MalformedSnapshot { .. })
        ));
    }
    assert!(kernel.is_empty());
}

#[test]
fn test_failed_resync_keeps_previous_state() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": id, "sequence": 1, "name": "Kept" }))
        .unwrap();

    let result = kernel.receive(sync(
        "material",
        json!({ "id": id, "sequence": 2, "name": "Lost", "emissiveTexture": { "texCoord": 0 } }),
    ));

    assert!(result.is_err());
    assert_eq!(material.name().as_deref(), Some("Kept"));
    assert_eq!(material.sequence().get(), 1);
}

#[test]
fn test_identity_reused_under_another_kind_is_rejected() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    kernel.deserialize("texture", &texture(id)).unwrap();

    let result = kernel.deserialize("material", &json!({ "id": id, "sequence": 1 }));

    assert!(matches!(
        result,
        Err(KernelError::KindMismatch { id: Some(found), .. }) if found == id
    ));
    assert_eq!(kernel.kind_of(id), Some("texture"));
}

#[test]
fn test_self_nesting_snapshot_is_cyclic() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let snapshot = json!({
        "id": id,
        "sequence": 1,
        "children": [{ "id": id, "sequence": 1 }]
    });

    let result = kernel.deserialize_element::<Node>(&snapshot);

    assert_eq!(result.unwrap_err(), KernelError::CyclicSnapshot { id });
    assert!(kernel.is_empty());
}

#[test]
fn test_nesting_beyond_configured_depth_is_malformed() {
    let (outbound, _host) = flume::unbounded();
    let kernel = Kernel::with_config(
        KernelConfig { max_depth: 2 },
        Capabilities::standard(),
        outbound,
    );

    let mut chain = json!({ "id": ElementId::new(), "sequence": 1 });
    for _ in 0..3 {
        chain = json!({ "id": ElementId::new(), "sequence": 1, "children": [chain] });
    }

    let result = kernel.deserialize_element::<Node>(&chain);

    assert!(matches!(
        result,
        Err(KernelError::MalformedSnapshot { .. })
    ));
}

#[test]
fn test_hierarchy_links_cached_nodes() {
    let (kernel, _host) = kernel();
    let leaf = ElementId::new();
    let scene = kernel
        .deserialize_element::<tessera_kernel::elements::Scene>(&json!({
            "id": ElementId::new(),
            "sequence": 1,
            "name": "Main",
            "nodes": [
                { "id": ElementId::new(), "sequence": 1, "children": [{ "id": leaf, "sequence": 1, "translation": [1.0, 2.0, 3.0] }] },
                { "id": ElementId::new(), "sequence": 1 }
            ]
        }))
        .unwrap();

    assert_eq!(scene.nodes().len(), 2);
    let descendants = scene.descendants();
    assert_eq!(descendants.len(), 3);
    let cached_leaf = kernel.get::<Node>(leaf).unwrap();
    assert!(Rc::ptr_eq(&descendants[1], &cached_leaf));
    assert_eq!(cached_leaf.translation(), [1.0, 2.0, 3.0]);
    assert_eq!(cached_leaf.rotation(), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(cached_leaf.scale(), [1.0, 1.0, 1.0]);
}

#[test]
fn test_evict_removes_from_cache_only() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let texture = kernel.deserialize_element::<Texture>(&texture(id)).unwrap();

    let first = kernel.receive(HostMessage::Evict { id }).unwrap();
    let second = kernel.receive(HostMessage::Evict { id }).unwrap();

    assert_eq!(first, Received::Evicted { id, known: true });
    assert_eq!(second, Received::Evicted { id, known: false });
    assert!(kernel.get::<Texture>(id).is_none());
    assert_eq!(texture.name().as_deref(), Some("Albedo"));
}

#[test]
fn test_get_with_wrong_type_is_none() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    kernel.deserialize("texture", &texture(id)).unwrap();

    assert!(kernel.get::<Material>(id).is_none());
    assert!(kernel.get::<Texture>(id).is_some());
    assert!(kernel
        .deserialize("texture", &texture(id))
        .unwrap()
        .into_element::<Material>()
        .is_err());
}

#[test]
fn test_dispose_drops_cache_and_fails_later_calls() {
    let (kernel, _host) = kernel();
    let material = kernel
        .deserialize_element::<Material>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();

    kernel.dispose();

    assert!(kernel.is_disposed());
    assert!(kernel.is_empty());
    assert_eq!(
        kernel
            .deserialize("material", &json!({ "id": ElementId::new(), "sequence": 1 }))
            .unwrap_err(),
        KernelError::Disposed
    );
    assert_eq!(
        kernel.receive(HostMessage::Evict { id: material.id() }).unwrap_err(),
        KernelError::Disposed
    );
    let mut pending = material.set_name(Some("Late"));
    assert_eq!(pending.try_result(), Some(Err(KernelError::Disposed)));
}

#[test]
fn test_failed_snapshot_caches_none_of_its_children() {
    let (kernel, _host) = kernel();
    let texture_id = ElementId::new();

    let result = kernel.deserialize_element::<Material>(&json!({
        "id": ElementId::new(),
        "sequence": 1,
        "occlusionTexture": { "texture": texture(texture_id) },
        "emissiveTexture": { "texCoord": 0 }
    }));

    assert!(matches!(
        result,
        Err(KernelError::MalformedSnapshot { .. })
    ));
    assert!(!kernel.contains(texture_id));
    assert!(kernel.is_empty());
}

#[test]
fn test_failed_resync_leaves_nested_elements_untouched() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let texture_id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({
            "id": id,
            "sequence": 1,
            "occlusionTexture": { "texture": texture(texture_id) }
        }))
        .unwrap();
    let cached_texture = kernel.get::<Texture>(texture_id).unwrap();

    let result = kernel.receive(sync(
        "material",
        json!({
            "id": id,
            "sequence": 2,
            "occlusionTexture": {
                "texture": { "id": texture_id, "sequence": 2, "name": "New" }
            },
            "emissiveTexture": { "texCoord": 0 }
        }),
    ));

    assert!(result.is_err());
    assert_eq!(material.sequence().get(), 1);
    assert_eq!(cached_texture.sequence().get(), 1);
    assert_eq!(cached_texture.name().as_deref(), Some("Albedo"));
    assert_eq!(cached_texture.source().as_deref(), Some("albedo.png"));
    let occlusion = material.occlusion_texture().unwrap();
    assert!(Rc::ptr_eq(occlusion.texture(), &cached_texture));
}

#[test]
fn test_successful_resync_updates_nested_elements() {
    let (kernel, _host) = kernel();
    let id = ElementId::new();
    let texture_id = ElementId::new();
    let material = kernel
        .deserialize_element::<Material>(&json!({
            "id": id,
            "sequence": 1,
            "occlusionTexture": { "texture": texture(texture_id) }
        }))
        .unwrap();
    let cached_texture = kernel.get::<Texture>(texture_id).unwrap();

    let received = kernel
        .receive(sync(
            "material",
            json!({
                "id": id,
                "sequence": 2,
                "occlusionTexture": {
                    "texture": { "id": texture_id, "sequence": 2, "name": "New" }
                },
                "emissiveTexture": {
                    "texture": { "id": texture_id, "sequence": 2, "name": "New" }
                }
            }),
        ))
        .unwrap();

    assert_eq!(
        received,
        Received::Synced {
            kind: "material",
            id: Some(id),
            outcome: SyncOutcome::Updated
        }
    );
    assert_eq!(material.sequence().get(), 2);
    assert_eq!(cached_texture.sequence().get(), 2);
    assert_eq!(cached_texture.name().as_deref(), Some("New"));
    let emissive = material.emissive_texture().unwrap();
    assert!(Rc::ptr_eq(emissive.texture(), &cached_texture));
}

#[test]
fn test_accessor_without_count_is_malformed() {
    let (kernel, _host) = kernel();
    let accessor = json!({
        "id": ElementId::new(),
        "sequence": 1,
        "componentType": "FLOAT",
        "type": "VEC3"
    });

    let direct = kernel.deserialize("accessor", &accessor);
    let nested = kernel.deserialize(
        "primitive",
        &json!({
            "id": ElementId::new(),
            "sequence": 1,
            "attributes": { "POSITION": accessor }
        }),
    );

    match direct {
        Err(KernelError::MalformedSnapshot { kind, reason }) => {
            assert_eq!(kind, "accessor");
            assert!(reason.contains("count"), "{reason}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        nested,
        Err(KernelError::MalformedSnapshot { .. })
    ));
    assert!(kernel.is_empty());
}

#[test]
fn test_sampler_defaults() {
    let (kernel, _host) = kernel();
    let sampler = kernel
        .deserialize_element::<Sampler>(&json!({ "id": ElementId::new(), "sequence": 1 }))
        .unwrap();

    assert_eq!(sampler.name(), None);
    assert_eq!(sampler.mag_filter(), None);
    assert_eq!(sampler.min_filter(), None);
    assert_eq!(sampler.wrap_s(), WrapMode::Repeat);
    assert_eq!(sampler.wrap_t(), WrapMode::Repeat);
}

#[test]
fn test_primitive_attributes_share_accessors() {
    let (kernel, _host) = kernel();
    let accessor_id = ElementId::new();
    let accessor = json!({
        "id": accessor_id,
        "sequence": 1,
        "componentType": "FLOAT",
        "type": "VEC3",
        "count": 24
    });

    let primitive = kernel
        .deserialize_element::<Primitive>(&json!({
            "id": ElementId::new(),
            "sequence": 1,
            "attributes": { "POSITION": accessor, "NORMAL": accessor },
            "indices": null
        }))
        .unwrap();

    let position = primitive.attribute("POSITION").unwrap();
    let normal = primitive.attribute("NORMAL").unwrap();
    assert!(Rc::ptr_eq(&position, &normal));
    assert!(Rc::ptr_eq(&position, &kernel.get::<Accessor>(accessor_id).unwrap()));
    assert_eq!(primitive.attributes().len(), 2);
    assert!(primitive.attribute("TEXCOORD_0").is_none());
    assert!(primitive.indices().is_none());
    assert!(primitive.material().is_none());
    assert_eq!(kernel.len(), 2);

    assert_eq!(position.component_type(), ComponentType::Float);
    assert_eq!(position.accessor_type(), AccessorType::Vec3);
    assert_eq!(position.count(), 24);
    assert!(!position.normalized());
    assert_eq!(position.byte_length(), Some(24 * 12));
}

#[test]
fn test_byte_length_overflow_is_none() {
    let (kernel, _host) = kernel();
    let accessor = kernel
        .deserialize_element::<Accessor>(&json!({
            "id": ElementId::new(),
            "sequence": 1,
            "componentType": "FLOAT",
            "type": "MAT4",
            "count": u64::MAX
        }))
        .unwrap();

    assert_eq!(accessor.count(), u64::MAX);
    assert_eq!(accessor.byte_length(), None);
}
