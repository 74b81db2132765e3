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


//! Messages exchanged between the host and the sandbox.
//!
//! Every message is a discrete, independently delivered unit. The encoding is
//! left to the transport; in-process channels move these values directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::identity::{CommandId, ElementId, Sequence};

/// A request from the sandbox to change one field of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationCommand {
    /// Correlates the command with its [`HostMessage::Ack`].
    pub command: CommandId,
    /// The element to change.
    pub id: ElementId,
    /// The element's sequence as the sandbox saw it when issuing the command.
    pub sequence: Sequence,
    /// Dotted field path, e.g. `pbrMetallicRoughness.metallicFactor`.
    pub path: String,
    /// The requested new value.
    pub value: Value,
}

/// Why the host refused a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum Rejection {
    /// The field exists but the sandbox is not allowed to change it.
    PermissionDenied {
        /// The refused field path.
        path: String,
    },
    /// The value has the wrong type or is out of range.
    InvalidValue {
        /// The refused field path.
        path: String,
        /// What was wrong with it.
        detail: String,
    },
    /// No element with the command's identity exists on the host.
    UnknownElement {
        /// The missing identity.
        id: ElementId,
    },
    /// The element kind has no such field.
    UnknownField {
        /// The unrecognized field path.
        path: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::PermissionDenied { path } => {
                write!(f, "permission denied for field '{path}'")
            }
            Rejection::InvalidValue { path, detail } => {
                write!(f, "invalid value for field '{path}': {detail}")
            }
            Rejection::UnknownElement { id } => write!(f, "no element with id {id}"),
            Rejection::UnknownField { path } => write!(f, "unknown field '{path}'"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Messages flowing from the host into the sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// The current state of one element.
    Sync {
        /// Kind discriminator of `snapshot`.
        kind: String,
        /// The serialized snapshot.
        snapshot: Value,
    },
    /// The element no longer exists in the authoritative graph.
    Evict {
        /// The removed identity.
        id: ElementId,
    },
    /// The outcome of a [`MutationCommand`].
    ///
    /// On success the host has already sent the `Sync` carrying the returned
    /// sequence.
    Ack {
        /// The command being answered.
        command: CommandId,
        /// The element's new sequence, or why the command was refused.
        outcome: Result<Sequence, Rejection>,
    },
}

/// Messages flowing from the sandbox to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SandboxMessage {
    /// Capability handshake: the kinds the sandbox can deserialize.
    Hello {
        /// Kind discriminators registered in the sandbox.
        kinds: Vec<String>,
    },
    /// A mutation request.
    Mutate(MutationCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_carries_rejection_across_the_wire() {
        let message = HostMessage::Ack {
            command: CommandId::new(7),
            outcome: Err(Rejection::PermissionDenied {
                path: "count".to_string(),
            }),
        };
        let encoded = serde_json::to_string(&message).unwrap();
        let decoded: HostMessage = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_mutate_message_shape() {
        let id = ElementId::new();
        let message = SandboxMessage::Mutate(MutationCommand {
            command: CommandId::new(1),
            id,
            sequence: Sequence::INITIAL,
            path: "name".to_string(),
            value: json!("Brass"),
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], json!("mutate"));
        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["path"], json!("name"));
    }

    #[test]
    fn test_rejection_messages() {
        let rejection = Rejection::InvalidValue {
            path: "pbrMetallicRoughness.metallicFactor".to_string(),
            detail: "expected a value in [0, 1], got 2".to_string(),
        };
        assert_eq!(
            rejection.to_string(),
            "invalid value for field 'pbrMetallicRoughness.metallicFactor': expected a value in [0, 1], got 2"
        );
    }
}
