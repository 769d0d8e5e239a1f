//! Protocol message definitions
//!
//! Every datagram is a JSON object tagged by its `cmd` field. Where a
//! message carries a `data` field, that field is doubly encoded: a string
//! whose contents are a second JSON document. It stays a string here so
//! re-serialization is byte-compatible with the wire; the helper methods
//! perform the inner parse.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::GATEWAY_MODEL;

/// Last-known device attributes, as decoded from a nested `data` object
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Protocol message enum, one variant per `cmd` value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Message {
    /// Broadcast asking every gateway to announce itself
    #[serde(rename = "whois")]
    Whois,

    /// Gateway announcement, solicited or not
    #[serde(rename = "iam")]
    Iam(IamMessage),

    /// Unicast asking a gateway for its device roster
    #[serde(rename = "get_id_list")]
    GetIdList,

    /// Device roster reply
    #[serde(rename = "get_id_list_ack")]
    GetIdListAck(IdListAckMessage),

    /// Unicast asking a gateway to read one device
    #[serde(rename = "read")]
    Read(ReadMessage),

    /// Reply to a read
    #[serde(rename = "read_ack")]
    ReadAck(DeviceStateMessage),

    /// Unsolicited state report from a device
    #[serde(rename = "report")]
    Report(DeviceStateMessage),

    /// Periodic liveness message; rotates the gateway token
    #[serde(rename = "heartbeat")]
    Heartbeat(HeartbeatMessage),

    /// Device command. Decoded for wire compatibility only; the write
    /// path (and its key derivation) is not implemented.
    #[serde(rename = "write")]
    Write(WriteMessage),

    /// Reply to a write, same wire shape as a read ack
    #[serde(rename = "write_ack")]
    WriteAck(DeviceStateMessage),
}

impl Message {
    /// The `cmd` tag of this message
    pub fn command(&self) -> &'static str {
        match self {
            Message::Whois => "whois",
            Message::Iam(_) => "iam",
            Message::GetIdList => "get_id_list",
            Message::GetIdListAck(_) => "get_id_list_ack",
            Message::Read(_) => "read",
            Message::ReadAck(_) => "read_ack",
            Message::Report(_) => "report",
            Message::Heartbeat(_) => "heartbeat",
            Message::Write(_) => "write",
            Message::WriteAck(_) => "write_ack",
        }
    }
}

/// `iam`: a gateway identifying itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IamMessage {
    /// Gateway identifier
    pub sid: String,
    /// Address the gateway answers commands on
    pub ip: String,
    /// Initial liveness token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// `read`: request the current state of one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadMessage {
    /// Device identifier
    pub sid: String,
}

/// `get_id_list_ack`: the device roster of the answering gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdListAckMessage {
    /// Identifier of the answering gateway
    pub sid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Doubly-encoded JSON array of device identifiers
    pub data: String,
}

impl IdListAckMessage {
    /// Parse the nested device identifier list
    pub fn device_ids(&self) -> Result<Vec<String>> {
        serde_json::from_str(&self.data).map_err(|e| Error::NestedPayload(e.to_string()))
    }
}

/// `read_ack` / `report` / `write_ack`: device state carried as a
/// doubly-encoded attribute object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStateMessage {
    /// Device identifier
    pub sid: String,
    /// Device model tag
    pub model: String,
    /// Doubly-encoded JSON object of attributes
    pub data: String,
}

impl DeviceStateMessage {
    /// Parse the nested attribute object
    pub fn attributes(&self) -> Result<Attributes> {
        serde_json::from_str(&self.data).map_err(|e| Error::NestedPayload(e.to_string()))
    }
}

/// `heartbeat`: liveness from a gateway or one of its devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatMessage {
    /// Gateway or device identifier
    pub sid: String,
    /// Model tag of the sender
    pub model: String,
    /// Rotated liveness token (gateway heartbeats)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Doubly-encoded JSON object of attributes
    pub data: String,
}

impl HeartbeatMessage {
    /// Parse the nested attribute object
    pub fn attributes(&self) -> Result<Attributes> {
        serde_json::from_str(&self.data).map_err(|e| Error::NestedPayload(e.to_string()))
    }

    /// Whether the sender is a gateway rather than one of its devices
    pub fn is_gateway(&self) -> bool {
        self.model == GATEWAY_MODEL
    }
}

/// `write`: set device state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteMessage {
    /// Device identifier
    pub sid: String,
    /// Doubly-encoded JSON object of attributes to write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
