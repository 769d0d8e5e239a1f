//! Wire Format Tests (lares-core)
//!
//! Tests for message shapes and the doubly-encoded `data` field:
//! - Exact outbound command literals
//! - Nested payload parsing (device lists, attribute objects)
//! - Double-encoding preserved through re-serialization
//! - Malformed payload handling

use lares_core::{
    decode, encode, DeviceStateMessage, HeartbeatMessage, IdListAckMessage, Message,
};

#[test]
fn test_device_ids_nested_parse() {
    let ack = IdListAckMessage {
        sid: "123456".to_string(),
        token: None,
        data: r#"["1","2","3"]"#.to_string(),
    };

    assert_eq!(ack.device_ids().unwrap(), vec!["1", "2", "3"]);
}

#[test]
fn test_device_ids_empty_list() {
    let ack = IdListAckMessage {
        sid: "123456".to_string(),
        token: None,
        data: "[]".to_string(),
    };

    assert!(ack.device_ids().unwrap().is_empty());
}

#[test]
fn test_device_ids_malformed() {
    let ack = IdListAckMessage {
        sid: "123456".to_string(),
        token: None,
        data: "not json".to_string(),
    };

    assert!(ack.device_ids().is_err());
}

#[test]
fn test_attributes_nested_parse() {
    let report = DeviceStateMessage {
        sid: "abcdef".to_string(),
        model: "magnet".to_string(),
        data: r#"{"status":"open"}"#.to_string(),
    };

    let attrs = report.attributes().unwrap();
    assert_eq!(attrs.get("status").unwrap(), "open");
}

#[test]
fn test_attributes_rejects_non_object() {
    // The nested document for a report must be an object, not an array
    let report = DeviceStateMessage {
        sid: "abcdef".to_string(),
        model: "magnet".to_string(),
        data: r#"["status","open"]"#.to_string(),
    };

    assert!(report.attributes().is_err());
}

#[test]
fn test_heartbeat_gateway_model() {
    let hb = HeartbeatMessage {
        sid: "123456".to_string(),
        model: "gateway".to_string(),
        token: Some("ffffff".to_string()),
        data: r#"{"ip":"10.10.10.10"}"#.to_string(),
    };

    assert!(hb.is_gateway());

    let hb = HeartbeatMessage {
        model: "magnet".to_string(),
        ..hb
    };
    assert!(!hb.is_gateway());
}

#[test]
fn test_double_encoding_preserved() {
    // The inner document must survive re-serialization as a string field,
    // not get flattened into the outer object
    let wire = br#"{"cmd":"get_id_list_ack","sid":"123456","data":"[\"1\",\"2\"]"}"#;
    let msg = decode(wire).unwrap();

    let reencoded = encode(&msg).unwrap();
    assert_eq!(reencoded, wire);
}

#[test]
fn test_report_roundtrip() {
    let wire = br#"{"cmd":"report","sid":"abcdef","model":"magnet","data":"{\"status\":\"open\"}"}"#;
    let msg = decode(wire).unwrap();

    match &msg {
        Message::Report(report) => {
            assert_eq!(report.sid, "abcdef");
            assert_eq!(report.model, "magnet");
            assert_eq!(
                report.attributes().unwrap().get("status").unwrap(),
                "open"
            );
        }
        other => panic!("expected report, got {}", other.command()),
    }

    assert_eq!(encode(&msg).unwrap(), wire);
}

#[test]
fn test_heartbeat_decode() {
    let wire = br#"{"cmd":"heartbeat","model":"gateway","sid":"123456","token":"ffffff","data":"{\"ip\":\"10.10.10.10\"}"}"#;
    let msg = decode(wire).unwrap();

    match msg {
        Message::Heartbeat(hb) => {
            assert_eq!(hb.sid, "123456");
            assert_eq!(hb.token.as_deref(), Some("ffffff"));
            assert!(hb.is_gateway());
            assert_eq!(
                hb.attributes().unwrap().get("ip").unwrap(),
                "10.10.10.10"
            );
        }
        other => panic!("expected heartbeat, got {}", other.command()),
    }
}

#[test]
fn test_write_ack_decodes() {
    // The write path is unimplemented but its replies must still decode
    let wire =
        br#"{"cmd":"write_ack","sid":"abcdef","model":"plug","data":"{\"status\":\"on\"}"}"#;
    let msg = decode(wire).unwrap();
    assert_eq!(msg.command(), "write_ack");
}

#[test]
fn test_missing_required_field() {
    // A report without a model is malformed at the top level
    assert!(decode(br#"{"cmd":"report","sid":"abcdef","data":"{}"}"#).is_err());
}
