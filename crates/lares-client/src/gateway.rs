//! Per-gateway device roster and last-known state

use lares_core::Attributes;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::debug;

/// A device owned by a gateway
#[derive(Debug, Clone)]
pub struct Device {
    /// Unique identifier (client-wide)
    pub sid: String,
    /// Model tag, known after the first report or heartbeat
    pub model: Option<String>,
    /// Last-known attributes, merged across reports
    pub attributes: Attributes,
    last_seen: Instant,
}

impl Device {
    fn new(sid: String) -> Self {
        Self {
            sid,
            model: None,
            attributes: Attributes::new(),
            last_seen: Instant::now(),
        }
    }

    /// When the device last reported or sent a heartbeat
    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    /// Check if the device has been silent for longer than `timeout`
    pub fn is_stale(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }

    fn merge(&mut self, model: &str, attributes: Attributes) {
        self.model = Some(model.to_string());
        self.last_seen = Instant::now();
        for (key, value) in attributes {
            self.attributes.insert(key, value);
        }
    }
}

/// A discovered gateway and everything it owns
///
/// Entries are never removed within a session; [`Gateway::last_seen`] and
/// [`Device::is_stale`] let callers layer their own expiry on top.
#[derive(Debug, Clone)]
pub struct Gateway {
    /// Unique gateway identifier
    pub sid: String,
    /// Address announced by the gateway
    pub addr: IpAddr,
    /// Rotating liveness token from the last announcement or heartbeat
    pub token: Option<String>,
    devices: HashMap<String, Device>,
    last_seen: Instant,
}

impl Gateway {
    pub(crate) fn new(sid: String, addr: IpAddr, token: Option<String>) -> Self {
        Self {
            sid,
            addr,
            token,
            devices: HashMap::new(),
            last_seen: Instant::now(),
        }
    }

    /// Merge newly listed identifiers into the device roster
    ///
    /// Re-listing a known identifier is a no-op; existing device state is
    /// never cleared.
    pub(crate) fn on_devices_discovered(&mut self, device_ids: Vec<String>) {
        self.last_seen = Instant::now();
        for sid in device_ids {
            if !self.devices.contains_key(&sid) {
                debug!(gateway = %self.sid, device = %sid, "device listed");
                self.devices.insert(sid.clone(), Device::new(sid));
            }
        }
    }

    /// Merge a read acknowledgment or state report into device state
    ///
    /// Attributes merge field by field; keys absent from this report keep
    /// their previous values.
    pub(crate) fn on_report(&mut self, model: &str, sid: &str, attributes: Attributes) {
        self.last_seen = Instant::now();
        self.devices
            .entry(sid.to_string())
            .or_insert_with(|| Device::new(sid.to_string()))
            .merge(model, attributes);
    }

    /// Record a heartbeat from the gateway itself or one of its devices
    ///
    /// On a self-heartbeat the token is authoritative and has already
    /// been rotated by the dispatcher.
    pub(crate) fn on_heartbeat(
        &mut self,
        model: &str,
        sid: &str,
        attributes: Attributes,
        token: Option<&str>,
    ) {
        self.last_seen = Instant::now();
        if sid == self.sid {
            debug!(gateway = %self.sid, ?token, "gateway heartbeat");
            return;
        }
        self.on_report(model, sid, attributes);
    }

    /// Look up one device by identifier
    pub fn device(&self, sid: &str) -> Option<&Device> {
        self.devices.get(sid)
    }

    /// Every device the gateway has listed
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Number of devices in the roster
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// When the gateway was last heard from
    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    /// Check if the gateway has been silent for longer than `timeout`
    pub fn is_stale(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    fn gateway() -> Gateway {
        Gateway::new("123456".to_string(), "10.10.10.10".parse().unwrap(), None)
    }

    #[test]
    fn test_roster_merge_is_idempotent() {
        let mut gw = gateway();

        gw.on_devices_discovered(vec!["1".to_string(), "2".to_string()]);
        gw.on_report("magnet", "1", attrs(&[("status", "open")]));

        // Re-listing must not clear the state gathered so far
        gw.on_devices_discovered(vec!["1".to_string(), "2".to_string(), "3".to_string()]);

        assert_eq!(gw.device_count(), 3);
        assert_eq!(
            gw.device("1").unwrap().attributes.get("status").unwrap(),
            "open"
        );
    }

    #[test]
    fn test_report_merges_fields() {
        let mut gw = gateway();
        gw.on_devices_discovered(vec!["1".to_string()]);

        gw.on_report("sensor_ht", "1", attrs(&[("temperature", "2153")]));
        gw.on_report("sensor_ht", "1", attrs(&[("humidity", "4012")]));

        let device = gw.device("1").unwrap();
        assert_eq!(device.model.as_deref(), Some("sensor_ht"));
        assert_eq!(device.attributes.get("temperature").unwrap(), "2153");
        assert_eq!(device.attributes.get("humidity").unwrap(), "4012");
    }

    #[test]
    fn test_report_overwrites_changed_field() {
        let mut gw = gateway();

        gw.on_report("magnet", "1", attrs(&[("status", "open")]));
        gw.on_report("magnet", "1", attrs(&[("status", "close")]));

        assert_eq!(
            gw.device("1").unwrap().attributes.get("status").unwrap(),
            "close"
        );
    }

    #[test]
    fn test_self_heartbeat_touches_without_device_entry() {
        let mut gw = gateway();

        gw.on_heartbeat(
            "gateway",
            "123456",
            attrs(&[("ip", "10.10.10.10")]),
            Some("ffffff"),
        );

        // The gateway does not appear in its own roster
        assert_eq!(gw.device_count(), 0);
    }

    #[test]
    fn test_device_heartbeat_updates_state() {
        let mut gw = gateway();
        gw.on_devices_discovered(vec!["1".to_string()]);

        gw.on_heartbeat("motion", "1", attrs(&[("status", "motion")]), None);

        let device = gw.device("1").unwrap();
        assert_eq!(device.model.as_deref(), Some("motion"));
        assert_eq!(device.attributes.get("status").unwrap(), "motion");
    }
}
