//! Gateway and identifier registry
//!
//! Two views over one set of gateways: `gateways` owns per-gateway state
//! keyed by gateway identifier, and `owner_by_sid` maps every known
//! identifier (devices and the gateways themselves) to the identifier of
//! its owning gateway. The two maps are only mutated together, under the
//! client's lock, so any identifier resolves to exactly one live gateway.

use crate::gateway::Gateway;
use std::collections::HashMap;
use std::net::IpAddr;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    gateways: HashMap<String, Gateway>,
    owner_by_sid: HashMap<String, String>,
}

impl Registry {
    /// Insert a newly announced gateway into both mappings
    ///
    /// The gateway's own identifier also enters `owner_by_sid`, mapping
    /// to itself, so heartbeat lookups are uniform for gateways and
    /// devices. Returns a snapshot for event publication.
    pub(crate) fn insert_gateway(
        &mut self,
        sid: &str,
        addr: IpAddr,
        token: Option<String>,
    ) -> Gateway {
        let gateway = Gateway::new(sid.to_string(), addr, token);
        self.gateways.insert(sid.to_string(), gateway.clone());
        self.owner_by_sid.insert(sid.to_string(), sid.to_string());
        gateway
    }

    /// Overwrite address and token for a re-announcing gateway
    ///
    /// The device roster is untouched.
    pub(crate) fn refresh_gateway(&mut self, sid: &str, addr: IpAddr, token: Option<String>) {
        if let Some(gateway) = self.gateways.get_mut(sid) {
            gateway.addr = addr;
            if token.is_some() {
                gateway.token = token;
            }
        }
    }

    pub(crate) fn contains_gateway(&self, sid: &str) -> bool {
        self.gateways.contains_key(sid)
    }

    pub(crate) fn gateway(&self, sid: &str) -> Option<&Gateway> {
        self.gateways.get(sid)
    }

    pub(crate) fn gateway_mut(&mut self, sid: &str) -> Option<&mut Gateway> {
        self.gateways.get_mut(sid)
    }

    pub(crate) fn gateways(&self) -> impl Iterator<Item = &Gateway> {
        self.gateways.values()
    }

    /// Record that a device identifier belongs to a gateway
    ///
    /// Only called from device-list handling; identifiers are never
    /// claimed speculatively. The first listing wins.
    pub(crate) fn claim_device(&mut self, device_sid: &str, gateway_sid: &str) {
        self.owner_by_sid
            .entry(device_sid.to_string())
            .or_insert_with(|| gateway_sid.to_string());
    }

    /// Resolve any identifier, device or gateway, to its owning gateway
    pub(crate) fn owner_mut(&mut self, sid: &str) -> Option<&mut Gateway> {
        let owner = self.owner_by_sid.get(sid)?;
        self.gateways.get_mut(owner)
    }

    /// The owning gateway's identifier for any known identifier
    pub(crate) fn owner_sid(&self, sid: &str) -> Option<&str> {
        self.owner_by_sid.get(sid).map(String::as_str)
    }
}
