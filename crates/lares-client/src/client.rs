//! Main Lares client implementation

use lares_core::{
    DeviceStateMessage, HeartbeatMessage, IamMessage, IdListAckMessage, Message, ReadMessage,
};
use lares_transport::{Transport, UdpReceiver};
use parking_lot::Mutex;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::builder::ClientBuilder;
use crate::error::Result;
use crate::event::{ClientEvent, EventHandler, SubscriptionId};
use crate::gateway::Gateway;
use crate::registry::Registry;

/// A Lares client
///
/// One instance per network. Tracks every announced gateway, owns the
/// identifier registry, and dispatches inbound messages to the gateway
/// that owns them. All registry mutation happens under a single lock;
/// the transport delivers one message at a time.
pub struct Client {
    transport: Arc<dyn Transport>,
    gateway_port: u16,
    registry: Mutex<Registry>,
    subscribers: Mutex<Vec<(SubscriptionId, Box<dyn EventHandler>)>>,
    next_sub_id: AtomicU32,
}

impl Client {
    /// Create a client over the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ClientBuilder::new(transport).build()
    }

    /// Create a builder
    pub fn builder(transport: Arc<dyn Transport>) -> ClientBuilder {
        ClientBuilder::new(transport)
    }

    pub(crate) fn from_parts(transport: Arc<dyn Transport>, gateway_port: u16) -> Self {
        Self {
            transport,
            gateway_port,
            registry: Mutex::new(Registry::default()),
            subscribers: Mutex::new(Vec::new()),
            next_sub_id: AtomicU32::new(1),
        }
    }

    // ---- outbound commands ----

    /// Broadcast a `whois`, asking every gateway to announce itself
    ///
    /// Responses arrive asynchronously as `iam` messages; there is no
    /// timeout or correlation beyond the gateway identifier.
    pub async fn discover_gateways(&self) -> Result<()> {
        self.transport.broadcast(&Message::Whois).await?;
        Ok(())
    }

    /// Ask the gateway at `addr` for its device roster
    pub async fn discover_devices(&self, addr: SocketAddr) -> Result<()> {
        self.transport.unicast(addr, &Message::GetIdList).await?;
        Ok(())
    }

    /// Request a state read for one device from the gateway at `addr`
    pub async fn read_device(&self, addr: SocketAddr, sid: &str) -> Result<()> {
        let msg = Message::Read(ReadMessage {
            sid: sid.to_string(),
        });
        self.transport.unicast(addr, &msg).await?;
        Ok(())
    }

    // ---- subscriptions ----

    /// Register an observer for client events
    pub fn subscribe(&self, handler: impl EventHandler + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_sub_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Box::new(handler)));
        id
    }

    /// Remove a previously registered observer
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(sub_id, _)| *sub_id != id);
    }

    fn publish(&self, event: &ClientEvent) -> Result<()> {
        let subscribers = self.subscribers.lock();
        for (_, handler) in subscribers.iter() {
            handler.on_event(event)?;
        }
        Ok(())
    }

    // ---- accessors ----

    /// Snapshot of one gateway
    pub fn gateway(&self, sid: &str) -> Option<Gateway> {
        self.registry.lock().gateway(sid).cloned()
    }

    /// Snapshot of every known gateway
    pub fn gateways(&self) -> Vec<Gateway> {
        self.registry.lock().gateways().cloned().collect()
    }

    /// The owning gateway's identifier for any known identifier
    ///
    /// A gateway's own identifier resolves to itself.
    pub fn owner_of(&self, sid: &str) -> Option<String> {
        self.registry.lock().owner_sid(sid).map(String::from)
    }

    // ---- dispatch ----

    /// Entry point for every inbound message
    ///
    /// Malformed nested payloads and references to unknown identifiers
    /// are dropped without error; only transport failures and subscriber
    /// errors surface to the caller.
    pub async fn handle_message(&self, msg: Message, from: SocketAddr) -> Result<()> {
        match msg {
            Message::Iam(iam) => self.handle_iam(iam, from).await,
            Message::GetIdListAck(ack) => {
                self.handle_id_list_ack(ack);
                Ok(())
            }
            Message::ReadAck(state) | Message::Report(state) => {
                self.handle_report(state);
                Ok(())
            }
            Message::Heartbeat(hb) => {
                self.handle_heartbeat(hb);
                Ok(())
            }
            other => {
                debug!(cmd = other.command(), %from, "dropping unhandled command");
                Ok(())
            }
        }
    }

    /// Drain a transport receiver into the dispatcher
    ///
    /// Runs until the receiver closes. A dispatch error (failed follow-up
    /// send, failing subscriber) ends the loop and surfaces to the caller.
    pub async fn run(&self, mut receiver: UdpReceiver) -> Result<()> {
        while let Some((msg, from)) = receiver.recv_from().await {
            self.handle_message(msg, from).await?;
        }
        Ok(())
    }

    async fn handle_iam(&self, iam: IamMessage, from: SocketAddr) -> Result<()> {
        let addr = match iam.ip.parse::<IpAddr>() {
            Ok(addr) => addr,
            Err(_) => {
                warn!(sid = %iam.sid, ip = %iam.ip, "dropping iam with unparseable address");
                return Ok(());
            }
        };

        let new_gateway = {
            let mut registry = self.registry.lock();
            if registry.contains_gateway(&iam.sid) {
                // Idempotent refresh: address and token are overwritten,
                // the roster stays
                registry.refresh_gateway(&iam.sid, addr, iam.token);
                None
            } else {
                info!(sid = %iam.sid, %addr, %from, "gateway discovered");
                Some(registry.insert_gateway(&iam.sid, addr, iam.token))
            }
        };

        if let Some(gateway) = new_gateway {
            self.publish(&ClientEvent::NewGateway(gateway))?;
        }

        // Follow up immediately with a roster request
        self.discover_devices(SocketAddr::new(addr, self.gateway_port))
            .await
    }

    fn handle_id_list_ack(&self, ack: IdListAckMessage) {
        let device_ids = match ack.device_ids() {
            Ok(ids) => ids,
            Err(e) => {
                warn!(sid = %ack.sid, "dropping malformed device list: {}", e);
                return;
            }
        };

        let mut registry = self.registry.lock();
        if !registry.contains_gateway(&ack.sid) {
            debug!(sid = %ack.sid, "device list from unknown gateway, dropped");
            return;
        }
        for device_sid in &device_ids {
            registry.claim_device(device_sid, &ack.sid);
        }
        if let Some(gateway) = registry.gateway_mut(&ack.sid) {
            gateway.on_devices_discovered(device_ids);
        }
    }

    fn handle_report(&self, state: DeviceStateMessage) {
        let attributes = match state.attributes() {
            Ok(attrs) => attrs,
            Err(e) => {
                warn!(sid = %state.sid, "dropping malformed report: {}", e);
                return;
            }
        };

        let mut registry = self.registry.lock();
        match registry.owner_mut(&state.sid) {
            Some(gateway) => gateway.on_report(&state.model, &state.sid, attributes),
            // Benign race: the report beat the roster reply
            None => debug!(sid = %state.sid, "report for unknown identifier, dropped"),
        }
    }

    fn handle_heartbeat(&self, hb: HeartbeatMessage) {
        let attributes = match hb.attributes() {
            Ok(attrs) => attrs,
            Err(e) => {
                warn!(sid = %hb.sid, "dropping malformed heartbeat: {}", e);
                return;
            }
        };

        let mut registry = self.registry.lock();
        let Some(gateway) = registry.owner_mut(&hb.sid) else {
            debug!(sid = %hb.sid, "heartbeat for unknown identifier, dropped");
            return;
        };

        if hb.is_gateway() {
            if let Some(token) = &hb.token {
                gateway.token = Some(token.clone());
            }
        }
        gateway.on_heartbeat(&hb.model, &hb.sid, attributes, hb.token.as_deref());
    }
}
