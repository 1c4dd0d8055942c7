//! Pairing and bonding glue for the SoftDevice security manager.
//!
//! [`Bonder`] answers the stack's security callbacks. It advertises
//! display-only IO capabilities so MITM-capable centrals run the
//! passkey procedure (the code is printed to the log for entry on the
//! peer), plain "just works" pairing is accepted, and bond keys are
//! kept in an in-RAM cache - persistent bond storage is someone else's
//! job. Each callback also posts a [`StackEvent`] so the reconciliation
//! loop can track the passkey indicator; callbacks run in the
//! SoftDevice's context and must not block, hence `try_send`.

use core::cell::RefCell;

use crate::config::{EVENT_QUEUE_DEPTH, MAX_BONDED_PEERS};
use crate::logic::events::StackEvent;
use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use heapless::Vec;
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};

type EventSender = Sender<'static, CriticalSectionRawMutex, StackEvent, EVENT_QUEUE_DEPTH>;

struct PeerBond {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

pub struct Bonder {
    events: EventSender,
    peers: RefCell<Vec<PeerBond, MAX_BONDED_PEERS>>,
}

impl Bonder {
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            peers: RefCell::new(Vec::new()),
        }
    }

    fn publish(&self, event: StackEvent) {
        if self.events.try_send(event).is_err() {
            warn!("security: event queue full, dropping {:?}", event);
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        // We can show a passkey but take no input.
        IoCapabilities::DisplayOnly
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        // Bondable, so the central can store keys.
        true
    }

    fn display_passkey(&self, passkey: &[u8; 6]) {
        // The code the user must type on the peer device.
        info!("passkey: {=[u8; 6]:a}", *passkey);
        self.publish(StackEvent::PasskeyDisplay);
    }

    fn on_security_update(&self, _conn: &Connection, security_mode: SecurityMode) {
        info!("security mode updated: {:?}", security_mode);
        let (encrypted, mitm_protected) = match security_mode {
            SecurityMode::NoAccess | SecurityMode::Open => (false, false),
            SecurityMode::JustWorks | SecurityMode::Signed => (true, false),
            _ => (true, true),
        };
        self.publish(StackEvent::SecurityChanged {
            encrypted,
            mitm_protected,
        });
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        info!("pairing complete (bonded)");

        let mut peers = self.peers.borrow_mut();
        if let Some(existing) = peers.iter_mut().find(|p| p.master_id == master_id) {
            existing.key = key;
            existing.peer_id = peer_id;
        } else {
            if peers.is_full() {
                peers.remove(0);
            }
            let _ = peers.push(PeerBond {
                master_id,
                key,
                peer_id,
            });
        }
        drop(peers);

        self.publish(StackEvent::PairingComplete { bonded: true });
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.peers
            .borrow()
            .iter()
            .find_map(|p| (p.master_id == master_id).then_some(p.key))
    }

    fn get_peripheral_key(&self, conn: &Connection) -> Option<(MasterId, EncryptionInfo)> {
        self.peers.borrow().iter().find_map(|p| {
            p.peer_id
                .is_match(conn.peer_address())
                .then_some((p.master_id, p.key))
        })
    }
}
