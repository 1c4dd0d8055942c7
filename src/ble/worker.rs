//! Radio task - sole owner of the SoftDevice peripheral role.
//!
//! Consumes [`RadioCommand`]s from the reconciliation loop and publishes
//! [`StackEvent`]s back. Advertising is a future here, not a flag: while
//! it is being polled the radio broadcasts, and dropping it stops the
//! broadcast. A command arriving mid-advertise therefore cancels the
//! running session; a queued `Advertise` restarts it with the new
//! parameters, which preserves the brief radio-silent window of a
//! stop-then-start mode switch.

use core::pin::pin;

use crate::ble::adv_payload;
use crate::ble::security::Bonder;
use crate::config;
use crate::error::{classify_advertise_error, AdvStartFailure};
use crate::logic::events::{Peer, RadioCommand, StackEvent};
use crate::logic::state::AddressMode;
use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use nrf_softdevice::ble::peripheral::{self, ConnectableAdvertisement};
use nrf_softdevice::ble::{gatt_server, Connection};
use nrf_softdevice::{raw, RawError, Softdevice};

pub type CommandReceiver =
    Receiver<'static, CriticalSectionRawMutex, RadioCommand, { config::COMMAND_QUEUE_DEPTH }>;
pub type EventSender =
    Sender<'static, CriticalSectionRawMutex, StackEvent, { config::EVENT_QUEUE_DEPTH }>;

/// Empty GATT server. The demo advertises a service identifier but
/// hosts no characteristics; the registration exists so the SoftDevice
/// pumps connection events through [`gatt_server::run`].
#[nrf_softdevice::gatt_server]
pub struct Server {}

/// Select the address source for subsequent advertising sessions:
/// rotating resolvable private address, or the fixed identity address
/// with privacy off.
fn apply_address_mode(mode: AddressMode) -> Result<(), RawError> {
    let params = raw::ble_gap_privacy_params_t {
        privacy_mode: match mode {
            AddressMode::RotatingPrivate => raw::BLE_GAP_PRIVACY_MODE_DEVICE_PRIVACY as u8,
            AddressMode::StableIdentity => raw::BLE_GAP_PRIVACY_MODE_OFF as u8,
        },
        private_addr_type: raw::BLE_GAP_ADDR_TYPE_RANDOM_PRIVATE_RESOLVABLE as u8,
        private_addr_cycle_s: config::RPA_ROTATE_INTERVAL_SECS,
        p_device_irk: core::ptr::null_mut(),
    };
    RawError::convert(unsafe { raw::sd_ble_gap_privacy_set(&params) })
}

fn adv_config() -> peripheral::Config {
    peripheral::Config {
        interval: config::ADV_INTERVAL_UNITS,
        ..Default::default()
    }
}

/// Run the radio task forever.
pub async fn run(
    sd: &'static Softdevice,
    server: &'static Server,
    bonder: &'static Bonder,
    commands: CommandReceiver,
    events: EventSender,
) -> ! {
    let mut adv_data = [0u8; adv_payload::MAX_ADV_LEN];
    let adv_len = adv_payload::build_adv_data(&config::SERVICE_UUID, &mut adv_data);
    let mut scan_data = [0u8; adv_payload::MAX_ADV_LEN];
    let scan_len = adv_payload::build_scan_data(config::DEVICE_NAME, &mut scan_data);

    let mut pending: Option<RadioCommand> = None;

    loop {
        let command = match pending.take() {
            Some(command) => command,
            None => commands.receive().await,
        };

        let mode = match command {
            RadioCommand::Advertise(mode) => mode,
            // nothing is running; stale stop/disconnect requests are no-ops
            RadioCommand::StopAdvertising | RadioCommand::Disconnect => continue,
        };

        if let Err(err) = apply_address_mode(mode) {
            warn!("privacy setup failed: {:?}", err);
        }

        info!("starting advertising ({:?}), name={}", mode, config::DEVICE_NAME);

        let adv = ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data[..adv_len],
            scan_data: &scan_data[..scan_len],
        };

        match select(
            peripheral::advertise_pairable(sd, adv, &adv_config(), bonder),
            commands.receive(),
        )
        .await
        {
            Either::First(Ok(conn)) => {
                info!("connected: {:?}", conn.peer_address());
                let peer = Peer {
                    addr: conn.peer_address().bytes(),
                };
                events.send(StackEvent::Connected(peer)).await;
                serve_connection(&conn, server, &commands, &events).await;
            }
            Either::First(Err(err)) => match classify_advertise_error(err) {
                AdvStartFailure::AlreadyActive => {
                    info!("advertising already running");
                }
                AdvStartFailure::Fatal(err) => {
                    warn!("advertising start failed: {:?}", err);
                    events.send(StackEvent::AdvertiseFailed).await;
                }
            },
            Either::Second(next) => match next {
                RadioCommand::StopAdvertising => info!("advertising stopped"),
                RadioCommand::Advertise(next_mode) => {
                    // the running session was just dropped; go again with
                    // the new parameters
                    pending = Some(RadioCommand::Advertise(next_mode));
                }
                RadioCommand::Disconnect => warn!("disconnect requested without a link"),
            },
        }
    }
}

/// Pump the live link until it drops.
///
/// A `Disconnect` command issues the teardown request (remote user
/// terminated) but the link is only considered gone when the event pump
/// returns - mirroring that the connection slot upstream is cleared by
/// the disconnect event, never by the request.
async fn serve_connection(
    conn: &Connection,
    server: &Server,
    commands: &CommandReceiver,
    events: &EventSender,
) {
    let mut pump = pin!(gatt_server::run(conn, server, |_| {}));

    loop {
        match select(&mut pump, commands.receive()).await {
            Either::First(_err) => {
                info!("disconnected: {:?}", conn.peer_address());
                events.send(StackEvent::Disconnected { reason: None }).await;
                return;
            }
            Either::Second(RadioCommand::Disconnect) => {
                info!("requesting disconnect from {:?}", conn.peer_address());
                let _ = conn.disconnect();
            }
            Either::Second(other) => {
                warn!("radio: ignoring {:?} while connected", other);
            }
        }
    }
}
