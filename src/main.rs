//! btn2ble firmware entry point (nRF52840-DK).
//!
//! Boot order matters: Embassy is initialised first with
//! SoftDevice-compatible interrupt priorities, then the SoftDevice is
//! enabled and its task spawned, then the GATT registration and the
//! security handler, then GPIO. The main task itself runs the
//! reconciliation loop: every tick it drains queued stack events, drains
//! the button latches, dispatches the resulting radio commands and
//! projects the device state onto the LEDs. Stack callbacks never touch
//! the state directly - this loop is its only mutator.

#![no_std]
#![no_main]

use btn2ble::ble::security::Bonder;
use btn2ble::ble::worker::{self, Server};
use btn2ble::config;
use btn2ble::logic::edges::{Edge, PendingEdges};
use btn2ble::logic::events::{RadioCommand, StackEvent};
use btn2ble::logic::indicators::Indicators;
use btn2ble::logic::state::{
    apply_edges, DeviceState, EventReaction, StartOutcome, StopOutcome, ToggleOutcome,
};
use btn2ble::ui::buttons;
use btn2ble::ui::leds::LedPanel;
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive, Pin as _};
use embassy_nrf::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

/// Button press latches, written by the button tasks.
static EDGES: PendingEdges = PendingEdges::new();

/// Radio subsystem -> reconciliation loop.
static STACK_EVENTS: Channel<CriticalSectionRawMutex, StackEvent, { config::EVENT_QUEUE_DEPTH }> =
    Channel::new();

/// Reconciliation loop -> radio task.
static RADIO_COMMANDS: Channel<
    CriticalSectionRawMutex,
    RadioCommand,
    { config::COMMAND_QUEUE_DEPTH },
> = Channel::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn radio_task(sd: &'static Softdevice, server: &'static Server, bonder: &'static Bonder) -> ! {
    worker::run(
        sd,
        server,
        bonder,
        RADIO_COMMANDS.receiver(),
        STACK_EVENTS.sender(),
    )
    .await
}

#[embassy_executor::task(pool_size = 3)]
async fn button_task(pin: AnyPin, edge: Edge) -> ! {
    buttons::watch(pin, edge, &EDGES).await
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        // one peripheral link, nothing else
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::DEVICE_NAME.as_ptr() as _,
            current_len: config::DEVICE_NAME.len() as u16,
            max_len: config::DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("booting");
    info!("=== SW1=start adv, SW2=stop/disconnect, SW3=toggle address mode ===");
    info!("=== pairing: enter the passkey printed here when the peer asks ===");

    let mut hw_config = embassy_nrf::config::Config::default();
    hw_config.gpiote_interrupt_priority = Priority::P2;
    hw_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(hw_config);

    let sd = Softdevice::enable(&softdevice_config());

    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));

    static BONDER: StaticCell<Bonder> = StaticCell::new();
    let bonder = BONDER.init(Bonder::new(STACK_EVENTS.sender()));

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(radio_task(sd, server, bonder)));

    let mut panel = LedPanel::new(
        Output::new(p.P0_13.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_15.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_16.degrade(), Level::High, OutputDrive::Standard),
    );
    panel.all_off();

    unwrap!(spawner.spawn(button_task(p.P0_11.degrade(), Edge::Start)));
    unwrap!(spawner.spawn(button_task(p.P0_12.degrade(), Edge::Stop)));
    unwrap!(spawner.spawn(button_task(p.P0_24.degrade(), Edge::Toggle)));

    info!("ready, device name={}", config::DEVICE_NAME);

    let mut state = DeviceState::new();
    let commands = RADIO_COMMANDS.sender();
    let events = STACK_EVENTS.receiver();

    loop {
        // Stack events first: they describe what the radio already did.
        while let Ok(event) = events.try_receive() {
            info!("stack event: {:?}", event);
            match state.on_stack_event(&event) {
                EventReaction::ResumeAdvertising(mode) => {
                    info!("resuming advertising (user requested)");
                    commands.send(RadioCommand::Advertise(mode)).await;
                }
                EventReaction::None => {}
            }
        }

        // Then user intent.
        let outcomes = apply_edges(&mut state, EDGES.drain());

        if let Some(outcome) = outcomes.start {
            info!("SW1 pressed -> start advertising");
            match outcome {
                StartOutcome::Started(mode) => {
                    commands.send(RadioCommand::Advertise(mode)).await;
                }
                StartOutcome::AlreadyConnected => {
                    info!("already connected; not starting advertising");
                }
                StartOutcome::AlreadyAdvertising => {
                    info!("already advertising; not restarting");
                }
            }
        }

        if let Some(outcome) = outcomes.stop {
            info!("SW2 pressed -> stop/disconnect");
            match outcome {
                StopOutcome::DisconnectRequested => {
                    commands.send(RadioCommand::Disconnect).await;
                }
                StopOutcome::AdvertisingStopped => {
                    commands.send(RadioCommand::StopAdvertising).await;
                }
            }
        }

        if let Some(outcome) = outcomes.toggle {
            match outcome {
                ToggleOutcome::Restarted(mode) => {
                    info!("SW3 pressed -> mode={:?}, restarting advertising", mode);
                    commands.send(RadioCommand::StopAdvertising).await;
                    commands.send(RadioCommand::Advertise(mode)).await;
                }
                ToggleOutcome::ModeLatched(mode) => {
                    info!("SW3 pressed -> mode={:?}", mode);
                }
            }
        }

        panel.apply(Indicators::project(&state));

        Timer::after(Duration::from_millis(config::TICK_INTERVAL_MS)).await;
    }
}
