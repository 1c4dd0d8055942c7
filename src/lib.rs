//! Host-testable library interface for btn2ble.
//!
//! The reconciliation core (`logic`) and the advertising payload
//! builders (`ble::adv_payload`) are plain `core` Rust and are tested
//! on the host - no embedded hardware required.
//!
//! Usage: `cargo test`
//!
//! Note: The firmware binary in main.rs (#![no_std], #![no_main]) is
//! built with `--features embedded` and consumes the same modules, plus
//! the feature-gated SoftDevice/Embassy glue.

#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod logic;

#[cfg(feature = "embedded")]
pub mod error;
#[cfg(feature = "embedded")]
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - reconciliation core
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::logic::edges::{Edge, Edges, PendingEdges};
    use crate::logic::events::{Peer, StackEvent};
    use crate::logic::indicators::Indicators;
    use crate::logic::state::{
        apply_edges, AddressMode, DeviceState, EventReaction, LinkState, StartOutcome,
        StopOutcome, ToggleOutcome,
    };

    fn peer() -> Peer {
        Peer {
            addr: [0x11, 0x22, 0x33, 0x44, 0x55, 0x66],
        }
    }

    fn connected_state() -> DeviceState {
        let mut state = DeviceState::new();
        state.request_start();
        state.on_stack_event(&StackEvent::Connected(peer()));
        state
    }

    // ════════════════════════════════════════════════════════════════════════
    // Edge Latch Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn edges_start_empty() {
        let edges = PendingEdges::new();
        assert_eq!(edges.drain(), Edges::default());
    }

    #[test]
    fn edges_signal_then_drain() {
        let edges = PendingEdges::new();
        edges.signal(Edge::Start);
        let drained = edges.drain();
        assert!(drained.start);
        assert!(!drained.stop);
        assert!(!drained.toggle);
    }

    #[test]
    fn edges_drain_clears() {
        let edges = PendingEdges::new();
        edges.signal(Edge::Stop);
        assert!(edges.drain().stop);
        assert_eq!(edges.drain(), Edges::default());
    }

    #[test]
    fn edges_coalesce_repeated_presses() {
        let edges = PendingEdges::new();
        edges.signal(Edge::Toggle);
        edges.signal(Edge::Toggle);
        edges.signal(Edge::Toggle);
        let drained = edges.drain();
        assert!(drained.toggle);
        // no queued history: the next drain sees nothing
        assert_eq!(edges.drain(), Edges::default());
    }

    #[test]
    fn edges_latch_independently() {
        let edges = PendingEdges::new();
        edges.signal(Edge::Start);
        edges.signal(Edge::Toggle);
        let drained = edges.drain();
        assert!(drained.start);
        assert!(!drained.stop);
        assert!(drained.toggle);
        assert!(drained.any());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Advertising Controller Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn initial_state_is_idle_rotating_private() {
        let state = DeviceState::new();
        assert_eq!(state.link_state(), LinkState::Idle);
        assert_eq!(state.address_mode(), AddressMode::RotatingPrivate);
        assert!(!state.advertise_wanted());
        assert!(!state.passkey_active());
        assert_eq!(state.peer(), None);
    }

    #[test]
    fn start_from_idle_begins_advertising() {
        let mut state = DeviceState::new();
        assert_eq!(
            state.request_start(),
            StartOutcome::Started(AddressMode::RotatingPrivate)
        );
        assert_eq!(state.link_state(), LinkState::Advertising);
        assert!(state.advertise_wanted());
    }

    #[test]
    fn start_while_advertising_is_idempotent() {
        let mut state = DeviceState::new();
        state.request_start();
        assert_eq!(state.request_start(), StartOutcome::AlreadyAdvertising);
        assert_eq!(state.link_state(), LinkState::Advertising);
    }

    #[test]
    fn start_while_connected_is_idempotent() {
        let mut state = connected_state();
        assert_eq!(state.request_start(), StartOutcome::AlreadyConnected);
        assert_eq!(state.link_state(), LinkState::Connected);
        // intent is still latched for the next disconnect
        assert!(state.advertise_wanted());
    }

    #[test]
    fn stop_while_advertising_goes_idle() {
        let mut state = DeviceState::new();
        state.request_start();
        assert_eq!(state.request_stop(), StopOutcome::AdvertisingStopped);
        assert_eq!(state.link_state(), LinkState::Idle);
        assert!(!state.advertise_wanted());
    }

    #[test]
    fn stop_while_idle_is_best_effort() {
        let mut state = DeviceState::new();
        assert_eq!(state.request_stop(), StopOutcome::AdvertisingStopped);
        assert_eq!(state.link_state(), LinkState::Idle);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Connection Lifecycle Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn connect_event_fills_slot_and_clears_advertising() {
        let mut state = DeviceState::new();
        state.request_start();
        state.on_stack_event(&StackEvent::Connected(peer()));
        assert_eq!(state.link_state(), LinkState::Connected);
        assert_eq!(state.peer(), Some(peer()));
        assert!(!state.is_advertising());
    }

    #[test]
    fn failed_connect_event_changes_nothing() {
        let mut state = DeviceState::new();
        state.request_start();
        let reaction = state.on_stack_event(&StackEvent::ConnectFailed { status: 0x3e });
        assert_eq!(reaction, EventReaction::None);
        assert_eq!(state.link_state(), LinkState::Advertising);
        assert_eq!(state.peer(), None);
    }

    #[test]
    fn stop_while_connected_defers_to_disconnect_event() {
        let mut state = connected_state();
        assert_eq!(state.request_stop(), StopOutcome::DisconnectRequested);
        // the slot is NOT cleared by the request
        assert_eq!(state.link_state(), LinkState::Connected);

        let reaction = state.on_stack_event(&StackEvent::Disconnected { reason: Some(0x13) });
        // intent was cleared by the stop, so no resume
        assert_eq!(reaction, EventReaction::None);
        assert_eq!(state.link_state(), LinkState::Idle);
    }

    #[test]
    fn disconnect_resumes_advertising_when_wanted() {
        let mut state = connected_state();
        let reaction = state.on_stack_event(&StackEvent::Disconnected { reason: Some(0x08) });
        assert_eq!(
            reaction,
            EventReaction::ResumeAdvertising(AddressMode::RotatingPrivate)
        );
        assert_eq!(state.link_state(), LinkState::Advertising);
    }

    #[test]
    fn disconnect_without_intent_stays_idle() {
        let mut state = connected_state();
        state.request_stop();
        state.on_stack_event(&StackEvent::Disconnected { reason: None });
        assert_eq!(state.link_state(), LinkState::Idle);
    }

    #[test]
    fn disconnect_releases_slot_for_any_reason_code() {
        for reason in [None, Some(0x08), Some(0x13), Some(0x16)] {
            let mut state = connected_state();
            state.on_stack_event(&StackEvent::Disconnected { reason });
            assert_eq!(state.peer(), None);
        }
    }

    #[test]
    fn advertise_failure_clears_mirror_without_retry() {
        let mut state = DeviceState::new();
        state.request_start();
        let reaction = state.on_stack_event(&StackEvent::AdvertiseFailed);
        assert_eq!(reaction, EventReaction::None);
        assert_eq!(state.link_state(), LinkState::Idle);
        // intent stays latched; a disconnect cannot happen, so the user
        // restarts by pressing start again
        assert!(state.advertise_wanted());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Address Mode Toggle Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn toggle_while_idle_latches_mode() {
        let mut state = DeviceState::new();
        assert_eq!(
            state.toggle_mode(),
            ToggleOutcome::ModeLatched(AddressMode::StableIdentity)
        );
        assert_eq!(state.link_state(), LinkState::Idle);
        assert_eq!(
            state.toggle_mode(),
            ToggleOutcome::ModeLatched(AddressMode::RotatingPrivate)
        );
    }

    #[test]
    fn toggle_while_advertising_restarts_with_new_mode() {
        let mut state = DeviceState::new();
        state.request_start();
        assert_eq!(
            state.toggle_mode(),
            ToggleOutcome::Restarted(AddressMode::StableIdentity)
        );
        // still advertising after the stop-then-start
        assert_eq!(state.link_state(), LinkState::Advertising);
    }

    #[test]
    fn toggle_while_connected_records_intent_only() {
        let mut state = connected_state();
        assert_eq!(
            state.toggle_mode(),
            ToggleOutcome::ModeLatched(AddressMode::StableIdentity)
        );
        // no restart: a held link forbids advertising
        assert_eq!(state.link_state(), LinkState::Connected);
        assert!(!state.is_advertising());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Pairing Authority Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn passkey_display_raises_indicator() {
        let mut state = connected_state();
        state.on_stack_event(&StackEvent::PasskeyDisplay);
        assert!(state.passkey_active());
    }

    #[test]
    fn terminal_pairing_events_reset_indicator() {
        let terminals = [
            StackEvent::PairingCancelled,
            StackEvent::PairingComplete { bonded: true },
            StackEvent::PairingComplete { bonded: false },
            StackEvent::PairingFailed { reason: 0x05 },
        ];
        for terminal in terminals {
            let mut state = connected_state();
            state.on_stack_event(&StackEvent::PasskeyDisplay);
            state.on_stack_event(&terminal);
            assert!(!state.passkey_active(), "indicator stuck after {terminal:?}");
        }
    }

    #[test]
    fn terminal_pairing_events_are_harmless_without_indicator() {
        let mut state = connected_state();
        state.on_stack_event(&StackEvent::PairingFailed { reason: 0x03 });
        assert!(!state.passkey_active());
        assert_eq!(state.link_state(), LinkState::Connected);
    }

    #[test]
    fn pairing_confirm_is_accepted_without_state_change() {
        let mut state = connected_state();
        let reaction = state.on_stack_event(&StackEvent::PairingConfirm);
        assert_eq!(reaction, EventReaction::None);
        assert!(!state.passkey_active());
        assert_eq!(state.link_state(), LinkState::Connected);
    }

    #[test]
    fn security_change_is_log_only() {
        let mut state = connected_state();
        state.on_stack_event(&StackEvent::PasskeyDisplay);
        state.on_stack_event(&StackEvent::SecurityChanged {
            encrypted: true,
            mitm_protected: true,
        });
        // not a terminal pairing event
        assert!(state.passkey_active());
        assert_eq!(state.link_state(), LinkState::Connected);
    }

    #[test]
    fn disconnect_always_clears_passkey_indicator() {
        let mut state = connected_state();
        state.on_stack_event(&StackEvent::PasskeyDisplay);
        state.on_stack_event(&StackEvent::Disconnected { reason: Some(0x13) });
        assert!(!state.passkey_active());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Indicator Projection Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn indicators_off_at_boot() {
        let state = DeviceState::new();
        assert_eq!(
            Indicators::project(&state).as_array(),
            [false, false, false, false]
        );
    }

    #[test]
    fn indicators_track_advertising_and_connection() {
        let mut state = DeviceState::new();
        state.request_start();
        assert_eq!(
            Indicators::project(&state).as_array(),
            [true, false, false, false]
        );

        state.on_stack_event(&StackEvent::Connected(peer()));
        assert_eq!(
            Indicators::project(&state).as_array(),
            [false, true, false, false]
        );
    }

    #[test]
    fn mode_indicator_set_means_stable_identity() {
        let mut state = DeviceState::new();
        assert!(!Indicators::project(&state).stable_identity);
        state.toggle_mode();
        assert!(Indicators::project(&state).stable_identity);
    }

    #[test]
    fn passkey_indicator_line() {
        let mut state = connected_state();
        state.on_stack_event(&StackEvent::PasskeyDisplay);
        assert_eq!(
            Indicators::project(&state).as_array(),
            [false, true, false, true]
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Edge Dispatch Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn apply_edges_dispatches_in_fixed_order() {
        // start and stop in the same tick: start runs first, so the net
        // result is stopped with intent cleared
        let mut state = DeviceState::new();
        let outcomes = apply_edges(
            &mut state,
            Edges {
                start: true,
                stop: true,
                toggle: false,
            },
        );
        assert_eq!(
            outcomes.start,
            Some(StartOutcome::Started(AddressMode::RotatingPrivate))
        );
        assert_eq!(outcomes.stop, Some(StopOutcome::AdvertisingStopped));
        assert_eq!(outcomes.toggle, None);
        assert_eq!(state.link_state(), LinkState::Idle);
        assert!(!state.advertise_wanted());
    }

    #[test]
    fn apply_edges_all_three_at_once() {
        let mut state = DeviceState::new();
        let outcomes = apply_edges(
            &mut state,
            Edges {
                start: true,
                stop: true,
                toggle: true,
            },
        );
        // toggle ran after stop, so no restart - just the latched mode
        assert_eq!(
            outcomes.toggle,
            Some(ToggleOutcome::ModeLatched(AddressMode::StableIdentity))
        );
        assert_eq!(state.address_mode(), AddressMode::StableIdentity);
        assert_eq!(state.link_state(), LinkState::Idle);
    }

    #[test]
    fn apply_edges_empty_is_noop() {
        let mut state = DeviceState::new();
        state.request_start();
        let outcomes = apply_edges(&mut state, Edges::default());
        assert_eq!(outcomes.start, None);
        assert_eq!(outcomes.stop, None);
        assert_eq!(outcomes.toggle, None);
        assert_eq!(state.link_state(), LinkState::Advertising);
    }
}
