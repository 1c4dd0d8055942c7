//! Advertising payload construction.
//!
//! Raw AD structures, assembled byte by byte: the primary payload
//! carries the flags and the 128-bit service UUID, the scan response
//! carries the device name so phones have something to display.

/// AD type: Flags.
const AD_TYPE_FLAGS: u8 = 0x01;
/// AD type: Complete list of 128-bit service UUIDs.
const AD_TYPE_UUID128_ALL: u8 = 0x07;
/// AD type: Complete local name.
const AD_TYPE_NAME_COMPLETE: u8 = 0x09;

/// LE General Discoverable + BR/EDR not supported.
const FLAGS_GENERAL_DISC_NO_BREDR: u8 = 0x06;

/// Legacy advertising payload limit.
pub const MAX_ADV_LEN: usize = 31;

/// Build the primary advertising payload: flags, then the 128-bit
/// service UUID.
///
/// Returns the number of bytes written, or 0 if `buf` cannot hold the
/// payload.
pub fn build_adv_data(service_uuid: &[u8; 16], buf: &mut [u8]) -> usize {
    const NEEDED: usize = 3 + 18;
    if buf.len() < NEEDED {
        return 0;
    }
    buf[0] = 2;
    buf[1] = AD_TYPE_FLAGS;
    buf[2] = FLAGS_GENERAL_DISC_NO_BREDR;
    buf[3] = 17;
    buf[4] = AD_TYPE_UUID128_ALL;
    buf[5..21].copy_from_slice(service_uuid);
    NEEDED
}

/// Build the scan-response payload carrying the complete local name.
///
/// Names longer than the remaining space are truncated to fit the
/// 31-byte legacy limit. Returns the number of bytes written, or 0 if
/// `buf` cannot hold even an empty record.
pub fn build_scan_data(name: &str, buf: &mut [u8]) -> usize {
    if buf.len() < 2 {
        return 0;
    }
    let room = buf.len().min(MAX_ADV_LEN) - 2;
    let n = name.len().min(room);
    buf[0] = (n + 1) as u8;
    buf[1] = AD_TYPE_NAME_COMPLETE;
    buf[2..2 + n].copy_from_slice(&name.as_bytes()[..n]);
    2 + n
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SERVICE_UUID;

    #[test]
    fn adv_data_layout() {
        let mut buf = [0u8; MAX_ADV_LEN];
        let len = build_adv_data(&SERVICE_UUID, &mut buf);
        assert_eq!(len, 21);

        // Flags record: len=2, type=0x01, general discoverable, no BR/EDR
        assert_eq!(&buf[..3], &[0x02, 0x01, 0x06]);

        // UUID record: len=17, type=0x07, then the UUID verbatim
        assert_eq!(buf[3], 17);
        assert_eq!(buf[4], 0x07);
        assert_eq!(&buf[5..21], &SERVICE_UUID);
    }

    #[test]
    fn adv_data_buffer_too_small() {
        let mut buf = [0u8; 20];
        assert_eq!(build_adv_data(&SERVICE_UUID, &mut buf), 0);
    }

    #[test]
    fn scan_data_carries_name() {
        let mut buf = [0u8; MAX_ADV_LEN];
        let len = build_scan_data("btn2ble", &mut buf);
        assert_eq!(len, 9);
        assert_eq!(buf[0], 8); // name length + type byte
        assert_eq!(buf[1], 0x09);
        assert_eq!(&buf[2..9], b"btn2ble");
    }

    #[test]
    fn scan_data_truncates_long_name() {
        let mut buf = [0u8; MAX_ADV_LEN];
        let name = "a-device-name-well-beyond-the-31-byte-limit";
        let len = build_scan_data(name, &mut buf);
        assert_eq!(len, MAX_ADV_LEN);
        assert_eq!(buf[0], 30);
        assert_eq!(&buf[2..], &name.as_bytes()[..29]);
    }

    #[test]
    fn scan_data_empty_name() {
        let mut buf = [0u8; MAX_ADV_LEN];
        let len = build_scan_data("", &mut buf);
        assert_eq!(len, 2);
        assert_eq!(buf[0], 1);
    }

    #[test]
    fn scan_data_buffer_too_small() {
        let mut buf = [0u8; 1];
        assert_eq!(build_scan_data("x", &mut buf), 0);
    }
}
