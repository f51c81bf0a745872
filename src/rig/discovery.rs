//! Serial port discovery for the scanner rig.
//!
//! The rig fronts as a USB serial adapter; we scan the system's ports for
//! the adapter families the firmware ships on and take the first match.

use serialport::SerialPortType;

/// USB (vid, pid) pairs of the adapter families used by the rig firmware:
/// genuine and clone Arduino Uno boards, FTDI FT232 and CH340 bridges.
pub const KNOWN_ADAPTER_IDS: &[(u16, u16)] = &[
    (0x2341, 0x0043),
    (0x2341, 0x0001),
    (0x2A03, 0x0043),
    (0x2341, 0x0243),
    (0x0403, 0x6001),
    (0x1A86, 0x7523),
];

/// Check whether a USB id pair belongs to a known rig adapter
#[inline]
pub fn is_known_adapter(vid: u16, pid: u16) -> bool {
    KNOWN_ADAPTER_IDS.contains(&(vid, pid))
}

/// Find the first serial port that looks like the scanner rig.
///
/// Returns `None` when no known adapter is connected or the port list is
/// unavailable.
pub fn find_port() -> Option<String> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            log::warn!("Could not enumerate serial ports: {}", e);
            return None;
        }
    };

    for port in ports {
        if let SerialPortType::UsbPort(info) = &port.port_type {
            if is_known_adapter(info.vid, info.pid) {
                log::info!(
                    "Found scanner rig on {} (vid {:04x}, pid {:04x})",
                    port.port_name,
                    info.vid,
                    info.pid
                );
                return Some(port.port_name);
            }
            log::debug!(
                "Skipping {} (vid {:04x}, pid {:04x})",
                port.port_name,
                info.vid,
                info.pid
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_adapters() {
        assert!(is_known_adapter(0x2341, 0x0043)); // Uno
        assert!(is_known_adapter(0x1A86, 0x7523)); // CH340
    }

    #[test]
    fn test_unknown_adapter() {
        assert!(!is_known_adapter(0x046D, 0xC077));
        assert!(!is_known_adapter(0x2341, 0xFFFF));
    }
}
