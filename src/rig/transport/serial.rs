//! Serial transport for the scanner rig

use super::Transport;
use crate::error::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::Duration;

/// Poll interval used by the underlying port before reporting a timed-out
/// read. Short so the rig driver can enforce its own deadline.
const READ_POLL: Duration = Duration::from_millis(10);

/// Serial port wrapper for UART communication with the rig
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port at 8N1.
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyACM0")
    /// * `baud_rate` - Baud rate (the rig firmware runs at 115200)
    ///
    /// The rig's microcontroller resets when the port opens; callers should
    /// wait for the settle delay from the hardware config before issuing the
    /// first command.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_POLL)
            .open()?;

        log::info!("Opened serial port: {} at {} baud", path, baud_rate);

        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    /// Read data into buffer; a poll timeout reports zero bytes, not an error
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match std::io::Read::read(&mut self.port, buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(std::io::Write::write(&mut self.port, data)?)
    }

    fn flush(&mut self) -> Result<()> {
        std::io::Write::flush(&mut self.port)?;
        Ok(())
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }
}
