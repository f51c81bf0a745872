//! Command/response driver for the scanner rig.
//!
//! Owns a [`Transport`], frames commands, and assembles the single response
//! line under a deadline. Retry policy lives here, with the hardware - the
//! processing core never sees a timeout.

use super::protocol::{parse_samples, Command};
use super::transport::Transport;
use crate::core::types::RawSample;
use crate::error::{Error, Result};
use std::time::{Duration, Instant};

/// Idle wait between reads while the rig is still sweeping
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Issues commands to the rig and parses its answers
pub struct RigDriver<T: Transport> {
    transport: T,
    read_timeout: Duration,
}

impl<T: Transport> RigDriver<T> {
    /// Create a driver over an open transport.
    ///
    /// `read_timeout` bounds the wait for a complete response line. A full
    /// sweep takes the rig tens of seconds, so scan deadlines are generous.
    pub fn new(transport: T, read_timeout: Duration) -> Self {
        Self {
            transport,
            read_timeout,
        }
    }

    /// Run a full sweep and return every sample the rig reports.
    pub fn scan(&mut self) -> Result<Vec<RawSample>> {
        self.command(Command::Scan)
    }

    /// Take a single probe for calibration.
    ///
    /// The rig answers with a one-sample list; a longer or empty answer is
    /// an invalid response.
    pub fn calibration_sample(&mut self) -> Result<RawSample> {
        let samples = self.command(Command::Calibrate)?;
        match samples.as_slice() {
            [sample] => Ok(*sample),
            _ => Err(Error::InvalidResponse(format!(
                "expected one calibration sample, got {}",
                samples.len()
            ))),
        }
    }

    /// Send a command and parse the response line.
    fn command(&mut self, command: Command) -> Result<Vec<RawSample>> {
        log::debug!("Sending {} command", command);
        self.transport.write(command.to_line().as_bytes())?;
        self.transport.flush()?;

        let line = self.read_line()?;
        let samples = parse_samples(&line)?;
        log::info!("{} returned {} samples", command, samples.len());
        Ok(samples)
    }

    /// Assemble one newline-terminated response within the deadline.
    fn read_line(&mut self) -> Result<String> {
        let deadline = Instant::now() + self.read_timeout;
        let mut line = Vec::new();
        let mut chunk = [0u8; 256];

        loop {
            let n = self.transport.read(&mut chunk)?;
            if n == 0 {
                if Instant::now() >= deadline {
                    return Err(Error::Timeout);
                }
                std::thread::sleep(POLL_INTERVAL);
                continue;
            }

            for &byte in &chunk[..n] {
                if byte == b'\n' {
                    return String::from_utf8(line).map_err(|e| {
                        Error::InvalidResponse(format!("response is not UTF-8: {}", e))
                    });
                }
                line.push(byte);
            }

            if Instant::now() >= deadline {
                return Err(Error::Timeout);
            }
        }
    }
}
