//! Interactive command session for the scanner.
//!
//! Sequences rig commands and hands the collected samples to the processing
//! core. All session state (current scan, calibration points, current model)
//! lives in an explicit [`Session`] value owned by the shell; a failed
//! command prints its error and leaves the session untouched.

use crate::calibration::{self, CalibrationModel};
use crate::config::AppConfig;
use crate::core::types::{CalibrationPoint, RawSample};
use crate::error::Result;
use crate::pipeline::ScanProcessor;
use crate::render::{render_fit_curve, CloudRenderer};
use crate::rig::{RigDriver, Transport};
use std::io::{BufRead, Write};

/// Distance assumed when `calibrate` gets no parseable argument, in
/// centimeters.
pub const DEFAULT_CALIBRATION_DISTANCE_CM: f64 = 20.0;

/// Mutable state of one operator session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Samples from the most recent sweep
    pub scan: Vec<RawSample>,
    /// Active response model
    pub model: CalibrationModel,
    /// Calibration points collected so far
    pub cal_points: Vec<CalibrationPoint>,
}

impl Session {
    /// Start a session with the given model and nothing scanned yet
    pub fn new(model: CalibrationModel) -> Self {
        Self {
            scan: Vec::new(),
            model,
            cal_points: Vec::new(),
        }
    }
}

/// Whether the command loop should keep going
enum Flow {
    Continue,
    Exit,
}

/// Interactive shell over a rig driver.
pub struct ScannerShell<T: Transport> {
    driver: RigDriver<T>,
    config: AppConfig,
    session: Session,
}

impl<T: Transport> ScannerShell<T> {
    /// Create a shell; the startup model comes from the configuration.
    pub fn new(driver: RigDriver<T>, config: AppConfig) -> Self {
        let session = Session::new(config.model());
        Self {
            driver,
            config,
            session,
        }
    }

    /// The current session state (mainly for tests).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the command loop until `exit` or end of input.
    ///
    /// Command failures are printed and the loop continues; only I/O errors
    /// on the shell's own input/output end the session early.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        writeln!(output, "3D scanner shell. Type help to list commands.")?;

        let mut line = String::new();
        loop {
            write!(output, "scan> ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break; // EOF
            }

            match self.dispatch(line.trim(), &mut output) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    log::error!("Command failed: {}", e);
                    writeln!(output, "error: {}", e)?;
                }
            }
        }

        writeln!(output, "Session ended.")?;
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Flow> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => {
                writeln!(output, "Commands:")?;
                writeln!(output, "  scan                 run a sweep and store the samples")?;
                writeln!(
                    output,
                    "  calibrate [dist_cm]  probe once at a known distance (default {} cm)",
                    DEFAULT_CALIBRATION_DISTANCE_CM
                )?;
                writeln!(output, "  fit                  refit the model from calibration points")?;
                writeln!(output, "  curve                render the fit curve SVG")?;
                writeln!(output, "  plot [threshold]     process the stored scan and render it")?;
                writeln!(output, "  exit                 end the session")?;
            }
            "scan" => {
                let samples = self.driver.scan()?;
                writeln!(output, "Captured {} samples.", samples.len())?;
                self.session.scan = samples;
            }
            "calibrate" => {
                let distance_cm = match arg.parse::<f64>() {
                    Ok(d) if d > 0.0 => d,
                    _ => {
                        writeln!(
                            output,
                            "Invalid distance argument, assuming {} cm",
                            DEFAULT_CALIBRATION_DISTANCE_CM
                        )?;
                        DEFAULT_CALIBRATION_DISTANCE_CM
                    }
                };
                let sample = self.driver.calibration_sample()?;
                self.session
                    .cal_points
                    .push(CalibrationPoint::new(f64::from(sample.reading), distance_cm));
                writeln!(
                    output,
                    "Recorded reading {} at {} cm ({} points collected).",
                    sample.reading,
                    distance_cm,
                    self.session.cal_points.len()
                )?;
            }
            "fit" => {
                let readings: Vec<f64> =
                    self.session.cal_points.iter().map(|p| p.reading).collect();
                let distances: Vec<f64> = self
                    .session
                    .cal_points
                    .iter()
                    .map(|p| p.distance_cm)
                    .collect();
                // The previous model stays in place unless the fit succeeds
                let model = calibration::fit(&readings, &distances)?;
                writeln!(
                    output,
                    "Fitted model: a = {:.4}, b = {:.4}",
                    model.a, model.b
                )?;
                self.session.model = model;
            }
            "curve" => {
                render_fit_curve(
                    &self.session.model,
                    &self.session.cal_points,
                    &self.config.render.curve_path,
                )?;
                writeln!(output, "Wrote {}", self.config.render.curve_path)?;
            }
            "plot" => {
                let mut processor_config = self.config.processor_config();
                match arg.parse::<i32>() {
                    Ok(threshold) => processor_config.threshold = threshold,
                    Err(_) if !arg.is_empty() => {
                        writeln!(
                            output,
                            "Invalid threshold argument, using {}",
                            processor_config.threshold
                        )?;
                    }
                    Err(_) => {}
                }

                let processor = ScanProcessor::new(processor_config);
                let cloud = processor.process(&self.session.scan, &self.session.model)?;
                writeln!(
                    output,
                    "{} of {} samples passed the filter.",
                    cloud.len(),
                    self.session.scan.len()
                )?;
                CloudRenderer::new().render(&cloud, &self.config.render.scan_path)?;
                if !cloud.is_empty() {
                    writeln!(output, "Wrote {}", self.config.render.scan_path)?;
                }
            }
            "exit" | "quit" => return Ok(Flow::Exit),
            unknown => {
                writeln!(output, "Unknown command {:?}, type help.", unknown)?;
            }
        }

        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::MockTransport;
    use std::io::Cursor;
    use std::time::Duration;

    fn shell_with_mock(config: AppConfig) -> (ScannerShell<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        let driver = RigDriver::new(mock.clone(), Duration::from_millis(50));
        (ScannerShell::new(driver, config), mock)
    }

    fn run_session(
        shell: &mut ScannerShell<MockTransport>,
        input: &str,
    ) -> String {
        let mut output = Vec::new();
        shell.run(Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_ends_session() {
        let (mut shell, _mock) = shell_with_mock(AppConfig::default());
        let out = run_session(&mut shell, "exit\n");
        assert!(out.contains("Session ended."));
    }

    #[test]
    fn test_eof_ends_session() {
        let (mut shell, _mock) = shell_with_mock(AppConfig::default());
        let out = run_session(&mut shell, "");
        assert!(out.contains("Session ended."));
    }

    #[test]
    fn test_scan_stores_samples() {
        let (mut shell, mock) = shell_with_mock(AppConfig::default());
        mock.inject_read(b"[(0, 30, 512), (2, 30, 498)]\n");

        let out = run_session(&mut shell, "scan\nexit\n");

        assert!(out.contains("Captured 2 samples."));
        assert_eq!(shell.session().scan.len(), 2);
        assert_eq!(mock.get_written(), b"SCAN\n");
    }

    #[test]
    fn test_calibrate_bad_argument_falls_back() {
        let (mut shell, mock) = shell_with_mock(AppConfig::default());
        mock.inject_read(b"[(0, 0, 389)]\n");

        let out = run_session(&mut shell, "calibrate sixty\nexit\n");

        assert!(out.contains("assuming 20 cm"));
        let points = &shell.session().cal_points;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].distance_cm, DEFAULT_CALIBRATION_DISTANCE_CM);
        assert_eq!(points[0].reading, 389.0);
    }

    #[test]
    fn test_fit_without_points_keeps_model() {
        let (mut shell, _mock) = shell_with_mock(AppConfig::default());
        let before = shell.session().model;

        let out = run_session(&mut shell, "fit\nexit\n");

        assert!(out.contains("error:"));
        assert_eq!(shell.session().model, before);
    }

    #[test]
    fn test_calibrate_then_fit_replaces_model() {
        let (mut shell, mock) = shell_with_mock(AppConfig::default());
        // Two probes on the curve d = 6000 / (100 + reading)
        mock.inject_read(b"[(0, 0, 500)]\n");
        mock.inject_read(b"[(0, 0, 200)]\n");

        let out = run_session(&mut shell, "calibrate 10\ncalibrate 20\nfit\nexit\n");

        assert!(out.contains("Fitted model"));
        let model = shell.session().model;
        assert!((model.evaluate(500.0).unwrap() - 10.0).abs() < 1e-6);
        assert!((model.evaluate(200.0).unwrap() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_plot_with_no_scan_reports_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.render.scan_path = dir
            .path()
            .join("scan.svg")
            .to_string_lossy()
            .into_owned();
        let (mut shell, _mock) = shell_with_mock(config.clone());

        let out = run_session(&mut shell, "plot\nexit\n");

        assert!(out.contains("0 of 0 samples"));
        assert!(!std::path::Path::new(&config.render.scan_path).exists());
    }

    #[test]
    fn test_scan_then_plot_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.render.scan_path = dir
            .path()
            .join("scan.svg")
            .to_string_lossy()
            .into_owned();
        let (mut shell, mock) = shell_with_mock(config.clone());
        mock.inject_read(b"[(0, 60, 500), (10, 60, 480), (20, 60, 30)]\n");

        let out = run_session(&mut shell, "scan\nplot\nexit\n");

        assert!(out.contains("2 of 3 samples passed the filter."));
        assert!(std::path::Path::new(&config.render.scan_path).exists());
    }

    #[test]
    fn test_plot_threshold_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.render.scan_path = dir
            .path()
            .join("scan.svg")
            .to_string_lossy()
            .into_owned();
        let (mut shell, mock) = shell_with_mock(config);
        mock.inject_read(b"[(0, 60, 500), (10, 60, 480), (20, 60, 30)]\n");

        let out = run_session(&mut shell, "scan\nplot 10\nexit\n");

        assert!(out.contains("3 of 3 samples passed the filter."));
    }

    #[test]
    fn test_plot_bad_threshold_falls_back() {
        let (mut shell, mock) = shell_with_mock(AppConfig::default());
        mock.inject_read(b"[]\n");

        let out = run_session(&mut shell, "scan\nplot high\nexit\n");

        assert!(out.contains("Invalid threshold argument, using 50"));
    }

    #[test]
    fn test_unknown_command_hint() {
        let (mut shell, _mock) = shell_with_mock(AppConfig::default());
        let out = run_session(&mut shell, "launch\nexit\n");
        assert!(out.contains("Unknown command"));
    }

    #[test]
    fn test_rig_error_does_not_end_session() {
        // No response injected: scan times out, but exit still works
        let (mut shell, _mock) = shell_with_mock(AppConfig::default());
        let out = run_session(&mut shell, "scan\nexit\n");

        assert!(out.contains("error:"));
        assert!(out.contains("Session ended."));
    }
}
