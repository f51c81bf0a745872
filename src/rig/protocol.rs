//! Scanner rig line protocol.
//!
//! Commands are ASCII keywords terminated by a newline. The rig answers
//! every command with a single line holding a parenthesized triple list:
//!
//! ```text
//! -> SCAN\n
//! <- [(0, 30, 512), (2, 30, 498), ...]\n
//! ```
//!
//! Each triple is `(pan_deg, tilt_deg, reading)` as signed integers. A scan
//! over an empty field of view answers `[]`.

use crate::core::types::RawSample;
use crate::error::{Error, Result};

/// Commands understood by the rig firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run a full pan/tilt sweep, answer with every sample
    Scan,
    /// Take a single probe at the current position, answer with one sample
    Calibrate,
}

impl Command {
    /// Keyword as sent on the wire (without the terminator)
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Scan => "SCAN",
            Command::Calibrate => "CALIBRATE",
        }
    }

    /// Full framed command line
    pub fn to_line(self) -> String {
        format!("{}\n", self.keyword())
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Parse a response line into raw samples.
///
/// Accepts surrounding whitespace, an optional trailing comma inside the
/// list, and negative angles. Anything else is [`Error::InvalidResponse`].
pub fn parse_samples(line: &str) -> Result<Vec<RawSample>> {
    let body = line
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| Error::InvalidResponse(format!("not a sample list: {:?}", line.trim())))?
        .trim();

    if body.is_empty() {
        return Ok(Vec::new());
    }

    // Split on the closing parenthesis of each triple; what remains between
    // separators is "(p, t, r" with optional leading comma.
    let mut samples = Vec::new();
    for chunk in body.split(')') {
        let chunk = chunk.trim().trim_start_matches(',').trim();
        if chunk.is_empty() {
            continue;
        }
        let fields = chunk
            .strip_prefix('(')
            .ok_or_else(|| Error::InvalidResponse(format!("malformed triple: {:?}", chunk)))?;

        let mut values = [0i32; 3];
        let mut count = 0;
        for field in fields.split(',') {
            if count == 3 {
                return Err(Error::InvalidResponse(format!(
                    "triple has too many fields: {:?}",
                    chunk
                )));
            }
            values[count] = field.trim().parse().map_err(|_| {
                Error::InvalidResponse(format!("bad integer {:?} in {:?}", field.trim(), chunk))
            })?;
            count += 1;
        }
        if count != 3 {
            return Err(Error::InvalidResponse(format!(
                "triple has {} fields: {:?}",
                count, chunk
            )));
        }

        samples.push(RawSample::new(values[0], values[1], values[2]));
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        assert_eq!(Command::Scan.to_line(), "SCAN\n");
        assert_eq!(Command::Calibrate.to_line(), "CALIBRATE\n");
    }

    #[test]
    fn test_parse_single_sample() {
        let samples = parse_samples("[(0, 30, 512)]").unwrap();
        assert_eq!(samples, vec![RawSample::new(0, 30, 512)]);
    }

    #[test]
    fn test_parse_multiple_samples() {
        let samples = parse_samples("[(0, 30, 512), (2, 30, 498), (4, 30, 476)]").unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1], RawSample::new(2, 30, 498));
    }

    #[test]
    fn test_parse_preserves_order() {
        let samples = parse_samples("[(3, 0, 1), (1, 0, 2), (2, 0, 3)]").unwrap();
        let pans: Vec<i32> = samples.iter().map(|s| s.pan_deg).collect();
        assert_eq!(pans, vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_samples("[]").unwrap().is_empty());
        assert!(parse_samples("  [ ]  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_negative_values() {
        let samples = parse_samples("[(-8, -30, 100)]").unwrap();
        assert_eq!(samples, vec![RawSample::new(-8, -30, 100)]);
    }

    #[test]
    fn test_parse_trailing_comma_and_whitespace() {
        let samples = parse_samples("  [(0,0,1), (1,0,2),]  \r").unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_samples("hello").is_err());
        assert!(parse_samples("(0, 0, 1)").is_err()); // missing brackets
        assert!(parse_samples("[(0, 0)]").is_err()); // too few fields
        assert!(parse_samples("[(0, 0, 1, 2)]").is_err()); // too many fields
        assert!(parse_samples("[(0, 0, x)]").is_err()); // not an integer
        assert!(parse_samples("[0, 0, 1]").is_err()); // bare values
    }
}
