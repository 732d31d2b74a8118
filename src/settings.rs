use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;
use crate::format::max_digits;
use crate::util::DEFAULT_DISPLAY_DIGITS;

const SECTION: &str = "[Settings]";
const KEYS: [&str; 4] = ["precision", "display_digits", "max_history", "angle"];

/// Unit of trigonometric function arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Angle {
    /// `angle=0`
    Radians,
    /// `angle=1`
    Degrees,
}

/// Evaluation and display settings. The evaluator only reads them.
///
/// Settings are usually read from INI text:
///
/// ```
/// use bigcalc::{Angle, Settings};
///
/// let settings: Settings = "[Settings]\nprecision=128\ndisplay_digits=6\nmax_history=10\nangle=1\n"
///     .parse()
///     .unwrap();
/// assert_eq!(settings.precision, 128);
/// assert_eq!(settings.angle, Angle::Degrees);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bits of precision for decimal computations
    pub precision: u32,
    /// Digits shown after the decimal point of decimal results, at most as
    /// many as `precision` bits hold
    pub display_digits: usize,
    /// Number of past results a front end should remember
    pub max_history: usize,
    /// Unit of trigonometric function arguments
    pub angle: Angle,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            precision: 320,
            display_digits: DEFAULT_DISPLAY_DIGITS,
            max_history: 50,
            angle: Angle::Radians,
        }
    }
}

impl Settings {
    /// The precision, clamped into the range MPFR accepts
    pub fn precision_bits(&self) -> u32 {
        self.precision
            .clamp(rug::float::prec_min(), rug::float::prec_max())
    }

    /// Largest argument accepted by factorial
    pub fn factorial_limit(&self) -> u64 {
        64 * u64::from(self.precision_bits())
    }
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut values: [Option<u64>; 4] = [None; 4];
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line == SECTION {
                continue;
            }
            if line.starts_with('[') {
                return Err(config_error(number, format!("unknown section {}", line)));
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| config_error(number, format!("expected key=value, got {}", line)))?;
            let (key, value) = (key.trim(), value.trim());
            let slot = KEYS
                .iter()
                .position(|&known| known == key)
                .ok_or_else(|| config_error(number, format!("unknown setting {}", key)))?;
            if values[slot].is_some() {
                return Err(config_error(number, format!("duplicate setting {}", key)));
            }
            let parsed = value.parse::<u64>().map_err(|_| {
                config_error(
                    number,
                    format!("{} must be a non-negative integer, got {:?}", key, value),
                )
            })?;
            values[slot] = Some(parsed);
        }

        let get = |slot: usize| {
            values[slot].ok_or_else(|| Error::ConfigError(format!("missing setting {}", KEYS[slot])))
        };
        let precision = u32::try_from(get(0)?)
            .map_err(|_| Error::ConfigError("precision is too large".into()))?;
        let display_digits = usize::try_from(get(1)?)
            .map_err(|_| Error::ConfigError("display_digits is too large".into()))?;
        let max_history = usize::try_from(get(2)?)
            .map_err(|_| Error::ConfigError("max_history is too large".into()))?;
        let angle = match get(3)? {
            0 => Angle::Radians,
            1 => Angle::Degrees,
            other => {
                return Err(Error::ConfigError(format!(
                    "angle must be 0 (radians) or 1 (degrees), got {}",
                    other
                )))
            }
        };
        let mut settings = Settings {
            precision,
            display_digits,
            max_history,
            angle,
        };
        settings.display_digits = display_digits.min(max_digits(settings.precision_bits()));
        Ok(settings)
    }
}

fn config_error(line: usize, message: String) -> Error {
    Error::ConfigError(format!("line {}: {}", line + 1, message))
}

impl Display for Settings {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let angle = match self.angle {
            Angle::Radians => 0,
            Angle::Degrees => 1,
        };
        writeln!(fmt, "{}", SECTION)?;
        writeln!(fmt, "precision={}", self.precision)?;
        writeln!(fmt, "display_digits={}", self.display_digits)?;
        writeln!(fmt, "max_history={}", self.max_history)?;
        writeln!(fmt, "# angle=0 (radians) or angle=1 (degrees)")?;
        writeln!(fmt, "angle={}", angle)
    }
}
