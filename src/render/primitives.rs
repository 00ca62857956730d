use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb` or `#rrggbb` notation as used by chart input files.
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input
            .strip_prefix('#')
            .ok_or_else(|| ChartError::InvalidData(format!("color `{input}` must start with `#`")))?;

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidData(format!(
                "color `{input}` is not valid hex"
            )));
        }

        let channel = |hex: &str| -> ChartResult<f64> {
            u8::from_str_radix(hex, 16)
                .map(|value| f64::from(value) / 255.0)
                .map_err(|_| ChartError::InvalidData(format!("color `{input}` is not valid hex")))
        };

        match digits.len() {
            3 => {
                let mut channels = [0.0; 3];
                for (slot, ch) in channels.iter_mut().zip(digits.chars()) {
                    let doubled: String = [ch, ch].iter().collect();
                    *slot = channel(&doubled)?;
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(ChartError::InvalidData(format!(
                "color `{input}` must use #rgb or #rrggbb notation"
            ))),
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_long_and_short_hex() {
        let long = Color::from_hex("#3DC23F").expect("long hex");
        assert!((long.red - 61.0 / 255.0).abs() <= 1e-12);
        assert!((long.green - 194.0 / 255.0).abs() <= 1e-12);
        assert!((long.blue - 63.0 / 255.0).abs() <= 1e-12);

        let short = Color::from_hex("#fff").expect("short hex");
        assert_eq!(short, Color::rgb(1.0, 1.0, 1.0));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::from_hex("3DC23F").is_err());
        assert!(Color::from_hex("#3DC2").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("#+f+f+f").is_err());
        assert!(Color::from_hex("#+ff").is_err());
    }
}
