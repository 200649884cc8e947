use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
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

    /// Parses `#rgb`, `#rrggbb` and `rgb(r, g, b)` notations.
    ///
    /// Named colors and other CSS forms return `None`; callers treat those as
    /// opaque values that cannot be interpolated.
    #[must_use]
    pub fn parse_css(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            let mut digits = hex.chars().map(|c| c.to_digit(16));
            let (red, green, blue) = match hex.chars().count() {
                3 => {
                    let mut next = || digits.next().flatten().map(|d| (d * 17) as u8);
                    (next()?, next()?, next()?)
                }
                6 => {
                    let mut next = || {
                        let high = digits.next().flatten()?;
                        let low = digits.next().flatten()?;
                        Some((high * 16 + low) as u8)
                    };
                    (next()?, next()?, next()?)
                }
                _ => return None,
            };
            return Some(Self::from_bytes(red, green, blue));
        }

        let body = input.strip_prefix("rgb(")?.strip_suffix(')')?;
        let mut parts = body.split(',').map(|part| part.trim().parse::<f64>().ok());
        let (red, green, blue) = (parts.next()??, parts.next()??, parts.next()??);
        if parts.next().is_some() {
            return None;
        }
        let color = Self::rgb(red / 255.0, green / 255.0, blue / 255.0);
        color.validate().ok()?;
        Some(color)
    }

    #[must_use]
    pub fn from_bytes(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Channel-wise interpolation; `t` is clamped to [0, 1].
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self::rgba(
            mix(self.red, other.red),
            mix(self.green, other.green),
            mix(self.blue, other.blue),
            mix(self.alpha, other.alpha),
        )
    }

    /// CSS `#rrggbb` hex form, ignoring alpha.
    #[must_use]
    pub fn to_css_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms_parse_to_the_same_color() {
        assert_eq!(Color::parse_css("#fff"), Color::parse_css("#ffffff"));
        assert_eq!(
            Color::parse_css("#282828").map(Color::to_css_hex).as_deref(),
            Some("#282828")
        );
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert_eq!(Color::parse_css("#aébcd"), None);
        assert_eq!(Color::parse_css("#ééé"), None);
        assert_eq!(Color::parse_css("#12345g"), None);
    }

    #[test]
    fn rgb_function_form_parses() {
        let color = Color::parse_css("rgb(255, 0, 0)").expect("rgb");
        assert_eq!(color.to_css_hex(), "#ff0000");
    }

    #[test]
    fn named_colors_are_opaque() {
        assert!(Color::parse_css("steelblue").is_none());
        assert!(Color::parse_css("#12").is_none());
    }

    #[test]
    fn lerp_mixes_channels() {
        let black = Color::from_bytes(0, 0, 0);
        let white = Color::from_bytes(255, 255, 255);
        assert_eq!(black.lerp(white, 0.5).to_css_hex(), "#808080");
    }
}
