use std::fmt;
use std::sync::Arc;

use crate::error::{ChartError, ChartResult};

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];
const DEFAULT_PRECISION: usize = 6;

/// Notation selected by the trailing type character of a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// No type character: shortest round-trip decimal.
    General,
    /// `f`: fixed point.
    Fixed,
    /// `d`: integer, rounded.
    Integer,
    /// `e`: exponent notation.
    Exponent,
    /// `%`: multiply by 100, fixed point, percent sign.
    Percent,
    /// `s`: significant digits with an SI prefix.
    Si,
    /// `r`: significant digits in decimal notation.
    Significant,
}

/// Parsed `[,][.precision][~][type]` number format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub comma: bool,
    pub precision: Option<usize>,
    pub trim: bool,
    pub kind: FormatKind,
}

impl FormatSpec {
    pub fn parse(specifier: &str) -> ChartResult<Self> {
        let invalid = || ChartError::InvalidFormat(format!("unsupported specifier `{specifier}`"));
        let mut rest = specifier;

        let comma = rest.starts_with(',');
        if comma {
            rest = &rest[1..];
        }

        let mut precision = None;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let digits = after_dot.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                return Err(invalid());
            }
            precision = Some(after_dot[..digits].parse().map_err(|_| invalid())?);
            rest = &after_dot[digits..];
        }

        let trim = rest.starts_with('~');
        if trim {
            rest = &rest[1..];
        }

        let kind = match rest {
            "" => FormatKind::General,
            "f" => FormatKind::Fixed,
            "d" => FormatKind::Integer,
            "e" => FormatKind::Exponent,
            "%" => FormatKind::Percent,
            "s" => FormatKind::Si,
            "r" => FormatKind::Significant,
            _ => return Err(invalid()),
        };

        Ok(Self {
            comma,
            precision,
            trim,
            kind,
        })
    }

    /// `,.{precision}f`: the format axes fall back to when none is configured.
    #[must_use]
    pub fn fixed_grouped(precision: usize) -> Self {
        Self {
            comma: true,
            precision: Some(precision),
            trim: false,
            kind: FormatKind::Fixed,
        }
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        let (body, suffix) = match self.kind {
            FormatKind::General => (value.to_string(), String::new()),
            FormatKind::Fixed => (format!("{value:.precision$}"), String::new()),
            FormatKind::Integer => (format!("{:.0}", value.round()), String::new()),
            FormatKind::Exponent => return self.finish(exponent(value, precision), ""),
            FormatKind::Percent => (format!("{:.precision$}", value * 100.0), "%".to_owned()),
            FormatKind::Si => {
                let (scaled, prefix) = si_scale(value, precision.max(1));
                (significant(scaled, precision.max(1)), prefix.to_owned())
            }
            FormatKind::Significant => (significant(value, precision.max(1)), String::new()),
        };
        self.finish(body, &suffix)
    }

    fn finish(&self, body: String, suffix: &str) -> String {
        let (mantissa, exponent) = match body.find('e') {
            Some(index) => (body[..index].to_owned(), body[index..].to_owned()),
            None => (body, String::new()),
        };
        let mut mantissa = if self.trim {
            trim_zeros(&mantissa)
        } else {
            mantissa
        };
        if self.comma {
            mantissa = group_thousands(&mantissa);
        }
        if let Some(unsigned) = mantissa.strip_prefix('-') {
            if unsigned.chars().all(|c| matches!(c, '0' | '.' | ',')) {
                mantissa = unsigned.to_owned();
            }
        }
        format!("{mantissa}{exponent}{suffix}")
    }
}

/// Label formatter for axis ticks.
#[derive(Clone)]
pub enum TickFormat {
    Specifier(FormatSpec),
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl TickFormat {
    pub fn parse(specifier: &str) -> ChartResult<Self> {
        FormatSpec::parse(specifier).map(Self::Specifier)
    }

    pub fn custom(formatter: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(formatter))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Specifier(spec) => spec.format(value),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl fmt::Debug for TickFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Specifier(spec) => f.debug_tuple("Specifier").field(spec).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl TryFrom<&str> for TickFormat {
    type Error = ChartError;

    fn try_from(specifier: &str) -> ChartResult<Self> {
        Self::parse(specifier)
    }
}

fn exponent(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => raw,
    }
}

fn si_scale(value: f64, digits: usize) -> (f64, &'static str) {
    if value == 0.0 {
        return (0.0, "");
    }
    let rounded = round_significant(value, digits);
    let group = ((rounded.abs().log10() / 3.0).floor() as i32).clamp(-8, 8);
    let scaled = value / 1000_f64.powi(group);
    (scaled, SI_PREFIXES[(group + 8) as usize])
}

fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10_f64.powi(digits as i32 - 1 - magnitude);
    (value * factor).round() / factor
}

fn significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}", digits.saturating_sub(1), 0.0);
    }
    let rounded = round_significant(value, digits);
    let magnitude = rounded.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    format!("{rounded:.decimals$}")
}

fn trim_zeros(number: &str) -> String {
    if !number.contains('.') {
        return number.to_owned();
    }
    number
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(index) => unsigned.split_at(index),
        None => (unsigned, ""),
    };
    if !integer.chars().all(|c| c.is_ascii_digit()) {
        return number.to_owned();
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}{fraction}")
}
