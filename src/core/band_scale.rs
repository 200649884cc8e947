use indexmap::IndexSet;

use crate::core::types::Key;
use crate::error::{ChartError, ChartResult};

/// Categorical scale dividing a pixel range into equal bands, one per key.
///
/// `padding` is applied both between bands and on the outer edges, as a
/// fraction of the step.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: IndexSet<Key>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    pub fn new(
        keys: impl IntoIterator<Item = Key>,
        range: (f64, f64),
        padding: f64,
    ) -> ChartResult<Self> {
        validate_padding(padding)?;
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidRange(format!(
                "band range must be finite, got [{}, {}]",
                range.0, range.1
            )));
        }
        Ok(Self {
            keys: keys.into_iter().collect(),
            range,
            padding,
        })
    }

    #[must_use]
    pub fn keys(&self) -> &IndexSet<Key> {
        &self.keys
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        let n = self.keys.len() as f64;
        let (r0, r1) = self.range;
        (r1 - r0) / (n - self.padding + self.padding * 2.0).max(1.0)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start of the band for `key`, or `None` for keys outside the domain.
    #[must_use]
    pub fn position(&self, key: &Key) -> Option<f64> {
        let index = self.keys.get_index_of(key)?;
        Some(self.start() + self.step() * index as f64)
    }

    /// Center of the band for `key`.
    #[must_use]
    pub fn center(&self, key: &Key) -> Option<f64> {
        self.position(key).map(|start| start + self.bandwidth() / 2.0)
    }

    fn start(&self) -> f64 {
        let n = self.keys.len() as f64;
        let (r0, r1) = self.range;
        let used = self.step() * (n - self.padding);
        r0 + (r1 - r0 - used) * 0.5
    }
}

pub(crate) fn validate_padding(padding: f64) -> ChartResult<()> {
    if !padding.is_finite() || !(0.0..=1.0).contains(&padding) {
        return Err(ChartError::InvalidRange(format!(
            "band padding must be in [0, 1], got {padding}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn keys(names: &[&str]) -> Vec<Key> {
        names.iter().map(|name| Key::from(*name)).collect()
    }

    #[test]
    fn bands_without_padding_tile_the_range() {
        let scale = BandScale::new(keys(&["a", "b", "c", "d"]), (0.0, 400.0), 0.0).expect("scale");
        assert_relative_eq!(scale.step(), 100.0);
        assert_relative_eq!(scale.bandwidth(), 100.0);
        assert_eq!(scale.position(&Key::from("c")), Some(200.0));
    }

    #[test]
    fn padding_shrinks_bands_and_centers_them() {
        let scale = BandScale::new(keys(&["a", "b"]), (0.0, 210.0), 0.1).expect("scale");
        // step = 210 / (2 - 0.1 + 0.2) = 100
        assert_relative_eq!(scale.step(), 100.0);
        assert_relative_eq!(scale.bandwidth(), 90.0);
        assert_relative_eq!(scale.position(&Key::from("a")).expect("a"), 10.0);
        assert_relative_eq!(scale.center(&Key::from("b")).expect("b"), 155.0);
    }

    #[test]
    fn duplicate_keys_collapse_to_one_band() {
        let scale = BandScale::new(keys(&["a", "a", "b"]), (0.0, 200.0), 0.0).expect("scale");
        assert_eq!(scale.keys().len(), 2);
        assert_eq!(scale.position(&Key::from("z")), None);
    }

    #[test]
    fn out_of_bounds_padding_is_rejected() {
        assert!(BandScale::new(keys(&["a"]), (0.0, 1.0), 1.5).is_err());
    }
}
