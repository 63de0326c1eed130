//! Legend rows annotated with the value range each bin covers.

use income_map_choropleth_models::{LegendCategory, LegendEntry};

use crate::QuantileScale;

/// Builds the legend for a classified year.
///
/// Each entry carries the static label and color plus the `min`/`max`
/// value range from [`QuantileScale::invert_extent`]. Bins beyond the
/// legend table are skipped.
#[must_use]
pub fn legend_for(scale: &QuantileScale) -> Vec<LegendEntry> {
    (0..scale.bin_count())
        .filter_map(|bin| {
            let category = LegendCategory::from_bin(bin)?;
            let (min, max) = scale.invert_extent(bin)?;
            Some(LegendEntry {
                min: Some(min),
                max: Some(max),
                ..LegendEntry::from(category)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use income_map_choropleth_models::BIN_COUNT;

    use super::*;
    use crate::classify;

    #[test]
    fn one_entry_per_bin_with_contiguous_ranges() {
        let values: Vec<f64> = (0..45).map(|i| 40_000.0 + f64::from(i) * 500.0).collect();
        let legend = legend_for(&classify(&values, BIN_COUNT).unwrap());

        assert_eq!(legend.len(), BIN_COUNT);
        assert_eq!(legend[0].min, Some(40_000.0));
        assert_eq!(legend[8].max, Some(62_000.0));
        assert_eq!(legend[3].color, "#e6f598");
        for pair in legend.windows(2) {
            assert_eq!(pair[0].max, pair[1].min);
        }
    }
}
