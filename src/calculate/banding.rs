//! Fills band-stepped results into a dense per-rank array.

/// Replace every empty slot with the nearest populated slot before it.
///
/// Returns `None` when the first slot is empty, since nothing could be
/// carried into it.
pub fn carry_forward<T: Clone>(sparse: Vec<Option<T>>) -> Option<Vec<T>> {
    let mut dense = Vec::with_capacity(sparse.len());
    let mut last: Option<T> = None;

    for slot in sparse {
        if let Some(value) = slot {
            last = Some(value);
        }
        dense.push(last.clone()?);
    }

    Some(dense)
}

/// Band start for each band of `band_width` ranks below `num_ranks`.
pub fn band_starts(band_width: u32, num_ranks: u32) -> impl Iterator<Item = u32> {
    (0..num_ranks).step_by(band_width.max(1) as usize)
}

/// The ranks in the band starting at `start`, clipped to `num_ranks`.
pub fn band_ranks(start: u32, band_width: u32, num_ranks: u32) -> std::ops::Range<u32> {
    start.min(num_ranks)..start.saturating_add(band_width).min(num_ranks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carry_forward_fills_gaps() {
        let sparse = vec![Some(1), None, None, Some(4), None];
        assert_eq!(carry_forward(sparse), Some(vec![1, 1, 1, 4, 4]));
    }

    #[test]
    fn test_carry_forward_dense_input_unchanged() {
        let sparse = vec![Some("a"), Some("b")];
        assert_eq!(carry_forward(sparse), Some(vec!["a", "b"]));
    }

    #[test]
    fn test_carry_forward_requires_first_slot() {
        let sparse = vec![None, Some(2)];
        assert_eq!(carry_forward(sparse), None);
    }

    #[test]
    fn test_carry_forward_empty() {
        let sparse: Vec<Option<u8>> = Vec::new();
        assert_eq!(carry_forward(sparse), Some(Vec::new()));
    }

    #[test]
    fn test_band_starts() {
        assert_eq!(band_starts(5, 40).collect::<Vec<_>>(), vec![0, 5, 10, 15, 20, 25, 30, 35]);
        assert_eq!(band_starts(3, 10).collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert_eq!(band_starts(100, 40).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_band_ranks_clipped() {
        assert_eq!(band_ranks(35, 10, 40), 35..40);
        assert_eq!(band_ranks(0, 5, 40), 0..5);
        assert_eq!(band_ranks(45, 5, 40), 40..40);
    }
}
