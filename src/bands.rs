//! Height band classification.
//!
//! A band table is an ordered list of `[min, max]` height ranges, each tagged
//! with a tile id. Cells are classified by testing bands in order; the first
//! band whose range contains the height wins, so a value sitting exactly on a
//! shared boundary belongs to the earlier band.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::tilemap::Tilemap;

/// One height range mapped to a tile id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightBand {
    pub max: f32,
    pub min: f32,
    pub id: usize,
}

impl HeightBand {
    pub fn contains(&self, height: f32) -> bool {
        height <= self.max && height >= self.min
    }
}

/// Ordered band table. Ids always equal the band's position, so per-band
/// counts can be indexed by id. Tables read from JSON go through the same
/// validation as `from_bounds`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HeightBand>", into = "Vec<HeightBand>")]
pub struct HeightBands {
    bands: Vec<HeightBand>,
}

impl HeightBands {
    /// `count` equal slices of [0, 1], highest first. Band 0 ends at 1.0 and
    /// the last band ends at 0.0.
    pub fn evenly_distributed(count: usize) -> Result<Self, GenerationError> {
        if count == 0 {
            return Err(GenerationError::InvalidArgument(
                "need at least one height band".to_string(),
            ));
        }

        let piece = 1.0 / count as f32;
        let mut current = 1.0f32;
        let mut bands = Vec::with_capacity(count);

        for id in 0..count {
            let min = if id == count - 1 { 0.0 } else { (current - piece).max(0.0) };
            bands.push(HeightBand { max: current, min, id });
            current = min;
        }

        Ok(Self { bands })
    }

    /// Build from explicit `(max, min)` pairs; ids follow the slice order.
    pub fn from_bounds(bounds: &[(f32, f32)]) -> Result<Self, GenerationError> {
        let bands = bounds
            .iter()
            .enumerate()
            .map(|(id, &(max, min))| HeightBand { max, min, id })
            .collect();
        Self::from_table(bands)
    }

    /// Validate a complete table: at least one band, bounds inside [0, 1]
    /// with `min <= max`, and ids numbered `0..len` in order.
    pub fn from_table(bands: Vec<HeightBand>) -> Result<Self, GenerationError> {
        if bands.is_empty() {
            return Err(GenerationError::InvalidArgument(
                "need at least one height band".to_string(),
            ));
        }

        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        for (position, band) in bands.iter().enumerate() {
            if band.id != position {
                return Err(GenerationError::InvalidArgument(format!(
                    "band at position {} has id {}, ids must run 0..{}",
                    position,
                    band.id,
                    bands.len()
                )));
            }
            if !in_unit(band.max) || !in_unit(band.min) || band.min > band.max {
                return Err(GenerationError::InvalidArgument(format!(
                    "band {} has bounds [{}, {}], expected 0 <= min <= max <= 1",
                    band.id, band.min, band.max
                )));
            }
        }

        Ok(Self { bands })
    }

    /// Close gaps left by manual edits: every band after the first starts
    /// where the previous one ends. A band whose range would invert is
    /// collapsed onto its new top.
    pub fn align(&mut self) {
        for i in 1..self.bands.len() {
            let top = self.bands[i - 1].min;
            let band = &mut self.bands[i];
            band.max = top;
            band.min = band.min.min(top);
        }
    }

    pub fn bands(&self) -> &[HeightBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Id of the first band containing `height`.
    pub fn classify(&self, height: f32) -> Option<usize> {
        self.bands.iter().find(|band| band.contains(height)).map(|band| band.id)
    }

    /// Classify every cell of a height grid.
    pub fn classify_grid(&self, grid: &Tilemap<f32>) -> Tilemap<Option<usize>> {
        grid.map(|&h| self.classify(h))
    }

    /// Number of cells per band id, plus unclassified cells last. Ids that
    /// don't belong to this table are counted as unclassified.
    pub fn histogram(&self, classified: &Tilemap<Option<usize>>) -> Vec<usize> {
        let slots = self.bands.len();
        let mut counts = vec![0usize; slots + 1];
        for (_, _, cell) in classified.iter() {
            match cell {
                Some(id) if *id < slots => counts[*id] += 1,
                _ => counts[slots] += 1,
            }
        }
        counts
    }
}

impl TryFrom<Vec<HeightBand>> for HeightBands {
    type Error = GenerationError;

    fn try_from(bands: Vec<HeightBand>) -> Result<Self, Self::Error> {
        Self::from_table(bands)
    }
}

impl From<HeightBands> for Vec<HeightBand> {
    fn from(table: HeightBands) -> Self {
        table.bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_bands_partition_unit_range() {
        let bands = HeightBands::evenly_distributed(4).unwrap();
        let b = bands.bands();
        assert_eq!(b.len(), 4);
        assert_eq!(b[0].max, 1.0);
        assert_eq!(b[3].min, 0.0);
        for pair in b.windows(2) {
            assert_eq!(pair[0].min, pair[1].max);
        }
        assert!((b[0].min - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_every_height_is_classified() {
        for count in 1..=10 {
            let bands = HeightBands::evenly_distributed(count).unwrap();
            for i in 0..=1000 {
                let h = i as f32 / 1000.0;
                assert!(bands.classify(h).is_some(), "{} bands, h = {}", count, h);
            }
        }
    }

    #[test]
    fn test_boundary_goes_to_earlier_band() {
        let bands = HeightBands::evenly_distributed(2).unwrap();
        assert_eq!(bands.classify(0.5), Some(0));
        assert_eq!(bands.classify(0.49), Some(1));
        assert_eq!(bands.classify(1.0), Some(0));
        assert_eq!(bands.classify(0.0), Some(1));
    }

    #[test]
    fn test_gap_is_unclassified() {
        let bands = HeightBands::from_bounds(&[(1.0, 0.6), (0.4, 0.0)]).unwrap();
        assert_eq!(bands.classify(0.5), None);
        assert_eq!(bands.classify(0.7), Some(0));
    }

    #[test]
    fn test_align_closes_gaps() {
        let mut bands = HeightBands::from_bounds(&[(1.0, 0.6), (0.4, 0.2), (0.1, 0.0)]).unwrap();
        bands.align();
        let b = bands.bands();
        assert_eq!(b[1].max, 0.6);
        assert_eq!(b[2].max, 0.2);
        assert_eq!(bands.classify(0.5), Some(1));
        assert_eq!(bands.classify(0.15), Some(2));
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(HeightBands::evenly_distributed(0).is_err());
        assert!(HeightBands::from_bounds(&[]).is_err());
        assert!(HeightBands::from_bounds(&[(0.2, 0.5)]).is_err());
        assert!(HeightBands::from_bounds(&[(1.5, 0.0)]).is_err());
        assert!(HeightBands::from_bounds(&[(f32::NAN, 0.0)]).is_err());
    }

    #[test]
    fn test_table_ids_must_follow_position() {
        let band = |max, min, id| HeightBand { max, min, id };
        assert!(HeightBands::from_table(vec![band(1.0, 0.5, 0), band(0.5, 0.0, 1)]).is_ok());

        for table in [
            vec![band(1.0, 0.0, usize::MAX)],
            vec![band(1.0, 0.5, 1), band(0.5, 0.0, 0)],
            vec![band(1.0, 0.5, 0), band(0.5, 0.0, 0)],
        ] {
            assert!(matches!(
                HeightBands::try_from(table),
                Err(GenerationError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_align_keeps_ranges_ordered() {
        let mut bands = HeightBands::from_bounds(&[(1.0, 0.3), (0.9, 0.5), (0.2, 0.0)]).unwrap();
        bands.align();
        let b = bands.bands();
        assert_eq!((b[1].max, b[1].min), (0.3, 0.3));
        assert_eq!(b[2].max, 0.3);
        assert!(HeightBands::from_table(b.to_vec()).is_ok());
    }

    #[test]
    fn test_histogram_counts_foreign_ids_as_unclassified() {
        let bands = HeightBands::evenly_distributed(2).unwrap();
        let classified = Tilemap::from_fn(3, 1, |x, _| [Some(0), Some(7), None][x]);
        assert_eq!(bands.histogram(&classified), vec![1, 0, 2]);
    }

    #[test]
    fn test_classify_grid_and_histogram() {
        let grid = Tilemap::from_vec(2, 2, vec![0.9f32, 0.1, 0.6, 0.4]).unwrap();
        let bands = HeightBands::evenly_distributed(2).unwrap();
        let classified = bands.classify_grid(&grid);
        assert_eq!(classified.as_slice(), &[Some(0), Some(1), Some(0), Some(1)]);
        assert_eq!(bands.histogram(&classified), vec![2, 2, 0]);
    }
}
