/// A bounded 2D grid addressed by `(x, y)`, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a grid from a row-major vector. Returns None if the length
    /// doesn't match `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Wrap a vector the caller has already sized to `width * height`.
    pub(crate) fn from_cells(width: usize, height: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), width * height, "{}x{} grid from {} cells", width, height, data.len());
        Self { width, height, data }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({}, {}) out of bounds", x, y);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// True if both grids have the same dimensions.
    pub fn same_size<U>(&self, other: &Tilemap<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Row-major view of the cells.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Produce a new grid of the same size by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Tilemap<U> {
        Tilemap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl Tilemap<f32> {
    /// Smallest and largest value in the grid. `None` for an empty grid.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Mean of all cells, 0.0 for an empty grid.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let map = Tilemap::from_fn(3, 2, |x, y| x + 10 * y);
        assert_eq!(map.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(*map.get(2, 1), 12);
    }

    #[test]
    fn test_iter_coordinates() {
        let map = Tilemap::from_fn(4, 3, |x, y| (x, y));
        for (x, y, &v) in map.iter() {
            assert_eq!((x, y), v);
        }
        assert_eq!(map.iter().count(), 12);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Tilemap::from_vec(2, 2, vec![0.0f32; 3]).is_none());
        assert!(Tilemap::from_vec(2, 2, vec![0.0f32; 4]).is_some());
    }

    #[test]
    fn test_value_range_and_mean() {
        let map = Tilemap::from_vec(2, 2, vec![0.25f32, -1.0, 3.0, 0.75]).unwrap();
        assert_eq!(map.value_range(), Some((-1.0, 3.0)));
        assert!((map.mean() - 0.75).abs() < 1e-6);

        let empty: Tilemap<f32> = Tilemap::new(0, 0);
        assert_eq!(empty.value_range(), None);
    }

    #[test]
    fn test_iter_mut_and_map() {
        let mut map = Tilemap::new_with(2, 2, 1.0f32);
        for (x, y, v) in map.iter_mut() {
            if (x, y) == (1, 0) {
                *v = 5.0;
            } else if (x, y) == (0, 1) {
                *v += 1.0;
            }
        }
        let doubled = map.map(|v| v * 2.0);
        assert_eq!(doubled.as_slice(), &[2.0, 10.0, 4.0, 2.0]);
        assert!(doubled.same_size(&map));
    }

    #[test]
    fn test_from_cells_keeps_layout() {
        let map = Tilemap::from_cells(3, 1, vec![1u8, 2, 3]);
        assert_eq!(*map.get(2, 0), 3);
        assert_eq!(map.as_slice(), &[1, 2, 3]);
    }
}
