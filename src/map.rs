use crate::{
    error::{OrogenError, OrogenResult},
    math,
};

/// A fixed-size 2-D grid of numeric cells, stored row-major.
///
/// Cells are value types; `Clone` is a deep copy and mutating one map never
/// affects another. Dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Map<T> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

/// A terrain height map. Values are conventionally in `[0, 1]`; the container
/// does not enforce the domain.
pub type HeightMap = Map<f64>;

impl<T: Copy + Default> Map<T> {
    /// Create a zero-filled map.
    pub fn new(height: usize, width: usize) -> OrogenResult<Self> {
        Self::filled(height, width, T::default())
    }

    pub fn filled(height: usize, width: usize, value: T) -> OrogenResult<Self> {
        let len = checked_len(height, width)?;
        Ok(Self {
            height,
            width,
            data: vec![value; len],
        })
    }

    /// Take ownership of a row-major buffer of exactly `height * width` cells.
    pub fn from_vec(height: usize, width: usize, data: Vec<T>) -> OrogenResult<Self> {
        let len = checked_len(height, width)?;
        if data.len() != len {
            return Err(OrogenError::invalid_dimension(format!(
                "buffer of {} cells does not fill a {height}x{width} map",
                data.len()
            )));
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Copy into a new map of possibly different dimensions. Cells common to
    /// both ranges are copied; new cells are zero; cells outside the new
    /// dimensions are truncated. No interpolation.
    pub fn resized(&self, height: usize, width: usize) -> OrogenResult<Self> {
        let len = checked_len(height, width)?;
        let mut data = vec![T::default(); len];
        let rows = self.height.min(height);
        let cols = self.width.min(width);
        for r in 0..rows {
            let src = &self.data[r * self.width..r * self.width + cols];
            data[r * width..r * width + cols].copy_from_slice(src);
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_in_range(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&T> {
        self.is_in_range(row, col)
            .then(|| &self.data[row * self.width + col])
    }

    /// The cell value, or `fallback` when `(row, col)` is out of range.
    pub fn value_or(&self, row: usize, col: usize, fallback: T) -> T {
        self.cell(row, col).copied().unwrap_or(fallback)
    }

    pub fn get(&self, row: usize, col: usize) -> OrogenResult<T> {
        self.cell(row, col)
            .copied()
            .ok_or(OrogenError::OutOfRange { row, col })
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> OrogenResult<()> {
        if !self.is_in_range(row, col) {
            return Err(OrogenError::OutOfRange { row, col });
        }
        self.data[row * self.width + col] = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Visit every cell exactly once, in row-major order.
    pub fn for_each(&self, mut visit: impl FnMut(usize, usize, &T)) {
        for row in 0..self.height {
            for col in 0..self.width {
                visit(row, col, &self.data[row * self.width + col]);
            }
        }
    }

    /// Visit every cell exactly once, in row-major order, with write access.
    pub fn for_each_mut(&mut self, mut visit: impl FnMut(usize, usize, &mut T)) {
        for row in 0..self.height {
            for col in 0..self.width {
                visit(row, col, &mut self.data[row * self.width + col]);
            }
        }
    }
}

impl Map<f64> {
    pub fn min_max(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    /// Clamp every cell into `[0, 1]`.
    pub fn clamp01(&mut self) {
        for v in &mut self.data {
            *v = math::clamp01(*v);
        }
    }

    /// Rescale `[min, max]` onto `[0, 1]`. A constant map is left unchanged.
    pub fn normalize(&mut self) {
        let (min, max) = self.min_max();
        if max <= min {
            return;
        }
        for v in &mut self.data {
            *v = math::normalize(*v, min, max);
        }
    }
}

fn checked_len(height: usize, width: usize) -> OrogenResult<usize> {
    if height == 0 || width == 0 {
        return Err(OrogenError::invalid_dimension(format!(
            "height and width must be > 0 (got {height}x{width})"
        )));
    }
    height.checked_mul(width).ok_or_else(|| {
        OrogenError::invalid_dimension(format!("map size {height}x{width} overflows"))
    })
}
