//! Nearest-index lookup on coordinate axes and the index-based cropping built
//! on top of it.
//!
//! All crops are half-open: a range `[lo, hi]` in axis units selects the
//! samples `nearest_index(lo)..nearest_index(hi)`, so the sample closest to
//! `hi` is itself excluded.

use ndarray::{ self as nd, s };
use num_traits::Float;
use crate::{
    error::{ IndexError, PlotError, PlotResult },
    utils::FExtremum,
};

/// Find the index of the element of `axis` closest to `value`.
///
/// Ties are resolved to the lowest index. NaN elements are never selected
/// unless every element is NaN, in which case `0` is returned.
pub fn nearest_index<'a, F, I>(axis: I, value: F) -> Result<usize, IndexError>
where
    F: Float + 'a,
    I: IntoIterator<Item = &'a F>,
{
    let mut iter = axis.into_iter().enumerate();
    let (_, first) = iter.next().ok_or(IndexError::EmptyAxis)?;
    let mut best: (usize, F) = (0, (*first - value).abs());
    for (k, x) in iter {
        let d = (*x - value).abs();
        if d < best.1 || (best.1.is_nan() && !d.is_nan()) {
            best = (k, d);
        }
    }
    Ok(best.0)
}

/// A rectangle `(xmin, xmax, ymin, ymax)` in axis-coordinate units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    /// Create a new `Extent`.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    /// The full data range covered by a horizontal and a vertical axis.
    pub fn of_axes(
        h_axis: nd::ArrayView1<f64>,
        v_axis: nd::ArrayView1<f64>,
    ) -> PlotResult<Self>
    {
        let (xmin, xmax) = h_axis.frange().ok_or(IndexError::EmptyAxis)?;
        let (ymin, ymax) = v_axis.frange().ok_or(IndexError::EmptyAxis)?;
        Ok(Self { xmin, xmax, ymin, ymax })
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.xmin, self.xmax, self.ymin, self.ymax)
    }
}

impl From<(f64, f64, f64, f64)> for Extent {
    fn from(ext: (f64, f64, f64, f64)) -> Self {
        Self::new(ext.0, ext.1, ext.2, ext.3)
    }
}

/// A half-open index range `start..end` resolved from a coordinate range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CropRange {
    pub start: usize,
    pub end: usize,
}

impl CropRange {
    /// Resolve the coordinate range `[lo, hi]` on `axis` to indices.
    ///
    /// Bounds outside the axis range are clamped by the nearest-index lookup
    /// (with a warning). Fails if the resulting range selects no samples.
    pub fn resolve(
        axis: nd::ArrayView1<f64>,
        lo: f64,
        hi: f64,
        axis_name: &'static str,
    ) -> PlotResult<Self>
    {
        let (amin, amax) = axis.frange().ok_or(IndexError::EmptyAxis)?;
        for bound in [lo, hi] {
            if bound < amin || bound > amax {
                log::warn!(
                    target: "sliceplots",
                    "{} bound {} lies outside the axis range [{}, {}]; clamping",
                    axis_name, bound, amin, amax,
                );
            }
        }
        let start = nearest_index(axis, lo)?;
        let end = nearest_index(axis, hi)?;
        if end <= start {
            return Err(PlotError::EmptyCrop { axis: axis_name });
        }
        log::debug!(
            target: "sliceplots",
            "{} crop: [{}, {}] -> indices {}..{}",
            axis_name, lo, hi, start, end,
        );
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize { self.end - self.start }

    pub fn is_empty(&self) -> bool { self.end <= self.start }
}

/// Copy the part of a 1D array selected by `range`.
pub fn crop_axis(axis: nd::ArrayView1<f64>, range: CropRange)
    -> nd::Array1<f64>
{
    axis.slice(s![range.start..range.end]).to_owned()
}

/// Copy the part of a 2D field selected by a row and a column range.
pub fn crop_field(
    field: nd::ArrayView2<f64>,
    rows: CropRange,
    cols: CropRange,
) -> nd::Array2<f64>
{
    field.slice(s![rows.start..rows.end, cols.start..cols.end]).to_owned()
}

/// Check that a field is indexed `[row, column]` by `v_axis` and `h_axis`.
pub fn check_field_shape(
    field: nd::ArrayView2<f64>,
    h_axis: nd::ArrayView1<f64>,
    v_axis: nd::ArrayView1<f64>,
) -> PlotResult<()>
{
    let (rows, cols) = field.dim();
    if rows != v_axis.len() || cols != h_axis.len() {
        return Err(PlotError::ShapeMismatch {
            rows,
            cols,
            v_len: v_axis.len(),
            h_len: h_axis.len(),
        });
    }
    Ok(())
}
