//! Provides the `FExtremum` trait for floating-point collections.

use ndarray as nd;

/// Trait to find the min or max of a collection of floating-point values
/// (since `f64` and `f32` do not implement `Ord`).
///
/// NaN values are skipped; `None` is returned if no non-NaN values exist.
pub trait FExtremum<F> {
    fn fmax(&self) -> Option<F>;

    fn fmin(&self) -> Option<F>;

    /// Return `(min, max)` in a single pass.
    fn frange(&self) -> Option<(F, F)>;
}

macro_rules! impl_fextremum {
    ( $f:ty ) => {
        fn fmax(&self) -> Option<$f> {
            return self.iter()
                .filter(|v| !v.is_nan())
                .max_by(|l, r| {
                    l.partial_cmp(r)
                        .unwrap_or(std::cmp::Ordering::Greater)
                })
                .copied();
        }

        fn fmin(&self) -> Option<$f> {
            return self.iter()
                .filter(|v| !v.is_nan())
                .min_by(|l, r| {
                    l.partial_cmp(r)
                        .unwrap_or(std::cmp::Ordering::Less)
                })
                .copied();
        }

        fn frange(&self) -> Option<($f, $f)> {
            return self.iter()
                .filter(|v| !v.is_nan())
                .fold(None, |acc: Option<($f, $f)>, v| {
                    match acc {
                        None => Some((*v, *v)),
                        Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
                    }
                });
        }
    }
}

macro_rules! impl_fextremum_simple {
    ( $hasiter:ty, $f:ty ) => {
        impl FExtremum<$f> for $hasiter {
            impl_fextremum!($f);
        }
    }
}

impl_fextremum_simple!(Vec<f64>, f64);
impl_fextremum_simple!(Vec<f32>, f32);
impl_fextremum_simple!([f64], f64);
impl_fextremum_simple!([f32], f32);

macro_rules! impl_fextremum_ndarray {
    ( $f:ty ) => {
        impl<S, D> FExtremum<$f> for nd::ArrayBase<S, D>
        where
            S: nd::Data<Elem = $f>,
            D: nd::Dimension,
        {
            impl_fextremum!($f);
        }
    }
}

impl_fextremum_ndarray!(f64);
impl_fextremum_ndarray!(f32);
