//! [`ndarray`] crate backend.

use core::{fmt::Debug, marker::PhantomData};

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use num_traits::Float;

use crate::{
    backend::Backend,
    error::{Error, Result},
};

/// Marker type for the [`ndarray`] backend.
///
/// Holds no state, so every instance behaves identically and may be shared
/// freely between threads.
#[derive(Debug)]
pub struct NdarrayBackend<T> {
    _marker: PhantomData<T>,
}

impl<T> NdarrayBackend<T> {
    /// Creates a new handle.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for NdarrayBackend<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the broadcast of two shapes by the trailing-dimension rule: the
/// shorter shape is padded with ones on the left and every pair of sizes must
/// either match or contain a one.
fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = Vec::with_capacity(ndim);

    for offset in 1..=ndim {
        let left = lhs.len().checked_sub(offset).map_or(1, |i| lhs[i]);
        let right = rhs.len().checked_sub(offset).map_or(1, |i| rhs[i]);

        let size = if left == right || right == 1 {
            left
        } else if left == 1 {
            right
        } else {
            return Err(Error::ShapeMismatch {
                lhs: lhs.to_vec(),
                rhs: rhs.to_vec(),
            });
        };
        shape.push(size);
    }

    shape.reverse();
    Ok(shape)
}

/// Applies `op` pairwise after broadcasting both operands to their common
/// shape.
fn zip_broadcast<T, F>(
    lhs: &ArrayD<T>,
    rhs: &ArrayD<T>,
    op: F,
) -> Result<ArrayD<T>>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let shape = broadcast_shape(lhs.shape(), rhs.shape())?;
    let mismatch = || Error::ShapeMismatch {
        lhs: lhs.shape().to_vec(),
        rhs: rhs.shape().to_vec(),
    };

    let lhs_view = lhs.broadcast(IxDyn(&shape)).ok_or_else(mismatch)?;
    let rhs_view = rhs.broadcast(IxDyn(&shape)).ok_or_else(mismatch)?;

    Ok(Zip::from(lhs_view)
        .and(rhs_view)
        .map_collect(|&left, &right| op(left, right)))
}

fn check_axis<T>(tensor: &ArrayD<T>, axis: usize) -> Result<()> {
    if axis < tensor.ndim() {
        Ok(())
    } else {
        Err(Error::InvalidAxis {
            axis,
            ndim: tensor.ndim(),
        })
    }
}

fn restore_axis<T>(
    reduced: ArrayD<T>,
    axis: usize,
    keepdims: bool,
) -> ArrayD<T> {
    if keepdims {
        reduced.insert_axis(Axis(axis))
    } else {
        reduced
    }
}

impl<T> Backend for NdarrayBackend<T>
where
    T: Float + Debug + Send + Sync + 'static,
{
    type Primitive = T;
    type Tensor = ArrayD<T>;

    #[inline]
    fn add(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor> {
        zip_broadcast(lhs, rhs, |left, right| left + right)
    }

    #[inline]
    fn constant(&self, value: Self::Primitive) -> Self::Tensor {
        ArrayD::from_elem(IxDyn(&[]), value)
    }

    #[inline]
    fn div(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor> {
        zip_broadcast(lhs, rhs, |left, right| left / right)
    }

    #[inline]
    fn exp(&self, tensor: &Self::Tensor) -> Self::Tensor {
        tensor.mapv(Float::exp)
    }

    #[inline]
    unsafe fn from_vec(
        data: Vec<Self::Primitive>,
        shape: &[usize],
    ) -> Self::Tensor {
        // SAFETY: The caller has already guaranteed that the shape is valid
        // and the element count in `data` matches the shape's requirements.
        unsafe { ArrayD::from_shape_vec_unchecked(IxDyn(shape), data) }
    }

    #[inline]
    fn maximum(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor> {
        zip_broadcast(lhs, rhs, Float::max)
    }

    #[inline]
    fn minimum(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor> {
        zip_broadcast(lhs, rhs, Float::min)
    }

    #[inline]
    fn mul(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor> {
        zip_broadcast(lhs, rhs, |left, right| left * right)
    }

    #[inline]
    fn ndim(tensor: &Self::Tensor) -> usize {
        tensor.ndim()
    }

    #[inline]
    fn neg(&self, tensor: &Self::Tensor) -> Self::Tensor {
        tensor.mapv(|value| -value)
    }

    #[inline]
    unsafe fn ones(shape: &[usize]) -> Self::Tensor {
        ArrayD::ones(IxDyn(shape))
    }

    #[inline]
    fn recip(&self, tensor: &Self::Tensor) -> Self::Tensor {
        tensor.mapv(Float::recip)
    }

    fn reduce_max(
        &self,
        tensor: &Self::Tensor,
        axis: usize,
        keepdims: bool,
    ) -> Result<Self::Tensor> {
        check_axis(tensor, axis)?;

        let reduced = tensor.map_axis(Axis(axis), |lane| {
            lane.iter().copied().fold(T::neg_infinity(), Float::max)
        });

        Ok(restore_axis(reduced, axis, keepdims))
    }

    fn reduce_sum(
        &self,
        tensor: &Self::Tensor,
        axis: usize,
        keepdims: bool,
    ) -> Result<Self::Tensor> {
        check_axis(tensor, axis)?;

        Ok(restore_axis(tensor.sum_axis(Axis(axis)), axis, keepdims))
    }

    #[inline]
    fn scalar_value(&self, tensor: &Self::Tensor) -> Result<Self::Primitive> {
        match tensor.iter().next() {
            Some(&value) if tensor.len() == 1 => Ok(value),
            _ => Err(Error::NotScalar {
                shape: tensor.shape().to_vec(),
            }),
        }
    }

    #[inline]
    fn shape(tensor: &Self::Tensor) -> &[usize] {
        tensor.shape()
    }

    #[inline]
    fn sub(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor> {
        zip_broadcast(lhs, rhs, |left, right| left - right)
    }

    #[inline]
    fn to_vec(tensor: &Self::Tensor) -> Vec<Self::Primitive> {
        tensor.iter().copied().collect()
    }

    #[inline]
    unsafe fn zeros(shape: &[usize]) -> Self::Tensor {
        ArrayD::zeros(IxDyn(shape))
    }
}
