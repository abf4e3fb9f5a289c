//! # The tensor module
//!
//! This module provides the realized, read-only multi-dimensional array that
//! kernels consume and produce. A [`Tensor`] is whatever its backend stores;
//! the wrapper only validates shapes before handing work to the backend.

use core::fmt;

use crate::{
    backend::{Backend, DefaultBackend},
    error::{Error, Result},
};

/// Creates a `Tensor` from nested arrays or vectors with a `vec!`-like syntax.
/// The data type of the tensor's elements is inferred from the literals.
///
/// # Examples
///
/// ```
/// use tensor_activations::tensor;
///
/// // A 1D Tensor
/// let v = tensor![1.0_f32, 2.0, 3.0];
///
/// // A 2D Tensor
/// let m = tensor![[1.0_f32, 2.0], [3.0, 4.0]];
///
/// assert_eq!(v.shape(), &[3]);
/// assert_eq!(m.shape(), &[2, 2]);
/// ```
#[cfg(feature = "ndarray-backend")]
#[macro_export]
macro_rules! tensor {
    ($($data:tt)+) => {
        $crate::tensor::Tensor::from(
            $crate::__ndarray::array!($($data)+).into_dyn()
        )
    };
}

/// A multi-dimensional array realized by the backend `B`.
///
/// A `Tensor` represents a grid of elements with a fixed shape. The number of
/// dimensions is determined at runtime. Tensors are never modified in place:
/// every kernel returns a new one.
pub struct Tensor<B = DefaultBackend>
where
    B: Backend,
{
    inner: B::Tensor,
}

/// Number of elements described by `shape`, or `None` when it does not fit
/// in an `isize`.
fn element_count(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1_usize, |count, &dim| count.checked_mul(dim))
        .filter(|&count| isize::try_from(count).is_ok())
}

impl<B> Tensor<B>
where
    B: Backend,
{
    /// Wraps a tensor already produced by the backend.
    #[inline]
    pub const fn from_inner(inner: B::Tensor) -> Self {
        Self { inner }
    }

    /// Creates a tensor from row-major `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] when `data.len()` does not equal the
    /// number of elements described by `shape`.
    #[inline]
    pub fn from_vec(data: Vec<B::Primitive>, shape: &[usize]) -> Result<Self> {
        if element_count(shape) != Some(data.len()) {
            return Err(Error::InvalidShape {
                len: data.len(),
                shape: shape.to_vec(),
            });
        }

        // SAFETY: The element count was checked against the shape above.
        let inner = unsafe { B::from_vec(data, shape) };
        Ok(Self { inner })
    }

    /// Creates a tensor of the given shape filled with ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeOverflow`] if the shape describes more elements
    /// than can be addressed.
    #[inline]
    pub fn ones(shape: &[usize]) -> Result<Self> {
        Self::checked_shape(shape)?;

        // SAFETY: The shape was validated by `checked_shape`.
        Ok(Self {
            inner: unsafe { B::ones(shape) },
        })
    }

    /// Creates a zero-dimensional tensor holding `value`.
    #[inline]
    pub fn scalar(backend: &B, value: B::Primitive) -> Self {
        Self {
            inner: backend.constant(value),
        }
    }

    /// Creates a tensor of the given shape filled with zeros.
    ///
    /// # Errors
    ///
    /// See [`Tensor::ones()`].
    #[inline]
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::checked_shape(shape)?;

        // SAFETY: The shape was validated by `checked_shape`.
        Ok(Self {
            inner: unsafe { B::zeros(shape) },
        })
    }

    /// Returns the backend representation.
    #[inline]
    pub const fn as_inner(&self) -> &B::Tensor {
        &self.inner
    }

    /// Consumes the wrapper, returning the backend representation.
    #[inline]
    pub fn into_inner(self) -> B::Tensor {
        self.inner
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        B::ndim(&self.inner)
    }

    /// Returns the shape as a slice of dimensions.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        B::shape(&self.inner)
    }

    /// Copies the elements out in row-major order.
    #[inline]
    pub fn to_vec(&self) -> Vec<B::Primitive> {
        B::to_vec(&self.inner)
    }

    fn checked_shape(shape: &[usize]) -> Result<()> {
        element_count(shape).map(|_| ()).ok_or_else(|| Error::ShapeOverflow {
            shape: shape.to_vec(),
        })
    }
}

impl<B> Clone for Tensor<B>
where
    B: Backend,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B> fmt::Debug for Tensor<B>
where
    B: Backend,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor").field("inner", &self.inner).finish()
    }
}

impl<B> PartialEq for Tensor<B>
where
    B: Backend,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

/// Provides interoperability with the `ndarray` crate.
///
/// Enables a direct and efficient conversion from `ndarray`'s
/// dynamically-dimensioned array type into a `Tensor`.
#[cfg(feature = "ndarray-backend")]
impl<T> From<ndarray::ArrayD<T>> for Tensor<crate::backend::ndarray::NdarrayBackend<T>>
where
    crate::backend::ndarray::NdarrayBackend<T>: Backend<Tensor = ndarray::ArrayD<T>>,
{
    #[inline]
    fn from(value: ndarray::ArrayD<T>) -> Self {
        Self { inner: value }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        backend::ndarray::NdarrayBackend,
        error::Error,
        tensor::Tensor,
    };

    type CpuTensor = Tensor<NdarrayBackend<f32>>;

    #[test]
    fn tensor_macro_1d() {
        let tensor = tensor![1.0_f32, 2.0];
        let expected = Tensor::from(ndarray::arr1(&[1.0_f32, 2.0]).into_dyn());

        assert_eq!(tensor, expected);
    }

    #[test]
    fn tensor_macro_2d() {
        let tensor = tensor![[1.0_f32, 2.0], [3.0, 4.0]];
        let expected = Tensor::from(
            ndarray::arr2(&[[1.0_f32, 2.0], [3.0, 4.0]]).into_dyn(),
        );

        assert_eq!(tensor, expected);
    }

    #[test]
    fn tensor_macro_3d() {
        let tensor =
            tensor![[[1.0_f32, 2.0], [3.0, 4.0]], [[5.0, 6.0], [7.0, 8.0]]];

        assert_eq!(tensor.shape(), &[2, 2, 2]);
        assert_eq!(tensor.to_vec(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn from_vec_accepts_matching_length() {
        let tensor = CpuTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2])
            .unwrap();

        assert_eq!(tensor.ndim(), 2);
        assert_eq!(tensor.to_vec(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn from_vec_rejects_mismatched_length() {
        let result = CpuTensor::from_vec(vec![1.0, 2.0, 3.0], &[2, 2]);

        assert_eq!(
            result,
            Err(Error::InvalidShape {
                len: 3,
                shape: vec![2, 2],
            })
        );
    }

    #[test]
    fn zeros_and_ones_have_requested_shape() {
        let zeros = CpuTensor::zeros(&[3, 1]).unwrap();
        let ones = CpuTensor::ones(&[2]).unwrap();

        assert_eq!(zeros.shape(), &[3, 1]);
        assert!(zeros.to_vec().iter().all(|&value| value == 0.0));
        assert_eq!(ones.to_vec(), [1.0, 1.0]);
    }

    #[test]
    fn zeros_rejects_overflowing_shape() {
        assert_eq!(
            CpuTensor::zeros(&[usize::MAX, 2]),
            Err(Error::ShapeOverflow {
                shape: vec![usize::MAX, 2],
            })
        );
    }

    #[test]
    fn scalar_is_zero_dimensional() {
        let backend = NdarrayBackend::new();
        let scalar = CpuTensor::scalar(&backend, 3.0);

        assert_eq!(scalar.ndim(), 0);
        assert_eq!(scalar.to_vec(), [3.0]);
    }
}
