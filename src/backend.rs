//! The generic computational backend.
//!
//! This module provides the [`Backend`] trait which defines the complete
//! contract for the elementwise primitives, reductions and tensor creation the
//! activation kernels are written against.
//!
//! The default backend is [`ndarray`](self::ndarray) and can be swapped out
//! using crate feature flags. A process-wide default handle lives in
//! [`global`].

use core::fmt::Debug;

use crate::error::Result;

pub mod global;
#[cfg(feature = "ndarray-backend")]
pub mod ndarray;
#[cfg(all(test, feature = "ndarray-backend"))]
pub(crate) mod testing;

/// A trait that defines the contract for tensor operations that every
/// backend must fulfill.
///
/// Kernels never name a concrete runtime type; they only call into this
/// trait through a borrowed handle, so any implementation (including a mock
/// used in tests) can be substituted. All functions are pure: they never
/// mutate their inputs and always return a freshly produced tensor.
///
/// Binary operations broadcast their operands by the trailing-dimension rule
/// and report [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch)
/// when the shapes are incompatible.
///
/// # Thread safety
///
/// Handles must be `Send + Sync`. A handle is never mutated by the operations
/// below, so a single instance may serve any number of threads at once.
///
/// Some methods in this trait are marked `unsafe` because they do not perform
/// any invariant checks (e.g., for element counts). The caller (typically the
/// [`Tensor`](crate::tensor::Tensor) wrapper) is responsible for ensuring all
/// preconditions are met before calling these functions.
pub trait Backend: Debug + Send + Sync {
    /// The element type stored in the backend's tensors.
    type Primitive: Copy + Debug + PartialEq + Send + Sync;

    /// The concrete tensor representation provided by the backend.
    type Tensor: Clone + Debug + PartialEq + Send + Sync;

    /// Elementwise `lhs + rhs`.
    fn add(&self, lhs: &Self::Tensor, rhs: &Self::Tensor)
    -> Result<Self::Tensor>;

    /// Creates a zero-dimensional tensor holding `value`.
    fn constant(&self, value: Self::Primitive) -> Self::Tensor;

    /// Elementwise `lhs / rhs`.
    fn div(&self, lhs: &Self::Tensor, rhs: &Self::Tensor)
    -> Result<Self::Tensor>;

    /// Elementwise natural exponential.
    fn exp(&self, tensor: &Self::Tensor) -> Self::Tensor;

    /// Creates a tensor from row-major `data` with the given shape.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the product of the axis lengths in `shape`
    /// equals `data.len()` and does not overflow [`isize::MAX`].
    unsafe fn from_vec(
        data: Vec<Self::Primitive>,
        shape: &[usize],
    ) -> Self::Tensor;

    /// Elementwise maximum of `lhs` and `rhs`.
    fn maximum(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor>;

    /// Elementwise minimum of `lhs` and `rhs`.
    fn minimum(
        &self,
        lhs: &Self::Tensor,
        rhs: &Self::Tensor,
    ) -> Result<Self::Tensor>;

    /// Elementwise `lhs * rhs`.
    fn mul(&self, lhs: &Self::Tensor, rhs: &Self::Tensor)
    -> Result<Self::Tensor>;

    /// Returns the number of dimensions of the tensor.
    fn ndim(tensor: &Self::Tensor) -> usize;

    /// Elementwise sign flip.
    fn neg(&self, tensor: &Self::Tensor) -> Self::Tensor;

    /// Creates a tensor with all elements set to one, with the given shape.
    ///
    /// # Safety
    ///
    /// See the safety notes for [`Backend::zeros()`].
    unsafe fn ones(shape: &[usize]) -> Self::Tensor;

    /// Elementwise reciprocal `1 / x`.
    fn recip(&self, tensor: &Self::Tensor) -> Self::Tensor;

    /// Maximum along `axis`. With `keepdims` the reduced axis is kept with
    /// length one, otherwise it is removed.
    ///
    /// Returns [`Error::InvalidAxis`](crate::error::Error::InvalidAxis) when
    /// `axis` is not below the tensor's rank.
    fn reduce_max(
        &self,
        tensor: &Self::Tensor,
        axis: usize,
        keepdims: bool,
    ) -> Result<Self::Tensor>;

    /// Sum along `axis`, with the same axis handling as
    /// [`Backend::reduce_max()`].
    fn reduce_sum(
        &self,
        tensor: &Self::Tensor,
        axis: usize,
        keepdims: bool,
    ) -> Result<Self::Tensor>;

    /// Reads the only element of a one-element tensor.
    fn scalar_value(&self, tensor: &Self::Tensor) -> Result<Self::Primitive>;

    /// Returns the shape of the tensor as a slice of dimensions.
    fn shape(tensor: &Self::Tensor) -> &[usize];

    /// Elementwise `lhs - rhs`.
    fn sub(&self, lhs: &Self::Tensor, rhs: &Self::Tensor)
    -> Result<Self::Tensor>;

    /// Copies the elements out in row-major order.
    fn to_vec(tensor: &Self::Tensor) -> Vec<Self::Primitive>;

    /// Creates a tensor with all elements set to zero, with the given shape.
    ///
    /// # Safety
    ///
    /// The caller must ensure that no dimensions overflow `isize`, and the
    /// product of axis lengths does not overflow [`isize::MAX`].
    unsafe fn zeros(shape: &[usize]) -> Self::Tensor;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "ndarray-backend")] {
        /// Dynamically configured type alias for the selected backend, based
        /// on crate feature flags.
        pub type SelectedBackend<T> = self::ndarray::NdarrayBackend<T>;
    } else {
        compile_error!(
            "A backend feature must be enabled. Available: `ndarray-backend`"
        );
    }
}

/// The backend behind the process-wide default handle and the `invoke`
/// call shapes of the kernels.
pub type DefaultBackend = SelectedBackend<f32>;
