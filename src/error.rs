//! Error types shared by the backends, the operand algebra and the kernels.

use thiserror::Error;

/// Every failure the crate can surface.
///
/// Backends report [`Error::ShapeMismatch`], [`Error::InvalidAxis`] and
/// [`Error::NotScalar`]; kernels report [`Error::InvalidParameter`] at
/// construction time; [`Tensor`](crate::tensor::Tensor) constructors report
/// [`Error::InvalidShape`] and [`Error::ShapeOverflow`]. Errors are always
/// returned to the immediate caller and never replaced by a default value.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Two operands could not be broadcast to a common shape.
    #[error("cannot broadcast shapes {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        /// Shape of the left-hand operand.
        lhs: Vec<usize>,
        /// Shape of the right-hand operand.
        rhs: Vec<usize>,
    },
    /// A reduction axis does not index a dimension of the input.
    #[error("invalid axis {axis} for tensor with {ndim} dimensions")]
    InvalidAxis {
        /// The requested axis.
        axis: usize,
        /// Rank of the tensor the axis was applied to.
        ndim: usize,
    },
    /// A kernel was configured with a value outside its domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name, e.g. `alpha`.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the parameter must satisfy.
        reason: &'static str,
    },
    /// The element count does not match the requested shape.
    #[error("{len} elements cannot fill a tensor of shape {shape:?}")]
    InvalidShape {
        /// Number of elements supplied.
        len: usize,
        /// Requested shape.
        shape: Vec<usize>,
    },
    /// The requested shape describes more elements than can be addressed.
    #[error("shape {shape:?} overflows the addressable element count")]
    ShapeOverflow {
        /// Requested shape.
        shape: Vec<usize>,
    },
    /// A scalar was requested from a tensor holding more than one element.
    #[error("tensor of shape {shape:?} is not a scalar")]
    NotScalar {
        /// Shape of the offending tensor.
        shape: Vec<usize>,
    },
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
