//! Elementwise activation kernels.
//!
//! Every kernel is a small immutable configuration value implementing
//! [`Activation`]. Kernels are written purely against the
//! [operand algebra](crate::operand), so they run on any [`Backend`] whose
//! element type is a float. Each kernel offers three call shapes:
//!
//! - [`Activation::apply()`] with an explicit backend handle,
//! - [`ActivationExt::invoke()`] on the process-wide default backend,
//! - [`ActivationExt::invoke_scalar()`] on a single value.
//!
//! Kernels hold no mutable state: applying the same kernel twice to the same
//! input yields bit-identical output, and a kernel may be shared between
//! threads as long as the backend handle allows it.

use core::fmt;

use num_traits::Float;

use crate::{
    backend::{Backend, DefaultBackend, global},
    error::{Error, Result},
    operand::Operand,
    tensor::Tensor,
};

mod celu;
mod relu;
mod sigmoid;
mod softmax;
mod swish;
mod tanh;

pub use celu::Celu;
pub use relu::Relu;
pub use sigmoid::Sigmoid;
pub use softmax::Softmax;
pub use swish::Swish;
pub use tanh::Tanh;

/// An elementwise activation over tensors produced by the backend `B`.
pub trait Activation<B>
where
    B: Backend,
{
    /// Short lowercase name used in logs and [`fmt::Display`] output.
    fn name(&self) -> &'static str;

    /// Builds the activation on top of `input` without realizing it.
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B>;

    /// Applies the activation to `input` using `backend`.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by the backend while evaluating the
    /// expression, unchanged.
    #[inline]
    fn apply(&self, backend: &B, input: &Tensor<B>) -> Result<Tensor<B>> {
        log::trace!(
            "applying {} to tensor of shape {:?}",
            self.name(),
            input.shape()
        );

        self.forward(Operand::from_tensor(backend, input)).materialize()
    }
}

/// The call shapes that go through the process-wide default backend.
///
/// Implemented for every activation over [`DefaultBackend`].
pub trait ActivationExt: Activation<DefaultBackend> {
    /// Applies the activation to `input` using the default backend.
    ///
    /// # Errors
    ///
    /// See [`Activation::apply()`].
    #[inline]
    fn invoke(
        &self,
        input: &Tensor<DefaultBackend>,
    ) -> Result<Tensor<DefaultBackend>> {
        let backend = global::default_backend();
        self.apply(&backend, input)
    }

    /// Applies the activation to a single value.
    ///
    /// The value is treated as a one-element vector, so axis-based kernels
    /// such as [`Softmax`] accept it with axis `0`.
    ///
    /// # Errors
    ///
    /// See [`Activation::apply()`].
    #[inline]
    fn invoke_scalar(&self, value: f32) -> Result<f32> {
        let backend = global::default_backend();
        let input = Tensor::from_vec(vec![value], &[1])?;

        let output = self.apply(&backend, &input)?;
        backend.scalar_value(output.as_inner())
    }
}

impl<A> ActivationExt for A where A: Activation<DefaultBackend> + ?Sized {}

/// Rejects parameters that are NaN or infinite.
fn check_finite<T>(name: &'static str, value: T) -> Result<T>
where
    T: Float,
{
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid_parameter(name, value, "must be finite"))
    }
}

fn invalid_parameter<T>(
    name: &'static str,
    value: T,
    reason: &'static str,
) -> Error
where
    T: Float,
{
    Error::InvalidParameter {
        name,
        value: value.to_f64().unwrap_or(f64::NAN),
        reason,
    }
}

/// Any of the six kernels, selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum ActivationKind<T = f32> {
    /// See [`Sigmoid`].
    Sigmoid(Sigmoid),
    /// See [`Tanh`].
    Tanh(Tanh),
    /// See [`Relu`].
    Relu(Relu),
    /// See [`Swish`].
    Swish(Swish<T>),
    /// See [`Celu`].
    Celu(Celu<T>),
    /// See [`Softmax`].
    Softmax(Softmax),
}

impl<B> Activation<B> for ActivationKind<B::Primitive>
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        match *self {
            Self::Sigmoid(ref kernel) => Activation::<B>::name(kernel),
            Self::Tanh(ref kernel) => Activation::<B>::name(kernel),
            Self::Relu(ref kernel) => Activation::<B>::name(kernel),
            Self::Swish(ref kernel) => Activation::<B>::name(kernel),
            Self::Celu(ref kernel) => Activation::<B>::name(kernel),
            Self::Softmax(ref kernel) => Activation::<B>::name(kernel),
        }
    }

    #[inline]
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        match *self {
            Self::Sigmoid(ref kernel) => kernel.forward(input),
            Self::Tanh(ref kernel) => kernel.forward(input),
            Self::Relu(ref kernel) => kernel.forward(input),
            Self::Swish(ref kernel) => kernel.forward(input),
            Self::Celu(ref kernel) => kernel.forward(input),
            Self::Softmax(ref kernel) => kernel.forward(input),
        }
    }

    #[inline]
    fn apply(&self, backend: &B, input: &Tensor<B>) -> Result<Tensor<B>> {
        match *self {
            Self::Sigmoid(ref kernel) => kernel.apply(backend, input),
            Self::Tanh(ref kernel) => kernel.apply(backend, input),
            Self::Relu(ref kernel) => kernel.apply(backend, input),
            Self::Swish(ref kernel) => kernel.apply(backend, input),
            Self::Celu(ref kernel) => kernel.apply(backend, input),
            Self::Softmax(ref kernel) => kernel.apply(backend, input),
        }
    }
}

impl<T> fmt::Display for ActivationKind<T>
where
    T: fmt::Display + Copy,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sigmoid(_) => write!(f, "sigmoid"),
            Self::Tanh(_) => write!(f, "tanh"),
            Self::Relu(_) => write!(f, "relu"),
            Self::Swish(ref kernel) => {
                write!(f, "swish(beta={})", kernel.beta())
            }
            Self::Celu(ref kernel) => {
                write!(f, "celu(alpha={})", kernel.alpha())
            }
            Self::Softmax(ref kernel) => write!(
                f,
                "softmax(axis={}, stable={})",
                kernel.axis(),
                kernel.is_stable()
            ),
        }
    }
}

macro_rules! impl_from_kernel {
    ($($variant:ident => $kernel:ty),+ $(,)?) => {$(
        impl<T> From<$kernel> for ActivationKind<T> {
            #[inline]
            fn from(kernel: $kernel) -> Self {
                Self::$variant(kernel)
            }
        }
    )+};
}

impl_from_kernel!(
    Sigmoid => Sigmoid,
    Tanh => Tanh,
    Relu => Relu,
    Softmax => Softmax,
);

impl<T> From<Swish<T>> for ActivationKind<T> {
    #[inline]
    fn from(kernel: Swish<T>) -> Self {
        Self::Swish(kernel)
    }
}

impl<T> From<Celu<T>> for ActivationKind<T> {
    #[inline]
    fn from(kernel: Celu<T>) -> Self {
        Self::Celu(kernel)
    }
}
