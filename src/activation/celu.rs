//! The continuously differentiable exponential linear unit.

use num_traits::{Float, One, Zero};

use crate::{
    activation::{Activation, check_finite, invalid_parameter},
    backend::Backend,
    error::Result,
    operand::{Operand, max_scalar, min_scalar},
};

/// `celu(x) = max(0, x) + min(0, alpha * (exp(x / alpha) - 1))`.
///
/// `alpha` must be nonzero and finite; this is checked when the kernel is
/// built so a bad configuration never reaches a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celu<T = f32> {
    alpha: T,
}

impl<T> Celu<T>
where
    T: Float,
{
    /// Creates a CELU kernel with the given `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::error::Error::InvalidParameter)
    /// when `alpha` is zero, NaN or infinite.
    #[inline]
    pub fn new(alpha: T) -> Result<Self> {
        let alpha = check_finite("alpha", alpha)?;

        if alpha.is_zero() {
            return Err(invalid_parameter("alpha", alpha, "must be nonzero"));
        }

        Ok(Self { alpha })
    }
}

impl<T> Celu<T>
where
    T: Copy,
{
    /// The scale of the negative branch.
    #[inline]
    pub const fn alpha(&self) -> T {
        self.alpha
    }
}

impl<T> Default for Celu<T>
where
    T: Float,
{
    /// `alpha = 1`.
    #[inline]
    fn default() -> Self {
        Self { alpha: T::one() }
    }
}

impl<B> Activation<B> for Celu<B::Primitive>
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        "celu"
    }

    #[inline]
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        let backend = input.backend();
        let zero = B::Primitive::zero();
        let alpha = Operand::lift(backend, self.alpha);
        let one = Operand::lift(backend, B::Primitive::one());

        let negative = &alpha * &(&(&input / &alpha).exp() - &one);

        max_scalar(zero, &input) + min_scalar(zero, &negative)
    }
}
