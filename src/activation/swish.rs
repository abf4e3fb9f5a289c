//! The swish (SiLU when `beta == 1`) activation.

use num_traits::Float;

use crate::{
    activation::{Activation, Sigmoid, check_finite},
    backend::Backend,
    error::Result,
    operand::Operand,
};

/// `swish(x) = x * sigmoid(beta * x)`.
///
/// Composed directly from [`Sigmoid`], so it inherits its saturation with the
/// thresholds scaled by `1 / beta`. `beta` changes the steepness of the curve
/// but never moves the zero crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swish<T = f32> {
    beta: T,
}

impl<T> Swish<T>
where
    T: Float,
{
    /// Creates a swish kernel with the given `beta`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::error::Error::InvalidParameter)
    /// when `beta` is NaN or infinite.
    #[inline]
    pub fn new(beta: T) -> Result<Self> {
        check_finite("beta", beta).map(|beta| Self { beta })
    }
}

impl<T> Swish<T>
where
    T: Copy,
{
    /// The steepness parameter.
    #[inline]
    pub const fn beta(&self) -> T {
        self.beta
    }
}

impl<T> Default for Swish<T>
where
    T: Float,
{
    /// `beta = 1`, i.e. SiLU.
    #[inline]
    fn default() -> Self {
        Self { beta: T::one() }
    }
}

impl<B> Activation<B> for Swish<B::Primitive>
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        "swish"
    }

    #[inline]
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        let beta = Operand::lift(input.backend(), self.beta);
        let gate = Sigmoid.forward(&beta * &input);

        input * gate
    }
}
