//! The logistic sigmoid.

use num_traits::{Float, One};

use crate::{activation::Activation, backend::Backend, operand::Operand};

/// `sigmoid(x) = 1 / (1 + exp(-x))`.
///
/// No stabilization is applied. In single precision the result is exactly
/// `1.0` once `exp(-x)` drops below half an ulp of one (from roughly
/// `x >= 17`), and exactly `0.0` once `exp(-x)` overflows (`x` below about
/// `-88.7`). Both are saturation, not errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl<B> Activation<B> for Sigmoid
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    #[inline]
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        let one = Operand::lift(input.backend(), B::Primitive::one());
        let denominator = &one + &(-input).exp();

        one / denominator
    }
}
