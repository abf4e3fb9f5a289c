//! The hyperbolic tangent.

use num_traits::Float;

use crate::{activation::Activation, backend::Backend, operand::Operand};

/// `tanh(x) = (e^x - e^{-x}) / (e^x + e^{-x})`.
///
/// Evaluated as `e = exp(x); r = 1 / e; (e - r) / (e + r)`, so only one
/// exponential is taken. Like [`Sigmoid`](crate::activation::Sigmoid) no
/// stabilization is applied: once `exp(x)` or its reciprocal overflows the
/// quotient becomes `inf / inf` and the result is NaN. In single precision
/// this happens for `|x|` above about `88.7`, the point where sigmoid
/// saturates as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tanh;

impl<B> Activation<B> for Tanh
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        "tanh"
    }

    #[inline]
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        let exponential = input.exp();
        let reciprocal = exponential.recip();

        (&exponential - &reciprocal) / (&exponential + &reciprocal)
    }
}
