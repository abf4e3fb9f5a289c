//! The rectified linear unit.

use num_traits::{Float, Zero};

use crate::{
    activation::Activation,
    backend::Backend,
    operand::{Operand, max_scalar},
};

/// `relu(x) = max(x, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relu;

impl<B> Activation<B> for Relu
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        "relu"
    }

    #[inline]
    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        max_scalar(B::Primitive::zero(), &input)
    }
}
