//! Softmax along one axis.

use num_traits::Float;

use crate::{
    activation::Activation,
    backend::Backend,
    error::{Error, Result},
    operand::Operand,
    tensor::Tensor,
};

/// Converts values along `axis` into a categorical distribution.
///
/// The stabilized form (the default) evaluates
/// `e = exp(x - max(x, axis)); e / sum(e, axis)`. Subtracting the per-axis
/// maximum keeps every exponent at or below zero, so large inputs cannot
/// overflow, at the cost of one extra reduction. The unstabilized form
/// `e = exp(x); e / sum(e, axis)` produces NaN as soon as any exponent
/// overflows and exists for comparison only.
///
/// The output has the shape of the input. The reduced axis is kept with
/// length one only until the final division broadcasts it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Softmax {
    axis: usize,
    stable: bool,
}

impl Softmax {
    /// Stabilized softmax along `axis`.
    #[inline]
    #[must_use]
    pub const fn new(axis: usize) -> Self {
        Self { axis, stable: true }
    }

    /// Unstabilized softmax along `axis`.
    #[inline]
    #[must_use]
    pub const fn unstable(axis: usize) -> Self {
        Self {
            axis,
            stable: false,
        }
    }

    /// Returns a copy with the stabilization switched on or off.
    #[inline]
    #[must_use]
    pub const fn with_stable(self, stable: bool) -> Self {
        Self { stable, ..self }
    }

    /// The axis the distribution is taken over.
    #[inline]
    #[must_use]
    pub const fn axis(&self) -> usize {
        self.axis
    }

    /// Whether the per-axis maximum is subtracted before exponentiating.
    #[inline]
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        self.stable
    }
}

impl<B> Activation<B> for Softmax
where
    B: Backend,
    B::Primitive: Float,
{
    #[inline]
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn forward<'b>(&self, input: Operand<'b, B>) -> Operand<'b, B> {
        let shifted = if self.stable {
            let max = input.reduce_max(self.axis, true);
            input - max
        } else {
            input
        };

        let exponential = shifted.exp();
        let total = exponential.reduce_sum(self.axis, true);

        exponential / total
    }

    /// Checks the axis against the input's rank before any reduction runs.
    fn apply(&self, backend: &B, input: &Tensor<B>) -> Result<Tensor<B>> {
        let ndim = input.ndim();
        if self.axis >= ndim {
            return Err(Error::InvalidAxis {
                axis: self.axis,
                ndim,
            });
        }

        log::trace!(
            "applying softmax (axis {}, stable {}) to tensor of shape {:?}",
            self.axis,
            self.stable,
            input.shape()
        );
        if !self.stable {
            log::warn!(
                "unstabilized softmax overflows for large inputs; prefer the \
                 stabilized form"
            );
        }

        self.forward(Operand::from_tensor(backend, input)).materialize()
    }
}
