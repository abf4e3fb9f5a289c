//! # The operand algebra
//!
//! An [`Operand`] is a value produced by a backend in the middle of an
//! expression. Operands combine with the usual arithmetic operators, each of
//! which forwards to the matching [`Backend`] primitive, so a kernel is
//! written once as plain algebra and runs on any backend.
//!
//! A backend failure (for example two operands that cannot be broadcast)
//! does not interrupt the expression. The error travels with the resulting
//! operand and is returned, unchanged, by [`Operand::materialize()`].
//!
//! ```
//! use tensor_activations::{
//!     backend::ndarray::NdarrayBackend, operand::Operand, tensor,
//! };
//!
//! let backend = NdarrayBackend::new();
//! let x = Operand::from_tensor(&backend, &tensor![1.0_f32, 2.0, 3.0]);
//!
//! let y = (2.0_f32 * x - 1.0_f32).materialize().unwrap();
//!
//! assert_eq!(y.to_vec(), [1.0, 3.0, 5.0]);
//! ```

use core::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
    ptr,
};

use crate::{backend::Backend, error::Result, tensor::Tensor};

/// A deferred value produced by the backend `B`.
///
/// An operand borrows its backend for the duration of the expression that
/// created it and never owns it. Operands are immutable: every operation
/// returns a new one. Combining operands that borrow two different backend
/// handles is unsupported and trips a debug assertion.
pub struct Operand<'b, B>
where
    B: Backend,
{
    backend: &'b B,
    value: Result<B::Tensor>,
}

impl<'b, B> Operand<'b, B>
where
    B: Backend,
{
    /// Starts an expression from a realized tensor.
    #[inline]
    pub fn from_tensor(backend: &'b B, tensor: &Tensor<B>) -> Self {
        Self {
            backend,
            value: Ok(tensor.as_inner().clone()),
        }
    }

    /// Lifts a scalar into a zero-dimensional operand, which broadcasts
    /// against operands of any shape.
    #[inline]
    pub fn lift(backend: &'b B, value: B::Primitive) -> Self {
        Self {
            backend,
            value: Ok(backend.constant(value)),
        }
    }

    /// Returns the backend handle this operand was produced by.
    #[inline]
    pub const fn backend(&self) -> &'b B {
        self.backend
    }

    /// Elementwise natural exponential.
    #[inline]
    #[must_use]
    pub fn exp(&self) -> Self {
        self.map(B::exp)
    }

    /// Elementwise reciprocal.
    #[inline]
    #[must_use]
    pub fn recip(&self) -> Self {
        self.map(B::recip)
    }

    /// Elementwise maximum with `rhs`.
    #[inline]
    #[must_use]
    pub fn maximum(&self, rhs: &Self) -> Self {
        self.combine(rhs, B::maximum)
    }

    /// Elementwise minimum with `rhs`.
    #[inline]
    #[must_use]
    pub fn minimum(&self, rhs: &Self) -> Self {
        self.combine(rhs, B::minimum)
    }

    /// Maximum along `axis`; see [`Backend::reduce_max()`].
    #[inline]
    #[must_use]
    pub fn reduce_max(&self, axis: usize, keepdims: bool) -> Self {
        self.try_map(|backend, tensor| {
            backend.reduce_max(tensor, axis, keepdims)
        })
    }

    /// Sum along `axis`; see [`Backend::reduce_sum()`].
    #[inline]
    #[must_use]
    pub fn reduce_sum(&self, axis: usize, keepdims: bool) -> Self {
        self.try_map(|backend, tensor| {
            backend.reduce_sum(tensor, axis, keepdims)
        })
    }

    /// Realizes the operand into a tensor.
    ///
    /// # Errors
    ///
    /// Returns the first backend error raised while building the expression.
    #[inline]
    pub fn materialize(self) -> Result<Tensor<B>> {
        self.value.map(Tensor::from_inner)
    }

    /// Realizes a one-element operand into its scalar value.
    ///
    /// # Errors
    ///
    /// Returns the first backend error raised while building the expression,
    /// or [`Error::NotScalar`](crate::error::Error::NotScalar) when the
    /// operand holds more than one element.
    #[inline]
    pub fn scalar_value(self) -> Result<B::Primitive> {
        let tensor = self.value?;
        self.backend.scalar_value(&tensor)
    }

    fn map<F>(&self, op: F) -> Self
    where
        F: FnOnce(&'b B, &B::Tensor) -> B::Tensor,
    {
        self.try_map(|backend, tensor| Ok(op(backend, tensor)))
    }

    fn try_map<F>(&self, op: F) -> Self
    where
        F: FnOnce(&'b B, &B::Tensor) -> Result<B::Tensor>,
    {
        let value = match self.value {
            Ok(ref tensor) => op(self.backend, tensor),
            Err(ref error) => Err(error.clone()),
        };

        Self {
            backend: self.backend,
            value,
        }
    }

    fn combine<F>(&self, rhs: &Self, op: F) -> Self
    where
        F: FnOnce(&'b B, &B::Tensor, &B::Tensor) -> Result<B::Tensor>,
    {
        debug_assert!(
            ptr::eq(self.backend, rhs.backend),
            "operands from different backend handles cannot be combined"
        );

        let value = match (&self.value, &rhs.value) {
            (Ok(left), Ok(right)) => op(self.backend, left, right),
            (Err(error), _) | (_, Err(error)) => Err(error.clone()),
        };

        Self {
            backend: self.backend,
            value,
        }
    }
}

impl<B> Clone for Operand<'_, B>
where
    B: Backend,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            backend: self.backend,
            value: self.value.clone(),
        }
    }
}

impl<B> fmt::Debug for Operand<'_, B>
where
    B: Backend,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operand")
            .field("backend", self.backend)
            .field("value", &self.value)
            .finish()
    }
}

/// Elementwise `max(scalar, operand)`; the result has the operand's shape.
#[inline]
pub fn max_scalar<'b, B>(
    scalar: B::Primitive,
    operand: &Operand<'b, B>,
) -> Operand<'b, B>
where
    B: Backend,
{
    Operand::lift(operand.backend, scalar).maximum(operand)
}

/// Elementwise `min(scalar, operand)`; the result has the operand's shape.
#[inline]
pub fn min_scalar<'b, B>(
    scalar: B::Primitive,
    operand: &Operand<'b, B>,
) -> Operand<'b, B>
where
    B: Backend,
{
    Operand::lift(operand.backend, scalar).minimum(operand)
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $primitive:ident) => {
        impl<'b, B> $trait for Operand<'b, B>
        where
            B: Backend,
        {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                self.combine(&rhs, B::$primitive)
            }
        }

        impl<'b, B> $trait<&Operand<'b, B>> for &Operand<'b, B>
        where
            B: Backend,
        {
            type Output = Operand<'b, B>;

            #[inline]
            fn $method(self, rhs: &Operand<'b, B>) -> Operand<'b, B> {
                self.combine(rhs, B::$primitive)
            }
        }
    };
}

impl_binary_op!(Add, add, add);
impl_binary_op!(Sub, sub, sub);
impl_binary_op!(Mul, mul, mul);
impl_binary_op!(Div, div, div);

impl<B> Neg for Operand<'_, B>
where
    B: Backend,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(B::neg)
    }
}

impl<'b, B> Neg for &Operand<'b, B>
where
    B: Backend,
{
    type Output = Operand<'b, B>;

    #[inline]
    fn neg(self) -> Operand<'b, B> {
        self.map(B::neg)
    }
}

/// Scalar promotion for concrete element types: the scalar is lifted through
/// the operand's backend and then combined like any other operand. Addition,
/// subtraction and multiplication work in both orders; division only takes a
/// scalar divisor.
macro_rules! impl_scalar_ops {
    ($($scalar:ty),+ $(,)?) => {$(
        impl<'b, B> Add<$scalar> for Operand<'b, B>
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Self;

            #[inline]
            fn add(self, rhs: $scalar) -> Self {
                let rhs = Operand::lift(self.backend, rhs);
                self + rhs
            }
        }

        impl<'b, B> Add<Operand<'b, B>> for $scalar
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Operand<'b, B>;

            #[inline]
            fn add(self, rhs: Operand<'b, B>) -> Operand<'b, B> {
                Operand::lift(rhs.backend, self) + rhs
            }
        }

        impl<'b, B> Sub<$scalar> for Operand<'b, B>
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: $scalar) -> Self {
                let rhs = Operand::lift(self.backend, rhs);
                self - rhs
            }
        }

        impl<'b, B> Sub<Operand<'b, B>> for $scalar
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Operand<'b, B>;

            #[inline]
            fn sub(self, rhs: Operand<'b, B>) -> Operand<'b, B> {
                Operand::lift(rhs.backend, self) - rhs
            }
        }

        impl<'b, B> Mul<$scalar> for Operand<'b, B>
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $scalar) -> Self {
                let rhs = Operand::lift(self.backend, rhs);
                self * rhs
            }
        }

        impl<'b, B> Mul<Operand<'b, B>> for $scalar
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Operand<'b, B>;

            #[inline]
            fn mul(self, rhs: Operand<'b, B>) -> Operand<'b, B> {
                Operand::lift(rhs.backend, self) * rhs
            }
        }

        impl<'b, B> Div<$scalar> for Operand<'b, B>
        where
            B: Backend<Primitive = $scalar>,
        {
            type Output = Self;

            #[inline]
            fn div(self, rhs: $scalar) -> Self {
                let rhs = Operand::lift(self.backend, rhs);
                self / rhs
            }
        }
    )+};
}

impl_scalar_ops!(f32, f64);

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        backend::{ndarray::NdarrayBackend, testing::CountingBackend},
        error::Error,
        operand::{Operand, max_scalar, min_scalar},
        tensor::Tensor,
    };
    use crate::tensor;

    #[test]
    fn operators_combine_elementwise() {
        let backend = NdarrayBackend::new();
        let a = Operand::from_tensor(&backend, &tensor![1.0_f32, 2.0, 3.0]);
        let b = Operand::from_tensor(&backend, &tensor![4.0_f32, 5.0, 6.0]);

        let sum = (&a + &b).materialize().unwrap();
        let difference = (&a - &b).materialize().unwrap();
        let product = (&a * &b).materialize().unwrap();
        let quotient = (a / b).materialize().unwrap();

        assert_eq!(sum.to_vec(), [5.0, 7.0, 9.0]);
        assert_eq!(difference.to_vec(), [-3.0, -3.0, -3.0]);
        assert_eq!(product.to_vec(), [4.0, 10.0, 18.0]);
        assert_eq!(quotient.to_vec(), [0.25, 0.4, 0.5]);
    }

    #[test]
    fn scalars_promote_on_either_side() {
        let backend = NdarrayBackend::new();
        let x = Operand::from_tensor(&backend, &tensor![1.0_f32, 2.0]);

        let left = (10.0_f32 - x.clone()).materialize().unwrap();
        let right = (x.clone() - 10.0_f32).materialize().unwrap();
        let scaled = (3.0_f32 * x.clone()).materialize().unwrap();
        let shifted = (1.0_f32 + x.clone() * 2.0_f32).materialize().unwrap();
        let halved = (x / 2.0_f32).materialize().unwrap();

        assert_eq!(left.to_vec(), [9.0, 8.0]);
        assert_eq!(right.to_vec(), [-9.0, -8.0]);
        assert_eq!(scaled.to_vec(), [3.0, 6.0]);
        assert_eq!(shifted.to_vec(), [3.0, 5.0]);
        assert_eq!(halved.to_vec(), [0.5, 1.0]);
    }

    #[test]
    fn scalar_promotion_works_for_f64() {
        let backend = NdarrayBackend::<f64>::new();
        let x = Operand::from_tensor(&backend, &tensor![[1.0_f64], [2.0]]);

        let result = (x * 0.5_f64 + 1.0_f64).materialize().unwrap();

        assert_eq!(result.shape(), &[2, 1]);
        assert_eq!(result.to_vec(), [1.5, 2.0]);
    }

    #[test]
    fn negation_flips_sign_and_keeps_shape() {
        let backend = NdarrayBackend::new();
        let x = Operand::from_tensor(&backend, &tensor![[1.0_f32, -2.0]]);

        let negated = (-&x).materialize().unwrap();

        assert_eq!(negated.shape(), &[1, 2]);
        assert_eq!(negated.to_vec(), [-1.0, 2.0]);
    }

    #[test]
    fn scalar_min_max_keep_operand_shape() {
        let backend = NdarrayBackend::new();
        let input = tensor![[-1.0_f32, 0.5], [2.0, -3.0]];
        let x = Operand::from_tensor(&backend, &input);

        let upper = max_scalar(0.0, &x).materialize().unwrap();
        let lower = min_scalar(0.0, &x).materialize().unwrap();

        assert_eq!(upper.shape(), &[2, 2]);
        assert_eq!(upper.to_vec(), [0.0, 0.5, 2.0, 0.0]);
        assert_eq!(lower.to_vec(), [-1.0, 0.0, 0.0, -3.0]);
    }

    #[test]
    fn exp_and_recip_match_std() {
        let backend = NdarrayBackend::new();
        let x = Operand::from_tensor(&backend, &tensor![0.0_f32, 1.0, 2.0]);

        let exp = x.exp().materialize().unwrap().to_vec();
        let recip = x.exp().recip().materialize().unwrap().to_vec();

        for (index, value) in [0.0_f32, 1.0, 2.0].into_iter().enumerate() {
            assert_relative_eq!(exp[index], value.exp());
            assert_relative_eq!(recip[index], (-value).exp(), max_relative = 1e-6);
        }
    }

    #[test]
    fn shape_mismatch_surfaces_at_materialize() {
        let backend = NdarrayBackend::new();
        let a = Operand::from_tensor(&backend, &tensor![1.0_f32, 2.0, 3.0]);
        let b = Operand::from_tensor(&backend, &tensor![1.0_f32, 2.0]);

        let result = ((a + b) * 2.0_f32).exp().materialize();

        assert_eq!(
            result,
            Err(Error::ShapeMismatch {
                lhs: vec![3],
                rhs: vec![2],
            })
        );
    }

    #[test]
    fn reductions_respect_keepdims() {
        let backend = NdarrayBackend::new();
        let input = tensor![[1.0_f32, 4.0], [3.0, 2.0]];
        let x = Operand::from_tensor(&backend, &input);

        let max = x.reduce_max(0, true).materialize().unwrap();
        let sum = x.reduce_sum(1, false).materialize().unwrap();

        assert_eq!(max.shape(), &[1, 2]);
        assert_eq!(max.to_vec(), [3.0, 4.0]);
        assert_eq!(sum.shape(), &[2]);
        assert_eq!(sum.to_vec(), [5.0, 5.0]);
    }

    #[test]
    fn scalar_value_reads_single_element() {
        let backend = NdarrayBackend::new();
        let x = Operand::from_tensor(&backend, &tensor![1.0_f32, 2.0, 3.0]);

        assert_eq!(x.reduce_sum(0, false).scalar_value(), Ok(6.0));
        assert_eq!(
            x.scalar_value(),
            Err(Error::NotScalar { shape: vec![3] })
        );
    }

    #[test]
    fn operators_route_through_backend_primitives() {
        let backend = CountingBackend::new();
        let input = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let x = Operand::from_tensor(&backend, &input);

        let result = (x.clone() * 2.0_f32 + x.exp()).materialize().unwrap();

        assert_eq!(result.shape(), &[2]);

        assert_eq!(backend.count("constant"), 1);
        assert_eq!(backend.count("mul"), 1);
        assert_eq!(backend.count("exp"), 1);
        assert_eq!(backend.count("add"), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different backend handles")]
    fn combining_operands_from_different_handles_panics() {
        let first = CountingBackend::new();
        let second = CountingBackend::new();
        let input = Tensor::from_vec(vec![1.0_f32, 2.0], &[2]).unwrap();

        let lhs = Operand::from_tensor(&first, &input);
        let rhs = Operand::from_tensor(&second, &input);

        let _ = lhs + rhs;
    }
}
