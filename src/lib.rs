//! Numerically careful activation kernels over pluggable tensor backends.
//!
//! The crate is built in two layers:
//!
//! - an [operand algebra](operand) that gives arithmetic-operator syntax to
//!   the elementwise primitives of any [`Backend`](backend::Backend),
//! - six [activation kernels](activation) (sigmoid, tanh, ReLU, swish, CELU
//!   and softmax) written purely against that algebra.
//!
//! ```
//! use tensor_activations::{
//!     activation::{Activation, ActivationExt, Softmax},
//!     backend::ndarray::NdarrayBackend,
//!     tensor,
//! };
//!
//! let backend = NdarrayBackend::new();
//! let logits = tensor![[1.0_f32, 2.0, 3.0], [1000.0, 0.0, -1000.0]];
//!
//! let explicit = Softmax::new(1).apply(&backend, &logits).unwrap();
//! let implicit = Softmax::new(1).invoke(&logits).unwrap();
//!
//! assert_eq!(explicit, implicit);
//! assert!(explicit.to_vec().iter().all(|value| value.is_finite()));
//! ```

pub mod activation;
pub mod backend;
pub mod error;
pub mod operand;
pub mod tensor;

#[cfg(feature = "ndarray-backend")]
#[doc(hidden)]
pub use ndarray as __ndarray;

pub use crate::{
    activation::{
        Activation, ActivationExt, ActivationKind, Celu, Relu, Sigmoid,
        Softmax, Swish, Tanh,
    },
    backend::{
        Backend, DefaultBackend,
        global::{default_backend, set_default_backend},
    },
    error::{Error, Result},
    operand::Operand,
    tensor::Tensor,
};
