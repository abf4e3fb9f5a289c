//! A backend double that records which primitives were called.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use ndarray::ArrayD;

use crate::{
    backend::{Backend, ndarray::NdarrayBackend},
    error::Result,
};

/// Forwards every primitive to [`NdarrayBackend`] and counts the calls.
#[derive(Debug, Default)]
pub(crate) struct CountingBackend {
    inner: NdarrayBackend<f32>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl CountingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of times the primitive `name` has been invoked.
    pub(crate) fn count(&self, name: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.get(name).copied().unwrap_or(0)
    }

    fn record(&self, name: &'static str) {
        let mut calls =
            self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        *calls.entry(name).or_insert(0) += 1;
    }
}

impl Backend for CountingBackend {
    type Primitive = f32;
    type Tensor = ArrayD<f32>;

    fn add(&self, lhs: &ArrayD<f32>, rhs: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.record("add");
        self.inner.add(lhs, rhs)
    }

    fn constant(&self, value: f32) -> ArrayD<f32> {
        self.record("constant");
        self.inner.constant(value)
    }

    fn div(&self, lhs: &ArrayD<f32>, rhs: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.record("div");
        self.inner.div(lhs, rhs)
    }

    fn exp(&self, tensor: &ArrayD<f32>) -> ArrayD<f32> {
        self.record("exp");
        self.inner.exp(tensor)
    }

    unsafe fn from_vec(data: Vec<f32>, shape: &[usize]) -> ArrayD<f32> {
        // SAFETY: Forwarded with the caller's guarantees intact.
        unsafe { NdarrayBackend::from_vec(data, shape) }
    }

    fn maximum(
        &self,
        lhs: &ArrayD<f32>,
        rhs: &ArrayD<f32>,
    ) -> Result<ArrayD<f32>> {
        self.record("maximum");
        self.inner.maximum(lhs, rhs)
    }

    fn minimum(
        &self,
        lhs: &ArrayD<f32>,
        rhs: &ArrayD<f32>,
    ) -> Result<ArrayD<f32>> {
        self.record("minimum");
        self.inner.minimum(lhs, rhs)
    }

    fn mul(&self, lhs: &ArrayD<f32>, rhs: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.record("mul");
        self.inner.mul(lhs, rhs)
    }

    fn ndim(tensor: &ArrayD<f32>) -> usize {
        NdarrayBackend::ndim(tensor)
    }

    fn neg(&self, tensor: &ArrayD<f32>) -> ArrayD<f32> {
        self.record("neg");
        self.inner.neg(tensor)
    }

    unsafe fn ones(shape: &[usize]) -> ArrayD<f32> {
        // SAFETY: Forwarded with the caller's guarantees intact.
        unsafe { NdarrayBackend::ones(shape) }
    }

    fn recip(&self, tensor: &ArrayD<f32>) -> ArrayD<f32> {
        self.record("recip");
        self.inner.recip(tensor)
    }

    fn reduce_max(
        &self,
        tensor: &ArrayD<f32>,
        axis: usize,
        keepdims: bool,
    ) -> Result<ArrayD<f32>> {
        self.record("reduce_max");
        self.inner.reduce_max(tensor, axis, keepdims)
    }

    fn reduce_sum(
        &self,
        tensor: &ArrayD<f32>,
        axis: usize,
        keepdims: bool,
    ) -> Result<ArrayD<f32>> {
        self.record("reduce_sum");
        self.inner.reduce_sum(tensor, axis, keepdims)
    }

    fn scalar_value(&self, tensor: &ArrayD<f32>) -> Result<f32> {
        self.record("scalar_value");
        self.inner.scalar_value(tensor)
    }

    fn shape(tensor: &ArrayD<f32>) -> &[usize] {
        NdarrayBackend::shape(tensor)
    }

    fn sub(&self, lhs: &ArrayD<f32>, rhs: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.record("sub");
        self.inner.sub(lhs, rhs)
    }

    fn to_vec(tensor: &ArrayD<f32>) -> Vec<f32> {
        NdarrayBackend::to_vec(tensor)
    }

    unsafe fn zeros(shape: &[usize]) -> ArrayD<f32> {
        // SAFETY: Forwarded with the caller's guarantees intact.
        unsafe { NdarrayBackend::zeros(shape) }
    }
}
