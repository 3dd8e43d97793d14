//! Adapter exposing a [`LogLikelihood`] as an `argmin` minimization problem.
//!
//! The cost is `c(θ) = -ℓ(θ)`. Analytic gradients are negated; objectives
//! without one get a finite-difference gradient of the cost itself (central
//! first, forward as a fallback when a central probe leaves the domain).
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Borrowing bridge between an objective, its data and `argmin`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Finite-difference gradient of the cost.
    ///
    /// The FD closure must return `f64`, so the first evaluation error is
    /// parked in a `RefCell` and the closure returns `NaN`; the parked error
    /// is surfaced afterwards.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let parked: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |t: &Theta| -> f64 {
            self.cost(t).unwrap_or_else(|e| {
                parked.borrow_mut().get_or_insert(e);
                f64::NAN
            })
        };
        let central = theta.central_diff(&cost);
        if parked.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }
        parked.replace(None);
        let forward = theta.forward_diff(&cost);
        if let Some(err) = parked.take() {
            return Err(err);
        }
        validate_grad(&forward, theta.len())?;
        Ok(forward)
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(-value)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}
