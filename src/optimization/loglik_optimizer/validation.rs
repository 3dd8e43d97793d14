//! Validation helpers for optimizer configuration and solver output.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Check that `theta` has `dim` finite entries.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    match theta.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidThetaInput { index, value: theta[index] }),
        None => Ok(()),
    }
}

pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let t = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some(index) = t.iter().position(|v| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value: t[index],
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(t)
}

pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
