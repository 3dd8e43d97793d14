//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the two supported line searches and apply the
//! gradient / cost-change tolerances of [`MLEOptions`]. Initial parameters
//! and the iteration cap are runtime concerns applied by `run_lbfgs`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The L-BFGS memory is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Tolerances Argmin rejects surface as `OptError` through the crate's
//!   `From<argmin::core::Error>` conversion.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};
use argmin::solver::quasinewton::LBFGS;

/// L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// Invalid tolerances rejected by Argmin.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search.
///
/// # Errors
/// Invalid tolerances rejected by Argmin.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional tolerances of `opts` to any L-BFGS variant.
///
/// A `None` tolerance leaves Argmin's default in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
