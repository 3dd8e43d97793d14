//! emissions — ready-made observation families for HMM states.
//!
//! Purpose
//! -------
//! Concrete implementations of the emission contract for real-valued data:
//! a Gaussian and an exponential family with closed-form weighted M-steps,
//! a Weibull family fitted numerically, and a Gamma prior on rates for MAP
//! estimation. Point-process emissions live in `point_process`.
//!
//! Conventions
//! -----------
//! - Constructors validate parameters and return `EmissionResult`.
//! - Densities use `statrs` distributions where their parameterization
//!   matches; sampling always goes through `statrs`.

pub mod exponential;
pub mod normal;
pub mod rate_prior;
pub mod weibull;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::exponential::ExponentialEmission;
pub use self::normal::{MIN_VARIANCE, NormalEmission};
pub use self::rate_prior::GammaRatePrior;
pub use self::weibull::{WeibullEmission, WeibullFitData};
