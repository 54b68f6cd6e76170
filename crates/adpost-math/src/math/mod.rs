//! Density, CDF and quantile kernels.

pub mod beta;
pub mod gamma;
pub mod inverse_gamma;
pub mod lognormal;
pub mod normal;
pub mod stable;
