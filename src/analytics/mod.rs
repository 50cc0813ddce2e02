//! Numerical and statistical analyses over a loaded corpus.
pub mod clustering;
pub mod comparison;
pub mod engagement;
pub mod frequency;
pub mod outliers;
pub mod regression;
pub mod sentiment;
pub mod topics;
