//! Statistics computed from the loaded dataset. Every function here is pure:
//! it reads the dataset and returns a derived value that feeds either the
//! text report or one chart.

pub mod correlation;
pub mod crosstab;
pub mod describe;
pub mod distribution;
pub mod grouped_mean;
