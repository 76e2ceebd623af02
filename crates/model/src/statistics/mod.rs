pub mod emissions;
pub mod period;
