pub mod branch;
pub mod date;
pub mod department;
pub mod errors;
pub mod factor;
pub mod log;
pub mod organization;
pub mod recommendation;
pub mod scope;
pub mod session;
pub mod statistics;
