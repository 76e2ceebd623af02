pub mod analytics;
pub mod demo;
pub mod factors;
pub mod logs;
pub mod recommendations;
pub mod structure;
