pub mod common;
pub mod config;
pub mod network;
pub mod scenario;
pub mod search;
pub mod solver;
pub mod stat;
