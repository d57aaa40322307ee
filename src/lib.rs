// Kith: social-graph trust decisions for profile re-authentication.
//
// This is the library root. Each module corresponds to a major subsystem
// of the decision pipeline.

pub mod activity;
pub mod classify;
pub mod config;
pub mod decision;
pub mod graph;
pub mod output;
pub mod status;
pub mod store;
