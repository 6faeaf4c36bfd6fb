//! IndiePilot core: the IndieGraph skill graph, next-skill recommendations,
//! activity aggregation, and the Autonomy Index.
//!
//! Everything except [`service`] is synchronous and pure. Storage is reached
//! only through the traits in [`repository`].

pub mod activity;
pub mod graph;
pub mod guidance;
pub mod progress;
pub mod recommend;
pub mod repository;
pub mod scoring;
pub mod service;
