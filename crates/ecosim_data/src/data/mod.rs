//! Core data structures for the ecosystem simulation.

pub mod entity;
pub mod environment;
pub mod genotype;
pub mod terrain;
