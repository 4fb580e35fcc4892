//! Creature ecosystem simulation: the `World` orchestrator on top of
//! `ecosim_core`, plus re-exports so callers need only this crate.

pub mod model;
