pub mod action;
pub mod behavior;
pub mod flocking;
pub mod interaction;
pub mod perception;
