pub use ecosim_core::{
    ArchetypeLogic, BrainLogic, ClockLogic, DecisionPolicy, EvolutionController, TerrainLogic,
};
pub mod archetypes {
    pub use ecosim_core::archetypes::*;
}
pub mod brain {
    pub use ecosim_core::brain::*;
}
pub mod config {
    pub use ecosim_core::config::*;
}
pub mod environment {
    pub use ecosim_core::environment::*;
}
pub mod error {
    pub use ecosim_core::error::*;
}
pub mod evolution {
    pub use ecosim_core::evolution::*;
}
pub mod history {
    pub use ecosim_core::history::*;
}
pub mod lifecycle {
    pub use ecosim_core::lifecycle::*;
}
pub mod snapshot {
    pub use ecosim_core::snapshot::*;
}
pub mod systems {
    pub use ecosim_core::systems::*;
}
pub mod terrain {
    pub use ecosim_core::terrain::*;
}
pub mod state {
    pub use ecosim_data::*;
}
pub mod persistence {
    pub use ecosim_io::persistence::*;
}

pub mod world;
