use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of scalars in an observation vector.
pub const OBSERVATION_LEN: usize = 22;
/// Number of scalars in an action vector: turn, speed, sleep intent.
pub const ACTION_LEN: usize = 3;

/// Fixed-topology feed-forward network: inputs → hidden (tanh) → outputs (tanh).
///
/// Weights are stored row-major, one row per destination neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
    pub weights_ih: Vec<f32>,
    pub bias_h: Vec<f32>,
    pub weights_ho: Vec<f32>,
    pub bias_o: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyId(pub u64);

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "policy#{}", self.0)
    }
}

/// Detachable binding between a creature and the policy that drives it.
///
/// Offspring clone their parent's handle; generation boundaries replace it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyHandle {
    pub id: PolicyId,
    pub brain: Arc<Brain>,
}

impl PolicyHandle {
    #[must_use]
    pub fn new(id: PolicyId, brain: Brain) -> Self {
        Self {
            id,
            brain: Arc::new(brain),
        }
    }

    /// Handle whose brain is still to be looked up by id. Deserialized
    /// creatures carry these until their snapshot is linked.
    #[must_use]
    pub fn unlinked(id: PolicyId) -> Self {
        Self::new(
            id,
            Brain {
                inputs: 0,
                hidden: 0,
                outputs: 0,
                weights_ih: Vec::new(),
                bias_h: Vec::new(),
                weights_ho: Vec::new(),
                bias_o: Vec::new(),
            },
        )
    }

    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.brain.outputs > 0
    }
}

/// Serde adapter that stores a [`PolicyHandle`] as its id alone, so shared
/// brains are written once per snapshot instead of once per creature.
pub mod policy_ref {
    use super::{PolicyHandle, PolicyId};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(handle: &PolicyHandle, s: S) -> Result<S::Ok, S::Error> {
        handle.id.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PolicyHandle, D::Error> {
        PolicyId::deserialize(d).map(PolicyHandle::unlinked)
    }
}
