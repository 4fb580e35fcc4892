pub mod crossover;
pub mod forward;
pub mod mutation;

use crate::config::AppConfig;
use crate::error::PolicyError;
pub use ecosim_data::{Brain, PolicyHandle, PolicyId, ACTION_LEN, OBSERVATION_LEN};
use rand::Rng;

/// Maps an observation vector to an action vector.
///
/// Implementations must be pure: same observation, same action, no side
/// effects on world state. The simulation never looks past this trait.
pub trait DecisionPolicy: Send + Sync {
    fn evaluate(&self, observation: &[f32]) -> Result<[f32; ACTION_LEN], PolicyError>;
}

/// Checks an arbitrary output slice and narrows it to a fixed action vector.
pub fn checked_action(outputs: &[f32]) -> Result<[f32; ACTION_LEN], PolicyError> {
    if outputs.len() < ACTION_LEN {
        return Err(PolicyError::OutputSize {
            expected: ACTION_LEN,
            got: outputs.len(),
        });
    }
    let mut action = [0.0; ACTION_LEN];
    for (index, (slot, value)) in action.iter_mut().zip(outputs).enumerate() {
        if !value.is_finite() {
            return Err(PolicyError::NonFinite { index });
        }
        *slot = *value;
    }
    Ok(action)
}

/// Network construction and genetic operators for [`Brain`].
pub trait BrainLogic {
    fn new_random_with_rng<R: Rng>(hidden: usize, weight_range: f32, rng: &mut R) -> Self;
    /// Every weight zero; outputs are `tanh(bias_o)` regardless of input.
    fn zeroed(hidden: usize) -> Self;
    fn with_output_bias(self, bias: [f32; ACTION_LEN]) -> Self;

    #[must_use]
    fn forward(&self, inputs: &[f32]) -> Vec<f32>;

    fn mutate_with_config<R: Rng + ?Sized>(&mut self, config: &AppConfig, rng: &mut R);
    fn crossover_with_rng<R: Rng + ?Sized>(&self, other: &Brain, rng: &mut R) -> Brain;
    fn weight_count(&self) -> usize;
}

impl BrainLogic for Brain {
    fn new_random_with_rng<R: Rng>(hidden: usize, weight_range: f32, rng: &mut R) -> Self {
        let range = weight_range.abs().max(f32::EPSILON);
        let mut draw =
            |n: usize| -> Vec<f32> { (0..n).map(|_| rng.gen_range(-range..range)).collect() };
        Brain {
            inputs: OBSERVATION_LEN,
            hidden,
            outputs: ACTION_LEN,
            weights_ih: draw(OBSERVATION_LEN * hidden),
            bias_h: draw(hidden),
            weights_ho: draw(hidden * ACTION_LEN),
            bias_o: draw(ACTION_LEN),
        }
    }

    fn zeroed(hidden: usize) -> Self {
        Brain {
            inputs: OBSERVATION_LEN,
            hidden,
            outputs: ACTION_LEN,
            weights_ih: vec![0.0; OBSERVATION_LEN * hidden],
            bias_h: vec![0.0; hidden],
            weights_ho: vec![0.0; hidden * ACTION_LEN],
            bias_o: vec![0.0; ACTION_LEN],
        }
    }

    fn with_output_bias(mut self, bias: [f32; ACTION_LEN]) -> Self {
        self.bias_o = bias.to_vec();
        self
    }

    fn forward(&self, inputs: &[f32]) -> Vec<f32> {
        forward::forward(self, inputs)
    }

    fn mutate_with_config<R: Rng + ?Sized>(&mut self, config: &AppConfig, rng: &mut R) {
        mutation::mutate_with_config(self, config, rng);
    }

    fn crossover_with_rng<R: Rng + ?Sized>(&self, other: &Brain, rng: &mut R) -> Brain {
        crossover::brain_crossover_with_rng(self, other, rng)
    }

    fn weight_count(&self) -> usize {
        self.weights_ih.len() + self.bias_h.len() + self.weights_ho.len() + self.bias_o.len()
    }
}

impl DecisionPolicy for Brain {
    fn evaluate(&self, observation: &[f32]) -> Result<[f32; ACTION_LEN], PolicyError> {
        if observation.len() != self.inputs {
            return Err(PolicyError::InputSize {
                expected: self.inputs,
                got: observation.len(),
            });
        }
        checked_action(&self.forward(observation))
    }
}
