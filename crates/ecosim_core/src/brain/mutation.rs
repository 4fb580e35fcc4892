use crate::config::AppConfig;
use ecosim_data::Brain;
use rand::Rng;

const WEIGHT_LIMIT: f32 = 5.0;

/// Perturbs each weight with probability `mutation_rate` by a uniform amount in
/// `±mutation_amount`, clamped to `±5`.
pub fn mutate_with_config<R: Rng + ?Sized>(brain: &mut Brain, config: &AppConfig, rng: &mut R) {
    let rate = config.evolution.mutation_rate;
    let amount = config.evolution.mutation_amount;
    if amount <= 0.0 {
        return;
    }

    for weight in brain
        .weights_ih
        .iter_mut()
        .chain(brain.bias_h.iter_mut())
        .chain(brain.weights_ho.iter_mut())
        .chain(brain.bias_o.iter_mut())
    {
        if rng.gen::<f32>() < rate {
            *weight += rng.gen_range(-amount..amount);
            *weight = weight.clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
        }
    }
}
