use ecosim_data::Brain;
use rand::Rng;

fn mix<R: Rng + ?Sized>(a: &[f32], b: &[f32], rng: &mut R) -> Vec<f32> {
    a.iter()
        .zip(b)
        .map(|(x, y)| if rng.gen_bool(0.5) { *x } else { *y })
        .collect()
}

/// Uniform crossover, one coin flip per weight. Parents with a different
/// shape cannot be aligned, so the first parent is returned unchanged.
pub fn brain_crossover_with_rng<R: Rng + ?Sized>(brain: &Brain, other: &Brain, rng: &mut R) -> Brain {
    if brain.inputs != other.inputs || brain.hidden != other.hidden || brain.outputs != other.outputs
    {
        return brain.clone();
    }

    Brain {
        inputs: brain.inputs,
        hidden: brain.hidden,
        outputs: brain.outputs,
        weights_ih: mix(&brain.weights_ih, &other.weights_ih, rng),
        bias_h: mix(&brain.bias_h, &other.bias_h, rng),
        weights_ho: mix(&brain.weights_ho, &other.weights_ho, rng),
        bias_o: mix(&brain.bias_o, &other.bias_o, rng),
    }
}
