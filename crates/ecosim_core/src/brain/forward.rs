use ecosim_data::Brain;

/// Dense tanh forward pass. Missing inputs read as zero, extra inputs are ignored.
pub fn forward(brain: &Brain, inputs: &[f32]) -> Vec<f32> {
    let mut hidden = vec![0.0f32; brain.hidden];
    for (h, value) in hidden.iter_mut().enumerate() {
        let row = &brain.weights_ih[h * brain.inputs..(h + 1) * brain.inputs];
        let sum: f32 = row
            .iter()
            .zip(inputs.iter().chain(std::iter::repeat(&0.0)))
            .map(|(w, x)| w * x)
            .sum();
        *value = (sum + brain.bias_h[h]).tanh();
    }

    (0..brain.outputs)
        .map(|o| {
            let row = &brain.weights_ho[o * brain.hidden..(o + 1) * brain.hidden];
            let sum: f32 = row.iter().zip(&hidden).map(|(w, h)| w * h).sum();
            (sum + brain.bias_o[o]).tanh()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::BrainLogic;

    #[test]
    fn test_single_path_activation() {
        let mut brain = Brain::zeroed(1);
        brain.weights_ih[0] = 1.0;
        brain.weights_ho[0] = 2.0;
        let out = forward(&brain, &[0.5]);
        let expected = (2.0 * 0.5f32.tanh()).tanh();
        assert!((out[0] - expected).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_outputs_are_bounded() {
        let mut brain = Brain::zeroed(2);
        brain.weights_ih.iter_mut().for_each(|w| *w = 5.0);
        brain.weights_ho.iter_mut().for_each(|w| *w = 5.0);
        let out = forward(&brain, &[1.0; 22]);
        assert!(out.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
