use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::scheduling_model::workflow::task::GammaParameters;

/// Source of sampled durations. Implementations must return finite, non-negative values.
pub trait DurationSampler {
    fn sample(&mut self, parameters: &GammaParameters) -> f64;
}

/// Always returns the mean of the distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedValueSampler;

impl DurationSampler for ExpectedValueSampler {
    fn sample(&mut self, parameters: &GammaParameters) -> f64 {
        parameters.mean().max(0.0)
    }
}

/// Gamma sampler driven by a seeded `StdRng`, so a simulation run can be replayed.
///
/// Uses the Marsaglia-Tsang squeeze method with Box-Muller normals; shapes below one
/// are sampled as `Gamma(shape + 1) * U^(1 / shape)`.
#[derive(Debug, Clone)]
pub struct SeededGammaSampler {
    rng: StdRng,
}

impl SeededGammaSampler {
    pub fn new(seed: u64) -> Self {
        SeededGammaSampler { rng: StdRng::seed_from_u64(seed) }
    }

    fn open_unit(&mut self) -> f64 {
        // (0, 1]
        1.0 - self.rng.random::<f64>()
    }

    fn standard_normal(&mut self) -> f64 {
        let u1 = self.open_unit();
        let u2 = self.rng.random::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn standard_gamma(&mut self, shape: f64) -> f64 {
        if shape < 1.0 {
            let boost = self.open_unit().powf(1.0 / shape);
            return self.standard_gamma(shape + 1.0) * boost;
        }

        let d = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();
        loop {
            let x = self.standard_normal();
            let v = (1.0 + c * x).powi(3);
            if v <= 0.0 {
                continue;
            }
            let u = self.open_unit();
            if u.ln() < 0.5 * x * x + d - d * v + d * v.ln() {
                return d * v;
            }
        }
    }
}

impl DurationSampler for SeededGammaSampler {
    fn sample(&mut self, parameters: &GammaParameters) -> f64 {
        if !(parameters.shape > 0.0 && parameters.scale > 0.0) {
            log::warn!("Degenerate gamma parameters {:?}, sampling 0.", parameters);
            return 0.0;
        }
        let value = self.standard_gamma(parameters.shape) * parameters.scale;
        if value.is_finite() { value.max(0.0) } else { 0.0 }
    }
}
