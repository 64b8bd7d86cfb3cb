use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source used by simulations and controllers.
pub type GameRng = StdRng;

/// Unseeded generator, drawn from the OS.
pub fn ambient() -> GameRng {
    StdRng::from_os_rng()
}

pub fn seeded(seed: u64) -> GameRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform draw from `[lo, hi]`. Collapses to `lo` when the range is empty.
pub fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Uniform draw from `[-amplitude, amplitude]`; zero for non-positive amplitude.
pub fn symmetric(rng: &mut impl Rng, amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        rng.random_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = seeded(7);
        for _ in 0..1_000 {
            let v = uniform(&mut rng, 40.0, 610.0);
            assert!((40.0..=610.0).contains(&v));
        }
    }

    #[test]
    fn empty_range_collapses_to_lower_bound() {
        let mut rng = seeded(7);
        assert_eq!(uniform(&mut rng, 40.0, 40.0), 40.0);
        assert_eq!(uniform(&mut rng, 40.0, 10.0), 40.0);
    }

    #[test]
    fn symmetric_zero_amplitude_is_zero() {
        let mut rng = seeded(1);
        assert_eq!(symmetric(&mut rng, 0.0), 0.0);
        for _ in 0..100 {
            assert!(symmetric(&mut rng, 5.0).abs() <= 5.0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for _ in 0..10 {
            assert_eq!(uniform(&mut a, 0.0, 1.0), uniform(&mut b, 0.0, 1.0));
        }
    }
}
