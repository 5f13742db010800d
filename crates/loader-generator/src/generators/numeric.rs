//! Numeric value generators.

use loader_core::Value;
use rand::Rng;

/// Generate a uniform integer in `[0, bound)` shifted by `bias`.
///
/// `bound` must be positive and `bound - 1 + bias` must fit in an `i32`;
/// [`ValueStrategy::check`](loader_core::ValueStrategy::check) rejects
/// templates that break either rule.
pub fn generate_uniform_int<R: Rng>(rng: &mut R, bound: i32, bias: i32) -> Value {
    Value::Integer(rng.random_range(0..bound).saturating_add(bias))
}

/// Generate a uniform `f64` in `[0, 1)`.
pub fn generate_unit_double<R: Rng>(rng: &mut R) -> Value {
    Value::Double(rng.random::<f64>())
}

/// Generate a uniform `f32` in `[0, 1)`.
pub fn generate_unit_float<R: Rng>(rng: &mut R) -> Value {
    Value::Float(rng.random::<f32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_uniform_int() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let value = generate_uniform_int(&mut rng, 1000, 0);
            if let Value::Integer(v) = value {
                assert!((0..1000).contains(&v));
            } else {
                panic!("Expected Integer value");
            }
        }
    }

    #[test]
    fn test_generate_uniform_int_with_bias() {
        let mut rng = StdRng::seed_from_u64(7);

        let mut saw_negative = false;
        for _ in 0..200 {
            let v = generate_uniform_int(&mut rng, 100, -50).as_i32().unwrap();
            assert!((-50..50).contains(&v));
            saw_negative |= v < 0;
        }
        assert!(saw_negative);
    }

    #[test]
    fn test_generate_unit_ranges() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let d = generate_unit_double(&mut rng).as_f64().unwrap();
            assert!((0.0..1.0).contains(&d));

            let f = generate_unit_float(&mut rng).as_f32().unwrap();
            assert!((0.0..1.0).contains(&f));
        }
    }
}
