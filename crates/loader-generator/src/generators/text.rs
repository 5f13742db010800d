//! String value generators.

use loader_core::Value;
use rand::distr::Alphanumeric;
use rand::Rng;

/// Generate `prefix` followed by a uniform number in `[base, base + spread)`.
///
/// `spread` must be positive.
pub fn generate_token<R: Rng>(rng: &mut R, prefix: &str, base: i32, spread: i32) -> Value {
    let n = i64::from(base) + i64::from(rng.random_range(0..spread));
    Value::String(format!("{prefix}{n}"))
}

/// Generate a string of `length` characters drawn from `A-Z`, `a-z`, `0-9`.
pub fn generate_alphanumeric<R: Rng>(rng: &mut R, length: usize) -> Value {
    let s: String = (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();
    Value::String(s)
}
