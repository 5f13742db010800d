//! Individual value generators for each column strategy.
//!
//! This module provides the generation logic for each [`ValueStrategy`].
//! Timestamps are not random: they are derived from the row's cursor index
//! by the caller and passed in.

pub mod numeric;
pub mod text;
pub mod timestamp;

use chrono::{DateTime, Utc};
use loader_core::{Value, ValueStrategy};
use rand::Rng;

/// Generate a value for a column.
///
/// Returns `None` only for [`ValueStrategy::Cursor`] when no cursor time was
/// supplied.
pub fn generate_value<R: Rng>(
    strategy: &ValueStrategy,
    rng: &mut R,
    cursor_time: Option<DateTime<Utc>>,
) -> Option<Value> {
    let value = match strategy {
        ValueStrategy::Cursor => Value::Timestamp(cursor_time?),

        ValueStrategy::UniformInt { bound, bias } => {
            numeric::generate_uniform_int(rng, *bound, *bias)
        }

        ValueStrategy::Token {
            prefix,
            base,
            spread,
        } => text::generate_token(rng, prefix, *base, *spread),

        ValueStrategy::Alphanumeric { length } => text::generate_alphanumeric(rng, *length),

        ValueStrategy::CoinFlip => Value::Bool(rng.random_bool(0.5)),

        ValueStrategy::UnitDouble => numeric::generate_unit_double(rng),

        ValueStrategy::UnitFloat => numeric::generate_unit_float(rng),
    };
    Some(value)
}
