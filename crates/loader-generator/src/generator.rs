//! Row generator producing one synthetic row per cursor index.

use crate::generators::{generate_value, timestamp::cursor_timestamp};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use loader_core::{ColumnType, ContainerSchema, Row, SchemaError};
use rand::Rng;

/// Default step between consecutive rows' timestamps, in milliseconds.
pub const DEFAULT_DECREASE_UNIT_MS: i64 = 1000;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Column strategy does not fit the column type
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The cursor walked the timestamp out of the representable range
    #[error("Timestamp for cursor {cursor} is out of range")]
    TimestampOutOfRange { cursor: u64 },
}

/// Generates rows whose timestamps walk backwards from a base time.
///
/// Row `i` carries `base_time - i * decrease_unit` in every timestamp
/// column, so timestamps strictly decrease with the cursor and never collide
/// within one run. All other columns are drawn from the caller's RNG.
#[derive(Debug, Clone)]
pub struct RowGenerator {
    /// Timestamp of cursor 0, truncated to milliseconds
    base_time: DateTime<Utc>,
    /// Step between consecutive cursors, at least one millisecond
    decrease_unit_ms: i64,
}

impl RowGenerator {
    /// Create a generator anchored at `base_time`.
    pub fn new(base_time: DateTime<Utc>) -> Self {
        Self {
            base_time: base_time.trunc_subsecs(3),
            decrease_unit_ms: DEFAULT_DECREASE_UNIT_MS,
        }
    }

    /// Create a generator anchored at the current time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Set the step between consecutive rows. Values under one millisecond
    /// are raised to one millisecond.
    pub fn with_decrease_unit(mut self, unit: TimeDelta) -> Self {
        self.decrease_unit_ms = unit.num_milliseconds().max(1);
        self
    }

    /// Timestamp of cursor 0.
    pub fn base_time(&self) -> DateTime<Utc> {
        self.base_time
    }

    /// Step between consecutive rows.
    pub fn decrease_unit(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.decrease_unit_ms)
    }

    /// Timestamp assigned to the row at `cursor`.
    pub fn timestamp_at(&self, cursor: u64) -> Result<DateTime<Utc>, GeneratorError> {
        cursor_timestamp(self.base_time, cursor, self.decrease_unit_ms)
            .ok_or(GeneratorError::TimestampOutOfRange { cursor })
    }

    /// Generate the row at `cursor` for `schema`.
    pub fn next<R: Rng>(
        &self,
        schema: &ContainerSchema,
        cursor: u64,
        rng: &mut R,
    ) -> Result<Row, GeneratorError> {
        let cursor_time = if schema
            .columns
            .iter()
            .any(|c| c.column_type == ColumnType::Timestamp)
        {
            Some(self.timestamp_at(cursor)?)
        } else {
            None
        };

        let mut values = Vec::with_capacity(schema.width());
        for column in &schema.columns {
            column.strategy.check(column.column_type).map_err(|reason| {
                SchemaError::mismatch(&schema.name, format!("column '{}': {reason}", column.name))
            })?;

            let value = generate_value(&column.strategy, rng, cursor_time).ok_or_else(|| {
                SchemaError::mismatch(
                    &schema.name,
                    format!("column '{}' has no cursor time", column.name),
                )
            })?;
            values.push(value);
        }

        Ok(Row::new(values))
    }

    /// Lazily generate rows for cursors `0..count`.
    pub fn rows<'a, R: Rng>(
        &'a self,
        schema: &'a ContainerSchema,
        count: u64,
        rng: &'a mut R,
    ) -> RowIterator<'a, R> {
        RowIterator {
            generator: self,
            schema,
            rng,
            cursor: 0,
            count,
        }
    }
}

/// Iterator that lazily generates rows.
pub struct RowIterator<'a, R: Rng> {
    generator: &'a RowGenerator,
    schema: &'a ContainerSchema,
    rng: &'a mut R,
    cursor: u64,
    count: u64,
}

impl<R: Rng> Iterator for RowIterator<'_, R> {
    type Item = Result<Row, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.count {
            return None;
        }

        let row = self.generator.next(self.schema, self.cursor, self.rng);
        self.cursor += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.cursor) as usize;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for RowIterator<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use loader_core::{ColumnSpec, ContainerKind, Template, Value, ValueStrategy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_series_timestamps_strictly_decrease() {
        let schema = Template::OneThousandRows.schema();
        let generator = RowGenerator::new(base());
        let mut rng = StdRng::seed_from_u64(42);

        let rows: Vec<Row> = generator
            .rows(&schema, 1000, &mut rng)
            .collect::<Result<_, _>>()
            .unwrap();

        let keys: Vec<DateTime<Utc>> = rows
            .iter()
            .map(|r| *r.get(0).and_then(Value::as_timestamp).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), 1000);
        assert_eq!(keys[0], base());
        assert_eq!(keys[1], base() - TimeDelta::milliseconds(1000));
    }

    #[test]
    fn test_dual_timestamps_move_together() {
        let schema = Template::MultipleTimeColumns.schema();
        let generator = RowGenerator::new(base());
        let mut rng = StdRng::seed_from_u64(1);

        for cursor in 0..10 {
            let row = generator.next(&schema, cursor, &mut rng).unwrap();
            assert_eq!(row.len(), 4);
            assert_eq!(row.get(0), row.get(1));

            let token = row.get(2).and_then(Value::as_str).unwrap();
            let n: i32 = token.strip_prefix("test-").unwrap().parse().unwrap();
            assert!((400..500).contains(&n));

            let v = row.get(3).and_then(Value::as_i32).unwrap();
            assert!((-50..50).contains(&v));
        }
    }

    #[test]
    fn test_multiple_type_shapes() {
        let schema = Template::MultipleType.schema();
        let generator = RowGenerator::new(base());
        let mut rng = StdRng::seed_from_u64(3);

        for row in generator.rows(&schema, 100, &mut rng) {
            let row = row.unwrap();
            let types: Vec<ColumnType> = row.values().iter().map(Value::column_type).collect();
            let expected: Vec<ColumnType> =
                schema.columns.iter().map(|c| c.column_type).collect();
            assert_eq!(types, expected);

            assert!((0..1000).contains(&row.get(1).and_then(Value::as_i32).unwrap()));
            let s = row.get(2).and_then(Value::as_str).unwrap();
            assert_eq!(s.len(), 8);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!((0.0..1.0).contains(&row.get(4).and_then(Value::as_f64).unwrap()));
            assert!((0.0..1.0).contains(&row.get(5).and_then(Value::as_f32).unwrap()));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let schema = Template::MultipleType.schema();
        let generator = RowGenerator::new(base());

        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        for cursor in 0..5 {
            assert_eq!(
                generator.next(&schema, cursor, &mut rng1).unwrap(),
                generator.next(&schema, cursor, &mut rng2).unwrap()
            );
        }
    }

    #[test]
    fn test_base_time_truncated_to_millis() {
        let precise = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let generator = RowGenerator::new(precise);
        assert_eq!(generator.base_time().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_custom_decrease_unit() {
        let generator = RowGenerator::new(base()).with_decrease_unit(TimeDelta::seconds(60));
        assert_eq!(
            generator.timestamp_at(2).unwrap(),
            base() - TimeDelta::minutes(2)
        );

        let clamped = RowGenerator::new(base()).with_decrease_unit(TimeDelta::zero());
        assert_eq!(clamped.decrease_unit(), TimeDelta::milliseconds(1));
    }

    #[test]
    fn test_mismatched_strategy_is_schema_error() {
        let schema = ContainerSchema::new(
            "broken",
            ContainerKind::Collection,
            vec![ColumnSpec::new("flag", 0, ColumnType::Bool).with_strategy(ValueStrategy::Cursor)],
        );
        let generator = RowGenerator::new(base());
        let mut rng = StdRng::seed_from_u64(0);

        let result = generator.next(&schema, 0, &mut rng);
        assert!(matches!(
            result,
            Err(GeneratorError::Schema(SchemaError::SchemaMismatch { .. }))
        ));
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let schema = Template::OneThousandRows.schema();
        let generator = RowGenerator::new(base());
        let mut rng = StdRng::seed_from_u64(0);

        let result = generator.next(&schema, u64::MAX, &mut rng);
        assert!(matches!(
            result,
            Err(GeneratorError::TimestampOutOfRange { cursor: u64::MAX })
        ));
    }

    #[test]
    fn test_row_iterator_len() {
        let schema = Template::MultipleTimeColumns.schema();
        let generator = RowGenerator::new(base());
        let mut rng = StdRng::seed_from_u64(0);

        let iter = generator.rows(&schema, 10, &mut rng);
        assert_eq!(iter.len(), 10);
        assert_eq!(iter.count(), 10);
    }
}
