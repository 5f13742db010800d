//! Container schema definitions for griddb-loader.
//!
//! A container is either a keyed collection or a time series. Both carry a
//! fixed, ordered list of columns; the position of a column is its wire
//! order. Each column also names the [`ValueStrategy`] used when synthetic
//! rows are generated for it.
//!
//! ## Invariants
//!
//! - positions are `0..n`, unique and in declaration order
//! - a collection has zero or one key column
//! - a time series has exactly one key column, a `Timestamp` at position 0
//! - every column's strategy produces values of the column's type
//!
//! [`ContainerSchema::validate`] checks all of the above.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading a template file
    #[error("Failed to read template file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Template id is not registered
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Schema violates a container invariant or declares an unsupported type
    #[error("Schema mismatch in container '{container}': {reason}")]
    SchemaMismatch { container: String, reason: String },
}

impl SchemaError {
    /// Build a `SchemaMismatch` error.
    pub fn mismatch(container: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            container: container.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Column Types
// ============================================================================

/// Column types supported by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Timestamp,
    Integer,
    String,
    Bool,
    Double,
    Float,
}

impl ColumnType {
    /// Type name as understood by the GridDB Web API.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Timestamp => "TIMESTAMP",
            Self::Integer => "INTEGER",
            Self::String => "STRING",
            Self::Bool => "BOOL",
            Self::Double => "DOUBLE",
            Self::Float => "FLOAT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Error returned when a type name is not one of the supported column types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported column type '{0}'")]
pub struct UnsupportedColumnType(pub String);

impl FromStr for ColumnType {
    type Err = UnsupportedColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TIMESTAMP" => Ok(Self::Timestamp),
            "INTEGER" | "INT" => Ok(Self::Integer),
            "STRING" => Ok(Self::String),
            "BOOL" | "BOOLEAN" => Ok(Self::Bool),
            "DOUBLE" => Ok(Self::Double),
            "FLOAT" => Ok(Self::Float),
            _ => Err(UnsupportedColumnType(s.to_string())),
        }
    }
}

// ============================================================================
// Value Strategies
// ============================================================================

/// How synthetic values are produced for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueStrategy {
    /// Timestamp derived from the row's cursor index
    Cursor,

    /// Uniform integer in `[0, bound)`, shifted by `bias`
    UniformInt {
        /// Exclusive upper bound before the bias is applied
        bound: i32,
        /// Offset added to every value
        #[serde(default)]
        bias: i32,
    },

    /// `prefix` followed by a uniform number in `[base, base + spread)`
    Token {
        prefix: String,
        base: i32,
        spread: i32,
    },

    /// Uniform string over `A-Z`, `a-z`, `0-9`
    Alphanumeric { length: usize },

    /// Fair coin flip
    CoinFlip,

    /// Uniform `f64` in `[0, 1)`
    UnitDouble,

    /// Uniform `f32` in `[0, 1)`
    UnitFloat,
}

impl ValueStrategy {
    /// Strategy used when a template column does not name one.
    pub fn default_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Timestamp => Self::Cursor,
            ColumnType::Integer => Self::UniformInt {
                bound: 1000,
                bias: 0,
            },
            ColumnType::String => Self::Alphanumeric { length: 8 },
            ColumnType::Bool => Self::CoinFlip,
            ColumnType::Double => Self::UnitDouble,
            ColumnType::Float => Self::UnitFloat,
        }
    }

    /// Whether this strategy produces values of `column_type`.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Self::Cursor, ColumnType::Timestamp)
                | (Self::UniformInt { .. }, ColumnType::Integer)
                | (Self::Token { .. }, ColumnType::String)
                | (Self::Alphanumeric { .. }, ColumnType::String)
                | (Self::CoinFlip, ColumnType::Bool)
                | (Self::UnitDouble, ColumnType::Double)
                | (Self::UnitFloat, ColumnType::Float)
        )
    }

    /// Check that this strategy fits `column_type` and that its parameters
    /// describe a non-empty value range.
    pub fn check(&self, column_type: ColumnType) -> Result<(), String> {
        if !self.fits(column_type) {
            return Err(format!("strategy {self:?} cannot produce {column_type} values"));
        }
        match self {
            Self::UniformInt { bound, .. } if *bound <= 0 => {
                Err(format!("uniform_int bound must be positive, got {bound}"))
            }
            Self::UniformInt { bound, bias } if (bound - 1).checked_add(*bias).is_none() => Err(
                format!("uniform_int bound {bound} with bias {bias} exceeds the INTEGER range"),
            ),
            Self::Token { spread, .. } if *spread <= 0 => {
                Err(format!("token spread must be positive, got {spread}"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Columns and Containers
// ============================================================================

/// A single column of a container schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Zero-based wire position
    pub position: usize,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether this is the container's key column
    #[serde(default)]
    pub is_key: bool,

    /// Generation rule for synthetic values
    pub strategy: ValueStrategy,
}

impl ColumnSpec {
    /// Create a non-key column using the default strategy for its type.
    pub fn new(name: impl Into<String>, position: usize, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            position,
            column_type,
            is_key: false,
            strategy: ValueStrategy::default_for(column_type),
        }
    }

    /// Replace the generation strategy.
    pub fn with_strategy(mut self, strategy: ValueStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Mark this column as the container key.
    pub fn as_key(mut self) -> Self {
        self.is_key = true;
        self
    }
}

/// Container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Generic keyed collection
    Collection,
    /// Time-ordered series keyed by a timestamp
    TimeSeries,
}

impl ContainerKind {
    /// Container type as understood by the GridDB Web API.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Collection => "COLLECTION",
            Self::TimeSeries => "TIME_SERIES",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Fixed column layout of a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSchema {
    /// Schema name (the template's name, not necessarily the container's)
    pub name: String,

    /// Container kind
    pub kind: ContainerKind,

    /// Columns in wire order
    pub columns: Vec<ColumnSpec>,
}

impl ContainerSchema {
    /// Create a schema from already-positioned columns.
    pub fn new(name: impl Into<String>, kind: ContainerKind, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            kind,
            columns,
        }
    }

    /// Start a builder that assigns positions in declaration order.
    pub fn builder(name: impl Into<String>, kind: ContainerKind) -> ContainerSchemaBuilder {
        ContainerSchemaBuilder {
            name: name.into(),
            kind,
            columns: Vec::new(),
        }
    }

    /// The key column, if any.
    pub fn key_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.is_key)
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All column names in wire order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Check every container invariant.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::mismatch(&self.name, "schema has no columns"));
        }

        let mut seen = HashSet::new();
        for (idx, column) in self.columns.iter().enumerate() {
            if column.position != idx {
                return Err(SchemaError::mismatch(
                    &self.name,
                    format!(
                        "column '{}' declares position {} but is column {idx}",
                        column.name, column.position
                    ),
                ));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::mismatch(
                    &self.name,
                    format!("duplicate column name '{}'", column.name),
                ));
            }
            if let Err(reason) = column.strategy.check(column.column_type) {
                return Err(SchemaError::mismatch(
                    &self.name,
                    format!("column '{}': {reason}", column.name),
                ));
            }
        }

        let keys: Vec<&ColumnSpec> = self.columns.iter().filter(|c| c.is_key).collect();
        match self.kind {
            ContainerKind::Collection => {
                if keys.len() > 1 {
                    return Err(SchemaError::mismatch(
                        &self.name,
                        format!("collection declares {} key columns", keys.len()),
                    ));
                }
                if let Some(key) = keys.iter().find(|k| k.position != 0) {
                    return Err(SchemaError::mismatch(
                        &self.name,
                        format!(
                            "collection key '{}' must be at position 0, found at {}",
                            key.name, key.position
                        ),
                    ));
                }
            }
            ContainerKind::TimeSeries => {
                let [key] = keys.as_slice() else {
                    return Err(SchemaError::mismatch(
                        &self.name,
                        format!(
                            "time series needs exactly one key column, found {}",
                            keys.len()
                        ),
                    ));
                };
                if key.position != 0 || key.column_type != ColumnType::Timestamp {
                    return Err(SchemaError::mismatch(
                        &self.name,
                        format!(
                            "time series key '{}' must be a TIMESTAMP at position 0",
                            key.name
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Builder for [`ContainerSchema`].
pub struct ContainerSchemaBuilder {
    name: String,
    kind: ContainerKind,
    columns: Vec<ColumnSpec>,
}

impl ContainerSchemaBuilder {
    /// Append a column with its default strategy.
    pub fn column(self, name: impl Into<String>, column_type: ColumnType) -> Self {
        let strategy = ValueStrategy::default_for(column_type);
        self.column_with(name, column_type, strategy)
    }

    /// Append a column with an explicit strategy.
    pub fn column_with(
        mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        strategy: ValueStrategy,
    ) -> Self {
        let position = self.columns.len();
        self.columns
            .push(ColumnSpec::new(name, position, column_type).with_strategy(strategy));
        self
    }

    /// Append the key column.
    pub fn key(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        let position = self.columns.len();
        self.columns
            .push(ColumnSpec::new(name, position, column_type).as_key());
        self
    }

    /// Build the schema.
    pub fn build(self) -> ContainerSchema {
        ContainerSchema {
            name: self.name,
            kind: self.kind,
            columns: self.columns,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
