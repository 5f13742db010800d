//! Template registry.
//!
//! The registry maps template ids to container schemas. Three templates are
//! built in; more can be loaded from YAML files:
//!
//! ```yaml
//! templates:
//!   - id: sensor-readings
//!     container: sensor_readings
//!     row_count: 100
//!     kind: time_series
//!     columns:
//!       - name: time
//!         type: timestamp
//!         key: true
//!       - name: reading
//!         type: integer
//!         strategy:
//!           type: uniform_int
//!           bound: 100
//!           bias: -50
//! ```
//!
//! Column types are validated when the file is loaded; an unsupported type or
//! a schema that breaks a container invariant is a `SchemaMismatch`.

use crate::schema::{
    ColumnSpec, ColumnType, ContainerKind, ContainerSchema, SchemaError, ValueStrategy,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Built-in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Collection with two timestamp columns moving together
    MultipleTimeColumns,
    /// Time series with five integer columns
    OneThousandRows,
    /// Time series with one column of every non-timestamp type
    MultipleType,
}

impl Template {
    /// Every built-in template, in sample run order.
    pub const ALL: [Template; 3] = [
        Template::MultipleTimeColumns,
        Template::OneThousandRows,
        Template::MultipleType,
    ];

    /// Template id used on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::MultipleTimeColumns => "multiple-time-columns",
            Self::OneThousandRows => "one-thousand-rows",
            Self::MultipleType => "multiple-type",
        }
    }

    /// Container the sample run writes to.
    pub fn container_name(&self) -> &'static str {
        match self {
            Self::MultipleTimeColumns => "Multiple_Time_Columns",
            Self::OneThousandRows => "one_thousand_rows",
            Self::MultipleType => "Multiple_Type",
        }
    }

    /// Row count of the sample run.
    pub fn row_count(&self) -> u64 {
        match self {
            Self::MultipleTimeColumns => 10,
            Self::OneThousandRows => 1000,
            Self::MultipleType => 500,
        }
    }

    /// The template's schema.
    pub fn schema(&self) -> ContainerSchema {
        match self {
            Self::MultipleTimeColumns => {
                ContainerSchema::builder(self.id(), ContainerKind::Collection)
                    .column("time_1", ColumnType::Timestamp)
                    .column("time_2", ColumnType::Timestamp)
                    .column_with(
                        "column1",
                        ColumnType::String,
                        ValueStrategy::Token {
                            prefix: "test-".to_string(),
                            base: 400,
                            spread: 100,
                        },
                    )
                    .column_with(
                        "column2",
                        ColumnType::Integer,
                        ValueStrategy::UniformInt {
                            bound: 100,
                            bias: -50,
                        },
                    )
                    .build()
            }
            Self::OneThousandRows => {
                let ints = ValueStrategy::UniformInt {
                    bound: 1000,
                    bias: 0,
                };
                ContainerSchema::builder(self.id(), ContainerKind::TimeSeries)
                    .key("time", ColumnType::Timestamp)
                    .column_with("column1", ColumnType::Integer, ints.clone())
                    .column_with("column2", ColumnType::Integer, ints.clone())
                    .column_with("column3", ColumnType::Integer, ints.clone())
                    .column_with("column4", ColumnType::Integer, ints.clone())
                    .column_with("column5", ColumnType::Integer, ints)
                    .build()
            }
            Self::MultipleType => ContainerSchema::builder(self.id(), ContainerKind::TimeSeries)
                .key("time", ColumnType::Timestamp)
                .column_with(
                    "column1",
                    ColumnType::Integer,
                    ValueStrategy::UniformInt {
                        bound: 1000,
                        bias: 0,
                    },
                )
                .column_with(
                    "column2",
                    ColumnType::String,
                    ValueStrategy::Alphanumeric { length: 8 },
                )
                .column("column3", ColumnType::Bool)
                .column("column4", ColumnType::Double)
                .column("column5", ColumnType::Float)
                .build(),
        }
    }

    fn definition(&self) -> TemplateDefinition {
        TemplateDefinition {
            id: self.id().to_string(),
            container_name: self.container_name().to_string(),
            row_count: self.row_count(),
            schema: self.schema(),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Template {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| SchemaError::UnknownTemplate(s.to_string()))
    }
}

/// A registered template: schema plus the defaults of its sample run.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    /// Template id
    pub id: String,

    /// Default container name
    pub container_name: String,

    /// Default number of rows to generate
    pub row_count: u64,

    /// Container schema
    pub schema: ContainerSchema,
}

/// Lookup table from template id to schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    templates: Vec<TemplateDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in templates.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for template in Template::ALL {
            registry.register(template.definition());
        }
        registry
    }

    /// Add or replace a template.
    pub fn register(&mut self, definition: TemplateDefinition) {
        match self.index.get(&definition.id) {
            Some(&idx) => self.templates[idx] = definition,
            None => {
                self.index
                    .insert(definition.id.clone(), self.templates.len());
                self.templates.push(definition);
            }
        }
    }

    /// Schema for a template id.
    pub fn schema_for(&self, template_id: &str) -> Result<ContainerSchema, SchemaError> {
        self.get(template_id).map(|d| d.schema.clone())
    }

    /// Full definition for a template id.
    pub fn get(&self, template_id: &str) -> Result<&TemplateDefinition, SchemaError> {
        self.index
            .get(template_id)
            .and_then(|&idx| self.templates.get(idx))
            .ok_or_else(|| SchemaError::UnknownTemplate(template_id.to_string()))
    }

    /// Registered template ids in registration order.
    pub fn template_ids(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.id.as_str()).collect()
    }

    /// Registered templates in registration order.
    pub fn templates(&self) -> &[TemplateDefinition] {
        &self.templates
    }

    /// Load additional templates from a YAML file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, SchemaError> {
        let content = fs::read_to_string(path)?;
        self.register_yaml(&content)
    }

    /// Load additional templates from a YAML string.
    ///
    /// Nothing is registered unless every template in the document is valid.
    pub fn register_yaml(&mut self, yaml: &str) -> Result<usize, SchemaError> {
        let file: TemplateFile = serde_yaml::from_str(yaml)?;
        let definitions = file
            .templates
            .into_iter()
            .map(TemplateEntry::into_definition)
            .collect::<Result<Vec<_>, _>>()?;

        let count = definitions.len();
        for definition in definitions {
            self.register(definition);
        }
        Ok(count)
    }
}

// ============================================================================
// YAML file format
// ============================================================================

#[derive(Debug, Deserialize)]
struct TemplateFile {
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    id: String,
    container: Option<String>,
    #[serde(default = "default_row_count")]
    row_count: u64,
    kind: ContainerKind,
    columns: Vec<ColumnEntry>,
}

#[derive(Debug, Deserialize)]
struct ColumnEntry {
    name: String,
    #[serde(rename = "type")]
    column_type: String,
    #[serde(default)]
    key: bool,
    strategy: Option<ValueStrategy>,
}

fn default_row_count() -> u64 {
    1000
}

impl TemplateEntry {
    fn into_definition(self) -> Result<TemplateDefinition, SchemaError> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for (position, entry) in self.columns.into_iter().enumerate() {
            let column_type = ColumnType::from_str(&entry.column_type)
                .map_err(|e| SchemaError::mismatch(&self.id, e.to_string()))?;
            let mut column = ColumnSpec::new(entry.name, position, column_type);
            if let Some(strategy) = entry.strategy {
                column = column.with_strategy(strategy);
            }
            if entry.key {
                column = column.as_key();
            }
            columns.push(column);
        }

        let schema = ContainerSchema::new(&self.id, self.kind, columns);
        schema.validate()?;

        Ok(TemplateDefinition {
            container_name: self.container.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            row_count: self.row_count,
            schema,
        })
    }
}
