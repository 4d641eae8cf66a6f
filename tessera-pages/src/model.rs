//! Column and field descriptors.
//!
//! This is the minimal surface through which the higher-level schema layer
//! is consumed: a flat list of fields, each contributing zero or more
//! concrete columns. The engine itself only ever works with [`ColumnModel`]s
//! and dense column ids.

use bitcode::{Decode, Encode};

/// On-disk element encoding of a column. All encodings are little-endian
/// and fixed-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum ColumnType {
    /// Cumulative element counts of an offset column (u64).
    Index,
    Byte,
    Int32,
    Int64,
    Real32,
    Real64,
}

impl ColumnType {
    /// Size in bytes of one serialized element.
    pub fn element_size(self) -> usize {
        match self {
            ColumnType::Index => 8,
            ColumnType::Byte => 1,
            ColumnType::Int32 => 4,
            ColumnType::Int64 => 8,
            ColumnType::Real32 => 4,
            ColumnType::Real64 => 8,
        }
    }
}

/// Immutable descriptor of one column.
///
/// `offset_column` is set on pointee columns only and names the offset
/// column whose cumulative counts slice this column into collections.
#[derive(Debug, Clone, Encode, Decode)]
pub struct ColumnModel {
    pub name: String,
    pub column_type: ColumnType,
    pub is_sorted: bool,
    pub offset_column: Option<String>,
}

impl ColumnModel {
    pub fn new(name: impl Into<String>, column_type: ColumnType, is_sorted: bool) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_sorted,
            offset_column: None,
        }
    }

    pub fn with_offset_column(mut self, offset_column: impl Into<String>) -> Self {
        self.offset_column = Some(offset_column.into());
        self
    }

    pub fn element_size(&self) -> usize {
        self.column_type.element_size()
    }

    /// Identity check used when attaching a runtime column to a stored
    /// dataset: name, type and sortedness must agree. The offset-column
    /// back-reference is derived metadata and not part of the identity.
    pub fn matches(&self, other: &ColumnModel) -> bool {
        self.name == other.name
            && self.column_type == other.column_type
            && self.is_sorted == other.is_sorted
    }
}

/// Descriptor of one field in the (external) schema layer.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct FieldModel {
    pub name: String,
    pub type_name: String,
    /// Name of the parent field, or `None` for a top-level field.
    pub parent: Option<String>,
}

/// One schema field together with the concrete columns it connects.
#[derive(Debug, Clone)]
pub struct SchemaField {
    pub field: FieldModel,
    pub columns: Vec<ColumnModel>,
    /// Column count the field declares up front. Independent of `columns`;
    /// dataset creation asserts the two agree.
    declared_columns: usize,
}

impl SchemaField {
    pub fn new(field: FieldModel, declared_columns: usize, columns: Vec<ColumnModel>) -> Self {
        Self {
            field,
            columns,
            declared_columns,
        }
    }

    /// A scalar field backed by a single column of the same name.
    pub fn scalar(name: impl Into<String>, column_type: ColumnType) -> Self {
        let name = name.into();
        let type_name = match column_type {
            ColumnType::Index => "index",
            ColumnType::Byte => "byte",
            ColumnType::Int32 => "int32",
            ColumnType::Int64 => "int64",
            ColumnType::Real32 => "float32",
            ColumnType::Real64 => "float64",
        };
        Self::new(
            FieldModel {
                name: name.clone(),
                type_name: type_name.to_string(),
                parent: None,
            },
            1,
            vec![ColumnModel::new(name, column_type, false)],
        )
    }

    /// A variable-length collection field: an offset column named after the
    /// field plus a pointee column `"<name>._0"` holding the elements.
    pub fn collection(name: impl Into<String>, element_type: ColumnType) -> Self {
        let name = name.into();
        let pointee = format!("{name}._0");
        Self::new(
            FieldModel {
                name: name.clone(),
                type_name: "collection".to_string(),
                parent: None,
            },
            2,
            vec![
                ColumnModel::new(name.clone(), ColumnType::Index, true),
                ColumnModel::new(pointee, element_type, false).with_offset_column(name),
            ],
        )
    }

    /// Column count the field declares, independent of the columns it has
    /// actually connected.
    pub fn n_columns(&self) -> usize {
        self.declared_columns
    }
}

/// The schema collaborator: an ordered set of fields whose columns are
/// registered densely, in schema order, at dataset creation.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: SchemaField) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Declared total column count across all fields.
    pub fn n_columns(&self) -> usize {
        self.fields.iter().map(SchemaField::n_columns).sum()
    }
}
