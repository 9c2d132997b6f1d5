//! Field registry
//!
//! One immutable table describes every UniProtKB field the crate knows
//! about: whether it can appear in a query, whether it can be requested as a
//! return column, which column label it carries in TSV output, and the
//! value type that decides how a query predicate on it is validated and
//! rendered.

mod databases;
mod table;

use crate::error::{MapperError, Result};
use std::collections::HashMap;
use std::sync::OnceLock;

pub use databases::MAPPING_DATABASES;
pub use table::FIELDS;

/// Value type of a field, as seen by the query builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Boolean,
    DateRange,
    NumericRange,
    /// `xref_<db>`: equality renders `xref:<db>-<value>`, ranges render
    /// `xrefcount_<db>:[low TO high]`
    CrossReference,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::DateRange => "date range",
            FieldType::NumericRange => "numeric range",
            FieldType::CrossReference => "cross-reference",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Column header used by the service in TSV payloads
    pub label: &'static str,
    pub category: &'static str,
    pub field_type: FieldType,
    pub is_default_return: bool,
    pub queryable: bool,
    pub returnable: bool,
}

impl FieldDescriptor {
    /// Database token of a cross-reference field (`xref_pdb` -> `pdb`)
    pub fn xref_database(&self) -> Option<&'static str> {
        match self.field_type {
            FieldType::CrossReference => self.name.strip_prefix("xref_"),
            _ => None,
        }
    }
}

/// Read-only access to field and database metadata
pub trait FieldRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&FieldDescriptor>;

    fn fields(&self) -> Vec<&FieldDescriptor>;

    /// Distinct categories in table order
    fn categories(&self) -> Vec<&str>;

    fn default_return_fields(&self) -> Vec<&str>;

    fn supported_databases(&self) -> Vec<&str>;

    fn is_supported_database(&self, name: &str) -> bool;

    fn fields_in_category(&self, category: &str) -> Vec<&FieldDescriptor> {
        self.fields()
            .into_iter()
            .filter(|f| f.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Resolve a TSV column header back to its field
    fn lookup_label(&self, label: &str) -> Option<&FieldDescriptor> {
        self.fields().into_iter().find(|f| f.label == label)
    }

    /// Every name must be a known, returnable field
    fn validate_return_fields(&self, names: &[String]) -> Result<()> {
        for name in names {
            match self.lookup(name) {
                Some(field) if field.returnable => {}
                _ => return Err(MapperError::UnknownField(name.clone())),
            }
        }
        Ok(())
    }
}

/// Registry backed by the built-in tables
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRegistry;

fn index() -> &'static HashMap<&'static str, usize> {
    static INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
    INDEX.get_or_init(|| FIELDS.iter().enumerate().map(|(i, f)| (f.name, i)).collect())
}

impl FieldRegistry for StaticRegistry {
    fn lookup(&self, name: &str) -> Option<&FieldDescriptor> {
        index().get(name).map(|&i| &FIELDS[i])
    }

    fn fields(&self) -> Vec<&FieldDescriptor> {
        FIELDS.iter().collect()
    }

    fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for field in FIELDS {
            if !out.contains(&field.category) {
                out.push(field.category);
            }
        }
        out
    }

    fn default_return_fields(&self) -> Vec<&str> {
        FIELDS
            .iter()
            .filter(|f| f.is_default_return)
            .map(|f| f.name)
            .collect()
    }

    fn supported_databases(&self) -> Vec<&str> {
        let mut dbs: Vec<&str> = MAPPING_DATABASES
            .iter()
            .flat_map(|(_, names)| names.iter().copied())
            .collect();
        dbs.sort_unstable();
        dbs
    }

    fn is_supported_database(&self, name: &str) -> bool {
        MAPPING_DATABASES
            .iter()
            .any(|(_, names)| names.contains(&name))
    }
}
