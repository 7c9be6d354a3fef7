//! Table configuration types (Functional Core - pure data).

use catalog_core::item::keys::{PRODUCT_ID, PRODUCT_OWNER_ID, USER_ID};

/// Table schema configuration. Every catalog table has a single string hash key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: String,
    pub gsis: Vec<GsiConfig>,
}

/// Global Secondary Index configuration, projecting all attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: String,
}

/// Products table: keyed by `id`, with an index on the owning catalog.
/// This is a pure function - no I/O.
pub fn products_table_config(table_name: &str, owner_index: &str) -> TableConfig {
    TableConfig {
        table_name: table_name.to_string(),
        partition_key: PRODUCT_ID.to_string(),
        gsis: vec![GsiConfig {
            name: owner_index.to_string(),
            partition_key: PRODUCT_OWNER_ID.to_string(),
        }],
    }
}

/// Users table: keyed by `userId`, no indexes.
pub fn users_table_config(table_name: &str) -> TableConfig {
    TableConfig {
        table_name: table_name.to_string(),
        partition_key: USER_ID.to_string(),
        gsis: Vec::new(),
    }
}
