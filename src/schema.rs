//! Declared relational tables the SQL compiler targets.
//!
//! Each logical ledger table maps predicate attribute names onto physical
//! columns, records their static types, and lists the foreign keys that
//! existential quantifiers may traverse. Tables are static configuration;
//! nothing here is inferred from data.

use std::{
    collections::BTreeMap,
    sync::{Arc, LazyLock},
};

use crate::typecheck::Type;

/// Physical column type, which decides how a column is read as a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Bytea,
    Jsonb,
    Bigint,
    Integer,
    Boolean,
    Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumn {
    /// Physical column name.
    pub name: String,
    /// Type seen by predicates.
    pub ty: Type,
    pub sql_type: SqlType,
}

/// Link from a table to a child table, traversed by `name(body)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub table: Arc<SqlTable>,
    /// Column on the outer table.
    pub local_column: String,
    /// Column on `table` that must equal `local_column`.
    pub foreign_column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlTable {
    pub name: String,
    /// Alias used to qualify every column reference.
    pub alias: String,
    pub columns: BTreeMap<String, SqlColumn>,
    pub foreign_keys: BTreeMap<String, ForeignKey>,
}

impl SqlTable {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        SqlTable {
            name: name.into(),
            alias: alias.into(),
            columns: BTreeMap::new(),
            foreign_keys: BTreeMap::new(),
        }
    }

    /// Declare attribute `attr`, stored in column `column`.
    pub fn with_column(
        mut self,
        attr: impl Into<String>,
        column: impl Into<String>,
        ty: Type,
        sql_type: SqlType,
    ) -> Self {
        self.columns.insert(
            attr.into(),
            SqlColumn {
                name: column.into(),
                ty,
                sql_type,
            },
        );
        self
    }

    /// Declare existential `attr`, joining `table` on
    /// `table.foreign_column = self.local_column`.
    pub fn with_foreign_key(
        mut self,
        attr: impl Into<String>,
        table: Arc<SqlTable>,
        local_column: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self {
        self.foreign_keys.insert(
            attr.into(),
            ForeignKey {
                table,
                local_column: local_column.into(),
                foreign_column: foreign_column.into(),
            },
        );
        self
    }

    pub fn column(&self, attr: &str) -> Option<&SqlColumn> {
        self.columns.get(attr)
    }

    pub fn foreign_key(&self, attr: &str) -> Option<&ForeignKey> {
        self.foreign_keys.get(attr)
    }

    /// `alias."column"`
    pub fn qualify(&self, column: &str) -> String {
        format!("{}.\"{}\"", self.alias, column)
    }
}

/// Columns shared by inputs and outputs: the asset and account being moved.
fn with_movement_columns(table: SqlTable) -> SqlTable {
    table
        .with_column("type", "type", Type::String, SqlType::Text)
        .with_column("asset_id", "asset_id", Type::String, SqlType::Bytea)
        .with_column("asset_alias", "asset_alias", Type::String, SqlType::Text)
        .with_column("asset_definition", "asset_definition", Type::Object, SqlType::Jsonb)
        .with_column("asset_tags", "asset_tags", Type::Object, SqlType::Jsonb)
        .with_column("asset_is_local", "asset_local", Type::Bool, SqlType::Boolean)
        .with_column("amount", "amount", Type::Integer, SqlType::Bigint)
        .with_column("account_id", "account_id", Type::String, SqlType::Text)
        .with_column("account_alias", "account_alias", Type::String, SqlType::Text)
        .with_column("account_tags", "account_tags", Type::Object, SqlType::Jsonb)
        .with_column("reference_data", "reference_data", Type::Object, SqlType::Jsonb)
        .with_column("is_local", "local", Type::Bool, SqlType::Boolean)
}

static INPUTS: LazyLock<Arc<SqlTable>> = LazyLock::new(|| {
    Arc::new(
        with_movement_columns(SqlTable::new("annotated_inputs", "inp"))
            .with_column("issuance_program", "issuance_program", Type::String, SqlType::Bytea)
            .with_column("spent_output_id", "spent_output_id", Type::String, SqlType::Bytea),
    )
});

static OUTPUTS: LazyLock<Arc<SqlTable>> = LazyLock::new(|| {
    Arc::new(
        with_movement_columns(SqlTable::new("annotated_outputs", "out"))
            .with_column("id", "output_id", Type::String, SqlType::Bytea)
            .with_column("purpose", "purpose", Type::String, SqlType::Text)
            .with_column("transaction_id", "tx_hash", Type::String, SqlType::Bytea)
            .with_column("position", "output_index", Type::Integer, SqlType::Integer)
            .with_column("control_program", "control_program", Type::String, SqlType::Bytea),
    )
});

static TRANSACTIONS: LazyLock<Arc<SqlTable>> = LazyLock::new(|| {
    Arc::new(
        SqlTable::new("annotated_txs", "txs")
            .with_column("id", "tx_hash", Type::String, SqlType::Bytea)
            .with_column("timestamp", "timestamp", Type::String, SqlType::Timestamp)
            .with_column("block_id", "block_id", Type::String, SqlType::Bytea)
            .with_column("block_height", "block_height", Type::Integer, SqlType::Bigint)
            .with_column("position", "tx_pos", Type::Integer, SqlType::Integer)
            .with_column("reference_data", "data", Type::Object, SqlType::Jsonb)
            .with_column("is_local", "local", Type::Bool, SqlType::Boolean)
            .with_foreign_key("inputs", INPUTS.clone(), "tx_hash", "tx_hash")
            .with_foreign_key("outputs", OUTPUTS.clone(), "tx_hash", "tx_hash"),
    )
});

static ACCOUNTS: LazyLock<Arc<SqlTable>> = LazyLock::new(|| {
    Arc::new(
        SqlTable::new("annotated_accounts", "acc")
            .with_column("id", "id", Type::String, SqlType::Text)
            .with_column("alias", "alias", Type::String, SqlType::Text)
            .with_column("quorum", "quorum", Type::Integer, SqlType::Integer)
            .with_column("tags", "tags", Type::Object, SqlType::Jsonb),
    )
});

static ASSETS: LazyLock<Arc<SqlTable>> = LazyLock::new(|| {
    Arc::new(
        SqlTable::new("annotated_assets", "ast")
            .with_column("id", "id", Type::String, SqlType::Bytea)
            .with_column("alias", "alias", Type::String, SqlType::Text)
            .with_column("issuance_program", "issuance_program", Type::String, SqlType::Bytea)
            .with_column("quorum", "quorum", Type::Integer, SqlType::Integer)
            .with_column("definition", "definition", Type::Object, SqlType::Jsonb)
            .with_column("tags", "tags", Type::Object, SqlType::Jsonb)
            .with_column("is_local", "local", Type::Bool, SqlType::Boolean),
    )
});

pub fn transactions() -> Arc<SqlTable> {
    TRANSACTIONS.clone()
}

/// Unspent outputs.
pub fn outputs() -> Arc<SqlTable> {
    OUTPUTS.clone()
}

pub fn inputs() -> Arc<SqlTable> {
    INPUTS.clone()
}

pub fn accounts() -> Arc<SqlTable> {
    ACCOUNTS.clone()
}

pub fn assets() -> Arc<SqlTable> {
    ASSETS.clone()
}

/// Names accepted by [`ledger_table`].
pub const LEDGER_TABLES: [&str; 5] = ["transactions", "outputs", "inputs", "accounts", "assets"];

/// Look up a built-in ledger table by its logical name.
pub fn ledger_table(name: &str) -> Option<Arc<SqlTable>> {
    match name {
        "transactions" => Some(transactions()),
        "outputs" => Some(outputs()),
        "inputs" => Some(inputs()),
        "accounts" => Some(accounts()),
        "assets" => Some(assets()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transactions_link_inputs_and_outputs() {
        let txs = transactions();
        let inputs = txs.foreign_key("inputs").unwrap();
        assert_eq!(inputs.table.alias, "inp");
        assert_eq!(inputs.local_column, "tx_hash");
        assert_eq!(txs.foreign_key("outputs").unwrap().table.name, "annotated_outputs");
    }

    #[test]
    fn test_every_ledger_table_resolves() {
        for name in LEDGER_TABLES {
            assert!(ledger_table(name).is_some(), "missing table {name}");
        }
        assert!(ledger_table("blocks").is_none());
    }
}
