//! Documentation content for the lq CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Existentials,
    Placeholders,
    Tables,
    Backends,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "existentials" | "existential" | "exists" => Some(Self::Existentials),
            "placeholders" | "placeholder" | "params" => Some(Self::Placeholders),
            "tables" | "table" | "schema" => Some(Self::Tables),
            "backends" | "backend" | "sql" | "shapes" => Some(Self::Backends),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"LEDGER QUERY DOCUMENTATION

Predicates are boolean filters over ledger transactions, unspent outputs,
accounts and assets. A predicate is parsed and type-checked once, then
evaluated directly, compiled to SQL, or reduced to containment shapes.

DOCUMENTATION CATEGORIES

  syntax            Literals, attributes, selectors and grouping
  operators         Comparison and logical operators, precedence
  existentials      name(body) quantifiers over lists of sub-objects
  placeholders      $1, $2, ... and how values are bound
  tables            Built-in tables, their attributes and foreign keys
  backends          Direct evaluation, SQL compilation and shapes

QUICK REFERENCE

  'text'  42  0x2a           String and integer literals
  asset_alias                Attribute
  reference_data.invoice     Selector into a JSON object
  inputs(amount > 10)        Existential over a sub-object list
  $1                         Placeholder
  AND  OR  =  !=  <  <=  >  >=

Run 'lq doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Existentials) => Ok(EXISTENTIALS_DOC),
        Some(DocCategory::Placeholders) => Ok(PLACEHOLDERS_DOC),
        Some(DocCategory::Tables) => Ok(TABLES_DOC),
        Some(DocCategory::Backends) => Ok(BACKENDS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Literals, Attributes and Selectors

Predicates are ASCII text. Spaces, tabs and newlines between tokens are
ignored. There are no comments.

LITERALS

  'gold'          String. Single quotes only; no escapes, no backslashes.
  42              Decimal integer. No leading zeros: 042 is rejected.
  0x2a            Hexadecimal integer, printed back as 42.

ATTRIBUTES

  asset_alias     A top-level attribute of the object being filtered.

SELECTORS

  A dot reads a field of an object-valued attribute. Chains read deeper.

  reference_data.invoice_id = 'inv-17'
  account_tags.owner.name = 'alice'

  A selector path used in several places must be used with one type
  throughout: reference_data.n cannot be compared to both 1 and '1'.

GROUPING

  Parentheses group and are kept when the predicate is printed back.

  (asset_alias = 'gold' OR asset_alias = 'silver') AND amount > 10

EMPTY PREDICATE

  The empty predicate matches everything.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Comparison and Logical

COMPARISON

  =   !=          Equality; operands must have the same type
  <   <=  >  >=   Ordering; strings or integers only

LOGICAL

  AND  OR         Keywords are case-insensitive: and, Or, OR

PRECEDENCE (loosest first, all left-associative)

  1  OR
  2  AND
  3  =  !=  <  <=  >  >=

  a = 1 AND b = 2 OR c = 3 AND d = 4
  groups as
  (a = 1 AND b = 2) OR (c = 3 AND d = 4)

MISSING DATA

  When evaluated directly, a comparison involving a missing attribute or
  mismatched types is false. It is never an error.

  foo = 'bar'     against {}       false
  foo != 'bar'    against {}       false
"#;

const EXISTENTIALS_DOC: &str = r#"EXISTENTIALS - Quantifiers over Sub-object Lists

  name(body)

Holds when at least one element of the list `name` satisfies `body`.
Inside the body, attributes refer to the element.

EXAMPLES

  inputs(account_alias = 'alice')
  inputs(asset_alias = 'gold' AND amount > 100) AND outputs(account_alias = 'bob')

With {"inputs": [{"a": 1}, {"a": 2}]}:

  inputs(a = 1)     true
  inputs(a = 3)     false
  inputs(a = $1)    true exactly when $1 is 1 or 2

An absent list, or a list that holds anything but objects, is false.
Against the transactions table, only `inputs` and `outputs` are valid.
"#;

const PLACEHOLDERS_DOC: &str = r#"PLACEHOLDERS - Externally Supplied Values

  $1  $2  $3 ...

Placeholders stand for values passed next to the predicate, for example
with --values '["gold", 100]'. $0 is rejected. Indices need not be
contiguous; the largest index is the predicate's arity.

UNBOUND PLACEHOLDERS

  When no value is supplied, `lq check` reports which values would make
  the predicate true:

  lq check 'inputs(a = $1)' --input '{"inputs": [{"a": 1}, {"a": 2}]}'
  {"matched":true,"result":{"in":["1","2"]}}

  A result of {"not": [...]} means every value except those listed.
  Comparing two unbound placeholders with each other is an error.

  SQL compilation and shapes require every placeholder to be bound.
"#;

const TABLES_DOC: &str = r#"TABLES - Built-in Schemas

Use with 'lq sql --table <name>'. Selector roots must be object (JSONB)
attributes.

  transactions   id, timestamp, block_id, block_height, position,
                 reference_data (object), is_local (bool)
                 existentials: inputs(...), outputs(...)

  outputs        id, type, purpose, transaction_id, position, amount,
                 asset_id, asset_alias, asset_definition (object),
                 asset_tags (object), asset_is_local (bool),
                 account_id, account_alias, account_tags (object),
                 control_program, reference_data (object), is_local (bool)

  inputs         type, amount, asset_id, asset_alias,
                 asset_definition (object), asset_tags (object),
                 asset_is_local (bool), account_id, account_alias,
                 account_tags (object), issuance_program,
                 spent_output_id, reference_data (object), is_local (bool)

  accounts       id, alias, quorum, tags (object)

  assets         id, alias, issuance_program, quorum,
                 definition (object), tags (object), is_local (bool)
"#;

const BACKENDS_DOC: &str = r#"BACKENDS - Evaluation, SQL and Shapes

DIRECT EVALUATION

  lq check <predicate> --input '<json object>' [--values '[...]']

  Permissive: missing attributes and type mismatches are false.

SQL

  lq sql <predicate> [--table outputs] [--values '[...]'] [--offset N]

  Prints a WHERE-clause fragment and its bind values. Unknown attributes,
  selectors on non-object columns and unbound placeholders are errors.
  --offset N starts parameter numbering at $N+1 (default LQ_PARAM_OFFSET).

  lq sql "asset_id = \$1" --values '["ab12"]'
  {"sql":"encode(out.\"asset_id\", 'hex') = $1","values":["ab12"]}

SHAPES

  lq shapes <predicate> [--values '[...]']

  Prints partial documents; an object matches the predicate when it
  contains one of them. Only =, AND, OR and existentials are supported.

  lq shapes "a = 'abc' OR b = 'xyz'"
  [{"a":"abc"},{"b":"xyz"}]

ENVIRONMENT

  LQ_PARAM_OFFSET          Default --offset (0)
  LQ_MAX_PREDICATE_BYTES   Longest accepted predicate (4096)
  LQ_DEFAULT_TABLE         Default --table (outputs)
  RUST_LOG                 Log filter (warn)
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!(DocCategory::from_name("ops"), Some(DocCategory::Operators));
        assert_eq!(DocCategory::from_name("Tables"), Some(DocCategory::Tables));
        assert_eq!(DocCategory::from_name("nope"), None);
    }

    #[test]
    fn test_unknown_category() {
        assert!(matches!(
            get_doc_category("nope"),
            Err(CliError::UnknownCategory(name)) if name == "nope"
        ));
    }
}
