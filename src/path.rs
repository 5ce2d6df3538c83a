use crate::ast::Expr;

/// An attribute followed by zero or more selected fields.
///
/// # Examples
///
/// - `asset_alias` → root `asset_alias`, no fields
/// - `reference_data.invoice.id` → root `reference_data`, fields `["invoice", "id"]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPath<'a> {
    pub root: &'a str,
    pub fields: Vec<&'a str>,
}

impl SelectorPath<'_> {
    /// Dotted text form, `root.field.field`.
    pub fn key(&self) -> String {
        let mut key = self.root.to_string();
        for field in &self.fields {
            key.push('.');
            key.push_str(field);
        }
        key
    }

    pub fn is_selector(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Extract the path of an attribute or of a selector chain rooted at an
/// attribute, looking through parentheses.
///
/// Returns `None` for any other expression, including selectors applied to
/// placeholders, literals or existentials.
pub fn extract_path(expr: &Expr) -> Option<SelectorPath<'_>> {
    let mut fields = Vec::new();
    let root = extract_path_recursive(expr, &mut fields)?;
    Some(SelectorPath { root, fields })
}

fn extract_path_recursive<'a>(expr: &'a Expr, fields: &mut Vec<&'a str>) -> Option<&'a str> {
    match expr.unparen() {
        Expr::Attr(name) => Some(name),
        Expr::Selector { object, field } => {
            // Left to right: the object's fields come first
            let root = extract_path_recursive(object, fields)?;
            fields.push(field);
            Some(root)
        }
        _ => None,
    }
}

/// Key identifying a selector within the existential scopes enclosing it,
/// e.g. `inputs(reference_data.note)`. The same dotted path inside different
/// existentials reads different tables, so the scope is part of the key.
pub fn scoped_key(scope: &[String], expr: &Expr) -> String {
    let mut key = match extract_path(expr) {
        Some(path) => path.key(),
        None => expr.render(),
    };
    for name in scope.iter().rev() {
        key = format!("{name}({key})");
    }
    key
}

/// Is this (after parentheses) a `.field` selector?
pub fn is_selector(expr: &Expr) -> bool {
    matches!(expr.unparen(), Expr::Selector { .. })
}
