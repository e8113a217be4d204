//! Lookup keys (`field` or `field__op`) and their SQL fragments.

use crate::field::Field;
use crate::values::Value;

/// Separator between a field name and its operator in a lookup key.
pub const LOOKUP_SEPARATOR: &str = "__";

/// Comparison operator of a keyed predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    In,
    /// Case-insensitive substring match through `LIKE`
    IContains,
    /// Case-sensitive substring match through `GLOB`
    Contains,
}

impl Operator {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let op = match suffix {
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "eq" => Operator::Eq,
            "in" => Operator::In,
            "icontains" => Operator::IContains,
            "contains" => Operator::Contains,
            _ => return None,
        };
        Some(op)
    }

    /// Whether text columns embed the operand unquoted.
    pub const fn is_pattern(self) -> bool {
        matches!(self, Operator::IContains | Operator::Contains)
    }

    /// Renders the right-hand side of the predicate for an already converted operand.
    pub fn render(self, operand: &str) -> String {
        match self {
            Operator::Lt => format!("< {operand}"),
            Operator::Lte => format!("<= {operand}"),
            Operator::Gt => format!("> {operand}"),
            Operator::Gte => format!(">= {operand}"),
            Operator::Eq => format!("= {operand}"),
            Operator::In => format!("IN ({operand})"),
            Operator::IContains => format!("LIKE '%{operand}%' ESCAPE '\\'"),
            Operator::Contains => format!("GLOB '*{operand}*'"),
        }
    }
}

/// Splits a lookup key into its field name and operator.
///
/// A key without a recognised `__op` suffix is an equality test on the whole key.
pub fn parse_key(key: &str) -> (&str, Operator) {
    if let Some((field, suffix)) = key.rsplit_once(LOOKUP_SEPARATOR)
        && let Some(op) = Operator::from_suffix(suffix)
    {
        return (field, op);
    }
    (key, Operator::Eq)
}

/// Renders `<op-fragment>` for `field` compared against `value`.
pub fn fragment(field: &Field, op: Operator, value: &Value) -> String {
    op.render(&field.to_comparison_operand(op, value))
}
