//! WHERE predicate rendering.

use crate::ast::{Condition, Expr, Operator, Value};
use crate::transpiler::expr::render_expr;
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::SqlGenerator;

pub fn render_condition(cond: &Condition, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    match cond {
        Condition::Compare { left, op, right } => render_compare(left, *op, right, generator, ctx),
        Condition::And(items) => render_group(items, " AND ", generator, ctx),
        Condition::Or(items) => render_group(items, " OR ", generator, ctx),
        Condition::Raw(sql) => format!("({})", sql),
    }
}

/// Nested groups are parenthesized to keep precedence.
fn render_group(items: &[Condition], joiner: &str, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    items
        .iter()
        .map(|item| match item {
            Condition::And(_) | Condition::Or(_) => format!("({})", render_condition(item, generator, ctx)),
            other => render_condition(other, generator, ctx),
        })
        .collect::<Vec<_>>()
        .join(joiner)
}

fn render_compare(
    left: &Expr,
    op: Operator,
    right: &Expr,
    generator: &dyn SqlGenerator,
    ctx: &mut ParamContext,
) -> String {
    let lhs = render_expr(left, generator, ctx);
    if op.is_membership() {
        return render_membership(&lhs, op, right, generator, ctx);
    }
    if matches!(op, Operator::Eq | Operator::Ne) && is_null(right, ctx) {
        let not = if op == Operator::Ne { "NOT " } else { "" };
        return format!("{} IS {}NULL", lhs, not);
    }
    format!("{} {} {}", lhs, op.sql_symbol(), render_expr(right, generator, ctx))
}

fn is_null(expr: &Expr, ctx: &ParamContext) -> bool {
    match expr {
        Expr::Literal(value) => value.is_null(),
        Expr::Param(param) => ctx.lookup(&param.name).is_some_and(Value::is_null),
        _ => false,
    }
}

/// `IN` / `NOT IN`. Empty lists render a constant predicate.
fn render_membership(
    lhs: &str,
    op: Operator,
    right: &Expr,
    generator: &dyn SqlGenerator,
    ctx: &mut ParamContext,
) -> String {
    let items: Vec<String> = match right {
        Expr::Literal(Value::Array(items)) => items.iter().map(|v| ctx.literal(v, generator)).collect(),
        Expr::Param(param) if param.expanding => {
            if ctx.is_inline() {
                return format!("{} {} (:{})", lhs, op.sql_symbol(), param.name);
            }
            match ctx.expand(param) {
                Some(values) => values.iter().map(|v| ctx.literal(v, generator)).collect(),
                None => return format!("{} {} (NULL)", lhs, op.sql_symbol()),
            }
        }
        other => vec![render_expr(other, generator, ctx)],
    };

    if items.is_empty() {
        return match op {
            Operator::NotIn => "1 = 1".to_string(),
            _ => "1 = 0".to_string(),
        };
    }
    format!("{} {} ({})", lhs, op.sql_symbol(), items.join(", "))
}
