//! Expression rendering.

use crate::ast::{Expr, OrderItem, SortOrder};
use crate::transpiler::params::ParamContext;
use crate::transpiler::traits::SqlGenerator;

pub fn render_expr(expr: &Expr, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    match expr {
        Expr::Column(name) | Expr::Identifier(name) => generator.quote_identifier(name),
        Expr::Literal(value) => ctx.literal(value, generator),
        Expr::Param(param) => ctx.named(param, generator),
        Expr::Function { name, args } => {
            if let Some(rewritten) = generator.rewrite_function(name, args) {
                return render_expr(&rewritten, generator, ctx);
            }
            let args: Vec<String> = args.iter().map(|a| render_expr(a, generator, ctx)).collect();
            format!("{}({})", name, args.join(", "))
        }
        Expr::Binary { left, op, right } => format!(
            "{} {} {}",
            render_expr(left, generator, ctx),
            op,
            render_expr(right, generator, ctx)
        ),
        Expr::Aliased { expr, alias } => format!(
            "{} AS {}",
            render_expr(expr, generator, ctx),
            generator.quote_identifier(alias)
        ),
        Expr::Default => "DEFAULT".to_string(),
    }
}

pub fn render_order(item: &OrderItem, generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    let dir = match item.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("{} {}", render_expr(&item.expr, generator, ctx), dir)
}

/// Render a comma separated list.
pub fn render_list(exprs: &[Expr], generator: &dyn SqlGenerator, ctx: &mut ParamContext) -> String {
    exprs
        .iter()
        .map(|e| render_expr(e, generator, ctx))
        .collect::<Vec<_>>()
        .join(", ")
}
