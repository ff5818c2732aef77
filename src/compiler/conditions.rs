//! Filter document to WHERE predicate.

use crate::access::FieldPredicate;
use crate::ast::{Condition, Expr, LogicalOp, Operator, Param, Value};
use crate::document::{FieldNode, FilterDocument, FilterNode, GroupBody, OpCode, Operand, OperatorObject};
use crate::schema::Table;

/// Compile a filter document into a single predicate.
///
/// Entries are AND-combined. Returns `None` when nothing survives.
pub fn compile_where(table: &Table, doc: &FilterDocument, filter: &dyn FieldPredicate) -> Option<Condition> {
    compile_document(table, doc, filter, LogicalOp::And)
}

/// Compile a filter document, joining its entries with `combine`.
///
/// A `$or` / `$and` entry recurses with its own connective, so the switch
/// only affects the level it appears on.
pub fn compile_document(
    table: &Table,
    doc: &FilterDocument,
    filter: &dyn FieldPredicate,
    combine: LogicalOp,
) -> Option<Condition> {
    let mut parts = Vec::new();
    for entry in &doc.entries {
        let part = match entry {
            FilterNode::Group { op, body } => compile_group(table, *op, body, filter),
            FilterNode::Field { name, node } => {
                if !table.has_column(name) || !filter.accepts(name) {
                    continue;
                }
                compile_field(&Expr::column(name.as_str()), node)
            }
        };
        parts.extend(part);
    }
    Condition::combine(parts, combine)
}

fn compile_group(table: &Table, op: LogicalOp, body: &GroupBody, filter: &dyn FieldPredicate) -> Option<Condition> {
    match body {
        GroupBody::Document(doc) => compile_document(table, doc, filter, op),
        GroupBody::List(docs) => {
            let parts = docs
                .iter()
                .filter_map(|doc| compile_document(table, doc, filter, LogicalOp::And))
                .collect();
            Condition::combine(parts, op)
        }
    }
}

/// Compile the value attached to one column.
pub fn compile_field(column: &Expr, node: &FieldNode) -> Option<Condition> {
    match node {
        FieldNode::Scalar(value) => Some(Condition::compare(
            column.clone(),
            Operator::Eq,
            Expr::Literal(value.clone()),
        )),
        FieldNode::Operator(obj) => compile_operator(column, obj),
        FieldNode::OperatorList(objs) => {
            let parts = objs.iter().filter_map(|obj| compile_operator(column, obj)).collect();
            Condition::combine(parts, LogicalOp::And)
        }
    }
}

/// Compile one `{opt, val}` object against a column.
pub fn compile_operator(column: &Expr, obj: &OperatorObject) -> Option<Condition> {
    let val = obj.val.as_ref()?;
    match (obj.op, val) {
        (OpCode::Bind, Operand::Value(Value::String(name))) => Some(Condition::compare(
            column.clone(),
            Operator::Eq,
            Expr::Param(Param::scalar(name.as_str())),
        )),
        (OpCode::Bind, Operand::Object(desc)) => compile_bind_descriptor(column, desc),
        (OpCode::Raw, Operand::Value(Value::String(sql))) => Some(Condition::Raw(sql.clone())),
        (op, Operand::Value(value)) => compare(column, op, Expr::Literal(value.clone())),
        (op, Operand::Object(_)) => {
            tracing::warn!("operator `{}` does not take an object value, condition skipped", op.code());
            None
        }
    }
}

/// `{opt: "$bind", val: {opt, val: name}}`
fn compile_bind_descriptor(column: &Expr, desc: &OperatorObject) -> Option<Condition> {
    // a nested $bind would only point at another placeholder
    if desc.op == OpCode::Bind {
        return None;
    }
    let Some(Operand::Value(Value::String(name))) = &desc.val else {
        tracing::warn!("bind descriptor needs a placeholder name, condition skipped");
        return None;
    };
    let param = if desc.op.expands() {
        Param::expanding(name.as_str())
    } else {
        Param::scalar(name.as_str())
    };
    compare(column, desc.op, Expr::Param(param))
}

fn compare(column: &Expr, op: OpCode, right: Expr) -> Option<Condition> {
    let op = match op {
        OpCode::Ne => Operator::Ne,
        OpCode::Te => Operator::Eq,
        OpCode::Lt => Operator::Lt,
        OpCode::Lte => Operator::Lte,
        OpCode::Gt => Operator::Gt,
        OpCode::Gte => Operator::Gte,
        OpCode::Like => Operator::Like,
        OpCode::In => Operator::In,
        OpCode::Nin => Operator::NotIn,
        OpCode::Bind | OpCode::Raw => {
            tracing::warn!("`{}` cannot take this value, condition skipped", op.code());
            return None;
        }
    };
    Some(Condition::compare(column.clone(), op, right))
}
