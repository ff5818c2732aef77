//! Request documents.
//!
//! Incoming JSON is decoded exactly once into the typed nodes below. The
//! compilers then work by structural matching and never inspect raw JSON.
//! Decoding is permissive: shapes that cannot mean anything are dropped with
//! a warning instead of failing the request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json};

use crate::ast::{LogicalOp, Value};

/// Operator codes accepted in an operator object's `opt` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpCode {
    /// `$ne`
    Ne,
    /// `$te`, the default
    Te,
    /// `$lt`
    Lt,
    /// `$lte`
    Lte,
    /// `$gt`
    Gt,
    /// `$gte`
    Gte,
    /// `$like`
    Like,
    /// `$in`
    In,
    /// `$nin`
    Nin,
    /// `$bind`, deferred parameter
    Bind,
    /// `$raw`, verbatim predicate
    Raw,
}

impl OpCode {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "$ne" => Some(OpCode::Ne),
            "$te" => Some(OpCode::Te),
            "$lt" => Some(OpCode::Lt),
            "$lte" => Some(OpCode::Lte),
            "$gt" => Some(OpCode::Gt),
            "$gte" => Some(OpCode::Gte),
            "$like" => Some(OpCode::Like),
            "$in" => Some(OpCode::In),
            "$nin" => Some(OpCode::Nin),
            "$bind" => Some(OpCode::Bind),
            "$raw" => Some(OpCode::Raw),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            OpCode::Ne => "$ne",
            OpCode::Te => "$te",
            OpCode::Lt => "$lt",
            OpCode::Lte => "$lte",
            OpCode::Gt => "$gt",
            OpCode::Gte => "$gte",
            OpCode::Like => "$like",
            OpCode::In => "$in",
            OpCode::Nin => "$nin",
            OpCode::Bind => "$bind",
            OpCode::Raw => "$raw",
        }
    }

    /// `$in` and `$nin` bind to expanding placeholders.
    pub fn expands(&self) -> bool {
        matches!(self, OpCode::In | OpCode::Nin)
    }
}

/// The `val` of an operator object.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    /// A nested `{opt, val}` object, meaningful as a bind descriptor
    Object(Box<OperatorObject>),
}

/// `{opt, val}`
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorObject {
    pub op: OpCode,
    /// Absent `val` compiles to nothing
    pub val: Option<Operand>,
}

impl OperatorObject {
    pub fn new(op: OpCode, val: impl Into<Value>) -> Self {
        Self {
            op,
            val: Some(Operand::Value(val.into())),
        }
    }

    /// Decode `{opt, val}`. Unknown operator codes yield `None`.
    pub fn decode(map: &Map<String, Json>) -> Option<Self> {
        let op = match map.get("opt") {
            None => OpCode::Te,
            Some(Json::String(code)) => match OpCode::from_code(code) {
                Some(op) => op,
                None => {
                    tracing::warn!("unknown operator `{}`, condition skipped", code);
                    return None;
                }
            },
            Some(other) => {
                tracing::warn!("operator must be a string, got `{}`", other);
                return None;
            }
        };
        let val = match map.get("val") {
            None => None,
            Some(v) => match v {
                Json::Object(inner) => match OperatorObject::decode(inner) {
                    Some(obj) => Some(Operand::Object(Box::new(obj))),
                    // a bind descriptor that does not decode names no placeholder
                    None if op == OpCode::Bind => return None,
                    None => Some(Operand::Value(Value::from_json(v))),
                },
                other => Some(Operand::Value(Value::from_json(other))),
            },
        };
        Some(Self { op, val })
    }
}

/// What a single field maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    /// Equality shorthand
    Scalar(Value),
    Operator(OperatorObject),
    /// Implicit AND of several operator objects
    OperatorList(Vec<OperatorObject>),
}

impl FieldNode {
    pub fn decode(json: &Json) -> Option<Self> {
        match json {
            Json::Array(items) => {
                let ops = items
                    .iter()
                    .filter_map(|item| match item {
                        Json::Object(map) => OperatorObject::decode(map),
                        other => {
                            tracing::warn!("operator list entry `{}` is not an object, skipped", other);
                            None
                        }
                    })
                    .collect();
                Some(FieldNode::OperatorList(ops))
            }
            Json::Object(map) => OperatorObject::decode(map).map(FieldNode::Operator),
            scalar => Some(FieldNode::Scalar(Value::from_json(scalar))),
        }
    }
}

/// Body of a `$or` / `$and` group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupBody {
    /// `{"$or": {...}}`: the group's connective joins the document's entries
    Document(FilterDocument),
    /// `{"$or": [{...}, {...}]}`: the group's connective joins the documents
    List(Vec<FilterDocument>),
}

/// One entry of a filter document.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Field { name: String, node: FieldNode },
    Group { op: LogicalOp, body: GroupBody },
}

/// A decoded filter document; entries keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDocument {
    pub entries: Vec<FilterNode>,
}

impl FilterDocument {
    pub fn new(entries: Vec<FilterNode>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a JSON filter document. `null` is the empty document.
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Self::default(),
            Json::Object(map) => Self::from_map(map),
            other => {
                tracing::warn!("filter document must be an object, got `{}`", other);
                Self::default()
            }
        }
    }

    pub fn from_map(map: &Map<String, Json>) -> Self {
        let mut entries = Vec::with_capacity(map.len());
        for (key, val) in map {
            let op = match key.as_str() {
                "$or" => Some(LogicalOp::Or),
                "$and" => Some(LogicalOp::And),
                _ => None,
            };
            match op {
                Some(op) => {
                    let body = match val {
                        Json::Object(inner) => GroupBody::Document(Self::from_map(inner)),
                        Json::Array(items) => GroupBody::List(
                            items
                                .iter()
                                .filter_map(|item| match item {
                                    Json::Object(inner) => Some(Self::from_map(inner)),
                                    other => {
                                        tracing::warn!("`{}` entry `{}` is not an object, skipped", key, other);
                                        None
                                    }
                                })
                                .collect(),
                        ),
                        other => {
                            tracing::warn!("`{}` expects an object or a list, got `{}`", key, other);
                            continue;
                        }
                    };
                    entries.push(FilterNode::Group { op, body });
                }
                None => {
                    if let Some(node) = FieldNode::decode(val) {
                        entries.push(FilterNode::Field { name: key.clone(), node });
                    }
                }
            }
        }
        Self { entries }
    }
}

impl<'de> Deserialize<'de> for FilterDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        Ok(Self::from_json(&json))
    }
}

/// Structured projection descriptor `{func, label, args, column}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub column: String,
    #[serde(default)]
    pub func: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "deserialize_values")]
    pub args: Vec<Value>,
}

/// One requested output column.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionKey {
    /// `name`, `func(args)` or `func(args): alias`
    Expr(String),
    Descriptor(KeyDescriptor),
}

impl ProjectionKey {
    pub fn decode(json: &Json) -> Option<Self> {
        match json {
            Json::String(s) => Some(ProjectionKey::Expr(s.clone())),
            Json::Object(_) => match KeyDescriptor::deserialize(json) {
                Ok(desc) => Some(ProjectionKey::Descriptor(desc)),
                Err(e) => {
                    tracing::warn!("invalid key descriptor `{}`: {}", json, e);
                    None
                }
            },
            other => {
                tracing::warn!("`{}` key not is str or dict", other);
                None
            }
        }
    }
}

impl From<&str> for ProjectionKey {
    fn from(s: &str) -> Self {
        ProjectionKey::Expr(s.to_string())
    }
}

/// `(offset, limit)`, written as `[offset, limit]` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

impl From<(u64, u64)> for Pagination {
    fn from((offset, limit): (u64, u64)) -> Self {
        Self { offset, limit }
    }
}

impl From<Pagination> for (u64, u64) {
    fn from(p: Pagination) -> Self {
        (p.offset, p.limit)
    }
}

/// Everything a select request may carry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectSpec {
    #[serde(default, rename = "where")]
    pub filter: FilterDocument,
    #[serde(default, deserialize_with = "deserialize_keys")]
    pub keys: Option<Vec<ProjectionKey>>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub orders: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_names")]
    pub group: Option<Vec<String>>,
    #[serde(default)]
    pub limit: Option<Pagination>,
}

impl SelectSpec {
    pub fn with_filter(filter: FilterDocument) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

fn deserialize_values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    let items = Option::<Vec<Json>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.iter().map(Value::from_json).collect())
}

fn deserialize_keys<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<ProjectionKey>>, D::Error> {
    let items = Option::<Vec<Json>>::deserialize(deserializer)?.unwrap_or_default();
    let keys: Vec<ProjectionKey> = items.iter().filter_map(ProjectionKey::decode).collect();
    Ok(if keys.is_empty() { None } else { Some(keys) })
}

fn deserialize_names<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    let items = Option::<Vec<Json>>::deserialize(deserializer)?.unwrap_or_default();
    let names: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Json::String(s) if !s.is_empty() => Some(s),
            other => {
                tracing::warn!("`{}` is not a field name, skipped", other);
                None
            }
        })
        .collect();
    Ok(if names.is_empty() { None } else { Some(names) })
}
