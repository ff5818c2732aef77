//! Literal and placeholder handling while rendering.

use std::collections::HashMap;

use serde_json::{Map, Value as Json};

use crate::ast::{Param, Value};
use crate::error::{ModelError, ModelResult};
use crate::transpiler::traits::SqlGenerator;

/// Values for named placeholders, by name.
pub type Bindings = HashMap<String, Value>;

/// Build [`Bindings`] from a JSON object. Arrays stay lists so they can feed
/// expanding placeholders.
pub fn bindings_from_json(map: &Map<String, Json>) -> Bindings {
    map.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect()
}

/// A rendered statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

enum Mode<'a> {
    /// Literals written into the SQL text, placeholders shown as `:name`
    Inline,
    /// Every value becomes a positional parameter
    Bound(&'a Bindings),
}

/// Context for parameterized query building.
pub struct ParamContext<'a> {
    mode: Mode<'a>,
    /// Current parameter index (1-based for Postgres $1, $2, etc.)
    pub index: usize,
    /// Collected parameter values in order
    pub params: Vec<Value>,
    error: Option<ModelError>,
}

impl<'a> ParamContext<'a> {
    pub fn inline() -> Self {
        Self {
            mode: Mode::Inline,
            index: 0,
            params: Vec::new(),
            error: None,
        }
    }

    pub fn bound(bindings: &'a Bindings) -> Self {
        Self {
            mode: Mode::Bound(bindings),
            index: 0,
            params: Vec::new(),
            error: None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.mode, Mode::Inline)
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value, generator: &dyn SqlGenerator) -> String {
        self.index += 1;
        self.params.push(value);
        generator.placeholder(self.index)
    }

    /// Render a literal value. NULL is always written inline, so it never
    /// needs a typed parameter.
    pub fn literal(&mut self, value: &Value, generator: &dyn SqlGenerator) -> String {
        match self.mode {
            Mode::Bound(_) if !value.is_null() => self.add_param(value.clone(), generator),
            _ => inline_literal(value, generator),
        }
    }

    /// The bound value of a named placeholder, if any.
    ///
    /// Always `None` when rendering inline.
    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        match self.mode {
            Mode::Inline => None,
            Mode::Bound(bindings) => bindings.get(name),
        }
    }

    /// Render a named placeholder as a single parameter.
    pub fn named(&mut self, param: &Param, generator: &dyn SqlGenerator) -> String {
        match self.mode {
            Mode::Inline => format!(":{}", param.name),
            Mode::Bound(bindings) => match bindings.get(&param.name) {
                Some(value) => self.literal(value, generator),
                None => self.fail(ModelError::MissingBinding(param.name.clone())),
            },
        }
    }

    /// Resolve an expanding placeholder to its list.
    ///
    /// Records an error and returns `None` when the binding is missing or is
    /// not a list.
    pub fn expand(&mut self, param: &Param) -> Option<&'a [Value]> {
        let Mode::Bound(bindings) = self.mode else {
            return None;
        };
        match bindings.get(&param.name) {
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(_) => {
                self.fail(ModelError::ExpandingBinding(param.name.clone()));
                None
            }
            None => {
                self.fail(ModelError::MissingBinding(param.name.clone()));
                None
            }
        }
    }

    /// Keep the first error; rendering carries on with a dummy fragment.
    fn fail(&mut self, err: ModelError) -> String {
        if self.error.is_none() {
            self.error = Some(err);
        }
        "NULL".to_string()
    }

    /// Take the collected parameters, or the first error seen while rendering.
    pub fn finish(self) -> ModelResult<Vec<Value>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.params),
        }
    }
}

/// Render a value as inline SQL text.
pub fn inline_literal(value: &Value, generator: &dyn SqlGenerator) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => generator.bool_literal(*b),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(|v| inline_literal(v, generator)).collect();
            format!("({})", parts.join(", "))
        }
    }
}
