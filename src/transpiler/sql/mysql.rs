use crate::transpiler::traits::{escape_identifier, SqlGenerator};

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn quote_identifier(&self, id: &str) -> String {
        escape_identifier(id, '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(n), None) => format!(" LIMIT {}", n),
            (limit, Some(m)) => format!(" LIMIT {} OFFSET {}", limit.unwrap_or(u64::MAX), m),
        }
    }

    fn empty_insert(&self, rows: usize) -> String {
        let tuples = vec!["()"; rows.max(1)].join(", ");
        format!(" () VALUES {}", tuples)
    }
}
