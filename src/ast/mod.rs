pub mod conditions;
pub mod expr;
pub mod operators;
pub mod stmt;
pub mod values;

pub use self::conditions::Condition;
pub use self::expr::{Expr, OrderItem, Param};
pub use self::operators::{Action, BinaryOp, LogicalOp, Operator, SortOrder};
pub use self::stmt::{Delete, Insert, Select, SelectPage, SelectPlan, Statement, Update};
pub use self::values::Value;
