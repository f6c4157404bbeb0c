mod alias;
pub use alias::Alias;

mod direction;
pub use direction::Direction;

mod expr;
pub use expr::{
    Expr, ExprAggregate, ExprBetween, ExprBinaryOp, ExprColumn, ExprInList, ExprIsNull, ExprLike,
};

mod op;
pub use op::BinaryOp;

mod order_by;
pub use order_by::OrderByExpr;

mod select;
pub use select::{Projection, Select};

mod source;
pub use source::{Join, JoinOp, Source};

mod value;
pub use value::Value;
