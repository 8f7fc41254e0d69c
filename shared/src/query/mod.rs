mod constraint;
mod interest;

pub use constraint::QueryConstraint;
pub use interest::{ComponentInterest, Interest, Query, QueryResult};
