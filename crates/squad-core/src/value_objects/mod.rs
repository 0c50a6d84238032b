//! Value objects - immutable types that represent domain concepts

mod id;
mod money;
mod order_number;
mod slug;

pub use id::{Id, IdParseError};
pub use money::Money;
pub use order_number::OrderNumber;
pub use slug::slugify;
