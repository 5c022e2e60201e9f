mod aggregate;
mod category;
mod colors;
mod filters;
mod rates;
mod row;
mod week_range;

pub use aggregate::*;
pub use category::*;
pub use colors::*;
pub use filters::*;
pub use rates::*;
pub use row::*;
pub use week_range::*;
