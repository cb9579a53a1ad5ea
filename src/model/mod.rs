pub mod error;
pub mod template;

pub use error::MatrixError;
pub use template::{slugify, Category, Criterion, Priority, Template};
