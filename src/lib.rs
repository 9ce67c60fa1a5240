//! Dynamic search-condition engine.
//!
//! Raw request parameters (`name_like=foo`, `age_gte=18`) are parsed into a
//! typed filter tree, optionally coerced against an entity schema, and
//! compiled into a query fragment with ordered `:param_N` bindings plus
//! ordering and pagination metadata. The fragment is meant to be appended to
//! a base query whose where-clause ends in `1=1`.
//!
//! ```
//! use searchable::{QueryCompiler, Searchable};
//!
//! let mut search = Searchable::from_params(vec![
//!     ("name_like", "foo"),
//!     ("age_gte", "18"),
//! ])?;
//! search.set_page(0, 20);
//!
//! let compiled = QueryCompiler::new().compile(&search);
//! assert_eq!(compiled.clause, " and name like :param_1 and age >= :param_2");
//! assert_eq!(compiled.page, Some((0, 20)));
//! # Ok::<(), searchable::SearchError>(())
//! ```

pub mod compiler;
pub mod error;
pub mod filter;
pub mod operator;
pub mod page;
pub mod schema;
pub mod searchable;
pub mod value;

pub use compiler::{CompiledQuery, QueryCompiler};
pub use error::SearchError;
pub use filter::parser::parse_condition;
pub use filter::{Condition, SearchFilter};
pub use operator::SearchOperator;
pub use page::{Direction, Page, Sort, SortOrder};
pub use schema::{EntitySchema, EntitySchemaBuilder, FieldType};
pub use searchable::Searchable;
pub use value::SearchValue;
