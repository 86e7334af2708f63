//! Stateless helpers shared by every check.
//!
//! - [`is_empty`] / [`clean_object`]: the "value absent" gate and parameter pruning
//! - [`parse_float`] / [`parse_int`] / [`to_number`] / [`is_nan`]: loose numeric
//!   coercion of form input
//! - [`format`]: `{0}`, `{1}`, ... placeholder substitution into templates
//! - [`replace_params_in_url`]: `{key}` path parameter substitution
//! - [`Debounce`]: trailing-call debouncing on the tokio timer

mod debounce;
mod empty;
mod numeric;
mod template;
mod url;

pub use debounce::{debounce, Debounce};
pub use empty::{clean_object, is_empty};
pub use numeric::{is_nan, parse_float, parse_int, to_number};
pub use template::format;
pub use url::replace_params_in_url;
