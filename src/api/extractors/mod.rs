//! Custom request extractors.

mod path_param;
mod validated_json;

pub use path_param::PathParam;
pub use validated_json::{ValidatedJson, ValidatedJsonOrDefault};
