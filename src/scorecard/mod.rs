pub mod registry;
pub mod template;
pub mod types;
pub mod validation;

pub use registry::{
    builtin_scorecard, builtin_source, parse_scorecard, ScorecardError, ScorecardRegistry,
    DEFAULT_SLUG,
};
pub use template::{render_template, write_template};
pub use types::*;
pub use validation::{is_valid_slug, validate_scorecard, SCALE_POINTS};
