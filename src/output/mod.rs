pub mod formatter;

pub use formatter::{
    format_bar, format_diagnosis, format_diagnosis_with_width, format_lead_receipt,
    format_plan_outcome, format_scorecard_detail, format_scorecard_list, format_severity,
    should_use_colors, wrap_text,
};
