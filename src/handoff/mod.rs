//! Hand-off of a completed result to the plan-generation service.

pub mod client;
pub mod payload;

pub use client::PlanClient;
pub use payload::{
    build_payload, interpret_plan_response, AnswerEntry, InsightsPayload, PillarAveragesPayload,
    PlanOutcome, Totals,
};
