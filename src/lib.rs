pub mod browser;
pub mod config;
pub mod handoff;
pub mod leads;
pub mod output;
pub mod scorecard;
pub mod scoring;
pub mod survey;
pub mod transport;
