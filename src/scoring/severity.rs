pub use crate::scorecard::SeverityBand;

/// Lower bound (inclusive) of the Healthy band.
pub const HEALTHY_FLOOR: f64 = 4.0;
/// Lower bound (inclusive) of the Improving band.
pub const IMPROVING_FLOOR: f64 = 3.0;
/// Lower bound (inclusive) of the Leaking band.
pub const LEAKING_FLOOR: f64 = 2.0;

/// Classify a pillar average. Each band is closed below and open above.
pub fn severity_band(average: f64) -> SeverityBand {
    if average >= HEALTHY_FLOOR {
        SeverityBand::Healthy
    } else if average >= IMPROVING_FLOOR {
        SeverityBand::Improving
    } else if average >= LEAKING_FLOOR {
        SeverityBand::Leaking
    } else {
        SeverityBand::Critical
    }
}
