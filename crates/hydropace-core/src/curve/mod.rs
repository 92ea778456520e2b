//! Expected and actual intake curves.

mod progress;
mod steps;

pub use progress::{
    expected_fraction, expected_ml, sample_expected_curve, ExpectedCurvePoint, WakeWindow,
    CURVE_EXPONENT,
};
pub use steps::{build_steps, reconstruct, StepHistory, StepPoint, TimedDrink};
