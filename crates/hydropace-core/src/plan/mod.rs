//! Catch-up planning and instruction synthesis.

mod instruction;
mod planner;
mod policy;

pub use instruction::{Instruction, InstructionSynthesizer, Priority};
pub use planner::{AdaptiveCatchUpPlanner, AdaptivePlan, PlanStatus};
pub use policy::{
    PacingPolicy, DEFAULT_LARGE_DEFICIT_ML, DEFAULT_TOLERANCE_ML, DEFAULT_VELOCITY_CAP_ML_PER_HOUR,
};
