//! # Hydropace Core Library
//!
//! This library paces fluid intake across a waking day and turns the gap
//! between actual and expected intake into a single actionable instruction.
//! Every evaluation is a pure function of a caller-owned snapshot, so the
//! same snapshot yields the same output on-device and on a server.
//!
//! ## Architecture
//!
//! - **Curve**: front-loaded expected-intake curve and step reconstruction of
//!   actual intake from drink events
//! - **Plan**: deficit/surplus, flat catch-up rate, safety-capped achievable
//!   total, and instruction synthesis
//! - **Session**: orchestration of one evaluation into a serializable bundle
//! - **Storage**: TOML-based policy/profile configuration
//!
//! ## Key Components
//!
//! - [`PacingSession`]: evaluates a [`PacingSnapshot`] into a [`PacingBundle`]
//! - [`AdaptiveCatchUpPlanner`]: computes an [`AdaptivePlan`]
//! - [`InstructionSynthesizer`]: turns a plan into an [`Instruction`]
//! - [`Config`]: application configuration management

pub mod curve;
pub mod error;
pub mod events;
pub mod goal;
pub mod plan;
pub mod session;
pub mod storage;
pub mod targets;
pub mod velocity;

pub use curve::{expected_fraction, expected_ml, ExpectedCurvePoint, StepHistory, StepPoint, WakeWindow};
pub use error::{ConfigError, CoreError, PacingError};
pub use events::{DrinkEvent, DrinkLog};
pub use goal::{compute_daily_goal, target_override, DailyGoal, GoalPolicy, GoalProfile, GoalState};
pub use plan::{
    AdaptiveCatchUpPlanner, AdaptivePlan, Instruction, InstructionSynthesizer, PacingPolicy,
    PlanStatus, Priority,
};
pub use session::{CurvePoint, PacingBundle, PacingSession, PacingSnapshot, PlanReport};
pub use storage::Config;
pub use targets::{hydration_score, micro_targets, MicroTarget};
pub use velocity::{check_velocity, VelocityCheck};
