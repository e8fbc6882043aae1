//! Pre-arm safety checks: the fixed check catalog, the rules that turn a
//! sensor-reading bag into a verdict, and the per-mission result store.

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod readings;
pub mod result;
pub mod store;

pub use catalog::{CheckDefinition, CheckId, CATALOG, CHECK_COUNT};
pub use error::PrearmError;
pub use evaluator::{evaluate, evaluate_key, CheckRule, Subsystem, Verdict};
pub use readings::{ReadingsByCheck, SensorReadings};
pub use result::{CheckResult, CheckSet, CheckStatus};
pub use store::CheckResultStore;
