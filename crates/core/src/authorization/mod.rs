mod types;

pub use types::{AuthorizationStatus, GateDecision};
