// Authentication & authorization module

pub mod auth_middleware;
pub mod flow;
pub mod gate;
pub mod secret;

pub use flow::AuthFlow;
pub use gate::{AuthGate, GateOutcome, Rejection};
pub use secret::{Password, SigningSecret};
