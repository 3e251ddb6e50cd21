// Prometheus counters for authentication outcomes

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Authentication metrics
///
/// Labels carry `AuthError::kind()` so internal failure kinds stay distinct
/// here even where HTTP responses collapse them.
pub struct AuthMetrics {
    registry: Registry,
    signup_total: IntCounterVec,
    signin_total: IntCounterVec,
    gate_rejections_total: IntCounterVec,
}

impl AuthMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signup_total = IntCounterVec::new(
            Opts::new("auth_signup_total", "Signup attempts by outcome"),
            &["outcome"],
        )?;
        let signin_total = IntCounterVec::new(
            Opts::new("auth_signin_total", "Signin attempts by outcome"),
            &["outcome"],
        )?;
        let gate_rejections_total = IntCounterVec::new(
            Opts::new(
                "auth_gate_rejections_total",
                "Protected requests rejected by the authorization gate",
            ),
            &["reason"],
        )?;

        registry.register(Box::new(signup_total.clone()))?;
        registry.register(Box::new(signin_total.clone()))?;
        registry.register(Box::new(gate_rejections_total.clone()))?;

        Ok(Self {
            registry,
            signup_total,
            signin_total,
            gate_rejections_total,
        })
    }

    pub fn record_signup(&self, outcome: &str) {
        self.signup_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_signin(&self, outcome: &str) {
        self.signin_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_gate_rejection(&self, reason: &str) {
        self.gate_rejections_total.with_label_values(&[reason]).inc();
    }

    pub fn signin_count(&self, outcome: &str) -> u64 {
        self.signin_total.with_label_values(&[outcome]).get()
    }

    pub fn gate_rejection_count(&self, reason: &str) -> u64 {
        self.gate_rejections_total.with_label_values(&[reason]).get()
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
