use std::time::Duration;

/// Tuning knobs for a probe run, shared between the CLI and the core.
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Upper bound on connection attempts in flight at once.
    ///
    /// Ports beyond the limit wait in the admission queue; they are never
    /// dropped.
    pub concurrency: usize,
    /// How long a single connect attempt may take before it is abandoned
    /// and the port reported as closed.
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: 100,
            timeout: Duration::from_secs(1),
        }
    }
}
