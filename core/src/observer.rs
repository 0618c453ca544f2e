use crate::connect::ProbeStatus;

/// Receives one event per probed port, as soon as its attempt finishes.
///
/// Events from different workers interleave arbitrarily; callers must not
/// rely on any ordering between ports. The prober takes an observer instead
/// of printing anywhere itself, so presentation stays out of the core.
pub trait PortObserver: Send + Sync {
    fn on_port_result(&self, port: u16, status: &ProbeStatus);
}

/// Discards every event. The default when no observer is attached.
pub struct NullObserver;

impl PortObserver for NullObserver {
    fn on_port_result(&self, _port: u16, _status: &ProbeStatus) {}
}
