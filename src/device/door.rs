use std::time::{Duration, Instant};

/// Door strike output.
pub trait Relay {
    fn set(&mut self, energised: bool);
}

/// Relay that only traces its state, for the host simulator.
pub struct LogRelay;

impl Relay for LogRelay {
    fn set(&mut self, energised: bool) {
        tracing::info!(energised, "Relay");
    }
}

/// Keeps the relay energised for a fixed interval after each open.
pub struct Door {
    relay: Box<dyn Relay + Send>,
    open_for: Duration,
    open_until: Option<Instant>,
}

impl Door {
    pub fn new(relay: Box<dyn Relay + Send>, open_for: Duration) -> Self {
        Self {
            relay,
            open_for,
            open_until: None,
        }
    }

    /// Opens, or keeps open for another full interval.
    pub fn open(&mut self, now: Instant) {
        tracing::debug!("Door opening");
        self.open_until = Some(now + self.open_for);
        self.relay.set(true);
    }

    /// Closes once the interval elapsed. Returns true if it closed now.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.open_until {
            Some(until) if now >= until => {
                self.open_until = None;
                tracing::debug!("Door closing");
                self.relay.set(false);
                true
            }
            _ => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_until.is_some()
    }

    pub fn open_for(&self) -> Duration {
        self.open_for
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Probe(Arc<Mutex<Vec<bool>>>);

    impl Relay for Probe {
        fn set(&mut self, energised: bool) {
            self.0.lock().unwrap().push(energised);
        }
    }

    #[test]
    fn test_closes_after_interval() {
        let probe = Probe::default();
        let mut door = Door::new(Box::new(probe.clone()), Duration::from_millis(2000));
        let t0 = Instant::now();

        door.open(t0);
        assert!(door.is_open());
        assert!(!door.poll(t0 + Duration::from_millis(1999)));
        assert!(door.poll(t0 + Duration::from_millis(2000)));
        assert!(!door.is_open());
        assert!(!door.poll(t0 + Duration::from_millis(5000)));
        assert_eq!(*probe.0.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_reopen_extends_interval() {
        let mut door = Door::new(Box::new(Probe::default()), Duration::from_millis(100));
        let t0 = Instant::now();
        door.open(t0);
        door.open(t0 + Duration::from_millis(80));
        assert!(!door.poll(t0 + Duration::from_millis(120)));
        assert!(door.poll(t0 + Duration::from_millis(180)));
    }
}
