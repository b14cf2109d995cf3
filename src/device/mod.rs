//! The reader: wires the store, the OTP protocol and the decision engine to
//! the physical and remote collaborators.

pub mod door;
pub mod dump;
pub mod report;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::access::{self, ScheduleSlot};
use crate::clock::Clock;
use crate::config::STATUS_BUFFER_BYTES;
use crate::control::{ControlError, UpdateRequest};
use crate::error::Result;
use crate::flash::Flash;
use crate::logging::DebugSwitch;
use crate::otp::{self, OtpOutcome, Token};
use crate::store::{
    EventCode, Fingerprint, LogEntry, Slot, StorageContext, StoreError, UserRecord, key_index,
    log, user,
};

pub use door::{Door, LogRelay, Relay};
pub use report::{ConsoleReporter, Publication, Reporter};

#[derive(Clone, Debug)]
pub struct DeviceOptions {
    pub open_for: Duration,
    pub scan_interval: Duration,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            open_for: Duration::from_millis(2000),
            scan_interval: Duration::from_millis(250),
        }
    }
}

pub struct Device<F> {
    store: StorageContext<F>,
    reporter: Box<dyn Reporter + Send>,
    clock: Box<dyn Clock + Send>,
    door: Door,
    rng: StdRng,
    debug: bool,
    debug_switch: Option<DebugSwitch>,
    scan_interval: Duration,
    next_scan: Option<Instant>,
}

impl<F: Flash> Device<F> {
    pub fn new(
        store: StorageContext<F>,
        reporter: Box<dyn Reporter + Send>,
        relay: Box<dyn Relay + Send>,
        clock: Box<dyn Clock + Send>,
        options: DeviceOptions,
    ) -> Self {
        Self {
            store,
            reporter,
            clock,
            door: Door::new(relay, options.open_for),
            rng: StdRng::from_entropy(),
            debug: false,
            debug_switch: None,
            scan_interval: options.scan_interval,
            next_scan: None,
        }
    }

    /// Replaces the OTP generator, for deterministic runs.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Lets the `debug` control raise the log level along with the user dump.
    pub fn with_debug_switch(mut self, switch: DebugSwitch) -> Self {
        self.debug_switch = Some(switch);
        self
    }

    pub fn store(&self) -> &StorageContext<F> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StorageContext<F> {
        &mut self.store
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn door_is_open(&self) -> bool {
        self.door.is_open()
    }

    /// Handles a token held to the reader.
    ///
    /// Returns `None` when the token protocol failed; the presentation is then
    /// ignored as if the token had never been there.
    ///
    /// The user record (new OTP, `last_seen`) is persisted before the event is
    /// logged, so a failed log write cannot leave token and record out of sync.
    pub fn present(&mut self, token: &mut dyn Token, now: Instant) -> Result<Option<EventCode>> {
        self.next_scan = Some(now + self.scan_interval);
        let fingerprint = Fingerprint::from_uid(token.uid())?;
        tracing::info!(fingerprint = %fingerprint, "Identifying");

        let Some(slot) = key_index::find(&self.store, &fingerprint)? else {
            self.record_event(fingerprint, EventCode::UnknownCredential)?;
            self.next_scan = Some(now + self.door.open_for());
            return Ok(Some(EventCode::UnknownCredential));
        };

        let mut record = user::load(&self.store, slot)?;
        self.dump(&record);

        if record.otp_enabled {
            match otp::verify_and_rotate(token, &record, &mut self.rng) {
                Err(e) => {
                    tracing::warn!(slot, error = %e, "Token protocol failed, ignoring card");
                    return Ok(None);
                }
                Ok(OtpOutcome::CloneDetected) => {
                    tracing::warn!(slot, fingerprint = %fingerprint, "Possible card hijack, disabling user");
                    record.active = false;
                    user::save(&mut self.store, slot, &record)?;
                    self.record_event(fingerprint, EventCode::OtpMismatch)?;
                    return Ok(Some(EventCode::OtpMismatch));
                }
                Ok(OtpOutcome::Rotated(next)) => record.otp = next,
            }
        }

        let event = access::evaluate(&record, ScheduleSlot::at(self.clock.now()));
        record.last_seen = self.clock.timestamp();
        user::save(&mut self.store, slot, &record)?;
        if event == EventCode::AccessGranted {
            self.door.open(now);
        }
        self.record_event(fingerprint, event)?;
        Ok(Some(event))
    }

    /// `update`: provisions or changes a credential. Returns its slot.
    pub fn update(&mut self, text: &str) -> Result<Slot, ControlError> {
        let request: UpdateRequest = text.parse()?;
        let fingerprint = request.fingerprint;
        let now = self.clock.timestamp();

        let slot = match key_index::find(&self.store, &fingerprint)? {
            Some(slot) => {
                let mut record = user::load(&self.store, slot)?;
                request.apply(&mut record, now);
                self.dump(&record);
                user::save(&mut self.store, slot, &record)?;
                slot
            }
            None => {
                let mut record = UserRecord::default();
                request.apply(&mut record, now);
                self.dump(&record);
                match user::register(&mut self.store, &fingerprint, &record) {
                    Ok(slot) => slot,
                    Err(StoreError::StorageFull) => {
                        self.reporter.publish(&Publication::Error(
                            "can't add new key, storage is full".into(),
                        ));
                        self.record_event(fingerprint, EventCode::StorageFull)?;
                        return Err(StoreError::StorageFull.into());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        tracing::info!(slot, fingerprint = %fingerprint, "Credential updated");
        self.record_event(fingerprint, EventCode::RecordUpdated)?;
        Ok(slot)
    }

    /// `open`: remote door release.
    pub fn open(&mut self, now: Instant) {
        tracing::info!("Remote open");
        self.reporter.publish(&Publication::Call);
        self.door.open(now);
    }

    /// `debug`: "1" enables diagnostics and the user dump, anything else
    /// disables them.
    pub fn set_debug(&mut self, flag: &str) -> bool {
        self.debug = flag.trim() == "1";
        if let Some(switch) = &self.debug_switch {
            switch.set(self.debug);
        }
        tracing::info!(debug = self.debug, "Debug mode");
        self.debug
    }

    /// `reset`: forgets every key and log entry.
    pub fn reset(&mut self) -> Result<(), ControlError> {
        self.store.reset()?;
        Ok(())
    }

    /// Exit button pressed.
    pub fn button(&mut self, now: Instant) {
        if !self.door.is_open() {
            self.reporter.publish(&Publication::Button);
        }
        self.door.open(now);
    }

    /// Advances the door timer.
    pub fn poll(&mut self, now: Instant) {
        self.door.poll(now);
    }

    /// Whether the reader should look for a card at `now`.
    pub fn scan_ready(&self, now: Instant) -> bool {
        !self.door.is_open() && self.next_scan.is_none_or(|at| now >= at)
    }

    /// Recent log entries as exposed to the remote side.
    pub fn status(&self) -> Result<String, StoreError> {
        log::render_recent(&self.store, STATUS_BUFFER_BYTES)
    }

    /// Logs and publishes a card event. The publication goes out even if the
    /// log write failed; the failure is returned afterwards.
    fn record_event(&mut self, fingerprint: Fingerprint, event: EventCode) -> Result<(), StoreError> {
        let entry = LogEntry {
            timestamp: self.clock.timestamp(),
            fingerprint,
            event,
        };
        let logged = log::append(&mut self.store, &entry);
        self.reporter.publish(&Publication::Card(entry));
        logged.map(|_| ())
    }

    fn dump(&self, user: &UserRecord) {
        if self.debug {
            let text = dump::render_user(user, ScheduleSlot::at(self.clock.now()));
            tracing::info!("User record\n{text}");
        }
    }
}
