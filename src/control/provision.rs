use std::str::FromStr;

use super::ControlError;
use crate::access::ScheduleSpec;
use crate::otp::Otp;
use crate::store::{Fingerprint, Timestamp, UserRecord};

/// Status tokens of an update request. Absent means false.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub active: bool,
    pub otp: bool,
    pub lost: bool,
    /// Forget the stored OTP so the next use provisions a new one.
    pub reset: bool,
}

/// `fingerprint;schedule;flags`, e.g. `aa:bb:cc:dd;FF 0 0 FF00 AAFF;active,otp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateRequest {
    pub fingerprint: Fingerprint,
    pub schedule: ScheduleSpec,
    pub flags: Flags,
}

impl FromStr for UpdateRequest {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ';');
        let (Some(fingerprint), Some(schedule), Some(flags)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(ControlError::Malformed(format!(
                "expected fingerprint;schedule;flags, got {s:?}"
            )));
        };

        let fingerprint = fingerprint
            .parse::<Fingerprint>()
            .map_err(|e| ControlError::Malformed(e.to_string()))?;
        let schedule = ScheduleSpec::parse(schedule).map_err(ControlError::Malformed)?;

        let mut parsed = Flags::default();
        for token in flags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token {
                "active" => parsed.active = true,
                "otp" => parsed.otp = true,
                "lost" => parsed.lost = true,
                "reset" => parsed.reset = true,
                other => tracing::debug!(flag = other, "Ignoring unknown flag"),
            }
        }

        Ok(Self {
            fingerprint,
            schedule,
            flags: parsed,
        })
    }
}

impl UpdateRequest {
    /// Status flags are always overwritten; the schedule only if given.
    pub fn apply(&self, user: &mut UserRecord, now: Timestamp) {
        user.schedule = self.schedule.apply(user.schedule);
        user.otp_enabled = self.flags.otp;
        user.active = self.flags.active;
        user.lost = self.flags.lost;
        if self.flags.reset {
            user.otp = Otp::SENTINEL;
        }
        user.last_updated = now;
    }
}
