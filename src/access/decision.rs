use super::ScheduleSlot;
use crate::store::{EventCode, UserRecord};

/// Outcome for a known user at `slot`. First match wins: lost, disabled,
/// outside the schedule, granted.
pub fn evaluate(user: &UserRecord, slot: ScheduleSlot) -> EventCode {
    if user.lost {
        tracing::debug!("Card marked as lost");
        EventCode::MarkedLost
    } else if !user.active {
        tracing::debug!("Card not active");
        EventCode::AccountDisabled
    } else if !user.schedule.allows(slot) {
        tracing::debug!(day = slot.day, hour = slot.hour, "Usage out of hours");
        EventCode::OutOfSchedule
    } else {
        tracing::debug!(day = slot.day, hour = slot.hour, "Hours match");
        EventCode::AccessGranted
    }
}
