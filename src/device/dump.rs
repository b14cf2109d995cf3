use std::fmt::Write;

use chrono::DateTime;

use crate::access::ScheduleSlot;
use crate::store::{Timestamp, UserRecord};

const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn format_time(ts: Timestamp) -> String {
    if ts == 0 {
        return "never".into();
    }
    DateTime::from_timestamp(ts as i64, 0)
        .map(|t| t.format("%a %b %e %H:%M:%S %Y").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Human readable user record with its week grid; `now` is marked with
/// parentheses.
pub fn render_user(user: &UserRecord, now: ScheduleSlot) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut out = String::new();
    let _ = writeln!(out, "-- Active? {}", yes_no(user.active));
    let _ = writeln!(out, "-- Lost? {}", yes_no(user.lost));
    let _ = writeln!(out, "-- Times:");
    let _ = write!(out, "     ");
    for day in DAYS {
        let _ = write!(out, " {day:^9}");
    }
    out.push('\n');

    for hour in 0..24u32 {
        let _ = write!(out, "{hour:>2} h ");
        for day in 0..7 {
            let slot = ScheduleSlot { day, hour };
            let open = user.schedule.allows(slot);
            let cell = match (slot == now, open) {
                (true, true) => "(*)",
                (true, false) => "( )",
                (false, true) => " * ",
                (false, false) => "   ",
            };
            let _ = write!(out, " {cell:^9}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "-- last update of user configuration: {}", format_time(user.last_updated));
    let _ = writeln!(out, "-- last seen: {}", format_time(user.last_seen));
    if user.otp_enabled {
        let _ = writeln!(out, "-- OTP:     {}", user.otp);
    } else {
        let _ = writeln!(out, "-- OTP:     not activated for this card");
    }
    out
}
