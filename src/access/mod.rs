pub mod decision;
pub mod schedule;

pub use decision::evaluate;
pub use schedule::{Schedule, ScheduleSlot, ScheduleSpec};
