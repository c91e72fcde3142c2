//! Session-wide messages.

use super::{check_non_negative, check_text, check_time, message, singleton};
use crate::types::{SessionStatus, SessionType, TimeSpan};

message! {
    /// Announces the session type. A change of type starts a fresh session.
    pub struct SetSessionType(tag = 34) {
        0 => session_type: SessionType,
        1 => session_id: String as str,
    }
    validate {}
}

message! {
    pub struct SetSessionStatus(tag = 58867632) {
        0 => status: SessionStatus,
    }
    validate {}
}

message! {
    /// Sets the elapsed session time. A zero value stops the session clock.
    pub struct SetElapsedSessionTime(tag = 29) {
        0 => elapsed: TimeSpan,
    }
    validate {
        check_time("elapsed", elapsed)?;
    }
}

message! {
    pub struct SetRemainingSessionTime(tag = 32) {
        0 => remaining: TimeSpan,
    }
    validate {
        check_time("remaining", remaining)?;
    }
}

message! {
    /// Sets the current lap of a race.
    pub struct SetRaceLapNumber(tag = -57818482) {
        0 => lap_number: i32,
    }
    validate {
        check_non_negative("lap_number", lap_number)?;
    }
}

singleton! {
    /// Starts counting the remaining session time down.
    pub struct StartSessionTimeCountdown(tag = -63715761);
}

singleton! {
    /// Stops counting the remaining session time down.
    pub struct StopSessionTimeCountdown(tag = 45);
}

singleton! {
    /// Marks the end of the session.
    pub struct EndOfSession(tag = 46);
}

message! {
    /// Appends a block of live commentary.
    pub struct AddCommentary(tag = 27) {
        0 => commentary: String as str,
    }
    validate {
        check_text("commentary", &commentary)?;
    }
}

message! {
    /// Sets the system banner text. An empty message clears it.
    pub struct SetSystemMessage(tag = -2058583) {
        0 => message: String as str,
    }
    validate {}
}

message! {
    /// Sets the minimum lap time a driver must set to qualify.
    pub struct SetMinRequiredQuallyTime(tag = 63565184) {
        0 => time: TimeSpan,
    }
    validate {
        check_time("time", time)?;
    }
}
