//! Feed housekeeping messages.

use super::{check_non_negative, check_text, check_time, message};
use crate::TimingError;
use crate::types::{TimeSpan, Timestamp};

message! {
    pub struct SetKeyframe(tag = 21) {
        0 => keyframe: i32,
    }
    validate {
        check_non_negative("keyframe", keyframe)?;
    }
}

message! {
    pub struct SetCopyright(tag = 40380621) {
        0 => copyright: String as str,
    }
    validate {
        check_text("copyright", &copyright)?;
    }
}

message! {
    /// Interval at which the feed expects to be pinged.
    pub struct SetPingInterval(tag = 91507218) {
        0 => interval: TimeSpan,
    }
    validate {
        check_time("interval", interval)?;
    }
}

message! {
    pub struct SetStreamValidity(tag = 25) {
        0 => is_valid: bool,
    }
    validate {}
}

message! {
    pub struct SetStreamTimestamp(tag = 24) {
        0 => timestamp: Timestamp,
    }
    validate {}
}

message! {
    /// Pause to observe before the next recorded message is replayed.
    ///
    /// Only recordings carry this message; it never reaches the state model
    /// during a replay.
    pub struct SetNextMessageDelay(tag = 48) {
        0 => delay: TimeSpan,
    }
    validate {
        if delay <= TimeSpan::ZERO {
            return Err(TimingError::domain("delay", format!("must be positive, was {delay}")));
        }
    }
}
