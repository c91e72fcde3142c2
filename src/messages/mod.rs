//! The closed message catalogue and its visitor.
//!
//! Every change to timing state arrives as one [`Message`]. Each case wraps an
//! immutable payload struct that validates its arguments on construction, so
//! code consuming messages never has to re-check domain ranges.
//!
//! # Dispatch
//!
//! [`Message::accept`] calls exactly one [`MessageVisitor`] method. Adding a
//! message case adds a visitor method, so every visitor fails to compile until
//! it handles the new case.
//!
//! ```rust
//! use livetiming::messages::{Message, SetDriverPosition};
//!
//! let message = Message::from(SetDriverPosition::new(7, 1)?);
//! assert_eq!(message.name(), "SetDriverPosition");
//! assert_eq!(message.type_tag(), 13097688);
//! # Ok::<(), livetiming::TimingError>(())
//! ```
//!
//! # Wire form
//!
//! Payloads are codec records. Driver messages carry the driver id in field
//! tag 0 and their own data from tag 1 upwards. Singleton messages have no
//! fields and decode to one canonical shared instance.

mod driver;
mod feed;
mod session;
mod weather;

pub use driver::{
    ClearGridRow, ReplaceDriverLapTime, ReplaceDriverSectorTime, SetDriverCarNumber, SetDriverGap,
    SetDriverInterval, SetDriverLapNumber, SetDriverLapTime, SetDriverName, SetDriverPitCount,
    SetDriverPitTime, SetDriverPosition, SetDriverQuallyTime, SetDriverSectorTime,
    SetDriverStatus, SetGridColumnColour, SetGridColumnValue,
};
pub use feed::{
    SetCopyright, SetKeyframe, SetNextMessageDelay, SetPingInterval, SetStreamTimestamp,
    SetStreamValidity,
};
pub use session::{
    AddCommentary, EndOfSession, SetElapsedSessionTime, SetMinRequiredQuallyTime,
    SetRaceLapNumber, SetRemainingSessionTime, SetSessionStatus, SetSessionType, SetSystemMessage,
    StartSessionTimeCountdown, StopSessionTimeCountdown,
};
pub use weather::{
    SetAirTemperature, SetAtmosphericPressure, SetHumidity, SetIsWet, SetTrackTemperature,
    SetWindAngle, SetWindSpeed,
};

use crate::schema::{Object, Record, Registry};
use crate::types::{TimeSpan, Value};
use crate::{Result, TimingError};

/// Declares a validated message payload and its wire record.
///
/// String fields are marked `as str` (or `as opt_str` for optional strings) so
/// their getters borrow instead of cloning.
macro_rules! message {
    (
        $(#[$meta:meta])*
        pub struct $name:ident(tag = $tag:expr) {
            $( $ftag:literal => $field:ident: $ty:ty $(as $mode:ident)? ),* $(,)?
        }
        validate $check:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            $( $field: $ty, )*
        }

        impl $name {
            pub fn new($( $field: $ty ),*) -> $crate::Result<Self> {
                $check
                Ok(Self { $( $field ),* })
            }

            $( $crate::messages::getter!($field: $ty $(as $mode)?); )*
        }

        $crate::schema::record!($name, tag = $tag, name = stringify!($name), {
            $( $ftag => $field ),*
        });
    };
}

macro_rules! getter {
    ($field:ident: $ty:ty as str) => {
        pub fn $field(&self) -> &str {
            &self.$field
        }
    };
    ($field:ident: $ty:ty as opt_str) => {
        pub fn $field(&self) -> Option<&str> {
            self.$field.as_deref()
        }
    };
    ($field:ident: $ty:ty) => {
        pub fn $field(&self) -> $ty {
            self.$field
        }
    };
}

/// Declares a fieldless message that decodes to a canonical instance.
macro_rules! singleton {
    ($(#[$meta:meta])* pub struct $name:ident(tag = $tag:expr);) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        $crate::schema::record!($name, tag = $tag, name = stringify!($name), singleton);
    };
}

pub(crate) use {getter, message, singleton};

macro_rules! define_messages {
    ($( $name:ident => $visit:ident ),* $(,)?) => {
        /// One timing update.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Message {
            $( $name($name), )*
        }

        /// Receives a message through [`Message::accept`].
        pub trait MessageVisitor {
            type Output;

            $( fn $visit(&mut self, message: &$name) -> Self::Output; )*
        }

        impl Message {
            /// Calls the visitor method matching this message.
            pub fn accept<V: MessageVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $( Message::$name(message) => visitor.$visit(message), )*
                }
            }

            pub fn type_tag(&self) -> i32 {
                match self {
                    $( Message::$name(_) => <$name as Record>::TYPE_TAG, )*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $( Message::$name(_) => <$name as Record>::TYPE_NAME, )*
                }
            }

            /// Wraps the payload as a codec object.
            pub fn to_value(&self) -> Value {
                match self {
                    $( Message::$name(message) => Value::Object(message.clone().substitute()), )*
                }
            }

            /// Recovers a message from a decoded object.
            pub fn from_object(object: &dyn Object) -> Result<Self> {
                let any = object.as_any();
                $(
                    if let Some(message) = any.downcast_ref::<$name>() {
                        return Ok(Message::$name(message.clone()));
                    }
                )*
                Err(TimingError::type_mismatch("message", object.type_name()))
            }

            /// Registers every payload type.
            pub(crate) fn register_all(registry: &mut Registry) -> Result<()> {
                $( registry.register::<$name>()?; )*
                Ok(())
            }
        }

        $(
            impl From<$name> for Message {
                fn from(message: $name) -> Self {
                    Message::$name(message)
                }
            }
        )*
    };
}

define_messages! {
    SetDriverCarNumber => visit_set_driver_car_number,
    SetDriverName => visit_set_driver_name,
    SetDriverPosition => visit_set_driver_position,
    SetDriverSectorTime => visit_set_driver_sector_time,
    ReplaceDriverSectorTime => visit_replace_driver_sector_time,
    SetDriverLapTime => visit_set_driver_lap_time,
    ReplaceDriverLapTime => visit_replace_driver_lap_time,
    SetDriverLapNumber => visit_set_driver_lap_number,
    SetDriverGap => visit_set_driver_gap,
    SetDriverInterval => visit_set_driver_interval,
    SetDriverStatus => visit_set_driver_status,
    SetDriverPitCount => visit_set_driver_pit_count,
    SetDriverPitTime => visit_set_driver_pit_time,
    SetDriverQuallyTime => visit_set_driver_qually_time,
    SetGridColumnValue => visit_set_grid_column_value,
    SetGridColumnColour => visit_set_grid_column_colour,
    ClearGridRow => visit_clear_grid_row,
    SetSessionType => visit_set_session_type,
    SetSessionStatus => visit_set_session_status,
    SetElapsedSessionTime => visit_set_elapsed_session_time,
    SetRemainingSessionTime => visit_set_remaining_session_time,
    SetRaceLapNumber => visit_set_race_lap_number,
    StartSessionTimeCountdown => visit_start_session_time_countdown,
    StopSessionTimeCountdown => visit_stop_session_time_countdown,
    EndOfSession => visit_end_of_session,
    AddCommentary => visit_add_commentary,
    SetSystemMessage => visit_set_system_message,
    SetMinRequiredQuallyTime => visit_set_min_required_qually_time,
    SetAirTemperature => visit_set_air_temperature,
    SetTrackTemperature => visit_set_track_temperature,
    SetHumidity => visit_set_humidity,
    SetAtmosphericPressure => visit_set_atmospheric_pressure,
    SetWindSpeed => visit_set_wind_speed,
    SetWindAngle => visit_set_wind_angle,
    SetIsWet => visit_set_is_wet,
    SetKeyframe => visit_set_keyframe,
    SetCopyright => visit_set_copyright,
    SetPingInterval => visit_set_ping_interval,
    SetStreamValidity => visit_set_stream_validity,
    SetStreamTimestamp => visit_set_stream_timestamp,
    SetNextMessageDelay => visit_set_next_message_delay,
}

impl Message {
    /// Recovers a message from a decoded value.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(object) => Self::from_object(object.as_ref()),
            other => Err(TimingError::type_mismatch("message", other.kind_name())),
        }
    }

    /// Driver addressed by this message, if it is a driver message.
    pub fn driver_id(&self) -> Option<i32> {
        self.accept(&mut DriverIdOf)
    }
}

struct DriverIdOf;

macro_rules! driver_id_of {
    (driver: $($visit:ident => $name:ident),*; other: $($other_visit:ident => $other:ident),* $(,)?) => {
        impl MessageVisitor for DriverIdOf {
            type Output = Option<i32>;

            $( fn $visit(&mut self, message: &$name) -> Option<i32> { Some(message.driver_id()) } )*
            $( fn $other_visit(&mut self, _: &$other) -> Option<i32> { None } )*
        }
    };
}

driver_id_of! {
    driver:
        visit_set_driver_car_number => SetDriverCarNumber,
        visit_set_driver_name => SetDriverName,
        visit_set_driver_position => SetDriverPosition,
        visit_set_driver_sector_time => SetDriverSectorTime,
        visit_replace_driver_sector_time => ReplaceDriverSectorTime,
        visit_set_driver_lap_time => SetDriverLapTime,
        visit_replace_driver_lap_time => ReplaceDriverLapTime,
        visit_set_driver_lap_number => SetDriverLapNumber,
        visit_set_driver_gap => SetDriverGap,
        visit_set_driver_interval => SetDriverInterval,
        visit_set_driver_status => SetDriverStatus,
        visit_set_driver_pit_count => SetDriverPitCount,
        visit_set_driver_pit_time => SetDriverPitTime,
        visit_set_driver_qually_time => SetDriverQuallyTime,
        visit_set_grid_column_value => SetGridColumnValue,
        visit_set_grid_column_colour => SetGridColumnColour,
        visit_clear_grid_row => ClearGridRow;
    other:
        visit_set_session_type => SetSessionType,
        visit_set_session_status => SetSessionStatus,
        visit_set_elapsed_session_time => SetElapsedSessionTime,
        visit_set_remaining_session_time => SetRemainingSessionTime,
        visit_set_race_lap_number => SetRaceLapNumber,
        visit_start_session_time_countdown => StartSessionTimeCountdown,
        visit_stop_session_time_countdown => StopSessionTimeCountdown,
        visit_end_of_session => EndOfSession,
        visit_add_commentary => AddCommentary,
        visit_set_system_message => SetSystemMessage,
        visit_set_min_required_qually_time => SetMinRequiredQuallyTime,
        visit_set_air_temperature => SetAirTemperature,
        visit_set_track_temperature => SetTrackTemperature,
        visit_set_humidity => SetHumidity,
        visit_set_atmospheric_pressure => SetAtmosphericPressure,
        visit_set_wind_speed => SetWindSpeed,
        visit_set_wind_angle => SetWindAngle,
        visit_set_is_wet => SetIsWet,
        visit_set_keyframe => SetKeyframe,
        visit_set_copyright => SetCopyright,
        visit_set_ping_interval => SetPingInterval,
        visit_set_stream_validity => SetStreamValidity,
        visit_set_stream_timestamp => SetStreamTimestamp,
        visit_set_next_message_delay => SetNextMessageDelay,
}

// Shared construction checks.

fn check_driver_id(driver_id: i32) -> Result<()> {
    if driver_id <= 0 {
        return Err(TimingError::domain("driver_id", format!("must be positive, was {driver_id}")));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(TimingError::domain(field, format!("must not be negative, was {value}")));
    }
    Ok(())
}

fn check_time(field: &'static str, time: TimeSpan) -> Result<()> {
    if time.is_negative() {
        return Err(TimingError::domain(field, format!("must not be negative, was {time}")));
    }
    Ok(())
}

fn check_segment(field: &'static str, number: i32) -> Result<()> {
    if !(1..=3).contains(&number) {
        return Err(TimingError::domain(field, format!("must be 1, 2 or 3, was {number}")));
    }
    Ok(())
}

fn check_text(field: &'static str, text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(TimingError::domain(field, "must not be empty"));
    }
    Ok(())
}

fn check_reading(field: &'static str, reading: f64) -> Result<()> {
    if reading.is_nan() {
        return Err(TimingError::domain(field, "must be a number"));
    }
    Ok(())
}
