//! Messages addressed to a single driver.

use super::{check_driver_id, check_non_negative, check_segment, check_text, check_time, message};
use crate::types::{DriverStatus, Gap, GridColumn, GridColumnColour, TimeSpan, TimedResult};

message! {
    /// Sets a driver's car number.
    pub struct SetDriverCarNumber(tag = -47573943) {
        0 => driver_id: i32,
        1 => car_number: i32,
    }
    validate {
        check_driver_id(driver_id)?;
        check_non_negative("car_number", car_number)?;
    }
}

message! {
    /// Sets a driver's display name.
    pub struct SetDriverName(tag = -9752615) {
        0 => driver_id: i32,
        1 => name: String as str,
    }
    validate {
        check_driver_id(driver_id)?;
        check_text("name", &name)?;
    }
}

message! {
    /// Sets a driver's running position.
    pub struct SetDriverPosition(tag = 13097688) {
        0 => driver_id: i32,
        1 => position: i32,
    }
    validate {
        check_driver_id(driver_id)?;
        check_non_negative("position", position)?;
    }
}

message! {
    /// Posts a sector time.
    pub struct SetDriverSectorTime(tag = 14) {
        0 => driver_id: i32,
        1 => sector_number: i32,
        2 => sector_time: TimedResult,
    }
    validate {
        check_driver_id(driver_id)?;
        check_segment("sector_number", sector_number)?;
    }
}

message! {
    /// Corrects the most recently posted time for a sector.
    pub struct ReplaceDriverSectorTime(tag = -91873925) {
        0 => driver_id: i32,
        1 => sector_number: i32,
        2 => replacement: TimedResult,
    }
    validate {
        check_driver_id(driver_id)?;
        check_segment("sector_number", sector_number)?;
    }
}

message! {
    /// Posts a lap time.
    pub struct SetDriverLapTime(tag = -68954098) {
        0 => driver_id: i32,
        1 => lap_time: TimedResult,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    /// Corrects the most recently posted lap time.
    pub struct ReplaceDriverLapTime(tag = -73336549) {
        0 => driver_id: i32,
        1 => replacement: TimedResult,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    /// Sets the number of laps a driver has completed.
    pub struct SetDriverLapNumber(tag = 59519632) {
        0 => driver_id: i32,
        1 => lap_number: i32,
    }
    validate {
        check_driver_id(driver_id)?;
        check_non_negative("lap_number", lap_number)?;
    }
}

message! {
    /// Sets a driver's gap to the leader.
    pub struct SetDriverGap(tag = 5) {
        0 => driver_id: i32,
        1 => gap: Gap,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    /// Sets a driver's gap to the car ahead.
    pub struct SetDriverInterval(tag = 6) {
        0 => driver_id: i32,
        1 => interval: Gap,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    pub struct SetDriverStatus(tag = 16) {
        0 => driver_id: i32,
        1 => status: DriverStatus,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    pub struct SetDriverPitCount(tag = 31968328) {
        0 => driver_id: i32,
        1 => pit_count: i32,
    }
    validate {
        check_driver_id(driver_id)?;
        check_non_negative("pit_count", pit_count)?;
    }
}

message! {
    /// Records the duration of a pit stop and the lap it was taken on.
    pub struct SetDriverPitTime(tag = 11) {
        0 => driver_id: i32,
        1 => time: TimeSpan,
        2 => lap_number: i32,
    }
    validate {
        check_driver_id(driver_id)?;
        check_time("time", time)?;
        check_non_negative("lap_number", lap_number)?;
    }
}

message! {
    /// Sets a driver's best time in one qualifying segment.
    pub struct SetDriverQuallyTime(tag = 13) {
        0 => driver_id: i32,
        1 => qually_number: i32,
        2 => qually_time: TimeSpan,
    }
    validate {
        check_driver_id(driver_id)?;
        check_segment("qually_number", qually_number)?;
        check_time("qually_time", qually_time)?;
    }
}

message! {
    /// Sets the text and colour of one grid cell. A missing value clears the
    /// cell text.
    pub struct SetGridColumnValue(tag = 9626017) {
        0 => driver_id: i32,
        1 => column: GridColumn,
        2 => colour: GridColumnColour,
        3 => value: Option<String> as opt_str,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    /// Sets the colour of one grid cell, keeping its text.
    pub struct SetGridColumnColour(tag = 17) {
        0 => driver_id: i32,
        1 => column: GridColumn,
        2 => colour: GridColumnColour,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}

message! {
    /// Clears the timing columns of a driver's grid row.
    pub struct ClearGridRow(tag = 96429822) {
        0 => driver_id: i32,
    }
    validate {
        check_driver_id(driver_id)?;
    }
}
