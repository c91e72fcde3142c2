use tracing::{debug, trace};

use super::Session;
use crate::messages::*;
use crate::model::driver::PitTime;
use crate::model::series::TimedResultSeries;
use crate::types::{Rank, SessionType, TimeSpan, TimedResult};
use crate::{Result, TimingError};

/// Applies messages to a session. Messages built with `new` are already
/// validated, but decoded ones are not, so segment lookups can still fail.
pub(super) struct SessionBuilder<'a> {
    session: &'a mut Session,
}

impl<'a> SessionBuilder<'a> {
    pub(super) fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// A session best always takes the fastest lap. Outside a race any lap
    /// quicker than the current fastest lap takes it too.
    fn update_fastest_lap(&mut self, driver_id: i32, lap: TimedResult) {
        let fastest = &mut self.session.fastest;
        let quicker = fastest.lap().is_none_or(|current| lap.time() < current.time);
        if lap.rank() == Rank::SessionBest
            || (self.session.session_type != SessionType::Race && quicker)
        {
            trace!("Driver {} takes the fastest lap with {}", driver_id, lap.time());
            fastest.set_lap(driver_id, lap.time(), lap.lap_number());
        }
    }

    fn update_fastest_sector(&mut self, driver_id: i32, sector: i32, time: TimedResult) {
        if time.rank() == Rank::SessionBest {
            self.session.fastest.set_sector(sector, driver_id, time.time(), time.lap_number());
        }
    }

    fn sector_series(
        &mut self,
        driver_id: i32,
        sector: i32,
    ) -> Result<&mut TimedResultSeries> {
        self.session
            .driver_mut(driver_id)
            .lap_times
            .sector_mut(sector)
            .ok_or_else(|| TimingError::domain("sector_number", format!("no sector {sector}")))
    }
}

impl MessageVisitor for SessionBuilder<'_> {
    type Output = Result<()>;

    fn visit_set_driver_car_number(&mut self, message: &SetDriverCarNumber) -> Result<()> {
        self.session.driver_mut(message.driver_id()).car_number = Some(message.car_number());
        Ok(())
    }

    fn visit_set_driver_name(&mut self, message: &SetDriverName) -> Result<()> {
        self.session.driver_mut(message.driver_id()).name = Some(message.name().to_owned());
        Ok(())
    }

    fn visit_set_driver_position(&mut self, message: &SetDriverPosition) -> Result<()> {
        let driver_id = message.driver_id();
        let driver = self.session.driver_mut(driver_id);
        if driver.position != message.position() {
            driver.position = message.position();
            let moves = self.session.drivers.sort();
            trace!("Driver {} now P{} ({} moves)", driver_id, message.position(), moves.len());
        }
        self.session.grid.set_position(driver_id, message.position());
        Ok(())
    }

    fn visit_set_driver_sector_time(&mut self, message: &SetDriverSectorTime) -> Result<()> {
        let time = message.sector_time();
        self.sector_series(message.driver_id(), message.sector_number())?.add(time);
        self.update_fastest_sector(message.driver_id(), message.sector_number(), time);
        Ok(())
    }

    fn visit_replace_driver_sector_time(&mut self, message: &ReplaceDriverSectorTime) -> Result<()> {
        let replacement = message.replacement();
        let replaced =
            self.sector_series(message.driver_id(), message.sector_number())?.replace_last(replacement)?;
        debug!(
            "Driver {} sector {} corrected from {} to {}",
            message.driver_id(),
            message.sector_number(),
            replaced,
            replacement
        );
        self.update_fastest_sector(message.driver_id(), message.sector_number(), replacement);
        Ok(())
    }

    fn visit_set_driver_lap_time(&mut self, message: &SetDriverLapTime) -> Result<()> {
        let lap = message.lap_time();
        self.session.driver_mut(message.driver_id()).lap_times.laps.add(lap);
        self.update_fastest_lap(message.driver_id(), lap);
        Ok(())
    }

    fn visit_replace_driver_lap_time(&mut self, message: &ReplaceDriverLapTime) -> Result<()> {
        let replacement = message.replacement();
        let replaced =
            self.session.driver_mut(message.driver_id()).lap_times.laps.replace_last(replacement)?;
        debug!("Driver {} lap corrected from {} to {}", message.driver_id(), replaced, replacement);
        self.update_fastest_lap(message.driver_id(), replacement);
        Ok(())
    }

    fn visit_set_driver_lap_number(&mut self, message: &SetDriverLapNumber) -> Result<()> {
        self.session.driver_mut(message.driver_id()).laps_completed = message.lap_number();
        Ok(())
    }

    fn visit_set_driver_gap(&mut self, message: &SetDriverGap) -> Result<()> {
        self.session.driver_mut(message.driver_id()).gap = Some(message.gap());
        Ok(())
    }

    fn visit_set_driver_interval(&mut self, message: &SetDriverInterval) -> Result<()> {
        self.session.driver_mut(message.driver_id()).interval = Some(message.interval());
        Ok(())
    }

    fn visit_set_driver_status(&mut self, message: &SetDriverStatus) -> Result<()> {
        self.session.driver_mut(message.driver_id()).status = message.status();
        Ok(())
    }

    fn visit_set_driver_pit_count(&mut self, message: &SetDriverPitCount) -> Result<()> {
        self.session.driver_mut(message.driver_id()).pit_count = message.pit_count();
        Ok(())
    }

    fn visit_set_driver_pit_time(&mut self, message: &SetDriverPitTime) -> Result<()> {
        let pit = PitTime { time: message.time(), lap_number: message.lap_number() };
        self.session.driver_mut(message.driver_id()).pit_times.push(pit);
        Ok(())
    }

    fn visit_set_driver_qually_time(&mut self, message: &SetDriverQuallyTime) -> Result<()> {
        let driver = self.session.driver_mut(message.driver_id());
        if !driver.qually_times.set(message.qually_number(), message.qually_time()) {
            return Err(TimingError::domain(
                "qually_number",
                format!("no qualifying segment {}", message.qually_number()),
            ));
        }
        let lap_number = u32::try_from(driver.laps_completed).unwrap_or(0);
        let lap = TimedResult::new(message.qually_time(), Rank::Normal, lap_number)?;
        driver.lap_times.laps.add(lap);
        self.update_fastest_lap(message.driver_id(), lap);
        Ok(())
    }

    fn visit_set_grid_column_value(&mut self, message: &SetGridColumnValue) -> Result<()> {
        self.session.grid.set_value(
            message.driver_id(),
            message.column(),
            message.colour(),
            message.value(),
        )
    }

    fn visit_set_grid_column_colour(&mut self, message: &SetGridColumnColour) -> Result<()> {
        self.session.grid.set_colour(message.driver_id(), message.column(), message.colour())
    }

    fn visit_clear_grid_row(&mut self, message: &ClearGridRow) -> Result<()> {
        self.session.grid.clear_row(message.driver_id());
        Ok(())
    }

    fn visit_set_session_type(&mut self, message: &SetSessionType) -> Result<()> {
        if message.session_type() != self.session.session_type {
            self.session.reset(message.session_type());
        }
        self.session.session_id = message.session_id().to_owned();
        Ok(())
    }

    fn visit_set_session_status(&mut self, message: &SetSessionStatus) -> Result<()> {
        self.session.status = message.status();
        Ok(())
    }

    fn visit_set_elapsed_session_time(&mut self, message: &SetElapsedSessionTime) -> Result<()> {
        let clock = &mut self.session.clock;
        clock.elapsed = message.elapsed();
        clock.running = message.elapsed() > TimeSpan::ZERO;
        Ok(())
    }

    fn visit_set_remaining_session_time(&mut self, message: &SetRemainingSessionTime) -> Result<()> {
        self.session.clock.remaining = message.remaining();
        Ok(())
    }

    fn visit_set_race_lap_number(&mut self, message: &SetRaceLapNumber) -> Result<()> {
        self.session.race_lap_number = message.lap_number();
        Ok(())
    }

    fn visit_start_session_time_countdown(&mut self, _: &StartSessionTimeCountdown) -> Result<()> {
        self.session.clock.counting_down = true;
        Ok(())
    }

    fn visit_stop_session_time_countdown(&mut self, _: &StopSessionTimeCountdown) -> Result<()> {
        self.session.clock.counting_down = false;
        Ok(())
    }

    fn visit_end_of_session(&mut self, _: &EndOfSession) -> Result<()> {
        debug!("End of session");
        self.session.clock.running = false;
        Ok(())
    }

    fn visit_add_commentary(&mut self, message: &AddCommentary) -> Result<()> {
        let commentary = &mut self.session.messages.commentary;
        commentary.push_str(message.commentary());
        if message.commentary().ends_with('.') {
            commentary.push_str("\n\n");
        }
        Ok(())
    }

    fn visit_set_system_message(&mut self, message: &SetSystemMessage) -> Result<()> {
        self.session.messages.system =
            Some(message.message()).filter(|text| !text.is_empty()).map(str::to_owned);
        Ok(())
    }

    fn visit_set_min_required_qually_time(&mut self, message: &SetMinRequiredQuallyTime) -> Result<()> {
        self.session.min_required_qually_time = Some(message.time());
        Ok(())
    }

    fn visit_set_air_temperature(&mut self, message: &SetAirTemperature) -> Result<()> {
        self.session.weather.air_temperature.add(message.temperature())
    }

    fn visit_set_track_temperature(&mut self, message: &SetTrackTemperature) -> Result<()> {
        self.session.weather.track_temperature.add(message.temperature())
    }

    fn visit_set_humidity(&mut self, message: &SetHumidity) -> Result<()> {
        self.session.weather.humidity.add(message.humidity())
    }

    fn visit_set_atmospheric_pressure(&mut self, message: &SetAtmosphericPressure) -> Result<()> {
        self.session.weather.pressure.add(message.pressure())
    }

    fn visit_set_wind_speed(&mut self, message: &SetWindSpeed) -> Result<()> {
        self.session.weather.wind_speed.add(message.speed())
    }

    fn visit_set_wind_angle(&mut self, message: &SetWindAngle) -> Result<()> {
        self.session.weather.wind_angle.add(f64::from(message.angle()))
    }

    fn visit_set_is_wet(&mut self, message: &SetIsWet) -> Result<()> {
        self.session.weather.is_wet = message.is_wet();
        Ok(())
    }

    fn visit_set_keyframe(&mut self, message: &SetKeyframe) -> Result<()> {
        self.session.feed.keyframe = Some(message.keyframe());
        Ok(())
    }

    fn visit_set_copyright(&mut self, message: &SetCopyright) -> Result<()> {
        self.session.feed.copyright = Some(message.copyright().to_owned());
        Ok(())
    }

    fn visit_set_ping_interval(&mut self, message: &SetPingInterval) -> Result<()> {
        self.session.feed.ping_interval = Some(message.interval());
        Ok(())
    }

    fn visit_set_stream_validity(&mut self, message: &SetStreamValidity) -> Result<()> {
        self.session.feed.stream_valid = message.is_valid();
        Ok(())
    }

    fn visit_set_stream_timestamp(&mut self, message: &SetStreamTimestamp) -> Result<()> {
        self.session.feed.stream_timestamp = Some(message.timestamp());
        Ok(())
    }

    fn visit_set_next_message_delay(&mut self, message: &SetNextMessageDelay) -> Result<()> {
        // Playback pacing only.
        trace!("Ignoring replay delay of {}", message.delay());
        Ok(())
    }
}
