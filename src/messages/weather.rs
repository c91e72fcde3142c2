//! Weather readings.

use super::{check_reading, message};
use crate::TimingError;

message! {
    /// Air temperature in degrees Celsius.
    pub struct SetAirTemperature(tag = 16613064) {
        0 => temperature: f64,
    }
    validate {
        check_reading("temperature", temperature)?;
    }
}

message! {
    /// Track temperature in degrees Celsius.
    pub struct SetTrackTemperature(tag = 47) {
        0 => temperature: f64,
    }
    validate {
        check_reading("temperature", temperature)?;
    }
}

message! {
    /// Relative humidity as a percentage.
    pub struct SetHumidity(tag = -81152176) {
        0 => humidity: f64,
    }
    validate {
        check_reading("humidity", humidity)?;
        if !(0.0..=100.0).contains(&humidity) {
            return Err(TimingError::domain("humidity", format!("{humidity} is not a percentage")));
        }
    }
}

message! {
    /// Atmospheric pressure in millibars.
    pub struct SetAtmosphericPressure(tag = 39) {
        0 => pressure: f64,
    }
    validate {
        check_reading("pressure", pressure)?;
        if pressure <= 0.0 {
            return Err(TimingError::domain("pressure", format!("must be positive, was {pressure}")));
        }
    }
}

message! {
    /// Wind speed in metres per second.
    pub struct SetWindSpeed(tag = 44) {
        0 => speed: f64,
    }
    validate {
        check_reading("speed", speed)?;
        if speed < 0.0 {
            return Err(TimingError::domain("speed", format!("must not be negative, was {speed}")));
        }
    }
}

message! {
    /// Wind direction in whole degrees.
    pub struct SetWindAngle(tag = 91304368) {
        0 => angle: i32,
    }
    validate {
        if !(0..=360).contains(&angle) {
            return Err(TimingError::domain("angle", format!("{angle} is not a compass angle")));
        }
    }
}

message! {
    pub struct SetIsWet(tag = 72954222) {
        0 => is_wet: bool,
    }
    validate {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nan_readings_are_rejected() {
        assert!(SetAirTemperature::new(f64::NAN).is_err());
        assert!(SetTrackTemperature::new(f64::NAN).is_err());
        assert!(SetHumidity::new(f64::NAN).is_err());
        assert!(SetWindSpeed::new(f64::NAN).is_err());
    }

    #[test]
    fn readings_respect_physical_bounds() {
        assert!(SetHumidity::new(101.0).is_err());
        assert!(SetAtmosphericPressure::new(0.0).is_err());
        assert!(SetWindSpeed::new(-0.5).is_err());
        assert!(SetWindAngle::new(361).is_err());
        assert!(SetWindAngle::new(-1).is_err());
        assert_eq!(SetWindAngle::new(360).expect("valid").angle(), 360);
        assert!(SetAirTemperature::new(-12.5).is_ok());
    }

    proptest! {
        #[test]
        fn any_finite_temperature_is_accepted(temperature in -60.0f64..80.0) {
            let message = SetTrackTemperature::new(temperature).expect("valid");
            prop_assert_eq!(message.temperature(), temperature);
        }
    }
}
