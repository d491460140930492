/// Exponent applied to wind speed in the NWS wind chill formula
pub const WIND_CHILL_EXPONENT: f64 = 0.16;

/// Mean of the daily extremes
pub fn average_temperature(temp_max: f64, temp_min: f64) -> f64 {
    (temp_max + temp_min) / 2.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// NWS wind chill in °F for a temperature in °F and wind speed in mph
///
/// # Examples
/// ```
/// use weather_wrangler::utils::wind_chill_fahrenheit;
///
/// let chill = wind_chill_fahrenheit(32.0, 10.0);
/// assert!((chill - 23.727).abs() < 0.001);
/// ```
///
/// A negative wind speed yields NaN; callers pick a policy before calling.
pub fn wind_chill_fahrenheit(temp_f: f64, wind: f64) -> f64 {
    let wind_factor = wind.powf(WIND_CHILL_EXPONENT);
    35.74 + 0.6215 * temp_f - 35.75 * wind_factor + 0.4275 * temp_f * wind_factor
}
