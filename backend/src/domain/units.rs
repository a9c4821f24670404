//! Temperature conversion for display.

const KELVIN_OFFSET: f64 = 273.15;

/// Convert Kelvin to whole degrees Fahrenheit.
///
/// Absent or non-finite readings stay absent rather than becoming `0`.
///
/// # Examples
/// ```
/// use weatherboard::domain::kelvin_to_fahrenheit;
///
/// assert_eq!(kelvin_to_fahrenheit(Some(273.15)), Some(32));
/// assert_eq!(kelvin_to_fahrenheit(Some(300.0)), Some(80));
/// assert_eq!(kelvin_to_fahrenheit(None), None);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "rounded Fahrenheit readings are far inside i32 range and `as` saturates"
)]
pub fn kelvin_to_fahrenheit(kelvin: Option<f64>) -> Option<i32> {
    let kelvin = kelvin.filter(|value| value.is_finite())?;
    let fahrenheit = (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0;
    Some(fahrenheit.round() as i32)
}
