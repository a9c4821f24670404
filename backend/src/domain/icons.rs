//! Provider icon code to image URL resolution.

/// Resolve a provider icon code (`"01d"` through `"50n"`) to its image URL.
///
/// Unknown or absent codes resolve to the empty string so clients can treat
/// "no icon" uniformly.
///
/// # Examples
/// ```
/// use weatherboard::domain::icon_url;
///
/// assert_eq!(icon_url(Some("10n")), "https://openweathermap.org/img/wn/10n@2x.png");
/// assert_eq!(icon_url(Some("99x")), "");
/// assert_eq!(icon_url(None), "");
/// ```
pub fn icon_url(code: Option<&str>) -> &'static str {
    match code.unwrap_or_default() {
        "01d" => "https://openweathermap.org/img/wn/01d@2x.png",
        "01n" => "https://openweathermap.org/img/wn/01n@2x.png",
        "02d" => "https://openweathermap.org/img/wn/02d@2x.png",
        "02n" => "https://openweathermap.org/img/wn/02n@2x.png",
        "03d" => "https://openweathermap.org/img/wn/03d@2x.png",
        "03n" => "https://openweathermap.org/img/wn/03n@2x.png",
        "04d" => "https://openweathermap.org/img/wn/04d@2x.png",
        "04n" => "https://openweathermap.org/img/wn/04n@2x.png",
        "09d" => "https://openweathermap.org/img/wn/09d@2x.png",
        "09n" => "https://openweathermap.org/img/wn/09n@2x.png",
        "10d" => "https://openweathermap.org/img/wn/10d@2x.png",
        "10n" => "https://openweathermap.org/img/wn/10n@2x.png",
        "11d" => "https://openweathermap.org/img/wn/11d@2x.png",
        "11n" => "https://openweathermap.org/img/wn/11n@2x.png",
        "13d" => "https://openweathermap.org/img/wn/13d@2x.png",
        "13n" => "https://openweathermap.org/img/wn/13n@2x.png",
        "50d" => "https://openweathermap.org/img/wn/50d@2x.png",
        "50n" => "https://openweathermap.org/img/wn/50n@2x.png",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01d")]
    #[case("04n")]
    #[case("09d")]
    #[case("13n")]
    #[case("50d")]
    fn known_codes_resolve(#[case] code: &str) {
        assert_eq!(
            icon_url(Some(code)),
            format!("https://openweathermap.org/img/wn/{code}@2x.png")
        );
    }

    #[rstest]
    #[case(Some(""))]
    #[case(Some("05d"))]
    #[case(Some("01D"))]
    #[case(None)]
    fn unknown_codes_resolve_to_empty(#[case] code: Option<&str>) {
        assert_eq!(icon_url(code), "");
    }
}
