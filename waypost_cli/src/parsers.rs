#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Parses `lat,lon`.
pub fn parse_coordinate(input: &str) -> Result<Coordinate, String> {
    let Some((lat, lon)) = input.split_once(',') else {
        return Err(String::from("Expected `lat,lon`"));
    };

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("Invalid latitude `{}`", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("Invalid longitude `{}`", lon.trim()))?;

    if !lat.is_finite() || !lon.is_finite() {
        return Err(String::from("Coordinates must be finite"));
    }

    Ok(Coordinate { lat, lon })
}
