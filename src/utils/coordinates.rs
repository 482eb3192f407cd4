/// Hemisphere suffix of a HURDAT2 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' => Some(Hemisphere::West),
            _ => None,
        }
    }

    pub fn sign(&self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }

    pub fn is_latitude(&self) -> bool {
        matches!(self, Hemisphere::North | Hemisphere::South)
    }
}

/// Decode a hemisphere-suffixed coordinate such as `28.5N` or `079.0W`
/// into signed decimal degrees.
///
/// Returns `None` when the suffix is not one of `N`, `S`, `E`, `W` or the
/// prefix is not a non-negative decimal number.
///
/// # Examples
/// ```
/// use hurdat_processor::utils::decode_coordinate;
///
/// assert_eq!(decode_coordinate("28.5N"), Some(28.5));
/// assert_eq!(decode_coordinate("079.0W"), Some(-79.0));
/// ```
pub fn decode_coordinate(raw: &str) -> Option<f64> {
    let (hemisphere, magnitude) = split_coordinate(raw)?;
    Some(hemisphere.sign() * magnitude)
}

/// Split a coordinate into its hemisphere and unsigned magnitude
pub fn split_coordinate(raw: &str) -> Option<(Hemisphere, f64)> {
    let trimmed = raw.trim();
    let suffix = trimmed.chars().last()?;
    let hemisphere = Hemisphere::from_char(suffix)?;
    let prefix = &trimmed[..trimmed.len() - suffix.len_utf8()];

    // Digits and a single decimal point only, so no sign or exponent sneaks in
    if prefix.is_empty()
        || !prefix.chars().all(|c| c.is_ascii_digit() || c == '.')
        || prefix.matches('.').count() > 1
    {
        return None;
    }

    let magnitude = prefix.parse::<f64>().ok()?;
    Some((hemisphere, magnitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_coordinate() {
        assert_eq!(decode_coordinate("28.5N"), Some(28.5));
        assert_eq!(decode_coordinate("12.0S"), Some(-12.0));
        assert_eq!(decode_coordinate("079.0W"), Some(-79.0));
        assert_eq!(decode_coordinate("  5.3E "), Some(5.3));
        assert_eq!(decode_coordinate("0.0N"), Some(0.0));
    }

    #[test]
    fn test_invalid_coordinates() {
        assert_eq!(decode_coordinate(""), None);
        assert_eq!(decode_coordinate("N"), None);
        assert_eq!(decode_coordinate("28.5"), None);
        assert_eq!(decode_coordinate("28.5X"), None);
        assert_eq!(decode_coordinate("-28.5N"), None);
        assert_eq!(decode_coordinate("2.8.5N"), None);
        assert_eq!(decode_coordinate("1e3N"), None);
    }

    #[test]
    fn test_magnitude_and_sign_reproduce_value() {
        for raw in ["28.5N", "12.0S", "079.0W", "5.3E"] {
            let (hemisphere, magnitude) = split_coordinate(raw).unwrap();
            let signed = decode_coordinate(raw).unwrap();
            assert!((signed.abs() - magnitude).abs() < 1e-12);
            assert!((hemisphere.sign() * signed.abs() - signed).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hemisphere_axis() {
        assert!(Hemisphere::North.is_latitude());
        assert!(Hemisphere::South.is_latitude());
        assert!(!Hemisphere::East.is_latitude());
        assert!(!Hemisphere::West.is_latitude());
    }
}
