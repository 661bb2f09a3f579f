use crate::error::ValueError;
use core::fmt;

const MICRO: f64 = 1_000_000.0;

/// A geographic coordinate stored as micro-degrees.
///
/// Keeping integer micro-degrees gives exact equality, hashing and a stable
/// text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    ulat: i32,
    ulng: i32,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValueError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ValueError::InvalidCoord { lat, lng });
        }
        Ok(Self {
            ulat: (lat * MICRO).round() as i32,
            ulng: (lng * MICRO).round() as i32,
        })
    }

    pub fn lat(self) -> f64 {
        f64::from(self.ulat) / MICRO
    }

    pub fn lng(self) -> f64 {
        f64::from(self.ulng) / MICRO
    }

    pub fn to_zinc(self) -> String {
        self.to_string()
    }
}

fn write_micro(f: &mut fmt::Formatter<'_>, micro: i32) -> fmt::Result {
    if micro < 0 {
        f.write_str("-")?;
    }
    let abs = micro.unsigned_abs();
    let frac = format!("{:06}", abs % 1_000_000);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    write!(f, "{}.{}", abs / 1_000_000, frac)
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("C(")?;
        write_micro(f, self.ulat)?;
        f.write_str(",")?;
        write_micro(f, self.ulng)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::Coord;

    #[test]
    fn renders_trimmed_degrees() {
        assert_eq!(Coord::new(37.55, -77.45).unwrap().to_zinc(), "C(37.55,-77.45)");
        assert_eq!(Coord::new(0.0, 0.0).unwrap().to_zinc(), "C(0.0,0.0)");
        assert_eq!(Coord::new(-0.5, 180.0).unwrap().to_zinc(), "C(-0.5,180.0)");
        assert_eq!(
            Coord::new(12.000001, 1.25).unwrap().to_zinc(),
            "C(12.000001,1.25)"
        );
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coord::new(91.0, 0.0).is_err());
        assert!(Coord::new(0.0, -180.5).is_err());
        assert!(Coord::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn accessors() {
        let c = Coord::new(51.5, -0.125).unwrap();
        assert_eq!(c.lat(), 51.5);
        assert_eq!(c.lng(), -0.125);
    }
}
