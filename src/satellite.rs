use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

// ---------- Constellation ----------

/// Navigation system a satellite belongs to.
///
/// Anything the host reports that is not one of the four named systems
/// (SBAS, QZSS, IRNSS, unknown codes) collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "ConstellationRepr")]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
    Beidou,
    Other,
}

impl Constellation {
    /// The four constellations the settings editor can toggle, in editor order.
    pub const NAMED: [Constellation; 4] = [
        Constellation::Gps,
        Constellation::Glonass,
        Constellation::Beidou,
        Constellation::Galileo,
    ];

    /// Maps the host positioning API's numeric constellation type.
    pub fn from_type_code(code: i32) -> Self {
        match code {
            1 => Constellation::Gps,
            3 => Constellation::Glonass,
            5 => Constellation::Beidou,
            6 => Constellation::Galileo,
            _ => Constellation::Other,
        }
    }

    /// Name used for settings membership. Casing is part of the persisted format.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Constellation::Gps => "GPS",
            Constellation::Glonass => "Glonass",
            Constellation::Beidou => "Beidou",
            Constellation::Galileo => "Galileo",
            Constellation::Other => "Unknown",
        }
    }

    /// Strict inverse of `canonical_name` for the toggleable constellations.
    pub fn from_canonical_name(name: &str) -> Option<Self> {
        Constellation::NAMED
            .into_iter()
            .find(|c| c.canonical_name() == name)
    }

    pub fn is_toggleable(self) -> bool {
        self != Constellation::Other
    }

    // Lenient parse for incoming records, which may spell names in upper case.
    fn from_any_name(name: &str) -> Self {
        if let Some(c) = Constellation::from_canonical_name(name) {
            return c;
        }
        match name.to_ascii_uppercase().as_str() {
            "GPS" => Constellation::Gps,
            "GLONASS" => Constellation::Glonass,
            "BEIDOU" => Constellation::Beidou,
            "GALILEO" => Constellation::Galileo,
            _ => Constellation::Other,
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl Serialize for Constellation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical_name())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConstellationRepr {
    Code(i32),
    Name(String),
}

impl From<ConstellationRepr> for Constellation {
    fn from(repr: ConstellationRepr) -> Self {
        match repr {
            ConstellationRepr::Code(code) => Constellation::from_type_code(code),
            ConstellationRepr::Name(name) => Constellation::from_any_name(&name),
        }
    }
}

// ---------- Satellite record ----------

/// One satellite as reported in a single status snapshot.
///
/// Values are not range-checked: out-of-domain angles are projected with the
/// same formulas as everything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatelliteRecord {
    #[serde(alias = "svid")]
    id: i32,
    #[serde(alias = "constellation_type")]
    constellation: Constellation,
    #[serde(alias = "elevation")]
    elevation_degrees: f32,
    #[serde(alias = "azimuth")]
    azimuth_degrees: f32,
    used_in_fix: bool,
}

impl SatelliteRecord {
    pub fn new(
        id: i32,
        constellation: Constellation,
        elevation_degrees: f32,
        azimuth_degrees: f32,
        used_in_fix: bool,
    ) -> Self {
        Self { id, constellation, elevation_degrees, azimuth_degrees, used_in_fix }
    }

    /// Builds a record straight from the host API's per-index status fields.
    pub fn from_status(svid: i32, constellation_type: i32, elevation: f32, azimuth: f32, used_in_fix: bool) -> Self {
        Self::new(svid, Constellation::from_type_code(constellation_type), elevation, azimuth, used_in_fix)
    }

    pub fn id(&self) -> i32 { self.id }
    pub fn constellation(&self) -> Constellation { self.constellation }
    pub fn elevation_degrees(&self) -> f32 { self.elevation_degrees }
    pub fn azimuth_degrees(&self) -> f32 { self.azimuth_degrees }
    pub fn used_in_fix(&self) -> bool { self.used_in_fix }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_map_to_named_constellations() {
        assert_eq!(Constellation::from_type_code(1), Constellation::Gps);
        assert_eq!(Constellation::from_type_code(3), Constellation::Glonass);
        assert_eq!(Constellation::from_type_code(5), Constellation::Beidou);
        assert_eq!(Constellation::from_type_code(6), Constellation::Galileo);
        // SBAS, QZSS, IRNSS and garbage all fall through
        for code in [0, 2, 4, 7, 99, -1] {
            assert_eq!(Constellation::from_type_code(code), Constellation::Other);
        }
    }

    #[test]
    fn canonical_names_round_trip_exactly() {
        for c in Constellation::NAMED {
            assert_eq!(Constellation::from_canonical_name(c.canonical_name()), Some(c));
        }
        assert_eq!(Constellation::from_canonical_name("GLONASS"), None);
        assert_eq!(Constellation::from_canonical_name("Unknown"), None);
    }

    #[test]
    fn record_accepts_numeric_or_named_constellation() {
        let by_code: SatelliteRecord = serde_json::from_str(
            r#"{"svid": 12, "constellation_type": 6, "elevation": 41.5, "azimuth": 200.0, "used_in_fix": false}"#,
        ).unwrap();
        assert_eq!(by_code.id(), 12);
        assert_eq!(by_code.constellation(), Constellation::Galileo);

        let by_name: SatelliteRecord = serde_json::from_str(
            r#"{"id": 3, "constellation": "GLONASS", "elevation_degrees": 10.0, "azimuth_degrees": 5.0, "used_in_fix": true}"#,
        ).unwrap();
        assert_eq!(by_name.constellation(), Constellation::Glonass);

        let other: SatelliteRecord = serde_json::from_str(
            r#"{"id": 120, "constellation": "SBAS", "elevation_degrees": 30.0, "azimuth_degrees": 150.0, "used_in_fix": false}"#,
        ).unwrap();
        assert_eq!(other.constellation(), Constellation::Other);
    }
}
