use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Cities covered by the prediction and map services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Balti,
    Cahul,
    Chisinau,
    Comrat,
    Cricova,
    Edinet,
    Floresti,
    Hincesti,
    Orhei,
    Rezina,
    Soroca,
    StefanVoda,
    Tiraspol,
    Ungheni,
    VadulLuiVoda,
}

/// (city, display name, upstream key)
const CITY_NAMES: [(City, &str, &str); 15] = [
    (City::Balti, "Bălți", "Balti"),
    (City::Cahul, "Cahul", "Cahul"),
    (City::Chisinau, "Chișinău", "Chisinau"),
    (City::Comrat, "Comrat", "Comrat"),
    (City::Cricova, "Cricova", "Cricova"),
    (City::Edinet, "Edineț", "Edinet"),
    (City::Floresti, "Florești", "Floresti"),
    (City::Hincesti, "Hîncești", "Hincesti"),
    (City::Orhei, "Orhei", "Orhei"),
    (City::Rezina, "Rezina", "Rezina"),
    (City::Soroca, "Soroca", "Soroca"),
    (City::StefanVoda, "Ștefan Vodă", "Stefan Voda"),
    (City::Tiraspol, "Tiraspol", "Tiraspol"),
    (City::Ungheni, "Ungheni", "Ungheni"),
    (City::VadulLuiVoda, "Vadul lui Vodă", "Vadul lui Voda"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown city '{0}'")]
pub struct UnknownCity(pub String);

impl City {
    pub const ALL: [City; 15] = [
        City::Balti,
        City::Cahul,
        City::Chisinau,
        City::Comrat,
        City::Cricova,
        City::Edinet,
        City::Floresti,
        City::Hincesti,
        City::Orhei,
        City::Rezina,
        City::Soroca,
        City::StefanVoda,
        City::Tiraspol,
        City::Ungheni,
        City::VadulLuiVoda,
    ];

    fn entry(self) -> &'static (City, &'static str, &'static str) {
        // CITY_NAMES is ordered like the enum.
        &CITY_NAMES[self as usize]
    }

    /// Name as shown to users, with diacritics.
    pub fn display_name(self) -> &'static str {
        self.entry().1
    }

    /// ASCII key the upstream services use in paths and payloads.
    pub fn key(self) -> &'static str {
        self.entry().2
    }

    /// Resolve a display name or upstream key, ignoring case and
    /// surrounding whitespace. Cedilla variants of ș/ț are accepted too.
    pub fn parse(name: &str) -> Result<City, UnknownCity> {
        let wanted = fold_cedillas(name.trim());
        CITY_NAMES
            .iter()
            .find(|(_, display, key)| {
                wanted.eq_ignore_ascii_case(key) || eq_ignore_case(&wanted, display)
            })
            .map(|(city, _, _)| *city)
            .ok_or_else(|| UnknownCity(name.to_string()))
    }
}

fn fold_cedillas(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ş' => 'ș',
            'Ş' => 'Ș',
            'ţ' => 'ț',
            'Ţ' => 'Ț',
            other => other,
        })
        .collect()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Upstream key of `name` when it names a known city, otherwise the trimmed
/// name as given. Regions and service locations need not be cities.
pub fn canonical_location(name: &str) -> String {
    let name = name.trim();
    match City::parse(name) {
        Ok(city) => city.key().to_string(),
        Err(_) => name.to_string(),
    }
}

/// A location reported by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub display_name: String,
    /// Known city, so city forecasts can be requested for it.
    pub forecastable: bool,
}

impl Location {
    pub fn resolve(name: &str) -> Self {
        match City::parse(name) {
            Ok(city) => Self {
                name: city.key().to_string(),
                display_name: city.display_name().to_string(),
                forecastable: true,
            },
            Err(_) => {
                let name = name.trim().to_string();
                Self {
                    display_name: name.clone(),
                    name,
                    forecastable: false,
                }
            }
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::parse(s)
    }
}

impl Serialize for City {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for City {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        City::parse(&s).map_err(serde::de::Error::custom)
    }
}
