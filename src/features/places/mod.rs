//! # Places Feature
//!
//! Area → restaurant table behind `where get food` and the weekly reminder's
//! suggestion.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Area filter samples only that area, unknown areas rejected up front
//! - 1.0.0: Uniform choice over every (area, place) pair

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::core::AreaConfig;

/// Built-in place table
const DEFAULT_PLACES: &[(&str, &[&str])] = &[
    (
        "Downtown",
        &[
            "Las Velas",
            "DiBella's",
            "The Yard",
            "The Simple Greek",
            "Sienna Mercato",
            "Primanti's",
        ],
    ),
    ("North Shore", &["Burgatory"]),
    (
        "Oakland",
        &[
            "Chipotle",
            "Fuel and Fuddle",
            "Primanti's",
            "CHiKN",
            "Stack'd",
            "Oishii",
            "Pie Express",
            "Mad Mex",
            "Pad Thai Noodle",
        ],
    ),
    (
        "Shadyside/East Liberty/Squirrel Hill",
        &["Mad Mex", "Noodlehead", "Choolah", "Uncle Sam's"],
    ),
    (
        "The Strip",
        &[
            "Gaucho",
            "Smallman Galley",
            "Roland's",
            "Kaya",
            "Bella Notte",
            "Pennsylvania Market",
            "Pho Van",
            "Cinderlands",
        ],
    ),
    ("Southside", &["Hofbrauhaus"]),
    ("Station Square", &["Hard Rock Cafe"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub name: String,
    pub places: Vec<String>,
}

/// One (area, place) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub area: String,
    pub place: String,
}

impl Suggestion {
    /// Reply to `where get food`
    pub fn reply(&self) -> String {
        format!("You could go to {} in {}", self.place, self.area)
    }

    /// Line appended to the weekly reminder
    pub fn reminder_line(&self) -> String {
        format!("You could go to {} in {}.", self.place, self.area)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceError {
    /// No area by that name
    UnknownArea(String),
    /// The area exists but lists nothing
    NoPlaces(String),
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceError::UnknownArea(area) => write!(f, "{area} isn't a place"),
            PlaceError::NoPlaces(area) => write!(f, "There's nowhere to eat in {area}"),
        }
    }
}

impl std::error::Error for PlaceError {}

#[derive(Debug, Clone)]
pub struct Places {
    areas: Vec<Area>,
}

impl Places {
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }

    /// Use the configured table if there is one, else the built-in table
    pub fn from_config(areas: Option<&[AreaConfig]>) -> Self {
        match areas {
            Some(areas) => Self::new(
                areas
                    .iter()
                    .map(|a| Area {
                        name: a.name.clone(),
                        places: a.places.clone(),
                    })
                    .collect(),
            ),
            None => Self::default(),
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    fn find_area(&self, name: &str) -> Option<&Area> {
        let wanted = name.trim().to_lowercase();
        self.areas.iter().find(|a| a.name.to_lowercase() == wanted)
    }

    /// Uniform choice over every (area, place) pair
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Suggestion> {
        let pairs: Vec<(&Area, &String)> = self
            .areas
            .iter()
            .flat_map(|area| area.places.iter().map(move |place| (area, place)))
            .collect();

        pairs.choose(rng).map(|(area, place)| Suggestion {
            area: area.name.clone(),
            place: (*place).clone(),
        })
    }

    /// Uniform choice within one area (case-insensitive name)
    pub fn choose_in<R: Rng + ?Sized>(
        &self,
        area: &str,
        rng: &mut R,
    ) -> Result<Suggestion, PlaceError> {
        let found = self
            .find_area(area)
            .ok_or_else(|| PlaceError::UnknownArea(area.trim().to_string()))?;

        found
            .places
            .choose(rng)
            .map(|place| Suggestion {
                area: found.name.clone(),
                place: place.clone(),
            })
            .ok_or_else(|| PlaceError::NoPlaces(found.name.clone()))
    }
}

impl Default for Places {
    fn default() -> Self {
        Self::new(
            DEFAULT_PLACES
                .iter()
                .map(|(name, places)| Area {
                    name: name.to_string(),
                    places: places.iter().map(|p| p.to_string()).collect(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_default_table() {
        let places = Places::default();
        assert_eq!(places.areas().len(), 7);
        assert!(places
            .areas()
            .iter()
            .all(|a| !a.places.is_empty()));
    }

    #[test]
    fn test_choose_returns_listed_pair() {
        let places = Places::default();
        let mut rng = rng();

        for _ in 0..50 {
            let s = places.choose(&mut rng).unwrap();
            let area = places.find_area(&s.area).unwrap();
            assert!(area.places.contains(&s.place));
        }
    }

    #[test]
    fn test_choose_covers_multiple_areas() {
        let places = Places::default();
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..500 {
            seen.insert(places.choose(&mut rng).unwrap().area);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_choose_empty_table() {
        let places = Places::new(vec![]);
        assert!(places.choose(&mut rng()).is_none());
    }

    #[test]
    fn test_choose_in_is_case_insensitive() {
        let places = Places::default();
        let mut rng = rng();

        for _ in 0..20 {
            let s = places.choose_in("the strip", &mut rng).unwrap();
            assert_eq!(s.area, "The Strip");
        }
    }

    #[test]
    fn test_choose_in_unknown_area() {
        let places = Places::default();
        let err = places.choose_in("narnia", &mut rng()).unwrap_err();

        assert_eq!(err, PlaceError::UnknownArea("narnia".to_string()));
        assert_eq!(err.to_string(), "narnia isn't a place");
    }

    #[test]
    fn test_choose_in_blank_name_is_unknown() {
        let err = Places::default().choose_in("", &mut rng()).unwrap_err();
        assert_eq!(err.to_string(), " isn't a place");
    }

    #[test]
    fn test_choose_in_empty_area() {
        let places = Places::new(vec![Area {
            name: "Nowhere".to_string(),
            places: vec![],
        }]);

        assert_eq!(
            places.choose_in("nowhere", &mut rng()).unwrap_err(),
            PlaceError::NoPlaces("Nowhere".to_string())
        );
    }

    #[test]
    fn test_from_config_overrides_default() {
        let areas = vec![AreaConfig {
            name: "Mostly Harmless".to_string(),
            places: vec!["Milliways".to_string()],
        }];
        let places = Places::from_config(Some(&areas));

        let s = places.choose(&mut rng()).unwrap();
        assert_eq!(s.reply(), "You could go to Milliways in Mostly Harmless");
        assert_eq!(
            s.reminder_line(),
            "You could go to Milliways in Mostly Harmless."
        );
    }
}
