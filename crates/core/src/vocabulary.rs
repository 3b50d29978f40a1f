//! Static lookup tables consulted by the entity extractor.
//!
//! A [`Vocabulary`] is built once (either the built-in tables or a JSON file)
//! and then shared read-only. Table order matters: the city scan reports the
//! first listed city found, and travel class keywords are applied in order
//! with later hits overwriting earlier ones.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;
use crate::intent::normalize_utterance;
use crate::models::{LocationCode, TravelClass};

static BUILTIN: Lazy<Arc<Vocabulary>> = Lazy::new(|| Arc::new(builtin_tables()));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    pub code: LocationCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassKeyword {
    pub keyword: String,
    pub class: TravelClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeDatePhrase {
    pub phrase: String,
    pub offset_days: u32,
}

#[derive(Debug, Deserialize)]
struct RawVocabulary {
    cities: Vec<CityEntry>,
    #[serde(default)]
    travel_classes: Option<Vec<ClassKeyword>>,
    #[serde(default)]
    relative_dates: Option<Vec<RelativeDatePhrase>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVocabulary")]
pub struct Vocabulary {
    cities: Vec<CityEntry>,
    travel_classes: Vec<ClassKeyword>,
    relative_dates: Vec<RelativeDatePhrase>,
    #[serde(skip)]
    max_city_words: usize,
}

impl Vocabulary {
    /// Process-wide default tables.
    pub fn builtin() -> Arc<Vocabulary> {
        BUILTIN.clone()
    }

    /// Validates and normalises the tables. City names and keywords are
    /// lowercased and whitespace-collapsed; codes must be three ASCII letters.
    pub fn new(
        cities: Vec<CityEntry>,
        travel_classes: Vec<ClassKeyword>,
        relative_dates: Vec<RelativeDatePhrase>,
    ) -> Result<Self, VocabularyError> {
        let mut seen = HashSet::new();
        let mut normalized_cities = Vec::with_capacity(cities.len());

        for entry in cities {
            let name = normalize_utterance(&entry.name);
            if name.is_empty() {
                return Err(VocabularyError::EmptyCityName);
            }

            let code = entry.code.as_str();
            if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                return Err(VocabularyError::InvalidLocationCode {
                    city: name,
                    code: code.to_string(),
                });
            }

            if !seen.insert(name.clone()) {
                return Err(VocabularyError::DuplicateCity(name));
            }

            normalized_cities.push(CityEntry {
                name,
                code: LocationCode::new(code),
            });
        }

        let mut normalized_classes = Vec::with_capacity(travel_classes.len());
        for entry in travel_classes {
            let keyword = normalize_utterance(&entry.keyword);
            if keyword.is_empty() {
                return Err(VocabularyError::EmptyClassKeyword);
            }
            normalized_classes.push(ClassKeyword {
                keyword,
                class: entry.class,
            });
        }

        let mut normalized_dates = Vec::with_capacity(relative_dates.len());
        for entry in relative_dates {
            let phrase = normalize_utterance(&entry.phrase);
            if phrase.is_empty() {
                return Err(VocabularyError::EmptyDatePhrase);
            }
            normalized_dates.push(RelativeDatePhrase {
                phrase,
                offset_days: entry.offset_days,
            });
        }

        Ok(Self::from_parts(
            normalized_cities,
            normalized_classes,
            normalized_dates,
        ))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, VocabularyError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn cities(&self) -> &[CityEntry] {
        &self.cities
    }

    pub fn travel_classes(&self) -> &[ClassKeyword] {
        &self.travel_classes
    }

    pub fn relative_dates(&self) -> &[RelativeDatePhrase] {
        &self.relative_dates
    }

    /// Longest city name in words, bounding how far phrase resolution looks.
    pub fn max_city_words(&self) -> usize {
        self.max_city_words
    }

    pub fn lookup_city(&self, name: &str) -> Option<&LocationCode> {
        let needle = normalize_utterance(name);
        self.cities
            .iter()
            .find(|entry| entry.name == needle)
            .map(|entry| &entry.code)
    }

    fn from_parts(
        cities: Vec<CityEntry>,
        travel_classes: Vec<ClassKeyword>,
        relative_dates: Vec<RelativeDatePhrase>,
    ) -> Self {
        let max_city_words = cities
            .iter()
            .map(|entry| entry.name.split_whitespace().count())
            .max()
            .unwrap_or(0);

        Self {
            cities,
            travel_classes,
            relative_dates,
            max_city_words,
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        BUILTIN.as_ref().clone()
    }
}

impl TryFrom<RawVocabulary> for Vocabulary {
    type Error = VocabularyError;

    fn try_from(raw: RawVocabulary) -> Result<Self, Self::Error> {
        let defaults = builtin_tables();
        Self::new(
            raw.cities,
            raw.travel_classes.unwrap_or(defaults.travel_classes),
            raw.relative_dates.unwrap_or(defaults.relative_dates),
        )
    }
}

fn builtin_tables() -> Vocabulary {
    let cities = [
        ("delhi", "DEL"),
        ("mumbai", "BOM"),
        ("bangalore", "BLR"),
        ("chennai", "MAA"),
        ("kolkata", "CCU"),
        ("goa", "GOA"),
        ("dubai", "DXB"),
        ("singapore", "SIN"),
        ("london", "LHR"),
        ("bangkok", "BKK"),
        ("new york", "JFK"),
        ("paris", "CDG"),
        ("tokyo", "NRT"),
    ]
    .into_iter()
    .map(|(name, code)| CityEntry {
        name: name.to_string(),
        code: LocationCode::new(code),
    })
    .collect();

    let travel_classes = [
        ("business", TravelClass::Business),
        ("first", TravelClass::First),
        ("economy", TravelClass::Economy),
    ]
    .into_iter()
    .map(|(keyword, class)| ClassKeyword {
        keyword: keyword.to_string(),
        class,
    })
    .collect();

    let relative_dates = [("today", 0), ("tomorrow", 1), ("next week", 7)]
        .into_iter()
        .map(|(phrase, offset_days)| RelativeDatePhrase {
            phrase: phrase.to_string(),
            offset_days,
        })
        .collect();

    Vocabulary::from_parts(cities, travel_classes, relative_dates)
}
