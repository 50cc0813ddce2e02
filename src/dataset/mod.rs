pub mod adapter;
pub mod date;
pub mod loader;
pub mod store;

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Named source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKey {
    Reddit,
    Covid2020,
    Covid2021,
    Sentiment140,
    Airline,
    GeoNintendo,
}

impl DatasetKey {
    /// every named dataset, in the order `combined` scans them
    pub const ALL: [DatasetKey; 6] = [
        DatasetKey::Reddit,
        DatasetKey::Covid2020,
        DatasetKey::Covid2021,
        DatasetKey::Sentiment140,
        DatasetKey::Airline,
        DatasetKey::GeoNintendo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKey::Reddit => "reddit",
            DatasetKey::Covid2020 => "covid2020",
            DatasetKey::Covid2021 => "covid2021",
            DatasetKey::Sentiment140 => "sentiment140",
            DatasetKey::Airline => "airline",
            DatasetKey::GeoNintendo => "geonintendo",
        }
    }

    pub fn adapter(&self) -> &'static dyn adapter::DatasetAdapter {
        adapter::adapter_for(*self)
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DatasetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| AnalyticsError::UnknownDataset(s.to_string()))
    }
}

static ALL_KEYS: [DatasetKey; 6] = DatasetKey::ALL;

/// A dataset request: one named dataset or the `combined` union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetSelector {
    Single(DatasetKey),
    Combined,
}

impl DatasetSelector {
    pub const COMBINED: &'static str = "combined";

    pub fn keys(&self) -> &'static [DatasetKey] {
        match self {
            DatasetSelector::Single(key) => {
                // discriminants follow `DatasetKey::ALL`
                let i = *key as usize;
                &ALL_KEYS[i..=i]
            }
            DatasetSelector::Combined => &ALL_KEYS,
        }
    }

    /// Parse an optional dataset parameter, `combined` when absent.
    pub fn parse_or_combined(raw: Option<&str>) -> Result<Self, AnalyticsError> {
        match raw {
            None => Ok(DatasetSelector::Combined),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for DatasetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSelector::Single(key) => key.fmt(f),
            DatasetSelector::Combined => f.write_str(Self::COMBINED),
        }
    }
}

impl FromStr for DatasetSelector {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::COMBINED) {
            return Ok(DatasetSelector::Combined);
        }
        s.parse().map(DatasetSelector::Single)
    }
}

impl From<DatasetKey> for DatasetSelector {
    fn from(key: DatasetKey) -> Self {
        DatasetSelector::Single(key)
    }
}

/// Uniform projection of a post, rebuilt per call and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub dataset: DatasetKey,
    pub text: String,
    pub cleaned_text: String,
    pub score: f64,
    /// reply count where the source has one, 0 otherwise
    #[serde(default)]
    pub comments: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub author: String,
    pub hashtags: Vec<String>,
}

impl Document {
    pub const UNKNOWN_AUTHOR: &'static str = "unknown";

    /// UTC calendar day of the timestamp
    pub fn day(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }

    #[inline]
    pub fn has_text(&self) -> bool {
        !self.cleaned_text.is_empty()
    }
}

/// Ordered documents of one request. Indices are stable for the whole call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Corpus {
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Only documents whose cleaned text is non-empty, order kept.
    pub fn with_text(self) -> Self {
        Self {
            documents: self.documents.into_iter().filter(Document::has_text).collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    pub fn cleaned_texts(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.cleaned_text.as_str())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_case_insensitive() {
        assert_eq!("Reddit".parse::<DatasetKey>().unwrap(), DatasetKey::Reddit);
        assert_eq!(" geonintendo ".parse::<DatasetKey>().unwrap(), DatasetKey::GeoNintendo);
        for key in DatasetKey::ALL {
            assert_eq!(key.as_str().parse::<DatasetKey>().unwrap(), key);
            assert_eq!(key.adapter().key(), key);
        }
    }

    #[test]
    fn unknown_key_is_invalid_input() {
        let err = "myspace".parse::<DatasetSelector>().unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownDataset(ref s) if s == "myspace"));
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn combined_selects_all() {
        let sel: DatasetSelector = "COMBINED".parse().unwrap();
        assert_eq!(sel.keys(), &DatasetKey::ALL);
        assert_eq!(DatasetSelector::parse_or_combined(None).unwrap(), DatasetSelector::Combined);
        let single = DatasetSelector::from(DatasetKey::Airline);
        assert_eq!(single.keys(), &[DatasetKey::Airline]);
        assert_eq!(single.to_string(), "airline");
    }
}
