use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{
    dataset::{date::parse_timestamp, Document, DatasetKey},
    utils::normalizer::normalize,
};

/// One record as handed over by the document store.
pub type RawRecord = Map<String, Value>;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("hashtag regex"));

/// `#tag` occurrences of a text, lowercased, without the `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Value at a dotted path, e.g. `user.screen_name`.
pub fn field<'a>(record: &'a RawRecord, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// String form of an identifier or name field. Numbers are rendered as-is.
pub fn field_string(record: &RawRecord, path: &str) -> Option<String> {
    match field(record, path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("$oid")
            .or_else(|| map.get("$numberLong"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Numeric field, 0 when absent or not numeric.
pub fn field_f64(record: &RawRecord, path: &str) -> f64 {
    match field(record, path) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Field mapping of one dataset onto the uniform [`Document`] projection.
pub trait DatasetAdapter: Send + Sync {
    fn key(&self) -> DatasetKey;

    fn id(&self, record: &RawRecord) -> Option<String>;

    fn text<'a>(&self, record: &'a RawRecord) -> Option<&'a str>;

    /// engagement proxy
    fn score(&self, record: &RawRecord) -> f64;

    fn comments(&self, _record: &RawRecord) -> f64 {
        0.0
    }

    fn date(&self, record: &RawRecord) -> Option<DateTime<Utc>>;

    fn author(&self, record: &RawRecord) -> Option<String>;

    fn hashtags(&self, record: &RawRecord) -> Vec<String> {
        self.text(record).map(extract_hashtags).unwrap_or_default()
    }

    /// Uniform projection of a raw record.
    ///
    /// Falls back to the store's `_id` when the dataset id is missing and
    /// gives up only when neither exists.
    fn to_document(&self, record: &RawRecord) -> Option<Document> {
        let id = self.id(record).or_else(|| field_string(record, "_id"))?;
        let text = self.text(record).unwrap_or_default().to_string();
        let cleaned_text = normalize(Some(&text));
        Some(Document {
            id,
            dataset: self.key(),
            hashtags: self.hashtags(record),
            cleaned_text,
            text,
            score: self.score(record),
            comments: self.comments(record),
            timestamp: self.date(record),
            author: self.author(record).unwrap_or_else(|| Document::UNKNOWN_AUTHOR.to_string()),
        })
    }
}

#[inline]
fn text_field<'a>(record: &'a RawRecord, path: &str) -> Option<&'a str> {
    field(record, path).and_then(Value::as_str)
}

#[inline]
fn date_field(record: &RawRecord, path: &str) -> Option<DateTime<Utc>> {
    field(record, path).and_then(parse_timestamp)
}

/// Reddit submissions
#[derive(Debug, Clone, Copy)]
pub struct RedditAdapter;

impl DatasetAdapter for RedditAdapter {
    fn key(&self) -> DatasetKey {
        DatasetKey::Reddit
    }

    fn id(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "id")
    }

    fn text<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        text_field(record, "selftext")
    }

    fn score(&self, record: &RawRecord) -> f64 {
        field_f64(record, "score")
    }

    fn comments(&self, record: &RawRecord) -> f64 {
        field_f64(record, "num_comments")
    }

    fn date(&self, record: &RawRecord) -> Option<DateTime<Utc>> {
        date_field(record, "created_utc")
    }

    fn author(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "author")
    }
}

/// Both COVID-19 tweet dumps share one layout.
#[derive(Debug, Clone, Copy)]
pub struct CovidTweetsAdapter {
    key: DatasetKey,
}

impl DatasetAdapter for CovidTweetsAdapter {
    fn key(&self) -> DatasetKey {
        self.key
    }

    fn id(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "id")
    }

    fn text<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        text_field(record, "original_text")
    }

    fn score(&self, record: &RawRecord) -> f64 {
        field_f64(record, "favorite_count") + field_f64(record, "retweet_count")
    }

    fn date(&self, record: &RawRecord) -> Option<DateTime<Utc>> {
        date_field(record, "created_at")
    }

    fn author(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "original_author")
    }

    /// the dumps carry a pre-extracted hashtag array
    fn hashtags(&self, record: &RawRecord) -> Vec<String> {
        match field(record, "hashtags") {
            Some(Value::Array(tags)) => tags
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect(),
            _ => self.text(record).map(extract_hashtags).unwrap_or_default(),
        }
    }
}

/// Sentiment140 tweets, no engagement figures
#[derive(Debug, Clone, Copy)]
pub struct Sentiment140Adapter;

impl DatasetAdapter for Sentiment140Adapter {
    fn key(&self) -> DatasetKey {
        DatasetKey::Sentiment140
    }

    fn id(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "ids")
    }

    fn text<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        text_field(record, "text")
    }

    fn score(&self, _record: &RawRecord) -> f64 {
        0.0
    }

    fn date(&self, record: &RawRecord) -> Option<DateTime<Utc>> {
        date_field(record, "date")
    }

    fn author(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "user")
    }
}

/// US airline sentiment tweets
#[derive(Debug, Clone, Copy)]
pub struct AirlineAdapter;

impl DatasetAdapter for AirlineAdapter {
    fn key(&self) -> DatasetKey {
        DatasetKey::Airline
    }

    fn id(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "tweet_id")
    }

    fn text<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        text_field(record, "text")
    }

    fn score(&self, record: &RawRecord) -> f64 {
        field_f64(record, "retweet_count")
    }

    fn date(&self, record: &RawRecord) -> Option<DateTime<Utc>> {
        date_field(record, "date")
    }

    fn author(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "name")
    }
}

/// Geotagged Nintendo tweets
#[derive(Debug, Clone, Copy)]
pub struct GeoNintendoAdapter;

impl DatasetAdapter for GeoNintendoAdapter {
    fn key(&self) -> DatasetKey {
        DatasetKey::GeoNintendo
    }

    fn id(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "id")
    }

    fn text<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        text_field(record, "text")
    }

    fn score(&self, record: &RawRecord) -> f64 {
        field_f64(record, "favorite_count") + field_f64(record, "retweet_count")
    }

    fn date(&self, record: &RawRecord) -> Option<DateTime<Utc>> {
        date_field(record, "created_at")
    }

    fn author(&self, record: &RawRecord) -> Option<String> {
        field_string(record, "user.screen_name").or_else(|| field_string(record, "user"))
    }
}

static REDDIT: RedditAdapter = RedditAdapter;
static COVID_2020: CovidTweetsAdapter = CovidTweetsAdapter { key: DatasetKey::Covid2020 };
static COVID_2021: CovidTweetsAdapter = CovidTweetsAdapter { key: DatasetKey::Covid2021 };
static SENTIMENT_140: Sentiment140Adapter = Sentiment140Adapter;
static AIRLINE: AirlineAdapter = AirlineAdapter;
static GEO_NINTENDO: GeoNintendoAdapter = GeoNintendoAdapter;

/// Registry lookup, one static adapter per dataset.
pub fn adapter_for(key: DatasetKey) -> &'static dyn DatasetAdapter {
    match key {
        DatasetKey::Reddit => &REDDIT,
        DatasetKey::Covid2020 => &COVID_2020,
        DatasetKey::Covid2021 => &COVID_2021,
        DatasetKey::Sentiment140 => &SENTIMENT_140,
        DatasetKey::Airline => &AIRLINE,
        DatasetKey::GeoNintendo => &GEO_NINTENDO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn reddit_mapping() {
        let rec = record(json!({
            "id": "abc", "selftext": "Hello #World!", "score": 12,
            "created_utc": 1_600_000_000, "author": "bob"
        }));
        let doc = adapter_for(DatasetKey::Reddit).to_document(&rec).unwrap();
        assert_eq!(doc.id, "abc");
        assert_eq!(doc.cleaned_text, "hello world");
        assert_eq!(doc.score, 12.0);
        assert_eq!(doc.author, "bob");
        assert_eq!(doc.hashtags, vec!["world"]);
        assert!(doc.timestamp.is_some());
    }

    #[test]
    fn covid_score_sums_engagement() {
        let rec = record(json!({
            "id": 99, "original_text": "stay home", "favorite_count": 3, "retweet_count": "4",
            "hashtags": ["StayHome", "COVID"], "created_at": "Wed Mar 25 12:30:00 +0000 2020"
        }));
        let doc = adapter_for(DatasetKey::Covid2021).to_document(&rec).unwrap();
        assert_eq!(doc.id, "99");
        assert_eq!(doc.score, 7.0);
        assert_eq!(doc.hashtags, vec!["stayhome", "covid"]);
        assert_eq!(doc.author, Document::UNKNOWN_AUTHOR);
        assert_eq!(doc.dataset, DatasetKey::Covid2021);
    }

    #[test]
    fn per_dataset_ids_and_authors() {
        let s140 = record(json!({"ids": 1467810369_u64, "text": "meh", "user": "_TheSpecialOne_"}));
        let doc = adapter_for(DatasetKey::Sentiment140).to_document(&s140).unwrap();
        assert_eq!((doc.id.as_str(), doc.score, doc.author.as_str()), ("1467810369", 0.0, "_TheSpecialOne_"));

        let airline = record(json!({"tweet_id": "570306133677760513", "text": "@united thanks", "retweet_count": 2, "name": "cairdin"}));
        let doc = adapter_for(DatasetKey::Airline).to_document(&airline).unwrap();
        assert_eq!((doc.id.as_str(), doc.score, doc.author.as_str()), ("570306133677760513", 2.0, "cairdin"));

        let geo = record(json!({"id": 7, "text": "mario", "favorite_count": 1, "retweet_count": 1, "user": {"screen_name": "luigi"}}));
        let doc = adapter_for(DatasetKey::GeoNintendo).to_document(&geo).unwrap();
        assert_eq!((doc.score, doc.author.as_str()), (2.0, "luigi"));
    }

    #[test]
    fn missing_text_and_id_fallback() {
        let rec = record(json!({"_id": {"$oid": "65f0"}, "score": 1}));
        let doc = adapter_for(DatasetKey::Reddit).to_document(&rec).unwrap();
        assert_eq!(doc.id, "65f0");
        assert_eq!(doc.text, "");
        assert_eq!(doc.cleaned_text, "");

        let orphan = record(json!({"selftext": "no id at all"}));
        assert!(adapter_for(DatasetKey::Reddit).to_document(&orphan).is_none());
    }

    #[test]
    fn hashtags_from_text() {
        assert_eq!(extract_hashtags("#One two #THREE_3 #"), vec!["one", "three_3"]);
        assert!(extract_hashtags("none here").is_empty());
    }
}
