use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Timelike};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    analytics::sentiment::compound_score,
    dataset::Document,
    error::{AnalyticsError, Result},
    utils::{math::vector::mean, sort::top_n_by_count},
};

/// Lower bounds of the score histogram; the last bin is open ended.
pub const ENGAGEMENT_BINS: [f64; 8] = [0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0, 500.0];
pub const ENGAGEMENT_LABELS: [&str; 8] = ["0", "1-4", "5-9", "10-19", "20-49", "50-99", "100-499", "500+"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagCount {
    pub hashtag: String,
    pub count: u64,
}

/// Most used hashtags per UTC day, days ascending.
///
/// Tags are compared lowercased. Documents without a timestamp are skipped.
pub fn trending_hashtags(documents: &[Document], per_day: usize) -> BTreeMap<NaiveDate, Vec<HashtagCount>> {
    let mut days: BTreeMap<NaiveDate, IndexMap<String, u64>> = BTreeMap::new();
    for doc in documents {
        let Some(day) = doc.day() else {
            continue;
        };
        let counts = days.entry(day).or_default();
        for tag in &doc.hashtags {
            *counts.entry(tag.to_lowercase()).or_insert(0) += 1;
        }
    }
    days.into_iter()
        .filter(|(_, counts)| !counts.is_empty())
        .map(|(day, counts)| {
            let top = top_n_by_count(counts, per_day)
                .into_iter()
                .map(|(hashtag, count)| HashtagCount { hashtag, count })
                .collect();
            (day, top)
        })
        .collect()
}

/// Post counts per engagement bin, every label present.
///
/// Negative scores land in the first bin.
pub fn engagement_distribution(documents: &[Document]) -> IndexMap<&'static str, u64> {
    let mut histogram: IndexMap<&'static str, u64> = ENGAGEMENT_LABELS.iter().map(|l| (*l, 0)).collect();
    for doc in documents {
        let bin = ENGAGEMENT_BINS.iter().rposition(|&lower| doc.score >= lower).unwrap_or(0);
        if let Some((_, count)) = histogram.get_index_mut(bin) {
            *count += 1;
        }
    }
    histogram
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserActivity {
    pub author: String,
    pub post_count: usize,
    pub avg_score: f64,
}

/// Most active authors, `unknown` excluded. Equal counts keep first-seen order.
pub fn user_activity(documents: &[Document], top_n: usize) -> Vec<UserActivity> {
    let mut per_author: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for doc in documents.iter().filter(|d| d.author != Document::UNKNOWN_AUTHOR) {
        per_author.entry(doc.author.as_str()).or_default().push(doc.score);
    }
    let mut activity: Vec<UserActivity> = per_author
        .into_iter()
        .map(|(author, scores)| UserActivity {
            author: author.to_string(),
            post_count: scores.len(),
            avg_score: mean(&scores),
        })
        .collect();
    activity.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    activity.truncate(top_n);
    activity
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HourlyEngagement {
    pub avg_score: f64,
    pub avg_comments: f64,
}

/// Mean score and comment count per UTC hour, keyed `"00"` to `"23"`.
///
/// Every hour is present; hours without posts report zeros. Undated
/// documents are skipped.
pub fn engagement_by_hour(documents: &[Document]) -> IndexMap<String, HourlyEngagement> {
    let mut totals = [(0.0_f64, 0.0_f64, 0_u64); 24];
    for doc in documents {
        if let Some(ts) = doc.timestamp {
            let slot = &mut totals[ts.hour() as usize];
            slot.0 += doc.score;
            slot.1 += doc.comments;
            slot.2 += 1;
        }
    }
    totals
        .iter()
        .enumerate()
        .map(|(hour, &(score, comments, posts))| {
            let avg = |total: f64| if posts == 0 { 0.0 } else { total / posts as f64 };
            (format!("{hour:02}"), HourlyEngagement { avg_score: avg(score), avg_comments: avg(comments) })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: u64,
}

/// Post counts per UTC hour, hours without posts left out.
pub fn hourly_post_counts(documents: &[Document]) -> Vec<HourCount> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for ts in documents.iter().filter_map(|d| d.timestamp) {
        *counts.entry(ts.hour()).or_insert(0) += 1;
    }
    counts.into_iter().map(|(hour, count)| HourCount { hour, count }).collect()
}

/// Mean sentiment per `YYYY-WW` bucket, `WW` being whole weeks elapsed
/// since 1 January of that year (`00` to `52`).
pub fn weekly_sentiment(documents: &[Document]) -> BTreeMap<String, f64> {
    let mut weeks: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for doc in documents.iter().filter(|d| d.has_text()) {
        let Some(day) = doc.day() else {
            continue;
        };
        let key = format!("{}-{:02}", day.year(), day.ordinal0() / 7);
        weeks.entry(key).or_default().push(compound_score(&doc.cleaned_text));
    }
    weeks.into_iter().map(|(week, scores)| (week, mean(&scores))).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyScore {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendForecast {
    pub history: Vec<DailyScore>,
    pub forecast: Vec<DailyScore>,
}

/// Naive persistence forecast.
///
/// History holds the mean score per observed day. The last day's mean is
/// repeated for each of the `days` days following `as_of`.
pub fn trend_forecast(documents: &[Document], as_of: NaiveDate, days: u32) -> Result<TrendForecast> {
    let mut per_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for doc in documents {
        if let Some(day) = doc.day() {
            per_day.entry(day).or_default().push(doc.score);
        }
    }
    let history: Vec<DailyScore> = per_day
        .into_iter()
        .map(|(date, scores)| DailyScore { date, value: mean(&scores) })
        .collect();
    let Some(last) = history.last().map(|d| d.value) else {
        return Err(AnalyticsError::NoData("no dated documents to forecast from".into()));
    };
    let forecast = (1..=u64::from(days))
        .map(|offset| {
            as_of
                .checked_add_days(Days::new(offset))
                .map(|date| DailyScore { date, value: last })
                .ok_or_else(|| AnalyticsError::invalid("as_of", "forecast runs past the supported date range"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(TrendForecast { history, forecast })
}
