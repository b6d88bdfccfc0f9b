use super::{DateGroup, LoadedImage};
use chrono::{DateTime, Local, LocalResult, Locale, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// Calendar date of a timestamp in the server's local zone. Buckets follow
/// the local day, not UTC truncation: 23:50 and 00:10 belong to different
/// groups only when the local calendar says so.
pub fn local_date_key(created_time: &DateTime<Utc>) -> NaiveDate {
    created_time.with_timezone(&Local).date_naive()
}

/// Long-form label for a date key (weekday, day, month, year) in the
/// configured locale.
pub fn display_label(date_key: NaiveDate, locale: Locale) -> String {
    date_key
        .format_localized("%A %e %B %Y", locale)
        .to_string()
}

/// Partitions images into calendar-day groups: groups ordered newest date
/// first, images within a group ordered newest capture first. Every input
/// image lands in exactly one group.
pub fn group_by_date(images: &[LoadedImage], locale: Locale) -> Vec<DateGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<LoadedImage>> = BTreeMap::new();

    for image in images {
        buckets
            .entry(local_date_key(&image.created_time))
            .or_default()
            .push(image.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|(date_key, mut bucket)| {
            bucket.sort_by(|a, b| b.created_time.cmp(&a.created_time));
            DateGroup {
                date_key,
                display_label: display_label(date_key, locale),
                images: bucket,
            }
        })
        .collect()
}

/// Parses a provider timestamp. RFC 3339 first; zone-less date-times and
/// bare dates are interpreted as local wall time.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap())
        })?;

    Ok(match naive.and_local_timezone(Local) {
        LocalResult::Single(datetime) => datetime.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Wall times skipped by a DST jump don't exist locally; keep them.
        LocalResult::None => naive.and_utc(),
    })
}
