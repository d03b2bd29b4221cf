//! Reads assignment deadlines out of an ICS feed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::Assignment;

/// Downloads the feed and returns its assignments due after `start`.
pub async fn fetch_assignments(
    client: &Client,
    url: &str,
    start: DateTime<Utc>,
) -> Result<Vec<Assignment>, AppError> {
    info!("Fetching calendar feed");
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if status != StatusCode::OK {
        return Err(AppError::Remote {
            status: status.as_u16(),
            body,
        });
    }
    parse_assignments(&body, start)
}

/// Parses ICS text into assignments ending strictly after `start`, sorted by due.
pub fn parse_assignments(ics: &str, start: DateTime<Utc>) -> Result<Vec<Assignment>, AppError> {
    let unfolded = unfold(ics);
    let calendar = read_calendar(&unfolded)
        .map_err(|e| AppError::Parse(format!("Invalid calendar feed: {}", e)))?;

    let mut events = Vec::new();
    for component in &calendar.components {
        collect_events(component, &mut events);
    }

    let mut assignments: Vec<Assignment> = events
        .into_iter()
        .filter_map(to_assignment)
        .filter(|a| a.due > start)
        .collect();
    assignments.sort_by_key(|a| a.due);
    Ok(assignments)
}

fn collect_events<'a>(component: &'a Component<'a>, events: &mut Vec<&'a Component<'a>>) {
    if component.name == "VEVENT" {
        events.push(component);
    }
    for child in &component.components {
        collect_events(child, events);
    }
}

fn to_assignment(event: &Component<'_>) -> Option<Assignment> {
    let title = match event.find_prop("SUMMARY") {
        Some(summary) => unescape_text(summary.val.as_ref()),
        None => {
            warn!("Skipping calendar event without a title");
            return None;
        }
    };

    let due = match event.find_prop("DTEND") {
        Some(end) => DatePerhapsTime::try_from(end).ok().and_then(to_timestamp),
        None => end_from_start(event, &title),
    };

    match due {
        Some(due) => Some(Assignment::new(title, due)),
        None => {
            warn!("Skipping calendar event without a usable time: {}", title);
            None
        }
    }
}

/// End of an event without DTEND: DTSTART plus DURATION, or the whole day
/// for a date-only start.
fn end_from_start(event: &Component<'_>, title: &str) -> Option<DateTime<FixedOffset>> {
    let start = DatePerhapsTime::try_from(event.find_prop("DTSTART")?).ok()?;
    let all_day = matches!(start, DatePerhapsTime::Date(_));
    let begin = to_timestamp(start)?;

    match event.find_prop("DURATION") {
        Some(prop) => match parse_duration(prop.val.as_ref()) {
            Some(duration) => Some(begin + duration),
            None => {
                warn!("Unreadable DURATION on {}, using its start time", title);
                Some(begin)
            }
        },
        None if all_day => Some(begin + TimeDelta::days(1)),
        None => Some(begin),
    }
}

fn parse_duration(raw: &str) -> Option<TimeDelta> {
    let duration = iso8601::duration(raw.trim().trim_start_matches('+')).ok()?;
    let std_duration: std::time::Duration = duration.into();
    TimeDelta::from_std(std_duration).ok()
}

fn to_timestamp(value: DatePerhapsTime) -> Option<DateTime<FixedOffset>> {
    match value {
        DatePerhapsTime::Date(date) => Some(midnight_utc(date)),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some(dt.fixed_offset()),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            Some(naive.and_utc().fixed_offset())
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            zoned(date_time, &tzid)
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset()
}

fn zoned(naive: NaiveDateTime, tzid: &str) -> Option<DateTime<FixedOffset>> {
    let tz: Tz = match tzid.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("Unknown TZID {}, treating time as UTC", tzid);
            return Some(naive.and_utc().fixed_offset());
        }
    };
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

/// Undoes RFC 5545 TEXT escaping (`\,` `\;` `\n` `\\`).
fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
