use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How often a group's reminder recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    Never,
    Daily,
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::Never => write!(f, "never"),
            Repeat::Daily => write!(f, "daily"),
        }
    }
}

impl FromStr for Repeat {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(Repeat::Never),
            "daily" => Ok(Repeat::Daily),
            other => Err(GroupError::UnknownRepeat(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("Unknown repeat '{0}', expected 'never' or 'daily'")]
    UnknownRepeat(String),
    #[error("Group {0} never repeats but has a next date")]
    UnexpectedNextDate(i64),
    #[error("Group {0} repeats daily but has no upcoming date")]
    MissingNextDate(i64),
}

/// A recurring reminder group as it crosses the host boundary.
///
/// `next_date` travels as epoch milliseconds under `nextDate`. Incoming
/// payloads may also use `next_date` or an RFC 3339 string, which is what a
/// JS `Date` becomes in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    pub description: String,
    pub enabled: bool,
    pub id: i64,
    pub repeat: Repeat,
    #[serde(
        rename = "nextDate",
        alias = "next_date",
        default,
        serialize_with = "serialize_next_date",
        deserialize_with = "deserialize_next_date"
    )]
    pub next_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
}

impl Group {
    pub fn new(title: String) -> Self {
        Self {
            title,
            description: String::new(),
            enabled: true,
            id: 0, // assigned by the host
            repeat: Repeat::Never,
            next_date: None,
            cron: None,
        }
    }

    /// Whether this group should currently have an upcoming occurrence
    pub fn expects_next_date(&self) -> bool {
        self.enabled && self.repeat == Repeat::Daily
    }

    /// Check the next-occurrence invariant against `now`
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), GroupError> {
        match self.repeat {
            Repeat::Never if self.next_date.is_some() => {
                Err(GroupError::UnexpectedNextDate(self.id))
            }
            Repeat::Daily if self.enabled => match self.next_date {
                Some(next) if next > now => Ok(()),
                _ => Err(GroupError::MissingNextDate(self.id)),
            },
            _ => Ok(()),
        }
    }

    /// Bring `next_date` in line with `repeat` and `enabled`.
    ///
    /// A daily group keeps its time of day: a stale date is moved forward by
    /// whole days until it lies after `now`. With nothing stored, the next
    /// occurrence is one day from `now`.
    pub fn refresh_next_date(&mut self, now: DateTime<Utc>) {
        if !self.expects_next_date() {
            self.next_date = None;
            return;
        }
        let next = match self.next_date {
            Some(next) if next > now => next,
            Some(stale) => {
                let behind = now.signed_duration_since(stale).num_days() + 1;
                let mut next = stale + Duration::days(behind);
                while next <= now {
                    next += Duration::days(1);
                }
                next
            }
            None => now + Duration::days(1),
        };
        self.next_date = Some(next);
    }
}

fn serialize_next_date<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(instant) => serializer.serialize_some(&instant.timestamp_millis()),
        None => serializer.serialize_none(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireInstant {
    Millis(i64),
    Float(f64),
    Text(String),
}

fn deserialize_next_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    use serde::de::Error;

    let wire: Option<WireInstant> = Option::deserialize(deserializer)?;
    let instant = match wire {
        None => return Ok(None),
        Some(WireInstant::Millis(ms)) => Utc.timestamp_millis_opt(ms).single(),
        Some(WireInstant::Float(ms)) => Utc.timestamp_millis_opt(ms.trunc() as i64).single(),
        Some(WireInstant::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
    };
    instant
        .map(Some)
        .ok_or_else(|| D::Error::custom("nextDate is not a valid timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn daily(next_date: Option<DateTime<Utc>>) -> Group {
        Group {
            title: "Water plants".to_string(),
            description: "The ones on the balcony".to_string(),
            enabled: true,
            id: 7,
            repeat: Repeat::Daily,
            next_date,
            cron: None,
        }
    }

    #[test]
    fn serializes_next_date_as_millis() {
        let group = daily(Some(at(2024, 1, 2, 9, 0)));
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Water plants",
                "description": "The ones on the balcony",
                "enabled": true,
                "id": 7,
                "repeat": "daily",
                "nextDate": 1704186000000i64,
            })
        );
    }

    #[test]
    fn accepts_both_wire_shapes() {
        let from_number: Group = serde_json::from_value(json!({
            "title": "a", "description": "", "enabled": true, "id": 1,
            "repeat": "daily", "next_date": 1704186000000i64,
        }))
        .unwrap();
        let from_date: Group = serde_json::from_value(json!({
            "title": "a", "description": "", "enabled": true, "id": 1,
            "repeat": "daily", "nextDate": "2024-01-02T09:00:00.000Z",
        }))
        .unwrap();
        assert_eq!(from_number.next_date, Some(at(2024, 1, 2, 9, 0)));
        assert_eq!(from_date.next_date, from_number.next_date);
    }

    #[test]
    fn missing_or_null_next_date_is_none() {
        let group: Group = serde_json::from_value(json!({
            "title": "a", "description": "", "enabled": false, "id": 1,
            "repeat": "never", "nextDate": null,
        }))
        .unwrap();
        assert_eq!(group.next_date, None);

        let group: Group = serde_json::from_value(json!({
            "title": "a", "description": "", "enabled": false, "id": 1, "repeat": "never",
        }))
        .unwrap();
        assert_eq!(group.next_date, None);
    }

    #[test]
    fn rejects_unknown_repeat() {
        let result: Result<Group, _> = serde_json::from_value(json!({
            "title": "a", "description": "", "enabled": true, "id": 1,
            "repeat": "weekly", "nextDate": null,
        }));
        assert!(result.is_err());
        assert_eq!(
            "weekly".parse::<Repeat>(),
            Err(GroupError::UnknownRepeat("weekly".to_string()))
        );
    }

    #[test]
    fn validate_enforces_next_date_invariant() {
        let now = at(2024, 1, 2, 12, 0);
        assert_eq!(daily(Some(at(2024, 1, 3, 9, 0))).validate(now), Ok(()));
        assert_eq!(daily(None).validate(now), Err(GroupError::MissingNextDate(7)));
        assert_eq!(
            daily(Some(at(2024, 1, 1, 9, 0))).validate(now),
            Err(GroupError::MissingNextDate(7))
        );

        let mut never = daily(Some(at(2024, 1, 3, 9, 0)));
        never.repeat = Repeat::Never;
        assert_eq!(never.validate(now), Err(GroupError::UnexpectedNextDate(7)));

        let mut disabled = daily(None);
        disabled.enabled = false;
        assert_eq!(disabled.validate(now), Ok(()));
    }

    #[test]
    fn refresh_rolls_stale_dates_forward() {
        let now = at(2024, 1, 10, 12, 0);
        let mut group = daily(Some(at(2024, 1, 2, 9, 0)));
        group.refresh_next_date(now);
        assert_eq!(group.next_date, Some(at(2024, 1, 11, 9, 0)));
        assert_eq!(group.validate(now), Ok(()));

        let mut later_today = daily(Some(at(2024, 1, 5, 18, 30)));
        later_today.refresh_next_date(now);
        assert_eq!(later_today.next_date, Some(at(2024, 1, 10, 18, 30)));
    }

    #[test]
    fn refresh_clears_dates_that_should_not_exist() {
        let now = at(2024, 1, 10, 12, 0);
        let mut group = daily(Some(at(2024, 1, 11, 9, 0)));
        group.enabled = false;
        group.refresh_next_date(now);
        assert_eq!(group.next_date, None);

        let mut fresh = daily(None);
        fresh.refresh_next_date(now);
        assert_eq!(fresh.next_date, Some(at(2024, 1, 11, 12, 0)));
    }
}
