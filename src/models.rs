use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Stress,
    Happy,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Stress => "stress",
            EventKind::Happy => "happy",
        }
    }
}

// Legacy blobs may omit the kind or carry a value we no longer know;
// both count as stress.
fn kind_or_stress<'de, D>(deserializer: D) -> Result<EventKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("happy") => EventKind::Happy,
        _ => EventKind::Stress,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub date: DateTime<Local>,
    #[serde(rename = "type", default, deserialize_with = "kind_or_stress")]
    pub kind: EventKind,
    pub points: u8, // 1..=3, enforced at the CLI boundary
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Severity/positivity grade behind the 1-3 point scale. The descriptive
/// text is a fixed mapping so every point value always has a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn from_points(points: u8) -> Option<Level> {
        match points {
            1 => Some(Level::Low),
            2 => Some(Level::Medium),
            3 => Some(Level::High),
            _ => None,
        }
    }

    pub fn label(self, kind: EventKind) -> &'static str {
        match (kind, self) {
            (EventKind::Stress, Level::Low) => "Minor (1 pt)",
            (EventKind::Stress, Level::Medium) => "Moderate (2 pts)",
            (EventKind::Stress, Level::High) => "Severe (3 pts)",
            (EventKind::Happy, Level::Low) => "Small win (1 pt)",
            (EventKind::Happy, Level::Medium) => "Comfortable (2 pts)",
            (EventKind::Happy, Level::High) => "Miracle (3 pts)",
        }
    }

    pub fn examples(self, kind: EventKind) -> &'static str {
        match (kind, self) {
            (EventKind::Stress, Level::Low) => {
                "routine nitpicking, pointless meetings, small misunderstandings"
            }
            (EventKind::Stress, Level::Medium) => {
                "unreasonable overtime, unfair treatment, badly assigned work"
            }
            (EventKind::Stress, Level::High) => {
                "workplace bullying, personal attacks, salary disputes"
            }
            (EventKind::Happy, Level::Low) => {
                "free afternoon tea, leaving on time, a colleague helping out"
            }
            (EventKind::Happy, Level::Medium) => {
                "project shipped smoothly, public praise, an unexpected bonus"
            }
            (EventKind::Happy, Level::High) => {
                "promotion and raise, the dreaded manager resigns, a long holiday"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub name: String,
    pub onboarding_date: Option<NaiveDate>,
    pub target_resignation_date: Option<NaiveDate>,
}

/// The persisted aggregate: everything the store loads and saves in one piece.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Journal {
    pub events: Vec<Event>,
    pub settings: Settings,
}

impl Journal {
    /// Newest entries first, matching display order.
    pub fn add_event(&mut self, event: Event) {
        self.events.insert(0, event);
    }

    pub fn remove_event(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() < before
    }

    pub fn find_event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}

pub fn new_event_id() -> String {
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| {
            let c = rng.sample(rand::distributions::Alphanumeric) as char;
            c.to_ascii_lowercase()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event(kind: EventKind, points: u8) -> Event {
        Event {
            id: new_event_id(),
            date: Local.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap(),
            kind,
            points,
            description: "something happened".to_string(),
            tags: vec!["office".to_string()],
        }
    }

    #[test]
    fn event_without_type_field_defaults_to_stress() {
        let json = r#"{
            "id": "abc1234",
            "date": "2024-11-05T09:30:00+08:00",
            "points": 2,
            "description": "pre-upgrade entry",
            "tags": []
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Stress);
    }

    #[test]
    fn event_with_unknown_type_defaults_to_stress() {
        let json = r#"{
            "id": "abc1234",
            "date": "2024-11-05T09:30:00+08:00",
            "type": "melancholy",
            "points": 1,
            "description": "odd entry"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Stress);
    }

    #[test]
    fn event_kind_round_trips_through_type_field() {
        let event = sample_event(EventKind::Happy, 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "happy");
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn settings_use_legacy_camel_case_keys() {
        let json = r#"{
            "name": "Alex",
            "onboardingDate": "2023-04-01",
            "targetResignationDate": "2025-06-30"
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.name, "Alex");
        assert_eq!(settings.onboarding_date, NaiveDate::from_ymd_opt(2023, 4, 1));
        assert_eq!(
            settings.target_resignation_date,
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
    }

    #[test]
    fn every_point_value_has_a_descriptor() {
        for points in 1..=3 {
            let level = Level::from_points(points).unwrap();
            for kind in [EventKind::Stress, EventKind::Happy] {
                assert!(!level.label(kind).is_empty());
                assert!(!level.examples(kind).is_empty());
            }
        }
        assert_eq!(Level::from_points(0), None);
        assert_eq!(Level::from_points(4), None);
    }

    #[test]
    fn journal_inserts_newest_first_and_removes_by_id() {
        let mut journal = Journal::default();
        let first = sample_event(EventKind::Stress, 1);
        let second = sample_event(EventKind::Happy, 2);
        let second_id = second.id.clone();

        journal.add_event(first);
        journal.add_event(second);
        assert_eq!(journal.events[0].id, second_id);

        assert!(journal.remove_event(&second_id));
        assert!(!journal.remove_event(&second_id));
        assert_eq!(journal.events.len(), 1);
        assert!(journal.find_event(&second_id).is_none());
    }
}
