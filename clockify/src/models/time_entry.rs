use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::wire_time;

/// A time entry owned by the remote service. `time_interval.end == None`
/// means the entry is in progress; the service allows at most one such
/// entry per user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    pub time_interval: TimeInterval,
}

impl TimeEntry {
    pub fn in_progress(&self) -> bool {
        self.time_interval.end.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(with = "wire_time")]
    pub start: OffsetDateTime,
    #[serde(with = "wire_time::option", default)]
    pub end: Option<OffsetDateTime>,
}

/// Payload for `POST /workspaces/{id}/time-entries`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeEntry {
    #[serde(with = "wire_time")]
    pub start: OffsetDateTime,
    pub description: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Payload for `PATCH .../user/{id}/time-entries`, which ends the
/// in-progress entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeEntry {
    #[serde(with = "wire_time")]
    pub end: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn deserializes_in_progress_entry() {
        let raw = r#"{
            "id": "e1",
            "description": "write report",
            "projectId": "p1",
            "taskId": null,
            "billable": true,
            "timeInterval": {
                "start": "2024-05-01T08:30:00Z",
                "end": null,
                "duration": null
            }
        }"#;

        let entry: TimeEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, "e1");
        assert_eq!(entry.description, "write report");
        assert_eq!(entry.project_id.as_deref(), Some("p1"));
        assert!(entry.task_id.is_none());
        assert!(entry.in_progress());
        assert_eq!(entry.time_interval.start, datetime!(2024-05-01 08:30:00 UTC));
    }

    #[test]
    fn deserializes_completed_entry_without_description() {
        let raw = r#"{
            "id": "e2",
            "timeInterval": {
                "start": "2024-05-01T08:00:00Z",
                "end": "2024-05-01T09:00:00+00:00"
            }
        }"#;

        let entry: TimeEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.description, "");
        assert!(!entry.in_progress());
        assert_eq!(
            entry.time_interval.end,
            Some(datetime!(2024-05-01 09:00:00 UTC))
        );
    }

    #[test]
    fn serializes_new_entry_at_second_precision_utc() {
        let entry = NewTimeEntry {
            start: datetime!(2024-05-01 10:15:30.123456 +02:00),
            description: "standup".to_string(),
            project_id: "p1".to_string(),
            task_id: None,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["start"], "2024-05-01T08:15:30Z");
        assert_eq!(json["description"], "standup");
        assert_eq!(json["projectId"], "p1");
        assert!(json.get("taskId").is_none());
    }

    #[test]
    fn serializes_task_id_when_present() {
        let entry = NewTimeEntry {
            start: datetime!(2024-05-01 08:00:00 UTC),
            description: "review".to_string(),
            project_id: "p1".to_string(),
            task_id: Some("t1".to_string()),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["taskId"], "t1");
    }
}
