use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Task domain model - a single to-do record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub detail: String,

    /// Fully-qualified URL into the image bucket, if an image was attached
    pub image_url: Option<String>,

    pub is_completed: bool,

    pub create_at: Option<DateTime<Utc>>,
    pub update_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the user when creating a task
#[derive(Debug, Deserialize, Clone)]
pub struct NewTask {
    pub title: String,
    pub detail: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Full replacement of the user-editable fields. The store stamps `update_at`.
#[derive(Debug, Clone)]
pub struct TaskPatch {
    pub title: String,
    pub detail: String,
    pub image_url: Option<String>,
    pub is_completed: bool,
}

/// Newest first by `create_at`; tasks without a creation time go last.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.create_at, b.create_at) {
        (Some(a_at), Some(b_at)) => b_at.cmp(&a_at),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}

/// Empty URLs are stored as null.
pub fn normalize_image_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, create_at: Option<DateTime<Utc>>) -> Task {
        Task {
            id: id.to_string(),
            title: "t".to_string(),
            detail: "d".to_string(),
            image_url: None,
            is_completed: false,
            create_at,
            update_at: None,
        }
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let older = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut tasks = vec![task("a", None), task("b", Some(older)), task("c", Some(newer))];

        sort_newest_first(&mut tasks);

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn blank_image_url_becomes_none() {
        assert_eq!(normalize_image_url(Some("  ".to_string())), None);
        assert_eq!(normalize_image_url(None), None);
        assert_eq!(
            normalize_image_url(Some(" https://x/y.png ".to_string())),
            Some("https://x/y.png".to_string())
        );
    }
}
