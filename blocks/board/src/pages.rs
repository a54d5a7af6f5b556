use chrono::{DateTime, Utc};
use taskboard_atoms::tasks::Task;
use taskboard_shared::responses::{escape_html, js_string};

use crate::submit::TaskSubmission;

pub const LIST_PATH: &str = "/alltask";
pub const ADD_PATH: &str = "/addtask";

const APP_NAME: &str = "Manage Task App";
const EMPTY_LIST_MESSAGE: &str = "No tasks saved yet";

pub fn edit_path(task_id: &str) -> String {
    format!("/updatetask/{}", urlencoding::encode(task_id))
}

pub fn delete_path(task_id: &str) -> String {
    format!("{}/{}/delete", LIST_PATH, urlencoding::encode(task_id))
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn footer() -> &'static str {
    "<footer class=\"footer\">\n\
     <span>Task board</span>\n\
     <span>Copyright &copy; 2025</span>\n\
     </footer>\n"
}

fn layout(title: &str, content: &str, alert: Option<&str>) -> String {
    let alert_script = alert
        .map(|message| format!("<script>alert({});</script>\n", js_string(message)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n<main>\n\
         <h1>{app}</h1>\n{content}</main>\n{footer}{alert_script}</body>\n</html>\n",
        title = escape_html(title),
        app = APP_NAME,
        content = content,
        footer = footer(),
        alert_script = alert_script,
    )
}

/// Landing page
pub fn landing() -> String {
    let content = format!(
        "<p>Keep track of the work you have to do.</p>\n\
         <a class=\"button\" href=\"{}\">Open the app</a>\n",
        LIST_PATH
    );
    layout(APP_NAME, &content, None)
}

fn task_row(task: &Task) -> String {
    let image = match &task.image_url {
        Some(url) => format!(
            "<img src=\"{}\" alt=\"{}\" width=\"50\" height=\"50\">",
            escape_html(url),
            escape_html(&task.title)
        ),
        None => "-".to_string(),
    };
    let status = if task.is_completed { "&#10004; Done" } else { "&#10005; Not done" };

    format!(
        "<tr>\n<td>{image}</td>\n<td>{title}</td>\n<td>{detail}</td>\n<td>{status}</td>\n\
         <td>{created}</td>\n<td>{updated}</td>\n<td>\n\
         <a href=\"{edit}\">Edit</a>\n\
         <form method=\"post\" action=\"{delete}\" onsubmit=\"return confirm('Delete this task?');\">\
         <button type=\"submit\">Delete</button></form>\n</td>\n</tr>\n",
        image = image,
        title = escape_html(&task.title),
        detail = escape_html(&task.detail),
        status = status,
        created = format_timestamp(task.create_at),
        updated = format_timestamp(task.update_at),
        edit = edit_path(&task.id),
        delete = delete_path(&task.id),
    )
}

/// Task table. `alert` is shown over the page once it loads.
pub fn task_list(tasks: &[Task], alert: Option<&str>) -> String {
    let rows = if tasks.is_empty() {
        format!(
            "<tr class=\"empty\"><td colspan=\"7\">{}</td></tr>\n",
            EMPTY_LIST_MESSAGE
        )
    } else {
        tasks.iter().map(task_row).collect::<String>()
    };

    let content = format!(
        "<p><a class=\"button\" href=\"{add}\">Add task</a></p>\n\
         <table>\n<thead>\n<tr><th>Image</th><th>Task</th><th>Detail</th><th>Status</th>\
         <th>Created</th><th>Updated</th><th>Action</th></tr>\n</thead>\n\
         <tbody>\n{rows}</tbody>\n</table>\n",
        add = ADD_PATH,
        rows = rows,
    );
    layout("All tasks", &content, alert)
}

struct FormValues<'a> {
    heading: &'a str,
    action: String,
    title: &'a str,
    detail: &'a str,
    is_completed: bool,
    /// `None` leaves the preview out entirely
    preview: Option<Option<&'a str>>,
    submit_label: &'a str,
    alert: Option<&'a str>,
}

fn task_form(values: FormValues<'_>) -> String {
    let preview = match values.preview {
        Some(Some(url)) => format!(
            "<img src=\"{}\" alt=\"preview\" width=\"150\" height=\"150\">\n",
            escape_html(url)
        ),
        Some(None) => "<div class=\"no-image\">No image</div>\n".to_string(),
        None => String::new(),
    };
    let (not_done, done) = if values.is_completed {
        ("", " selected")
    } else {
        (" selected", "")
    };

    let content = format!(
        "<section class=\"card\">\n<h2>{heading}</h2>\n\
         <form method=\"post\" action=\"{action}\" enctype=\"multipart/form-data\" \
         onsubmit=\"this.querySelector('button[type=submit]').disabled = true;\">\n\
         <label for=\"title\">Title</label>\n\
         <input id=\"title\" name=\"title\" type=\"text\" value=\"{title}\" required>\n\
         <label for=\"detail\">Detail</label>\n\
         <textarea id=\"detail\" name=\"detail\" rows=\"5\" required>{detail}</textarea>\n\
         <label for=\"image\">Image (leave empty to keep the current one)</label>\n\
         <input id=\"image\" name=\"image\" type=\"file\" accept=\"image/*\">\n\
         {preview}\
         <label for=\"is_completed\">Status</label>\n\
         <select id=\"is_completed\" name=\"is_completed\">\
         <option value=\"0\"{not_done}>Not done</option>\
         <option value=\"1\"{done}>Done</option></select>\n\
         <button type=\"submit\">{submit}</button>\n\
         </form>\n<a href=\"{list}\">Back to all tasks</a>\n</section>\n",
        heading = values.heading,
        action = values.action,
        title = escape_html(values.title),
        detail = escape_html(values.detail),
        preview = preview,
        not_done = not_done,
        done = done,
        submit = values.submit_label,
        list = LIST_PATH,
    );
    layout(values.heading, &content, values.alert)
}

/// Edit form prefilled from the stored task
pub fn update_form(task: &Task) -> String {
    task_form(FormValues {
        heading: "Update task",
        action: edit_path(&task.id),
        title: &task.title,
        detail: &task.detail,
        is_completed: task.is_completed,
        preview: Some(task.image_url.as_deref()),
        submit_label: "Save changes",
        alert: None,
    })
}

/// Edit form refilled with a rejected submission so nothing typed is lost.
/// The stored image is not looked up, so no preview is shown.
pub fn update_form_retry(task_id: &str, submitted: &TaskSubmission, alert: &str) -> String {
    task_form(FormValues {
        heading: "Update task",
        action: edit_path(task_id),
        title: &submitted.title,
        detail: &submitted.detail,
        is_completed: submitted.is_completed,
        preview: None,
        submit_label: "Save changes",
        alert: Some(alert),
    })
}

pub fn add_form() -> String {
    task_form(FormValues {
        heading: "Add task",
        action: ADD_PATH.to_string(),
        title: "",
        detail: "",
        is_completed: false,
        preview: Some(None),
        submit_label: "Save task",
        alert: None,
    })
}

/// Add form refilled with a rejected submission
pub fn add_form_retry(submitted: &TaskSubmission, alert: &str) -> String {
    task_form(FormValues {
        heading: "Add task",
        action: ADD_PATH.to_string(),
        title: &submitted.title,
        detail: &submitted.detail,
        is_completed: submitted.is_completed,
        preview: Some(None),
        submit_label: "Save task",
        alert: Some(alert),
    })
}

/// 404 page for unknown browser routes
pub fn not_found() -> String {
    let content = format!(
        "<p>Page not found.</p>\n<a href=\"{}\">Back to all tasks</a>\n",
        LIST_PATH
    );
    layout("Not found", &content, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            detail: "some detail".to_string(),
            image_url: None,
            is_completed: false,
            create_at: Some(Utc.with_ymd_and_hms(2025, 4, 2, 9, 30, 0).unwrap()),
            update_at: None,
        }
    }

    #[test]
    fn empty_list_renders_empty_state_row() {
        let html = task_list(&[], None);

        assert!(html.contains("<tr class=\"empty\"><td colspan=\"7\">No tasks saved yet</td></tr>"));
        assert!(!html.contains("<script>alert("));
    }

    #[test]
    fn rows_show_fields_and_actions() {
        let mut done = task("t-2", "Pay rent");
        done.is_completed = true;
        done.image_url = Some("https://cdn.example.com/1_rent.png".to_string());

        let html = task_list(&[task("t-1", "Buy <milk>"), done], None);

        assert!(html.contains("Buy &lt;milk&gt;"));
        assert!(html.contains("2025-04-02 09:30:00 UTC"));
        assert!(html.contains("&#10005; Not done"));
        assert!(html.contains("&#10004; Done"));
        assert!(html.contains("<img src=\"https://cdn.example.com/1_rent.png\" alt=\"Pay rent\""));
        assert!(html.contains("href=\"/updatetask/t-1\""));
        assert!(html.contains("action=\"/alltask/t-2/delete\""));
        assert!(html.contains("confirm('Delete this task?')"));
        assert!(!html.contains("No tasks saved yet"));
    }

    #[test]
    fn list_alert_is_rendered_as_script() {
        let html = task_list(&[], Some("Could not load tasks"));

        assert!(html.contains("<script>alert(\"Could not load tasks\");</script>"));
    }

    #[test]
    fn update_form_is_prefilled() {
        let mut t = task("t-9", "Water \"plants\"");
        t.is_completed = true;

        let html = update_form(&t);

        assert!(html.contains("action=\"/updatetask/t-9\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("value=\"Water &quot;plants&quot;\""));
        assert!(html.contains(">some detail</textarea>"));
        assert!(html.contains("<option value=\"1\" selected>Done</option>"));
        assert!(html.contains("No image"));
    }

    #[test]
    fn retry_form_keeps_submitted_values_and_alerts() {
        let submitted = TaskSubmission {
            title: "Half typed".to_string(),
            detail: "   ".to_string(),
            is_completed: true,
            image: crate::submit::ImageChange::Keep,
        };

        let html = update_form_retry("t-3", &submitted, "Please fill in both the title and the detail");

        assert!(html.contains("action=\"/updatetask/t-3\""));
        assert!(html.contains("value=\"Half typed\""));
        assert!(html.contains("<option value=\"1\" selected>Done</option>"));
        assert!(html.contains("<script>alert(\"Please fill in both the title and the detail\");</script>"));
        assert!(!html.contains("No image"));
        assert!(!html.contains("window.location.replace"));
    }

    #[test]
    fn paths_encode_ids() {
        assert_eq!(edit_path("a b"), "/updatetask/a%20b");
        assert_eq!(delete_path("a/b"), "/alltask/a%2Fb/delete");
    }
}
