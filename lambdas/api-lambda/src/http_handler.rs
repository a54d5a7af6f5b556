use board_block::{api, creating, editing, listing, pages};
use lambda_http::http::header::CONTENT_TYPE;
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use std::sync::Arc;
use taskboard_shared::responses::{html_response, json_error, method_not_allowed, with_cors_headers};
use taskboard_shared::AppState;

fn finalize_api_response(
    resp: Result<Response<Body>, Error>,
    state: &AppState,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, &state.config.cors_allow_origin))
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Main Lambda handler - routes browser pages and the JSON API
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let content_type = event.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    tracing::info!("Task board invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if *method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, &state.config.cors_allow_origin));
    }

    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect();
    let parts: Vec<&str> = segments.iter().map(String::as_str).collect();

    let tasks = state.tasks.as_ref();
    let images = state.images.as_ref();

    // JSON API
    if parts.first() == Some(&"api") {
        let resp = match (method, parts.as_slice()) {
            // GET /api/tasks - list all tasks
            (&Method::GET, ["api", "tasks"]) => api::list_tasks(tasks).await,
            // POST /api/tasks - create task
            (&Method::POST, ["api", "tasks"]) => api::create_task(tasks, images, body).await,
            // GET /api/tasks/{id} - get task
            (&Method::GET, ["api", "tasks", task_id]) => api::get_task(tasks, task_id).await,
            // PATCH /api/tasks/{id} - update task
            (&Method::PATCH, ["api", "tasks", task_id]) => {
                api::update_task(tasks, images, task_id, body).await
            }
            // DELETE /api/tasks/{id} - delete task
            (&Method::DELETE, ["api", "tasks", task_id]) => api::delete_task(tasks, task_id).await,
            (_, ["api", "tasks"]) | (_, ["api", "tasks", _]) => method_not_allowed(),
            _ => json_error(StatusCode::NOT_FOUND, "Not found"),
        };

        return finalize_api_response(resp, &state);
    }

    // Browser pages
    match (method, parts.as_slice()) {
        (&Method::GET, []) => html_response(StatusCode::OK, pages::landing()),
        (&Method::GET, ["alltask"]) => listing::list_page(tasks).await,
        (&Method::POST, ["alltask", task_id, "delete"]) => listing::delete_task(tasks, task_id).await,
        (&Method::GET, ["addtask"]) => creating::add_page(),
        (&Method::POST, ["addtask"]) => {
            creating::add_submit(tasks, images, content_type, body).await
        }
        (&Method::GET, ["updatetask", task_id]) => editing::update_page(tasks, task_id).await,
        (&Method::POST, ["updatetask", task_id]) => {
            editing::update_submit(tasks, images, task_id, content_type, body).await
        }
        (_, [] | ["alltask"] | ["alltask", _, "delete"] | ["addtask"] | ["updatetask", _]) => {
            method_not_allowed()
        }
        _ => {
            tracing::warn!("No route matched - Method: {} Path: {}", method, path);
            html_response(StatusCode::NOT_FOUND, pages::not_found())
        }
    }
}
