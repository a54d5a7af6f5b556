use lambda_http::http::header::{HeaderValue, CONTENT_TYPE, LOCATION, VARY};
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON)
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn json_error(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, &serde_json::json!({ "error": message }))
}

pub fn no_content() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Body::Empty)
        .map_err(Box::new)?)
}

pub fn html_response(status: StatusCode, html: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML)
        .body(html.into())
        .map_err(Box::new)?)
}

/// 303 so the browser follows with a GET after a form POST
pub fn redirect(location: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, location)
        .body(Body::Empty)
        .map_err(Box::new)?)
}

/// Page that shows a blocking `alert()` and then navigates to `location`.
/// Without scripts the message and a link are shown instead.
pub fn alert_and_redirect(message: &str, location: &str) -> Result<Response<Body>, Error> {
    let html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Task board</title></head>\n\
         <body>\n<script>alert({});window.location.replace({});</script>\n\
         <noscript><p>{}</p><a href=\"{}\">Continue</a></noscript>\n</body></html>\n",
        js_string(message),
        js_string(location),
        escape_html(message),
        escape_html(location),
    );
    html_response(StatusCode::OK, html)
}

pub fn method_not_allowed() -> Result<Response<Body>, Error> {
    json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub fn with_cors_headers(mut resp: Response<Body>, allow_origin: &str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(allow_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PATCH,DELETE,OPTIONS"),
    );
    headers.insert("Access-Control-Allow-Headers", HeaderValue::from_static("Content-Type"));
    headers.append(VARY, HeaderValue::from_static("Origin"));
    resp
}

/// Escape text for element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON string literal that is also safe inside a `<script>` element
pub fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_text(resp: &Response<Body>) -> String {
        String::from_utf8(resp.body().to_vec()).unwrap()
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn alert_page_runs_alert_then_navigates() {
        let resp = alert_and_redirect("Saved \"ok\"</script>", "/alltask").unwrap();
        let body = body_text(&resp);

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body.contains(r#"alert("Saved \"ok\"<\/script>")"#));
        assert!(body.contains(r#"window.location.replace("/alltask")"#));
        assert!(!body.contains("ok\"</script>"));
    }

    #[test]
    fn redirect_uses_see_other() {
        let resp = redirect("/alltask").unwrap();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/alltask");
    }

    #[test]
    fn cors_headers_use_configured_origin() {
        let resp = with_cors_headers(no_content().unwrap(), "https://tasks.example.com");

        assert_eq!(
            resp.headers()["Access-Control-Allow-Origin"],
            "https://tasks.example.com"
        );
        assert_eq!(resp.headers()[VARY], "Origin");
    }
}
