//! Interactive question page rendered on the server

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use crate::config::UiConfig;
use crate::server::state::AppState;
use crate::types::{PageQuery, QueryResponse};

/// GET / - Question form; with `?q=` also the answer and its sources
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> (StatusCode, Html<String>) {
    let ui = &state.config().ui;

    let Some(question) = query.question() else {
        return (StatusCode::OK, Html(render_page(ui, "", None)));
    };

    tracing::info!("Page query: \"{}\"", question);
    match state.chain().ask(question).await {
        Ok(response) => (
            StatusCode::OK,
            Html(render_page(ui, question, Some(Ok(&response)))),
        ),
        Err(e) => {
            tracing::error!("Query failed: {}", e);
            let message = e.to_string();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(ui, question, Some(Err(message.as_str())))),
            )
        }
    }
}

fn render_page(
    ui: &UiConfig,
    question: &str,
    result: Option<std::result::Result<&QueryResponse, &str>>,
) -> String {
    let mut body = String::new();

    match result {
        Some(Ok(response)) => {
            body.push_str(&format!(
                "<p>Response Time : {}s</p>\n<p>Answer : {}</p>\n",
                response.response_time_secs,
                escape_html(&response.answer)
            ));
            body.push_str("<details>\n<summary>Source(s)</summary>\n");
            for source in &response.sources {
                body.push_str(&format!("<p>{}</p>\n", escape_html(source)));
            }
            body.push_str("</details>\n");
        }
        Some(Err(message)) => {
            body.push_str(&format!(
                "<p class=\"error\">Error : {}</p>\n",
                escape_html(message)
            ));
        }
        None => {}
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
input[type=text] {{ width: 100%; padding: 0.5rem; font-size: 1rem; }}
p {{ white-space: pre-wrap; }}
.error {{ color: #b00020; }}
</style>
</head>
<body>
<h1>{title}</h1>
<h3>{subtitle}</h3>
<form method="get" action="/">
<input type="text" name="q" placeholder="Type your question here" value="{question}" autofocus>
</form>
{body}</body>
</html>
"#,
        title = escape_html(&ui.title),
        subtitle = escape_html(&ui.subtitle),
        question = escape_html(question),
        body = body,
    )
}

/// Escape text for use in HTML content and attribute values
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
