//! HTML Views
//!
//! Server-rendered pages. Every user-supplied string goes through
//! [`escape`] before it is written into markup.

use std::fmt::Write;

use axum::response::Html;

use crate::application::accounts::Profile;
use crate::application::session_manager::Identity;
use crate::error::FieldErrors;
use crate::presentation::dto::RegisterValues;
use crate::presentation::flash::Flash;

/// Escape text for use in element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&Flash>, identity: Option<&Identity>, body: &str) -> Html<String> {
    let nav = match identity {
        Some(identity) => format!(
            r#"<a href="/users/{0}">{0}</a> <a href="/logout">Logout</a>"#,
            escape(identity.as_str())
        ),
        None => r#"<a href="/register">Register</a> <a href="/login">Login</a>"#.to_string(),
    };

    let flash = flash
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                f.category.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Feedback</title>
</head>
<body>
<nav><a href="/">Feedback</a> {nav}</nav>
<main>
{flash}
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn field(out: &mut String, name: &str, label: &str, kind: &str, value: &str, errors: &FieldErrors) {
    let _ = write!(
        out,
        r#"<p><label for="{name}">{label}</label> <input type="{kind}" id="{name}" name="{name}" value="{value}">"#,
        value = escape(value),
    );
    if let Some(message) = errors.get(name) {
        let _ = write!(out, r#" <span class="error">{}</span>"#, escape(message));
    }
    out.push_str("</p>\n");
}

fn textarea(out: &mut String, name: &str, label: &str, value: &str, errors: &FieldErrors) {
    let _ = write!(
        out,
        r#"<p><label for="{name}">{label}</label> <textarea id="{name}" name="{name}">{value}</textarea>"#,
        value = escape(value),
    );
    if let Some(message) = errors.get(name) {
        let _ = write!(out, r#" <span class="error">{}</span>"#, escape(message));
    }
    out.push_str("</p>\n");
}

pub fn register_page(flash: Option<&Flash>, values: &RegisterValues, errors: &FieldErrors) -> Html<String> {
    let mut body = String::from("<h1>Register</h1>\n<form method=\"POST\" action=\"/register\">\n");
    field(&mut body, "username", "Username", "text", &values.username, errors);
    // Passwords are never echoed back
    field(&mut body, "password", "Password", "password", "", errors);
    field(&mut body, "email", "Email", "email", &values.email, errors);
    field(&mut body, "first_name", "First Name", "text", &values.first_name, errors);
    field(&mut body, "last_name", "Last Name", "text", &values.last_name, errors);
    body.push_str("<button type=\"submit\">Register</button>\n</form>");

    layout("Register", flash, None, &body)
}

pub fn login_page(flash: Option<&Flash>, user_name: &str, errors: &FieldErrors) -> Html<String> {
    let mut body = String::from("<h1>Login</h1>\n<form method=\"POST\" action=\"/login\">\n");
    field(&mut body, "username", "Username", "text", user_name, errors);
    field(&mut body, "password", "Password", "password", "", errors);
    body.push_str("<button type=\"submit\">Login</button>\n</form>");

    layout("Login", flash, None, &body)
}

pub fn user_page(flash: Option<&Flash>, identity: &Identity, profile: &Profile) -> Html<String> {
    let user = &profile.user;
    let is_self = identity.user_name() == &user.user_name;
    let name = escape(user.user_name.as_str());

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{name}</h1>\n<ul>\n<li>Email: {}</li>\n<li>First Name: {}</li>\n<li>Last Name: {}</li>\n</ul>\n",
        escape(user.email.as_str()),
        escape(user.first_name.as_str()),
        escape(user.last_name.as_str()),
    );

    body.push_str("<h2>Feedback</h2>\n");
    if profile.feedback.is_empty() {
        body.push_str("<p>No feedback yet.</p>\n");
    }
    for feedback in &profile.feedback {
        let _ = write!(
            body,
            "<article>\n<h3>{}</h3>\n<p>{}</p>\n",
            escape(feedback.title.as_str()),
            escape(feedback.content.as_str()),
        );
        if feedback.is_owned_by(identity.user_name()) {
            let _ = write!(
                body,
                r#"<a href="/feedback/{id}/update">Edit</a>
<form method="POST" action="/feedback/{id}/delete"><button type="submit">Delete</button></form>
"#,
                id = feedback.feedback_id,
            );
        }
        body.push_str("</article>\n");
    }

    if is_self {
        let _ = write!(
            body,
            r#"<p><a href="/users/{name}/feedback/add">Add Feedback</a></p>
<form method="POST" action="/users/{name}/delete"><button type="submit">Delete User</button></form>
"#
        );
    }

    layout(user.user_name.as_str(), flash, Some(identity), &body)
}

/// Add and edit forms share one layout
pub struct FeedbackFormView<'a> {
    pub heading: &'a str,
    pub action: &'a str,
    pub submit_label: &'a str,
    pub title: &'a str,
    pub content: &'a str,
}

pub fn feedback_form_page(
    flash: Option<&Flash>,
    identity: &Identity,
    view: &FeedbackFormView<'_>,
    errors: &FieldErrors,
) -> Html<String> {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{}</h1>\n<form method=\"POST\" action=\"{}\">\n",
        escape(view.heading),
        escape(view.action),
    );
    field(&mut body, "title", "Title", "text", view.title, errors);
    textarea(&mut body, "content", "Content", view.content, errors);
    let _ = write!(
        body,
        "<button type=\"submit\">{}</button>\n</form>",
        escape(view.submit_label)
    );

    layout(view.heading, flash, Some(identity), &body)
}

pub fn message_page(heading: &str, message: &str) -> Html<String> {
    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape(heading), escape(message));
    layout(heading, None, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_field_errors_are_rendered() {
        let mut errors = FieldErrors::new();
        errors.push("username", "This field is required.");
        let Html(html) = login_page(None, "<b>", &errors);

        assert!(html.contains("This field is required."));
        assert!(html.contains("value=\"&lt;b&gt;\""));
    }

    #[test]
    fn test_flash_is_rendered_escaped() {
        let Html(html) = message_page("Not Found", "x");
        assert!(!html.contains("alert-"));

        let flash = Flash::error("<i>nope</i>");
        let Html(html) = register_page(Some(&flash), &RegisterValues::default(), &FieldErrors::new());
        assert!(html.contains(r#"class="alert alert-error""#));
        assert!(html.contains("&lt;i&gt;nope&lt;/i&gt;"));
    }
}
