//! Renders model output into the html pages returned to the caller.
//!
//! Pages are [tera] templates compiled once into an internal repository. Autoescaping is off:
//! model output and error messages are inserted as is.
use anyhow::{Context as _, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lazy_static::lazy_static;
use tera::{Context, Tera};

mod stream;

pub use stream::{ResponseStream, StreamOptions, render_stream};

const TEMPLATES: &[(&str, &str)] = &[
    ("head.html", include_str!("templates/head.html")),
    ("footer.html", include_str!("templates/footer.html")),
    ("text.html", include_str!("templates/text.html")),
    ("stream_header.html", include_str!("templates/stream_header.html")),
    ("stream_footer.html", include_str!("templates/stream_footer.html")),
    ("image.html", include_str!("templates/image.html")),
    ("error.html", include_str!("templates/error.html")),
    ("invalid_task.html", include_str!("templates/invalid_task.html")),
];

const CONTENT_TITLE: &str = "AI Generated Content";
const IMAGE_TITLE: &str = "AI Generated Image";
const ERROR_TITLE: &str = "Error";

lazy_static! {
    /// Tera repository for the pages
    static ref PAGE_REPOSITORY: Result<Tera, tera::Error> = {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(TEMPLATES.iter().copied()).map(|()| tera)
    };
}

fn render_page(name: &str, context: &Context) -> Result<String> {
    let tera = PAGE_REPOSITORY
        .as_ref()
        .map_err(|e| anyhow!("Failed to compile page templates: {e}"))?;

    tera.render(name, context)
        .with_context(|| format!("Failed to render template '{name}'"))
}

fn titled(title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context
}

/// Wraps text in the response page, turning newlines into line breaks
///
/// # Errors
///
/// Errors if the page template fails to render
pub fn render_html(text: &str) -> Result<String> {
    let mut context = titled(CONTENT_TITLE);
    context.insert("content", &text.replace('\n', "<br>"));

    render_page("text.html", &context)
}

/// Renders a page embedding a generated png image together with its prompt
///
/// # Errors
///
/// Errors if the page template fails to render
pub fn render_image_html(prompt: &str, image: &[u8]) -> Result<String> {
    let mut context = titled(IMAGE_TITLE);
    context.insert("prompt", prompt);
    context.insert("image_base64", &STANDARD.encode(image));

    render_page("image.html", &context)
}

/// Renders the page for a failed request
///
/// # Errors
///
/// Errors if the page template fails to render
pub fn render_error_html(message: &str, request_id: &str) -> Result<String> {
    let mut context = titled(ERROR_TITLE);
    context.insert("message", message);
    context.insert("request_id", request_id);

    render_page("error.html", &context)
}

/// Renders the page for a request with an unknown task
///
/// # Errors
///
/// Errors if the page template fails to render
pub fn render_invalid_task_html() -> Result<String> {
    render_page("invalid_task.html", &titled(ERROR_TITLE))
}

pub(crate) fn render_stream_header() -> Result<String> {
    render_page("stream_header.html", &titled(CONTENT_TITLE))
}

pub(crate) fn render_stream_footer() -> Result<String> {
    render_page("stream_footer.html", &Context::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_line_breaks() {
        let html = render_html("a\nb").unwrap();

        assert!(html.contains("a<br>b"));
        assert!(!html.contains("a\nb"));
        assert!(html.contains("<title>AI Generated Content</title>"));
    }

    #[test]
    fn test_text_is_inserted_unescaped() {
        let html = render_html("<b>bold</b> & more").unwrap();
        assert!(html.contains("<b>bold</b> & more"));
    }

    #[test]
    fn test_image_page_embeds_data_uri() {
        let html = render_image_html("a red fox", b"hello").unwrap();

        assert!(html.contains(r#"Prompt: "a red fox""#));
        assert!(html.contains("data:image/png;base64,aGVsbG8="));
    }

    #[test]
    fn test_error_page() {
        let html = render_error_html("Unsupported text model: nope", "req-1").unwrap();

        assert!(html.contains("Unsupported text model: nope"));
        assert!(html.contains("Request ID: req-1"));
        assert!(html.contains(r#"<h1 class="error">Error</h1>"#));
    }

    #[test]
    fn test_invalid_task_page() {
        let html = render_invalid_task_html().unwrap();
        assert!(html.contains("Invalid task type. Supported types are 'text' and 'image'."));
    }

    #[test]
    fn test_stream_header_and_footer_form_a_page() {
        let page = format!(
            "{}hello {}",
            render_stream_header().unwrap(),
            render_stream_footer().unwrap()
        );

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"<div class="content">"#));
        assert!(page.ends_with("</body>\n</html>\n"));
    }
}
