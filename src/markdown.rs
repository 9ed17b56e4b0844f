use pulldown_cmark::{html, Event, Options, Parser};

/// Render markdown to HTML for the preview pane.
///
/// GitHub-flavored extensions are enabled and soft line breaks are promoted
/// to hard breaks, so a plain pasted line ends up on its own line. Raw HTML
/// in the source is demoted to text before serialization; the typed-in
/// `<script>` case renders as visible text instead of markup.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(content, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_blocks() {
        let html = render_markdown("# Title\n\nsome *emphasis*");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn soft_breaks_become_hard_breaks() {
        let html = render_markdown("first line\nsecond line");
        assert!(html.contains("<br"));
    }

    #[test]
    fn gfm_extensions_are_enabled() {
        let html = render_markdown("~~gone~~\n\n- [x] done");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checked"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markdown("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn raw_html_blocks_are_escaped() {
        let html = render_markdown("<div onclick=\"x()\">boom</div>");
        assert!(!html.contains("<div"));
        assert!(html.contains("&lt;div"));
    }
}
