use comrak::{markdown_to_html, Options};

/// Renders GitHub-flavoured Markdown: tables, strikethrough, task lists,
/// autolinks, footnotes and `:emoji:` shortcodes. Raw HTML blocks and inline
/// tags are omitted from the output, since the result is served as is.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.description_lists = true;
    options.extension.superscript = true;
    options.extension.shortcodes = true;
    markdown_to_html(markdown, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tables() {
        let html = render_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn renders_emoji_shortcodes() {
        let html = render_html("Ship it :rocket:");
        assert!(html.contains('🚀'));
    }

    #[test]
    fn omits_raw_html() {
        let html = render_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn markdown_images_render_but_html_images_do_not() {
        let html = render_html(
            "<p align=\"center\"><img src=\"https://cdn/banner.png\"></p>\n\n![logo](https://cdn/logo.png)\n",
        );
        assert!(!html.contains("banner.png"));
        assert!(html.contains("<img src=\"https://cdn/logo.png\" alt=\"logo\" />"));
    }
}
