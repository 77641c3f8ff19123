// src/formatting/rich_text/annotations.rs
//! Annotation processing for rich text.

use super::types::TextStyle;
use crate::types::Annotations;

/// Converts model annotations to text style.
pub fn annotations_to_style(annotations: &Annotations) -> TextStyle {
    TextStyle {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
        color: annotations.color,
        link: None, // Links are handled separately
    }
}

/// Renderer for text styles to HTML.
pub struct HtmlStyleRenderer;

impl HtmlStyleRenderer {
    /// Wraps `content` in one tag per style, innermost first:
    /// code, s, strong, em, u, then a colour span and finally the link.
    pub fn apply_styles(content: &str, style: &TextStyle, escape_content: bool) -> String {
        let mut result = if escape_content {
            html_escape(content)
        } else {
            content.to_string()
        };

        if style.code {
            result = format!("<code>{}</code>", result);
        }

        if style.strikethrough {
            result = format!("<s>{}</s>", result);
        }

        if style.bold {
            result = format!("<strong>{}</strong>", result);
        }

        if style.italic {
            result = format!("<em>{}</em>", result);
        }

        if style.underline {
            result = format!("<u>{}</u>", result);
        }

        if let Some(class) = style.color.css_class() {
            result = format!("<span class=\"{}\">{}</span>", class, result);
        }

        if let Some(url) = &style.link {
            result = format!("<a href=\"{}\">{}</a>", html_escape(url.as_str()), result);
        }

        result
    }
}

/// Basic HTML escaping.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, ValidatedUrl};

    #[test]
    fn test_html_style_nesting() {
        let style = TextStyle {
            bold: true,
            italic: true,
            ..Default::default()
        };
        assert_eq!(
            HtmlStyleRenderer::apply_styles("test", &style, true),
            "<em><strong>test</strong></em>"
        );
    }

    #[test]
    fn test_code_is_innermost() {
        let style = TextStyle {
            code: true,
            strikethrough: true,
            ..Default::default()
        };
        assert_eq!(
            HtmlStyleRenderer::apply_styles("x < y", &style, true),
            "<s><code>x &lt; y</code></s>"
        );
    }

    #[test]
    fn test_color_and_link_wrap_outside() {
        let style = TextStyle {
            color: Color::RedBackground,
            link: Some(ValidatedUrl::parse("https://example.com/?a=1&b=2").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            HtmlStyleRenderer::apply_styles("hi", &style, true),
            "<a href=\"https://example.com/?a=1&amp;b=2\"><span class=\"notion-red-background\">hi</span></a>"
        );
    }

    #[test]
    fn test_annotations_to_style_leaves_link_unset() {
        let style = annotations_to_style(&Annotations {
            underline: true,
            color: Color::Blue,
            ..Default::default()
        });
        assert!(style.underline);
        assert_eq!(style.color, Color::Blue);
        assert!(style.link.is_none());
    }
}
