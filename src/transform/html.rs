//! HTML minification.
//!
//! Streaming rewrite over the document that drops comments and collapses
//! runs of whitespace in text to a single space. Markup is re-emitted as
//! written; whitespace inside `pre`, `textarea`, `script` and `style` is
//! significant and left alone.

use std::cell::Cell;
use std::rc::Rc;

use lol_html::html_content::{ContentType, EndTag};
use lol_html::{
    doc_comments, doc_text, element, rewrite_str, EndTagHandler, HandlerResult, RewriteStrSettings,
};

use super::TransformError;

const VERBATIM_ELEMENTS: &str = "pre, textarea, script, style";

/// Minify an HTML document.
pub fn minify_html(html: &str) -> Result<String, TransformError> {
    let verbatim_depth = Rc::new(Cell::new(0usize));
    let pending_space = Rc::new(Cell::new(false));

    let minified = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(VERBATIM_ELEMENTS, {
                let depth = Rc::clone(&verbatim_depth);
                move |el| {
                    if let Some(handlers) = el.end_tag_handlers() {
                        depth.set(depth.get() + 1);
                        let depth = Rc::clone(&depth);
                        let on_end: EndTagHandler<'static> =
                            Box::new(move |_end: &mut EndTag<'_>| -> HandlerResult {
                                depth.set(depth.get().saturating_sub(1));
                                Ok(())
                            });
                        handlers.push(on_end);
                    }
                    Ok(())
                }
            })],
            document_content_handlers: vec![
                doc_comments!(|comment| {
                    if !is_conditional_comment(&comment.text()) {
                        comment.remove();
                    }
                    Ok(())
                }),
                doc_text!({
                    let depth = Rc::clone(&verbatim_depth);
                    let pending_space = Rc::clone(&pending_space);
                    move |chunk| {
                        let last = chunk.last_in_text_node();
                        if depth.get() == 0 {
                            let (collapsed, trailing_space) =
                                collapse_whitespace(chunk.as_str(), pending_space.get());
                            if collapsed != chunk.as_str() {
                                chunk.replace(&collapsed, ContentType::Html);
                            }
                            pending_space.set(trailing_space && !last);
                        } else {
                            pending_space.set(false);
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )?;

    Ok(minified)
}

/// Collapse whitespace runs in one text chunk.
///
/// `after_space` is true when the previous chunk of the same text node ended
/// in whitespace that was already emitted. Returns the rewritten chunk and
/// whether it ends in whitespace.
fn collapse_whitespace(text: &str, after_space: bool) -> (String, bool) {
    let mut out = String::with_capacity(text.len());
    let mut in_space = after_space;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    (out, in_space)
}

// `<!--[if IE]> ... <![endif]-->` still changes rendering in old browsers.
fn is_conditional_comment(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("[if") || text.ends_with("<![endif]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            minify_html("<html>  <body>  Hi </body></html>").unwrap(),
            "<html> <body> Hi </body></html>"
        );
    }

    #[test]
    fn test_newlines_and_tabs() {
        let input = "<ul>\n\t<li>one</li>\n\t<li>two</li>\n</ul>\n";
        assert_eq!(minify_html(input).unwrap(), "<ul> <li>one</li> <li>two</li> </ul> ");
    }

    #[test]
    fn test_removes_comments() {
        assert_eq!(
            minify_html("<p>a<!-- build 1234 -->b</p>").unwrap(),
            "<p>ab</p>"
        );
    }

    #[test]
    fn test_keeps_conditional_comments() {
        let input = "<head><!--[if lt IE 9]><script src=\"shim.js\"></script><![endif]--></head>";
        assert_eq!(minify_html(input).unwrap(), input);
    }

    #[test]
    fn test_preserves_verbatim_elements() {
        let input = "<div>  <pre>  a\n    b</pre>  <textarea>  x  </textarea>\
                     <script>var  a =  1;</script><style>p  { }</style>  </div>";
        let expected = "<div> <pre>  a\n    b</pre> <textarea>  x  </textarea>\
                        <script>var  a =  1;</script><style>p  { }</style> </div>";
        assert_eq!(minify_html(input).unwrap(), expected);
    }

    #[test]
    fn test_preserves_entities_and_attributes() {
        let input = r#"<a   href="/x?a=1&amp;b=2"  title="two  spaces">&nbsp; &lt;tag&gt;</a>"#;
        let output = minify_html(input).unwrap();
        assert!(output.contains(r#"title="two  spaces""#));
        assert!(output.contains("&nbsp; &lt;tag&gt;"));
    }

    #[test]
    fn test_already_minimal_is_unchanged() {
        let input = "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>";
        assert_eq!(minify_html(input).unwrap(), input);
    }

    #[test]
    fn test_collapse_across_chunks() {
        assert_eq!(collapse_whitespace("a  ", false), ("a ".to_string(), true));
        assert_eq!(collapse_whitespace("  b", true), ("b".to_string(), false));
        assert_eq!(collapse_whitespace("", true), (String::new(), true));
    }
}
