//! Plain-text rendering of the small HTML subset the API emits.
//!
//! Comment and story bodies arrive as HTML fragments: `<p>` paragraph
//! separators, `<a href>` links, `<i>`, `<pre><code>` blocks and character
//! entities. None of it is ever interpreted as markup here; tags are dropped,
//! entities decoded, links reduced to their text plus target, and the result
//! is scrubbed of terminal control sequences.

use super::strip_control_chars;

/// Converts an HTML fragment into display text.
///
/// ```
/// use hnreader::util::html_to_text;
///
/// assert_eq!(html_to_text("Hello<p>World &amp; co"), "Hello\n\nWorld & co");
/// ```
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut link: Option<(String, usize)> = None;
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        push_decoded(&mut out, &rest[..lt]);
        let after = &rest[lt + 1..];
        let Some(gt) = after.find('>') else {
            // Unterminated tag: treat the remainder as text.
            push_decoded(&mut out, &rest[lt..]);
            rest = "";
            break;
        };
        let tag = &after[..gt];
        rest = &after[gt + 1..];

        let (closing, body) = match tag.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, tag),
        };
        let name = body
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        match (name.as_str(), closing) {
            ("p", false) => {
                trim_trailing_spaces(&mut out);
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
            }
            ("br", _) => out.push('\n'),
            ("pre", false) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            ("a", false) => {
                let href = attribute(body, "href").map(|h| decode_entities(&h));
                link = href.map(|h| (h, out.len()));
            }
            ("a", true) => {
                if let Some((href, start)) = link.take() {
                    let text = out.get(start..).unwrap_or("").trim();
                    if href.is_empty() {
                        continue;
                    }
                    if text.is_empty() {
                        // Empty link text: show the target itself.
                        out.truncate(start);
                        out.push_str(&href);
                    } else if !href.starts_with(text.trim_end_matches("...")) {
                        out.push_str(" (");
                        out.push_str(&href);
                        out.push(')');
                    } else if text.ends_with("...") {
                        // Truncated link text: show the full target instead.
                        out.truncate(start);
                        out.push_str(&href);
                    }
                }
            }
            _ => {}
        }
    }
    push_decoded(&mut out, rest);

    let trimmed = out.trim_end();
    strip_control_chars(trimmed).into_owned()
}

fn push_decoded(out: &mut String, text: &str) {
    if text.contains('&') {
        out.push_str(&decode_entities(text));
    } else {
        out.push_str(text);
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches([' ', '\t']).len();
    out.truncate(len);
}

/// Extracts a quoted attribute value from a tag body.
fn attribute(tag: &str, name: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let needle = format!("{}=", name);
    let idx = lower.find(&needle)?;
    let value = &tag[idx + needle.len()..];
    let quote = value.chars().next()?;
    if quote == '"' || quote == '\'' {
        let inner = &value[1..];
        let end = inner.find(quote)?;
        Some(inner[..end].to_string())
    } else {
        let end = value
            .find(|c: char| c.is_whitespace())
            .unwrap_or(value.len());
        Some(value[..end].to_string())
    }
}

/// Decodes named and numeric character references. Unknown entities are
/// left verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&candidate[..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraphs_become_blank_lines() {
        assert_eq!(
            html_to_text("First point.<p>Second point.<p>Third."),
            "First point.\n\nSecond point.\n\nThird."
        );
    }

    #[test]
    fn test_decodes_common_entities() {
        assert_eq!(
            html_to_text("It&#x27;s &quot;fine&quot; &amp; 3 &gt; 2 &#x2F; &#62;"),
            "It's \"fine\" & 3 > 2 / >"
        );
    }

    #[test]
    fn test_unknown_entities_are_kept() {
        assert_eq!(decode_entities("AT&T &bogus; &"), "AT&T &bogus; &");
    }

    #[test]
    fn test_markup_is_never_passed_through() {
        let text = html_to_text("<script>alert(1)</script><i>hi</i> <b onclick=\"x\">there</b>");
        assert_eq!(text, "alert(1)hi there");
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_link_with_distinct_text_shows_target() {
        assert_eq!(
            html_to_text("see <a href=\"https://example.com/post\">this post</a>"),
            "see this post (https://example.com/post)"
        );
    }

    #[test]
    fn test_truncated_link_text_is_replaced_by_target() {
        let html = "<a href=\"https:&#x2F;&#x2F;example.com&#x2F;a&#x2F;long&#x2F;path\" \
                    rel=\"nofollow\">https:&#x2F;&#x2F;example.com&#x2F;a&#x2F;lo...</a>";
        assert_eq!(html_to_text(html), "https://example.com/a/long/path");
    }

    #[test]
    fn test_link_without_text_shows_target() {
        assert_eq!(
            html_to_text("mirror: <a href=\"https://example.com/m\"></a>"),
            "mirror: https://example.com/m"
        );
    }

    #[test]
    fn test_link_text_equal_to_target_is_not_repeated() {
        assert_eq!(
            html_to_text("<a href=\"https://example.com\">https://example.com</a>"),
            "https://example.com"
        );
    }

    #[test]
    fn test_preformatted_blocks_keep_newlines() {
        assert_eq!(
            html_to_text("Code:<pre><code>  fn main() {}\n  // done\n</code></pre>"),
            "Code:\n  fn main() {}\n  // done"
        );
    }

    #[test]
    fn test_strips_terminal_escapes_from_decoded_text() {
        assert_eq!(html_to_text("safe&#27;[2Jtext"), "safetext");
    }

    #[test]
    fn test_unterminated_tag_is_kept_as_text() {
        assert_eq!(html_to_text("a < b"), "a < b");
    }
}
