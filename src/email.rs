use scraper::{ElementRef, Html};

use crate::error::{Error, Result};

/// An input of unknown shape, as handed over by the fetch side.
#[derive(Debug, Clone)]
pub enum RawInput {
    /// A raw `.eml` blob.
    Email(String),
    /// Already-plain text.
    Text(String),
}

/// Reduce any supported input to a single plain-text body.
///
/// Plain text passes through unchanged. Emails are walked part by part:
/// the first `text/plain` part wins; failing that, the first `text/html`
/// part is converted to text.
pub fn normalize(input: RawInput) -> Result<String> {
    match input {
        RawInput::Text(text) => Ok(text),
        RawInput::Email(raw) => email_body(&raw),
    }
}

fn email_body(raw: &str) -> Result<String> {
    let (headers, body) = split_message(raw);

    let mut plain = None;
    let mut html = None;
    collect_bodies(&headers, body, &mut plain, &mut html)?;

    if let Some(text) = plain {
        return Ok(text);
    }
    if let Some(markup) = html {
        return Ok(html_to_text(&markup));
    }
    Err(Error::Parse("no text part found in message".to_string()))
}

/// Split a message (or message part) into unfolded headers and body.
/// Header names are lowercased. The body starts after the first blank line.
fn split_message(raw: &str) -> (Vec<(String, String)>, &str) {
    let mut headers: Vec<(String, String)> = Vec::new();
    let mut rest = raw;

    loop {
        let (line, next) = next_line(rest);
        if line.trim().is_empty() {
            rest = next;
            break;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Folded continuation of the previous header.
            if let Some(last) = headers.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim());
            }
        } else if let Some(colon) = line.find(':') {
            let name = line[..colon].trim().to_ascii_lowercase();
            let value = line[colon + 1..].trim().to_string();
            headers.push((name, value));
        }

        if next.is_empty() {
            rest = next;
            break;
        }
        rest = next;
    }

    (headers, rest)
}

fn next_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (s[..i].trim_end_matches('\r'), &s[i + 1..]),
        None => (s, ""),
    }
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

/// Content type as `(mime, boundary)`, defaulting to `text/plain`.
fn content_type(headers: &[(String, String)]) -> (String, Option<String>) {
    match header(headers, "content-type") {
        Some(value) => parse_content_type(value),
        None => ("text/plain".to_string(), None),
    }
}

fn parse_content_type(value: &str) -> (String, Option<String>) {
    let mut pieces = value.split(';');
    let mime = pieces
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let mut boundary = None;
    for param in pieces {
        let param = param.trim();
        if param.len() > 9 && param.is_char_boundary(9) && param[..9].eq_ignore_ascii_case("boundary=")
        {
            boundary = Some(param[9..].trim_matches('"').to_string());
        }
    }

    (mime, boundary)
}

/// Walk a part tree in order, recording the first plain and html bodies.
fn collect_bodies(
    headers: &[(String, String)],
    body: &str,
    plain: &mut Option<String>,
    html: &mut Option<String>,
) -> Result<()> {
    let (mime, boundary) = content_type(headers);

    if mime.starts_with("multipart/") {
        let boundary = boundary.ok_or_else(|| {
            Error::Parse(format!("multipart message '{}' has no boundary", mime))
        })?;
        for part in split_parts(body, &boundary) {
            let (part_headers, part_body) = split_message(part);
            collect_bodies(&part_headers, part_body, plain, html)?;
            if plain.is_some() {
                return Ok(());
            }
        }
        return Ok(());
    }

    if mime == "text/plain" && plain.is_none() {
        *plain = Some(decode_body(headers, body)?);
    } else if mime == "text/html" && html.is_none() {
        *html = Some(decode_body(headers, body)?);
    }

    Ok(())
}

fn split_parts<'a>(body: &'a str, boundary: &str) -> Vec<&'a str> {
    let open = format!("--{}", boundary);
    let close = format!("--{}--", boundary);

    let mut parts = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == open || trimmed == close {
            if let Some(s) = start {
                parts.push(&body[s..offset]);
            }
            start = if trimmed == close {
                None
            } else {
                Some(offset + line.len())
            };
        }
        offset += line.len();
    }
    if let Some(s) = start {
        // Unterminated final part.
        parts.push(&body[s..]);
    }

    parts
}

fn decode_body(headers: &[(String, String)], body: &str) -> Result<String> {
    let encoding = header(headers, "content-transfer-encoding")
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    match encoding.as_str() {
        "quoted-printable" => decode_quoted_printable(body),
        "base64" => decode_base64(body),
        _ => Ok(body.to_string()),
    }
}

fn decode_quoted_printable(body: &str) -> Result<String> {
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        // Soft line break: "=\r\n" or "=\n".
        if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') {
            i += 3;
        } else if bytes.get(i + 1) == Some(&b'\n') {
            i += 2;
        } else if i + 2 < bytes.len() {
            match u8::from_str_radix(&body[i + 1..i + 3], 16) {
                Ok(b) => {
                    out.push(b);
                    i += 3;
                }
                Err(_) => {
                    // Stray '=' without a hex escape; keep it literally.
                    out.push(b'=');
                    i += 1;
                }
            }
        } else {
            out.push(b'=');
            i += 1;
        }
    }

    String::from_utf8(out)
        .map_err(|_| Error::Parse("decoded message body is not valid UTF-8".to_string()))
}

fn decode_base64(body: &str) -> Result<String> {
    let mut buf = 0u32;
    let mut bits = 0u32;
    let mut out = Vec::new();

    for &b in body.as_bytes() {
        let value = match b {
            b'A'..=b'Z' => b - b'A',
            b'a'..=b'z' => b - b'a' + 26,
            b'0'..=b'9' => b - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            b'=' => break,
            b'\r' | b'\n' | b' ' | b'\t' => continue,
            _ => {
                return Err(Error::Parse(format!(
                    "invalid base64 byte 0x{:02x} in message body",
                    b
                )))
            }
        };
        buf = (buf << 6) | u32::from(value);
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((buf >> bits) as u8);
        }
    }

    String::from_utf8(out)
        .map_err(|_| Error::Parse("decoded message body is not valid UTF-8".to_string()))
}

/// Strip markup, dropping script/style subtrees and keeping line breaks
/// at block boundaries.
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    append_text(document.root_element(), &mut out);
    out
}

fn append_text(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if name == "script" || name == "style" {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            append_text(child_element, out);
        }
    }

    if matches!(
        name,
        "p" | "div" | "br" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    ) {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = "Given an array, return its sum.".to_string();
        assert_eq!(normalize(RawInput::Text(text.clone())).unwrap(), text);
    }

    #[test]
    fn test_simple_email_body() {
        let raw = "From: noreply@example.com\r\n\
                   Subject: Daily Problem\r\n\
                   \r\n\
                   This problem was asked by Google.\r\n";
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert_eq!(body.trim(), "This problem was asked by Google.");
    }

    #[test]
    fn test_multipart_prefers_plain_text() {
        let raw = "Content-Type: multipart/alternative; boundary=\"sep\"\n\
                   \n\
                   --sep\n\
                   Content-Type: text/plain\n\
                   \n\
                   plain body\n\
                   --sep\n\
                   Content-Type: text/html\n\
                   \n\
                   <p>html body</p>\n\
                   --sep--\n";
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert_eq!(body.trim(), "plain body");
    }

    #[test]
    fn test_html_only_part_is_converted() {
        let raw = "Content-Type: multipart/alternative; boundary=sep\n\
                   \n\
                   --sep\n\
                   Content-Type: text/html\n\
                   \n\
                   <html><head><style>p { color: red }</style></head>\n\
                   <body><p>Given a tree,</p><p>invert it.</p>\n\
                   <script>track();</script></body></html>\n\
                   --sep--\n";
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert!(body.contains("Given a tree,"));
        assert!(body.contains("invert it."));
        assert!(body.contains("Given a tree,\n"));
        assert!(!body.contains("track()"));
        assert!(!body.contains("color: red"));
    }

    #[test]
    fn test_nested_multipart() {
        let raw = "Content-Type: multipart/mixed; boundary=outer\n\
                   \n\
                   --outer\n\
                   Content-Type: multipart/alternative; boundary=inner\n\
                   \n\
                   --inner\n\
                   Content-Type: text/plain\n\
                   \n\
                   nested plain body\n\
                   --inner--\n\
                   --outer--\n";
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert_eq!(body.trim(), "nested plain body");
    }

    #[test]
    fn test_quoted_printable_decoding() {
        let raw = concat!(
            "Content-Type: text/plain\n",
            "Content-Transfer-Encoding: quoted-printable\n",
            "\n",
            "Given a 3=C3=974 grid, count the=\n",
            " paths.\n"
        );
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert_eq!(body.trim(), "Given a 3\u{d7}4 grid, count the paths.");
    }

    #[test]
    fn test_base64_decoding() {
        // "This problem was asked by Stripe."
        let raw = "Content-Type: text/plain\n\
                   Content-Transfer-Encoding: base64\n\
                   \n\
                   VGhpcyBwcm9ibGVtIHdhcyBhc2tlZCBieSBTdHJpcGUu\n";
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert_eq!(body.trim(), "This problem was asked by Stripe.");
    }

    #[test]
    fn test_multipart_without_boundary_is_parse_error() {
        let raw = "Content-Type: multipart/alternative\n\
                   \n\
                   body\n";
        let err = normalize(RawInput::Email(raw.to_string())).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_multipart_without_text_part_is_parse_error() {
        let raw = "Content-Type: multipart/mixed; boundary=sep\n\
                   \n\
                   --sep\n\
                   Content-Type: application/pdf\n\
                   \n\
                   %PDF-1.4\n\
                   --sep--\n";
        let err = normalize(RawInput::Email(raw.to_string())).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_folded_content_type_header() {
        let raw = "Content-Type: multipart/alternative;\n\
                   \tboundary=\"sep\"\n\
                   \n\
                   --sep\n\
                   Content-Type: text/plain\n\
                   \n\
                   folded header body\n\
                   --sep--\n";
        let body = normalize(RawInput::Email(raw.to_string())).unwrap();
        assert_eq!(body.trim(), "folded header body");
    }
}
