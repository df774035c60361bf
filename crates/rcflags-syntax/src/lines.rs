//! Physical to logical line handling.
//!
//! A physical line ending in an odd number of backslashes continues onto the
//! next one; the final backslash is dropped and the two are joined as-is.
//! Comment stripping runs on the joined logical line, so a comment ending
//! in `\` swallows the following line too.

/// Join continued lines. Returns `(first_line_number, text)` pairs.
pub fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let (start, mut buf) = pending.take().unwrap_or((idx + 1, String::new()));

        if ends_with_continuation(raw) {
            buf.push_str(&raw[..raw.len() - 1]);
            pending = Some((start, buf));
        } else {
            buf.push_str(raw);
            out.push((start, buf));
        }
    }

    // Continuation on the last line of the file
    if let Some(last) = pending {
        out.push(last);
    }

    out
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|b| *b == b'\\').count();
    trailing % 2 == 1
}

/// Cut a line at the first `#` that starts a word outside of quotes.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut at_word_start = true;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            at_word_start = false;
            continue;
        }

        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                }
                at_word_start = false;
            }
            None => {
                match c {
                    '#' if at_word_start => return &line[..i],
                    '\\' => escaped = true,
                    '\'' | '"' => quote = Some(c),
                    _ => {}
                }
                at_word_start = c.is_whitespace();
            }
        }
    }

    line
}
