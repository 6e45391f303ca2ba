use crate::config::Config;
use crate::segment::Segment;

/// Convert segments to Typst markup
pub fn segments_to_typst(segments: &[Segment], config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    for segment in segments {
        match segment {
            Segment::Text(text) => escape_markup(text, &mut out),
            Segment::Emphasis(text) => {
                // Function form works mid-word; `;` ends the embedded expression
                out.push_str("#strong[");
                escape_markup(text, &mut out);
                out.push_str("];");
            }
            Segment::CodeBlock(code) => emit_code_block(code, config, &mut out),
        }
    }

    out.push('\n');
    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    out.push_str(&format!("#set text(size: {})\n", config.font.size));
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str(&format!(
        "#show strong: set text(fill: rgb({}))\n",
        string_literal(&config.emphasis.color)
    ));
    out.push_str(&format!(
        "#show raw.where(block: true): set text(fill: rgb({}), size: {})\n",
        string_literal(&config.code.color),
        config.code.size
    ));
    out.push('\n');
}

fn emit_code_block(code: &str, config: &Config, out: &mut String) {
    // Keep code blocks together when possible
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!(
        "#block(fill: rgb({}), stroke: 1pt + rgb({}), inset: 10pt, radius: 4pt, width: 100%, breakable: false)[",
        string_literal(&config.code.fill),
        string_literal(&config.code.stroke),
    ));
    out.push_str(&format!(
        "#raw(block: true, lang: {}, {})",
        string_literal(&config.segmenter.fence_language),
        string_literal(code)
    ));
    out.push_str("]\n");
}

/// Escape reply text for Typst markup. Line breaks are kept as forced breaks.
fn escape_markup(text: &str, out: &mut String) {
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\n' => out.push_str(" \\\n"),
            '\r' => {}
            // `1.` opens a numbered list at line start, `...` is an ellipsis
            '.' if prev.is_some_and(|p| p.is_ascii_digit() || p == '.')
                || chars.peek() == Some(&'.') =>
            {
                out.push_str("\\.");
            }
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '~' | '/' | '='
            | '-' | '+' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
        prev = Some(ch);
    }
}

/// Quote a value as a Typst string literal.
fn string_literal(value: &str) -> String {
    let mut lit = String::with_capacity(value.len() + 2);
    lit.push('"');
    for ch in value.chars() {
        match ch {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            '\n' => lit.push_str("\\n"),
            '\r' => lit.push_str("\\r"),
            '\t' => lit.push_str("\\t"),
            _ => lit.push(ch),
        }
    }
    lit.push('"');
    lit
}
