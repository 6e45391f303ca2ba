use serde::Serialize;

/// One renderable piece of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Segment {
    /// Literal text, rendered as-is.
    Text(String),
    /// Text rendered with strong styling.
    Emphasis(String),
    /// Preformatted block; content is the fence body with surrounding whitespace trimmed.
    CodeBlock(String),
}

/// Ordered segments, left to right as they appear in the input.
pub type ParseResult = Vec<Segment>;

/// Output of the block pass: prose runs and fenced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Plain(String),
    Code(String),
}

/// Output of the emphasis pass over a single prose run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Emphasis(String),
}

impl Segment {
    pub fn content(&self) -> &str {
        match self {
            Segment::Text(s) | Segment::Emphasis(s) | Segment::CodeBlock(s) => s,
        }
    }
}

impl From<Span> for Segment {
    fn from(span: Span) -> Self {
        match span {
            Span::Plain(text) => Segment::Text(text),
            Span::Emphasis(text) => Segment::Emphasis(text),
        }
    }
}
