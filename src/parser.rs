use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::segment::{Block, ParseResult, Segment, Span};

/// Fence language recognised when none is configured.
pub const DEFAULT_LANGUAGE: &str = "sql";

const FENCE: &str = "```";

/// `**inner**`, shortest match, never across a line break.
static EMPHASIS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^\r\n\x{2028}\x{2029}]*?)\*\*").unwrap());

static DEFAULT_SEGMENTER: Lazy<Segmenter> = Lazy::new(|| Segmenter {
    language: DEFAULT_LANGUAGE.to_string(),
    fence: Regex::new(&fence_pattern(DEFAULT_LANGUAGE)).unwrap(),
});

/// Opening line, body, first closing marker. The body may span lines.
fn fence_pattern(language: &str) -> String {
    format!(r"(?s){FENCE}{}\n(.*?){FENCE}", regex::escape(language))
}

/// Splits reply text into prose, emphasis and fenced code.
///
/// Only fully closed fences tagged with `language` are code blocks; anything
/// else, including an opening fence that is never closed, stays prose.
#[derive(Debug, Clone)]
pub struct Segmenter {
    language: String,
    fence: Regex,
}

impl Default for Segmenter {
    fn default() -> Self {
        DEFAULT_SEGMENTER.clone()
    }
}

impl Segmenter {
    /// Build a segmenter for fences tagged with `language`. The tag is matched literally.
    pub fn new(language: &str) -> Result<Self> {
        let fence = Regex::new(&fence_pattern(language))?;
        Ok(Self {
            language: language.to_string(),
            fence,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Partition `text` into prose runs and code blocks, in input order.
    ///
    /// Empty prose between adjacent blocks is dropped, so empty input yields
    /// no blocks at all.
    pub fn segment_blocks(&self, text: &str) -> Vec<Block> {
        split_matches(&self.fence, text, Block::Plain, |body| {
            Block::Code(body.trim().to_string())
        })
    }

    /// Segment a whole reply: code blocks first, then emphasis inside prose only.
    pub fn parse(&self, text: &str) -> ParseResult {
        let mut segments = Vec::new();
        for block in self.segment_blocks(text) {
            match block {
                Block::Plain(run) => {
                    segments.extend(segment_emphasis(&run).into_iter().map(Segment::from));
                }
                Block::Code(code) => segments.push(Segment::CodeBlock(code)),
            }
        }
        log::debug!(
            "segmented {} bytes into {} segments",
            text.len(),
            segments.len()
        );
        segments
    }

    /// Re-insert the structural markers around each segment.
    ///
    /// Parsing the result yields `segments` again.
    pub fn to_markup(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Emphasis(text) => {
                    out.push_str("**");
                    out.push_str(text);
                    out.push_str("**");
                }
                Segment::CodeBlock(code) => {
                    out.push_str(FENCE);
                    out.push_str(&self.language);
                    out.push('\n');
                    out.push_str(code);
                    out.push_str(FENCE);
                }
            }
        }
        out
    }
}

/// Split a prose run into plain and emphasized spans, in input order.
///
/// The first `**` after an opening `**` closes the span; inner text is kept
/// untrimmed and may be empty.
pub fn segment_emphasis(text: &str) -> Vec<Span> {
    split_matches(&EMPHASIS_REGEX, text, Span::Plain, |inner| {
        Span::Emphasis(inner.to_string())
    })
}

/// [`Segmenter::segment_blocks`] with the default `sql` fence.
pub fn segment_blocks(text: &str) -> Vec<Block> {
    DEFAULT_SEGMENTER.segment_blocks(text)
}

/// [`Segmenter::parse`] with the default `sql` fence.
pub fn parse(text: &str) -> ParseResult {
    DEFAULT_SEGMENTER.parse(text)
}

/// [`Segmenter::to_markup`] with the default `sql` fence.
pub fn to_markup(segments: &[Segment]) -> String {
    DEFAULT_SEGMENTER.to_markup(segments)
}

/// Walk the non-overlapping matches of `pattern`, emitting the non-empty gaps
/// through `plain` and each match's first capture through `matched`.
fn split_matches<T>(
    pattern: &Regex,
    text: &str,
    plain: impl Fn(String) -> T,
    matched: impl Fn(&str) -> T,
) -> Vec<T> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(plain(text[last..whole.start()].to_string()));
        }
        out.push(matched(inner.as_str()));
        last = whole.end();
    }

    if last < text.len() {
        out.push(plain(text[last..].to_string()));
    }
    out
}
