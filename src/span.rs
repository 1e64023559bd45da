//! Positional metadata attached to parsed fields
//!
//! When a format is compiled with position tracking, the generated code
//! records a [`Span`] per field so debuggers and hex-view tooling can map
//! parsed values back to byte ranges. All positions are byte offsets; a
//! span with no `end` belongs to a field that has not finished parsing
//! (or whose parse failed).

use crate::stream::Stream;

/// Byte range of one parsed field.
///
/// `start` and `end` are relative to the stream the field was parsed
/// from; `offset` is that stream's origin within the root stream, so the
/// absolute accessors work across substream boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Origin of the field's stream within the root stream
    pub offset: u64,
    /// Start of the field, relative to its stream
    pub start: u64,
    /// End of the field, relative to its stream; `None` until parsed
    pub end: Option<u64>,
}

impl Span {
    /// Span starting at the stream's current position, end unknown.
    pub fn new(io: &Stream) -> Self {
        Self {
            offset: io.offset(),
            start: io.pos(),
            end: None,
        }
    }

    /// Record the end of the field at the stream's current position.
    pub fn end_here(&mut self, io: &Stream) {
        self.end = Some(io.pos());
    }

    /// Start offset relative to the root stream.
    pub fn absolute_start(&self) -> u64 {
        self.offset + self.start
    }

    /// End offset relative to the root stream, if parsed.
    pub fn absolute_end(&self) -> Option<u64> {
        self.end.map(|end| self.offset + end)
    }

    /// Size of the span in bytes, if parsed.
    pub fn len(&self) -> Option<u64> {
        self.end.map(|end| end - self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// Span of an array field plus the span of each element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySpan {
    pub span: Span,
    pub items: Vec<Span>,
}

impl ArraySpan {
    pub fn new(io: &Stream) -> Self {
        Self {
            span: Span::new(io),
            items: Vec::new(),
        }
    }

    pub fn with_capacity(io: &Stream, n: usize) -> Self {
        Self {
            span: Span::new(io),
            items: Vec::with_capacity(n),
        }
    }

    /// Start a new item span at the stream's current position and return
    /// it for the caller to close once the item is parsed.
    pub fn add_item(&mut self, io: &Stream) -> &mut Span {
        self.items.push(Span::new(io));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }
}
