use crate::path::Segment;

/// Wildcard bindings produced by one successful match.
///
/// Each segment keeps its spans in pattern order. Templates address them
/// 1-based; see [`Stars::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stars {
    input: Vec<String>,
    that: Vec<String>,
    topic: Vec<String>,
}

impl Stars {
    /// Spans bound in one segment, in pattern order.
    pub fn segment(&self, segment: Segment) -> &[String] {
        match segment {
            Segment::Input => &self.input,
            Segment::That => &self.that,
            Segment::Topic => &self.topic,
        }
    }

    /// Spans bound in the input.
    pub fn input(&self) -> &[String] {
        &self.input
    }

    /// Spans bound in the that segment.
    pub fn that(&self) -> &[String] {
        &self.that
    }

    /// Spans bound in the topic segment.
    pub fn topic(&self) -> &[String] {
        &self.topic
    }

    /// Reads the `index`th (1-based) span of a segment.
    pub fn get(&self, segment: Segment, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|index| self.segment(segment).get(index))
            .map(String::as_str)
    }

    /// Whether no wildcard bound anything.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.that.is_empty() && self.topic.is_empty()
    }

    /// Records a span at a 0-based position. Spans arrive deepest first, so
    /// earlier positions are padded until their own binding lands.
    pub(crate) fn bind(&mut self, segment: Segment, index: usize, span: String) {
        let spans = match segment {
            Segment::Input => &mut self.input,
            Segment::That => &mut self.that,
            Segment::Topic => &mut self.topic,
        };
        if spans.len() <= index {
            spans.resize(index + 1, String::new());
        }
        spans[index] = span;
    }
}
