//! Layout templates
//!
//! A layout is a template such as `"Time Remaining: $h:$m:$s"`. It is split
//! on `$`; the first character after each `$` names a time field and the
//! rest of that piece is literal text following the field.

/// Field marker in layout templates
pub const FIELD_MARKER: char = '$';

/// Kind of a compiled layout segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal text, emitted as-is
    Text,
    /// `$h`
    Hours,
    /// `$m`
    Minutes,
    /// `$s`
    Seconds,
    /// Any other marker. Never formatted, so it renders as the marker itself.
    Other(String),
}

/// One unit of a compiled layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Literal text for `Text`, last computed display value for fields
    pub value: String,
}

impl Segment {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Text,
            value: value.into(),
        }
    }

    fn field(marker: &str) -> Self {
        let kind = match marker {
            "h" => SegmentKind::Hours,
            "m" => SegmentKind::Minutes,
            "s" => SegmentKind::Seconds,
            other => SegmentKind::Other(other.to_string()),
        };
        Self {
            kind,
            value: marker.to_string(),
        }
    }

    pub fn is_field(&self) -> bool {
        !matches!(self.kind, SegmentKind::Text)
    }
}

/// Ordered sequence of segments compiled from a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    segments: Vec<Segment>,
}

impl Layout {
    /// Compile a template into segments.
    ///
    /// The text before the first `$` always produces a (possibly empty)
    /// leading text segment. Every following piece produces a field segment
    /// and a trailing text segment.
    pub fn compile(template: &str) -> Self {
        let mut pieces = template.split(FIELD_MARKER);
        let mut segments = vec![Segment::text(pieces.next().unwrap_or_default())];

        for piece in pieces {
            let split = piece.chars().next().map_or(0, char::len_utf8);
            let (marker, rest) = piece.split_at(split);
            segments.push(Segment::field(marker));
            segments.push(Segment::text(rest));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// Concatenate every segment value in order
    pub fn render(&self) -> String {
        self.segments.iter().map(|s| s.value.as_str()).collect()
    }
}
