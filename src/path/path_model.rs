use std::fmt;

// ============================================================================
// Canonical symbolic paths — `users[2].birthdate.format()`
// ============================================================================

/// Index carried by a path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegIndex {
    /// Explicit zero-based numeric index: `users[2]`.
    Num(usize),
    /// The symbolic loop placeholder: `children[i]`.
    Placeholder,
}

/// One segment of a canonical path: a bare identifier, an identifier with
/// an index, or a zero-argument computed accessor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub name: String,
    pub index: Option<SegIndex>,
    pub call: bool,
}

impl Segment {
    pub fn bare(name: impl Into<String>) -> Self {
        Segment { name: name.into(), index: None, call: false }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Segment { name: name.into(), index: Some(SegIndex::Num(index)), call: false }
    }

    pub fn accessor(name: impl Into<String>) -> Self {
        Segment { name: name.into(), index: None, call: true }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match &self.index {
            Some(SegIndex::Num(n)) => write!(f, "[{}]", n)?,
            Some(SegIndex::Placeholder) => write!(f, "[i]")?,
            None => {}
        }
        if self.call {
            write!(f, "()")?;
        }
        Ok(())
    }
}

/// A canonical symbolic path. Equality is structural, segment-by-segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalPath {
    pub segments: Vec<Segment>,
}

impl CanonicalPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        CanonicalPath { segments }
    }

    /// A single bare identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        CanonicalPath { segments: vec![Segment::bare(name)] }
    }

    /// Parse a dotted/bracketed path string. Template-origin paths arrive
    /// through here and are trusted as already canonical.
    ///
    /// Accepts numeric and symbolic (`[i]`) indices and trailing `()`
    /// call markers. Returns `None` on malformed bracket syntax.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = Vec::new();
        for part in split_dots(raw) {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            segments.push(parse_segment(part)?);
        }
        if segments.is_empty() {
            None
        } else {
            Some(CanonicalPath { segments })
        }
    }

    /// Parse an attribute suffix like `.birthdate.format()` into segments.
    pub fn parse_attr(suffix: &str) -> Option<Vec<Segment>> {
        let trimmed = suffix.strip_prefix('.').unwrap_or(suffix);
        CanonicalPath::parse(trimmed).map(|p| p.segments)
    }

    pub fn root(&self) -> &str {
        &self.segments[0].name
    }

    /// True for a single-segment path with no accessor call.
    pub fn is_bare(&self) -> bool {
        self.segments.len() == 1 && !self.segments[0].call
    }

    /// True if the first segment carries an index.
    pub fn is_indexed(&self) -> bool {
        self.segments[0].index.is_some()
    }

    /// Attribute chain after the root, rendered without a leading dot.
    pub fn attr_chain(&self) -> String {
        self.segments[1..]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The same path re-rooted on a new first segment.
    pub fn with_root(&self, root: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len());
        segments.push(root);
        segments.extend(self.segments[1..].iter().cloned());
        CanonicalPath { segments }
    }

    /// Append attribute segments.
    pub fn join(&self, attrs: &[Segment]) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(attrs.iter().cloned());
        CanonicalPath { segments }
    }

    /// The path with trailing accessor-call segments removed; used when an
    /// assignable slot is needed and no explicit settable mapping applies.
    pub fn strip_trailing_calls(&self) -> Self {
        let mut segments = self.segments.clone();
        while segments.len() > 1 && segments.last().map(|s| s.call).unwrap_or(false) {
            segments.pop();
        }
        CanonicalPath { segments }
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", rendered)
    }
}

/// Split on `.` outside brackets/parens.
fn split_dots(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (pos, ch) in raw.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&raw[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

fn parse_segment(part: &str) -> Option<Segment> {
    let (body, call) = match part.strip_suffix("()") {
        Some(body) => (body, true),
        None => (part, false),
    };

    if let Some(open) = body.find('[') {
        let close = body.rfind(']')?;
        if close < open {
            return None;
        }
        let name = &body[..open];
        let inner = &body[open + 1..close];
        if name.is_empty() {
            return None;
        }
        let index = if inner == "i" {
            SegIndex::Placeholder
        } else {
            SegIndex::Num(inner.parse().ok()?)
        };
        Some(Segment { name: name.to_string(), index: Some(index), call })
    } else {
        if body.is_empty() {
            return None;
        }
        Some(Segment { name: body.to_string(), index: None, call })
    }
}
