use serde::{Deserialize, Serialize};

// ============================================================================
// Raw references — one mention of a field in a source document
// ============================================================================

/// Widget type reported by form introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Text,
    Checkbox,
    Signature,
    Unknown,
}

/// Widget bounding box in document points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).abs()
    }
}

/// One raw field tuple from a fillable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFieldRef {
    pub name: String,
    #[serde(default)]
    pub default: Option<String>,
    pub order: usize,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    pub widget: WidgetKind,
    #[serde(default)]
    pub extra: Option<serde_json::Value>,
}

/// One variable path extracted from a text template, post alias-resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub path: String,
    /// The reference carried a trailing call marker.
    #[serde(default)]
    pub call: bool,
}

/// One mention of a field in a source document. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RawReference {
    Form(FormFieldRef),
    Template(TemplateRef),
}

impl RawReference {
    /// The textual label/path as written in the source.
    pub fn raw_name(&self) -> &str {
        match self {
            RawReference::Form(f) => &f.name,
            RawReference::Template(t) => &t.path,
        }
    }

    pub fn order(&self) -> usize {
        match self {
            RawReference::Form(f) => f.order,
            RawReference::Template(_) => 0,
        }
    }
}

/// The host-facing wire shape of one form field: an ordered tuple
/// `(name, default, order, bbox-or-empty, widget, extra)`.
#[derive(Debug, Deserialize)]
pub struct RawFieldTuple(
    pub String,
    pub Option<String>,
    pub usize,
    pub Option<[f64; 4]>,
    pub WidgetKind,
    pub Option<serde_json::Value>,
);

impl From<RawFieldTuple> for FormFieldRef {
    fn from(t: RawFieldTuple) -> Self {
        let RawFieldTuple(name, default, order, bbox, widget, extra) = t;
        FormFieldRef {
            name,
            default,
            order,
            bbox: bbox.map(|[x0, y0, x1, y1]| BoundingBox { x0, y0, x1, y1 }),
            widget,
            extra,
        }
    }
}
