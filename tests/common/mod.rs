#![allow(dead_code)]

use formwright::field::field_model::Field;
use formwright::rules::tables::RuleTables;
use formwright::source::reference::{
    BoundingBox, FormFieldRef, RawReference, TemplateRef, WidgetKind,
};

pub fn tables() -> RuleTables {
    RuleTables::standard()
}

pub fn form_field(name: &str, order: usize) -> FormFieldRef {
    FormFieldRef {
        name: name.to_string(),
        default: None,
        order,
        bbox: None,
        widget: WidgetKind::Text,
        extra: None,
    }
}

pub fn form_ref(name: &str, order: usize) -> RawReference {
    RawReference::Form(form_field(name, order))
}

pub fn widget_ref(name: &str, order: usize, widget: WidgetKind) -> RawReference {
    let mut field = form_field(name, order);
    field.widget = widget;
    RawReference::Form(field)
}

pub fn boxed_ref(name: &str, order: usize, width: f64, height: f64) -> RawReference {
    let mut field = form_field(name, order);
    field.bbox = Some(BoundingBox { x0: 0.0, y0: 0.0, x1: width, y1: height });
    RawReference::Form(field)
}

pub fn template_ref(path: &str) -> RawReference {
    RawReference::Template(TemplateRef { path: path.to_string(), call: false })
}

pub fn displays(fields: &[Field]) -> Vec<String> {
    fields.iter().map(|f| f.display.to_string()).collect()
}

pub fn find<'a>(fields: &'a [Field], display: &str) -> &'a Field {
    fields
        .iter()
        .find(|f| f.display.to_string() == display)
        .unwrap_or_else(|| panic!("no field with display path {}", display))
}
