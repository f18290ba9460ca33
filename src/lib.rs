use crate::canonical::error::NameWarning;
use crate::field::classifier::classify_references;
use crate::field::consolidate::consolidate;
use crate::field::field_model::Field;
use crate::field::people::promote_custom_people;
use crate::rules::tables::RuleTables;
use crate::source::reference::{FormFieldRef, RawReference, TemplateRef};
use crate::template::extractor::{extract_variables, CallHandling, ExtractError};

pub mod canonical;
pub mod cli;
pub mod field;
pub mod output;
pub mod path;
pub mod rules;
pub mod source;
pub mod template;

/// Everything a document resolves to: the consolidated logical fields and
/// the problems found along the way. Canonicalization errors are per-field
/// and never abort the document.
#[derive(Debug, Default)]
pub struct Resolved {
    pub fields: Vec<Field>,
    pub warnings: Vec<NameWarning>,
    pub errors: Vec<crate::canonical::error::CanonicalizeError>,
}

/// Resolve a fillable form's raw field tuples into a logical field list:
/// canonicalize, classify, pair booleans, merge duplicates, then promote
/// any tenant-declared person collections.
pub fn resolve_form_fields(
    tables: &RuleTables,
    raw_fields: Vec<FormFieldRef>,
    custom_people: &[String],
) -> Resolved {
    let refs: Vec<RawReference> = raw_fields.into_iter().map(RawReference::Form).collect();
    resolve_refs(tables, &refs, custom_people)
}

/// Resolve a text template: extract its variable paths (aliases already
/// resolved to indexed collection paths), then classify and consolidate.
/// Unparsable source is fatal and surfaced to the caller.
pub fn resolve_template(
    tables: &RuleTables,
    source: &str,
    calls: CallHandling,
    custom_people: &[String],
) -> Result<Resolved, ExtractError> {
    let paths = extract_variables(tables, source, calls)?;
    let refs: Vec<RawReference> = paths
        .into_iter()
        .map(|path| {
            // The call marker stays in the path; the canonicalizer parses
            // it into an accessor segment.
            let call = path.ends_with("()");
            RawReference::Template(TemplateRef { path, call })
        })
        .collect();
    Ok(resolve_refs(tables, &refs, custom_people))
}

fn resolve_refs(tables: &RuleTables, refs: &[RawReference], custom_people: &[String]) -> Resolved {
    let outcome = classify_references(tables, refs);
    let fields = consolidate(outcome.fields);
    let fields = promote_custom_people(tables, fields, custom_people);

    Resolved {
        fields,
        warnings: outcome.warnings,
        errors: outcome.errors,
    }
}
