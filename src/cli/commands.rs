use crate::canonical::canonicalize::canonicalize;
use crate::cli::config::AppConfig;
use crate::output::interview::synthesize_interview;
use crate::output::screens::ScreenSpec;
use crate::rules::tables::RuleTables;
use crate::source::doc_error::{DocError, DocErrorKind};
use crate::source::reference::{FormFieldRef, RawFieldTuple};
use crate::template::extractor::extract_filtered;
use crate::{resolve_form_fields, resolve_template, Resolved};

// ============================================================================
// fields subcommand
// ============================================================================

pub fn cmd_fields(
    input: &str,
    screens_path: Option<&str>,
    doc_name: &str,
    output: Option<&str>,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(input)
        .map_err(|e| DocError::new(DocErrorKind::Unreadable, format!("{}: {}", input, e)))?;
    let tuples: Vec<RawFieldTuple> = serde_json::from_str(&raw)
        .map_err(|e| DocError::new(DocErrorKind::WrongFormat, format!("{}: {}", input, e)))?;
    let fields: Vec<FormFieldRef> = tuples.into_iter().map(FormFieldRef::from).collect();

    if verbose > 0 {
        eprintln!("Read {} raw field tuples from {}", fields.len(), input);
    }

    let specs = load_screen_specs(screens_path)?;
    let tables = RuleTables::standard().with_area_threshold(config.area_threshold);
    let resolved = resolve_form_fields(&tables, fields, &config.people);

    emit_interview(&tables, &resolved, &specs, doc_name, output, verbose)
}

// ============================================================================
// template subcommand
// ============================================================================

pub fn cmd_template(
    input: &str,
    retain_calls: bool,
    signature_filter: Option<&str>,
    doc_name: &str,
    output: Option<&str>,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(input)
        .map_err(|e| DocError::new(DocErrorKind::Unreadable, format!("{}: {}", input, e)))?;
    let tables = RuleTables::standard();

    let calls = if retain_calls {
        crate::template::extractor::CallHandling::Retain
    } else {
        config.call_handling()
    };

    let resolved = resolve_template(&tables, &source, calls, &config.people)?;

    if let Some(filter) = signature_filter {
        let signatures = extract_filtered(&tables, &source, filter)?;
        if !signatures.is_empty() && verbose > 0 {
            eprintln!("Final-rendition references ({}):", filter);
            for path in &signatures {
                eprintln!("  {}", path);
            }
        }
    }

    emit_interview(&tables, &resolved, &[], doc_name, output, verbose)
}

// ============================================================================
// resolve subcommand
// ============================================================================

pub fn cmd_resolve(labels: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let tables = RuleTables::standard();
    for label in labels {
        match canonicalize(&tables, label) {
            Ok(resolution) => {
                println!("{} -> {}  [{:?}]", label, resolution.path, resolution.matched);
            }
            Err(e) => {
                println!("{} -> error [{}]: {}", label, e.code(), e);
            }
        }
    }
    Ok(())
}

// ============================================================================
// shared plumbing
// ============================================================================

fn load_screen_specs(
    path: Option<&str>,
) -> Result<Vec<ScreenSpec>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p)?;
            Ok(serde_yaml::from_str(&raw)?)
        }
        None => Ok(Vec::new()),
    }
}

fn emit_interview(
    tables: &RuleTables,
    resolved: &Resolved,
    specs: &[ScreenSpec],
    doc_name: &str,
    output: Option<&str>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    for error in &resolved.errors {
        eprintln!("error [{}]: {}", error.code(), error);
    }
    for warning in &resolved.warnings {
        eprintln!("warning: {}", warning);
    }

    let interview = synthesize_interview(tables, &resolved.fields, specs, doc_name);

    for skipped in &interview.skipped {
        eprintln!("skipped: {}", skipped);
    }
    if verbose > 0 {
        eprintln!(
            "Generated {} blocks ({} fields)",
            interview.blocks.len(),
            resolved.fields.len()
        );
    }

    let content = interview.concatenated();
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => print!("{}", content),
    }
    Ok(())
}
