use crate::canonical::error::CanonicalizeError;
use crate::path::path_model::{CanonicalPath, SegIndex, Segment};
use crate::rules::tables::{PrefixKind, RuleTables};

// ============================================================================
// Name canonicalizer — raw label → canonical symbolic path
// ============================================================================

/// How a label matched the rule tables. The classifier keys its built-in /
/// custom decision off this, so it never has to re-parse the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// A reserved whole word, computed by the interview (`signature_date`).
    ReservedWord,
    /// A bare plural collection (`users`).
    PluralCollection,
    /// A declared singular unindexed object (`trial_court`).
    SingularObject,
    /// A user-declared custom person collection.
    CustomPerson,
    /// An indexed person reference with no attribute (`users[0]`).
    PersonReference,
    /// A person attribute (`users[2].birthdate.format()`).
    PersonAttribute,
    /// An indexed non-person sequence element (`docket_numbers[1]`).
    SequenceReference,
    /// An attribute of a singular object (`trial_court.address.county`).
    ObjectAttribute,
    /// No naming convention applied; the label is a free-form custom field.
    Unmatched,
}

/// The result of canonicalizing one raw label.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub path: CanonicalPath,
    pub matched: MatchKind,
}

/// Map one raw form label to a canonical symbolic path.
///
/// Deterministic and pure given the tables. Template-style dotted or
/// bracketed paths are trusted as canonical already and pass through with
/// only a root classification. Flat labels go through normalization,
/// exact-match short-circuits, and prefix/digits/suffix decomposition;
/// a label that matches no convention comes back unchanged — there are
/// no partial transforms.
pub fn canonicalize(tables: &RuleTables, raw: &str) -> Result<Resolution, CanonicalizeError> {
    // Structured paths bypass label rules entirely.
    if raw.contains('.') || raw.contains('[') || raw.contains('(') {
        if let Some(path) = CanonicalPath::parse(raw.trim()) {
            let matched = classify_structured(tables, &path);
            return Ok(Resolution { path, matched });
        }
    }

    let name = normalize(raw);
    if name.is_empty() {
        return Err(CanonicalizeError::EmptyLabel { label: raw.to_string() });
    }

    // Exact-match short circuits.
    if tables.is_reserved_word(&name) {
        return Ok(Resolution {
            path: CanonicalPath::ident(name),
            matched: MatchKind::ReservedWord,
        });
    }
    if tables.is_custom_person(&name) {
        return Ok(Resolution {
            path: CanonicalPath::ident(name),
            matched: MatchKind::CustomPerson,
        });
    }
    if tables.is_plural_collection(&name) {
        return Ok(Resolution {
            path: CanonicalPath::ident(name),
            matched: MatchKind::PluralCollection,
        });
    }
    if tables.is_singular_object(&name) {
        return Ok(Resolution {
            path: CanonicalPath::ident(name),
            matched: MatchKind::SingularObject,
        });
    }

    decompose(tables, &name).map(|resolution| {
        resolution.unwrap_or(Resolution {
            path: CanonicalPath::ident(name),
            matched: MatchKind::Unmatched,
        })
    })
}

/// Decompose `^(prefix)(digits?)(suffix)$` against the priority-ordered
/// prefix list. `Ok(None)` means no convention applied.
fn decompose(
    tables: &RuleTables,
    name: &str,
) -> Result<Option<Resolution>, CanonicalizeError> {
    for (prefix, kind) in tables.decomposition_prefixes() {
        let Some(rest) = name.strip_prefix(prefix.as_str()) else {
            continue;
        };

        match kind {
            PrefixKind::Person | PrefixKind::Sequence => {
                let digits_end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                let digits = &rest[..digits_end];
                let tail = &rest[digits_end..];

                // Word boundary: after the digits there must be a suffix
                // or nothing, otherwise this prefix mis-split the label.
                if !tail.is_empty() && !tail.starts_with('_') {
                    continue;
                }

                let index = parse_index(name, prefix, digits, tail)?;
                let plural = tables.pluralize(prefix).unwrap_or(prefix).to_string();
                let root = Segment {
                    name: plural,
                    index: Some(SegIndex::Num(index)),
                    call: false,
                };

                if tail.is_empty() {
                    let matched = match kind {
                        PrefixKind::Sequence => MatchKind::SequenceReference,
                        _ => MatchKind::PersonReference,
                    };
                    return Ok(Some(Resolution {
                        path: CanonicalPath::new(vec![root]),
                        matched,
                    }));
                }

                // Sequences carry no attributes; an unknown tail on a
                // sequence falls through as unmatched.
                if *kind == PrefixKind::Sequence {
                    return Ok(None);
                }

                return Ok(match attribute_segments(tables, tail) {
                    Some(attrs) => Some(Resolution {
                        path: CanonicalPath::new(vec![root]).join(&attrs),
                        matched: MatchKind::PersonAttribute,
                    }),
                    None => None,
                });
            }
            PrefixKind::Object => {
                if rest.is_empty() {
                    return Ok(Some(Resolution {
                        path: CanonicalPath::ident(prefix.clone()),
                        matched: MatchKind::SingularObject,
                    }));
                }
                if !rest.starts_with('_') {
                    continue;
                }
                return Ok(match attribute_segments(tables, rest) {
                    Some(attrs) => Some(Resolution {
                        path: CanonicalPath::ident(prefix.clone()).join(&attrs),
                        matched: MatchKind::ObjectAttribute,
                    }),
                    None => None,
                });
            }
        }
    }
    Ok(None)
}

fn parse_index(
    name: &str,
    prefix: &str,
    digits: &str,
    tail: &str,
) -> Result<usize, CanonicalizeError> {
    if digits.is_empty() {
        return Ok(0);
    }
    let value: usize = digits.parse().map_err(|_| CanonicalizeError::BadDigits {
        label: name.to_string(),
        digits: digits.to_string(),
    })?;
    if value == 0 {
        // A 1-based label miswritten as 0.
        return Err(CanonicalizeError::ZeroIndex {
            label: name.to_string(),
            suggestion: format!("{}1{}", prefix, tail),
        });
    }
    Ok(value - 1)
}

fn attribute_segments(tables: &RuleTables, suffix: &str) -> Option<Vec<Segment>> {
    let attr = tables.attribute_for_suffix(suffix)?;
    CanonicalPath::parse_attr(attr)
}

/// Root classification for an already-structured path.
fn classify_structured(tables: &RuleTables, path: &CanonicalPath) -> MatchKind {
    let root = path.root();
    if tables.is_custom_person(root) {
        return MatchKind::CustomPerson;
    }
    if tables.is_person_collection(root) {
        if path.is_bare() && path.segments[0].index.is_none() {
            MatchKind::PluralCollection
        } else if path.segments.len() == 1 {
            MatchKind::PersonReference
        } else {
            MatchKind::PersonAttribute
        }
    } else if tables.is_plural_collection(root) {
        if path.segments.len() == 1 && path.is_indexed() {
            MatchKind::SequenceReference
        } else {
            MatchKind::PluralCollection
        }
    } else if tables.is_singular_object(root) {
        if path.segments.len() == 1 {
            MatchKind::SingularObject
        } else {
            MatchKind::ObjectAttribute
        }
    } else if tables.is_reserved_word(root) && path.segments.len() == 1 {
        MatchKind::ReservedWord
    } else {
        MatchKind::Unmatched
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Clean a human-authored label: whitespace runs become `_`, illegal
/// characters are stripped, a leading digit run is dropped, and the
/// `__<digits>` repeat-appearance marker a form puts on a field shown on
/// several pages is removed. Idempotent.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_sep && !out.is_empty() {
                out.push('_');
            }
            last_was_sep = true;
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        }
        // anything else is an illegal character: dropped
    }

    // Strip the repeat-appearance marker: trailing `__` + digits.
    if let Some(pos) = out.rfind("__") {
        let tail = &out[pos + 2..];
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            out.truncate(pos);
        }
    }

    // Strip a leading digit run.
    let lead = out
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(out.len());
    if lead > 0 {
        out.drain(..lead);
    }

    // Collapse any trailing separator left behind.
    while out.ends_with('_') && !out.is_empty() {
        out.pop();
    }

    out
}

// ============================================================================
// Companion mappings — settable and full-display paths
// ============================================================================

/// The path that must be assigned to back a (possibly computed) display
/// path. `users[0].birthdate.format()` reads back a formatted date but is
/// populated by assigning `users[0].birthdate`.
pub fn settable_path(tables: &RuleTables, display: &CanonicalPath) -> CanonicalPath {
    let rendered = display.to_string();
    for (display_suffix, settable_suffix) in tables.settable_entries() {
        if let Some(stem) = rendered.strip_suffix(display_suffix) {
            if let Some(path) = CanonicalPath::parse(&format!("{}{}", stem, settable_suffix)) {
                return path;
            }
        }
    }
    // No mapping: a computed accessor with no settable entry is backed by
    // the slot it is called on.
    display.strip_trailing_calls()
}

/// The composed human-readable accessor for a bare object reference, used
/// when review output must read the object back as text.
pub fn full_display_path(tables: &RuleTables, bare: &CanonicalPath) -> CanonicalPath {
    if bare.segments.len() != 1 {
        return bare.clone();
    }
    match tables.full_display_accessor(bare.root()) {
        Some(accessor) => match CanonicalPath::parse_attr(accessor) {
            Some(attrs) => bare.join(&attrs),
            None => bare.clone(),
        },
        None => bare.clone(),
    }
}
