use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Rule tables — static naming conventions, built once and passed by reference
// ============================================================================

/// What a decomposition prefix denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixKind {
    /// A person-like collection (takes indices and attribute suffixes).
    Person,
    /// A singular object (no index, attribute suffixes allowed).
    Object,
    /// A non-person list (takes indices, no attribute suffixes).
    Sequence,
}

/// Immutable naming-rule tables consumed by the canonicalizer and classifier.
///
/// Built once via [`RuleTables::standard`]. Tenant-specific person
/// collections are layered on with [`RuleTables::with_custom_people`], which
/// returns a new table set; nothing here is ever mutated in place, so one
/// instance can serve concurrent resolution passes.
#[derive(Debug, Clone)]
pub struct RuleTables {
    /// Singular prefixes tried against `^(prefix)(digits?)(suffix)$`,
    /// priority-ordered: longer entries first, so `guardian_ad_litem`
    /// always wins over `guardian`.
    decomposition_prefixes: Vec<(String, PrefixKind)>,

    /// Singular prefix → plural collection name.
    pluralizers: BTreeMap<String, String>,

    /// Plural collection names (values of `pluralizers`), for exact matches.
    plural_collections: BTreeSet<String>,

    /// Labels that are canonical as-is and computed by the interview
    /// rather than asked (e.g. `signature_date`).
    reserved_whole_words: BTreeSet<String>,

    /// Singular unindexed objects (`trial_court`).
    singular_objects: BTreeSet<String>,

    /// Trailing label suffix → display attribute path (`_birthdate` →
    /// `.birthdate.format()`). Looked up by exact suffix after the
    /// prefix+digits split.
    suffix_map: BTreeMap<String, String>,

    /// Display accessor suffix → assignable suffix (`.birthdate.format()`
    /// → `.birthdate`). Identity for anything not listed.
    settable_map: BTreeMap<String, String>,

    /// Root class → accessor appended when a bare object reference must
    /// read back as human text (person → `.name.full()`).
    full_display_map: BTreeMap<String, String>,

    /// Pseudo-names the template extractor never resolves or emits.
    ignored_template_names: BTreeSet<String>,

    /// User-declared custom person collections (plural form).
    custom_people: BTreeSet<String>,

    /// Estimated character capacity above which a text widget is
    /// classified as a multi-line area.
    area_threshold: usize,
}

/// Default capacity cutoff between single-line text and a multi-line area.
const DEFAULT_AREA_THRESHOLD: usize = 100;

/// The built-in person collections, singular → plural.
const PEOPLE: &[(&str, &str)] = &[
    ("user", "users"),
    ("other_party", "other_parties"),
    ("child", "children"),
    ("plaintiff", "plaintiffs"),
    ("defendant", "defendants"),
    ("petitioner", "petitioners"),
    ("respondent", "respondents"),
    ("spouse", "spouses"),
    ("parent", "parents"),
    ("caregiver", "caregivers"),
    ("attorney", "attorneys"),
    ("translator", "translators"),
    ("debt_collector", "debt_collectors"),
    ("creditor", "creditors"),
    ("witness", "witnesses"),
    ("guardian_ad_litem", "guardians_ad_litem"),
    ("guardian", "guardians"),
    ("decedent", "decedents"),
    ("interested_party", "interested_parties"),
];

/// Non-person indexed sequences, singular → plural.
const SEQUENCES: &[(&str, &str)] = &[("docket_number", "docket_numbers")];

/// Singular unindexed objects.
const OBJECTS: &[&str] = &["trial_court"];

/// Whole words that are canonical as-is and computed, never asked.
const RESERVED_WORDS: &[&str] = &["signature_date", "today_date", "current_date"];

/// Label suffix → display attribute path.
const SUFFIXES: &[(&str, &str)] = &[
    ("_name", ".name.full()"),
    ("_name_full", ".name.full()"),
    ("_name_first", ".name.first"),
    ("_name_middle", ".name.middle"),
    ("_name_last", ".name.last"),
    ("_name_suffix", ".name.suffix"),
    ("_gender", ".gender"),
    ("_birthdate", ".birthdate.format()"),
    ("_age", ".age_in_years()"),
    ("_email", ".email"),
    ("_phone", ".phone_number"),
    ("_phone_number", ".phone_number"),
    ("_mobile", ".mobile_number"),
    ("_mobile_number", ".mobile_number"),
    ("_address", ".address.block()"),
    ("_address_block", ".address.block()"),
    ("_address_street", ".address.address"),
    ("_address_street2", ".address.unit"),
    ("_address_unit", ".address.unit"),
    ("_address_city", ".address.city"),
    ("_address_state", ".address.state"),
    ("_address_zip", ".address.zip"),
    ("_address_county", ".address.county"),
    ("_address_country", ".address.country"),
    ("_address_on_one_line", ".address.on_one_line()"),
    ("_address_line_one", ".address.line_one()"),
    ("_address_city_state_zip", ".address.line_two()"),
    ("_city", ".address.city"),
    ("_county", ".address.county"),
    ("_state", ".address.state"),
    ("_zip", ".address.zip"),
    ("_signature", ".signature"),
];

/// Display accessor suffix → the suffix that must actually be assigned.
const SETTABLE: &[(&str, &str)] = &[
    (".name.full()", ".name.first"),
    (".birthdate.format()", ".birthdate"),
    (".age_in_years()", ".birthdate"),
    (".address.block()", ".address.address"),
    (".address.on_one_line()", ".address.address"),
    (".address.line_one()", ".address.address"),
    (".address.line_two()", ".address.city"),
];

/// Template pseudo-names: loop metadata and engine built-ins.
const IGNORED_TEMPLATE_NAMES: &[&str] = &[
    "loop", "range", "namespace", "super", "lipsum", "cycler", "joiner",
    "dict", "true", "false", "none", "nan", "undefined",
];

impl RuleTables {
    /// The standard rule set.
    pub fn standard() -> Self {
        let mut pluralizers = BTreeMap::new();
        let mut decomposition: Vec<(String, PrefixKind)> = Vec::new();

        for (singular, plural) in PEOPLE {
            pluralizers.insert(singular.to_string(), plural.to_string());
            decomposition.push((singular.to_string(), PrefixKind::Person));
        }
        for (singular, plural) in SEQUENCES {
            pluralizers.insert(singular.to_string(), plural.to_string());
            decomposition.push((singular.to_string(), PrefixKind::Sequence));
        }
        for object in OBJECTS {
            decomposition.push((object.to_string(), PrefixKind::Object));
        }

        sort_by_priority(&mut decomposition);

        let plural_collections = pluralizers.values().cloned().collect();

        let mut full_display_map = BTreeMap::new();
        for (_, plural) in PEOPLE {
            full_display_map.insert(plural.to_string(), ".name.full()".to_string());
        }
        full_display_map.insert("trial_court".to_string(), ".name".to_string());

        RuleTables {
            decomposition_prefixes: decomposition,
            pluralizers,
            plural_collections,
            reserved_whole_words: RESERVED_WORDS.iter().map(|s| s.to_string()).collect(),
            singular_objects: OBJECTS.iter().map(|s| s.to_string()).collect(),
            suffix_map: SUFFIXES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            settable_map: SETTABLE
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            full_display_map,
            ignored_template_names: IGNORED_TEMPLATE_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            custom_people: BTreeSet::new(),
            area_threshold: DEFAULT_AREA_THRESHOLD,
        }
    }

    /// A new table set with a different text/area capacity cutoff.
    pub fn with_area_threshold(&self, threshold: usize) -> Self {
        let mut out = self.clone();
        out.area_threshold = threshold;
        out
    }

    /// A new table set with tenant-declared person collections layered on.
    ///
    /// `names` are plural collection names (`grantors`). Each also gains a
    /// derived singular decomposition prefix so flat labels like
    /// `grantor2_name` resolve.
    pub fn with_custom_people<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = self.clone();
        for name in names {
            let plural = name.as_ref().trim().to_string();
            if plural.is_empty() {
                continue;
            }
            let singular = depluralize(&plural);
            out.custom_people.insert(plural.clone());
            out.plural_collections.insert(plural.clone());
            out.pluralizers.insert(singular.clone(), plural.clone());
            out.full_display_map
                .insert(plural.clone(), ".name.full()".to_string());
            if !out
                .decomposition_prefixes
                .iter()
                .any(|(p, _)| p == &singular)
            {
                out.decomposition_prefixes
                    .push((singular, PrefixKind::Person));
            }
        }
        sort_by_priority(&mut out.decomposition_prefixes);
        out
    }

    // ---- lookups -----------------------------------------------------------

    pub fn decomposition_prefixes(&self) -> &[(String, PrefixKind)] {
        &self.decomposition_prefixes
    }

    pub fn pluralize(&self, singular: &str) -> Option<&str> {
        self.pluralizers.get(singular).map(|s| s.as_str())
    }

    pub fn is_plural_collection(&self, name: &str) -> bool {
        self.plural_collections.contains(name)
    }

    pub fn is_reserved_word(&self, name: &str) -> bool {
        self.reserved_whole_words.contains(name)
    }

    pub fn is_singular_object(&self, name: &str) -> bool {
        self.singular_objects.contains(name)
    }

    pub fn is_custom_person(&self, name: &str) -> bool {
        self.custom_people.contains(name)
    }

    /// True if `name` is the plural of a person collection, built-in or custom.
    pub fn is_person_collection(&self, name: &str) -> bool {
        self.custom_people.contains(name)
            || PEOPLE.iter().any(|(_, plural)| *plural == name)
    }

    /// True if `name` is a known singular person prefix.
    pub fn is_person_singular(&self, name: &str) -> bool {
        self.decomposition_prefixes
            .iter()
            .any(|(p, kind)| *kind == PrefixKind::Person && p == name)
    }

    pub fn attribute_for_suffix(&self, suffix: &str) -> Option<&str> {
        self.suffix_map.get(suffix).map(|s| s.as_str())
    }

    /// Iterate display suffix table entries (suffix, attribute path).
    pub fn suffix_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.suffix_map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The assignable suffix backing a display accessor suffix, if mapped.
    pub fn settable_for_display(&self, display_suffix: &str) -> Option<&str> {
        self.settable_map.get(display_suffix).map(|s| s.as_str())
    }

    pub fn settable_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settable_map
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Accessor appended to a bare root for human-readable review text.
    pub fn full_display_accessor(&self, root: &str) -> Option<&str> {
        self.full_display_map.get(root).map(|s| s.as_str())
    }

    pub fn is_ignored_template_name(&self, name: &str) -> bool {
        self.ignored_template_names.contains(name)
    }

    pub fn area_threshold(&self) -> usize {
        self.area_threshold
    }

    /// Attribute chains that mark a root as person-like when seen in
    /// template paths (`grantor.name.first` → candidate collection).
    pub fn person_attribute_roots(&self) -> &'static [&'static str] {
        &[
            "name",
            "address",
            "birthdate",
            "email",
            "phone_number",
            "mobile_number",
            "signature",
            "gender",
            "age_in_years",
        ]
    }
}

/// Longest prefix first; alphabetical within a length for determinism.
fn sort_by_priority(prefixes: &mut [(String, PrefixKind)]) {
    prefixes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
}

/// Best-effort singular of a declared plural collection name.
fn depluralize(plural: &str) -> String {
    if let Some(stem) = plural.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = plural.strip_suffix("ses") {
        stem.to_string()
    } else if let Some(stem) = plural.strip_suffix('s') {
        stem.to_string()
    } else {
        plural.to_string()
    }
}
