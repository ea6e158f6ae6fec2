//! Locale reference data and `hl`/`gl` validation.
//!
//! The bundled country and language lists are parsed once on first use and
//! shared read-only for the rest of the process.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use serde_json::Value;

const BUNDLED_COUNTRIES: &str = include_str!("../data/google-countries.json");
const BUNDLED_LANGUAGES: &str = include_str!("../data/google-languages.json");

static COUNTRIES: OnceLock<ReferenceCodeSet> = OnceLock::new();
static LANGUAGES: OnceLock<ReferenceCodeSet> = OnceLock::new();

/// Which list a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleKind {
    /// `gl`, e.g. `us`
    Country,
    /// `hl`, e.g. `en`
    Language,
}

impl LocaleKind {
    fn code_field(self) -> &'static str {
        match self {
            Self::Country => "country_code",
            Self::Language => "language_code",
        }
    }

    fn name_field(self) -> &'static str {
        match self {
            Self::Country => "country_name",
            Self::Language => "language_name",
        }
    }

    /// Query parameter the code travels in.
    pub fn param(self) -> &'static str {
        match self {
            Self::Country => "gl",
            Self::Language => "hl",
        }
    }

    /// Canonical list published by SerpApi.
    pub fn docs_url(self) -> &'static str {
        match self {
            Self::Country => "https://serpapi.com/google-countries",
            Self::Language => "https://serpapi.com/google-languages",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Language => "language",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("reference data is not a JSON array of records: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record {index} has no string `{field}`")]
    MissingField { field: &'static str, index: usize },
}

/// Immutable set of locale codes with their display names.
#[derive(Debug, Clone)]
pub struct ReferenceCodeSet {
    kind: LocaleKind,
    names: BTreeMap<String, String>,
}

impl ReferenceCodeSet {
    /// Parse a JSON array of records carrying `country_code`/`language_code`
    /// (and optionally `country_name`/`language_name`).
    ///
    /// ```
    /// use serp_google::locale::{LocaleKind, ReferenceCodeSet};
    ///
    /// let set = ReferenceCodeSet::from_json_str(
    ///     LocaleKind::Country,
    ///     r#"[{"country_code": "us", "country_name": "United States"}]"#,
    /// ).unwrap();
    /// assert!(set.contains("us"));
    /// assert_eq!(set.name_of("us"), Some("United States"));
    /// ```
    pub fn from_json_str(kind: LocaleKind, raw: &str) -> Result<Self, ReferenceDataError> {
        let records: Vec<Value> = serde_json::from_str(raw)?;
        let mut names = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            let code = record
                .get(kind.code_field())
                .and_then(Value::as_str)
                .ok_or(ReferenceDataError::MissingField {
                    field: kind.code_field(),
                    index,
                })?;
            let name = record
                .get(kind.name_field())
                .and_then(Value::as_str)
                .unwrap_or_default();
            names.insert(code.to_string(), name.to_string());
        }
        Ok(Self { kind, names })
    }

    /// Load a dataset from disk.
    pub fn from_path(kind: LocaleKind, path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(kind, &raw)
    }

    pub fn kind(&self) -> LocaleKind {
        self.kind
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    /// Display name, if the dataset carried one.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.names
            .get(code)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    /// `(code, name)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn bundled(kind: LocaleKind, raw: &str) -> ReferenceCodeSet {
    let set = ReferenceCodeSet::from_json_str(kind, raw)
        .expect("bundled reference data is valid JSON with a code on every record");
    tracing::debug!(kind = ?kind, codes = set.len(), "locale.reference_loaded");
    set
}

/// Countries accepted as `gl`.
pub fn countries() -> &'static ReferenceCodeSet {
    COUNTRIES.get_or_init(|| bundled(LocaleKind::Country, BUNDLED_COUNTRIES))
}

/// Languages accepted as `hl`.
pub fn languages() -> &'static ReferenceCodeSet {
    LANGUAGES.get_or_init(|| bundled(LocaleKind::Language, BUNDLED_LANGUAGES))
}

/// Non-fatal notice that a locale code is not in the reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleAdvisory {
    pub kind: LocaleKind,
    pub code: String,
}

impl fmt::Display for LocaleAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid '{}' parameter: {}. Please refer to {} for a list of valid {} codes.",
            self.kind.param(),
            self.code,
            self.kind.docs_url(),
            self.kind.noun()
        )
    }
}

/// Check `hl` and `gl` against the bundled lists.
///
/// Returns one advisory per unknown code, language first. Callers keep going
/// regardless; the upstream API is the final judge.
pub fn validate_locale(hl: &str, gl: &str) -> Vec<LocaleAdvisory> {
    validate_against(languages(), countries(), hl, gl)
}

/// [`validate_locale`] against caller-supplied sets.
pub fn validate_against(
    languages: &ReferenceCodeSet,
    countries: &ReferenceCodeSet,
    hl: &str,
    gl: &str,
) -> Vec<LocaleAdvisory> {
    let mut out = Vec::new();
    for (set, code) in [(languages, hl), (countries, gl)] {
        if !set.contains(code) {
            tracing::info!(param = set.kind().param(), code, "locale.invalid");
            out.push(LocaleAdvisory {
                kind: set.kind(),
                code: code.to_string(),
            });
        }
    }
    out
}
