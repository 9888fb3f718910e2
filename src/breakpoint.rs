//! Named breakpoint definitions.
//!
//! A [`BreakpointMap`] associates a name such as `"md"` with a
//! [`BreakpointSpec`]. A definition is turned into a [`MediaQuery`] only when a
//! query for that name is evaluated, so malformed entries never fail
//! construction.

use indexmap::IndexMap;

use crate::{error::ConfigError, media_query::MediaQuery};

/// Width condition for a single breakpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BreakpointSpec {
    /// Matches viewports at least this wide, e.g. `"768px"`.
    MinWidth(String),
    /// Inclusive width range. Either bound may be missing; an empty string
    /// counts as missing.
    Range {
        min: Option<String>,
        max: Option<String>,
    },
    /// A definition of some other shape, kept so it degrades to the empty
    /// predicate instead of failing to load.
    Unrecognized,
}

impl BreakpointSpec {
    pub fn min_width(min: impl Into<String>) -> Self {
        Self::MinWidth(min.into())
    }

    pub fn max_width(max: impl Into<String>) -> Self {
        Self::Range {
            min: None,
            max: Some(max.into()),
        }
    }

    pub fn between(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Builds the media-query predicate for this breakpoint.
    ///
    /// ```
    /// # use floem_breakpoints::BreakpointSpec;
    /// let spec = BreakpointSpec::between("768px", "1024px");
    /// assert_eq!(
    ///     spec.predicate().as_str(),
    ///     "(min-width: 768px) and (max-width: 1024px)"
    /// );
    /// ```
    pub fn predicate(&self) -> MediaQuery {
        match self {
            BreakpointSpec::MinWidth(min) => MediaQuery::from_bounds(Some(min.as_str()), None),
            BreakpointSpec::Range { min, max } => {
                MediaQuery::from_bounds(bound(min), bound(max))
            }
            BreakpointSpec::Unrecognized => MediaQuery::all(),
        }
    }
}

fn bound(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl From<&str> for BreakpointSpec {
    fn from(min: &str) -> Self {
        Self::MinWidth(min.to_string())
    }
}

impl From<String> for BreakpointSpec {
    fn from(min: String) -> Self {
        Self::MinWidth(min)
    }
}

/// Ordered set of uniquely named breakpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreakpointMap {
    screens: IndexMap<String, BreakpointSpec>,
}

impl BreakpointMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a breakpoint, refusing to replace an existing one.
    pub fn try_insert(
        &mut self,
        name: impl Into<String>,
        spec: impl Into<BreakpointSpec>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.screens.contains_key(&name) {
            return Err(ConfigError::DuplicateBreakpoint(name));
        }
        self.screens.insert(name, spec.into());
        Ok(())
    }

    pub fn try_from_iter<N, S>(
        iter: impl IntoIterator<Item = (N, S)>,
    ) -> Result<Self, ConfigError>
    where
        N: Into<String>,
        S: Into<BreakpointSpec>,
    {
        let mut map = Self::new();
        for (name, spec) in iter {
            map.try_insert(name, spec)?;
        }
        Ok(map)
    }

    /// Loads breakpoints from a JSON object such as
    /// `{"md": "768px", "tablet": {"min": "640px", "max": "1023px"}}`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: de::Entries = serde_json::from_str(json)?;
        Self::try_from_iter(entries.0)
    }

    /// The Tailwind CSS default screens, all expressed as minimum widths.
    pub fn tailwind() -> Self {
        Self::from_table(&[
            ("sm", "640px"),
            ("md", "768px"),
            ("lg", "1024px"),
            ("xl", "1280px"),
            ("2xl", "1536px"),
        ])
    }

    /// Grid breakpoints at 576, 768, 992, 1200 and 1400 pixels. Every
    /// breakpoint covers its own band only, so exactly one matches at a time.
    /// Upper bounds sit 0.02px below the next threshold to keep the bands
    /// from overlapping on fractional widths.
    pub fn bootstrap() -> Self {
        let mut map = Self::new();
        let bands = [
            ("xs", None, Some("575.98px")),
            ("sm", Some("576px"), Some("767.98px")),
            ("md", Some("768px"), Some("991.98px")),
            ("lg", Some("992px"), Some("1199.98px")),
            ("xl", Some("1200px"), Some("1399.98px")),
            ("xxl", Some("1400px"), None),
        ];
        for (name, min, max) in bands {
            map.screens.insert(
                name.to_string(),
                BreakpointSpec::Range {
                    min: min.map(str::to_string),
                    max: max.map(str::to_string),
                },
            );
        }
        map
    }

    fn from_table(table: &[(&str, &str)]) -> Self {
        let screens = table
            .iter()
            .map(|(name, min)| (name.to_string(), BreakpointSpec::from(*min)))
            .collect();
        Self { screens }
    }

    pub fn get(&self, name: &str) -> Option<&BreakpointSpec> {
        self.screens.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.screens.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.screens.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Predicate for `name`. Unknown names produce the empty predicate.
    pub fn predicate(&self, name: &str) -> MediaQuery {
        self.get(name)
            .map(BreakpointSpec::predicate)
            .unwrap_or_else(MediaQuery::all)
    }
}

#[cfg(feature = "serde")]
mod de {
    use std::fmt;

    use serde::{
        Deserialize, Deserializer,
        de::{self, IgnoredAny, MapAccess, Visitor},
    };
    use serde_json::{Map, Value};

    use super::{BreakpointMap, BreakpointSpec};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSpec {
        MinWidth(String),
        Range(Map<String, Value>),
        Other(IgnoredAny),
    }

    impl<'de> Deserialize<'de> for BreakpointSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let spec = match RawSpec::deserialize(deserializer)? {
                RawSpec::MinWidth(min) => BreakpointSpec::MinWidth(min),
                RawSpec::Range(fields) => {
                    let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
                    BreakpointSpec::Range {
                        min: text("min"),
                        max: text("max"),
                    }
                }
                RawSpec::Other(_) => BreakpointSpec::Unrecognized,
            };
            Ok(spec)
        }
    }

    /// Map entries in document order, duplicates included, so the caller can
    /// report which key repeats.
    pub(super) struct Entries(pub(super) Vec<(String, BreakpointSpec)>);

    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Entries;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of breakpoint names to definitions")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Entries, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, BreakpointSpec>()? {
                entries.push(entry);
            }
            Ok(Entries(entries))
        }
    }

    impl<'de> Deserialize<'de> for Entries {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(EntriesVisitor)
        }
    }

    impl<'de> Deserialize<'de> for BreakpointMap {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let entries = Entries::deserialize(deserializer)?;
            BreakpointMap::try_from_iter(entries.0).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BreakpointMap, BreakpointSpec};
    use crate::error::ConfigError;

    #[test]
    fn min_width_string() {
        let spec = BreakpointSpec::from("768px");
        assert_eq!(spec.predicate().as_str(), "(min-width: 768px)");
    }

    #[test]
    fn range_variants() {
        assert_eq!(
            BreakpointSpec::Range {
                min: Some("768px".into()),
                max: None
            }
            .predicate()
            .as_str(),
            "(min-width: 768px)"
        );
        assert_eq!(
            BreakpointSpec::max_width("1024px").predicate().as_str(),
            "(max-width: 1024px)"
        );
        assert_eq!(
            BreakpointSpec::between("768px", "1024px").predicate().as_str(),
            "(min-width: 768px) and (max-width: 1024px)"
        );
    }

    #[test]
    fn empty_range_is_empty_predicate() {
        let spec = BreakpointSpec::Range {
            min: None,
            max: None,
        };
        assert_eq!(spec.predicate().as_str(), "");
        assert!(spec.predicate().is_all());
    }

    #[test]
    fn empty_bounds_count_as_missing() {
        let spec = BreakpointSpec::Range {
            min: Some(String::new()),
            max: Some("600px".into()),
        };
        assert_eq!(spec.predicate().as_str(), "(max-width: 600px)");
    }

    #[test]
    fn unrecognized_and_unknown_degrade() {
        assert_eq!(BreakpointSpec::Unrecognized.predicate().as_str(), "");
        let map = BreakpointMap::tailwind();
        assert_eq!(map.predicate("nonexistent").as_str(), "");
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut map = BreakpointMap::new();
        map.try_insert("md", "768px").unwrap();
        let err = map.try_insert("md", "800px").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateBreakpoint(name) if name == "md"));
        assert_eq!(map.get("md"), Some(&BreakpointSpec::from("768px")));
    }

    #[test]
    fn tailwind_preset() {
        let map = BreakpointMap::tailwind();
        assert_eq!(
            map.names().collect::<Vec<_>>(),
            ["sm", "md", "lg", "xl", "2xl"]
        );
        assert_eq!(map.predicate("2xl").as_str(), "(min-width: 1536px)");
    }

    #[test]
    fn bootstrap_preset() {
        let map = BreakpointMap::bootstrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map.predicate("xs").as_str(), "(max-width: 575.98px)");
        assert_eq!(
            map.predicate("md").as_str(),
            "(min-width: 768px) and (max-width: 991.98px)"
        );
        assert_eq!(map.predicate("xxl").as_str(), "(min-width: 1400px)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_shapes() {
        let map = BreakpointMap::from_json(
            r#"{
                "md": "768px",
                "tablet": {"min": "640px", "max": "1023px"},
                "phone": {"max": "639px"},
                "blank": {},
                "odd": 42,
                "list": ["1px", "2px"]
            }"#,
        )
        .unwrap();

        assert_eq!(
            map.names().collect::<Vec<_>>(),
            ["md", "tablet", "phone", "blank", "odd", "list"]
        );
        assert_eq!(map.predicate("md").as_str(), "(min-width: 768px)");
        assert_eq!(
            map.predicate("tablet").as_str(),
            "(min-width: 640px) and (max-width: 1023px)"
        );
        assert_eq!(map.predicate("phone").as_str(), "(max-width: 639px)");
        assert_eq!(map.predicate("blank").as_str(), "");
        assert_eq!(map.get("odd"), Some(&BreakpointSpec::Unrecognized));
        assert_eq!(map.get("list"), Some(&BreakpointSpec::Unrecognized));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_duplicate_key() {
        let err = BreakpointMap::from_json(r#"{"md": "768px", "md": "800px"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateBreakpoint(name) if name == "md"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_not_an_object() {
        let err = BreakpointMap::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
