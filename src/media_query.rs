use std::fmt;

use smallvec::SmallVec;

use crate::error::MediaError;

/// Pixels per `em`/`rem` when a query is evaluated outside a browser.
pub const EM_PX: f64 = 16.0;

/// A media-query predicate such as `(min-width: 768px) and (max-width: 1024px)`.
///
/// The empty predicate stands for "all media" and always matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MediaQuery(String);

impl MediaQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    /// The empty predicate.
    pub fn all() -> Self {
        Self(String::new())
    }

    pub(crate) fn from_bounds(min: Option<&str>, max: Option<&str>) -> Self {
        let mut query = String::new();
        if let Some(min) = min {
            query.push_str("(min-width: ");
            query.push_str(min);
            query.push(')');
        }
        if let Some(max) = max {
            if !query.is_empty() {
                query.push_str(" and ");
            }
            query.push_str("(max-width: ");
            query.push_str(max);
            query.push(')');
        }
        Self(query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parses the width conditions of this predicate.
    ///
    /// Only `min-width` and `max-width` with `px`, `em` or `rem` lengths are
    /// understood, joined by `and`.
    pub fn conditions(&self) -> Result<SmallVec<[WidthCondition; 2]>, MediaError> {
        let mut conditions = SmallVec::new();
        let mut rest = self.0.trim();
        while !rest.is_empty() {
            let Some(body) = rest.strip_prefix('(') else {
                return Err(MediaError::invalid(&self.0, "expected `(`"));
            };
            let Some((feature, tail)) = body.split_once(')') else {
                return Err(MediaError::invalid(&self.0, "unclosed `(`"));
            };
            conditions.push(self.condition(feature)?);

            rest = tail.trim_start();
            if rest.is_empty() {
                break;
            }
            // `and(` would be a function call, not the keyword.
            let after_and = rest
                .get(..3)
                .filter(|word| word.eq_ignore_ascii_case("and"))
                .and_then(|_| rest[3..].strip_prefix(char::is_whitespace));
            rest = match after_and {
                Some(after) => after.trim_start(),
                None => return Err(MediaError::invalid(&self.0, "expected `and`")),
            };
            if rest.is_empty() {
                return Err(MediaError::invalid(&self.0, "dangling `and`"));
            }
        }
        Ok(conditions)
    }

    fn condition(&self, feature: &str) -> Result<WidthCondition, MediaError> {
        let Some((name, value)) = feature.split_once(':') else {
            return Err(MediaError::invalid(&self.0, "expected `feature: value`"));
        };
        let px = self.length(value.trim())?;
        match name.trim().to_ascii_lowercase().as_str() {
            "min-width" => Ok(WidthCondition::Min(px)),
            "max-width" => Ok(WidthCondition::Max(px)),
            other => Err(MediaError::invalid(
                &self.0,
                format!("unsupported media feature `{other}`"),
            )),
        }
    }

    fn length(&self, value: &str) -> Result<f64, MediaError> {
        let (number, scale) = if let Some(n) = strip_unit(value, "px") {
            (n, 1.0)
        } else if let Some(n) = strip_unit(value, "rem") {
            (n, EM_PX)
        } else if let Some(n) = strip_unit(value, "em") {
            (n, EM_PX)
        } else if value == "0" {
            (value, 1.0)
        } else {
            return Err(MediaError::invalid(
                &self.0,
                format!("unsupported length `{value}`"),
            ));
        };
        number
            .trim()
            .parse::<f64>()
            .map(|n| n * scale)
            .map_err(|_| MediaError::invalid(&self.0, format!("bad number in `{value}`")))
    }

    /// Evaluates the predicate against a viewport `width` in pixels.
    pub fn evaluate_width(&self, width: f64) -> Result<bool, MediaError> {
        Ok(self.conditions()?.iter().all(|c| c.matches(width)))
    }
}

/// CSS units are case-insensitive.
fn strip_unit<'a>(value: &'a str, unit: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(unit.len())?;
    let (number, suffix) = (value.get(..split)?, value.get(split..)?);
    suffix.eq_ignore_ascii_case(unit).then_some(number)
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MediaQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

/// One inclusive width bound, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidthCondition {
    Min(f64),
    Max(f64),
}

impl WidthCondition {
    pub fn matches(&self, width: f64) -> bool {
        match *self {
            WidthCondition::Min(min) => width >= min,
            WidthCondition::Max(max) => width <= max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaQuery, WidthCondition};
    use crate::error::MediaError;

    #[test]
    fn empty_matches_everything() {
        let q = MediaQuery::all();
        assert!(q.conditions().unwrap().is_empty());
        assert!(q.evaluate_width(0.0).unwrap());
        assert!(q.evaluate_width(10_000.0).unwrap());
    }

    #[test]
    fn inclusive_bounds() {
        let q = MediaQuery::new("(min-width: 768px) and (max-width: 1024px)");
        assert!(!q.evaluate_width(767.0).unwrap());
        assert!(q.evaluate_width(768.0).unwrap());
        assert!(q.evaluate_width(1024.0).unwrap());
        assert!(!q.evaluate_width(1024.5).unwrap());
    }

    #[test]
    fn relative_units() {
        let q = MediaQuery::new("(min-width: 48em)");
        assert_eq!(q.conditions().unwrap().as_slice(), [WidthCondition::Min(768.0)]);
        let q = MediaQuery::new("(MAX-WIDTH: 2.5rem)");
        assert_eq!(q.conditions().unwrap().as_slice(), [WidthCondition::Max(40.0)]);
        let q = MediaQuery::new("(min-width:0)");
        assert!(q.evaluate_width(0.0).unwrap());
        let q = MediaQuery::new("(min-width: 10PX) AND (max-width: 2Em)");
        assert_eq!(
            q.conditions().unwrap().as_slice(),
            [WidthCondition::Min(10.0), WidthCondition::Max(32.0)]
        );
    }

    #[test]
    fn malformed() {
        for bad in [
            "min-width: 10px",
            "(min-width: 10px",
            "(min-width: 10px) or (max-width: 20px)",
            "(min-width: 10px) and",
            "(min-width: 10px) and(max-width: 20px)",
            "(min-width: 10px) andy (max-width: 20px)",
            "(orientation: landscape)",
            "(min-width: 10vw)",
            "(min-width: tenpx)",
            "(min-width)",
        ] {
            let err = MediaQuery::new(bad).conditions().unwrap_err();
            assert!(
                matches!(err, MediaError::InvalidQuery { ref query, .. } if query == bad),
                "{bad}: {err}"
            );
        }
    }
}
