use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Identifier of a course in the catalog (e.g. `course-ai-accessible-resources`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

/// Identifier of a lesson, unique within its course.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

/// Identifier of a standalone resource (guide, checklist, template).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Wraps a raw identifier without validation.
            ///
            /// Use `str::parse` when the value comes from user input.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    };
}

string_id!(CourseId);
string_id!(LessonId);
string_id!(ResourceId);

// ─── Errors ────────────────────────────────────────────────────────────────────

/// Error returned when an identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} cannot be empty")]
pub struct ParseIdError {
    kind: &'static str,
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn course_id_display_is_raw_value() {
        let id = CourseId::new("course-ai-accessible-resources");
        assert_eq!(id.to_string(), "course-ai-accessible-resources");
        assert_eq!(format!("{id:?}"), "CourseId(course-ai-accessible-resources)");
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        let id: LessonId = "  lesson-1-why-accessible ".parse().unwrap();
        assert_eq!(id.as_str(), "lesson-1-why-accessible");

        let err = "   ".parse::<ResourceId>().unwrap_err();
        assert_eq!(err.to_string(), "ResourceId cannot be empty");
    }

    #[test]
    fn ids_can_be_looked_up_by_str() {
        let mut map = HashMap::new();
        map.insert(CourseId::new("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&LessonId::new("l1")).unwrap();
        assert_eq!(json, "\"l1\"");
    }
}
