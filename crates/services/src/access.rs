//! Deciding what a user may open, at the point content is rendered.
//!
//! The tier policy itself lives in `compass_core::model::can_access_training`.
//! Preview lessons are handled here, before the tier is ever consulted.

use compass_core::model::{AccessLevel, AccessTier, Course, Lesson, Resource, can_access_training};

/// Outcome of an access check, for choosing between content and a lock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    /// Opened through a preview flag.
    Preview,
    /// The user needs a higher subscription for `required`.
    Locked { required: AccessTier },
}

impl Gate {
    #[must_use]
    pub fn is_open(self) -> bool {
        !matches!(self, Gate::Locked { .. })
    }

    fn for_tier(tier: AccessTier, level: Option<AccessLevel>) -> Self {
        if can_access_training(tier, level) {
            Gate::Open
        } else {
            Gate::Locked { required: tier }
        }
    }
}

#[must_use]
pub fn lesson_gate(lesson: &Lesson, level: Option<AccessLevel>) -> Gate {
    if lesson.is_preview {
        return Gate::Preview;
    }
    Gate::for_tier(lesson.access_tier, level)
}

#[must_use]
pub fn resource_gate(resource: &Resource, level: Option<AccessLevel>) -> Gate {
    Gate::for_tier(resource.access_tier, level)
}

/// Gate for a course landing page.
///
/// A locked course still opens as `Preview` when it has a preview lesson.
#[must_use]
pub fn course_gate(course: &Course, level: Option<AccessLevel>) -> Gate {
    match Gate::for_tier(course.access_tier, level) {
        Gate::Locked { .. } if course.lessons.iter().any(|l| l.is_preview) => Gate::Preview,
        gate => gate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn preview_lesson_opens_without_subscription() {
        let catalog = Catalog::builtin();
        let course = catalog.course_by_slug("ai-accessible-resources").unwrap();
        let first = course.first_lesson().unwrap();
        assert!(first.is_preview);
        assert_eq!(lesson_gate(first, None), Gate::Preview);
        assert_eq!(lesson_gate(first, Some(AccessLevel::Pulse)), Gate::Preview);
    }

    #[test]
    fn included_lesson_is_locked_for_pulse() {
        let catalog = Catalog::builtin();
        let course = catalog.course_by_slug("ai-accessible-resources").unwrap();
        let second = &course.lessons[1];
        assert_eq!(
            lesson_gate(second, Some(AccessLevel::Pulse)),
            Gate::Locked {
                required: AccessTier::Included
            }
        );
        assert_eq!(lesson_gate(second, Some(AccessLevel::DeepDive)), Gate::Open);
    }

    #[test]
    fn free_resource_is_open_to_everyone() {
        let catalog = Catalog::builtin();
        let guide = catalog.resource_by_slug("alt-text-guide").unwrap();
        assert_eq!(resource_gate(guide, None), Gate::Open);

        let template = catalog.resource_by_slug("diap-template").unwrap();
        assert!(!resource_gate(template, Some(AccessLevel::Pulse)).is_open());
    }

    #[test]
    fn course_gate_falls_back_to_preview() {
        let catalog = Catalog::builtin();
        let premises = catalog.course_by_slug("accessible-premises").unwrap();
        assert!(!course_gate(premises, None).is_open());

        let customers = catalog.course_by_slug("welcoming-customers").unwrap();
        assert_eq!(course_gate(customers, None), Gate::Preview);
        assert_eq!(course_gate(customers, Some(AccessLevel::DeepDive)), Gate::Open);

        let foundations = catalog.course_by_slug("diap-foundations").unwrap();
        assert_eq!(course_gate(foundations, None), Gate::Open);
    }
}
