//! Read-only lookup and search over courses and resources.

use std::collections::HashMap;

use compass_core::model::{Category, Course, CourseId, Lesson, LessonId, Resource, ResourceId};

mod categories;
mod content;

pub use categories::{CATEGORY_CONFIGS, CategoryConfig, category_config};

/// Courses and resources matching a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults<'a> {
    pub courses: Vec<&'a Course>,
    pub resources: Vec<&'a Resource>,
}

impl SearchResults<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.resources.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len() + self.resources.len()
    }
}

/// Indexed training catalog.
///
/// Indexes are built once in [`Catalog::new`]; slugs and ids are assumed
/// unique and a later duplicate shadows an earlier one.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    resources: Vec<Resource>,
    course_by_slug: HashMap<String, usize>,
    course_by_id: HashMap<CourseId, usize>,
    resource_by_slug: HashMap<String, usize>,
    resource_by_id: HashMap<ResourceId, usize>,
}

impl Catalog {
    #[must_use]
    pub fn new(courses: Vec<Course>, resources: Vec<Resource>) -> Self {
        let course_by_slug = courses
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.slug.clone(), idx))
            .collect();
        let course_by_id = courses
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id.clone(), idx))
            .collect();
        let resource_by_slug = resources
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.slug.clone(), idx))
            .collect();
        let resource_by_id = resources
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id.clone(), idx))
            .collect();

        Self {
            courses,
            resources,
            course_by_slug,
            course_by_id,
            resource_by_slug,
            resource_by_id,
        }
    }

    /// The content bundled with the app.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(content::courses(), content::resources())
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub fn course_by_slug(&self, slug: &str) -> Option<&Course> {
        self.course_by_slug.get(slug).map(|&idx| &self.courses[idx])
    }

    #[must_use]
    pub fn course_by_id(&self, id: &str) -> Option<&Course> {
        self.course_by_id.get(id).map(|&idx| &self.courses[idx])
    }

    #[must_use]
    pub fn resource_by_slug(&self, slug: &str) -> Option<&Resource> {
        self.resource_by_slug
            .get(slug)
            .map(|&idx| &self.resources[idx])
    }

    #[must_use]
    pub fn resource_by_id(&self, id: &str) -> Option<&Resource> {
        self.resource_by_id.get(id).map(|&idx| &self.resources[idx])
    }

    /// Resolves a course by id first, then by slug.
    #[must_use]
    pub fn find_course(&self, id_or_slug: &str) -> Option<&Course> {
        self.course_by_id(id_or_slug)
            .or_else(|| self.course_by_slug(id_or_slug))
    }

    /// Resolves a resource by id first, then by slug.
    #[must_use]
    pub fn find_resource(&self, id_or_slug: &str) -> Option<&Resource> {
        self.resource_by_id(id_or_slug)
            .or_else(|| self.resource_by_slug(id_or_slug))
    }

    #[must_use]
    pub fn lesson(&self, course_id: &CourseId, lesson_id: &LessonId) -> Option<&Lesson> {
        self.course_by_id(course_id.as_str())?.lesson(lesson_id)
    }

    #[must_use]
    pub fn next_lesson(&self, course_id: &CourseId, lesson_id: &LessonId) -> Option<&Lesson> {
        self.course_by_id(course_id.as_str())?.next_lesson(lesson_id)
    }

    #[must_use]
    pub fn courses_by_category(&self, category: Category) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    #[must_use]
    pub fn resources_by_category(&self, category: Category) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    #[must_use]
    pub fn featured_courses(&self) -> Vec<&Course> {
        self.courses.iter().filter(|c| c.featured).collect()
    }

    #[must_use]
    pub fn featured_resources(&self) -> Vec<&Resource> {
        self.resources.iter().filter(|r| r.featured).collect()
    }

    /// Case-insensitive substring search.
    ///
    /// Courses match on title, description, keywords or any lesson title;
    /// resources on title, description or keywords. A blank query returns
    /// the whole catalog.
    #[must_use]
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults {
                courses: self.courses.iter().collect(),
                resources: self.resources.iter().collect(),
            };
        }

        fn hit(text: &str, needle: &str) -> bool {
            text.to_lowercase().contains(needle)
        }

        let courses = self
            .courses
            .iter()
            .filter(|c| {
                hit(&c.title, &needle)
                    || hit(&c.description, &needle)
                    || c.keywords.iter().any(|k| hit(k, &needle))
                    || c.lessons.iter().any(|l| hit(&l.title, &needle))
            })
            .collect();
        let resources = self
            .resources
            .iter()
            .filter(|r| {
                hit(&r.title, &needle)
                    || hit(&r.description, &needle)
                    || r.keywords.iter().any(|k| hit(k, &needle))
            })
            .collect();

        SearchResults { courses, resources }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
