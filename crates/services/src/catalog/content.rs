//! Built-in training content shipped with the app.

use compass_core::model::{
    AccessTier, Category, Course, CourseId, Lesson, LessonId, Resource, ResourceId, ResourceKind,
};

fn lesson(id: &str, title: &str, minutes: u32, tier: AccessTier) -> Lesson {
    Lesson {
        id: LessonId::new(id),
        title: title.to_owned(),
        duration_minutes: minutes,
        access_tier: tier,
        is_preview: false,
    }
}

fn preview(id: &str, title: &str, minutes: u32, tier: AccessTier) -> Lesson {
    Lesson {
        is_preview: true,
        ..lesson(id, title, minutes, tier)
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_owned()).collect()
}

#[must_use]
pub fn courses() -> Vec<Course> {
    use AccessTier::{Free, Included, Premium};

    vec![
        Course {
            id: CourseId::new("course-diap-foundations"),
            slug: "diap-foundations".into(),
            title: "DIAP foundations".into(),
            description: "What a Disability Inclusion Action Plan is, who it serves and how the self-assessment fits in.".into(),
            category: Category::GettingStarted,
            access_tier: Free,
            keywords: keywords(&["diap", "action plan", "inclusion", "basics"]),
            featured: true,
            lessons: vec![
                lesson("lesson-1-what-is-a-diap", "What is a DIAP?", 6, Free),
                lesson("lesson-2-social-model", "The social model of disability", 8, Free),
                lesson("lesson-3-lived-experience", "Involving people with lived experience", 7, Free),
                lesson("lesson-4-using-your-results", "Using your assessment results", 5, Free),
            ],
        },
        Course {
            id: CourseId::new("course-ai-accessible-resources"),
            slug: "ai-accessible-resources".into(),
            title: "Using AI to create accessible resources".into(),
            description: "Practical ways to draft, check and publish accessible content with AI tools, without handing over your judgement.".into(),
            category: Category::DigitalAccess,
            access_tier: Included,
            keywords: keywords(&["ai", "chatgpt", "alt text", "documents", "plain language"]),
            featured: true,
            lessons: vec![
                preview("lesson-1-why-accessible", "Why accessible resources matter", 5, Included),
                lesson("lesson-2-plain-language", "Plain language prompts", 8, Included),
                lesson("lesson-3-alt-text", "Writing alt text with AI", 10, Included),
                lesson("lesson-4-document-structure", "Headings, lists and document structure", 9, Included),
                lesson("lesson-5-colour-contrast", "Colour and contrast checks", 7, Included),
                lesson("lesson-6-checking-ai-output", "Checking AI output for accuracy and bias", 10, Included),
                lesson("lesson-7-publishing-checklist", "Your publishing checklist", 6, Included),
            ],
        },
        Course {
            id: CourseId::new("course-welcoming-customers"),
            slug: "welcoming-customers".into(),
            title: "Welcoming customers with disability".into(),
            description: "Confident, respectful service at the counter, on the phone and online.".into(),
            category: Category::InclusiveCommunication,
            access_tier: Premium,
            keywords: keywords(&["customer service", "etiquette", "assistance animals", "language"]),
            featured: false,
            lessons: vec![
                preview("lesson-1-first-impressions", "First impressions", 6, Premium),
                lesson("lesson-2-asking-not-assuming", "Asking, not assuming", 8, Premium),
                lesson("lesson-3-assistance-animals", "Assistance animals", 6, Premium),
                lesson("lesson-4-communication-access", "Communication access", 9, Premium),
                lesson("lesson-5-handling-feedback", "Handling feedback and complaints", 7, Premium),
            ],
        },
        Course {
            id: CourseId::new("course-accessible-premises"),
            slug: "accessible-premises".into(),
            title: "Accessible premises walkthrough".into(),
            description: "Walk your site from the car park to the bathroom and record what needs fixing.".into(),
            category: Category::PhysicalAccess,
            access_tier: Included,
            keywords: keywords(&["ramps", "parking", "signage", "toilets", "wayfinding"]),
            featured: false,
            lessons: vec![
                lesson("lesson-1-arrival", "Arrival and parking", 8, Included),
                lesson("lesson-2-entrances", "Entrances and circulation", 9, Included),
                lesson("lesson-3-sensory", "Lighting, noise and sensory spaces", 7, Included),
            ],
        },
    ]
}

#[must_use]
pub fn resources() -> Vec<Resource> {
    use AccessTier::{Free, Included, Premium};

    vec![
        Resource {
            id: ResourceId::new("resource-alt-text-guide"),
            slug: "alt-text-guide".into(),
            title: "Alt text quick guide".into(),
            description: "When images need alt text, what to write and what to leave out.".into(),
            category: Category::DigitalAccess,
            kind: ResourceKind::Guide,
            access_tier: Free,
            keywords: keywords(&["images", "alt text", "screen readers"]),
            featured: true,
        },
        Resource {
            id: ResourceId::new("resource-event-checklist"),
            slug: "accessible-event-checklist".into(),
            title: "Accessible event checklist".into(),
            description: "Venue, registration, catering and on-the-day checks for inclusive events.".into(),
            category: Category::PhysicalAccess,
            kind: ResourceKind::Checklist,
            access_tier: Included,
            keywords: keywords(&["events", "venues", "registration"]),
            featured: true,
        },
        Resource {
            id: ResourceId::new("resource-diap-template"),
            slug: "diap-template".into(),
            title: "DIAP action plan template".into(),
            description: "An editable template for actions, owners, timeframes and measures.".into(),
            category: Category::PlanningAndPolicy,
            kind: ResourceKind::Template,
            access_tier: Premium,
            keywords: keywords(&["template", "action plan", "reporting"]),
            featured: false,
        },
        Resource {
            id: ResourceId::new("resource-plain-language-video"),
            slug: "plain-language-in-five-minutes".into(),
            title: "Plain language in five minutes".into(),
            description: "A short video on shorter sentences, everyday words and clear structure.".into(),
            category: Category::InclusiveCommunication,
            kind: ResourceKind::Video,
            access_tier: Free,
            keywords: keywords(&["writing", "easy read", "readability"]),
            featured: false,
        },
    ]
}
