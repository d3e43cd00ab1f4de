use compass_core::model::Category;

/// Display metadata for a training category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryConfig {
    pub category: Category,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const CATEGORY_CONFIGS: [CategoryConfig; 5] = [
    CategoryConfig {
        category: Category::GettingStarted,
        label: "Getting started",
        description: "The basics of disability inclusion and why a DIAP matters.",
        icon: "compass",
        color: "#2f6f73",
    },
    CategoryConfig {
        category: Category::DigitalAccess,
        label: "Digital access",
        description: "Websites, documents, social media and AI-generated content.",
        icon: "monitor",
        color: "#3b5bdb",
    },
    CategoryConfig {
        category: Category::PhysicalAccess,
        label: "Physical access",
        description: "Premises, wayfinding, seating and sensory environments.",
        icon: "door-open",
        color: "#c2410c",
    },
    CategoryConfig {
        category: Category::InclusiveCommunication,
        label: "Inclusive communication",
        description: "Plain language, customer service and respectful interactions.",
        icon: "message-circle",
        color: "#7c3aed",
    },
    CategoryConfig {
        category: Category::PlanningAndPolicy,
        label: "Planning and policy",
        description: "Writing, resourcing and reporting on your action plan.",
        icon: "clipboard-list",
        color: "#15803d",
    },
];

#[must_use]
pub fn category_config(category: Category) -> Option<&'static CategoryConfig> {
    CATEGORY_CONFIGS.iter().find(|c| c.category == category)
}
