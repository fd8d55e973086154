use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base_path::BasePath;

/// Image shown when a project has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Web,
    Ai,
    Data,
}

impl Category {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "web" => Some(Category::Web),
            "ai" => Some(Category::Ai),
            "data" => Some(Category::Data),
            _ => None,
        }
    }
}

/// Gallery tab selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Tabs in display order. `Data` has no tab; those projects only show
    /// under "all".
    pub const TABS: [CategoryFilter; 3] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Web),
        CategoryFilter::Only(Category::Ai),
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "Todos",
            CategoryFilter::Only(Category::Web) => "Web Apps",
            CategoryFilter::Only(Category::Ai) => "WebPages",
            CategoryFilter::Only(Category::Data) => "Data",
        }
    }

    /// Tab value as used in the markup (`all`, `web`, `ai`, `data`).
    pub fn key(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(Category::Web) => "web",
            CategoryFilter::Only(Category::Ai) => "ai",
            CategoryFilter::Only(Category::Data) => "data",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key == "all" {
            return Some(CategoryFilter::All);
        }
        Category::from_key(key).map(CategoryFilter::Only)
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Category,
    #[serde(default = "default_link")]
    pub link: String,
    #[serde(default = "default_link")]
    pub repo: String,
}

fn default_link() -> String {
    "#".to_string()
}

impl Project {
    /// Image URL with the base path applied.
    pub fn image_url(&self, base: &BasePath) -> String {
        if self.image.is_empty() {
            base.asset_url(PLACEHOLDER_IMAGE)
        } else {
            base.asset_url(&self.image)
        }
    }
}

/// Projects shipped with the site.
pub fn default_catalog() -> Vec<Project> {
    let project = |id, title: &str, description: &str, tags: &[&str], category| Project {
        id,
        title: title.to_string(),
        description: description.to_string(),
        image: "/placeholder.svg?height=400&width=600".to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        category,
        link: default_link(),
        repo: default_link(),
    };
    vec![
        project(
            1,
            "E-commerce Platform",
            "A full-stack e-commerce platform built with Next.js, TypeScript, and Stripe integration.",
            &["Next.js", "TypeScript", "Stripe", "Tailwind CSS"],
            Category::Web,
        ),
        project(
            2,
            "AI Content Generator",
            "An AI-powered application that generates content based on user prompts using OpenAI's API.",
            &["React", "Node.js", "OpenAI", "MongoDB"],
            Category::Ai,
        ),
        project(
            3,
            "Task Management App",
            "A collaborative task management application with real-time updates and team features.",
            &["React", "Firebase", "Redux", "Material UI"],
            Category::Web,
        ),
        project(
            4,
            "Data Visualization Dashboard",
            "An interactive dashboard for visualizing complex datasets with customizable charts and filters.",
            &["D3.js", "React", "TypeScript", "Express"],
            Category::Data,
        ),
    ]
}

/// Project list with the currently selected tab.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    projects: Vec<Project>,
    filter: CategoryFilter,
}

impl Gallery {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            filter: CategoryFilter::All,
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn select(&mut self, filter: CategoryFilter) {
        if self.filter != filter {
            debug!(tab = filter.key(), "gallery tab selected");
        }
        self.filter = filter;
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Projects that pass the current filter, in catalog order.
    pub fn visible(&self) -> impl Iterator<Item = &Project> + '_ {
        let filter = self.filter;
        self.projects
            .iter()
            .filter(move |p| filter.matches(p.category))
    }

    pub fn tabs(&self) -> &'static [CategoryFilter] {
        &CategoryFilter::TABS
    }
}
