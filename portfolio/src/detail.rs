use crate::catalog;
use crate::database::CacheMirror;
use crate::models::{Collection, Notice, Project, SourceRepo};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Where a resolved project came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Cache,
    Catalog,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Resolved { project: Project, origin: Origin },
    NotFound,
}

/// Resolves a detail route id against the mirrored projects, then the
/// résumé catalog.
#[derive(Clone)]
pub struct DetailResolver {
    mirror: Arc<CacheMirror>,
    fallback: fn(&str) -> Option<Project>,
}

impl DetailResolver {
    pub fn new(mirror: Arc<CacheMirror>) -> Self {
        DetailResolver {
            mirror,
            fallback: catalog::lookup,
        }
    }

    pub fn with_fallback(mut self, fallback: fn(&str) -> Option<Project>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn resolve(&self, id: &str) -> DetailState {
        let cached: Vec<Project> = self.mirror.load(Collection::Projects);
        if let Some(project) = cached.into_iter().find(|p| p.id.as_deref() == Some(id)) {
            debug!(id, "Resolved project from mirror");
            return DetailState::Resolved {
                project,
                origin: Origin::Cache,
            };
        }

        match (self.fallback)(id) {
            Some(project) => DetailState::Resolved {
                project,
                origin: Origin::Catalog,
            },
            None => DetailState::NotFound,
        }
    }
}

/// One visit to a detail route. Resolution happens once; later mirror
/// updates do not change a page that has already left `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    state: DetailState,
}

impl Default for DetailPage {
    fn default() -> Self {
        DetailPage {
            state: DetailState::Loading,
        }
    }
}

impl DetailPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn into_state(self) -> DetailState {
        self.state
    }

    pub fn resolve(&mut self, resolver: &DetailResolver, id: &str) -> &DetailState {
        if self.state == DetailState::Loading {
            self.state = resolver.resolve(id);
        }
        &self.state
    }
}

/// What happens when the visitor activates a link on a card or detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LinkAction {
    Follow { url: String },
    Notice { notice: Notice },
    Disabled,
}

pub fn source_link_action(project: &Project) -> LinkAction {
    match project.source() {
        SourceRepo::Private => LinkAction::Notice {
            notice: Notice::info(
                "Private Repository",
                "Source code is private as this is an academic/personal project.",
            ),
        },
        SourceRepo::Public(url) => LinkAction::Follow {
            url: url.to_string(),
        },
        SourceRepo::Missing => LinkAction::Disabled,
    }
}

pub fn demo_link_action(project: &Project) -> LinkAction {
    match project.demo_link() {
        Some(url) => LinkAction::Follow {
            url: url.to_string(),
        },
        None => LinkAction::Notice {
            notice: Notice::info("Live Demo", "Live demo link is not available"),
        },
    }
}

pub fn details_link_action(project: &Project) -> LinkAction {
    match project.id() {
        Some(id) => LinkAction::Follow {
            url: format!("/project/{id}"),
        },
        None => LinkAction::Notice {
            notice: Notice::info("Project Details", "Project details are not available"),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub project: Project,
    pub origin: Origin,
    pub demo: LinkAction,
    pub source: LinkAction,
}

impl DetailView {
    pub fn new(project: Project, origin: Origin) -> Self {
        DetailView {
            demo: demo_link_action(&project),
            source: source_link_action(&project),
            project,
            origin,
        }
    }
}

/// A gallery card: the project plus its demo and details buttons.
#[derive(Debug, Serialize)]
pub struct ProjectCard {
    #[serde(flatten)]
    pub project: Project,
    pub demo: LinkAction,
    pub details: LinkAction,
}

impl ProjectCard {
    pub fn new(project: Project) -> Self {
        ProjectCard {
            demo: demo_link_action(&project),
            details: details_link_action(&project),
            project,
        }
    }
}
