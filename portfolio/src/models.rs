use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Value of the `Github` field for repositories that are not public.
pub const PRIVATE_REPO: &str = "Private";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Projects,
    Certificates,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Projects, Collection::Certificates];

    /// Collection name in the document store, also the mirror key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Certificates => "certificates",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An untyped document as returned by the store, before schema conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Document {
            id: id.into(),
            fields,
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn strings(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A typed record that can be read from a store collection and mirrored.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn from_document(document: Document) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Img", default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(rename = "Link", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "Github", default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(rename = "TechStack", default)]
    pub tech_stack: Vec<String>,
    #[serde(rename = "Features", default)]
    pub features: Vec<String>,
}

/// Where a project's source code lives, as far as the viewer is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRepo<'a> {
    Private,
    Public(&'a str),
    Missing,
}

impl Project {
    /// Identifier, treating a blank id as absent.
    pub fn id(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    /// Demo link, treating a blank link as absent.
    pub fn demo_link(&self) -> Option<&str> {
        non_blank(self.link.as_deref())
    }

    pub fn source(&self) -> SourceRepo<'_> {
        match non_blank(self.github.as_deref()) {
            Some(PRIVATE_REPO) => SourceRepo::Private,
            Some(url) => SourceRepo::Public(url),
            None => SourceRepo::Missing,
        }
    }
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn from_document(document: Document) -> Self {
        Project {
            title: document.string("Title"),
            description: document.string("Description"),
            img: document.string("Img"),
            link: document.string("Link"),
            github: document.string("Github"),
            tech_stack: document.strings("TechStack"),
            features: document.strings("Features"),
            id: non_blank(document.string("id").as_deref())
                .or(non_blank(Some(document.id.as_str())))
                .map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(rename = "Img", default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

impl Record for Certificate {
    const COLLECTION: Collection = Collection::Certificates;

    fn from_document(document: Document) -> Self {
        Certificate {
            img: document.string("Img"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A modal message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_kind(NoticeKind::Info, title, text)
    }

    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_kind(NoticeKind::Success, title, text)
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_kind(NoticeKind::Error, title, text)
    }

    fn with_kind(kind: NoticeKind, title: impl Into<String>, text: impl Into<String>) -> Self {
        Notice {
            kind,
            title: title.into(),
            text: text.into(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
