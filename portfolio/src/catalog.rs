//! Résumé-authored projects served when neither the store nor the mirror
//! knows a requested id.

use crate::models::{Project, PRIVATE_REPO};

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    img: &'static str,
    tech_stack: &'static [&'static str],
    features: &'static [&'static str],
}

impl CatalogEntry {
    fn to_project(&self) -> Project {
        Project {
            id: Some(self.id.to_string()),
            title: Some(self.title.to_string()),
            description: Some(self.description.to_string()),
            img: Some(self.img.to_string()),
            link: Some(String::new()),
            github: Some(PRIVATE_REPO.to_string()),
            tech_stack: self.tech_stack.iter().map(|s| s.to_string()).collect(),
            features: self.features.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const RESUME_PROJECTS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "car-rental",
        title: "Car Rental Management System",
        description: "A full-stack academic project designed to manage vehicle rentals efficiently. \
            The system handles booking workflows, route logic, and car availability using a \
            PHP-based backend with MySQL database integration.",
        img: "/projects/car-rental.png",
        tech_stack: &["PHP", "MySQL", "HTML", "CSS", "Bootstrap"],
        features: &[
            "Vehicle booking and availability management",
            "Route and pricing logic handling",
            "Admin-side car data management",
            "Responsive UI built using Bootstrap",
            "Secure backend data handling with MySQL",
        ],
    },
    CatalogEntry {
        id: "ayurvedic-store",
        title: "Ayurvedic Store Management System",
        description: "A backend-focused academic project developed using ASP.NET for managing an \
            Ayurvedic product store. The system includes secure authentication, category \
            management, and inventory handling.",
        img: "/projects/ayurvedic-store.png",
        tech_stack: &["ASP.NET", "SQL Server"],
        features: &[
            "Secure user authentication system",
            "Product and category management",
            "Inventory tracking and updates",
            "Backend APIs using ASP.NET",
            "Optimized SQL Server database queries",
        ],
    },
    CatalogEntry {
        id: "youtube-search",
        title: "YouTube Video Search App",
        description: "A personal backend project that integrates the YouTube Data API to provide \
            keyword-based video search functionality. The backend serves embedded video previews \
            dynamically.",
        img: "/projects/youtube-search.png",
        tech_stack: &["Node.js", "JavaScript", "YouTube Data API"],
        features: &[
            "Keyword-based video search",
            "YouTube Data API integration",
            "Embedded video preview generation",
            "Backend service built using Node.js",
            "API response handling and optimization",
        ],
    },
];

/// Exact-match lookup on the authored id.
pub fn lookup(id: &str) -> Option<Project> {
    RESUME_PROJECTS
        .iter()
        .find(|entry| entry.id == id)
        .map(CatalogEntry::to_project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceRepo;

    #[test]
    fn lookup_matches_exact_id() {
        let project = lookup("car-rental").expect("car-rental is authored");
        assert_eq!(project.title.as_deref(), Some("Car Rental Management System"));
        assert_eq!(project.tech_stack.len(), 5);
        assert_eq!(project.source(), SourceRepo::Private);
        assert_eq!(project.demo_link(), None);

        assert!(lookup("Car-Rental").is_none());
        assert!(lookup("car-rental ").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn every_entry_is_addressable() {
        let ids: Vec<_> = RESUME_PROJECTS.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec!["car-rental", "ayurvedic-store", "youtube-search"]);
        for id in ids {
            assert_eq!(lookup(id).and_then(|p| p.id), Some(id.to_string()));
        }
    }
}
