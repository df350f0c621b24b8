use crate::database::CacheMirror;
use crate::models::Collection;
use chrono::Datelike;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_START_YEAR: i32 = 2021;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AboutStats {
    pub total_projects: usize,
    pub total_certificates: usize,
    pub years_experience: i32,
}

impl AboutStats {
    /// Counts whatever the mirror holds; an empty mirror means "no data yet".
    pub fn collect(mirror: &CacheMirror, start_year: i32, current_year: i32) -> Self {
        AboutStats {
            total_projects: mirror.load::<Value>(Collection::Projects).len(),
            total_certificates: mirror.load::<Value>(Collection::Certificates).len(),
            years_experience: (current_year - start_year).max(0),
        }
    }

    pub fn current(mirror: &CacheMirror, start_year: i32) -> Self {
        Self::collect(mirror, start_year, chrono::Local::now().year())
    }
}
