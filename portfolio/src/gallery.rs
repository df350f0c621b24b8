use crate::database::{CacheError, CacheMirror};
use crate::models::{Certificate, Collection, Project, Record};
use crate::store::{fetch_records, DocumentStore, StoreError};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Viewports narrower than this get the short page.
pub const MOBILE_BREAKPOINT: u32 = 768;
pub const MOBILE_PAGE_SIZE: usize = 4;
pub const DESKTOP_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Viewport { width }
    }

    pub fn page_size(&self) -> usize {
        if self.width < MOBILE_BREAKPOINT {
            MOBILE_PAGE_SIZE
        } else {
            DESKTOP_PAGE_SIZE
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 1280 }
    }
}

/// One tab of the gallery: the fetched list plus its "show more" state.
#[derive(Debug, Clone)]
pub struct Section<T> {
    items: Vec<T>,
    expanded: bool,
    page_size: usize,
}

#[derive(Debug, Serialize)]
pub struct GalleryPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page_size: usize,
    pub expanded: bool,
    pub shows_toggle: bool,
}

impl<T> GalleryPage<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> GalleryPage<U> {
        GalleryPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page_size: self.page_size,
            expanded: self.expanded,
            shows_toggle: self.shows_toggle,
        }
    }
}

impl<T> Section<T> {
    pub fn new(page_size: usize) -> Self {
        Section {
            items: Vec::new(),
            expanded: false,
            page_size,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible(&self) -> &[T] {
        if self.expanded {
            &self.items
        } else {
            &self.items[..self.items.len().min(self.page_size)]
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flips between the first page and the full list.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// The toggle control is only offered when there is something to reveal.
    pub fn shows_toggle(&self) -> bool {
        self.items.len() > self.page_size
    }

    fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

impl<T: Clone> Section<T> {
    pub fn page(&self) -> GalleryPage<T> {
        GalleryPage {
            items: self.visible().to_vec(),
            total: self.items.len(),
            page_size: self.page_size,
            expanded: self.expanded,
            shows_toggle: self.shows_toggle(),
        }
    }
}

/// Projects and certificates tabs backed by the store, written through to
/// the mirror on every successful fetch.
pub struct Gallery {
    store: Arc<dyn DocumentStore>,
    mirror: Arc<CacheMirror>,
    projects: Section<Project>,
    certificates: Section<Certificate>,
}

impl Gallery {
    pub fn new(store: Arc<dyn DocumentStore>, mirror: Arc<CacheMirror>, viewport: Viewport) -> Self {
        let page_size = viewport.page_size();
        Gallery {
            store,
            mirror,
            projects: Section::new(page_size),
            certificates: Section::new(page_size),
        }
    }

    pub fn projects(&self) -> &Section<Project> {
        &self.projects
    }

    pub fn certificates(&self) -> &Section<Certificate> {
        &self.certificates
    }

    /// Shows whatever the mirror holds before any fetch completes.
    pub async fn seed_from_mirror(&mut self) -> Result<(), CacheError> {
        let (projects, certificates) = CacheMirror::run_blocking(&self.mirror, |m| {
            Ok((
                m.load::<Project>(Collection::Projects),
                m.load::<Certificate>(Collection::Certificates),
            ))
        })
        .await?;

        self.projects.replace(projects);
        self.certificates.replace(certificates);
        Ok(())
    }

    pub fn toggle(&mut self, collection: Collection) -> bool {
        match collection {
            Collection::Projects => self.projects.toggle(),
            Collection::Certificates => self.certificates.toggle(),
        }
    }

    pub fn set_expanded(&mut self, collection: Collection, expanded: bool) {
        match collection {
            Collection::Projects => self.projects.set_expanded(expanded),
            Collection::Certificates => self.certificates.set_expanded(expanded),
        }
    }

    /// Fetches both collections. Each one is applied on its own, so a failed
    /// certificates fetch still keeps freshly fetched projects; the first
    /// error is returned.
    pub async fn activate(&mut self) -> Result<(), StoreError> {
        let (projects, certificates) = tokio::join!(
            fetch_records::<Project>(self.store.as_ref()),
            fetch_records::<Certificate>(self.store.as_ref()),
        );

        let projects = apply(&mut self.projects, &self.mirror, projects).await;
        let certificates = apply(&mut self.certificates, &self.mirror, certificates).await;
        projects.and(certificates)
    }

    pub async fn refresh(&mut self, collection: Collection) -> Result<(), StoreError> {
        match collection {
            Collection::Projects => {
                let fetched = fetch_records::<Project>(self.store.as_ref()).await;
                apply(&mut self.projects, &self.mirror, fetched).await
            }
            Collection::Certificates => {
                let fetched = fetch_records::<Certificate>(self.store.as_ref()).await;
                apply(&mut self.certificates, &self.mirror, fetched).await
            }
        }
    }
}

async fn apply<T: Record>(
    section: &mut Section<T>,
    mirror: &Arc<CacheMirror>,
    fetched: Result<Vec<T>, StoreError>,
) -> Result<(), StoreError> {
    let collection = T::COLLECTION;
    let records = fetched.map_err(|e| {
        warn!(%collection, error = %e, "Fetch failed, keeping previous records");
        e
    })?;

    // Fresh records are shown even when the mirror write fails.
    let mirrored = records.clone();
    let saved = CacheMirror::run_blocking(mirror, move |m| m.save(collection, &mirrored)).await;
    if let Err(e) = saved {
        warn!(%collection, error = %e, "Failed to mirror collection");
    }
    section.replace(records);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStore;

    fn gallery(store: &Arc<FakeStore>, mirror: &Arc<CacheMirror>, width: u32) -> Gallery {
        Gallery::new(store.clone(), mirror.clone(), Viewport::new(width))
    }

    #[test]
    fn page_size_follows_viewport() {
        assert_eq!(Viewport::new(375).page_size(), 4);
        assert_eq!(Viewport::new(767).page_size(), 4);
        assert_eq!(Viewport::new(768).page_size(), 6);
        assert_eq!(Viewport::default().page_size(), 6);
    }

    #[tokio::test]
    async fn toggle_reveals_and_restores_without_refetch() {
        let store = Arc::new(FakeStore::with_projects(10));
        let mirror = Arc::new(CacheMirror::in_memory().unwrap());
        let mut gallery = gallery(&store, &mirror, 1280);

        gallery.refresh(Collection::Projects).await.unwrap();
        assert_eq!(store.calls(), 1);
        assert_eq!(gallery.projects().visible().len(), 6);
        assert!(gallery.projects().shows_toggle());

        assert!(gallery.toggle(Collection::Projects));
        assert_eq!(gallery.projects().visible().len(), 10);

        assert!(!gallery.toggle(Collection::Projects));
        let ids: Vec<_> = gallery
            .projects()
            .visible()
            .iter()
            .filter_map(|p| p.id.clone())
            .collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4", "p5"]);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn short_lists_have_no_toggle() {
        let store = Arc::new(FakeStore::with_projects(3));
        let mirror = Arc::new(CacheMirror::in_memory().unwrap());
        let mut gallery = gallery(&store, &mirror, 375);

        gallery.refresh(Collection::Projects).await.unwrap();
        let page = gallery.projects().page();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 3);
        assert_eq!(page.page_size, 4);
        assert!(!page.shows_toggle);
    }

    #[tokio::test]
    async fn expansion_is_tracked_per_collection() {
        let store = Arc::new(FakeStore::with_projects(8).and_certificates(8));
        let mirror = Arc::new(CacheMirror::in_memory().unwrap());
        let mut gallery = gallery(&store, &mirror, 375);

        gallery.activate().await.unwrap();
        gallery.toggle(Collection::Certificates);

        assert_eq!(gallery.projects().visible().len(), 4);
        assert_eq!(gallery.certificates().visible().len(), 8);
    }

    #[tokio::test]
    async fn successful_fetch_writes_through_to_mirror() {
        let store = Arc::new(FakeStore::with_projects(2).and_certificates(1));
        let mirror = Arc::new(CacheMirror::in_memory().unwrap());
        let mut gallery = gallery(&store, &mirror, 1280);

        gallery.activate().await.unwrap();

        assert_eq!(store.calls(), 2);
        let mirrored: Vec<Project> = mirror.load(Collection::Projects);
        assert_eq!(mirrored, gallery.projects().items());
        assert_eq!(mirror.load::<Certificate>(Collection::Certificates).len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_seeded_records() {
        let mirror = Arc::new(CacheMirror::in_memory().unwrap());
        let cached = FakeStore::projects(3);
        mirror.save(Collection::Projects, &cached).unwrap();

        let store = Arc::new(FakeStore::with_projects(5).failing(Collection::Projects));
        let mut gallery = gallery(&store, &mirror, 1280);
        gallery.seed_from_mirror().await.unwrap();

        assert!(gallery.refresh(Collection::Projects).await.is_err());
        assert_eq!(gallery.projects().items(), cached.as_slice());
        assert_eq!(mirror.load::<Project>(Collection::Projects), cached);
    }

    #[tokio::test]
    async fn collections_activate_independently() {
        let store = Arc::new(
            FakeStore::with_projects(2)
                .and_certificates(2)
                .failing(Collection::Certificates),
        );
        let mirror = Arc::new(CacheMirror::in_memory().unwrap());
        let mut gallery = gallery(&store, &mirror, 1280);

        assert!(gallery.activate().await.is_err());
        assert_eq!(gallery.projects().items().len(), 2);
        assert!(gallery.certificates().items().is_empty());
        assert!(mirror.snapshot(Collection::Certificates).unwrap().is_none());
    }
}
