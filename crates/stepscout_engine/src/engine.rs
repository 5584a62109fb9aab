use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, trace};

use stepscout_core::matching::{self, MatchCandidate};
use stepscout_core::step_catalog::{scan_lines, Catalog, StepLocation, StepMarker};

use crate::error::Result;
use crate::file_source::FileSource;
use crate::settings::Settings;

/// Owns the settings, the file source, and the latest published catalog.
///
/// `rescan` builds a complete replacement catalog off to the side and
/// publishes it with a single atomic store, so concurrent queries always
/// observe either the fully-old or the fully-new catalog, never a partially
/// populated one. Queries are lock-free; a host may run `rescan` on a
/// background thread (e.g. from save/load events) while completions are
/// served elsewhere. Concurrent rescans race benignly: the last store wins.
pub struct Engine {
    settings: Settings,
    source: FileSource,
    catalog: ArcSwap<Catalog>,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        let source = FileSource::new(settings.step_paths.clone(), settings.root.clone());
        Engine {
            settings,
            source,
            catalog: ArcSwap::from_pointee(Catalog::default()),
        }
    }

    /// Discards the previous catalog and rebuilds it from the file source.
    /// On any error nothing is published and the previous catalog stays
    /// visible.
    pub fn rescan(&self) -> Result<Arc<Catalog>> {
        let mut markers: Vec<StepMarker> = Vec::new();
        for path in self.source.list_files()? {
            let lines = self.source.read_lines(&path)?;
            let found = scan_lines(&path.to_string_lossy(), lines.iter().map(String::as_str));
            trace!("{}: {} marker(s)", path.display(), found.len());
            markers.extend(found);
        }
        let catalog = Arc::new(Catalog::from_markers(markers));
        debug!("catalog rebuilt: {} step(s)", catalog.len());
        self.catalog.store(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Snapshot of the latest published catalog.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.load_full()
    }

    /// Completion candidates for a partially-typed scenario line. An empty
    /// result is a normal outcome, not an error.
    pub fn completions(&self, query: &str) -> Vec<MatchCandidate> {
        matching::match_candidates(&self.catalog.load(), query)
    }

    /// Completion candidates with a keyword hint from surrounding context
    /// (the nearest preceding Given/When/Then line of the scenario).
    pub fn completions_with_keyword(&self, query: &str, keyword: &str) -> Vec<MatchCandidate> {
        matching::match_candidates_with_keyword(&self.catalog.load(), query, keyword)
    }

    /// Display labels in catalog order, for a host's selectable step list.
    pub fn labels(&self) -> Vec<String> {
        matching::catalog_labels(&self.catalog.load())
    }

    /// Resolves an index from [`Engine::labels`] back to the defining file
    /// and 0-based line.
    pub fn resolve(&self, index: usize) -> Option<StepLocation> {
        self.catalog.load().resolve(index)
    }

    /// Resolves a complete scenario line to the location of its defining
    /// step, trimming configured keywords from the line first.
    pub fn locate(&self, line: &str) -> Option<StepLocation> {
        let catalog = self.catalog.load();
        matching::find_definition(&catalog, line, &self.settings.keywords).map(|m| StepLocation {
            file: m.file.clone(),
            line: m.line,
        })
    }
}
