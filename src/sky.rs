use std::sync::Arc;

use log::{debug, error, info};

use crate::error::SkyError;
use crate::feed::{Snapshot, SnapshotReceiver};
use crate::render::{self, Scene, SkyTheme, Viewport};
use crate::settings::{FilterSettings, PreferenceStore, SettingsEditor, SettingsStore};

/// The sky plot component as a host embeds it.
///
/// Holds the newest satellite snapshot and the current filter settings. The
/// settings are swapped as a whole `Arc`, so a scene being built from the old
/// value never observes a half-applied edit.
pub struct SkyPlot<P> {
    store: SettingsStore<P>,
    settings: Arc<FilterSettings>,
    snapshot: Snapshot,
    theme: SkyTheme,
    needs_redraw: bool,
}

impl<P: PreferenceStore> SkyPlot<P> {
    pub fn new(prefs: P) -> Self {
        Self::with_theme(prefs, SkyTheme::default())
    }

    pub fn with_theme(prefs: P, theme: SkyTheme) -> Self {
        let store = SettingsStore::new(prefs);
        let settings = Arc::new(store.load());
        info!("[sky_plot] initialized with {:?}", settings);
        Self { store, settings, snapshot: Snapshot::empty(), theme, needs_redraw: true }
    }

    pub fn settings(&self) -> Arc<FilterSettings> {
        Arc::clone(&self.settings)
    }

    pub fn satellites(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn theme(&self) -> &SkyTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: SkyTheme) {
        self.theme = theme;
        self.needs_redraw = true;
    }

    /// Replaces the whole satellite set.
    pub fn set_satellites(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.needs_redraw = true;
    }

    /// Applies the newest pending snapshot, if any. Returns whether the plot
    /// changed; a snapshot stamped before the current one is dropped.
    pub fn pump(&mut self, feed: &SnapshotReceiver) -> bool {
        match feed.latest() {
            Some(snapshot) if snapshot.supersedes(&self.snapshot) => {
                self.set_satellites(snapshot);
                true
            }
            Some(stale) => {
                debug!(
                    "[pump] dropping snapshot from {} older than current {}",
                    stale.received_at(),
                    self.snapshot.received_at()
                );
                false
            }
            None => false,
        }
    }

    /// Opens a draft seeded from the current settings. Dropping or cancelling
    /// it changes nothing.
    pub fn edit_settings(&self) -> SettingsEditor {
        SettingsEditor::open(&self.settings)
    }

    /// Replaces the settings, saves them and invalidates the plot. The new
    /// settings stay in effect even if the save fails; the error is returned
    /// so the host can report it.
    pub fn apply_settings(&mut self, settings: FilterSettings) -> Result<(), SkyError> {
        self.settings = Arc::new(settings);
        self.needs_redraw = true;
        self.store.save(&self.settings).map_err(|e| {
            error!("[apply_settings] failed to persist settings: {}", e);
            e
        })
    }

    /// Returns and clears the invalidation flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn render(&self, width: f32, height: f32) -> Scene {
        render::render_with_theme(
            Viewport::new(width, height),
            self.snapshot.satellites(),
            &self.settings,
            &self.theme,
        )
    }

    pub fn store(&self) -> &SettingsStore<P> {
        &self.store
    }
}
