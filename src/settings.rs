use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::SkyError;
use crate::satellite::{Constellation, SatelliteRecord};

pub const PREFS_NAME: &str = "SkyViewPrefs";
pub const KEY_CONSTELLATIONS: &str = "constellations";
pub const KEY_SHOW_NOT_IN_FIX: &str = "showNotInFix";

// ---------- Filter settings ----------

/// Which satellites the sky plot draws.
///
/// `Constellation::Other` is never a member: there is no toggle for it, so
/// satellites outside the four named systems stay hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsRepr", into = "SettingsRepr")]
pub struct FilterSettings {
    visible_constellations: BTreeSet<Constellation>,
    show_not_in_fix: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            visible_constellations: Constellation::NAMED.into_iter().collect(),
            show_not_in_fix: true,
        }
    }
}

impl FilterSettings {
    pub fn new<I>(visible: I, show_not_in_fix: bool) -> Self
    where
        I: IntoIterator<Item = Constellation>,
    {
        Self {
            visible_constellations: visible.into_iter().filter(|c| c.is_toggleable()).collect(),
            show_not_in_fix,
        }
    }

    pub fn visible_constellations(&self) -> &BTreeSet<Constellation> {
        &self.visible_constellations
    }

    pub fn show_not_in_fix(&self) -> bool {
        self.show_not_in_fix
    }

    pub fn is_visible(&self, constellation: Constellation) -> bool {
        self.visible_constellations.contains(&constellation)
    }

    /// Whether `satellite` passes the filter. Pure: depends on nothing else.
    pub fn should_display(&self, satellite: &SatelliteRecord) -> bool {
        if !self.is_visible(satellite.constellation()) {
            return false;
        }
        self.show_not_in_fix || satellite.used_in_fix()
    }

    /// Canonical names in the form the preference store keeps them.
    pub fn constellation_names(&self) -> BTreeSet<String> {
        self.visible_constellations
            .iter()
            .map(|c| c.canonical_name().to_string())
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRepr {
    #[serde(default = "default_names")]
    visible_constellations: BTreeSet<String>,
    #[serde(default = "default_show_not_in_fix")]
    show_not_in_fix: bool,
}

fn default_names() -> BTreeSet<String> {
    FilterSettings::default().constellation_names()
}

fn default_show_not_in_fix() -> bool {
    true
}

fn parse_names<'a, I>(names: I) -> BTreeSet<Constellation>
where
    I: IntoIterator<Item = &'a String>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let parsed = Constellation::from_canonical_name(name);
            if parsed.is_none() {
                warn!("[settings] ignoring unknown constellation name {:?}", name);
            }
            parsed
        })
        .collect()
}

impl From<SettingsRepr> for FilterSettings {
    fn from(repr: SettingsRepr) -> Self {
        Self {
            visible_constellations: parse_names(&repr.visible_constellations),
            show_not_in_fix: repr.show_not_in_fix,
        }
    }
}

impl From<FilterSettings> for SettingsRepr {
    fn from(settings: FilterSettings) -> Self {
        Self {
            visible_constellations: settings.constellation_names(),
            show_not_in_fix: settings.show_not_in_fix,
        }
    }
}

// ---------- Persistence collaborator ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    StringSet(BTreeSet<String>),
    Bool(bool),
}

/// Flat key-value preferences owned by the host.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, SkyError>;

    /// Writes every entry or none of them.
    fn commit(&mut self, entries: Vec<(String, PrefValue)>) -> Result<(), SkyError>;
}

/// Preference store backed by a map; useful for hosts without their own store.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: PrefValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, SkyError> {
        Ok(self.values.get(key).cloned())
    }

    fn commit(&mut self, entries: Vec<(String, PrefValue)>) -> Result<(), SkyError> {
        self.values.extend(entries);
        Ok(())
    }
}

// ---------- Settings store ----------

pub struct SettingsStore<P> {
    prefs: P,
}

impl<P: PreferenceStore> SettingsStore<P> {
    pub fn new(prefs: P) -> Self {
        Self { prefs }
    }

    /// Reads persisted settings. Missing keys fall back per field; an
    /// unreadable store or a value of the wrong type falls back entirely.
    pub fn load(&self) -> FilterSettings {
        let defaults = FilterSettings::default();

        let visible = match self.prefs.get(KEY_CONSTELLATIONS) {
            Ok(Some(PrefValue::StringSet(names))) => parse_names(&names),
            Ok(None) => defaults.visible_constellations.clone(),
            Ok(Some(other)) => {
                warn!("[load_settings] {} has unexpected value {:?}, using defaults", KEY_CONSTELLATIONS, other);
                return defaults;
            }
            Err(e) => {
                warn!("[load_settings] failed to read {}: {}, using defaults", KEY_CONSTELLATIONS, e);
                return defaults;
            }
        };

        let show_not_in_fix = match self.prefs.get(KEY_SHOW_NOT_IN_FIX) {
            Ok(Some(PrefValue::Bool(b))) => b,
            Ok(None) => defaults.show_not_in_fix,
            Ok(Some(other)) => {
                warn!("[load_settings] {} has unexpected value {:?}, using defaults", KEY_SHOW_NOT_IN_FIX, other);
                return defaults;
            }
            Err(e) => {
                warn!("[load_settings] failed to read {}: {}, using defaults", KEY_SHOW_NOT_IN_FIX, e);
                return defaults;
            }
        };

        let settings = FilterSettings { visible_constellations: visible, show_not_in_fix };
        debug!("[load_settings] loaded {:?}", settings);
        settings
    }

    /// Replaces both persisted fields in one commit.
    pub fn save(&mut self, settings: &FilterSettings) -> Result<(), SkyError> {
        debug!("[save_settings] saving {:?}", settings);
        self.prefs.commit(vec![
            (KEY_CONSTELLATIONS.to_string(), PrefValue::StringSet(settings.constellation_names())),
            (KEY_SHOW_NOT_IN_FIX.to_string(), PrefValue::Bool(settings.show_not_in_fix)),
        ])
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn into_inner(self) -> P {
        self.prefs
    }
}

// ---------- Settings editor ----------

/// Draft state behind the settings dialog: four constellation toggles and the
/// not-in-fix switch. Nothing leaves the draft until `confirm`.
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    checked: BTreeMap<Constellation, bool>,
    show_not_in_fix: bool,
}

impl SettingsEditor {
    pub fn open(current: &FilterSettings) -> Self {
        Self {
            checked: Constellation::NAMED
                .into_iter()
                .map(|c| (c, current.is_visible(c)))
                .collect(),
            show_not_in_fix: current.show_not_in_fix,
        }
    }

    pub fn is_checked(&self, constellation: Constellation) -> bool {
        self.checked.get(&constellation).copied().unwrap_or(false)
    }

    /// No-op for `Other`, which has no toggle.
    pub fn set_checked(&mut self, constellation: Constellation, checked: bool) {
        if let Some(slot) = self.checked.get_mut(&constellation) {
            *slot = checked;
        }
    }

    pub fn show_not_in_fix(&self) -> bool {
        self.show_not_in_fix
    }

    pub fn set_show_not_in_fix(&mut self, show: bool) {
        self.show_not_in_fix = show;
    }

    /// Builds the replacement settings from the toggles alone.
    pub fn confirm(self) -> FilterSettings {
        FilterSettings::new(
            self.checked.into_iter().filter(|&(_, on)| on).map(|(c, _)| c),
            self.show_not_in_fix,
        )
    }

    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_all_named_and_not_in_fix() {
        let s = FilterSettings::default();
        for c in Constellation::NAMED {
            assert!(s.is_visible(c));
        }
        assert!(!s.is_visible(Constellation::Other));
        assert!(s.show_not_in_fix());
    }

    #[test]
    fn other_never_enters_the_set() {
        let s = FilterSettings::new([Constellation::Other, Constellation::Gps], true);
        assert_eq!(s.visible_constellations().len(), 1);

        let parsed: FilterSettings =
            serde_json::from_str(r#"{"visibleConstellations": ["Unknown", "Beidou"], "showNotInFix": false}"#).unwrap();
        assert_eq!(parsed, FilterSettings::new([Constellation::Beidou], false));
    }

    #[test]
    fn json_uses_canonical_names() {
        let json = serde_json::to_value(FilterSettings::default()).unwrap();
        let names: Vec<&str> = json["visibleConstellations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Beidou", "GPS", "Galileo", "Glonass"]);
        assert_eq!(json["showNotInFix"], true);
    }

    #[test]
    fn editor_ignores_other_toggle() {
        let mut editor = SettingsEditor::open(&FilterSettings::default());
        editor.set_checked(Constellation::Other, true);
        assert!(!editor.is_checked(Constellation::Other));
        editor.set_checked(Constellation::Glonass, false);
        let s = editor.confirm();
        assert!(!s.is_visible(Constellation::Glonass));
        assert!(s.is_visible(Constellation::Gps));
    }
}
