use std::ffi::{CStr, CString, c_char};
use std::sync::Once;

use log::{info, debug, error};
use serde::de::DeserializeOwned;

pub mod error;
pub mod feed;
pub mod render;
pub mod satellite;
pub mod settings;
pub mod sky;
pub mod style;

pub use error::SkyError;
pub use feed::{snapshot_channel, Snapshot, SnapshotReceiver, SnapshotSender};
pub use render::{
    project, radial_distance, render, render_with_theme, should_display, Cardinal, Paint, PaintStyle, Primitive,
    Scene, SkyGeometry, SkyTheme, TextContent, Viewport,
};
pub use satellite::{Constellation, SatelliteRecord};
pub use settings::{FilterSettings, MemoryPreferences, PrefValue, PreferenceStore, SettingsEditor, SettingsStore};
pub use sky::SkyPlot;
pub use style::{MarkerShape, Rgba};

// ---------- Logging ----------

static INIT_LOGGER: Once = Once::new();

#[cfg(target_os = "android")]
pub fn init_logger() {
    use android_logger::Config;
    use log::LevelFilter;
    INIT_LOGGER.call_once(|| {
        android_logger::init_once(
            Config::default()
                .with_max_level(LevelFilter::Debug)
                .with_tag("skycore")
        );
    });
}

#[cfg(not(target_os = "android"))]
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    });
}

// ---------- C ABI ----------

#[no_mangle]
pub extern "C" fn free_json(ptr: *mut c_char) {
    if ptr.is_null() { return; }
    unsafe { let _ = CString::from_raw(ptr); }
}

/// Renders one frame and returns the scene as JSON.
///
/// `satellites_json` is an array of satellite records and is required.
/// `settings_json` and `theme_json` may be null, in which case defaults apply.
/// Returns the JSON literal `null` on bad input. Free the result with `free_json`.
#[no_mangle]
pub extern "C" fn skycore_render(
    satellites_json: *const c_char,
    settings_json: *const c_char,
    theme_json: *const c_char,
    width: f32, height: f32,
) -> *mut c_char {
    init_logger();
    debug!("[skycore_render] called with viewport {}x{}", width, height);

    let parsed = (|| -> Result<_, SkyError> {
        let satellites: Vec<SatelliteRecord> = parse_required(satellites_json, "satellites_json")?;
        let settings: FilterSettings = parse_optional(settings_json)?.unwrap_or_default();
        let theme: SkyTheme = parse_optional(theme_json)?.unwrap_or_default();
        Ok((satellites, settings, theme))
    })();

    let (satellites, settings, theme) = match parsed {
        Ok(p) => p,
        Err(e) => {
            error!("[skycore_render] rejected input: {}", e);
            return json_null();
        }
    };

    let scene = render_with_theme(Viewport::new(width, height), &satellites, &settings, &theme);
    info!("[skycore_render] {} visible, {} used in fix", scene.visible_count, scene.used_in_fix_count);
    to_c_json(&scene)
}

/// Default filter settings as JSON. Free the result with `free_json`.
#[no_mangle]
pub extern "C" fn skycore_default_settings() -> *mut c_char {
    init_logger();
    to_c_json(&FilterSettings::default())
}

/// 1 if the satellite passes the filter, 0 if not, -1 on bad input.
/// A null `settings_json` means default settings.
#[no_mangle]
pub extern "C" fn skycore_should_display(satellite_json: *const c_char, settings_json: *const c_char) -> i32 {
    init_logger();
    let parsed = (|| -> Result<_, SkyError> {
        let satellite: SatelliteRecord = parse_required(satellite_json, "satellite_json")?;
        let settings: FilterSettings = parse_optional(settings_json)?.unwrap_or_default();
        Ok((satellite, settings))
    })();

    match parsed {
        Ok((satellite, settings)) => should_display(&satellite, &settings) as i32,
        Err(e) => {
            error!("[skycore_should_display] rejected input: {}", e);
            -1
        }
    }
}

// ---------- FFI helpers ----------

fn read_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn parse_required<T: DeserializeOwned>(ptr: *const c_char, what: &'static str) -> Result<T, SkyError> {
    let raw = read_cstr(ptr).ok_or(SkyError::NullPointer(what))?;
    Ok(serde_json::from_str(&raw)?)
}

fn parse_optional<T: DeserializeOwned>(ptr: *const c_char) -> Result<Option<T>, SkyError> {
    read_cstr(ptr)
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(SkyError::from)
}

fn to_c_json<T: serde::Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => CString::new(json).map(CString::into_raw).unwrap_or_else(|_| json_null()),
        Err(e) => {
            error!("[to_c_json] serialization failed: {}", e);
            json_null()
        }
    }
}

fn json_null() -> *mut c_char {
    c"null".to_owned().into_raw()
}
