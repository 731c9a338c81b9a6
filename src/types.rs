// Strong typing over strings. Geometry newtypes, class names, and page configuration.
// Configuration arrives from JS as JSON; every field has a serde default.

use serde::{Deserialize, Deserializer, Serialize};

/// Class added to the navigation bar once the page has scrolled past the threshold.
pub const CLASS_SCROLLED: &str = "scrolled";
/// Class marking an open menu, a pressed toggle, or the current nav link.
pub const CLASS_ACTIVE: &str = "active";
/// Class marking an element whose entrance animation has played.
pub const CLASS_REVEALED: &str = "fade-in-up";
/// Class marking an image whose real source has been swapped in.
pub const CLASS_LOADED: &str = "loaded";
/// Class carried by the transient ripple overlay.
pub const CLASS_RIPPLE: &str = "ripple";

/// A point in client (viewport) coordinates, CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle in client coordinates, CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_dom(rect: &web_sys::DomRect) -> Self {
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }
}

/// Document-space extent of a page section, as used by the active-section highlighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        SectionBounds {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open containment: `top <= y < top + height`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Intersection root margin in pixels. Negative values shrink the root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RootMargin {
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
    #[serde(default)]
    pub left: i32,
}

impl RootMargin {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        RootMargin {
            top,
            right,
            bottom,
            left,
        }
    }

    /// CSS margin string in top/right/bottom/left order.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Visibility watcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Fraction of the element that must be visible (0.0 to 1.0).
    #[serde(
        default = "default_watch_threshold",
        deserialize_with = "deserialize_threshold"
    )]
    pub threshold: f64,
    #[serde(default)]
    pub root_margin: RootMargin,
}

fn default_watch_threshold() -> f64 {
    0.1
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(|threshold| threshold.clamp(0.0, 1.0))
}

impl WatchSettings {
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        WatchSettings {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
        }
    }
}

/// Page configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub selectors: Selectors,
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub scrolling: ScrollSettings,
    #[serde(default = "default_reveal_watch")]
    pub reveal: WatchSettings,
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub effects: EffectSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

impl SiteConfig {
    /// Parse configuration JSON. An empty or blank string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(SiteConfig::default());
        }
        serde_json::from_str(json)
    }
}

fn default_reveal_watch() -> WatchSettings {
    WatchSettings::new(default_watch_threshold(), RootMargin::new(0, 0, -50, 0))
}

impl Default for WatchSettings {
    fn default() -> Self {
        default_reveal_watch()
    }
}

/// The markup contract: where each behavior finds its elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub navbar: String,
    pub nav_toggle: String,
    pub nav_menu: String,
    pub nav_link: String,
    /// Nav links that point at in-page sections.
    pub section_link: String,
    pub anchor: String,
    pub hero: String,
    pub section: String,
    pub reveal: String,
    pub feature_card: String,
    pub feature_title: String,
    pub screenshot_image: String,
    pub image: String,
    pub button: String,
    pub download_button: String,
    /// Class (not selector) that tags the App Store download button.
    pub app_store_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Selectors {
            navbar: ".navbar".into(),
            nav_toggle: ".nav-toggle".into(),
            nav_menu: ".nav-menu".into(),
            nav_link: ".nav-link".into(),
            section_link: ".nav-link[href^='#']".into(),
            anchor: "a[href^=\"#\"]".into(),
            hero: ".hero".into(),
            section: "section[id]".into(),
            reveal: ".feature-card, .screenshot".into(),
            feature_card: ".feature-card".into(),
            feature_title: "h3".into(),
            screenshot_image: ".screenshot img".into(),
            image: "img".into(),
            button: ".btn, .download-btn".into(),
            download_button: ".download-btn".into(),
            app_store_class: "app-store".into(),
        }
    }
}

/// Navigation bar and hero behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// The bar is "scrolled" strictly past this many pixels.
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold: f64,
    /// Hero starts fading strictly past this scroll offset.
    #[serde(default = "default_hero_fade_start")]
    pub hero_fade_start: f64,
    /// Scroll distance over which the hero would fade to zero.
    #[serde(default = "default_hero_fade_distance")]
    pub hero_fade_distance: f64,
    #[serde(default = "default_hero_min_opacity")]
    pub hero_min_opacity: f64,
}

fn default_scrolled_threshold() -> f64 {
    100.0
}

fn default_hero_fade_start() -> f64 {
    300.0
}

fn default_hero_fade_distance() -> f64 {
    2000.0
}

fn default_hero_min_opacity() -> f64 {
    0.7
}

impl Default for NavigationSettings {
    fn default() -> Self {
        NavigationSettings {
            scrolled_threshold: default_scrolled_threshold(),
            hero_fade_start: default_hero_fade_start(),
            hero_fade_distance: default_hero_fade_distance(),
            hero_min_opacity: default_hero_min_opacity(),
        }
    }
}

/// How bursts of native scroll events are turned into dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScrollScheduling {
    /// One dispatch per animation frame.
    AnimationFrame,
    /// One dispatch after the scroll has been quiet for `wait_ms`.
    Debounce { wait_ms: u32 },
}

impl Default for ScrollScheduling {
    fn default() -> Self {
        ScrollScheduling::AnimationFrame
    }
}

/// Scroll geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Height of the fixed header subtracted from smooth-scroll targets.
    #[serde(default = "default_header_offset")]
    pub header_offset: f64,
    /// Distance below the viewport top used to probe the current section.
    #[serde(default = "default_section_probe_offset")]
    pub section_probe_offset: f64,
    #[serde(default)]
    pub scheduling: ScrollScheduling,
}

fn default_header_offset() -> f64 {
    80.0
}

fn default_section_probe_offset() -> f64 {
    100.0
}

impl Default for ScrollSettings {
    fn default() -> Self {
        ScrollSettings {
            header_offset: default_header_offset(),
            section_probe_offset: default_section_probe_offset(),
            scheduling: ScrollScheduling::default(),
        }
    }
}

/// Lazy image loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_image_watch")]
    pub watch: WatchSettings,
    /// Delay before the pulse grows.
    #[serde(default = "default_pulse_grow_ms")]
    pub pulse_grow_ms: u32,
    /// Delay after the grow before the pulse settles back.
    #[serde(default = "default_pulse_settle_ms")]
    pub pulse_settle_ms: u32,
}

fn default_image_watch() -> WatchSettings {
    WatchSettings::new(default_watch_threshold(), RootMargin::new(50, 0, 50, 0))
}

fn default_pulse_grow_ms() -> u32 {
    100
}

fn default_pulse_settle_ms() -> u32 {
    200
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            watch: default_image_watch(),
            pulse_grow_ms: default_pulse_grow_ms(),
            pulse_settle_ms: default_pulse_settle_ms(),
        }
    }
}

/// Cosmetic interaction effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSettings {
    #[serde(default = "default_true")]
    pub ripples: bool,
    #[serde(default = "default_ripple_ms")]
    pub ripple_ms: u32,
    #[serde(default = "default_true")]
    pub card_hover: bool,
}

fn default_true() -> bool {
    true
}

fn default_ripple_ms() -> u32 {
    600
}

impl Default for EffectSettings {
    fn default() -> Self {
        EffectSettings {
            ripples: true,
            ripple_ms: default_ripple_ms(),
            card_hover: true,
        }
    }
}

/// Analytics hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        AnalyticsSettings { enabled: true }
    }
}
