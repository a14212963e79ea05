use crate::app::infrastructure::preferences::SettingsStore;

/// Preferences node holding the editor settings.
pub const EDITOR_NODE: &str = "editor";

pub const KEY_THEME: &str = "theme";
pub const KEY_FONT_SIZE: &str = "font_size";
pub const KEY_SHOW_LINE_NUMBERS: &str = "show_line_numbers";

pub const MIN_FONT_SIZE: u32 = 5;
pub const MAX_FONT_SIZE: u32 = 30;

/// Editor themes offered by the settings dialog. Keys match the CSS
/// classes of the embedded editor page.
pub const THEMES: &[(&str, &str)] = &[
    ("default", "Default"),
    ("eclipse", "Eclipse"),
    ("idea", "IntelliJ"),
    ("monokai", "Monokai"),
    ("solarized-light", "Solarized Light"),
    ("solarized-dark", "Solarized Dark"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub theme: String,
    /// Always within `MIN_FONT_SIZE..=MAX_FONT_SIZE`.
    font_size: u32,
    pub show_line_numbers: bool,
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_font_size() -> u32 {
    14
}

fn default_show_line_numbers() -> bool {
    false
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: default_font_size(),
            show_line_numbers: default_show_line_numbers(),
        }
    }
}

impl EditorSettings {
    pub fn new(theme: &str, font_size: i64, show_line_numbers: bool) -> Self {
        Self {
            theme: theme.to_string(),
            font_size: clamp_font_size(font_size),
            show_line_numbers,
        }
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: i64) {
        self.font_size = clamp_font_size(size);
    }

    /// Read settings from `store`. Missing or mistyped keys take their
    /// default individually.
    pub fn load(store: &dyn SettingsStore) -> Self {
        Self::new(
            &store.get_string(EDITOR_NODE, KEY_THEME, &default_theme()),
            store.get_int(EDITOR_NODE, KEY_FONT_SIZE, default_font_size() as i64),
            store.get_bool(EDITOR_NODE, KEY_SHOW_LINE_NUMBERS, default_show_line_numbers()),
        )
    }

    /// Write every field to `store`. Persisting to disk is up to the store.
    pub fn store(&self, store: &mut dyn SettingsStore) {
        store.put_string(EDITOR_NODE, KEY_THEME, &self.theme);
        store.put_int(EDITOR_NODE, KEY_FONT_SIZE, self.font_size as i64);
        store.put_bool(EDITOR_NODE, KEY_SHOW_LINE_NUMBERS, self.show_line_numbers);
    }

    /// Display name of the theme, or the raw key for unknown themes.
    pub fn theme_display_name(&self) -> &str {
        THEMES
            .iter()
            .find(|(key, _)| *key == self.theme)
            .map(|(_, name)| *name)
            .unwrap_or(&self.theme)
    }
}

pub fn clamp_font_size(size: i64) -> u32 {
    size.clamp(MIN_FONT_SIZE as i64, MAX_FONT_SIZE as i64) as u32
}
