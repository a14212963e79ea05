//! Live editing of editor settings.
//!
//! Every change to the working copy is shown in the editor at once.
//! `commit` keeps it, `discard` puts the previous settings back.

use super::editor::EditorWidget;
use crate::app::domain::settings::EditorSettings;
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::preferences::Preferences;

pub struct SettingsSession {
    widget: EditorWidget,
    original: EditorSettings,
    working: EditorSettings,
}

impl SettingsSession {
    pub fn begin(widget: EditorWidget, current: EditorSettings) -> Self {
        Self {
            widget,
            working: current.clone(),
            original: current,
        }
    }

    pub fn working(&self) -> &EditorSettings {
        &self.working
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        self.working.theme = theme.to_string();
        self.widget.set_theme(theme)
    }

    pub fn set_font_size(&mut self, size: i64) -> Result<()> {
        self.working.set_font_size(size);
        self.widget.set_font_size(self.working.font_size())
    }

    pub fn set_show_line_numbers(&mut self, show: bool) -> Result<()> {
        self.working.show_line_numbers = show;
        self.widget.set_show_line_numbers(show)
    }

    /// Reset the working copy to the defaults.
    pub fn reset(&mut self) -> Result<()> {
        self.working = EditorSettings::default();
        self.widget.apply(&self.working)
    }

    /// Persist the working copy. It is already applied, so it is returned
    /// as the settings in effect even when writing them out fails.
    pub fn commit(self, prefs: &mut Preferences) -> (EditorSettings, Result<()>) {
        self.working.store(prefs);
        let saved = prefs.save();
        match &saved {
            Ok(()) => tracing::info!("editor settings saved: {:?}", self.working),
            Err(e) => tracing::warn!("editor settings applied but not saved: {}", e),
        }
        (self.working, saved)
    }

    /// Drop the working copy and reapply the settings from before.
    pub fn discard(self) -> (EditorSettings, Result<()>) {
        let restored = if self.working != self.original {
            self.widget.apply(&self.original)
        } else {
            Ok(())
        };
        (self.original, restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bridge::script_bridge::tests::fixture;
    use crate::app::domain::settings::MAX_FONT_SIZE;

    #[test]
    fn test_changes_applied_live() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();

        let mut session = SettingsSession::begin(widget, EditorSettings::default());
        session.set_font_size(200).unwrap();
        assert_eq!(session.working().font_size(), MAX_FONT_SIZE);
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.setFontSize(30);")
        );
    }

    #[test]
    fn test_commit_persists() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        let mut prefs = Preferences::in_memory();

        let mut session = SettingsSession::begin(widget, EditorSettings::default());
        session.set_theme("monokai").unwrap();
        session.set_show_line_numbers(true).unwrap();
        let (committed, saved) = session.commit(&mut prefs);
        saved.unwrap();

        assert_eq!(committed, EditorSettings::new("monokai", 14, true));
        assert_eq!(EditorSettings::load(&prefs), committed);
    }

    #[test]
    fn test_discard_restores_previous() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        let previous = EditorSettings::new("eclipse", 16, false);

        let mut session = SettingsSession::begin(widget, previous.clone());
        session.set_theme("monokai").unwrap();
        let (restored, applied) = session.discard();
        applied.unwrap();
        assert_eq!(restored, previous);
        assert!(f.runtime.scripts().contains(&"editorInstance.setTheme('eclipse');".to_string()));
    }

    #[test]
    fn test_commit_keeps_applied_settings_when_save_fails() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let mut prefs = Preferences::load_from(blocker.join("prefs.json"));

        let mut session = SettingsSession::begin(widget, EditorSettings::default());
        session.set_theme("monokai").unwrap();
        let (in_effect, saved) = session.commit(&mut prefs);

        assert!(saved.is_err());
        assert_eq!(in_effect.theme, "monokai");
        assert_eq!(EditorSettings::load(&prefs), in_effect);
    }

    #[test]
    fn test_reset_to_defaults() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();

        let mut session = SettingsSession::begin(widget, EditorSettings::new("idea", 20, true));
        session.reset().unwrap();
        assert_eq!(session.working(), &EditorSettings::default());
    }
}
