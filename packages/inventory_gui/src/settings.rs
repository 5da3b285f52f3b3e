use crate::{
    item::RawItemId,
    lang::Lang,
};
use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "inventory_gui.json";


/// Tunables of the GUI system. Shared by every GUI built against the same context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks between closing a container and opening its replacement.
    pub reopen_delay_ticks: u32,
    /// Ticks before a single-slot drag is replayed as a place click.
    pub drag_delay_ticks: u32,
    /// Longest title a container may have, in characters.
    pub max_title_len: usize,
    /// Bound on the number of steps of one shift-click auto-insert.
    pub max_auto_insert_steps: u32,
    /// Number of slots of the viewer's own inventory considered by auto-insert.
    pub bottom_auto_insert_slots: usize,
    /// Item used to display the page navigation buttons.
    pub page_button_item: RawItemId,
    pub lang: Lang,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            reopen_delay_ticks: 2,
            drag_delay_ticks: 1,
            max_title_len: 32,
            max_auto_insert_steps: 64,
            bottom_auto_insert_slots: 36,
            page_button_item: RawItemId(339),
            lang: Lang::default(),
        }
    }
}

impl Settings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        Self::try_read(path).unwrap_or_default()
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        ensure!(settings.max_title_len > 0, "max_title_len must be positive");
        Ok(settings)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }
}


#[test]
fn test_settings_partial_json_fills_defaults() {
    let settings: Settings = serde_json::from_str(r#"{ "reopen_delay_ticks": 5 }"#).unwrap();
    assert_eq!(settings.reopen_delay_ticks, 5);
    assert_eq!(settings.max_title_len, 32);
    assert_eq!(settings.lang, Lang::default());
}

#[test]
fn test_settings_file_round_trip() {
    let path = std::env::temp_dir().join(format!("inventory_gui_settings_{}.json", uuid::Uuid::new_v4()));
    let mut settings = Settings::default();
    settings.drag_delay_ticks = 3;
    settings.lang.next_page_name = "Weiter".into();
    settings.write(&path).unwrap();
    assert_eq!(Settings::try_read(&path).unwrap(), settings);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(Settings::read(&path), Settings::default());
}
