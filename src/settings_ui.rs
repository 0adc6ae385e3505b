//! Settings editor panel.
//!
//! Edits a draft copy of [`Settings`]; the host re-initialises its preview
//! field whenever the draft changes and persists it when the user confirms.

use crate::config::Rgb;
use crate::settings::{
    ColorPreset, Settings, SPEED_PERCENT_RANGE, STAR_COUNT_RANGE, TWINKLE_PERCENT_RANGE,
};

/// What the user decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Keep these settings.
    Save(Settings),
    /// Discard the draft.
    Cancel,
}

/// Result of showing the editor for one frame.
#[derive(Debug, Default)]
pub struct EditorResponse {
    /// The draft differs from what it was before this frame.
    pub changed: bool,
    pub action: Option<EditorAction>,
}

pub struct SettingsEditor {
    draft: Settings,
}

impl SettingsEditor {
    pub fn new(settings: Settings) -> Self {
        Self {
            draft: settings.clamped(),
        }
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    /// Draw the editor window.
    pub fn show(&mut self, ctx: &egui::Context) -> EditorResponse {
        let before = self.draft.clone();
        let mut action = None;

        egui::Window::new("Starfield Settings")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Stars");
                        ui.add(egui::Slider::new(&mut self.draft.star_count, STAR_COUNT_RANGE));
                        ui.end_row();

                        ui.label("Speed");
                        ui.add(
                            egui::Slider::new(&mut self.draft.speed_percent, SPEED_PERCENT_RANGE)
                                .suffix("%"),
                        );
                        ui.end_row();

                        ui.label("Twinkle");
                        ui.add(
                            egui::Slider::new(&mut self.draft.twinkle_percent, TWINKLE_PERCENT_RANGE)
                                .suffix("%"),
                        );
                        ui.end_row();

                        ui.label("Color");
                        ui.horizontal(|ui| {
                            self.color_controls(ui);
                        });
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        action = Some(EditorAction::Save(self.draft.clone().clamped()));
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(EditorAction::Cancel);
                    }
                    if ui.button("Defaults").clicked() {
                        self.draft = Settings::default();
                    }
                });
            });

        if action.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            action = Some(EditorAction::Cancel);
        }

        EditorResponse {
            changed: self.draft != before,
            action,
        }
    }

    fn color_controls(&mut self, ui: &mut egui::Ui) {
        let current = ColorPreset::from_rgb(self.draft.color);
        let label = current.map_or("Custom", ColorPreset::name);

        egui::ComboBox::from_id_salt("color_preset")
            .selected_text(label)
            .show_ui(ui, |ui| {
                for preset in ColorPreset::ALL {
                    if ui
                        .selectable_label(current == Some(preset), preset.name())
                        .clicked()
                    {
                        self.draft.color = preset.rgb();
                    }
                }
            });

        let mut rgb = self.draft.color.to_array();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            self.draft.color = Rgb::from(rgb);
        }
    }
}
