use eframe::egui;

use crate::app::{FractViewApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl FractViewApp {
    pub(crate) fn show_hud(&self, ctx: &egui::Context) {
        let Some(view) = &self.view else {
            return;
        };

        // -- Top-right: camera readout --
        egui::Area::new(egui::Id::new("hud_view"))
            .anchor(egui::Align2::RIGHT_TOP, [-HUD_MARGIN, HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(160))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        ui.label(format!("{} | {}", self.kind.label(), view.precision.label()));
                        ui.label(format!(
                            "Center: {} {}",
                            view.center_text[0], view.center_text[1]
                        ));
                        ui.label(format!("Side: {}", view.side_text));
                        ui.label(format!("Rotation: {:.1}\u{00b0}", view.rotation));
                        if self.kind.needs_seed() {
                            ui.label(format!(
                                "Seed: {:.6} {:+.6}i{}",
                                self.seed.value.x,
                                self.seed.value.y,
                                if self.seed.frozen { " (frozen)" } else { "" }
                            ));
                        }
                        if let Some(sample) = &self.performance {
                            ui.label(format!("{} fps", sample.fps));
                        }
                        if self.selecting {
                            ui.colored_label(egui::Color32::YELLOW, "Selecting");
                        }
                    });
            });
    }
}
