use eframe::egui;

use fractview_core::{Axis, FractalKind, FractalSpec, Gesture, Precision};

use crate::app::{FractViewApp, ROTATION_STEP, SEED_RATE_STEP};

const PANEL_WIDTH: f32 = 260.0;

/// Single-line text field that reports `true` when the user commits with Enter.
fn commit_field(ui: &mut egui::Ui, text: &mut String) -> bool {
    let response = ui.add(egui::TextEdit::singleline(text).desired_width(ui.available_width()));
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

impl FractViewApp {
    pub(crate) fn show_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(PANEL_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.fractal_section(ui);
                    ui.separator();
                    self.view_section(ui);
                    if self.kind.needs_seed() {
                        ui.separator();
                        self.seed_section(ui);
                    }
                    ui.separator();
                    self.status_section(ui);
                });
            });
    }

    fn fractal_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Fractal");

        let mut kind = self.kind;
        egui::ComboBox::from_id_salt("fractal_kind")
            .selected_text(kind.label())
            .show_ui(ui, |ui| {
                for k in FractalKind::ALL {
                    ui.selectable_value(&mut kind, k, k.label());
                }
            });
        if kind != self.kind {
            self.kind = kind;
            self.send(Gesture::SetFractalKind(kind));
        }

        ui.horizontal(|ui| {
            ui.label("Precision:");
            let mut precision = self.precision;
            for p in Precision::ALL {
                ui.radio_value(&mut precision, p, p.label());
            }
            if precision != self.precision {
                self.precision = precision;
                self.send(Gesture::SetPrecision(precision));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Iterations:");
            if ui
                .add(
                    egui::DragValue::new(&mut self.max_iterations)
                        .range(1..=FractalSpec::MAX_ITERATIONS_LIMIT)
                        .speed(10.0),
                )
                .changed()
            {
                self.send(Gesture::SetIterations(self.max_iterations));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Power:");
            if ui
                .add(
                    egui::DragValue::new(&mut self.power)
                        .range(1.0..=16.0)
                        .speed(0.01),
                )
                .changed()
            {
                self.send(Gesture::SetPower(self.power));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Palette:");
            let mut selected = self.palette.clone();
            egui::ComboBox::from_id_salt("palette")
                .selected_text(&selected)
                .show_ui(ui, |ui| {
                    for name in &self.palette_names {
                        ui.selectable_value(&mut selected, name.clone(), name);
                    }
                });
            if selected != self.palette {
                self.send(Gesture::SetPalette(selected));
            }
        });
    }

    fn view_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("View");

        for (axis, label) in [(Axis::X, "Center X"), (Axis::Y, "Center Y")] {
            let idx = axis_index(axis);
            ui.label(label);
            if commit_field(ui, &mut self.fields.center[idx]) {
                self.send(Gesture::SetCenter {
                    axis,
                    text: self.fields.center[idx].clone(),
                });
            }
        }

        ui.label("Side");
        if commit_field(ui, &mut self.fields.side) {
            self.send(Gesture::SetSide(self.fields.side.clone()));
        }

        ui.label("Rotation (degrees)");
        ui.horizontal(|ui| {
            if ui.button("\u{27f2}").on_hover_text("Rotate left (Q)").clicked() {
                self.send(Gesture::Rotate {
                    degrees: ROTATION_STEP,
                });
            }
            if ui.button("\u{27f3}").on_hover_text("Rotate right (E)").clicked() {
                self.send(Gesture::Rotate {
                    degrees: -ROTATION_STEP,
                });
            }
            if commit_field(ui, &mut self.fields.rotation) {
                self.send(Gesture::SetRotation(self.fields.rotation.clone()));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Lock axis:");
            for (axis, label) in [(Axis::X, "X"), (Axis::Y, "Y")] {
                let mut locked = self.axis_locked(axis);
                if ui.checkbox(&mut locked, label).changed() {
                    self.send(Gesture::ToggleAxisLock(axis));
                }
            }
        });

        if ui.button("Reset view (R)").clicked() {
            self.send(Gesture::Reset);
        }
    }

    fn seed_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Julia seed");

        for (axis, label) in [(Axis::X, "Seed X"), (Axis::Y, "Seed Y")] {
            let idx = axis_index(axis);
            ui.label(label);
            if commit_field(ui, &mut self.fields.seed[idx]) {
                self.send(Gesture::SetSeed {
                    axis,
                    text: self.fields.seed[idx].clone(),
                });
            }
        }

        ui.horizontal(|ui| {
            ui.label(format!("Rate: {:.2e}", self.seed.change_rate));
            if ui.small_button("\u{00f7}2").on_hover_text("T").clicked() {
                self.send(Gesture::ScaleSeedRate(1.0 / SEED_RATE_STEP));
            }
            if ui.small_button("\u{00d7}2").on_hover_text("Y").clicked() {
                self.send(Gesture::ScaleSeedRate(SEED_RATE_STEP));
            }
        });

        let mut frozen = self.seed.frozen;
        if ui.checkbox(&mut frozen, "Freeze seed (M)").changed() {
            self.send(Gesture::ToggleSeedFreeze);
        }
    }

    fn status_section(&mut self, ui: &mut egui::Ui) {
        match &self.performance {
            Some(sample) => {
                ui.label(format!("{} fps", sample.fps));
                ui.label(format!("{:.2} ms / frame", sample.frame_time_ms));
            }
            None => {
                ui.label("Measuring...");
            }
        }

        let mut dismissed = false;
        if let Some(err) = &self.last_error {
            ui.add_space(6.0);
            ui.colored_label(egui::Color32::from_rgb(255, 110, 90), err);
            dismissed = ui.small_button("Dismiss").clicked();
        }
        if dismissed {
            self.last_error = None;
        }
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
    }
}
