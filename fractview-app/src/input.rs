use std::sync::Arc;

use eframe::{egui, egui_glow};

use fractview_core::{Direction, Gesture, Vec2};

use crate::app::{FractViewApp, ROTATION_STEP, SEED_RATE_STEP};

fn to_vec2(v: egui::Vec2) -> Vec2<f32> {
    Vec2::new(v.x, v.y)
}

impl FractViewApp {
    /// Allocate the fractal canvas, turn pointer input into gestures and
    /// schedule the GL paint callback.
    pub(crate) fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        self.handle_canvas_input(ui.ctx(), &response);

        let dt = ui.input(|i| i.stable_dt);
        let size = Vec2::new(rect.width(), rect.height());
        let renderer = Arc::clone(&self.renderer);
        painter.add(egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                if let Ok(mut renderer) = renderer.lock() {
                    renderer.paint(painter.gl(), dt, size);
                }
            })),
        });
    }

    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let origin = response.rect.min;
        let local = |pos: egui::Pos2| to_vec2(pos - origin);

        if let Some(pos) = response.hover_pos() {
            let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
            if scroll_y != 0.0 {
                self.send(Gesture::Zoom {
                    scroll: scroll_y,
                    cursor: local(pos),
                });
            }

            // Steers the Julia seed; ignored for other kinds or while frozen.
            let motion = ctx.input(|i| i.pointer.delta());
            if motion != egui::Vec2::ZERO {
                self.send(Gesture::PointerMoved {
                    delta: to_vec2(motion),
                });
            }
        }

        // Ctrl + left drag or right drag selects, plain left drag pans.
        let selecting_button = response.dragged_by(egui::PointerButton::Secondary)
            || (response.dragged_by(egui::PointerButton::Primary)
                && ctx.input(|i| i.modifiers.ctrl));

        if response.drag_started() && selecting_button {
            if let Some(pos) = response.interact_pointer_pos() {
                self.selecting = true;
                self.send(Gesture::BeginSelect(local(pos)));
            }
        }

        if response.dragged() {
            if self.selecting {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.send(Gesture::UpdateSelect(local(pos)));
                }
            } else if response.dragged_by(egui::PointerButton::Primary) {
                let delta = response.drag_delta();
                if delta != egui::Vec2::ZERO {
                    self.send(Gesture::Pan {
                        delta: to_vec2(delta),
                    });
                }
            }
        }

        if response.drag_stopped() && self.selecting {
            self.selecting = false;
            self.send(Gesture::CommitSelect);
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let text_editing = ctx.memory(|m| m.focused().is_some());
        if text_editing {
            return;
        }

        let mut gestures = Vec::new();
        ctx.input(|input| {
            let arrows = [
                (egui::Key::ArrowLeft, Direction::Left),
                (egui::Key::ArrowRight, Direction::Right),
                (egui::Key::ArrowUp, Direction::Up),
                (egui::Key::ArrowDown, Direction::Down),
            ];
            for (key, direction) in arrows {
                if input.key_pressed(key) {
                    gestures.push(Gesture::Nudge(direction));
                }
            }

            if input.key_pressed(egui::Key::Q) {
                gestures.push(Gesture::Rotate {
                    degrees: ROTATION_STEP,
                });
            }
            if input.key_pressed(egui::Key::E) {
                gestures.push(Gesture::Rotate {
                    degrees: -ROTATION_STEP,
                });
            }

            if input.key_pressed(egui::Key::T) {
                gestures.push(Gesture::ScaleSeedRate(1.0 / SEED_RATE_STEP));
            }
            if input.key_pressed(egui::Key::Y) {
                gestures.push(Gesture::ScaleSeedRate(SEED_RATE_STEP));
            }
            if input.key_pressed(egui::Key::M) {
                gestures.push(Gesture::ToggleSeedFreeze);
            }

            if input.key_pressed(egui::Key::R) && !input.modifiers.ctrl {
                gestures.push(Gesture::Reset);
            }
            if input.key_pressed(egui::Key::Escape) && self.selecting {
                gestures.push(Gesture::CancelSelect);
            }
            if input.key_pressed(egui::Key::H) {
                self.show_controls = !self.show_controls;
            }
        });

        if gestures.contains(&Gesture::CancelSelect) {
            self.selecting = false;
        }
        for gesture in gestures {
            self.send(gesture);
        }
    }
}
