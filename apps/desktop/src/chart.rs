use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

use catalog::Race;
use timeline::{format_time, layout, DragMode, DragSession, ItemId};

use crate::app::App;

const RULER_H: f32 = 24.0;
const ROW_H: f32 = 72.0;
const GUTTER_W: f32 = 190.0;
const ITEM_PAD: f32 = 6.0;
/// Grabbing within this many pixels of an item's right edge resizes it.
const RESIZE_GRIP: f32 = 6.0;
/// Drop-zone markers only show near the drag position.
const DROP_ZONE_NEAR: f32 = 30.0;

enum RowAction {
    Delete(usize),
    Clear(usize),
    AlignLeft(usize),
    AlignRight(usize),
}

fn race_color(race: Race) -> Color32 {
    match race {
        Race::Protoss => Color32::from_rgb(168, 134, 58),
        Race::Terran => Color32::from_rgb(52, 96, 158),
        Race::Zerg => Color32::from_rgb(122, 66, 146),
    }
}

impl App {
    pub(crate) fn chart_ui(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let scale = self.timeline.time_scale();
                let span = self.timeline.max_time_span();
                let content_w = (GUTTER_W + span * scale + 120.0).max(ui.available_width());
                let content_h = RULER_H + self.timeline.row_count() as f32 * ROW_H;
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(content_w, content_h), egui::Sense::click());
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, Color32::from_rgb(18, 18, 20));

                let origin_x = rect.left() + GUTTER_W;
                let lanes_top = rect.top() + RULER_H;

                self.paint_ruler(&painter, rect, origin_x, lanes_top, span, scale);
                let row_action = self.row_gutter_ui(ui, &painter, rect, lanes_top);
                self.items_ui(ui, &painter, origin_x, lanes_top);
                self.drag_wiring(ui, origin_x, lanes_top);
                self.paint_drop_zones(&painter, origin_x, lanes_top);

                if response.clicked() {
                    self.timeline.select(None);
                }

                // Ctrl+scroll / pinch rescales time under the chart.
                if response.hovered() {
                    let zoom = ui.input(|i| i.zoom_delta());
                    if zoom != 1.0 {
                        let target = self.timeline.time_scale() * zoom;
                        self.timeline.rescale(target);
                    }
                }

                let typing = ui.ctx().memory(|m| m.focused().is_some());
                let pressed_delete = !typing
                    && ui.input(|i| {
                        i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)
                    });
                if pressed_delete {
                    if let Some(selected) = self.timeline.selected() {
                        self.timeline.delete_item(selected);
                    }
                }

                match row_action {
                    Some(RowAction::Delete(row)) => {
                        if let Err(err) = self.timeline.delete_row(row) {
                            self.notice = Some(err.to_string());
                        }
                    }
                    Some(RowAction::Clear(row)) => self.timeline.clear_row(row),
                    Some(RowAction::AlignLeft(row)) => self.timeline.align_left(row),
                    Some(RowAction::AlignRight(row)) => self.timeline.align_right(row),
                    None => {}
                }
            });
    }

    fn paint_ruler(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        origin_x: f32,
        lanes_top: f32,
        span: f32,
        scale: f32,
    ) {
        let interval = if span > 600.0 { 60.0 } else { 30.0 };
        let mut t = 0.0;
        while t <= span {
            let x = origin_x + t * scale;
            painter.text(
                Pos2::new(x, rect.top() + 4.0),
                Align2::LEFT_TOP,
                format_time(t),
                FontId::monospace(11.0),
                Color32::from_gray(160),
            );
            t += interval;
        }
        // Vertical gridlines every 10 seconds.
        let mut t = 0.0;
        while t <= span {
            let x = origin_x + t * scale;
            painter.line_segment(
                [Pos2::new(x, lanes_top), Pos2::new(x, rect.bottom())],
                Stroke::new(1.0, Color32::from_gray(45)),
            );
            t += 10.0;
        }
        painter.line_segment(
            [Pos2::new(origin_x, rect.top()), Pos2::new(origin_x, rect.bottom())],
            Stroke::new(1.0, Color32::from_gray(70)),
        );
    }

    fn row_gutter_ui(
        &self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        rect: Rect,
        lanes_top: f32,
    ) -> Option<RowAction> {
        let mut action = None;
        for row in 0..self.timeline.row_count() {
            let y = lanes_top + row as f32 * ROW_H;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(1.0, Color32::from_gray(60)),
            );
            painter.text(
                Pos2::new(rect.left() + 8.0, y + 6.0),
                Align2::LEFT_TOP,
                format!("Row {}", row + 1),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
            let stats = self.timeline.row_stats(row);
            painter.text(
                Pos2::new(rect.left() + 8.0, y + 24.0),
                Align2::LEFT_TOP,
                format!("End: {}", format_time(stats.end_time)),
                FontId::monospace(11.0),
                Color32::from_gray(170),
            );
            painter.text(
                Pos2::new(rect.left() + 8.0, y + 38.0),
                Align2::LEFT_TOP,
                format!("Cost: {}/{}", stats.total_minerals, stats.total_gas),
                FontId::monospace(11.0),
                Color32::from_gray(170),
            );

            let controls: [(&str, &str, fn(usize) -> RowAction); 4] = [
                ("❌", "Delete row", RowAction::Delete),
                ("🗑", "Clear row", RowAction::Clear),
                ("⬅", "Align left", RowAction::AlignLeft),
                ("➡", "Align with row above end", RowAction::AlignRight),
            ];
            for (i, (label, hover, make)) in controls.into_iter().enumerate() {
                let button_rect = Rect::from_min_size(
                    Pos2::new(rect.left() + 8.0 + i as f32 * 28.0, y + ROW_H - 26.0),
                    egui::vec2(24.0, 20.0),
                );
                if ui
                    .put(button_rect, egui::Button::new(label).small())
                    .on_hover_text(hover)
                    .clicked()
                {
                    action = Some(make(row));
                }
            }
        }
        action
    }

    fn items_ui(&mut self, ui: &mut egui::Ui, painter: &egui::Painter, origin_x: f32, lanes_top: f32) {
        let mut clicked: Option<ItemId> = None;
        let mut begin: Option<(ItemId, f32, DragMode)> = None;

        for item in self.timeline.items() {
            let x0 = origin_x + item.x;
            let y = lanes_top + item.row as f32 * ROW_H;
            let item_rect = Rect::from_min_max(
                Pos2::new(x0, y + ITEM_PAD),
                Pos2::new(x0 + item.width, y + ROW_H - ITEM_PAD),
            );

            let mut border = Stroke::new(1.0, Color32::BLACK);
            if self.timeline.selected() == Some(item.id) {
                border = Stroke::new(2.0, Color32::WHITE);
            } else if item.boosted() {
                border = Stroke::new(2.0, Color32::from_rgb(80, 200, 255));
            }
            painter.rect_filled(item_rect, 4.0, race_color(item.entity.race));
            painter.rect_stroke(item_rect, 4.0, border);
            painter.text(
                item_rect.center_top() + egui::vec2(0.0, 4.0),
                Align2::CENTER_TOP,
                item.entity.name.as_str(),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
            painter.text(
                item_rect.center_bottom() - egui::vec2(0.0, 4.0),
                Align2::CENTER_BOTTOM,
                format!("{}s", item.effective_duration()),
                FontId::monospace(10.0),
                Color32::from_gray(220),
            );

            let resp = ui.interact(
                item_rect,
                egui::Id::new(("item", item.id.raw())),
                egui::Sense::click_and_drag(),
            );
            if resp.clicked() {
                clicked = Some(item.id);
            }
            if resp.drag_started() {
                let pointer_x = resp
                    .interact_pointer_pos()
                    .map(|p| p.x - origin_x)
                    .unwrap_or(item.x);
                let mode = if (origin_x + pointer_x - item_rect.right()).abs() <= RESIZE_GRIP {
                    DragMode::Resize
                } else if self.linked_drag {
                    DragMode::MoveLinked
                } else {
                    DragMode::Move
                };
                begin = Some((item.id, pointer_x, mode));
            }
        }

        if let Some(id) = clicked {
            self.timeline.select(Some(id));
        }
        if let Some((id, pointer_x, mode)) = begin {
            self.timeline.select(Some(id));
            self.drag = DragSession::begin(&self.timeline, id, pointer_x, mode);
        }
    }

    /// Advance or finish the active drag from the global pointer state, so a
    /// release anywhere ends the gesture. A release with no session does
    /// nothing.
    fn drag_wiring(&mut self, ui: &mut egui::Ui, origin_x: f32, lanes_top: f32) {
        if !ui.input(|i| i.pointer.primary_down()) {
            if let Some(drag) = self.drag.take() {
                drag.finish(&mut self.timeline);
            }
        } else if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
            if let Some(mut drag) = self.drag.take() {
                let local_x = pos.x - origin_x;
                let row = (((pos.y - lanes_top) / ROW_H).floor() as isize)
                    .clamp(0, self.timeline.row_count() as isize - 1)
                    as usize;
                drag.update(&mut self.timeline, local_x, row);
                self.drag = Some(drag);
            }
        }
    }

    fn paint_drop_zones(&self, painter: &egui::Painter, origin_x: f32, lanes_top: f32) {
        let Some(drag) = &self.drag else { return };
        if drag.mode() == DragMode::Resize {
            return;
        }
        let Some(item) = self.timeline.item(drag.item()) else {
            return;
        };
        let row = item.row;
        let drag_x = item.x;
        for point in layout::insertion_points(&self.timeline, row, Some(drag.item())) {
            if (point - drag_x).abs() > DROP_ZONE_NEAR {
                continue;
            }
            let x = origin_x + point;
            let y = lanes_top + row as f32 * ROW_H;
            painter.line_segment(
                [Pos2::new(x, y + 2.0), Pos2::new(x, y + ROW_H - 2.0)],
                Stroke::new(2.0, Color32::from_rgb(120, 220, 120)),
            );
        }
    }
}
