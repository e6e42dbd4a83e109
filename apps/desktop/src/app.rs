use crossbeam_channel::Receiver;
use egui::Color32;

use catalog::{Catalog, CatalogError, EntityKind, Race};
use timeline::{format_time, DragSession, Timeline, MAX_TIME_SCALE, MIN_TIME_SCALE};

pub(crate) enum CatalogState {
    Loading,
    Ready(Catalog),
    /// Load failed; the palette stays empty but the planner keeps working.
    Failed(String),
}

pub(crate) struct App {
    pub(crate) timeline: Timeline,
    pub(crate) catalog: CatalogState,
    catalog_rx: Receiver<Result<Catalog, CatalogError>>,
    pub(crate) selected_race: Race,
    pub(crate) selected_kind: EntityKind,
    pub(crate) search: String,
    pub(crate) drag: Option<DragSession>,
    pub(crate) linked_drag: bool,
    pub(crate) notice: Option<String>,
}

impl App {
    pub(crate) fn new(catalog_rx: Receiver<Result<Catalog, CatalogError>>) -> Self {
        App {
            timeline: Timeline::new(),
            catalog: CatalogState::Loading,
            catalog_rx,
            selected_race: Race::Protoss,
            selected_kind: EntityKind::Unit,
            search: String::new(),
            drag: None,
            linked_drag: false,
            notice: None,
        }
    }

    fn poll_catalog(&mut self) {
        while let Ok(result) = self.catalog_rx.try_recv() {
            match result {
                Ok(catalog) => {
                    tracing::info!(entries = catalog.len(), "catalog loaded");
                    self.catalog = CatalogState::Ready(catalog);
                }
                Err(err) => {
                    tracing::error!(%err, "catalog load failed");
                    self.catalog = CatalogState::Failed(err.to_string());
                }
            }
        }
    }

    fn export_build_order(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("build_order.json")
            .save_file()
        else {
            return;
        };
        match exporters::write_json(&self.timeline, &path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "build order exported");
                self.notice = Some(format!("Exported {}", path.display()));
            }
            Err(err) => {
                tracing::error!(%err, "export failed");
                self.notice = Some(format!("Export failed: {err}"));
            }
        }
    }

    fn info_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Details");
        let Some(id) = self.timeline.selected() else {
            ui.label("Nothing selected");
            return;
        };
        let Some(item) = self.timeline.item(id) else {
            return;
        };
        let scale = self.timeline.time_scale();
        let mut boost_delta = 0i32;

        ui.strong(item.entity.name.as_str());
        ui.label(format!(
            "{} • {}",
            item.entity.kind.as_str(),
            item.entity.race.as_str()
        ));
        ui.separator();
        egui::Grid::new("item_stats").num_columns(2).show(ui, |ui| {
            ui.label("Minerals");
            ui.label(item.entity.minerals.to_string());
            ui.end_row();
            ui.label("Gas");
            ui.label(item.entity.gas.to_string());
            ui.end_row();
            ui.label("Build time");
            ui.label(format!("{}s", item.effective_duration()));
            ui.end_row();
            ui.label("Supply");
            ui.label(item.entity.supply.to_string());
            ui.end_row();
        });

        for (title, list) in [
            ("Requires", &item.entity.requires),
            ("Produces", &item.entity.produces),
            ("Unlocks", &item.entity.unlocks),
        ] {
            if !list.is_empty() {
                ui.separator();
                ui.strong(title);
                for entry in list {
                    ui.label(format!("• {entry}"));
                }
            }
        }

        ui.separator();
        ui.strong("Timeline");
        let start = item.start_time(scale);
        ui.label(format!("Start: {}", format_time(start)));
        ui.label(format!("End: {}", format_time(start + item.effective_duration())));

        if item.boost_eligible() {
            ui.separator();
            ui.strong("Chrono boost");
            ui.label("Each boost takes 10 seconds off the build time");
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(item.boost_count > 0, egui::Button::new("−"))
                    .clicked()
                {
                    boost_delta = -1;
                }
                ui.label(item.boost_count.to_string());
                if ui
                    .add_enabled(item.boost_count < item.max_boosts(), egui::Button::new("+"))
                    .clicked()
                {
                    boost_delta = 1;
                }
            });
            ui.label(format!("Original time: {}s", item.base_duration));
            ui.label(format!(
                "Time saved: -{}s",
                timeline::BOOST_SECONDS * item.boost_count as f32
            ));
            ui.small(format!(
                "Max: {} boosts (1 per 30s of build time)",
                item.max_boosts()
            ));
        }

        if boost_delta != 0 {
            self.timeline.apply_boost(id, boost_delta);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_catalog();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Build Order Planner");
                ui.separator();
                if ui.button("Add Row").clicked() {
                    self.timeline.add_row();
                }
                if ui.button("Export...").clicked() {
                    self.export_build_order();
                }
                ui.checkbox(&mut self.linked_drag, "Drag trailing items");
                ui.separator();
                let mut scale = self.timeline.time_scale();
                if ui
                    .add(egui::Slider::new(&mut scale, MIN_TIME_SCALE..=MAX_TIME_SCALE).text("px/s"))
                    .changed()
                {
                    self.timeline.rescale(scale);
                }
                ui.label(format!("Scale: {:.1}x", self.timeline.time_scale()));
                if let Some(notice) = self.notice.clone() {
                    ui.separator();
                    ui.colored_label(Color32::from_rgb(240, 180, 60), notice);
                }
            });
        });

        egui::SidePanel::left("palette")
            .default_width(320.0)
            .show(ctx, |ui| {
                self.palette_ui(ui);
            });

        egui::SidePanel::right("details")
            .default_width(260.0)
            .show(ctx, |ui| {
                self.info_ui(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_ui(ui);
        });
    }
}
