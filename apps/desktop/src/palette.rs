use catalog::{Entity, EntityKind, Race};

use crate::app::{App, CatalogState};

impl App {
    pub(crate) fn palette_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Catalog");

        ui.horizontal(|ui| {
            for race in Race::ALL {
                ui.selectable_value(&mut self.selected_race, race, race.as_str());
            }
        });
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.selected_kind, EntityKind::Unit, "units");
            ui.selectable_value(&mut self.selected_kind, EntityKind::Building, "buildings");
            ui.selectable_value(&mut self.selected_kind, EntityKind::Upgrade, "upgrades");
        });
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
        });
        ui.separator();

        let mut to_add: Option<Entity> = None;
        match &self.catalog {
            CatalogState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading catalog...");
                });
            }
            CatalogState::Failed(err) => {
                ui.colored_label(
                    egui::Color32::from_rgb(220, 90, 90),
                    format!("Catalog unavailable: {err}"),
                );
            }
            CatalogState::Ready(catalog) => {
                let entities = catalog.search(self.selected_race, self.selected_kind, &self.search);
                ui.label(format!("{} entries", entities.len()));
                egui_extras::TableBuilder::new(ui)
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(egui_extras::Column::remainder()) // Name
                    .column(egui_extras::Column::auto()) // Cost
                    .column(egui_extras::Column::auto()) // Time
                    .column(egui_extras::Column::auto()) // Add
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Name");
                        });
                        header.col(|ui| {
                            ui.strong("Cost");
                        });
                        header.col(|ui| {
                            ui.strong("Time");
                        });
                        header.col(|ui| {
                            ui.strong("");
                        });
                    })
                    .body(|mut body| {
                        for entity in entities {
                            body.row(22.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(entity.name.as_str());
                                });
                                row.col(|ui| {
                                    ui.label(format!("{}/{}", entity.minerals, entity.gas));
                                });
                                row.col(|ui| {
                                    ui.label(format!("{}s", entity.duration));
                                });
                                row.col(|ui| {
                                    if ui.button("Add").clicked() {
                                        to_add = Some(entity.clone());
                                    }
                                });
                            });
                        }
                    });
            }
        }

        if let Some(entity) = to_add {
            tracing::debug!(name = %entity.name, "placing entity from palette");
            self.timeline.add_item(entity);
        }
    }
}
