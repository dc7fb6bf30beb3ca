use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{self, Align, Layout, RichText, ScrollArea, TextEdit, TopBottomPanel};
use mc_core::export::EXPORT_FILE_NAME;

use crate::actions::{dispatch, AppAction};
use crate::state::AppState;

const CELL_WIDTH: f32 = 180.0;
const ROW_HEIGHT: f32 = 22.0;

pub fn launch() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "msgcat",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogApp::default()))),
    )
}

#[derive(Default)]
pub struct CatalogApp {
    state: AppState,
}

impl CatalogApp {
    fn run_action(&mut self, action: AppAction) {
        if let Err(err) = dispatch(&mut self.state, action) {
            self.state.file_status = err;
        }
    }

    fn pick_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            self.run_action(AppAction::LoadCsv(path));
        }
    }

    fn download(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(EXPORT_FILE_NAME)
            .save_file()
        {
            self.run_action(AppAction::SaveAsPath(path));
        }
    }

    fn draw_menu(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open CSV…").clicked() {
                    ui.close_menu();
                    self.pick_csv();
                }
                if ui.button("Save").clicked() {
                    ui.close_menu();
                    self.run_action(AppAction::SaveCatalog);
                }
                if ui.button("Download…").clicked() {
                    ui.close_menu();
                    self.download();
                }
            });

            ui.menu_button("Modules", |ui| {
                if ui.button("Choose module root…").clicked() {
                    ui.close_menu();
                    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                        self.run_action(AppAction::SetCatalogRoot(
                            dir.to_string_lossy().into_owned(),
                        ));
                        self.run_action(AppAction::ScanCatalogs);
                    }
                }
                if ui.button("Rescan").clicked() {
                    ui.close_menu();
                    self.run_action(AppAction::ScanCatalogs);
                }
            });
        });
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        let translating = self.state.is_translating();
        let mut actions = Vec::new();
        let mut open_clicked = false;
        let mut download_clicked = false;

        ui.horizontal(|ui| {
            open_clicked = ui.button("Open").clicked();

            let module_label = self
                .state
                .current_catalog
                .clone()
                .unwrap_or_else(|| "module".to_string());
            egui::ComboBox::from_id_source("module_combo")
                .selected_text(module_label)
                .show_ui(ui, |ui| {
                    for name in self.state.catalogs.keys() {
                        let selected = self.state.current_catalog.as_deref() == Some(name);
                        if ui.selectable_label(selected, name).clicked() {
                            actions.push(AppAction::OpenCatalog(name.clone()));
                        }
                    }
                });

            let target = self.state.target_code().map(str::to_string);
            egui::ComboBox::from_id_source("locale_combo")
                .selected_text(target.clone().unwrap_or_else(|| "locale".to_string()))
                .show_ui(ui, |ui| {
                    if ui.selectable_label(target.is_none(), "none").clicked() {
                        actions.push(AppAction::SelectLocale(None));
                    }
                    for code in self.state.session.locales() {
                        let selected = target.as_deref() == Some(code.as_str());
                        if ui.selectable_label(selected, &code).clicked() {
                            actions.push(AppAction::SelectLocale(Some(code)));
                        }
                    }
                });

            let mut credential = self.state.credential.clone();
            if ui
                .add(
                    TextEdit::singleline(&mut credential)
                        .password(true)
                        .hint_text("DeepL API key")
                        .desired_width(200.0),
                )
                .changed()
            {
                actions.push(AppAction::SetCredential(credential));
            }

            if ui
                .add_enabled(!translating, egui::Button::new("Translate"))
                .clicked()
            {
                actions.push(AppAction::Translate);
            }
            download_clicked = ui.button("Download").clicked();

            ui.separator();
            ui.label("Search");
            let mut query = self.state.session.filter().to_string();
            if ui
                .add(TextEdit::singleline(&mut query).desired_width(220.0))
                .changed()
            {
                actions.push(AppAction::SetQuery(query));
            }
        });

        for action in actions {
            self.run_action(action);
        }
        if open_clicked {
            self.pick_csv();
        }
        if download_clicked {
            self.download();
        }
    }

    fn draw_grid(&mut self, ui: &mut egui::Ui) {
        let view = self.state.session.view();
        let Some(header) = view.header() else {
            ui.label("Open a CSV catalog or pick a module to start.");
            return;
        };
        let header: Vec<String> = header.cells.iter().map(|cell| cell.text.clone()).collect();
        let visible: Vec<usize> = view.visible_rows().map(|(row, _)| row).collect();
        let mut edits = Vec::new();

        ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for text in &header {
                    ui.add_sized(
                        [CELL_WIDTH, ROW_HEIGHT],
                        egui::Label::new(RichText::new(text).strong()),
                    );
                }
            });
            ui.separator();
            ScrollArea::vertical().show_rows(ui, ROW_HEIGHT, visible.len(), |ui, range| {
                for &row in &visible[range] {
                    let Some(display) = self.state.session.view().row(row) else {
                        continue;
                    };
                    ui.horizontal(|ui| {
                        for (col, cell) in display.cells.iter().enumerate() {
                            if cell.editable {
                                let mut text = cell.text.clone();
                                if ui
                                    .add_sized(
                                        [CELL_WIDTH, ROW_HEIGHT],
                                        TextEdit::singleline(&mut text).id(cell_id(row, col)),
                                    )
                                    .changed()
                                {
                                    edits.push(AppAction::EditCell { row, col, text });
                                }
                            } else {
                                ui.add_sized(
                                    [CELL_WIDTH, ROW_HEIGHT],
                                    egui::Label::new(&cell.text),
                                );
                            }
                        }
                    });
                }
            });
        });

        for action in edits {
            self.run_action(action);
        }
    }

    fn draw_status(&mut self, ui: &mut egui::Ui) {
        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
            if let Some((done, issued)) = self.state.fill_progress() {
                ui.spinner();
                ui.label(format!("translating {done}/{issued}"));
                ui.separator();
            }
            if let Some((filled, total)) = self.state.target_counts() {
                let ratio = if total == 0 {
                    1.0
                } else {
                    filled as f32 / total as f32
                };
                ui.add(egui::ProgressBar::new(ratio).desired_width(160.0));
                ui.label(format!("{filled}/{total}"));
            }
            let shown = self.state.session.view().visible_count();
            ui.label(format!("{shown} rows shown"));
            ui.label(RichText::new(&self.state.file_status).small());
            if !self.state.prefs_error.is_empty() {
                ui.label(RichText::new(&self.state.prefs_error).small().weak());
            }
        });
    }

    fn draw_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("msgcat")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.run_action(AppAction::DismissNotice);
        }
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.poll_fill(false) {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::T)) {
            self.run_action(AppAction::Translate);
        }
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.run_action(AppAction::LoadCsv(path));
        }

        TopBottomPanel::top("menu_toolbar").show(ctx, |ui| {
            self.draw_menu(ui);
            ui.separator();
            self.draw_toolbar(ui);
        });

        TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.draw_status(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_grid(ui);
        });

        self.draw_notice(ctx);
    }
}

/// Keyed by grid position so focus stays on a cell while the filter hides
/// rows above it.
fn cell_id(row: usize, col: usize) -> egui::Id {
    egui::Id::new(("cell", row, col))
}
