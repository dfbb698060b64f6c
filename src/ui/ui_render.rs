use {
    crate::{
        app::{App, Tab},
        config::plot::PLOT_CONFIG,
        domain::Frequency,
        ui::{
            UI_CONFIG, UI_TEXT,
            panels::render_choice,
            styles::{StatusTone, UiStyleExt},
            utils::format_bar_count,
        },
    },
    eframe::egui::{Button, Context, RichText, TopBottomPanel, Ui},
    strum::IntoEnumIterator,
};

fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Single => UI_TEXT.tab_single.as_str(),
        Tab::Comparison => UI_TEXT.tab_comparison.as_str(),
    }
}

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.top_panel_frame();

        TopBottomPanel::top("top_toolbar")
            .frame(frame)
            .min_height(30.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(UI_TEXT.app_title.as_str())
                            .strong()
                            .color(UI_CONFIG.colors.heading),
                    );
                    ui.separator();

                    for tab in Tab::iter() {
                        ui.selectable_value(&mut self.tab, tab, tab_label(tab));
                    }
                    ui.separator();

                    ui.label_subdued(UI_TEXT.label_frequency.as_str());
                    let mut frequency = self.frequency;
                    for option in Frequency::iter() {
                        ui.selectable_value(&mut frequency, option, option.to_string());
                    }
                    // Reloads the catalog only on an actual change
                    self.set_frequency(frequency);
                });
            });
    }

    pub(crate) fn render_status_panel(&self, ctx: &Context) {
        let panel_frame = UI_CONFIG.bottom_panel_frame();

        TopBottomPanel::bottom("status_panel")
            .frame(panel_frame)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let Some(sources) = &self.sources else {
                        ui.label_subdued(UI_TEXT.cp_loading.as_str());
                        return;
                    };
                    let label = PLOT_CONFIG.color_text_neutral;
                    ui.metric("Data", &sources.data_root.display().to_string(), label);
                    ui.separator();
                    ui.metric(
                        "Instruments",
                        &self.catalog.identifiers(None).len().to_string(),
                        label,
                    );
                    ui.separator();
                    let shown = match self.tab {
                        Tab::Single => self.single.filtered.len(),
                        Tab::Comparison => self.comparison.common.0.len(),
                    };
                    ui.metric("Shown", &format_bar_count(shown), label);
                    ui.separator();
                    if sources.can_refresh() {
                        ui.metric("Refresh", "online", label);
                    } else {
                        ui.status_message("Refresh offline", StatusTone::Warning);
                    }
                });
            });
    }

    /// Sector filter. "All" maps to no filter.
    pub(super) fn render_sector_choice(&mut self, ui: &mut Ui, id_salt: &str) {
        let sectors = self.catalog.sectors();
        if sectors.is_empty() {
            return;
        }
        let all = UI_TEXT.lp_sector_all.clone();
        let mut options = vec![all.clone()];
        options.extend(sectors);

        let mut choice = Some(self.sector.clone().unwrap_or_else(|| all.clone()));
        if render_choice(ui, id_salt, &UI_TEXT.lp_sector, &options, &mut choice) {
            self.sector = choice.filter(|c| *c != all);
        }
    }

    pub(super) fn render_catalog_status(&self, ui: &mut Ui) {
        if let Some(message) = &self.catalog_error {
            ui.status_message(message, StatusTone::Error);
        } else if self.catalog.is_empty() {
            ui.status_message(&UI_TEXT.lp_no_instruments, StatusTone::Warning);
        }
    }

    /// Refresh button for one instrument plus the outcome of its last refresh.
    pub(super) fn render_refresh_button(&mut self, ui: &mut Ui, identifier: &str) {
        let Some(path) = self.series_path(identifier) else {
            return;
        };
        let can_refresh = self.sources.as_ref().is_some_and(|s| s.can_refresh());
        let running = self.refresh.is_running();
        let text = if running {
            UI_TEXT.lp_refreshing.clone()
        } else {
            format!("{} {}", UI_TEXT.lp_refresh, identifier)
        };

        if ui
            .add_enabled(can_refresh && !running, Button::new(text))
            .on_hover_text(path.display().to_string())
            .clicked()
        {
            self.start_refresh(path.clone());
        }

        match self.refresh_status_for(&path) {
            Some(Ok(bars)) => ui.status_message(
                &format!("{} ({})", UI_TEXT.refresh_success, format_bar_count(*bars)),
                StatusTone::Info,
            ),
            Some(Err(message)) => {
                ui.status_message(&UI_TEXT.refresh_failed, StatusTone::Error);
                ui.label_subdued(message.as_str());
            }
            None => {}
        }
    }
}
