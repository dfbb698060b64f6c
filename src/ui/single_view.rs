use {
    crate::{
        app::App,
        ui::{
            UI_CONFIG, UI_TEXT,
            panels::{
                LevelControlsPanel, render_choice, render_date_range, render_level_details,
                render_series_table,
            },
            plot_layers::CandlestickLayer,
            plot_view::{CandleChart, price_axis_label},
            styles::{StatusTone, UiStyleExt},
            utils::{format_bar_count, format_price},
        },
    },
    eframe::egui::{CentralPanel, Context, ScrollArea, SidePanel, Ui},
};

impl App {
    pub(crate) fn render_single_tab(&mut self, ctx: &Context) {
        SidePanel::left("single_left_panel")
            .exact_width(UI_CONFIG.side_panel_width)
            .resizable(false)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("single_controls")
                    .show(ui, |ui| self.render_single_controls(ui));
            });

        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("single_content")
                    .show(ui, |ui| self.render_single_content(ui));
            });
    }

    fn render_single_controls(&mut self, ui: &mut Ui) {
        ui.label_subheader(UI_TEXT.lp_instrument_heading.as_str());
        self.render_sector_choice(ui, "single_sector");
        let instruments = self.instruments();
        render_choice(
            ui,
            "single_instrument",
            &UI_TEXT.lp_instrument,
            &instruments,
            &mut self.selected,
        );
        self.render_catalog_status(ui);
        if let Some(identifier) = self.selected.clone() {
            self.render_refresh_button(ui, &identifier);
        }

        let bounds = self.single.bounds();
        if let (Some(bounds), Some(range)) = (bounds, self.single.date_range.as_mut()) {
            ui.separator();
            if render_date_range(ui, "single_range", range, bounds) {
                self.single.recompute(&self.level_settings);
            }
        }

        ui.separator();
        let series_len = self.single.filtered.len();
        if LevelControlsPanel::new(&mut self.level_settings, series_len).render(ui) {
            self.single.recompute(&self.level_settings);
        }
    }

    fn render_single_content(&self, ui: &mut Ui) {
        let Some(identifier) = &self.selected else {
            ui.label_subdued(UI_TEXT.cp_select_instrument.as_str());
            return;
        };
        if let Some(message) = &self.single_error {
            ui.status_message(message, StatusTone::Error);
            return;
        }
        if self.single.source().is_none() {
            ui.label_subdued(UI_TEXT.cp_loading.as_str());
            return;
        }
        if self.single.range_is_inverted() {
            ui.status_message(&UI_TEXT.cp_inverted_range, StatusTone::Warning);
            return;
        }
        let view = &self.single;
        if view.filtered.is_empty() {
            ui.status_message(&UI_TEXT.cp_no_data_in_range, StatusTone::Warning);
            return;
        }

        ui.horizontal(|ui| {
            ui.heading(identifier.as_str());
            ui.label_subdued(format_bar_count(view.filtered.len()));
        });

        CandleChart::new(
            ("single", identifier, self.frequency, view.date_range),
            price_axis_label(identifier),
        )
        .with_candles(CandlestickLayer::new(&view.filtered))
        .with_levels(view.levels.as_ref())
        .show(ui);

        if let Some(levels) = &view.levels {
            ui.add_space(6.0);
            render_level_details(ui, levels);
        }

        ui.add_space(6.0);
        ui.label_subheader(UI_TEXT.table_heading.as_str());
        render_series_table(ui, "single_table", &view.filtered, format_price);
    }
}
