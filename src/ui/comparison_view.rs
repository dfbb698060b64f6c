use {
    crate::{
        app::App,
        config::plot::PLOT_CONFIG,
        ui::{
            UI_CONFIG, UI_TEXT,
            panels::{render_choice, render_date_range, render_series_table},
            plot_layers::CandlestickLayer,
            plot_view::CandleChart,
            styles::{StatusTone, UiStyleExt},
            ui_text::describe_viewer_error,
            utils::{format_price, format_ratio},
        },
    },
    eframe::egui::{CentralPanel, Context, ScrollArea, SidePanel, Ui},
    itertools::Itertools,
};

impl App {
    pub(crate) fn render_comparison_tab(&mut self, ctx: &Context) {
        SidePanel::left("comparison_left_panel")
            .exact_width(UI_CONFIG.side_panel_width)
            .resizable(false)
            .frame(UI_CONFIG.side_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("comparison_controls")
                    .show(ui, |ui| self.render_comparison_controls(ui));
            });

        CentralPanel::default()
            .frame(UI_CONFIG.central_panel_frame())
            .show(ctx, |ui| {
                ScrollArea::vertical()
                    .id_salt("comparison_content")
                    .show(ui, |ui| self.render_comparison_content(ui));
            });
    }

    fn render_comparison_controls(&mut self, ui: &mut Ui) {
        ui.label_subheader(UI_TEXT.lp_instrument_heading.as_str());
        self.render_sector_choice(ui, "comparison_sector");
        let instruments = self.instruments();
        render_choice(
            ui,
            "compare_first",
            &UI_TEXT.lp_first_instrument,
            &instruments,
            &mut self.compare_first,
        );
        render_choice(
            ui,
            "compare_second",
            &UI_TEXT.lp_second_instrument,
            &instruments,
            &mut self.compare_second,
        );
        self.render_catalog_status(ui);

        let chosen: Vec<String> = [self.compare_first.clone(), self.compare_second.clone()]
            .into_iter()
            .flatten()
            .unique()
            .collect();
        for identifier in &chosen {
            self.render_refresh_button(ui, identifier);
        }

        if !self.comparison.has_both() {
            return;
        }
        ui.separator();
        let Some(bounds) = self.comparison.overlap else {
            ui.status_message(&UI_TEXT.error_no_overlap, StatusTone::Warning);
            return;
        };
        ui.label_subdued(format!(
            "{}: {} .. {}",
            UI_TEXT.cp_overlap_prefix, bounds.0, bounds.1
        ));
        if let Some(range) = self.comparison.date_range.as_mut() {
            if render_date_range(ui, "comparison_range", range, bounds) {
                self.comparison.recompute();
            }
        }
    }

    fn render_comparison_content(&self, ui: &mut Ui) {
        let (Some(first), Some(second)) = (&self.compare_first, &self.compare_second) else {
            ui.label_subdued(UI_TEXT.cp_select_two.as_str());
            return;
        };
        if let Some(message) = &self.comparison_error {
            ui.status_message(message, StatusTone::Error);
            return;
        }
        let view = &self.comparison;
        if !view.has_both() {
            ui.label_subdued(UI_TEXT.cp_loading.as_str());
            return;
        }
        if view.overlap.is_none() {
            ui.status_message(&UI_TEXT.error_no_overlap, StatusTone::Warning);
            return;
        }
        if view.range_is_inverted() {
            ui.status_message(&UI_TEXT.cp_inverted_range, StatusTone::Warning);
            return;
        }

        let chart_key = (first, second, self.frequency, view.date_range);
        let (common_first, common_second) = &view.common;

        ui.label_subheader(UI_TEXT.plot_overlay_heading.as_str());
        if common_first.is_empty() {
            ui.status_message(&UI_TEXT.cp_no_data_in_range, StatusTone::Warning);
        } else {
            CandleChart::new(("overlay", chart_key), UI_TEXT.plot_y_axis.as_str())
                .with_candles(
                    CandlestickLayer::new(common_first)
                        .tinted(first.as_str(), PLOT_CONFIG.series_a_color),
                )
                .with_candles(
                    CandlestickLayer::new(common_second)
                        .tinted(second.as_str(), PLOT_CONFIG.series_b_color)
                        .width_scale(PLOT_CONFIG.overlay_width_scale),
                )
                .show(ui);
        }

        ui.add_space(6.0);
        ui.label_subheader(UI_TEXT.plot_ratio_heading.as_str());
        let pair = format!("{} / {}", first, second);
        match &view.ratio {
            Some(Ok(ratio)) => {
                CandleChart::new(
                    ("ratio", chart_key),
                    format!("{}  {}", pair, UI_TEXT.plot_ratio_axis),
                )
                .ratio_values()
                .with_candles(CandlestickLayer::new(ratio))
                .with_close_line(ratio, pair.as_str())
                .show(ui);
            }
            Some(Err(e)) => ui.status_message(&describe_viewer_error(e), StatusTone::Warning),
            None => {}
        }

        ui.add_space(6.0);
        ui.label_subheader(UI_TEXT.table_common_heading.as_str());
        ui.collapsing(first.as_str(), |ui| {
            render_series_table(ui, "common_first", common_first, format_price);
        });
        ui.collapsing(second.as_str(), |ui| {
            render_series_table(ui, "common_second", common_second, format_price);
        });
        if let Some(Ok(ratio)) = &view.ratio {
            ui.collapsing(pair.as_str(), |ui| {
                render_series_table(ui, "ratio_table", ratio, format_ratio);
            });
        }
    }
}
