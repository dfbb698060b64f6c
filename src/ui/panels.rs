use {
    crate::{
        config::{DetectionMethod, LEVELS, LevelSettings, PivotOrder},
        domain::{LevelSet, PriceLevel},
        models::PriceSeries,
        ui::{
            UI_CONFIG,
            plot_layers::level_annotation,
            styles::{LevelColor, UiStyleExt},
            ui_text::UI_TEXT,
            utils::format_volume,
        },
        utils::format_timestamp,
    },
    chrono::NaiveDate,
    eframe::egui::{ComboBox, RichText, Slider, Ui},
    egui_extras::{Column, DatePickerButton, TableBuilder},
    std::hash::Hash,
    strum::IntoEnumIterator,
};

/// Support/resistance toggle and parameters. `render` reports whether
/// anything changed so the caller can recompute levels.
pub struct LevelControlsPanel<'a> {
    settings: &'a mut LevelSettings,
    series_len: usize,
}

impl<'a> LevelControlsPanel<'a> {
    pub fn new(settings: &'a mut LevelSettings, series_len: usize) -> Self {
        Self {
            settings,
            series_len,
        }
    }

    /// Slider bounds for the lookback: at least one bar, at most the series.
    pub(crate) fn lookback_bounds(series_len: usize) -> (usize, usize) {
        let max = series_len.max(1);
        (LEVELS.lookback_min.min(max), max)
    }

    /// Raises a stored lookback below the slider minimum to that minimum so
    /// the slider and the detector see the same value. Returns true on change.
    pub(crate) fn clamp_lookback(settings: &mut LevelSettings, series_len: usize) -> bool {
        let (lo, _) = Self::lookback_bounds(series_len);
        if settings.effective_lookback(series_len) < lo {
            settings.lookback = lo;
            return true;
        }
        false
    }

    pub fn render(&mut self, ui: &mut Ui) -> bool {
        let mut changed = false;

        ui.label_subheader(UI_TEXT.sr_heading.as_str());
        changed |= ui
            .checkbox(&mut self.settings.enabled, UI_TEXT.sr_toggle.as_str())
            .changed();
        if !self.settings.enabled {
            return changed;
        }

        changed |= Self::clamp_lookback(self.settings, self.series_len);
        let (lo, hi) = Self::lookback_bounds(self.series_len);
        let mut lookback = self.settings.effective_lookback(self.series_len);
        if ui
            .add(
                Slider::new(&mut lookback, lo..=hi)
                    .step_by(LEVELS.lookback_step as f64)
                    .text(UI_TEXT.sr_lookback.as_str()),
            )
            .changed()
        {
            self.settings.lookback = lookback;
            changed = true;
        }

        changed |= ui
            .add(
                Slider::new(&mut self.settings.num_levels, LEVELS.num_levels_range)
                    .text(UI_TEXT.sr_num_levels.as_str()),
            )
            .changed();

        ComboBox::from_label(UI_TEXT.sr_method.as_str())
            .selected_text(self.settings.method.to_string())
            .show_ui(ui, |ui| {
                for method in DetectionMethod::iter() {
                    changed |= ui
                        .selectable_value(&mut self.settings.method, method, method.to_string())
                        .changed();
                }
            });

        ui.collapsing(UI_TEXT.sr_advanced.as_str(), |ui| {
            let mut order = self.settings.pivot_order.value();
            if ui
                .add(
                    Slider::new(&mut order, LEVELS.pivot_order_range)
                        .text(UI_TEXT.sr_pivot_order.as_str()),
                )
                .changed()
            {
                self.settings.pivot_order = PivotOrder::new(order);
                changed = true;
            }

            changed |= ui
                .add(
                    Slider::new(&mut self.settings.threshold_pct, LEVELS.threshold_pct_range)
                        .step_by(LEVELS.threshold_pct_step)
                        .text(UI_TEXT.sr_threshold.as_str()),
                )
                .changed();
        });

        changed
    }
}

/// Start/end date pickers, kept inside `bounds`. Returns true on change.
pub fn render_date_range(
    ui: &mut Ui,
    id_salt: &str,
    range: &mut (NaiveDate, NaiveDate),
    bounds: (NaiveDate, NaiveDate),
) -> bool {
    let mut changed = false;
    ui.label_subheader(UI_TEXT.lp_date_heading.as_str());
    ui.horizontal(|ui| {
        ui.label(UI_TEXT.lp_start_date.as_str());
        changed |= ui
            .add(DatePickerButton::new(&mut range.0).id_salt(&format!("{id_salt}_start")))
            .changed();
    });
    ui.horizontal(|ui| {
        ui.label(UI_TEXT.lp_end_date.as_str());
        changed |= ui
            .add(DatePickerButton::new(&mut range.1).id_salt(&format!("{id_salt}_end")))
            .changed();
    });
    *range = clamp_range(*range, bounds);
    changed
}

/// Clamps each end into `bounds` independently. An inverted range stays
/// inverted so the caller can report it.
pub(crate) fn clamp_range(
    range: (NaiveDate, NaiveDate),
    bounds: (NaiveDate, NaiveDate),
) -> (NaiveDate, NaiveDate) {
    (
        range.0.clamp(bounds.0, bounds.1),
        range.1.clamp(bounds.0, bounds.1),
    )
}

/// Picker over `options`. Returns true when the selection changed.
pub fn render_choice(
    ui: &mut Ui,
    id_salt: impl Hash,
    label: &str,
    options: &[String],
    selected: &mut Option<String>,
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        ComboBox::from_id_salt(id_salt)
            .selected_text(selected.as_deref().unwrap_or("-"))
            .show_ui(ui, |ui| {
                for option in options {
                    let is_selected = selected.as_deref() == Some(option.as_str());
                    if ui.selectable_label(is_selected, option.as_str()).clicked() && !is_selected {
                        *selected = Some(option.clone());
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Resistances and supports side by side.
pub fn render_level_details(ui: &mut Ui, levels: &LevelSet) {
    ui.label_subheader(UI_TEXT.sr_details_heading.as_str());
    ui.columns(2, |cols| {
        render_level_column(&mut cols[0], "Resistance", &levels.resistances);
        render_level_column(&mut cols[1], "Support", &levels.supports);
    });
}

fn render_level_column(ui: &mut Ui, title: &str, levels: &[PriceLevel]) {
    ui.label(RichText::new(title).strong());
    if levels.is_empty() {
        ui.label_subdued(UI_TEXT.sr_none_found.as_str());
        return;
    }
    for level in levels {
        ui.label(RichText::new(level_annotation(level)).color(level.kind.color()));
    }
}

/// Scrollable OHLC(V) table. `value_format` renders prices or ratios.
pub fn render_series_table(
    ui: &mut Ui,
    id_salt: impl Hash,
    series: &PriceSeries,
    value_format: fn(f64) -> String,
) {
    let with_volume = series.has_volume();
    let mut titles = vec![
        UI_TEXT.col_date.as_str(),
        UI_TEXT.col_open.as_str(),
        UI_TEXT.col_high.as_str(),
        UI_TEXT.col_low.as_str(),
        UI_TEXT.col_close.as_str(),
    ];
    if with_volume {
        titles.push(UI_TEXT.col_volume.as_str());
    }

    ui.push_id(id_salt, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .max_scroll_height(UI_CONFIG.table_max_height)
            .column(Column::auto().at_least(120.0))
            .columns(Column::auto().at_least(70.0), titles.len() - 1)
            .header(UI_CONFIG.table_row_height + 2.0, |mut header| {
                for title in &titles {
                    header.col(|ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|body| {
                body.rows(UI_CONFIG.table_row_height, series.len(), |mut row| {
                    let Some(bar) = series.get_bar(row.index()) else {
                        return;
                    };
                    row.col(|ui| {
                        ui.label(format_timestamp(bar.timestamp));
                    });
                    for value in [bar.open, bar.high, bar.low, bar.close] {
                        row.col(|ui| {
                            ui.label(value_format(value));
                        });
                    }
                    if with_volume {
                        row.col(|ui| {
                            ui.label(format_volume(bar.volume));
                        });
                    }
                });
            });
    });
}
