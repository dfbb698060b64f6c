use {
    crate::{
        config::plot::PLOT_CONFIG,
        domain::LevelSet,
        models::PriceSeries,
        ui::{
            plot_layers::{
                CandlestickLayer, CloseLineLayer, LayerContext, LevelLinesLayer, PlotLayer,
            },
            ui_text::UI_TEXT,
            utils::{format_price, format_ratio},
        },
        utils::{TimeUtils, from_plot_x, to_plot_x},
    },
    eframe::egui::Ui,
    egui_plot::{AxisHints, GridInput, GridMark, HPlacement, Legend, Plot, VPlacement},
    std::hash::{DefaultHasher, Hash, Hasher},
};

/// Candidate spacings for time grid lines, in seconds.
const TIME_STEPS: [i64; 13] = [
    TimeUtils::S_IN_H,
    2 * TimeUtils::S_IN_H,
    6 * TimeUtils::S_IN_H,
    12 * TimeUtils::S_IN_H,
    TimeUtils::S_IN_D,
    2 * TimeUtils::S_IN_D,
    7 * TimeUtils::S_IN_D,
    14 * TimeUtils::S_IN_D,
    30 * TimeUtils::S_IN_D,
    91 * TimeUtils::S_IN_D,
    182 * TimeUtils::S_IN_D,
    365 * TimeUtils::S_IN_D,
    5 * 365 * TimeUtils::S_IN_D,
];
const TARGET_GRID_MARKS: f64 = 8.0;

/// Smallest gap between consecutive bars. Weekend and overnight gaps are wider
/// than the slot, so the minimum is the real bar spacing.
pub(crate) fn bar_slot_width(series: &PriceSeries) -> f64 {
    series
        .timestamps()
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .filter(|&gap| gap > 0)
        .min()
        .unwrap_or(TimeUtils::S_IN_D) as f64
}

/// Picks the first spacing that keeps the number of marks near the target.
pub(crate) fn time_grid_step(span_seconds: f64) -> f64 {
    TIME_STEPS
        .iter()
        .map(|&s| s as f64)
        .find(|&step| span_seconds / step <= TARGET_GRID_MARKS)
        .unwrap_or(TIME_STEPS[TIME_STEPS.len() - 1] as f64)
}

fn time_grid_spacer(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let step = time_grid_step(max - min);
    let start = (min / step).ceil() as i64;
    let end = (max / step).floor() as i64;
    (start..=end)
        .map(|i| GridMark {
            value: i as f64 * step,
            step_size: step,
        })
        .collect()
}

/// Dates once the view spans days, date and time below that.
pub(crate) fn format_axis_time(x: f64, span_seconds: f64) -> String {
    let Some(ts) = from_plot_x(x) else {
        return String::new();
    };
    if span_seconds >= (3 * TimeUtils::S_IN_D) as f64 {
        ts.format(TimeUtils::STANDARD_DATE_FORMAT).to_string()
    } else {
        ts.format(TimeUtils::STANDARD_DATETIME_FORMAT).to_string()
    }
}

fn create_time_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis.as_str())
        .formatter(|mark, range| format_axis_time(mark.value, range.end() - range.start()))
        .placement(VPlacement::Bottom)
}

fn create_y_axis(label: String, value_format: fn(f64) -> String) -> AxisHints<'static> {
    AxisHints::new_y()
        .label(label)
        .formatter(move |mark, _range| value_format(mark.value))
        .placement(HPlacement::Right)
}

/// One candlestick chart with optional level lines and close line.
///
/// The plot id is salted with the caller's data key so the view re-fits
/// whenever the underlying series changes.
pub struct CandleChart<'a> {
    id_salt: u64,
    y_label: String,
    value_format: fn(f64) -> String,
    candles: Vec<CandlestickLayer<'a>>,
    close_line: Option<CloseLineLayer<'a>>,
    levels: Option<&'a LevelSet>,
}

impl<'a> CandleChart<'a> {
    pub fn new(id: impl Hash, y_label: impl Into<String>) -> Self {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        Self {
            id_salt: hasher.finish(),
            y_label: y_label.into(),
            value_format: format_price,
            candles: Vec::new(),
            close_line: None,
            levels: None,
        }
    }

    /// Axis and hover values are ratios rather than prices.
    pub fn ratio_values(mut self) -> Self {
        self.value_format = format_ratio;
        self
    }

    pub fn with_candles(mut self, layer: CandlestickLayer<'a>) -> Self {
        self.candles.push(layer);
        self
    }

    pub fn with_close_line(mut self, series: &'a PriceSeries, name: impl Into<String>) -> Self {
        self.close_line = Some(CloseLineLayer {
            series,
            name: name.into(),
        });
        self
    }

    pub fn with_levels(mut self, levels: Option<&'a LevelSet>) -> Self {
        self.levels = levels;
        self
    }

    fn layer_context(&self) -> Option<LayerContext> {
        let mut bar_width = f64::INFINITY;
        let mut x_bounds = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y_bounds = (f64::INFINITY, f64::NEG_INFINITY);

        for layer in &self.candles {
            let series = layer.series;
            let (Some(first), Some(last), Some((lo, hi))) = (
                series.first_timestamp(),
                series.last_timestamp(),
                series.price_bounds(),
            ) else {
                continue;
            };
            bar_width = bar_width.min(bar_slot_width(series));
            x_bounds = (x_bounds.0.min(to_plot_x(first)), x_bounds.1.max(to_plot_x(last)));
            y_bounds = (y_bounds.0.min(lo), y_bounds.1.max(hi));
        }
        if !bar_width.is_finite() {
            return None;
        }
        if let Some(levels) = self.levels {
            for level in levels.iter() {
                y_bounds = (y_bounds.0.min(level.price), y_bounds.1.max(level.price));
            }
        }
        Some(LayerContext {
            bar_width,
            x_bounds,
            y_bounds,
        })
    }

    pub fn show(self, ui: &mut Ui) {
        let Some(ctx) = self.layer_context() else {
            return;
        };
        let x_pad =
            (ctx.x_bounds.1 - ctx.x_bounds.0).max(ctx.bar_width) * PLOT_CONFIG.plot_x_padding_pct;
        let y_pad = (ctx.y_bounds.1 - ctx.y_bounds.0).abs() * PLOT_CONFIG.plot_y_padding_pct;
        let value_format = self.value_format;
        let show_legend = self.candles.iter().filter(|c| !c.name.is_empty()).count() > 1;

        let mut plot = Plot::new(("candle_chart", self.id_salt))
            .height(PLOT_CONFIG.chart_height)
            .custom_x_axes(vec![create_time_axis()])
            .custom_y_axes(vec![create_y_axis(self.y_label.clone(), value_format)])
            .x_grid_spacer(time_grid_spacer)
            .include_x(ctx.x_bounds.0 - x_pad)
            .include_x(ctx.x_bounds.1 + x_pad)
            .include_y(ctx.y_bounds.0 - y_pad)
            .include_y(ctx.y_bounds.1 + y_pad)
            .label_formatter(move |name, value| {
                let time = from_plot_x(value.x)
                    .map(|ts| ts.format(TimeUtils::STANDARD_DATETIME_FORMAT).to_string())
                    .unwrap_or_default();
                let shown = value_format(value.y);
                if name.is_empty() {
                    format!("{}\n{}", time, shown)
                } else {
                    format!("{}\n{}\n{}", name, time, shown)
                }
            });
        if show_legend {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            let mut layers: Vec<&dyn PlotLayer> = Vec::with_capacity(self.candles.len() + 2);
            for candles in &self.candles {
                layers.push(candles);
            }
            if let Some(line) = &self.close_line {
                layers.push(line);
            }
            let level_layer = self.levels.map(|levels| LevelLinesLayer { levels });
            if let Some(level_layer) = &level_layer {
                layers.push(level_layer);
            }

            for layer in layers {
                layer.render(plot_ui, &ctx);
            }
        });
    }
}

/// Y-axis label for a price chart of `identifier`.
pub(crate) fn price_axis_label(identifier: &str) -> String {
    format!("{}  {}", identifier, UI_TEXT.plot_y_axis)
}
