use {
    crate::{
        config::plot::PLOT_CONFIG,
        domain::{CandleType, LevelSet, PriceBar, PriceLevel},
        models::PriceSeries,
        ui::{styles::LevelColor, utils::format_price},
        utils::to_plot_x,
    },
    eframe::egui::{Align2, Color32, RichText, Stroke},
    egui_plot::{HLine, Line, LineStyle, PlotPoint, PlotPoints, PlotUi, Polygon, Text},
};

/// Geometry shared by every layer of one chart.
pub struct LayerContext {
    /// Width of one bar slot in plot units (seconds)
    pub bar_width: f64,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. CANDLESTICKS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandleStyle {
    /// Green up, red down.
    Directional,
    /// One colour for the whole series; down bars are dimmed.
    Tinted(Color32),
}

pub struct CandlestickLayer<'a> {
    pub series: &'a PriceSeries,
    pub style: CandleStyle,
    /// Legend name. Empty hides the series from the legend.
    pub name: String,
    /// Fraction of the slot width the bodies take
    pub width_scale: f64,
}

impl<'a> CandlestickLayer<'a> {
    pub fn new(series: &'a PriceSeries) -> Self {
        Self {
            series,
            style: CandleStyle::Directional,
            name: String::new(),
            width_scale: 1.0,
        }
    }

    pub fn tinted(mut self, name: impl Into<String>, color: Color32) -> Self {
        self.style = CandleStyle::Tinted(color);
        self.name = name.into();
        self
    }

    pub fn width_scale(mut self, scale: f64) -> Self {
        self.width_scale = scale;
        self
    }

    fn color_for(&self, bar: &PriceBar) -> Color32 {
        let bullish = bar.get_type() == CandleType::Bullish;
        match self.style {
            CandleStyle::Directional if bullish => PLOT_CONFIG.candle_bullish_color,
            CandleStyle::Directional => PLOT_CONFIG.candle_bearish_color,
            CandleStyle::Tinted(color) if bullish => color,
            CandleStyle::Tinted(color) => color.linear_multiply(0.5),
        }
    }
}

impl PlotLayer for CandlestickLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let half_w = ctx.bar_width * PLOT_CONFIG.candle_width_pct * self.width_scale / 2.0;

        for bar in self.series.bars() {
            let x = to_plot_x(bar.timestamp);
            let color = self.color_for(&bar);

            draw_wick_line(plot_ui, &self.name, x, bar.high, bar.low, color);

            let (body_bot, body_top_raw) = bar.body_range();
            // Doji: give the body a sliver of height so it stays visible
            let body_top = if (body_top_raw - body_bot).abs() < f64::EPSILON {
                body_bot + (ctx.y_bounds.1 - ctx.y_bounds.0).abs() * 0.001
            } else {
                body_top_raw
            };
            draw_body_rect(plot_ui, &self.name, x, half_w, body_top, body_bot, color);
        }
    }
}

#[inline]
fn draw_wick_line(ui: &mut PlotUi, name: &str, x: f64, top: f64, bottom: f64, color: Color32) {
    ui.line(
        Line::new(name, PlotPoints::new(vec![[x, bottom], [x, top]]))
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width),
    );
}

#[inline]
fn draw_body_rect(
    ui: &mut PlotUi,
    name: &str,
    x: f64,
    half_w: f64,
    top: f64,
    bottom: f64,
    color: Color32,
) {
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];

    // No stroke: borders blur on thin candles
    ui.polygon(
        Polygon::new(name, PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

// ============================================================================
// 2. SUPPORT / RESISTANCE LINES
// ============================================================================
pub struct LevelLinesLayer<'a> {
    pub levels: &'a LevelSet,
}

impl PlotLayer for LevelLinesLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let (y_min, y_max) = ctx.y_bounds;
        let label_offset = (y_max - y_min).abs() * PLOT_CONFIG.level_label_offset_pct;

        for level in self.levels.iter() {
            let color = level.kind.color();

            plot_ui.hline(
                HLine::new(level.label(), level.price)
                    .color(color)
                    .width(level_line_width(level))
                    .style(LineStyle::dotted_dense()),
            );

            plot_ui.text(
                Text::new(
                    level.label(),
                    PlotPoint::new(ctx.x_bounds.1, level.price + label_offset),
                    RichText::new(level_annotation(level)).color(color).small(),
                )
                .anchor(Align2::RIGHT_BOTTOM),
            );
        }
    }
}

/// Rank 1 on each side is drawn heavier.
pub(crate) fn level_line_width(level: &PriceLevel) -> f32 {
    if level.rank == 1 {
        PLOT_CONFIG.level_primary_width
    } else {
        PLOT_CONFIG.level_secondary_width
    }
}

/// "R1: 123.45"
pub(crate) fn level_annotation(level: &PriceLevel) -> String {
    format!("{}: {}", level.label(), format_price(level.price))
}

// ============================================================================
// 3. RATIO CLOSE LINE
// ============================================================================
pub struct CloseLineLayer<'a> {
    pub series: &'a PriceSeries,
    pub name: String,
}

impl PlotLayer for CloseLineLayer<'_> {
    fn render(&self, plot_ui: &mut PlotUi, _ctx: &LayerContext) {
        let points: Vec<[f64; 2]> = self
            .series
            .timestamps()
            .iter()
            .zip(self.series.closes())
            .map(|(ts, close)| [to_plot_x(*ts), *close])
            .collect();

        plot_ui.line(
            Line::new(self.name.as_str(), PlotPoints::new(points))
                .color(PLOT_CONFIG.ratio_color)
                .width(1.0),
        );
    }
}
