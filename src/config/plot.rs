//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // --- CANDLESTICKS ---
    pub candle_bullish_color: Color32,
    pub candle_bearish_color: Color32,
    pub candle_width_pct: f64,  // 0.0 to 1.0 (relative to time step)
    pub candle_wick_width: f32, // Pixels

    // --- LEVEL LINES ---
    pub resistance_color: Color32,
    pub support_color: Color32,
    /// Rank 1 on each side is drawn heavier
    pub level_primary_width: f32,
    pub level_secondary_width: f32,
    /// Annotation offset above the line, as a fraction of the visible y span
    pub level_label_offset_pct: f64,

    // --- COMPARISON ---
    pub ratio_color: Color32,
    pub series_a_color: Color32,
    pub series_b_color: Color32,
    /// Second series of the overlay is drawn this much narrower
    pub overlay_width_scale: f64,

    pub plot_y_padding_pct: f64, // Y-Axis Padding factor (e.g. 0.05 = 5% padding top and bottom)
    pub plot_x_padding_pct: f64,
    pub chart_height: f32,

    pub color_text_neutral: Color32,
    pub color_text_subdued: Color32,
    pub color_info: Color32,
    pub color_warning: Color32,
    pub color_error: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    candle_bullish_color: Color32::from_rgb(38, 166, 154), // TradingView Green
    candle_bearish_color: Color32::from_rgb(239, 83, 80),  // TradingView Red
    candle_width_pct: 0.8, // 80% width leaves a small gap between candles
    candle_wick_width: 1.0,

    resistance_color: Color32::from_rgb(255, 165, 0), // Orange
    support_color: Color32::from_rgb(50, 205, 50),    // Lime green
    level_primary_width: 1.5,
    level_secondary_width: 1.0,
    level_label_offset_pct: 0.01,

    ratio_color: Color32::from_rgb(65, 105, 225), // Royal blue
    series_a_color: Color32::from_rgb(65, 105, 225),
    series_b_color: Color32::from_rgb(255, 165, 0),
    overlay_width_scale: 0.5,

    plot_y_padding_pct: 0.02,
    plot_x_padding_pct: 0.02,
    chart_height: 420.0,

    color_text_neutral: Color32::LIGHT_GRAY,
    color_text_subdued: Color32::GRAY,
    color_info: Color32::from_rgb(173, 216, 230), // Light Blue
    color_warning: Color32::from_rgb(255, 215, 0), // Gold
    color_error: Color32::from_rgb(255, 80, 80),
};
