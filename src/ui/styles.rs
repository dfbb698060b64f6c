use {
    crate::{
        config::plot::PLOT_CONFIG,
        domain::LevelKind,
        ui::UI_CONFIG,
    },
    eframe::egui::{Color32, RichText, Ui},
};

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub trait LevelColor {
    fn color(&self) -> Color32;
}

impl LevelColor for LevelKind {
    fn color(&self) -> Color32 {
        match self {
            Self::Resistance => PLOT_CONFIG.resistance_color,
            Self::Support => PLOT_CONFIG.support_color,
        }
    }
}

/// How a status line in the side panel is tinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusTone {
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub(crate) fn color(&self) -> Color32 {
        match self {
            StatusTone::Info => PLOT_CONFIG.color_info,
            StatusTone::Warning => PLOT_CONFIG.color_warning,
            StatusTone::Error => PLOT_CONFIG.color_error,
        }
    }
}

pub(crate) trait UiStyleExt {
    fn label_subdued(&mut self, text: impl Into<String>);
    fn metric(&mut self, label: &str, value: &str, color: Color32);
    fn label_subheader(&mut self, text: impl Into<String>);
    fn status_message(&mut self, text: &str, tone: StatusTone);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(PLOT_CONFIG.color_text_subdued));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(colored_subsection_heading(text));
    }

    fn status_message(&mut self, text: &str, tone: StatusTone) {
        self.label(RichText::new(text).color(tone.color()));
    }
}
