use eframe::egui;

use crate::color::BinColors;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BinwatchApp {
    pub state: AppState,
    pub colors: BinColors,
}

impl BinwatchApp {
    pub fn new(state: AppState) -> Self {
        let colors = BinColors::new(state.config.bins);
        Self { state, colors }
    }
}

impl eframe::App for BinwatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // One frame per repaint; blocks until the sensor delivers.
        self.state.tick();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: session + tracker ----
        egui::SidePanel::left("session_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::signal_plot(ui, &self.state, &self.colors);
        });

        if self.state.session.is_some() && !self.state.paused {
            ctx.request_repaint();
        }
    }
}
