use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, VLine};

use crate::color::BinColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Live signal plot (central panel)
// ---------------------------------------------------------------------------

fn bin_points(values: &[f64]) -> PlotPoints<'_> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, v])
        .collect()
}

/// Render the transformed signal, optional traces, and the peak marker.
pub fn signal_plot(ui: &mut Ui, state: &AppState, colors: &BinColors) {
    let (session, tick) = match (&state.session, &state.last_tick) {
        (Some(session), Some(tick)) => (session, tick),
        _ => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a capture or device to start  (File → Open…)");
            });
            return;
        }
    };

    let config = session.config();
    let tracker_state = session.tracker().state();

    Plot::new("signal_plot")
        .legend(Legend::default())
        .x_axis_label("Bin")
        .y_axis_label("Intensity")
        .include_x(0.0)
        .include_x((config.bins.saturating_sub(1)) as f64)
        .include_y(-0.1)
        .include_y(config.clip_max)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.show_traces {
                plot_ui.line(
                    Line::new(bin_points(session.smoothing().fast_trace()))
                        .name("fast trace")
                        .color(Color32::from_rgb(230, 160, 60))
                        .width(1.0),
                );
                plot_ui.line(
                    Line::new(bin_points(session.smoothing().slow_baseline()))
                        .name("slow baseline")
                        .color(Color32::DARK_GRAY)
                        .width(1.0),
                );
                plot_ui.line(
                    Line::new(bin_points(&session.baseline().values))
                        .name("calibration")
                        .color(Color32::from_rgb(120, 120, 200))
                        .width(1.0),
                );
            }

            plot_ui.line(
                Line::new(bin_points(&tick.transformed))
                    .name("signal")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );

            if let Some(anchor) = tracker_state.anchor_index {
                plot_ui.vline(
                    VLine::new(anchor as f64)
                        .name("anchor")
                        .color(colors.color_for(anchor).gamma_multiply(0.6)),
                );
            }

            let peak = tick.peak;
            let y = tick.transformed.get(peak.index).copied().unwrap_or(0.0);
            plot_ui.points(
                Points::new(PlotPoints::new(vec![[peak.index as f64, y]]))
                    .name(format!("peak ({:.0})", peak.value))
                    .radius(6.0)
                    .color(colors.marker_color(peak.index, &tracker_state, &config.tracker)),
            );
        });
}
