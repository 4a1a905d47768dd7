use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use binwatch::TrackerEvent;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – session and tracker status
// ---------------------------------------------------------------------------

/// Render the left status panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Session");
    ui.separator();

    let mut recalibrate = false;
    {
        let Some(session) = state.session.as_ref() else {
            ui.label("No source open.");
            return;
        };

        if let Some(label) = &state.source_label {
            ui.label(RichText::new(label).monospace());
        }
        ui.label(format!("{:.1} frames/s", state.rate));
        ui.label(format!(
            "{} frames, {} bad lines",
            session.frames_read(),
            session.lines_rejected()
        ));
        ui.label(format!(
            "Baseline over {} samples",
            session.baseline().samples
        ));

        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Recalibrate").clicked() {
                recalibrate = true;
            }
            let pause_label = if state.paused { "Resume" } else { "Pause" };
            if ui.button(pause_label).clicked() {
                state.paused = !state.paused;
            }
        });

        ui.add_space(8.0);
        ui.heading("Tracker");
        ui.separator();

        let tracker = session.tracker();
        let tracker_state = tracker.state();
        match tracker_state.anchor_index {
            None => {
                ui.label("Empty");
            }
            Some(anchor) => {
                let stable = tracker_state.past_milestone(tracker.config());
                let text = format!(
                    "Tracking bin {anchor}  ×{}{}",
                    tracker_state.repeat_count,
                    if stable { "  (stable)" } else { "" }
                );
                let text = RichText::new(text).strong();
                ui.label(if stable { text.color(Color32::GREEN) } else { text });
            }
        }
        if let Some(tick) = &state.last_tick {
            ui.label(format!(
                "Peak: bin {} at {:.1}",
                tick.peak.index, tick.peak.value
            ));
        }
    }

    if recalibrate {
        state.recalibrate();
    }

    ui.add_space(8.0);
    ui.strong("Events");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (tick_no, event) in &state.events {
                let color = match event {
                    TrackerEvent::Stability { .. } => Color32::GREEN,
                    TrackerEvent::RunEnded { .. } => Color32::GRAY,
                };
                ui.label(RichText::new(format!("#{tick_no}  {event}")).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open capture…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{} bins, tick {}",
                session.config().bins,
                session.ticks()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_traces, "Show traces")
            .clicked()
        {
            state.show_traces = !state.show_traces;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sensor capture")
        .add_filter("Captures", &["txt", "log", "csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to open source: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
