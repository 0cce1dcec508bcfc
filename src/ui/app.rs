use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use eframe::egui::{self, Align, Color32, Layout, RichText, TopBottomPanel, Ui};
use tracing::{info, warn};

use crate::clock::SelectedClock;
use crate::ticker::{REFRESH_PERIOD, Ticker};
use crate::timer::model::{Locale, Preset, TimerConfig};
use crate::timer::state::TimerState;
use crate::view::{DisplaySnapshot, labels};

const ACCENT: Color32 = Color32::from_rgb(96, 228, 206);
const CLOCK_MAIN: Color32 = Color32::from_rgb(255, 214, 117);
const MUTED: Color32 = Color32::from_rgb(169, 188, 209);
const CJK_FONT_NAME: &str = "ricetimer-cjk";

pub fn run_gui(clock: SelectedClock, state: TimerState, config: TimerConfig) -> Result<()> {
    let font_bytes = match config.gui_font.as_deref() {
        Some(path) => Some(read_font(path)?),
        None => None,
    };
    let locale = if config.locale == Locale::Zh && font_bytes.is_none() {
        warn!("no gui_font configured for Chinese glyphs, falling back to English labels");
        Locale::En
    } else {
        config.locale
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RiceTimer")
            .with_inner_size([560.0, 640.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    let app = RiceTimerApp::new(clock, state, config.presets, locale);
    info!(locale = ?locale, "launching GUI");

    eframe::run_native(
        "RiceTimer",
        native_options,
        Box::new(move |cc| {
            configure_theme(&cc.egui_ctx);
            if let Some(bytes) = font_bytes {
                install_cjk_font(&cc.egui_ctx, bytes);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch RiceTimer GUI: {err}"))?;

    Ok(())
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("unable to read gui_font {}", path.display()))
}

fn configure_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(Color32::from_rgb(226, 234, 246));
    visuals.panel_fill = Color32::from_rgb(8, 16, 26);
    visuals.window_fill = Color32::from_rgb(12, 20, 32);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(16, 24, 38);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(26, 42, 62);
    visuals.widgets.active.bg_fill = Color32::from_rgb(34, 60, 88);
    visuals.selection.bg_fill = Color32::from_rgb(43, 148, 178);
    ctx.set_visuals(visuals);
}

fn install_cjk_font(ctx: &egui::Context, bytes: Vec<u8>) {
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        CJK_FONT_NAME.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(CJK_FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
}

struct RiceTimerApp {
    clock: SelectedClock,
    state: TimerState,
    presets: Vec<Preset>,
    locale: Locale,
    ticker: Ticker,
    snapshot: DisplaySnapshot,
}

impl RiceTimerApp {
    fn new(clock: SelectedClock, state: TimerState, presets: Vec<Preset>, locale: Locale) -> Self {
        let now = clock.clock.now();
        let snapshot = DisplaySnapshot::build(&now, &Local, &state, &presets, locale);
        Self {
            clock,
            state,
            presets,
            locale,
            ticker: Ticker::new(REFRESH_PERIOD),
            snapshot,
        }
    }

    fn refresh(&mut self) {
        let now = self.clock.clock.now();
        self.snapshot =
            DisplaySnapshot::build(&now, &Local, &self.state, &self.presets, self.locale);
    }

    fn show_header(&self, ui: &mut Ui) {
        let labels = labels(self.locale);
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("RiceTimer").size(24.0).color(ACCENT).strong());
            ui.separator();
            ui.label(RichText::new(labels.current_time).color(MUTED));
            ui.label(
                RichText::new(&self.snapshot.current_time)
                    .size(28.0)
                    .color(CLOCK_MAIN)
                    .strong(),
            );
        });
        ui.label(
            RichText::new(&self.snapshot.current_date)
                .size(16.0)
                .color(MUTED),
        );
    }

    fn show_target_controls(&mut self, ui: &mut Ui) -> bool {
        let labels = labels(self.locale);
        let mut changed = false;

        ui.heading(
            RichText::new(format!(
                "{} {} {}",
                labels.target, labels.tomorrow, self.snapshot.target_time
            ))
            .color(ACCENT)
            .strong(),
        );
        ui.add_space(4.0);

        let mut hour = self.state.target().hour();
        if ui
            .add(egui::Slider::new(&mut hour, 0..=23).text(labels.hours))
            .changed()
        {
            match self.state.set_hour(hour) {
                Ok(()) => changed = true,
                Err(err) => warn!(%err, "hour selection rejected"),
            }
        }

        let mut minute = self.state.target().minute();
        if ui
            .add(egui::Slider::new(&mut minute, 0..=59).text(labels.minutes))
            .changed()
        {
            match self.state.set_minute(minute) {
                Ok(()) => changed = true,
                Err(err) => warn!(%err, "minute selection rejected"),
            }
        }

        ui.add_space(6.0);
        ui.label(RichText::new(labels.presets).color(MUTED));
        let mut chosen: Option<usize> = None;
        ui.horizontal_wrapped(|ui| {
            for (index, preset) in self.presets.iter().enumerate() {
                let active = self.snapshot.active_preset.as_deref() == Some(preset.label.as_str());
                if ui.selectable_label(active, preset.label.as_str()).clicked() {
                    chosen = Some(index);
                }
            }
        });
        if let Some(preset) = chosen.and_then(|index| self.presets.get(index)) {
            self.state.apply_preset(preset);
            changed = true;
        }

        changed
    }

    fn show_result(&self, ui: &mut Ui) {
        let labels = labels(self.locale);
        ui.label(RichText::new(labels.delay).color(MUTED));
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(&self.snapshot.hours_text)
                    .size(54.0)
                    .color(CLOCK_MAIN)
                    .strong(),
            );
            ui.label(RichText::new(labels.hours).size(20.0).color(MUTED));
            ui.label(
                RichText::new(&self.snapshot.minutes_text)
                    .size(54.0)
                    .color(CLOCK_MAIN)
                    .strong(),
            );
            ui.label(RichText::new(labels.minutes).size(20.0).color(MUTED));
        });
        ui.label(
            RichText::new(format!(
                "{} {} {}",
                labels.total, self.snapshot.duration.total_minutes, labels.minutes
            ))
            .size(18.0)
            .color(ACCENT),
        );
        ui.add_space(4.0);
        ui.label(RichText::new(&self.snapshot.summary).size(16.0).strong());
    }

    fn show_timeline(&self, ui: &mut Ui) {
        let labels = labels(self.locale);
        ui.label(RichText::new(labels.timeline).color(MUTED));
        ui.horizontal(|ui| {
            ui.label(RichText::new(&self.snapshot.timeline_now).monospace());
            let bar_width = (ui.available_width() - 60.0).max(80.0);
            ui.add(
                egui::ProgressBar::new((self.snapshot.progress_percent / 100.0) as f32)
                    .desired_width(bar_width)
                    .fill(Color32::from_rgb(43, 148, 178)),
            );
            ui.label(RichText::new(&self.snapshot.target_time).monospace());
        });
    }
}

impl eframe::App for RiceTimerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ticker.due(Instant::now()) {
            self.refresh();
        }

        TopBottomPanel::top("header")
            .resizable(false)
            .show(ctx, |ui| self.show_header(ui));

        TopBottomPanel::bottom("footer")
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Clock: {}", self.clock.label))
                        .color(Color32::from_rgb(161, 180, 201)),
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                if self.show_target_controls(ui) {
                    self.refresh();
                }
                ui.separator();
                self.show_result(ui);
                ui.separator();
                self.show_timeline(ui);
            });
        });

        ctx.request_repaint_after(self.ticker.until_next(Instant::now()));
    }
}
