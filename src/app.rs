use anyhow::Context as _;
use eframe::egui;
use nqueens_visualizer::{
    Algorithm, Board, BoardSize, Config, ControlError, Outcome, RunController, RunStatus, Speed,
    Step, StepSink,
};
use std::sync::Arc;

pub fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("nqueens-search")
        .enable_time()
        .build()
        .context("failed to start the search runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "N-Queens Visualizer",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let sink = Arc::new(RepaintSink(cc.egui_ctx.clone()));
            let controller = RunController::new(config, runtime.handle().clone(), sink);
            Ok(Box::new(VisualizerApp::new(controller, runtime)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))
}

/// Wakes the UI whenever the search publishes.
struct RepaintSink(egui::Context);

impl StepSink for RepaintSink {
    fn publish(&self, _step: &Step) {
        self.0.request_repaint();
    }

    fn finished(&self, _outcome: Outcome) {
        self.0.request_repaint();
    }
}

#[derive(Clone, PartialEq)]
struct Theme {
    name: &'static str,
    background: egui::Color32,
    panel_background: egui::Color32,
    text_color: egui::Color32,
    accent_color: egui::Color32,
    board_light: egui::Color32,
    board_dark: egui::Color32,
    queen_color: egui::Color32,
}

impl Theme {
    fn presets() -> Vec<Self> {
        vec![
            Self {
                name: "Amber",
                background: egui::Color32::from_rgb(30, 27, 46),
                panel_background: egui::Color32::from_rgb(46, 40, 70),
                text_color: egui::Color32::from_rgb(237, 233, 254),
                accent_color: egui::Color32::from_rgb(147, 51, 234),
                board_light: egui::Color32::from_rgb(254, 243, 199),
                board_dark: egui::Color32::from_rgb(180, 83, 9),
                queen_color: egui::Color32::from_rgb(24, 24, 27),
            },
            Self {
                name: "Slate",
                background: egui::Color32::from_rgb(15, 23, 42),
                panel_background: egui::Color32::from_rgb(30, 41, 59),
                text_color: egui::Color32::from_rgb(226, 232, 240),
                accent_color: egui::Color32::from_rgb(99, 102, 241),
                board_light: egui::Color32::from_rgb(241, 245, 249),
                board_dark: egui::Color32::from_rgb(100, 116, 139),
                queen_color: egui::Color32::from_rgb(15, 23, 42),
            },
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::presets()[0].clone()
    }
}

struct Particle {
    pos: egui::Pos2,
    vel: egui::Vec2,
    color: egui::Color32,
    life: f32, // 1.0 down to 0.0
    size: f32,
}

struct VisualizerApp {
    controller: RunController,
    // Declared after the controller so runs are cancelled before the
    // runtime shuts down.
    _runtime: tokio::runtime::Runtime,
    theme: Theme,
    particles: Vec<Particle>,
    celebrated: bool,
}

impl VisualizerApp {
    fn new(controller: RunController, runtime: tokio::runtime::Runtime) -> Self {
        Self {
            controller,
            _runtime: runtime,
            theme: Theme::default(),
            particles: Vec::new(),
            celebrated: false,
        }
    }

    fn spawn_particles(&mut self, pos: egui::Pos2, color: egui::Color32) {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..30 {
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed: f32 = rng.gen_range(100.0..500.0);
            self.particles.push(Particle {
                pos,
                vel: egui::vec2(angle.cos() * speed, angle.sin() * speed - 200.0),
                color,
                life: 1.0,
                size: rng.gen_range(3.0..7.0),
            });
        }
    }

    fn animate(&mut self, ctx: &egui::Context, status: &RunStatus) {
        let dt = ctx.input(|i| i.stable_dt);
        self.particles.retain_mut(|p| {
            p.pos += p.vel * dt;
            p.vel.y += 800.0 * dt; // Gravity
            p.life -= dt * 1.5;
            p.life > 0.0
        });

        match status.outcome {
            Some(Outcome::Solved) if !self.celebrated => {
                self.celebrated = true;
                let center = ctx.screen_rect().center();
                self.spawn_particles(center, self.theme.accent_color);
            }
            None => self.celebrated = false,
            _ => {}
        }
        if !self.particles.is_empty() {
            ctx.request_repaint();
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, status: &RunStatus) {
        let running = status.is_running();
        let config = self.controller.config();

        ui.label(egui::RichText::new("Configuration").strong().color(self.theme.text_color));
        ui.separator();

        let mut n = config.size.get();
        let resp = ui.add_enabled(
            !running,
            egui::Slider::new(&mut n, BoardSize::MIN..=BoardSize::MAX).text("Queens"),
        );
        if resp.changed() {
            self.apply(|c| c.set_board_size(BoardSize::clamped(n)));
        }

        ui.add_enabled_ui(!running, |ui| {
            let mut algorithm = config.algorithm;
            egui::ComboBox::from_id_salt("algorithm")
                .selected_text(algorithm.label())
                .width(260.0)
                .show_ui(ui, |ui| {
                    for a in Algorithm::ALL {
                        ui.selectable_value(&mut algorithm, a, a.label());
                    }
                });
            if algorithm != config.algorithm {
                self.apply(|c| c.set_algorithm(algorithm));
            }

            let mut speed = config.speed;
            egui::ComboBox::from_id_salt("speed")
                .selected_text(speed.label())
                .width(260.0)
                .show_ui(ui, |ui| {
                    for s in Speed::ALL {
                        ui.selectable_value(&mut speed, s, s.label());
                    }
                });
            if speed != config.speed {
                self.apply(|c| c.set_speed(speed));
            }
        });

        ui.add_space(15.0);
        ui.label(egui::RichText::new("Controls").strong().color(self.theme.text_color));
        ui.separator();
        ui.horizontal_wrapped(|ui| {
            let btn_size = egui::vec2(90.0, 36.0);
            if !running {
                if ui.add_sized(btn_size, egui::Button::new("▶ Solve")).clicked() {
                    self.apply(|c| c.start().map(|_| ()));
                }
            } else {
                let label = if status.is_paused() { "▶ Resume" } else { "⏸ Pause" };
                if ui.add_sized(btn_size, egui::Button::new(label)).clicked() {
                    self.apply(|c| c.toggle_pause());
                }
                if ui.add_sized(btn_size, egui::Button::new("⏹ Stop")).clicked() {
                    self.controller.stop();
                }
            }
            if ui
                .add_enabled(!running, egui::Button::new("⟲ Reset").min_size(btn_size))
                .clicked()
            {
                self.controller.reset();
            }
        });

        ui.add_space(15.0);
        egui::Frame::none()
            .fill(self.theme.background)
            .inner_margin(10.0)
            .rounding(6.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&status.message).color(self.theme.text_color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Steps: {}", status.step_count))
                                .strong()
                                .color(self.theme.accent_color),
                        );
                    });
                });
            });

        ui.add_space(15.0);
        ui.label(egui::RichText::new(config.algorithm.label()).strong());
        ui.label(egui::RichText::new(config.algorithm.description()).size(12.0));

        ui.add_space(15.0);
        egui::ComboBox::from_id_salt("theme_picker")
            .selected_text(self.theme.name)
            .show_ui(ui, |ui| {
                for preset in Theme::presets() {
                    ui.selectable_value(&mut self.theme, preset.clone(), preset.name);
                }
            });
    }

    fn apply<T>(&mut self, intent: impl FnOnce(&mut RunController) -> Result<T, ControlError>) {
        if let Err(e) = intent(&mut self.controller) {
            log::warn!("ignored: {e}");
        }
    }

    fn draw_board(&self, ui: &mut egui::Ui, board: &Board) {
        let n = board.size().max(1);
        let available_rect = ui.available_rect_before_wrap();
        let margin = 60.0;
        let size = (available_rect.height() - margin)
            .min(available_rect.width() - margin)
            .max(0.0);
        let board_rect = egui::Rect::from_center_size(available_rect.center(), egui::vec2(size, size));

        let painter = ui.painter();
        painter.rect_filled(
            board_rect.expand(5.0),
            5.0,
            self.theme.text_color.linear_multiply(0.2),
        );

        let cell_size = size / n as f32;
        for (row, cells) in board.rows().iter().enumerate() {
            for (col, &queen) in cells.iter().enumerate() {
                let cell_rect = egui::Rect::from_min_size(
                    egui::pos2(
                        board_rect.min.x + col as f32 * cell_size,
                        board_rect.min.y + row as f32 * cell_size,
                    ),
                    egui::vec2(cell_size, cell_size),
                );
                let color = if (row + col) % 2 == 0 {
                    self.theme.board_light
                } else {
                    self.theme.board_dark
                };
                painter.rect_filled(cell_rect, 0.0, color);

                if queen {
                    painter.text(
                        cell_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "♛",
                        egui::FontId::proportional(cell_size * 0.7),
                        self.theme.queen_color,
                    );
                }
            }
        }

        for p in &self.particles {
            painter.circle_filled(p.pos, p.size, p.color.linear_multiply(p.life));
        }

        // 1-based labels, matching the status messages
        let font_id = egui::FontId::proportional((cell_size * 0.25).clamp(8.0, 16.0));
        for i in 0..n {
            let label = (i + 1).to_string();
            painter.text(
                egui::pos2(
                    board_rect.min.x + i as f32 * cell_size + cell_size / 2.0,
                    board_rect.max.y + 10.0,
                ),
                egui::Align2::CENTER_TOP,
                &label,
                font_id.clone(),
                self.theme.text_color,
            );
            painter.text(
                egui::pos2(
                    board_rect.min.x - 10.0,
                    board_rect.min.y + i as f32 * cell_size + cell_size / 2.0,
                ),
                egui::Align2::RIGHT_CENTER,
                label,
                font_id.clone(),
                self.theme.text_color,
            );
        }
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let status = self.controller.status();
        self.animate(ctx, &status);

        let panel_frame = egui::Frame::none()
            .fill(self.theme.panel_background)
            .inner_margin(12.0)
            .rounding(10.0)
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(20)));

        egui::SidePanel::right("controls")
            .frame(panel_frame)
            .min_width(320.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("♛ N-Queens")
                            .size(24.0)
                            .strong()
                            .color(self.theme.text_color),
                    );
                });
                ui.add_space(20.0);
                self.controls(ui, &status);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.background))
            .show(ctx, |ui| self.draw_board(ui, &status.board));
    }
}
