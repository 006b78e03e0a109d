//! egui rendering of the `Switcher` state.

use eframe::egui::{self, Vec2};
use egui_extras::{Column, TableBuilder};

use dns_switcher::switcher::{Action, Notice, Phase, Severity, Switcher};

const GREEN: egui::Color32 = egui::Color32::from_rgb(34, 139, 34);
const RED: egui::Color32 = egui::Color32::from_rgb(178, 34, 34);

/// Main application container used by eframe.
pub struct DnsSwitcherApp {
    switcher: Switcher,
    /// Interface and platform, shown in the title bar.
    subtitle: String,
    // The busy indicator for the queued action has been painted once.
    busy_shown: bool,
}

impl DnsSwitcherApp {
    pub fn new(switcher: Switcher, subtitle: String) -> Self {
        Self {
            switcher,
            subtitle,
            busy_shown: false,
        }
    }
}

impl eframe::App for DnsSwitcherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Blocks the UI thread until the command exits.
        if self.busy_shown {
            self.busy_shown = false;
            self.switcher.run_pending();
            ctx.request_repaint();
        }

        let interactive =
            self.switcher.notice().is_none() && matches!(self.switcher.phase(), Phase::Idle);

        title_bar(ctx, &self.subtitle);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(10.0);

                    ui.group(|ui| {
                        self.render_status_section(ui);
                        self.render_app_state(ui);
                    });

                    ui.add_space(15.0);
                    ui.heading("Select DNS Provider");
                    ui.add_space(5.0);

                    self.render_provider_table(ui);

                    ui.add_space(15.0);
                    self.render_action_buttons(ui);

                    ui.add_space(10.0);
                    self.render_log(ui);
                });
            });
        });

        self.render_notice(ctx);

        if !matches!(self.switcher.phase(), Phase::Idle) {
            ctx.request_repaint();
        }
    }
}

impl DnsSwitcherApp {
    fn render_status_section(&self, ui: &mut egui::Ui) {
        ui.heading("📊 Current DNS Servers");
        ui.add_space(5.0);

        let current = self.switcher.current();
        egui::Grid::new("current_dns")
            .num_columns(2)
            .spacing([20.0, 4.0])
            .show(ui, |ui| {
                ui.label("Primary:");
                ui.strong(current.primary.to_string());
                ui.end_row();

                ui.label("Secondary:");
                ui.strong(current.secondary.to_string());
                ui.end_row();
            });
    }

    fn render_app_state(&mut self, ui: &mut egui::Ui) {
        match self.switcher.phase() {
            Phase::Idle => {}
            Phase::InProgress(action) => {
                let text = match action {
                    Action::Apply(name) => format!("Setting DNS to {name}..."),
                    Action::Reset => "Resetting DNS to default...".to_string(),
                    Action::Refresh => "Reading DNS servers...".to_string(),
                };
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(text);
                });
                self.busy_shown = true;
            }
        }
    }

    fn render_provider_table(&mut self, ui: &mut egui::Ui) {
        let mut clicked = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(170.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Provider");
                });
                header.col(|ui| {
                    ui.strong("Servers");
                });
            })
            .body(|mut body| {
                for provider in self.switcher.catalog().iter() {
                    body.row(36.0, |mut row| {
                        row.col(|ui| {
                            let [r, g, b] = provider.accent();
                            let button = egui::Button::new(
                                egui::RichText::new(format!("Set {}", provider.display_name()))
                                    .color(egui::Color32::WHITE),
                            )
                            .fill(egui::Color32::from_rgb(r, g, b))
                            .corner_radius(8);
                            if ui.add_sized(Vec2::new(160.0, 30.0), button).clicked() {
                                clicked = Some(provider.display_name().to_string());
                            }
                        });
                        row.col(|ui| {
                            ui.label(provider.addresses().join(", "));
                        });
                    });
                }
            });

        if let Some(name) = clicked {
            self.switcher.request(Action::Apply(name));
        }
    }

    fn render_action_buttons(&mut self, ui: &mut egui::Ui) {
        let reset = ui.add_sized(
            Vec2::new(ui.available_width(), 36.0),
            egui::Button::new(
                egui::RichText::new("Reset to Default ISP DNS").color(egui::Color32::WHITE),
            )
            .fill(GREEN)
            .corner_radius(10),
        );
        if reset.clicked() {
            self.switcher.request(Action::Reset);
        }

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            let refresh = ui
                .add_sized(
                    Vec2::new(40.0, 32.0),
                    egui::Button::new(egui::RichText::new("🔄").size(20.0)).frame(false),
                )
                .on_hover_text("Refresh current DNS")
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            if refresh.clicked() {
                self.switcher.request(Action::Refresh);
            }

            let exit = ui.add_sized(
                Vec2::new(ui.available_width(), 32.0),
                egui::Button::new(egui::RichText::new("Exit").color(egui::Color32::WHITE))
                    .fill(RED)
                    .corner_radius(10),
            );
            if exit.clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn render_log(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            egui::ScrollArea::vertical()
                .max_height(ui.available_height())
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in self.switcher.log_lines() {
                        ui.monospace(format!("> {line}"));
                    }
                });
        });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(Notice {
            severity,
            title,
            message,
        }) = self.switcher.notice().cloned()
        else {
            return;
        };

        let (color, icon) = match severity {
            Severity::Info => (egui::Color32::GREEN, "✅"),
            Severity::Warning => (egui::Color32::YELLOW, "⚠️"),
            Severity::Error => (egui::Color32::RED, "❌"),
        };

        egui::Window::new(format!("{icon} {title}"))
            .id(egui::Id::new("notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.colored_label(color, message);
                ui.add_space(10.0);

                ui.vertical_centered(|ui| {
                    if ui
                        .add_sized(
                            Vec2::new(80.0, 30.0),
                            egui::Button::new(
                                egui::RichText::new("OK").color(egui::Color32::WHITE),
                            )
                            .fill(GREEN)
                            .corner_radius(8),
                        )
                        .clicked()
                    {
                        self.switcher.dismiss_notice();
                    }
                });
            });
    }
}

/// Title bar for the undecorated window: app name, the interface being
/// configured and a close button. Dragging the bar moves the window.
fn title_bar(ctx: &egui::Context, subtitle: &str) {
    use egui::{Align, Layout, PointerButton, RichText, Sense, ViewportCommand};

    egui::TopBottomPanel::top("title_bar")
        .exact_height(40.0)
        .frame(
            egui::Frame::new()
                .fill(ctx.style().visuals.extreme_bg_color)
                .inner_margin(egui::Margin::symmetric(12, 6)),
        )
        .show(ctx, |ui| {
            let drag = ui.interact(ui.max_rect(), ui.id().with("drag"), Sense::click_and_drag());
            if drag.drag_started_by(PointerButton::Primary) {
                ui.ctx().send_viewport_cmd(ViewportCommand::StartDrag);
            }

            ui.horizontal_centered(|ui| {
                ui.label(RichText::new("🌐 DNS Switcher").size(18.0).strong());
                ui.separator();
                ui.label(RichText::new(subtitle).weak());

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let close = ui
                        .add(egui::Button::new(RichText::new("❌").size(16.0)).frame(false))
                        .on_hover_text("Close the window")
                        .on_hover_cursor(egui::CursorIcon::PointingHand);
                    if close.clicked() {
                        ui.ctx().send_viewport_cmd(ViewportCommand::Close);
                    }
                });
            });
        });
}
