//! DNS Switcher - GUI for switching the system DNS resolver

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use clap::Parser;
use eframe::egui;
use log::{error, info};

use dns_switcher::backend::{self, NativeHost};
use dns_switcher::config::Cli;
use dns_switcher::elevation::{self, Elevation};
use dns_switcher::switcher::{Notice, Severity, Switcher};

use crate::app::DnsSwitcherApp;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let elevation = elevation::ensure_elevated(!cli.no_elevate);
    if let Ok(Elevation::Relaunched) = elevation {
        info!("elevated instance started, exiting");
        std::process::exit(0);
    }

    info!(
        "configuring interface '{}' on {}",
        cli.interface, cli.platform
    );
    let subtitle = cli.subtitle();
    let backend = backend::select(cli.platform, cli.backend_settings(), Box::new(NativeHost));
    let mut switcher = Switcher::new(backend, cli.catalog());

    match elevation {
        Ok(Elevation::Unprivileged) => {
            switcher.warn_unprivileged(&elevation::unprivileged_warning())
        }
        Ok(_) => {}
        Err(e) => {
            error!("{e}");
            switcher.notify(Notice::new(Severity::Error, "Error", e.to_string()));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_decorations(false)
            .with_inner_size([500.0, 640.0])
            .with_resizable(false),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "DNS Switcher",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(DnsSwitcherApp::new(switcher, subtitle)))
        }),
    )
}
