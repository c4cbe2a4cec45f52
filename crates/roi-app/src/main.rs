//! Desktop host for the slider and ROI calculator widgets

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context as _, Result};
use clap::Parser;
use eframe::egui::{self, Context, RichText, Ui};
use tracing::info;

use roi_core::SalaryPeriod;
use roi_widgets::calculator::HREF_ATTR;
use roi_widgets::{OutputRole, Page, PageConfig};

mod slider_view;
mod theme;

use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "roi-calculator")]
#[command(about = "Interactive ROI calculator with logarithmic range sliders", long_about = None)]
#[command(version)]
struct Cli {
    /// Page description (JSON); the built-in page is used when omitted
    #[arg(long)]
    page: Option<PathBuf>,

    /// Polling fallback interval in milliseconds, 0 disables polling
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Use the dark theme
    #[arg(long)]
    dark: bool,
}

/// Read the page description and apply command line overrides
fn load_page_config(cli: &Cli) -> Result<PageConfig> {
    let mut config = match &cli.page {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read page description {}", path.display()))?;
            PageConfig::from_json(&json)
                .with_context(|| format!("Invalid page description {}", path.display()))?
        }
        None => PageConfig::default(),
    };

    if let Some(ms) = cli.poll_ms {
        config.calculator.poll_interval_ms = (ms > 0).then_some(ms);
    }
    Ok(config)
}

/// Main application state
struct RoiApp {
    /// The live page: sliders, calculator and their shared state
    page: Page,
}

impl RoiApp {
    fn new(cc: &eframe::CreationContext<'_>, page: Page, theme: &Theme) -> Self {
        theme::apply_theme(&cc.egui_ctx, theme);
        Self { page }
    }

    fn sliders_panel(&mut self, ui: &mut Ui) {
        ui.heading("Your operation");
        ui.add_space(8.0);

        for slider in self.page.sliders_mut() {
            slider_view::show(ui, &slider.label, &mut slider.controller);
            ui.add_space(12.0);
        }

        let mut period = self.page.calculator().inputs().salary_period;
        ui.horizontal(|ui| {
            ui.label("Salary is");
            let monthly = ui.radio_value(&mut period, SalaryPeriod::Monthly, "monthly");
            let yearly = ui.radio_value(&mut period, SalaryPeriod::Yearly, "yearly");
            if monthly.changed() || yearly.changed() {
                self.page.select_salary_period(period);
            }
        });
    }

    fn results_panel(&self, ui: &mut Ui) {
        ui.heading("Your return");
        ui.add_space(8.0);

        let text = |role| self.page.output_text(role).unwrap_or_default();

        egui::Grid::new("roi_results")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                ui.label("Inventory value");
                ui.label(text(OutputRole::InventoryValue));
                ui.end_row();

                ui.label("Savings per month");
                ui.label(RichText::new(text(OutputRole::Savings)).color(theme::savings_color()));
                ui.end_row();

                ui.label("Recommended plan");
                ui.strong(text(OutputRole::Plan));
                ui.end_row();

                ui.label("Plan price");
                ui.label(text(OutputRole::PlanPrice));
                ui.end_row();

                let net_color = match self.page.calculator().last_results() {
                    Some(results) if results.monthly_savings < 0.0 => theme::loss_color(),
                    _ => theme::savings_color(),
                };
                ui.label("Net monthly savings");
                ui.label(RichText::new(text(OutputRole::MonthlySavings)).color(net_color).strong());
                ui.end_row();
            });

        ui.add_space(16.0);
        if let Some(button) = self.page.document().query(
            roi_core::config::attr::ROLE,
            OutputRole::ActionButton.role(),
        ) {
            let href = button.attribute(HREF_ATTR).unwrap_or_default();
            ui.hyperlink_to(button.text(), href);
        }
    }
}

impl eframe::App for RoiApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.page.poll(now);
        if let Some(remaining) = self.page.calculator().poll_remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        egui::SidePanel::right("results_panel")
            .resizable(false)
            .min_width(300.0)
            .show(ctx, |ui| self.results_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.sliders_panel(ui));
        });
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_page_config(&cli)?;
    let theme = Theme {
        dark_mode: cli.dark,
        ..Theme::default()
    };

    info!(sliders = config.sliders.len(), theme = %theme.name, "Starting ROI calculator");
    let page = Page::build(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([720.0, 480.0]),
        default_theme: if theme.dark_mode {
            eframe::Theme::Dark
        } else {
            eframe::Theme::Light
        },
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "ROI Calculator",
        options,
        Box::new(move |cc| Box::new(RoiApp::new(cc, page, &theme))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
