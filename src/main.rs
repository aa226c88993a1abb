mod app;
mod directory;
mod graph;
mod util;

use clap::Parser;

use crate::graph::LayoutMode;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "data/people.json")]
    records: String,
    #[arg(long, default_value = "force")]
    layout: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let layout = LayoutMode::from_name(&args.layout).unwrap_or_else(|| {
        log::warn!("unknown layout {:?}, falling back to force", args.layout);
        LayoutMode::default()
    });

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 840.0]),
        ..Default::default()
    };

    eframe::run_native(
        "org-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::OrgGraphApp::new(
                cc,
                args.records.clone(),
                layout,
            )))
        }),
    )
}
