use quakemap::{
    background::{load_all, FeedLoader},
    feeds::FeedKind,
    ui::{MapWidget, TileTextures},
    FeedFetcher, HttpFetcher, QuakeMapConfig, QuakeMapContext,
};
use std::{path::PathBuf, sync::Arc};

struct Args {
    config: Option<PathBuf>,
    /// Load both feeds, print what arrived and exit
    summary: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = pico_args::Arguments::from_env();
    let parsed = Args {
        summary: args.contains("--summary"),
        config: args.opt_value_from_str("--config")?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        anyhow::bail!("unexpected arguments: {:?}", rest);
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => QuakeMapConfig::load(path)?,
        None => QuakeMapConfig::default(),
    };
    let fetcher = HttpFetcher::new(&config.http)?;

    if args.summary {
        return print_summary(config, &fetcher).await;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes and Tectonic Plates"),
        ..Default::default()
    };

    let context = QuakeMapContext::new(config)?;
    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |_cc| Box::new(QuakeApp::new(context, fetcher))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

async fn print_summary(config: QuakeMapConfig, fetcher: &dyn FeedFetcher) -> anyhow::Result<()> {
    let (seismic, boundaries) = load_all(fetcher, &config.feeds).await;
    let mut context = QuakeMapContext::new(config)?;
    context.apply(seismic)?;
    context.apply(boundaries)?;

    for kind in [FeedKind::Seismic, FeedKind::Boundaries] {
        println!("{}: {}", kind, context.status(kind));
    }
    if let Some(summary) = context.summary() {
        println!("{}", summary);
    }
    if let Some(in_view) = context.markers_in_view() {
        println!("{} in the initial view", in_view);
    }
    Ok(())
}

struct QuakeApp {
    context: QuakeMapContext,
    feeds: FeedLoader,
    tiles: TileTextures,
}

impl QuakeApp {
    fn new(context: QuakeMapContext, fetcher: HttpFetcher) -> Self {
        let runtime = tokio::runtime::Handle::current();
        let tiles = TileTextures::new(
            fetcher.client().clone(),
            runtime.clone(),
            context.config().tile_cache_capacity,
        );

        let mut feeds = FeedLoader::new(runtime);
        feeds.spawn_all(Arc::new(fetcher), &context.config().feeds);

        Self {
            context,
            feeds,
            tiles,
        }
    }
}

impl eframe::App for QuakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for event in self.feeds.drain() {
            if let Err(e) = self.context.apply(event) {
                log::error!("Could not apply feed: {}", e);
            }
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.context.summary() {
                    Some(summary) => ui.label(summary.to_string()),
                    None => ui.label(self.context.status(FeedKind::Seismic).to_string()),
                };
                if let Some(in_view) = self.context.markers_in_view() {
                    ui.separator();
                    ui.label(format!("{} in view", in_view));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let viewport = &self.context.map().viewport;
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {:.2}",
                        viewport.center.lat, viewport.center.lng, viewport.zoom
                    ));
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.add(MapWidget::new(&mut self.context, &mut self.tiles));
            });
    }
}
