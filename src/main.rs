mod app;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use concept_graph::api::DEFAULT_API_BASE;
use concept_graph::dataset::{
    EMBEDDING_DIMENSIONS, LabelFormat, LoadOptions, NotableSelection, ProjectionOptions,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the concept API.
    #[arg(long, env = "CONCEPT_GRAPH_API", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, value_enum, default_value_t = LabelFormat::Id)]
    label_format: LabelFormat,

    /// Share of the most connected concepts that get a persistent label.
    #[arg(long, default_value_t = 0.1)]
    notable_fraction: f64,

    /// Share of the least connected concepts that also get one.
    #[arg(long, default_value_t = 0.0)]
    low_notable_fraction: f64,

    /// Embedding components used for the initial layout.
    #[arg(long, default_value_t = EMBEDDING_DIMENSIONS)]
    max_dimensions: usize,

    /// Fixes colors, link widths and projections across runs.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            label_format: self.label_format,
            notable: NotableSelection {
                high_fraction: self.notable_fraction.clamp(0.0, 1.0),
                low_fraction: self.low_notable_fraction.clamp(0.0, 1.0),
            },
            projection: ProjectionOptions {
                max_dimensions: self.max_dimensions,
                ..ProjectionOptions::default()
            },
            seed: self.seed,
            ..LoadOptions::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    let default_filter = "concept_graph=info";
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_filter))
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let load_options = args.load_options();
    tracing::info!(api_base = %args.api_base, ?load_options, "starting concept graph viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Concept graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ConceptGraphApp::new(
                cc,
                args.api_base.clone(),
                load_options.clone(),
            )))
        }),
    )
}
