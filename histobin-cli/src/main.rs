use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use histobin_bins::attribute::AttributeType;
use histobin_bins::comparator::BinComparator;
use histobin_bins::creator::BinCreatorRegistry;
use histobin_common::element::ElementKind;
use histobin_common::graph::MemoryGraph;
use histobin_view::mode::Modifiers;
use histobin_view::state::HistogramState;
use histobin_view::view::HistogramView;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Histogram binning and selection over graph elements
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the attributes that elements of a kind can be binned by
    Attributes {
        /// Path to the graph JSON file
        graph: PathBuf,

        /// Element kind to bin
        #[arg(short, long, default_value_t = ElementKind::Vertex)]
        kind: ElementKind,
    },

    /// Print one line per bin
    Bins {
        /// Path to the graph JSON file
        graph: PathBuf,

        #[command(flatten)]
        histogram: HistogramArgs,

        /// Print selected counts and skip bins with no selected elements
        #[arg(long)]
        selected_only: bool,

        /// Print labels only
        #[arg(long)]
        no_counts: bool,
    },

    /// Drag over bars `first..=last` and print the selected elements
    Select {
        /// Path to the graph JSON file
        graph: PathBuf,

        /// Bar the drag starts on
        #[arg(allow_negative_numbers = true)]
        first: isize,

        /// Bar the drag ends on
        #[arg(allow_negative_numbers = true)]
        last: isize,

        #[command(flatten)]
        histogram: HistogramArgs,

        /// Add to the current selection, as with shift held
        #[arg(long, conflicts_with = "toggle")]
        add: bool,

        /// Toggle the bars, as with control held
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(clap::Args)]
struct HistogramArgs {
    /// Histogram state JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Element kind to bin, overriding the config
    #[arg(short, long)]
    kind: Option<ElementKind>,

    /// Attribute or graph property to bin by, overriding the config
    #[arg(short, long)]
    attribute: Option<String>,

    /// Bin order, overriding the config
    #[arg(short, long)]
    sort: Option<BinComparator>,

    /// Reverse the bin order
    #[arg(long)]
    descending: bool,
}

impl HistogramArgs {
    fn state(&self) -> anyhow::Result<HistogramState> {
        let mut state = match &self.config {
            Some(path) => HistogramState::from_json(&read(path)?)
                .with_context(|| format!("Failed to parse histogram state {}", path.display()))?,
            None => HistogramState::default(),
        };
        if let Some(kind) = self.kind {
            state.element_kind = kind;
        }
        if let Some(attribute) = &self.attribute {
            state.attribute = Some(attribute.clone());
        }
        if let Some(sort) = self.sort {
            state.comparator = sort;
        }
        if self.descending && state.comparator.is_ascending() {
            state.comparator = state.comparator.reverse();
        }
        Ok(state)
    }

    fn view(&self, graph: &MemoryGraph) -> anyhow::Result<HistogramView> {
        let state = self.state()?;
        let view = HistogramView::new(state.clone(), BinCreatorRegistry::with_defaults(), graph)?;
        if view.state().attribute.is_none() {
            match &state.attribute {
                Some(name) => bail!(
                    "`{name}` is not a {} for {} elements",
                    view.state().attribute_type,
                    view.state().element_kind
                ),
                None => bail!("No attribute chosen, pass --attribute or a config"),
            }
        }
        Ok(view)
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_graph(path: &Path) -> anyhow::Result<MemoryGraph> {
    let graph = MemoryGraph::from_json(&read(path)?)
        .with_context(|| format!("Failed to load graph {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded graph");
    Ok(graph)
}

fn list_attributes(graph: &MemoryGraph, kind: ElementKind) {
    let registry = BinCreatorRegistry::with_defaults();
    for attribute_type in AttributeType::all() {
        for name in attribute_type.bin_creators(graph, kind, &registry).keys() {
            println!("{attribute_type}\t{name}");
        }
    }
}

fn select(
    graph: &mut MemoryGraph,
    view: &mut HistogramView,
    first: isize,
    last: isize,
    modifiers: Modifiers,
) -> String {
    view.mouse_pressed(modifiers, first);
    view.mouse_dragged(last);
    view.mouse_released();
    view.select();
    view.commit(graph);

    let kind = view.state().element_kind;
    let kind = if kind.is_merged() {
        ElementKind::Transaction
    } else {
        kind
    };
    let selected: Vec<String> = graph.selected(kind).iter().map(|e| e.to_string()).collect();
    format!("{kind}: {}", selected.join(" "))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Attributes { graph, kind } => {
            let graph = load_graph(&graph)?;
            list_attributes(&graph, kind);
        }
        Commands::Bins {
            graph,
            histogram,
            selected_only,
            no_counts,
        } => {
            let graph = load_graph(&graph)?;
            let view = histogram.view(&graph)?;
            print!("{}", view.export(!no_counts, selected_only));
        }
        Commands::Select {
            graph,
            first,
            last,
            histogram,
            add,
            toggle,
        } => {
            let mut graph = load_graph(&graph)?;
            let mut view = histogram.view(&graph)?;
            let modifiers = Modifiers {
                shift: add,
                control: toggle,
            };
            println!("{}", select(&mut graph, &mut view, first, last, modifiers));
        }
    }
    Ok(())
}
