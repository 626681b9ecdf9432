//! stride - node embeddings from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Train embeddings over a tab-separated edge list
//! stride train graph.tsv -o vectors.txt --size 128 --iter 10
//!
//! # Two-hop pool sampling instead of the biased walk
//! stride train graph.tsv -o vectors.txt --mode pool --onehop-pref 0.7
//!
//! # Seed from pre-trained vectors, veto positives across communities
//! stride train graph.tsv -o vectors.txt --pt nodes.vec --partitions comm.txt
//!
//! # Cluster a written vector file
//! stride cluster vectors.txt -o clusters.txt --clusters 50
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use stride_embed::{
    cluster, write_clusters, Communities, KMeansConfig, SamplingMode, TrainConfig, Trainer,
    WordVectors,
};

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Node embeddings via biased random walks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train node embeddings from an edge list
    Train {
        /// Input edge list (<src>\t<dst>[\t<weight>] per line)
        graph: PathBuf,

        /// Output vector file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON config file; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Embedding dimension
        #[arg(long)]
        size: Option<usize>,

        /// Starting learning rate
        #[arg(long)]
        alpha: Option<f32>,

        /// Treat the graph as directed (0/1)
        #[arg(long)]
        directed: Option<u8>,

        /// Context window length
        #[arg(long)]
        window: Option<usize>,

        /// Negative samples per positive
        #[arg(long)]
        negative: Option<usize>,

        /// Training iterations
        #[arg(long)]
        iter: Option<usize>,

        /// Context sampling strategy
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Discard nodes observed fewer times than this
        #[arg(long)]
        min_count: Option<u32>,

        /// New-direction factor of the biased walk
        #[arg(long)]
        p1: Option<f32>,

        /// Return factor of the biased walk
        #[arg(long)]
        q1: Option<f32>,

        /// One-hop preference weight of pool sampling
        #[arg(long)]
        onehop_pref: Option<f32>,

        /// Negative-sampling table length
        #[arg(long)]
        table_size: Option<usize>,

        /// Seed of the sampling stream
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity (0 quiet .. 3 chatty)
        #[arg(long)]
        trace: Option<u8>,

        /// Pre-trained vector file seeding the input matrix
        #[arg(long = "pt")]
        pretrained: Option<PathBuf>,

        /// Community partition file vetoing cross-community positives
        #[arg(long)]
        partitions: Option<PathBuf>,
    },

    /// K-means cluster a written vector file
    Cluster {
        /// Input vector file (as written by `stride train`)
        vectors: PathBuf,

        /// Output file, one line of node keys per cluster
        #[arg(short, long)]
        output: PathBuf,

        /// Number of clusters
        #[arg(long, default_value = "8")]
        clusters: usize,

        /// Iteration cap
        #[arg(long, default_value = "100")]
        max_iterations: usize,

        /// Seed for centroid initialization
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Precomputed two-hop neighborhood pool
    Pool,
    /// Second-order biased random walk
    Walk,
}

impl From<ModeArg> for SamplingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pool => SamplingMode::Pool,
            ModeArg::Walk => SamplingMode::Walk,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            graph,
            output,
            config,
            size,
            alpha,
            directed,
            window,
            negative,
            iter,
            mode,
            min_count,
            p1,
            q1,
            onehop_pref,
            table_size,
            seed,
            trace,
            pretrained,
            partitions,
        } => {
            let mut cfg = match config {
                Some(path) => TrainConfig::from_path(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => TrainConfig::default(),
            };
            if let Some(v) = size {
                cfg.dim = v;
            }
            if let Some(v) = alpha {
                cfg.alpha = v;
            }
            if let Some(v) = directed {
                cfg.directed = v != 0;
            }
            if let Some(v) = window {
                cfg.window = v;
            }
            if let Some(v) = negative {
                cfg.negative = v;
            }
            if let Some(v) = iter {
                cfg.iterations = v;
            }
            if let Some(v) = mode {
                cfg.mode = v.into();
            }
            if let Some(v) = min_count {
                cfg.min_count = v;
            }
            if let Some(v) = p1 {
                cfg.p1 = v;
            }
            if let Some(v) = q1 {
                cfg.q1 = v;
            }
            if let Some(v) = onehop_pref {
                cfg.onehop_pref = v;
            }
            if let Some(v) = table_size {
                cfg.table_size = v;
            }
            if let Some(v) = seed {
                cfg.seed = v;
            }
            if let Some(v) = trace {
                cfg.trace = v;
            }
            cmd_train(&graph, &output, cfg, pretrained, partitions)
        }
        Commands::Cluster {
            vectors,
            output,
            clusters,
            max_iterations,
            seed,
        } => cmd_cluster(&vectors, &output, clusters, max_iterations, seed),
    }
}

fn cmd_train(
    graph: &PathBuf,
    output: &PathBuf,
    cfg: TrainConfig,
    pretrained: Option<PathBuf>,
    partitions: Option<PathBuf>,
) -> Result<()> {
    if cfg.trace > 0 {
        println!("Parameters:");
        println!("size:    {}", cfg.dim);
        println!("alpha:   {}", cfg.alpha);
        println!("window:  {}", cfg.window);
        println!("ns:      {}", cfg.negative);
        println!("iter:    {}", cfg.iterations);
        println!("p1:      {}", cfg.p1);
        println!("q1:      {}", cfg.q1);
        println!(
            "mode:    {}",
            match cfg.mode {
                SamplingMode::Pool => "pool",
                SamplingMode::Walk => "walk",
            }
        );
    }

    let edge_text = fs::read_to_string(graph)
        .with_context(|| format!("Failed to read graph {}", graph.display()))?;

    let mut trainer = Trainer::new(cfg.clone());
    if let Some(path) = partitions {
        let communities = Communities::from_path(&path)
            .with_context(|| format!("Failed to load partitions {}", path.display()))?;
        trainer = trainer.with_communities(communities);
    }
    if let Some(path) = pretrained {
        let vectors = WordVectors::from_path(&path)
            .with_context(|| format!("Failed to load pre-trained vectors {}", path.display()))?;
        trainer = trainer
            .with_pretrained(vectors)
            .context("Pre-trained vectors incompatible with configured size")?;
    }

    let start = Instant::now();
    let pb = (cfg.trace > 0).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message("training...");
        pb
    });

    let model = trainer.train(&edge_text).context("Training failed")?;

    if let Some(pb) = pb {
        pb.finish_with_message(format!("Trained in {:.2?}", start.elapsed()));
    }

    let file = File::create(output)
        .with_context(|| format!("Failed to create output {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    model
        .write_vectors(&mut writer)
        .context("Failed to write vectors")?;
    writer.flush()?;

    if cfg.trace > 0 {
        let stats = model.graph_stats();
        println!(
            "Wrote {} vectors ({} edges, {} OOV skips, {} capacity drops)",
            model.vocab().len(),
            stats.edges_added,
            stats.oov_skipped,
            stats.capacity_dropped
        );
    }
    Ok(())
}

fn cmd_cluster(
    vectors_path: &PathBuf,
    output: &PathBuf,
    clusters: usize,
    max_iterations: usize,
    seed: u64,
) -> Result<()> {
    let vectors = WordVectors::from_path(vectors_path)
        .with_context(|| format!("Failed to read vectors {}", vectors_path.display()))?;

    println!(
        "K-means over {} vectors ({} clusters)...",
        vectors.len(),
        clusters
    );
    let start = Instant::now();
    let clustering = cluster(
        &vectors,
        &KMeansConfig {
            clusters,
            max_iterations,
            seed,
            ..KMeansConfig::default()
        },
    )
    .context("Clustering failed")?;
    println!(
        "Converged after {} iteration(s) in {:.2?}",
        clustering.iterations,
        start.elapsed()
    );

    let file = File::create(output)
        .with_context(|| format!("Failed to create output {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_clusters(&vectors, &clustering, &mut writer).context("Failed to write clusters")?;
    writer.flush()?;

    println!("Wrote {} cluster line(s) to {}", clusters, output.display());
    Ok(())
}
