use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use holdout::dataset::{DataContainer, DEFAULT_OUTPUT_SIZE, DEFAULT_TEST_FRACTION};
use ndarray_npy::ReadableElement;
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Load a features/labels pair of .npy files and split it into train and test partitions.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the label array.
    #[arg(long)]
    labels: PathBuf,

    /// Path to the feature array.
    #[arg(long)]
    data: PathBuf,

    /// Fraction of the samples put in the test partition.
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    split: f64,

    /// Dimensionality of the model output.
    #[arg(long, default_value_t = DEFAULT_OUTPUT_SIZE)]
    output_size: usize,

    /// Seed for the shuffle. The thread-local generator is used when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Element type stored in the feature file.
    #[arg(long, value_enum, default_value_t = Dtype::F32)]
    feature_dtype: Dtype,

    /// Element type stored in the label file.
    #[arg(long, value_enum, default_value_t = Dtype::F32)]
    label_dtype: Dtype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dtype {
    F32,
    F64,
    I32,
    I64,
    U8,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.feature_dtype {
        Dtype::F32 => with_features::<f32>(&args),
        Dtype::F64 => with_features::<f64>(&args),
        Dtype::I32 => with_features::<i32>(&args),
        Dtype::I64 => with_features::<i64>(&args),
        Dtype::U8 => with_features::<u8>(&args),
    }
}

fn with_features<F>(args: &Args) -> anyhow::Result<()>
where
    F: ReadableElement + Clone,
{
    match args.label_dtype {
        Dtype::F32 => run::<F, f32>(args),
        Dtype::F64 => run::<F, f64>(args),
        Dtype::I32 => run::<F, i32>(args),
        Dtype::I64 => run::<F, i64>(args),
        Dtype::U8 => run::<F, u8>(args),
    }
}

fn run<F, L>(args: &Args) -> anyhow::Result<()>
where
    F: ReadableElement + Clone,
    L: ReadableElement + Clone,
{
    let mut data = DataContainer::<F, L>::new(args.output_size);
    data.load(&args.labels, &args.data)
        .context("failed to load dataset")?;

    let split = match args.seed {
        Some(seed) => data.split_with_rng(args.split, &mut StdRng::seed_from_u64(seed)),
        None => data.split(args.split),
    };
    split.context("failed to split dataset")?;

    println!("Samples: {}", data.length());
    println!("Sample shape: {:?}", data.shape());
    println!("Output size: {}", data.output_size());
    println!(
        "Train: features {:?}, labels {:?}",
        data.train_features()?.shape(),
        data.train_labels()?.shape()
    );
    println!(
        "Test: features {:?}, labels {:?}",
        data.test_features()?.shape(),
        data.test_labels()?.shape()
    );
    Ok(())
}
