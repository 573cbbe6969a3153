use anyhow::Context;
use clap::Parser;
use splat_prep::{DecodeOptions, SplatOrder};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Decode a binary Gaussian splat PLY file into a flat JSON dataset"
)]
struct Cli {
    /// Input splat file.
    #[arg(value_name = "INPUT")]
    input: std::path::PathBuf,

    /// Output JSON file.
    #[arg(value_name = "OUTPUT")]
    output: std::path::PathBuf,

    /// Order of splats in the output: none, size, brightness or opacity.
    #[arg(long, default_value_t = SplatOrder::None)]
    order: SplatOrder,

    /// Reconstruct records in parallel.
    #[arg(long)]
    parallel: bool,

    /// Pretty print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let args = Cli::parse();
    let options = DecodeOptions {
        order: args.order,
        parallel: args.parallel,
    };

    log::info!("Reading splats from {}", args.input.display());

    let dataset = splat_prep::decode_file(&args.input, &options)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;

    if let Some((min, max)) = dataset.bounds() {
        log::debug!("Scene bounds: {min} to {max}");
    }

    dataset
        .write_json_file(&args.output, args.pretty)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Dataset with {} splats saved to {}",
        dataset.len(),
        args.output.display()
    );

    Ok(())
}
