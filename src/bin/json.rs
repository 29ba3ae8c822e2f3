use civsave::CivExtractor;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).ok_or("expected a path to a save file")?;
    let file = std::fs::File::open(path)?;

    let mut builder = CivExtractor::builder();
    if let Some(version) = args.get(2) {
        builder = builder.with_parser_version(version.as_str());
    }

    let (record, format) = builder.extract_from_reader(std::io::BufReader::new(file))?;
    tracing::info!(game = format.game().as_str(), "extracted {}", path);

    serde_json::to_writer_pretty(std::io::stdout(), &record)?;
    println!();
    Ok(())
}
