use civsave::{
    civ6::{Civ6Save, ChunkData},
    civ7::{Chunk, ChunkValue, Civ7Save},
    SaveFormat,
};
use std::env;

fn print_civ7_chunk(chunk: &Chunk, depth: usize) {
    let indent = "  ".repeat(depth);
    match &chunk.value {
        ChunkValue::Chunks(children) => {
            println!(
                "{}{:#010x} {} {:?} ({} chunks)",
                indent,
                chunk.offset,
                chunk.marker,
                chunk.chunk_type,
                children.len()
            );
            for child in children {
                print_civ7_chunk(child, depth + 1);
            }
        }
        value => println!(
            "{}{:#010x} {} {:?} {:?}",
            indent, chunk.offset, chunk.marker, chunk.chunk_type, value
        ),
    }
}

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
    let data = std::fs::read(path)?;

    match SaveFormat::detect(&data)? {
        SaveFormat::Civ6 => {
            let save = Civ6Save::parse(&data)?;
            println!("header: {} bytes", save.header().len());
            for chunk in save.chunks() {
                match &chunk.data {
                    ChunkData::Skip => continue,
                    data => println!(
                        "{:#010x} {} {:?} {:?}",
                        chunk.offset, chunk.marker, chunk.chunk_type, data
                    ),
                }
            }

            for civ in save.civs() {
                let mut fields = civ.fields().iter().collect::<Vec<_>>();
                fields.sort_by_key(|(field, _)| **field);
                println!("civ in slot {}", civ.slot());
                for (field, chunk) in fields {
                    println!("  {}: {:?}", field.name(), chunk.data);
                }
            }

            println!("compressed section at {:#010x}", save.compressed_offset());
        }
        SaveFormat::Civ7 => {
            let save = Civ7Save::parse(&data)?;
            for (i, group) in save.groups().iter().enumerate() {
                println!("group {} ({} chunks)", i + 1, group.len());
                for chunk in group {
                    print_civ7_chunk(chunk, 1);
                }
            }
        }
    }

    Ok(())
}
