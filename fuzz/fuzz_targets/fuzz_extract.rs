#![no_main]
use libfuzzer_sys::fuzz_target;

fn run(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let record = civsave::detect_and_parse(data, "fuzz")?;
    serde_json::to_writer(std::io::sink(), &record)?;

    if let Ok(save) = civsave::civ6::Civ6Parser::new().with_max_resyncs(64).parse(data) {
        let _ = save.raw_chunks().count();
        let _ = save.decompress();
    }

    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = run(data);
});
