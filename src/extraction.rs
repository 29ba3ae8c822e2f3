/*!
Civ saves come in two binary formats, one per game, and the first four bytes
of a file are all that is needed to tell them apart:

 - `CIV6`: a header region of no fixed size, a flat stream of chunks that
   has to be found by scanning for a known marker, then a zlib compressed
   section
 - `CIV7`: a fixed header followed by five groups of self describing chunks

File extensions are only a hint and are ignored here. A file whose magic
matches neither format is rejected without attempting to decode it with
either parser.

Both formats are reduced to the same [`MatchRecord`]: the turn, the map,
how players are split into teams, and who played what.
*/

use crate::{
    civ6::{Civ6Parser, DEFAULT_MAX_RESYNCS},
    civ7::Civ7Save,
    errors::Magic,
    models::{Game, MatchRecord},
    CivError, CivErrorKind,
};
use serde::Serialize;
use std::{io::Read, sync::OnceLock};

/// The save format identified by a file's magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    Civ6,
    Civ7,
}

impl SaveFormat {
    pub fn detect(data: &[u8]) -> Result<SaveFormat, CivError> {
        let mut magic = [0u8; 4];
        let len = data.len().min(4);
        magic[..len].copy_from_slice(&data[..len]);

        let format = [SaveFormat::Civ6, SaveFormat::Civ7]
            .into_iter()
            .find(|x| len == 4 && x.magic() == magic)
            .ok_or_else(|| {
                CivError::from(CivErrorKind::UnrecognizedFormat {
                    magic: Magic(magic),
                })
            })?;

        tracing::debug!(format = format.game().as_str(), "detected save format");
        Ok(format)
    }

    pub fn magic(&self) -> [u8; 4] {
        match self {
            SaveFormat::Civ6 => crate::civ6::markers::MAGIC,
            SaveFormat::Civ7 => crate::civ7::markers::MAGIC,
        }
    }

    pub fn game(&self) -> Game {
        match self {
            SaveFormat::Civ6 => Game::Civ6,
            SaveFormat::Civ7 => Game::Civ7,
        }
    }
}

/// Parser version sourced from the `CIV_SAVE_PARSER_VERSION` environment
/// variable, read once per process. Defaults to `dev` when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvParserVersion;

impl EnvParserVersion {
    pub const VAR: &'static str = "CIV_SAVE_PARSER_VERSION";
    pub const DEFAULT: &'static str = "dev";

    pub fn get(&self) -> &'static str {
        static VERSION: OnceLock<String> = OnceLock::new();
        VERSION
            .get_or_init(|| match std::env::var(Self::VAR) {
                Ok(x) if !x.is_empty() => x,
                _ => String::from(Self::DEFAULT),
            })
            .as_str()
    }
}

/// Extracts the match record from either save format
#[derive(Debug, Clone, Copy, Default)]
pub struct CivExtractor;

impl CivExtractor {
    /// Create a customized extractor
    pub fn builder() -> CivExtractorBuilder {
        CivExtractorBuilder::new()
    }

    /// Extract the match record with the default options
    pub fn extract(data: &[u8]) -> Result<(MatchRecord, SaveFormat), CivError> {
        Self::builder().extract(data)
    }
}

/// Customize how a save is extracted
#[derive(Debug, Clone)]
pub struct CivExtractorBuilder {
    parser_version: String,
    max_resyncs: usize,
}

impl Default for CivExtractorBuilder {
    fn default() -> Self {
        CivExtractorBuilder::new()
    }
}

impl CivExtractorBuilder {
    pub fn new() -> Self {
        CivExtractorBuilder {
            parser_version: String::from(EnvParserVersion.get()),
            max_resyncs: DEFAULT_MAX_RESYNCS,
        }
    }

    /// The version string stamped on every extracted record
    pub fn with_parser_version<S: Into<String>>(mut self, parser_version: S) -> Self {
        self.parser_version = parser_version.into();
        self
    }

    /// Cap on consecutive resynchronization attempts when decoding Civ VI
    /// saves
    pub fn with_max_resyncs(mut self, max_resyncs: usize) -> Self {
        self.max_resyncs = max_resyncs;
        self
    }

    pub fn extract(&self, data: &[u8]) -> Result<(MatchRecord, SaveFormat), CivError> {
        let format = SaveFormat::detect(data)?;
        let record = match format {
            SaveFormat::Civ6 => Civ6Parser::new()
                .with_max_resyncs(self.max_resyncs)
                .parse(data)?
                .match_record(&self.parser_version)?,
            SaveFormat::Civ7 => Civ7Save::parse(data)?.match_record(&self.parser_version)?,
        };

        tracing::debug!(
            turn = record.turn,
            players = record.players.len(),
            game_mode = record.game_mode.as_str(),
            "extracted match record"
        );

        Ok((record, format))
    }

    /// Read the entire save into memory and then extract from it
    pub fn extract_from_reader<R: Read>(
        &self,
        mut reader: R,
    ) -> Result<(MatchRecord, SaveFormat), CivError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.extract(&data)
    }
}

/// Detect the format of the save and extract its match record
pub fn detect_and_parse(data: &[u8], parser_version: &str) -> Result<MatchRecord, CivError> {
    CivExtractor::builder()
        .with_parser_version(parser_version)
        .extract(data)
        .map(|(record, _)| record)
}
