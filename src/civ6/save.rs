use super::{
    chunk::{Chunk, ChunkReader, DEFAULT_MAX_RESYNCS},
    markers::{slot_index, ActorField, GameField, END_UNCOMPRESSED, MAGIC, SLOT_HEADERS},
};
use crate::{
    errors::Magic,
    flavor::{Civ6Flavor, SaveFlavor},
    models::{MatchRecord, PlayerInfo},
    CivError, CivErrorKind,
};
use std::collections::HashMap;

const FULL_CIV: &str = "CIVILIZATION_LEVEL_FULL_CIV";
const OBSERVER: u32 = 2;

/// The chunks seen between a slot header and the next actor description
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    slot: usize,
    header: Chunk,
    fields: HashMap<ActorField, Chunk>,
}

impl Actor {
    fn new(slot: usize, header: Chunk) -> Self {
        Actor {
            slot,
            header,
            fields: HashMap::new(),
        }
    }

    /// The player slot (0-11) that opened this actor
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn slot_header(&self) -> &Chunk {
        &self.header
    }

    pub fn get(&self, field: ActorField) -> Option<&Chunk> {
        self.fields.get(&field)
    }

    pub fn fields(&self) -> &HashMap<ActorField, Chunk> {
        &self.fields
    }

    fn is_complete(&self) -> bool {
        self.fields.contains_key(&ActorField::ActorType)
            && self.fields.contains_key(&ActorField::ActorName)
    }

    /// A seated, non observer, full civilization
    fn is_civ(&self) -> bool {
        let seated = self
            .get(ActorField::ActorAiHuman)
            .map_or(false, |x| x.data.as_int() != Some(OBSERVER));

        let full_civ = self
            .get(ActorField::ActorType)
            .and_then(|x| x.data.as_str())
            .map_or(false, |x| x == FULL_CIV);

        seated && full_civ && self.fields.contains_key(&ActorField::ActorName)
    }
}

/// Customizes how Civ VI saves are decoded
#[derive(Debug, Clone)]
pub struct Civ6Parser {
    max_resyncs: usize,
}

impl Default for Civ6Parser {
    fn default() -> Self {
        Civ6Parser::new()
    }
}

impl Civ6Parser {
    pub fn new() -> Self {
        Civ6Parser {
            max_resyncs: DEFAULT_MAX_RESYNCS,
        }
    }

    /// Cap on consecutive resynchronization attempts after unrecognized
    /// type codes before the save is rejected
    pub fn with_max_resyncs(mut self, max_resyncs: usize) -> Self {
        self.max_resyncs = max_resyncs;
        self
    }

    pub fn parse<'a>(&self, data: &'a [u8]) -> Result<Civ6Save<'a>, CivError> {
        if !data.starts_with(&MAGIC) {
            let mut magic = [0u8; 4];
            let len = data.len().min(4);
            magic[..len].copy_from_slice(&data[..len]);
            return Err(CivError::from(CivErrorKind::UnrecognizedFormat {
                magic: Magic(magic),
            }));
        }

        let mut reader = ChunkReader::new(data, self.max_resyncs);

        // The header region has no fixed size, so structured data is found
        // by scanning for the game speed field.
        let anchor_marker = GameField::GameSpeed.marker();
        let anchor = reader
            .cursor
            .find_next(anchor_marker.as_bytes(), 0)
            .ok_or_else(|| CivError::truncated(data.len(), 4, data.len()))?;
        reader.cursor.set_position(anchor)?;

        let mut chunks = Vec::new();
        let mut slots: [Option<Actor>; SLOT_HEADERS.len()] = Default::default();
        let mut current: Option<usize> = None;
        let mut game_data: HashMap<String, Chunk> = HashMap::new();

        while reader.cursor.peek_marker()? != END_UNCOMPRESSED {
            let chunk = reader.next_chunk(false, 0)?;

            // a repeated slot header replaces the earlier actor in that slot
            if let Some(slot) = slot_index(chunk.marker) {
                if slots[slot].is_some() {
                    tracing::debug!(slot, offset = chunk.offset, "slot header repeated");
                }
                slots[slot] = Some(Actor::new(slot, chunk.clone()));
                current = Some(slot);
            }

            if let Some(field) = ActorField::from_marker(chunk.marker) {
                if let Some(actor) = current.and_then(|x| slots[x].as_mut()) {
                    actor.fields.insert(field, chunk.clone());
                }

                if field == ActorField::ActorDescription {
                    current = None;
                }
            }

            if let Some(field) = GameField::from_marker(chunk.marker) {
                let key = unique_key(&game_data, field.name());
                game_data.insert(key, chunk.clone());
            }

            chunks.push(chunk);
        }

        let compressed_offset = reader.cursor.position();

        let mut civs = Vec::new();
        let mut remaining = Vec::new();
        for actor in slots.into_iter().flatten() {
            if actor.is_civ() {
                civs.push(actor);
            } else if actor.is_complete() {
                remaining.push(actor);
            } else {
                tracing::debug!(slot = actor.slot, "discarding incomplete actor");
            }
        }

        tracing::debug!(
            chunks = chunks.len(),
            civs = civs.len(),
            actors = remaining.len(),
            "decoded civ6 save"
        );

        Ok(Civ6Save {
            data,
            anchor,
            chunks,
            game_data,
            civs,
            actors: remaining,
            compressed_offset,
        })
    }
}

/// `name`, or `name_2`, `name_3`, ... for repeated fields
fn unique_key(game_data: &HashMap<String, Chunk>, name: &str) -> String {
    if !game_data.contains_key(name) {
        return String::from(name);
    }

    (2..)
        .map(|i| format!("{}_{}", name, i))
        .find(|x| !game_data.contains_key(x))
        .unwrap_or_else(|| String::from(name))
}

/// A decoded Civ VI save
#[derive(Debug, Clone)]
pub struct Civ6Save<'a> {
    data: &'a [u8],
    anchor: usize,
    chunks: Vec<Chunk>,
    game_data: HashMap<String, Chunk>,
    civs: Vec<Actor>,
    actors: Vec<Actor>,
    compressed_offset: usize,
}

impl<'a> Civ6Save<'a> {
    /// Decode a save with the default options
    pub fn parse(data: &'a [u8]) -> Result<Self, CivError> {
        Civ6Parser::new().parse(data)
    }

    /// The unstructured bytes before the first chunk
    pub fn header(&self) -> &'a [u8] {
        &self.data[..self.anchor]
    }

    /// All chunks of the uncompressed section in file order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The raw bytes of each chunk in file order
    pub fn raw_chunks(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        let data = self.data;
        self.chunks.iter().map(move |x| &data[x.offset..x.end])
    }

    /// Game wide fields keyed by name. Repeated fields are suffixed with
    /// `_2`, `_3`, and so on in the order they appear.
    pub fn game_data(&self) -> &HashMap<String, Chunk> {
        &self.game_data
    }

    pub fn game_field(&self, field: GameField) -> Option<&Chunk> {
        self.game_data.get(field.name())
    }

    /// Actors that represent seated civilizations, in slot order
    pub fn civs(&self) -> &[Actor] {
        &self.civs
    }

    /// Complete actors that are not civs (city states, observers, etc)
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Offset of the word that introduces the compressed section
    pub fn compressed_offset(&self) -> usize {
        self.compressed_offset
    }

    /// Decompress the game data that follows the uncompressed section
    #[cfg(feature = "miniz")]
    pub fn decompress(&self) -> Result<Vec<u8>, CivError> {
        use super::markers::COMPRESSED_DATA_END;
        use crate::ByteCursor;

        // skip the size word of the first block
        let start = self.compressed_offset + 4;
        let end = ByteCursor::new(self.data)
            .find_next(&COMPRESSED_DATA_END, start)
            .map(|x| x + COMPRESSED_DATA_END.len())
            .ok_or_else(|| {
                CivError::truncated(start, COMPRESSED_DATA_END.len(), self.data.len())
            })?;

        let joined = crate::inflate::join_blocks(&self.data[start..end]);
        crate::inflate::inflate_sync_flushed(&joined)
    }

    /// Assemble the match record
    pub fn match_record(&self, parser_version: &str) -> Result<MatchRecord, CivError> {
        let flavor = Civ6Flavor;

        let turn = self
            .game_field(GameField::GameTurn)
            .ok_or_else(|| CivError::missing(GameField::GameTurn.name()))?
            .int()?;

        let map_file = self
            .game_field(GameField::MapFile)
            .ok_or_else(|| CivError::missing(GameField::MapFile.name()))?
            .str()?;

        let players = self
            .civs
            .iter()
            .map(|civ| civ_player(&flavor, civ))
            .collect::<Result<Vec<_>, _>>()?;

        let teams = players.iter().map(|x| x.team).collect::<Vec<_>>();

        Ok(MatchRecord {
            game: flavor.game(),
            turn,
            age: None,
            map_type: String::from(map_type(map_file)),
            game_mode: flavor.game_mode(&teams),
            players,
            parser_version: String::from(parser_version),
        })
    }
}

fn civ_player(flavor: &Civ6Flavor, civ: &Actor) -> Result<PlayerInfo, CivError> {
    let leader = civ
        .get(ActorField::LeaderName)
        .ok_or_else(|| CivError::missing(ActorField::LeaderName.name()))?
        .str()?;

    let team_chunk = civ
        .get(ActorField::TeamId)
        .ok_or_else(|| CivError::missing(ActorField::TeamId.name()))?;
    let team = team_chunk.int()?;
    let team = i32::try_from(team).map_err(|_| {
        CivError::from(CivErrorKind::InvalidTeam {
            marker: team_chunk.marker,
            team,
        })
    })?;

    let user_id = civ.get(ActorField::UserId).map(|x| x.str()).transpose()?;

    let player_alive = civ
        .get(ActorField::PlayerAlive)
        .map(|x| x.bool())
        .transpose()?;

    let (steam_id, user_name) = flavor.identity(user_id);
    Ok(PlayerInfo {
        steam_id,
        user_name,
        civ: String::from(leader),
        leader: None,
        team,
        player_alive,
    })
}

/// The map script name without its directory or extension
fn map_type(map_file: &str) -> &str {
    let name = map_file.rsplit(&['/', '\\'][..]).next().unwrap_or(map_file);
    match name.char_indices().rev().nth(3) {
        Some((idx, _)) => &name[..idx],
        None => "",
    }
}
