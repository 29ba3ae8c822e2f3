#![allow(dead_code)]

use civsave::{
    civ6::markers::{ActorField, GameField, SLOT_HEADERS},
    civ7::markers::{GameField as Civ7Field, PlayerField, GROUP_COUNT, GROUP_COUNT_LOOKBACK},
    Marker,
};
use flate2::{write::ZlibEncoder, Compression};
use std::io::Write;

/// A marker that no table knows about
pub const OTHER: Marker = Marker::new([0x10, 0x32, 0x54, 0x76]);

fn civ6_header(marker: Marker, chunk_type: u32) -> Vec<u8> {
    let mut out = marker.as_bytes().to_vec();
    out.extend_from_slice(&chunk_type.to_le_bytes());
    out
}

/// Sync flushed zlib stream that, like the game's, is never finished
pub fn sync_flushed(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.flush().unwrap();
    encoder.get_ref().clone()
}

#[derive(Debug, Clone)]
pub struct Civ6Actor<'a> {
    pub slot: usize,
    pub actor_type: &'a str,
    pub leader: &'a str,
    pub ai_human: u32,
    pub alive: Option<bool>,
    pub team: Option<u32>,
    pub user_id: Option<&'a str>,
}

impl<'a> Civ6Actor<'a> {
    pub fn civ(slot: usize, leader: &'a str, team: u32) -> Self {
        Civ6Actor {
            slot,
            actor_type: "CIVILIZATION_LEVEL_FULL_CIV",
            leader,
            ai_human: 3,
            alive: Some(true),
            team: Some(team),
            user_id: None,
        }
    }

    pub fn user(mut self, user_id: &'a str) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn alive(mut self, alive: bool) -> Self {
        self.alive = Some(alive);
        self
    }
}

/// Writes a Civ VI save chunk by chunk
#[derive(Debug, Clone)]
pub struct Civ6Builder {
    data: Vec<u8>,
}

impl Default for Civ6Builder {
    fn default() -> Self {
        Civ6Builder::new()
    }
}

impl Civ6Builder {
    /// Magic, an unstructured header, and the game speed anchor
    pub fn new() -> Self {
        let mut data = b"CIV6".to_vec();
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"\x15\x00\x00\x00header-junk-of-no-fixed-size");
        data.extend_from_slice(&[0xEE; 11]);
        Civ6Builder { data }.string(GameField::GameSpeed.marker(), "GAMESPEED_ONLINE")
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn int(mut self, marker: Marker, value: u32) -> Self {
        self.data.extend(civ6_header(marker, 0x02));
        self.data.extend_from_slice(&[0; 8]);
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn boolean(mut self, marker: Marker, value: bool) -> Self {
        self.data.extend(civ6_header(marker, 0x01));
        self.data.extend_from_slice(&[0; 8]);
        self.data.extend_from_slice(&[u8::from(value), 0, 0, 0]);
        self
    }

    pub fn string(mut self, marker: Marker, text: &str) -> Self {
        self.data.extend(civ6_header(marker, 0x04));
        self.data
            .extend_from_slice(&(text.len() as u16 + 1).to_le_bytes());
        self.data
            .extend_from_slice(&[0x00, 0x21, 0x01, 0x00, 0x00, 0x00]);
        self.data.extend_from_slice(text.as_bytes());
        self.data.push(0);
        self
    }

    pub fn unresolved_string(mut self, marker: Marker) -> Self {
        self.data.extend(civ6_header(marker, 0x04));
        self.data.extend_from_slice(&[0x00, 0x00, 0x00, 0x20]);
        self.data.extend_from_slice(&[0; 8]);
        self
    }

    pub fn utf16(mut self, marker: Marker, text: &str) -> Self {
        let units = text.encode_utf16().collect::<Vec<_>>();
        self.data.extend(civ6_header(marker, 0x05));
        self.data
            .extend_from_slice(&(units.len() as u16 + 1).to_le_bytes());
        self.data
            .extend_from_slice(&[0x00, 0x21, 0x02, 0x00, 0x00, 0x00]);
        for unit in units {
            self.data.extend_from_slice(&unit.to_le_bytes());
        }
        self.data.extend_from_slice(&[0, 0]);
        self
    }

    pub fn unknown(mut self, marker: Marker) -> Self {
        self.data.extend(civ6_header(marker, 0x0D));
        self.data.extend_from_slice(&[0x42; 16]);
        self
    }

    /// Padding chunk with a small marker value
    pub fn padding(mut self) -> Self {
        self.data.extend(civ6_header(Marker::new([0x03, 0, 0, 0]), 0x02));
        self
    }

    /// Fixed count array of integers. Entries carry small marker values
    /// that are only decoded because they are inside an array.
    pub fn int_array(mut self, marker: Marker, values: &[u32]) -> Self {
        self.data.extend(civ6_header(marker, 0x0A));
        self.data.extend_from_slice(&[0; 8]);
        self.data
            .extend_from_slice(&(values.len() as u32).to_le_bytes());
        for (i, value) in values.iter().enumerate() {
            self.data
                .extend(civ6_header(Marker::new([i as u8 + 1, 0, 0, 0]), 0x02));
            self.data.extend_from_slice(&[0; 8]);
            self.data.extend_from_slice(&value.to_le_bytes());
        }
        self
    }

    /// Self delimiting per player records
    pub fn records(mut self, marker: Marker, records: &[&[(ActorField, &str)]]) -> Self {
        self.data.extend(civ6_header(marker, 0x0B));
        self.data.extend_from_slice(&[0; 8]);
        self.data
            .extend_from_slice(&(records.len() as u32).to_le_bytes());
        for record in records {
            self.data.push(0x0A);
            self.data.extend_from_slice(&[0; 15]);
            for (field, text) in record.iter() {
                self = self.string(field.marker(), text);
            }
            self = self.string(OTHER, "1");
        }
        self
    }

    pub fn actor(mut self, actor: &Civ6Actor) -> Self {
        self = self
            .int(SLOT_HEADERS[actor.slot], actor.slot as u32)
            .string(ActorField::ActorName.marker(), "CIVILIZATION_TEST")
            .string(ActorField::ActorType.marker(), actor.actor_type)
            .string(ActorField::LeaderName.marker(), actor.leader)
            .int(ActorField::ActorAiHuman.marker(), actor.ai_human)
            .string(ActorField::PlayerName.marker(), "LOC_PLAYER");

        if let Some(alive) = actor.alive {
            self = self.boolean(ActorField::PlayerAlive.marker(), alive);
        }

        if let Some(team) = actor.team {
            self = self.int(ActorField::TeamId.marker(), team);
        }

        if let Some(user_id) = actor.user_id {
            self = self.string(ActorField::UserId.marker(), user_id);
        }

        self.string(ActorField::ActorDescription.marker(), "LOC_DESCRIPTION")
    }

    /// An actor that never declares its type
    pub fn incomplete_actor(self, slot: usize) -> Self {
        self.int(SLOT_HEADERS[slot], slot as u32)
            .string(ActorField::LeaderName.marker(), "LEADER_NOBODY")
            .string(ActorField::ActorDescription.marker(), "LOC_DESCRIPTION")
    }

    /// Close the uncompressed section and append the compressed game data
    pub fn finish_with(mut self, game_data: &[u8]) -> Vec<u8> {
        self.data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
        let compressed = sync_flushed(game_data);
        for (i, block) in compressed.chunks(64 * 1024).enumerate() {
            if i != 0 {
                self.data
                    .extend_from_slice(&(block.len() as u32).to_le_bytes());
            }
            self.data.extend_from_slice(block);
        }
        self.data
    }

    pub fn finish(self) -> Vec<u8> {
        self.finish_with(b"gamestate")
    }
}

/// Game and map fields every Civ VI fixture carries
pub fn civ6_game(turn: u32, map_file: &str) -> Civ6Builder {
    Civ6Builder::new()
        .int(GameField::GameTurn.marker(), turn)
        .string(GameField::ModId.marker(), "base-game")
        .string(GameField::ModTitle.marker(), "Base Game")
        .string(GameField::ModId.marker(), "expansion-2")
        .string(GameField::MapFile.marker(), map_file)
        .string(GameField::MapSize.marker(), "MAPSIZE_STANDARD")
        .unresolved_string(OTHER)
        .utf16(OTHER, "Ünïcode")
        .unknown(OTHER)
        .padding()
}

/// The 8 player teamer: two interleaved teams of four on Seven Seas
pub fn civ6_teamer() -> Vec<u8> {
    let leaders = [
        "LEADER_DIDO",
        "LEADER_JOHN_CURTIN",
        "LEADER_GILGAMESH",
        "LEADER_TRAJAN",
        "LEADER_HOJO",
        "LEADER_PERICLES",
        "LEADER_SALADIN",
        "LEADER_VICTORIA",
    ];

    let mut builder = civ6_game(51, "Seven_Seas.lua")
        .int_array(OTHER, &[5, 6, 7])
        .records(
            OTHER,
            &[
                &[(ActorField::LeaderName, "LEADER_DIDO")],
                &[(ActorField::LeaderName, "LEADER_TRAJAN")],
            ],
        );

    for (slot, leader) in leaders.iter().enumerate() {
        let mut actor = Civ6Actor::civ(slot, leader, (slot % 2) as u32);
        actor = if slot == 0 {
            actor.user("Calcifer")
        } else {
            actor.user("Player@76561198000000000")
        };
        builder = builder.actor(&actor);
    }

    let observer = Civ6Actor {
        ai_human: 2,
        ..Civ6Actor::civ(8, "LEADER_OBSERVER", 9)
    };

    let city_state = Civ6Actor {
        actor_type: "CIVILIZATION_LEVEL_CITY_STATE",
        ..Civ6Actor::civ(9, "LEADER_MINOR_CIV_GENEVA", 10)
    };

    builder
        .actor(&observer)
        .actor(&city_state)
        .incomplete_actor(10)
        .finish()
}

/// The 10 player free for all on Pangaea with two eliminated players.
/// Actors are written in descending slot order.
pub fn civ6_ffa() -> Vec<u8> {
    let mut builder = civ6_game(106, "{4873eb62-8ccc-4574-b784-dda455e74e68}Maps/Pangaea.lua");
    for slot in (0..10).rev() {
        let leader = format!("LEADER_{}", slot);
        let mut actor = Civ6Actor::civ(slot, &leader, slot as u32).alive(slot != 3 && slot != 7);
        if slot == 4 {
            actor.ai_human = 1;
            builder = builder.actor(&actor);
        } else {
            let user_id = format!("player{}@7656119800000000{}", slot, slot);
            builder = builder.actor(&actor.user(&user_id));
        }
    }

    builder.finish()
}

/// Every slot seated, after which the lobby rewrote slots 0 and 5. The
/// later actor in a slot wins.
pub fn civ6_full_lobby() -> Vec<u8> {
    let mut builder = civ6_game(2, "Terra.lua");
    for slot in 0..SLOT_HEADERS.len() {
        let leader = format!("LEADER_{}", slot);
        builder = builder.actor(&Civ6Actor::civ(slot, &leader, slot as u32));
    }

    builder
        .actor(&Civ6Actor::civ(0, "LEADER_REPLACED_0", 0))
        .actor(&Civ6Actor::civ(5, "LEADER_REPLACED_5", 5))
        .finish()
}

fn civ7_chunk(marker: Marker, chunk_type: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = marker.as_bytes().to_vec();
    out.extend_from_slice(&chunk_type.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(payload);
    out
}

pub fn civ7_int(marker: Marker, value: u32) -> Vec<u8> {
    let mut payload = vec![0xAB; 8];
    payload.extend_from_slice(&value.to_le_bytes());
    civ7_chunk(marker, 0x02, &payload)
}

pub fn civ7_string(marker: Marker, text: &str) -> Vec<u8> {
    let mut payload = (text.len() as u16 + 1).to_le_bytes().to_vec();
    payload.extend_from_slice(text.as_bytes());
    payload.push(0);
    civ7_chunk(marker, 0x04, &payload)
}

pub fn civ7_utf16(marker: Marker, text: &str) -> Vec<u8> {
    let units = text.encode_utf16().collect::<Vec<_>>();
    let mut payload = (units.len() as u16 + 1).to_le_bytes().to_vec();
    for unit in units {
        payload.extend_from_slice(&unit.to_le_bytes());
    }
    payload.extend_from_slice(&[0, 0]);
    civ7_chunk(marker, 0x05, &payload)
}

pub fn civ7_unknown(marker: Marker) -> Vec<u8> {
    civ7_chunk(marker, 0x15, &[0x33; 12])
}

pub fn civ7_words(marker: Marker) -> Vec<u8> {
    let mut payload = 2u16.to_le_bytes().to_vec();
    payload.extend_from_slice(&[0x44; 16]);
    civ7_chunk(marker, 0x08, &payload)
}

pub fn civ7_opaque(marker: Marker, data: &[u8]) -> Vec<u8> {
    let mut payload = (data.len() as u32).to_le_bytes().to_vec();
    payload.extend_from_slice(data);
    civ7_chunk(marker, 0x18, &payload)
}

pub fn civ7_chunk_array(marker: Marker, children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = (children.len() as u32).to_le_bytes().to_vec();
    for child in children {
        payload.extend_from_slice(child);
    }
    civ7_chunk(marker, 0x0B, &payload)
}

pub fn civ7_nested_array(marker: Marker, entries: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let mut payload = (entries.len() as u32).to_le_bytes().to_vec();
    for entry in entries {
        payload.extend_from_slice(&(entry.len() as u32).to_le_bytes());
        for chunk in entry {
            payload.extend_from_slice(chunk);
        }
    }
    civ7_chunk(marker, 0x0A, &payload)
}

#[derive(Debug, Clone, Default)]
pub struct Civ7Player<'a> {
    pub leader: Option<&'a str>,
    pub civ: &'a str,
    pub user_id: Option<&'a str>,
    pub team: Option<i32>,
}

pub const PLAYER_ENTRY: Marker = Marker::new([0x50, 0x4C, 0x59, 0x52]);

/// Writes a Civ VII save group by group
#[derive(Debug, Clone, Default)]
pub struct Civ7Builder {
    groups: [Vec<Vec<u8>>; GROUP_COUNT],
}

impl Civ7Builder {
    pub fn new() -> Self {
        Civ7Builder::default()
    }

    /// Append an encoded chunk to a group numbered from 1
    pub fn chunk(mut self, group: usize, chunk: Vec<u8>) -> Self {
        self.groups[group - 1].push(chunk);
        self
    }

    pub fn player(self, player: &Civ7Player) -> Self {
        let mut children = vec![civ7_unknown(OTHER)];
        if let Some(leader) = player.leader {
            children.push(civ7_string(PlayerField::LeaderName.marker(), leader));
        }

        children.push(civ7_utf16(PlayerField::CivName.marker(), player.civ));
        children.push(civ7_words(OTHER));

        if let Some(user_id) = player.user_id {
            children.push(civ7_string(PlayerField::UserId.marker(), user_id));
        }

        if let Some(team) = player.team {
            children.push(civ7_int(PlayerField::TeamId.marker(), team as u32));
        }

        self.chunk(3, civ7_chunk_array(PLAYER_ENTRY, &children))
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = b"CIV7".to_vec();
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&[0; 8]);

        // where the group 1 count lives
        let mut count_at = 8;
        for (i, group) in self.groups.iter().enumerate() {
            let next_lookback = GROUP_COUNT_LOOKBACK.get(i + 1).copied();
            let trailer = match next_lookback {
                Some(lookback) if lookback > 0 => Some(lookback),
                _ => None,
            };

            let count = group.len() + usize::from(trailer.is_some());
            out[count_at..count_at + 4].copy_from_slice(&(count as u32).to_le_bytes());

            for chunk in group {
                out.extend_from_slice(chunk);
            }

            match (trailer, next_lookback) {
                (Some(lookback), _) => {
                    out.extend(civ7_opaque(OTHER, &vec![0; lookback]));
                    count_at = out.len() - lookback;
                }
                (None, Some(_)) => {
                    count_at = out.len();
                    out.extend_from_slice(&[0; 4]);
                }
                (None, None) => {}
            }
        }

        out
    }
}

pub fn civ7_map_json(en_us: &str) -> String {
    format!(
        r#"{{"LOC_MAP_NAME":[{{"locale":"de_DE","text":"Karte"}},{{"locale":"en_US","text":"{}"}}]}}"#,
        en_us
    )
}

/// Game fields spread over the first two groups plus chunks of every other
/// type that carry nothing of interest
pub fn civ7_game(turn: u32, age: &str, map: &str) -> Civ7Builder {
    Civ7Builder::new()
        .chunk(1, civ7_unknown(OTHER))
        .chunk(1, civ7_int(Civ7Field::GameTurn.marker(), turn))
        .chunk(2, civ7_string(Civ7Field::GameAge.marker(), age))
        .chunk(2, civ7_words(OTHER))
        .chunk(2, civ7_string(Civ7Field::MapName.marker(), &civ7_map_json(map)))
        .chunk(3, civ7_chunk_array(OTHER, &[civ7_int(OTHER, 1)]))
        .chunk(
            4,
            civ7_nested_array(OTHER, &[vec![civ7_int(OTHER, 2)], vec![]]),
        )
        .chunk(4, civ7_opaque(OTHER, b"opaque"))
        .chunk(5, civ7_int(Civ7Field::GameTurn.marker(), 9999))
}

pub fn civ7_duel() -> Vec<u8> {
    civ7_game(42, "AGE_ANTIQUITY", "Archipelago")
        .player(&Civ7Player {
            leader: Some("LEADER_AUGUSTUS"),
            civ: "CIVILIZATION_ROME",
            user_id: Some("Calcifer@76561198330293027"),
            team: Some(0),
        })
        .player(&Civ7Player {
            leader: Some("LEADER_HATSHEPSUT"),
            civ: "CIVILIZATION_EGYPT",
            user_id: None,
            team: Some(1),
        })
        .finish()
}

pub fn civ7_teamer() -> Vec<u8> {
    let mut builder = civ7_game(10, "AGE_EXPLORATION", "Continents");
    for (i, team) in [0, 0, 0, 1, 1, 1].into_iter().enumerate() {
        let user_id = format!("player{}@7656119800000000{}", i, i);
        builder = builder.player(&Civ7Player {
            leader: Some("LEADER_ADA_LOVELACE"),
            civ: "CIVILIZATION_GREECE",
            user_id: Some(user_id.as_str()),
            team: Some(team),
        });
    }
    builder.finish()
}
