use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// The game that produced a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Civ6,
    Civ7,
}

impl Game {
    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Civ6 => "civ6",
            Game::Civ7 => "civ7",
        }
    }
}

/// How the seated players are split into teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    Duel,
    Ffa,
    Team,

    /// At least one player has not been assigned a team
    #[default]
    Unclassified,
}

impl GameMode {
    /// Classify a match from its ordered team ids.
    ///
    /// `unassigned` is the format's "no team" sentinel, if it has one. Any
    /// player carrying it leaves the match unclassified.
    pub fn classify(teams: &[i32], unassigned: Option<i32>) -> GameMode {
        if let Some(sentinel) = unassigned {
            if teams.iter().any(|&x| x == sentinel) {
                return GameMode::Unclassified;
            }
        }

        if teams.len() == 2 {
            return GameMode::Duel;
        }

        let unique = teams.iter().collect::<HashSet<_>>();
        if unique.len() == teams.len() {
            GameMode::Ffa
        } else {
            GameMode::Team
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Duel => "duel",
            GameMode::Ffa => "ffa",
            GameMode::Team => "team",
            GameMode::Unclassified => "",
        }
    }
}

impl Serialize for GameMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A player's platform identity.
///
/// The two formats signal a missing identity differently and downstream
/// consumers rely on the distinction, so both sentinels are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SteamId {
    Id(String),

    /// Civ VI's missing identity, serialized as `-1`
    Unset,

    /// Civ VII's missing identity, serialized as `null`
    Null,
}

impl SteamId {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SteamId::Id(x) => Some(x.as_str()),
            _ => None,
        }
    }
}

impl Serialize for SteamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SteamId::Id(x) => serializer.serialize_str(x),
            SteamId::Unset => serializer.serialize_i64(-1),
            SteamId::Null => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    pub steam_id: SteamId,
    pub user_name: Option<String>,
    pub civ: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    pub team: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_alive: Option<bool>,
}

/// The match data extracted from a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub game: Game,
    pub turn: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    pub map_type: String,
    pub game_mode: GameMode,
    pub players: Vec<PlayerInfo>,
    pub parser_version: String,
}

impl MatchRecord {
    pub fn teams(&self) -> Vec<i32> {
        self.players.iter().map(|x| x.team).collect()
    }
}
