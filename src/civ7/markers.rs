//! Marker tables for Civ VII saves

use crate::marker::Marker;

pub const MAGIC: [u8; 4] = *b"CIV7";

/// Bytes before the first group: magic, revision, group 1 count, reserved
pub const HEADER_LEN: usize = 16;

pub const GROUP_COUNT: usize = 5;

/// Distance back from the end of the previous group (or the header) to a
/// group's chunk count. A zero lookback means the count immediately follows
/// the previous group instead of being embedded in its trailing bytes.
pub const GROUP_COUNT_LOOKBACK: [usize; GROUP_COUNT] = [8, 4, 8, 16, 0];

/// The group holding one chunk array per player
pub const PLAYER_GROUP: usize = 3;

/// Fields of a player entry in the player group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerField {
    LeaderName,
    CivName,

    /// `user_name@platform_id`
    UserId,
    TeamId,
}

impl PlayerField {
    pub const ALL: [PlayerField; 4] = [
        PlayerField::LeaderName,
        PlayerField::CivName,
        PlayerField::UserId,
        PlayerField::TeamId,
    ];

    pub const fn marker(self) -> Marker {
        match self {
            PlayerField::LeaderName => Marker::new([0x61, 0xE3, 0x0B, 0x3A]),
            PlayerField::CivName => Marker::new([0x2B, 0x6D, 0x7F, 0xC1]),
            PlayerField::UserId => Marker::new([0x9E, 0x52, 0xA4, 0x17]),
            PlayerField::TeamId => Marker::new([0xD4, 0x1C, 0x60, 0xE8]),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PlayerField::LeaderName => "LEADER_NAME",
            PlayerField::CivName => "CIV_NAME",
            PlayerField::UserId => "USER_ID",
            PlayerField::TeamId => "TEAM_ID",
        }
    }

    pub fn from_marker(marker: Marker) -> Option<PlayerField> {
        PlayerField::ALL.iter().copied().find(|x| x.marker() == marker)
    }
}

/// Fields that describe the game as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameField {
    GameTurn,
    GameAge,

    /// JSON localization table of the map script name
    MapName,
}

impl GameField {
    pub const ALL: [GameField; 3] = [GameField::GameTurn, GameField::GameAge, GameField::MapName];

    pub const fn marker(self) -> Marker {
        match self {
            GameField::GameTurn => Marker::new([0x8A, 0x5F, 0x03, 0xD2]),
            GameField::GameAge => Marker::new([0x35, 0xC7, 0xB9, 0x71]),
            GameField::MapName => Marker::new([0x47, 0x0E, 0x26, 0x9B]),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            GameField::GameTurn => "GAME_TURN",
            GameField::GameAge => "GAME_AGE",
            GameField::MapName => "MAP_NAME",
        }
    }

    pub fn from_marker(marker: Marker) -> Option<GameField> {
        GameField::ALL.iter().copied().find(|x| x.marker() == marker)
    }
}
