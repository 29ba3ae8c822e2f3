//! Marker tables for Civ VI saves

use crate::marker::Marker;

pub const MAGIC: [u8; 4] = *b"CIV6";

/// Closes the uncompressed section. It is also the size word of the first
/// compressed block.
pub const END_UNCOMPRESSED: Marker = Marker::new([0x00, 0x00, 0x01, 0x00]);

/// The zlib sync flush trailer that ends the compressed section
pub const COMPRESSED_DATA_END: [u8; 4] = [0x00, 0x00, 0xFF, 0xFF];

pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x9C];

/// Markers that open an actor, one per player slot
pub const SLOT_HEADERS: [Marker; 12] = [
    Marker::new([0xC8, 0x9B, 0x5F, 0x65]),
    Marker::new([0x5E, 0xAB, 0x58, 0x12]),
    Marker::new([0xE4, 0xFA, 0x51, 0x8B]),
    Marker::new([0x72, 0xCA, 0x56, 0xFC]),
    Marker::new([0xD1, 0x5F, 0x32, 0x62]),
    Marker::new([0x47, 0x6F, 0x35, 0x15]),
    Marker::new([0xFD, 0x3E, 0x3C, 0x8C]),
    Marker::new([0x6B, 0x0E, 0x3B, 0xFB]),
    Marker::new([0xFA, 0x13, 0x84, 0x6B]),
    Marker::new([0x6C, 0x23, 0x83, 0x1C]),
    Marker::new([0xF4, 0x14, 0x18, 0xAA]),
    Marker::new([0x62, 0x24, 0x1F, 0xDD]),
];

/// The player slot a slot header marker denotes
pub fn slot_index(marker: Marker) -> Option<usize> {
    SLOT_HEADERS.iter().position(|&x| x == marker)
}

/// Fields that describe the game as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameField {
    GameTurn,
    GameSpeed,
    ModBlock1,
    ModBlock2,
    ModBlock3,
    ModBlock4,
    ModId,
    ModTitle,
    MapFile,
    MapSize,
}

impl GameField {
    pub const ALL: [GameField; 10] = [
        GameField::GameTurn,
        GameField::GameSpeed,
        GameField::ModBlock1,
        GameField::ModBlock2,
        GameField::ModBlock3,
        GameField::ModBlock4,
        GameField::ModId,
        GameField::ModTitle,
        GameField::MapFile,
        GameField::MapSize,
    ];

    pub const fn marker(self) -> Marker {
        match self {
            GameField::GameTurn => Marker::new([0x9D, 0x2C, 0xE6, 0xBD]),
            GameField::GameSpeed => Marker::new([0x99, 0xB0, 0xD9, 0x05]),
            GameField::ModBlock1 => Marker::new([0x5C, 0xAE, 0x27, 0x84]),
            GameField::ModBlock2 => Marker::new([0xC8, 0xD1, 0x8C, 0x1B]),
            GameField::ModBlock3 => Marker::new([0x44, 0x7F, 0xD4, 0xFE]),
            GameField::ModBlock4 => Marker::new([0xBB, 0x5E, 0x30, 0x88]),
            GameField::ModId => Marker::new([0x54, 0x5F, 0xC4, 0x04]),
            GameField::ModTitle => Marker::new([0x72, 0xE1, 0x34, 0x30]),
            GameField::MapFile => Marker::new([0x5A, 0x87, 0xD8, 0x63]),
            GameField::MapSize => Marker::new([0x40, 0x5C, 0x83, 0x0B]),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            GameField::GameTurn => "GAME_TURN",
            GameField::GameSpeed => "GAME_SPEED",
            GameField::ModBlock1 => "MOD_BLOCK_1",
            GameField::ModBlock2 => "MOD_BLOCK_2",
            GameField::ModBlock3 => "MOD_BLOCK_3",
            GameField::ModBlock4 => "MOD_BLOCK_4",
            GameField::ModId => "MOD_ID",
            GameField::ModTitle => "MOD_TITLE",
            GameField::MapFile => "MAP_FILE",
            GameField::MapSize => "MAP_SIZE",
        }
    }

    pub fn from_marker(marker: Marker) -> Option<GameField> {
        GameField::ALL.iter().copied().find(|x| x.marker() == marker)
    }
}

/// Fields that describe a single actor (player slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActorField {
    ActorName,
    LeaderName,
    ActorType,
    PlayerName,
    PlayerPassword,
    PlayerAlive,
    IsCurrentTurn,

    /// 3 = human, 1 = AI, 2 = observer
    ActorAiHuman,
    ActorDescription,
    TeamId,

    /// `user_name@platform_id`
    UserId,
}

impl ActorField {
    pub const ALL: [ActorField; 11] = [
        ActorField::ActorName,
        ActorField::LeaderName,
        ActorField::ActorType,
        ActorField::PlayerName,
        ActorField::PlayerPassword,
        ActorField::PlayerAlive,
        ActorField::IsCurrentTurn,
        ActorField::ActorAiHuman,
        ActorField::ActorDescription,
        ActorField::TeamId,
        ActorField::UserId,
    ];

    pub const fn marker(self) -> Marker {
        match self {
            ActorField::ActorName => Marker::new([0x2F, 0x5C, 0x5E, 0x9D]),
            ActorField::LeaderName => Marker::new([0x5F, 0x5E, 0xCD, 0xE8]),
            ActorField::ActorType => Marker::new([0xBE, 0xAB, 0x55, 0xCA]),
            ActorField::PlayerName => Marker::new([0xFD, 0x6B, 0xB9, 0xDA]),
            ActorField::PlayerPassword => Marker::new([0x6C, 0xD1, 0x7C, 0x6E]),
            ActorField::PlayerAlive => Marker::new([0xA6, 0xDF, 0xA7, 0x62]),
            ActorField::IsCurrentTurn => Marker::new([0xCB, 0x21, 0xB0, 0x7A]),
            ActorField::ActorAiHuman => Marker::new([0x95, 0xB9, 0x42, 0xCE]),
            ActorField::ActorDescription => Marker::new([0x65, 0x19, 0x9B, 0xFF]),
            ActorField::TeamId => Marker::new([0x0D, 0x3A, 0x9A, 0x46]),
            ActorField::UserId => Marker::new([0x3E, 0x8D, 0x12, 0xB1]),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ActorField::ActorName => "ACTOR_NAME",
            ActorField::LeaderName => "LEADER_NAME",
            ActorField::ActorType => "ACTOR_TYPE",
            ActorField::PlayerName => "PLAYER_NAME",
            ActorField::PlayerPassword => "PLAYER_PASSWORD",
            ActorField::PlayerAlive => "PLAYER_ALIVE",
            ActorField::IsCurrentTurn => "IS_CURRENT_TURN",
            ActorField::ActorAiHuman => "ACTOR_AI_HUMAN",
            ActorField::ActorDescription => "ACTOR_DESCRIPTION",
            ActorField::TeamId => "TEAM_ID",
            ActorField::UserId => "USER_ID",
        }
    }

    pub fn from_marker(marker: Marker) -> Option<ActorField> {
        ActorField::ALL.iter().copied().find(|x| x.marker() == marker)
    }
}
