use super::{
    chunk::{decode_groups, Chunk, Groups},
    markers::{GameField, PlayerField, MAGIC, PLAYER_GROUP},
};
use crate::{
    errors::Magic,
    flavor::{Civ7Flavor, SaveFlavor},
    localization::MapLocalization,
    models::{MatchRecord, PlayerInfo},
    CivError, CivErrorKind,
};

/// A player entry of the player group
#[derive(Debug, Clone, Copy)]
pub struct Civ7Player<'a> {
    entry: &'a Chunk,
}

impl<'a> Civ7Player<'a> {
    /// The chunk array this player was read from
    pub fn entry(&self) -> &'a Chunk {
        self.entry
    }

    pub fn get(&self, field: PlayerField) -> Option<&'a Chunk> {
        self.entry
            .value
            .as_chunks()
            .and_then(|x| x.iter().find(|c| c.marker == field.marker()))
    }

    fn text(&self, field: PlayerField) -> Result<Option<&'a str>, CivError> {
        self.get(field).map(|x| x.str()).transpose()
    }

    pub fn civ(&self) -> Result<&'a str, CivError> {
        self.text(PlayerField::CivName)?
            .ok_or_else(|| CivError::missing(PlayerField::CivName.name()))
    }

    pub fn leader(&self) -> Result<Option<&'a str>, CivError> {
        self.text(PlayerField::LeaderName)
    }

    pub fn user_id(&self) -> Result<Option<&'a str>, CivError> {
        self.text(PlayerField::UserId)
    }

    /// The player's team. Players without a team id are unassigned.
    pub fn team(&self) -> Result<i32, CivError> {
        match self.get(PlayerField::TeamId) {
            Some(chunk) => {
                // the unassigned sentinel is stored as its two's complement word
                let word = chunk.int()?;
                match i32::from_ne_bytes(word.to_ne_bytes()) {
                    team if team >= Civ7Flavor::UNASSIGNED_TEAM => Ok(team),
                    _ => Err(CivError::from(CivErrorKind::InvalidTeam {
                        marker: chunk.marker,
                        team: word,
                    })),
                }
            }
            None => Ok(Civ7Flavor::UNASSIGNED_TEAM),
        }
    }
}

/// A decoded Civ VII save
#[derive(Debug, Clone)]
pub struct Civ7Save {
    groups: Groups,
}

impl Civ7Save {
    pub fn parse(data: &[u8]) -> Result<Self, CivError> {
        if !data.starts_with(&MAGIC) {
            let mut magic = [0u8; 4];
            let len = data.len().min(4);
            magic[..len].copy_from_slice(&data[..len]);
            return Err(CivError::from(CivErrorKind::UnrecognizedFormat {
                magic: Magic(magic),
            }));
        }

        let groups = decode_groups(data)?;
        tracing::debug!(
            chunks = groups.iter().map(|x| x.len()).sum::<usize>(),
            "decoded civ7 save"
        );

        Ok(Civ7Save { groups })
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// The chunks of a group, numbered from 1 to 5
    pub fn group(&self, number: usize) -> Option<&[Chunk]> {
        number
            .checked_sub(1)
            .and_then(|x| self.groups.get(x))
            .map(|x| x.as_slice())
    }

    /// Chunk arrays of the player group that describe a civilization
    pub fn players(&self) -> impl Iterator<Item = Civ7Player<'_>> + '_ {
        self.group(PLAYER_GROUP)
            .unwrap_or_default()
            .iter()
            .map(|entry| Civ7Player { entry })
            .filter(|x| x.get(PlayerField::CivName).is_some())
    }

    /// First top level chunk across all groups carrying the field's marker
    pub fn game_field(&self, field: GameField) -> Option<&Chunk> {
        let marker = field.marker();
        self.groups
            .iter()
            .flat_map(|x| x.iter())
            .find(|x| x.marker == marker)
    }

    /// Assemble the match record
    pub fn match_record(&self, parser_version: &str) -> Result<MatchRecord, CivError> {
        let flavor = Civ7Flavor;

        let turn = self
            .game_field(GameField::GameTurn)
            .ok_or_else(|| CivError::missing(GameField::GameTurn.name()))?
            .int()?;

        let age = self
            .game_field(GameField::GameAge)
            .map(|x| x.str().map(String::from))
            .transpose()?;

        let map_json = self
            .game_field(GameField::MapName)
            .ok_or_else(|| CivError::missing(GameField::MapName.name()))?
            .str()?;

        let map_type = MapLocalization::parse(map_json)?
            .map_name()
            .map(String::from)
            .ok_or_else(|| CivError::missing(GameField::MapName.name()))?;

        let players = self
            .players()
            .map(|player| -> Result<PlayerInfo, CivError> {
                let (steam_id, user_name) = flavor.identity(player.user_id()?);
                Ok(PlayerInfo {
                    steam_id,
                    user_name,
                    civ: String::from(player.civ()?),
                    leader: player.leader()?.map(String::from),
                    team: player.team()?,
                    player_alive: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let teams = players.iter().map(|x| x.team).collect::<Vec<_>>();

        Ok(MatchRecord {
            game: flavor.game(),
            turn,
            age,
            map_type,
            game_mode: flavor.game_mode(&teams),
            players,
            parser_version: String::from(parser_version),
        })
    }
}
