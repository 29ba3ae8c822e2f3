use crate::models::{Game, GameMode, SteamId};

/// Conventions that differ between the two save formats when turning decoded
/// chunks into a match record.
pub(crate) trait SaveFlavor {
    fn game(&self) -> Game;

    /// The team id that denotes "not on a team", if the format has one
    fn unassigned_team(&self) -> Option<i32>;

    /// Identity reported for a player without a user id field
    fn missing_identity(&self) -> (SteamId, Option<String>);

    fn identity(&self, raw: Option<&str>) -> (SteamId, Option<String>) {
        match raw {
            Some(raw) => {
                let (user_name, steam_id) = split_identity(raw);
                (
                    SteamId::Id(String::from(steam_id)),
                    Some(String::from(user_name)),
                )
            }
            None => self.missing_identity(),
        }
    }

    fn game_mode(&self, teams: &[i32]) -> GameMode {
        GameMode::classify(teams, self.unassigned_team())
    }
}

/// Split a `user@id` string into its user name and platform id. The user
/// name is everything before the first `@` and the id everything after the
/// last, so a value without an `@` is reported as both.
pub(crate) fn split_identity(raw: &str) -> (&str, &str) {
    let user_name = raw.split('@').next().unwrap_or(raw);
    let steam_id = raw.rsplit('@').next().unwrap_or(raw);
    (user_name, steam_id)
}

/// Civ VI
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Civ6Flavor;

impl SaveFlavor for Civ6Flavor {
    fn game(&self) -> Game {
        Game::Civ6
    }

    fn unassigned_team(&self) -> Option<i32> {
        None
    }

    fn missing_identity(&self) -> (SteamId, Option<String>) {
        (SteamId::Unset, Some(String::new()))
    }
}

/// Civ VII
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Civ7Flavor;

impl Civ7Flavor {
    pub(crate) const UNASSIGNED_TEAM: i32 = -1;
}

impl SaveFlavor for Civ7Flavor {
    fn game(&self) -> Game {
        Game::Civ7
    }

    fn unassigned_team(&self) -> Option<i32> {
        Some(Self::UNASSIGNED_TEAM)
    }

    fn missing_identity(&self) -> (SteamId, Option<String>) {
        (SteamId::Null, None)
    }
}
