/*!
# Civ Save

Civ Save is a library to extract match data from Civilization VI and
Civilization VII multiplayer saves: the turn, the map, how players are split
into teams, and each player's civilization and platform identity.

```rust,no_run
use civsave::{CivExtractor, GameMode, SaveFormat};

let data = std::fs::read("assets/saves/teamer.Civ6Save")?;
let (record, format) = CivExtractor::builder()
    .with_parser_version("1.0.0")
    .extract(&data)?;

assert_eq!(format, SaveFormat::Civ6);
assert_eq!(record.game_mode, GameMode::Team);
println!("{}", serde_json::to_string_pretty(&record)?);
# Ok::<(), Box<dyn std::error::Error>>(())
```

Neither format is documented. Saves are decoded chunk by chunk using marker
tables of known fields, and anything that isn't needed for the match record
is stepped over rather than understood. The lower level [`civ6`] and
[`civ7`] modules expose the decoded chunks for those who want to dig
further.

## Parser version

Every record is stamped with a parser version so that records produced by
different releases can be told apart. Unless set on the builder it is read
from the `CIV_SAVE_PARSER_VERSION` environment variable and defaults to
`dev`.
*/

pub mod civ6;
pub mod civ7;
mod cursor;
mod errors;
mod extraction;
pub(crate) mod flavor;
#[cfg(feature = "miniz")]
mod inflate;
pub mod localization;
mod marker;
pub mod models;

pub use cursor::*;
pub use errors::*;
pub use extraction::*;
pub use marker::Marker;
pub use models::{Game, GameMode, MatchRecord, PlayerInfo, SteamId};
