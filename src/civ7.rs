/*!
Civ VII saves begin with the ASCII bytes `CIV7` and a 16 byte header,
followed by five groups of chunks. Unlike Civ VI, every chunk describes its
own length, so the file is walked chunk by chunk without any scanning:

 - a 4 byte marker
 - a 4 byte little endian type code
 - 4 reserved bytes
 - a payload whose framing depends on the type code

A group does not start with its chunk count. Instead the count is stored a
fixed distance back from where the previous group ended (see
[`markers::GROUP_COUNT_LOOKBACK`]). An unrecognized type code means the
walk can't continue and the save is rejected.

The third group holds one chunk array per player.
*/

mod chunk;
pub mod markers;
mod save;

pub use chunk::*;
pub use save::*;
