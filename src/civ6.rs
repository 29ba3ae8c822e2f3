/*!
Civ VI saves begin with the ASCII bytes `CIV6` followed by a header region of
no fixed size. Structured data starts at the first occurrence of the game
speed marker and from there the file is a flat stream of chunks:

 - a 4 byte marker identifying what the chunk is
 - a 4 byte little endian type code
 - a payload whose framing depends on the type code

The stream ends at the `00 00 01 00` word that introduces the zlib
compressed section. Nothing needed for a match record lives in the
compressed section.

There is no schema: the marker tables in [`markers`] and the type codes in
[`ChunkType`] are everything that is known about the format. Chunks with an
unknown type code are assumed to be misaligned and decoding is retried one
byte further along.

Player data is spread across "actors". An actor opens at one of twelve slot
header markers, accumulates the per-actor fields that follow it, and closes
at the actor description marker. Once the stream is exhausted the actors
that describe a seated, full civilization are promoted to civs.
*/

mod chunk;
pub mod markers;
mod save;

pub use chunk::*;
pub use save::*;
