use crate::{CivError, CivErrorKind};
use miniz_oxide::inflate::{
    core::{decompress, inflate_flags, DecompressorOxide},
    TINFLStatus,
};

/// Size of a compressed block before the next 4 byte size word
pub(crate) const BLOCK_SIZE: usize = 64 * 1024;
const SIZE_WORD: usize = 4;

/// Refuse to inflate beyond this many bytes
const MAX_INFLATED: usize = 512 * 1024 * 1024;

/// Concatenate the compressed blocks, dropping the size word that follows
/// each full block
pub(crate) fn join_blocks(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for block in data.chunks(BLOCK_SIZE + SIZE_WORD) {
        let len = block.len().min(BLOCK_SIZE);
        out.extend_from_slice(&block[..len]);
    }
    out
}

/// Inflate a zlib stream that was sync flushed and never finished. Input
/// running out at a flush boundary is the expected way for the stream to end.
pub(crate) fn inflate_sync_flushed(data: &[u8]) -> Result<Vec<u8>, CivError> {
    let flags = inflate_flags::TINFL_FLAG_PARSE_ZLIB_HEADER
        | inflate_flags::TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF
        | inflate_flags::TINFL_FLAG_HAS_MORE_INPUT;

    let mut decompressor = DecompressorOxide::new();
    let mut out = vec![0u8; (data.len() * 4).clamp(BLOCK_SIZE, MAX_INFLATED)];
    let mut in_pos = 0;
    let mut out_pos = 0;

    loop {
        let (status, consumed, written) =
            decompress(&mut decompressor, &data[in_pos..], &mut out, out_pos, flags);
        in_pos += consumed;
        out_pos += written;

        match status {
            TINFLStatus::Done => break,
            TINFLStatus::NeedsMoreInput if in_pos >= data.len() => break,
            TINFLStatus::HasMoreOutput => {
                if out.len() >= MAX_INFLATED {
                    return Err(CivError::from(CivErrorKind::Inflate {
                        msg: format!("inflated data exceeds {} bytes", MAX_INFLATED),
                    }));
                }

                let new_len = (out.len() * 2).min(MAX_INFLATED);
                out.resize(new_len, 0);
            }
            status => {
                return Err(CivError::from(CivErrorKind::Inflate {
                    msg: format!("{:?} at compressed offset {}", status, in_pos),
                }))
            }
        }
    }

    out.truncate(out_pos);
    Ok(out)
}
