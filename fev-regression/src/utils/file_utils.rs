//! File system helpers.

use anyhow::Context;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::StdResult;

/// Read the first `number_of_lines` lines of a file, without reading the rest of it.
///
/// Lines end on `\n`, `\r\n`, a lone `\r` or one of the ASCII vertical separators
/// (`\x0b`, `\x0c`, `\x1c` to `\x1e`). The returned lines are joined with `\n`.
/// Bytes that are not valid UTF-8 are dropped rather than failing the read, circuit files are
/// free to carry any encoding in their comments.
pub async fn read_head_lines(file_path: &Path, number_of_lines: usize) -> StdResult<String> {
    let file = tokio::fs::File::open(file_path)
        .await
        .with_context(|| format!("Failed to open file `{}`", file_path.display()))?;
    let mut reader = BufReader::new(file);
    let mut lines: Vec<String> = vec![];
    let mut current_line: Vec<u8> = vec![];
    let mut after_carriage_return = false;

    while lines.len() < number_of_lines {
        let buffer = reader
            .fill_buf()
            .await
            .with_context(|| format!("Failed to read file `{}`", file_path.display()))?;
        if buffer.is_empty() {
            if !current_line.is_empty() {
                lines.push(decode_dropping_invalid(&current_line));
            }
            break;
        }

        let mut consumed = 0;
        for &byte in buffer {
            consumed += 1;
            if after_carriage_return {
                after_carriage_return = false;
                if byte == b'\n' {
                    continue;
                }
            }
            if is_line_separator(byte) {
                lines.push(decode_dropping_invalid(&current_line));
                current_line.clear();
                after_carriage_return = byte == b'\r';
                if lines.len() == number_of_lines {
                    break;
                }
            } else {
                current_line.push(byte);
            }
        }
        reader.consume(consumed);
    }

    Ok(lines.join("\n"))
}

fn is_line_separator(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | 0x0b | 0x0c | 0x1c..=0x1e)
}

fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Move a file, falling back to copy then delete when a rename is not possible (ie: the
/// target is on another file system).
pub async fn move_file(source: &Path, target: &Path) -> StdResult<()> {
    if tokio::fs::rename(source, target).await.is_ok() {
        return Ok(());
    }

    tokio::fs::copy(source, target).await.with_context(|| {
        format!(
            "Failed to copy `{}` to `{}`",
            source.display(),
            target.display()
        )
    })?;
    tokio::fs::remove_file(source)
        .await
        .with_context(|| format!("Failed to remove `{}` after copy", source.display()))?;

    Ok(())
}
