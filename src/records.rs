// src/records.rs

use tracing::warn;

use crate::numfmt;

/// Lines per data block in the source layout.
pub const BLOCK_LINES: usize = 3;

/// One row of the final output, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    /// Kept as text to preserve leading zeros.
    pub code: String,
    pub role: String,
    pub value: f64,
    /// Share of the batch total, set by the distribution step.
    pub percent: Option<f64>,
    /// Slice of the target amount, set by the distribution step.
    pub proportional: Option<f64>,
}

/// Group cleaned lines into 3-line blocks and parse each one.
/// Malformed blocks are skipped with a warning; a trailing partial
/// block is discarded.
pub fn parse_blocks(lines: &[String]) -> Vec<Record> {
    let whole = lines.len() - lines.len() % BLOCK_LINES;
    if whole < lines.len() {
        warn!(
            leftover = lines.len() - whole,
            "discarding trailing partial block"
        );
    }

    let mut records = Vec::with_capacity(whole / BLOCK_LINES);
    for (index, block) in lines[..whole].chunks(BLOCK_LINES).enumerate() {
        match parse_block(block) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(block = index, reason, first_line = %block[0], "skipping block");
            }
        }
    }
    records
}

/// Field layout within a block:
/// line 1 holds the name, the code (rightmost all-digit token), and
/// optionally the start of the role; line 2 continues the role verbatim
/// (a leading category code like "0001 - COOPERADOS" stays in it);
/// the last token of line 3 is the value.
fn parse_block(block: &[String]) -> Result<Record, &'static str> {
    let tokens: Vec<&str> = block[0].split_whitespace().collect();

    let code_index = tokens
        .iter()
        .rposition(|t| t.chars().all(|c| c.is_ascii_digit()))
        .ok_or("no numeric code token on the first line")?;
    let code = tokens[code_index];
    if code.parse::<u64>().is_err() {
        return Err("code does not parse as an integer");
    }

    let name = tokens[..code_index].join(" ");
    if name.is_empty() {
        return Err("empty name");
    }

    let mut role_tokens: Vec<&str> = tokens[code_index + 1..].to_vec();
    role_tokens.extend(block[1].split_whitespace());
    let role = role_tokens.join(" ");

    let value_token = block[2]
        .split_whitespace()
        .next_back()
        .ok_or("empty value line")?;
    let value = numfmt::parse(value_token).map_err(|_| "value does not parse as a number")?;

    Ok(Record {
        name,
        code: code.to_string(),
        role,
        value,
        percent: None,
        proportional: None,
    })
}
