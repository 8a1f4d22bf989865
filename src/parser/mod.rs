pub mod page;
pub mod reps;
pub mod workout;

use anyhow::Result;

use page::ContentBlock;
use workout::Workout;

/// Two-pass pipeline: HTML → content blocks → (title, workout).
pub fn parse_workout(html: &str) -> Result<(String, Workout)> {
    let blocks = page::content_blocks(html)?;
    let block = page::workout_block(&blocks)?;
    let title = page::workout_title(block)?;
    Ok((title, workout::extract(&block.fragments)))
}

/// The weekly split definition block, for the `split` subcommand.
pub fn parse_split(html: &str) -> Result<ContentBlock> {
    let blocks = page::content_blocks(html)?;
    page::split_block(&blocks).map(Clone::clone)
}
