//! Walks the page HTML and pulls out the text fragments the extractor works
//! on. The page is fixed-format Squarespace markup: content lives in
//! `div.sqs-block-content` blocks, each with an optional `<h1>` heading and
//! `<p>` bodies whose children are inline tags, text nodes and `<br/>` breaks.

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const CONTENT_CLASS: &str = "sqs-block-content";

// Fixed page layout: the daily workout is the second content block, the
// weekly split definition the ninth.
const WORKOUT_BLOCK_INDEX: usize = 1;
const SPLIT_BLOCK_INDEX: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct ContentBlock {
    pub heading: Option<String>,
    /// Ordered child fragments of the block's `<p>` bodies: inline-tag text
    /// with newlines stripped, raw text nodes, and "" for each `<br/>`.
    pub fragments: Vec<String>,
}

pub fn workout_block(blocks: &[ContentBlock]) -> Result<&ContentBlock> {
    blocks
        .get(WORKOUT_BLOCK_INDEX)
        .context("Page layout changed: workout block not found")
}

pub fn split_block(blocks: &[ContentBlock]) -> Result<&ContentBlock> {
    blocks
        .get(SPLIT_BLOCK_INDEX)
        .context("Page layout changed: split definition block not found")
}

/// Workout title: the block heading, uppercased.
pub fn workout_title(block: &ContentBlock) -> Result<String> {
    let heading = block
        .heading
        .as_deref()
        .context("Workout block has no heading")?;
    Ok(heading.replace('\n', " ").trim().to_uppercase())
}

/// First day of the split: the text right after the first line break in the
/// split definition block, uppercased.
pub fn first_split_day(block: &ContentBlock) -> Option<String> {
    let brk = block.fragments.iter().position(|f| f.is_empty())?;
    block.fragments[brk + 1..]
        .iter()
        .find(|f| !f.trim().is_empty())
        .map(|f| f.trim().to_uppercase())
}

/// Parse all `div.sqs-block-content` blocks in document order.
pub fn content_blocks(html: &str) -> Result<Vec<ContentBlock>> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut blocks: Vec<ContentBlock> = Vec::new();
    let mut current: Option<ContentBlock> = None;
    let mut div_depth = 0usize;
    let mut in_heading = false;
    let mut heading = String::new();
    let mut in_body = false;
    let mut inline_depth = 0usize;
    let mut inline = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"div" => {
                    if current.is_some() {
                        div_depth += 1;
                    } else if has_content_class(&e)? {
                        current = Some(ContentBlock::default());
                        div_depth = 1;
                    }
                }
                b"h1" if current.is_some() => {
                    in_heading = true;
                    heading.clear();
                }
                b"p" if current.is_some() => {
                    in_body = true;
                    inline_depth = 0;
                }
                _ if in_body => {
                    if inline_depth == 0 {
                        inline.clear();
                    }
                    inline_depth += 1;
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"div" if current.is_some() => {
                    div_depth -= 1;
                    if div_depth == 0 {
                        blocks.push(current.take().unwrap_or_default());
                        // unclosed <p>/<h1> must not leak into the next block
                        in_body = false;
                        in_heading = false;
                        inline_depth = 0;
                    }
                }
                b"h1" => {
                    if in_heading {
                        if let Some(block) = current.as_mut() {
                            block.heading = Some(heading.clone());
                        }
                        in_heading = false;
                    }
                }
                b"p" => in_body = false,
                _ if in_body && inline_depth > 0 => {
                    inline_depth -= 1;
                    if inline_depth == 0 {
                        if let Some(block) = current.as_mut() {
                            block.fragments.push(inline.replace('\n', ""));
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(_)) if in_body && inline_depth == 0 => {
                // <br/> and friends at paragraph level mark a line break
                if let Some(block) = current.as_mut() {
                    block.fragments.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                let text = match e.unescape() {
                    Ok(t) => t.into_owned(),
                    // Unknown HTML entities are kept raw
                    Err(_) => String::from_utf8_lossy(&e).into_owned(),
                };
                if in_heading {
                    heading.push_str(&text);
                } else if in_body {
                    if inline_depth > 0 {
                        inline.push_str(&text);
                    } else {
                        let stripped = text.replace('\n', "");
                        if !stripped.trim().is_empty() {
                            if let Some(block) = current.as_mut() {
                                block.fragments.push(stripped);
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e).context("Failed to parse page HTML"),
            _ => {}
        }
    }

    Ok(blocks)
}

fn has_content_class(e: &BytesStart) -> Result<bool> {
    let Some(attr) = e.try_get_attribute("class")? else {
        return Ok(false);
    };
    Ok(attr.unescape_value()?.split_whitespace().any(|c| c == CONTENT_CLASS))
}
