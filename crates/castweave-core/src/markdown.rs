//! Markdown story files.
//!
//! Stories often arrive as markdown with chapter headings, frontmatter and
//! the odd code or table block. [`to_prose`] uses pulldown-cmark to reduce
//! such a file to the narrative text alone, keeping paragraph breaks so
//! sentence segmentation still sees them.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Reduce markdown to plain narrative prose.
///
/// Dropped: YAML frontmatter, code blocks and inline code, headings, raw
/// HTML, tables, and image alt text. Kept: paragraph, list item and
/// blockquote text, link text, and emphasised text without its markers.
/// Each block ends with a blank line.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn to_prose(text: &str) -> String {
    let text = strip_frontmatter(text);
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;

    let mut prose = String::with_capacity(text.len());
    let mut skip_depth: usize = 0;

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(
                Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::Table(_) | Tag::Image { .. },
            ) => skip_depth += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::Table | TagEnd::Image) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            Event::Text(t) if skip_depth == 0 => prose.push_str(&t),
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => prose.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if skip_depth == 0 => {
                end_block(&mut prose);
            }
            _ => {}
        }
    }

    prose.truncate(prose.trim_end().len());
    prose
}

fn end_block(prose: &mut String) {
    let trimmed = prose.trim_end().len();
    prose.truncate(trimmed);
    if !prose.is_empty() {
        prose.push_str("\n\n");
    }
}

/// The text after a leading `---` frontmatter block, if any.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close) = after_opening.find("\n---") else {
        return text;
    };
    let remainder = &after_opening[close + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}
