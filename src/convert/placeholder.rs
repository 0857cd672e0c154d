// src/convert/placeholder.rs

//! Line-oriented placeholder transforms
//!
//! Recipes carry `$MARKER` placeholders (`$AGP_VERSION`, `$KOTLIN_VERSION`,
//! ...). Two families of transforms operate on them:
//!
//! - wrap/unwrap: the working copy keeps the original line in a commented
//!   sentinel block next to the substituted line, so it can be restored:
//!
//!   ```text
//!   //  >>> WORKING_COPY >>>
//!   //  id 'com.android.application' version $AGP_VERSION apply false
//!   id 'com.android.application' version "8.1.0" apply false
//!   //  <<< WORKING_COPY <<<
//!   ```
//!
//! - replace: release output substitutes the marker and forgets it.
//!
//! All functions are pure and keep line order.

/// Opening sentinel of a working-copy block (after the comment prefix)
pub const START_WORKING_COPY_BLOCK: &str = ">>> WORKING_COPY >>>";

/// Closing sentinel of a working-copy block (after the comment prefix)
pub const END_WORKING_COPY_BLOCK: &str = "<<< WORKING_COPY <<<";

/// Comment syntax of the file being transformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `build.gradle[.kts]`, `settings.gradle[.kts]`
    Gradle,
    /// `gradle-wrapper.properties` and TOML version catalogs
    Properties,
}

impl CommentStyle {
    pub fn prefix(self) -> &'static str {
        match self {
            CommentStyle::Gradle => "//  ",
            CommentStyle::Properties => "#  ",
        }
    }

    fn start_line(self) -> String {
        format!("{}{}", self.prefix(), START_WORKING_COPY_BLOCK)
    }

    fn end_line(self) -> String {
        format!("{}{}", self.prefix(), END_WORKING_COPY_BLOCK)
    }
}

/// Wrap every line containing `marker` in a working-copy block, with the
/// marker replaced by `value` (the substituted line is omitted when `value`
/// is empty)
///
/// Lines already inside a block are not wrapped again: the generated lines
/// of the block have `marker` substituted in place, which lets several
/// markers on one line be wrapped in sequence.
pub fn wrap_inline(lines: &[String], marker: &str, value: &str, style: CommentStyle) -> Vec<String> {
    let replacement: Vec<String> = if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    };
    wrap_with(lines, marker, style, |line| {
        replacement
            .iter()
            .map(|value| line.replace(marker, value))
            .collect()
    })
}

/// Wrap every line containing `marker` in a working-copy block, with the
/// line replaced by `values`, one per line
pub fn wrap_list(lines: &[String], marker: &str, values: &[String], style: CommentStyle) -> Vec<String> {
    wrap_with(lines, marker, style, |_| values.to_vec())
}

/// Position of a line relative to working-copy blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Outside,
    /// Right after the opening sentinel: the commented original
    Original,
    /// Generated lines, up to the closing sentinel
    Generated,
}

fn wrap_with<F>(lines: &[String], marker: &str, style: CommentStyle, generate: F) -> Vec<String>
where
    F: Fn(&str) -> Vec<String>,
{
    let prefix = style.prefix();
    let start = style.start_line();
    let end = style.end_line();

    let mut result = Vec::with_capacity(lines.len());
    let mut block = Block::Outside;

    for line in lines {
        match block {
            Block::Original => {
                block = Block::Generated;
                result.push(line.clone());
            }
            Block::Generated if *line == end => {
                block = Block::Outside;
                result.push(line.clone());
            }
            Block::Generated if line.contains(marker) => result.extend(generate(line)),
            Block::Generated => result.push(line.clone()),
            Block::Outside if *line == start => {
                block = Block::Original;
                result.push(line.clone());
            }
            Block::Outside if line.contains(marker) => {
                result.push(start.clone());
                result.push(format!("{prefix}{line}"));
                result.extend(generate(line));
                result.push(end.clone());
            }
            Block::Outside => result.push(line.clone()),
        }
    }

    result
}

/// Remove working-copy blocks, restoring the commented original lines
///
/// The first line of a block is the original with the comment prefix
/// added; it is restored and the generated lines up to the closing
/// sentinel are dropped. Lines outside blocks pass through.
pub fn unwrap(lines: &[String], style: CommentStyle) -> Vec<String> {
    let prefix = style.prefix();
    let start = style.start_line();
    let end = style.end_line();

    let mut result = Vec::with_capacity(lines.len());
    let mut block = Block::Outside;

    for line in lines {
        match block {
            Block::Outside if *line == start => block = Block::Original,
            Block::Outside => result.push(line.clone()),
            _ if *line == end => block = Block::Outside,
            Block::Original => {
                result.push(line.strip_prefix(prefix).unwrap_or(line).to_string());
                block = Block::Generated;
            }
            Block::Generated => {}
        }
    }

    result
}

/// Replace `marker` in matching lines with `value`; matching lines are
/// dropped when `value` is empty
pub fn replace_inline(lines: &[String], marker: &str, value: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            if !line.contains(marker) {
                Some(line.clone())
            } else if value.is_empty() {
                None
            } else {
                Some(line.replace(marker, value))
            }
        })
        .collect()
}

/// Replace each line containing `marker` with `value` as a whole line
/// (removed when `value` is empty)
pub fn replace_with_line(lines: &[String], marker: &str, value: &str) -> Vec<String> {
    if value.is_empty() {
        replace_with_list(lines, marker, &[])
    } else {
        replace_with_list(lines, marker, &[value.to_string()])
    }
}

/// Replace each line containing `marker` with `values`, one per line
pub fn replace_with_list(lines: &[String], marker: &str, values: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        if line.contains(marker) {
            result.extend(values.iter().cloned());
        } else {
            result.push(line.clone());
        }
    }
    result
}
