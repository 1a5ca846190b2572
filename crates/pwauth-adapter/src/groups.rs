//! Parsing of `groups <user>` output.

use pwauth_core::{Error, Result};

/// Parses `user : group1 group2 ...` into the group names.
///
/// The line is split on the first `:` and the remainder on whitespace, so runs of spaces
/// or tabs between names are tolerated. Output without a colon, or with nothing after it,
/// is rejected rather than returned as a partial list.
///
/// # Errors
///
/// Returns [`Error::ParseError`] when the output does not have the expected shape.
pub fn parse_group_listing(output: &str) -> Result<Vec<String>> {
    let line = output.trim();
    let (_, groups) = line
        .split_once(':')
        .ok_or_else(|| Error::ParseError(format!("unexpected group listing `{line}`")))?;

    let groups: Vec<String> = groups.split_whitespace().map(str::to_owned).collect();
    if groups.is_empty() {
        return Err(Error::ParseError(format!(
            "group listing `{line}` names no groups"
        )));
    }
    Ok(groups)
}
