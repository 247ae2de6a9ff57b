//! In-place edits of remote text files.

use crate::error::DeployResult;
use crate::quote::{escape_regex, shell_quote};
use crate::shell::Shell;

/// Whether `file` has a line exactly equal to `text`.
pub fn contains(shell: &Shell<'_>, file: &str, text: &str, use_sudo: bool) -> DeployResult<bool> {
    let pattern = format!("^{}$", escape_regex(text));
    let command = format!("grep -E -q -- {} {}", shell_quote(&pattern), shell_quote(file));
    let tolerant = shell.warn_only();
    let output = if use_sudo {
        tolerant.sudo(&command)?
    } else {
        tolerant.run(&command)?
    };
    Ok(output.succeeded())
}

/// Append each of `lines` to `file` unless an identical line is
/// already there. Returns the lines that were added.
pub fn append(
    shell: &Shell<'_>,
    file: &str,
    lines: &[&str],
    use_sudo: bool,
) -> DeployResult<Vec<String>> {
    let mut added = Vec::new();
    for line in lines {
        if contains(shell, file, line, use_sudo)? {
            continue;
        }
        let command = format!("echo {} >> {}", shell_quote(line), shell_quote(file));
        if use_sudo {
            shell.sudo(&command)?;
        } else {
            shell.run(&command)?;
        }
        added.push((*line).to_string());
    }
    Ok(added)
}

/// Prefix every line of `file` matching `regex` with `marker`.
///
/// A leading `^` or trailing `$` in `regex` anchors the match;
/// without them the marker goes in front of the matched text
/// wherever it occurs. A `.bak` copy of the original is left next
/// to the file.
pub fn comment(
    shell: &Shell<'_>,
    file: &str,
    regex: &str,
    marker: char,
    use_sudo: bool,
) -> DeployResult<()> {
    let command = comment_command(file, regex, marker);
    if use_sudo {
        shell.sudo(&command)?;
    } else {
        shell.run(&command)?;
    }
    Ok(())
}

/// `sed` invocation used by [`comment`].
#[must_use]
pub fn comment_command(file: &str, regex: &str, marker: char) -> String {
    let (start, body) = regex
        .strip_prefix('^')
        .map_or(("", regex), |rest| ("^", rest));
    let (body, end) = match body.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => (rest, "$"),
        _ => (body, ""),
    };
    let body = body.replace('/', r"\/");
    let marker = match marker {
        '/' | '\\' | '&' => format!("\\{marker}"),
        other => other.to_string(),
    };
    let expression = format!(r"s/{start}({body}){end}/{marker}\1/g");
    format!("sed -i.bak -r -e {} {}", shell_quote(&expression), shell_quote(file))
}
