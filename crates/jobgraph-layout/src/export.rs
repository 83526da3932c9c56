//! Plain-text renderings of a job list.

use jobgraph_core::Job;
use std::collections::BTreeSet;
use std::fmt::Write as _;

const MERMAID_COMMAND_CHARS: usize = 50;
const LISTING_COMMAND_CHARS: usize = 30;

fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((at, _)) => (&text[..at], true),
        None => (text, false),
    }
}

/// Fenced Mermaid `stateDiagram-v2` block: one state per job and one transition per
/// dependency on a listed job. Commands longer than 50 characters are cut to 49 plus `…`.
pub fn to_mermaid(jobs: &[Job]) -> String {
    let present: BTreeSet<String> = jobs.iter().map(Job::key).collect();
    let mut out = String::from("```mermaid\nstateDiagram-v2\n");
    for job in jobs {
        let command = match truncate_chars(&job.command, MERMAID_COMMAND_CHARS) {
            (_, false) => job.command.clone(),
            (_, true) => {
                let (head, _) = truncate_chars(&job.command, MERMAID_COMMAND_CHARS - 1);
                format!("{head}…")
            }
        };
        let command = command.replace('"', "'");
        let _ = writeln!(
            out,
            "    state \"{} {}<br/><code>{}</code>\" as S{}",
            job.status.icon(),
            job.id,
            command,
            job.id
        );
    }
    for job in jobs {
        for dep in &job.depends_on {
            if present.contains(dep) {
                let _ = writeln!(out, "    S{dep} --> S{}", job.id);
            }
        }
    }
    out.push_str("```\n");
    out
}

/// One line per job: `<id> [<group>]: (<STATUS>): <command> <- <deps>`.
pub fn to_text_listing(jobs: &[Job]) -> String {
    let mut out = String::new();
    for job in jobs {
        let (command, cut) = truncate_chars(&job.command, LISTING_COMMAND_CHARS);
        let _ = write!(
            out,
            "{} [{}]: ({}): {}{}",
            job.id,
            job.group_name,
            job.status,
            command,
            if cut { "..." } else { "" }
        );
        if !job.depends_on.is_empty() {
            let _ = write!(out, " <- {}", job.depends_on.join(", "));
        }
        out.push('\n');
    }
    out
}
