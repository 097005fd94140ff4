use std::path::PathBuf;

use vidqueue_core::Msg;

pub const HELP_TEXT: &str = "commands: link <url> | file <path> | upload | clear | dir [path] | undir | page <n> | next | prev | rows <25|50|100|200> | show | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(Vec<Msg>),
    Help,
    Quit,
}

/// Translate one line of user input into session messages.
pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Send(Vec::new());
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "link" | "add" => submit_link(rest),
        "file" => Command::Send(vec![Msg::BatchFileChosen(optional_path(rest))]),
        "upload" => Command::Send(vec![Msg::UploadBatchClicked]),
        "clear" => Command::Send(vec![Msg::ClearAllClicked]),
        "dir" => Command::Send(vec![Msg::ChooseDirectoryClicked {
            requested: optional_path(rest),
        }]),
        "undir" => Command::Send(vec![Msg::ClearDirectoryClicked]),
        "page" => match rest.parse::<usize>() {
            Ok(page) => Command::Send(vec![Msg::PageSelected(page)]),
            Err(_) => Command::Help,
        },
        "next" => Command::Send(vec![Msg::NextPage]),
        "prev" => Command::Send(vec![Msg::PreviousPage]),
        "rows" => match rest.parse::<usize>() {
            Ok(rows) => Command::Send(vec![Msg::RowsPerPageSelected(rows)]),
            Err(_) => Command::Help,
        },
        "show" => Command::Send(vec![Msg::RefreshRequested]),
        "quit" | "exit" => Command::Quit,
        _ if looks_like_url(line) => submit_link(line),
        _ => Command::Help,
    }
}

fn submit_link(text: &str) -> Command {
    Command::Send(vec![
        Msg::LinkInputChanged(text.to_string()),
        Msg::SubmitLinkClicked,
    ])
}

fn optional_path(text: &str) -> Option<PathBuf> {
    if text.is_empty() {
        None
    } else {
        Some(PathBuf::from(text))
    }
}

fn looks_like_url(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
