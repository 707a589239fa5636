//! Command parsing for the terminal front end

/// One user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the search query (empty clears it)
    Search(String),
    NextPage,
    PrevPage,
    /// Play the term in this 1-based row of the visible page
    Play(usize),
    /// Speak arbitrary text
    Say(String),
    Stop,
    Voices,
    /// Redraw the current page
    Show,
    Help,
    Quit,
    Unknown(String),
}

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  /TEXT      search terms, definitions and translations (/ alone clears)
  n          next page
  p          previous page
  1-5        play the term in that row
  say TEXT   speak any text
  stop       stop speaking
  voices     list available voices
  (enter)    show the current page
  help       show this help
  q          quit";

/// Parse one line of input
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(query) = line.trim_start().strip_prefix('/') {
        return Command::Search(query.to_string());
    }

    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Command::Show,
        "n" | "next" => Command::NextPage,
        "p" | "prev" | "previous" => Command::PrevPage,
        "say" => Command::Say(rest.to_string()),
        "stop" | "x" => Command::Stop,
        "voices" | "v" => Command::Voices,
        "help" | "h" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(row) if rest.is_empty() => Command::Play(row),
            _ => Command::Unknown(trimmed.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        assert_eq!(parse_command("n"), Command::NextPage);
        assert_eq!(parse_command("  NEXT \n"), Command::NextPage);
        assert_eq!(parse_command("p"), Command::PrevPage);
        assert_eq!(parse_command(""), Command::Show);
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn test_search_keeps_query_text() {
        assert_eq!(parse_command("/api"), Command::Search("api".into()));
        assert_eq!(parse_command("/ two words "), Command::Search(" two words ".into()));
        assert_eq!(parse_command("/"), Command::Search(String::new()));
    }

    #[test]
    fn test_play_and_say() {
        assert_eq!(parse_command("3"), Command::Play(3));
        assert_eq!(parse_command("say hello world"), Command::Say("hello world".into()));
        assert_eq!(parse_command("say"), Command::Say(String::new()));
        assert_eq!(parse_command("say   "), Command::Say(String::new()));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse_command("3 4"), Command::Unknown("3 4".into()));
        assert_eq!(parse_command("frobnicate"), Command::Unknown("frobnicate".into()));
    }
}
