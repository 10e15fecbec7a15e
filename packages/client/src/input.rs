//! Terminal command parsing.

/// A line typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the contents of the name field
    Name(String),
    /// Submit the join form, optionally typing the name first
    Join(Option<String>),
    Click,
    Move { x: f64, y: f64 },
    Help,
    Quit,
    /// Anything else, with a hint to show
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  /name <text>   type your name (shared with other players as you type)
  /join [name]   join the game
  /click         click (an empty line works too)
  /move <x> <y>  move your cursor
  /help          show this help
  /quit          leave";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Click;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "/name" => Self::Name(rest.to_string()),
            "/join" if rest.is_empty() => Self::Join(None),
            "/join" => Self::Join(Some(rest.to_string())),
            "/click" => Self::Click,
            "/move" => Self::parse_move(rest),
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Invalid(format!("Unknown command '{other}', try /help")),
        }
    }

    fn parse_move(args: &str) -> Self {
        let coords: Vec<Option<f64>> = args
            .split_whitespace()
            .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();
        match coords.as_slice() {
            [Some(x), Some(y)] => Self::Move { x: *x, y: *y },
            _ => Self::Invalid("Usage: /move <x> <y>".to_string()),
        }
    }
}
