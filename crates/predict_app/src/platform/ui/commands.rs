use predict_core::Msg;
use thiserror::Error;

/// A domain or query picked by its position in the listing (1-based) or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Index(usize),
    Name(String),
}

impl Choice {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(index) if index > 0 => Choice::Index(index),
            _ => Choice::Name(arg.to_string()),
        }
    }

    /// Resolves against the currently listed options. Out of range indexes are
    /// passed on as names so the selection layer reports them.
    pub fn resolve(self, options: &[String]) -> String {
        match self {
            Choice::Index(index) => options
                .get(index - 1)
                .cloned()
                .unwrap_or_else(|| index.to_string()),
            Choice::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Domain(Choice),
    Query(Choice),
    Submit,
    Token(Option<String>),
    List,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type `help` for the list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
Commands:
  list                 show domains and queries
  domain <n|name>      select a domain (queries reset to its first)
  query <n|name>       select a query of the current domain
  submit               fetch the prediction for the current selection
  token [value]        set the bearer token, or clear it
  show                 print the current result again
  help                 this text
  quit                 exit after pending requests settle";

/// Parses one input line; `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match word.to_ascii_lowercase().as_str() {
        "domain" | "d" => Command::Domain(Choice::parse(
            arg.as_deref().ok_or(CommandError::MissingArgument("domain"))?,
        )),
        "query" | "q" => Command::Query(Choice::parse(
            arg.as_deref().ok_or(CommandError::MissingArgument("query"))?,
        )),
        "submit" | "s" | "go" => Command::Submit,
        "token" => Command::Token(arg),
        "list" | "ls" => Command::List,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    /// The core message for commands that change state.
    pub fn into_msg(self, domains: &[String], queries: &[String]) -> Option<Msg> {
        match self {
            Command::Domain(choice) => Some(Msg::DomainSelected(choice.resolve(domains))),
            Command::Query(choice) => Some(Msg::QuerySelected(choice.resolve(queries))),
            Command::Submit => Some(Msg::SelectionSubmitted),
            Command::Token(token) => Some(Msg::AuthTokenChanged(token)),
            Command::List | Command::Show | Command::Help | Command::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn options() -> Vec<String> {
        vec!["Gas Prices Query 1".to_string(), "Gas Prices Query 2 Yearly Averages".to_string()]
    }

    #[test]
    fn names_with_spaces_are_kept_whole() {
        assert_eq!(
            parse("domain   Gas Prices (Industry Trend Analysis) ").unwrap(),
            Some(Command::Domain(Choice::Name(
                "Gas Prices (Industry Trend Analysis)".to_string()
            )))
        );
    }

    #[test]
    fn indexes_resolve_against_listed_options() {
        let command = parse("q 2").unwrap().unwrap();
        assert_eq!(
            command.into_msg(&[], &options()),
            Some(Msg::QuerySelected("Gas Prices Query 2 Yearly Averages".to_string()))
        );
        assert_eq!(Choice::Index(9).resolve(&options()), "9");
        assert_eq!(Choice::parse("0"), Choice::Name("0".to_string()));
    }

    #[test]
    fn token_without_value_clears_it() {
        assert_eq!(parse("token").unwrap(), Some(Command::Token(None)));
        assert_eq!(
            parse("token abc.def").unwrap().unwrap().into_msg(&[], &[]),
            Some(Msg::AuthTokenChanged(Some("abc.def".to_string())))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(
            parse("fetch now").unwrap_err(),
            CommandError::Unknown("fetch".to_string())
        );
        assert_eq!(
            parse("domain").unwrap_err(),
            CommandError::MissingArgument("domain")
        );
    }

    #[test]
    fn submit_aliases() {
        for line in ["submit", "S", "go"] {
            assert_eq!(parse(line).unwrap(), Some(Command::Submit));
        }
    }
}
