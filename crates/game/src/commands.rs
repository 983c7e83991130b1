//! Text commands typed at the prompt.

use engine_core::{Intensity, WeatherKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `weather <name>`; the name is checked when applied.
    Weather(String),
    Intensity(Intensity),
    City(String),
    Suggest(String),
    FavoriteAdd,
    FavoriteList,
    /// 1-based position in the favorites list.
    FavoriteSelect(usize),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a number")]
    NotANumber(String),
}

pub const HELP: &str = "\
commands:
  weather <kind> | <kind>   clear, cloudy, rain, thunderstorm, snow, fog, windy
  intensity <0-100>         rebuild the current weather
  city <name>               show the weather for a city
  suggest <text>            list matching city names
  fav add | fav list | fav <n>
  status                    scene and audio state
  quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let head = head.to_lowercase();
        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        match head.as_str() {
            "" => Err(CommandError::Empty),
            "weather" => argument("weather").map(|name| Command::Weather(name.to_lowercase())),
            "intensity" => {
                let value = argument("intensity")?;
                value
                    .parse::<i64>()
                    .map(|v| Command::Intensity(Intensity::new(v)))
                    .map_err(|_| CommandError::NotANumber(value))
            }
            "city" => argument("city").map(Command::City),
            "suggest" => argument("suggest").map(Command::Suggest),
            "fav" => match argument("fav")?.to_lowercase().as_str() {
                "add" => Ok(Command::FavoriteAdd),
                "list" => Ok(Command::FavoriteList),
                n => n
                    .parse::<usize>()
                    .map(Command::FavoriteSelect)
                    .map_err(|_| CommandError::NotANumber(n.to_string())),
            },
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other if other.parse::<WeatherKind>().is_ok() && rest.is_empty() => {
                Ok(Command::Weather(other.to_string()))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
