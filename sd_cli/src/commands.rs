use std::fmt;
use std::str::FromStr;
use swiss_draft::swiss::{EnrollmentId, MatchId, RoundId, StageId, TournamentId};

/// Options of the `stage` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    pub name: String,
    pub rounds: u32,
    pub phase: Option<u32>,
    pub first_table: Option<u32>,
    pub counts_for_event: bool,
    /// Empty means every enrolled player
    pub players: Vec<EnrollmentId>,
}

/// An operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New {
        name: String,
        capacity: usize,
    },
    List,
    Enroll {
        tournament: TournamentId,
        names: Vec<String>,
    },
    Stage {
        tournament: TournamentId,
        options: StageOptions,
    },
    Seat {
        tournament: TournamentId,
        stage: StageId,
    },
    Pair {
        tournament: TournamentId,
        stage: StageId,
    },
    Start {
        tournament: TournamentId,
        round: RoundId,
    },
    Report {
        tournament: TournamentId,
        game: MatchId,
        player1_wins: i64,
        player2_wins: i64,
        reporter: String,
    },
    Confirm {
        tournament: TournamentId,
        game: MatchId,
    },
    Finish {
        tournament: TournamentId,
        round: RoundId,
    },
    /// Stage standings, or event standings without a stage
    Standings {
        tournament: TournamentId,
        stage: Option<StageId>,
    },
    Drop {
        tournament: TournamentId,
        enrollment: EnrollmentId,
    },
    Reset {
        tournament: TournamentId,
        stage: StageId,
    },
    EventRound {
        tournament: TournamentId,
    },
    Show {
        tournament: TournamentId,
        stage: Option<StageId>,
    },
    /// Full tournament state as JSON
    Export {
        tournament: TournamentId,
    },
    /// Play out the remaining rounds of a stage with random results
    Simulate {
        tournament: TournamentId,
        stage: StageId,
    },
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No command given.
    Empty,
    /// A required argument is missing.
    MissingArgument { command: String, argument: String },
    /// An argument that should be a number is not.
    InvalidNumber {
        argument: &'static str,
        value: String,
    },
    /// Unknown `--option` for a command.
    UnknownOption(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "No command given. Use '--help' to see available commands"),
            Self::MissingArgument { command, argument } => {
                write!(f, "'{}' requires {}", command, argument)
            }
            Self::InvalidNumber { argument, value } => {
                write!(f, "Invalid {} '{}'. Must be a whole number", argument, value)
            }
            Self::UnknownOption(option) => write!(f, "Unknown option '{}'", option),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Use '--help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse command line words (after global flags) into a [`Command`].
///
/// # Examples
///
/// ```
/// use sd_cli::commands::{Command, parse_command};
///
/// let args = ["pair", "1", "4"].map(String::from);
/// assert_eq!(
///     parse_command(&args),
///     Ok(Command::Pair { tournament: 1, stage: 4 })
/// );
/// ```
pub fn parse_command(args: &[String]) -> Result<Command, ParseError> {
    let parts: Vec<&str> = args.iter().map(String::as_str).collect();
    let Some((&name, rest)) = parts.split_first() else {
        return Err(ParseError::Empty);
    };
    let args = Args {
        command: name,
        parts: rest,
    };

    match name {
        "new" => Ok(Command::New {
            name: args.text(0, "a tournament name")?,
            capacity: args.optional_number(1, "capacity")?.unwrap_or(0),
        }),
        "list" => Ok(Command::List),
        "enroll" => {
            let names: Vec<String> = rest.iter().skip(1).map(|s| s.to_string()).collect();
            if names.is_empty() {
                return Err(args.missing("at least one player name"));
            }
            Ok(Command::Enroll {
                tournament: args.tournament()?,
                names,
            })
        }
        "stage" => Ok(Command::Stage {
            tournament: args.tournament()?,
            options: parse_stage_options(&args)?,
        }),
        "seat" => Ok(Command::Seat {
            tournament: args.tournament()?,
            stage: args.number(1, "stage id")?,
        }),
        "pair" => Ok(Command::Pair {
            tournament: args.tournament()?,
            stage: args.number(1, "stage id")?,
        }),
        "start" => Ok(Command::Start {
            tournament: args.tournament()?,
            round: args.number(1, "round id")?,
        }),
        "report" => Ok(Command::Report {
            tournament: args.tournament()?,
            game: args.number(1, "match id")?,
            player1_wins: args.number(2, "player 1 win count")?,
            player2_wins: args.number(3, "player 2 win count")?,
            reporter: rest.get(4).map_or_else(|| "operator".to_string(), |s| s.to_string()),
        }),
        "confirm" => Ok(Command::Confirm {
            tournament: args.tournament()?,
            game: args.number(1, "match id")?,
        }),
        "finish" => Ok(Command::Finish {
            tournament: args.tournament()?,
            round: args.number(1, "round id")?,
        }),
        "standings" => Ok(Command::Standings {
            tournament: args.tournament()?,
            stage: args.optional_number(1, "stage id")?,
        }),
        "drop" => Ok(Command::Drop {
            tournament: args.tournament()?,
            enrollment: args.number(1, "enrollment id")?,
        }),
        "reset" => Ok(Command::Reset {
            tournament: args.tournament()?,
            stage: args.number(1, "stage id")?,
        }),
        "event-round" => Ok(Command::EventRound {
            tournament: args.tournament()?,
        }),
        "show" => Ok(Command::Show {
            tournament: args.tournament()?,
            stage: args.optional_number(1, "stage id")?,
        }),
        "export" => Ok(Command::Export {
            tournament: args.tournament()?,
        }),
        "simulate" => Ok(Command::Simulate {
            tournament: args.tournament()?,
            stage: args.number(1, "stage id")?,
        }),
        _ => Err(ParseError::UnrecognizedCommand(name.to_string())),
    }
}

/// Positional arguments of one command
struct Args<'a> {
    command: &'a str,
    parts: &'a [&'a str],
}

impl Args<'_> {
    fn missing(&self, argument: &str) -> ParseError {
        ParseError::MissingArgument {
            command: self.command.to_string(),
            argument: argument.to_string(),
        }
    }

    fn text(&self, idx: usize, argument: &'static str) -> Result<String, ParseError> {
        self.parts
            .get(idx)
            .map(|s| s.to_string())
            .ok_or_else(|| self.missing(argument))
    }

    fn number<T: FromStr>(&self, idx: usize, argument: &'static str) -> Result<T, ParseError> {
        let value = self
            .parts
            .get(idx)
            .ok_or_else(|| self.missing(&with_article(argument)))?;
        parse_number(value, argument)
    }

    fn optional_number<T: FromStr>(
        &self,
        idx: usize,
        argument: &'static str,
    ) -> Result<Option<T>, ParseError> {
        self.parts
            .get(idx)
            .map(|value| parse_number(value, argument))
            .transpose()
    }

    fn tournament(&self) -> Result<TournamentId, ParseError> {
        self.number(0, "tournament id")
    }
}

fn with_article(noun: &str) -> String {
    if noun.starts_with(['a', 'e', 'i', 'o', 'u']) {
        format!("an {noun}")
    } else {
        format!("a {noun}")
    }
}

fn parse_number<T: FromStr>(value: &str, argument: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        argument,
        value: value.to_string(),
    })
}

/// Parse "stage TOURNAMENT NAME ROUNDS [--phase N] [--table N] [--no-event] [--players 1,2,3]"
fn parse_stage_options(args: &Args<'_>) -> Result<StageOptions, ParseError> {
    let mut options = StageOptions {
        name: args.text(1, "a stage name")?,
        rounds: args.number(2, "round count")?,
        phase: None,
        first_table: None,
        counts_for_event: true,
        players: Vec::new(),
    };

    let mut flags = args.parts.iter().skip(3);
    while let Some(&flag) = flags.next() {
        match flag {
            "--phase" => {
                let value = flags.next().ok_or_else(|| args.missing("a phase number"))?;
                options.phase = Some(parse_number(value, "phase")?);
            }
            "--table" => {
                let value = flags.next().ok_or_else(|| args.missing("a table number"))?;
                options.first_table = Some(parse_number(value, "table")?);
            }
            "--no-event" => options.counts_for_event = false,
            "--players" => {
                let value = flags.next().ok_or_else(|| args.missing("a player list"))?;
                options.players = value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| parse_number(s, "enrollment id"))
                    .collect::<Result<_, _>>()?;
            }
            other => return Err(ParseError::UnknownOption(other.to_string())),
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, ParseError> {
        let args: Vec<String> = line.split_whitespace().map(String::from).collect();
        parse_command(&args)
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(""), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_new() {
        assert_eq!(
            parse("new Cube 16"),
            Ok(Command::New {
                name: "Cube".to_string(),
                capacity: 16
            })
        );
        assert!(matches!(parse("new Cube"), Ok(Command::New { capacity: 0, .. })));
    }

    #[test]
    fn test_parse_enroll_many() {
        assert_eq!(
            parse("enroll 1 alice bob"),
            Ok(Command::Enroll {
                tournament: 1,
                names: vec!["alice".to_string(), "bob".to_string()]
            })
        );
    }

    #[test]
    fn test_parse_enroll_requires_names() {
        assert!(matches!(
            parse("enroll 1"),
            Err(ParseError::MissingArgument { command, .. }) if command == "enroll"
        ));
    }

    #[test]
    fn test_parse_stage_defaults() {
        let Ok(Command::Stage { options, .. }) = parse("stage 1 Pod 3") else {
            panic!("expected stage command");
        };
        assert_eq!(options.name, "Pod");
        assert_eq!(options.rounds, 3);
        assert!(options.counts_for_event);
        assert!(options.players.is_empty());
    }

    #[test]
    fn test_parse_stage_options() {
        let Ok(Command::Stage { options, .. }) =
            parse("stage 1 Top8 1 --phase 2 --table 20 --no-event --players 3,5,8")
        else {
            panic!("expected stage command");
        };
        assert_eq!(options.phase, Some(2));
        assert_eq!(options.first_table, Some(20));
        assert!(!options.counts_for_event);
        assert_eq!(options.players, vec![3, 5, 8]);
    }

    #[test]
    fn test_parse_stage_unknown_option() {
        assert_eq!(
            parse("stage 1 Pod 3 --fast"),
            Err(ParseError::UnknownOption("--fast".to_string()))
        );
    }

    #[test]
    fn test_parse_report() {
        assert_eq!(
            parse("report 1 12 2 1 alice"),
            Ok(Command::Report {
                tournament: 1,
                game: 12,
                player1_wins: 2,
                player2_wins: 1,
                reporter: "alice".to_string()
            })
        );
    }

    #[test]
    fn test_parse_report_negative_wins_reaches_engine() {
        // Range checks belong to the engine
        assert!(matches!(
            parse("report 1 12 -1 2"),
            Ok(Command::Report {
                player1_wins: -1,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_invalid_number() {
        assert_eq!(
            parse("pair x 2"),
            Err(ParseError::InvalidNumber {
                argument: "tournament id",
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_parse_standings_scope() {
        assert_eq!(
            parse("standings 1"),
            Ok(Command::Standings {
                tournament: 1,
                stage: None
            })
        );
        assert_eq!(
            parse("standings 1 4"),
            Ok(Command::Standings {
                tournament: 1,
                stage: Some(4)
            })
        );
    }

    #[test]
    fn test_parse_event_round() {
        assert_eq!(
            parse("event-round 3"),
            Ok(Command::EventRound { tournament: 3 })
        );
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(parse("export 2"), Ok(Command::Export { tournament: 2 }));
        assert!(matches!(
            parse("export"),
            Err(ParseError::MissingArgument { command, .. }) if command == "export"
        ));
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(
            parse("shuffle 1"),
            Err(ParseError::UnrecognizedCommand("shuffle".to_string()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            parse("seat 1").unwrap_err().to_string(),
            "'seat' requires a stage id"
        );
    }
}
