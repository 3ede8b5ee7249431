//! Line parser for the local driver.
//!
//! Every line reads `<arena> <player> <verb> [args]`, for example
//! `1 2 move w d` or `1 2 skill 1 3`.
use std::str::FromStr;

use battle_core::{ActionError, ArenaId, Command, CombatantId, MoveAction};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Challenge {
        arena: ArenaId,
        challenger: CombatantId,
        opponent: CombatantId,
    },
    TeamChallenge {
        arena: ArenaId,
        side_a: [CombatantId; 2],
        side_b: [CombatantId; 2],
    },
    Hunt {
        arena: ArenaId,
        hunter: CombatantId,
        ground: String,
    },
    Battle {
        arena: ArenaId,
        command: Command,
    },
    Show {
        arena: ArenaId,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected `<arena> <player> <verb> [args]`")]
    Incomplete,

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("'{0}' is not a number")]
    BadNumber(String),

    #[error(transparent)]
    Rejected(#[from] ActionError),

    #[error("unknown command '{0}'")]
    UnknownVerb(String),
}

impl FromStr for Request {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let (Some(arena), Some(player), Some(verb)) = (words.next(), words.next(), words.next())
        else {
            return Err(ParseError::Incomplete);
        };
        let arena = ArenaId(number(arena)?);
        let player = CombatantId(number(player)?);
        let args: Vec<&str> = words.collect();

        let request = match verb.to_ascii_lowercase().as_str() {
            "challenge" => Request::Challenge {
                arena,
                challenger: player,
                opponent: required(&args, 0, "opponent")?,
            },
            "team" => Request::TeamChallenge {
                arena,
                side_a: [player, required(&args, 0, "teammate")?],
                side_b: [
                    required(&args, 1, "first opponent")?,
                    required(&args, 2, "second opponent")?,
                ],
            },
            "hunt" => Request::Hunt {
                arena,
                hunter: player,
                ground: args
                    .first()
                    .ok_or(ParseError::Missing("hunting ground"))?
                    .to_string(),
            },
            "show" => Request::Show { arena },
            "move" | "m" => {
                if args.is_empty() {
                    return Err(ParseError::Missing("direction"));
                }
                battle(arena, Command::Move(MoveAction::parse(player, args)?))
            }
            "attack" | "a" => battle(arena, Command::attack(player, optional(&args, 0)?)),
            "special" => battle(arena, Command::special(player)),
            "skill" => {
                let slot = args.first().ok_or(ParseError::Missing("skill slot"))?;
                let slot = slot
                    .parse::<u8>()
                    .map_err(|_| ParseError::BadNumber(slot.to_string()))?;
                battle(arena, Command::skill(player, slot, optional(&args, 1)?))
            }
            "cell" => {
                let cell = args.first().ok_or(ParseError::Missing("cell"))?;
                battle(arena, Command::choose_cell(player, number(cell)? as usize))
            }
            "forfeit" => battle(arena, Command::forfeit(player)),
            "flee" => battle(arena, Command::flee(player)),
            other => return Err(ParseError::UnknownVerb(other.to_owned())),
        };
        Ok(request)
    }
}

fn battle(arena: ArenaId, command: Command) -> Request {
    Request::Battle { arena, command }
}

fn number(word: &str) -> Result<u64, ParseError> {
    word.parse()
        .map_err(|_| ParseError::BadNumber(word.to_owned()))
}

fn target(word: &str) -> Result<CombatantId, ParseError> {
    if word.eq_ignore_ascii_case("monster") {
        return Ok(CombatantId::MONSTER);
    }
    number(word).map(CombatantId)
}

fn required(args: &[&str], index: usize, what: &'static str) -> Result<CombatantId, ParseError> {
    target(args.get(index).ok_or(ParseError::Missing(what))?)
}

fn optional(args: &[&str], index: usize) -> Result<Option<CombatantId>, ParseError> {
    args.get(index).map(|word| target(word)).transpose()
}

#[cfg(test)]
mod tests {
    use battle_core::Direction;

    use super::*;

    fn parse(line: &str) -> Result<Request, ParseError> {
        line.parse()
    }

    #[test]
    fn battle_commands() {
        let arena = ArenaId(1);
        let me = CombatantId(2);
        assert_eq!(
            parse("1 2 move wwd").unwrap(),
            battle(
                arena,
                Command::Move(MoveAction::new(
                    me,
                    vec![Direction::Up, Direction::Up, Direction::Right]
                ))
            )
        );
        assert_eq!(
            parse("1 2 MOVE down Left").unwrap(),
            battle(
                arena,
                Command::Move(MoveAction::new(me, vec![Direction::Down, Direction::Left]))
            )
        );
        assert_eq!(parse("1 2 attack").unwrap(), battle(arena, Command::attack(me, None)));
        assert_eq!(
            parse("1 2 attack monster").unwrap(),
            battle(arena, Command::attack(me, Some(CombatantId::MONSTER)))
        );
        assert_eq!(
            parse("1 2 skill 2 3").unwrap(),
            battle(arena, Command::skill(me, 2, Some(CombatantId(3))))
        );
        assert_eq!(parse("1 2 cell 7").unwrap(), battle(arena, Command::choose_cell(me, 7)));
        assert_eq!(parse("1 2 flee").unwrap(), battle(arena, Command::flee(me)));
    }

    #[test]
    fn session_requests() {
        assert_eq!(
            parse("4 1 team 2 3 4").unwrap(),
            Request::TeamChallenge {
                arena: ArenaId(4),
                side_a: [CombatantId(1), CombatantId(2)],
                side_b: [CombatantId(3), CombatantId(4)],
            }
        );
        assert_eq!(
            parse("4 1 hunt meadow").unwrap(),
            Request::Hunt {
                arena: ArenaId(4),
                hunter: CombatantId(1),
                ground: "meadow".into(),
            }
        );
        assert_eq!(parse("4 1 show").unwrap(), Request::Show { arena: ArenaId(4) });
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(parse("1 2"), Err(ParseError::Incomplete));
        assert_eq!(parse("x 2 attack"), Err(ParseError::BadNumber("x".into())));
        assert_eq!(parse("1 2 move"), Err(ParseError::Missing("direction")));
        assert_eq!(
            parse("1 2 move wq"),
            Err(ParseError::Rejected(ActionError::MalformedDirection("wq".into())))
        );
        assert_eq!(parse("1 2 challenge"), Err(ParseError::Missing("opponent")));
        assert_eq!(parse("1 2 skill x"), Err(ParseError::BadNumber("x".into())));
        assert_eq!(parse("1 2 dance"), Err(ParseError::UnknownVerb("dance".into())));
    }
}
