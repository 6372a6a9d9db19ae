use anyhow::{Context, Result, anyhow, bail};
use std::str::FromStr;
use switchex_core::{RoomId, SurveyScores};

/// Export target for the `export` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// One moderator console line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Participant(String),
    Group(String),
    Start,
    Press(RoomId),
    Success,
    Fail,
    Survey(SurveyScores),
    Next,
    Reset,
    Orient(u16),
    Status,
    Export(ExportFormat),
    Help,
    Quit,
}

pub const HELP: &str = "\
participant <id>      set participant (derives group and condition order)
group <letter>        set the group; an id like A3 becomes <letter>3
start                 start the current condition
press <room>          toggle a room's light
success | fail        record the trial outcome
survey <6 x 0..20> <1..7>
                      NASA-TLX sub-scales then confidence, for the last trial
next                  move to the next condition (wraps to the first)
reset                 clear the trial for another attempt
orient <0..180>       floor-plan rotation
status                show the current state
export [csv|json]     write all records to the output directory
quit";

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "participant" | "p" => Self::Participant(required(rest, "participant id")?.to_string()),
            "group" | "g" => {
                let group = required(rest, "group letter")?;
                if !group.chars().all(|c| c.is_ascii_alphabetic()) {
                    bail!("group must be letters, got {group:?}");
                }
                Self::Group(group.to_string())
            }
            "start" => Self::Start,
            "press" | "toggle" => Self::Press(RoomId::from(required(rest, "room")?)),
            "success" | "ok" => Self::Success,
            "fail" | "failure" => Self::Fail,
            "survey" => Self::Survey(parse_survey(rest)?),
            "next" => Self::Next,
            "reset" => Self::Reset,
            "orient" => {
                let degrees = required(rest, "degrees")?;
                Self::Orient(
                    degrees
                        .parse()
                        .with_context(|| format!("invalid orientation {degrees:?}"))?,
                )
            }
            "status" | "s" => Self::Status,
            "export" => Self::Export(match rest.to_lowercase().as_str() {
                "" | "csv" => ExportFormat::Csv,
                "json" => ExportFormat::Json,
                other => bail!("unknown export format {other:?}"),
            }),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command {other:?}, try `help`"),
        };
        Ok(command)
    }
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(anyhow!("missing {what}"))
    } else {
        Ok(rest)
    }
}

fn parse_survey(rest: &str) -> Result<SurveyScores> {
    let values = rest
        .split_whitespace()
        .map(|v| v.parse::<u8>().with_context(|| format!("invalid score {v:?}")))
        .collect::<Result<Vec<_>>>()?;
    let &[mental, physical, temporal, performance, effort, frustration, confidence] =
        values.as_slice()
    else {
        bail!("survey needs 7 values, got {}", values.len());
    };
    let scores = SurveyScores::from_subscales(
        [mental, physical, temporal, performance, effort, frustration],
        confidence,
    )?;
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("start"), Command::Start);
        assert_eq!(parse("  SUCCESS "), Command::Success);
        assert_eq!(parse("fail"), Command::Fail);
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse("export"), Command::Export(ExportFormat::Csv));
        assert_eq!(parse("export JSON"), Command::Export(ExportFormat::Json));
        assert_eq!(parse("orient 90"), Command::Orient(90));
    }

    #[test]
    fn room_names_keep_spaces() {
        assert_eq!(
            parse("press meeting room"),
            Command::Press(RoomId::from("meeting room"))
        );
    }

    #[test]
    fn participant_and_group() {
        assert_eq!(parse("participant B12"), Command::Participant("B12".into()));
        assert_eq!(parse("group c"), Command::Group("c".into()));
        assert!("group 3".parse::<Command>().is_err());
        assert!("participant".parse::<Command>().is_err());
    }

    #[test]
    fn survey_scores() {
        match parse("survey 10 10 10 10 10 10 4") {
            Command::Survey(scores) => {
                assert_eq!(scores.nasa_tlx, 10.0);
                assert_eq!(scores.confidence, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!("survey 1 2 3".parse::<Command>().is_err());
        assert!("survey 21 0 0 0 0 0 4".parse::<Command>().is_err());
        assert!("survey 0 0 0 0 0 0 8".parse::<Command>().is_err());
        assert!("survey a 0 0 0 0 0 4".parse::<Command>().is_err());
    }

    #[test]
    fn unknown_input_is_rejected() {
        assert!("dance".parse::<Command>().is_err());
        assert!("export xml".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }
}
