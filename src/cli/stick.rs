//! The `stick` console command

use super::error::CommandError;
use crate::controller::{ControllerState, StickSide, StickState};

pub const STICK_USAGE: &str = "stick <l|left|r|right> <center|up|down|left|right|h|horizontal|v|vertical> [value]";

pub const STICK_DOC: &str = "
    stick - Command to set stick positions.
    :param side: 'l', 'left' for left control stick; 'r', 'right' for right control stick
    :param direction: 'center', 'up', 'down', 'left', 'right';
                      'h', 'horizontal' or 'v', 'vertical' to set the value directly to the \"value\" argument
    :param value: horizontal or vertical value
";

pub fn parse_side(token: &str) -> Result<StickSide, CommandError> {
    match token {
        "l" | "left" => Ok(StickSide::Left),
        "r" | "right" => Ok(StickSide::Right),
        other => Err(CommandError::InvalidSide(other.to_string())),
    }
}

fn parse_value(value: Option<&str>) -> Result<i32, CommandError> {
    let value = value.ok_or(CommandError::MissingValue)?;
    value
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidValue(value.to_string()))
}

/// Applies `direction` (and `value` for the direct axis forms) to one stick
pub fn set_stick(
    stick: &mut StickState,
    direction: &str,
    value: Option<&str>,
) -> Result<(), CommandError> {
    match direction {
        "center" => stick.set_center(),
        "up" => stick.set_up(),
        "down" => stick.set_down(),
        "left" => stick.set_left(),
        "right" => stick.set_right(),
        "h" | "horizontal" => stick.set_h(parse_value(value)?)?,
        "v" | "vertical" => stick.set_v(parse_value(value)?)?,
        other => return Err(CommandError::InvalidDirection(other.to_string())),
    }
    Ok(())
}

pub fn describe(side: StickSide, stick: &StickState) -> String {
    format!("{} stick was set to ({}, {}).", side, stick.h(), stick.v())
}

/// `stick <side> <direction> [value]`; changes local state only, nothing is sent
pub fn stick_command<C: ControllerState>(
    controller: &mut C,
    args: &[String],
) -> Result<String, CommandError> {
    let (side, direction, value) = match args {
        [side, direction] => (side, direction, None),
        [side, direction, value] => (side, direction, Some(value.as_str())),
        _ => return Err(CommandError::Usage(STICK_USAGE)),
    };

    let side = parse_side(side)?;
    let stick = controller.stick_mut(side);
    set_stick(stick, direction, value)?;
    Ok(describe(side, stick))
}
