//! Button commands registered into the console at startup

use super::error::{CommandError, RegistryError};
use super::registry::{CommandContext, CommandFuture, CommandRegistry};
use crate::controller::{button_push, ControllerError, ControllerState};
use std::time::Duration;
use tracing::info;

/// Default number of pushes for `mash` without an explicit count
pub const DEFAULT_MASH_PRESSES: u32 = 10;

const HOLD_DOC: &str = "
    hold - Press and keep holding buttons until they are released.
    Usage: hold <button> [<button> ...]
";

const RELEASE_DOC: &str = "
    release - Release buttons that are held.
    Usage: release <button> [<button> ...]
";

const MASH_DOC: &str = "
    mash - Push a button repeatedly.
    Usage: mash <button> <interval> [presses]
        interval: seconds to wait between pushes
        presses:  number of pushes, 10 if omitted
";

pub fn register_controller_commands<C: ControllerState>(
    registry: &mut CommandRegistry<C>,
) -> Result<(), RegistryError> {
    registry.register("hold", hold::<C>, HOLD_DOC)?;
    registry.register("release", release::<C>, RELEASE_DOC)?;
    registry.register("mash", mash::<C>, MASH_DOC)?;
    Ok(())
}

fn hold<C: ControllerState>(ctx: CommandContext<'_, C>, args: Vec<String>) -> CommandFuture<'_> {
    Box::pin(async move {
        set_buttons(ctx.controller, &args, true, "hold <button> [<button> ...]")?;
        ctx.controller.send().await?;
        Ok(None)
    })
}

fn release<C: ControllerState>(ctx: CommandContext<'_, C>, args: Vec<String>) -> CommandFuture<'_> {
    Box::pin(async move {
        set_buttons(ctx.controller, &args, false, "release <button> [<button> ...]")?;
        ctx.controller.send().await?;
        Ok(None)
    })
}

fn set_buttons<C: ControllerState>(
    controller: &mut C,
    buttons: &[String],
    pushed: bool,
    usage: &'static str,
) -> Result<(), CommandError> {
    if buttons.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    if let Some(unknown) = buttons
        .iter()
        .find(|button| !controller.available_buttons().contains(button.as_str()))
    {
        return Err(ControllerError::UnknownButton(unknown.clone()).into());
    }
    for button in buttons {
        controller.set_button(button, pushed)?;
    }
    Ok(())
}

fn mash<C: ControllerState>(ctx: CommandContext<'_, C>, args: Vec<String>) -> CommandFuture<'_> {
    Box::pin(async move {
        let usage = "mash <button> <interval> [presses]";
        let (button, interval, presses) = match args.as_slice() {
            [button, interval] => (button, interval, None),
            [button, interval, presses] => (button, interval, Some(presses)),
            _ => return Err(CommandError::Usage(usage)),
        };

        let interval = interval
            .parse::<f64>()
            .ok()
            .filter(|secs| *secs >= 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| CommandError::InvalidArgument {
                name: "interval",
                value: interval.clone(),
            })?;
        let presses = match presses {
            None => DEFAULT_MASH_PRESSES,
            Some(p) => p
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| CommandError::InvalidArgument {
                    name: "presses",
                    value: p.clone(),
                })?,
        };

        info!("Mashing {} {} times every {:?}", button, presses, interval);
        let buttons = [button.clone()];
        for i in 0..presses {
            if i > 0 {
                tokio::time::sleep(interval).await;
            }
            button_push(ctx.controller, &buttons, ctx.timing.push_duration).await?;
        }
        Ok(Some(format!("Pushed {} {} times.", button, presses)))
    })
}
