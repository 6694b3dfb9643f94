use super::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show, locate, or save the configuration",
        "config <show|path|save>",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("show") => {
            output::block(serde_json::to_string_pretty(&context.config)?);
            Ok(())
        }
        Some("path") => {
            output::block(context.config_manager.path().display());
            Ok(())
        }
        Some("save") => {
            context.config_manager.save(&context.config)?;
            output::success(format!(
                "Configuration saved to {}.",
                context.config_manager.path().display()
            ));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}
