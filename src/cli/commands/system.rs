use super::{CommandDefinition, CommandGroup};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::shell_context::ShellContext;
use crate::table::{Table, TableColumn};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "List commands or show usage for one",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new(
            "fields",
            "Show the configured form fields",
            "fields",
            cmd_fields,
        ),
        CommandDefinition::new("version", "Show build information", "version", cmd_version),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit)
            .with_aliases(&["quit"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let definition = context.registry.get(&name.to_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown command `{}`", name))
        })?;
        output::block(format!("{}\n  usage: {}", definition.description, definition.usage));
        return Ok(());
    }

    let plain = output::current_preferences().plain_mode;
    for group in CommandGroup::ALL {
        output::section(group.title());
        let rows = context
            .registry
            .in_group(group)
            .map(|definition| {
                let mut usage = definition.usage.to_string();
                if !definition.aliases.is_empty() {
                    usage.push_str(&format!(" ({})", definition.aliases.join(", ")));
                }
                vec![usage, definition.description.to_string()]
            })
            .collect();
        let table = Table {
            columns: vec![TableColumn::new("Usage"), TableColumn::new("Description")],
            rows,
            padding: 1,
            plain,
        };
        output::block(table.render());
    }
    Ok(())
}

fn cmd_fields(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rows = context
        .page
        .fields()
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.label.clone(),
                field.field_type.to_string(),
                if field.required { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    let table = Table {
        columns: vec![
            TableColumn::new("Name"),
            TableColumn::new("Label"),
            TableColumn::new("Type"),
            TableColumn::new("Required"),
        ],
        rows,
        padding: 1,
        plain: output::current_preferences().plain_mode,
    };
    output::block(table.render());
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::info(meta.summary());
    output::block(format!("rustc: {}", meta.rustc));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
