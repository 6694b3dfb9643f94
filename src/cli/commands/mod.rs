use std::collections::HashMap;

pub mod config;
pub mod system;
pub mod users;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let groups = [
        (CommandGroup::Users, users::definitions()),
        (CommandGroup::Config, config::definitions()),
        (CommandGroup::System, system::definitions()),
    ];
    groups
        .into_iter()
        .flat_map(|(group, definitions)| {
            definitions
                .into_iter()
                .map(move |definition| definition.in_group(group))
        })
        .collect()
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Heading a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandGroup {
    #[default]
    Users,
    Config,
    System,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 3] = [CommandGroup::Users, CommandGroup::Config, CommandGroup::System];

    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Users => "Users",
            CommandGroup::Config => "Configuration",
            CommandGroup::System => "System",
        }
    }
}

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub group: CommandGroup,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            aliases: &[],
            group: CommandGroup::Users,
            handler,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn in_group(mut self, group: CommandGroup) -> Self {
        self.group = group;
        self
    }
}

/// Lookup table from command names and aliases to definitions, preserving
/// registration order for help output.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    aliases: HashMap<&'static str, &'static str>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut aliases = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            for alias in definition.aliases {
                aliases.insert(*alias, definition.name);
            }
            commands.insert(definition.name, definition);
        }
        Self {
            commands,
            aliases,
            order,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        let canonical = self.aliases.get(name).copied().unwrap_or(name);
        self.commands.get(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn in_group(&self, group: CommandGroup) -> impl Iterator<Item = &CommandDefinition> {
        self.iter().filter(move |definition| definition.group == group)
    }

    /// Canonical names followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order
            .iter()
            .copied()
            .chain(self.iter().flat_map(|definition| definition.aliases.iter().copied()))
    }
}
