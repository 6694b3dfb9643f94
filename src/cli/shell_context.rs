use dialoguer::theme::ColorfulTheme;

use crate::config::{Config, ConfigManager};
use crate::core::services::{HttpUserService, UserApi};
use crate::core::users_page::UsersPage;

use super::commands::{self, CommandRegistry};
use super::core::CliError;
use super::output::{self, OutputPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub page: UsersPage,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Loads configuration from the default location and talks HTTP.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?.with_env_overrides();
        config.validate()?;
        let api = HttpUserService::new(&config.base_url, &config.collection)?;
        Ok(Self::with_api(mode, config_manager, config, Box::new(api)))
    }

    /// Builds a shell over any backend; the config must already be valid.
    pub fn with_api(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        api: Box<dyn UserApi>,
    ) -> Self {
        output::set_preferences(OutputPreferences {
            plain_mode: config.plain_output,
            ..OutputPreferences::default()
        });
        let page = UsersPage::new(api, config.fields.clone()).with_id_policy(config.create_ids);

        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            page,
            last_command: None,
            running: true,
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match self.page.title() {
            Some(title) => format!("users [{}]> ", title),
            None => format!("users ({})> ", self.page.records().len()),
        }
    }
}
