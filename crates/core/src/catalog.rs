use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::command_definitions::{BasicCommand, MacroCommand, Runnable};

/// One entry of the catalog document: the commands offered for one application.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AppSetting {
    pub app: AppInfo,
    #[serde(default)]
    pub basic_commands: Vec<BasicCommand>,
    #[serde(default)]
    pub macro_commands: Vec<MacroCommand>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AppInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSet {
    pub basic_commands: Vec<BasicCommand>,
    pub macro_commands: Vec<MacroCommand>,
}

impl CommandSet {
    /// Looks up a command by exact name, basic commands first.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Runnable> {
        self.basic_commands
            .iter()
            .find(|basic| basic.name == name)
            .cloned()
            .map(Runnable::Basic)
            .or_else(|| {
                self.macro_commands
                    .iter()
                    .find(|macro_command| macro_command.name == name)
                    .cloned()
                    .map(Runnable::Macro)
            })
    }

    /// Every command, basic ones before macros, in catalog order.
    pub fn runnables(&self) -> impl Iterator<Item = Runnable> + '_ {
        self.basic_commands
            .iter()
            .cloned()
            .map(Runnable::Basic)
            .chain(self.macro_commands.iter().cloned().map(Runnable::Macro))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.basic_commands.is_empty() && self.macro_commands.is_empty()
    }
}

/// Command sets keyed by the process display name they apply to.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    apps: IndexMap<String, CommandSet>,
}

impl Catalog {
    /// Builds a catalog from parsed settings. A repeated application name
    /// replaces the earlier entry.
    #[must_use]
    pub fn from_settings(settings: Vec<AppSetting>) -> Self {
        let mut apps = IndexMap::with_capacity(settings.len());

        for setting in settings {
            let commands = CommandSet {
                basic_commands: setting.basic_commands,
                macro_commands: setting.macro_commands,
            };
            if apps.insert(setting.app.name.clone(), commands).is_some() {
                warn!(
                    "Application `{}` is defined more than once, using the last definition",
                    setting.app.name
                );
            }
        }

        Self { apps }
    }

    #[must_use]
    pub fn commands_for(&self, process_name: &str) -> Option<&CommandSet> {
        self.apps.get(process_name)
    }

    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
