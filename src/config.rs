use std::{collections::HashMap, fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    action::{Action, TreeOp},
    mode::Mode,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: Keys,
    pub log_file: Option<String>,
    pub tree_width: u16,
    pub show_tree: bool,
}

/// What a key name is bound to. `Nested` waits for another key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum KeyAction {
    Single(Action),
    Multiple(Vec<Action>),
    Nested(HashMap<String, KeyAction>),
}

impl From<KeyAction> for Action {
    fn from(ka: KeyAction) -> Self {
        match ka {
            KeyAction::Single(action) => action,
            KeyAction::Multiple(actions) => Action::Multiple(actions),
            KeyAction::Nested(_) => Action::Noop,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Keys {
    #[serde(default)]
    pub normal: HashMap<String, KeyAction>,
    #[serde(default)]
    pub insert: HashMap<String, KeyAction>,
    #[serde(default)]
    pub tree: HashMap<String, KeyAction>,
}

fn single(key: &str, action: Action) -> (String, KeyAction) {
    (key.to_string(), KeyAction::Single(action))
}

fn get_default_normal() -> HashMap<String, KeyAction> {
    HashMap::from([
        single("h", Action::MoveLeft),
        single("Left", Action::MoveLeft),
        single("l", Action::MoveRight),
        single("Right", Action::MoveRight),
        single("j", Action::MoveDown),
        single("Down", Action::MoveDown),
        single("k", Action::MoveUp),
        single("Up", Action::MoveUp),
        single("i", Action::EnterMode(Mode::Insert)),
        single(":", Action::EnterMode(Mode::Command)),
        single("x", Action::DeleteCharAtCursorPos),
        single("Tab", Action::Tree(TreeOp::Focus)),
        (
            "o".to_string(),
            KeyAction::Multiple(vec![
                Action::InsertLineBelowCursor,
                Action::EnterMode(Mode::Insert),
            ]),
        ),
        (
            "O".to_string(),
            KeyAction::Multiple(vec![
                Action::InsertLineAtCursor,
                Action::EnterMode(Mode::Insert),
            ]),
        ),
        (
            "d".to_string(),
            KeyAction::Nested(HashMap::from([single("d", Action::DeleteCurrentLine)])),
        ),
    ])
}

fn get_default_insert() -> HashMap<String, KeyAction> {
    HashMap::from([
        single("Enter", Action::InsertNewLine),
        single("Backspace", Action::DeletePreviousChar),
        single("Esc", Action::EnterMode(Mode::Normal)),
        single("Left", Action::MoveLeft),
        single("Right", Action::MoveRight),
        single("Up", Action::MoveUp),
        single("Down", Action::MoveDown),
    ])
}

fn get_default_tree() -> HashMap<String, KeyAction> {
    HashMap::from([
        single("j", Action::Tree(TreeOp::Down)),
        single("Down", Action::Tree(TreeOp::Down)),
        single("k", Action::Tree(TreeOp::Up)),
        single("Up", Action::Tree(TreeOp::Up)),
        single("Enter", Action::Tree(TreeOp::Select)),
        single("Tab", Action::EnterMode(Mode::Normal)),
        single("Esc", Action::EnterMode(Mode::Normal)),
        single("q", Action::Quit(false)),
    ])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: None,
            tree_width: 30,
            show_tree: true,
            keys: Keys {
                normal: get_default_normal(),
                insert: get_default_insert(),
                tree: get_default_tree(),
            },
        }
    }
}

impl Keys {
    pub fn extend(&mut self, src: Keys) {
        self.normal.extend(src.normal);
        self.insert.extend(src.insert);
        self.tree.extend(src.tree);
    }

    pub fn for_mode(&self, mode: Mode) -> Option<&HashMap<String, KeyAction>> {
        match mode {
            Mode::Normal => Some(&self.normal),
            Mode::Insert => Some(&self.insert),
            Mode::TreeFocus => Some(&self.tree),
            Mode::Command => None,
        }
    }
}

impl Config {
    /// Directory holding the user's config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("grove"))
    }

    /// Loads the defaults, extended by the user's config file when there is one
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();
        let Some(file) = Self::path().map(|dir| dir.join("config.toml")) else {
            return Ok(config);
        };
        if file.exists() {
            let toml = fs::read_to_string(&file)?;
            config.extend(Self::parse(&toml)?);
        }
        Ok(config)
    }

    /// Parses a config file on its own, without defaults for the keymaps
    pub fn parse(toml: &str) -> anyhow::Result<Self> {
        #[derive(Deserialize)]
        struct Partial {
            #[serde(default)]
            keys: Keys,
            log_file: Option<String>,
            tree_width: Option<u16>,
            show_tree: Option<bool>,
        }

        let partial: Partial = toml::from_str(toml)?;
        let defaults = Self::default();
        Ok(Self {
            keys: partial.keys,
            log_file: partial.log_file,
            tree_width: partial.tree_width.unwrap_or(defaults.tree_width),
            show_tree: partial.show_tree.unwrap_or(defaults.show_tree),
        })
    }

    pub fn extend(&mut self, src: Config) {
        self.keys.extend(src.keys);

        if let Some(log_file) = src.log_file {
            self.log_file = Some(log_file);
        }

        self.tree_width = src.tree_width;
        self.show_tree = src.show_tree;
    }

    /// Where log lines go; `grove.log` in the cache dir unless configured
    pub fn log_path(&self) -> PathBuf {
        if let Some(file) = &self.log_file {
            return PathBuf::from(file);
        }
        dirs::cache_dir()
            .map(|dir| dir.join("grove").join("grove.log"))
            .unwrap_or_else(|| PathBuf::from("grove.log"))
    }
}
