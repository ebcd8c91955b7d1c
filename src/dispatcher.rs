use std::collections::HashMap;

use crate::{
    action::Action,
    command,
    config::{KeyAction, Keys},
    key::Key,
    mode::{Mode, ModeState},
};

/// Turns key presses into actions.
///
/// Resolution only reads the keymaps and updates the pending keys or command
/// line held in `ModeState`; it never touches a buffer. The editor applies the
/// returned action.
#[derive(Debug)]
pub struct Dispatcher {
    keys: Keys,
}

impl Dispatcher {
    pub fn new(keys: Keys) -> Self {
        Self { keys }
    }

    pub fn handle_key(&self, state: &mut ModeState, key: Key) -> Action {
        match state.mode() {
            Mode::Command => handle_command_key(state, key),
            mode => self.handle_mapped_key(state, mode, key),
        }
    }

    fn handle_mapped_key(&self, state: &mut ModeState, mode: Mode, key: Key) -> Action {
        let Some(mappings) = self.keys.for_mode(mode) else {
            return Action::Noop;
        };
        let name = key.name();

        let mut pending = state.take_pending();
        if !pending.is_empty() {
            if let Some(KeyAction::Nested(nested)) = lookup(mappings, &pending) {
                match nested.get(&name) {
                    Some(KeyAction::Nested(_)) => {
                        pending.push(name);
                        for k in pending {
                            state.push_pending(k);
                        }
                        return Action::Noop;
                    }
                    Some(ka) => return ka.clone().into(),
                    // no match: the key starts over as if nothing was pending
                    None => {}
                }
            }
        }

        match mappings.get(&name) {
            Some(KeyAction::Nested(_)) => {
                state.push_pending(name);
                Action::Noop
            }
            Some(ka) => ka.clone().into(),
            None => match (mode, key) {
                (Mode::Insert, Key::Char(c)) => Action::InsertCharAtCursorPos(c),
                _ => Action::Noop,
            },
        }
    }
}

fn lookup<'a>(mappings: &'a HashMap<String, KeyAction>, keys: &[String]) -> Option<&'a KeyAction> {
    let (first, rest) = keys.split_first()?;
    let mut current = mappings.get(first)?;
    for key in rest {
        let KeyAction::Nested(nested) = current else {
            return None;
        };
        current = nested.get(key)?;
    }
    Some(current)
}

fn handle_command_key(state: &mut ModeState, key: Key) -> Action {
    let leave = Action::EnterMode(Mode::Normal);
    match key {
        Key::Esc => leave,
        Key::Enter => match command::parse(state.command_line()) {
            Ok(Action::Noop) => leave,
            Ok(action) => Action::Multiple(vec![leave, action]),
            Err(err) => Action::Multiple(vec![leave, Action::Error(err.to_string())]),
        },
        Key::Backspace => {
            if state.pop_command_char() {
                Action::Noop
            } else {
                leave
            }
        }
        Key::Char(c) => {
            state.push_command_char(c);
            Action::Noop
        }
        _ => Action::Noop,
    }
}
