use crate::{
    action::{Action, TreeOp},
    error::{EditorError, Result},
};

#[derive(Debug, PartialEq)]
pub enum CommandFlag {
    Force,
}

#[derive(Debug, PartialEq)]
pub struct ParsedCommand<'a> {
    pub name: &'a str,
    pub arg: Option<&'a str>,
    pub flags: Vec<CommandFlag>,
}

impl ParsedCommand<'_> {
    pub fn is_forced(&self) -> bool {
        self.flags.contains(&CommandFlag::Force)
    }
}

/// Interprets a submitted `:` command line.
///
/// This only decides what the line means; whether it can succeed (a dirty
/// buffer on `q`, a missing file name on `w`) is checked when the action runs.
pub fn parse(input: &str) -> Result<Action> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Action::Noop);
    }

    let parsed = split(input);
    let unknown = || EditorError::UnknownCommand(input.to_string());
    let force = parsed.is_forced();

    let action = match (parsed.name, parsed.arg) {
        ("q", None) => Action::Quit(force),
        ("w", arg) if !force => write_action(arg),
        ("wq", arg) => Action::Multiple(vec![write_action(arg), Action::Quit(force)]),
        ("e", Some(file)) if !force => Action::OpenFile(file.to_string()),
        ("e", None) if !force => return Err(EditorError::MissingArgument("e".to_string())),
        ("bn", None) if !force => Action::NextBuffer,
        ("bp", None) if !force => Action::PreviousBuffer,
        ("bd", None) => Action::CloseBuffer(force),
        ("tt", None) if !force => Action::Tree(TreeOp::Toggle),
        _ => return Err(unknown()),
    };

    Ok(action)
}

fn write_action(arg: Option<&str>) -> Action {
    match arg {
        Some(file) => Action::SaveAs(file.to_string()),
        None => Action::Save,
    }
}

fn split(input: &str) -> ParsedCommand<'_> {
    let (head, arg) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|s| !s.is_empty())),
        None => (input, None),
    };
    let (flags, name) = parse_flags(head);

    ParsedCommand { name, arg, flags }
}

fn parse_flags(input: &str) -> (Vec<CommandFlag>, &str) {
    match input.strip_suffix('!') {
        Some(name) => (vec![CommandFlag::Force], name),
        None => (vec![], input),
    }
}
