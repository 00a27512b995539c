#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Toggle,
    Quit,
}

/// Map one line of operator input to a command. Case-insensitive.
pub fn parse_command(line: &str) -> Option<ControlCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(ControlCommand::Pause),
        "r" | "resume" | "live" => Some(ControlCommand::Resume),
        "t" | "toggle" | "" => Some(ControlCommand::Toggle),
        "q" | "quit" | "exit" => Some(ControlCommand::Quit),
        _ => None,
    }
}

impl ControlCommand {
    /// Running flag after applying this command, `None` for `Quit`.
    pub fn apply(self, running: bool) -> Option<bool> {
        match self {
            Self::Pause => Some(false),
            Self::Resume => Some(true),
            Self::Toggle => Some(!running),
            Self::Quit => None,
        }
    }
}
