use crate::builtins;
use crate::error::ShellError;

/// A builtin receives its parameters without the command name.
pub type BuiltinRunner = fn(&[String]) -> Result<(), ShellError>;

pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub run: BuiltinRunner,
}

/// Searched front to back, so earlier entries win.
pub const BUILTINS: &[CommandInfo] = &[
    builtins::cd::COMMAND_INFO_CD,
    builtins::cd::COMMAND_INFO_PWD,
];

pub fn find_command(name: &str) -> Option<&'static CommandInfo> {
    BUILTINS.iter().find(|cmd| cmd.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_cd_and_pwd() {
        assert_eq!(find_command("cd").map(|c| c.name), Some("cd"));
        assert_eq!(find_command("pwd").map(|c| c.name), Some("pwd"));
    }

    #[test]
    fn test_everything_else_is_external() {
        assert!(find_command("ls").is_none());
        assert!(find_command("exit").is_none());
        assert!(find_command("CD").is_none());
        assert!(find_command("").is_none());
    }
}
