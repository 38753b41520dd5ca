//! Declarative command table.
//!
//! Each [`CommandSpec`] lists the names it answers to, the roles allowed to use
//! it and the parameters it accepts. The router validates every interaction
//! against this table before any handler runs.

use std::collections::HashMap;

use crate::{
    commands::{ArgumentIssue, CommandError, command::TEXT_ARGUMENT},
    roles::OWNER_ROLE,
    translator::Language,
};

/// Which handler runs the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Translate,
    Transliterate,
    ServerStatus,
    Help,
    Ip,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Free text
    Text,
    /// One of the supported language codes
    Language,
}

#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Maximum length in characters
    pub max_length: Option<usize>,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Title of every reply of this command, errors included
    pub title: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    /// Holding any of these roles grants access; empty means everyone
    pub required_roles: &'static [&'static str],
    pub kind: CommandKind,
}

pub const MAX_JAPANESE_LENGTH: usize = 25;

pub static COMMANDS: [CommandSpec; 6] = [
    CommandSpec {
        name: "traduccion",
        aliases: &["translation"],
        title: "Traducción",
        description: "Traduce el texto. Sin idioma, el español pasa a inglés y lo demás a español.",
        params: &[
            ParamSpec {
                name: TEXT_ARGUMENT,
                kind: ParamKind::Text,
                required: false,
                max_length: None,
                description: "texto a traducir",
            },
            ParamSpec {
                name: "idioma",
                kind: ParamKind::Language,
                required: false,
                max_length: None,
                description: "código del idioma destino",
            },
        ],
        required_roles: &[],
        kind: CommandKind::Translate,
    },
    CommandSpec {
        name: "traduccion_jap",
        aliases: &["translit_japanese"],
        title: "Traducción JP",
        description: "Muestra el hiragana y el romaji de un texto en japonés, y su traducción.",
        params: &[ParamSpec {
            name: TEXT_ARGUMENT,
            kind: ParamKind::Text,
            required: true,
            max_length: Some(MAX_JAPANESE_LENGTH),
            description: "texto en japonés",
        }],
        required_roles: &[],
        kind: CommandKind::Transliterate,
    },
    CommandSpec {
        name: "server_status",
        aliases: &[],
        title: "Status del servidor de Minecraft",
        description: "Muestra quién está jugando en el servidor de Minecraft.",
        params: &[],
        required_roles: &["misionero", "arzobispo", "papa"],
        kind: CommandKind::ServerStatus,
    },
    CommandSpec {
        name: "ayuda",
        aliases: &["help"],
        title: "Ayuda",
        description: "Muestra este mensaje.",
        params: &[],
        required_roles: &[],
        kind: CommandKind::Help,
    },
    CommandSpec {
        name: "ip",
        aliases: &["host"],
        title: "IP del servidor",
        description: "Muestra la dirección del servidor durante unos segundos.",
        params: &[],
        required_roles: &[OWNER_ROLE],
        kind: CommandKind::Ip,
    },
    CommandSpec {
        name: "adios",
        aliases: &["die", "close", "bye", "cls", "cya"],
        title: "Adiós",
        description: "Borra el canal y desconecta al bot.",
        params: &[],
        required_roles: &[OWNER_ROLE],
        kind: CommandKind::Disconnect,
    },
];

/// Finds a command by its name or one of its aliases.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == name || spec.aliases.contains(&name))
}

fn invalid(parameter: &str, reason: ArgumentIssue) -> CommandError {
    CommandError::InvalidArgument {
        parameter: parameter.to_owned(),
        reason,
    }
}

impl CommandSpec {
    /// Checks `arguments` against the declared parameters.
    pub fn validate(&self, arguments: &HashMap<String, String>) -> Result<(), CommandError> {
        if let Some(unexpected) = arguments
            .keys()
            .find(|name| !self.params.iter().any(|param| param.name == name.as_str()))
        {
            return Err(invalid(unexpected, ArgumentIssue::Unexpected));
        }

        for param in self.params {
            let value = arguments.get(param.name).map(|v| v.trim());

            let Some(value) = value.filter(|v| !v.is_empty()) else {
                if param.required {
                    return Err(invalid(param.name, ArgumentIssue::Missing));
                }
                continue;
            };

            if let Some(max) = param.max_length
                && value.chars().count() > max
            {
                return Err(invalid(param.name, ArgumentIssue::TooLong { max }));
            }

            if param.kind == ParamKind::Language && Language::from_code(value).is_none() {
                return Err(invalid(
                    param.name,
                    ArgumentIssue::NotAllowed(value.to_owned()),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("traduccion").unwrap().kind, CommandKind::Translate);
        assert_eq!(find_command("translation").unwrap().kind, CommandKind::Translate);
        assert_eq!(
            find_command("translit_japanese").unwrap().kind,
            CommandKind::Transliterate
        );
        assert_eq!(find_command("cya").unwrap().kind, CommandKind::Disconnect);
        assert!(find_command("games").is_none());
    }

    #[test]
    fn test_names_and_aliases_are_unique() {
        let mut names: Vec<&str> = COMMANDS
            .iter()
            .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_validate_accepts_declared_arguments() {
        let spec = find_command("traduccion").unwrap();

        assert_eq!(
            spec.validate(&args(&[("texto", "Hola"), ("idioma", "zh-CN")])),
            Ok(())
        );
        assert_eq!(spec.validate(&args(&[])), Ok(()));
    }

    #[test]
    fn test_validate_rejects_unknown_language() {
        let spec = find_command("traduccion").unwrap();

        assert_eq!(
            spec.validate(&args(&[("texto", "Hola"), ("idioma", "xx")])),
            Err(CommandError::InvalidArgument {
                parameter: "idioma".to_owned(),
                reason: ArgumentIssue::NotAllowed("xx".to_owned()),
            })
        );
    }

    #[test]
    fn test_validate_rejects_unexpected_argument() {
        let spec = find_command("server_status").unwrap();

        assert_eq!(
            spec.validate(&args(&[("texto", "hola")])),
            Err(CommandError::InvalidArgument {
                parameter: "texto".to_owned(),
                reason: ArgumentIssue::Unexpected,
            })
        );
    }

    #[test]
    fn test_validate_missing_required_text() {
        let spec = find_command("traduccion_jap").unwrap();
        let expected = Err(CommandError::InvalidArgument {
            parameter: "texto".to_owned(),
            reason: ArgumentIssue::Missing,
        });

        assert_eq!(spec.validate(&args(&[])), expected);
        assert_eq!(spec.validate(&args(&[("texto", "   ")])), expected);
    }

    #[test]
    fn test_validate_max_length_counts_characters() {
        let spec = find_command("traduccion_jap").unwrap();

        let at_limit = "猫".repeat(25);
        let over_limit = "猫".repeat(26);

        // 25 multi-byte characters are accepted
        assert_eq!(spec.validate(&args(&[("texto", at_limit.as_str())])), Ok(()));
        assert_eq!(
            spec.validate(&args(&[("texto", over_limit.as_str())])),
            Err(CommandError::InvalidArgument {
                parameter: "texto".to_owned(),
                reason: ArgumentIssue::TooLong { max: 25 },
            })
        );
    }
}
