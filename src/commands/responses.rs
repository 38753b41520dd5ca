//! User facing texts.
//!
//! Every sentence the bot writes lives here so handlers only assemble fields.

use crate::{
    commands::{ArgumentIssue, CommandError, ScriptIssue, schema::CommandSpec},
    translator::Language,
};

pub const BOT_TITLE: &str = "Chikis";
pub const ERROR_FIELD: &str = "ERROR!";
pub const SEPARATOR_FIELD: &str = "------------";

pub fn format_greeting() -> String {
    "Buenas, sean libres de usar mis comandos. Cuando me desconectan, elimino todo lo que hayan mandado por este canal."
        .to_owned()
}

pub fn format_goodbye() -> String {
    "Adios, nos vemos. Borrando todo lo que mandaron...".to_owned()
}

pub fn format_server_ip(host: &str) -> String {
    format!("La IP del servidor es: {}", host)
}

pub fn format_nothing_sent(user_name: &str) -> String {
    format!("No mandaste nada, {}.", user_name)
}

pub fn format_user_sent(user_name: &str) -> String {
    format!("{} mandó:", user_name)
}

pub fn format_translated_as() -> String {
    "que se traduce como:".to_owned()
}

pub fn format_server_empty() -> String {
    "Parece que el servidor esta vacío.".to_owned()
}

pub fn format_players_online(online: u32) -> String {
    format!("Están jugando: ({})", online)
}

pub fn format_operator_report(detail: &str) -> String {
    format!("El servidor de Minecraft no responde: {}", detail)
}

pub fn format_help(commands: &[CommandSpec]) -> String {
    let commands_md = commands
        .iter()
        .map(|spec| {
            let params = spec
                .params
                .iter()
                .map(|param| match param.required {
                    true => format!(" <{}>", param.name),
                    false => format!(" [{}]", param.name),
                })
                .collect::<String>();
            format!("- `{}{}`: {}", spec.name, params, spec.description)
        })
        .collect::<Vec<String>>()
        .join("\n");

    let languages = Language::codes().join(", ");

    format!(
        "Comandos:\n\n{}\n\nUso: `!chikis traduccion idioma=en Hola`. Idiomas: {}",
        commands_md, languages
    )
}

pub fn format_error(error: &CommandError) -> String {
    match error {
        CommandError::UnknownCommand(name) => format!(
            "No conozco el comando `{}`. Escribe `!chikis ayuda` para ver los comandos.",
            name
        ),
        CommandError::InvalidArgument { parameter, reason } => match reason {
            ArgumentIssue::Missing => format!("Falta el parámetro `{}`.", parameter),
            ArgumentIssue::TooLong { max } => format!(
                "El parámetro `{}` no puede tener más de {} caracteres.",
                parameter, max
            ),
            ArgumentIssue::NotAllowed(value) => format!(
                "`{}` no es un valor válido para `{}`. Valores posibles: {}",
                value,
                parameter,
                Language::codes().join(", ")
            ),
            ArgumentIssue::Unexpected => format!("No conozco el parámetro `{}`.", parameter),
        },
        CommandError::InvalidScript(ScriptIssue::NotJapanese) => {
            "Lo que mandaste no está en Japonés. Recuerda utilizar el alfabeto del lenguaje."
                .to_owned()
        }
        CommandError::InvalidScript(ScriptIssue::DigitsOnly) => {
            "Lo que mandaste son puros dígitos.".to_owned()
        }
        CommandError::TranslationBackend => {
            "No pude traducir tu mensaje, intenta más tarde.".to_owned()
        }
        CommandError::ServerUnreachable(_) => {
            "No pude contactar al servidor de Minecraft. Ya le avisé al administrador.".to_owned()
        }
        CommandError::Forbidden => "No tienes permiso para usar este comando.".to_owned(),
    }
}
