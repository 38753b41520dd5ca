//! Command routing.
//!
//! The [`Router`] owns the backends and is the single entry point of the
//! command layer: [`Router::parse`] recognises messages addressed to the bot and
//! [`Router::dispatch`] runs them.

use command_parser::Parser;
use log::{debug, warn};

use crate::{
    commands::{
        BotAction, CommandError, CommandResult, Interaction,
        actions::{
            handle_disconnect, handle_help, handle_ip, handle_server_status, handle_translation,
            handle_transliteration,
        },
        command::{CommandParseError, ParsedCommand, parse},
        reply::{Field, render},
        responses::{BOT_TITLE, ERROR_FIELD, format_error, format_operator_report},
        schema::{CommandKind, CommandSpec, find_command},
    },
    minecraft::GameServer,
    roles::RoleChecker,
    script::ScriptConverter,
    translator::Translator,
};

pub struct Router<T: Translator, S: ScriptConverter, G: GameServer, R: RoleChecker> {
    parser: Parser,
    translator: T,
    converter: S,
    server: G,
    roles: R,
    /// Address disclosed by the `ip` command
    server_host: String,
}

impl<T: Translator, S: ScriptConverter, G: GameServer, R: RoleChecker> Router<T, S, G, R> {
    /// Creates a router over the given backends.
    ///
    /// # Arguments
    ///
    /// * `translator` - Language detection and translation
    /// * `converter` - Japanese script conversion
    /// * `server` - Minecraft server probes
    /// * `roles` - Answers whether a user holds a role
    /// * `server_host` - Address disclosed by the `ip` command
    pub fn new(translator: T, converter: S, server: G, roles: R, server_host: &str) -> Self {
        Router {
            parser: Parser::new('!', '-'),
            translator,
            converter,
            server,
            roles,
            server_host: server_host.to_owned(),
        }
    }

    /// Parses a message body. `Err(NotForBot)` means the message must be ignored.
    pub fn parse(&self, body: &str) -> Result<ParsedCommand, CommandParseError> {
        parse(&self.parser, body)
    }

    /// Runs one interaction. Always produces a reply, failures included.
    ///
    /// Steps, each one stopping at the first failure:
    /// 1. Look the command up by name or alias
    /// 2. Check the user holds one of the required roles, if any
    /// 3. Validate the arguments against the command table
    /// 4. Run the handler
    ///
    /// # Returns
    ///
    /// The handler result, or a reply with a single `ERROR!` field describing
    /// the failure. An unreachable Minecraft server also yields a
    /// [`BotAction::NotifyOperator`] request.
    pub async fn dispatch(&self, interaction: &Interaction) -> CommandResult {
        let Some(spec) = find_command(&interaction.command) else {
            warn!("unknown command {}", interaction.command);
            return error_result(
                BOT_TITLE,
                &CommandError::UnknownCommand(interaction.command.clone()),
            );
        };

        match self.execute(spec, interaction).await {
            Ok(result) => result,
            Err(error) => {
                debug!("{} failed: {:?}", spec.name, error);
                error_result(spec.title, &error)
            }
        }
    }

    fn authorize(&self, spec: &CommandSpec, user_id: &str) -> Result<(), CommandError> {
        if spec.required_roles.is_empty()
            || spec
                .required_roles
                .iter()
                .any(|role| self.roles.has_role(user_id, role))
        {
            return Ok(());
        }

        warn!("{} is not allowed to use {}", user_id, spec.name);
        Err(CommandError::Forbidden)
    }

    async fn execute(
        &self,
        spec: &CommandSpec,
        interaction: &Interaction,
    ) -> Result<CommandResult, CommandError> {
        self.authorize(spec, &interaction.user_id)?;
        spec.validate(&interaction.arguments)?;

        let result: CommandResult = match spec.kind {
            CommandKind::Translate => handle_translation(&self.translator, interaction)
                .await?
                .into(),
            CommandKind::Transliterate => {
                handle_transliteration(&self.translator, &self.converter, interaction)
                    .await?
                    .into()
            }
            CommandKind::ServerStatus => handle_server_status(&self.server).await?.into(),
            CommandKind::Help => handle_help(),
            CommandKind::Ip => handle_ip(&self.server_host),
            CommandKind::Disconnect => handle_disconnect(&interaction.room_id),
        };

        Ok(result)
    }
}

/// Turns a failure into the reply shown to the user.
fn error_result(title: &str, error: &CommandError) -> CommandResult {
    let action = match error {
        CommandError::ServerUnreachable(detail) => {
            Some(BotAction::NotifyOperator(format_operator_report(detail)))
        }
        _ => None,
    };

    CommandResult {
        reply: render(title, vec![Field::block(ERROR_FIELD, format_error(error))]),
        action,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        commands::ArgumentIssue,
        minecraft::{MinecraftError, MockGameServer},
        roles::MockRoleChecker,
        script::MockScriptConverter,
        translator::{Language, MockTranslator, TranslatorError},
    };
    use mockall::predicate;

    type TestRouter = Router<MockTranslator, MockScriptConverter, MockGameServer, MockRoleChecker>;

    fn create_router(
        translator: MockTranslator,
        server: MockGameServer,
        roles: MockRoleChecker,
    ) -> TestRouter {
        Router::new(
            translator,
            MockScriptConverter::new(),
            server,
            roles,
            "203.0.113.7",
        )
    }

    fn create_interaction(command: &str, arguments: &[(&str, &str)]) -> Interaction {
        Interaction {
            command: command.to_owned(),
            arguments: arguments
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            room_id: "!general:example.com".to_owned(),
            user_id: "@ana:example.com".to_owned(),
            user_name: "Ana".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let router = create_router(
            MockTranslator::new(),
            MockGameServer::new(),
            MockRoleChecker::new(),
        );

        let result = router.dispatch(&create_interaction("games", &[])).await;

        assert_eq!(result.reply.title, "Chikis");
        assert_eq!(result.reply.fields.len(), 1);
        assert_eq!(result.reply.fields[0].name, "ERROR!");
        assert!(result.reply.fields[0].value.contains("`games`"));
        assert!(result.action.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_translation_by_alias() {
        let mut translator = MockTranslator::new();
        translator
            .expect_detect_language()
            .returning(|_| Ok("es".to_owned()));
        translator
            .expect_translate()
            .with(predicate::eq("Hola mundo"), predicate::eq(Language::English))
            .times(1)
            .returning(|_, _| Ok("Hello world".to_owned()));
        let router = create_router(translator, MockGameServer::new(), MockRoleChecker::new());

        let result = router
            .dispatch(&create_interaction("translation", &[("texto", "Hola mundo")]))
            .await;

        assert_eq!(result.reply.title, "Traducción");
        assert_eq!(
            result.reply.fields,
            vec![
                Field::block("Ana mandó:", "Hola mundo"),
                Field::block("que se traduce como:", "Hello world"),
            ]
        );
        assert!(result.action.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_translation_backend_failure() {
        let mut translator = MockTranslator::new();
        translator.expect_detect_language().returning(|_| {
            Err(TranslatorError::UnexpectedResponse(
                "quota exceeded for project 42".to_owned(),
            ))
        });
        translator.expect_translate().times(0);
        let router = create_router(translator, MockGameServer::new(), MockRoleChecker::new());

        let result = router
            .dispatch(&create_interaction("traduccion", &[("texto", "Hola mundo")]))
            .await;

        assert_eq!(result.reply.title, "Traducción");
        assert_eq!(
            result.reply.fields,
            vec![Field::block(
                "ERROR!",
                "No pude traducir tu mensaje, intenta más tarde."
            )]
        );
        assert!(result.action.is_none());
        assert!(!result.reply.to_markdown().contains("quota"));
    }

    #[tokio::test]
    async fn test_dispatch_translation_reaches_handler_with_key_value_text() {
        let mut translator = MockTranslator::new();
        translator
            .expect_detect_language()
            .returning(|_| Ok("es".to_owned()));
        translator
            .expect_translate()
            .with(predicate::eq("hola=adios"), predicate::eq(Language::English))
            .times(1)
            .returning(|_, _| Ok("hello=goodbye".to_owned()));
        let router = create_router(translator, MockGameServer::new(), MockRoleChecker::new());

        let Ok(parsed) = router.parse("!chikis traduccion hola=adios") else {
            panic!("message should be addressed to the bot");
        };
        let result = router
            .dispatch(&Interaction::new(
                parsed,
                "!general:example.com",
                "@ana:example.com",
                "Ana",
            ))
            .await;

        assert_eq!(
            result.reply.fields,
            vec![
                Field::block("Ana mandó:", "hola=adios"),
                Field::block("que se traduce como:", "hello=goodbye"),
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_invalid_language_never_reaches_backend() {
        let mut translator = MockTranslator::new();
        translator.expect_detect_language().times(0);
        translator.expect_translate().times(0);
        let router = create_router(translator, MockGameServer::new(), MockRoleChecker::new());

        let result = router
            .dispatch(&create_interaction(
                "traduccion",
                &[("texto", "Hola"), ("idioma", "klingon")],
            ))
            .await;

        assert_eq!(result.reply.title, "Traducción");
        assert_eq!(
            result.reply.fields[0].value,
            format_error(&CommandError::InvalidArgument {
                parameter: "idioma".to_owned(),
                reason: ArgumentIssue::NotAllowed("klingon".to_owned()),
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_too_long_japanese_text() {
        let mut translator = MockTranslator::new();
        translator.expect_detect_language().times(0);
        let router = create_router(translator, MockGameServer::new(), MockRoleChecker::new());
        let text = "あ".repeat(26);

        let result = router
            .dispatch(&create_interaction("traduccion_jap", &[("texto", text.as_str())]))
            .await;

        assert_eq!(result.reply.title, "Traducción JP");
        assert_eq!(result.reply.fields[0].name, "ERROR!");
    }

    #[tokio::test]
    async fn test_dispatch_digits_only_japanese_text() {
        let mut translator = MockTranslator::new();
        translator.expect_detect_language().times(0);
        let router = create_router(translator, MockGameServer::new(), MockRoleChecker::new());

        let result = router
            .dispatch(&create_interaction("traduccion_jap", &[("texto", "12345")]))
            .await;

        assert_eq!(
            result.reply.fields,
            vec![Field::block("ERROR!", "Lo que mandaste son puros dígitos.")]
        );
    }

    #[tokio::test]
    async fn test_dispatch_server_status_requires_role() {
        let mut roles = MockRoleChecker::new();
        roles.expect_has_role().times(3).returning(|_, _| false);
        let mut server = MockGameServer::new();
        server.expect_status().times(0);
        let router = create_router(MockTranslator::new(), server, roles);

        let result = router
            .dispatch(&create_interaction("server_status", &[]))
            .await;

        assert_eq!(result.reply.title, "Status del servidor de Minecraft");
        assert_eq!(
            result.reply.fields[0].value,
            "No tienes permiso para usar este comando."
        );
    }

    #[tokio::test]
    async fn test_dispatch_server_status_any_role_grants_access() {
        let mut roles = MockRoleChecker::new();
        roles
            .expect_has_role()
            .returning(|_, role| role == "arzobispo");
        let mut server = MockGameServer::new();
        server.expect_status().times(1).returning(|| {
            Ok(crate::minecraft::ServerStatus {
                online: 0,
                max: 20,
                version: "1.20.4".to_owned(),
                motd: String::new(),
            })
        });
        let router = create_router(MockTranslator::new(), server, roles);

        let result = router
            .dispatch(&create_interaction("server_status", &[]))
            .await;

        assert_eq!(
            result.reply.fields,
            vec![Field::block("Parece que el servidor esta vacío.", "")]
        );
    }

    #[tokio::test]
    async fn test_dispatch_unreachable_server_notifies_operator() {
        let mut roles = MockRoleChecker::new();
        roles.expect_has_role().returning(|_, _| true);
        let mut server = MockGameServer::new();
        server.expect_status().returning(|| {
            Err(MinecraftError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        });
        let router = create_router(MockTranslator::new(), server, roles);

        let result = router
            .dispatch(&create_interaction("server_status", &[]))
            .await;

        assert_eq!(result.reply.fields[0].name, "ERROR!");
        assert_eq!(
            result.action,
            Some(BotAction::NotifyOperator(
                "El servidor de Minecraft no responde: IO error: connection refused".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn test_dispatch_owner_commands() {
        let mut roles = MockRoleChecker::new();
        roles
            .expect_has_role()
            .with(predicate::eq("@ana:example.com"), predicate::eq("owner"))
            .returning(|_, _| true);
        let router = create_router(MockTranslator::new(), MockGameServer::new(), roles);

        let ip = router.dispatch(&create_interaction("ip", &[])).await;
        assert_eq!(ip.reply.fields[0].name, "La IP del servidor es: 203.0.113.7");
        assert!(matches!(ip.action, Some(BotAction::ExpireAfter(_))));

        let bye = router.dispatch(&create_interaction("bye", &[])).await;
        assert_eq!(
            bye.action,
            Some(BotAction::Disconnect("!general:example.com".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_dispatch_owner_commands_refused_to_others() {
        let mut roles = MockRoleChecker::new();
        roles.expect_has_role().returning(|_, _| false);
        let router = create_router(MockTranslator::new(), MockGameServer::new(), roles);

        let result = router.dispatch(&create_interaction("adios", &[])).await;

        assert!(result.action.is_none());
        assert_eq!(result.reply.fields[0].name, "ERROR!");
    }

    #[tokio::test]
    async fn test_dispatch_help_without_roles() {
        let mut roles = MockRoleChecker::new();
        roles.expect_has_role().times(0);
        let router = create_router(MockTranslator::new(), MockGameServer::new(), roles);

        let result = router.dispatch(&create_interaction("help", &[])).await;

        assert_eq!(result.reply.title, "Ayuda");
    }

    #[test]
    fn test_parse_through_router() {
        let router = create_router(
            MockTranslator::new(),
            MockGameServer::new(),
            MockRoleChecker::new(),
        );

        assert_eq!(router.parse("!chikis ip").unwrap().name, "ip");
        assert_eq!(
            router.parse("buenas"),
            Err(CommandParseError::NotForBot)
        );
    }
}
