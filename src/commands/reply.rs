//! Structured replies returned by every command.
//!
//! A [`Reply`] is a title followed by ordered name/value fields. Handlers build
//! replies with [`render`]; the bot turns them into Markdown with
//! [`Reply::to_markdown`] right before delivery.

/// How a field is laid out when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// Shares a line with neighbouring inline fields.
    Inline,
    /// Always starts on its own line.
    Block,
}

/// One named entry of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub display: Display,
}

impl Field {
    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
            display: Display::Block,
        }
    }

    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
            display: Display::Inline,
        }
    }
}

/// A titled list of fields, the only shape handed back to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub title: String,
    pub fields: Vec<Field>,
}

/// Builds a reply. Field order is preserved as given.
pub fn render(title: &str, fields: Vec<Field>) -> Reply {
    Reply {
        title: title.to_owned(),
        fields,
    }
}

impl Reply {
    /// Renders the reply as Matrix flavoured Markdown.
    ///
    /// The title becomes a heading. Block fields put their bold name on one line
    /// and their value on the next; consecutive inline fields are joined on a
    /// single line as `**name**: value`. Empty values are omitted.
    pub fn to_markdown(&self) -> String {
        let mut lines: Vec<String> = vec![format!("### {}", self.title)];
        let mut inline_run: Vec<String> = Vec::new();

        for field in &self.fields {
            match field.display {
                Display::Inline => {
                    inline_run.push(format!("**{}**: {}", field.name, field.value));
                }
                Display::Block => {
                    if !inline_run.is_empty() {
                        lines.push(inline_run.join(" · "));
                        inline_run.clear();
                    }
                    lines.push(format!("**{}**", field.name));
                    if !field.value.is_empty() {
                        lines.push(field.value.clone());
                    }
                }
            }
        }

        if !inline_run.is_empty() {
            lines.push(inline_run.join(" · "));
        }

        lines.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_title_and_field_order() {
        let reply = render(
            "Traducción",
            vec![
                Field::block("Ana mandó:", "Hola mundo"),
                Field::block("que se traduce como:", "Hello world"),
            ],
        );

        assert_eq!(reply.title, "Traducción");
        assert_eq!(reply.fields.len(), 2);
        assert_eq!(reply.fields[0].name, "Ana mandó:");
        assert_eq!(reply.fields[1].value, "Hello world");
    }

    #[test]
    fn test_render_is_pure() {
        let fields = vec![Field::inline("a", "1"), Field::block("b", "")];
        let first = render("t", fields.clone());
        let second = render("t", fields);

        assert_eq!(first, second);
    }

    #[test]
    fn test_render_accepts_no_fields() {
        let reply = render("Vacío", vec![]);

        assert!(reply.fields.is_empty());
        assert_eq!(reply.to_markdown(), "### Vacío");
    }

    #[test]
    fn test_to_markdown_block_fields() {
        let reply = render(
            "Traducción",
            vec![
                Field::block("Ana mandó:", "Hola"),
                Field::block("que se traduce como:", "Hello"),
            ],
        );

        assert_eq!(
            reply.to_markdown(),
            "### Traducción\n\n**Ana mandó:**\n\nHola\n\n**que se traduce como:**\n\nHello"
        );
    }

    #[test]
    fn test_to_markdown_joins_inline_runs() {
        let reply = render(
            "Traducción JP",
            vec![
                Field::block("Japonés", "猫"),
                Field::inline("Hiragana", "ねこ"),
                Field::inline("Romaji", "neko"),
                Field::block("------------", ""),
            ],
        );

        assert_eq!(
            reply.to_markdown(),
            "### Traducción JP\n\n**Japonés**\n\n猫\n\n**Hiragana**: ねこ · **Romaji**: neko\n\n**------------**"
        );
    }

    #[test]
    fn test_to_markdown_trailing_inline_fields() {
        let reply = render("t", vec![Field::inline("a", "1"), Field::inline("b", "2")]);

        assert_eq!(reply.to_markdown(), "### t\n\n**a**: 1 · **b**: 2");
    }
}
