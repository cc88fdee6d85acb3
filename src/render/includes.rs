//! `{{ inc('name') }}` expansion

use crate::env::Environment;
use crate::escape::escape;
use crate::parser::{scan, Directive};

use super::{splice, Renderer, Slots};

impl Renderer<'_> {
    /// Replace every include tag with its rendered content
    ///
    /// Missing content becomes an HTML comment naming the include.
    pub(super) fn expand_includes(
        &self,
        template: &str,
        env: &Environment,
        depth: usize,
        slots: &mut Slots,
    ) -> String {
        let replacements: Vec<_> = scan(template)
            .into_iter()
            .filter_map(|d| match d.node {
                Directive::Include { name } => {
                    let rendered = match self.source.fetch(&name) {
                        Some(content) => self.render_frame(&content, env, depth + 1, slots),
                        None => {
                            tracing::warn!(include = %name, "include not found");
                            missing_include(&name)
                        }
                    };
                    Some((d.span, rendered))
                }
                _ => None,
            })
            .collect();

        if replacements.is_empty() {
            return template.to_string();
        }
        splice(template, replacements)
    }
}

/// Marker left in place of an include that could not be fetched
fn missing_include(name: &str) -> String {
    format!("<!-- Include not found: {} -->", escape(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::source::MemorySource;

    fn render(source: &MemorySource, template: &str, env: &Environment) -> String {
        let config = RenderConfig::default();
        Renderer::new(source, &config).render(template, env)
    }

    #[test]
    fn test_include_is_rendered_with_current_environment() {
        let source = MemorySource::new().with_template("greet", "Hello {{ name }}");
        let env = Environment::new().with("name", "Ada");
        assert_eq!(render(&source, "{{ inc('greet') }}!", &env), "Hello Ada!");
        assert_eq!(render(&source, r#"{{inc("greet")}}"#, &env), "Hello Ada");
    }

    #[test]
    fn test_nested_includes() {
        let source = MemorySource::new()
            .with_template("outer", "[{{ inc('inner') }}]")
            .with_template("inner", "{% if on %}on{% else %}off{% endif %}");
        let env = Environment::new().with("on", true);
        assert_eq!(render(&source, "{{ inc('outer') }}", &env), "[on]");
    }

    #[test]
    fn test_missing_include_leaves_escaped_marker() {
        let source = MemorySource::new();
        let out = render(&source, "a {{ inc('<nope>') }} b", &Environment::new());
        assert_eq!(out, "a <!-- Include not found: &lt;nope&gt; --> b");
    }
}
