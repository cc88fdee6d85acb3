//! Stencil - a small HTML-safe templating engine
//!
//! Templates mix literal text with four kinds of directive:
//!
//! - `{{ user.name }}` interpolates a value, HTML-escaped
//! - `{{ inc('header') }}` renders another template in place, before loops run
//! - `{% for item in items %}...{% endfor %}` repeats its body per entry,
//!   with `loop.index`, `loop.first`, `loop.last` and `loop.parent` in scope
//! - `{% if cond %}...{% elseif cond %}...{% else %}...{% endif %}` picks a branch
//!
//! Rendering never fails. Unknown variables are empty, unparseable conditions
//! are false, missing includes leave an HTML comment, and malformed tags stay
//! in the output as text. Use [`lint`] to find those problems ahead of time.
//!
//! # Example
//!
//! ```rust
//! use stencil::{Engine, MemorySource};
//!
//! let source = MemorySource::new().with_template("header", "<h1>{{ title }}</h1>");
//! let mut engine = Engine::new(source);
//! engine.assign("title", "Home").assign("items", vec!["a", "<b>"]);
//!
//! let html = engine.render("{{ inc('header') }}{% for item in items %}<li>{{ item }}</li>{% endfor %}");
//! assert_eq!(html, "<h1>Home</h1><li>a</li><li>&lt;b&gt;</li>");
//! ```

pub mod config;
pub mod data;
pub mod env;
pub mod error;
pub mod escape;
pub mod eval;
pub mod lint;
pub mod parser;
pub mod render;
pub mod source;
pub mod value;

pub use config::RenderConfig;
pub use env::{Environment, LoopMetadata};
pub use error::{Diagnostic, EngineError};
pub use escape::{escape, unescape};
pub use lint::lint;
pub use render::Renderer;
pub use source::{FileSource, MemorySource, TemplateSource};
pub use value::Value;

/// Render `template` against `env` with default limits and no include source
///
/// Include tags render as "not found" markers.
///
/// ```rust
/// use stencil::{render, Environment};
///
/// let env = Environment::new().with("name", "Ada");
/// assert_eq!(render("Hello {{ name }}!", &env), "Hello Ada!");
/// ```
pub fn render(template: &str, env: &Environment) -> String {
    let source = MemorySource::new();
    let config = RenderConfig::default();
    Renderer::new(&source, &config).render(template, env)
}

/// A template source plus the variables every render starts from
///
/// Rendering borrows the engine immutably; each call works on its own copy
/// of the environment, so one engine can serve concurrent renders.
#[derive(Debug, Clone)]
pub struct Engine<S> {
    source: S,
    globals: Environment,
    config: RenderConfig,
}

impl<S: TemplateSource> Engine<S> {
    /// Create an engine with default limits
    pub fn new(source: S) -> Self {
        Self {
            source,
            globals: Environment::new(),
            config: RenderConfig::default(),
        }
    }

    /// Set the render configuration
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the starting environment
    pub fn with_globals(mut self, globals: Environment) -> Self {
        self.globals = globals;
        self
    }

    /// Bind a variable for every subsequent render
    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.globals.insert(key, value);
        self
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render template text against the assigned variables
    pub fn render(&self, template: &str) -> String {
        self.render_with(template, &self.globals)
    }

    /// Render template text against an explicit environment
    pub fn render_with(&self, template: &str, env: &Environment) -> String {
        Renderer::new(&self.source, &self.config).render(template, env)
    }

    /// Fetch the template `name` from the source and render it
    pub fn load(&self, name: &str) -> Result<String, EngineError> {
        let template = self
            .source
            .fetch(name)
            .ok_or_else(|| EngineError::TemplateNotFound {
                name: name.to_string(),
                location: self.source.locate(name),
            })?;
        Ok(self.render(&template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine() -> Engine<MemorySource> {
        let source = MemorySource::new()
            .with_template("page", "<h1>{{ title }}</h1>{{ inc('footer') }}")
            .with_template("footer", "<footer>{{ year }}</footer>");
        Engine::new(source)
    }

    #[test]
    fn test_assign_chains() {
        let mut engine = engine();
        engine.assign("title", "Home").assign("year", 2024);
        assert_eq!(engine.globals().len(), 2);
        assert_eq!(
            engine.load("page").unwrap(),
            "<h1>Home</h1><footer>2024</footer>"
        );
    }

    #[test]
    fn test_load_missing_template_errors() {
        let result = engine().load("nope");
        match result {
            Err(EngineError::TemplateNotFound { name, .. }) => assert_eq!(name, "nope"),
            other => panic!("Expected TemplateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_render_with_does_not_touch_globals() {
        let mut engine = engine();
        engine.assign("title", "Global");
        let env = Environment::new().with("title", "Local");
        assert_eq!(engine.render_with("{{ title }}", &env), "Local");
        assert_eq!(engine.render("{{ title }}"), "Global");
    }

    #[test]
    fn test_render_free_function_has_no_includes() {
        assert_eq!(
            render("{{ inc('x') }}", &Environment::new()),
            "<!-- Include not found: x -->"
        );
    }

    #[test]
    fn test_with_config_applies_limits() {
        let source = MemorySource::new().with_template("loop", "{{ inc('loop') }}");
        let engine = Engine::new(source).with_config(RenderConfig::new().with_max_depth(1));
        assert_eq!(engine.config().max_depth, 1);
        assert_eq!(engine.load("loop").unwrap(), "{{ inc('loop') }}");
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine<MemorySource>>();
        assert_send_sync::<Engine<FileSource>>();
    }
}
