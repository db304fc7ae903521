// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Keyword registration and dispatch
//!
//! A host type declares its keywords by implementing [`KeywordLibrary`]: an
//! explicit table pairing each handler with the template that names it.
//! [`register`] binds those handlers to one instance of the host and compiles
//! every template once. [`Registry::dispatch`] then resolves an instruction
//! to exactly one keyword and calls it with the captured arguments.

use crate::error::{BoxError, Error, Result};
use crate::template::{CompiledPattern, LiteralMode, Template};
use diagnostics::*;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Handler for a keyword declared on host type `T`
///
/// Receives one argument per placeholder, in template order. Arguments are
/// the raw captured text; any conversion is up to the handler.
pub type Handler<T> = fn(&T, &[String]) -> std::result::Result<Value, BoxError>;

/// A handler bound to its receiver
type BoundHandler = Arc<dyn Fn(&[String]) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// A keyword declared by a [`KeywordLibrary`]
pub struct Keyword<T> {
    /// Method name, for listings and error messages
    pub name: &'static str,
    /// Instruction template, e.g. `"Add ${first} and ${second}"`
    pub template: &'static str,
    pub handler: Handler<T>,
}

impl<T> Keyword<T> {
    #[must_use]
    pub fn new(name: &'static str, template: &'static str, handler: Handler<T>) -> Self {
        Self {
            name,
            template,
            handler,
        }
    }
}

// Manual impls so `T` need not be Clone or Debug
impl<T> Clone for Keyword<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Keyword<T> {}

impl<T> fmt::Debug for Keyword<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyword")
            .field("name", &self.name)
            .field("template", &self.template)
            .finish()
    }
}

/// A type whose methods can be invoked by instruction text
///
/// Methods that do not appear in [`KeywordLibrary::keywords`] are never
/// dispatched to.
pub trait KeywordLibrary: Send + Sync + 'static {
    fn keywords() -> Vec<Keyword<Self>>
    where
        Self: Sized;
}

/// A keyword bound to a receiver, with its compiled pattern
pub struct RegisteredKeyword {
    name: String,
    template: Template,
    pattern: CompiledPattern,
    handler: BoundHandler,
}

impl RegisteredKeyword {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Call the handler directly, bypassing pattern matching
    pub fn invoke(&self, args: &[String]) -> std::result::Result<Value, BoxError> {
        (self.handler)(args)
    }
}

impl fmt::Debug for RegisteredKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredKeyword")
            .field("name", &self.name)
            .field("template", &self.template.as_str())
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// A keyword whose pattern matched an instruction, with the captured arguments
#[derive(Debug)]
pub struct Match<'a> {
    keyword: &'a RegisteredKeyword,
    instruction: &'a str,
    args: Vec<String>,
}

impl<'a> Match<'a> {
    #[must_use]
    pub fn keyword(&self) -> &'a RegisteredKeyword {
        self.keyword
    }

    /// Captured arguments, one per placeholder
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Invoke the matched keyword with its captured arguments
    pub fn invoke(self) -> Result<Value> {
        self.keyword
            .invoke(&self.args)
            .map_err(|source| Error::Invocation {
                keyword: self.keyword.name.clone(),
                instruction: self.instruction.to_string(),
                source,
            })
    }
}

/// The set of keywords an instruction is resolved against
///
/// Keywords keep registration order. A registry is not modified by
/// dispatch and can be shared across threads once built.
pub struct Registry {
    mode: LiteralMode,
    keywords: Vec<RegisteredKeyword>,
}

impl Registry {
    #[must_use]
    pub fn new(mode: LiteralMode) -> Self {
        Self {
            mode,
            keywords: Vec::new(),
        }
    }

    /// Register every keyword of `library`, bound to that one instance
    pub fn register<T: KeywordLibrary>(&mut self, library: T) -> Result<&mut Self> {
        self.register_shared(Arc::new(library))
    }

    /// Like [`Registry::register`], for an instance the caller also keeps
    pub fn register_shared<T: KeywordLibrary>(&mut self, library: Arc<T>) -> Result<&mut Self> {
        let declared = T::keywords();
        let library_name = std::any::type_name::<T>();

        // Compile everything first so a bad template leaves the registry untouched
        let mut compiled = Vec::with_capacity(declared.len());
        for keyword in declared {
            let receiver = Arc::clone(&library);
            let handler = keyword.handler;
            compiled.push(self.compile_keyword(
                keyword.name,
                keyword.template,
                Arc::new(move |args: &[String]| handler(receiver.as_ref(), args)),
            )?);
        }

        log_info!(
            "Registered {count} keywords from {library}",
            count: compiled.len(),
            library: library_name
        );
        self.keywords.extend(compiled);
        Ok(self)
    }

    /// Register a free-standing callable under `template`
    pub fn add<F>(&mut self, name: &str, template: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&[String]) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        let keyword = self.compile_keyword(name, template, Arc::new(handler))?;
        self.keywords.push(keyword);
        Ok(self)
    }

    fn compile_keyword(
        &self,
        name: &str,
        template: &str,
        handler: BoundHandler,
    ) -> Result<RegisteredKeyword> {
        let template = Template::new(template);
        let pattern = template.compile(self.mode)?;
        log_debug!(
            "Compiled keyword {name} to {pattern}",
            name: name,
            pattern: pattern.as_str()
        );
        Ok(RegisteredKeyword {
            name: name.to_string(),
            template,
            pattern,
            handler,
        })
    }

    #[must_use]
    pub fn mode(&self) -> LiteralMode {
        self.mode
    }

    #[must_use]
    pub fn keywords(&self) -> &[RegisteredKeyword] {
        &self.keywords
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Every keyword whose pattern matches the whole instruction
    #[must_use]
    pub fn matches<'a>(&'a self, instruction: &'a str) -> Vec<Match<'a>> {
        self.keywords
            .iter()
            .filter_map(|keyword| {
                keyword.pattern.captures(instruction).map(|args| Match {
                    keyword,
                    instruction,
                    args,
                })
            })
            .collect()
    }

    /// The single keyword matching `instruction`
    ///
    /// Fails with [`Error::AmbiguousOrUnmatchedInstruction`] when no keyword
    /// or more than one keyword matches.
    pub fn resolve<'a>(&'a self, instruction: &'a str) -> Result<Match<'a>> {
        let mut matches = self.matches(instruction);
        if matches.len() == 1 {
            if let Some(found) = matches.pop() {
                log_debug!(
                    "Resolved {instruction} to {keyword}",
                    instruction: instruction,
                    keyword: found.keyword.name()
                );
                return Ok(found);
            }
        }

        let candidates: Vec<String> = matches
            .iter()
            .map(|m| m.keyword.name.clone())
            .collect();
        log_warn!(
            "Instruction {instruction} matched {count} keywords",
            instruction: instruction,
            count: candidates.len()
        );
        Err(Error::AmbiguousOrUnmatchedInstruction {
            instruction: instruction.to_string(),
            candidates,
        })
    }

    /// Resolve `instruction` and invoke the matching keyword
    pub fn dispatch(&self, instruction: &str) -> Result<Value> {
        self.resolve(instruction)?.invoke()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(LiteralMode::default())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("mode", &self.mode)
            .field("keywords", &self.keywords)
            .finish()
    }
}

/// Build a registry holding the keywords of one library instance
pub fn register<T: KeywordLibrary>(library: T, mode: LiteralMode) -> Result<Registry> {
    let mut registry = Registry::new(mode);
    registry.register(library)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts invocations so tests can see which handler ran
    #[derive(Default)]
    struct Greeter {
        calls: AtomicUsize,
    }

    impl Greeter {
        fn greet(&self, args: &[String]) -> std::result::Result<Value, BoxError> {
            _ = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::String(format!("Hello, {}!", args[0])))
        }

        fn wave(&self, _args: &[String]) -> std::result::Result<Value, BoxError> {
            _ = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::String("*waves*".to_string()))
        }

        fn greet_twice(&self, args: &[String]) -> std::result::Result<Value, BoxError> {
            Ok(Value::String(format!("Hello, {} and {}!", args[0], args[1])))
        }

        fn undeclared(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl KeywordLibrary for Greeter {
        fn keywords() -> Vec<Keyword<Self>> {
            vec![
                Keyword::new("greet", "Greet ${name}", Self::greet),
                Keyword::new("wave", "Wave", Self::wave),
                Keyword::new("greet_twice", "Greet ${first} and ${second}", Self::greet_twice),
            ]
        }
    }

    #[test]
    fn test_register_preserves_declaration_order() {
        let registry = register(Greeter::default(), LiteralMode::Escaped).unwrap();
        let names: Vec<_> = registry.keywords().iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["greet", "wave", "greet_twice"]);
        assert_eq!(registry.keywords()[2].pattern().arity(), 2);
    }

    #[test]
    fn test_dispatch_invokes_bound_receiver() {
        let greeter = Arc::new(Greeter::default());
        let mut registry = Registry::new(LiteralMode::Escaped);
        registry.register_shared(Arc::clone(&greeter)).unwrap();

        assert_eq!(
            registry.dispatch("Greet Ada").unwrap(),
            Value::String("Hello, Ada!".to_string())
        );
        assert_eq!(
            registry.dispatch("Wave").unwrap(),
            Value::String("*waves*".to_string())
        );
        assert_eq!(greeter.undeclared(), 2);
    }

    #[test]
    fn test_overlapping_templates_are_ambiguous() {
        // "Greet ${name}" also matches "Greet Ada and Grace"
        let registry = register(Greeter::default(), LiteralMode::Escaped).unwrap();
        let err = registry.dispatch("Greet Ada and Grace").unwrap_err();
        match err {
            Error::AmbiguousOrUnmatchedInstruction {
                instruction,
                candidates,
            } => {
                assert_eq!(instruction, "Greet Ada and Grace");
                assert_eq!(candidates, vec!["greet", "greet_twice"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmatched_instruction() {
        let registry = register(Greeter::default(), LiteralMode::Escaped).unwrap();
        let err = registry.dispatch("Wave goodbye").unwrap_err();
        assert!(err.is_ambiguous_or_unmatched());
        assert_eq!(err.match_count(), Some(0));
    }

    #[test]
    fn test_empty_registry_never_matches() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.matches("anything").is_empty());
        assert_eq!(registry.dispatch("anything").unwrap_err().match_count(), Some(0));
    }

    #[test]
    fn test_add_closure_keyword() {
        let mut registry = Registry::new(LiteralMode::Escaped);
        registry
            .add("shout", "Shout ${text}", |args| {
                Ok(Value::String(args[0].to_uppercase()))
            })
            .unwrap()
            .add("echo", "Echo ${text}", |args| Ok(Value::String(args[0].clone())))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.dispatch("Shout hey").unwrap(),
            Value::String("HEY".to_string())
        );
    }

    #[test]
    fn test_resolve_reports_args_without_invoking() {
        let greeter = Arc::new(Greeter::default());
        let mut registry = Registry::new(LiteralMode::Escaped);
        registry.register_shared(Arc::clone(&greeter)).unwrap();

        let found = registry.resolve("Greet Grace").unwrap();
        assert_eq!(found.keyword().name(), "greet");
        assert_eq!(found.args(), &["Grace".to_string()]);
        assert_eq!(greeter.undeclared(), 0);
    }

    #[test]
    fn test_handler_failure_is_wrapped() {
        let mut registry = Registry::new(LiteralMode::Escaped);
        registry
            .add("fail", "Fail with ${reason}", |args| {
                Err(format!("asked to fail: {}", args[0]).into())
            })
            .unwrap();

        let err = registry.dispatch("Fail with style").unwrap_err();
        match &err {
            Error::Invocation {
                keyword,
                instruction,
                source,
            } => {
                assert_eq!(keyword, "fail");
                assert_eq!(instruction, "Fail with style");
                assert_eq!(source.to_string(), "asked to fail: style");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_ambiguous_or_unmatched());
    }

    #[test]
    fn test_invalid_raw_template_fails_registration() {
        let mut registry = Registry::new(LiteralMode::Raw);
        let result = registry.add("broken", "Open [${door}", |_| Ok(Value::Null));
        assert!(matches!(result, Err(Error::InvalidTemplate { .. })));
        assert!(registry.is_empty());
    }

    struct HalfBroken;

    impl HalfBroken {
        fn ok(&self, _args: &[String]) -> std::result::Result<Value, BoxError> {
            Ok(Value::Bool(true))
        }
    }

    impl KeywordLibrary for HalfBroken {
        fn keywords() -> Vec<Keyword<Self>> {
            vec![
                Keyword::new("good", "Good ${x}", Self::ok),
                Keyword::new("bad", "Bad [${x}", Self::ok),
            ]
        }
    }

    #[test]
    fn test_failed_library_registration_adds_nothing() {
        let mut registry = Registry::new(LiteralMode::Raw);
        let result = registry.register(HalfBroken);
        assert!(matches!(result, Err(Error::InvalidTemplate { ref template, .. }) if template == "Bad [${x}"));
        assert!(registry.is_empty());
        assert!(registry.dispatch("Good 1").unwrap_err().is_ambiguous_or_unmatched());

        // Keywords registered earlier survive a later failed library
        let mut registry = Registry::new(LiteralMode::Raw);
        registry.register(Greeter::default()).unwrap();
        assert!(registry.register(HalfBroken).is_err());
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.dispatch("Wave").unwrap(),
            Value::String("*waves*".to_string())
        );
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();

        let registry = Arc::new(register(Greeter::default(), LiteralMode::Escaped).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.dispatch(&format!("Greet {i}")).unwrap())
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                Value::String(format!("Hello, {i}!"))
            );
        }
    }
}
