//! Scopes, bindings, modules and the standard library handle.
//!
//! A [`Scope`] maps names to [`Binding`]s in definition order. [`Scopes`]
//! is the evaluator's stack of scopes: the innermost frame is `top`, the
//! enclosing frames live in `scopes`, and the library sits below all of
//! them. Lookup walks outward; definitions always go into `top`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use folio_ir::{Name, Span};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::content::Content;
use crate::errors::{
    captured_mutation, constant_mutation, redefinition, unknown_field, unknown_variable,
    SourceResult,
};
use crate::value::{Str, Symbol, Value};

/// What kind of code captured a binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Capturer {
    Function,
    Context,
}

/// How a binding came to be.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    Normal,
    /// Copied into a closure's environment.
    Captured(Capturer),
    /// Not tied to any evaluation frame (library definitions).
    Detached,
}

/// A value bound to a name.
#[derive(Clone, Debug)]
pub struct Binding {
    value: Value,
    span: Span,
    kind: BindingKind,
    mutable: bool,
}

impl Binding {
    /// A mutable binding made by `let`, a parameter or an import.
    pub fn new(value: Value, span: Span) -> Self {
        Binding {
            value,
            span,
            kind: BindingKind::Normal,
            mutable: true,
        }
    }

    /// An immutable definition of the standard library.
    pub fn detached(value: Value) -> Self {
        Binding {
            value,
            span: Span::detached(),
            kind: BindingKind::Detached,
            mutable: false,
        }
    }

    /// This binding as seen from inside a closure.
    #[must_use]
    pub fn captured(&self, capturer: Capturer) -> Self {
        Binding {
            kind: BindingKind::Captured(capturer),
            ..self.clone()
        }
    }

    pub fn read(&self) -> &Value {
        &self.value
    }

    /// Mutable access, refused for constants and captured bindings.
    pub fn write(&mut self, name: &str) -> SourceResult<&mut Value> {
        match self.kind {
            BindingKind::Captured(_) => Err(captured_mutation(name)),
            _ if !self.mutable => Err(constant_mutation(name)),
            _ => Ok(&mut self.value),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }
}

/// A map from names to bindings, in definition order.
#[derive(Clone, Default)]
pub struct Scope {
    map: IndexMap<Name, Binding, FxBuildHasher>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Bind a name; fails if it is already bound in this scope.
    pub fn bind(&mut self, name: Name, binding: Binding) -> SourceResult<()> {
        if self.map.contains_key(&name) {
            return Err(redefinition(name.as_str()).with_span(binding.span));
        }
        self.map.insert(name, binding);
        Ok(())
    }

    /// Bind a name, replacing an earlier binding.
    pub fn insert(&mut self, name: Name, binding: Binding) {
        self.map.insert(name, binding);
    }

    /// Define an immutable library value.
    pub fn define(&mut self, name: &str, value: impl Into<Value>) {
        self.map
            .insert(Name::new(name), Binding::detached(value.into()));
    }

    /// Define a captured binding; capturing the same name twice is a no-op.
    pub fn define_captured(&mut self, name: Name, binding: &Binding, capturer: Capturer) {
        self.map
            .entry(name)
            .or_insert_with(|| binding.captured(capturer));
    }

    pub fn get(&self, name: Name) -> Option<&Binding> {
        self.map.get(&name)
    }

    pub fn get_mut(&mut self, name: Name) -> Option<&mut Binding> {
        self.map.get_mut(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.map.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Bindings in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, &Binding)> {
        self.map.iter().map(|(name, binding)| (*name, binding))
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .iter()
                .all(|(name, b)| other.get(name).is_some_and(|o| o.value == b.value))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(name, b)| (name, &b.value)))
            .finish()
    }
}

/// An evaluated file or built-in namespace.
#[derive(Clone)]
pub struct Module(Arc<ModuleRepr>);

#[derive(Clone)]
struct ModuleRepr {
    name: Str,
    scope: Scope,
    content: Content,
}

impl Module {
    pub fn new(name: impl Into<Str>, scope: Scope) -> Self {
        Module(Arc::new(ModuleRepr {
            name: name.into(),
            scope,
            content: Content::empty(),
        }))
    }

    /// Attach the content the module's file produced.
    #[must_use]
    pub fn with_content(mut self, content: Content) -> Self {
        Arc::make_mut(&mut self.0).content = content;
        self
    }

    pub fn name(&self) -> &Str {
        &self.0.name
    }

    pub fn scope(&self) -> &Scope {
        &self.0.scope
    }

    /// Mutable access to the definitions.
    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut Arc::make_mut(&mut self.0).scope
    }

    pub fn content(&self) -> &Content {
        &self.0.content
    }

    /// Look up a definition for field access.
    pub fn field(&self, name: &str) -> SourceResult<&Value> {
        self.scope()
            .get(Name::new(name))
            .map(Binding::read)
            .ok_or_else(|| unknown_field(&format!("module `{}`", self.name()), name))
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name == other.0.name
                && self.0.scope == other.0.scope
                && self.0.content == other.0.content)
    }
}

impl Hash for Module {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.scope.len().hash(state);
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<module {}>", self.name())
    }
}

/// The standard library: the global prelude and the math namespace.
#[derive(Clone, Debug)]
pub struct Library {
    pub global: Module,
    /// Definitions visible only inside equations.
    pub math: Module,
}

/// The evaluator's stack of scopes.
#[derive(Clone, Debug)]
pub struct Scopes<'a> {
    /// The innermost frame.
    pub top: Scope,
    /// Enclosing frames, outermost first.
    pub scopes: Vec<Scope>,
    /// The library below all frames.
    pub base: Option<&'a Library>,
}

impl<'a> Scopes<'a> {
    pub fn new(base: Option<&'a Library>) -> Self {
        Scopes {
            top: Scope::new(),
            scopes: Vec::new(),
            base,
        }
    }

    /// Push a fresh frame.
    pub fn enter(&mut self) {
        self.scopes.push(std::mem::take(&mut self.top));
    }

    /// Pop the innermost frame.
    pub fn exit(&mut self) {
        self.top = self.scopes.pop().unwrap_or_default();
    }

    /// The number of frames above the outermost one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind in the innermost frame.
    pub fn bind(&mut self, name: Name, binding: Binding) -> SourceResult<()> {
        self.top.bind(name, binding)
    }

    /// A local binding, without consulting the library.
    pub fn local(&self, name: Name) -> Option<&Binding> {
        std::iter::once(&self.top)
            .chain(self.scopes.iter().rev())
            .find_map(|scope| scope.get(name))
    }

    /// Resolve a name in code.
    pub fn get(&self, name: Name) -> SourceResult<&Value> {
        if let Some(binding) = self.local(name) {
            return Ok(binding.read());
        }
        self.base
            .and_then(|lib| lib.global.scope().get(name))
            .map(Binding::read)
            .ok_or_else(|| unknown_variable(name.as_str()))
    }

    /// Resolve a name in math: locals, then the math namespace, then the
    /// global prelude. An unbound single letter is a symbol of itself.
    pub fn get_in_math(&self, name: Name) -> SourceResult<Value> {
        if let Some(binding) = self.local(name) {
            return Ok(binding.read().clone());
        }
        if let Some(lib) = self.base {
            if let Some(binding) = lib
                .math
                .scope()
                .get(name)
                .or_else(|| lib.global.scope().get(name))
            {
                return Ok(binding.read().clone());
            }
        }
        let mut chars = name.as_str().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Symbol(Symbol::single(c))),
            _ => Err(unknown_variable(name.as_str())),
        }
    }

    /// Mutable access for assignment.
    pub fn get_mut(&mut self, name: Name) -> SourceResult<&mut Value> {
        let local = std::iter::once(&mut self.top)
            .chain(self.scopes.iter_mut().rev())
            .find_map(|scope| scope.get_mut(name));
        match local {
            Some(binding) => binding.write(name.as_str()),
            None if self
                .base
                .is_some_and(|lib| lib.global.scope().contains(name)) =>
            {
                Err(constant_mutation(name.as_str()))
            }
            None => Err(unknown_variable(name.as_str())),
        }
    }
}

#[cfg(test)]
mod tests;
