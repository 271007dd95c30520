//! Functions: natives with a signature, user closures, partial application
//! and bound methods.
//!
//! All callables share one calling convention: they consume an [`Args`]
//! bundle. Natives receive it by `&mut` and [`Func::call`] checks that every
//! argument was consumed afterwards; closures bind it to their parameters.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use folio_ir::{ClosureId, ExprId, FileId, Name, SharedArena};

use crate::args::Args;
use crate::content::ElemKind;
use crate::engine::{Context, Engine};
use crate::errors::SourceResult;
use crate::scope::Scope;
use crate::value::{Str, Type, Value};

/// Signature of a native function body.
pub type NativeFn = fn(&mut Engine, &Context, &mut Args) -> SourceResult<Value>;

/// Describes one parameter of a native function or element.
#[derive(Debug)]
pub struct ParamInfo {
    pub name: &'static str,
    /// Accepted types; empty accepts anything.
    pub accepts: &'static [Type],
    /// Whether the parameter can be given positionally.
    pub positional: bool,
    /// Whether the parameter can be given by name.
    pub named: bool,
    pub required: bool,
    /// Whether the parameter collects all remaining positional arguments.
    pub variadic: bool,
    /// Whether a set rule may provide a default for it.
    pub settable: bool,
    pub default: Option<fn() -> Value>,
}

impl ParamInfo {
    /// A required positional parameter.
    pub const fn positional(name: &'static str, accepts: &'static [Type]) -> Self {
        ParamInfo {
            name,
            accepts,
            positional: true,
            named: false,
            required: true,
            variadic: false,
            settable: false,
            default: None,
        }
    }

    /// An optional named parameter that set rules can configure.
    pub const fn settable(
        name: &'static str,
        accepts: &'static [Type],
        default: fn() -> Value,
    ) -> Self {
        ParamInfo {
            name,
            accepts,
            positional: false,
            named: true,
            required: false,
            variadic: false,
            settable: true,
            default: Some(default),
        }
    }

    /// An optional named parameter that set rules cannot configure.
    pub const fn named(name: &'static str, accepts: &'static [Type], default: fn() -> Value) -> Self {
        ParamInfo {
            settable: false,
            ..ParamInfo::settable(name, accepts, default)
        }
    }

    /// A parameter collecting the remaining positional arguments.
    pub const fn variadic(name: &'static str, accepts: &'static [Type]) -> Self {
        ParamInfo {
            name,
            accepts,
            positional: true,
            named: false,
            required: false,
            variadic: true,
            settable: false,
            default: None,
        }
    }

    /// Make the parameter optional with the given default.
    #[must_use]
    pub const fn or(mut self, default: fn() -> Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// Allow giving the parameter by position as well.
    #[must_use]
    pub const fn also_positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// The default value, if the parameter has one.
    pub fn default_value(&self) -> Option<Value> {
        self.default.map(|f| f())
    }
}

/// A function implemented in Rust.
pub struct NativeFunc {
    pub name: &'static str,
    pub params: &'static [ParamInfo],
    pub func: NativeFn,
    /// The element this function constructs, if it is an element function.
    pub element: Option<ElemKind>,
    /// Definitions reachable through field access (`assert.eq`).
    pub scope: Option<fn() -> Scope>,
}

impl fmt::Debug for NativeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunc({})", self.name)
    }
}

/// What a closure evaluates when called.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClosureNode {
    /// A closure expression or `let f(..) = ..` definition.
    Func(ClosureId),
    /// The body of a `context` expression; takes no arguments.
    Context(ExprId),
}

/// A user-defined function together with its captured environment.
#[derive(Debug)]
pub struct Closure {
    pub node: ClosureNode,
    /// The arena the node lives in.
    pub arena: SharedArena,
    /// The file the closure was defined in, for relative imports.
    pub file: Option<FileId>,
    /// Captured outer bindings.
    pub captured: Scope,
    /// Evaluated defaults of the named parameters, in declaration order.
    pub defaults: Vec<Value>,
    /// The name for recursive self-reference.
    pub name: Option<Name>,
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
            && self.name == other.name
            && self.file == other.file
            && (self.arena.ptr_eq(&other.arena) || self.arena == other.arena)
            && self.captured == other.captured
            && self.defaults == other.defaults
    }
}

/// A callable value.
#[derive(Clone)]
pub enum Func {
    Native(&'static NativeFunc),
    Closure(Arc<Closure>),
    /// A function with pre-applied arguments: `f.with(..)`.
    With(Arc<(Func, Args)>),
    /// A method bound to its receiver: `"abc".len`.
    Method(Arc<(Value, Str)>),
}

impl Func {
    /// The function's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Func::Native(native) => Some(native.name),
            Func::Closure(closure) => closure.name.map(Name::as_str),
            Func::With(with) => with.0.name(),
            Func::Method(method) => Some(method.1.as_str()),
        }
    }

    /// The element this function constructs.
    pub fn element(&self) -> Option<ElemKind> {
        match self {
            Func::Native(native) => native.element,
            Func::With(with) => with.0.element(),
            _ => None,
        }
    }

    /// The native's parameter list.
    pub fn params(&self) -> Option<&'static [ParamInfo]> {
        match self {
            Func::Native(native) => Some(native.params),
            Func::With(with) => with.0.params(),
            _ => None,
        }
    }

    /// Definitions scoped under this function.
    pub fn scope(&self) -> Option<Scope> {
        match self {
            Func::Native(native) => native.scope.map(|scope| scope()),
            _ => None,
        }
    }

    /// Call the function.
    pub fn call(&self, engine: &mut Engine, context: &Context, mut args: Args) -> SourceResult<Value> {
        match self {
            Func::Native(native) => {
                let output = (native.func)(engine, context, &mut args)?;
                args.finish()?;
                Ok(output)
            }
            Func::Closure(closure) => crate::vm::call_closure(self, closure, engine, context, args),
            Func::With(with) => {
                let (func, applied) = &**with;
                let mut all = applied.clone();
                all.span = args.span;
                all.items.extend(args.items);
                func.call(engine, context, all)
            }
            Func::Method(method) => {
                let (receiver, name) = &**method;
                crate::methods::call(engine, context, receiver.clone(), name, args)
            }
        }
    }

    /// Pre-apply arguments.
    #[must_use]
    pub fn with(self, args: Args) -> Func {
        Func::With(Arc::new((self, args)))
    }

    pub fn repr(&self) -> String {
        match self {
            Func::With(with) => with.0.repr(),
            _ => self.name().map_or_else(|| "(..) => ..".to_string(), str::to_string),
        }
    }
}

impl From<&'static NativeFunc> for Func {
    fn from(native: &'static NativeFunc) -> Self {
        Func::Native(native)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Func::Native(a), Func::Native(b)) => std::ptr::eq(*a, *b),
            (Func::Closure(a), Func::Closure(b)) => Arc::ptr_eq(a, b) || **a == **b,
            (Func::With(a), Func::With(b)) => Arc::ptr_eq(a, b) || **a == **b,
            (Func::Method(a), Func::Method(b)) => **a == **b,
            _ => false,
        }
    }
}

impl Hash for Func {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Func::Native(native) => (*native as *const NativeFunc as usize).hash(state),
            Func::Closure(closure) => {
                closure.node.hash(state);
                closure.name.hash(state);
                closure.defaults.hash(state);
            }
            Func::With(with) => with.hash(state),
            Func::Method(method) => method.hash(state),
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
