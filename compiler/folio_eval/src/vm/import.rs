//! Module imports, includes and packages.

use folio_ir::{is_ident, ExprId, FileId, Imports, Name, PackageSpec, PackageVersion, Span, VirtualPath};

use super::Vm;
use crate::errors::{
    file_parse_error, file_read_error, type_mismatch, unknown_variable, At, EvalError,
    SourceResult, Trace, Tracepoint,
};
use crate::scope::{Binding, Module};
use crate::value::Value;

/// The manifest every package carries at its root.
const MANIFEST: &str = "folio.toml";

impl Vm<'_, '_> {
    pub(super) fn eval_import(
        &mut self,
        source: ExprId,
        new_name: Option<Name>,
        imports: Imports,
        span: Span,
    ) -> SourceResult<Value> {
        let source_span = self.arena.span(source);
        let value = self.eval(source)?;
        let module = self.import_value(value, source_span)?;

        if let Some(new_name) = new_name {
            self.scopes
                .bind(new_name, Binding::new(Value::Module(module.clone()), span))
                .at(span)?;
        }

        match imports {
            Imports::None => {
                if new_name.is_none() {
                    let name = module.name().as_str();
                    if !is_ident(name) {
                        return Err(EvalError::new(format!(
                            "module name `{name}` is not a valid identifier"
                        ))
                        .with_span(source_span)
                        .with_hint("rename the import with `as`"));
                    }
                    self.scopes
                        .bind(Name::new(name), Binding::new(Value::Module(module.clone()), span))
                        .at(span)?;
                }
            }
            Imports::Wildcard => {
                for (name, binding) in module.scope().iter() {
                    self.scopes
                        .top
                        .insert(name, Binding::new(binding.read().clone(), span));
                }
            }
            Imports::Items(items) => {
                let arena = self.arena.clone();
                for item in arena.import_items(items) {
                    let Some(binding) = module.scope().get(item.name) else {
                        return Err(unknown_variable(item.name.as_str())
                            .with_span(item.span)
                            .with_hint(format!("module `{}` has no such definition", module.name())));
                    };
                    let value = binding.read().clone();
                    self.scopes
                        .bind(item.bound_name(), Binding::new(value, item.span))
                        .at(item.span)?;
                }
            }
        }
        Ok(Value::None)
    }

    /// `include "file"`: the file's content.
    pub(super) fn eval_include(&mut self, source: ExprId, span: Span) -> SourceResult<Value> {
        let source_span = self.arena.span(source);
        let path = match self.eval(source)? {
            Value::Str(path) => path,
            other => return Err(type_mismatch("string", other.ty().long_name()).with_span(source_span)),
        };
        let id = self.engine.locate(source_span, path.as_str());
        let module = self.eval_file(id, span)?;
        Ok(Value::Content(module.content().clone()))
    }

    /// Turn the value of an import source into a module.
    fn import_value(&mut self, value: Value, span: Span) -> SourceResult<Module> {
        match value {
            Value::Str(path) if path.as_str().starts_with('@') => self.import_package(path.as_str(), span),
            Value::Str(path) => {
                let id = self.engine.locate(span, path.as_str());
                self.eval_file(id, span)
            }
            Value::Module(module) => Ok(module),
            Value::Func(func) => match (func.scope(), func.name()) {
                (Some(scope), Some(name)) => Ok(Module::new(name, scope)),
                _ => Err(EvalError::new("cannot import from user-defined functions").with_span(span)),
            },
            Value::Type(ty) => match ty.scope() {
                Some(scope) => Ok(Module::new(ty.name(), scope)),
                None => Err(EvalError::new(format!("type {} has no definitions", ty.name())).with_span(span)),
            },
            other => Err(type_mismatch("path, module, function or type", other.ty().long_name())
                .with_span(span)),
        }
    }

    /// Import `@namespace/name:version` through its manifest.
    #[tracing::instrument(level = "debug", skip(self, span))]
    fn import_package(&mut self, spec: &str, span: Span) -> SourceResult<Module> {
        let spec: PackageSpec = spec.parse().map_err(EvalError::new).at(span)?;
        let root = self
            .engine
            .world
            .resolve_package(&spec)
            .map_err(|err| err.into_eval(FileId::new(Some(spec.clone()), VirtualPath::new("/"))))
            .at(span)?;

        let manifest_id = root.join(&format!("/{MANIFEST}"));
        let bytes = self.engine.load(manifest_id).at(span)?;
        let text = std::str::from_utf8(bytes.as_slice())
            .map_err(|_| file_read_error(MANIFEST, "file is not valid utf-8"))
            .at(span)?;
        let entrypoint = read_manifest(text, &spec).at(span)?;

        let entry = root.join(&format!("/{entrypoint}"));
        let module = self.eval_file(entry, span)?;
        Ok(Module::new(spec.name.as_str(), module.scope().clone()).with_content(module.content().clone()))
    }

    /// Parse and evaluate another file.
    fn eval_file(&mut self, id: FileId, span: Span) -> SourceResult<Module> {
        let source = self
            .engine
            .world
            .source(id)
            .map_err(|err| err.into_eval(id))
            .at(span)?;
        crate::eval(self.engine, &source).trace(|| Tracepoint::Import, span)
    }
}

/// Validate a package manifest against the requested package and return
/// its entrypoint.
fn read_manifest(text: &str, spec: &PackageSpec) -> SourceResult<String> {
    let table: toml::Table = text
        .parse()
        .map_err(|err: toml::de::Error| file_parse_error("toml", err.message()))?;
    let package = table
        .get("package")
        .and_then(toml::Value::as_table)
        .ok_or_else(|| EvalError::new("package manifest is missing the `[package]` section"))?;

    if let Some(name) = package.get("name").and_then(toml::Value::as_str) {
        if name != spec.name {
            return Err(EvalError::new(format!(
                "package manifest contains mismatched name `{name}`"
            )));
        }
    }
    if let Some(version) = package.get("version").and_then(toml::Value::as_str) {
        let version: PackageVersion = version.parse().map_err(EvalError::new)?;
        if version != spec.version {
            return Err(EvalError::new(format!(
                "package manifest contains mismatched version {version}"
            )));
        }
    }

    package
        .get("entrypoint")
        .and_then(toml::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| EvalError::new("package manifest is missing the `entrypoint` key"))
}
