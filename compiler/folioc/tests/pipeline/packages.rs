//! Imports from files and packages.

use folio_diagnostic::ErrorCode;
use folio_ir::PackageSpec;
use folioc::{CompileOptions, MemoryWorld};
use pretty_assertions::assert_eq;

use crate::common::{compiled, error_codes, failure};

const MANIFEST: &str = "[package]\nname = \"demo\"\nversion = \"0.1.0\"\nentrypoint = \"lib.fol\"\n";

fn demo() -> PackageSpec {
    match "@preview/demo:0.1.0".parse() {
        Ok(spec) => spec,
        Err(err) => panic!("invalid spec: {err}"),
    }
}

fn with_demo(main: &str) -> MemoryWorld {
    let spec = demo();
    MemoryWorld::new(main)
        .with_package_file(&spec, "/folio.toml", MANIFEST)
        .with_package_file(&spec, "/lib.fol", "#import \"util.fol\": shout\n#let greet(name) = shout[Hello #name]")
        .with_package_file(&spec, "/util.fol", "#let shout(body) = strong(body)")
}

#[test]
fn files_import_relative_to_the_importer() {
    let world = MemoryWorld::new("#import \"parts/defs.fol\": twice\n#twice(21)")
        .with_file("/parts/defs.fol", "#import \"base.fol\": one\n#let twice(x) = 2 * x * one")
        .with_file("/parts/base.fol", "#let one = 1");
    assert_eq!(compiled(&world).content.plain_text().trim(), "42");
}

#[test]
fn includes_bring_content_but_no_bindings() {
    let world = MemoryWorld::new("#include \"chapter.fol\"\n#hidden")
        .with_file("/chapter.fol", "#let hidden = 1\n*Chapter*");
    let diagnostics = failure(&world, &CompileOptions::default());
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6002]);

    let world = MemoryWorld::new("#include \"chapter.fol\"")
        .with_file("/chapter.fol", "#let hidden = 1\n*Chapter*");
    assert_eq!(compiled(&world).content.plain_text().trim(), "Chapter");
}

#[test]
fn packages_import_through_their_manifest() {
    let world = with_demo("#import \"@preview/demo:0.1.0\": greet\n#greet[World]");
    assert_eq!(compiled(&world).content.plain_text().trim(), "Hello World");
}

#[test]
fn packages_bind_under_their_name() {
    let world = with_demo("#import \"@preview/demo:0.1.0\"\n#demo.greet[you]");
    assert_eq!(compiled(&world).content.plain_text().trim(), "Hello you");
}

#[test]
fn missing_packages_fail() {
    let world = MemoryWorld::new("#import \"@preview/absent:1.0.0\"");
    let diagnostics = failure(&world, &CompileOptions::default());
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6015]);
}

#[test]
fn errors_in_imported_files_point_into_them() {
    let world = MemoryWorld::new("#import \"lib.fol\": f\n#f()")
        .with_file("/lib.fol", "#let f() = missing");
    let diagnostics = failure(&world, &CompileOptions::default());
    assert_eq!(error_codes(&diagnostics), vec![ErrorCode::E6002]);

    let primary = diagnostics[0].labels.iter().find(|label| label.is_primary);
    let file = primary.and_then(|label| label.span.id()).map(|id| id.vpath().to_string());
    assert_eq!(file, Some("/lib.fol".into()));
}
