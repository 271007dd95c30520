use pretty_assertions::assert_eq;

use super::kind_of;
use crate::errors::{EvalErrorKind, SourceResult};
use crate::testing::{eval_world, TestWorld};

const LIB: &str = "#let double(x) = 2 * x\n#let name = \"lib\"\nHello";

const DEMO: &str = "@preview/demo:0.1.0";

const MANIFEST: &str = "[package]\nname = \"demo\"\nversion = \"0.1.0\"\nentrypoint = \"lib.fol\"\n";

/// The trimmed text of the main file's content.
fn output(world: &TestWorld) -> SourceResult<String> {
    eval_world(world)
        .0
        .map(|module| module.content().plain_text().trim().to_string())
}

fn with_lib(main: &str) -> TestWorld {
    TestWorld::new(main).with_file("/lib.fol", LIB)
}

fn with_demo(main: &str) -> TestWorld {
    TestWorld::new(main)
        .with_package_file(DEMO, "/folio.toml", MANIFEST)
        .with_package_file(DEMO, "/lib.fol", "#import \"util.fol\": greet\n#let hi = greet")
        .with_package_file(DEMO, "/util.fol", "#let greet = [hi]")
}

#[test]
fn import_items() {
    let world = with_lib("#import \"lib.fol\": double\n#double(4)");
    assert_eq!(output(&world).ok(), Some("8".into()));
}

#[test]
fn import_renamed_items() {
    let world = with_lib("#import \"lib.fol\": double as twice\n#twice(1)");
    assert_eq!(output(&world).ok(), Some("2".into()));
}

#[test]
fn import_binds_the_module_by_file_stem() {
    let world = with_lib("#import \"lib.fol\"\n#lib.double(2)");
    assert_eq!(output(&world).ok(), Some("4".into()));
}

#[test]
fn import_with_a_new_name() {
    let world = with_lib("#import \"lib.fol\" as m\n#m.name");
    assert_eq!(output(&world).ok(), Some("lib".into()));
}

#[test]
fn wildcard_import() {
    let world = with_lib("#import \"lib.fol\": *\n#name");
    assert_eq!(output(&world).ok(), Some("lib".into()));
}

#[test]
fn imports_do_not_bring_content() {
    let world = with_lib("#import \"lib.fol\": name");
    assert_eq!(output(&world).ok(), Some(String::new()));
}

#[test]
fn include_brings_content() {
    let world = with_lib("#include \"lib.fol\"");
    assert_eq!(output(&world).ok(), Some("Hello".into()));
}

#[test]
fn missing_items_are_unknown_variables() {
    let world = with_lib("#import \"lib.fol\": nope");
    assert_eq!(
        kind_of(output(&world)),
        Some(EvalErrorKind::UnknownVariable { name: "nope".into() })
    );
}

#[test]
fn missing_files() {
    let world = TestWorld::new("#import \"missing.fol\"");
    assert!(matches!(
        kind_of(output(&world)),
        Some(EvalErrorKind::FileNotFound { .. })
    ));
}

#[test]
fn cyclic_imports_are_detected() {
    let world = TestWorld::new("#import \"a.fol\"")
        .with_file("/a.fol", "#import \"b.fol\"")
        .with_file("/b.fol", "#import \"a.fol\"");
    assert!(matches!(
        kind_of(output(&world)),
        Some(EvalErrorKind::CyclicImport { .. })
    ));
}

#[test]
fn importing_the_same_file_twice_is_fine() {
    let world = with_lib("#import \"lib.fol\": double\n#import \"lib.fol\" as again\n#again.double(3)");
    assert_eq!(output(&world).ok(), Some("6".into()));
}

#[test]
fn packages_import_through_their_manifest() {
    let world = with_demo(&format!("#import \"{DEMO}\": hi\n#hi"));
    assert_eq!(output(&world).ok(), Some("hi".into()));
}

#[test]
fn packages_bind_under_their_name() {
    let world = with_demo(&format!("#import \"{DEMO}\"\n#demo.hi"));
    assert_eq!(output(&world).ok(), Some("hi".into()));
}

#[test]
fn unknown_packages() {
    let world = TestWorld::new("#import \"@preview/absent:1.0.0\"");
    assert!(matches!(
        kind_of(output(&world)),
        Some(EvalErrorKind::PackageNotFound { .. })
    ));
}

#[test]
fn malformed_package_specs() {
    let world = TestWorld::new("#import \"@preview/demo\"");
    assert!(output(&world).is_err());
}

#[test]
fn manifest_must_match_the_request() {
    let manifest = MANIFEST.replace("\"demo\"", "\"other\"");
    let world = TestWorld::new(&format!("#import \"{DEMO}\""))
        .with_package_file(DEMO, "/folio.toml", &manifest)
        .with_package_file(DEMO, "/lib.fol", "");
    let message = output(&world).err().map(|error| error.message);
    assert!(message.is_some_and(|message| message.contains("mismatched name")));
}

#[test]
fn manifest_needs_an_entrypoint() {
    let world = TestWorld::new(&format!("#import \"{DEMO}\""))
        .with_package_file(DEMO, "/folio.toml", "[package]\nname = \"demo\"\n");
    let message = output(&world).err().map(|error| error.message);
    assert!(message.is_some_and(|message| message.contains("entrypoint")));
}
