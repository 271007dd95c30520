use std::path::Path;

use folio_eval::value::Datetime;
use folio_eval::{FileError, World};
use folio_ir::{FileId, PackageSpec, VirtualPath};
use pretty_assertions::assert_eq;

use super::{system_today, MemoryWorld, SystemWorld};

fn spec(text: &str) -> PackageSpec {
    match text.parse() {
        Ok(spec) => spec,
        Err(err) => panic!("invalid spec `{text}`: {err}"),
    }
}

#[test]
fn memory_world_serves_its_files() {
    let world = MemoryWorld::new("= Title").with_file("/data/a.txt", "abc");
    let main = world.main();
    assert_eq!(main.vpath().to_string(), "/main.fol");
    assert_eq!(world.source(main).map(|s| s.text().to_string()).ok(), Some("= Title".into()));

    let data = FileId::new(None, VirtualPath::new("/data/a.txt"));
    assert_eq!(world.file(data).map(|b| b.as_slice().to_vec()).ok(), Some(b"abc".to_vec()));

    let missing = FileId::new(None, VirtualPath::new("/nope.fol"));
    assert!(matches!(world.file(missing), Err(FileError::NotFound(_))));
}

#[test]
fn memory_world_rejects_invalid_utf8_sources() {
    let world = MemoryWorld::new("").with_file("/bad.fol", [0xc3, 0x28]);
    let bad = FileId::new(None, VirtualPath::new("/bad.fol"));
    assert_eq!(world.source(bad).err(), Some(FileError::InvalidUtf8));
}

#[test]
fn insert_replaces_files() {
    let mut world = MemoryWorld::new("old");
    world.insert("/main.fol", "new");
    assert_eq!(
        world.source(world.main()).map(|s| s.text().to_string()).ok(),
        Some("new".into())
    );
}

#[test]
fn packages_exist_once_they_have_files() {
    let demo = spec("@preview/demo:0.1.0");
    let world = MemoryWorld::new("").with_package_file(&demo, "/folio.toml", "[package]");
    let Ok(root) = world.resolve_package(&demo) else {
        panic!("package should resolve");
    };
    assert_eq!(root.package(), Some(&demo));

    let other = spec("@preview/demo:0.2.0");
    assert_eq!(
        world.resolve_package(&other).err(),
        Some(FileError::PackageNotFound("@preview/demo:0.2.0".into()))
    );
}

#[test]
fn fixed_date_wins_over_the_clock() {
    let day = Datetime::from_ymd(2024, 5, 17);
    let Some(day) = day else {
        panic!("valid date");
    };
    let world = MemoryWorld::new("").with_today(day);
    assert_eq!(world.today(None), Some(day));
    assert_eq!(world.today(Some(1)), Datetime::from_ymd(2024, 5, 18));
    assert_eq!(world.today(Some(-17)), Datetime::from_ymd(2024, 4, 30));
}

#[test]
fn system_clock_produces_a_date() {
    let Some(today) = system_today(None) else {
        panic!("the clock must give a date");
    };
    assert_eq!(system_today(Some(1)), today.shift_days(1));
    assert_eq!(system_today(Some(i32::MAX)), None);
}

#[test]
fn system_world_roots_at_the_file_directory() {
    let world = SystemWorld::for_file(Path::new("docs/report.fol"));
    assert_eq!(world.root(), Path::new("docs"));
    assert_eq!(world.main().vpath().to_string(), "/report.fol");

    let bare = SystemWorld::for_file(Path::new("report.fol"));
    assert_eq!(bare.root(), Path::new("."));
}

#[test]
fn system_world_reports_missing_files_and_packages() {
    let world = SystemWorld::new("/definitely/not/a/folio/root", "main.fol");
    assert!(matches!(world.source(world.main()), Err(FileError::NotFound(_))));
    assert!(matches!(
        world.resolve_package(&spec("@preview/demo:0.1.0")),
        Err(FileError::PackageNotFound(_))
    ));
}

#[test]
fn system_world_reads_from_disk() {
    let root = std::env::temp_dir().join(format!("folio-world-{}", std::process::id()));
    let package = root.join("store/preview/demo/0.1.0");
    let written = std::fs::create_dir_all(&package)
        .and_then(|()| std::fs::write(root.join("main.fol"), "#import \"@preview/demo:0.1.0\""))
        .and_then(|()| std::fs::write(package.join("folio.toml"), "[package]\nentrypoint = \"lib.fol\"\n"));
    assert!(written.is_ok(), "could not prepare {}", root.display());

    let world = SystemWorld::new(&root, "main.fol").with_package_store(root.join("store"));
    let source = world.source(world.main());
    assert_eq!(
        source.map(|s| s.text().to_string()).ok(),
        Some("#import \"@preview/demo:0.1.0\"".into())
    );

    let demo = spec("@preview/demo:0.1.0");
    let Ok(package_root) = world.resolve_package(&demo) else {
        panic!("package should resolve");
    };
    let manifest = package_root.join("/folio.toml");
    assert!(world.file(manifest).is_ok());

    let _ = std::fs::remove_dir_all(&root);
}
