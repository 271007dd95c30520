use folio_diagnostic::emitter::{ColorMode, TerminalEmitter};
use folio_diagnostic::Diagnostic;
use pretty_assertions::assert_eq;

use super::{emit, render};
use crate::{compile, CompileOptions, MemoryWorld};

fn failure(world: &MemoryWorld) -> Vec<Diagnostic> {
    match compile(world, &CompileOptions::default()) {
        Ok(_) => panic!("compilation should fail"),
        Err(diagnostics) => diagnostics,
    }
}

#[test]
fn errors_render_with_location_and_caret() {
    let world = MemoryWorld::new("Hi #foo");
    let output = render(&world, &failure(&world));
    assert_eq!(
        output,
        "error[E6002]: unknown variable: foo\n  \
         --> /main.fol:1:5\n  \
         |\n\
         1 | Hi #foo\n  \
         |     ^^^\n\n\
         error: aborting due to previous error\n"
    );
}

#[test]
fn syntax_errors_render_their_codes() {
    let world = MemoryWorld::new("#let x = (1, 2");
    let output = render(&world, &failure(&world));
    assert!(output.starts_with("error[E100"), "{output}");
    assert!(output.contains("--> /main.fol:1:"), "{output}");
}

#[test]
fn warnings_render_with_summary() {
    let world = MemoryWorld::new("a ** b");
    let Ok(compiled) = compile(&world, &CompileOptions::default()) else {
        panic!("compilation should succeed");
    };
    let output = render(&world, &compiled.warnings);
    assert!(output.starts_with("warning[W6001]: no text within stars"), "{output}");
    assert!(output.ends_with("warning: 1 warning emitted\n"), "{output}");
}

#[test]
fn excerpts_come_from_the_file_at_fault() {
    let world = MemoryWorld::new("#import \"lib.fol\": f\n#f()")
        .with_file("/lib.fol", "#let f() = missing");
    let output = render(&world, &failure(&world));
    assert!(output.contains("--> /lib.fol:1:12"), "{output}");
    assert!(output.contains("1 | #let f() = missing"), "{output}");
    assert!(output.contains("::: /main.fol:2:"), "{output}");
}

#[test]
fn colored_output_wraps_severity() {
    let world = MemoryWorld::new("#foo");
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    emit(&world, &mut emitter, &failure(&world));
    let output = String::from_utf8_lossy(&emitter.into_inner()).into_owned();
    assert!(output.starts_with("\x1b[1;31merror\x1b[0m"), "{output:?}");
}
