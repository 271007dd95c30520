//! Folio Library - the standard prelude of the Folio typesetting language.
//!
//! [`library`] assembles the two scopes a document is evaluated against: the
//! global scope every file starts with and the math scope that equations
//! consult before it. Each submodule contributes its definitions through a
//! plain registration function that takes the scope to fill, so hosts can
//! also build reduced libraries from the same parts.
//!
//! # Contents
//!
//! - element functions (`text`, `strong`, `heading`, `box`, `grid`, ...)
//! - every type, callable as a constructor (`int`, `str`, `datetime`, ...)
//! - color, alignment and direction constants
//! - `foundations`: `range`, `repr`, `assert`, `panic`
//! - `text`: `lorem`, `upper`, `lower`
//! - `data`: `read`, `json`, `yaml`, `toml`, `csv`, `xml`
//! - `calc`: the numeric module
//! - `sym`: named symbols with modifiers (`arrow.r.double`)
//! - `math`: equation elements, accents, operators and Greek letters

mod calc;
mod data;
mod foundations;
mod math;
mod symbols;
mod text;

use folio_eval::value::{Alignment, Color, Direction, Type, Value};
use folio_eval::{ElemKind, Func, Library, Module, Scope};

/// Build the standard library.
pub fn library() -> Library {
    let math = math::module();

    let mut global = Scope::new();
    define_elements(&mut global);
    define_types(&mut global);
    define_colors(&mut global);
    define_layout(&mut global);
    foundations::define(&mut global);
    text::define(&mut global);
    data::define(&mut global);
    math::define_accents(&mut global);
    global.define("calc", Value::Module(calc::module()));
    global.define("sym", Value::Module(symbols::module()));
    global.define("math", Value::Module(math.clone()));

    tracing::debug!(
        global = global.len(),
        math = math.scope().len(),
        "assembled standard library"
    );

    Library {
        global: Module::new("global", global),
        math,
    }
}

/// Element functions outside of math.
///
/// Item kinds are reached through their container (`list.item`); `styled`
/// and `context` are produced by rules and expressions, not by calls.
fn define_elements(global: &mut Scope) {
    for &kind in ElemKind::ALL {
        if kind.name().contains('.') || is_math_only(kind) {
            continue;
        }
        if matches!(kind, ElemKind::Styled | ElemKind::Context) {
            continue;
        }
        global.define(kind.name(), Func::Native(kind.func()));
    }
}

/// Kinds that only make sense inside an equation. The composites `mat`,
/// `vec` and `cases` are global as well.
const fn is_math_only(kind: ElemKind) -> bool {
    matches!(
        kind,
        ElemKind::Frac
            | ElemKind::Root
            | ElemKind::Attach
            | ElemKind::Lr
            | ElemKind::AlignPoint
            | ElemKind::Symbol
            | ElemKind::Limits
            | ElemKind::Accent
            | ElemKind::Op
    )
}

fn define_types(global: &mut Scope) {
    for &ty in Type::ALL {
        // `none` and `auto` are literals.
        if matches!(ty, Type::None | Type::Auto) {
            continue;
        }
        global.define(ty.name(), Value::Type(ty));
    }

    // `rgb` and `luma` are also reachable without the `color.` prefix.
    if let Some(scope) = Type::Color.scope() {
        for (name, binding) in scope.iter() {
            global.define(name.as_str(), binding.read().clone());
        }
    }
}

fn define_colors(global: &mut Scope) {
    let colors = [
        ("black", Color::BLACK),
        ("gray", Color::GRAY),
        ("silver", Color::SILVER),
        ("white", Color::WHITE),
        ("navy", Color::NAVY),
        ("blue", Color::BLUE),
        ("aqua", Color::AQUA),
        ("teal", Color::TEAL),
        ("eastern", Color::EASTERN),
        ("purple", Color::PURPLE),
        ("fuchsia", Color::FUCHSIA),
        ("maroon", Color::MAROON),
        ("red", Color::RED),
        ("orange", Color::ORANGE),
        ("yellow", Color::YELLOW),
        ("olive", Color::OLIVE),
        ("green", Color::GREEN),
        ("lime", Color::LIME),
    ];
    for (name, color) in colors {
        global.define(name, Value::Color(color));
    }
}

fn define_layout(global: &mut Scope) {
    let alignments = [
        ("start", Alignment::START),
        ("left", Alignment::LEFT),
        ("center", Alignment::CENTER),
        ("right", Alignment::RIGHT),
        ("end", Alignment::END),
        ("top", Alignment::TOP),
        ("horizon", Alignment::HORIZON),
        ("bottom", Alignment::BOTTOM),
    ];
    for (name, alignment) in alignments {
        global.define(name, Value::Alignment(alignment));
    }

    for direction in [Direction::Ltr, Direction::Rtl, Direction::Ttb, Direction::Btt] {
        global.define(direction.name(), Value::Direction(direction));
    }
}

#[cfg(test)]
pub(crate) mod testing;
