//! Element kinds, their field schemas and constructors.
//!
//! Every element kind has a static parameter table. The table drives the
//! generic constructor (argument extraction and type checks), set-rule
//! validation and default lookup during realization. A handful of kinds
//! construct themselves differently (`text`, `link`) and say so in
//! [`construct`].

use super::{Content, Elem};
use crate::args::Args;
use crate::engine::{Context, Engine};
use crate::errors::{missing_argument, type_mismatch, At, SourceResult};
use crate::func::{Func, NativeFunc, ParamInfo};
use crate::scope::Scope;
use crate::styles::{SetRule, Styles};
use crate::value::{
    Alignment, Array, Color, Direction, FromValue, Length, Str, Type, Value,
};

const CONTENT: &[Type] = &[Type::Content];
const CONTENT_OR_NONE: &[Type] = &[Type::None, Type::Content];
const STR: &[Type] = &[Type::Str];
const STR_OR_NONE: &[Type] = &[Type::None, Type::Str];
const BOOL: &[Type] = &[Type::Bool];
const INT: &[Type] = &[Type::Int];
const INT_OR_NONE: &[Type] = &[Type::None, Type::Int];
const LENGTH: &[Type] = &[Type::Length];
const RELATIVE: &[Type] = &[Type::Relative];
const SIZING: &[Type] = &[Type::Auto, Type::Relative, Type::Fraction];
const FILL: &[Type] = &[Type::None, Type::Color];
const TRACKS: &[Type] = &[Type::Auto, Type::Int, Type::Relative, Type::Fraction, Type::Array];
const SPACING: &[Type] = &[Type::None, Type::Relative, Type::Fraction];
const DELIM: &[Type] = &[Type::None, Type::Str];

fn none() -> Value {
    Value::None
}

fn auto() -> Value {
    Value::Auto
}

fn yes() -> Value {
    Value::Bool(true)
}

fn no() -> Value {
    Value::Bool(false)
}

fn zero_pt() -> Value {
    Value::Length(Length::zero())
}

fn empty_array() -> Value {
    Value::Array(Array::new())
}

fn paren() -> Value {
    Value::str("(")
}

macro_rules! elements {
    ($($(#[$attr:meta])* $variant:ident => $name:literal, $params:expr;)*) => {
        /// The kind of a content element.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ElemKind {
            $($(#[$attr])* $variant,)*
        }

        impl ElemKind {
            /// Every element kind.
            pub const ALL: &'static [ElemKind] = &[$(ElemKind::$variant,)*];

            /// The element's canonical name, as matched by selectors.
            pub const fn name(self) -> &'static str {
                match self {
                    $(ElemKind::$variant => $name,)*
                }
            }

            /// The element's fields.
            pub const fn params(self) -> &'static [ParamInfo] {
                match self {
                    $(ElemKind::$variant => {
                        const PARAMS: &[ParamInfo] = $params;
                        PARAMS
                    })*
                }
            }

            /// The element function constructing this kind.
            pub fn func(self) -> &'static NativeFunc {
                match self {
                    $(ElemKind::$variant => {
                        static FUNC: NativeFunc = NativeFunc {
                            name: $name,
                            params: ElemKind::$variant.params(),
                            func: |engine, context, args| {
                                construct(ElemKind::$variant, engine, context, args)
                            },
                            element: Some(ElemKind::$variant),
                            scope: ElemKind::$variant.scope(),
                        };
                        &FUNC
                    })*
                }
            }
        }
    };
}

elements! {
    Text => "text", &[
        ParamInfo::positional("text", STR),
        ParamInfo::settable("fill", FILL, || Value::Color(Color::BLACK)),
        ParamInfo::settable("size", LENGTH, || Value::Length(Length::pt(11.0))),
        ParamInfo::settable("weight", &[Type::Int, Type::Str], || Value::str("regular")),
        ParamInfo::settable("style", STR, || Value::str("normal")),
        ParamInfo::settable("font", &[Type::Str, Type::Array], || Value::str("libertinus serif")),
        ParamInfo::settable("lang", STR, || Value::str("en")),
    ];
    Space => "space", &[];
    Linebreak => "linebreak", &[
        ParamInfo::settable("justify", BOOL, no),
    ];
    Parbreak => "parbreak", &[];
    SmartQuote => "smartquote", &[
        ParamInfo::settable("double", BOOL, yes),
    ];
    Strong => "strong", &[
        ParamInfo::settable("delta", INT, || Value::Int(300)),
        ParamInfo::positional("body", CONTENT),
    ];
    Emph => "emph", &[
        ParamInfo::positional("body", CONTENT),
    ];
    Raw => "raw", &[
        ParamInfo::positional("text", STR),
        ParamInfo::settable("block", BOOL, no),
        ParamInfo::settable("lang", STR_OR_NONE, none),
    ];
    Link => "link", &[
        ParamInfo::positional("dest", &[Type::Str, Type::Label]),
        ParamInfo::positional("body", CONTENT),
    ];
    Ref => "ref", &[
        ParamInfo::positional("target", &[Type::Label]),
        ParamInfo::settable("supplement", CONTENT_OR_NONE, none),
    ];
    Heading => "heading", &[
        ParamInfo::settable("level", INT, || Value::Int(1)),
        ParamInfo::settable("numbering", STR_OR_NONE, none),
        ParamInfo::settable("outlined", BOOL, yes),
        ParamInfo::positional("body", CONTENT),
    ];
    ListItem => "list.item", &[
        ParamInfo::positional("body", CONTENT),
    ];
    EnumItem => "enum.item", &[
        ParamInfo::positional("number", INT_OR_NONE).or(none),
        ParamInfo::positional("body", CONTENT),
    ];
    TermsItem => "terms.item", &[
        ParamInfo::positional("term", CONTENT),
        ParamInfo::positional("description", CONTENT),
    ];
    List => "list", &[
        ParamInfo::settable("tight", BOOL, yes),
        ParamInfo::settable("marker", &[Type::Content, Type::Array], || Value::str("•")),
        ParamInfo::variadic("children", CONTENT),
    ];
    Enum => "enum", &[
        ParamInfo::settable("tight", BOOL, yes),
        ParamInfo::settable("numbering", STR, || Value::str("1.")),
        ParamInfo::settable("start", INT, || Value::Int(1)),
        ParamInfo::variadic("children", CONTENT),
    ];
    Terms => "terms", &[
        ParamInfo::settable("tight", BOOL, yes),
        ParamInfo::settable("separator", CONTENT, || Value::str(": ")),
        ParamInfo::variadic("children", CONTENT),
    ];
    Par => "par", &[
        ParamInfo::settable("justify", BOOL, no),
        ParamInfo::settable("leading", LENGTH, || Value::Length(Length::em(0.65))),
        ParamInfo::positional("body", CONTENT),
    ];
    Box => "box", &[
        ParamInfo::settable("width", SIZING, auto),
        ParamInfo::settable("height", SIZING, auto),
        ParamInfo::settable("fill", FILL, none),
        ParamInfo::settable("inset", RELATIVE, zero_pt),
        ParamInfo::positional("body", CONTENT_OR_NONE).or(none),
    ];
    Block => "block", &[
        ParamInfo::settable("width", SIZING, auto),
        ParamInfo::settable("height", SIZING, auto),
        ParamInfo::settable("fill", FILL, none),
        ParamInfo::settable("inset", RELATIVE, zero_pt),
        ParamInfo::settable("breakable", BOOL, yes),
        ParamInfo::positional("body", CONTENT_OR_NONE).or(none),
    ];
    Pad => "pad", &[
        ParamInfo::settable("left", RELATIVE, zero_pt),
        ParamInfo::settable("top", RELATIVE, zero_pt),
        ParamInfo::settable("right", RELATIVE, zero_pt),
        ParamInfo::settable("bottom", RELATIVE, zero_pt),
        ParamInfo::settable("x", RELATIVE, zero_pt),
        ParamInfo::settable("y", RELATIVE, zero_pt),
        ParamInfo::settable("rest", RELATIVE, zero_pt),
        ParamInfo::positional("body", CONTENT),
    ];
    Stack => "stack", &[
        ParamInfo::settable("dir", &[Type::Direction], || Value::Direction(Direction::Ttb)),
        ParamInfo::settable("spacing", SPACING, none),
        ParamInfo::variadic("children", &[Type::Content, Type::Relative, Type::Fraction]),
    ];
    Grid => "grid", &[
        ParamInfo::settable("columns", TRACKS, empty_array),
        ParamInfo::settable("rows", TRACKS, empty_array),
        ParamInfo::settable("gutter", TRACKS, empty_array),
        ParamInfo::variadic("children", CONTENT),
    ];
    Align => "align", &[
        ParamInfo::settable("alignment", &[Type::Alignment], || Value::Alignment(Alignment::START))
            .also_positional(),
        ParamInfo::positional("body", CONTENT),
    ];
    Page => "page", &[
        ParamInfo::settable("paper", STR, || Value::str("a4")),
        ParamInfo::settable("width", &[Type::Auto, Type::Length], || Value::Length(Length::mm(210.0))),
        ParamInfo::settable("height", &[Type::Auto, Type::Length], || Value::Length(Length::mm(297.0))),
        ParamInfo::settable("margin", &[Type::Auto, Type::Relative, Type::Dict], auto),
        ParamInfo::settable("fill", FILL, none),
        ParamInfo::settable("numbering", STR_OR_NONE, none),
        ParamInfo::positional("body", CONTENT).or(|| Value::Content(Content::empty())),
    ];
    /// Content with styles applied to it.
    Styled => "styled", &[
        ParamInfo::positional("child", CONTENT),
        ParamInfo::positional("styles", &[Type::Styles]),
    ];
    /// Content whose production waits for the style chain.
    Context => "context", &[
        ParamInfo::positional("func", &[Type::Func]),
    ];
    Equation => "equation", &[
        ParamInfo::settable("block", BOOL, no),
        ParamInfo::settable("numbering", STR_OR_NONE, none),
        ParamInfo::positional("body", CONTENT),
    ];
    Frac => "frac", &[
        ParamInfo::positional("num", CONTENT),
        ParamInfo::positional("denom", CONTENT),
    ];
    Root => "root", &[
        ParamInfo::positional("index", CONTENT_OR_NONE).or(none),
        ParamInfo::positional("radicand", CONTENT),
    ];
    Attach => "attach", &[
        ParamInfo::positional("base", CONTENT),
        ParamInfo::named("t", CONTENT_OR_NONE, none),
        ParamInfo::named("b", CONTENT_OR_NONE, none),
        ParamInfo::named("tl", CONTENT_OR_NONE, none),
        ParamInfo::named("bl", CONTENT_OR_NONE, none),
        ParamInfo::named("tr", CONTENT_OR_NONE, none),
        ParamInfo::named("br", CONTENT_OR_NONE, none),
        ParamInfo::named("primes", INT, || Value::Int(0)),
    ];
    /// Delimited math: `(a + b)`.
    Lr => "lr", &[
        ParamInfo::settable("size", &[Type::Auto, Type::Relative], auto),
        ParamInfo::positional("body", CONTENT),
    ];
    AlignPoint => "align-point", &[];
    Mat => "mat", &[
        ParamInfo::settable("delim", DELIM, paren),
        ParamInfo::variadic("rows", &[Type::Array]),
    ];
    Vec => "vec", &[
        ParamInfo::settable("delim", DELIM, paren),
        ParamInfo::variadic("children", CONTENT),
    ];
    Cases => "cases", &[
        ParamInfo::settable("delim", DELIM, || Value::str("{")),
        ParamInfo::settable("reverse", BOOL, no),
        ParamInfo::variadic("children", CONTENT),
    ];
    /// A letter or operator character in math.
    Symbol => "symbol", &[
        ParamInfo::positional("text", STR),
    ];
    Limits => "limits", &[
        ParamInfo::settable("inline", BOOL, yes),
        ParamInfo::positional("body", CONTENT),
    ];
    Accent => "accent", &[
        ParamInfo::positional("base", CONTENT),
        ParamInfo::positional("accent", STR),
    ];
    /// A text operator such as `sin` or `lim`.
    Op => "op", &[
        ParamInfo::positional("text", CONTENT),
        ParamInfo::settable("limits", BOOL, no),
    ];
}

impl ElemKind {
    /// Look a kind up by its canonical name.
    pub fn from_name(name: &str) -> Option<ElemKind> {
        ElemKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// The schema entry for a field.
    pub fn param(self, name: &str) -> Option<&'static ParamInfo> {
        self.params().iter().find(|param| param.name == name)
    }

    /// The default of a field, if it has one.
    pub fn default_of(self, name: &str) -> Option<Value> {
        self.param(name).and_then(ParamInfo::default_value)
    }

    /// Whether a label written after the element attaches to it.
    pub const fn is_labellable(self) -> bool {
        !matches!(self, ElemKind::Space | ElemKind::Parbreak)
    }

    /// Whether the kind is a list, enum or term item.
    pub const fn is_list_item(self) -> bool {
        matches!(self, ElemKind::ListItem | ElemKind::EnumItem | ElemKind::TermsItem)
    }

    /// The container an item of this kind groups into.
    pub const fn list_container(self) -> Option<ElemKind> {
        match self {
            ElemKind::ListItem => Some(ElemKind::List),
            ElemKind::EnumItem => Some(ElemKind::Enum),
            ElemKind::TermsItem => Some(ElemKind::Terms),
            _ => None,
        }
    }

    const fn scope(self) -> Option<fn() -> Scope> {
        match self {
            ElemKind::List => Some(list_scope),
            ElemKind::Enum => Some(enum_scope),
            ElemKind::Terms => Some(terms_scope),
            _ => None,
        }
    }
}

fn item_scope(kind: ElemKind) -> Scope {
    let mut scope = Scope::new();
    scope.define("item", Value::Func(Func::Native(kind.func())));
    scope
}

fn list_scope() -> Scope {
    item_scope(ElemKind::ListItem)
}

fn enum_scope() -> Scope {
    item_scope(ElemKind::EnumItem)
}

fn terms_scope() -> Scope {
    item_scope(ElemKind::TermsItem)
}

/// A readable list of accepted types: `content, string or none`.
pub(crate) fn describe_types(types: &[Type]) -> String {
    let names: Vec<&str> = types.iter().map(|ty| ty.long_name()).collect();
    match names.as_slice() {
        [] => "any".into(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

/// Check a field value against its parameter, converting where the
/// parameter allows it.
///
/// Returns `None` for `auto` on a parameter that does not accept it: the
/// field then falls back to set rules and its default.
pub(crate) fn cast_field(param: &ParamInfo, value: Value) -> SourceResult<Option<Value>> {
    let accepts = param.accepts;
    if accepts.is_empty() || accepts.contains(&value.ty()) {
        return Ok(Some(value));
    }
    if matches!(value, Value::Auto) {
        return Ok(None);
    }
    if accepts.contains(&Type::Relative) && matches!(value, Value::Length(_) | Value::Ratio(_)) {
        return Ok(Some(value));
    }
    if accepts.contains(&Type::Content) {
        if let Ok(content) = Content::from_value(value.clone()) {
            return Ok(Some(Value::Content(content)));
        }
    }
    Err(type_mismatch(describe_types(accepts), value.ty().long_name()))
}

/// Extract an element's fields from call arguments.
///
/// Positional parameters are filled in order; an optional positional
/// parameter only takes an argument when enough remain for the required
/// ones after it.
pub fn build(kind: ElemKind, args: &mut Args) -> SourceResult<Elem> {
    let mut elem = Elem::new(kind).spanned(args.span);
    let params = kind.params();
    let mut remaining = args.count_positional();
    let mut required = params
        .iter()
        .filter(|p| p.positional && p.required && !p.variadic)
        .count();

    for param in params {
        if param.variadic {
            let mut items = Array::new();
            for item in args.all_spanned() {
                if let Some(value) = cast_field(param, item.v).at(item.span)? {
                    items.push(value);
                }
            }
            elem.push_field(param.name, Value::Array(items));
            remaining = 0;
            continue;
        }

        let mut given = if param.named {
            args.named_spanned(param.name)
        } else {
            None
        };
        if param.positional && param.required {
            required = required.saturating_sub(1);
        }
        if given.is_none() && param.positional && (param.required || remaining > required) {
            given = args.eat_spanned();
            if given.is_some() {
                remaining = remaining.saturating_sub(1);
            }
        }

        match given {
            Some(item) => {
                if let Some(value) = cast_field(param, item.v).at(item.span)? {
                    elem.push_field(param.name, value);
                }
            }
            None if param.required => {
                return Err(missing_argument(param.name).with_span(args.span));
            }
            None => {}
        }
    }

    Ok(elem)
}

/// Extract set-rule arguments for an element: only settable fields.
pub fn set_args(kind: ElemKind, args: &mut Args) -> SourceResult<Args> {
    let mut out = Args::new(args.span);
    for param in kind.params().iter().filter(|p| p.settable) {
        let mut given = args.named_spanned(param.name);
        if given.is_none() && param.positional {
            given = args.eat_spanned();
        }
        if let Some(item) = given {
            if let Some(value) = cast_field(param, item.v).at(item.span)? {
                out.push_named(param.name, item.span, value);
            }
        }
    }
    Ok(out)
}

/// The element constructor behind every element function.
fn construct(
    kind: ElemKind,
    _engine: &mut Engine,
    _context: &Context,
    args: &mut Args,
) -> SourceResult<Value> {
    match kind {
        ElemKind::Text => construct_text(args),
        ElemKind::Link => construct_link(args),
        ElemKind::Styled | ElemKind::Context => {
            Err(crate::errors::EvalError::new(format!("cannot construct {} elements directly", kind.name()))
                .with_span(args.span))
        }
        _ => Ok(Value::Content(build(kind, args)?.pack())),
    }
}

/// `text("a")` builds a text element; `text(fill: red)[..]` styles content.
fn construct_text(args: &mut Args) -> SourceResult<Value> {
    let span = args.span;
    let settings = set_args(ElemKind::Text, args)?;
    let body = args
        .eat_spanned()
        .ok_or_else(|| missing_argument("body").with_span(span))?;
    match body.v {
        Value::Str(text) => {
            let mut elem = Elem::text(text).spanned(span);
            for arg in settings.items {
                if let Some(name) = ElemKind::Text.param(&arg.name.unwrap_or_default()) {
                    elem.push_field(name.name, arg.value.v);
                }
            }
            Ok(Value::Content(elem.pack()))
        }
        other => {
            let content = Content::from_value(other).at(body.span)?;
            if settings.items.is_empty() {
                return Ok(Value::Content(content));
            }
            let rule = SetRule {
                target: ElemKind::Text,
                args: settings,
                span,
                liftable: false,
            };
            Ok(Value::Content(content.styled(Styles::from_rule(rule))))
        }
    }
}

/// A link's body defaults to its destination.
fn construct_link(args: &mut Args) -> SourceResult<Value> {
    let span = args.span;
    let dest = args
        .eat_spanned()
        .ok_or_else(|| missing_argument("dest").with_span(span))?;
    let body = match args.eat::<Content>()? {
        Some(body) => body,
        None => match &dest.v {
            Value::Str(url) => Content::text(strip_scheme(url)),
            other => other.clone().display(),
        },
    };
    let param = ElemKind::Link.params().first();
    let dest = match param {
        Some(param) => cast_field(param, dest.v).at(dest.span)?.unwrap_or_default(),
        None => dest.v,
    };
    let elem = Elem::new(ElemKind::Link)
        .spanned(span)
        .with_field("dest", dest)
        .with_field("body", Value::Content(body));
    Ok(Value::Content(elem.pack()))
}

fn strip_scheme(url: &str) -> Str {
    ["mailto:", "tel:", "https://", "http://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .unwrap_or(url)
        .into()
}
