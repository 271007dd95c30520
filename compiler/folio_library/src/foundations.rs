//! Foundational functions: `range`, `repr`, `assert` and `panic`.

use folio_eval::errors::{assertion_failed, constructor_error, panic, type_mismatch};
use folio_eval::value::{Array, Str, Type, Value};
use folio_eval::{ops, Args, Context, Engine, Func, NativeFunc, ParamInfo, Scope, SourceResult};

pub(crate) fn define(global: &mut Scope) {
    global.define("range", Func::Native(&RANGE));
    global.define("repr", Func::Native(&REPR));
    global.define("assert", Func::Native(&ASSERT));
    global.define("panic", Func::Native(&PANIC));
}

const INT: &[Type] = &[Type::Int];
const STR: &[Type] = &[Type::Str];

static RANGE: NativeFunc = NativeFunc {
    name: "range",
    params: &[
        ParamInfo::positional("start", INT).or(|| Value::Int(0)),
        ParamInfo::positional("end", INT),
        ParamInfo::named("step", INT, || Value::Int(1)),
    ],
    func: range,
    element: None,
    scope: None,
};

/// `range(end)` or `range(start, end, step: n)`, excluding `end`.
fn range(_: &mut Engine, _: &Context, args: &mut Args) -> SourceResult<Value> {
    let first = args.expect::<i64>("end")?;
    let (start, end) = match args.eat::<i64>()? {
        Some(end) => (first, end),
        None => (0, first),
    };

    let step = match args.named_spanned("step") {
        Some(step) => {
            let span = step.span;
            match step.v {
                Value::Int(0) => return Err(constructor_error("step must not be zero").with_span(span)),
                Value::Int(n) => n,
                other => {
                    return Err(type_mismatch("integer", other.ty().long_name()).with_span(span))
                }
            }
        }
        None => 1,
    };

    let mut items = Array::new();
    let mut x = start;
    while (step > 0 && x < end) || (step < 0 && x > end) {
        items.push(Value::Int(x));
        match x.checked_add(step) {
            Some(next) => x = next,
            None => break,
        }
    }
    Ok(Value::Array(items))
}

static REPR: NativeFunc = NativeFunc {
    name: "repr",
    params: &[ParamInfo::positional("value", &[])],
    func: |_, _, args| {
        let value = args.expect::<Value>("value")?;
        Ok(Value::str(value.repr()))
    },
    element: None,
    scope: None,
};

static ASSERT: NativeFunc = NativeFunc {
    name: "assert",
    params: &[
        ParamInfo::positional("condition", &[Type::Bool]),
        ParamInfo::named("message", STR, || Value::None),
    ],
    func: assert,
    element: None,
    scope: Some(assert_scope),
};

fn assert_scope() -> Scope {
    let mut scope = Scope::new();
    scope.define("eq", Func::Native(&ASSERT_EQ));
    scope.define("ne", Func::Native(&ASSERT_NE));
    scope
}

fn assert(_: &mut Engine, _: &Context, args: &mut Args) -> SourceResult<Value> {
    let condition = args.expect::<bool>("condition")?;
    let message = args.named::<Str>("message")?;
    if condition {
        return Ok(Value::None);
    }
    let message = match message {
        Some(message) => format!("assertion failed: {message}"),
        None => "assertion failed".to_string(),
    };
    Err(assertion_failed(message).with_span(args.span))
}

static ASSERT_EQ: NativeFunc = NativeFunc {
    name: "eq",
    params: &[
        ParamInfo::positional("left", &[]),
        ParamInfo::positional("right", &[]),
        ParamInfo::named("message", STR, || Value::None),
    ],
    func: |_, _, args| compare_assert(args, true),
    element: None,
    scope: None,
};

static ASSERT_NE: NativeFunc = NativeFunc {
    name: "ne",
    params: &[
        ParamInfo::positional("left", &[]),
        ParamInfo::positional("right", &[]),
        ParamInfo::named("message", STR, || Value::None),
    ],
    func: |_, _, args| compare_assert(args, false),
    element: None,
    scope: None,
};

/// Shared body of `assert.eq` and `assert.ne`.
fn compare_assert(args: &mut Args, want_equal: bool) -> SourceResult<Value> {
    let left = args.expect::<Value>("left")?;
    let right = args.expect::<Value>("right")?;
    let message = args.named::<Str>("message")?;
    if ops::equal(&left, &right) == want_equal {
        return Ok(Value::None);
    }

    let message = match message {
        Some(message) => format!("assertion failed: {message}"),
        None if want_equal => format!(
            "equality assertion failed: value {} was not equal to {}",
            left.repr(),
            right.repr()
        ),
        None => format!(
            "inequality assertion failed: value {} was equal to {}",
            left.repr(),
            right.repr()
        ),
    };
    Err(assertion_failed(message).with_span(args.span))
}

static PANIC: NativeFunc = NativeFunc {
    name: "panic",
    params: &[ParamInfo::variadic("values", &[])],
    func: |_, _, args| {
        let span = args.span;
        let values = args.all::<Value>()?;
        let message = if values.is_empty() {
            "explicit panic".to_string()
        } else {
            values.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
        };
        Err(panic(message).with_span(span))
    },
    element: None,
    scope: None,
};
