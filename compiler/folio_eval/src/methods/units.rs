//! Methods on dimensions, colors, times, versions and directions.

use crate::args::Args;
use crate::errors::{index_out_of_bounds, EvalError, SourceResult};
use crate::value::{
    Alignment, Color, Datetime, Direction, Duration, Length, Ratio, Str, Value, Version,
};

pub(super) const LENGTH_METHODS: &[&str] = &["pt", "mm", "cm", "inches"];
pub(super) const COLOR_METHODS: &[&str] = &["lighten", "darken", "negate", "to-hex", "components"];
pub(super) const DATETIME_METHODS: &[&str] = &[
    "year", "month", "weekday", "day", "hour", "minute", "second", "ordinal", "display",
];
pub(super) const DURATION_METHODS: &[&str] = &["seconds", "minutes", "hours", "days", "weeks"];
pub(super) const VERSION_METHODS: &[&str] = &["at"];
pub(super) const DIRECTION_METHODS: &[&str] = &["axis", "start", "end", "inv"];
pub(super) const ALIGNMENT_METHODS: &[&str] = &["axis", "inv"];

pub(super) fn length(length: Length, name: &str) -> Option<SourceResult<Value>> {
    let convert = |f: fn(Length) -> f64| {
        if length.em == 0.0 {
            Ok(Value::Float(f(length)))
        } else {
            Err(EvalError::new(format!(
                "cannot convert a length with non-zero em units (`{length}`) to {name}"
            ))
            .with_hint(format!("use `length.abs.{name}()` instead to ignore its em component")))
        }
    };
    Some(match name {
        "pt" => convert(|l| l.abs),
        "mm" => convert(Length::to_mm),
        "cm" => convert(Length::to_cm),
        "inches" => convert(Length::to_inches),
        _ => return None,
    })
}

pub(super) fn length_field(length: Length, name: &str) -> Option<Value> {
    match name {
        "abs" => Some(Value::Length(Length::pt(length.abs))),
        "em" => Some(Value::Float(length.em)),
        _ => None,
    }
}

pub(super) fn color(color: Color, name: &str, args: &mut Args) -> Option<SourceResult<Value>> {
    let factor = |args: &mut Args| -> SourceResult<f64> {
        let Ratio(factor) = args.expect::<Ratio>("factor")?;
        Ok(factor.clamp(0.0, 1.0))
    };
    Some(match name {
        "lighten" => factor(args).map(|f| Value::Color(color.lighten(f))),
        "darken" => factor(args).map(|f| Value::Color(color.darken(f))),
        "negate" => Ok(Value::Color(color.negate())),
        "to-hex" => Ok(Value::str(color.to_hex())),
        "components" => Ok(Value::Array(
            [color.r, color.g, color.b, color.a]
                .into_iter()
                .map(|c| Value::Int(i64::from(c)))
                .collect(),
        )),
        _ => return None,
    })
}

pub(super) fn datetime(
    datetime: Datetime,
    name: &str,
    args: &mut Args,
) -> Option<SourceResult<Value>> {
    let part = |v: Option<i64>| -> SourceResult<Value> { Ok(v.map_or(Value::None, Value::Int)) };
    Some(match name {
        "year" => part(datetime.year()),
        "month" => part(datetime.month()),
        "day" => part(datetime.day()),
        "weekday" => part(datetime.weekday()),
        "ordinal" => part(datetime.ordinal()),
        "hour" => part(datetime.hour()),
        "minute" => part(datetime.minute()),
        "second" => part(datetime.second()),
        "display" => args.eat::<Str>().and_then(|pattern| {
            datetime
                .display(pattern.as_deref())
                .map(Value::str)
                .map_err(EvalError::new)
        }),
        _ => return None,
    })
}

pub(super) fn duration(duration: Duration, name: &str) -> Option<SourceResult<Value>> {
    let total = match name {
        "seconds" => duration.seconds(),
        "minutes" => duration.minutes(),
        "hours" => duration.hours(),
        "days" => duration.days(),
        "weeks" => duration.weeks(),
        _ => return None,
    };
    Some(Ok(Value::Float(total)))
}

pub(super) fn version(version: &Version, name: &str, args: &mut Args) -> Option<SourceResult<Value>> {
    match name {
        "at" => Some(args.expect::<i64>("index").and_then(|index| {
            let len = version.components().len();
            let resolved = if index >= 0 {
                usize::try_from(index).ok()
            } else {
                len.checked_sub(index.unsigned_abs() as usize)
            };
            match resolved {
                Some(i) if i < len => Ok(Value::Int(i64::from(version.at(i)))),
                _ => Err(index_out_of_bounds(index, len)),
            }
        })),
        _ => None,
    }
}

pub(super) fn version_field(version: &Version, name: &str) -> Option<Value> {
    let index = match name {
        "major" => 0,
        "minor" => 1,
        "patch" => 2,
        _ => return None,
    };
    Some(Value::Int(i64::from(version.at(index))))
}

pub(super) fn direction(dir: Direction, name: &str) -> Option<SourceResult<Value>> {
    Some(Ok(match name {
        "axis" => Value::str(dir.axis()),
        "start" => Value::Alignment(dir.start()),
        "end" => Value::Alignment(dir.end()),
        "inv" => Value::Direction(dir.inv()),
        _ => return None,
    }))
}

pub(super) fn alignment(align: Alignment, name: &str) -> Option<SourceResult<Value>> {
    Some(Ok(match name {
        "axis" => align.axis().map_or(Value::None, Value::str),
        "inv" => Value::Alignment(align.inv()),
        _ => return None,
    }))
}

/// `x` and `y` of a 2D alignment.
pub(super) fn alignment_field(align: Alignment, name: &str) -> Option<Value> {
    let part = match name {
        "x" => align.x.map(|x| Alignment { x: Some(x), y: None }),
        "y" => align.y.map(|y| Alignment { x: None, y: Some(y) }),
        _ => return None,
    };
    Some(part.map_or(Value::Auto, Value::Alignment))
}

