//! Data loading: `read`, `json`, `yaml`, `toml`, `csv` and `xml`.
//!
//! Every loader takes either a path, resolved relative to the calling file
//! and read through the world, or raw bytes. Parse failures of the format
//! crates surface as `FileParseError` naming the format.

use folio_eval::errors::{
    constructor_error, file_parse_error, file_read_error, missing_argument, type_mismatch, At,
    SourceResult,
};
use folio_eval::value::{Array, Bytes, Datetime, Dict, Str, Type, Value};
use folio_eval::{Args, Engine, Func, NativeFunc, ParamInfo, Scope};
use folio_ir::Span;

pub(crate) fn define(global: &mut Scope) {
    global.define("read", Func::Native(&READ));
    global.define("json", Func::Native(&JSON));
    global.define("yaml", Func::Native(&YAML));
    global.define("toml", Func::Native(&TOML));
    global.define("csv", Func::Native(&CSV));
    global.define("xml", Func::Native(&XML));
}

const SOURCE: &[Type] = &[Type::Str, Type::Bytes];

/// Raw data and a name for it in error messages.
struct Loaded {
    data: Bytes,
    name: String,
    span: Span,
}

impl Loaded {
    fn text(&self) -> SourceResult<&str> {
        std::str::from_utf8(self.data.as_slice())
            .map_err(|_| file_read_error(&self.name, "file is not valid utf-8"))
            .at(self.span)
    }
}

/// Take the `source` argument and load what it refers to.
fn load(engine: &Engine, args: &mut Args) -> SourceResult<Loaded> {
    let Some(source) = args.eat_spanned() else {
        return Err(missing_argument("source").with_span(args.span));
    };
    let span = source.span;
    match source.v {
        Value::Str(path) => {
            let id = engine.locate(span, &path);
            tracing::debug!(path = %path, "loading data file");
            let data = engine.load(id).at(span)?;
            Ok(Loaded {
                data,
                name: path.to_string(),
                span,
            })
        }
        Value::Bytes(data) => Ok(Loaded {
            data,
            name: "bytes".into(),
            span,
        }),
        other => Err(type_mismatch("string or bytes", other.ty().long_name()).with_span(span)),
    }
}

static READ: NativeFunc = NativeFunc {
    name: "read",
    params: &[
        ParamInfo::positional("path", &[Type::Str]),
        ParamInfo::named("encoding", &[Type::None, Type::Str], || Value::str("utf8")),
    ],
    func: |engine, _, args| {
        let Some(path) = args.eat_spanned() else {
            return Err(missing_argument("path").with_span(args.span));
        };
        let span = path.span;
        let path = match path.v {
            Value::Str(path) => path,
            other => return Err(type_mismatch("string", other.ty().long_name()).with_span(span)),
        };
        let encoding = args.named::<Option<Str>>("encoding")?.unwrap_or(Some("utf8".into()));

        let id = engine.locate(span, &path);
        let data = engine.load(id).at(span)?;
        match encoding.as_deref() {
            None => Ok(Value::Bytes(data)),
            Some("utf8") => {
                let text = std::str::from_utf8(data.as_slice())
                    .map_err(|_| file_read_error(&path, "file is not valid utf-8"))
                    .at(span)?;
                Ok(Value::str(text))
            }
            Some(other) => Err(constructor_error(format!("unknown encoding `{other}`")).with_span(span)),
        }
    },
    element: None,
    scope: None,
};

static JSON: NativeFunc = NativeFunc {
    name: "json",
    params: &[ParamInfo::positional("source", SOURCE)],
    func: |engine, _, args| {
        let loaded = load(engine, args)?;
        let parsed: serde_json::Value = serde_json::from_slice(loaded.data.as_slice())
            .map_err(|err| file_parse_error("json", err))
            .at(loaded.span)?;
        Ok(from_json(parsed))
    },
    element: None,
    scope: None,
};

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(v) => Value::Bool(v),
        serde_json::Value::Number(v) => match v.as_i64() {
            Some(int) => Value::Int(int),
            None => Value::Float(v.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(v) => Value::str(v),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::Dict(
            map.into_iter()
                .map(|(key, value)| (Str::from(key), from_json(value)))
                .collect(),
        ),
    }
}

static YAML: NativeFunc = NativeFunc {
    name: "yaml",
    params: &[ParamInfo::positional("source", SOURCE)],
    func: |engine, _, args| {
        let loaded = load(engine, args)?;
        let parsed: serde_yaml::Value = serde_yaml::from_slice(loaded.data.as_slice())
            .map_err(|err| file_parse_error("yaml", err))
            .at(loaded.span)?;
        from_yaml(parsed).at(loaded.span)
    },
    element: None,
    scope: None,
};

fn from_yaml(value: serde_yaml::Value) -> SourceResult<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::None,
        serde_yaml::Value::Bool(v) => Value::Bool(v),
        serde_yaml::Value::Number(v) => match v.as_i64() {
            Some(int) => Value::Int(int),
            None => Value::Float(v.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(v) => Value::str(v),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<SourceResult<Array>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut dict = Dict::new();
            for (key, value) in map {
                dict.insert(yaml_key(key)?, from_yaml(value)?);
            }
            Value::Dict(dict)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

/// Dictionary keys are strings; scalar keys are converted.
fn yaml_key(key: serde_yaml::Value) -> SourceResult<Str> {
    match key {
        serde_yaml::Value::String(v) => Ok(v.into()),
        serde_yaml::Value::Bool(v) => Ok(v.to_string().into()),
        serde_yaml::Value::Number(v) => Ok(v.to_string().into()),
        serde_yaml::Value::Null => Ok("null".into()),
        _ => Err(file_parse_error("yaml", "mapping keys must be strings, numbers or booleans")),
    }
}

static TOML: NativeFunc = NativeFunc {
    name: "toml",
    params: &[ParamInfo::positional("source", SOURCE)],
    func: |engine, _, args| {
        let loaded = load(engine, args)?;
        let table: toml::Table = loaded
            .text()?
            .parse()
            .map_err(|err: toml::de::Error| file_parse_error("toml", err.message()))
            .at(loaded.span)?;
        Ok(from_toml(toml::Value::Table(table)))
    },
    element: None,
    scope: None,
};

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(v) => Value::str(v),
        toml::Value::Integer(v) => Value::Int(v),
        toml::Value::Float(v) => Value::Float(v),
        toml::Value::Boolean(v) => Value::Bool(v),
        toml::Value::Datetime(v) => from_toml_datetime(&v),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Dict(
            table
                .into_iter()
                .map(|(key, value)| (Str::from(key), from_toml(value)))
                .collect(),
        ),
    }
}

/// Offset datetimes have no counterpart and stay strings.
fn from_toml_datetime(value: &toml::value::Datetime) -> Value {
    let datetime = match (value.date, value.time, value.offset) {
        (Some(date), None, None) => {
            Datetime::from_ymd(i32::from(date.year), u32::from(date.month), u32::from(date.day))
        }
        (None, Some(time), None) => Datetime::from_hms(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
        ),
        (Some(date), Some(time), None) => Datetime::from_ymd_hms(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
        ),
        _ => None,
    };
    datetime.map_or_else(|| Value::str(value.to_string()), Value::Datetime)
}

static CSV: NativeFunc = NativeFunc {
    name: "csv",
    params: &[
        ParamInfo::positional("source", SOURCE),
        ParamInfo::named("delimiter", &[Type::Str], || Value::str(",")),
        ParamInfo::named("row-type", &[Type::Type, Type::Str], || Value::Type(Type::Array)),
    ],
    func: |engine, _, args| {
        let loaded = load(engine, args)?;
        let delimiter = match args.named_spanned("delimiter") {
            Some(given) => csv_delimiter(given.v).at(given.span)?,
            None => b',',
        };
        let dict_rows = match args.named_spanned("row-type") {
            Some(given) => csv_row_type(given.v).at(given.span)?,
            None => false,
        };
        read_csv(&loaded, delimiter, dict_rows).at(loaded.span)
    },
    element: None,
    scope: None,
};

/// The delimiter must be a single ASCII character.
fn csv_delimiter(value: Value) -> SourceResult<u8> {
    let Value::Str(s) = value else {
        return Err(type_mismatch("string", value.ty().long_name()));
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        (Some(_), None) => Err(constructor_error("delimiter must be an ASCII character")),
        _ => Err(constructor_error("delimiter must be exactly one character")),
    }
}

/// Whether rows become dictionaries keyed by the header row.
fn csv_row_type(value: Value) -> SourceResult<bool> {
    match value {
        Value::Type(Type::Array) => Ok(false),
        Value::Type(Type::Dict) => Ok(true),
        Value::Str(s) if s.as_str() == "array" => Ok(false),
        Value::Str(s) if matches!(s.as_str(), "dict" | "dictionary") => Ok(true),
        _ => Err(constructor_error("row type must be either `array` or `dictionary`")),
    }
}

fn read_csv(loaded: &Loaded, delimiter: u8, dict_rows: bool) -> SourceResult<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(dict_rows)
        .delimiter(delimiter)
        .from_reader(loaded.data.as_slice());

    let headers: Vec<Str> = if dict_rows {
        reader
            .headers()
            .map_err(|err| csv_error(&err))?
            .iter()
            .map(Str::from)
            .collect()
    } else {
        Vec::new()
    };

    let mut rows = Array::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_error(&err))?;
        let row = if dict_rows {
            Value::Dict(
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(Value::str))
                    .collect(),
            )
        } else {
            Value::Array(record.iter().map(Value::str).collect())
        };
        rows.push(row);
    }
    Ok(Value::Array(rows))
}

fn csv_error(err: &csv::Error) -> folio_eval::EvalError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map_or(0, csv::Position::line);
            file_parse_error(
                "csv",
                format!("found {len} instead of {expected_len} fields in line {line}"),
            )
        }
        _ => file_parse_error("csv", err),
    }
}

static XML: NativeFunc = NativeFunc {
    name: "xml",
    params: &[ParamInfo::positional("source", SOURCE)],
    func: |engine, _, args| {
        let loaded = load(engine, args)?;
        let text = loaded.text()?;
        let document = roxmltree::Document::parse(text)
            .map_err(|err| file_parse_error("xml", err))
            .at(loaded.span)?;
        Ok(xml_children(document.root()))
    },
    element: None,
    scope: None,
};

/// The element and text children of a node; comments and processing
/// instructions are dropped.
fn xml_children(node: roxmltree::Node) -> Value {
    Value::Array(node.children().filter_map(from_xml).collect())
}

fn from_xml(node: roxmltree::Node) -> Option<Value> {
    if node.is_text() {
        return node.text().map(Value::str);
    }
    if !node.is_element() {
        return None;
    }

    let attrs: Dict = node
        .attributes()
        .map(|attr| (Str::from(attr.name()), Value::str(attr.value())))
        .collect();
    let mut dict = Dict::new();
    dict.insert("tag".into(), Value::str(node.tag_name().name()));
    dict.insert("attrs".into(), Value::Dict(attrs));
    dict.insert("children".into(), xml_children(node));
    Some(Value::Dict(dict))
}
