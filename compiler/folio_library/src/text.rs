//! Text utilities: `lorem`, `upper` and `lower`.

use folio_eval::errors::{missing_argument, type_mismatch, SourceResult};
use folio_eval::value::{Str, Type, Value};
use folio_eval::{Args, Content, ElemKind, Func, NativeFunc, ParamInfo, Scope};

pub(crate) fn define(global: &mut Scope) {
    global.define("lorem", Func::Native(&LOREM));
    global.define("upper", Func::Native(&UPPER));
    global.define("lower", Func::Native(&LOWER));
}

/// The passage `lorem` draws from, repeated as often as needed.
const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magnam aliquam quaerat voluptatem. Ut enim \
    aeque doleamus animo, cum corpore dolemus, fieri tamen permagna accessio potest, si \
    aliquod aeternum et infinitum impendere malum nobis opinemur. Quod idem licet transferre \
    in voluptatem, ut postea variari voluptas distinguique possit, augeri amplificarique non \
    possit. At etiam Athenis, ut e patre audiebam facete et urbane Stoicos irridente, statua \
    est in quo a nobis philosophia defensa et collaudata est, cum id, quod maxime placeat, \
    facere possimus, omne voluptas assumenda est, omnis dolor repellendus.";

static LOREM: NativeFunc = NativeFunc {
    name: "lorem",
    params: &[ParamInfo::positional("words", &[Type::Int])],
    func: |_, _, args| {
        let words = args.expect::<usize>("words")?;
        Ok(Value::Str(lorem(words)))
    },
    element: None,
    scope: None,
};

/// The first `words` words of the placeholder passage.
///
/// The result always ends in a period so that it reads as a sentence.
pub(crate) fn lorem(words: usize) -> Str {
    let words: Vec<&str> = LOREM_IPSUM.split_whitespace().cycle().take(words).collect();
    let mut out = words.join(" ");
    while out.ends_with(',') || out.ends_with('.') {
        out.pop();
    }
    if !out.is_empty() {
        out.push('.');
    }
    out.into()
}

#[derive(Copy, Clone)]
enum Case {
    Upper,
    Lower,
}

impl Case {
    fn apply(self, text: &str) -> String {
        match self {
            Case::Upper => text.to_uppercase(),
            Case::Lower => text.to_lowercase(),
        }
    }
}

static UPPER: NativeFunc = NativeFunc {
    name: "upper",
    params: &[ParamInfo::positional("text", &[Type::Str, Type::Content])],
    func: |_, _, args| change_case(args, Case::Upper),
    element: None,
    scope: None,
};

static LOWER: NativeFunc = NativeFunc {
    name: "lower",
    params: &[ParamInfo::positional("text", &[Type::Str, Type::Content])],
    func: |_, _, args| change_case(args, Case::Lower),
    element: None,
    scope: None,
};

fn change_case(args: &mut Args, case: Case) -> SourceResult<Value> {
    let span = args.span;
    let Some(text) = args.eat_spanned() else {
        return Err(missing_argument("text").with_span(span));
    };
    match text.v {
        Value::Str(s) => Ok(Value::str(case.apply(&s))),
        Value::Content(content) => Ok(Value::Content(case_content(&content, case)?)),
        other => Err(type_mismatch("string or content", other.ty().long_name()).with_span(text.span)),
    }
}

/// Rewrite the text of every text element in the tree.
fn case_content(content: &Content, case: Case) -> SourceResult<Content> {
    let mut out = Content::empty();
    for elem in content.iter() {
        let elem = match (elem.kind(), elem.text_str()) {
            (ElemKind::Text, Some(text)) => {
                let text = case.apply(text);
                elem.clone().with_field("text", Value::str(text))
            }
            _ => elem.map_children(|child| case_content(child, case))?,
        };
        out.push(elem);
    }
    Ok(out)
}

#[cfg(test)]
mod tests;
