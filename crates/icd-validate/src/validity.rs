use icd_model::grammar::conforms;
use icd_model::{Code, CodeSet, FormHint, KindHint, ParseOptions};
use icd_normalization::resolve;

/// Whether `raw` is a well-formed code.
///
/// Never fails: malformed input, a kind hint the string does not satisfy,
/// and majors that cannot be padded all answer `false`. Without a kind hint
/// a string that is valid under both classifications (e.g. `V10`) is valid.
pub fn is_valid(raw: &str, kind: KindHint, form: FormHint) -> bool {
    let options = ParseOptions::new()
        .with_kind(kind)
        .with_form(form)
        .with_strict(true);
    is_valid_str(raw, &options)
}

/// [`is_valid`] with a full option set. The `strict` flag is ignored.
pub fn is_valid_str(raw: &str, options: &ParseOptions) -> bool {
    resolve(raw, &options.with_strict(true)).is_ok()
}

/// Whether a parsed code follows its own kind's grammar.
pub fn is_valid_code(code: &Code) -> bool {
    conforms(code)
}

pub fn filter_valid(codes: &CodeSet) -> CodeSet {
    codes.iter().filter(|code| conforms(code)).cloned().collect()
}

pub fn filter_invalid(codes: &CodeSet) -> CodeSet {
    codes.iter().filter(|code| !conforms(code)).cloned().collect()
}
