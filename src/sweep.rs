use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAB: Regex = Regex::new(r"\t").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref BOUNDARY_TAIL: Regex = Regex::new(r" -{2,}[^ \t].+\z").unwrap();
}

/// Delete tabs, collapse the remaining whitespace runs to one space, trim,
/// and drop a trailing MIME boundary fragment such as ` --=_NextPart_000`.
pub fn sweep(text: &str) -> String {
    let untabbed = TAB.replace_all(text, "");
    let collapsed = WHITESPACE.replace_all(untabbed.trim(), " ");
    BOUNDARY_TAIL.replace(&collapsed, "").into_owned()
}
