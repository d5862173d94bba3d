//! Fixed vocabularies of the hosted rules language.
//!
//! Keyword and builtin lists feed the completion assembler; the construct
//! keyword set drives build-vs-eval routing in the dispatcher.

use once_cell::sync::Lazy;

/// Two-character prefix marking a magic cell.
pub const MAGIC_PREFIX: &str = "%%";

/// Magic command: the next cell is executed as scripting code.
pub const MAGIC_SCRIPT: &str = "enter-scripting-mode";

/// Magic command: the next cell defines a scripted function inside the engine.
pub const MAGIC_DEFINE_FUNCTION: &str = "enter-define-function-mode";

/// All magic command words, for completion.
pub const MAGIC_COMMANDS: [&str; 2] = [MAGIC_SCRIPT, MAGIC_DEFINE_FUNCTION];

/// Keywords opening a construct definition. Forms led by one of these are
/// compiled into the engine instead of being evaluated.
pub const CONSTRUCT_KEYWORDS: [&str; 7] = [
    "deftemplate",
    "deffunction",
    "defmodule",
    "defrule",
    "defclass",
    "defglobal",
    "deffacts",
];

/// Language keywords: construct openers plus control flow and pattern
/// connectives.
pub const KEYWORDS: [&str; 34] = [
    "deftemplate",
    "deffunction",
    "defmodule",
    "defrule",
    "defclass",
    "defglobal",
    "deffacts",
    "defgeneric",
    "defmethod",
    "definstances",
    "defmessage-handler",
    "if",
    "then",
    "else",
    "while",
    "loop-for-count",
    "progn",
    "switch",
    "case",
    "break",
    "return",
    "bind",
    "and",
    "or",
    "not",
    "test",
    "exists",
    "forall",
    "logical",
    "declare",
    "salience",
    "slot",
    "multislot",
    "is-a",
];

/// Standard builtin functions callable from expressions.
pub const BUILTINS: [&str; 52] = [
    "assert",
    "retract",
    "modify",
    "duplicate",
    "facts",
    "agenda",
    "run",
    "reset",
    "clear",
    "halt",
    "watch",
    "unwatch",
    "printout",
    "format",
    "read",
    "readline",
    "open",
    "close",
    "eval",
    "build",
    "load",
    "save",
    "batch",
    "system",
    "apropos",
    "str-cat",
    "sym-cat",
    "sub-string",
    "str-index",
    "str-length",
    "upcase",
    "lowcase",
    "gensym",
    "random",
    "time",
    "length$",
    "nth$",
    "member$",
    "subseq$",
    "create$",
    "delete$",
    "explode$",
    "implode$",
    "first$",
    "rest$",
    "insert$",
    "replace$",
    "numberp",
    "stringp",
    "symbolp",
    "integerp",
    "floatp",
];

static COMPLETION: Lazy<Vec<&'static str>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .chain(BUILTINS.iter())
        .chain(MAGIC_COMMANDS.iter())
        .copied()
        .collect()
});

/// Combined keyword + builtin + magic vocabulary, in stable order.
pub fn completion_vocabulary() -> &'static [&'static str] {
    &COMPLETION
}
