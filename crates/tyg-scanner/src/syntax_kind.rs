//! Token kinds and keyword/punctuation tables.

/// Kind of a scanned token.
///
/// Literal kinds (`Number`, `String`) cover every spelling; the parser
/// inspects the token text to tell ints from floats or bytes from f-strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,
    NewLineToken,
    IndentToken,
    DedentToken,

    // Literals and names
    Identifier,
    NumericLiteral,
    StringLiteral,

    // Keywords
    FalseKeyword,
    NoneKeyword,
    TrueKeyword,
    AndKeyword,
    AsKeyword,
    AssertKeyword,
    AsyncKeyword,
    AwaitKeyword,
    BreakKeyword,
    ClassKeyword,
    ContinueKeyword,
    DefKeyword,
    DelKeyword,
    ElifKeyword,
    ElseKeyword,
    ExceptKeyword,
    FinallyKeyword,
    ForKeyword,
    FromKeyword,
    GlobalKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    IsKeyword,
    LambdaKeyword,
    NonlocalKeyword,
    NotKeyword,
    OrKeyword,
    PassKeyword,
    RaiseKeyword,
    ReturnKeyword,
    TryKeyword,
    WhileKeyword,
    WithKeyword,
    YieldKeyword,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    OpenBraceToken,
    CloseBraceToken,
    CommaToken,
    ColonToken,
    SemicolonToken,
    DotToken,
    DotDotDotToken,
    AtToken,
    EqualsToken,
    MinusGreaterThanToken,
    ColonEqualsToken,

    // Operators
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    SlashSlashToken,
    PercentToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    TildeToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,

    // Augmented assignment
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    SlashSlashEqualsToken,
    PercentEqualsToken,
    AtEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
}

const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("False", SyntaxKind::FalseKeyword),
    ("None", SyntaxKind::NoneKeyword),
    ("True", SyntaxKind::TrueKeyword),
    ("and", SyntaxKind::AndKeyword),
    ("as", SyntaxKind::AsKeyword),
    ("assert", SyntaxKind::AssertKeyword),
    ("async", SyntaxKind::AsyncKeyword),
    ("await", SyntaxKind::AwaitKeyword),
    ("break", SyntaxKind::BreakKeyword),
    ("class", SyntaxKind::ClassKeyword),
    ("continue", SyntaxKind::ContinueKeyword),
    ("def", SyntaxKind::DefKeyword),
    ("del", SyntaxKind::DelKeyword),
    ("elif", SyntaxKind::ElifKeyword),
    ("else", SyntaxKind::ElseKeyword),
    ("except", SyntaxKind::ExceptKeyword),
    ("finally", SyntaxKind::FinallyKeyword),
    ("for", SyntaxKind::ForKeyword),
    ("from", SyntaxKind::FromKeyword),
    ("global", SyntaxKind::GlobalKeyword),
    ("if", SyntaxKind::IfKeyword),
    ("import", SyntaxKind::ImportKeyword),
    ("in", SyntaxKind::InKeyword),
    ("is", SyntaxKind::IsKeyword),
    ("lambda", SyntaxKind::LambdaKeyword),
    ("nonlocal", SyntaxKind::NonlocalKeyword),
    ("not", SyntaxKind::NotKeyword),
    ("or", SyntaxKind::OrKeyword),
    ("pass", SyntaxKind::PassKeyword),
    ("raise", SyntaxKind::RaiseKeyword),
    ("return", SyntaxKind::ReturnKeyword),
    ("try", SyntaxKind::TryKeyword),
    ("while", SyntaxKind::WhileKeyword),
    ("with", SyntaxKind::WithKeyword),
    ("yield", SyntaxKind::YieldKeyword),
];

/// Punctuation ordered longest first so a linear scan finds the longest match.
pub(crate) const PUNCTUATION: &[(&str, SyntaxKind)] = &[
    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
    ("//=", SyntaxKind::SlashSlashEqualsToken),
    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
    ("...", SyntaxKind::DotDotDotToken),
    ("->", SyntaxKind::MinusGreaterThanToken),
    (":=", SyntaxKind::ColonEqualsToken),
    ("**", SyntaxKind::AsteriskAsteriskToken),
    ("//", SyntaxKind::SlashSlashToken),
    ("<<", SyntaxKind::LessThanLessThanToken),
    (">>", SyntaxKind::GreaterThanGreaterThanToken),
    ("<=", SyntaxKind::LessThanEqualsToken),
    (">=", SyntaxKind::GreaterThanEqualsToken),
    ("==", SyntaxKind::EqualsEqualsToken),
    ("!=", SyntaxKind::ExclamationEqualsToken),
    ("+=", SyntaxKind::PlusEqualsToken),
    ("-=", SyntaxKind::MinusEqualsToken),
    ("*=", SyntaxKind::AsteriskEqualsToken),
    ("/=", SyntaxKind::SlashEqualsToken),
    ("%=", SyntaxKind::PercentEqualsToken),
    ("@=", SyntaxKind::AtEqualsToken),
    ("&=", SyntaxKind::AmpersandEqualsToken),
    ("|=", SyntaxKind::BarEqualsToken),
    ("^=", SyntaxKind::CaretEqualsToken),
    ("(", SyntaxKind::OpenParenToken),
    (")", SyntaxKind::CloseParenToken),
    ("[", SyntaxKind::OpenBracketToken),
    ("]", SyntaxKind::CloseBracketToken),
    ("{", SyntaxKind::OpenBraceToken),
    ("}", SyntaxKind::CloseBraceToken),
    (",", SyntaxKind::CommaToken),
    (":", SyntaxKind::ColonToken),
    (";", SyntaxKind::SemicolonToken),
    (".", SyntaxKind::DotToken),
    ("@", SyntaxKind::AtToken),
    ("=", SyntaxKind::EqualsToken),
    ("+", SyntaxKind::PlusToken),
    ("-", SyntaxKind::MinusToken),
    ("*", SyntaxKind::AsteriskToken),
    ("/", SyntaxKind::SlashToken),
    ("%", SyntaxKind::PercentToken),
    ("&", SyntaxKind::AmpersandToken),
    ("|", SyntaxKind::BarToken),
    ("^", SyntaxKind::CaretToken),
    ("~", SyntaxKind::TildeToken),
    ("<", SyntaxKind::LessThanToken),
    (">", SyntaxKind::GreaterThanToken),
];

/// Look up a reserved word.
#[must_use]
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORDS
        .iter()
        .find(|(word, _)| *word == text)
        .map(|(_, kind)| *kind)
}

#[must_use]
pub fn keyword_to_text(kind: SyntaxKind) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(word, _)| *word)
}

#[must_use]
pub fn punctuation_to_text(kind: SyntaxKind) -> Option<&'static str> {
    PUNCTUATION
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(text, _)| *text)
}

#[must_use]
pub const fn token_is_keyword(kind: SyntaxKind) -> bool {
    let value = kind as u16;
    value >= SyntaxKind::FalseKeyword as u16 && value <= SyntaxKind::YieldKeyword as u16
}

/// `+=`, `-=`, ... (but not plain `=`).
#[must_use]
pub const fn token_is_augmented_assignment(kind: SyntaxKind) -> bool {
    let value = kind as u16;
    value >= SyntaxKind::PlusEqualsToken as u16
        && value <= SyntaxKind::GreaterThanGreaterThanEqualsToken as u16
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
