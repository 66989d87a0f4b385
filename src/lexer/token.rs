use colored::Colorize;

#[derive(Default, Debug, Clone, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub source: String,
}

impl Span {
    pub fn new(start: (usize, usize), end: (usize, usize), source: impl ToString) -> Span {
        Span {
            start,
            end,
            source: source.to_string(),
        }
    }

    pub fn to_string(&self, msg: impl ToString) -> String {
        let Span { start, end, source } = self;
        let line = start.0;
        let lines = source.lines().collect::<Vec<_>>();
        let prev_line = if line > 0 { lines[line - 1] } else { "" };
        let line_str = lines.get(line).copied().unwrap_or("");

        let left_margin = format!("{}", end.0).len();
        let left_margin_fill = vec![' '; left_margin].iter().collect::<String>();

        let split_at = start.1.min(line_str.len());
        let (left, right) = line_str.split_at(split_at);

        let (left, right) = if start.0 != end.0 {
            (left.to_string(), right.to_string().red().to_string())
        } else {
            let (err_str, after_err) = right.split_at((end.1.saturating_sub(start.1)).min(right.len()));

            (
                left.to_string(),
                format!("{err_str}{after_err}", err_str = err_str.to_string().red()),
            )
        };

        let line_str = format!("{left}{right}");

        let left_padding_fill = vec![' '; end.1.saturating_sub(1)].iter().collect::<String>();

        let mut error_string = format!(
            "{left_margin_fill} |\n{left_margin_fill} |{prev_line} \n{line} |{line_str}",
            line = line + 1
        );

        ((start.0 + 1)..(end.0 + 1)).for_each(|line_number| {
            if line_number < lines.len() {
                error_string = format!(
                    "{error_string}\n{left_margin_fill} |{}",
                    lines[line_number].to_string().red()
                );
            }
        });

        error_string = format!(
            "{error_string}\n{} |{left_padding_fill}^--- {}\n{left_margin_fill} |",
            end.0 + 2,
            msg.to_string()
        );

        error_string
    }

    pub fn merge(&self, other: &Span) -> Span {
        let Span { start, source, .. } = self.clone();
        let Span { end, .. } = other.clone();

        Span { start, end, source }
    }
}

impl PartialEq<Span> for Span {
    fn eq(&self, _other: &Span) -> bool {
        // position information is intentionally ignored for AST/token equality in tests
        true
    }
}

/// Data-carrying token produced by the lexer. Mirrors the variant shape a
/// `lex_derive`-style macro would generate, just hand-rolled: each variant
/// keeps its own literal payload (if any) plus the `Span` it was scanned
/// from, so downstream diagnostics can always point back at source.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Token {
    // literals
    Id { value: String, position: Span },
    Integer { value: u64, position: Span },
    FloatingPoint { value: f64, position: Span },
    Character { value: String, position: Span },
    Str { value: String, position: Span },
    True { position: Span },
    False { position: Span },

    // keywords
    Let { position: Span },
    Const { position: Span },
    Mut { position: Span },
    FnKeyword { position: Span },
    IfKeyword { position: Span },
    ElseKeyword { position: Span },
    WhileKeyword { position: Span },
    ForKeyword { position: Span },
    InKeyword { position: Span },
    ReturnKeyword { position: Span },
    RunKeyword { position: Span },
    HaltKeyword { position: Span },
    BreakKeyword { position: Span },
    ContinueKeyword { position: Span },
    DeclareKeyword { position: Span },
    StructKeyword { position: Span },
    InstanceKeyword { position: Span },
    EnumKeyword { position: Span },
    ExternKeyword { position: Span },
    ImplKeyword { position: Span },
    ModKeyword { position: Span },
    PubKeyword { position: Span },
    PrivKeyword { position: Span },
    StaticKeyword { position: Span },
    TraitKeyword { position: Span },
    TypeKeyword { position: Span },
    AsKeyword { position: Span },
    SizeofKeyword { position: Span },

    // delimiters
    LParen { position: Span },
    RParen { position: Span },
    LBrace { position: Span },
    RBrace { position: Span },
    LBracket { position: Span },
    RBracket { position: Span },

    // punctuation
    Comma { position: Span },
    Semicolon { position: Span },
    Colon { position: Span },
    ColonColon { position: Span },
    SmallRightArrow { position: Span },
    BigRightArrow { position: Span },
    Dot { position: Span },
    Question { position: Span },
    Hash { position: Span },
    At { position: Span },

    // operators
    Assign { position: Span },
    Minus { position: Span },
    Plus { position: Span },
    Star { position: Span },
    Slash { position: Span },
    Percent { position: Span },
    Ampersand { position: Span },
    Pipe { position: Span },
    Caret { position: Span },
    Tilde { position: Span },
    ExclamationMark { position: Span },
    Shl { position: Span },
    Shr { position: Span },
    AmpAmp { position: Span },
    PipePipe { position: Span },
    EqEq { position: Span },
    Ne { position: Span },
    Lt { position: Span },
    Le { position: Span },
    Gt { position: Span },
    Ge { position: Span },
    PlusEq { position: Span },
    MinusEq { position: Span },
    StarEq { position: Span },
    SlashEq { position: Span },
    PercentEq { position: Span },
    AmpEq { position: Span },
    PipeEq { position: Span },
    CaretEq { position: Span },
    ShlEq { position: Span },
    ShrEq { position: Span },
    PlusPlus { position: Span },
    MinusMinus { position: Span },
    Backslash { position: Span },

    Comment { value: String, position: Span },
    Eof { position: Span },
}

impl Token {
    pub fn position(&self) -> Span {
        GetPosition::position(self)
    }
}

macro_rules! get_position_impl {
    ($($variant:ident),* $(,)?) => {
        impl GetPosition for Token {
            fn position(&self) -> Span {
                match self {
                    $(Token::$variant { position, .. } => position.clone()),*
                }
            }
        }
    };
}

pub trait GetPosition {
    fn position(&self) -> Span;
}

get_position_impl!(
    Id, Integer, FloatingPoint, Character, Str, True, False, Let, Const, Mut, FnKeyword,
    IfKeyword, ElseKeyword, WhileKeyword, ForKeyword, InKeyword, ReturnKeyword, RunKeyword,
    HaltKeyword, BreakKeyword, ContinueKeyword, DeclareKeyword, StructKeyword, InstanceKeyword,
    EnumKeyword, ExternKeyword, ImplKeyword, ModKeyword, PubKeyword, PrivKeyword, StaticKeyword,
    TraitKeyword, TypeKeyword, AsKeyword, SizeofKeyword, LParen, RParen, LBrace, RBrace, LBracket, RBracket, Comma,
    Semicolon, Colon, ColonColon, SmallRightArrow, BigRightArrow, Dot, Question, Hash, At, Assign,
    Minus, Plus, Star, Slash, Percent, Ampersand, Pipe, Caret, Tilde, ExclamationMark, Shl, Shr,
    AmpAmp, PipePipe, EqEq, Ne, Lt, Le, Gt, Ge, PlusEq, MinusEq, StarEq, SlashEq, PercentEq, AmpEq,
    PipeEq, CaretEq, ShlEq, ShrEq, PlusPlus, MinusMinus, Backslash, Comment, Eof,
);

/// Bare, discriminant-only view of a [`Token`]'s variant, used by the
/// parser's combinators to match "does the next token have this shape"
/// without caring about its literal payload or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Id,
    Integer,
    FloatingPoint,
    Character,
    Str,
    True,
    False,
    Let,
    Const,
    Mut,
    FnKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    ForKeyword,
    InKeyword,
    ReturnKeyword,
    RunKeyword,
    HaltKeyword,
    BreakKeyword,
    ContinueKeyword,
    DeclareKeyword,
    StructKeyword,
    InstanceKeyword,
    EnumKeyword,
    ExternKeyword,
    ImplKeyword,
    ModKeyword,
    PubKeyword,
    PrivKeyword,
    StaticKeyword,
    TraitKeyword,
    TypeKeyword,
    AsKeyword,
    SizeofKeyword,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    ColonColon,
    SmallRightArrow,
    BigRightArrow,
    Dot,
    Question,
    Hash,
    At,
    Assign,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    ExclamationMark,
    Shl,
    Shr,
    AmpAmp,
    PipePipe,
    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    PlusPlus,
    MinusMinus,
    Backslash,
    Comment,
    Eof,
}

macro_rules! terminal_eq_impl {
    ($($variant:ident),* $(,)?) => {
        impl PartialEq<Token> for Terminal {
            fn eq(&self, other: &Token) -> bool {
                matches!(
                    (self, other),
                    $((Terminal::$variant, Token::$variant { .. }))|*
                )
            }
        }
    };
}

terminal_eq_impl!(
    Id, Integer, FloatingPoint, Character, Str, True, False, Let, Const, Mut, FnKeyword,
    IfKeyword, ElseKeyword, WhileKeyword, ForKeyword, InKeyword, ReturnKeyword, RunKeyword,
    HaltKeyword, BreakKeyword, ContinueKeyword, DeclareKeyword, StructKeyword, InstanceKeyword,
    EnumKeyword, ExternKeyword, ImplKeyword, ModKeyword, PubKeyword, PrivKeyword, StaticKeyword,
    TraitKeyword, TypeKeyword, AsKeyword, SizeofKeyword, LParen, RParen, LBrace, RBrace, LBracket, RBracket, Comma,
    Semicolon, Colon, ColonColon, SmallRightArrow, BigRightArrow, Dot, Question, Hash, At, Assign,
    Minus, Plus, Star, Slash, Percent, Ampersand, Pipe, Caret, Tilde, ExclamationMark, Shl, Shr,
    AmpAmp, PipePipe, EqEq, Ne, Lt, Le, Gt, Ge, PlusEq, MinusEq, StarEq, SlashEq, PercentEq, AmpEq,
    PipeEq, CaretEq, ShlEq, ShrEq, PlusPlus, MinusMinus, Backslash, Comment, Eof,
);

/// Maps keyword spellings to the `Terminal` they lex as. Identifiers that do
/// not match any entry are lexed as `Terminal::Id`.
pub fn lookup_keyword(word: &str) -> Option<Terminal> {
    use Terminal::*;
    Some(match word {
        "let" => Let,
        "const" => Const,
        "mut" => Mut,
        "fn" => FnKeyword,
        "if" => IfKeyword,
        "else" => ElseKeyword,
        "while" => WhileKeyword,
        "for" => ForKeyword,
        "in" => InKeyword,
        "return" => ReturnKeyword,
        "run" => RunKeyword,
        "halt" => HaltKeyword,
        "break" => BreakKeyword,
        "continue" => ContinueKeyword,
        "declare" => DeclareKeyword,
        "struct" => StructKeyword,
        "instance" => InstanceKeyword,
        "enum" => EnumKeyword,
        "extern" => ExternKeyword,
        "impl" => ImplKeyword,
        "mod" => ModKeyword,
        "pub" => PubKeyword,
        "priv" => PrivKeyword,
        "static" => StaticKeyword,
        "trait" => TraitKeyword,
        "type" => TypeKeyword,
        "as" => AsKeyword,
        "sizeof" => SizeofKeyword,
        "true" => True,
        "false" => False,
        _ => return None,
    })
}

impl Token {
    pub fn from_keyword(terminal: Terminal, position: Span) -> Token {
        match terminal {
            Terminal::Let => Token::Let { position },
            Terminal::Const => Token::Const { position },
            Terminal::Mut => Token::Mut { position },
            Terminal::FnKeyword => Token::FnKeyword { position },
            Terminal::IfKeyword => Token::IfKeyword { position },
            Terminal::ElseKeyword => Token::ElseKeyword { position },
            Terminal::WhileKeyword => Token::WhileKeyword { position },
            Terminal::ForKeyword => Token::ForKeyword { position },
            Terminal::InKeyword => Token::InKeyword { position },
            Terminal::ReturnKeyword => Token::ReturnKeyword { position },
            Terminal::RunKeyword => Token::RunKeyword { position },
            Terminal::HaltKeyword => Token::HaltKeyword { position },
            Terminal::BreakKeyword => Token::BreakKeyword { position },
            Terminal::ContinueKeyword => Token::ContinueKeyword { position },
            Terminal::DeclareKeyword => Token::DeclareKeyword { position },
            Terminal::StructKeyword => Token::StructKeyword { position },
            Terminal::InstanceKeyword => Token::InstanceKeyword { position },
            Terminal::EnumKeyword => Token::EnumKeyword { position },
            Terminal::ExternKeyword => Token::ExternKeyword { position },
            Terminal::ImplKeyword => Token::ImplKeyword { position },
            Terminal::ModKeyword => Token::ModKeyword { position },
            Terminal::PubKeyword => Token::PubKeyword { position },
            Terminal::PrivKeyword => Token::PrivKeyword { position },
            Terminal::StaticKeyword => Token::StaticKeyword { position },
            Terminal::TraitKeyword => Token::TraitKeyword { position },
            Terminal::TypeKeyword => Token::TypeKeyword { position },
            Terminal::AsKeyword => Token::AsKeyword { position },
            Terminal::SizeofKeyword => Token::SizeofKeyword { position },
            Terminal::True => Token::True { position },
            Terminal::False => Token::False { position },
            other => unreachable!("{other:?} is not a keyword terminal"),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        use Token::*;
        match (self, other) {
            (Id { value: l, .. }, Id { value: r, .. }) => l == r,
            (Integer { value: l, .. }, Integer { value: r, .. }) => l == r,
            (FloatingPoint { value: l, .. }, FloatingPoint { value: r, .. }) => l == r,
            (Character { value: l, .. }, Character { value: r, .. }) => l == r,
            (Str { value: l, .. }, Str { value: r, .. }) => l == r,
            (Comment { value: l, .. }, Comment { value: r, .. }) => l == r,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for Token {}
