use std::fmt;
use std::sync::Arc;

/// A location in a source file.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(file: Arc<str>, line: usize, column: usize) -> Self {
        Position { file, line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The kind of a lexical token.
///
/// The declaration order matters: operator families occupy contiguous
/// ranges so that [`TokenKind::is_assign`], [`TokenKind::is_unary_op`] and
/// friends are simple range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // Structural
    /// A lexical error; the token value holds the message
    Error,
    /// An increase in indentation
    Indent,
    /// A decrease in indentation
    Dedent,
    /// The end of a logical line
    Eol,
    /// The end of the file
    Eof,
    /// A trailing `;` comment or a `<; ... ;>` block comment
    Comment,

    // Literals
    /// Raw JavaScript between `<js` and `js>`
    ///
    /// # Example
    /// ```text
    /// <js console.log("hi"); js>
    /// ```
    JsBlock,
    /// A quoted string, quotes included
    String,
    /// A decimal or `0x` hexadecimal number
    Number,
    /// A regular expression literal, slashes and flags included
    ///
    /// # Example
    /// ```text
    /// /ab+c/gi
    /// ```
    Regex,
    /// Any identifier that is not a keyword
    Literal,

    // Keywords
    Use,
    If,
    Is,
    Else,
    /// `fn`
    Function,
    Var,
    /// `ret`
    Return,
    For,
    Loop,
    While,
    Break,
    Continue,
    Try,
    Catch,
    Finally,
    Throw,

    // Literal expression keywords
    True,
    False,
    Null,
    Undefined,

    // Boolean operators
    /// `=`, compiled to `===`
    Equal,
    /// `!=`, compiled to `!==`
    NotEqual,
    LessThan,
    GreaterThan,
    LtEqual,
    GtEqual,
    And,
    Or,

    // Membership keywords
    In,
    InstanceOf,

    // Punctuation
    Dot,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftCurly,
    RightCurly,

    // Assignment operators
    /// `:`
    Assign,
    /// `::`, assigns the elements of one array to several targets
    Unpack,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    AndAssign,
    OrAssign,
    XorAssign,

    // Binary operators
    Add,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,

    // Unary operators; the last two are also postfix operators
    Sub,
    Not,
    BitNot,
    Delete,
    TypeOf,
    Increment,
    Decrement,
}

impl TokenKind {
    fn in_range(self, first: TokenKind, last: TokenKind) -> bool {
        (first as u8..=last as u8).contains(&(self as u8))
    }

    pub fn is_keyword(self) -> bool {
        self.in_range(TokenKind::Use, TokenKind::Decrement)
    }

    pub fn is_unary_op(self) -> bool {
        self.in_range(TokenKind::Sub, TokenKind::Decrement)
    }

    pub fn is_postfix_op(self) -> bool {
        self.in_range(TokenKind::Increment, TokenKind::Decrement)
    }

    pub fn is_assign(self) -> bool {
        self.in_range(TokenKind::Assign, TokenKind::XorAssign)
    }

    pub fn is_bool_op(self) -> bool {
        self.in_range(TokenKind::Equal, TokenKind::Or)
    }

    /// Comparison operators that may start a line of if-sugar.
    pub fn is_comparison(self) -> bool {
        self.in_range(TokenKind::Equal, TokenKind::GtEqual)
    }

    pub fn is_literal_expr(self) -> bool {
        self.in_range(TokenKind::True, TokenKind::Undefined)
    }

    /// Tokens after which a `/` is a division rather than a regex.
    pub fn ends_expression(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::Regex
                | TokenKind::Literal
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightCurly
                | TokenKind::Increment
                | TokenKind::Decrement
        ) || self.is_literal_expr()
    }

    /// A token that closes an argument or element in a bracketed list.
    pub fn is_in_block(self) -> bool {
        matches!(self, TokenKind::Comma | TokenKind::RightParen)
    }

    pub fn is_dedent_stop(self) -> bool {
        matches!(self, TokenKind::Dedent | TokenKind::Eof)
    }

    /// Maps a keyword or operator spelling to its kind.
    pub fn lookup(spelling: &str) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match spelling {
            "use" => Use,
            "if" => If,
            "is" => Is,
            "else" => Else,
            "fn" => Function,
            "var" => Var,
            "ret" => Return,
            "for" => For,
            "loop" => Loop,
            "while" => While,
            "break" => Break,
            "continue" => Continue,
            "try" => Try,
            "catch" => Catch,
            "finally" => Finally,
            "throw" => Throw,
            "true" => True,
            "false" => False,
            "null" => Null,
            "undefined" => Undefined,
            "in" => In,
            "instanceof" => InstanceOf,
            "delete" => Delete,
            "typeof" => TypeOf,
            "and" => And,
            "or" => Or,
            "=" => Equal,
            "!=" => NotEqual,
            "<" => LessThan,
            ">" => GreaterThan,
            "<=" => LtEqual,
            ">=" => GtEqual,
            "." => Dot,
            "," => Comma,
            "(" => LeftParen,
            ")" => RightParen,
            "[" => LeftBracket,
            "]" => RightBracket,
            "{" => LeftCurly,
            "}" => RightCurly,
            ":" => Assign,
            "::" => Unpack,
            "+:" => AddAssign,
            "-:" => SubAssign,
            "*:" => MulAssign,
            "/:" => DivAssign,
            "%:" => ModAssign,
            "<<:" => ShlAssign,
            ">>:" => ShrAssign,
            ">>>:" => UShrAssign,
            "&:" => AndAssign,
            "|:" => OrAssign,
            "^:" => XorAssign,
            "+" => Add,
            "*" => Mul,
            "/" => Div,
            "%" => Mod,
            "<<" => Shl,
            ">>" => Shr,
            ">>>" => UShr,
            "&" => BitAnd,
            "|" => BitOr,
            "^" => BitXor,
            "-" => Sub,
            "!" => Not,
            "~" => BitNot,
            "++" => Increment,
            "--" => Decrement,
            _ => return None,
        };
        Some(kind)
    }
}

/// Contextual words that are only special in certain positions.
pub const KEYWORD_TO: &str = "to";
pub const KEYWORD_BY: &str = "by";
pub const KEYWORD_GET: &str = "get";
pub const KEYWORD_SET: &str = "set";

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position, value: impl Into<String>) -> Self {
        Token {
            kind,
            pos,
            value: value.into(),
        }
    }

    /// Binding power of the token as a binary operator, or -1.
    pub fn precedence(&self) -> i32 {
        use TokenKind::*;
        match self.kind {
            Dot | In | InstanceOf => 6,
            Mul | Div | Mod | Shl | Shr | UShr | BitAnd => 5,
            Add | Sub | BitOr | BitXor => 4,
            Equal | NotEqual | LessThan | LtEqual | GreaterThan | GtEqual => 3,
            And => 2,
            Or => 1,
            _ => -1,
        }
    }

    pub fn is_literal(&self, word: &str) -> bool {
        self.kind == TokenKind::Literal && self.value == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = format!("{}:{}", self.pos.line, self.pos.column);
        match self.kind {
            TokenKind::Eol => writeln!(f, "{} {:?}", pos, self.kind),
            TokenKind::String => write!(f, "{} {:?} : {}", pos, self.kind, self.value),
            TokenKind::Comment
            | TokenKind::JsBlock
            | TokenKind::Number
            | TokenKind::Regex
            | TokenKind::Literal
            | TokenKind::Error => write!(f, "{} {:?} : '{}'", pos, self.kind, self.value),
            _ => write!(f, "{} {:?}", pos, self.kind),
        }
    }
}
