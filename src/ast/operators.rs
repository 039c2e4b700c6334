use crate::ast::TokenKind;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Member access (`.`)
    Member,
    /// Property membership (`in`)
    In,
    /// Prototype check (`instanceof`)
    InstanceOf,

    // Arithmetic and bitwise
    Multiply,
    Divide,
    Modulo,
    ShiftLeft,
    ShiftRight,
    /// Unsigned shift right (`>>>`)
    ShiftRightUnsigned,
    BitAnd,
    Add,
    Subtract,
    BitOr,
    BitXor,

    // Comparison
    /// Equal (`=`), strict in the output
    Equal,
    /// Not equal (`!=`), strict in the output
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn from_token(kind: TokenKind) -> Option<BinOp> {
        use TokenKind as T;
        let op = match kind {
            T::Dot => BinOp::Member,
            T::In => BinOp::In,
            T::InstanceOf => BinOp::InstanceOf,
            T::Mul => BinOp::Multiply,
            T::Div => BinOp::Divide,
            T::Mod => BinOp::Modulo,
            T::Shl => BinOp::ShiftLeft,
            T::Shr => BinOp::ShiftRight,
            T::UShr => BinOp::ShiftRightUnsigned,
            T::BitAnd => BinOp::BitAnd,
            T::Add => BinOp::Add,
            T::Sub => BinOp::Subtract,
            T::BitOr => BinOp::BitOr,
            T::BitXor => BinOp::BitXor,
            T::Equal => BinOp::Equal,
            T::NotEqual => BinOp::NotEqual,
            T::LessThan => BinOp::LessThan,
            T::LtEqual => BinOp::LessEqual,
            T::GreaterThan => BinOp::GreaterThan,
            T::GtEqual => BinOp::GreaterEqual,
            T::And => BinOp::And,
            T::Or => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    /// The JavaScript spelling, surrounding spaces included.
    pub fn js(self) -> &'static str {
        match self {
            BinOp::Member => ".",
            BinOp::In => " in ",
            BinOp::InstanceOf => " instanceof ",
            BinOp::Multiply => " * ",
            BinOp::Divide => " / ",
            BinOp::Modulo => " % ",
            BinOp::ShiftLeft => " << ",
            BinOp::ShiftRight => " >> ",
            BinOp::ShiftRightUnsigned => " >>> ",
            BinOp::BitAnd => " & ",
            BinOp::Add => " + ",
            BinOp::Subtract => " - ",
            BinOp::BitOr => " | ",
            BinOp::BitXor => " ^ ",
            BinOp::Equal => " === ",
            BinOp::NotEqual => " !== ",
            BinOp::LessThan => " < ",
            BinOp::LessEqual => " <= ",
            BinOp::GreaterThan => " > ",
            BinOp::GreaterEqual => " >= ",
            BinOp::And => " && ",
            BinOp::Or => " || ",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    BitNot,
    Delete,
    TypeOf,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        let op = match kind {
            TokenKind::Sub => UnaryOp::Negate,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::BitNot => UnaryOp::BitNot,
            TokenKind::Delete => UnaryOp::Delete,
            TokenKind::TypeOf => UnaryOp::TypeOf,
            TokenKind::Increment => UnaryOp::Increment,
            TokenKind::Decrement => UnaryOp::Decrement,
            _ => return None,
        };
        Some(op)
    }

    pub fn js(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Delete => "delete ",
            UnaryOp::TypeOf => "typeof ",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }

    /// Prefix operators that are meaningful on their own line.
    pub fn has_side_effect(self) -> bool {
        matches!(self, UnaryOp::Delete | UnaryOp::Increment | UnaryOp::Decrement)
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOp {
    Increment,
    Decrement,
}

impl PostOp {
    pub fn from_token(kind: TokenKind) -> Option<PostOp> {
        match kind {
            TokenKind::Increment => Some(PostOp::Increment),
            TokenKind::Decrement => Some(PostOp::Decrement),
            _ => None,
        }
    }

    pub fn js(self) -> &'static str {
        match self {
            PostOp::Increment => "++",
            PostOp::Decrement => "--",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `:`
    Assign,
    /// `::`
    Unpack,
    /// A compound assignment such as `+:`, carrying its binary operator
    Compound(BinOp),
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<AssignOp> {
        use TokenKind as T;
        let op = match kind {
            T::Assign => AssignOp::Assign,
            T::Unpack => AssignOp::Unpack,
            T::AddAssign => AssignOp::Compound(BinOp::Add),
            T::SubAssign => AssignOp::Compound(BinOp::Subtract),
            T::MulAssign => AssignOp::Compound(BinOp::Multiply),
            T::DivAssign => AssignOp::Compound(BinOp::Divide),
            T::ModAssign => AssignOp::Compound(BinOp::Modulo),
            T::ShlAssign => AssignOp::Compound(BinOp::ShiftLeft),
            T::ShrAssign => AssignOp::Compound(BinOp::ShiftRight),
            T::UShrAssign => AssignOp::Compound(BinOp::ShiftRightUnsigned),
            T::AndAssign => AssignOp::Compound(BinOp::BitAnd),
            T::OrAssign => AssignOp::Compound(BinOp::BitOr),
            T::XorAssign => AssignOp::Compound(BinOp::BitXor),
            _ => return None,
        };
        Some(op)
    }

    /// The JavaScript assignment spelling, e.g. ` += `.
    pub fn js(self) -> String {
        match self {
            AssignOp::Assign | AssignOp::Unpack => " = ".to_string(),
            AssignOp::Compound(op) => format!(" {}= ", op.js().trim()),
        }
    }
}
