//! Binary and unary operators, and the binary precedence table.

/// Binary operators.
///
/// Assignment is not a binary operator: it is parsed separately because it
/// is the only right-associative form and requires a place on the left.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical (short-circuiting)
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    /// Lowest precedence of any binary operator, the starting point for
    /// precedence climbing.
    pub const MIN_PRECEDENCE: u8 = 2;

    /// Precedence of assignment. Lower than every binary operator.
    pub const ASSIGN_PRECEDENCE: u8 = 1;

    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    /// Returns the precedence level of this operator.
    ///
    /// Higher number = binds more tightly. All binary operators are
    /// left-associative.
    ///
    /// - 11: `*` `/` `%`
    /// - 10: `+` `-`
    /// - 9: `<<` `>>`
    /// - 8: `<` `<=` `>` `>=`
    /// - 7: `==` `!=`
    /// - 6: `&`
    /// - 5: `^`
    /// - 4: `|`
    /// - 3: `&&`
    /// - 2: `||`
    /// - (1: `=`, right-associative, see [`Self::ASSIGN_PRECEDENCE`])
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 11,
            Self::Add | Self::Sub => 10,
            Self::Shl | Self::Shr => 9,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 8,
            Self::Eq | Self::NotEq => 7,
            Self::BitAnd => 6,
            Self::BitXor => 5,
            Self::BitOr => 4,
            Self::And => 3,
            Self::Or => 2,
        }
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Operators that only accept integer operands.
    pub const fn is_integer_only(self) -> bool {
        matches!(
            self,
            Self::Mod | Self::BitAnd | Self::BitOr | Self::BitXor | Self::Shl | Self::Shr
        )
    }
}

/// Prefix operators that produce a value from a value.
///
/// Dereference and address-of are separate expression kinds because they
/// move between values and places.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::BitNot => "~",
        }
    }
}
