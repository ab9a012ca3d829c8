/// The names a codec writes for its own markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Name of the root element.
    Root,
    TypeAttribute,
    NullAttribute,
    /// Value written to the null attribute.
    NullValue,
    ReferenceId,
    ReferTo,
    /// Length(s) of an array.
    ArrayAttribute,
    /// Name of collection element nodes.
    ArrayElement,
    ArrayIndex,
    LowerBound,
    EntitySemantics,
}

impl Token {
    pub(crate) const COUNT: usize = 11;

    pub const ALL: [Token; Self::COUNT] = [
        Token::Root,
        Token::TypeAttribute,
        Token::NullAttribute,
        Token::NullValue,
        Token::ReferenceId,
        Token::ReferTo,
        Token::ArrayAttribute,
        Token::ArrayElement,
        Token::ArrayIndex,
        Token::LowerBound,
        Token::EntitySemantics,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The name used by the global context.
    pub const fn verbose(self) -> &'static str {
        match self {
            Token::Root => "_ROOT_",
            Token::TypeAttribute => "_Type",
            Token::NullAttribute => "_Null",
            Token::NullValue => "_NULL_",
            Token::ReferenceId => "_RefID",
            Token::ReferTo => "_ReferTo",
            Token::ArrayAttribute => "_Array",
            Token::ArrayElement => "_",
            Token::ArrayIndex => "_Index",
            Token::LowerBound => "_LowerBound",
            Token::EntitySemantics => "_UseEntitySemantics",
        }
    }

    /// The short name.
    pub const fn concise(self) -> &'static str {
        match self {
            Token::Root => "_",
            Token::TypeAttribute => "_T",
            Token::NullAttribute => "_N",
            Token::NullValue => "_N",
            Token::ReferenceId => "_R",
            Token::ReferTo => "_RT",
            Token::ArrayAttribute => "_A",
            Token::ArrayElement => "_",
            Token::ArrayIndex => "_I",
            Token::LowerBound => "_LB",
            Token::EntitySemantics => "_UES",
        }
    }
}
