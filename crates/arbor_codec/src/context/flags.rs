bitflags::bitflags! {
    /// Boolean switches of a [`SerializationContext`](super::SerializationContext).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContextFlags: u16 {
        /// Skip null array elements. Ordinary fields always keep their null marker.
        const REMOVE_NULLS = 1 << 0;
        /// Write `m_value` fields as `Value`.
        const FIX_M_PREFIX = 1 << 1;
        /// Never use the condensed array form.
        const EXPLICIT_ARRAY_ELEMENTS = 1 << 2;
        /// Tag every explicit array element with its index.
        const ARRAY_INDICES = 1 << 3;
        /// Equal strings are written once and referred to afterwards.
        const DEDUPLICATE_STRINGS = 1 << 4;
        /// Write dates as RFC 3339 instead of hex nanoseconds.
        const FULL_UTC_DATES = 1 << 5;
        /// Expand `%NAME%` in decoded strings.
        const EXPAND_ENVIRONMENT = 1 << 6;
    }
}
