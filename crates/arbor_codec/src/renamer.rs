//! Field naming rules.

use alloc::string::String;

use arbor_reflect::info::{FieldRenamer, NamedField};

/// Writes `m_value` style fields as `Value`.
///
/// The same rule the [`FIX_M_PREFIX`] flag applies to every field, as a
/// renamer that can be attached to a single type.
///
/// [`FIX_M_PREFIX`]: crate::context::ContextFlags::FIX_M_PREFIX
#[derive(Debug, Default, Clone, Copy)]
pub struct FixMPrefix;

impl FieldRenamer for FixMPrefix {
    fn convert_field_name(&self, name: &str, _field: &NamedField) -> String {
        fix_m_prefix(name).unwrap_or_else(|| name.into())
    }
}

/// Names fields the way protobuf generated code does.
///
/// One trailing `_` is removed and the first character is upper-cased:
/// `name_` becomes `Name`.
///
/// ```
/// use arbor_codec::renamer::ProtobufRenamer;
/// use arbor_reflect::info::{FieldRenamer, NamedField};
///
/// let field = NamedField::new::<u32>("count_", 0);
/// assert_eq!(ProtobufRenamer.convert_field_name("count_", &field), "Count");
/// assert_eq!(ProtobufRenamer.convert_field_name("id", &field), "Id");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ProtobufRenamer;

impl FieldRenamer for ProtobufRenamer {
    fn convert_field_name(&self, name: &str, _field: &NamedField) -> String {
        let name = name.strip_suffix('_').unwrap_or(name);
        upper_first(name)
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `m_xyz` becomes `Xyz` when the third character is lowercase.
pub(crate) fn fix_m_prefix(name: &str) -> Option<String> {
    let rest = name.strip_prefix("m_")?;
    let first = rest.chars().next()?;
    first.is_lowercase().then(|| upper_first(rest))
}

/// Empty names can not be element names.
pub(crate) fn fix_member_name(name: String) -> String {
    if name.is_empty() { String::from("_") } else { name }
}

#[cfg(test)]
mod tests {
    use super::{FixMPrefix, ProtobufRenamer, fix_m_prefix, fix_member_name};
    use arbor_reflect::info::{FieldRenamer, NamedField};

    #[test]
    fn m_prefix_rule() {
        assert_eq!(fix_m_prefix("m_value").as_deref(), Some("Value"));
        assert_eq!(fix_m_prefix("m_Value"), None);
        assert_eq!(fix_m_prefix("m_"), None);
        assert_eq!(fix_m_prefix("mode"), None);

        let field = NamedField::new::<u8>("m_count", 0);
        assert_eq!(FixMPrefix.convert_field_name("m_count", &field), "Count");
        assert_eq!(FixMPrefix.convert_field_name("count", &field), "count");
    }

    #[test]
    fn protobuf_strips_one_underscore() {
        let field = NamedField::new::<u8>("type__", 0);
        assert_eq!(ProtobufRenamer.convert_field_name("type__", &field), "Type_");
        assert_eq!(ProtobufRenamer.convert_field_name("_", &field), "");
    }

    #[test]
    fn empty_names_are_replaced() {
        assert_eq!(fix_member_name(String::new()), "_");
        assert_eq!(fix_member_name("a".into()), "a");
    }
}
