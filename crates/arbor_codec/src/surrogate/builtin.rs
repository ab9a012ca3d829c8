//! Surrogates for std collections, lock wrappers and dates.

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use std::sync::LazyLock;

use arbor_reflect::Reflect;
use arbor_reflect::info::TypeInfo;
use arbor_reflect::ops::ReflectRef;
use arbor_tree::TreeNode;
use arbor_utils::hash::HashMap;
use chrono::{DateTime, SecondsFormat, Utc};

use super::Surrogate;
use crate::context::ContextFlags;
use crate::decoder::{Decoder, WorkingObject};
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};

type Registry = HashMap<&'static str, Vec<Box<dyn Surrogate>>>;

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    let mut map = Registry::default();
    let mut add = |key: &'static str, surrogate: Box<dyn Surrogate>| {
        map.entry(key).or_default().push(surrogate);
    };

    for shape in [
        "alloc::collections::VecDeque",
        "alloc::collections::LinkedList",
        "alloc::sync::Arc",
        "std::collections::HashSet",
        "alloc::collections::BTreeSet",
    ] {
        add(shape, Box::new(Items));
    }
    add("std::collections::HashMap", Box::new(Entries));
    add("alloc::collections::BTreeMap", Box::new(Entries));
    add("std::sync::Mutex", Box::new(Transparent));
    add("std::sync::RwLock", Box::new(Transparent));
    add("chrono::DateTime<chrono::Utc>", Box::new(UtcDate));
    map
});

/// Builtin surrogates registered under a type path or shape.
pub(super) fn lookup(key: &str) -> impl Iterator<Item = &'static dyn Surrogate> + use<> {
    let found: Option<&'static Vec<Box<dyn Surrogate>>> = BUILTIN.get(key);
    found.into_iter().flatten().map(|s| &**s)
}

// -----------------------------------------------------------------------------
// Lists and sets

/// One element child per item.
struct Items;

impl Surrogate for Items {
    fn encode(
        &self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        encoder: &mut Encoder,
    ) -> Result<bool, EncodeError> {
        let (items, item_info) = match (value.reflect_ref(), value.reflect_type_info()) {
            (ReflectRef::List(list), TypeInfo::List(info)) => (list.iter(), info.item_info()),
            (ReflectRef::Set(set), TypeInfo::Set(info)) => (set.iter(), info.item_info()),
            _ => return Ok(false),
        };
        let element = encoder.element_name();
        for item in items {
            encoder.encode_into(&element, item, node, Some(item_info))?;
        }
        Ok(true)
    }

    fn decode(
        &self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        decoder: &mut Decoder<'_>,
    ) -> Result<bool, DecodeError> {
        let item_info = match working.type_info() {
            TypeInfo::List(info) => info.item_info(),
            TypeInfo::Set(info) => info.item_info(),
            _ => return Ok(false),
        };
        let items = node
            .children()
            .iter()
            .map(|child| decoder.decode_node(child, Some(item_info)))
            .collect::<Result<Vec<_>, _>>()?;
        let value = match working.type_info() {
            TypeInfo::List(info) => info.from_items(items)?,
            TypeInfo::Set(info) => info.from_items(items)?,
            _ => return Ok(false),
        };
        working.set(value)?;
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// Maps

const KEY: &str = "key";
const VALUE: &str = "value";

/// One element child per entry, holding `key` and `value` children.
struct Entries;

impl Surrogate for Entries {
    fn encode(
        &self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        encoder: &mut Encoder,
    ) -> Result<bool, EncodeError> {
        let (ReflectRef::Map(map), TypeInfo::Map(info)) =
            (value.reflect_ref(), value.reflect_type_info())
        else {
            return Ok(false);
        };
        let element = encoder.element_name();
        for (key, value) in map.iter() {
            let entry = node.add_child(&*element);
            encoder.encode_into(KEY, key, entry, Some(info.key_info()))?;
            encoder.encode_into(VALUE, value, entry, Some(info.value_info()))?;
        }
        Ok(true)
    }

    fn decode(
        &self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        decoder: &mut Decoder<'_>,
    ) -> Result<bool, DecodeError> {
        let TypeInfo::Map(info) = working.type_info() else {
            return Ok(false);
        };
        let mut entries = Vec::with_capacity(node.children().len());
        for entry in node.children() {
            let part = |name: &'static str| {
                entry.child(name).ok_or_else(|| DecodeError::MissingEntry {
                    node: entry.name().into(),
                    entry: name,
                })
            };
            let key = decoder.decode_node(part(KEY)?, Some(info.key_info()))?;
            let value = decoder.decode_node(part(VALUE)?, Some(info.value_info()))?;
            entries.push((key, value));
        }
        working.set(info.from_entries(entries)?)?;
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// Mutex / RwLock

/// Writes the locked value into the wrapper's own node.
struct Transparent;

impl Surrogate for Transparent {
    fn encode(
        &self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        encoder: &mut Encoder,
    ) -> Result<bool, EncodeError> {
        let (ReflectRef::Wrapper(wrapper), TypeInfo::Wrapper(info)) =
            (value.reflect_ref(), value.reflect_type_info())
        else {
            return Ok(false);
        };
        let inner = wrapper.read_inner();
        encoder.encode_node(&*inner, node, Some(info.inner_info()))?;
        Ok(true)
    }

    fn decode(
        &self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        decoder: &mut Decoder<'_>,
    ) -> Result<bool, DecodeError> {
        let TypeInfo::Wrapper(info) = working.type_info() else {
            return Ok(false);
        };
        let inner = decoder.decode_in_place(node, info.inner_info())?;
        working.set(info.wrap(inner)?)?;
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// DateTime<Utc>

/// Hex nanoseconds, or RFC 3339 with [`ContextFlags::FULL_UTC_DATES`].
struct UtcDate;

impl Surrogate for UtcDate {
    fn encode(
        &self,
        value: &dyn Reflect,
        node: &mut TreeNode,
        encoder: &mut Encoder,
    ) -> Result<bool, EncodeError> {
        let Some(date) = value.downcast_ref::<DateTime<Utc>>() else {
            return Ok(false);
        };
        let nanos = date.timestamp_nanos_opt();
        let text = match nanos {
            Some(nanos) if !encoder.context().flag(ContextFlags::FULL_UTC_DATES) => {
                format!("{nanos:x}")
            }
            _ => date.to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        node.set_text(text);
        Ok(true)
    }

    fn decode(
        &self,
        working: &mut WorkingObject<'_>,
        node: &TreeNode,
        decoder: &mut Decoder<'_>,
    ) -> Result<bool, DecodeError> {
        if !working.type_info().type_is::<DateTime<Utc>>() {
            return Ok(false);
        }
        let text = node.text().unwrap_or_default().trim();
        let value: Box<dyn Reflect> = match parse_date(text) {
            Some(date) => Box::new(date),
            None => decoder.conversion_failed(text, working.type_info())?,
        };
        working.set(value)?;
        Ok(true)
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    let nanos = u64::from_str_radix(text, 16).ok()? as i64;
    Some(DateTime::from_timestamp_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::parse_date;

    #[test]
    fn dates_parse_in_both_forms() {
        let date: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 5).unwrap();
        let nanos = date.timestamp_nanos_opt().unwrap();

        assert_eq!(parse_date(&format!("{nanos:x}")), Some(date));
        assert_eq!(parse_date("2024-02-29T12:30:05Z"), Some(date));
        assert_eq!(parse_date("2024-02-29T14:30:05+02:00"), Some(date));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn negative_timestamps_round_trip_through_hex() {
        let date: DateTime<Utc> = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        let nanos = date.timestamp_nanos_opt().unwrap();
        assert_eq!(parse_date(&format!("{nanos:x}")), Some(date));
    }
}
