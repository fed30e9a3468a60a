//! JSON shape of entry fields: an object keyed by capture-group name.

use serde::ser::SerializeMap;
use serde::Serializer;

/// Write `fields` as `{"group": "value", "unset": null}` in pattern order.
pub fn serialize_fields_as_map<S>(
    fields: &[(String, Option<String>)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (group, value) in fields {
        map.serialize_entry(group, value)?;
    }
    map.end()
}
