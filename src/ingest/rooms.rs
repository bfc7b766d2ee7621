//! Room parsing
//!
//! Each file under `rooms/` holds `{"result": [room, ...]}` with the room
//! fields under their query names. Rooms missing a field are dropped.

use serde_json::Value;

use crate::dataset::Room;

/// Parses every valid room of one file
pub fn parse_room_file(file: &Value) -> Vec<Room> {
    file.get("result")
        .and_then(Value::as_array)
        .map(|rooms| {
            rooms
                .iter()
                .filter_map(|room| serde_json::from_value::<Room>(room.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
