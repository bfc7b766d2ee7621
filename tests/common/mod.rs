//! Shared helpers for integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};

use serde_json::{json, Value};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Builds an in-memory tar archive from (path, contents) pairs
pub fn tar_archive(files: &[(&str, String)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar archive")
}

/// Builds an in-memory zip archive from (path, contents) pairs
pub fn zip_archive(files: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, contents) in files {
        writer
            .start_file(*path, FileOptions::default())
            .expect("start zip entry");
        writer.write_all(contents.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip archive").into_inner()
}

/// One source-format course section
pub fn section(dept: &str, course: &str, avg: f64, uuid: u64) -> Value {
    json!({
        "Subject": dept,
        "Course": course,
        "Avg": avg,
        "Professor": "smith, jane",
        "Title": format!("{} {}", dept, course),
        "Pass": 40,
        "Fail": 2,
        "Audit": 0,
        "id": uuid,
        "Year": "2015",
        "Section": "101"
    })
}

/// One room record
pub fn room(shortname: &str, number: &str, seats: u32) -> Value {
    json!({
        "fullname": format!("{} Building", shortname),
        "shortname": shortname,
        "number": number,
        "name": format!("{}_{}", shortname, number),
        "address": "2211 Wesbrook Mall",
        "lat": 49.26,
        "lon": -123.25,
        "seats": seats,
        "type": "Small Group",
        "furniture": "Classroom-Movable Tables & Chairs",
        "href": format!("http://rooms/{}-{}", shortname, number)
    })
}

/// Courses archive with one file holding `sections`
pub fn courses_archive(sections: Vec<Value>) -> Vec<u8> {
    let file = json!({ "result": sections }).to_string();
    tar_archive(&[("courses/SECTIONS", file)])
}

/// Rooms archive with one file holding `rooms`
pub fn rooms_archive(rooms: Vec<Value>) -> Vec<u8> {
    let file = json!({ "result": rooms }).to_string();
    tar_archive(&[("rooms/ROOMS", file)])
}

/// The three-section dataset used by the query scenarios
pub fn small_courses() -> Vec<u8> {
    courses_archive(vec![
        section("cpsc", "310", 95.5, 1),
        section("cpsc", "110", 88.0, 2),
        section("math", "100", 92.25, 3),
    ])
}
