//! JSON image serialization, per the boundary format a surface round-trips
//! through. Grounded on `termpaint_image.cpp`'s `print_color`/`print_style`
//! field layout, re-expressed as `serde_json` values instead of a hand
//! rolled string writer.

use serde_json::{Map, Value, json};

use crate::cell::{Cell, Color, Style, Underline, ERASE_SENTINEL};
use crate::surface::{Surface, WriteAttrs};
use vtwidth::WidthTable;

const FORMAT_VERSION: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    NotAnObject,
    MissingMarker,
    UnsupportedVersion,
    MissingDimensions,
    MalformedCell,
    /// Writing the decoded cells back did not reproduce every attribute.
    VerificationMismatch,
}

/// Serialize `surface` to the `termpaint_image`-shaped JSON document.
#[must_use]
pub fn save(surface: &Surface) -> Value {
    let mut cells = Vec::new();
    for y in 0..surface.height() {
        let mut x = 0;
        while x < surface.width() {
            let Some(cell) = surface.cell(x, y) else { break };
            if cell.is_right_half() {
                x += 1;
                continue;
            }
            cells.push(cell_to_json(x, y, cell, surface.cell_text(x, y)));
            x += usize::from(cell.width());
        }
    }
    json!({
        "termpaint_image": true,
        "version": FORMAT_VERSION,
        "width": surface.width(),
        "height": surface.height(),
        "cells": cells,
    })
}

fn cell_to_json(x: usize, y: usize, cell: &Cell, text: &[u8]) -> Value {
    let mut obj = Map::new();
    obj.insert("x".into(), json!(x));
    obj.insert("y".into(), json!(y));

    let cleared = text == [ERASE_SENTINEL];
    let text_str = if cleared {
        " ".to_string()
    } else {
        String::from_utf8_lossy(text).into_owned()
    };
    obj.insert("t".into(), json!(text_str));
    obj.insert("width".into(), json!(cell.width()));

    if let Some(fg) = cell.fg.image_token() {
        obj.insert("fg".into(), json!(fg));
    }
    if let Some(bg) = cell.bg.image_token() {
        obj.insert("bg".into(), json!(bg));
    }
    if let Some(deco) = cell.deco.image_token() {
        obj.insert("deco".into(), json!(deco));
    }

    if cell.style.contains(Style::BOLD) {
        obj.insert("bold".into(), json!(true));
    }
    if cell.style.contains(Style::ITALIC) {
        obj.insert("italic".into(), json!(true));
    }
    if cell.style.contains(Style::BLINK) {
        obj.insert("blink".into(), json!(true));
    }
    if cell.style.contains(Style::OVERLINE) {
        obj.insert("overline".into(), json!(true));
    }
    if cell.style.contains(Style::INVERSE) {
        obj.insert("inverse".into(), json!(true));
    }
    if cell.style.contains(Style::STRIKE) {
        obj.insert("strike".into(), json!(true));
    }
    match cell.underline {
        Underline::None => {}
        Underline::Single => {
            obj.insert("underline".into(), json!(true));
        }
        Underline::Double => {
            obj.insert("underline-double".into(), json!(true));
        }
        Underline::Curly => {
            obj.insert("underline-curly".into(), json!(true));
        }
    }

    if cleared {
        obj.insert("cleared".into(), json!(true));
    }
    if cell.softwrap {
        obj.insert("x-termpaint-softwrap".into(), json!(true));
    }
    if let Some(patch) = &cell.patch {
        obj.insert(
            "patch".into(),
            json!({
                "setup": patch.setup,
                "cleanup": patch.cleanup,
                "optimize": patch.optimize,
            }),
        );
    }

    Value::Object(obj)
}

fn color_from_token(token: &str) -> Color {
    if let Some(hex) = token.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(packed) = u32::from_str_radix(hex, 16) {
                let r = (packed >> 16) as u8;
                let g = (packed >> 8) as u8;
                let b = packed as u8;
                return Color::Rgb(r, g, b);
            }
        }
    }
    if let Some(pos) = crate::cell::NAMED_COLOR_NAMES.iter().position(|n| *n == token) {
        return Color::Named(pos as u8);
    }
    if let Ok(idx) = token.parse::<u16>() {
        if idx <= 255 {
            return Color::Indexed(idx as u8);
        }
    }
    Color::Default
}

fn color_field(obj: &Map<String, Value>, key: &str) -> Color {
    obj.get(key).and_then(Value::as_str).map_or(Color::Default, color_from_token)
}

fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Deserialize a surface from its JSON image form and verify the result by
/// writing the decoded cells into a fresh surface and comparing. Any
/// mismatch (including a malformed document) is a load failure: no partial
/// surface is ever exposed.
///
/// # Errors
///
/// Returns a [`LoadError`] describing why the document could not be
/// reproduced faithfully.
pub fn load(value: &Value, table: WidthTable) -> Result<Surface, LoadError> {
    let obj = value.as_object().ok_or(LoadError::NotAnObject)?;
    if obj.get("termpaint_image").and_then(Value::as_bool) != Some(true) {
        return Err(LoadError::MissingMarker);
    }
    if obj.get("version").and_then(Value::as_u64) != Some(FORMAT_VERSION) {
        return Err(LoadError::UnsupportedVersion);
    }
    let width = obj.get("width").and_then(Value::as_u64).ok_or(LoadError::MissingDimensions)? as usize;
    let height = obj.get("height").and_then(Value::as_u64).ok_or(LoadError::MissingDimensions)? as usize;
    if width == 0 || height == 0 {
        return Err(LoadError::MissingDimensions);
    }

    let mut surface = Surface::new(width, height, table);
    surface.clear();

    let cells = obj.get("cells").and_then(Value::as_array).ok_or(LoadError::MalformedCell)?;
    for entry in cells {
        let cell_obj = entry.as_object().ok_or(LoadError::MalformedCell)?;
        let x = cell_obj.get("x").and_then(Value::as_u64).ok_or(LoadError::MalformedCell)? as usize;
        let y = cell_obj.get("y").and_then(Value::as_u64).ok_or(LoadError::MalformedCell)? as usize;
        let text = cell_obj.get("t").and_then(Value::as_str).ok_or(LoadError::MalformedCell)?;
        let cleared = flag(cell_obj, "cleared");

        let mut style = Style::NONE;
        if flag(cell_obj, "bold") {
            style |= Style::BOLD;
        }
        if flag(cell_obj, "italic") {
            style |= Style::ITALIC;
        }
        if flag(cell_obj, "blink") {
            style |= Style::BLINK;
        }
        if flag(cell_obj, "overline") {
            style |= Style::OVERLINE;
        }
        if flag(cell_obj, "inverse") {
            style |= Style::INVERSE;
        }
        if flag(cell_obj, "strike") {
            style |= Style::STRIKE;
        }
        let underline = if flag(cell_obj, "underline-curly") {
            Underline::Curly
        } else if flag(cell_obj, "underline-double") {
            Underline::Double
        } else if flag(cell_obj, "underline") {
            Underline::Single
        } else {
            Underline::None
        };

        let patch = cell_obj.get("patch").and_then(Value::as_object).map(|p| crate::cell::Patch {
            setup: p.get("setup").and_then(Value::as_str).map(str::to_owned),
            cleanup: p.get("cleanup").and_then(Value::as_str).map(str::to_owned),
            optimize: flag(p, "optimize"),
        });

        let attrs = WriteAttrs {
            fg: color_field(cell_obj, "fg"),
            bg: color_field(cell_obj, "bg"),
            deco: color_field(cell_obj, "deco"),
            style,
            underline,
            patch,
            softwrap: flag(cell_obj, "x-termpaint-softwrap"),
        };

        let body = if cleared { "\u{7F}" } else { text };
        surface.write(x, y, body, &attrs);
    }

    if save(&surface) != *value {
        return Err(LoadError::VerificationMismatch);
    }

    Ok(surface)
}
