// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{number, text};
use crate::object::{Category, GraphObject, ObjectError, Priority};
use lumen_control::AttributeTable;
use lumen_core::value::Value;
use std::sync::OnceLock;

/// An image producer.
///
/// Decoding is the backend's business; the image only reports a change once
/// per new source or explicit reload.
#[derive(Debug, Default)]
pub struct Image {
    file: String,
    flip: bool,
    pending: bool,
    revisions: u64,
}

impl Image {
    /// Creates an empty image.
    pub fn new() -> Self {
        Self::default()
    }

    fn attributes() -> &'static AttributeTable<Self> {
        static TABLE: OnceLock<AttributeTable<Image>> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut table = AttributeTable::new();
            table
                .add("file", "s", |image: &mut Image, args| {
                    image.file = text(args, 0).unwrap_or_default();
                    image.pending = true;
                    true
                })
                .with_getter(|image| vec![Value::from(&image.file)])
                .describe("Path of the image to display");
            table
                .add("flip", "n", |image: &mut Image, args| {
                    image.flip = number(args, 0).is_some_and(|n| n != 0.0);
                    image.pending = true;
                    true
                })
                .with_getter(|image| vec![Value::Bool(image.flip)])
                .describe("Flip the image vertically");
            table
                .add("reload", "", |image: &mut Image, _| {
                    image.pending = true;
                    true
                })
                .describe("Reload the image from its source");
            table
                .add_read_only("revisions", |image: &Image| {
                    vec![Value::Int(image.revisions as i64)]
                })
                .describe("Number of content changes reported");
            table
        })
    }
}

impl GraphObject for Image {
    fn type_name(&self) -> &str {
        "image"
    }

    fn category(&self) -> Category {
        Category::Image
    }

    fn rendering_priority(&self) -> Priority {
        Priority::Media
    }

    fn update(&mut self) -> Result<bool, ObjectError> {
        if !self.pending {
            return Ok(false);
        }
        self.pending = false;
        self.revisions += 1;
        Ok(true)
    }

    crate::forward_attributes!(Self::attributes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_new_source_once() {
        let mut image = Image::new();
        assert!(!image.update().unwrap());

        image.set_attribute("file", &[Value::from("clip.png")]).unwrap();
        assert!(image.update().unwrap());
        assert!(!image.update().unwrap());
        assert_eq!(image.attribute("file"), Some(vec![Value::from("clip.png")]));
    }

    #[test]
    fn only_stateful_attributes_are_saved() {
        let image = Image::new();
        let saved: Vec<String> = image.saved_attributes().into_iter().map(|(n, _)| n).collect();
        assert_eq!(saved, vec!["file", "flip"]);
    }
}
